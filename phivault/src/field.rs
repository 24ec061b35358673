//! Single-field encryption into a compact database-column string.
//!
//! An encoded field is one hex string with fixed positional framing:
//!
//! ```text
//! [0..32)   IV        (16 bytes)
//! [32..64)  auth tag  (16 bytes)
//! [64..N)   ciphertext
//! ```
//!
//! `None` passes through both directions unchanged; optional columns stay
//! optional without the caller special-casing them.

use crate::error::Error;
use crate::key::KeyMaterial;
use crate::provider::{random_iv, CryptoProvider, IV_SIZE, TAG_SIZE};
use crate::record::decode_fixed;
use std::sync::Arc;

/// Hex chars occupied by the IV prefix.
pub const IV_HEX_LEN: usize = IV_SIZE * 2;

/// Hex chars occupied by the tag segment.
pub const TAG_HEX_LEN: usize = TAG_SIZE * 2;

/// Minimum length of a well-formed encoded field (IV + tag, empty payload).
pub const MIN_ENCODED_LEN: usize = IV_HEX_LEN + TAG_HEX_LEN;

/// Encrypts and decrypts scalar field values.
///
/// Guarantees byte-for-byte string round-trip only; callers re-parse the
/// returned string when the column held a number or boolean.
pub struct FieldCipher<P: CryptoProvider> {
    provider: Arc<P>,
}

impl<P: CryptoProvider> FieldCipher<P> {
    /// Creates a field cipher backed by the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider: Arc::new(provider) }
    }

    /// Encrypts one scalar value into an encoded field string.
    ///
    /// `None` is returned unchanged; absent values are a no-op, not an
    /// error. A fresh random IV is drawn per call.
    ///
    /// # Errors
    ///
    /// Returns `Error::EncryptionFailed` if the cipher fails.
    pub fn encrypt_field(
        &self,
        key: &KeyMaterial,
        value: Option<&str>,
    ) -> Result<Option<String>, Error> {
        let Some(value) = value else { return Ok(None) };

        let iv = random_iv();
        let sealed = self.provider.seal(key.key_bytes(), &iv, value.as_bytes())?;

        let mut encoded = String::with_capacity(MIN_ENCODED_LEN + sealed.ciphertext.len() * 2);
        encoded.push_str(&hex::encode(iv));
        encoded.push_str(&hex::encode(sealed.tag));
        encoded.push_str(&hex::encode(sealed.ciphertext));
        Ok(Some(encoded))
    }

    /// Decrypts an encoded field back to its original string form.
    ///
    /// `None` passes through unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidEncoding` if the framing or hex is
    /// malformed, `Error::AuthenticationFailed` on tag mismatch, and
    /// `Error::Serialization` if the authenticated plaintext is not UTF-8.
    pub fn decrypt_field(
        &self,
        key: &KeyMaterial,
        encoded: Option<&str>,
    ) -> Result<Option<String>, Error> {
        let Some(encoded) = encoded else { return Ok(None) };

        if !encoded.is_ascii() {
            return Err(Error::InvalidEncoding("encoded field is not hex".to_string()));
        }
        if encoded.len() < MIN_ENCODED_LEN {
            return Err(Error::InvalidEncoding(format!(
                "encoded field too short: {} chars (minimum {MIN_ENCODED_LEN})",
                encoded.len()
            )));
        }

        let iv = decode_fixed::<IV_SIZE>(&encoded[..IV_HEX_LEN], "iv")?;
        let tag = decode_fixed::<TAG_SIZE>(&encoded[IV_HEX_LEN..MIN_ENCODED_LEN], "authTag")?;
        let ciphertext = hex::decode(&encoded[MIN_ENCODED_LEN..])
            .map_err(|e| Error::InvalidEncoding(format!("ciphertext is not valid hex: {e}")))?;

        let plaintext = self.provider.open(key.key_bytes(), &iv, &tag, &ciphertext)?;

        String::from_utf8(plaintext)
            .map(Some)
            .map_err(|_| Error::Serialization("decrypted field is not valid UTF-8".to_string()))
    }
}

impl<P: CryptoProvider> Clone for FieldCipher<P> {
    fn clone(&self) -> Self {
        Self { provider: Arc::clone(&self.provider) }
    }
}
