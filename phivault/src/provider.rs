//! Cipher capability seam for the record and field ciphers.
//!
//! The ciphers are generic over a stateless [`CryptoProvider`] so an
//! alternate backend can be substituted in tests without touching call
//! sites. [`AesGcmProvider`] is the production implementation.

use crate::error::Error;
use aes_gcm::{
    aead::consts::U16,
    aes::Aes256,
    AeadInPlace, AesGcm, KeyInit, Nonce, Tag,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

/// IV size in bytes (128 bits).
pub const IV_SIZE: usize = 16;

/// Authentication tag size in bytes (128 bits).
pub const TAG_SIZE: usize = 16;

/// Algorithm identifier written into every stored record and verified
/// before decryption. Part of the at-rest interoperability contract.
pub const ALGORITHM_AES_256_GCM: &str = "aes-256-gcm";

/// AES-256-GCM with a 128-bit IV, matching the stored-record contract.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

type HmacSha256 = Hmac<Sha256>;

/// Ciphertext with its detached authentication tag.
pub struct Sealed {
    /// Encrypted payload, same length as the plaintext.
    pub ciphertext: Vec<u8>,
    /// Detached authentication tag.
    pub tag: [u8; TAG_SIZE],
}

/// Stateless authenticated-cipher capability.
///
/// Implementations must be thread-safe (`Send + Sync`); every call
/// allocates its own buffers and nothing is shared between calls.
pub trait CryptoProvider: Send + Sync {
    /// Identifier recorded alongside ciphertext and checked on decrypt.
    fn algorithm(&self) -> &'static str;

    /// Authenticated encryption with a detached tag.
    ///
    /// # Errors
    ///
    /// Returns `Error::EncryptionFailed` if the key is rejected by the
    /// cipher or encryption fails.
    fn seal(&self, key: &[u8], iv: &[u8; IV_SIZE], plaintext: &[u8]) -> Result<Sealed, Error>;

    /// Authenticated decryption. The tag must verify before any plaintext
    /// is released; on failure no decrypted bytes escape.
    ///
    /// # Errors
    ///
    /// Returns `Error::AuthenticationFailed` on tag mismatch.
    fn open(
        &self,
        key: &[u8],
        iv: &[u8; IV_SIZE],
        tag: &[u8; TAG_SIZE],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, Error>;

    /// Keyed one-way hash used for searchable index tokens.
    ///
    /// # Errors
    ///
    /// Returns `Error::EncryptionFailed` if the MAC rejects the key.
    fn mac(&self, key: &[u8], message: &[u8]) -> Result<Vec<u8>, Error>;
}

/// Production provider: AES-256-GCM for encryption, HMAC-SHA256 for
/// index tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct AesGcmProvider;

impl CryptoProvider for AesGcmProvider {
    fn algorithm(&self) -> &'static str {
        ALGORITHM_AES_256_GCM
    }

    fn seal(&self, key: &[u8], iv: &[u8; IV_SIZE], plaintext: &[u8]) -> Result<Sealed, Error> {
        let cipher = Aes256Gcm16::new_from_slice(key)
            .map_err(|e| Error::EncryptionFailed(format!("cipher rejected key: {e}")))?;

        let mut ciphertext = plaintext.to_vec();
        let tag = cipher
            .encrypt_in_place_detached(Nonce::<U16>::from_slice(iv), b"", &mut ciphertext)
            .map_err(|e| Error::EncryptionFailed(format!("AES-256-GCM encryption failed: {e}")))?;

        Ok(Sealed { ciphertext, tag: tag.into() })
    }

    fn open(
        &self,
        key: &[u8],
        iv: &[u8; IV_SIZE],
        tag: &[u8; TAG_SIZE],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let cipher = Aes256Gcm16::new_from_slice(key)
            .map_err(|e| Error::EncryptionFailed(format!("cipher rejected key: {e}")))?;

        let mut plaintext = ciphertext.to_vec();
        // The aead implementation verifies the tag in constant time before
        // applying the keystream, so nothing is decrypted on mismatch.
        cipher
            .decrypt_in_place_detached(
                Nonce::<U16>::from_slice(iv),
                b"",
                &mut plaintext,
                Tag::<U16>::from_slice(tag),
            )
            .map_err(|_| Error::AuthenticationFailed)?;

        Ok(plaintext)
    }

    fn mac(&self, key: &[u8], message: &[u8]) -> Result<Vec<u8>, Error> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
            .map_err(|e| Error::EncryptionFailed(format!("MAC rejected key: {e}")))?;
        mac.update(message);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Generates a fresh random IV. Never reused: one per seal call.
pub(crate) fn random_iv() -> [u8; IV_SIZE] {
    use aes_gcm::aead::{rand_core::RngCore, OsRng};

    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);
    iv
}
