//! Key material loading, validation, and generation.
//!
//! A [`KeyMaterial`] is handed to every cipher operation explicitly; nothing
//! in this crate reads key material from ambient process state. The raw key
//! lives in a [`SecretVec`] and is zero-filled when the value drops, on every
//! exit path including errors.

use crate::error::Error;
use secrecy::{ExposeSecret, SecretVec};
use zeroize::Zeroize;

/// Symmetric key size in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// Key version used when configuration does not name one.
pub const DEFAULT_KEY_VERSION: &str = "1";

/// The active symmetric key and its rotation version tag.
///
/// Immutable once loaded. `Debug` redacts the key bytes and the type is
/// deliberately not serializable.
pub struct KeyMaterial {
    key: SecretVec<u8>,
    version: String,
}

impl KeyMaterial {
    /// Loads key material from a hex-encoded configuration value.
    ///
    /// The version defaults to [`DEFAULT_KEY_VERSION`] when unspecified.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `Error::KeyNotConfigured` if `source_hex` is absent
    /// - `Error::InvalidEncoding` if it is not valid hex
    /// - `Error::InvalidKeyLength` if the decoded key is not exactly 32 bytes
    pub fn load(source_hex: Option<&str>, version: Option<&str>) -> Result<Self, Error> {
        let source_hex = source_hex.ok_or(Error::KeyNotConfigured)?;
        let bytes = hex::decode(source_hex)
            .map_err(|e| Error::InvalidEncoding(format!("key material is not valid hex: {e}")))?;
        Self::from_bytes(bytes, version.unwrap_or(DEFAULT_KEY_VERSION))
    }

    /// Wraps raw key bytes, taking ownership so the only long-lived copy
    /// sits inside the `SecretVec`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidKeyLength` if `bytes` is not exactly 32 bytes.
    /// The rejected buffer is zeroed before the error is returned.
    pub fn from_bytes(mut bytes: Vec<u8>, version: impl Into<String>) -> Result<Self, Error> {
        if bytes.len() != KEY_SIZE {
            let actual = bytes.len();
            bytes.zeroize();
            return Err(Error::InvalidKeyLength { expected: KEY_SIZE, actual });
        }
        Ok(Self { key: SecretVec::new(bytes), version: version.into() })
    }

    /// Returns the key version tag.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Raw key bytes for the cipher provider. Crate-internal: callers
    /// outside this crate only ever see the opaque `KeyMaterial`.
    pub(crate) fn key_bytes(&self) -> &[u8] {
        self.key.expose_secret()
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("key", &"[redacted]")
            .field("version", &self.version)
            .finish()
    }
}

/// Generates a fresh random 256-bit key as 64 hex characters, for
/// operators provisioning new keys.
#[must_use]
pub fn generate_key_hex() -> String {
    use aes_gcm::aead::{rand_core::RngCore, OsRng};

    let mut key = zeroize::Zeroizing::new([0u8; KEY_SIZE]);
    OsRng.fill_bytes(&mut key[..]);
    hex::encode(&key[..])
}
