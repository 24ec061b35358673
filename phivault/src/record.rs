//! Whole-record encryption with authenticated metadata.
//!
//! A [`RecordCipher`] turns any JSON-serializable value into an
//! [`EncryptedRecord`] and back. The record is the at-rest contract other
//! services persist verbatim: hex ciphertext, hex 16-byte IV, hex 16-byte
//! tag, the algorithm identifier, an RFC 3339 timestamp, and the key
//! version used.

use crate::error::Error;
use crate::key::KeyMaterial;
use crate::provider::{random_iv, CryptoProvider, IV_SIZE, TAG_SIZE};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Encrypted record with the metadata needed to decrypt it later.
///
/// Produced only by [`RecordCipher::encrypt`]; consumed only by
/// [`RecordCipher::decrypt`]. Field names are part of the storage contract
/// and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedRecord {
    /// Hex-encoded ciphertext.
    pub ciphertext: String,
    /// Hex-encoded 16-byte IV.
    pub iv: String,
    /// Hex-encoded 16-byte authentication tag.
    pub auth_tag: String,
    /// Cipher identifier, checked before decryption.
    pub algorithm: String,
    /// When the record was encrypted.
    pub encrypted_at: DateTime<Utc>,
    /// Version tag of the key that produced the record.
    pub key_version: String,
}

/// Encrypts and decrypts whole records.
///
/// Generic over a [`CryptoProvider`] so the cipher backend can be swapped
/// in tests. Stateless apart from the provider handle; safe to share
/// across threads and cheap to clone.
///
/// # Example
///
/// ```
/// use phivault::key::KeyMaterial;
/// use phivault::provider::AesGcmProvider;
/// use phivault::record::RecordCipher;
/// use serde_json::json;
///
/// # fn main() -> Result<(), phivault::error::Error> {
/// let key = KeyMaterial::from_bytes(vec![7u8; 32], "1")?;
/// let cipher = RecordCipher::new(AesGcmProvider);
///
/// let record = cipher.encrypt(&key, &json!({"name": "Alice"}))?;
/// let value: serde_json::Value = cipher.decrypt(&key, &record)?;
/// assert_eq!(value["name"], "Alice");
/// # Ok(())
/// # }
/// ```
pub struct RecordCipher<P: CryptoProvider> {
    provider: Arc<P>,
}

impl<P: CryptoProvider> RecordCipher<P> {
    /// Creates a record cipher backed by the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider: Arc::new(provider) }
    }

    /// Encrypts a value as one authenticated record.
    ///
    /// The value is serialized to canonical JSON bytes and sealed under a
    /// fresh random 16-byte IV; identical inputs never share an IV.
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` if the value cannot be serialized,
    /// or `Error::EncryptionFailed` if the cipher fails.
    pub fn encrypt<T: Serialize>(
        &self,
        key: &KeyMaterial,
        value: &T,
    ) -> Result<EncryptedRecord, Error> {
        let plaintext = serde_json::to_vec(value)
            .map_err(|e| Error::Serialization(format!("record is not serializable: {e}")))?;

        let iv = random_iv();
        let sealed = self.provider.seal(key.key_bytes(), &iv, &plaintext)?;

        Ok(EncryptedRecord {
            ciphertext: hex::encode(sealed.ciphertext),
            iv: hex::encode(iv),
            auth_tag: hex::encode(sealed.tag),
            algorithm: self.provider.algorithm().to_string(),
            encrypted_at: Utc::now(),
            key_version: key.version().to_string(),
        })
    }

    /// Decrypts a record back to its original value.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `Error::UnsupportedAlgorithm` if the record names a different
    ///   cipher; never auto-downgrades to another path
    /// - `Error::InvalidEncoding` if the hex fields are malformed
    /// - `Error::AuthenticationFailed` on tag mismatch (tamper, wrong key,
    ///   or corrupted IV); no decrypted bytes are released on this path
    /// - `Error::Serialization` if the authenticated plaintext is not
    ///   valid JSON for `T`
    pub fn decrypt<T: DeserializeOwned>(
        &self,
        key: &KeyMaterial,
        record: &EncryptedRecord,
    ) -> Result<T, Error> {
        if record.algorithm != self.provider.algorithm() {
            return Err(Error::UnsupportedAlgorithm {
                found: record.algorithm.clone(),
                supported: self.provider.algorithm(),
            });
        }

        let iv = decode_fixed::<IV_SIZE>(&record.iv, "iv")?;
        let tag = decode_fixed::<TAG_SIZE>(&record.auth_tag, "authTag")?;
        let ciphertext = hex::decode(&record.ciphertext)
            .map_err(|e| Error::InvalidEncoding(format!("ciphertext is not valid hex: {e}")))?;

        let plaintext = self.provider.open(key.key_bytes(), &iv, &tag, &ciphertext)?;

        serde_json::from_slice(&plaintext)
            .map_err(|e| Error::Serialization(format!("decrypted record is not valid JSON: {e}")))
    }
}

impl<P: CryptoProvider> Clone for RecordCipher<P> {
    fn clone(&self) -> Self {
        Self { provider: Arc::clone(&self.provider) }
    }
}

/// Decodes a hex field that must be exactly `N` bytes.
pub(crate) fn decode_fixed<const N: usize>(hex_str: &str, field: &str) -> Result<[u8; N], Error> {
    let bytes = hex::decode(hex_str)
        .map_err(|e| Error::InvalidEncoding(format!("{field} is not valid hex: {e}")))?;
    bytes.try_into().map_err(|_| {
        Error::InvalidEncoding(format!("{field} must be exactly {N} bytes"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::AesGcmProvider;
    use serde_json::{json, Value};

    fn test_key() -> KeyMaterial {
        KeyMaterial::from_bytes(vec![42u8; 32], "2").unwrap()
    }

    #[test]
    fn test_record_round_trip() {
        let cipher = RecordCipher::new(AesGcmProvider);
        let key = test_key();

        let value = json!({
            "patientId": "p-1001",
            "diagnoses": ["E11.9", "I10"],
            "age": 47,
            "consent": true,
        });

        let record = cipher.encrypt(&key, &value).unwrap();
        let decrypted: Value = cipher.decrypt(&key, &record).unwrap();

        assert_eq!(decrypted, value);
    }

    #[test]
    fn test_record_metadata() {
        let cipher = RecordCipher::new(AesGcmProvider);
        let key = test_key();

        let record = cipher.encrypt(&key, &json!("x")).unwrap();

        assert_eq!(record.algorithm, "aes-256-gcm");
        assert_eq!(record.key_version, "2");
        assert_eq!(record.iv.len(), 32);
        assert_eq!(record.auth_tag.len(), 32);
    }

    #[test]
    fn test_fresh_iv_per_call() {
        let cipher = RecordCipher::new(AesGcmProvider);
        let key = test_key();
        let value = json!({"same": "input"});

        let r1 = cipher.encrypt(&key, &value).unwrap();
        let r2 = cipher.encrypt(&key, &value).unwrap();

        // Fresh IV means different ciphertext for identical plaintext
        assert_ne!(r1.iv, r2.iv);
        assert_ne!(r1.ciphertext, r2.ciphertext);

        let v1: Value = cipher.decrypt(&key, &r1).unwrap();
        let v2: Value = cipher.decrypt(&key, &r2).unwrap();
        assert_eq!(v1, value);
        assert_eq!(v2, value);
    }

    #[test]
    fn test_unsupported_algorithm() {
        let cipher = RecordCipher::new(AesGcmProvider);
        let key = test_key();

        let mut record = cipher.encrypt(&key, &json!("x")).unwrap();
        record.algorithm = "des-ecb".to_string();

        let result: Result<Value, _> = cipher.decrypt(&key, &record);
        assert!(matches!(result, Err(Error::UnsupportedAlgorithm { .. })));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let cipher = RecordCipher::new(AesGcmProvider);
        let key = test_key();

        let mut record = cipher.encrypt(&key, &json!({"a": 1})).unwrap();
        let flipped = flip_last_hex_bit(&record.ciphertext);
        record.ciphertext = flipped;

        let result: Result<Value, _> = cipher.decrypt(&key, &record);
        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_tampered_iv_fails() {
        let cipher = RecordCipher::new(AesGcmProvider);
        let key = test_key();

        let mut record = cipher.encrypt(&key, &json!({"a": 1})).unwrap();
        record.iv = flip_last_hex_bit(&record.iv);

        let result: Result<Value, _> = cipher.decrypt(&key, &record);
        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_tampered_tag_fails() {
        let cipher = RecordCipher::new(AesGcmProvider);
        let key = test_key();

        let mut record = cipher.encrypt(&key, &json!({"a": 1})).unwrap();
        record.auth_tag = flip_last_hex_bit(&record.auth_tag);

        let result: Result<Value, _> = cipher.decrypt(&key, &record);
        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_wrong_key_fails() {
        let cipher = RecordCipher::new(AesGcmProvider);
        let key = test_key();
        let other = KeyMaterial::from_bytes(vec![43u8; 32], "2").unwrap();

        let record = cipher.encrypt(&key, &json!({"a": 1})).unwrap();
        let result: Result<Value, _> = cipher.decrypt(&other, &record);
        assert!(matches!(result, Err(Error::AuthenticationFailed)));
    }

    #[test]
    fn test_malformed_iv_hex() {
        let cipher = RecordCipher::new(AesGcmProvider);
        let key = test_key();

        let mut record = cipher.encrypt(&key, &json!("x")).unwrap();
        record.iv = "zz".repeat(16);

        let result: Result<Value, _> = cipher.decrypt(&key, &record);
        assert!(matches!(result, Err(Error::InvalidEncoding(_))));
    }

    #[test]
    fn test_wrong_iv_width() {
        let cipher = RecordCipher::new(AesGcmProvider);
        let key = test_key();

        let mut record = cipher.encrypt(&key, &json!("x")).unwrap();
        record.iv = "ab".repeat(12);

        let result: Result<Value, _> = cipher.decrypt(&key, &record);
        assert!(matches!(result, Err(Error::InvalidEncoding(_))));
    }

    #[test]
    fn test_record_serde_contract() {
        let cipher = RecordCipher::new(AesGcmProvider);
        let key = test_key();

        let record = cipher.encrypt(&key, &json!({"a": 1})).unwrap();
        let stored = serde_json::to_value(&record).unwrap();

        // Field names must stay stable for interoperability
        for field in ["ciphertext", "iv", "authTag", "algorithm", "encryptedAt", "keyVersion"] {
            assert!(stored.get(field).is_some(), "missing field {field}");
        }

        let reloaded: EncryptedRecord = serde_json::from_value(stored).unwrap();
        let decrypted: Value = cipher.decrypt(&key, &reloaded).unwrap();
        assert_eq!(decrypted, json!({"a": 1}));
    }

    fn flip_last_hex_bit(hex_str: &str) -> String {
        let mut bytes = hex::decode(hex_str).unwrap();
        *bytes.last_mut().unwrap() ^= 0x01;
        hex::encode(bytes)
    }
}
