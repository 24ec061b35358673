//! Bulk field encryption across a named subset of document fields.
//!
//! Encryption failures abort the whole operation; decryption failures are
//! scoped to the field that failed and surface as a visible sentinel, so
//! one corrupted column never makes the rest of a record unreadable.

use crate::error::Error;
use crate::field::FieldCipher;
use crate::key::KeyMaterial;
use crate::provider::CryptoProvider;
use serde_json::{Map, Value};

/// Sentinel written in place of a field whose ciphertext failed
/// authentication during bulk decryption.
pub const DECRYPTION_FAILED_SENTINEL: &str = "[DECRYPTION_FAILED]";

/// JSON document processed by the bulk codec.
pub type Document = Map<String, Value>;

/// Outcome of decrypting one field in a bulk operation.
///
/// The per-field tagging makes the partial-failure contract explicit:
/// a failure is recovered locally, never escalated to the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    /// The field decrypted and authenticated.
    Recovered(String),
    /// Tag verification failed; rendered as [`DECRYPTION_FAILED_SENTINEL`].
    Failed,
}

impl FieldOutcome {
    fn into_value(self) -> Value {
        match self {
            Self::Recovered(s) => Value::String(s),
            Self::Failed => Value::String(DECRYPTION_FAILED_SENTINEL.to_string()),
        }
    }
}

/// Applies the field cipher across a named subset of document fields.
pub struct BulkFieldCodec<P: CryptoProvider> {
    field: FieldCipher<P>,
}

impl<P: CryptoProvider> BulkFieldCodec<P> {
    /// Creates a bulk codec backed by the given provider.
    pub fn new(provider: P) -> Self {
        Self { field: FieldCipher::new(provider) }
    }

    /// Encrypts each named, present, non-null field in place of its
    /// plaintext value. All other fields pass through unmodified.
    ///
    /// Non-string scalars are stringified before encryption; the string
    /// form is what round-trips.
    ///
    /// # Errors
    ///
    /// Propagates the first encryption failure; unlike decryption, there
    /// is no per-field degradation on this path.
    pub fn encrypt_fields(
        &self,
        key: &KeyMaterial,
        document: &Document,
        field_names: &[&str],
    ) -> Result<Document, Error> {
        let mut out = document.clone();
        for &name in field_names {
            let Some(value) = document.get(name) else { continue };
            if value.is_null() {
                continue;
            }
            let plain = stringify_scalar(value);
            if let Some(encoded) = self.field.encrypt_field(key, Some(&plain))? {
                out.insert(name.to_string(), Value::String(encoded));
            }
        }
        Ok(out)
    }

    /// Decrypts each named, present, non-null field, tolerating per-field
    /// failures: a field whose ciphertext does not authenticate is
    /// replaced with [`DECRYPTION_FAILED_SENTINEL`] instead of aborting
    /// the batch.
    ///
    /// # Errors
    ///
    /// Only structural problems (a named field that is not a string)
    /// surface as errors; authentication failures do not.
    pub fn decrypt_fields(
        &self,
        key: &KeyMaterial,
        document: &Document,
        field_names: &[&str],
    ) -> Result<Document, Error> {
        let mut out = document.clone();
        for &name in field_names {
            let Some(value) = document.get(name) else { continue };
            if value.is_null() {
                continue;
            }
            let Some(encoded) = value.as_str() else {
                return Err(Error::InvalidEncoding(format!(
                    "field {name} does not hold an encoded string"
                )));
            };
            let outcome = self.decrypt_one(key, encoded);
            out.insert(name.to_string(), outcome.into_value());
        }
        Ok(out)
    }

    /// Decrypts a single encoded field into a tagged outcome.
    fn decrypt_one(&self, key: &KeyMaterial, encoded: &str) -> FieldOutcome {
        match self.field.decrypt_field(key, Some(encoded)) {
            Ok(Some(plain)) => FieldOutcome::Recovered(plain),
            // InvalidEncoding, AuthenticationFailed, bad UTF-8: all scoped
            // to this one field
            Ok(None) | Err(_) => FieldOutcome::Failed,
        }
    }
}

impl<P: CryptoProvider> Clone for BulkFieldCodec<P> {
    fn clone(&self) -> Self {
        Self { field: self.field.clone() }
    }
}

/// String form of a scalar, the form that round-trips through the field
/// cipher. Strings are used as-is; numbers and booleans render the way
/// they print.
fn stringify_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::AesGcmProvider;
    use serde_json::json;

    fn test_key() -> KeyMaterial {
        KeyMaterial::from_bytes(vec![42u8; 32], "1").unwrap()
    }

    fn codec() -> BulkFieldCodec<AesGcmProvider> {
        BulkFieldCodec::new(AesGcmProvider)
    }

    fn doc(value: Value) -> Document {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_bulk_round_trip() {
        let codec = codec();
        let key = test_key();

        let patient = doc(json!({
            "id": "p-1001",
            "ssn": "123-45-6789",
            "phone": "555-0134",
            "age": 47,
        }));

        let fields = ["ssn", "phone"];
        let encrypted = codec.encrypt_fields(&key, &patient, &fields).unwrap();

        // Named fields replaced, others untouched
        assert_ne!(encrypted["ssn"], patient["ssn"]);
        assert_ne!(encrypted["phone"], patient["phone"]);
        assert_eq!(encrypted["id"], patient["id"]);
        assert_eq!(encrypted["age"], patient["age"]);

        let decrypted = codec.decrypt_fields(&key, &encrypted, &fields).unwrap();
        assert_eq!(decrypted["ssn"], json!("123-45-6789"));
        assert_eq!(decrypted["phone"], json!("555-0134"));
        assert_eq!(decrypted["id"], json!("p-1001"));
    }

    #[test]
    fn test_numbers_round_trip_as_strings() {
        let codec = codec();
        let key = test_key();

        let record = doc(json!({"weight": 82.5}));
        let encrypted = codec.encrypt_fields(&key, &record, &["weight"]).unwrap();
        let decrypted = codec.decrypt_fields(&key, &encrypted, &["weight"]).unwrap();

        // String round-trip, not type fidelity
        assert_eq!(decrypted["weight"], json!("82.5"));
    }

    #[test]
    fn test_absent_and_null_fields_untouched() {
        let codec = codec();
        let key = test_key();

        let record = doc(json!({"email": null, "name": "Alice"}));
        let encrypted = codec.encrypt_fields(&key, &record, &["email", "missing", "name"]).unwrap();

        assert_eq!(encrypted["email"], Value::Null);
        assert!(!encrypted.contains_key("missing"));
        assert_ne!(encrypted["name"], json!("Alice"));

        let decrypted = codec.decrypt_fields(&key, &encrypted, &["email", "missing", "name"]).unwrap();
        assert_eq!(decrypted["email"], Value::Null);
        assert_eq!(decrypted["name"], json!("Alice"));
    }

    #[test]
    fn test_partial_failure_yields_sentinel() {
        let codec = codec();
        let key = test_key();

        let record = doc(json!({"a": "keep me", "b": "lose me"}));
        let mut encrypted = codec.encrypt_fields(&key, &record, &["a", "b"]).unwrap();

        // Corrupt field b only
        let mut bytes = hex::decode(encrypted["b"].as_str().unwrap()).unwrap();
        bytes[35] ^= 0xff;
        encrypted.insert("b".to_string(), Value::String(hex::encode(bytes)));

        let decrypted = codec.decrypt_fields(&key, &encrypted, &["a", "b"]).unwrap();
        assert_eq!(decrypted["a"], json!("keep me"));
        assert_eq!(decrypted["b"], json!(DECRYPTION_FAILED_SENTINEL));
    }

    #[test]
    fn test_wrong_key_marks_every_field() {
        let codec = codec();
        let key = test_key();
        let other = KeyMaterial::from_bytes(vec![9u8; 32], "1").unwrap();

        let record = doc(json!({"ssn": "123-45-6789"}));
        let encrypted = codec.encrypt_fields(&key, &record, &["ssn"]).unwrap();
        let decrypted = codec.decrypt_fields(&other, &encrypted, &["ssn"]).unwrap();

        assert_eq!(decrypted["ssn"], json!(DECRYPTION_FAILED_SENTINEL));
    }

    #[test]
    fn test_decrypt_non_string_field_is_structural_error() {
        let codec = codec();
        let key = test_key();

        let record = doc(json!({"ssn": 12345}));
        let result = codec.decrypt_fields(&key, &record, &["ssn"]);
        assert!(matches!(result, Err(Error::InvalidEncoding(_))));
    }

    #[test]
    fn test_field_outcome_rendering() {
        assert_eq!(
            FieldOutcome::Recovered("x".to_string()).into_value(),
            json!("x")
        );
        assert_eq!(FieldOutcome::Failed.into_value(), json!("[DECRYPTION_FAILED]"));
    }
}
