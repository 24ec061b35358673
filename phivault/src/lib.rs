//! # `phivault`
//!
//! Field- and record-level authenticated encryption for regulated
//! personal data, with searchable index tokens and retention-tracked
//! backup envelopes.
//!
//! ## Features
//!
//! - Whole-record AEAD encryption (AES-256-GCM) with stored metadata
//! - Compact single-column field encryption with fixed hex framing
//! - Keyed one-way index tokens for equality search over ciphertext
//! - Bulk field encryption with per-field failure tolerance
//! - Backup envelopes with a 7-calendar-year retention horizon
//! - Key material validation, strength checks, and zero-on-drop hygiene
//!
//! ## Example
//!
//! ```rust,ignore
//! use phivault::prelude::*;
//!
//! let key = KeyMaterial::load(Some(&key_hex), None)?;
//! let cipher = RecordCipher::new(AesGcmProvider);
//!
//! let record = cipher.encrypt(&key, &patient)?;
//! let patient: Patient = cipher.decrypt(&key, &record)?;
//! ```

#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod backup;
pub mod bulk;
pub mod error;
pub mod field;
pub mod index;
pub mod key;
pub mod provider;
pub mod record;
pub mod strength;

pub mod prelude {
    //! Convenience re-exports for common use.
    pub use crate::backup::{BackupEnvelope, RetentionBackupBuilder};
    pub use crate::bulk::{BulkFieldCodec, DECRYPTION_FAILED_SENTINEL};
    pub use crate::error::Error;
    pub use crate::field::FieldCipher;
    pub use crate::index::hash_for_index;
    pub use crate::key::{generate_key_hex, KeyMaterial};
    pub use crate::provider::{AesGcmProvider, CryptoProvider};
    pub use crate::record::{EncryptedRecord, RecordCipher};
    pub use crate::strength::is_strong;
}
