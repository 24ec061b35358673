//! Long-term backup envelopes with a legal retention horizon.
//!
//! A backup wraps an encrypted record with its own identity, creation
//! time, caller-supplied metadata, and a purge date computed as creation
//! time plus seven calendar years. The retention period is a fixed
//! regulatory policy, not a configuration knob.

use crate::error::Error;
use crate::key::KeyMaterial;
use crate::provider::CryptoProvider;
use crate::record::{EncryptedRecord, RecordCipher};
use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fixed tag identifying envelopes produced by this builder.
pub const BACKUP_TYPE: &str = "encrypted_phi_backup";

/// Regulatory retention period, in calendar months (7 years).
const RETENTION_MONTHS: u32 = 84;

/// An encrypted record wrapped with backup identity and retention
/// metadata. Stored verbatim by the caller's archive layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupEnvelope {
    /// The encrypted payload, flattened into the envelope.
    #[serde(flatten)]
    pub record: EncryptedRecord,
    /// Unique identity of this backup.
    pub backup_id: uuid::Uuid,
    /// When the backup was created.
    pub backup_created_at: DateTime<Utc>,
    /// Caller-supplied open metadata map.
    pub metadata: Map<String, Value>,
    /// Date after which the archive may purge this backup.
    pub retention_until: DateTime<Utc>,
    /// Always [`BACKUP_TYPE`].
    pub backup_type: String,
}

/// Builds retention-tracked backup envelopes around encrypted records.
pub struct RetentionBackupBuilder<P: CryptoProvider> {
    records: RecordCipher<P>,
}

impl<P: CryptoProvider> RetentionBackupBuilder<P> {
    /// Creates a backup builder backed by the given provider.
    pub fn new(provider: P) -> Self {
        Self { records: RecordCipher::new(provider) }
    }

    /// Encrypts a value and wraps it in a backup envelope.
    ///
    /// The retention horizon is creation time plus seven calendar years
    /// (calendar arithmetic, not `7 * 365` days).
    ///
    /// # Errors
    ///
    /// Propagates encryption and serialization failures from the record
    /// cipher; returns `Error::BackupFailed` if the retention date is not
    /// representable.
    pub fn create_backup<T: Serialize>(
        &self,
        key: &KeyMaterial,
        value: &T,
        metadata: Map<String, Value>,
    ) -> Result<BackupEnvelope, Error> {
        let record = self.records.encrypt(key, value)?;

        let created_at = Utc::now();
        let retention_until = created_at
            .checked_add_months(Months::new(RETENTION_MONTHS))
            .ok_or_else(|| Error::BackupFailed("retention horizon overflows".to_string()))?;

        Ok(BackupEnvelope {
            record,
            backup_id: uuid::Uuid::new_v4(),
            backup_created_at: created_at,
            metadata,
            retention_until,
            backup_type: BACKUP_TYPE.to_string(),
        })
    }
}

impl<P: CryptoProvider> Clone for RetentionBackupBuilder<P> {
    fn clone(&self) -> Self {
        Self { records: self.records.clone() }
    }
}
