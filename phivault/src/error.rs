//! Error types for `phivault` operations.

/// Main error type for `phivault` operations.
///
/// Error messages never carry key bytes, plaintext, or partially
/// authenticated plaintext; `AuthenticationFailed` in particular is a
/// unit variant so nothing decrypted can leak through its `Display`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Key material is absent from configuration
    #[error("encryption key is not configured")]
    KeyNotConfigured,

    /// Decoded key material has the wrong length
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Required key length in bytes
        expected: usize,
        /// Length actually decoded
        actual: usize,
    },

    /// A stored record names an algorithm this build cannot verify
    #[error("unsupported algorithm: {found} (supported: {supported})")]
    UnsupportedAlgorithm {
        /// The algorithm identifier found in the stored record
        found: String,
        /// The identifier this build supports
        supported: &'static str,
    },

    /// Authentication tag verification failed (data may be corrupted or tampered)
    #[error("authentication failed: ciphertext may be corrupted or tampered")]
    AuthenticationFailed,

    /// Encryption operation failed
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// Stored ciphertext hex or framing is malformed
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Plaintext (de)serialization failed
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Backup envelope construction failed
    #[error("backup creation failed: {0}")]
    BackupFailed(String),
}
