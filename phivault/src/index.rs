//! Searchable index tokens for equality lookups over encrypted columns.
//!
//! A token is a keyed one-way hash of the plaintext: deterministic, so the
//! same value always yields the same token, and non-reversible, so the
//! token reveals nothing beyond equality. Tokens are stored alongside the
//! ciphertext, never instead of it, and are recomputed whenever needed.
//!
//! The token is keyed with the same raw key material as the cipher. That
//! conflation of roles is a deliberate compatibility decision; deriving a
//! separate indexing subkey would invalidate every token already stored.
//! See DESIGN.md.

use crate::error::Error;
use crate::key::KeyMaterial;
use crate::provider::CryptoProvider;

/// Computes a deterministic index token for an equality lookup.
///
/// The value is hashed with HMAC-SHA256 under the cipher key and the full
/// 32-byte digest is returned as 64 hex chars.
///
/// # Errors
///
/// Returns `Error::EncryptionFailed` if the MAC rejects the key.
///
/// # Example
///
/// ```
/// use phivault::index::hash_for_index;
/// use phivault::key::KeyMaterial;
/// use phivault::provider::AesGcmProvider;
///
/// # fn main() -> Result<(), phivault::error::Error> {
/// let key = KeyMaterial::from_bytes(vec![7u8; 32], "1")?;
/// let token1 = hash_for_index(&AesGcmProvider, &key, "555-0134")?;
/// let token2 = hash_for_index(&AesGcmProvider, &key, "555-0134")?;
/// assert_eq!(token1, token2);
/// # Ok(())
/// # }
/// ```
pub fn hash_for_index<P: CryptoProvider>(
    provider: &P,
    key: &KeyMaterial,
    value: &str,
) -> Result<String, Error> {
    let digest = provider.mac(key.key_bytes(), value.as_bytes())?;
    Ok(hex::encode(digest))
}
