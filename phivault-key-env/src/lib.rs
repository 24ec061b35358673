//! Environment-based key source for `phivault`.
//!
//! This crate is the configuration boundary: the only code that reads key
//! material from ambient process state. Everything past this point
//! receives an explicit [`KeyMaterial`] value; the cipher operations
//! themselves never look at the environment.

#![warn(clippy::pedantic, clippy::nursery)]

use phivault::error::Error;
use phivault::key::KeyMaterial;
use zeroize::Zeroizing;

/// Default environment variable holding the 64-hex-char key.
pub const DEFAULT_KEY_VAR: &str = "PHI_ENCRYPTION_KEY";

/// Default environment variable holding the optional key version.
pub const DEFAULT_VERSION_VAR: &str = "PHI_ENCRYPTION_KEY_VERSION";

/// Loads [`KeyMaterial`] from process environment variables.
///
/// The transient hex copy read from the environment is held in a
/// [`Zeroizing`] buffer so it is wiped on every exit path.
///
/// # Example
///
/// ```rust,ignore
/// use phivault_key_env::EnvKeySource;
///
/// let key = EnvKeySource::new().load()?;
/// ```
#[derive(Debug, Clone)]
pub struct EnvKeySource {
    key_var: String,
    version_var: String,
}

impl Default for EnvKeySource {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvKeySource {
    /// Creates a source reading the default variable names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            key_var: DEFAULT_KEY_VAR.to_string(),
            version_var: DEFAULT_VERSION_VAR.to_string(),
        }
    }

    /// Creates a source reading custom variable names.
    #[must_use]
    pub fn with_vars(key_var: impl Into<String>, version_var: impl Into<String>) -> Self {
        Self { key_var: key_var.into(), version_var: version_var.into() }
    }

    /// Reads and validates key material from the environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyNotConfigured` if the key variable is unset or
    /// empty, and propagates hex/length validation errors from
    /// [`KeyMaterial::load`]. Never substitutes a default key.
    pub fn load(&self) -> Result<KeyMaterial, Error> {
        let source_hex = std::env::var(&self.key_var)
            .ok()
            .filter(|v| !v.is_empty())
            .map(Zeroizing::new)
            .ok_or(Error::KeyNotConfigured)?;
        let version = std::env::var(&self.version_var).ok();

        let key = KeyMaterial::load(Some(&source_hex), version.as_deref())?;
        tracing::debug!(version = key.version(), "encryption key loaded from environment");
        Ok(key)
    }
}
