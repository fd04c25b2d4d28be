//! Signing secret management for session tokens.
//!
//! Tokens are signed with HS256, so a single shared secret both signs and
//! verifies. The secret is loaded once at startup and never changes at runtime.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use jsonwebtoken::{DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};

use crate::utility::tracing_targets::SESSION_KEYS as TRACING_TARGET;
use crate::{Error, Result};

/// Minimum accepted secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Signing secret source configuration.
///
/// Exactly one of the inline secret or the secret file is used; the inline
/// secret wins when both are set.
#[derive(Clone, Default, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct SessionKeysConfig {
    /// Inline HMAC secret used to sign session tokens.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long = "auth-secret", env = "AUTH_SECRET", hide_env_values = true)
    )]
    #[serde(skip_serializing, default)]
    pub auth_secret: Option<String>,

    /// File containing the HMAC secret used to sign session tokens.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long = "auth-secret-file", env = "AUTH_SECRET_FILE")
    )]
    #[serde(default)]
    pub auth_secret_file: Option<PathBuf>,
}

impl SessionKeysConfig {
    /// Creates a configuration with an inline secret.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            auth_secret: Some(secret.into()),
            auth_secret_file: None,
        }
    }

    /// Creates a configuration reading the secret from a file.
    pub fn with_secret_file(path: impl AsRef<Path>) -> Self {
        Self {
            auth_secret: None,
            auth_secret_file: Some(path.as_ref().to_path_buf()),
        }
    }
}

impl fmt::Debug for SessionKeysConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeysConfig")
            .field("auth_secret", &self.auth_secret.as_ref().map(|_| "***"))
            .field("auth_secret_file", &self.auth_secret_file)
            .finish()
    }
}

/// Key material used to sign and verify session tokens.
///
/// Cheap to clone; clones share the same keys.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
}

impl SessionKeys {
    /// Loads the signing secret described by the configuration.
    pub async fn from_config(config: &SessionKeysConfig) -> Result<Self> {
        if let Some(secret) = config.auth_secret.as_deref() {
            tracing::debug!(target: TRACING_TARGET, "Using inline signing secret");
            return Self::from_secret(secret.as_bytes());
        }

        let Some(path) = config.auth_secret_file.as_deref() else {
            return Err(Error::config(
                "either an auth secret or an auth secret file must be configured",
            ));
        };

        let secret = Self::load_secret_file(path).await?;
        Self::from_secret(&secret)
    }

    /// Creates keys from raw secret bytes.
    ///
    /// # Errors
    ///
    /// Fails if the secret is shorter than [`MIN_SECRET_LEN`] bytes.
    pub fn from_secret(secret: impl AsRef<[u8]>) -> Result<Self> {
        let secret = secret.as_ref();
        if secret.len() < MIN_SECRET_LEN {
            return Err(Error::auth(format!(
                "signing secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }

        let inner = SessionKeysInner {
            decoding_key: DecodingKey::from_secret(secret),
            encoding_key: EncodingKey::from_secret(secret),
        };

        tracing::info!(target: TRACING_TARGET, "Session signing keys loaded");
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Returns the key used to verify tokens.
    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    /// Returns the key used to sign tokens.
    #[inline]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }

    async fn load_secret_file(path: &Path) -> Result<Vec<u8>> {
        tracing::debug!(
            target: TRACING_TARGET,
            path = %path.display(),
            "Loading signing secret from file",
        );

        let mut secret = tokio::fs::read(path).await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                path = %path.display(),
                error = %e,
                "Failed to read signing secret file",
            );
            Error::file_system("failed to read signing secret file").with_source(e)
        })?;

        // Editors and `echo` leave a trailing newline behind.
        while secret.last().is_some_and(u8::is_ascii_whitespace) {
            secret.pop();
        }

        Ok(secret)
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[tokio::test]
    async fn load_inline_secret() -> anyhow::Result<()> {
        let config = SessionKeysConfig::with_secret(TEST_SECRET);
        SessionKeys::from_config(&config).await?;
        Ok(())
    }

    #[tokio::test]
    async fn load_secret_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("secret");
        fs::write(&path, format!("{TEST_SECRET}\n"))?;

        let config = SessionKeysConfig::with_secret_file(&path);
        SessionKeys::from_config(&config).await?;
        Ok(())
    }

    #[tokio::test]
    async fn reject_short_secret() {
        let config = SessionKeysConfig::with_secret("too-short");
        let result = SessionKeys::from_config(&config).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn reject_missing_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let config = SessionKeysConfig::with_secret_file(temp_dir.path().join("missing"));
        let result = SessionKeys::from_config(&config).await;
        assert!(matches!(result, Err(e) if e.kind() == crate::ErrorKind::FileSystem));
        Ok(())
    }

    #[tokio::test]
    async fn reject_missing_config() {
        let result = SessionKeys::from_config(&SessionKeysConfig::default()).await;
        assert!(matches!(result, Err(e) if e.kind() == crate::ErrorKind::Config));
    }

    #[test]
    fn debug_hides_secret() {
        let config = SessionKeysConfig::with_secret(TEST_SECRET);
        assert!(!format!("{config:?}").contains(TEST_SECRET));
    }
}
