//! Secret hashing and verification using Argon2id.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};
use rand::Rng;

use crate::service::auth::{AuthError, AuthResult};
use crate::utility::tracing_targets::PASSWORD_HASHER as TRACING_TARGET;

/// Argon2id secret hashing and verification.
///
/// Hashes are PHC strings carrying the algorithm, parameters and a fresh
/// random salt, so hashing the same secret twice yields different strings.
/// Equality must be tested with [`PasswordHasher::verify_secret`].
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    dummy_hash: Option<Arc<str>>,
}

impl PasswordHasher {
    /// Creates a new hasher with default Argon2id parameters.
    pub fn new() -> Self {
        let mut this = Self {
            argon2: Argon2::default(),
            dummy_hash: None,
        };

        this.dummy_hash = this.hash_secret(&random_secret()).ok().map(Arc::from);
        this
    }

    /// Produces a salted one-way hash of the plaintext secret.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::HashingFailure`] if Argon2 rejects the input.
    pub fn hash_secret(&self, plaintext: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(target: TRACING_TARGET, error = %e, "Secret hashing failed");
                AuthError::HashingFailure(e.to_string().into())
            })?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext secret against a stored hash.
    ///
    /// Returns `Ok(false)` for a wrong secret.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ComparisonFailure`] only when the stored hash is
    /// malformed or verification itself fails.
    pub fn verify_secret(&self, stored_hash: &str, plaintext: &str) -> AuthResult<bool> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::error!(target: TRACING_TARGET, error = %e, "Stored hash is malformed");
            AuthError::ComparisonFailure(e.to_string().into())
        })?;

        match self
            .argon2
            .verify_password(plaintext.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(ArgonError::Password) => {
                tracing::debug!(target: TRACING_TARGET, "Secret mismatch");
                Ok(false)
            }
            Err(e) => {
                tracing::error!(target: TRACING_TARGET, error = %e, "Secret verification failed");
                Err(AuthError::ComparisonFailure(e.to_string().into()))
            }
        }
    }

    /// Runs a full verification against a throwaway hash and returns `false`.
    ///
    /// Used when the identity does not exist so that the response takes as
    /// long as a wrong-password response.
    pub fn verify_dummy_secret(&self, plaintext: &str) -> bool {
        match self.dummy_hash.as_deref() {
            Some(dummy_hash) => {
                let _ = self.verify_secret(dummy_hash, plaintext);
            }
            None => {
                if let Ok(dummy_hash) = self.hash_secret(&random_secret()) {
                    let _ = self.verify_secret(&dummy_hash, plaintext);
                }
            }
        }

        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn random_secret() -> String {
    let len = rand::random_range(16..32);
    rand::rng()
        .sample_iter(rand::distr::Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_secret("Secret123")?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_secret(&hash, "Secret123")?);
        assert!(!hasher.verify_secret(&hash, "wrong_password")?);
        Ok(())
    }

    #[test]
    fn hashes_are_salted() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let hash1 = hasher.hash_secret("pw1")?;
        let hash2 = hasher.hash_secret("pw1")?;

        assert_ne!(hash1, hash2);
        assert!(hasher.verify_secret(&hash1, "pw1")?);
        assert!(hasher.verify_secret(&hash2, "pw1")?);
        Ok(())
    }

    #[test]
    fn malformed_hash_is_comparison_failure() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify_secret("invalid_hash_format", "pw");
        assert!(matches!(result, Err(AuthError::ComparisonFailure(_))));
    }

    #[test]
    fn dummy_verification_never_succeeds() {
        let hasher = PasswordHasher::new();
        assert!(hasher.dummy_hash.is_some());
        assert!(!hasher.verify_dummy_secret("anything"));
        assert!(!hasher.verify_dummy_secret(""));
    }
}
