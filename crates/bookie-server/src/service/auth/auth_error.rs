use crate::BoxedError;

/// Result type for authentication and authorization operations.
pub type AuthResult<T, E = AuthError> = std::result::Result<T, E>;

/// Failure taxonomy of the authentication and authorization core.
///
/// Variants are deliberately coarse at the HTTP boundary: every token and
/// credential failure collapses into one generic `401`, see
/// [`AuthError::is_unauthenticated`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The bearer token was blank or whitespace only.
    #[error("authentication failed: empty token")]
    EmptyToken,

    /// The token could not be parsed as a well-formed signed structure.
    #[error("authentication failed: invalid token")]
    MalformedToken,

    /// The token signature does not verify against the server key.
    #[error("authentication failed: invalid token signature")]
    InvalidSignature,

    /// The current time is at or after the token's expiry.
    #[error("token has expired")]
    TokenExpired,

    /// Email unknown or password mismatch; never says which.
    #[error("authentication failed: invalid credentials")]
    InvalidCredentials,

    /// No valid identity is attached to the request.
    #[error("authentication required")]
    Unauthenticated,

    /// Valid identity lacking the required role or resource ownership.
    #[error("access denied: insufficient privileges")]
    Forbidden,

    /// Unique email or username collision.
    #[error("an identity with this {0} already exists")]
    AlreadyExists(&'static str),

    /// Signing a token failed.
    #[error("token signing failed")]
    SigningFailure(#[source] BoxedError),

    /// Hashing a secret failed.
    #[error("secret hashing failed")]
    HashingFailure(#[source] BoxedError),

    /// The stored hash is malformed or corrupt.
    #[error("secret comparison failed")]
    ComparisonFailure(#[source] BoxedError),

    /// The identity store could not complete the operation.
    #[error("identity store unavailable")]
    StoreUnavailable(#[source] BoxedError),
}

impl AuthError {
    /// Returns whether this error surfaces as the uniform `401` response.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::EmptyToken
                | Self::MalformedToken
                | Self::InvalidSignature
                | Self::TokenExpired
                | Self::InvalidCredentials
                | Self::Unauthenticated
        )
    }

    /// Returns whether this error is a server-side failure that must not leak detail.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::SigningFailure(_)
                | Self::HashingFailure(_)
                | Self::ComparisonFailure(_)
                | Self::StoreUnavailable(_)
        )
    }

    /// Wraps any error as [`AuthError::StoreUnavailable`].
    pub fn store(err: impl Into<BoxedError>) -> Self {
        Self::StoreUnavailable(err.into())
    }
}
