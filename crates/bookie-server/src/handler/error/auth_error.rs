//! Mapping of auth core failures onto HTTP errors.

use super::{Error, ErrorKind};
use crate::service::AuthError;
use crate::utility::tracing_targets::AUTHENTICATION as TRACING_TARGET;

impl From<AuthError> for Error<'static> {
    fn from(error: AuthError) -> Self {
        match error {
            e if e.is_unauthenticated() => {
                tracing::debug!(target: TRACING_TARGET, reason = %e, "Request not authenticated");
                ErrorKind::Unauthorized.with_context(e.to_string())
            }
            AuthError::Forbidden => ErrorKind::Forbidden.into_error(),
            e @ AuthError::AlreadyExists(_) => ErrorKind::Conflict.with_message(e.to_string()),
            AuthError::StoreUnavailable(source) => {
                tracing::error!(target: TRACING_TARGET, error = %source, "Identity store unavailable");
                ErrorKind::ServiceUnavailable.with_context(source.to_string())
            }
            e => {
                tracing::error!(target: TRACING_TARGET, error = %e, "Authentication internals failed");
                ErrorKind::InternalServerError.with_context(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_and_credential_failures_are_401() {
        for e in [
            AuthError::EmptyToken,
            AuthError::MalformedToken,
            AuthError::InvalidSignature,
            AuthError::TokenExpired,
            AuthError::InvalidCredentials,
            AuthError::Unauthenticated,
        ] {
            assert_eq!(Error::from(e).kind(), ErrorKind::Unauthorized);
        }
    }

    #[test]
    fn other_mappings() {
        assert_eq!(Error::from(AuthError::Forbidden).kind(), ErrorKind::Forbidden);

        let conflict = Error::from(AuthError::AlreadyExists("email"));
        assert_eq!(conflict.kind(), ErrorKind::Conflict);
        assert_eq!(
            conflict.message(),
            Some("an identity with this email already exists")
        );

        let unavailable = Error::from(AuthError::store("connection refused"));
        assert_eq!(unavailable.kind(), ErrorKind::ServiceUnavailable);

        let internal = Error::from(AuthError::HashingFailure("bad params".into()));
        assert_eq!(internal.kind(), ErrorKind::InternalServerError);
    }
}
