//! Bearer token extraction from the `Authorization` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;

use crate::handler::{Error, ErrorKind};
use crate::utility::tracing_targets::AUTHENTICATION as TRACING_TARGET;

/// Raw, unverified bearer token from `Authorization: Bearer <token>`.
///
/// Only extracts the token; verification happens in [`AuthState`]. A missing
/// or malformed header is rejected with the same `401` as a bad token.
///
/// [`AuthState`]: crate::extract::AuthState
#[must_use]
#[derive(Clone)]
pub struct AuthHeader(String);

impl AuthHeader {
    /// Returns the raw token.
    #[inline]
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthHeader(***)")
    }
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Sync + Send,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;

        match AuthBearerHeader::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => Ok(Self(bearer.token().to_owned())),
            Err(rejection) => {
                let context = match rejection.reason() {
                    TypedHeaderRejectionReason::Missing => "missing bearer authorization header",
                    _ => "malformed bearer authorization header",
                };

                tracing::debug!(target: TRACING_TARGET, reason = context, "Bearer token rejected");
                Err(ErrorKind::Unauthorized.with_context(context))
            }
        }
    }
}
