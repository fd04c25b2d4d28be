//! Authenticated request state.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use bookie_postgres::types::Role;
use derive_more::Deref;
use uuid::Uuid;

use super::AuthHeader;
use crate::handler::{Error, Result};
use crate::service::auth::{authorize, ensure_owner_or};
use crate::service::store::Identity;
use crate::service::{Authenticated, SessionClaims, SessionService};
use crate::utility::tracing_targets::AUTHENTICATION as TRACING_TARGET;

/// Verified claims of the caller, resolved against the identity store.
///
/// The role in the claims reflects the identity's current role, not the one
/// at issuance. The state is cached in the request extensions so repeated
/// extraction does not hit the store again.
#[derive(Debug, Clone, Deref)]
pub struct AuthState {
    #[deref]
    claims: SessionClaims,
    identity: Identity,
}

impl AuthState {
    /// Returns the verified claims.
    #[inline]
    pub fn claims(&self) -> &SessionClaims {
        &self.claims
    }

    /// Returns the caller's current identity.
    #[inline]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Consumes the state, returning the caller's identity.
    #[inline]
    pub fn into_identity(self) -> Identity {
        self.identity
    }

    /// Requires the caller to hold one of the roles; empty admits anyone.
    pub fn authorize(&self, roles: &[Role]) -> Result<()> {
        authorize(Some(&self.claims), roles).map_err(Error::from)
    }

    /// Requires the caller to own `owner_id` or hold one of the roles.
    pub fn ensure_owner_or(&self, owner_id: Uuid, roles: &[Role]) -> Result<()> {
        ensure_owner_or(Some(&self.claims), owner_id, roles).map_err(Error::from)
    }
}

impl From<Authenticated> for AuthState {
    fn from(authenticated: Authenticated) -> Self {
        Self {
            claims: authenticated.claims,
            identity: authenticated.identity,
        }
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Sync + Send,
    SessionService: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_state) = parts.extensions.get::<Self>() {
            return Ok(auth_state.clone());
        }

        let auth_header = AuthHeader::from_request_parts(parts, state).await?;
        let session_service = SessionService::from_ref(state);
        let auth_state = Self::from(session_service.authenticate(auth_header.token()).await?);

        tracing::debug!(
            target: TRACING_TARGET,
            principal_id = %auth_state.claims.subject,
            role = %auth_state.claims.role,
            "Request authenticated",
        );

        parts.extensions.insert(auth_state.clone());
        Ok(auth_state)
    }
}
