//! Application state and dependency injection.

pub mod auth;
mod config;
mod security;
pub mod store;

use std::sync::Arc;

pub use crate::service::auth::{
    AuthError, AuthResult, Authenticated, Session, SessionClaims, SessionService, TokenCodec,
};
pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder, StoreBackend};
pub use crate::service::security::{PasswordHasher, SessionKeys, SessionKeysConfig};
use crate::service::store::{IdentityEvents, IdentityStore};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    // External services:
    pub identity_store: Arc<dyn IdentityStore>,

    // Internal services:
    pub session_service: SessionService,
    pub identity_events: IdentityEvents,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to the identity store and loads the signing keys.
    pub async fn from_config(service_config: &ServiceConfig) -> Result<Self> {
        let identity_store = service_config.create_identity_store().await?;
        let session_keys = service_config.load_session_keys().await?;

        Ok(Self::new(
            identity_store,
            session_keys,
            service_config.default_role,
        ))
    }

    /// Assembles state from already constructed parts.
    pub fn new(
        identity_store: Arc<dyn IdentityStore>,
        session_keys: SessionKeys,
        default_role: bookie_postgres::types::Role,
    ) -> Self {
        let session_service = SessionService::new(
            PasswordHasher::new(),
            TokenCodec::new(session_keys),
            identity_store.clone(),
            default_role,
        );

        Self {
            identity_store,
            session_service,
            identity_events: IdentityEvents::new(),
        }
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// External services:
impl_di!(identity_store: Arc<dyn IdentityStore>);

// Internal services:
impl_di!(session_service: SessionService);
impl_di!(identity_events: IdentityEvents);
