//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use bookie_server::handler::routes;
//! use bookie_server::service::{ServiceConfig, ServiceState};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServiceConfig::default();
//! let state = ServiceState::from_config(&config).await?;
//! let router: axum::Router = routes(state.clone()).with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod authentication;
pub mod error;
pub mod request;
pub mod response;
mod users;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::middleware::require_authentication;
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all private routes.
fn private_routes(state: ServiceState) -> Router<ServiceState> {
    let require_authentication = from_fn_with_state(state, require_authentication);

    Router::new()
        .merge(users::routes())
        .route_layer(require_authentication)
}

/// Returns a [`Router`] with all public routes.
fn public_routes() -> Router<ServiceState> {
    Router::new().merge(authentication::routes())
}

/// Returns a [`Router`] with all routes and a `404` fallback.
pub fn routes(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .merge(private_routes(state))
        .merge(public_routes())
        .fallback(handler)
}
