//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Authentication and authorization guards
//! - CORS
//! - Observability (tracing, request ids, sensitive header masking)
//! - Recovery (panics, timeouts, middleware errors)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::Router;
//! use bookie_server::middleware::{
//!     CorsConfig, RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let app: Router = Router::new()
//!     .with_cors(&CorsConfig::default())
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod auth;
mod observability;
mod recovery;
mod security;

pub use crate::middleware::auth::{require_admin, require_authentication};
pub use crate::middleware::observability::{REQUEST_ID_HEADER, RouterObservabilityExt};
pub use crate::middleware::recovery::{RecoveryConfig, RouterRecoveryExt};
pub use crate::middleware::security::{CorsConfig, RouterSecurityExt};
