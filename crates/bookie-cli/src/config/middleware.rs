//! Middleware configuration for the HTTP server.
//!
//! # Example
//!
//! ```bash
//! # Configure CORS origins and request timeout
//! bookie --cors-origins "https://example.com" --request-timeout 60
//! ```

use bookie_server::middleware::{CorsConfig, RecoveryConfig};
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Middleware configuration combining CORS and recovery settings.
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// CORS (Cross-Origin Resource Sharing) configuration.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// Recovery middleware configuration.
    ///
    /// Controls request timeout and panic recovery behavior.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            origins = ?self.cors.allowed_origins,
            credentials = self.cors.allow_credentials,
            max_age_secs = self.cors.max_age_seconds,
            "CORS configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.recovery.request_timeout,
            "Recovery configuration"
        );
    }
}
