//! CORS (Cross-Origin Resource Sharing) middleware configuration.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
#[cfg(any(test, feature = "config"))]
use clap::Args;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

/// Origins allowed when none are configured.
const LOCALHOST_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:8080",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:8080",
];

/// CORS configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct CorsConfig {
    /// List of allowed CORS origins.
    ///
    /// If empty, defaults to localhost origins for development.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long = "cors-origins", env = "CORS_ORIGINS", value_delimiter = ',')
    )]
    pub allowed_origins: Vec<String>,

    /// Maximum age for CORS preflight requests in seconds.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "CORS_MAX_AGE", default_value = "3600")
    )]
    pub max_age_seconds: u64,

    /// Whether to allow credentials in CORS requests.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "CORS_ALLOW_CREDENTIALS", default_value = "false")
    )]
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_seconds: 3600,
            allow_credentials: false,
        }
    }
}

impl CorsConfig {
    /// Returns the CORS max age as a [`Duration`].
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }

    /// Converts configured origins to header values, skipping invalid ones.
    pub fn to_header_values(&self) -> Vec<HeaderValue> {
        if self.allowed_origins.is_empty() {
            return LOCALHOST_ORIGINS
                .iter()
                .map(|origin| HeaderValue::from_static(origin))
                .collect();
        }

        self.allowed_origins
            .iter()
            .filter_map(|origin| origin.trim().parse().ok())
            .collect()
    }

    /// Creates a CORS layer for the configured origins.
    pub fn into_layer(self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(self.to_header_values())
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .allow_credentials(self.allow_credentials)
            .max_age(self.max_age())
    }
}

/// Extension trait for `axum::`[`Router`] to apply CORS middleware.
pub trait RouterSecurityExt<S> {
    /// Layers [`CorsLayer`] built from the provided configuration.
    fn with_cors(self, config: &CorsConfig) -> Self;
}

impl<S> RouterSecurityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_cors(self, config: &CorsConfig) -> Self {
        self.layer(config.clone().into_layer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_origins_by_default() {
        let origins = CorsConfig::default().to_header_values();
        assert_eq!(origins.len(), LOCALHOST_ORIGINS.len());
    }

    #[test]
    fn custom_origins_skip_invalid() {
        let config = CorsConfig {
            allowed_origins: vec![
                "https://example.com".to_owned(),
                " https://app.example.com ".to_owned(),
                "bad\norigin".to_owned(),
            ],
            ..Default::default()
        };

        let origins = config.to_header_values();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[1], "https://app.example.com");
    }

    #[test]
    fn origins_flag_is_comma_delimited() -> anyhow::Result<()> {
        use clap::Parser;

        #[derive(Debug, Parser)]
        struct Cli {
            #[clap(flatten)]
            cors: CorsConfig,
        }

        let cli = Cli::try_parse_from([
            "bookie",
            "--cors-origins",
            "https://a.example,https://b.example",
        ])?;

        assert_eq!(
            cli.cors.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(cli.cors.max_age_seconds, 3600);
        Ok(())
    }

    #[test]
    fn layer_builds() {
        let _layer = CorsConfig::default().into_layer();
    }
}
