use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Success body shared by every endpoint: `{message, token, payload}`.
///
/// `token` is empty unless the endpoint issued a new session token.
#[must_use = "responses do nothing unless returned"]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    pub token: String,
    pub payload: Option<T>,
}

impl<T> Envelope<T> {
    /// Creates an envelope carrying a payload.
    pub fn new(message: impl Into<String>, payload: T) -> Self {
        Self {
            message: message.into(),
            token: String::new(),
            payload: Some(payload),
        }
    }

    /// Attaches a freshly issued token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }
}

impl Envelope<()> {
    /// Creates an envelope with a message and a `null` payload.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            token: String::new(),
            payload: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    #[inline]
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
