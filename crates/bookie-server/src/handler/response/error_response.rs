use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Error body in the common response envelope.
///
/// Serializes as `{message, token, payload, code}`; `token` is always empty.
/// The name and internal context never reach the client.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse<'a> {
    /// The error name/type identifier, used for logging only.
    #[serde(skip)]
    pub name: Cow<'a, str>,
    /// User-friendly error message safe for client display.
    pub message: Cow<'a, str>,
    /// Always empty on errors.
    pub token: Cow<'a, str>,
    /// Structured detail, only set for validation failures.
    pub payload: Option<serde_json::Value>,
    /// Numeric HTTP status.
    pub code: u16,
    /// HTTP status code (not serialized in JSON).
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new(
        "bad_request",
        "the request could not be processed due to invalid data",
        StatusCode::BAD_REQUEST,
    );
    pub const UNAUTHORIZED: Self = Self::new(
        "unauthorized",
        "authentication failed: invalid credentials",
        StatusCode::UNAUTHORIZED,
    );
    pub const FORBIDDEN: Self = Self::new(
        "forbidden",
        "you do not have permission to access this resource",
        StatusCode::FORBIDDEN,
    );
    pub const NOT_FOUND: Self = Self::new(
        "not_found",
        "the requested resource was not found",
        StatusCode::NOT_FOUND,
    );
    pub const CONFLICT: Self = Self::new(
        "conflict",
        "the request conflicts with the current state of the resource",
        StatusCode::CONFLICT,
    );
    pub const REQUEST_TIMEOUT: Self = Self::new(
        "request_timeout",
        "the request took too long to process",
        StatusCode::REQUEST_TIMEOUT,
    );

    // 5xx Server Errors
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "an internal server error occurred, please try again later",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const SERVICE_UNAVAILABLE: Self = Self::new(
        "service_unavailable",
        "the service is temporarily unavailable, please try again later",
        StatusCode::SERVICE_UNAVAILABLE,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            token: Cow::Borrowed(""),
            payload: None,
            code: status.as_u16(),
            status,
        }
    }

    /// Replaces the default message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches structured detail.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    #[inline]
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_envelope_shape() -> anyhow::Result<()> {
        let value = serde_json::to_value(ErrorResponse::UNAUTHORIZED)?;

        assert_eq!(
            value,
            serde_json::json!({
                "message": "authentication failed: invalid credentials",
                "token": "",
                "payload": null,
                "code": 401,
            })
        );
        Ok(())
    }

    #[test]
    fn message_replaces_default() {
        let response = ErrorResponse::CONFLICT.with_message("an identity with this email already exists");
        assert_eq!(response.message, "an identity with this email already exists");
        assert_eq!(response.code, 409);
    }

    #[test]
    fn payload_is_serialized() -> anyhow::Result<()> {
        let response = ErrorResponse::BAD_REQUEST
            .with_payload(serde_json::json!({ "email": ["must be a valid email address"] }));

        let value = serde_json::to_value(&response)?;
        assert_eq!(value["payload"]["email"][0], "must be a valid email address");
        assert!(value.get("name").is_none());
        assert!(value.get("status").is_none());
        Ok(())
    }
}
