//! HTTP error handling with builder pattern for dynamic error responses.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::handler::response::ErrorResponse;

/// The error type for HTTP handlers in the server.
///
/// Context is for logs only and never reaches the client. Kinds that must
/// not leak detail ([`ErrorKind::is_sanitized`]) ignore custom messages.
#[derive(Clone)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error<'a> {
    kind: ErrorKind,
    context: Option<Cow<'a, str>>,
    message: Option<Cow<'a, str>>,
    payload: Option<serde_json::Value>,
}

impl Error<'static> {
    /// Creates a new [`Error`] with the specified kind.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
            message: None,
            payload: None,
        }
    }
}

impl<'a> Error<'a> {
    /// Attaches internal context, logged but not serialized.
    #[inline]
    pub fn with_context(self, context: impl Into<Cow<'a, str>>) -> Self {
        Self {
            context: Some(context.into()),
            ..self
        }
    }

    /// Sets a custom user-facing message for the error.
    #[inline]
    pub fn with_message(self, message: impl Into<Cow<'a, str>>) -> Self {
        Self {
            message: Some(message.into()),
            ..self
        }
    }

    /// Attaches structured detail to the response payload.
    #[inline]
    pub fn with_payload(self, payload: serde_json::Value) -> Self {
        Self {
            payload: Some(payload),
            ..self
        }
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the context if present.
    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Returns the custom message if present.
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the payload if present.
    #[inline]
    pub fn payload(&self) -> Option<&serde_json::Value> {
        self.payload.as_ref()
    }

    /// Converts this error into a static version by cloning all borrowed data.
    pub fn into_static(self) -> Error<'static> {
        Error {
            kind: self.kind,
            context: self.context.map(|c| Cow::Owned(c.into_owned())),
            message: self.message.map(|m| Cow::Owned(m.into_owned())),
            payload: self.payload,
        }
    }
}

impl Default for Error<'static> {
    #[inline]
    fn default() -> Self {
        Self::new(ErrorKind::default())
    }
}

impl fmt::Debug for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.kind.response();

        let mut debug_struct = f.debug_struct("Error");
        debug_struct
            .field("kind", &self.kind)
            .field("status", &response.status)
            .field("message", &response.message);

        if let Some(ref context) = self.context {
            debug_struct.field("context", context);
        }

        if let Some(ref message) = self.message {
            debug_struct.field("custom_message", message);
        }

        debug_struct.finish()
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.kind.response();
        let message = self.message.as_deref().unwrap_or(response.message.as_ref());

        write!(f, "{} ({}): {}", response.name, response.status, message)?;

        if let Some(ref context) = self.context {
            write!(f, " - {}", context)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        let mut response = self.kind.response();

        if let Some(message) = self.message
            && !self.kind.is_sanitized()
        {
            response = response.with_message(message.into_owned());
        }

        if let Some(payload) = self.payload {
            response = response.with_payload(payload);
        }

        response.into_response()
    }
}

impl From<ErrorKind> for Error<'static> {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// A specialized [`Result`] type for HTTP operations.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Enumeration of all possible HTTP error kinds.
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // 4xx Client Errors
    /// 400 Bad Request - Invalid request data
    BadRequest,
    /// 401 Unauthorized - Any authentication failure
    Unauthorized,
    /// 403 Forbidden - Access denied
    Forbidden,
    /// 404 Not Found - Resource not found
    NotFound,
    /// 409 Conflict - Conflicting resource state
    Conflict,
    /// 408 Request Timeout - Handler exceeded its deadline
    RequestTimeout,

    // 5xx Server Errors
    /// 500 Internal Server Error - Unexpected server error
    #[default]
    InternalServerError,
    /// 503 Service Unavailable - A dependency is down
    ServiceUnavailable,
}

impl ErrorKind {
    /// Converts this error kind into a full [`Error`].
    #[inline]
    pub fn into_error(self) -> Error<'static> {
        Error::new(self)
    }

    /// Creates an [`Error`] with the specified context.
    #[inline]
    pub fn with_context<'a>(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_context(context)
    }

    /// Creates an [`Error`] with the specified message.
    #[inline]
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_message(message)
    }

    /// Returns whether responses of this kind always use the fixed message.
    ///
    /// Authentication failures must look identical whatever the cause, and
    /// server failures must not leak internals.
    #[inline]
    pub fn is_sanitized(self) -> bool {
        matches!(
            self,
            Self::Unauthorized | Self::InternalServerError | Self::ServiceUnavailable
        )
    }

    /// Returns the HTTP status code for this error kind.
    #[inline]
    pub fn status_code(self) -> StatusCode {
        self.response().status
    }

    /// Returns the default response for this error kind.
    #[inline]
    pub fn response(self) -> ErrorResponse<'static> {
        match self {
            Self::BadRequest => ErrorResponse::BAD_REQUEST,
            Self::Unauthorized => ErrorResponse::UNAUTHORIZED,
            Self::Forbidden => ErrorResponse::FORBIDDEN,
            Self::NotFound => ErrorResponse::NOT_FOUND,
            Self::Conflict => ErrorResponse::CONFLICT,
            Self::RequestTimeout => ErrorResponse::REQUEST_TIMEOUT,
            Self::InternalServerError => ErrorResponse::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => ErrorResponse::SERVICE_UNAVAILABLE,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.response().name.as_ref())
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        self.response().into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_json(error: Error<'_>) -> anyhow::Result<(StatusCode, serde_json::Value)> {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, serde_json::from_slice(&bytes)?))
    }

    #[test]
    fn default_http_error() {
        let error = Error::default();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(error.kind().status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_builder_chaining() {
        let error = ErrorKind::NotFound
            .with_message("identity not found")
            .with_context("id: 123");

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), Some("identity not found"));
        assert_eq!(error.context(), Some("id: 123"));
    }

    #[tokio::test]
    async fn context_is_not_serialized() -> anyhow::Result<()> {
        let error = ErrorKind::NotFound
            .with_message("identity not found")
            .with_context("select failed on replica 2");

        let (status, body) = body_json(error).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "identity not found");
        assert_eq!(body["code"], 404);
        assert_eq!(body["token"], "");
        assert!(!body.to_string().contains("replica"));
        Ok(())
    }

    #[tokio::test]
    async fn sanitized_kinds_ignore_custom_messages() -> anyhow::Result<()> {
        let error = ErrorKind::Unauthorized.with_message("token has expired");
        let (status, body) = body_json(error).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "authentication failed: invalid credentials");

        let error = ErrorKind::InternalServerError.with_message("argon2: bad params");
        let (_, body) = body_json(error).await?;
        assert!(!body.to_string().contains("argon2"));
        Ok(())
    }

    #[test]
    fn std_fmt_display() {
        let error = ErrorKind::Conflict
            .with_message("email taken")
            .with_context("users_email_address_unique_idx");

        let display = format!("{}", error);
        assert!(display.contains("conflict"));
        assert!(display.contains("409"));
        assert!(display.contains("email taken"));
    }

    #[test]
    fn error_into_static() {
        let message = String::from("Test message");
        let error = ErrorKind::BadRequest.with_message(message.as_str()).into_static();
        assert_eq!(error.message(), Some("Test message"));
    }

    #[test]
    fn all_error_kinds_have_responses() {
        let kinds = [
            ErrorKind::BadRequest,
            ErrorKind::Unauthorized,
            ErrorKind::Forbidden,
            ErrorKind::NotFound,
            ErrorKind::Conflict,
            ErrorKind::RequestTimeout,
            ErrorKind::InternalServerError,
            ErrorKind::ServiceUnavailable,
        ];

        for kind in kinds {
            let response = kind.response();
            assert!(!response.name.is_empty());
            assert!(response.status.as_u16() >= 400);
            assert_eq!(response.code, response.status.as_u16());
        }
    }
}
