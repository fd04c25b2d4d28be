//! Request tracing and request id middleware.

use axum::Router;
use axum::http::{HeaderName, header};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

/// Header carrying the per-request id.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Extension trait for `axum::`[`Router`] to apply observability middleware.
pub trait RouterObservabilityExt<S> {
    /// Layers [`SetRequestId`], [`SetSensitiveRequestHeaders`], [`Trace`]
    /// and [`PropagateRequestId`] middlewares.
    ///
    /// Every request gets a UUID `x-request-id` unless the client sent one,
    /// and the id is echoed on the response. `authorization` and `cookie`
    /// headers are marked sensitive so they are redacted from traces.
    ///
    /// [`SetRequestId`]: tower_http::request_id::SetRequestIdLayer
    /// [`SetSensitiveRequestHeaders`]: tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer
    /// [`Trace`]: tower_http::trace::TraceLayer
    /// [`PropagateRequestId`]: tower_http::request_id::PropagateRequestIdLayer
    fn with_observability(self) -> Self;
}

impl<S> RouterObservabilityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_observability(self) -> Self {
        let middlewares = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
            .layer(SetSensitiveRequestHeadersLayer::new([
                header::AUTHORIZATION,
                header::COOKIE,
            ]))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER));

        self.layer(middlewares)
    }
}
