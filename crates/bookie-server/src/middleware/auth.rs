//! Authentication and authorization middleware.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bookie_postgres::types::Role;

use crate::extract::AuthState;

/// Requires a valid bearer token to proceed with the request.
///
/// #### Notes
///
/// - [`AuthHeader`](crate::extract::AuthHeader) can't be extracted from requests without `Authorization` header.
/// - [`AuthState`] can't be extracted from requests without a *verified* token
///   whose subject still exists.
///
/// The resolved [`AuthState`] is cached in the request extensions, so
/// handlers extracting it again do not repeat the lookup.
///
/// #### Examples
///
/// ```rust,no_run
/// use axum::extract::Request;
/// use axum::middleware::{FromFnLayer, from_fn_with_state};
/// use bookie_server::extract::AuthState;
/// use bookie_server::middleware::require_authentication;
/// use bookie_server::service::{ServiceConfig, ServiceState};
///
/// # async fn example() -> anyhow::Result<()> {
/// let state = ServiceState::from_config(&ServiceConfig::default()).await?;
/// let _guard: FromFnLayer<_, _, (AuthState, Request)> =
///     from_fn_with_state(state, require_authentication);
/// # Ok(())
/// # }
/// ```
pub async fn require_authentication(_: AuthState, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// Requires the authenticated identity to hold an administrative role.
///
/// Responds with `403` for authenticated callers without the role; see
/// [`require_authentication`] for the `401` cases.
pub async fn require_admin(auth_state: AuthState, request: Request, next: Next) -> Response {
    if let Err(error) = auth_state.authorize(Role::ADMINISTRATORS) {
        return error.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::StatusCode;
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum_test::TestServer;
    use serde_json::Value;

    use super::*;
    use crate::handler::routes;
    use crate::handler::test::{bearer, create_test_server_with_state, signup_identity};

    #[tokio::test]
    async fn admin_guard_checks_current_role() -> anyhow::Result<()> {
        let (server, state) = create_test_server_with_state().await?;
        let token = signup_identity(&server, "a@b.com").await?;

        let admin_only = Router::new()
            .route("/admin", get(|| async { "ok" }))
            .route_layer(from_fn_with_state(state.clone(), require_admin));
        let app: Router = routes(state.clone())
            .merge(admin_only)
            .with_state(state.clone());
        let admin_server = TestServer::new(app)?;

        let (name, value) = bearer(&token)?;
        let denied = admin_server
            .get("/admin")
            .add_header(name.clone(), value.clone())
            .await;
        denied.assert_status(StatusCode::FORBIDDEN);

        let me: Value = admin_server
            .get("/me")
            .add_header(name.clone(), value.clone())
            .await
            .json();
        let id: uuid::Uuid = me["payload"]["id"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("missing id"))?
            .parse()?;
        state.identity_store.update_role(id, Role::Admin).await?;

        let allowed = admin_server.get("/admin").add_header(name, value).await;
        allowed.assert_status_ok();
        Ok(())
    }

    #[tokio::test]
    async fn admin_guard_requires_token() -> anyhow::Result<()> {
        let (_, state) = create_test_server_with_state().await?;

        let app: Router = Router::new()
            .route("/admin", get(|| async { "ok" }))
            .route_layer(from_fn_with_state(state.clone(), require_admin))
            .with_state(state);
        let server = TestServer::new(app)?;

        server
            .get("/admin")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }
}
