//! Authentication handlers for signup, login and logout.
//!
//! Every failed login surfaces as the same `401` whether the email is unknown
//! or the password is wrong. Logout is stateless: tokens stay valid until
//! they expire and the client is expected to discard them.

use axum::Router;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum_extra::headers::authorization::Basic;
use axum_extra::headers::{Authorization, HeaderMapExt};
use validator::Validate;

use crate::extract::{Json, ValidateJson};
use crate::handler::request::{Login, Signup};
use crate::handler::response::{Envelope, IdentityResponse};
use crate::handler::{ErrorKind, Result};
use crate::service::{Session, ServiceState, SessionService};
use crate::utility::tracing_targets::HANDLER_AUTHENTICATION as TRACING_TARGET;

/// Builds the success envelope shared by signup and login.
fn session_envelope(message: &str, session: Session) -> Envelope<IdentityResponse> {
    Envelope::new(message, IdentityResponse::from_identity(session.identity))
        .with_token(session.token)
}

/// Extracts credentials from an `Authorization: Basic` header.
fn basic_credentials(headers: &HeaderMap) -> Option<Login> {
    let Authorization(basic) = headers.typed_get::<Authorization<Basic>>()?;
    Some(Login {
        email: basic.username().to_owned(),
        password: basic.password().to_owned(),
    })
}

/// Registers a new identity and returns its first token.
#[tracing::instrument(skip_all)]
async fn signup(
    State(session_service): State<SessionService>,
    ValidateJson(request): ValidateJson<Signup>,
) -> Result<Envelope<IdentityResponse>> {
    tracing::trace!(target: TRACING_TARGET, "signup attempt");

    let (email, password, profile) = request.into_parts();
    let session = session_service.signup(&email, &password, profile).await?;

    tracing::info!(
        target: TRACING_TARGET,
        principal_id = %session.identity.id,
        role = %session.identity.role,
        "signup succeeded"
    );

    Ok(session_envelope("Signup successful", session))
}

/// Exchanges credentials for a fresh token.
///
/// Credentials come from the JSON body or, when no usable body is sent,
/// from an `Authorization: Basic` header.
#[tracing::instrument(skip_all)]
async fn login(
    State(session_service): State<SessionService>,
    headers: HeaderMap,
    request: Option<Json<Login>>,
) -> Result<Envelope<IdentityResponse>> {
    let request = match request {
        Some(Json(request)) => {
            request.validate()?;
            request
        }
        None => basic_credentials(&headers).ok_or_else(|| {
            ErrorKind::BadRequest
                .with_message("missing login credentials")
                .with_context("neither a JSON body nor basic credentials were provided")
        })?,
    };

    tracing::trace!(target: TRACING_TARGET, "login attempt");

    let session = session_service
        .login(&request.email, &request.password)
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        principal_id = %session.identity.id,
        "login succeeded"
    );

    Ok(session_envelope("Login successful", session))
}

/// Acknowledges a logout; the client discards its token.
#[tracing::instrument(skip_all)]
async fn logout(State(session_service): State<SessionService>) -> Envelope<()> {
    session_service.logout();
    Envelope::message_only("Logout successful")
}

/// Returns a [`Router`] with all public authentication routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
}
