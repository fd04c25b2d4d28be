//! Identity management handlers.
//!
//! All routes require a bearer token. Reads are open to any authenticated
//! identity; writes require ownership of the record or an administrative
//! role, and role changes are reserved to administrators.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use bookie_postgres::types::Role;

use crate::extract::{AuthState, Json, Path, Query, ValidateJson};
use crate::handler::request::{IdentityPathParams, PaginationQuery, UpdateIdentity, UpdateRole};
use crate::handler::response::{Envelope, IdentitiesPage, IdentityResponse};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;
use crate::service::store::{Identity, IdentityEvent, IdentityEvents, IdentityStore};
use crate::utility::tracing_targets::HANDLER_USERS as TRACING_TARGET;

/// Looks up an identity, responding `404` when it does not exist.
async fn find_identity(identity_store: &dyn IdentityStore, id: uuid::Uuid) -> Result<Identity> {
    identity_store.find_by_id(id).await?.ok_or_else(|| {
        ErrorKind::NotFound
            .with_message("user not found")
            .with_context(format!("no identity with id {id}"))
    })
}

/// Returns the caller's own identity.
#[tracing::instrument(skip_all)]
async fn get_own_identity(auth_state: AuthState) -> Envelope<IdentityResponse> {
    let identity = auth_state.into_identity();
    Envelope::new(
        "user retrieved successfully",
        IdentityResponse::from_identity(identity),
    )
}

/// Lists identities page by page, oldest first.
#[tracing::instrument(skip_all)]
async fn list_identities(
    State(identity_store): State<Arc<dyn IdentityStore>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Envelope<IdentitiesPage>> {
    // Fetch the requested page; re-fetch the last page when the request
    // points past the end.
    let requested = pagination.page_request(u64::MAX);
    let mut page = identity_store.list(requested).await?;
    let clamped = pagination.page_request(page.total);
    if clamped != requested {
        page = identity_store.list(clamped).await?;
    }

    tracing::debug!(
        target: TRACING_TARGET,
        total = page.total,
        returned = page.items.len(),
        "listed identities"
    );

    let payload = IdentitiesPage {
        total_pages: pagination.total_pages(page.total),
        current_page: pagination.page(page.total),
        total: page.total,
        data: page
            .items
            .into_iter()
            .map(IdentityResponse::from_identity)
            .collect(),
    };

    Ok(Envelope::new("users retrieved successfully", payload))
}

/// Returns a single identity.
#[tracing::instrument(skip_all)]
async fn get_identity(
    State(identity_store): State<Arc<dyn IdentityStore>>,
    Path(path): Path<IdentityPathParams>,
) -> Result<Envelope<IdentityResponse>> {
    let identity = find_identity(identity_store.as_ref(), path.id).await?;
    Ok(Envelope::new(
        "user retrieved successfully",
        IdentityResponse::from_identity(identity),
    ))
}

/// Applies a partial profile update to the caller's own record, or to any
/// record for administrators.
#[tracing::instrument(skip_all)]
async fn update_identity(
    State(identity_store): State<Arc<dyn IdentityStore>>,
    auth_state: AuthState,
    Path(path): Path<IdentityPathParams>,
    ValidateJson(request): ValidateJson<UpdateIdentity>,
) -> Result<Envelope<IdentityResponse>> {
    auth_state.ensure_owner_or(path.id, Role::ADMINISTRATORS)?;

    let patch = request.into_patch();
    if patch.is_empty() {
        return Err(ErrorKind::BadRequest
            .with_message("no fields to update")
            .with_context("update request carried no fields"));
    }

    let identity = identity_store
        .update_profile(path.id, patch)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("user not found"))?;

    tracing::info!(
        target: TRACING_TARGET,
        principal_id = %auth_state.subject,
        identity_id = %identity.id,
        "identity updated"
    );

    Ok(Envelope::new(
        format!("user with id {} updated successfully", identity.id),
        IdentityResponse::from_identity(identity),
    ))
}

/// Changes the role of an identity.
///
/// Administrators may assign `user` and `admin`; only a superadmin may grant
/// `superadmin` or change the role of an existing superadmin.
#[tracing::instrument(skip_all)]
async fn update_identity_role(
    State(identity_store): State<Arc<dyn IdentityStore>>,
    auth_state: AuthState,
    Path(path): Path<IdentityPathParams>,
    Json(request): Json<UpdateRole>,
) -> Result<Envelope<IdentityResponse>> {
    auth_state.authorize(Role::ADMINISTRATORS)?;

    let target = find_identity(identity_store.as_ref(), path.id).await?;
    let caller_role = auth_state.role().unwrap_or_default();
    let outranks = caller_role.has_permission_level_of(request.role)
        && caller_role.has_permission_level_of(target.role);
    if !outranks {
        return Err(ErrorKind::Forbidden.with_message("insufficient role to change this role"));
    }

    let identity = identity_store
        .update_role(path.id, request.role)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("user not found"))?;

    tracing::info!(
        target: TRACING_TARGET,
        principal_id = %auth_state.subject,
        identity_id = %identity.id,
        previous_role = %target.role,
        role = %identity.role,
        "identity role changed"
    );

    Ok(Envelope::new(
        format!("role of user with id {} updated successfully", identity.id),
        IdentityResponse::from_identity(identity),
    ))
}

/// Deletes an identity and announces it to dependent resources.
#[tracing::instrument(skip_all)]
async fn delete_identity(
    State(identity_store): State<Arc<dyn IdentityStore>>,
    State(identity_events): State<IdentityEvents>,
    auth_state: AuthState,
    Path(path): Path<IdentityPathParams>,
) -> Result<Envelope<()>> {
    auth_state.ensure_owner_or(path.id, Role::ADMINISTRATORS)?;

    if !identity_store.delete(path.id).await? {
        return Err(ErrorKind::NotFound.with_message("user not found"));
    }

    identity_events.publish(IdentityEvent::Deleted { id: path.id });

    tracing::info!(
        target: TRACING_TARGET,
        principal_id = %auth_state.subject,
        identity_id = %path.id,
        "identity deleted"
    );

    Ok(Envelope::message_only(format!(
        "user with id {} deleted successfully",
        path.id
    )))
}

/// Returns a [`Router`] with all identity management routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/me", get(get_own_identity))
        .route("/users", get(list_identities))
        .route(
            "/users/{id}",
            get(get_identity)
                .patch(update_identity)
                .delete(delete_identity),
        )
        .route(
            "/users/{id}/role",
            axum::routing::patch(update_identity_role),
        )
}
