//! Relational identity store backed by `bookie-postgres`.

use async_trait::async_trait;
use bookie_postgres::model::{NewUser, UpdateUser, User};
use bookie_postgres::query::{Pagination, UserRepository};
use bookie_postgres::types::{ConstraintViolation, Role, UserConstraints};
use bookie_postgres::{PgClient, PgConn, PgError};
use uuid::Uuid;

use super::{Identity, IdentityPatch, IdentityStore, NewIdentity, Page, PageRequest};
use crate::service::auth::{AuthError, AuthResult};
use crate::utility::tracing_targets::IDENTITY_STORE as TRACING_TARGET;

/// Identity store backed by the pooled PostgreSQL client.
#[derive(Debug, Clone)]
pub struct PgIdentityStore {
    client: PgClient,
}

impl PgIdentityStore {
    /// Wraps an existing database client.
    pub fn new(client: PgClient) -> Self {
        Self { client }
    }

    async fn connection(&self) -> AuthResult<PgConn> {
        self.client.get_connection().await.map_err(map_pg_error)
    }
}

fn map_pg_error(err: PgError) -> AuthError {
    if err.is_unique_violation() {
        let field = match err.constraint_violation() {
            Some(ConstraintViolation::User(UserConstraints::UsernameUnique)) => "username",
            _ => "email",
        };
        tracing::debug!(target: TRACING_TARGET, field, "Unique constraint violated");
        return AuthError::AlreadyExists(field);
    }

    tracing::error!(target: TRACING_TARGET, error = %err, "Identity store operation failed");
    AuthError::store(err)
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at(),
            updated_at: user.updated_at(),
            first_name: user.first_name,
            last_name: user.last_name,
            other_names: user.other_names,
            username: user.username,
            email: user.email_address,
            phone: user.phone_number,
            date_of_birth: user.date_of_birth,
            address: user.address,
            city: user.city,
            country: user.country,
            role: user.role,
            password_hash: user.password_hash,
        }
    }
}

impl From<NewIdentity> for NewUser {
    fn from(new_identity: NewIdentity) -> Self {
        let profile = new_identity.profile;
        Self {
            id: Uuid::now_v7(),
            first_name: profile.first_name,
            last_name: profile.last_name,
            other_names: profile.other_names,
            username: profile.username,
            email_address: new_identity.email,
            phone_number: profile.phone,
            date_of_birth: profile.date_of_birth,
            address: profile.address,
            city: profile.city,
            country: profile.country,
            role: new_identity.role,
            password_hash: new_identity.password_hash,
        }
    }
}

impl From<IdentityPatch> for UpdateUser {
    fn from(patch: IdentityPatch) -> Self {
        let profile = patch.profile;
        Self {
            first_name: profile.first_name,
            last_name: profile.last_name,
            other_names: profile.other_names,
            username: profile.username,
            email_address: patch.email,
            phone_number: profile.phone,
            date_of_birth: profile.date_of_birth,
            address: profile.address,
            city: profile.city,
            country: profile.country,
            ..Default::default()
        }
    }
}

impl From<PageRequest> for Pagination {
    fn from(page: PageRequest) -> Self {
        Pagination::new(
            i64::from(page.limit),
            i64::try_from(page.offset).unwrap_or(i64::MAX),
        )
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<Identity>> {
        let mut conn = self.connection().await?;
        let user = conn.find_user_by_email(email).await.map_err(map_pg_error)?;
        Ok(user.map(Identity::from))
    }

    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Identity>> {
        let mut conn = self.connection().await?;
        let user = conn.find_user_by_id(id).await.map_err(map_pg_error)?;
        Ok(user.map(Identity::from))
    }

    async fn insert(&self, new_identity: NewIdentity) -> AuthResult<Identity> {
        let mut conn = self.connection().await?;
        let user = conn
            .create_user(NewUser::from(new_identity))
            .await
            .map_err(map_pg_error)?;
        Ok(Identity::from(user))
    }

    async fn update_role(&self, id: Uuid, role: Role) -> AuthResult<Option<Identity>> {
        let mut conn = self.connection().await?;
        let user = conn.update_user_role(id, role).await.map_err(map_pg_error)?;
        Ok(user.map(Identity::from))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        patch: IdentityPatch,
    ) -> AuthResult<Option<Identity>> {
        let mut conn = self.connection().await?;
        let user = conn
            .update_user(id, UpdateUser::from(patch))
            .await
            .map_err(map_pg_error)?;
        Ok(user.map(Identity::from))
    }

    async fn list(&self, page: PageRequest) -> AuthResult<Page<Identity>> {
        let mut conn = self.connection().await?;
        let users = conn
            .list_users(Pagination::from(page))
            .await
            .map_err(map_pg_error)?;
        let total = conn.count_users().await.map_err(map_pg_error)?;

        Ok(Page {
            items: users.into_iter().map(Identity::from).collect(),
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn delete(&self, id: Uuid) -> AuthResult<bool> {
        let mut conn = self.connection().await?;
        conn.delete_user(id).await.map_err(map_pg_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::store::IdentityProfile;

    #[test]
    fn non_unique_errors_are_unavailable() {
        let err = map_pg_error(PgError::Config("bad url".into()));
        assert!(matches!(err, AuthError::StoreUnavailable(_)));
    }

    #[test]
    fn patch_maps_only_provided_columns() {
        let patch = IdentityPatch {
            email: Some("new@example.com".into()),
            profile: IdentityProfile {
                city: Some(String::new()),
                ..Default::default()
            },
        };

        let update = UpdateUser::from(patch);
        assert_eq!(update.email_address.as_deref(), Some("new@example.com"));
        assert_eq!(update.city.as_deref(), Some(""));
        assert!(update.first_name.is_none());
        assert!(update.role.is_none());
        assert!(update.password_hash.is_none());
    }

    #[test]
    fn page_request_to_pagination() {
        let pagination = Pagination::from(PageRequest {
            limit: 20,
            offset: 40,
        });
        assert_eq!(pagination.limit, 20);
        assert_eq!(pagination.offset, 40);
        assert_eq!(pagination.page_number(), 3);
    }
}
