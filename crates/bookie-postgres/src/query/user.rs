//! User repository for managing stored identities.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use uuid::Uuid;

use super::Pagination;
use crate::model::{NewUser, UpdateUser, User};
use crate::types::Role;
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Repository for user database operations.
pub trait UserRepository {
    /// Inserts a new user.
    ///
    /// The email address is normalized to trimmed lowercase. Collisions on
    /// email or username surface as a unique violation, see
    /// [`PgError::is_unique_violation`].
    fn create_user(&mut self, new_user: NewUser) -> impl Future<Output = PgResult<User>> + Send;

    /// Finds a user by its unique identifier.
    fn find_user_by_id(
        &mut self,
        user_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Finds a user by email address. Comparison is case-insensitive.
    fn find_user_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Applies a partial update. Returns `None` if the user does not exist.
    fn update_user(
        &mut self,
        user_id: Uuid,
        updates: UpdateUser,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Replaces the role of a user. Returns `None` if the user does not exist.
    fn update_user_role(
        &mut self,
        user_id: Uuid,
        role: Role,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Permanently deletes a user. Returns whether a row was removed.
    fn delete_user(&mut self, user_id: Uuid) -> impl Future<Output = PgResult<bool>> + Send;

    /// Lists users ordered by creation time, oldest first.
    fn list_users(
        &mut self,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<User>>> + Send;

    /// Counts all users.
    fn count_users(&mut self) -> impl Future<Output = PgResult<i64>> + Send;
}

impl UserRepository for PgConnection {
    async fn create_user(&mut self, mut new_user: NewUser) -> PgResult<User> {
        use schema::users;

        new_user.email_address = new_user.email_address.trim().to_lowercase();
        if let Some(username) = new_user.username.as_mut() {
            *username = username.trim().to_owned();
        }

        let user = diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(target: TRACING_TARGET_QUERY, user_id = %user.id, "User created");
        Ok(user)
    }

    async fn find_user_by_id(&mut self, user_id: Uuid) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::id.eq(user_id))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_user_by_email(&mut self, email: &str) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        users::table
            .filter(dsl::email_address.eq(email.trim().to_lowercase()))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_user(&mut self, user_id: Uuid, mut updates: UpdateUser) -> PgResult<Option<User>> {
        use schema::users::{self, dsl};

        if let Some(email) = updates.email_address.as_mut() {
            *email = email.trim().to_lowercase();
        }
        if let Some(username) = updates.username.as_mut() {
            *username = username.trim().to_owned();
        }
        updates.updated_at = Some(jiff_diesel::Timestamp::from(Timestamp::now()));

        diesel::update(users::table.filter(dsl::id.eq(user_id)))
            .set(&updates)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_user_role(&mut self, user_id: Uuid, role: Role) -> PgResult<Option<User>> {
        self.update_user(
            user_id,
            UpdateUser {
                role: Some(role),
                ..Default::default()
            },
        )
        .await
    }

    async fn delete_user(&mut self, user_id: Uuid) -> PgResult<bool> {
        use schema::users::{self, dsl};

        let affected = diesel::delete(users::table.filter(dsl::id.eq(user_id)))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(affected > 0)
    }

    async fn list_users(&mut self, pagination: Pagination) -> PgResult<Vec<User>> {
        use schema::users::{self, dsl};

        users::table
            .order((dsl::created_at.asc(), dsl::id.asc()))
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(User::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn count_users(&mut self) -> PgResult<i64> {
        use schema::users;

        users::table
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)
    }
}
