//! User model for PostgreSQL database operations.
//!
//! ## Models
//!
//! - [`User`] - Stored identity including the password hash and role
//! - [`NewUser`] - Data structure for creating new users
//! - [`UpdateUser`] - Partial update where `None` leaves a column untouched

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::users;
use crate::types::Role;

/// Stored identity representing a user in the system.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    /// Unique, immutable user identifier.
    pub id: Uuid,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Middle or other names.
    pub other_names: Option<String>,
    /// Unique handle, if chosen.
    pub username: Option<String>,
    /// Normalized (lowercase) email address used for login.
    pub email_address: String,
    /// Contact phone number.
    pub phone_number: Option<String>,
    /// Date of birth as provided by the user.
    pub date_of_birth: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City of residence.
    pub city: Option<String>,
    /// Country of residence.
    pub country: Option<String>,
    /// Assigned access role.
    pub role: Role,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Timestamp when the user was created.
    pub created_at: Timestamp,
    /// Timestamp when the user was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new user.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub other_names: Option<String>,
    pub username: Option<String>,
    pub email_address: String,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub role: Role,
    pub password_hash: String,
}

/// Data for updating a user.
///
/// Every field is optional; `None` leaves the column unchanged while
/// `Some(String::new())` stores an empty string.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub other_names: Option<String>,
    pub username: Option<String>,
    pub email_address: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub role: Option<Role>,
    pub password_hash: Option<String>,
    pub updated_at: Option<Timestamp>,
}

impl User {
    /// Returns the display name assembled from the name parts.
    ///
    /// Falls back to the username, then to the email address.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [&self.first_name, &self.other_names, &self.last_name]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if !parts.is_empty() {
            return parts.join(" ");
        }

        self.username
            .clone()
            .unwrap_or_else(|| self.email_address.clone())
    }

    /// Returns whether the user has administrative privileges.
    #[inline]
    pub fn is_administrator(&self) -> bool {
        self.role.is_administrator()
    }

    /// Returns the creation time as a [`jiff::Timestamp`].
    #[inline]
    pub fn created_at(&self) -> jiff::Timestamp {
        self.created_at.into()
    }

    /// Returns the last update time as a [`jiff::Timestamp`].
    #[inline]
    pub fn updated_at(&self) -> jiff::Timestamp {
        self.updated_at.into()
    }
}

impl UpdateUser {
    /// Returns whether this update would change no profile columns.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.other_names.is_none()
            && self.username.is_none()
            && self.email_address.is_none()
            && self.phone_number.is_none()
            && self.date_of_birth.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.country.is_none()
            && self.role.is_none()
            && self.password_hash.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = Timestamp::from(jiff::Timestamp::now());
        User {
            id: Uuid::now_v7(),
            first_name: None,
            last_name: None,
            other_names: None,
            username: None,
            email_address: "a@b.com".into(),
            phone_number: None,
            date_of_birth: None,
            address: None,
            city: None,
            country: None,
            role: Role::User,
            password_hash: "$argon2id$".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn display_name_joins_name_parts() {
        let mut user = user();
        user.first_name = Some("Ada".into());
        user.other_names = Some(" ".into());
        user.last_name = Some("Lovelace".into());
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn display_name_falls_back() {
        let mut user = user();
        assert_eq!(user.display_name(), "a@b.com");
        user.username = Some("ada".into());
        assert_eq!(user.display_name(), "ada");
    }

    #[test]
    fn empty_update() {
        assert!(UpdateUser::default().is_empty());
        let update = UpdateUser {
            city: Some(String::new()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
