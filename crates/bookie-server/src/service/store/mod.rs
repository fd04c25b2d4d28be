//! Identity persistence boundary.
//!
//! The auth core never talks to a database directly; it goes through
//! [`IdentityStore`]. Two implementations are provided: [`PgIdentityStore`]
//! for production and [`MemoryIdentityStore`] for tests and local runs.

mod events;
mod memory;
mod postgres;

use async_trait::async_trait;
use bookie_postgres::types::Role;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use self::events::{IdentityEvent, IdentityEvents};
pub use self::memory::MemoryIdentityStore;
pub use self::postgres::PgIdentityStore;
use crate::service::auth::AuthResult;

/// Stored identity, including the password hash.
///
/// Never serialized to clients directly; handlers project it into a public
/// response type first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub other_names: Option<String>,
    pub username: Option<String>,
    /// Trimmed, lowercased email address.
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub role: Role,
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Identity {
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
            .filter(|username| !username.is_empty())
            .unwrap_or_else(|| self.email.clone())
    }
}

/// Profile fields shared by creation and partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub other_names: Option<String>,
    pub username: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Data required to create an identity.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub profile: IdentityProfile,
}

/// Partial update of an identity's profile.
///
/// `None` leaves a field untouched; `Some("")` stores an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityPatch {
    pub email: Option<String>,
    pub profile: IdentityProfile,
}

impl IdentityPatch {
    /// Returns whether the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        let profile = &self.profile;
        self.email.is_none()
            && profile.first_name.is_none()
            && profile.last_name.is_none()
            && profile.other_names.is_none()
            && profile.username.is_none()
            && profile.phone.is_none()
            && profile.date_of_birth.is_none()
            && profile.address.is_none()
            && profile.city.is_none()
            && profile.country.is_none()
    }
}

/// Bounds of a listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum number of items to return.
    pub limit: u32,
    /// Number of items to skip.
    pub offset: u64,
}

/// One page of a listing plus the total number of items.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Persistence contract for identities.
///
/// Collisions on email or username are reported as
/// [`AuthError::AlreadyExists`]; every other failure is
/// [`AuthError::StoreUnavailable`].
///
/// [`AuthError::AlreadyExists`]: crate::service::AuthError::AlreadyExists
/// [`AuthError::StoreUnavailable`]: crate::service::AuthError::StoreUnavailable
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Looks up an identity by email, case-insensitively.
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<Identity>>;

    /// Looks up an identity by id.
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<Identity>>;

    /// Persists a new identity.
    async fn insert(&self, new_identity: NewIdentity) -> AuthResult<Identity>;

    /// Replaces the role of an identity.
    async fn update_role(&self, id: Uuid, role: Role) -> AuthResult<Option<Identity>>;

    /// Applies a partial profile update.
    async fn update_profile(&self, id: Uuid, patch: IdentityPatch)
    -> AuthResult<Option<Identity>>;

    /// Lists identities ordered by creation time.
    async fn list(&self, page: PageRequest) -> AuthResult<Page<Identity>>;

    /// Deletes an identity, returning whether it existed.
    async fn delete(&self, id: Uuid) -> AuthResult<bool>;
}

/// Normalizes an email address for storage and lookup.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
