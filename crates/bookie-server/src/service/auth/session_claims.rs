//! Claims embedded in a signed session token.

use std::str::FromStr;

use bookie_postgres::types::Role;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::store::Identity;

/// Issuer tag written into every token.
pub const TOKEN_ISSUER: &str = "bookie";

/// Verified identity and role payload of a bearer token.
///
/// Every field is required on the wire; a token missing any of them is
/// rejected instead of being defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Issuer tag, always [`TOKEN_ISSUER`].
    #[serde(rename = "iss")]
    pub issuer: String,
    /// Principal identifier.
    #[serde(rename = "sub")]
    pub subject: Uuid,
    /// Display name at issuance time.
    pub name: String,
    /// Username at issuance time, empty if none was chosen.
    pub username: String,
    /// Email address at issuance time.
    pub email: String,
    /// Raw role string; see [`SessionClaims::role`].
    pub role: String,
    /// Issued at (unix seconds).
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Expires at (unix seconds).
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl SessionClaims {
    /// Builds unsigned claims for the identity.
    ///
    /// Timestamps are zero until the claims pass through [`TokenCodec::issue`].
    ///
    /// [`TokenCodec::issue`]: crate::service::TokenCodec::issue
    pub fn for_identity(identity: &Identity) -> Self {
        Self {
            issuer: TOKEN_ISSUER.to_owned(),
            subject: identity.id,
            name: identity.display_name(),
            username: identity.username.clone().unwrap_or_default(),
            email: identity.email.clone(),
            role: identity.role.to_string(),
            issued_at: 0,
            expires_at: 0,
        }
    }

    /// Returns the principal identifier.
    #[inline]
    pub fn principal_id(&self) -> Uuid {
        self.subject
    }

    /// Parses the role claim. Unknown role strings yield `None`.
    pub fn role(&self) -> Option<Role> {
        Role::from_str(&self.role).ok()
    }

    /// Replaces the role claim with the given role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role.to_string();
        self
    }

    /// Returns the issued-at time.
    pub fn issued_at(&self) -> Option<Timestamp> {
        Timestamp::from_second(self.issued_at).ok()
    }

    /// Returns the expiry time.
    pub fn expires_at(&self) -> Option<Timestamp> {
        Timestamp::from_second(self.expires_at).ok()
    }

    /// Returns whether the claims are expired at `now` (expiry is exclusive).
    #[inline]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now.as_second() >= self.expires_at
    }
}
