//! Identity response types.

use bookie_postgres::types::Role;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::store::Identity;

/// Public projection of an identity; never carries the password hash.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    pub id: Uuid,
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub other_names: Option<String>,
    pub username: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub role: Role,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl IdentityResponse {
    pub fn from_identity(identity: Identity) -> Self {
        Self {
            name: identity.display_name(),
            id: identity.id,
            first_name: identity.first_name,
            last_name: identity.last_name,
            other_names: identity.other_names,
            username: identity.username,
            email: identity.email,
            phone: identity.phone,
            date_of_birth: identity.date_of_birth,
            address: identity.address,
            city: identity.city,
            country: identity.country,
            role: identity.role,
            created_at: identity.created_at,
            updated_at: identity.updated_at,
        }
    }
}

/// One page of identities.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitiesPage {
    pub data: Vec<IdentityResponse>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_omits_password_hash() -> anyhow::Result<()> {
        let now = Timestamp::now();
        let identity = Identity {
            id: Uuid::now_v7(),
            first_name: Some("Ada".into()),
            last_name: None,
            other_names: None,
            username: None,
            email: "ada@example.com".into(),
            phone: None,
            date_of_birth: None,
            address: None,
            city: None,
            country: None,
            role: Role::User,
            password_hash: "$argon2id$secret".into(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string(&IdentityResponse::from_identity(identity))?;
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
        assert!(json.contains("\"firstName\":\"Ada\""));
        assert!(json.contains("\"role\":\"user\""));
        Ok(())
    }
}
