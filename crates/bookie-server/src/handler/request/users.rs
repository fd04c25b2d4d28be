//! User management request types.

use bookie_postgres::types::Role;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::service::store::{IdentityPatch, IdentityProfile};

/// Partial profile update. Omitted fields are left untouched.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIdentity {
    #[serde(default)]
    #[validate(email, length(max = 254))]
    pub email: Option<String>,

    #[serde(default, alias = "firstname")]
    #[validate(length(max = 64))]
    pub first_name: Option<String>,

    #[serde(default, alias = "lastname")]
    #[validate(length(max = 64))]
    pub last_name: Option<String>,

    #[serde(default, alias = "othernames")]
    #[validate(length(max = 128))]
    pub other_names: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub username: Option<String>,

    #[serde(default)]
    #[validate(length(max = 32))]
    pub phone: Option<String>,

    #[serde(default)]
    #[validate(length(max = 32))]
    pub date_of_birth: Option<String>,

    #[serde(default)]
    #[validate(length(max = 256))]
    pub address: Option<String>,

    #[serde(default)]
    #[validate(length(max = 128))]
    pub city: Option<String>,

    #[serde(default)]
    #[validate(length(max = 128))]
    pub country: Option<String>,
}

impl UpdateIdentity {
    pub fn into_patch(self) -> IdentityPatch {
        IdentityPatch {
            email: self.email,
            profile: IdentityProfile {
                first_name: self.first_name,
                last_name: self.last_name,
                other_names: self.other_names,
                username: self.username,
                phone: self.phone,
                date_of_birth: self.date_of_birth,
                address: self.address,
                city: self.city,
                country: self.country,
            },
        }
    }
}

/// Role change request.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateRole {
    pub role: Role,
}
