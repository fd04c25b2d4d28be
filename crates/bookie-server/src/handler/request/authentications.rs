//! Authentication request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::service::store::IdentityProfile;

/// Request payload for login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Login {
    /// Email address of the identity.
    #[validate(length(min = 1, max = 254))]
    pub email: String,

    /// Password of the identity.
    #[validate(length(min = 1, max = 1000))]
    pub password: String,
}

/// Request payload for signup.
///
/// Only the email and password are required; every profile field is optional.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Signup {
    #[validate(email, length(max = 254))]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

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

impl Signup {
    /// Splits off the optional profile fields.
    pub fn into_parts(self) -> (String, String, IdentityProfile) {
        let profile = IdentityProfile {
            first_name: self.first_name,
            last_name: self.last_name,
            other_names: self.other_names,
            username: self.username,
            phone: self.phone,
            date_of_birth: self.date_of_birth,
            address: self.address,
            city: self.city,
            country: self.country,
        };

        (self.email, self.password, profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_signup_is_valid() -> anyhow::Result<()> {
        let signup: Signup =
            serde_json::from_str(r#"{"email":"a@b.com","password":"Secret123"}"#)?;
        assert!(signup.validate().is_ok());

        let (email, _, profile) = signup.into_parts();
        assert_eq!(email, "a@b.com");
        assert_eq!(profile, IdentityProfile::default());
        Ok(())
    }

    #[test]
    fn signup_rejects_bad_email_and_short_password() -> anyhow::Result<()> {
        let signup: Signup = serde_json::from_str(r#"{"email":"nope","password":"short"}"#)?;
        let errors = signup.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        Ok(())
    }

    #[test]
    fn signup_accepts_lowercase_aliases() -> anyhow::Result<()> {
        let signup: Signup = serde_json::from_str(
            r#"{"email":"a@b.com","password":"Secret123","firstname":"Ada","dateOfBirth":"1815-12-10"}"#,
        )?;
        assert_eq!(signup.first_name.as_deref(), Some("Ada"));
        assert_eq!(signup.date_of_birth.as_deref(), Some("1815-12-10"));
        Ok(())
    }
}
