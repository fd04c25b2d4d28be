//! Database constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Users table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum UserConstraints {
    // User validation constraints
    #[strum(serialize = "users_email_address_not_empty")]
    EmailAddressNotEmpty,

    // User unique constraints
    #[strum(serialize = "users_email_address_unique_idx")]
    EmailAddressUnique,
    #[strum(serialize = "users_username_unique_idx")]
    UsernameUnique,
    #[strum(serialize = "users_pkey")]
    PrimaryKey,
}

impl UserConstraints {
    /// Creates a new [`UserConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            UserConstraints::EmailAddressNotEmpty => ConstraintCategory::Validation,
            UserConstraints::EmailAddressUnique
            | UserConstraints::UsernameUnique
            | UserConstraints::PrimaryKey => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<UserConstraints> for String {
    #[inline]
    fn from(val: UserConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for UserConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Categories of database constraint violations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Data validation constraints (format, length, range checks).
    Validation,
    /// Uniqueness constraints (primary keys, unique indexes).
    Uniqueness,
}

/// Unified constraint violation enum that can represent any known database constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    User(UserConstraints),
}

impl ConstraintViolation {
    /// Creates a new [`ConstraintViolation`] from the constraint name.
    ///
    /// Returns `None` if the constraint name is not recognized.
    ///
    /// ```
    /// use bookie_postgres::types::ConstraintViolation;
    ///
    /// assert!(ConstraintViolation::new("users_email_address_unique_idx").is_some());
    /// assert!(ConstraintViolation::new("unknown_constraint").is_none());
    /// ```
    pub fn new(constraint: &str) -> Option<Self> {
        if constraint.starts_with("users_") {
            return UserConstraints::new(constraint).map(ConstraintViolation::User);
        }

        None
    }

    /// Returns the table name associated with this constraint.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConstraintViolation::User(_) => "users",
        }
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            ConstraintViolation::User(c) => c.categorize(),
        }
    }
}
