//! Request extractors.
//!
//! - [`AuthHeader`] and [`AuthState`] authenticate the caller from a bearer token.
//! - [`Json`], [`ValidateJson`], [`Path`] and [`Query`] replace their axum
//!   counterparts so that rejections use the common error envelope.

pub mod auth;
pub mod reject;

pub use crate::extract::auth::{AuthHeader, AuthState};
pub use crate::extract::reject::{Json, Path, Query, ValidateJson};
