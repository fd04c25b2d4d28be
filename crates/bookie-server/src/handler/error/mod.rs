//! [`Error`], [`ErrorKind`] and [`Result`].

mod auth_error;
mod http_error;
mod validation_error;

pub use http_error::{Error, ErrorKind, Result};
