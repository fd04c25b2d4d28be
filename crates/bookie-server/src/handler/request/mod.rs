//! Request types for HTTP handlers.

mod authentications;
mod paginations;
mod paths;
mod users;

pub use authentications::*;
pub use paginations::*;
pub use paths::*;
pub use users::*;
