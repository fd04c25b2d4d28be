//! Response types for HTTP handlers.

mod envelope;
mod error_response;
mod identities;

pub use envelope::Envelope;
pub use error_response::ErrorResponse;
pub use identities::{IdentitiesPage, IdentityResponse};
