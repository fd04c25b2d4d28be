//! Path parameter types for HTTP handlers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Path parameters for single-identity operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityPathParams {
    /// Unique identifier of the identity.
    pub id: Uuid,
}
