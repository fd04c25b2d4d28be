//! Contains constraints, enumerations and other custom types.

mod constraints;
mod role;

pub use constraints::{ConstraintCategory, ConstraintViolation, UserConstraints};
pub use role::Role;
