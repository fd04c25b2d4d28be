//! Credential hashing and token key management.

mod password_hasher;
mod session_keys;

pub use password_hasher::PasswordHasher;
pub use session_keys::{MIN_SECRET_LEN, SessionKeys, SessionKeysConfig};
