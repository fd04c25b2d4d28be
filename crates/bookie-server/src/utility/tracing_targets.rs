//! Tracing target constants for structured logging.
//!
//! Consistent targets allow fine-grained filtering, e.g.
//! `RUST_LOG=bookie_server::authentication=debug`.

/// Bearer token extraction and per-request authentication.
pub const AUTHENTICATION: &str = "bookie_server::authentication";

/// Role and ownership checks.
pub const AUTHORIZATION: &str = "bookie_server::authorization";

/// Signup, login and logout orchestration.
pub const SESSION: &str = "bookie_server::session";

/// Token signing and verification.
pub const TOKEN_CODEC: &str = "bookie_server::token_codec";

/// Password hashing and verification operations.
pub const PASSWORD_HASHER: &str = "bookie_server::password_hasher";

/// Signing secret loading.
pub const SESSION_KEYS: &str = "bookie_server::session_keys";

/// Identity store operations.
pub const IDENTITY_STORE: &str = "bookie_server::identity_store";

/// Identity lifecycle events.
pub const IDENTITY_EVENTS: &str = "bookie_server::identity_events";

/// Error recovery including middleware errors and request timeouts.
pub const RECOVERY_ERROR: &str = "bookie_server::recovery::error";

/// Panic recovery.
pub const RECOVERY_PANIC: &str = "bookie_server::recovery::panic";

/// HTTP handlers for signup, login and logout.
pub const HANDLER_AUTHENTICATION: &str = "bookie_server::handler::authentication";

/// HTTP handlers for identity management.
pub const HANDLER_USERS: &str = "bookie_server::handler::users";
