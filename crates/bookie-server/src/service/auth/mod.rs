//! Token-based authentication and role-based authorization.

mod auth_error;
mod authorization;
mod session;
mod session_claims;
mod token_codec;

pub use self::auth_error::{AuthError, AuthResult};
pub use self::authorization::{authorize, ensure_owner_or};
pub use self::session::{Authenticated, Session, SessionService};
pub use self::session_claims::{SessionClaims, TOKEN_ISSUER};
pub use self::token_codec::{TOKEN_TTL, TokenCodec};
