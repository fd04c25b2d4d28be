//! Signup, login, logout and per-request authentication.

use std::fmt;
use std::sync::Arc;

use bookie_postgres::types::Role;
use jiff::Timestamp;

use super::{AuthError, AuthResult, SessionClaims, TokenCodec};
use crate::service::security::PasswordHasher;
use crate::service::store::{Identity, IdentityProfile, IdentityStore, NewIdentity};
use crate::utility::tracing_targets::SESSION as TRACING_TARGET;

/// Freshly issued token together with the identity it represents.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub identity: Identity,
}

/// Verified claims and the identity they currently resolve to.
#[derive(Debug, Clone)]
pub struct Authenticated {
    /// Claims with the role refreshed from the store.
    pub claims: SessionClaims,
    pub identity: Identity,
}

/// Composes credential checks, token issuance and identity lookup.
///
/// Holds no per-request state; cheap to clone.
#[derive(Clone)]
pub struct SessionService {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
    identity_store: Arc<dyn IdentityStore>,
    default_role: Role,
}

impl SessionService {
    /// Creates a new session service.
    pub fn new(
        password_hasher: PasswordHasher,
        token_codec: TokenCodec,
        identity_store: Arc<dyn IdentityStore>,
        default_role: Role,
    ) -> Self {
        Self {
            password_hasher,
            token_codec,
            identity_store,
            default_role,
        }
    }

    /// Returns the role assigned to new identities.
    #[inline]
    pub fn default_role(&self) -> Role {
        self.default_role
    }

    /// Registers a new identity and issues its first token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AlreadyExists`] on an email or username collision,
    /// in which case no token is issued.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        profile: IdentityProfile,
    ) -> AuthResult<Session> {
        let password_hash = self.password_hasher.hash_secret(password)?;
        let new_identity = NewIdentity {
            email: email.trim().to_lowercase(),
            password_hash,
            role: self.default_role,
            profile,
        };

        let identity = self.identity_store.insert(new_identity).await.inspect_err(|e| {
            if let AuthError::AlreadyExists(field) = e {
                tracing::info!(target: TRACING_TARGET, field, "Signup rejected, identity exists");
            }
        })?;

        let token = self.token_codec.issue(SessionClaims::for_identity(&identity))?;

        tracing::info!(
            target: TRACING_TARGET,
            identity_id = %identity.id,
            role = %identity.role,
            "Identity signed up",
        );

        Ok(Session { token, identity })
    }

    /// Verifies credentials and issues a fresh token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] both for an unknown email and
    /// for a wrong password.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<Session> {
        let email = email.trim().to_lowercase();

        let Some(identity) = self.identity_store.find_by_email(&email).await? else {
            self.password_hasher.verify_dummy_secret(password);
            tracing::info!(target: TRACING_TARGET, "Login failed");
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .password_hasher
            .verify_secret(&identity.password_hash, password)?
        {
            tracing::info!(target: TRACING_TARGET, identity_id = %identity.id, "Login failed");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.token_codec.issue(SessionClaims::for_identity(&identity))?;
        tracing::info!(target: TRACING_TARGET, identity_id = %identity.id, "Identity logged in");

        Ok(Session { token, identity })
    }

    /// Acknowledges a logout.
    ///
    /// Tokens are self-contained; the client discards its copy and the token
    /// stays valid until it expires.
    pub fn logout(&self) {
        tracing::debug!(target: TRACING_TARGET, "Logout acknowledged");
    }

    /// Authenticates a raw bearer token at the current time.
    pub async fn authenticate(&self, token: &str) -> AuthResult<Authenticated> {
        self.authenticate_at(token, Timestamp::now()).await
    }

    /// Verifies the token and resolves its subject against the store.
    ///
    /// # Errors
    ///
    /// Returns the codec error for a bad token and
    /// [`AuthError::Unauthenticated`] if the identity no longer exists.
    pub async fn authenticate_at(&self, token: &str, now: Timestamp) -> AuthResult<Authenticated> {
        let claims = self.token_codec.verify_at(token, now)?;

        let Some(identity) = self.identity_store.find_by_id(claims.subject).await? else {
            tracing::warn!(
                target: TRACING_TARGET,
                principal_id = %claims.subject,
                "Token subject no longer exists",
            );
            return Err(AuthError::Unauthenticated);
        };

        let claims = claims.with_role(identity.role);
        Ok(Authenticated { claims, identity })
    }
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService")
            .field("default_role", &self.default_role)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use super::*;
    use crate::service::auth::TOKEN_TTL;
    use crate::service::security::SessionKeys;
    use crate::service::store::MemoryIdentityStore;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn service() -> (SessionService, Arc<MemoryIdentityStore>) {
        let store = Arc::new(MemoryIdentityStore::new());
        let keys = SessionKeys::from_secret(SECRET).unwrap();
        let service = SessionService::new(
            PasswordHasher::new(),
            TokenCodec::new(keys),
            store.clone(),
            Role::User,
        );
        (service, store)
    }

    #[tokio::test]
    async fn signup_then_authenticate() -> anyhow::Result<()> {
        let (service, _) = service();
        let session = service
            .signup("a@b.com", "Secret123", IdentityProfile::default())
            .await?;

        assert!(!session.token.is_empty());
        assert_eq!(session.identity.role, Role::User);

        let authenticated = service.authenticate(&session.token).await?;
        assert_eq!(authenticated.claims.email, "a@b.com");
        assert_eq!(authenticated.identity.id, session.identity.id);
        Ok(())
    }

    #[tokio::test]
    async fn token_expires_after_ttl() -> anyhow::Result<()> {
        let (service, _) = service();
        let session = service
            .signup("a@b.com", "Secret123", IdentityProfile::default())
            .await?;

        let later = Timestamp::now() + TOKEN_TTL + SignedDuration::from_secs(1);
        let result = service.authenticate_at(&session.token, later).await;
        assert!(matches!(result, Err(ref e) if e.is_unauthenticated()));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_signup_issues_no_token() -> anyhow::Result<()> {
        let (service, store) = service();
        service
            .signup("a@b.com", "Secret123", IdentityProfile::default())
            .await?;

        let result = service
            .signup(" A@B.com", "Other123", IdentityProfile::default())
            .await;
        assert!(matches!(result, Err(AuthError::AlreadyExists("email"))));

        let page = store
            .list(crate::service::store::PageRequest {
                limit: 10,
                offset: 0,
            })
            .await?;
        assert_eq!(page.total, 1);
        Ok(())
    }

    #[tokio::test]
    async fn login_does_not_enumerate() -> anyhow::Result<()> {
        let (service, _) = service();
        service
            .signup("real@x.com", "Secret123", IdentityProfile::default())
            .await?;

        let unknown = service.login("nonexistent@x.com", "anything").await;
        let wrong = service.login("real@x.com", "wrongpassword").await;

        let (Err(unknown), Err(wrong)) = (unknown, wrong) else {
            anyhow::bail!("both logins must fail");
        };
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
        Ok(())
    }

    #[tokio::test]
    async fn login_normalizes_email() -> anyhow::Result<()> {
        let (service, _) = service();
        service
            .signup("ada@example.com", "Secret123", IdentityProfile::default())
            .await?;

        let session = service.login("  ADA@example.com ", "Secret123").await?;
        assert_eq!(session.identity.email, "ada@example.com");
        Ok(())
    }

    #[tokio::test]
    async fn authenticate_reflects_current_role() -> anyhow::Result<()> {
        let (service, store) = service();
        let session = service
            .signup("a@b.com", "Secret123", IdentityProfile::default())
            .await?;

        store.update_role(session.identity.id, Role::Admin).await?;
        let authenticated = service.authenticate(&session.token).await?;
        assert_eq!(authenticated.claims.role(), Some(Role::Admin));
        Ok(())
    }

    #[tokio::test]
    async fn deleted_identity_is_unauthenticated() -> anyhow::Result<()> {
        let (service, store) = service();
        let session = service
            .signup("a@b.com", "Secret123", IdentityProfile::default())
            .await?;

        store.delete(session.identity.id).await?;
        let result = service.authenticate(&session.token).await;
        assert!(matches!(result, Err(AuthError::Unauthenticated)));
        Ok(())
    }
}
