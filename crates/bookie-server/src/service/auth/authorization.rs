//! Role and ownership gates for protected operations.

use bookie_postgres::types::Role;
use uuid::Uuid;

use super::{AuthError, AuthResult, SessionClaims};
use crate::utility::tracing_targets::AUTHORIZATION as TRACING_TARGET;

/// Checks that the caller holds one of the required roles.
///
/// An empty requirement set admits any caller with a recognised role. A role
/// claim outside the known set is always rejected, even when nothing is
/// required.
///
/// # Errors
///
/// - [`AuthError::Unauthenticated`] if no claims are attached.
/// - [`AuthError::Forbidden`] if the role is unknown or not in `required`.
pub fn authorize(claims: Option<&SessionClaims>, required: &[Role]) -> AuthResult<()> {
    let Some(claims) = claims else {
        tracing::debug!(target: TRACING_TARGET, "No identity attached to request");
        return Err(AuthError::Unauthenticated);
    };

    let Some(role) = claims.role() else {
        tracing::warn!(
            target: TRACING_TARGET,
            principal_id = %claims.subject,
            role = %claims.role,
            "Unrecognised role claim",
        );
        return Err(AuthError::Forbidden);
    };

    if !required.is_empty() && !required.contains(&role) {
        tracing::debug!(
            target: TRACING_TARGET,
            principal_id = %claims.subject,
            role = %role,
            required = ?required,
            "Role not permitted",
        );
        return Err(AuthError::Forbidden);
    }

    Ok(())
}

/// Checks that the caller owns the resource or holds one of the roles.
///
/// # Errors
///
/// Same as [`authorize`].
pub fn ensure_owner_or(
    claims: Option<&SessionClaims>,
    owner_id: Uuid,
    roles: &[Role],
) -> AuthResult<()> {
    let Some(claims) = claims else {
        return Err(AuthError::Unauthenticated);
    };

    if claims.role().is_some() && claims.subject == owner_id {
        return Ok(());
    }

    authorize(Some(claims), roles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::auth::TOKEN_ISSUER;

    fn claims(role: &str) -> SessionClaims {
        SessionClaims {
            issuer: TOKEN_ISSUER.to_owned(),
            subject: Uuid::now_v7(),
            name: "Grace Hopper".into(),
            username: String::new(),
            email: "grace@example.com".into(),
            role: role.into(),
            issued_at: 0,
            expires_at: 0,
        }
    }

    #[test]
    fn admin_passes_admin_gate() {
        let claims = claims("admin");
        assert!(authorize(Some(&claims), &[Role::Admin, Role::SuperAdmin]).is_ok());
    }

    #[test]
    fn user_fails_admin_gate() {
        let claims = claims("user");
        assert!(matches!(
            authorize(Some(&claims), &[Role::Admin, Role::SuperAdmin]),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn empty_requirement_admits_known_roles() {
        for role in ["user", "admin", "superadmin"] {
            assert!(authorize(Some(&claims(role)), &[]).is_ok(), "{role}");
        }
    }

    #[test]
    fn unknown_role_fails_closed() {
        let claims = claims("root");
        assert!(matches!(authorize(Some(&claims), &[]), Err(AuthError::Forbidden)));
        assert!(matches!(
            authorize(Some(&claims), &[Role::Admin]),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn missing_claims_are_unauthenticated() {
        assert!(matches!(authorize(None, &[]), Err(AuthError::Unauthenticated)));
        assert!(matches!(
            ensure_owner_or(None, Uuid::now_v7(), &[Role::Admin]),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn owner_or_role() {
        let owner = claims("user");
        let admin = claims("admin");
        let stranger = claims("user");

        assert!(ensure_owner_or(Some(&owner), owner.subject, &[Role::Admin]).is_ok());
        assert!(ensure_owner_or(Some(&admin), owner.subject, &[Role::Admin]).is_ok());
        assert!(matches!(
            ensure_owner_or(Some(&stranger), owner.subject, &[Role::Admin]),
            Err(AuthError::Forbidden)
        ));
    }
}
