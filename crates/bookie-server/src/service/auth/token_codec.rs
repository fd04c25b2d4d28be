//! Signing and verification of session tokens.
//!
//! Tokens are compact JWS strings signed with HS256. Verification is strict:
//! the signature, the issuer and every claim must be present and valid, and
//! the expiry is compared against the caller-supplied clock with no leeway.
//!
//! Rejections are classified in a fixed order: a token whose header or claims
//! cannot be decoded is malformed, then a bad signature, then expiry, then a
//! foreign issuer.

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{Algorithm, Header, Validation, decode, encode};

use super::{AuthError, AuthResult, SessionClaims, TOKEN_ISSUER};
use crate::service::security::SessionKeys;
use crate::utility::tracing_targets::TOKEN_CODEC as TRACING_TARGET;

/// Lifetime of every issued token.
pub const TOKEN_TTL: SignedDuration = SignedDuration::from_hours(24);

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Issues and verifies signed session tokens.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    keys: SessionKeys,
    validation: Validation,
    /// Same checks without the signature, used to classify rejections.
    structure: Validation,
}

impl TokenCodec {
    /// Creates a codec using the given signing keys.
    pub fn new(keys: SessionKeys) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        // Expiry is checked against an explicit clock in `verify_at`.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["iss", "sub", "iat", "exp"]);

        let mut structure = validation.clone();
        structure.insecure_disable_signature_validation();

        Self {
            keys,
            validation,
            structure,
        }
    }

    /// Signs the claims, stamping issuance at the current time.
    pub fn issue(&self, claims: SessionClaims) -> AuthResult<String> {
        self.issue_at(claims, Timestamp::now())
    }

    /// Signs the claims with `iat = now` and `exp = now + TOKEN_TTL`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SigningFailure`] if encoding fails.
    pub fn issue_at(&self, mut claims: SessionClaims, now: Timestamp) -> AuthResult<String> {
        claims.issuer = TOKEN_ISSUER.to_owned();
        claims.issued_at = now.as_second();
        claims.expires_at = now.as_second() + TOKEN_TTL.as_secs();

        let header = Header::new(SIGNING_ALGORITHM);
        let token = encode(&header, &claims, self.keys.encoding_key()).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                principal_id = %claims.subject,
                "Failed to sign session token",
            );
            AuthError::SigningFailure(Box::new(e))
        })?;

        tracing::debug!(
            target: TRACING_TARGET,
            principal_id = %claims.subject,
            expires_at = claims.expires_at,
            "Session token issued",
        );

        Ok(token)
    }

    /// Verifies the token against the current time.
    pub fn verify(&self, token: &str) -> AuthResult<SessionClaims> {
        self.verify_at(token, Timestamp::now())
    }

    /// Verifies the signature and claims of the token at the given instant.
    ///
    /// # Errors
    ///
    /// - [`AuthError::EmptyToken`] for a blank token.
    /// - [`AuthError::InvalidSignature`] if the signature does not match.
    /// - [`AuthError::MalformedToken`] for any structural, issuer or claim failure.
    /// - [`AuthError::TokenExpired`] if `now` is at or past the expiry.
    pub fn verify_at(&self, token: &str, now: Timestamp) -> AuthResult<SessionClaims> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::EmptyToken);
        }

        let claims = decode::<SessionClaims>(token, self.keys.decoding_key(), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(target: TRACING_TARGET, error = %e, "Token rejected");
                self.classify_rejection(token)
            })?;

        if claims.is_expired_at(now) {
            tracing::debug!(
                target: TRACING_TARGET,
                principal_id = %claims.subject,
                expires_at = claims.expires_at,
                "Token expired",
            );
            return Err(AuthError::TokenExpired);
        }

        if claims.issuer != TOKEN_ISSUER {
            tracing::debug!(
                target: TRACING_TARGET,
                issuer = %claims.issuer,
                "Token issued by a foreign issuer",
            );
            return Err(AuthError::MalformedToken);
        }

        Ok(claims)
    }

    /// Decides why a token failed strict verification.
    ///
    /// If the header and claims decode without looking at the signature, the
    /// signature segment is at fault, whether it is undecodable or just wrong.
    fn classify_rejection(&self, token: &str) -> AuthError {
        match decode::<SessionClaims>(token, self.keys.decoding_key(), &self.structure) {
            Ok(_) => AuthError::InvalidSignature,
            Err(_) => AuthError::MalformedToken,
        }
    }
}

#[cfg(test)]
mod tests {
    use bookie_postgres::types::Role;
    use uuid::Uuid;

    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";
    const OTHER_SECRET: &str = "fedcba9876543210fedcba9876543210";

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(SessionKeys::from_secret(secret).unwrap())
    }

    fn claims() -> SessionClaims {
        SessionClaims {
            issuer: String::new(),
            subject: Uuid::now_v7(),
            name: "Ada Lovelace".into(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            role: Role::User.to_string(),
            issued_at: 0,
            expires_at: 0,
        }
    }

    fn at(second: i64) -> Timestamp {
        Timestamp::from_second(second).unwrap()
    }

    #[test]
    fn issue_then_verify() -> anyhow::Result<()> {
        let codec = codec(SECRET);
        let original = claims();
        let now = at(1_700_000_000);

        let token = codec.issue_at(original.clone(), now)?;
        let verified = codec.verify_at(&token, now)?;

        assert_eq!(verified.subject, original.subject);
        assert_eq!(verified.email, original.email);
        assert_eq!(verified.role(), Some(Role::User));
        assert_eq!(verified.issuer, TOKEN_ISSUER);
        assert_eq!(verified.issued_at, 1_700_000_000);
        assert_eq!(verified.expires_at, 1_700_000_000 + 86_400);
        Ok(())
    }

    #[test]
    fn expiry_boundary() -> anyhow::Result<()> {
        let codec = codec(SECRET);
        let token = codec.issue_at(claims(), at(1_700_000_000))?;

        assert!(codec.verify_at(&token, at(1_700_086_399)).is_ok());
        assert!(matches!(
            codec.verify_at(&token, at(1_700_086_400)),
            Err(AuthError::TokenExpired)
        ));
        Ok(())
    }

    #[test]
    fn tampered_signature() -> anyhow::Result<()> {
        let codec = codec(SECRET);
        let now = at(1_700_000_000);
        let token = codec.issue_at(claims(), now)?;
        let signature_start = token.rfind('.').unwrap() + 1;

        for index in signature_start..token.len() {
            for replacement in [b'A', b'B', b'!', b'-'] {
                let mut bytes = token.clone().into_bytes();
                if bytes[index] == replacement {
                    continue;
                }
                bytes[index] = replacement;
                let tampered = String::from_utf8(bytes)?;

                let result = codec.verify_at(&tampered, now);
                assert!(
                    matches!(result, Err(AuthError::InvalidSignature)),
                    "byte {index} -> {}: {result:?}",
                    replacement as char,
                );
            }
        }
        Ok(())
    }

    #[test]
    fn garbled_claims_with_bad_signature_are_malformed() -> anyhow::Result<()> {
        let codec = codec(SECRET);
        let now = at(1_700_000_000);
        let token = codec.issue_at(claims(), now)?;

        let mut segments: Vec<&str> = token.split('.').collect();
        segments[1] = "bm90LWpzb24";
        let garbled = segments.join(".");

        assert!(matches!(
            codec.verify_at(&garbled, now),
            Err(AuthError::MalformedToken)
        ));
        Ok(())
    }

    #[test]
    fn foreign_key_is_rejected() -> anyhow::Result<()> {
        let now = at(1_700_000_000);
        let token = codec(OTHER_SECRET).issue_at(claims(), now)?;
        assert!(matches!(
            codec(SECRET).verify_at(&token, now),
            Err(AuthError::InvalidSignature)
        ));
        Ok(())
    }

    #[test]
    fn empty_and_malformed_tokens() {
        let codec = codec(SECRET);
        assert!(matches!(codec.verify(""), Err(AuthError::EmptyToken)));
        assert!(matches!(codec.verify("   "), Err(AuthError::EmptyToken)));
        assert!(matches!(codec.verify("abc"), Err(AuthError::MalformedToken)));
        assert!(matches!(
            codec.verify("not.a.token"),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn foreign_issuer_is_rejected() -> anyhow::Result<()> {
        let codec = codec(SECRET);
        let mut claims = claims();
        claims.issuer = "someone-else".into();
        claims.issued_at = 1_700_000_000;
        claims.expires_at = 1_700_086_400;

        let token = encode(
            &Header::new(SIGNING_ALGORITHM),
            &claims,
            codec.keys.encoding_key(),
        )?;

        assert!(matches!(
            codec.verify_at(&token, at(1_700_000_000)),
            Err(AuthError::MalformedToken)
        ));
        Ok(())
    }

    #[test]
    fn expiry_is_checked_before_issuer() -> anyhow::Result<()> {
        let codec = codec(SECRET);
        let mut claims = claims();
        claims.issuer = "someone-else".into();
        claims.issued_at = 1_700_000_000;
        claims.expires_at = 1_700_086_400;

        let token = encode(
            &Header::new(SIGNING_ALGORITHM),
            &claims,
            codec.keys.encoding_key(),
        )?;

        assert!(matches!(
            codec.verify_at(&token, at(1_700_086_400)),
            Err(AuthError::TokenExpired)
        ));
        Ok(())
    }

    #[test]
    fn surrounding_whitespace_is_ignored() -> anyhow::Result<()> {
        let codec = codec(SECRET);
        let now = at(1_700_000_000);
        let token = codec.issue_at(claims(), now)?;
        codec.verify_at(&format!("  {token}\n"), now)?;
        Ok(())
    }
}
