use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;

/// Claims
///
/// Payload structure expected inside an admin JSON Web Token, as issued by the
/// identity provider (Supabase Auth). Signed with the shared secret and
/// validated on every admin request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the UUID of the authenticated user.
    pub sub: Uuid,
    /// Role claim granted by the provider. Absent for plain visitors.
    #[serde(default)]
    pub role: Option<String>,
    /// Expiration time (exp): timestamp after which the token is rejected.
    pub exp: usize,
    /// Issued at (iat).
    #[serde(default)]
    pub iat: usize,
}

/// AdminSession
///
/// The resolved output of token introspection: who the token belongs to and
/// what role claim it carries. Read-only; this service never mutates sessions.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub subject: Uuid,
    pub role: Option<String>,
    pub expiry: usize,
}

/// CredentialVerifier
///
/// Abstract contract for the identity-provider boundary: given a bare token,
/// either resolve the session it represents or report it invalid. The trait
/// seam lets tests substitute `MockVerifier` for the real JWT validation,
/// exactly as `ObjectStore` does for S3.
///
/// Implementations must be stateless and safe to call concurrently.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn introspect(&self, token: &str) -> Result<AdminSession, String>;
}

/// VerifierState
///
/// The concrete type used to share the verifier across the application state.
pub type VerifierState = Arc<dyn CredentialVerifier>;

/// JwtVerifier
///
/// Production verifier: decodes the token with the provider's shared secret,
/// enforcing signature and expiry. No network call is involved; the JWT itself
/// is the introspection response.
pub struct JwtVerifier {
    decoding_key: DecodingKey,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

#[async_trait]
impl CredentialVerifier for JwtVerifier {
    async fn introspect(&self, token: &str) -> Result<AdminSession, String> {
        let mut validation = Validation::default();
        // Expiration validation is always active.
        validation.validate_exp = true;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| e.to_string())?;

        Ok(AdminSession {
            subject: token_data.claims.sub,
            role: token_data.claims.role,
            expiry: token_data.claims.exp,
        })
    }
}

/// AdminUser
///
/// The resolved identity of an admin request. Only constructed after the
/// bearer token has passed introspection *and* carries the "admin" role, so
/// any handler taking this argument is unreachable without admin privileges.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: Uuid,
}

/// AdminUser Extractor Implementation
///
/// The admin gate. Runs before any handler work:
/// 1. Extract the Authorization header and strip the "Bearer " prefix.
/// 2. Missing/empty token: reject with "no token provided".
/// 3. Introspection failure: reject with "invalid or expired token".
/// 4. Missing or non-"admin" role claim: reject with "admin privileges required".
///
/// Every rejection is a 401 with a structured `{success:false, error,
/// code:"UNAUTHORIZED"}` body (via `ApiError::Auth`), and the request stops
/// before any store or storage call is attempted.
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    VerifierState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = VerifierState::from_ref(state);

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        // The prefix is optional per the contract: strip it if present, use
        // the raw value otherwise.
        let token = auth_header
            .strip_prefix("Bearer ")
            .unwrap_or(auth_header)
            .trim();

        if token.is_empty() {
            return Err(ApiError::Auth("no token provided".to_string()));
        }

        let session = verifier
            .introspect(token)
            .await
            .map_err(|_| ApiError::Auth("invalid or expired token".to_string()))?;

        if session.role.as_deref() != Some("admin") {
            return Err(ApiError::Auth("admin privileges required".to_string()));
        }

        Ok(AdminUser {
            id: session.subject,
        })
    }
}

// --- Mock Implementation (For Tests) ---

/// MockVerifier
///
/// Test double for the identity-provider boundary: resolves every token to a
/// fixed session, or simulates introspection failure.
#[derive(Clone)]
pub struct MockVerifier {
    pub role: Option<String>,
    pub should_fail: bool,
}

impl MockVerifier {
    /// Verifier that accepts any token as an admin session.
    pub fn admin() -> Self {
        Self {
            role: Some("admin".to_string()),
            should_fail: false,
        }
    }

    /// Verifier that resolves tokens to a non-admin role.
    pub fn with_role(role: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            should_fail: false,
        }
    }

    /// Verifier whose introspection always errors (expired/garbage tokens).
    pub fn failing() -> Self {
        Self {
            role: None,
            should_fail: true,
        }
    }
}

#[async_trait]
impl CredentialVerifier for MockVerifier {
    async fn introspect(&self, _token: &str) -> Result<AdminSession, String> {
        if self.should_fail {
            return Err("Mock Introspection Error: Simulation requested".to_string());
        }
        Ok(AdminSession {
            subject: Uuid::new_v4(),
            role: self.role.clone(),
            expiry: usize::MAX,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::{SystemTime, UNIX_EPOCH};

    const SECRET: &str = "unit-test-secret";

    fn now() -> usize {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize
    }

    fn token_with(role: Option<&str>, exp: usize) -> String {
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: role.map(|r| r.to_string()),
            exp,
            iat: now(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn introspect_resolves_role_claim() {
        let verifier = JwtVerifier::new(SECRET);
        let session = verifier
            .introspect(&token_with(Some("admin"), now() + 3600))
            .await
            .unwrap();
        assert_eq!(session.role.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn introspect_rejects_expired_token() {
        let verifier = JwtVerifier::new(SECRET);
        let result = verifier
            .introspect(&token_with(Some("admin"), now().saturating_sub(3600)))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn introspect_rejects_wrong_secret() {
        let verifier = JwtVerifier::new("a-different-secret");
        let result = verifier
            .introspect(&token_with(Some("admin"), now() + 3600))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn introspect_tolerates_missing_role_claim() {
        // A valid token without a role claim introspects fine; the gate is
        // what turns the missing claim into a 401.
        let verifier = JwtVerifier::new(SECRET);
        let session = verifier
            .introspect(&token_with(None, now() + 3600))
            .await
            .unwrap();
        assert!(session.role.is_none());
    }
}
