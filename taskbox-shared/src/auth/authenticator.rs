/// The identity seam: resolving a current principal from request headers
///
/// Task handlers never authenticate anything themselves. They receive a
/// [`Principal`] resolved upstream by whichever [`Authenticator`] the server
/// was built with:
///
/// - [`JwtAuthenticator`] — production; validates `Authorization: Bearer`
///   access tokens.
/// - [`StubAuthenticator`] — test mode; reads the principal straight from an
///   `X-Test-User` header so automated tests can act as any user without a
///   credential exchange. Never constructed by the production binary.
///
/// # Example
///
/// ```
/// use axum::http::HeaderMap;
/// use taskbox_shared::auth::authenticator::{Authenticator, StubAuthenticator};
/// use uuid::Uuid;
///
/// let user_id = Uuid::new_v4();
/// let mut headers = HeaderMap::new();
/// headers.insert("x-test-user", user_id.to_string().parse().unwrap());
///
/// let principal = StubAuthenticator::new().authenticate(&headers).unwrap();
/// assert_eq!(principal.user_id, user_id);
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_access_token, JwtError};

/// Header consulted by [`StubAuthenticator`]
const TEST_USER_HEADER: &str = "x-test-user";

/// The resolved identity of the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Authenticated user ID
    pub user_id: Uuid,
}

/// Error type for principal resolution
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No credentials were presented
    #[error("Missing credentials")]
    MissingCredentials,

    /// Credentials were presented in an unusable shape
    #[error("Invalid credential format: {0}")]
    InvalidFormat(String),

    /// Credentials were presented but did not validate
    #[error("Invalid credentials: {0}")]
    InvalidToken(String),
}

/// Resolves the current principal from request headers
///
/// Implementations must be pure lookups over the request: no session state,
/// no database access.
pub trait Authenticator: Send + Sync {
    /// Resolves the principal making this request, or an error when none
    /// can be established
    fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, AuthError>;
}

/// Production authenticator backed by HS256 access tokens
pub struct JwtAuthenticator {
    secret: String,
}

impl JwtAuthenticator {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl Authenticator for JwtAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        let auth_header = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingCredentials)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

        let claims = validate_access_token(token, &self.secret).map_err(|e| match e {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
            other => AuthError::InvalidToken(format!("Invalid token: {}", other)),
        })?;

        Ok(Principal {
            user_id: claims.sub,
        })
    }
}

/// Test-mode authenticator
///
/// Resolves the principal from the `X-Test-User` header, which carries a
/// user id. This stands in for a real credential check during automated
/// testing, the same way a warden-style test mode logs a user in directly.
#[derive(Debug, Default)]
pub struct StubAuthenticator;

impl StubAuthenticator {
    pub fn new() -> Self {
        Self
    }
}

impl Authenticator for StubAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        let raw = headers
            .get(TEST_USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingCredentials)?;

        let user_id = Uuid::parse_str(raw)
            .map_err(|e| AuthError::InvalidFormat(format!("Bad test user id: {}", e)))?;

        Ok(Principal { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::create_access_token;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn bearer_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {}", token).parse().unwrap(),
        );
        headers
    }

    #[test]
    fn test_jwt_authenticator_resolves_token_subject() {
        let user_id = Uuid::new_v4();
        let token = create_access_token(user_id, SECRET).unwrap();

        let principal = JwtAuthenticator::new(SECRET)
            .authenticate(&bearer_headers(&token))
            .unwrap();
        assert_eq!(principal.user_id, user_id);
    }

    #[test]
    fn test_jwt_authenticator_requires_credentials() {
        let result = JwtAuthenticator::new(SECRET).authenticate(&HeaderMap::new());
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_jwt_authenticator_requires_bearer_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());

        let result = JwtAuthenticator::new(SECRET).authenticate(&headers);
        assert!(matches!(result, Err(AuthError::InvalidFormat(_))));
    }

    #[test]
    fn test_jwt_authenticator_rejects_garbage_token() {
        let result = JwtAuthenticator::new(SECRET).authenticate(&bearer_headers("nope"));
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_stub_authenticator_reads_test_header() {
        let user_id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(TEST_USER_HEADER, user_id.to_string().parse().unwrap());

        let principal = StubAuthenticator::new().authenticate(&headers).unwrap();
        assert_eq!(principal.user_id, user_id);
    }

    #[test]
    fn test_stub_authenticator_without_header_is_unauthenticated() {
        let result = StubAuthenticator::new().authenticate(&HeaderMap::new());
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_stub_authenticator_rejects_malformed_id() {
        let mut headers = HeaderMap::new();
        headers.insert(TEST_USER_HEADER, "not-a-uuid".parse().unwrap());

        let result = StubAuthenticator::new().authenticate(&headers);
        assert!(matches!(result, Err(AuthError::InvalidFormat(_))));
    }
}
