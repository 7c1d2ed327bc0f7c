/// Request authentication
///
/// Extracts the bearer token from an `Authorization` header value and
/// validates it, yielding the [`AuthContext`] the API's auth layer inserts
/// into request extensions. Handlers read the caller with
/// `Extension<AuthContext>`.
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use taskboard_shared::auth::jwt::{create_token, Claims};
/// use taskboard_shared::auth::middleware::authenticate;
/// use uuid::Uuid;
///
/// let user_id = Uuid::new_v4();
/// let token = create_token(&Claims::new(user_id, Duration::hours(1)), "secret").unwrap();
///
/// let ctx = authenticate(Some(&format!("Bearer {}", token)), "secret").unwrap();
/// assert_eq!(ctx.user_id, user_id);
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};

/// Authentication context added to request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,
}

impl AuthContext {
    /// Creates auth context for a validated token subject
    pub fn from_jwt(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Error type for request authentication
///
/// All variants are reported to the client as 401.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Authentication required")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("Expected Bearer token")]
    InvalidFormat,

    /// Token has expired
    #[error("Token expired")]
    Expired,

    /// Token malformed or signature invalid
    #[error("Invalid token")]
    InvalidToken,
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::Expired,
            _ => AuthError::InvalidToken,
        }
    }
}

/// Extracts the token from an `Authorization` header value
///
/// The scheme is matched case-insensitively and surrounding whitespace is
/// ignored. Returns `None` for any other scheme or an empty token.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Authenticates a raw `Authorization` header value
///
/// # Errors
///
/// - `AuthError::MissingCredentials` if no header was sent
/// - `AuthError::InvalidFormat` if it isn't a bearer credential
/// - `AuthError::Expired` / `AuthError::InvalidToken` if validation fails
pub fn authenticate(header_value: Option<&str>, secret: &str) -> Result<AuthContext, AuthError> {
    let header_value = header_value.ok_or(AuthError::MissingCredentials)?;
    let token = bearer_token(header_value).ok_or(AuthError::InvalidFormat)?;

    let claims = validate_token(token, secret).map_err(|e| {
        tracing::debug!(error = %e, "Rejected access token");
        AuthError::from(e)
    })?;

    Ok(AuthContext::from_jwt(claims.sub))
}
