/// Auth Service
///
/// Signup stores a salted Argon2id hash of the password and issues no token;
/// the caller logs in separately. Login issues a short-lived access token.
/// Authenticate validates a bearer header and yields the caller's identity.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use chrono::Duration;
/// use taskboard_shared::services::AuthService;
/// use taskboard_shared::store::MemoryStore;
///
/// # async fn example() -> Result<(), taskboard_shared::services::ServiceError> {
/// let auth = AuthService::new(
///     Arc::new(MemoryStore::new()),
///     "a-secret-that-is-at-least-32-bytes-long",
///     Duration::hours(1),
/// );
///
/// auth.signup("alice", "a@x.com", "pw123").await?;
/// let session = auth.login("a@x.com", "pw123").await?;
/// let caller = auth.authenticate(Some(&format!("Bearer {}", session.token)))?;
/// assert_eq!(caller.user_id, session.user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::auth::{
    jwt::{create_token, Claims},
    middleware::{authenticate, AuthContext},
    password::{hash_password, verify_password},
};
use crate::models::user::{NewUser, User};
use crate::store::UserStore;

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Signed access token
    pub token: String,

    /// Identity the token was issued for
    pub user_id: Uuid,

    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Hash compared against when the email is unknown, so both login failure
/// paths cost one Argon2 verification.
fn dummy_hash() -> Option<&'static str> {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    DUMMY
        .get_or_init(|| hash_password("taskboard-dummy-password").ok())
        .as_deref()
}

/// Auth Service
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_secret: Arc<str>,
    token_lifetime: Duration,
}

impl AuthService {
    /// Creates the service over a credential store
    pub fn new(users: Arc<dyn UserStore>, jwt_secret: impl Into<Arc<str>>, token_lifetime: Duration) -> Self {
        Self {
            users,
            jwt_secret: jwt_secret.into(),
            token_lifetime,
        }
    }

    /// Signing secret (shared with the request middleware)
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Registers a new user
    ///
    /// # Errors
    ///
    /// - `ServiceError::Conflict` if the email or username is taken
    /// - `ServiceError::Validation` if a field is blank
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> ServiceResult<User> {
        if username.trim().is_empty() {
            return Err(ServiceError::validation("username", "must not be empty"));
        }
        if email.trim().is_empty() {
            return Err(ServiceError::validation("email", "must not be empty"));
        }
        if password.is_empty() {
            return Err(ServiceError::validation("password", "must not be empty"));
        }

        if self
            .users
            .find_user_by_email_or_username(email, username)
            .await?
            .is_some()
        {
            info!(email = %email, "Signup rejected: user already exists");
            return Err(ServiceError::Conflict);
        }

        let password_hash = hash_password(password)?;

        // The store's uniqueness check still catches a concurrent signup.
        let user = self
            .users
            .insert_user(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, email = %email, "User created");
        Ok(user)
    }

    /// Verifies credentials and issues an access token
    ///
    /// # Errors
    ///
    /// `ServiceError::InvalidCredentials` both when the email is unknown and
    /// when the password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<IssuedToken> {
        let Some(user) = self.users.find_user_by_email(email).await? else {
            if let Some(hash) = dummy_hash() {
                let _ = verify_password(password, hash);
            }
            info!(email = %email, "Login failed: unknown email");
            return Err(ServiceError::InvalidCredentials);
        };

        let valid = match verify_password(password, &user.password_hash) {
            Ok(valid) => valid,
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
                false
            }
        };
        if !valid {
            info!(email = %email, "Login failed: password mismatch");
            return Err(ServiceError::InvalidCredentials);
        }

        let claims = Claims::new(user.id, self.token_lifetime);
        let token = create_token(&claims, &self.jwt_secret)?;
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or_else(|| ServiceError::Internal("Token expiry out of range".to_string()))?;

        info!(user_id = %user.id, "Login successful");
        Ok(IssuedToken {
            token,
            user_id: user.id,
            expires_at,
        })
    }

    /// Validates an `Authorization` header value
    ///
    /// # Errors
    ///
    /// `ServiceError::Unauthorized` if the header is missing, malformed,
    /// expired, or carries an invalid signature.
    pub fn authenticate(&self, authorization: Option<&str>) -> ServiceResult<AuthContext> {
        Ok(authenticate(authorization, &self.jwt_secret)?)
    }
}
