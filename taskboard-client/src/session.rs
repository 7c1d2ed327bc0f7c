/// Client session
///
/// Holds the access token issued at login. A session moves through
/// `Absent -> Valid -> Expired | Cleared`; views that need a token ask
/// [`Session::token`] and send the user to the login screen when it returns
/// `None`.
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use taskboard_client::session::{Session, SessionState};
/// use uuid::Uuid;
///
/// let mut session = Session::new();
/// assert_eq!(session.state(), SessionState::Absent);
///
/// session.store("eyJ...", Uuid::new_v4(), Utc::now() + Duration::hours(1));
/// assert_eq!(session.token(), Some("eyJ..."));
///
/// session.clear();
/// assert_eq!(session.token(), None);
/// ```

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Never logged in
    Absent,

    /// Holding a token that has not expired
    Valid,

    /// Token lifetime has passed
    Expired,

    /// Logged out, or the server rejected the token
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Credentials {
    token: String,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

/// Explicit client session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    state: SessionState,
    credentials: Option<Credentials>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates an empty session
    pub fn new() -> Self {
        Self {
            state: SessionState::Absent,
            credentials: None,
        }
    }

    /// Records a freshly issued token
    pub fn store(&mut self, token: impl Into<String>, user_id: Uuid, expires_at: DateTime<Utc>) {
        self.credentials = Some(Credentials {
            token: token.into(),
            user_id,
            expires_at,
        });
        self.state = SessionState::Valid;
        self.refresh_at(Utc::now());
    }

    /// Bearer token, if the session is still valid
    pub fn token(&mut self) -> Option<&str> {
        self.token_at(Utc::now())
    }

    /// Same as [`Session::token`] with an explicit clock
    pub fn token_at(&mut self, now: DateTime<Utc>) -> Option<&str> {
        self.refresh_at(now);
        match self.state {
            SessionState::Valid => self.credentials.as_ref().map(|c| c.token.as_str()),
            _ => None,
        }
    }

    /// Identity of the logged-in user while the session is valid
    pub fn user_id(&self) -> Option<Uuid> {
        match self.state {
            SessionState::Valid => self.credentials.as_ref().map(|c| c.user_id),
            _ => None,
        }
    }

    /// Expiry of the current token, if any
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.credentials.as_ref().map(|c| c.expires_at)
    }

    /// Current lifecycle state (without re-checking the clock)
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True when a view must redirect to login
    pub fn requires_login(&mut self) -> bool {
        self.token().is_none()
    }

    /// Drops the token (logout, or a 401 from the server)
    pub fn clear(&mut self) {
        self.credentials = None;
        self.state = SessionState::Cleared;
    }

    fn refresh_at(&mut self, now: DateTime<Utc>) {
        if self.state != SessionState::Valid {
            return;
        }
        if self.credentials.as_ref().map_or(true, |c| now >= c.expires_at) {
            tracing::debug!("Session token expired");
            self.credentials = None;
            self.state = SessionState::Expired;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_absent_by_default() {
        let mut session = Session::default();
        assert_eq!(session.state(), SessionState::Absent);
        assert_eq!(session.token(), None);
        assert_eq!(session.user_id(), None);
        assert!(session.requires_login());
    }

    #[test]
    fn test_valid_until_expiry() {
        let user = Uuid::new_v4();
        let now = Utc::now();
        let mut session = Session::new();
        session.store("tok", user, now + Duration::minutes(10));

        assert_eq!(session.state(), SessionState::Valid);
        assert_eq!(session.token_at(now), Some("tok"));
        assert_eq!(session.user_id(), Some(user));

        assert_eq!(session.token_at(now + Duration::minutes(10)), None);
        assert_eq!(session.state(), SessionState::Expired);
        assert_eq!(session.user_id(), None);
        assert_eq!(session.expires_at(), None);
    }

    #[test]
    fn test_already_expired_token_is_never_valid() {
        let mut session = Session::new();
        session.store("old", Uuid::new_v4(), Utc::now() - Duration::seconds(1));
        assert_eq!(session.state(), SessionState::Expired);
        assert!(session.requires_login());
    }

    #[test]
    fn test_clear() {
        let mut session = Session::new();
        session.store("tok", Uuid::new_v4(), Utc::now() + Duration::hours(1));
        session.clear();

        assert_eq!(session.state(), SessionState::Cleared);
        assert_eq!(session.token(), None);

        session.store("again", Uuid::new_v4(), Utc::now() + Duration::hours(1));
        assert_eq!(session.token(), Some("again"));
    }
}
