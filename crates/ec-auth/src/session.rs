//! Session management.

use crate::user::{Role, User};
use crate::AuthError;
use chrono::{DateTime, Duration, Utc};
use ec_store::UserStore;
use serde::{Deserialize, Serialize};

/// Default session lifetime (one day).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// A unique session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new session ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new cryptographically secure session ID.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 18] = rand::thread_rng().gen();
        Self(format!("sess_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Get the session ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A logged-in session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub user: User,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Check if the session has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Require at least the given role.
    pub fn require(&self, role: Role) -> Result<&User, AuthError> {
        if self.user.has_permission(role) {
            Ok(&self.user)
        } else {
            Err(AuthError::Forbidden(role.as_str()))
        }
    }
}

/// Sessions keyed by session id.
///
/// Expired sessions are evicted when looked up, and in bulk by
/// [`SessionStore::purge_expired`].
pub struct SessionStore {
    sessions: UserStore<Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        let ttl_secs = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        Self {
            sessions: UserStore::new(),
            ttl: Duration::try_seconds(ttl_secs).unwrap_or(Duration::MAX),
        }
    }

    /// Start a session for `user`.
    pub fn create(&self, user: User) -> Session {
        let now = Utc::now();
        let session = Session {
            id: SessionId::generate(),
            user,
            created_at: now,
            expires_at: now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.sessions.set(session.id.as_str(), session.clone());
        tracing::info!(user_id = %session.user.id, role = session.user.role.as_str(), "session created");
        session
    }

    /// Look up a live session.
    pub fn get(&self, id: &str) -> Option<Session> {
        self.get_at(id, Utc::now())
    }

    fn get_at(&self, id: &str, now: DateTime<Utc>) -> Option<Session> {
        let session = self.sessions.get(id)?;
        if session.is_expired_at(now) {
            self.sessions.delete(id);
            tracing::debug!(user_id = %session.user.id, "session expired");
            return None;
        }
        Some(session)
    }

    /// Look up a live session or fail with [`AuthError::Unauthenticated`].
    pub fn authenticate(&self, id: Option<&str>) -> Result<Session, AuthError> {
        id.and_then(|id| self.get(id))
            .ok_or(AuthError::Unauthenticated)
    }

    /// End a session, returning whether it existed.
    pub fn delete(&self, id: &str) -> bool {
        self.sessions.delete(id)
    }

    /// Drop every expired session, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.count();
        self.sessions.retain(|_, session| !session.is_expired_at(now));
        before.saturating_sub(self.sessions.count())
    }

    pub fn count(&self) -> usize {
        self.sessions.count()
    }

    /// Session lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL_SECS)
    }
}
