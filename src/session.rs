//! In-memory session for the logged-in user.
//!
//! A `Session` is created on login, handed to the dashboard, and destroyed
//! on logout. Nothing outlives the process.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::User;

/// The context of one login.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: Uuid,
    pub user: User,
    pub started_at: DateTime<Utc>,
}

impl Session {
    fn new(user: User) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            started_at: Utc::now(),
        }
    }
}

/// Holds at most one session.
#[derive(Debug, Default)]
pub struct SessionHolder {
    current: Option<Session>,
}

impl SessionHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for `user`, replacing any existing one.
    pub fn login(&mut self, user: User) -> &Session {
        if let Some(previous) = self.current.take() {
            tracing::debug!("Session {} replaced by a new login", previous.id);
        }
        let session = self.current.insert(Session::new(user));
        tracing::info!(
            "Session {} started for '{}' at {}",
            session.id,
            session.user.name,
            session.user.coordinates().label()
        );
        session
    }

    /// End the current session, returning it if one existed.
    pub fn logout(&mut self) -> Option<Session> {
        let ended = self.current.take();
        if let Some(session) = &ended {
            tracing::info!("Session {} ended", session.id);
        }
        ended
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User {
            name: name.to_string(),
            location: "Delhi".to_string(),
            lat: 28.6139,
            lng: 77.209,
        }
    }

    #[test]
    fn test_starts_empty() {
        assert!(SessionHolder::new().current().is_none());
    }

    #[test]
    fn test_login_then_logout() {
        let mut holder = SessionHolder::new();
        let id = holder.login(user("Asha")).id;
        assert_eq!(holder.current().map(|s| s.id), Some(id));

        let ended = holder.logout().unwrap();
        assert_eq!(ended.id, id);
        assert_eq!(ended.user.name, "Asha");
        assert!(holder.current().is_none());
    }

    #[test]
    fn test_login_replaces_existing_session() {
        let mut holder = SessionHolder::new();
        let first = holder.login(user("Asha")).id;
        let second = holder.login(user("Ravi")).id;
        assert_ne!(first, second);
        assert_eq!(holder.current().unwrap().user.name, "Ravi");
    }

    #[test]
    fn test_logout_without_session() {
        assert!(SessionHolder::new().logout().is_none());
    }
}
