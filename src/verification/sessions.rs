//! Live session table
//!
//! Sessions are independent and keyed by id; the table is shared across
//! concurrent verification runs. Retired sessions are removed by an
//! explicit maintenance call, never on the request path.

use super::models::{SessionStatus, VerificationSession};
use chrono::{Duration, Utc};
use dashmap::DashMap;
use tracing::debug;

/// In-memory session store with a retention window for terminal sessions
pub struct SessionStore {
    sessions: DashMap<String, VerificationSession>,
    retention: Duration,
}

impl SessionStore {
    pub fn new(retention_secs: i64) -> Self {
        Self {
            sessions: DashMap::new(),
            retention: Duration::seconds(retention_secs),
        }
    }

    /// Insert or replace a session snapshot
    pub fn upsert(&self, session: VerificationSession) {
        self.sessions.insert(session.session_id.clone(), session);
    }

    pub fn get(&self, session_id: &str) -> Option<VerificationSession> {
        self.sessions.get(session_id).map(|s| s.clone())
    }

    /// Every stored session, running or terminal
    pub fn all(&self) -> Vec<VerificationSession> {
        self.sessions.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Remove terminal sessions older than the retention window. Returns
    /// how many were removed.
    pub fn cleanup(&self) -> usize {
        let cutoff = Utc::now() - self.retention;
        let before = self.sessions.len();

        self.sessions.retain(|_, session| {
            if !session.status.is_terminal() {
                return true;
            }
            let reference = session.end_time.unwrap_or(session.start_time);
            reference >= cutoff
        });

        let removed = before - self.sessions.len();
        if removed > 0 {
            debug!("Cleaned up {} retired sessions", removed);
        }
        removed
    }
}
