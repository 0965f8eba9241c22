use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::form::state::FormState;
use crate::models::submission::SubmissionRecord;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

struct Session {
    form: FormState,
    last_touched: Instant,
}

/// Per-session form drafts, keyed by session id.
///
/// Each session owns an independent `FormState`; nothing is shared between
/// sessions. A session untouched for longer than the TTL is dropped the next
/// time the store is accessed. Cloning the store clones the handle, not the
/// drafts.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
        }
    }

    /// Opens a session with an empty draft.
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions, now);
        sessions.insert(
            id,
            Session {
                form: FormState::default(),
                last_touched: now,
            },
        );
        info!("Opened form session {id}");
        id
    }

    /// Returns a copy of the session's current draft.
    pub async fn snapshot(&self, id: Uuid) -> Option<SubmissionRecord> {
        self.update(id, |_| {}).await
    }

    /// Mutates the session's draft and returns the updated copy.
    pub async fn update<F>(&self, id: Uuid, mutate: F) -> Option<SubmissionRecord>
    where
        F: FnOnce(&mut FormState),
    {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions, now);
        let session = sessions.get_mut(&id)?;
        session.last_touched = now;
        mutate(&mut session.form);
        Some(session.form.record().clone())
    }

    /// Drops a session. Returns false if it did not exist.
    pub async fn remove(&self, id: Uuid) -> bool {
        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions, Instant::now());
        let removed = sessions.remove(&id).is_some();
        if removed {
            info!("Closed form session {id}");
        }
        removed
    }

    /// Number of live sessions, after expiring idle ones.
    pub async fn active_count(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions, Instant::now());
        sessions.len()
    }

    fn sweep(&self, sessions: &mut HashMap<Uuid, Session>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, session| now.duration_since(session.last_touched) <= self.ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            info!("Expired {expired} idle form session(s)");
        }
    }
}
