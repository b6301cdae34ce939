use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

/// Cancellation scope for one run of one domain.
#[derive(Debug, Clone)]
pub struct ScanSession {
    pub domain: String,
    pub generation: u64,
    pub token: CancellationToken,
}

/// Domain name → its current (generation, token). Starting a session for a
/// name cancels whatever token that name held before.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, (u64, CancellationToken)>,
    next_generation: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The new token is a child of `parent`, so cancelling the parent reaches it.
    pub fn begin(&self, domain: &str, parent: &CancellationToken) -> ScanSession {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = parent.child_token();
        if let Some((_, (_, stale))) = self.sessions.remove(domain) {
            stale.cancel();
        }
        self.sessions.insert(domain.to_string(), (generation, token.clone()));
        ScanSession {
            domain: domain.to_string(),
            generation,
            token,
        }
    }

    /// True while `session` is the latest for its domain and not cancelled.
    pub fn is_current(&self, session: &ScanSession) -> bool {
        match self.sessions.get(&session.domain) {
            Some(entry) => entry.0 == session.generation && !entry.1.is_cancelled(),
            None => false,
        }
    }

    pub fn cancel(&self, domain: &str) -> bool {
        match self.sessions.get(domain) {
            Some(entry) => {
                entry.1.cancel();
                true
            }
            None => false,
        }
    }

    /// Drop the session unless a newer one replaced it.
    pub fn end(&self, session: &ScanSession) {
        self.sessions
            .remove_if(&session.domain, |_, (generation, _)| *generation == session.generation);
    }

    pub fn cancel_all(&self) {
        for entry in self.sessions.iter() {
            entry.1.cancel();
        }
    }
}
