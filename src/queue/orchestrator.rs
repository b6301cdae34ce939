use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tokio::sync::{broadcast, watch, Notify};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::ReconConfig;
use crate::db::ignore::decode_ignore_list;
use crate::db::schema::IGNORE_LIST_KEY;
use crate::db::{HistoryStore, IgnoreStore, KeyValueStore, SettingsStore};
use crate::errors::ReconError;
use crate::models::{HistoryItem, ScanOutput};
use crate::pipeline::DomainScanner;
use crate::utils::get_root_domain;
use super::admission::{Admission, RejectReason};
use super::events::QueueEvent;
use super::session::{ScanSession, SessionRegistry};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct QueueOptions {
    /// Reject domains that already have a history entry.
    pub skip_previously_scanned: bool,
    pub max_history: usize,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self::from(&ReconConfig::default())
    }
}

impl From<&ReconConfig> for QueueOptions {
    fn from(config: &ReconConfig) -> Self {
        Self {
            skip_previously_scanned: config.scan().skip_previously_scanned,
            max_history: config.storage().max_history,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueSnapshot {
    pub current: Option<String>,
    pub pending: Vec<String>,
}

impl QueueSnapshot {
    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.pending.is_empty()
    }
}

struct ActiveScan {
    domain: String,
    generation: u64,
}

#[derive(Default)]
struct QueueState {
    pending: VecDeque<String>,
    current: Option<ActiveScan>,
}

impl QueueState {
    fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            current: self.current.as_ref().map(|c| c.domain.clone()),
            pending: self.pending.iter().cloned().collect(),
        }
    }

    fn is_idle(&self) -> bool {
        self.current.is_none() && self.pending.is_empty()
    }
}

struct Inner {
    state: Mutex<QueueState>,
    started: AtomicBool,
    sessions: SessionRegistry,
    wake: Notify,
    idle: watch::Sender<bool>,
    shutdown: CancellationToken,
    events: broadcast::Sender<QueueEvent>,
    store: Arc<dyn KeyValueStore>,
    scanner: Arc<dyn DomainScanner>,
    options: QueueOptions,
}

/// Single-flight FIFO scan queue. At most one domain is scanned at a time;
/// the rest wait in `pending`. Cloning shares the same queue.
#[derive(Clone)]
pub struct ScanQueue {
    inner: Arc<Inner>,
}

impl ScanQueue {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        scanner: Arc<dyn DomainScanner>,
        options: QueueOptions,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (idle, _) = watch::channel(true);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(QueueState::default()),
                started: AtomicBool::new(false),
                sessions: SessionRegistry::new(),
                wake: Notify::new(),
                idle,
                shutdown: CancellationToken::new(),
                events,
                store,
                scanner,
                options,
            }),
        }
    }

    /// Spawn the drain loop and the ignore-list watcher. The handle completes
    /// after [`ScanQueue::shutdown`]. A queue drains on one loop only, so a
    /// second call fails.
    pub fn start(&self) -> Result<JoinHandle<()>, ReconError> {
        if self.inner.started.swap(true, Ordering::SeqCst) {
            return Err(ReconError::Internal("Scan queue already started".into()));
        }
        self.spawn_ignore_watcher();
        let inner = self.inner.clone();
        Ok(tokio::spawn(async move { inner.run().await }))
    }

    /// Cancel the in-flight scan, drop pending entries and stop the loop.
    pub fn shutdown(&self) {
        let inner = &self.inner;
        {
            let mut state = inner.lock();
            state.pending.clear();
            inner.shutdown.cancel();
        }
        inner.sessions.cancel_all();
        info!("Scan queue shutting down");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.inner.events.subscribe()
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        self.inner.lock().snapshot()
    }

    /// Normalize `input` to its root domain and append it unless it is
    /// already queued, in flight, ignored, or (when configured) in history.
    pub fn enqueue(&self, input: &str) -> Admission {
        let inner = &self.inner;
        if inner.shutdown.is_cancelled() {
            debug!(input, "Rejected: queue stopped");
            return Admission::rejected(RejectReason::Stopped);
        }
        let Some(root) = get_root_domain(input) else {
            debug!(input, "Rejected: not a domain");
            return Admission::rejected(RejectReason::Invalid);
        };

        match inner.store.is_ignored(&root) {
            Ok(true) => return inner.reject(&root, RejectReason::Ignored),
            Ok(false) => {}
            Err(e) => warn!(domain = %root, error = %e, "Could not read ignore list"),
        }
        if inner.options.skip_previously_scanned {
            match inner.store.has_history(&root) {
                Ok(true) => return inner.reject(&root, RejectReason::AlreadyScanned),
                Ok(false) => {}
                Err(e) => warn!(domain = %root, error = %e, "Could not read scan history"),
            }
        }

        let (position, snapshot) = {
            let mut state = inner.lock();
            if inner.shutdown.is_cancelled() {
                drop(state);
                return inner.reject(&root, RejectReason::Stopped);
            }
            if state.current.as_ref().is_some_and(|c| c.domain == root) {
                drop(state);
                return inner.reject(&root, RejectReason::InFlight);
            }
            if state.pending.contains(&root) {
                drop(state);
                return inner.reject(&root, RejectReason::AlreadyQueued);
            }
            state.pending.push_back(root.clone());
            inner.idle.send_replace(false);
            (state.pending.len(), state.snapshot())
        };

        info!(domain = %root, position, "Domain queued");
        inner.emit(QueueEvent::Queued { domain: root.clone(), position });
        inner.emit_changed(snapshot);
        inner.wake.notify_one();
        Admission::Queued { domain: root, position }
    }

    /// Auto-trigger entry point for "the user visited this URL".
    pub fn on_navigation(&self, url: &str) -> Admission {
        match self.inner.store.load_settings() {
            Ok(settings) if settings.auto_scan => self.enqueue(url),
            Ok(_) => Admission::rejected(RejectReason::AutoScanDisabled),
            Err(e) => {
                warn!(error = %e, "Could not read settings, not auto-scanning");
                Admission::rejected(RejectReason::AutoScanDisabled)
            }
        }
    }

    /// Cancel the in-flight domain without persisting anything for it.
    pub fn skip_current(&self) -> Option<String> {
        let inner = &self.inner;
        let (skipped, snapshot) = {
            let mut state = inner.lock();
            let active = state.current.take()?;
            inner.sessions.cancel(&active.domain);
            (active.domain, state.snapshot())
        };
        info!(domain = %skipped, "Skipping current scan");
        inner.emit_changed(snapshot);
        Some(skipped)
    }

    /// Cancel the in-flight domain and clear everything pending. Returns how
    /// many pending entries were dropped.
    pub fn cancel_all(&self) -> usize {
        let inner = &self.inner;
        let (cleared, active, snapshot) = {
            let mut state = inner.lock();
            let cleared = state.pending.len();
            state.pending.clear();
            let active = state.current.take();
            if let Some(active) = &active {
                inner.sessions.cancel(&active.domain);
            }
            (cleared, active, state.snapshot())
        };
        info!(cleared, in_flight = active.is_some(), "Cancelled all scans");
        inner.emit_changed(snapshot);
        cleared
    }

    /// Resolve once nothing is pending or in flight.
    pub async fn wait_idle(&self) {
        let mut rx = self.inner.idle.subscribe();
        tokio::select! {
            _ = rx.wait_for(|idle| *idle) => {}
            _ = self.inner.shutdown.cancelled() => {}
        }
    }

    fn spawn_ignore_watcher(&self) {
        let mut rx = match self.inner.store.watch(IGNORE_LIST_KEY) {
            Ok(rx) => rx,
            Err(e) => {
                warn!(error = %e, "Ignore list watch unavailable");
                return;
            }
        };
        let inner = self.inner.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = inner.shutdown.cancelled() => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
                let raw = rx.borrow_and_update().clone();
                match decode_ignore_list(raw.as_deref()) {
                    Ok(ignored) => inner.prune_pending(|d| ignored.contains(d)),
                    Err(e) => warn!(error = %e, "Ignore list unreadable"),
                }
            }
        });
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, event: QueueEvent) {
        let _ = self.events.send(event);
    }

    fn emit_changed(&self, snapshot: QueueSnapshot) {
        self.emit(QueueEvent::QueueChanged {
            current: snapshot.current,
            pending: snapshot.pending,
        });
    }

    fn reject(&self, domain: &str, reason: RejectReason) -> Admission {
        debug!(domain, reason = %reason, "Queue admission rejected");
        Admission::rejected(reason)
    }

    fn prune_pending(&self, drop_if: impl Fn(&str) -> bool) {
        let snapshot = {
            let mut state = self.lock();
            let before = state.pending.len();
            state.pending.retain(|d| !drop_if(d));
            if state.pending.len() == before {
                return;
            }
            state.snapshot()
        };
        info!(pending = snapshot.pending.len(), "Removed newly ignored domains from queue");
        self.emit_changed(snapshot);
    }

    /// Pop the head into the current slot, or mark the queue idle.
    fn next_job(&self) -> Option<(ScanSession, QueueSnapshot)> {
        let mut state = self.lock();
        match state.pending.pop_front() {
            Some(domain) => {
                let session = self.sessions.begin(&domain, &self.shutdown);
                state.current = Some(ActiveScan {
                    domain,
                    generation: session.generation,
                });
                Some((session, state.snapshot()))
            }
            None => {
                if state.is_idle() {
                    self.idle.send_replace(true);
                }
                None
            }
        }
    }

    /// Give up the current slot held by `session`. True only when the slot was
    /// still ours and nothing cancelled the session; skip and cancel-all take
    /// the slot and cancel under the same lock, so the answer cannot go stale.
    fn release_slot(&self, session: &ScanSession) -> bool {
        let mut state = self.lock();
        let holds_slot = state
            .current
            .as_ref()
            .is_some_and(|c| c.generation == session.generation);
        let still_current = holds_slot && self.sessions.is_current(session);
        if holds_slot {
            state.current = None;
        }
        self.sessions.end(session);
        still_current
    }

    async fn run(self: Arc<Self>) {
        info!("Scan queue started");
        let mut busy = false;
        loop {
            if self.shutdown.is_cancelled() {
                break;
            }
            match self.next_job() {
                Some((session, snapshot)) => {
                    busy = true;
                    self.emit_changed(snapshot);
                    self.process(session).await;
                }
                None => {
                    if busy {
                        busy = false;
                        info!("Scan queue idle");
                        self.emit(QueueEvent::Idle);
                    }
                    tokio::select! {
                        _ = self.shutdown.cancelled() => break,
                        _ = self.wake.notified() => {}
                    }
                }
            }
        }
        self.idle.send_replace(true);
        info!("Scan queue stopped");
    }

    async fn process(&self, session: ScanSession) {
        let domain = session.domain.clone();
        info!(domain = %domain, generation = session.generation, "Scan started");
        self.emit(QueueEvent::ScanStarted { domain: domain.clone() });

        // Run on its own task so a panicking scan cannot take the loop down.
        let scanner = self.scanner.clone();
        let token = session.token.clone();
        let job_domain = domain.clone();
        let outcome = match tokio::spawn(async move { scanner.scan(&job_domain, &token).await }).await {
            Ok(outcome) => outcome,
            Err(e) => Err(ReconError::Internal(format!("Scan task failed: {}", e))),
        };

        let still_current = self.release_slot(&session);

        match outcome {
            Ok(output) if still_current => self.complete(&domain, output),
            Ok(_) => {
                info!(domain = %domain, "Scan superseded, discarding results");
                self.emit(QueueEvent::ScanCancelled { domain });
            }
            Err(e) if e.is_cancelled() || !still_current => {
                info!(domain = %domain, "Scan cancelled");
                self.emit(QueueEvent::ScanCancelled { domain });
            }
            Err(e) => {
                let class = e.classify();
                if class.surfaced {
                    error!(domain = %domain, error_type = class.error_type, error = %e, "Scan failed");
                } else {
                    warn!(domain = %domain, error_type = class.error_type, error = %e, "Scan failed");
                }
                self.emit(QueueEvent::ScanFailed { domain, error: e.to_string() });
            }
        }

        let snapshot = self.lock().snapshot();
        self.emit_changed(snapshot);
    }

    fn complete(&self, domain: &str, output: ScanOutput) {
        let findings: usize = output.results.iter().map(|r| r.total_findings()).sum();
        let item = HistoryItem::new(domain, output.results.clone());
        if let Err(e) = self.store.record_history(item, self.options.max_history) {
            error!(domain, error = %e, "Failed to persist scan results");
            self.emit(QueueEvent::ScanFailed {
                domain: domain.to_string(),
                error: e.to_string(),
            });
            return;
        }
        info!(domain, hosts = output.results.len(), findings, "Scan completed");
        self.emit(QueueEvent::ScanCompleted {
            domain: domain.to_string(),
            results: output.results,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use async_trait::async_trait;

    struct NeverScanner;

    #[async_trait]
    impl DomainScanner for NeverScanner {
        async fn scan(&self, _: &str, _: &CancellationToken) -> Result<ScanOutput, ReconError> {
            Err(ReconError::Cancelled)
        }
    }

    fn queue() -> ScanQueue {
        let store: Arc<dyn KeyValueStore> = Arc::new(Database::in_memory().unwrap());
        ScanQueue::new(store, Arc::new(NeverScanner), QueueOptions::default())
    }

    #[test]
    fn test_release_slot_keeps_result_of_untouched_session() {
        let queue = queue();
        queue.enqueue("example.com");
        let (session, _) = queue.inner.next_job().unwrap();

        assert!(queue.inner.release_slot(&session));
        assert!(queue.snapshot().is_idle());
    }

    #[test]
    fn test_skip_cancels_before_slot_is_released() {
        let queue = queue();
        queue.enqueue("example.com");
        let (session, _) = queue.inner.next_job().unwrap();

        assert_eq!(queue.skip_current().as_deref(), Some("example.com"));
        assert!(session.token.is_cancelled());
        assert!(!queue.inner.release_slot(&session));
    }

    #[test]
    fn test_cancel_all_discards_in_flight_session() {
        let queue = queue();
        queue.enqueue("one.com");
        queue.enqueue("two.com");
        let (session, _) = queue.inner.next_job().unwrap();

        assert_eq!(queue.cancel_all(), 1);
        assert!(session.token.is_cancelled());
        assert!(!queue.inner.release_slot(&session));
    }

    #[test]
    fn test_stale_generation_does_not_clear_newer_slot() {
        let queue = queue();
        queue.enqueue("again.com");
        let (old, _) = queue.inner.next_job().unwrap();
        queue.skip_current();
        queue.enqueue("again.com");
        let (new, _) = queue.inner.next_job().unwrap();

        assert!(!queue.inner.release_slot(&old));
        assert_eq!(queue.snapshot().current.as_deref(), Some("again.com"));
        assert!(queue.inner.release_slot(&new));
    }
}
