#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, Semaphore};
use tokio_util::sync::CancellationToken;

use reconnoiter::errors::ReconError;
use reconnoiter::models::{ScanOutput, ScanResult};
use reconnoiter::pipeline::DomainScanner;
use reconnoiter::probe::{ProbeFailure, ProbeOptions, ProbeResponse, Prober};
use reconnoiter::queue::QueueEvent;
use reconnoiter::subdomains::{ProviderEntry, ProviderResponse, SubdomainSource};

/// Scanner whose runs can be held open until the test releases them.
#[derive(Default)]
pub struct FakeScanner {
    pub gate: Option<Arc<Semaphore>>,
    pub honor_cancel: bool,
    pub fail: HashSet<String>,
    pub started: Mutex<Vec<String>>,
    active: AtomicUsize,
    pub max_active: AtomicUsize,
}

impl FakeScanner {
    pub fn instant() -> Self {
        Self { honor_cancel: true, ..Default::default() }
    }

    pub fn gated(honor_cancel: bool) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let scanner = Self {
            gate: Some(gate.clone()),
            honor_cancel,
            ..Default::default()
        };
        (scanner, gate)
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }
}

#[async_trait]
impl DomainScanner for FakeScanner {
    async fn scan(&self, root_domain: &str, cancel: &CancellationToken) -> Result<ScanOutput, ReconError> {
        self.started.lock().unwrap().push(root_domain.to_string());
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            if self.honor_cancel {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        self.active.fetch_sub(1, Ordering::SeqCst);
                        return Err(ReconError::Cancelled);
                    }
                    permit = gate.acquire() => permit.unwrap().forget(),
                }
            } else {
                gate.acquire().await.unwrap().forget();
            }
        } else {
            tokio::task::yield_now().await;
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.fail.contains(root_domain) {
            return Err(ReconError::NoAnalyzableDomain(format!("{} unreachable", root_domain)));
        }
        Ok(ScanOutput {
            results: vec![ScanResult::new(root_domain, Some("192.0.2.10".into()), Vec::new())],
            raw_subdomain_data: None,
        })
    }
}

/// Prober serving canned responses keyed by full URL; unknown URLs fail to connect.
#[derive(Default)]
pub struct FakeProber {
    pub pages: HashMap<String, (u16, String)>,
    pub default_status: Option<u16>,
    pub calls: Mutex<Vec<String>>,
    /// `follow_redirects` as passed on each call.
    pub redirect_modes: Mutex<Vec<bool>>,
}

impl FakeProber {
    pub fn page(mut self, url: &str, status: u16, body: &str) -> Self {
        self.pages.insert(url.to_string(), (status, body.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prober for FakeProber {
    async fn probe(&self, url: &str, options: &ProbeOptions, cancel: &CancellationToken) -> Result<ProbeResponse, ProbeFailure> {
        if cancel.is_cancelled() {
            return Err(ProbeFailure::Cancelled);
        }
        self.calls.lock().unwrap().push(url.to_string());
        self.redirect_modes.lock().unwrap().push(options.follow_redirects);
        let (status, body) = match (self.pages.get(url), self.default_status) {
            (Some(page), _) => page.clone(),
            (None, Some(status)) => (status, String::new()),
            (None, None) => return Err(ProbeFailure::ConnectionFailed("dns error".into())),
        };
        Ok(ProbeResponse {
            status,
            body: Some(body),
            headers: HashMap::new(),
            remote_addr: "192.0.2.20".parse().ok(),
        })
    }
}

/// Provider returning a fixed list of names, or a fixed failure.
pub struct FakeSource {
    pub names: Vec<String>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeSource {
    pub fn names(names: Vec<String>) -> Self {
        Self { names, fail: false, calls: AtomicUsize::new(0) }
    }

    pub fn failing() -> Self {
        Self { names: Vec::new(), fail: true, calls: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl SubdomainSource for FakeSource {
    async fn lookup(&self, _: &str, _: &str, _: &CancellationToken) -> Result<ProviderResponse, ReconError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ReconError::Provider("HTTP 502".into()));
        }
        Ok(ProviderResponse {
            entries: self.names.iter().map(|n| ProviderEntry::new(n.clone())).collect(),
            subdomain_count: Some(self.names.len() as u64),
            raw: serde_json::json!({ "response": { "domains": self.names } }),
        })
    }
}

/// Next event satisfying `pred`, failing the test after five seconds.
pub async fn next_event<F>(rx: &mut broadcast::Receiver<QueueEvent>, pred: F) -> QueueEvent
where
    F: Fn(&QueueEvent) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = rx.recv().await.expect("event channel closed");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for queue event")
}

/// Poll `cond` until it holds, failing the test after five seconds.
pub async fn eventually<F: Fn() -> bool>(cond: F) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition never became true");
}
