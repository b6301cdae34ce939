use serde::Serialize;

use crate::models::ScanResult;

/// Everything observers can learn about the queue, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum QueueEvent {
    Queued {
        domain: String,
        position: usize,
    },
    ScanStarted {
        domain: String,
    },
    ScanCompleted {
        domain: String,
        results: Vec<ScanResult>,
    },
    ScanFailed {
        domain: String,
        error: String,
    },
    /// Skipped, cancelled, or superseded; nothing was persisted.
    ScanCancelled {
        domain: String,
    },
    QueueChanged {
        current: Option<String>,
        pending: Vec<String>,
    },
    /// Nothing pending and nothing in flight.
    Idle,
}

impl QueueEvent {
    pub fn domain(&self) -> Option<&str> {
        match self {
            QueueEvent::Queued { domain, .. }
            | QueueEvent::ScanStarted { domain }
            | QueueEvent::ScanCompleted { domain, .. }
            | QueueEvent::ScanFailed { domain, .. }
            | QueueEvent::ScanCancelled { domain } => Some(domain),
            QueueEvent::QueueChanged { .. } | QueueEvent::Idle => None,
        }
    }
}
