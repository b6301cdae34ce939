use std::fmt;

use serde::Serialize;

/// Outcome of asking the queue to scan a domain. A rejection is a silent
/// no-op, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Admission {
    Queued { domain: String, position: usize },
    Rejected { reason: RejectReason },
}

impl Admission {
    pub fn rejected(reason: RejectReason) -> Self {
        Admission::Rejected { reason }
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, Admission::Queued { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    Invalid,
    AlreadyQueued,
    InFlight,
    Ignored,
    AlreadyScanned,
    AutoScanDisabled,
    Stopped,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Invalid => "not a valid domain",
            RejectReason::AlreadyQueued => "already queued",
            RejectReason::InFlight => "currently scanning",
            RejectReason::Ignored => "on the ignore list",
            RejectReason::AlreadyScanned => "already in history",
            RejectReason::AutoScanDisabled => "auto-scan is disabled",
            RejectReason::Stopped => "the queue has shut down",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
