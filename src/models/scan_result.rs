use serde::{Deserialize, Serialize};

use super::finding::{Finding, Severity};

/// Overall verdict for one probed domain, derived from its findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanStatus {
    Secure,
    Scanned,
    PotentiallyVulnerable,
    Vulnerable,
}

impl ScanStatus {
    /// No findings is `Secure`; any Critical or High is `Vulnerable`; otherwise
    /// any Medium is `PotentiallyVulnerable`; anything else is `Scanned`.
    pub fn from_findings(findings: &[Finding]) -> Self {
        if findings.is_empty() {
            return ScanStatus::Secure;
        }
        if findings
            .iter()
            .any(|f| matches!(f.severity, Severity::Critical | Severity::High))
        {
            return ScanStatus::Vulnerable;
        }
        if findings.iter().any(|f| f.severity == Severity::Medium) {
            return ScanStatus::PotentiallyVulnerable;
        }
        ScanStatus::Scanned
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Secure => "Secure",
            ScanStatus::Scanned => "Scanned",
            ScanStatus::PotentiallyVulnerable => "PotentiallyVulnerable",
            ScanStatus::Vulnerable => "Vulnerable",
        }
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Findings for one probed domain. The status always reflects the findings,
/// so the struct is only built through [`ScanResult::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    domain: String,
    status: ScanStatus,
    ip: Option<String>,
    findings: Vec<Finding>,
}

impl ScanResult {
    pub fn new(domain: impl Into<String>, ip: Option<String>, findings: Vec<Finding>) -> Self {
        Self {
            domain: domain.into(),
            status: ScanStatus::from_findings(&findings),
            ip,
            findings,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    pub fn ip(&self) -> Option<&str> {
        self.ip.as_deref()
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Returns the total number of findings in this result.
    pub fn total_findings(&self) -> usize {
        self.findings.len()
    }
}

/// Everything produced by one root-domain scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanOutput {
    pub results: Vec<ScanResult>,
    /// Provider payload as received, kept for display and debugging.
    pub raw_subdomain_data: Option<serde_json::Value>,
}
