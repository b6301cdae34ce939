use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scan_result::ScanResult;

/// One completed root-domain scan as kept in the persistent history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub results: Vec<ScanResult>,
    pub scanned_at: DateTime<Utc>,
    pub root_domain: String,
}

impl HistoryItem {
    pub fn new(root_domain: impl Into<String>, results: Vec<ScanResult>) -> Self {
        Self {
            results,
            scanned_at: Utc::now(),
            root_domain: root_domain.into(),
        }
    }

    pub fn total_findings(&self) -> usize {
        self.results.iter().map(|r| r.total_findings()).sum()
    }
}
