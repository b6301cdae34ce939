pub mod loader;

use serde::{Deserialize, Serialize};

use crate::models::{FindingType, Severity};

pub use loader::Wordlist;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Directory,
    File,
}

impl EntryType {
    pub fn finding_type(&self) -> FindingType {
        match self {
            EntryType::Directory => FindingType::DirectoryListing,
            EntryType::File => FindingType::SensitiveFile,
        }
    }
}

/// One path check: where to probe and how to recognize a hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordlistEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub severity: Severity,
    #[serde(alias = "positiveMatch")]
    pub positive_match: Vec<String>,
    #[serde(default, alias = "falsePositiveIndicators")]
    pub false_positive_indicators: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl WordlistEntry {
    pub fn finding_type(&self) -> FindingType {
        self.entry_type.finding_type()
    }
}
