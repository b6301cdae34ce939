use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity level for a wordlist entry and the findings it produces,
/// ordered from most to least severe.
///
/// Serialized in its capitalized display form; the lowercase spelling used in
/// wordlist files is accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[serde(alias = "critical")]
    Critical,
    #[serde(alias = "high")]
    High,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "low")]
    Low,
    #[serde(alias = "info")]
    Info,
}

impl Severity {
    /// Returns a numeric rank where lower values indicate higher severity.
    /// Critical = 0, High = 1, Medium = 2, Low = 3, Info = 4.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
            Severity::Info => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }

    /// The entry's severity with the first letter capitalized.
    pub fn display_name(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Info => "Info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// What kind of exposure a finding represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingType {
    #[serde(rename = "Directory Listing")]
    DirectoryListing,
    #[serde(rename = "Sensitive File")]
    SensitiveFile,
}

impl FindingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingType::DirectoryListing => "Directory Listing",
            FindingType::SensitiveFile => "Sensitive File",
        }
    }
}

impl fmt::Display for FindingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A confirmed exposure on one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub path: String,
    #[serde(rename = "type")]
    pub finding_type: FindingType,
    pub severity: Severity,
    pub details: String,
}

impl Finding {
    /// Key used to deduplicate findings within one domain scan.
    pub fn dedup_key(&self) -> (&str, FindingType) {
        (self.path.as_str(), self.finding_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_rank_ordering() {
        assert!(Severity::Critical.rank() < Severity::High.rank());
        assert!(Severity::High.rank() < Severity::Medium.rank());
        assert!(Severity::Low.rank() < Severity::Info.rank());
    }

    #[test]
    fn test_severity_accepts_lowercase_input() {
        let parsed: Severity = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(parsed, Severity::Critical);
        let parsed: Severity = serde_json::from_str("\"Medium\"").unwrap();
        assert_eq!(parsed, Severity::Medium);
    }

    #[test]
    fn test_severity_serializes_capitalized() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"High\"");
        assert_eq!(Severity::Info.to_string(), "Info");
    }

    #[test]
    fn test_finding_serialization_shape() {
        let finding = Finding {
            path: "/.git/".to_string(),
            finding_type: FindingType::DirectoryListing,
            severity: Severity::High,
            details: "Exposed git directory".to_string(),
        };
        let value = serde_json::to_value(&finding).unwrap();
        assert_eq!(value["type"], "Directory Listing");
        assert_eq!(value["severity"], "High");
        assert_eq!(value["path"], "/.git/");
    }
}
