use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::ReconError;
use super::WordlistEntry;

const BUILTIN_WORDLIST: &str = include_str!("../../wordlists/default.yaml");

#[derive(Deserialize)]
#[serde(untagged)]
enum WordlistDocument {
    Wrapped { entries: Vec<WordlistEntry> },
    Bare(Vec<WordlistEntry>),
}

/// Ordered sequence of path checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wordlist {
    entries: Vec<WordlistEntry>,
}

impl Wordlist {
    pub fn new(entries: Vec<WordlistEntry>) -> Result<Self, ReconError> {
        let entries = entries
            .into_iter()
            .map(normalize_entry)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    /// The wordlist compiled into the binary.
    pub fn builtin() -> Result<Self, ReconError> {
        Self::parse(BUILTIN_WORDLIST, "builtin")
    }

    /// Parse one YAML document. `source` only labels errors.
    pub fn parse(content: &str, source: &str) -> Result<Self, ReconError> {
        let doc: WordlistDocument = serde_yaml::from_str(content)
            .map_err(|e| ReconError::Wordlist(format!("{}: {}", source, e)))?;
        let entries = match doc {
            WordlistDocument::Wrapped { entries } => entries,
            WordlistDocument::Bare(entries) => entries,
        };
        Self::new(entries).map_err(|e| match e {
            ReconError::Wordlist(msg) => ReconError::Wordlist(format!("{}: {}", source, msg)),
            other => other,
        })
    }

    /// Load a single YAML file, or every `*.yaml` file in a directory in
    /// file-name order.
    pub fn load(path: &Path) -> Result<Self, ReconError> {
        if !path.exists() {
            return Err(ReconError::Wordlist(format!("Wordlist not found: {}", path.display())));
        }

        if path.is_file() {
            let content = std::fs::read_to_string(path)?;
            let list = Self::parse(&content, &path.display().to_string())?;
            info!(path = %path.display(), entries = list.len(), "Loaded wordlist");
            return Ok(list);
        }

        let pattern = path.join("*.yaml");
        let pattern_str = pattern.to_string_lossy();
        let mut files = Vec::new();
        for entry in glob::glob(&pattern_str)
            .map_err(|e| ReconError::Wordlist(format!("Invalid glob pattern: {}", e)))?
        {
            files.push(entry.map_err(|e| ReconError::Wordlist(format!("Glob error: {}", e)))?);
        }
        files.sort();

        let mut entries = Vec::new();
        for file in files {
            let content = std::fs::read_to_string(&file)?;
            let list = Self::parse(&content, &file.display().to_string())?;
            debug!(file = %file.display(), entries = list.len(), "Loaded wordlist file");
            entries.extend(list.entries);
        }

        if entries.is_empty() {
            return Err(ReconError::Wordlist(format!(
                "No wordlist entries found in {}",
                path.display()
            )));
        }
        info!(path = %path.display(), entries = entries.len(), "Loaded wordlist directory");
        Ok(Self { entries })
    }

    /// Load `path` when given, otherwise the builtin list.
    pub fn load_or_builtin(path: Option<&str>) -> Result<Self, ReconError> {
        match path.map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) => Self::load(Path::new(p)),
            None => Self::builtin(),
        }
    }

    pub fn entries(&self) -> &[WordlistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_entry(mut entry: WordlistEntry) -> Result<WordlistEntry, ReconError> {
    let trimmed = entry.path.trim();
    entry.path = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };

    entry.positive_match.retain(|k| !k.trim().is_empty());
    entry.false_positive_indicators.retain(|k| !k.trim().is_empty());
    if entry.positive_match.is_empty() {
        return Err(ReconError::Wordlist(format!(
            "Entry '{}' has no positive_match keywords",
            entry.path
        )));
    }
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use crate::wordlist::EntryType;

    #[test]
    fn test_builtin_wordlist_parses() {
        let list = Wordlist::builtin().unwrap();
        assert!(!list.is_empty());
        assert!(list.entries().iter().all(|e| e.path.starts_with('/')));
        assert!(list.entries().iter().any(|e| e.path == "/.env"));
    }

    #[test]
    fn test_parse_bare_sequence_with_camel_case() {
        let yaml = r#"
- path: .env
  type: file
  severity: critical
  positiveMatch: [DB_PASSWORD]
  falsePositiveIndicators: []
  description: Exposed env file
"#;
        let list = Wordlist::parse(yaml, "inline").unwrap();
        let entry = &list.entries()[0];
        assert_eq!(entry.path, "/.env");
        assert_eq!(entry.entry_type, EntryType::File);
        assert_eq!(entry.severity, Severity::Critical);
        assert_eq!(entry.positive_match, vec!["DB_PASSWORD".to_string()]);
    }

    #[test]
    fn test_empty_positive_match_rejected() {
        let yaml = "entries:\n  - path: /x\n    type: directory\n    severity: low\n    positive_match: []\n";
        let err = Wordlist::parse(yaml, "inline").unwrap_err();
        assert!(matches!(err, ReconError::Wordlist(_)));
        assert!(err.to_string().contains("positive_match"));
    }

    #[test]
    fn test_unknown_severity_rejected() {
        let yaml = "- path: /x\n  type: file\n  severity: urgent\n  positive_match: [a]\n";
        assert!(Wordlist::parse(yaml, "inline").is_err());
    }

    #[test]
    fn test_load_directory_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("b.yaml"),
            "- path: /second\n  type: file\n  severity: low\n  positive_match: [b]\n",
        ).unwrap();
        std::fs::write(
            dir.path().join("a.yaml"),
            "- path: /first\n  type: file\n  severity: low\n  positive_match: [a]\n",
        ).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let list = Wordlist::load(dir.path()).unwrap();
        let paths: Vec<&str> = list.entries().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/first", "/second"]);
    }

    #[test]
    fn test_load_missing_path() {
        let err = Wordlist::load(Path::new("/nonexistent/wordlist.yaml")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_empty_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Wordlist::load(dir.path()).is_err());
    }

    #[test]
    fn test_load_or_builtin_blank_path() {
        let list = Wordlist::load_or_builtin(Some("  ")).unwrap();
        assert_eq!(list, Wordlist::builtin().unwrap());
    }
}
