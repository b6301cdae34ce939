use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::config::SubdomainConfig;
use crate::utils::is_within;
use super::provider::ProviderEntry;

#[derive(Debug, Clone)]
pub struct FilterOptions {
    pub threshold: usize,
    pub recent_window_days: i64,
    pub denylist: Vec<String>,
}

impl From<&SubdomainConfig> for FilterOptions {
    fn from(config: &SubdomainConfig) -> Self {
        Self {
            threshold: config.threshold.max(1),
            recent_window_days: config.recent_window_days,
            denylist: config.denylist.iter().map(|d| d.to_lowercase()).collect(),
        }
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self::from(&SubdomainConfig::default())
    }
}

/// Turn raw provider entries into the sorted, unique set of subdomains of
/// `root` worth probing. The root itself is never part of the output.
pub fn filter_subdomains(
    root: &str,
    entries: &[ProviderEntry],
    options: &FilterOptions,
    now: DateTime<Utc>,
) -> BTreeSet<String> {
    let root = root.to_lowercase();
    let suffix = format!(".{}", root);

    let mut in_scope: Vec<(String, Option<&str>)> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    for entry in entries {
        let name = normalize_name(&entry.name);
        if name == root || !is_within(&name, &root) {
            continue;
        }
        let resolved = entry.last_resolved.as_deref();
        match seen.get(&name) {
            // Same host under another spelling: one slot, first timestamp known.
            Some(&idx) => {
                if in_scope[idx].1.is_none() {
                    in_scope[idx].1 = resolved;
                }
            }
            None => {
                seen.insert(name.clone(), in_scope.len());
                in_scope.push((name, resolved));
            }
        }
    }

    let capped = cap(in_scope, &suffix, options, now);

    capped
        .into_iter()
        .filter(|name| !is_denied(name, &options.denylist))
        .collect()
}

fn normalize_name(name: &str) -> String {
    let name = name.trim().trim_end_matches('.').to_lowercase();
    name.strip_prefix("*.").map(str::to_string).unwrap_or(name)
}

/// recent → no digits → truncate, each step only while still over threshold.
fn cap(
    mut names: Vec<(String, Option<&str>)>,
    suffix: &str,
    options: &FilterOptions,
    now: DateTime<Utc>,
) -> Vec<String> {
    let threshold = options.threshold;

    if names.len() > threshold {
        let cutoff = now - Duration::days(options.recent_window_days);
        let has_timestamps = names.iter().any(|(_, ts)| ts.is_some());
        let recent: Vec<(String, Option<&str>)> = names
            .iter()
            .filter(|(_, ts)| ts.and_then(parse_timestamp).is_some_and(|t| t >= cutoff))
            .cloned()
            .collect();
        if has_timestamps && !recent.is_empty() {
            names = recent;
        }
    }

    if names.len() > threshold {
        names.retain(|(name, _)| {
            let label_part = name.strip_suffix(suffix).unwrap_or(name);
            !label_part.chars().any(|c| c.is_ascii_digit())
        });
    }

    names.truncate(threshold);
    names.into_iter().map(|(name, _)| name).collect()
}

fn is_denied(name: &str, denylist: &[String]) -> bool {
    let first = name.split('.').next().unwrap_or("");
    denylist.iter().any(|d| d == first)
}

/// RFC 3339 or a bare `YYYY-MM-DD` (optionally followed by a time).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    let date_part = raw.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
