use serde::{Deserialize, Serialize};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
pub const DEFAULT_PROVIDER_ENDPOINT: &str = "https://api.viewdns.info/subdomains/";

/// Subdomain prefixes that are never worth probing.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "www",
    "mail",
    "webmail",
    "cpanel",
    "autodiscover",
    "shop",
    "blog",
];

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    pub probe: Option<ProbeConfig>,
    pub scan: Option<ScanConfig>,
    pub subdomains: Option<SubdomainConfig>,
    pub storage: Option<StorageConfig>,
    pub wordlist: Option<String>,
    pub api_key: Option<String>,
}

impl ReconConfig {
    pub fn probe(&self) -> ProbeConfig {
        self.probe.clone().unwrap_or_default()
    }

    pub fn scan(&self) -> ScanConfig {
        self.scan.clone().unwrap_or_default()
    }

    pub fn subdomains(&self) -> SubdomainConfig {
        self.subdomains.clone().unwrap_or_default()
    }

    pub fn storage(&self) -> StorageConfig {
        self.storage.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub timeout_secs: u64,
    pub follow_redirects: bool,
    pub max_redirects: usize,
    pub user_agent: String,
    pub accept_invalid_certs: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            follow_redirects: true,
            max_redirects: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Wordlist probes issued concurrently per host.
    pub batch_size: usize,
    /// Candidate domains probed concurrently by the liveness filter.
    pub liveness_concurrency: usize,
    /// Live hosts reconned concurrently within one root-domain scan.
    pub host_concurrency: usize,
    pub randomize_order: bool,
    /// Reject queue admission for root domains already in history.
    pub skip_previously_scanned: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            liveness_concurrency: 20,
            host_concurrency: 4,
            randomize_order: false,
            skip_previously_scanned: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SubdomainConfig {
    pub endpoint: String,
    pub threshold: usize,
    pub recent_window_days: i64,
    pub denylist: Vec<String>,
    pub max_retries: u32,
}

impl Default for SubdomainConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PROVIDER_ENDPOINT.to_string(),
            threshold: 50,
            recent_window_days: 180,
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
            max_retries: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database: String,
    pub max_history: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: "./data/reconnoiter.db".to_string(),
            max_history: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recon_config_default_sections() {
        let config = ReconConfig::default();
        assert!(config.probe.is_none());
        assert_eq!(config.scan().batch_size, 10);
        assert_eq!(config.subdomains().threshold, 50);
        assert_eq!(config.storage().max_history, 200);
    }

    #[test]
    fn test_default_denylist() {
        let sub = SubdomainConfig::default();
        assert_eq!(sub.denylist.len(), 7);
        assert!(sub.denylist.contains(&"autodiscover".to_string()));
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let config: ReconConfig = serde_yaml::from_str("scan:\n  batch_size: 3\n").unwrap();
        let scan = config.scan();
        assert_eq!(scan.batch_size, 3);
        assert_eq!(scan.liveness_concurrency, 20);
        assert!(scan.skip_previously_scanned);
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        let parsed: Result<ReconConfig, _> = serde_yaml::from_str("intensity: thorough\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_probe_defaults() {
        let probe = ProbeConfig::default();
        assert!(probe.follow_redirects);
        assert_eq!(probe.timeout_secs, 10);
        assert!(probe.user_agent.starts_with("Mozilla/5.0"));
    }
}
