use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::SubdomainConfig;
use crate::errors::{with_retry, ReconError, RetryConfig};

/// One name reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEntry {
    pub name: String,
    pub last_resolved: Option<String>,
}

impl ProviderEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), last_resolved: None }
    }

    pub fn resolved_at(name: impl Into<String>, last_resolved: impl Into<String>) -> Self {
        Self { name: name.into(), last_resolved: Some(last_resolved.into()) }
    }
}

/// Parsed provider payload plus the untouched JSON it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub entries: Vec<ProviderEntry>,
    pub subdomain_count: Option<u64>,
    pub raw: Value,
}

#[derive(Deserialize)]
struct Envelope {
    response: Body,
}

#[derive(Deserialize)]
struct Body {
    #[serde(default, alias = "subdomains")]
    domains: Vec<RawEntry>,
    #[serde(default)]
    subdomain_count: Option<Count>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Name(String),
    Record {
        name: String,
        #[serde(default, alias = "lastResolved", alias = "last_seen")]
        last_resolved: Option<String>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Count {
    Number(u64),
    Text(String),
}

impl ProviderResponse {
    pub fn from_value(raw: Value) -> Result<Self, ReconError> {
        let envelope: Envelope = serde_json::from_value(raw.clone())
            .map_err(|e| ReconError::Provider(format!("Malformed provider payload: {}", e)))?;
        let body = envelope.response;

        if let Some(error) = body.error.filter(|e| !e.trim().is_empty()) {
            return Err(ReconError::Provider(error));
        }

        let entries = body
            .domains
            .into_iter()
            .map(|e| match e {
                RawEntry::Name(name) => ProviderEntry::new(name),
                RawEntry::Record { name, last_resolved } => ProviderEntry { name, last_resolved },
            })
            .collect();

        let subdomain_count = body.subdomain_count.and_then(|c| match c {
            Count::Number(n) => Some(n),
            Count::Text(s) => s.trim().parse().ok(),
        });

        Ok(Self { entries, subdomain_count, raw })
    }
}

/// External subdomain-intelligence lookup.
#[async_trait]
pub trait SubdomainSource: Send + Sync {
    async fn lookup(
        &self,
        root_domain: &str,
        api_key: &str,
        cancel: &CancellationToken,
    ) -> Result<ProviderResponse, ReconError>;
}

/// JSON-over-HTTP provider in the ViewDNS style:
/// `GET {endpoint}?domain=..&apikey=..&output=json`.
pub struct HttpSubdomainSource {
    client: Client,
    endpoint: String,
    retry: RetryConfig,
}

impl HttpSubdomainSource {
    pub fn new(config: &SubdomainConfig) -> Result<Self, ReconError> {
        let client = Client::builder()
            .user_agent(concat!("reconnoiter/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ReconError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            retry: RetryConfig { max_retries: config.max_retries },
        })
    }

    fn request_url(&self, root_domain: &str, api_key: &str) -> Result<url::Url, ReconError> {
        url::Url::parse_with_params(
            &self.endpoint,
            &[("domain", root_domain), ("apikey", api_key), ("output", "json")],
        )
        .map_err(|e| ReconError::Config(format!("Invalid subdomain endpoint '{}': {}", self.endpoint, e)))
    }

    async fn fetch(&self, root_domain: &str, api_key: &str) -> Result<ProviderResponse, ReconError> {
        let url = self.request_url(root_domain, api_key)?;
        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ReconError::Timeout(format!("Subdomain lookup timed out: {}", e))
            } else {
                ReconError::Network(format!("Subdomain lookup failed: {}", e))
            }
        })?;

        let status = resp.status();
        if status == 401 || status == 403 {
            return Err(ReconError::Authentication("Subdomain provider rejected the API key".into()));
        }
        if status == 429 {
            return Err(ReconError::RateLimit("Subdomain provider rate limit exceeded".into()));
        }
        if !status.is_success() {
            return Err(ReconError::Provider(format!("Subdomain provider returned HTTP {}", status)));
        }

        let data: Value = resp
            .json()
            .await
            .map_err(|e| ReconError::Provider(format!("Failed to parse provider response: {}", e)))?;
        let parsed = ProviderResponse::from_value(data)?;
        debug!(
            domain = root_domain,
            entries = parsed.entries.len(),
            reported = ?parsed.subdomain_count,
            "Subdomain lookup returned"
        );
        Ok(parsed)
    }
}

#[async_trait]
impl SubdomainSource for HttpSubdomainSource {
    async fn lookup(
        &self,
        root_domain: &str,
        api_key: &str,
        cancel: &CancellationToken,
    ) -> Result<ProviderResponse, ReconError> {
        with_retry("subdomain_lookup", &self.retry, cancel, || async move {
            tokio::select! {
                _ = cancel.cancelled() => Err(ReconError::Cancelled),
                res = self.fetch(root_domain, api_key) => res,
            }
        })
        .await
    }
}
