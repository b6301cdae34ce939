use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::errors::ReconError;
use super::filter::{filter_subdomains, FilterOptions};
use super::provider::SubdomainSource;

/// Outcome of one lookup. `raw` is the provider payload, kept for callers
/// that want to show or export it.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub subdomains: BTreeSet<String>,
    pub raw: Option<Value>,
}

pub struct SubdomainResolver {
    source: Arc<dyn SubdomainSource>,
    options: FilterOptions,
}

impl SubdomainResolver {
    pub fn new(source: Arc<dyn SubdomainSource>, options: FilterOptions) -> Self {
        Self { source, options }
    }

    /// Look up and filter subdomains of `root_domain`. An empty key skips the
    /// lookup; provider failures degrade to an empty set. Only cancellation is
    /// returned as an error.
    pub async fn resolve(
        &self,
        root_domain: &str,
        api_key: &str,
        cancel: &CancellationToken,
    ) -> Result<Resolution, ReconError> {
        if api_key.trim().is_empty() {
            info!(domain = root_domain, "No subdomain API key configured, scanning root domain only");
            return Ok(Resolution::default());
        }
        if cancel.is_cancelled() {
            return Err(ReconError::Cancelled);
        }

        let response = match self.source.lookup(root_domain, api_key.trim(), cancel).await {
            Ok(r) => r,
            Err(ReconError::Cancelled) => return Err(ReconError::Cancelled),
            Err(e) => {
                warn!(domain = root_domain, error = %e, "Subdomain lookup failed, continuing without subdomains");
                return Ok(Resolution::default());
            }
        };

        let subdomains = filter_subdomains(root_domain, &response.entries, &self.options, Utc::now());
        info!(
            domain = root_domain,
            reported = response.subdomain_count.unwrap_or(response.entries.len() as u64),
            kept = subdomains.len(),
            "Subdomains resolved"
        );

        Ok(Resolution {
            subdomains,
            raw: Some(response.raw),
        })
    }
}
