use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::{ReconConfig, ScanConfig};
use crate::db::{KeyValueStore, SettingsStore};
use crate::errors::ReconError;
use crate::models::{ScanOutput, ScanResult};
use crate::probe::{HttpProber, ProbeOptions, Prober};
use crate::recon::{discover_live_hosts, LiveHost, ReconEngine, ReconOptions};
use crate::subdomains::{FilterOptions, HttpSubdomainSource, SubdomainResolver, SubdomainSource};
use crate::utils::get_root_domain;
use crate::wordlist::Wordlist;
use super::DomainScanner;

/// Values that sit around the persisted settings in precedence order:
/// `overrides` (command line) beat settings, which beat `fallback`
/// (config file, then environment).
#[derive(Debug, Clone, Default)]
pub struct PipelineInputs {
    pub overrides: InputValues,
    pub fallback: InputValues,
}

#[derive(Debug, Clone, Default)]
pub struct InputValues {
    pub api_key: Option<String>,
    pub wordlist: Option<String>,
}

impl PipelineInputs {
    /// Fallbacks from the config file, with `RECON_API_KEY` behind it.
    pub fn from_config(config: &ReconConfig) -> Self {
        let api_key = non_empty(config.api_key.clone())
            .or_else(|| non_empty(std::env::var("RECON_API_KEY").ok()));
        Self {
            overrides: InputValues::default(),
            fallback: InputValues {
                api_key,
                wordlist: non_empty(config.wordlist.clone()),
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn first_of(values: [Option<String>; 3]) -> Option<String> {
    values.into_iter().find_map(non_empty)
}

/// Resolver → liveness → recon for one root domain.
pub struct ScanPipeline {
    store: Arc<dyn KeyValueStore>,
    prober: Arc<dyn Prober>,
    resolver: SubdomainResolver,
    engine: ReconEngine,
    scan: ScanConfig,
    probe_options: ProbeOptions,
    inputs: PipelineInputs,
    wordlist_cache: Mutex<Option<(Option<String>, Arc<Wordlist>)>>,
}

impl ScanPipeline {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        prober: Arc<dyn Prober>,
        source: Arc<dyn SubdomainSource>,
        config: &ReconConfig,
        inputs: PipelineInputs,
    ) -> Self {
        let scan = config.scan();
        Self {
            store,
            prober: prober.clone(),
            resolver: SubdomainResolver::new(source, FilterOptions::from(&config.subdomains())),
            engine: ReconEngine::new(prober, ReconOptions::from(config)),
            scan,
            probe_options: ProbeOptions::from(&config.probe()),
            inputs,
            wordlist_cache: Mutex::new(None),
        }
    }

    /// Pipeline over the real HTTP prober and provider.
    pub fn from_config(
        store: Arc<dyn KeyValueStore>,
        config: &ReconConfig,
        inputs: PipelineInputs,
    ) -> Result<Self, ReconError> {
        let prober: Arc<dyn Prober> = Arc::new(HttpProber::new(&config.probe())?);
        let source: Arc<dyn SubdomainSource> = Arc::new(HttpSubdomainSource::new(&config.subdomains())?);
        Ok(Self::new(store, prober, source, config, inputs))
    }

    async fn wordlist(&self, path: Option<String>) -> Result<Arc<Wordlist>, ReconError> {
        let mut cache = self.wordlist_cache.lock().await;
        if let Some((cached_path, list)) = cache.as_ref() {
            if *cached_path == path {
                return Ok(list.clone());
            }
        }
        let list = Arc::new(Wordlist::load_or_builtin(path.as_deref())?);
        *cache = Some((path, list.clone()));
        Ok(list)
    }

    async fn recon_host(
        &self,
        host: LiveHost,
        wordlist: &Wordlist,
        cancel: &CancellationToken,
    ) -> Result<ScanResult, ReconError> {
        let findings = self.engine.scan(&host.domain, wordlist, cancel).await?;
        Ok(ScanResult::new(host.domain, host.ip.map(|ip| ip.to_string()), findings))
    }
}

/// Root domain first, then the rest alphabetically.
fn order_hosts(root: &str, hosts: &mut [LiveHost]) {
    hosts.sort_by(|a, b| {
        (a.domain != root, a.domain.as_str()).cmp(&(b.domain != root, b.domain.as_str()))
    });
}

#[async_trait]
impl DomainScanner for ScanPipeline {
    async fn scan(&self, root_domain: &str, cancel: &CancellationToken) -> Result<ScanOutput, ReconError> {
        let root = get_root_domain(root_domain).ok_or_else(|| {
            ReconError::NoAnalyzableDomain(format!("'{}' has no usable root domain", root_domain))
        })?;

        let settings = self.store.load_settings()?;
        let api_key = first_of([
            self.inputs.overrides.api_key.clone(),
            settings.api_key.clone(),
            self.inputs.fallback.api_key.clone(),
        ])
        .unwrap_or_default();
        let wordlist_path = first_of([
            self.inputs.overrides.wordlist.clone(),
            settings.wordlist.clone(),
            self.inputs.fallback.wordlist.clone(),
        ]);
        let wordlist = self.wordlist(wordlist_path).await?;

        let resolution = self.resolver.resolve(&root, &api_key, cancel).await?;

        let mut candidates: BTreeSet<String> = resolution.subdomains;
        candidates.insert(root.clone());
        let candidate_count = candidates.len();

        let mut live = discover_live_hosts(
            self.prober.as_ref(),
            candidates,
            cancel,
            &self.probe_options,
            self.scan.liveness_concurrency,
        )
        .await;
        if cancel.is_cancelled() {
            return Err(ReconError::Cancelled);
        }

        if live.is_empty() {
            info!(domain = %root, candidates = candidate_count, "No live hosts");
            return Ok(ScanOutput {
                results: Vec::new(),
                raw_subdomain_data: resolution.raw,
            });
        }
        order_hosts(&root, &mut live);
        info!(domain = %root, candidates = candidate_count, live = live.len(), "Starting recon");

        let wordlist = wordlist.as_ref();
        let jobs: Vec<_> = live
            .into_iter()
            .map(|host| self.recon_host(host, wordlist, cancel))
            .collect();
        let results: Vec<ScanResult> = stream::iter(jobs)
            .buffered(self.scan.host_concurrency.max(1))
            .try_collect()
            .await?;

        Ok(ScanOutput {
            results,
            raw_subdomain_data: resolution.raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(d: &str) -> LiveHost {
        LiveHost { domain: d.to_string(), ip: None }
    }

    #[test]
    fn test_order_hosts_root_first() {
        let mut hosts = vec![host("b.example.com"), host("example.com"), host("a.example.com")];
        order_hosts("example.com", &mut hosts);
        let names: Vec<&str> = hosts.iter().map(|h| h.domain.as_str()).collect();
        assert_eq!(names, vec!["example.com", "a.example.com", "b.example.com"]);
    }

    #[test]
    fn test_first_of_skips_blank() {
        assert_eq!(
            first_of([Some("  ".into()), None, Some("cfg".into())]),
            Some("cfg".to_string())
        );
        assert_eq!(first_of([None, None, None]), None);
    }

    #[test]
    fn test_inputs_from_config_prefers_file_key() {
        let config = ReconConfig {
            api_key: Some("from-file".into()),
            wordlist: Some("lists/".into()),
            ..Default::default()
        };
        let inputs = PipelineInputs::from_config(&config);
        assert_eq!(inputs.fallback.api_key.as_deref(), Some("from-file"));
        assert_eq!(inputs.fallback.wordlist.as_deref(), Some("lists/"));
        assert!(inputs.overrides.api_key.is_none());
    }
}
