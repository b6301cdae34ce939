use std::net::IpAddr;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::probe::{ProbeOptions, Prober};
use crate::utils::https_url;

/// A domain that answered `https://{domain}` with HTTP 200.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveHost {
    pub domain: String,
    pub ip: Option<IpAddr>,
}

/// Probe every candidate concurrently and keep the ones that respond with 200.
/// Failures of any kind, cancellation included, only exclude that domain.
/// Output order is completion order.
pub async fn discover_live_hosts<I>(
    prober: &dyn Prober,
    domains: I,
    cancel: &CancellationToken,
    options: &ProbeOptions,
    concurrency: usize,
) -> Vec<LiveHost>
where
    I: IntoIterator<Item = String>,
{

    let probes: Vec<_> = domains
        .into_iter()
        .map(|domain| async move {
            let url = https_url(&domain, "");
            match prober.probe(&url, options, cancel).await {
                Ok(resp) if resp.is_ok() => Some(LiveHost { domain, ip: resp.remote_addr }),
                Ok(resp) => {
                    debug!(domain = %domain, status = resp.status, "Host not live");
                    None
                }
                Err(e) => {
                    debug!(domain = %domain, reason = %e, "Host not reachable");
                    None
                }
            }
        })
        .collect();

    let outcomes: Vec<Option<LiveHost>> = stream::iter(probes)
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;
    let live: Vec<LiveHost> = outcomes.into_iter().flatten().collect();

    info!(live = live.len(), "Liveness check finished");
    live
}

pub async fn filter_live<I>(
    prober: &dyn Prober,
    domains: I,
    cancel: &CancellationToken,
    options: &ProbeOptions,
    concurrency: usize,
) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    discover_live_hosts(prober, domains, cancel, options, concurrency)
        .await
        .into_iter()
        .map(|h| h.domain)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{ProbeFailure, ProbeResponse};
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Responds per host: a status, or a connection failure for unknown hosts.
    struct HostTable(HashMap<String, u16>);

    #[async_trait]
    impl Prober for HostTable {
        async fn probe(&self, url: &str, _: &ProbeOptions, cancel: &CancellationToken) -> Result<ProbeResponse, ProbeFailure> {
            if cancel.is_cancelled() {
                return Err(ProbeFailure::Cancelled);
            }
            let host = url.trim_start_matches("https://");
            match self.0.get(host) {
                Some(status) => Ok(ProbeResponse {
                    status: *status,
                    remote_addr: "192.0.2.1".parse().ok(),
                    ..Default::default()
                }),
                None => Err(ProbeFailure::ConnectionFailed("dns error".into())),
            }
        }
    }

    fn table(entries: &[(&str, u16)]) -> HostTable {
        HostTable(entries.iter().map(|(h, s)| (h.to_string(), *s)).collect())
    }

    fn domains(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_only_200_is_live() {
        let prober = table(&[("a.example.com", 200), ("b.example.com", 403), ("c.example.com", 200)]);
        let mut live = filter_live(
            &prober,
            domains(&["a.example.com", "b.example.com", "c.example.com", "d.example.com"]),
            &CancellationToken::new(),
            &ProbeOptions::default(),
            4,
        )
        .await;
        live.sort();
        assert_eq!(live, domains(&["a.example.com", "c.example.com"]));
    }

    #[tokio::test]
    async fn test_all_failures_yield_empty() {
        let prober = table(&[]);
        let live = filter_live(&prober, domains(&["x.com", "y.com"]), &CancellationToken::new(), &ProbeOptions::default(), 2).await;
        assert!(live.is_empty());
    }

    #[tokio::test]
    async fn test_empty_input() {
        let prober = table(&[("a.com", 200)]);
        let live = filter_live(&prober, Vec::new(), &CancellationToken::new(), &ProbeOptions::default(), 2).await;
        assert!(live.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_excludes_without_error() {
        let prober = table(&[("a.com", 200)]);
        let token = CancellationToken::new();
        token.cancel();
        let live = filter_live(&prober, domains(&["a.com"]), &token, &ProbeOptions::default(), 2).await;
        assert!(live.is_empty());
    }

    #[tokio::test]
    async fn test_live_host_carries_ip() {
        let prober = table(&[("a.com", 200)]);
        let hosts = discover_live_hosts(&prober, domains(&["a.com"]), &CancellationToken::new(), &ProbeOptions::default(), 1).await;
        assert_eq!(hosts[0].ip, "192.0.2.1".parse().ok());
    }
}
