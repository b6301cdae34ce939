use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{redirect, Client};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::config::ProbeConfig;
use crate::errors::ReconError;
use crate::utils::truncation::{truncate_body, truncate_error};
use super::headers::browser_headers;
use super::{ProbeFailure, ProbeOptions, ProbeResponse, Prober};

/// [`Prober`] over reqwest. Both clients share the same header set and
/// timeout; they differ only in redirect policy.
#[derive(Clone)]
pub struct HttpProber {
    following: Client,
    direct: Client,
}

impl HttpProber {
    pub fn new(config: &ProbeConfig) -> Result<Self, ReconError> {
        let following = Self::build_client(config, redirect::Policy::limited(config.max_redirects))?;
        let direct = Self::build_client(config, redirect::Policy::none())?;
        Ok(Self { following, direct })
    }

    fn build_client(config: &ProbeConfig, policy: redirect::Policy) -> Result<Client, ReconError> {
        Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(browser_headers())
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(policy)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ReconError::Internal(format!("Failed to build HTTP client: {}", e)))
    }

    fn client(&self, options: &ProbeOptions) -> &Client {
        if options.follow_redirects {
            &self.following
        } else {
            &self.direct
        }
    }

    async fn fetch(&self, url: reqwest::Url, options: &ProbeOptions) -> Result<ProbeResponse, ProbeFailure> {
        let resp = self.client(options).get(url).send().await.map_err(classify)?;

        let status = resp.status().as_u16();
        let remote_addr = resp.remote_addr().map(|a| a.ip());
        let headers: HashMap<String, String> = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();

        let body = match resp.text().await {
            Ok(text) => Some(truncate_body(text)),
            Err(e) if e.is_timeout() => return Err(ProbeFailure::Timeout),
            Err(e) => {
                trace!(error = %e, "Response body unreadable");
                None
            }
        };

        Ok(ProbeResponse { status, body, headers, remote_addr })
    }
}

fn classify(err: reqwest::Error) -> ProbeFailure {
    if err.is_timeout() {
        ProbeFailure::Timeout
    } else {
        ProbeFailure::ConnectionFailed(truncate_error(&err.to_string()))
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(
        &self,
        url: &str,
        options: &ProbeOptions,
        cancel: &CancellationToken,
    ) -> Result<ProbeResponse, ProbeFailure> {
        if cancel.is_cancelled() {
            return Err(ProbeFailure::Cancelled);
        }

        let parsed = match reqwest::Url::parse(url) {
            Ok(u) if matches!(u.scheme(), "http" | "https") && u.host_str().is_some() => u,
            _ => return Err(ProbeFailure::ConnectionFailed("invalid url".into())),
        };

        // Dropping the request future aborts the connection.
        let outcome = tokio::select! {
            _ = cancel.cancelled() => Err(ProbeFailure::Cancelled),
            res = self.fetch(parsed, options) => res,
        };

        match &outcome {
            Ok(resp) => debug!(url, status = resp.status, "Probe completed"),
            Err(ProbeFailure::Cancelled) => trace!(url, "Probe cancelled"),
            Err(e) => debug!(url, error = %e, "Probe failed"),
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prober() -> HttpProber {
        HttpProber::new(&ProbeConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_probe_rejects_relative_url() {
        let token = CancellationToken::new();
        let err = prober()
            .probe("/admin", &ProbeOptions::default(), &token)
            .await
            .unwrap_err();
        assert_eq!(err, ProbeFailure::ConnectionFailed("invalid url".into()));
    }

    #[tokio::test]
    async fn test_probe_rejects_non_http_scheme() {
        let token = CancellationToken::new();
        let err = prober()
            .probe("ftp://example.com/", &ProbeOptions::default(), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeFailure::ConnectionFailed(_)));
    }

    #[tokio::test]
    async fn test_probe_cancelled_before_call() {
        let token = CancellationToken::new();
        token.cancel();
        let err = prober()
            .probe("https://example.com/", &ProbeOptions::default(), &token)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_probe_response_ok_only_on_200() {
        let mut resp = ProbeResponse { status: 200, ..Default::default() };
        assert!(resp.is_ok());
        resp.status = 301;
        assert!(!resp.is_ok());
        assert_eq!(resp.body(), "");
    }
}
