pub mod executor;
pub mod headers;

use std::collections::HashMap;
use std::net::IpAddr;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::ProbeConfig;

pub use executor::HttpProber;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOptions {
    pub follow_redirects: bool,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self { follow_redirects: true }
    }
}

impl From<&ProbeConfig> for ProbeOptions {
    fn from(config: &ProbeConfig) -> Self {
        Self { follow_redirects: config.follow_redirects }
    }
}

/// Any HTTP response, whatever its status.
#[derive(Debug, Clone, Default)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: Option<String>,
    pub headers: HashMap<String, String>,
    pub remote_addr: Option<IpAddr>,
}

impl ProbeResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}

/// Why a probe produced no response. `Cancelled` must short-circuit callers;
/// the other two are ordinary per-probe failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeFailure {
    #[error("cancelled")]
    Cancelled,
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("timed out")]
    Timeout,
}

impl ProbeFailure {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProbeFailure::Cancelled)
    }
}

/// Issues one outbound GET. Implementations hold no per-domain state and
/// never retry.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(
        &self,
        url: &str,
        options: &ProbeOptions,
        cancel: &CancellationToken,
    ) -> Result<ProbeResponse, ProbeFailure>;
}
