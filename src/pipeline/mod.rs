pub mod runner;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::errors::ReconError;
use crate::models::ScanOutput;

pub use runner::{InputValues, PipelineInputs, ScanPipeline};

/// Runs the full scan for one root domain. The queue only depends on this.
#[async_trait]
pub trait DomainScanner: Send + Sync {
    async fn scan(&self, root_domain: &str, cancel: &CancellationToken) -> Result<ScanOutput, ReconError>;
}
