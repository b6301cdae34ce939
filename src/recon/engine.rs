use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use rand::seq::SliceRandom;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::ReconConfig;
use crate::errors::ReconError;
use crate::models::Finding;
use crate::probe::{ProbeOptions, Prober};
use crate::utils::https_url;
use crate::wordlist::{Wordlist, WordlistEntry};
use super::matcher::LoweredBody;

#[derive(Debug, Clone, Copy)]
pub struct ReconOptions {
    /// Probes in flight at once for one host.
    pub batch_size: usize,
    pub randomize_order: bool,
    pub probe: ProbeOptions,
}

impl Default for ReconOptions {
    fn default() -> Self {
        Self::from(&ReconConfig::default())
    }
}

impl From<&ReconConfig> for ReconOptions {
    fn from(config: &ReconConfig) -> Self {
        let scan = config.scan();
        Self {
            batch_size: scan.batch_size.max(1),
            randomize_order: scan.randomize_order,
            probe: ProbeOptions::from(&config.probe()),
        }
    }
}

/// Probes every wordlist path on one host and turns matching responses into
/// findings.
pub struct ReconEngine {
    prober: Arc<dyn Prober>,
    options: ReconOptions,
}

impl ReconEngine {
    pub fn new(prober: Arc<dyn Prober>, options: ReconOptions) -> Self {
        Self { prober, options }
    }

    /// Findings come back in wordlist order, one per `(path, type)`.
    /// Per-path failures are skipped; only cancellation aborts the scan.
    pub async fn scan(
        &self,
        domain: &str,
        wordlist: &Wordlist,
        cancel: &CancellationToken,
    ) -> Result<Vec<Finding>, ReconError> {
        let entries = wordlist.entries();
        let mut order: Vec<usize> = (0..entries.len()).collect();
        if self.options.randomize_order {
            order.shuffle(&mut rand::thread_rng());
        }

        let probe_options = self.options.probe;
        let mut hits: Vec<(usize, Finding)> = Vec::new();
        let mut failures = 0usize;

        for batch in order.chunks(self.options.batch_size.max(1)) {
            if cancel.is_cancelled() {
                return Err(ReconError::Cancelled);
            }

            let probes = batch.iter().map(|&idx| {
                let entry = &entries[idx];
                let url = https_url(domain, &entry.path);
                let probe_options = &probe_options;
                async move { (idx, self.prober.probe(&url, probe_options, cancel).await) }
            });
            let mut outcomes = join_all(probes).await;
            outcomes.sort_by_key(|(idx, _)| *idx);

            for (idx, outcome) in outcomes {
                let entry = &entries[idx];
                match outcome {
                    Ok(resp) if resp.is_ok() => {
                        if LoweredBody::new(resp.body()).matches(entry) {
                            debug!(domain, path = %entry.path, "Path matched");
                            hits.push((idx, finding_for(entry)));
                        }
                    }
                    Ok(_) => {}
                    Err(e) if e.is_cancelled() => return Err(ReconError::Cancelled),
                    Err(e) => {
                        failures += 1;
                        debug!(domain, path = %entry.path, error = %e, "Probe failed, skipping path");
                    }
                }
            }
        }

        if cancel.is_cancelled() {
            return Err(ReconError::Cancelled);
        }

        let findings = dedup_in_order(hits);
        info!(
            domain,
            probes = entries.len(),
            failures,
            findings = findings.len(),
            "Recon finished"
        );
        Ok(findings)
    }
}

fn finding_for(entry: &WordlistEntry) -> Finding {
    Finding {
        path: entry.path.clone(),
        finding_type: entry.finding_type(),
        severity: entry.severity,
        details: entry.description.clone(),
    }
}

/// Sort by wordlist position, then keep the first finding per key.
fn dedup_in_order(mut hits: Vec<(usize, Finding)>) -> Vec<Finding> {
    hits.sort_by_key(|(idx, _)| *idx);
    let mut seen = HashSet::new();
    hits.into_iter()
        .map(|(_, f)| f)
        .filter(|f| seen.insert((f.path.clone(), f.finding_type)))
        .collect()
}
