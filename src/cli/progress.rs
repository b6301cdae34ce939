use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::queue::QueueEvent;
use crate::utils::formatting::{format_duration, pluralize};

/// Spinner that follows queue events while `scan` runs.
pub struct ScanProgress {
    bar: ProgressBar,
    started: Instant,
    completed: usize,
    findings: usize,
}

impl ScanProgress {
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message("Waiting for queue...");
        bar.enable_steady_tick(Duration::from_millis(120));

        Self {
            bar,
            started: Instant::now(),
            completed: 0,
            findings: 0,
        }
    }

    pub fn handle_event(&mut self, event: &QueueEvent) {
        match event {
            QueueEvent::ScanStarted { domain } => {
                self.bar.set_message(format!("Scanning {}", style(domain).bold()));
            }
            QueueEvent::ScanCompleted { domain, results } => {
                self.completed += 1;
                let findings: usize = results.iter().map(|r| r.total_findings()).sum();
                self.findings += findings;
                self.bar.println(format!(
                    "  {} {} ({}, {})",
                    style("✓").green(),
                    domain,
                    pluralize(results.len(), "live host", "live hosts"),
                    pluralize(findings, "finding", "findings"),
                ));
            }
            QueueEvent::ScanFailed { domain, error } => {
                self.bar.println(format!("  {} {}: {}", style("✗").red(), domain, error));
            }
            QueueEvent::ScanCancelled { domain } => {
                self.bar.println(format!("  {} {} cancelled", style("-").yellow(), domain));
            }
            QueueEvent::QueueChanged { current, pending } => {
                if current.is_none() && !pending.is_empty() {
                    self.bar.set_message(format!("{} waiting", pluralize(pending.len(), "domain", "domains")));
                }
            }
            QueueEvent::Queued { .. } | QueueEvent::Idle => {}
        }
    }

    pub fn finish(&self) {
        let elapsed = self.started.elapsed().as_millis() as u64;
        self.bar.finish_and_clear();
        if !self.bar.is_hidden() {
            eprintln!(
                "  {} {} scanned, {} in {}",
                style("Done:").bold(),
                pluralize(self.completed, "domain", "domains"),
                pluralize(self.findings, "finding", "findings"),
                format_duration(elapsed),
            );
        }
    }
}
