use console::{style, StyledObject};

use crate::models::{Finding, HistoryItem, ScanResult, ScanStatus, Severity};
use crate::utils::formatting::pluralize;

fn styled_status(status: ScanStatus) -> StyledObject<&'static str> {
    match status {
        ScanStatus::Vulnerable => style("Vulnerable").red().bold(),
        ScanStatus::PotentiallyVulnerable => style("Potentially vulnerable").yellow().bold(),
        ScanStatus::Scanned => style("Scanned").cyan(),
        ScanStatus::Secure => style("Secure").green(),
    }
}

fn styled_severity(severity: Severity) -> StyledObject<&'static str> {
    let name = severity.display_name();
    match severity {
        Severity::Critical => style(name).red().bold(),
        Severity::High => style(name).red(),
        Severity::Medium => style(name).yellow(),
        Severity::Low => style(name).cyan(),
        Severity::Info => style(name).dim(),
    }
}

/// Most severe first; equal severities keep their scan order.
fn by_severity(findings: &[Finding]) -> Vec<&Finding> {
    let mut ordered: Vec<&Finding> = findings.iter().collect();
    ordered.sort_by_key(|f| f.severity.rank());
    ordered
}

pub fn print_results(root_domain: &str, results: &[ScanResult]) {
    println!();
    println!("{}", style(root_domain).bold().underlined());
    if results.is_empty() {
        println!("  {}", style("No live hosts").dim());
        return;
    }
    for result in results {
        let ip = result.ip().map(|ip| format!(" [{}]", ip)).unwrap_or_default();
        println!("  {}{}  {}", result.domain(), style(ip).dim(), styled_status(result.status()));
        for finding in by_severity(result.findings()) {
            println!(
                "    {:<10} {:<18} {}  {}",
                styled_severity(finding.severity),
                finding.finding_type,
                finding.path,
                style(&finding.details).dim(),
            );
        }
    }
}

pub fn print_history_table(items: &[HistoryItem]) {
    if items.is_empty() {
        println!("No scan history.");
        return;
    }
    println!("{:<32} {:<22} {:>6} {:>9}", "ROOT DOMAIN", "SCANNED AT", "HOSTS", "FINDINGS");
    for item in items {
        println!(
            "{:<32} {:<22} {:>6} {:>9}",
            item.root_domain,
            item.scanned_at.format("%Y-%m-%d %H:%M UTC"),
            item.results.len(),
            item.total_findings(),
        );
    }
    println!("\n{}", pluralize(items.len(), "entry", "entries"));
}

pub fn print_history_item(item: &HistoryItem) {
    println!(
        "Scanned {} at {}",
        style(&item.root_domain).bold(),
        item.scanned_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    print_results(&item.root_domain, &item.results);
}
