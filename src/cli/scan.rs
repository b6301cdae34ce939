use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use console::style;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::cli::commands::{GlobalOpts, ScanArgs};
use crate::cli::context::{load_config, open_store};
use crate::cli::output::print_results;
use crate::cli::progress::ScanProgress;
use crate::db::KeyValueStore;
use crate::errors::ReconError;
use crate::models::ScanResult;
use crate::pipeline::{InputValues, PipelineInputs, ScanPipeline};
use crate::queue::{Admission, QueueEvent, QueueOptions, ScanQueue};

pub async fn handle_scan(args: ScanArgs, global: GlobalOpts) -> Result<(), ReconError> {
    let config = load_config(&global).await?;
    let store: Arc<dyn KeyValueStore> = open_store(&global, &config)?;

    let mut inputs = PipelineInputs::from_config(&config);
    inputs.overrides = InputValues {
        api_key: args.api_key.clone(),
        wordlist: args.wordlist.clone(),
    };
    let pipeline = Arc::new(ScanPipeline::from_config(store.clone(), &config, inputs)?);

    let mut options = QueueOptions::from(&config);
    if args.force {
        options.skip_previously_scanned = false;
    }
    let queue = ScanQueue::new(store, pipeline, options);
    let mut events = queue.subscribe();
    let handle = queue.start()?;

    let mut queued = 0usize;
    for target in &args.targets {
        match queue.enqueue(target) {
            Admission::Queued { .. } => queued += 1,
            Admission::Rejected { reason } => {
                if !global.quiet {
                    eprintln!("  {} {}: {}", style("skip").yellow(), target, reason);
                }
            }
        }
    }

    if queued == 0 {
        queue.shutdown();
        let _ = handle.await;
        return Ok(());
    }
    info!(queued, "Scanning");

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let queue = queue.clone();
        let interrupted = interrupted.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                interrupted.store(true, Ordering::SeqCst);
                let cleared = queue.cancel_all();
                warn!(cleared, "Interrupted, cancelling scans");
            }
        });
    }

    let mut progress = ScanProgress::new(global.quiet || args.json);
    let mut completed: Vec<(String, Vec<ScanResult>)> = Vec::new();
    let mut failed = 0usize;

    let mut record = |event: QueueEvent, progress: &mut ScanProgress| {
        progress.handle_event(&event);
        match event {
            QueueEvent::ScanCompleted { domain, results } => completed.push((domain, results)),
            QueueEvent::ScanFailed { .. } => failed += 1,
            _ => {}
        }
    };

    loop {
        tokio::select! {
            biased;
            event = events.recv() => match event {
                Ok(event) => record(event, &mut progress),
                Err(RecvError::Lagged(n)) => warn!(skipped = n, "Progress fell behind"),
                Err(RecvError::Closed) => break,
            },
            _ = queue.wait_idle() => break,
        }
    }
    while let Ok(event) = events.try_recv() {
        record(event, &mut progress);
    }
    progress.finish();

    queue.shutdown();
    let _ = handle.await;

    if args.json {
        let out: Vec<serde_json::Value> = completed
            .iter()
            .map(|(domain, results)| serde_json::json!({ "root_domain": domain, "results": results }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for (domain, results) in &completed {
            print_results(domain, results);
        }
    }

    if interrupted.load(Ordering::SeqCst) {
        return Err(ReconError::Cancelled);
    }
    if failed > 0 && completed.is_empty() {
        return Err(ReconError::Internal(format!("{} scan(s) failed", failed)));
    }
    Ok(())
}
