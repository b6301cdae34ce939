use std::sync::Arc;

use tracing::info;

use crate::api;
use crate::cli::commands::{GlobalOpts, ServeArgs};
use crate::cli::context::{load_config, open_store};
use crate::db::KeyValueStore;
use crate::errors::ReconError;
use crate::pipeline::{InputValues, PipelineInputs, ScanPipeline};
use crate::queue::{QueueOptions, ScanQueue};

pub async fn handle_serve(args: ServeArgs, global: GlobalOpts) -> Result<(), ReconError> {
    let config = load_config(&global).await?;
    let store: Arc<dyn KeyValueStore> = open_store(&global, &config)?;

    let mut inputs = PipelineInputs::from_config(&config);
    inputs.overrides = InputValues {
        api_key: args.api_key.clone(),
        wordlist: args.wordlist.clone(),
    };
    let pipeline = Arc::new(ScanPipeline::from_config(store.clone(), &config, inputs)?);
    let queue = ScanQueue::new(store.clone(), pipeline, QueueOptions::from(&config));
    let queue_handle = queue.start()?;

    let app = api::build_router(api::AppState::new(store, queue.clone()));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(host = %args.host, port = args.port, "Listening on {}", addr);

    let shutdown_queue = queue.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
            shutdown_queue.shutdown();
        })
        .await
        .map_err(|e| ReconError::Internal(format!("Server error: {}", e)))?;

    queue.shutdown();
    let _ = queue_handle.await;
    Ok(())
}
