pub mod api; // HTTP routes, middleware, server lifecycle
pub mod config;
pub mod consultation; // Analyze + roadmap flows
pub mod db;
pub mod knowledge; // Disease and roadmap tables
pub mod models;
pub mod scoring; // Candidate ranking

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::api::{start_server, ApiContext};
use crate::config::ServerConfig;
use crate::knowledge::KnowledgeBase;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Start the service and block until Ctrl-C.
pub async fn run() -> Result<(), String> {
    init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let settings = ServerConfig::from_env()?;

    // Creates the file and tables on first run; request handlers open their own connections.
    db::open_database(&settings.db_path)
        .map_err(|e| format!("Cannot open database {}: {e}", settings.db_path.display()))?;

    let knowledge = Arc::new(KnowledgeBase::builtin());
    tracing::info!(
        diseases = knowledge.diseases().len(),
        db = %settings.db_path.display(),
        "Knowledge base loaded"
    );

    let ctx = ApiContext::new(settings.db_path.clone(), knowledge);
    let mut server = start_server(ctx, settings.bind_addr).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {e}");
    }
    server.shutdown();
    server.wait().await;

    Ok(())
}
