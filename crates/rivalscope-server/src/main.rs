mod api;
mod jobs;
mod middleware;
mod scheduler;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use rivalscope_analyzer::Analyzer;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    jobs::{JobStore, MemoryJobStore, Orchestrator, OrchestratorSettings},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(rivalscope_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if !config.has_model_api_key() {
        tracing::warn!(
            "RIVALSCOPE_MODEL_API_KEY not set; analyses will fail until a key is configured"
        );
    }

    let analyzer = Arc::new(Analyzer::from_config(&config)?);
    let store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
    let orchestrator = Arc::new(Orchestrator::new(
        analyzer,
        Arc::clone(&store),
        OrchestratorSettings::from_config(&config),
    ));

    let _scheduler = scheduler::build_scheduler(store, config.job_ttl()).await?;

    let app = build_app(AppState {
        orchestrator,
        config: Arc::clone(&config),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "server: listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
