use std::sync::Arc;

use axum::{Router, routing::get, routing::post};
use tokio::net::TcpListener;
use tower_http::decompression::RequestDecompressionLayer;
use tracing::{error, info, warn};

use super::{
    services::{health, index, process_hashes},
    state::AppState,
};
use crate::config::Config;
use crate::processor::LocalProcessor;
use crate::startup::{self, ReadinessOutcome, ReadinessProbe};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// All routes, with state attached
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/process_hashes", post(process_hashes))
        .route("/health", get(health))
        .with_state(state)
        // gzip bodies are inflated; other encodings reach the handler untouched
        .layer(RequestDecompressionLayer::new().pass_through_unaccepted(true))
}

pub async fn run(config: Config) -> Result<(), AnyError> {
    if let Err(err) = startup::preflight(&config) {
        error!(severity = "critical", "{err}, exiting");
        return Err(err.into());
    }
    info!("Starting Pan-Tort");

    info!(path = %config.output.report_dir.display(), "Preparing report directory");
    tokio::fs::create_dir_all(&config.output.report_dir)
        .await
        .map_err(|e| format!("Failed to create report directory: {}", e))?;

    let processor = Arc::new(LocalProcessor::new(config.output.report_dir.clone()));
    let readiness = config.readiness.clone();
    let public_host = config.server.public_host.clone();
    let address = config.server.bind_addr;

    info!(
        elasticsearch = %format!("{}:{}", config.elasticsearch.host, config.elasticsearch.port),
        kibana = %config.kibana.base_url(),
        "Index store endpoints"
    );

    let state = AppState::new(config, processor);
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    let bound = listener.local_addr()?;
    info!(address = %bound, "Pan-Tort API listening");

    let probe = ReadinessProbe::from_config(&readiness, &public_host, bound.port()).spawn();

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    probe.cancel();
    match probe.wait().await {
        ReadinessOutcome::GaveUp { attempts } => {
            warn!(attempts, "Server never reported ready before shutdown")
        }
        outcome => info!(?outcome, "Readiness probe finished"),
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(%err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(%err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
