// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use fra_atlas_server::recommend::HttpCompletionProvider;
use fra_atlas_server::{build_router, AppState, ServerConfig};
use fra_atlas_store::Database;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable; waiting for ctrl-c");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cfg = ServerConfig::from_env();
    init_tracing(cfg.log_json);

    let db = Database::open(cfg.db.clone()).map_err(|e| format!("database open failed: {e}"))?;
    if cfg.llm.api_key.is_none() {
        warn!("FRA_LLM_API_KEY not set; recommendations will use the fallback list");
    }
    let provider = Arc::new(
        HttpCompletionProvider::new(&cfg.llm).map_err(|e| format!("llm client setup failed: {e}"))?,
    );
    let state = AppState::new(db.clone(), cfg.api.clone(), provider);
    let app = build_router(state);

    let listener = TcpListener::bind(&cfg.bind)
        .await
        .map_err(|e| format!("bind {} failed: {e}", cfg.bind))?;
    info!(bind = %cfg.bind, db = %cfg.db.path.display(), "fra-atlas-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))?;
    db.close();
    info!("fra-atlas-server stopped");
    Ok(())
}
