use std::process::ExitCode;

use tracing::{error, info, warn};

use transit_server::config::ServerConfig;
use transit_server::knowledge::KnowledgeStore;
use transit_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let store = match KnowledgeStore::new(config.data.clone()) {
        Ok(store) => store,
        Err(e) => {
            error!("failed to create data loader: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Serve even if the first load fails; routes answer 503 until a reload works.
    match store.reload().await {
        Ok(summary) => info!(
            source = %config.data,
            stations = summary.stations,
            connections = summary.connections,
            rules = summary.rules,
            warnings = summary.warnings,
            "network loaded"
        ),
        Err(e) => warn!(source = %config.data, "initial load failed, starting unloaded: {e}"),
    }

    let state = AppState::new(store, config.search.clone(), &config.cache);

    // Spawn background task to reload the network periodically
    if let Some(period) = config.reload_interval {
        let state = state.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                match state.store.reload().await {
                    Ok(summary) => {
                        state.cache.invalidate_all();
                        info!(generation = summary.generation, "periodic reload complete");
                    }
                    Err(e) => warn!("periodic reload failed: {e}"),
                }
            }
        });
    }

    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(config.bind).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(bind = %config.bind, "failed to bind: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("Transit Route Planner listening on http://{}", config.bind);
    info!("  GET  /              - Route form");
    info!("  GET  /health        - Health check");
    info!("  GET  /stations      - Station list");
    info!("  POST /route         - Plan a route");
    info!("  POST /admin/reload  - Reload network data");

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
