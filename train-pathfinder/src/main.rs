use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use train_pathfinder::network::Network;
use train_pathfinder::planner::SearchConfig;
use train_pathfinder::predict::{LinearPredictor, NeutralPredictor};
use train_pathfinder::web::{AppState, create_router};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr: SocketAddr = std::env::var("PATHFINDER_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .expect("PATHFINDER_ADDR is not a socket address");

    // Load the corridor (fail fast if a fixture is given but unusable)
    let network = match std::env::var("PATHFINDER_NETWORK") {
        Ok(path) => {
            let network = Network::load(&path).expect("Failed to load network");
            info!(%path, "loaded network");
            network
        }
        Err(_) => {
            warn!("PATHFINDER_NETWORK not set, using demo corridor");
            Network::demo_corridor().expect("Failed to build demo corridor")
        }
    };
    info!(
        sections = network.sections().count(),
        up = network.routes().up.len(),
        down = network.routes().down.len(),
        "network ready"
    );

    let config = SearchConfig::default();
    let router = match std::env::var("PATHFINDER_PREDICTOR") {
        Ok(path) => {
            let predictor = LinearPredictor::load(&path).expect("Failed to load predictor");
            info!(%path, "loaded linear predictor");
            create_router(AppState::new(network, predictor, config))
        }
        Err(_) => {
            info!("PATHFINDER_PREDICTOR not set, scoring every path as neutral");
            create_router(AppState::new(network, NeutralPredictor::default(), config))
        }
    };

    info!("Train path planner listening on http://{addr}");
    info!("API Endpoints:");
    info!("  GET  /health            - Health check");
    info!("  GET  /network           - Corridor sections and routes");
    info!("  POST /paths/search      - Search for a conflict-free path");
    info!("  POST /paths/conflicts   - Audit a path against existing traffic");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
