use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use common::utils::logging::init_logging_default;
use queue::consumer::start_consumers;
use queue::{InMemoryBroker, QueueRelay};
use service::pricing::ComponentCatalog;

use crate::routes;
use crate::state::AppState;

fn build_cors(cfg: &configs::CorsConfig) -> CorsLayer {
    match cfg.origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new().allow_origin(origin).allow_methods(Any).allow_headers(Any),
        Err(_) => CorsLayer::very_permissive(),
    }
}

fn catalog_base_url() -> String {
    std::env::var("SERVICE_TYPE_API_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// Public entry: build the app and run the HTTP server plus the queue
/// consumers, shutting both down gracefully on SIGINT/SIGTERM.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_default();

    let cfg = configs::AppConfig::load_and_validate()?;

    let db = models::db::connect_with(&cfg.database).await?;

    // the broker seam is trait-based; this deployment runs the in-process
    // broker, so queue.url is only advisory here
    info!(queue_url = %cfg.queue.url, "starting in-process message broker");
    let broker = Arc::new(InMemoryBroker::new());
    let relay = QueueRelay::new(broker, &cfg.queue);
    let consumer_handles = start_consumers(Arc::clone(&relay), db.clone());

    let state = AppState {
        db,
        relay: Arc::clone(&relay),
        catalog: Arc::new(ComponentCatalog::new(catalog_base_url())),
        production: cfg.env.is_production(),
    };

    let cors = build_cors(&cfg.cors);
    let app = routes::build_router(state, cors);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting server");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    // stop the relay, which winds the consumer loops down
    relay.close().await;
    for handle in consumer_handles {
        let _ = handle.await;
    }
    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
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
    info!("shutdown signal received");
}
