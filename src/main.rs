mod config;
mod diagrams;
mod handlers;
mod models;
mod parser;
mod router;
mod store;
mod utils;

use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use diagrams::render::{DiagramRenderer, GraphvizRenderer};
use store::Store;

/// Application state shared across handlers
pub struct AppState {
    pub store: Store,
    pub config: Config,
    pub renderer: Arc<dyn DiagramRenderer>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "config_melter=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let cfg = Config::load();
    tracing::info!("Starting ConfigMelter Server");
    tracing::info!("Diagrams Dir: {}", cfg.diagrams_dir);
    tracing::info!("Static Dir: {}", cfg.static_dir);
    tracing::info!("Listen: {}", cfg.listen_addr);

    tokio::fs::create_dir_all(&cfg.diagrams_dir).await?;
    check_graphviz(&cfg.dot_binary).await;

    // Create app state
    let state = Arc::new(AppState {
        store: Store::new(),
        config: cfg.clone(),
        renderer: Arc::new(GraphvizRenderer::new(&cfg.diagrams_dir, &cfg.dot_binary)),
    });

    // Build router
    let app = router::build(state, &cfg.static_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    tracing::info!("ConfigMelter listening on {}", cfg.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("ConfigMelter shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
}

/// Graphviz is optional at startup; without it uploads still produce Mermaid
/// markup but no images.
async fn check_graphviz(dot_binary: &str) {
    use tokio::process::Command;

    match Command::new(dot_binary).arg("-V").output().await {
        Ok(output) if output.status.success() => {
            // `dot -V` reports its version on stderr
            let version = String::from_utf8_lossy(&output.stderr);
            tracing::info!("Graphviz available: {}", version.trim());
        }
        Ok(output) => {
            tracing::warn!("{} -V exited with {}", dot_binary, output.status);
        }
        Err(e) => {
            tracing::warn!("Graphviz not available ({}): diagrams will not be rendered", e);
        }
    }
}
