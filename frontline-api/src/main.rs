//! Frontline News Aggregator API Server
//!
//! Serves cached per-platform news listings, category summaries and the
//! image proxy.

use std::net::SocketAddr;
use std::sync::Arc;

use frontline_api::{config::AppConfig, router, AppState};
use frontline_services::{spawn_sweeper, PlatformRegistry};
use frontline_sources::{builtin_adapters, HttpFetcher};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,frontline_api=debug")),
        )
        .init();

    info!("Starting Frontline news aggregator API");

    let config = AppConfig::from_env();
    let http = HttpFetcher::with_timeout(config.news.fetch_timeout);

    // Registration happens once, before any request is served
    let registry = PlatformRegistry::from_adapters(builtin_adapters(&http, &config.endpoints))?;
    info!(
        "Registered {} platforms: {}",
        registry.len(),
        registry.registered().into_iter().collect::<Vec<_>>().join(", ")
    );

    if config.image.secret.is_some() {
        info!("Image proxy timestamp check enabled");
    }

    let state = AppState::new(&config, registry, Arc::new(http));

    let sweepers = match config.sweep_interval {
        Some(every) => {
            info!("Cache sweepers running every {:?}", every);
            vec![
                spawn_sweeper(
                    Arc::clone(state.aggregator.cache()),
                    config.news.cache_ttl,
                    every,
                    "news",
                ),
                spawn_sweeper(
                    Arc::clone(state.summaries.cache()),
                    config.summary_cache_ttl,
                    every,
                    "summary",
                ),
                spawn_sweeper(
                    Arc::clone(state.images.cache()),
                    config.image.cache_ttl,
                    every,
                    "image",
                ),
            ]
        }
        None => Vec::new(),
    };

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    for sweeper in sweepers {
        sweeper.shutdown().await;
    }
    info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
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
