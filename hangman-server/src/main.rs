use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

use hangman_persistence::{SnapshotRepository, connect_and_migrate};
use hangman_server::{
    config::Config, create_routes, library::SharedLibrary, registry::SessionRegistry,
};
use hangman_types::MatchSettings;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting hangman server...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize database connection and run migrations
    let db = match connect_and_migrate(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };
    let repository = SnapshotRepository::new(db);
    match repository.missing_keys().await {
        Ok(missing) if !missing.is_empty() => {
            let names: Vec<&str> = missing.iter().map(|key| key.as_str()).collect();
            info!("No stored snapshot for {}, using defaults", names.join(", "));
        }
        Ok(_) => {}
        Err(e) => warn!("Failed to list stored snapshots: {:#}", e),
    }
    let library = Arc::new(SharedLibrary::load(Arc::new(repository)).await);
    let registry = Arc::new(SessionRegistry::new());

    let settings = MatchSettings {
        difficulty: config.difficulty,
        target_wins: config.target_wins,
        ..MatchSettings::default()
    };

    let routes = create_routes(
        registry.clone(),
        library,
        settings,
        Arc::new(config.admin_password.clone()),
    );

    // Start cleanup task
    let cleanup_registry = registry.clone();
    let session_timeout = Duration::from_secs(config.session_timeout_seconds);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30));
        loop {
            interval.tick().await;
            let removed = cleanup_registry.cleanup_inactive(session_timeout);
            if removed > 0 {
                info!("Cleaned up {} inactive sessions", removed);
            }
        }
    });

    let host = match config.host.parse::<std::net::IpAddr>() {
        Ok(host) => host,
        Err(e) => {
            error!("Invalid HOST {}: {}", config.host, e);
            std::process::exit(1);
        }
    };
    info!("Server starting on {}:{}", host, config.port);

    let (addr, server) =
        warp::serve(routes).bind_with_graceful_shutdown((host, config.port), shutdown_signal());

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}

/// Resolves on SIGINT or SIGTERM (Ctrl+C elsewhere).
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let (mut sigint, mut sigterm) = match (
            signal::unix::signal(signal::unix::SignalKind::interrupt()),
            signal::unix::signal(signal::unix::SignalKind::terminate()),
        ) {
            (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
            _ => {
                error!("Failed to install signal handlers");
                std::future::pending::<()>().await;
                return;
            }
        };

        tokio::select! {
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down gracefully...");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for ctrl+c: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down gracefully...");
    }
}
