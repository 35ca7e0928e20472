use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};

use revdash::chat::{ChatService, MessageStore, RoomRegistry};
use revdash::web::{AppState, WebServer};
use revdash::{Config, Database};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load .env: {e}");
        }
    }

    // Load configuration
    let config = match Config::load_with_env(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {CONFIG_PATH}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = revdash::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        revdash::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    info!("revdash - review dashboard and pull request chat");

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!(path = %config.database.path, "Failed to open database: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(path = %config.database.path, "Message store ready");

    let chat = ChatService::new(
        MessageStore::new(db.pool().clone()),
        Arc::new(RoomRegistry::new()),
    );

    let state = match AppState::new(chat, &config) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to build API clients: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if !state.coderabbit.has_api_key() {
        warn!("CODERABBIT_API_KEY not set; reports are served from mock data");
    }
    if !state.github.has_token() {
        warn!("GITHUB_TOKEN not set; GitHub endpoints will fail");
    }

    let server = match WebServer::new(&config.server, &config.web, state) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = server.run(shutdown_signal()).await;
    db.close().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Web server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
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
    info!("Shutting down");
}
