//! Gatehouse Server: browser login through GitHub OAuth with server-side
//! sessions.
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use gatehouse_api::{AppState, build_router};
use gatehouse_auth::{
    GitHubProvider, IdentityProvider, MemorySessionStore, SessionProvider, SessionSweeper,
};
use gatehouse_core::config::{AppConfig, OAuthConfig};
use gatehouse_core::error::AppError;
use gatehouse_core::traits::{Clock, SystemClock};

/// Command-line options.
#[derive(Debug, Parser)]
#[command(name = "gatehouse-server", version, about = "GitHub OAuth login with server-side sessions")]
struct Cli {
    /// Configuration overlay to load from `config/<env>.toml`
    #[arg(long, default_value = "development")]
    env: String,

    /// Address to listen on, overriding `server.host` and `server.port`
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Public hostname used to build the OAuth callback URL
    #[arg(long)]
    hostname: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from files, environment, and command-line overrides.
fn load_configuration(cli: &Cli) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load(&cli.env)?;

    if let Some(addr) = cli.addr {
        config.server.host = addr.ip().to_string();
        config.server.port = addr.port();
    }
    if let Some(hostname) = &cli.hostname {
        config.oauth.redirect_url = OAuthConfig::callback_for_host(hostname);
    }

    if config.oauth.client_id.is_empty() {
        config.oauth.client_id = std::env::var("GITHUB_CLIENT_ID").unwrap_or_default();
    }
    if config.oauth.client_secret.is_empty() {
        config.oauth.client_secret = std::env::var("GITHUB_CLIENT_SECRET").unwrap_or_default();
    }

    config.validate()?;
    Ok(config)
}

/// Initialize tracing/logging. `RUST_LOG` wins over `logging.level`.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let builder = fmt().with_env_filter(filter).with_target(true);

    match config.logging.format.as_str() {
        "json" => builder.json().with_current_span(false).init(),
        "pretty" => builder.pretty().init(),
        other => {
            builder.compact().init();
            tracing::warn!(format = other, "Unknown logging.format, using compact output");
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Gatehouse");

    // ── Step 1: Session store ────────────────────────────────────
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let sessions: Arc<dyn SessionProvider> = Arc::new(MemorySessionStore::with_clock(
        &config.session,
        Arc::clone(&clock),
    ));
    tracing::info!(
        max_sessions = config.session.max_sessions,
        ttl_hours = config.session.ttl_hours,
        "Session store initialized"
    );

    // ── Step 2: Identity provider ────────────────────────────────
    let identity: Arc<dyn IdentityProvider> = Arc::new(GitHubProvider::with_clock(
        config.oauth.clone(),
        Arc::clone(&clock),
    )?);
    tracing::info!(
        provider = identity.name(),
        redirect_url = %config.oauth.redirect_url,
        "Identity provider initialized"
    );

    // ── Step 3: Shutdown channel & sweeper ───────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweeper = SessionSweeper::new(
        Arc::clone(&sessions),
        Duration::from_secs(config.session.cleanup_interval_seconds),
    );
    let sweeper_handle = tokio::spawn(sweeper.run(shutdown_rx));

    // ── Step 4: Build and start HTTP server ──────────────────────
    let addr = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let app = build_router(AppState::new(config, sessions, identity, clock));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(addr = %addr, "Gatehouse listening");

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 5: Wait for background tasks ────────────────────────
    if tokio::time::timeout(grace, sweeper_handle).await.is_err() {
        tracing::warn!("Session sweeper did not stop within the grace period");
    }

    tracing::info!("Gatehouse shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
