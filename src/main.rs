//! Blog web server.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌───────────────────────────────────────────────────────┐
//!                  │                      BLOG SERVER                       │
//!                  │                                                        │
//!   Client Request │  ┌──────────┐   ┌──────────────┐   ┌──────────────┐   │
//!   ───────────────┼─▶│  axum +  │──▶│  middleware  │──▶│  dispatcher  │   │
//!                  │  │tower-http│   │    chain     │   │ + route table│   │
//!                  │  └──────────┘   └──────────────┘   └──────┬───────┘   │
//!                  │       │ /css /js                          │           │
//!                  │       ▼                                   ▼           │
//!                  │  ┌──────────┐                     ┌──────────────┐    │
//!                  │  │ ServeDir │                     │ controllers  │    │
//!                  │  └──────────┘                     │ + views      │    │
//!                  │                                   └──────┬───────┘    │
//!                  │                                          ▼            │
//!                  │                          ┌──────────────────────────┐ │
//!                  │                          │ stores (articles, users, │ │
//!                  │                          │ sessions)                │ │
//!                  │                          └──────────────────────────┘ │
//!                  └───────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use blog_server::config::{load_config, validate_config, BlogConfig, ConfigError};
use blog_server::lifecycle::{signals, Shutdown};
use blog_server::observability::{logging, metrics};
use blog_server::session::SessionReaper;
use blog_server::{AppState, Application, HttpServer};
use clap::Parser;
use tokio::net::TcpListener;

#[derive(Debug, Parser)]
#[command(name = "blog-server", version, about = "Serve the blog")]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

fn resolve_config(cli: &Cli) -> Result<BlogConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BlogConfig::default(),
    };
    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    logging::init_logging(&config.observability);
    tracing::info!("blog-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        public_dir = %config.assets.public_dir,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    // Routes are registered and frozen before the listener exists.
    let state = AppState::in_memory(&config);
    let sessions = state.sessions.clone();
    let application = Application::build(&config, state)?;
    let server = HttpServer::new(&config, application.into_endpoint());

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::termination().await;
        trigger.trigger();
    });

    if config.session.idle_timeout_secs > 0 {
        let interval = Duration::from_secs(config.session.purge_interval_secs);
        let reaper = SessionReaper::new(sessions, interval);
        tokio::spawn(reaper.run(shutdown.subscribe()));
    }

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
