//! stnts - HTTP server for a personal new tab page.

use std::path::PathBuf;

use axum::http::Request;
use clap::Parser;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use stnts::{AppState, Config, Site, router};

/// stnts - a tiny new tab server.
#[derive(Parser, Debug)]
#[command(name = "stnts")]
#[command(about = "Serve a personal new tab page of links", long_about = None)]
struct Args {
    /// host:port address to listen on (overrides STNTS_ADDR).
    #[arg(long)]
    addr: Option<String>,

    /// Site configuration file (overrides STNTS_CONF).
    #[arg(long)]
    conf: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,

    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load .env file if it exists
    if std::path::Path::new(&args.dotenv).exists() {
        dotenvy::from_path(&args.dotenv)?;
        eprintln!("Loaded environment from {}", args.dotenv);
    }

    // Initialize tracing
    let default_filter = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration, CLI flags win over the environment
    let mut config = Config::from_env()?;
    if let Some(addr) = args.addr {
        config.bind_addr = addr;
    }
    if let Some(conf) = args.conf {
        config.site_path = conf;
    }

    // An invalid site is fatal: never serve a partial page
    let site = Site::load(&config.site_path)?;
    let bind_addr = config.bind_addr.clone();

    // Create application state
    let state = AppState::new(config, site)?;

    // Build router with request logging
    let app = router(state).layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            })
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolve on Ctrl-C.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
