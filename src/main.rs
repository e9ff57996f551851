//! Starter API server entry point.

use std::io::ErrorKind;
use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use starter_api::api::{create_router, AppState};
use starter_api::config::Config;
use starter_api::error::StartupError;
use starter_api::metrics;
use starter_api::store::UserStore;
use starter_api::utils::shutdown_signal;

/// JSON REST API for the full-stack starter template.
#[derive(Parser, Debug)]
#[command(name = "starter-api")]
#[command(about = "Health check and user-management API for the starter frontend")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load before logging so RUST_LOG from .env applies
    let config = Config::load()?;

    init_logging(&args, &config);

    if !config.dotenv_loaded {
        info!("No .env file found, using default values");
    }

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => cmd_serve(config).await,
        Command::CheckConfig => cmd_check_config(&config),
    }
}

fn init_logging(args: &Args, config: &Config) {
    let filter = if args.verbose {
        EnvFilter::new("starter_api=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(args.json_logs.then(|| fmt::layer().json()))
        .with((!args.json_logs).then(|| fmt::layer()))
        .with(filter)
        .init();
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    let handle = metrics::install_recorder()?;
    let state = AppState::new(UserStore::seeded()).with_metrics(handle);
    let router = create_router(state, &config)?;

    let listener = match bind_listener(&config).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("{}", err);
            return Err(err.into());
        }
    };

    info!("🚀 Server starting on port {}", config.port);
    info!("🌐 Frontend URL: {}", config.frontend_url);
    info!("📡 API available at: {}", config.api_url());

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(StartupError::Io)?;

    info!("Server stopped");
    Ok(())
}

/// Bind the wildcard IPv6 address, falling back to IPv4 only. A port that is
/// already taken is reported as-is.
async fn bind_listener(config: &Config) -> Result<TcpListener, StartupError> {
    let addr = config.bind_addr();
    match TcpListener::bind(addr.as_str()).await {
        Ok(listener) => Ok(listener),
        Err(source) if source.kind() != ErrorKind::AddrInUse => {
            let fallback = config.fallback_bind_addr();
            warn!(error = %source, "IPv6 unavailable, binding {}", fallback);
            TcpListener::bind(fallback.as_str())
                .await
                .map_err(|source| StartupError::Bind {
                    addr: fallback,
                    source,
                })
        }
        Err(source) => Err(StartupError::Bind { addr, source }),
    }
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("STARTER API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Checking frontend origin... ");
    match config.cors_origin() {
        Ok(_) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!(
        "  .env File: {}",
        if config.dotenv_loaded { "Loaded" } else { "Not found" }
    );
    println!(
        "  Listen Address: {} (IPv4 fallback {})",
        config.bind_addr(),
        config.fallback_bind_addr()
    );
    println!("  Frontend URL: {}", config.frontend_url);
    println!("  API URL: {}", config.api_url());
    println!("  Log Level: {}", config.rust_log);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}
