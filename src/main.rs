//! Users API entry point.

use std::net::SocketAddr;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use users_api::api::{create_router, AppState};
use users_api::config::Config;
use users_api::error::AppError;
use users_api::metrics;
use users_api::utils::shutdown_signal;

/// Sample users REST API.
#[derive(Parser, Debug)]
#[command(name = "users-api")]
#[command(about = "Sample users REST API used as a CI/CD pipeline fixture")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// HTTP listen port (overrides PORT).
    #[arg(short, long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default).
    Serve,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    let loaded = Config::load();
    init_logging(args.verbose, loaded.as_ref().ok());

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(AppError::from(e).into());
        }
    };

    if let Some(port) = args.port {
        config.port = port;
    }

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::Serve) | None => cmd_serve(config).await,
    }
}

fn init_logging(verbose: bool, config: Option<&Config>) {
    let filter = if verbose {
        EnvFilter::new("users_api=debug,info")
    } else {
        let directive = config.map_or("info", |c| c.rust_log.as_str());
        EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let json = config.is_some_and(|c| c.log_json);

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .init();
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("USERS API - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Port: {}", config.port);
    match config.metrics_port {
        Some(port) => println!("  Metrics Port: {}", port),
        None => println!("  Metrics: Disabled"),
    }
    println!("  Log Level: {}", config.rust_log);
    println!("  Log Format: {}", if config.log_json { "JSON" } else { "Text" });
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Serve the API until a shutdown signal arrives.
async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    config
        .validate()
        .map_err(AppError::InvalidConfig)
        .context("refusing to start")?;

    metrics::init_metrics();
    if let Some(port) = config.metrics_port {
        metrics::install_exporter(port)?;
    }

    let app_state = AppState::new();
    let router = create_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(AppError::from)
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server is running on http://localhost:{}", config.port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::from)?;

    info!("Server stopped");
    Ok(())
}
