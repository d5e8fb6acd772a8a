//! Matrix relay service entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use matrix_relay::api::{create_router, AppState};
use matrix_relay::config::Config;
use matrix_relay::matrix::rotate_clockwise;
use matrix_relay::metrics;
use matrix_relay::signing::TokenSigner;
use matrix_relay::utils::{parse_matrix, shutdown_signal};

/// Matrix rotation relay service.
#[derive(Parser, Debug)]
#[command(name = "matrix-relay")]
#[command(about = "Rotates matrices and relays them to a statistics service")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true, env = "VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP listen port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP listen port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Rotate a matrix given as JSON and print the result.
    Rotate {
        /// Matrix as a JSON array of arrays, e.g. '[[1,2,3],[4,5,6]]'.
        matrix: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(log_filter(args.verbose))
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Rotate { matrix }) => cmd_rotate(&matrix),
        Some(Command::Serve { port }) => cmd_serve(port.or(args.port)).await,
        None => cmd_serve(args.port).await,
    }
}

/// Debug output for this crate when verbose, otherwise `RUST_LOG` or `info`.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("matrix_relay=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("MATRIX RELAY - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    print!("Signing test token... ");
    let signer = TokenSigner::from_config(&config)?;
    match signer.sign().and_then(|token| signer.verify(&token)) {
        Ok(claims) => {
            println!("OK");
            println!("  user_id: {}", claims.user_id);
            println!("  exp: {}", claims.exp);
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Token signing failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Stats API URL: {}", config.stats_api_url);
    println!("  HTTP Timeout: {}ms", config.http_timeout_ms);
    println!("  Token TTL: {}s", config.token_ttl_seconds);
    println!("  Port: {}", config.port);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Rotate a matrix locally.
fn cmd_rotate(input: &str) -> anyhow::Result<()> {
    let matrix = parse_matrix(input)?;
    let rotated = rotate_clockwise(&matrix)?;
    println!("{}", serde_json::to_string(&rotated)?);
    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(port) = port_override {
        config.port = port;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    info!("Configuration loaded successfully");
    info!("Stats API: {}", config.stats_api_url);
    info!("Token TTL: {}s", config.token_ttl_seconds);

    metrics::init_prometheus();
    metrics::init_metrics();

    let state = AppState::from_config(&config)?;
    let router = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
