//! Concurrent Search: a metasearch web service
//!
//! This is the main entry point for the application.

use anyhow::Result;
use concurrent_search::{
    config,
    network::HttpClient,
    providers::ProviderLoader,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = match parse_args()? {
        Some(path) => path,
        None => return Ok(()),
    };

    // Load configuration before logging so `general.debug` can raise the level
    let settings = config::load(config_path.as_deref())?;

    let default_level = if settings.general.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting Concurrent Search v{}", concurrent_search::VERSION);
    info!("Loaded configuration for instance: {}", settings.general.instance_name);

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    // Load providers
    let registry = ProviderLoader::load(&settings, &client)?;
    info!("Loaded {} search providers", registry.len());

    // Bind address
    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    // Create application state
    let state = AppState::new(settings, registry)?;
    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Parse command line arguments.
///
/// Returns `Ok(None)` when the process should exit after printing help or
/// version information.
fn parse_args() -> Result<Option<Option<PathBuf>>> {
    let mut config_path = None;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("{} requires a file argument", arg))?;
                config_path = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            "-V" | "--version" => {
                println!("concurrent-search {}", concurrent_search::VERSION);
                return Ok(None);
            }
            other => {
                print_usage();
                return Err(anyhow::anyhow!("Unknown argument: {}", other));
            }
        }
    }

    Ok(Some(config_path))
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
Concurrent Search v{}
Fans one query out to several search providers at once

USAGE:
    concurrent-search [OPTIONS]

OPTIONS:
    -c, --config <FILE>    Path to configuration file
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    CSEARCH_SETTINGS_PATH  Path to settings.yml
    CSEARCH_DEBUG          Enable debug logging (true/false)
    CSEARCH_PORT           Server port
    CSEARCH_BIND_ADDRESS   Bind address
    RUST_LOG               Log filter, overrides CSEARCH_DEBUG
"#,
        concurrent_search::VERSION
    );
}
