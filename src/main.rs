//! Hawaii Climate API - Main Service
//!
//! Serves precipitation, station and temperature data from the Hawaii
//! dataset over HTTP:
//! 1. Loads surfsup.toml (optional) and applies command-line overrides
//! 2. Checks that the measurement and station tables exist
//! 3. Serves the JSON API, one database connection per request
//!
//! Usage:
//!   cargo run --release                        # Serve on 0.0.0.0:5000
//!   cargo run --release -- --port 8080         # Serve on another port
//!   cargo run --release -- --check             # Validate database and exit
//!
//! Environment:
//!   DATABASE_URL - PostgreSQL connection string
//!   RUST_LOG     - log filter (default: info)

use clap::Parser;
use log::{error, info};
use std::error::Error;
use std::path::PathBuf;
use std::process;

use surfsup_service::config::{ServiceConfig, DEFAULT_CONFIG_PATH};
use surfsup_service::db;
use surfsup_service::endpoint::start_endpoint_server;
use surfsup_service::store::PostgresSource;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(
    name = "surfsup-service",
    version,
    about = "Read-only JSON API over the Hawaii climate dataset"
)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Address to bind (overrides server.bind)
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Worker threads (overrides server.workers)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Validate the database connection and tables, then exit
    #[arg(long)]
    check: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        error!("{}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            error!("  caused by: {}", cause);
            source = cause.source();
        }
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let explicit = args.config.is_some();
    let config_path = args.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut config = ServiceConfig::load(&config_path, explicit)?;

    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(workers) = args.workers {
        config.server.workers = workers;
    }
    config.validate()?;

    let db_url = db::database_url()?;
    info!("Checking dataset tables in schema '{}'...", config.database.schema);
    // The startup connection only validates; requests open their own.
    drop(db::connect_and_verify(&db_url, &config.database.schema)?);
    info!("Dataset tables present");

    if args.check {
        return Ok(());
    }

    let window = config.query.window();
    info!(
        "Trailing window: {} days, anchor {:?}",
        window.days, window.anchor
    );

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let source = PostgresSource::new(db_url, config.database.schema.clone());
    start_endpoint_server(&addr, source, window, config.server.workers)?;

    Ok(())
}
