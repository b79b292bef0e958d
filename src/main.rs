//! Headless network map client
//!
//! Runs the map controller against a live dashboard backend with an
//! in-memory map surface and prints the resulting state as JSON.

use ftth_netmap::{
    client,
    display::LogDisplay,
    logging::{self, LogConfig},
    map::InMemorySurface,
    MapViewController, NetMapConfig, StatusFilter,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use url::Url;

/// Command line arguments
#[derive(Parser)]
#[command(name = "netmap")]
#[command(about = "Headless FTTH network map client")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "NETMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Dashboard backend URL, overrides the configuration
    #[arg(long)]
    api_url: Option<Url>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load everything once and print a snapshot
    Snapshot {
        /// Customer status filter to apply before printing (all, online, offline)
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },
    /// Refresh periodically and print a snapshot after each cycle
    Watch {
        /// Seconds between refreshes
        #[arg(short, long, default_value = "30")]
        interval: u64,
        /// Stop after this many cycles
        #[arg(long)]
        cycles: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => NetMapConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => NetMapConfig::default(),
    };
    config.apply_env()?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    let log_config = LogConfig::from_env().with_settings(&config.logging);
    let _log_guard = match logging::init_logging(log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let api = client::create_client(&config)?;
    info!("Using dashboard backend at {}", config.api.base_url);

    let controller = MapViewController::new(
        config,
        api,
        Arc::new(InMemorySurface::new()),
        Arc::new(LogDisplay),
    );
    controller.initialize();

    match cli.command {
        Commands::Snapshot { status } => {
            if let Some(report) = controller.on_map_ready().await {
                if !report.is_success() {
                    error!(failed = ?report.failures(), "Some loads failed");
                }
            }
            if status != StatusFilter::All {
                controller.filter_by_status(status).await;
            }
            print_snapshot(&controller).await?;
        }
        Commands::Watch { interval, cycles } => {
            controller.on_map_ready().await;
            print_snapshot(&controller).await?;

            let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));
            ticker.tick().await;
            let mut completed = 0u32;
            while cycles.map_or(true, |limit| completed < limit) {
                ticker.tick().await;
                controller.refresh().await;
                print_snapshot(&controller).await?;
                completed += 1;
            }
        }
    }

    controller.dispose().await;
    Ok(())
}

async fn print_snapshot(controller: &MapViewController) -> anyhow::Result<()> {
    let snapshot = controller.snapshot().await;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
