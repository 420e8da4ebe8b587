#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the officer ranking and complaint map tools.
//!
//! Reads records from the configured store (a local JSON snapshot or the
//! hosted REST API), then ranks officers or filters complaints by a map
//! area. Uses `indicatif-log-bridge` (via
//! [`accountability_cli_utils::init_logger`]) so log lines and the loading
//! spinner never fight for the terminal.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::PortalConfig;

#[derive(Parser)]
#[command(
    name = "accountability",
    about = "Officer ranking and complaint map tools"
)]
struct Cli {
    /// Path to a TOML config file (defaults to `accountability.toml` if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank officers by composite score, most concerning first
    Rank {
        /// Only show the top N officers
        #[arg(long)]
        limit: Option<usize>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one officer's percentiles against the whole population
    Officer {
        /// Officer id
        id: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the composite score distribution
    Histogram {
        /// Bucket width on the 0-100 score axis (overrides config)
        #[arg(long)]
        bucket_width: Option<f64>,
        /// Print JSON instead of bars
        #[arg(long)]
        json: bool,
    },
    /// Show the radar axes of the top-ranked officer
    Radar {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List geolocated complaints inside a `GeoJSON` polygon
    Filter {
        /// `GeoJSON` Feature or geometry file. Omit to list every complaint.
        #[arg(long)]
        area: Option<PathBuf>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Count complaints per area of a `GeoJSON` `FeatureCollection`
    Areas {
        /// Boundary layer file (e.g. police districts)
        #[arg(long)]
        areas: PathBuf,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = accountability_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = PortalConfig::load(cli.config.as_deref())?;
    let store = config.source.open();
    log::debug!("Reading records from {}", store.name());

    match cli.command {
        Commands::Rank { limit, json } => {
            commands::rank(store.as_ref(), &config, &multi, limit, json).await?;
        }
        Commands::Officer { id, json } => {
            commands::officer(store.as_ref(), &config, &multi, &id, json).await?;
        }
        Commands::Histogram { bucket_width, json } => {
            commands::histogram(store.as_ref(), &config, &multi, bucket_width, json).await?;
        }
        Commands::Radar { json } => {
            commands::radar(store.as_ref(), &config, &multi, json).await?;
        }
        Commands::Filter { area, json } => {
            commands::filter(store.as_ref(), &multi, area.as_deref(), json).await?;
        }
        Commands::Areas { areas, json } => {
            commands::areas(store.as_ref(), &multi, &areas, json).await?;
        }
    }

    Ok(())
}
