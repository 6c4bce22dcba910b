//! # Wardrobe CLI Module
//!
//! This module implements the CLI interface for Wardrobe.
//!
//! ## Available Commands
//!
//! - `serve` - Start the HTTP server
//! - `set-types` - List all categories
//! - `sets` - List the items of one category
//! - `palette` - List the colors of one palette
//! - `encode` - Encode parts into a figure string
//! - `random` - Generate a random avatar

mod commands;

use crate::config::{Overrides, Settings};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wardrobe_core::WardrobeError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Wardrobe - Avatar Catalog Server
///
/// Browses a figure-data catalog, builds figure strings and renders them
/// through an external imager.
#[derive(Parser, Debug)]
#[command(name = "wardrobe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the configuration file (default: ./wardrobe.toml if present)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the figure-data catalog (overrides FIGUREDATA_PATH)
    #[arg(short = 'C', long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Imager base URL (overrides IMAGER_INTERNAL_URL)
        #[arg(long)]
        imager: Option<String>,
    },

    /// List all categories
    SetTypes,

    /// List the items of one category
    Sets {
        /// Category key (hd, hr, ch, ...)
        #[arg(short = 't', long = "type")]
        set_type: String,

        /// Gender filter (M, F or U)
        #[arg(short, long, default_value = "U")]
        gender: String,
    },

    /// List the colors of one palette
    Palette {
        /// Palette id
        #[arg(short, long)]
        id: i64,
    },

    /// Encode parts (type-setId-color[-color2]) into a figure string
    Encode {
        /// Parts such as hd-180-1 ch-210-66-62
        #[arg(required = true)]
        parts: Vec<String>,
    },

    /// Generate a random avatar
    Random {
        /// Gender (M, F or U)
        #[arg(short, long, default_value = "U")]
        gender: String,

        /// Preferred categories in visiting order (comma-separated)
        #[arg(short = 't', long, value_delimiter = ',')]
        types: Option<Vec<String>>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Resolve settings: config file, then environment, then flags.
pub fn resolve_settings(cli: &Cli) -> Result<Settings, WardrobeError> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    let mut overrides = Overrides {
        catalog: cli.catalog.clone(),
        ..Overrides::default()
    };
    if let Some(Commands::Serve { host, port, imager }) = &cli.command {
        overrides.host = host.clone();
        overrides.port = *port;
        overrides.imager_url = imager.clone();
    }
    settings.apply_overrides(&overrides);
    Ok(settings)
}

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), WardrobeError> {
    let settings = resolve_settings(&cli)?;
    let json = cli.json;

    match cli.command {
        Some(Commands::Serve { .. }) => cmd_serve(&settings).await,
        Some(Commands::SetTypes) | None => cmd_set_types(&settings, json),
        Some(Commands::Sets { set_type, gender }) => cmd_sets(&settings, json, &set_type, &gender),
        Some(Commands::Palette { id }) => cmd_palette(&settings, json, id),
        Some(Commands::Encode { parts }) => cmd_encode(json, &parts),
        Some(Commands::Random { gender, types }) => {
            cmd_random(&settings, json, &gender, types.as_deref())
        }
    }
}
