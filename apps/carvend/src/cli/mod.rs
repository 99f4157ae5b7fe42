//! # Carvend CLI Module
//!
//! This module implements the CLI interface for the vending machine.
//!
//! ## Available Commands
//!
//! - `shell` - Interactive numbered menu (default)
//! - `inventory` - Load a file and print the inventory, optionally sorted
//! - `search` - Load a file and list cars of one make and type
//! - `check` - Load a file and report what was placed or rejected

mod commands;

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use carvend_core::{RecordFormat, VendError};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Carvend - Car Vending Machine
///
/// A floor/space grid of cars loaded from a flat file.
/// Display, sort, search, wash and sell the inventory.
#[derive(Parser, Debug)]
#[command(name = "carvend")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file (default: ./carvend.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of floors in the machine
    #[arg(long, global = true)]
    pub floors: Option<usize>,

    /// Number of spaces per floor
    #[arg(long, global = true)]
    pub spaces: Option<usize>,

    /// Inventory record format (tagged, untagged)
    #[arg(short = 'F', long, global = true)]
    pub format: Option<String>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive menu
    Shell,

    /// Print the inventory of a file
    Inventory {
        /// Path to the inventory file
        #[arg(short, long)]
        file: PathBuf,

        /// Sort order (price, year, alphabetical)
        #[arg(short, long)]
        sort: Option<String>,

        /// Show the floor/space layout instead of a list
        #[arg(short, long)]
        grid: bool,
    },

    /// Find cars by manufacturer and type
    Search {
        /// Path to the inventory file
        #[arg(short, long)]
        file: PathBuf,

        /// Manufacturer, matched exactly
        #[arg(short, long)]
        make: String,

        /// Car type (b/basic, p/premium)
        #[arg(short, long)]
        kind: String,
    },

    /// Validate an inventory file
    Check {
        /// Path to the inventory file
        #[arg(short, long)]
        file: PathBuf,
    },
}

impl Cli {
    /// Merge config file and flags into effective settings.
    pub fn settings(&self) -> Result<crate::config::Settings, VendError> {
        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_optional(Path::new(DEFAULT_CONFIG_FILE))?,
        };

        let format = self
            .format
            .as_deref()
            .map(str::parse::<RecordFormat>)
            .transpose()?;

        Ok(config.resolve(self.floors, self.spaces, format))
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), VendError> {
    let settings = cli.settings()?;
    let json_mode = cli.json_mode;

    tracing::debug!(?settings, "resolved settings");

    match cli.command {
        Some(Commands::Shell) | None => cmd_shell(&settings),
        Some(Commands::Inventory { file, sort, grid }) => cmd_inventory(
            &settings,
            json_mode,
            &file,
            sort.as_deref(),
            grid,
            &mut std::io::stdout().lock(),
        ),
        Some(Commands::Search { file, make, kind }) => cmd_search(
            &settings,
            json_mode,
            &file,
            &make,
            &kind,
            &mut std::io::stdout().lock(),
        ),
        Some(Commands::Check { file }) => {
            cmd_check(&settings, json_mode, &file, &mut std::io::stdout().lock())
        }
    }
}
