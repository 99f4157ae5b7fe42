//! # Carvend - Car Vending Machine
//!
//! The main binary for the car vending machine simulation.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                apps/carvend (THE BINARY)              │
//! │                                                       │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐  │
//! │  │    CLI      │   │   Config    │   │    Shell    │  │
//! │  │   (clap)    │   │   (toml)    │   │   (menu)    │  │
//! │  └──────┬──────┘   └──────┬──────┘   └──────┬──────┘  │
//! │         └─────────────────┼─────────────────┘         │
//! │                           ▼                           │
//! │                   ┌───────────────┐                   │
//! │                   │ carvend-core  │                   │
//! │                   │  (THE LOGIC)  │                   │
//! │                   └───────────────┘                   │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Interactive menu
//! carvend --floors 3 --spaces 4
//!
//! # One-shot commands
//! carvend inventory -f cars.txt --sort price
//! carvend search -f cars.txt --make Honda --kind p
//! carvend check -f cars.txt --json-mode
//! ```

use carvend::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing. CARVEND_LOG_FORMAT=json switches to JSON lines.
    // Logs go to stderr; stdout carries the menu and command output.
    let log_format = std::env::var("CARVEND_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "carvend=debug"
    } else {
        "carvend=warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the carvend startup banner.
fn print_banner() {
    println!(
        r#"
   ___   _   ___ __   _____ _  _ ___
  / __| /_\ | _ \\ \ / / __| \| |   \
 | (__ / _ \|   / \ V /| _|| .` | |) |
  \___/_/ \_\_|_\  \_/ |___|_|\_|___/

  Car Vending Machine v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
