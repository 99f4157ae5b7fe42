//! # Carvend
//!
//! The binary side of the car vending machine: command-line parsing,
//! configuration and the interactive menu. All inventory logic lives in
//! `carvend-core`.

pub mod cli;
pub mod config;
pub mod shell;

pub use config::{Config, Settings};
pub use shell::{MenuCommand, Session};
