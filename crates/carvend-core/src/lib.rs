//! # carvend-core
//!
//! The inventory engine for the car vending machine - THE LOGIC.
//!
//! A machine is a fixed grid of floors and spaces. Cars are loaded from a
//! flat file, then displayed, sorted, searched, queued for washing and sold.
//!
//! ## Architectural Constraints
//!
//! The core:
//! - Holds all inventory state; the binary only drives it
//! - Reports every failure as a [`VendError`]; nothing is silently ignored
//! - Uses integer money (cents) and ordered containers only
//! - Has no logging, async or terminal dependencies

// =============================================================================
// MODULES
// =============================================================================

pub mod car;
pub mod loader;
pub mod machine;
pub mod primitives;
pub mod sort;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use car::{Car, CarKind};
pub use types::{CarId, Position, Price, Slot, VendError};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use loader::{
    LoadReport, Malformed, Record, RecordFormat, Rejection, load_file, load_str, parse_record,
};
pub use machine::{GridView, Listing, Sale, VendingMachine};
pub use sort::{SortCriterion, SortKey, bubble_sort_by_key};
