//! # Core Type Definitions
//!
//! This module contains the shared value types of the vending machine:
//! - Identifiers and coordinates (`CarId`, `Slot`, `Position`)
//! - Money (`Price`)
//! - Error types (`VendError`)
//!
//! ## Arithmetic Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Use checked arithmetic for money so overflow is reported, never wrapped

use crate::primitives::CENTS_PER_UNIT;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Unique identifier of a car stocked in a machine.
///
/// Ids are assigned in insertion order and never reused, so ordering by
/// `CarId` is ordering by arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CarId(pub u64);

/// A `(floor, space)` grid coordinate, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    /// Floor number, starting at 1.
    pub floor: usize,
    /// Space number on the floor, starting at 1.
    pub space: usize,
}

impl Slot {
    /// Create a new slot coordinate.
    #[must_use]
    pub const fn new(floor: usize, space: usize) -> Self {
        Self { floor, space }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.floor, self.space)
    }
}

/// A coordinate pair as written in an inventory file.
///
/// Unlike [`Slot`] it may be zero, negative or beyond any machine; such
/// positions are rejected at placement. Values past the `i64` range are
/// clamped to its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Floor as written.
    pub floor: i64,
    /// Space as written.
    pub space: i64,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(floor: i64, space: i64) -> Self {
        Self { floor, space }
    }

    /// The slot this position names, if both coordinates are positive.
    #[must_use]
    pub fn to_slot(self) -> Option<Slot> {
        let floor = usize::try_from(self.floor).ok().filter(|n| *n > 0)?;
        let space = usize::try_from(self.space).ok().filter(|n| *n > 0)?;
        Some(Slot::new(floor, space))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.floor, self.space)
    }
}

// =============================================================================
// PRICE
// =============================================================================

/// A monetary amount stored as whole cents.
///
/// Parsed from decimal text with at most two fractional digits and
/// displayed as `$<units>.<cents>`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Price(pub u64);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(0);

    /// Create a price from a number of cents.
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Create a price from whole currency units.
    #[must_use]
    pub const fn from_units(units: u64) -> Self {
        Self(units.saturating_mul(CENTS_PER_UNIT))
    }

    /// Get the raw amount in cents.
    #[must_use]
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Add two prices, returning `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(sum) => Some(Self(sum)),
            None => None,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}.{:02}",
            self.0 / CENTS_PER_UNIT,
            self.0 % CENTS_PER_UNIT
        )
    }
}

impl FromStr for Price {
    type Err = VendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VendError::InvalidPrice(s.to_string());

        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (s, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: u64 = whole.parse().map_err(|_| invalid())?;
        let cents: u64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        units
            .checked_mul(CENTS_PER_UNIT)
            .and_then(|c| c.checked_add(cents))
            .map(Self)
            .ok_or_else(invalid)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the vending machine.
///
/// - No silent failures: placement, lookup and load problems are reported
/// - Use `Result<T, VendError>` for fallible operations
/// - The core never panics; all errors are recoverable
#[derive(Debug, Error)]
pub enum VendError {
    /// The slot lies outside the machine's floors and spaces.
    #[error("Invalid space at {0}.")]
    InvalidSpace(Slot),

    /// A file position that cannot name any slot (zero or negative).
    #[error("Invalid space at {0}.")]
    InvalidPosition(Position),

    /// The slot is in bounds but holds no car.
    #[error("Car not located at {0}.")]
    NotLocated(Slot),

    /// The slot already holds a car.
    #[error("Space {0} is already occupied.")]
    Occupied(Slot),

    /// The machine was sized with zero or too many floors or spaces.
    #[error("Invalid machine dimensions: {floors} floors, {spaces} spaces")]
    InvalidDimensions {
        /// Requested floor count.
        floors: usize,
        /// Requested space count.
        spaces: usize,
    },

    /// An inventory record could not be parsed.
    #[error("Invalid file format at line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number in the inventory file.
        line: usize,
        /// What was wrong with the record.
        reason: String,
    },

    /// A price string is not a non-negative decimal with at most two fraction digits.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// A car type tag other than basic or premium.
    #[error("Unknown car type: {0}")]
    UnknownKind(String),

    /// A sort criterion other than price, year or alphabetical.
    #[error("Unknown sort criterion: {0}. Use: price, year, alphabetical")]
    UnknownCriterion(String),

    /// The bankroll would overflow.
    #[error("Bankroll overflow")]
    BankrollOverflow,

    /// The inventory file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// A configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

// =============================================================================
// TESTS
// =============================================================================
