//! # Car Records
//!
//! A car is an immutable record. Basic and premium cars differ only in how
//! they are displayed, so the distinction is a [`CarKind`] tag on a single
//! struct.

use crate::{Price, VendError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display tier of a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarKind {
    /// Basic trim.
    Basic,
    /// Premium trim.
    Premium,
}

impl CarKind {
    /// Human-readable label used as the display prefix.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            CarKind::Basic => "Basic Car",
            CarKind::Premium => "Premium Car",
        }
    }
}

impl FromStr for CarKind {
    type Err = VendError;

    /// Accepts `b`, `basic`, `p`, `premium` in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "b" | "basic" => Ok(CarKind::Basic),
            "p" | "premium" => Ok(CarKind::Premium),
            _ => Err(VendError::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for CarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A car held in the machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    /// Model year.
    pub year: u16,
    /// Sticker price.
    pub price: Price,
    /// Manufacturer name, the key of the manufacturer index.
    pub make: String,
    /// Model name.
    pub model: String,
    /// Display tier.
    pub kind: CarKind,
}

impl Car {
    /// Create a new car.
    #[must_use]
    pub fn new(
        kind: CarKind,
        year: u16,
        price: Price,
        make: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            year,
            price,
            make: make.into(),
            model: model.into(),
            kind,
        }
    }

    /// Create a basic car.
    #[must_use]
    pub fn basic(year: u16, price: Price, make: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(CarKind::Basic, year, price, make, model)
    }

    /// Create a premium car.
    #[must_use]
    pub fn premium(
        year: u16,
        price: Price,
        make: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self::new(CarKind::Premium, year, price, make, model)
    }
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {} {} - {}",
            self.kind, self.year, self.make, self.model, self.price
        )
    }
}
