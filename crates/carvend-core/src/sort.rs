//! # Inventory Sorting
//!
//! Listings are ordered with a plain exchange (bubble) sort. Passes run from
//! the back of the list to the front and swap only on a strictly smaller key,
//! so equal keys keep their original relative order.

use crate::{Car, Price, VendError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key used to order the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortCriterion {
    /// Ascending sticker price.
    Price,
    /// Ascending model year.
    Year,
    /// Make, then model, lexicographically.
    Alphabetical,
}

/// Sort key extracted from a car for a given criterion.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey<'a> {
    /// Price key.
    Price(Price),
    /// Year key.
    Year(u16),
    /// `(make, model)` key.
    Name(&'a str, &'a str),
}

impl SortCriterion {
    /// Extract this criterion's key from a car.
    #[must_use]
    pub fn key<'a>(&self, car: &'a Car) -> SortKey<'a> {
        match self {
            SortCriterion::Price => SortKey::Price(car.price),
            SortCriterion::Year => SortKey::Year(car.year),
            SortCriterion::Alphabetical => SortKey::Name(&car.make, &car.model),
        }
    }

    /// Short lowercase name, as accepted by `from_str`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SortCriterion::Price => "price",
            SortCriterion::Year => "year",
            SortCriterion::Alphabetical => "alphabetical",
        }
    }
}

impl FromStr for SortCriterion {
    type Err = VendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" => Ok(SortCriterion::Price),
            "year" => Ok(SortCriterion::Year),
            "alphabetical" | "alpha" => Ok(SortCriterion::Alphabetical),
            _ => Err(VendError::UnknownCriterion(s.to_string())),
        }
    }
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stable in-place exchange sort, ascending by `key`.
///
/// Repeats back-to-front passes until one completes without a swap.
pub fn bubble_sort_by_key<T, K, F>(items: &mut [T], mut key: F)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    if items.len() < 2 {
        return;
    }

    loop {
        let mut swapped = false;

        for i in (1..items.len()).rev() {
            if key(&items[i]) < key(&items[i - 1]) {
                items.swap(i, i - 1);
                swapped = true;
            }
        }

        if !swapped {
            break;
        }
    }
}
