//! # Vending Machine
//!
//! The inventory engine. A [`VendingMachine`] owns every car it stocks and
//! keeps three views of them in step:
//!
//! - the floor/space grid
//! - the position index (`Slot` -> car)
//! - the manufacturer index (make -> cars in arrival order)
//!
//! plus a FIFO wash queue and the bankroll of completed sales.
//!
//! All containers are `BTreeMap`/`Vec`/`VecDeque`; iteration order never
//! depends on hashing.

use crate::primitives::{MAX_FLOORS, MAX_SPACES};
use crate::sort::{SortCriterion, bubble_sort_by_key};
use crate::{Car, CarId, CarKind, Price, Slot, VendError};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

// =============================================================================
// OUTPUT TYPES
// =============================================================================

/// A stocked car together with where it sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Listing<'a> {
    /// Arrival-ordered identifier.
    pub id: CarId,
    /// Grid position.
    pub slot: Slot,
    /// The car itself.
    pub car: &'a Car,
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.car, self.slot)
    }
}

/// Result of a completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sale {
    /// Where the car was.
    pub slot: Slot,
    /// The car that left the machine.
    pub car: Car,
    /// Bankroll after the sale.
    pub bankroll: Price,
}

/// Floor-by-floor layout of the machine, one row per space.
///
/// Serializes as one array per floor with `null` for empty spaces.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct GridView<'a> {
    floors: Vec<Vec<Option<&'a Car>>>,
}

impl GridView<'_> {
    /// True when no slot holds a car.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.floors.iter().flatten().all(Option::is_none)
    }
}

impl fmt::Display for GridView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "Vending Machine is Empty.");
        }

        for (floor_idx, spaces) in self.floors.iter().enumerate() {
            writeln!(f, "Floor {}:", floor_idx + 1)?;
            for (space_idx, cell) in spaces.iter().enumerate() {
                match cell {
                    Some(car) => writeln!(f, "  Space {}: {}", space_idx + 1, car)?,
                    None => writeln!(f, "  Space {}: EMPTY", space_idx + 1)?,
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// VENDING MACHINE
// =============================================================================

#[derive(Debug, Clone)]
struct Stocked {
    car: Car,
    slot: Slot,
}

/// A fixed-size grid of car slots with indexes, wash queue and bankroll.
#[derive(Debug, Clone)]
pub struct VendingMachine {
    floors: usize,
    spaces: usize,
    /// `grid[floor - 1][space - 1]`
    grid: Vec<Vec<Option<CarId>>>,
    positions: BTreeMap<Slot, CarId>,
    by_make: BTreeMap<String, Vec<CarId>>,
    cars: BTreeMap<CarId, Stocked>,
    wash_queue: VecDeque<CarId>,
    bankroll: Price,
    next_id: u64,
}

impl VendingMachine {
    /// Create an empty machine with `floors` floors of `spaces` spaces each.
    ///
    /// Both dimensions must be at least 1 and at most [`MAX_FLOORS`] /
    /// [`MAX_SPACES`].
    pub fn new(floors: usize, spaces: usize) -> Result<Self, VendError> {
        if floors == 0 || spaces == 0 || floors > MAX_FLOORS || spaces > MAX_SPACES {
            return Err(VendError::InvalidDimensions { floors, spaces });
        }

        Ok(Self {
            floors,
            spaces,
            grid: vec![vec![None; spaces]; floors],
            positions: BTreeMap::new(),
            by_make: BTreeMap::new(),
            cars: BTreeMap::new(),
            wash_queue: VecDeque::new(),
            bankroll: Price::ZERO,
            next_id: 0,
        })
    }

    /// Number of floors.
    #[must_use]
    pub fn floors(&self) -> usize {
        self.floors
    }

    /// Number of spaces per floor.
    #[must_use]
    pub fn spaces(&self) -> usize {
        self.spaces
    }

    /// Number of cars currently stocked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cars.len()
    }

    /// True when no car is stocked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    /// Revenue from all completed sales.
    #[must_use]
    pub fn bankroll(&self) -> Price {
        self.bankroll
    }

    /// Number of cars waiting to be washed.
    #[must_use]
    pub fn wash_queue_len(&self) -> usize {
        self.wash_queue.len()
    }

    /// True if the slot lies inside the grid.
    #[must_use]
    pub fn in_bounds(&self, slot: Slot) -> bool {
        (1..=self.floors).contains(&slot.floor) && (1..=self.spaces).contains(&slot.space)
    }

    // =========================================================================
    // PLACEMENT & LOOKUP
    // =========================================================================

    /// Place a car in an empty, in-bounds slot.
    ///
    /// On error the machine is left unchanged.
    pub fn add_car(&mut self, car: Car, slot: Slot) -> Result<CarId, VendError> {
        if !self.in_bounds(slot) {
            return Err(VendError::InvalidSpace(slot));
        }
        if self.positions.contains_key(&slot) {
            return Err(VendError::Occupied(slot));
        }

        let id = CarId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);

        self.grid[slot.floor - 1][slot.space - 1] = Some(id);
        self.positions.insert(slot, id);
        self.by_make.entry(car.make.clone()).or_default().push(id);
        self.cars.insert(id, Stocked { car, slot });

        Ok(id)
    }

    /// Look up the car at a slot.
    ///
    /// Out-of-bounds slots yield `InvalidSpace`, empty ones `NotLocated`.
    pub fn get_car(&self, slot: Slot) -> Result<&Car, VendError> {
        let id = self.id_at(slot)?;
        self.cars
            .get(&id)
            .map(|stocked| &stocked.car)
            .ok_or(VendError::NotLocated(slot))
    }

    /// Retrieve a car for a test drive. The car stays in the machine.
    pub fn test_drive(&self, slot: Slot) -> Result<&Car, VendError> {
        self.get_car(slot)
    }

    /// Sell the car at a slot.
    ///
    /// The car is purged from the grid, the position index, the manufacturer
    /// index and the wash queue, and its price is added to the bankroll.
    pub fn sell_car(&mut self, slot: Slot) -> Result<Sale, VendError> {
        let id = self.id_at(slot)?;
        let price = self
            .cars
            .get(&id)
            .map(|stocked| stocked.car.price)
            .ok_or(VendError::NotLocated(slot))?;
        let bankroll = self
            .bankroll
            .checked_add(price)
            .ok_or(VendError::BankrollOverflow)?;

        let stocked = self.remove(id).ok_or(VendError::NotLocated(slot))?;
        self.bankroll = bankroll;

        Ok(Sale {
            slot: stocked.slot,
            car: stocked.car,
            bankroll,
        })
    }

    fn id_at(&self, slot: Slot) -> Result<CarId, VendError> {
        if !self.in_bounds(slot) {
            return Err(VendError::InvalidSpace(slot));
        }
        self.positions
            .get(&slot)
            .copied()
            .ok_or(VendError::NotLocated(slot))
    }

    fn remove(&mut self, id: CarId) -> Option<Stocked> {
        let stocked = self.cars.remove(&id)?;
        let slot = stocked.slot;

        self.positions.remove(&slot);
        if let Some(cell) = self
            .grid
            .get_mut(slot.floor - 1)
            .and_then(|row| row.get_mut(slot.space - 1))
        {
            *cell = None;
        }

        let bucket_empty = match self.by_make.get_mut(&stocked.car.make) {
            Some(bucket) => {
                bucket.retain(|other| *other != id);
                bucket.is_empty()
            }
            None => false,
        };
        if bucket_empty {
            self.by_make.remove(&stocked.car.make);
        }

        self.wash_queue.retain(|queued| *queued != id);

        Some(stocked)
    }

    // =========================================================================
    // LISTINGS
    // =========================================================================

    fn listing(&self, id: CarId) -> Option<Listing<'_>> {
        self.cars.get(&id).map(|stocked| Listing {
            id,
            slot: stocked.slot,
            car: &stocked.car,
        })
    }

    /// All cars in arrival order.
    #[must_use]
    pub fn inventory(&self) -> Vec<Listing<'_>> {
        self.cars
            .iter()
            .map(|(id, stocked)| Listing {
                id: *id,
                slot: stocked.slot,
                car: &stocked.car,
            })
            .collect()
    }

    /// A snapshot of the inventory sorted ascending by `criterion`.
    ///
    /// Ties keep arrival order. The machine itself is not reordered.
    #[must_use]
    pub fn sorted_inventory(&self, criterion: SortCriterion) -> Vec<Listing<'_>> {
        let mut listings = self.inventory();
        bubble_sort_by_key(&mut listings, |listing| criterion.key(listing.car));
        listings
    }

    /// Cars of `make` whose kind is `kind`, in arrival order.
    ///
    /// The make must match exactly.
    #[must_use]
    pub fn cars_by_make_kind(&self, make: &str, kind: CarKind) -> Vec<Listing<'_>> {
        self.by_make
            .get(make)
            .into_iter()
            .flatten()
            .filter_map(|id| self.listing(*id))
            .filter(|listing| listing.car.kind == kind)
            .collect()
    }

    /// Manufacturers currently stocked, with how many cars each.
    #[must_use]
    pub fn makes(&self) -> Vec<(&str, usize)> {
        self.by_make
            .iter()
            .map(|(make, ids)| (make.as_str(), ids.len()))
            .collect()
    }

    /// Floor-by-floor layout.
    #[must_use]
    pub fn grid(&self) -> GridView<'_> {
        let floors = self
            .grid
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.and_then(|id| self.cars.get(&id)).map(|s| &s.car))
                    .collect()
            })
            .collect();
        GridView { floors }
    }

    // =========================================================================
    // WASH QUEUE
    // =========================================================================

    /// Queue the car at a slot for washing.
    ///
    /// The same car may be queued more than once.
    pub fn add_car_to_wash(&mut self, slot: Slot) -> Result<&Car, VendError> {
        let id = self.id_at(slot)?;
        self.wash_queue.push_back(id);
        self.get_car(slot)
    }

    /// Drain the wash queue, returning the washed cars in queue order.
    pub fn process_wash_queue(&mut self) -> Vec<Car> {
        let mut washed = Vec::with_capacity(self.wash_queue.len());
        while let Some(id) = self.wash_queue.pop_front() {
            if let Some(stocked) = self.cars.get(&id) {
                washed.push(stocked.car.clone());
            }
        }
        washed
    }

    // =========================================================================
    // CONSISTENCY
    // =========================================================================

    /// Check that the grid, position index and manufacturer index agree.
    ///
    /// Every stocked car must appear exactly once in each view, at its own
    /// slot and under its own make, and no view may reference a car that is
    /// not stocked.
    #[must_use]
    pub fn indexes_consistent(&self) -> bool {
        if self.positions.len() != self.cars.len() {
            return false;
        }

        let grid_count = self.grid.iter().flatten().filter(|c| c.is_some()).count();
        if grid_count != self.cars.len() {
            return false;
        }

        let make_count: usize = self.by_make.values().map(Vec::len).sum();
        if make_count != self.cars.len() || self.by_make.values().any(Vec::is_empty) {
            return false;
        }

        self.cars.iter().all(|(id, stocked)| {
            let slot = stocked.slot;
            self.positions.get(&slot) == Some(id)
                && self.grid[slot.floor - 1][slot.space - 1] == Some(*id)
                && self
                    .by_make
                    .get(&stocked.car.make)
                    .is_some_and(|ids| ids.contains(id))
        }) && self.wash_queue.iter().all(|id| self.cars.contains_key(id))
    }
}

// =============================================================================
// TESTS
// =============================================================================
