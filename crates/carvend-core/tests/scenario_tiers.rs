//! # Scenario Tier Tests (T0-T3)
//!
//! End-to-end scenarios against the public API.
//!
//! ## Tiers
//! - T0: Placement & Lookup
//! - T1: Sales & Bankroll
//! - T2: Sorting, Search & Wash
//! - T3: File Loading

use carvend_core::{
    Car, CarKind, Position, Price, RecordFormat, Slot, SortCriterion, VendError, VendingMachine,
    load_file, load_str,
};

fn civic() -> Car {
    Car::basic(2020, Price::from_units(15000), "Honda", "Civic")
}

// =============================================================================
// TIER T0: PLACEMENT & LOOKUP
// =============================================================================

mod t0_placement {
    use super::*;

    /// T0.1: A car placed in an empty slot can be retrieved there.
    #[test]
    fn placed_car_is_retrievable() {
        let mut vm = VendingMachine::new(2, 2).expect("machine");
        vm.add_car(civic(), Slot::new(1, 1)).expect("add");

        let car = vm.test_drive(Slot::new(1, 1)).expect("drive");
        assert_eq!(car.to_string(), "Basic Car: 2020 Honda Civic - $15000.00");
    }

    /// T0.2: Occupied and out-of-bounds placements fail without side effects.
    #[test]
    fn bad_placements_fail_cleanly() {
        let mut vm = VendingMachine::new(2, 2).expect("machine");
        vm.add_car(civic(), Slot::new(1, 1)).expect("add");

        assert!(matches!(
            vm.add_car(civic(), Slot::new(1, 1)),
            Err(VendError::Occupied(_))
        ));
        assert!(matches!(
            vm.add_car(civic(), Slot::new(3, 1)),
            Err(VendError::InvalidSpace(_))
        ));
        assert_eq!(vm.len(), 1);
        assert!(vm.indexes_consistent());
    }
}

// =============================================================================
// TIER T1: SALES & BANKROLL
// =============================================================================

mod t1_sales {
    use super::*;

    /// T1.1: Selling the only car credits its price and empties the slot.
    #[test]
    fn sell_single_car() {
        let mut vm = VendingMachine::new(2, 2).expect("machine");
        vm.add_car(civic(), Slot::new(1, 1)).expect("add");

        vm.sell_car(Slot::new(1, 1)).expect("sell");

        assert_eq!(vm.bankroll(), Price::from_units(15000));
        let err = vm.get_car(Slot::new(1, 1)).expect_err("gone");
        assert_eq!(err.to_string(), "Car not located at (1, 1).");
    }

    /// T1.2: Bankroll accumulates across sales.
    #[test]
    fn bankroll_accumulates() {
        let mut vm = VendingMachine::new(1, 3).expect("machine");
        vm.add_car(civic(), Slot::new(1, 1)).expect("add");
        vm.add_car(
            Car::premium(2022, "30000.50".parse().expect("price"), "Audi", "A4"),
            Slot::new(1, 2),
        )
        .expect("add");

        vm.sell_car(Slot::new(1, 1)).expect("sell");
        vm.sell_car(Slot::new(1, 2)).expect("sell");

        assert_eq!(vm.bankroll().to_string(), "$45000.50");
        assert!(vm.is_empty());
        assert!(vm.makes().is_empty());
    }
}

// =============================================================================
// TIER T2: SORTING, SEARCH & WASH
// =============================================================================

mod t2_queries {
    use super::*;

    fn lot() -> VendingMachine {
        let mut vm = VendingMachine::new(2, 3).expect("machine");
        let text = "b 1 1 2020 15000 Honda Civic\n\
                    p 1 2 2018 15000 BMW M3\n\
                    b 1 3 2015 8000 Ford Focus\n\
                    p 2 1 2020 45000 Honda Accord\n";
        let report = load_str(&mut vm, text, RecordFormat::Tagged);
        assert!(report.completed().is_ok());
        vm
    }

    fn models(listings: &[carvend_core::Listing<'_>]) -> Vec<String> {
        listings.iter().map(|l| l.car.model.clone()).collect()
    }

    /// T2.1: Price sort keeps arrival order on equal prices.
    #[test]
    fn price_sort_is_stable() {
        let vm = lot();
        let sorted = vm.sorted_inventory(SortCriterion::Price);
        assert_eq!(models(&sorted), vec!["Focus", "Civic", "M3", "Accord"]);
    }

    /// T2.2: Year sort keeps arrival order on equal years.
    #[test]
    fn year_sort_is_stable() {
        let vm = lot();
        let sorted = vm.sorted_inventory(SortCriterion::Year);
        assert_eq!(models(&sorted), vec!["Focus", "M3", "Civic", "Accord"]);
    }

    /// T2.3: Alphabetical sort orders by make, then model.
    #[test]
    fn alphabetical_sort() {
        let vm = lot();
        let sorted = vm.sorted_inventory(SortCriterion::Alphabetical);
        assert_eq!(models(&sorted), vec!["M3", "Focus", "Accord", "Civic"]);
    }

    /// T2.4: Search matches the requested make and type only.
    #[test]
    fn search_by_make_and_type() {
        let vm = lot();
        assert_eq!(
            models(&vm.cars_by_make_kind("Honda", CarKind::Basic)),
            vec!["Civic"]
        );
        assert_eq!(
            models(&vm.cars_by_make_kind("Honda", CarKind::Premium)),
            vec!["Accord"]
        );
        assert!(vm.cars_by_make_kind("honda", CarKind::Basic).is_empty());
    }

    /// T2.5: Wash queue drains first-in first-out.
    #[test]
    fn wash_drains_in_order() {
        let mut vm = lot();
        for slot in [Slot::new(2, 1), Slot::new(1, 3), Slot::new(1, 1)] {
            vm.add_car_to_wash(slot).expect("queue");
        }

        let washed: Vec<String> = vm
            .process_wash_queue()
            .into_iter()
            .map(|c| c.model)
            .collect();
        assert_eq!(washed, vec!["Accord", "Focus", "Civic"]);
    }
}

// =============================================================================
// TIER T3: FILE LOADING
// =============================================================================

mod t3_loading {
    use super::*;
    use std::io::Write;

    /// T3.1: Out-of-range records are rejected without touching earlier cars.
    #[test]
    fn out_of_range_record_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "b 1 1 2020 15000 Honda Civic").expect("write");
        writeln!(file, "b 7 1 2020 9000 Kia Rio").expect("write");
        writeln!(file, "p 2 2 2023 52000 Audi Q7").expect("write");

        let mut vm = VendingMachine::new(2, 2).expect("machine");
        let report = load_file(&mut vm, file.path(), RecordFormat::Tagged).expect("load");

        assert_eq!(report.loaded, 2);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].position, Position::new(7, 1));
        assert!(vm.get_car(Slot::new(1, 1)).is_ok());
        assert!(vm.get_car(Slot::new(2, 2)).is_ok());
        assert!(vm.indexes_consistent());
    }

    /// T3.2: A negative position between valid records only drops that record.
    #[test]
    fn negative_position_does_not_stop_the_load() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "b 1 1 2020 15000 Honda Civic").expect("write");
        writeln!(file, "b -1 1 2019 9000 Kia Rio").expect("write");
        writeln!(file, "b 2 2 2012 6000 Ford Focus").expect("write");

        let mut vm = VendingMachine::new(2, 2).expect("machine");
        let report = load_file(&mut vm, file.path(), RecordFormat::Tagged).expect("load");

        assert!(report.malformed.is_none());
        assert_eq!(report.loaded, 2);
        assert_eq!(report.rejected[0].position, Position::new(-1, 1));
        assert_eq!(vm.get_car(Slot::new(2, 2)).expect("focus").model, "Focus");
    }

    /// T3.3: A malformed record keeps the counts gathered before it.
    #[test]
    fn malformed_record_reports_partial_counts() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "b 1 1 2020 15000 Honda Civic").expect("write");
        writeln!(file, "b 1 1 2019 9000 Kia Rio").expect("write");
        writeln!(file, "b 2 2 2012").expect("write");

        let mut vm = VendingMachine::new(2, 2).expect("machine");
        let report = load_file(&mut vm, file.path(), RecordFormat::Tagged).expect("load");

        assert_eq!(report.loaded, 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.malformed.as_ref().map(|m| m.line), Some(3));
        assert!(report.completed().is_err());
    }

    /// T3.4: Untagged files load as basic cars.
    #[test]
    fn untagged_file_loads() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "1 1 2012 6000 Toyota Corolla").expect("write");
        writeln!(file, "1 2 2016 11000.99 Mazda Three").expect("write");

        let mut vm = VendingMachine::new(1, 2).expect("machine");
        let report = load_file(&mut vm, file.path(), RecordFormat::Untagged).expect("load");

        assert_eq!(report.loaded, 2);
        assert!(
            vm.inventory()
                .iter()
                .all(|listing| listing.car.kind == CarKind::Basic)
        );
    }

    /// T3.5: A directory is not an inventory file.
    #[test]
    fn directory_is_refused() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut vm = VendingMachine::new(1, 1).expect("machine");

        let result = load_file(&mut vm, dir.path(), RecordFormat::Tagged);
        assert!(matches!(result, Err(VendError::Io(_))));
    }
}
