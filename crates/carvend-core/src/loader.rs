//! # Inventory Loader
//!
//! Reads whitespace-delimited inventory records into a machine.
//!
//! Two record layouts are understood:
//! - `Tagged`: `type floor space year price make model` (`type` is `b` or `p`)
//! - `Untagged`: `floor space year price make model`, loaded as basic cars
//!
//! One record per line; blank lines are skipped. Positions are 1-based.
//!
//! ## Failure Model
//!
//! - A malformed record stops the load. Cars placed by earlier records stay
//!   in the machine and the report says where it stopped.
//! - A well-formed record that cannot be placed (zero, negative or out of
//!   bounds position, occupied slot) is rejected and the load continues.

use crate::primitives::{
    MAX_INVENTORY_FILE_SIZE, MAX_NAME_LENGTH, TAGGED_RECORD_TOKENS, UNTAGGED_RECORD_TOKENS,
};
use crate::{Car, CarKind, Position, Price, VendError, VendingMachine};
use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;
use std::path::Path;
use std::str::FromStr;

/// Layout of an inventory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    /// Leading `b`/`p` type tag.
    #[default]
    Tagged,
    /// No type tag; every car is basic.
    Untagged,
}

impl FromStr for RecordFormat {
    type Err = VendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tagged" => Ok(RecordFormat::Tagged),
            "untagged" => Ok(RecordFormat::Untagged),
            _ => Err(VendError::Config(format!(
                "Unknown record format: {}. Use: tagged, untagged",
                s
            ))),
        }
    }
}

/// A record that parsed but could not be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// 1-based line number.
    pub line: usize,
    /// Requested position.
    pub position: Position,
    /// Why placement failed.
    pub reason: String,
}

/// The record that stopped a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Malformed {
    /// 1-based line number.
    pub line: usize,
    /// What was wrong with the record.
    pub reason: String,
}

/// Outcome of a load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Number of cars placed.
    pub loaded: usize,
    /// Records that could not be placed.
    pub rejected: Vec<Rejection>,
    /// Set when a malformed record cut the load short.
    pub malformed: Option<Malformed>,
}

impl LoadReport {
    /// `Ok` if every line was read, otherwise the malformed record as an error.
    pub fn completed(&self) -> Result<(), VendError> {
        match &self.malformed {
            None => Ok(()),
            Some(m) => Err(VendError::MalformedRecord {
                line: m.line,
                reason: m.reason.clone(),
            }),
        }
    }
}

/// A single parsed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Target position as written.
    pub position: Position,
    /// The car to place.
    pub car: Car,
}

/// Parse one line into a record.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_record(
    text: &str,
    line: usize,
    format: RecordFormat,
) -> Result<Option<Record>, VendError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(None);
    }

    let malformed = |reason: String| VendError::MalformedRecord { line, reason };

    let expected = match format {
        RecordFormat::Tagged => TAGGED_RECORD_TOKENS,
        RecordFormat::Untagged => UNTAGGED_RECORD_TOKENS,
    };
    if tokens.len() != expected {
        return Err(malformed(format!(
            "expected {} fields, found {}",
            expected,
            tokens.len()
        )));
    }

    let (kind, fields) = match format {
        RecordFormat::Tagged => {
            let kind = tokens[0]
                .parse::<CarKind>()
                .map_err(|e| malformed(e.to_string()))?;
            (kind, &tokens[1..])
        }
        RecordFormat::Untagged => (CarKind::Basic, &tokens[..]),
    };

    let floor = parse_coordinate(fields[0])
        .ok_or_else(|| malformed(format!("invalid floor '{}'", fields[0])))?;
    let space = parse_coordinate(fields[1])
        .ok_or_else(|| malformed(format!("invalid space '{}'", fields[1])))?;
    let year: u16 = fields[2]
        .parse()
        .map_err(|_| malformed(format!("invalid year '{}'", fields[2])))?;
    let price: Price = fields[3].parse().map_err(|e: VendError| malformed(e.to_string()))?;
    let make = fields[4];
    let model = fields[5];

    if make.len() > MAX_NAME_LENGTH || model.len() > MAX_NAME_LENGTH {
        return Err(malformed(format!(
            "make and model must be at most {} bytes",
            MAX_NAME_LENGTH
        )));
    }

    Ok(Some(Record {
        position: Position::new(floor, space),
        car: Car::new(kind, year, price, make, model),
    }))
}

/// Any integer is a coordinate; out-of-range values clamp to the `i64` bounds.
fn parse_coordinate(token: &str) -> Option<i64> {
    match token.parse::<i64>() {
        Ok(n) => Some(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

/// Load inventory records from text into `machine`.
///
/// Never fails outright: a malformed record ends the load and is recorded in
/// [`LoadReport::malformed`] alongside the counts up to that line.
pub fn load_str(machine: &mut VendingMachine, text: &str, format: RecordFormat) -> LoadReport {
    let mut report = LoadReport::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let record = match parse_record(raw, line, format) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(VendError::MalformedRecord { line, reason }) => {
                report.malformed = Some(Malformed { line, reason });
                break;
            }
            Err(e) => {
                report.malformed = Some(Malformed {
                    line,
                    reason: e.to_string(),
                });
                break;
            }
        };

        let placed = match record.position.to_slot() {
            Some(slot) => machine.add_car(record.car, slot).map(|_| ()),
            None => Err(VendError::InvalidPosition(record.position)),
        };

        match placed {
            Ok(()) => report.loaded += 1,
            Err(e) => report.rejected.push(Rejection {
                line,
                position: record.position,
                reason: e.to_string(),
            }),
        }
    }

    report
}

/// Load an inventory file into `machine`.
///
/// A missing file yields `FileNotFound`; files above
/// [`MAX_INVENTORY_FILE_SIZE`] are refused before reading. Record problems
/// are reported in the returned [`LoadReport`].
pub fn load_file(
    machine: &mut VendingMachine,
    path: impl AsRef<Path>,
    format: RecordFormat,
) -> Result<LoadReport, VendError> {
    let path = path.as_ref();

    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => VendError::FileNotFound(path.to_path_buf()),
        _ => VendError::Io(format!("Cannot read file metadata: {}", e)),
    })?;

    if !metadata.is_file() {
        return Err(VendError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    if metadata.len() > MAX_INVENTORY_FILE_SIZE {
        return Err(VendError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_INVENTORY_FILE_SIZE
        )));
    }

    let text = std::fs::read_to_string(path)
        .map_err(|e| VendError::Io(format!("Read file: {}", e)))?;

    Ok(load_str(machine, &text, format))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Slot;

    fn machine() -> VendingMachine {
        VendingMachine::new(2, 3).expect("machine")
    }

    #[test]
    fn parse_tagged_record() {
        let record = parse_record("p 1 2 2021 45000.50 BMW X5", 1, RecordFormat::Tagged)
            .expect("parse")
            .expect("record");

        assert_eq!(record.position, Position::new(1, 2));
        assert_eq!(record.car.kind, CarKind::Premium);
        assert_eq!(record.car.year, 2021);
        assert_eq!(record.car.price, Price::from_cents(4_500_050));
        assert_eq!(record.car.make, "BMW");
        assert_eq!(record.car.model, "X5");
    }

    #[test]
    fn parse_untagged_record_is_basic() {
        let record = parse_record("2 1 2015 8000 Ford Focus", 1, RecordFormat::Untagged)
            .expect("parse")
            .expect("record");

        assert_eq!(record.car.kind, CarKind::Basic);
        assert_eq!(record.position, Position::new(2, 1));
    }

    #[test]
    fn blank_line_is_skipped() {
        assert!(
            parse_record("   \t ", 3, RecordFormat::Tagged)
                .expect("parse")
                .is_none()
        );
    }

    #[test]
    fn wrong_field_count_is_malformed() {
        let result = parse_record("b 1 1 2020 100 Honda", 4, RecordFormat::Tagged);
        assert!(matches!(
            result,
            Err(VendError::MalformedRecord { line: 4, .. })
        ));
    }

    #[test]
    fn unknown_tag_is_malformed() {
        let result = parse_record("x 1 1 2020 100 Honda Civic", 1, RecordFormat::Tagged);
        assert!(matches!(result, Err(VendError::MalformedRecord { .. })));
    }

    #[test]
    fn signed_and_huge_coordinates_parse() {
        let record = parse_record("b -1 0 2020 100 Kia Rio", 1, RecordFormat::Tagged)
            .expect("parse")
            .expect("record");
        assert_eq!(record.position, Position::new(-1, 0));

        let record = parse_record(
            "b 99999999999999999999 1 2020 100 Kia Rio",
            1,
            RecordFormat::Tagged,
        )
        .expect("parse")
        .expect("record");
        assert_eq!(record.position, Position::new(i64::MAX, 1));
    }

    #[test]
    fn non_numeric_fields_are_malformed() {
        for text in [
            "b one 1 2020 100 Honda Civic",
            "b 1 1.5 2020 100 Honda Civic",
            "b 1 1 twenty 100 Honda Civic",
            "b 1 1 2020 cheap Honda Civic",
        ] {
            assert!(
                matches!(
                    parse_record(text, 1, RecordFormat::Tagged),
                    Err(VendError::MalformedRecord { .. })
                ),
                "{text:?} should be malformed"
            );
        }
    }

    #[test]
    fn load_places_cars_and_reports_rejections() {
        let mut vm = machine();
        let text = "b 1 1 2020 15000 Honda Civic\n\
                    p 1 1 2022 50000 BMW M3\n\
                    \n\
                    b 9 9 2019 9000 Kia Rio\n\
                    p 2 3 2023 70000 Audi RS6\n";

        let report = load_str(&mut vm, text, RecordFormat::Tagged);

        assert_eq!(report.loaded, 2);
        assert_eq!(report.rejected.len(), 2);
        assert!(report.completed().is_ok());
        assert_eq!(report.rejected[0].line, 2);
        assert_eq!(report.rejected[1].line, 4);
        assert_eq!(report.rejected[1].reason, "Invalid space at (9, 9).");
        assert_eq!(vm.len(), 2);
        assert!(vm.indexes_consistent());
    }

    #[test]
    fn negative_position_is_rejected_and_load_continues() {
        let mut vm = VendingMachine::new(2, 2).expect("machine");
        let text = "b 1 1 2020 15000 Honda Civic\n\
                    b -1 1 2019 9000 Kia Rio\n\
                    b 99999999999999999999 1 2019 9000 Kia Soul\n\
                    b 2 2 2012 6000 Ford Focus\n";

        let report = load_str(&mut vm, text, RecordFormat::Tagged);

        assert!(report.completed().is_ok());
        assert_eq!(report.loaded, 2);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0].line, 2);
        assert_eq!(report.rejected[0].position, Position::new(-1, 1));
        assert_eq!(report.rejected[0].reason, "Invalid space at (-1, 1).");
        assert_eq!(report.rejected[1].line, 3);
        assert!(vm.get_car(Slot::new(2, 2)).is_ok());
        assert!(vm.indexes_consistent());
    }

    #[test]
    fn zero_position_is_rejected() {
        let mut vm = machine();
        let report = load_str(&mut vm, "p 0 1 2020 100 Kia Rio\n", RecordFormat::Tagged);

        assert_eq!(report.loaded, 0);
        assert_eq!(report.rejected[0].reason, "Invalid space at (0, 1).");
    }

    #[test]
    fn malformed_record_keeps_earlier_cars() {
        let mut vm = machine();
        let text = "b 1 1 2020 15000 Honda Civic\n\
                    b 3 3 2020 100 Kia Ceed\n\
                    b 1 2 oops 100 Kia Rio\n\
                    b 1 3 2020 100 Kia Soul\n";

        let report = load_str(&mut vm, text, RecordFormat::Tagged);

        assert_eq!(report.loaded, 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.malformed.as_ref().map(|m| m.line), Some(3));
        assert!(matches!(
            report.completed(),
            Err(VendError::MalformedRecord { line: 3, .. })
        ));
        assert_eq!(vm.len(), 1);
        assert!(vm.get_car(Slot::new(1, 1)).is_ok());
        assert!(vm.get_car(Slot::new(1, 3)).is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let mut vm = machine();
        let result = load_file(&mut vm, "/definitely/not/here.txt", RecordFormat::Tagged);
        assert!(matches!(result, Err(VendError::FileNotFound(_))));
    }

    #[test]
    fn record_format_parses() {
        assert_eq!(
            "Untagged".parse::<RecordFormat>().expect("parse"),
            RecordFormat::Untagged
        );
        assert!("csv".parse::<RecordFormat>().is_err());
    }
}
