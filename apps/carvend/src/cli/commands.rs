//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! One-shot commands write to the stream they are handed so they can be
//! exercised without a terminal.

use crate::config::Settings;
use crate::shell::Session;
use carvend_core::{
    CarKind, LoadReport, SortCriterion, VendError, VendingMachine, load_file,
};
use std::io::Write;
use std::path::Path;

fn io_error(e: std::io::Error) -> VendError {
    VendError::Io(e.to_string())
}

fn json_error(e: serde_json::Error) -> VendError {
    VendError::Io(format!("JSON output: {}", e))
}

// =============================================================================
// SHELL COMMAND
// =============================================================================

/// Run the interactive menu on stdin/stdout.
pub fn cmd_shell(settings: &Settings) -> Result<(), VendError> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();

    let mut session = Session::setup(
        stdin.lock(),
        stdout.lock(),
        settings.floors,
        settings.spaces,
        settings.format,
    )?;
    session.run()?;

    tracing::info!(
        bankroll = %session.machine().bankroll(),
        remaining = session.machine().len(),
        "session closed"
    );
    Ok(())
}

// =============================================================================
// INVENTORY COMMAND
// =============================================================================

/// Load a file and print its inventory.
pub fn cmd_inventory(
    settings: &Settings,
    json_mode: bool,
    file: &Path,
    sort: Option<&str>,
    grid: bool,
    out: &mut impl Write,
) -> Result<(), VendError> {
    let criterion = sort.map(str::parse::<SortCriterion>).transpose()?;
    let (machine, report) = load_machine(settings, file)?;
    report.completed()?;

    let listings = match criterion {
        Some(criterion) => machine.sorted_inventory(criterion),
        None => machine.inventory(),
    };

    if json_mode {
        let mut output = serde_json::json!({
            "floors": machine.floors(),
            "spaces": machine.spaces(),
            "sort": criterion.map(|c| c.name()),
            "cars": listings,
        });
        if grid {
            output["grid"] = serde_json::to_value(machine.grid()).map_err(json_error)?;
        }
        let text = serde_json::to_string_pretty(&output).map_err(json_error)?;
        return writeln!(out, "{}", text).map_err(io_error);
    }

    if grid {
        return write!(out, "{}", machine.grid()).map_err(io_error);
    }

    if listings.is_empty() {
        return writeln!(out, "Vending Machine is Empty.").map_err(io_error);
    }
    for listing in &listings {
        writeln!(out, "{}", listing).map_err(io_error)?;
    }
    Ok(())
}

// =============================================================================
// SEARCH COMMAND
// =============================================================================

/// Load a file and list the cars of one make and type.
pub fn cmd_search(
    settings: &Settings,
    json_mode: bool,
    file: &Path,
    make: &str,
    kind: &str,
    out: &mut impl Write,
) -> Result<(), VendError> {
    let kind: CarKind = kind.parse()?;
    let (machine, report) = load_machine(settings, file)?;
    report.completed()?;
    let matches = machine.cars_by_make_kind(make, kind);

    tracing::info!(make, kind = %kind, found = matches.len(), "search complete");

    if json_mode {
        let output = serde_json::json!({
            "make": make,
            "kind": kind,
            "cars": matches,
        });
        let text = serde_json::to_string_pretty(&output).map_err(json_error)?;
        return writeln!(out, "{}", text).map_err(io_error);
    }

    if matches.is_empty() {
        return writeln!(out, "No Cars Matched the Description.").map_err(io_error);
    }
    for listing in &matches {
        writeln!(out, "{}", listing).map_err(io_error)?;
    }
    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Load a file and report placements and rejections.
///
/// The report is written even when a malformed record stopped the load; the
/// command then fails with that record's error.
pub fn cmd_check(
    settings: &Settings,
    json_mode: bool,
    file: &Path,
    out: &mut impl Write,
) -> Result<(), VendError> {
    let (machine, report) = load_machine(settings, file)?;

    if json_mode {
        let output = serde_json::json!({
            "file": file.to_string_lossy(),
            "loaded": report.loaded,
            "rejected": report.rejected,
            "malformed": report.malformed,
            "makes": machine.makes(),
        });
        let text = serde_json::to_string_pretty(&output).map_err(json_error)?;
        writeln!(out, "{}", text).map_err(io_error)?;
        return report.completed();
    }

    writeln!(out, "Inventory Check").map_err(io_error)?;
    writeln!(out, "===============").map_err(io_error)?;
    writeln!(out, "File:     {}", file.display()).map_err(io_error)?;
    writeln!(out, "Loaded:   {}", report.loaded).map_err(io_error)?;
    writeln!(out, "Rejected: {}", report.rejected.len()).map_err(io_error)?;

    for rejection in &report.rejected {
        writeln!(
            out,
            "  line {} {}: {}",
            rejection.line, rejection.position, rejection.reason
        )
        .map_err(io_error)?;
    }

    if let Some(malformed) = &report.malformed {
        writeln!(
            out,
            "Stopped:  line {}: {}",
            malformed.line, malformed.reason
        )
        .map_err(io_error)?;
    }

    let makes = machine.makes();
    if !makes.is_empty() {
        writeln!(out).map_err(io_error)?;
        writeln!(out, "Manufacturers:").map_err(io_error)?;
        for (make, count) in makes {
            writeln!(out, "  {:<12} {}", make, count).map_err(io_error)?;
        }
    }

    report.completed()
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Build a machine from settings and load `file` into it.
///
/// Rejected records and a malformed stop are logged. Only file-level
/// failures are an error here; callers decide what a short load means.
pub fn load_machine(
    settings: &Settings,
    file: &Path,
) -> Result<(VendingMachine, LoadReport), VendError> {
    let mut machine = settings.build_machine()?;

    tracing::info!("Loading {:?} (format: {:?})", file, settings.format);
    let report = load_file(&mut machine, file, settings.format)?;

    for rejection in &report.rejected {
        tracing::warn!(
            line = rejection.line,
            position = %rejection.position,
            "rejected record: {}",
            rejection.reason
        );
    }
    if let Some(malformed) = &report.malformed {
        tracing::warn!(line = malformed.line, "load stopped: {}", malformed.reason);
    }

    Ok((machine, report))
}
