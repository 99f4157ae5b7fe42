//! # Interactive Shell
//!
//! The numbered menu loop. A [`Session`] owns the machine plus its input and
//! output streams, so the whole conversation can be driven from any
//! `BufRead`/`Write` pair.
//!
//! Failures never end the session: they are printed and the menu is shown
//! again. End of input behaves like the Exit command.

use carvend_core::primitives::{MAX_FLOORS, MAX_SPACES};
use carvend_core::{
    CarKind, Listing, RecordFormat, Slot, SortCriterion, VendError, VendingMachine, load_file,
};
use std::fmt::Display;
use std::io::{BufRead, Write};

// =============================================================================
// MENU
// =============================================================================

/// A menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    /// Load cars from an inventory file.
    Load,
    /// List the inventory in arrival order.
    Display,
    /// Retrieve a car for a test drive.
    Retrieve,
    /// List the inventory by price.
    SortByPrice,
    /// List the inventory by year.
    SortByYear,
    /// Find cars by manufacturer and type.
    Search,
    /// Queue a car for washing.
    Wash,
    /// Wash every queued car.
    ProcessWash,
    /// Sell a car.
    Sell,
    /// Leave the shell.
    Exit,
    /// List the inventory by make and model.
    SortAlphabetical,
    /// Show the floor/space layout.
    Grid,
    /// Show sales revenue.
    Bankroll,
}

impl MenuCommand {
    /// Every command, in menu order.
    pub const ALL: [MenuCommand; 13] = [
        MenuCommand::Load,
        MenuCommand::Display,
        MenuCommand::Retrieve,
        MenuCommand::SortByPrice,
        MenuCommand::SortByYear,
        MenuCommand::Search,
        MenuCommand::Wash,
        MenuCommand::ProcessWash,
        MenuCommand::Sell,
        MenuCommand::Exit,
        MenuCommand::SortAlphabetical,
        MenuCommand::Grid,
        MenuCommand::Bankroll,
    ];

    /// Menu number, starting at 1.
    #[must_use]
    pub fn number(self) -> usize {
        Self::ALL
            .iter()
            .position(|c| *c == self)
            .map_or(0, |idx| idx + 1)
    }

    /// Look up a command by its menu number.
    #[must_use]
    pub fn from_number(number: usize) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|idx| Self::ALL.get(idx))
            .copied()
    }

    /// Menu text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MenuCommand::Load => "Load Car Data from File",
            MenuCommand::Display => "Display Vending Machine",
            MenuCommand::Retrieve => "Retrieve a Car by Location (Floor, Space)",
            MenuCommand::SortByPrice => "Print Sorted Inventory (Price)",
            MenuCommand::SortByYear => "Print Sorted Inventory (Year)",
            MenuCommand::Search => "Search for Cars (Manufacturer & Type)",
            MenuCommand::Wash => "Add Car to Wash Queue",
            MenuCommand::ProcessWash => "Process Car Wash Queue",
            MenuCommand::Sell => "Sell Car",
            MenuCommand::Exit => "Exit",
            MenuCommand::SortAlphabetical => "Print Sorted Inventory (Alphabetical)",
            MenuCommand::Grid => "Display Floor Grid",
            MenuCommand::Bankroll => "Show Bankroll",
        }
    }
}

const POSITIVE_INTEGER_ERROR: &str = "Error: Please Enter a Non-zero Positive Integer.";
const EMPTY_MACHINE: &str = "Vending Machine is Empty.";

fn io_error(e: std::io::Error) -> VendError {
    VendError::Io(e.to_string())
}

// =============================================================================
// CONSOLE
// =============================================================================

/// Line-oriented input paired with an output stream.
struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Next trimmed input line, or `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>, VendError> {
        let mut buf = String::new();
        let read = self.input.read_line(&mut buf).map_err(io_error)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }

    fn say(&mut self, line: impl Display) -> Result<(), VendError> {
        writeln!(self.output, "{}", line).map_err(io_error)
    }

    fn say_all<I>(&mut self, lines: I) -> Result<(), VendError>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        for line in lines {
            self.say(line)?;
        }
        Ok(())
    }

    /// Write without a trailing newline and flush, for prompts.
    fn write_raw(&mut self, text: &str) -> Result<(), VendError> {
        self.output.write_all(text.as_bytes()).map_err(io_error)?;
        self.output.flush().map_err(io_error)
    }

    /// Prompt until a positive integer no larger than `max` is entered.
    fn prompt_dimension(&mut self, prompt: &str, max: usize) -> Result<usize, VendError> {
        loop {
            self.write_raw(prompt)?;
            let line = self
                .read_line()?
                .ok_or_else(|| VendError::Io("input closed during setup".to_string()))?;

            match parse_positive(&line) {
                Some(n) if n <= max => return Ok(n),
                Some(_) => self.say(format!("Error: Please Enter at most {}.", max))?,
                None => self.say(POSITIVE_INTEGER_ERROR)?,
            }
        }
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Explicit state of one interactive run.
pub struct Session<R, W> {
    machine: VendingMachine,
    format: RecordFormat,
    console: Console<R, W>,
    running: bool,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Start a session, prompting for any dimension not already known.
    ///
    /// Prompted sizes are asked again until they are in range; preset sizes
    /// the machine rejects are an error. Fails if input ends before the
    /// machine could be sized.
    pub fn setup(
        input: R,
        output: W,
        floors: Option<usize>,
        spaces: Option<usize>,
        format: RecordFormat,
    ) -> Result<Self, VendError> {
        let mut console = Console { input, output };
        console.say("=== Car Vending Machine Setup ===")?;

        let floors = match floors {
            Some(n) => n,
            None => console.prompt_dimension("Enter Number of Floors > ", MAX_FLOORS)?,
        };
        let spaces = match spaces {
            Some(n) => n,
            None => console.prompt_dimension("Enter Number of Spaces > ", MAX_SPACES)?,
        };
        let machine = VendingMachine::new(floors, spaces)?;

        tracing::info!(
            floors = machine.floors(),
            spaces = machine.spaces(),
            "machine ready"
        );

        Ok(Self {
            machine,
            format,
            console,
            running: true,
        })
    }

    /// The machine driven by this session.
    #[must_use]
    pub fn machine(&self) -> &VendingMachine {
        &self.machine
    }

    /// Consume the session, returning its output stream.
    pub fn into_output(self) -> W {
        self.console.output
    }

    /// Run the menu loop until Exit or end of input.
    pub fn run(&mut self) -> Result<(), VendError> {
        while self.running {
            self.display_menu()?;
            if let Some(command) = self.read_command()? {
                self.run_command(command)?;
            }
        }
        self.console.output.flush().map_err(io_error)
    }

    /// Execute a single menu command.
    pub fn run_command(&mut self, command: MenuCommand) -> Result<(), VendError> {
        tracing::debug!(command = ?command, "dispatching");

        match command {
            MenuCommand::Load => self.load(),
            MenuCommand::Display => {
                let lines = render_listings(&self.machine.inventory());
                self.console.say_all(lines)
            }
            MenuCommand::Retrieve => {
                let Some(slot) = self.prompt_slot()? else {
                    return Ok(());
                };
                let message = match self.machine.test_drive(slot) {
                    Ok(car) => format!("Car retrieved: {}", car),
                    Err(e) => e.to_string(),
                };
                self.console.say(message)
            }
            MenuCommand::SortByPrice => self.print_sorted(SortCriterion::Price),
            MenuCommand::SortByYear => self.print_sorted(SortCriterion::Year),
            MenuCommand::SortAlphabetical => self.print_sorted(SortCriterion::Alphabetical),
            MenuCommand::Search => self.search(),
            MenuCommand::Wash => {
                let Some(slot) = self.prompt_slot()? else {
                    return Ok(());
                };
                let message = match self.machine.add_car_to_wash(slot) {
                    Ok(car) => format!("Added to wash queue: {}", car),
                    Err(e) => e.to_string(),
                };
                self.console.say(message)
            }
            MenuCommand::ProcessWash => {
                let washed = self.machine.process_wash_queue();
                if washed.is_empty() {
                    return self.console.say("No cars in the wash queue.");
                }
                self.console
                    .say_all(washed.iter().map(|car| format!("Washing: {}", car)))
            }
            MenuCommand::Sell => {
                let Some(slot) = self.prompt_slot()? else {
                    return Ok(());
                };
                match self.machine.sell_car(slot) {
                    Ok(sale) => {
                        tracing::info!(slot = %sale.slot, price = %sale.car.price, "car sold");
                        self.console.say(format!("Car Sold: {}", sale.car))?;
                        self.console.say(format!("Bankroll: {}", sale.bankroll))
                    }
                    Err(e) => self.console.say(e),
                }
            }
            MenuCommand::Grid => {
                let rendered = self.machine.grid().to_string();
                self.console.write_raw(&rendered)
            }
            MenuCommand::Bankroll => {
                let bankroll = self.machine.bankroll();
                self.console.say(format!("Bankroll: {}", bankroll))
            }
            MenuCommand::Exit => {
                self.running = false;
                Ok(())
            }
        }
    }

    // =========================================================================
    // COMMAND HELPERS
    // =========================================================================

    fn load(&mut self) -> Result<(), VendError> {
        self.console.write_raw("Enter File Path > ")?;
        let Some(path) = self.read_line()? else {
            return Ok(());
        };

        tracing::info!(path = %path, format = ?self.format, "loading inventory");

        match load_file(&mut self.machine, &path, self.format) {
            Ok(report) => {
                for rejection in &report.rejected {
                    tracing::warn!(line = rejection.line, position = %rejection.position, "record rejected");
                    self.console.say(format!(
                        "Error: line {}: {}",
                        rejection.line, rejection.reason
                    ))?;
                }
                if let Err(e) = report.completed() {
                    tracing::warn!(error = %e, "load stopped early");
                    self.console.say(format!("Error: {}", e))?;
                }
                self.console.say(format!("Loaded {} cars.", report.loaded))
            }
            Err(e) => {
                tracing::warn!(error = %e, "load aborted");
                self.console.say(format!("Error: {}", e))
            }
        }
    }

    fn print_sorted(&mut self, criterion: SortCriterion) -> Result<(), VendError> {
        let lines = render_listings(&self.machine.sorted_inventory(criterion));
        self.console.say_all(lines)
    }

    fn search(&mut self) -> Result<(), VendError> {
        self.console.write_raw("Enter Manufacturer > ")?;
        let Some(make) = self.read_line()? else {
            return Ok(());
        };
        self.console
            .write_raw("Enter Type (B) basic, (P) premium > ")?;
        let Some(kind) = self.read_line()? else {
            return Ok(());
        };

        let kind: CarKind = match kind.parse() {
            Ok(kind) => kind,
            Err(e) => return self.console.say(format!("Error: {}", e)),
        };

        let lines: Vec<String> = self
            .machine
            .cars_by_make_kind(&make, kind)
            .iter()
            .map(ToString::to_string)
            .collect();
        if lines.is_empty() {
            return self.console.say("No Cars Matched the Description.");
        }
        self.console.say_all(lines)
    }

    // =========================================================================
    // INPUT
    // =========================================================================

    fn display_menu(&mut self) -> Result<(), VendError> {
        self.console.say("")?;
        self.console.say("=== Car Vending Machine Menu ===")?;
        for command in MenuCommand::ALL {
            self.console
                .say(format!("{}. {}", command.number(), command.label()))?;
        }
        self.console.say("")
    }

    /// Read menu numbers until a valid one arrives. `None` at end of input.
    fn read_command(&mut self) -> Result<Option<MenuCommand>, VendError> {
        loop {
            self.console.write_raw("> ")?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };

            match line.parse::<usize>().ok().and_then(MenuCommand::from_number) {
                Some(command) => return Ok(Some(command)),
                None => self.console.say("Error: enter a valid command")?,
            }
        }
    }

    /// Ask for a floor and a space. `None` if either is missing or not a
    /// positive integer.
    fn prompt_slot(&mut self) -> Result<Option<Slot>, VendError> {
        self.console.write_raw("Enter Floor > ")?;
        let Some(floor) = self.read_line()? else {
            return Ok(None);
        };
        self.console.write_raw("Enter Space > ")?;
        let Some(space) = self.read_line()? else {
            return Ok(None);
        };

        match (parse_positive(&floor), parse_positive(&space)) {
            (Some(floor), Some(space)) => Ok(Some(Slot::new(floor, space))),
            _ => {
                self.console.say(POSITIVE_INTEGER_ERROR)?;
                Ok(None)
            }
        }
    }

    /// Read a line; end of input stops the session.
    fn read_line(&mut self) -> Result<Option<String>, VendError> {
        let line = self.console.read_line()?;
        if line.is_none() {
            self.running = false;
        }
        Ok(line)
    }
}

/// One display line per listing, or the empty-machine notice.
fn render_listings(listings: &[Listing<'_>]) -> Vec<String> {
    if listings.is_empty() {
        return vec![EMPTY_MACHINE.to_string()];
    }
    listings.iter().map(ToString::to_string).collect()
}

fn parse_positive(text: &str) -> Option<usize> {
    text.trim().parse::<usize>().ok().filter(|n| *n > 0)
}
