//! # Configuration
//!
//! Settings come from three layers, highest precedence first:
//!
//! 1. Command-line flags (`--floors`, `--spaces`, `--format`)
//! 2. A TOML file (`--config PATH`, or `carvend.toml` if present)
//! 3. Built-in defaults
//!
//! ```toml
//! [machine]
//! floors = 3
//! spaces = 4
//!
//! [load]
//! format = "tagged"
//! ```

use carvend_core::{RecordFormat, VendError, VendingMachine};
use serde::Deserialize;
use std::path::Path;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "carvend.toml";

/// Maximum config file size (64 KB).
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

/// Contents of a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Machine dimensions.
    #[serde(default)]
    pub machine: MachineConfig,
    /// Inventory file options.
    #[serde(default)]
    pub load: LoadConfig,
}

/// `[machine]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineConfig {
    /// Number of floors.
    pub floors: Option<usize>,
    /// Spaces per floor.
    pub spaces: Option<usize>,
}

/// `[load]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadConfig {
    /// Record layout of inventory files.
    #[serde(default)]
    pub format: RecordFormat,
}

impl Config {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, VendError> {
        toml::from_str(text).map_err(|e| VendError::Config(e.to_string()))
    }

    /// Read a config file that must exist.
    pub fn load(path: &Path) -> Result<Self, VendError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            VendError::Config(format!("Cannot read '{}': {}", path.display(), e))
        })?;

        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(VendError::Config(format!(
                "'{}' is larger than {} bytes",
                path.display(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            VendError::Config(format!("Cannot read '{}': {}", path.display(), e))
        })?;

        Self::from_toml_str(&text)
    }

    /// Read a config file if it exists, otherwise return defaults.
    pub fn load_optional(path: &Path) -> Result<Self, VendError> {
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Layer command-line overrides on top of this config.
    #[must_use]
    pub fn resolve(
        self,
        floors: Option<usize>,
        spaces: Option<usize>,
        format: Option<RecordFormat>,
    ) -> Settings {
        Settings {
            floors: floors.or(self.machine.floors),
            spaces: spaces.or(self.machine.spaces),
            format: format.unwrap_or(self.load.format),
        }
    }
}

/// Effective settings after all layers are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Floors, if known. The interactive shell prompts when absent.
    pub floors: Option<usize>,
    /// Spaces per floor, if known.
    pub spaces: Option<usize>,
    /// Inventory record layout.
    pub format: RecordFormat,
}

impl Settings {
    /// Build an empty machine from configured dimensions.
    ///
    /// Fails when either dimension is missing.
    pub fn build_machine(&self) -> Result<VendingMachine, VendError> {
        match (self.floors, self.spaces) {
            (Some(floors), Some(spaces)) => VendingMachine::new(floors, spaces),
            _ => Err(VendError::Config(
                "machine size unknown: pass --floors and --spaces or set [machine] in the config"
                    .to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_toml_str("").expect("parse");
        assert_eq!(config, Config::default());
        assert_eq!(config.load.format, RecordFormat::Tagged);
    }

    #[test]
    fn full_config_parses() {
        let config = Config::from_toml_str(
            "[machine]\nfloors = 3\nspaces = 4\n\n[load]\nformat = \"untagged\"\n",
        )
        .expect("parse");

        assert_eq!(config.machine.floors, Some(3));
        assert_eq!(config.machine.spaces, Some(4));
        assert_eq!(config.load.format, RecordFormat::Untagged);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = Config::from_toml_str("[machine]\nfloorz = 3\n");
        assert!(matches!(result, Err(VendError::Config(_))));
    }

    #[test]
    fn flags_override_file() {
        let config = Config::from_toml_str("[machine]\nfloors = 3\nspaces = 4\n").expect("parse");
        let settings = config.resolve(Some(9), None, Some(RecordFormat::Untagged));

        assert_eq!(settings.floors, Some(9));
        assert_eq!(settings.spaces, Some(4));
        assert_eq!(settings.format, RecordFormat::Untagged);
    }

    #[test]
    fn build_machine_needs_both_dimensions() {
        let settings = Config::default().resolve(Some(2), None, None);
        assert!(matches!(
            settings.build_machine(),
            Err(VendError::Config(_))
        ));

        let settings = Config::default().resolve(Some(2), Some(3), None);
        let vm = settings.build_machine().expect("machine");
        assert_eq!((vm.floors(), vm.spaces()), (2, 3));
    }

    #[test]
    fn missing_optional_file_is_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load_optional(&dir.path().join("nope.toml")).expect("load");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn missing_required_file_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(Config::load(&dir.path().join("nope.toml")).is_err());
    }
}
