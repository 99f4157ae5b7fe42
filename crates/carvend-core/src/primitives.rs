//! # Machine Primitives
//!
//! Hardcoded limits and constants for the vending machine core.
//!
//! These are compiled into the binary and are immutable at runtime.

/// Number of cents in one currency unit.
pub const CENTS_PER_UNIT: u64 = 100;

/// Maximum number of floors a machine may be built with.
///
/// The grid is allocated eagerly, so sizes are bounded.
pub const MAX_FLOORS: usize = 1000;

/// Maximum number of spaces per floor.
pub const MAX_SPACES: usize = 1000;

// =============================================================================
// INVENTORY FILE LIMITS
// =============================================================================

/// Maximum inventory file size accepted by the loader (10 MB).
pub const MAX_INVENTORY_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Token count of a tagged record: `type floor space year price make model`.
pub const TAGGED_RECORD_TOKENS: usize = 7;

/// Token count of an untagged record: `floor space year price make model`.
pub const UNTAGGED_RECORD_TOKENS: usize = 6;

/// Maximum length of a make or model name.
pub const MAX_NAME_LENGTH: usize = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_records_carry_one_extra_token() {
        assert_eq!(TAGGED_RECORD_TOKENS, UNTAGGED_RECORD_TOKENS + 1);
    }
}
