//! Process exit codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Labels reconciled, run skipped, or dry run |
//! | 1 | Some label mutations failed, or an unexpected error |
//! | 2 | Configuration is missing or invalid |
//! | 3 | The issue or its labels could not be read |

use crate::config::ConfigError;
use crate::tracker::TrackerError;

pub const SUCCESS: u8 = 0;

/// Label mutations partially failed
pub const MUTATION_FAILED: u8 = 1;

/// Fallback for errors without a dedicated code
pub const GENERIC_ERROR: u8 = 1;

pub const CONFIG_ERROR: u8 = 2;

pub const TRACKER_ERROR: u8 = 3;

/// Map an error that aborted the run to its exit code
pub fn exit_code_for(error: &anyhow::Error) -> u8 {
    if error.downcast_ref::<ConfigError>().is_some() {
        CONFIG_ERROR
    } else if error.downcast_ref::<TrackerError>().is_some() {
        TRACKER_ERROR
    } else {
        GENERIC_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_code_mapping() {
        let config = anyhow::Error::new(ConfigError::MissingToken);
        assert_eq!(exit_code_for(&config), CONFIG_ERROR);

        let tracker: anyhow::Result<()> =
            Err(TrackerError::NotFound("issue o/r#1".to_string())).context("Failed to fetch issue");
        assert_eq!(exit_code_for(&tracker.unwrap_err()), TRACKER_ERROR);

        assert_eq!(exit_code_for(&anyhow::anyhow!("boom")), GENERIC_ERROR);
    }
}
