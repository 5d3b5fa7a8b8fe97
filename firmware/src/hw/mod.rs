//! Peripheral adapters binding `tacho-core` seams to the Embassy HAL.
//!
//! Configuration checks that do not touch hardware live here so they run in
//! host unit tests; the EXTI bring-up itself is target-gated in [`exti`].

#![allow(dead_code)]

#[cfg(target_os = "none")]
mod exti;
#[cfg(target_os = "none")]
pub use exti::{EmbassyClock, init_input};

use tacho_core::{EdgeFlank, InitError, TachoConfig};

/// Checks a tachometer configuration against what the input path can
/// deliver.
///
/// The PWR wakeup logic latches a single programmed polarity per line, so an
/// input that must wake the core from suspend cannot watch both flanks.
pub fn validate_config(config: &TachoConfig) -> Result<(), InitError> {
    if config.wake_from_suspend && config.flank == EdgeFlank::Both {
        return Err(InitError::UnsupportedFlank);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wake_capable_input_rejects_both_flanks() {
        let config = TachoConfig {
            flank: EdgeFlank::Both,
            wake_from_suspend: true,
            ..TachoConfig::default()
        };
        assert_eq!(
            validate_config(&config),
            Err(InitError::UnsupportedFlank)
        );
    }

    #[test]
    fn both_flanks_are_fine_without_wake() {
        let config = TachoConfig {
            flank: EdgeFlank::Both,
            ..TachoConfig::default()
        };
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn single_flank_wake_input_passes() {
        let config = TachoConfig {
            flank: EdgeFlank::Falling,
            wake_from_suspend: true,
            ..TachoConfig::default()
        };
        assert_eq!(validate_config(&config), Ok(()));
    }
}
