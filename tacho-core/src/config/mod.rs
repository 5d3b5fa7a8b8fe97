//! Construction-time configuration for a tachometer input.
//!
//! Pin assignment, flank selection and debounce timing are explicit values
//! handed to the platform binding when the input is brought up; there are no
//! process-wide parameter tables.

use core::fmt;

/// Which signal transition counts as a pulse.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum EdgeFlank {
    Rising,
    #[default]
    Falling,
    Both,
}

/// Pull resistor applied to the input pin.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum PullMode {
    #[default]
    Floating,
    Up,
    Down,
}

/// Tachometer input configuration.
///
/// `debounce_micros == 0` disables the debounce gate entirely; every raw
/// edge is forwarded. `wake_from_suspend` asks the platform to also register
/// the edge handler as a low-power wake source with identical semantics.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct TachoConfig {
    pub flank: EdgeFlank,
    pub pull: PullMode,
    pub debounce_micros: u32,
    pub wake_from_suspend: bool,
}

/// Peripheral bring-up failure. The only recoverable error class: trigger
/// and read are total functions once initialization has succeeded.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InitError {
    /// The requested pin does not exist or is already claimed.
    InvalidPin,
    /// The peripheral cannot detect the requested flank.
    UnsupportedFlank,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::InvalidPin => f.write_str("invalid or unavailable input pin"),
            InitError::UnsupportedFlank => f.write_str("unsupported edge flank"),
        }
    }
}

impl core::error::Error for InitError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_driver_defaults() {
        let config = TachoConfig::default();
        assert_eq!(config.flank, EdgeFlank::Falling);
        assert_eq!(config.pull, PullMode::Floating);
        assert_eq!(config.debounce_micros, 0);
        assert!(!config.wake_from_suspend);
    }
}
