//! Wrapping 32-bit tick arithmetic and the monotonic clock seam.
//!
//! The measurement engine never talks to a hardware timer directly. Platform
//! crates implement [`Clock`] over whatever tick source they have (an Embassy
//! instant, a host virtual clock, a test fixture) and the engine only ever
//! performs wrapping differences and unit conversions on the values it is
//! handed. All arithmetic is deliberately `u32`: a 1 MHz tick source wraps
//! roughly every 71 minutes, which the wrapping difference absorbs as long as
//! no single measured span exceeds one full wrap.

use core::fmt;

/// Opaque monotonic instant expressed in raw timer ticks.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Ticks(pub u32);

impl Ticks {
    /// The zero instant, used to seed freshly cleared slots.
    pub const ZERO: Ticks = Ticks(0);

    /// Returns the raw tick value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Wrapping span from `earlier` up to `self`.
    ///
    /// Correct across a single counter wrap; instants more than one full wrap
    /// apart are indistinguishable from their modular reduction.
    pub const fn span_since(self, earlier: Ticks) -> TickSpan {
        TickSpan(self.0.wrapping_sub(earlier.0))
    }
}

/// Unsigned distance between two [`Ticks`] instants.
///
/// Unlike instants, spans have a total order, so threshold comparisons
/// (`min_duration`, debounce quiet periods) operate on spans only.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct TickSpan(pub u32);

impl TickSpan {
    /// An empty span.
    pub const ZERO: TickSpan = TickSpan(0);

    /// Returns the span length in raw ticks.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TickSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ticks", self.0)
    }
}

/// Monotonic tick source with tick/microsecond conversion.
///
/// Implementations only supply "now" and unit conversion; wraparound handling
/// lives in [`Ticks::span_since`].
pub trait Clock {
    /// Samples the current instant.
    fn now(&self) -> Ticks;

    /// Converts a span to microseconds.
    fn span_to_micros(&self, span: TickSpan) -> u32;

    /// Converts a microsecond duration to the equivalent span.
    fn micros_to_span(&self, micros: u32) -> TickSpan;
}
