//! Rate-sample history retained for diagnostics.
//!
//! Each window query made by the report task leaves a [`RateSample`] in a
//! fixed-capacity ring so a debugger (or a future host console) can inspect
//! the recent rate trend. Purely observational; nothing reads this on the
//! control path.

#![allow(dead_code)]

use heapless::HistoryBuf;
use tacho_core::{Ticks, WindowReading};

/// Number of rate samples retained in memory.
pub const RATE_HISTORY_CAPACITY: usize = 64;

/// One window-query result stamped with the time it was taken.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RateSample {
    pub taken_at: Ticks,
    pub count: u32,
    pub duration_micros: u32,
    pub rpm: u32,
}

impl RateSample {
    /// Captures a sample from a window reading.
    pub fn new(taken_at: Ticks, reading: &WindowReading) -> Self {
        Self {
            taken_at,
            count: reading.count,
            duration_micros: reading.duration_micros,
            rpm: reading.rpm(),
        }
    }
}

/// Fixed-capacity ring of recent rate samples.
#[derive(Default)]
pub struct RateHistory {
    samples: HistoryBuf<RateSample, RATE_HISTORY_CAPACITY>,
}

impl RateHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self {
            samples: HistoryBuf::new(),
        }
    }

    /// Appends a sample, evicting the oldest when full.
    pub fn record(&mut self, sample: RateSample) {
        self.samples.write(sample);
    }

    /// Most recently recorded sample, if any.
    pub fn latest(&self) -> Option<&RateSample> {
        self.samples.recent()
    }

    /// Number of samples currently retained.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` when no samples have been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.samples.len() == 0
    }

    /// Iterates samples oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &RateSample> {
        self.samples.oldest_ordered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tacho_core::WindowReading;

    fn reading(count: u32, duration_micros: u32) -> WindowReading {
        WindowReading {
            count,
            duration_micros,
            window_start: Ticks::ZERO,
        }
    }

    #[test]
    fn latest_tracks_the_newest_sample() {
        let mut history = RateHistory::new();
        assert!(history.is_empty());

        history.record(RateSample::new(Ticks(1_000), &reading(5, 500_000)));
        history.record(RateSample::new(Ticks(2_000), &reading(6, 500_000)));

        let latest = history.latest().expect("sample recorded");
        assert_eq!(latest.taken_at, Ticks(2_000));
        assert_eq!(latest.count, 6);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn capacity_evicts_oldest_samples() {
        let mut history = RateHistory::new();
        for k in 0..(RATE_HISTORY_CAPACITY as u32 + 8) {
            history.record(RateSample::new(Ticks(k), &reading(k, 1_000_000)));
        }
        assert_eq!(history.len(), RATE_HISTORY_CAPACITY);
        let oldest = history.iter().next().expect("history populated");
        assert_eq!(oldest.taken_at, Ticks(8));
    }
}
