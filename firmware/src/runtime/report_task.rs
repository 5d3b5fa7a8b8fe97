use embassy_time::Timer;

use crate::hw::EmbassyClock;
use crate::telemetry::{RateHistory, RateSample};
use tacho_core::{Clock, PulseRing};

/// Window requested by the periodic report, in microseconds.
const REPORT_WINDOW_MICROS: u32 = 3_000_000;

/// Seconds between reports.
const REPORT_PERIOD_SECS: u64 = 1;

/// Periodically queries the accumulator and logs the measured rate.
#[embassy_executor::task]
pub async fn run(ring: &'static PulseRing<'static>) -> ! {
    let clock = EmbassyClock;
    let mut history = RateHistory::new();

    loop {
        Timer::after_secs(REPORT_PERIOD_SECS).await;

        let reading = ring.read(&clock, REPORT_WINDOW_MICROS);
        let sample = RateSample::new(clock.now(), &reading);
        history.record(sample);

        defmt::info!(
            "tacho: {=u32} pulses / {=u32} us ({=u32} rpm)",
            reading.count,
            reading.duration_micros,
            sample.rpm,
        );
    }
}
