use embassy_stm32::exti::ExtiInput;
use embassy_time::Timer;

use crate::hw::EmbassyClock;
use tacho_core::{Clock, DebounceGate, EdgeDecision, EdgeFlank, PulseRing, TachoConfig};

/// Awaits configured edges on the tachometer pin and feeds the accumulator.
///
/// Debounce masking is expressed by simply not re-awaiting the EXTI line
/// until the quiet timer has elapsed: while this task sleeps, edge events
/// are not observed, which is the async equivalent of disabling the pin
/// interrupt for the quiet period.
#[embassy_executor::task]
pub async fn run(
    mut input: ExtiInput<'static>,
    ring: &'static PulseRing<'static>,
    config: TachoConfig,
) -> ! {
    let clock = EmbassyClock;
    let quiet = if config.debounce_micros == 0 {
        None
    } else {
        Some(clock.micros_to_span(config.debounce_micros))
    };
    let mut gate = DebounceGate::new(quiet);

    loop {
        match config.flank {
            EdgeFlank::Rising => input.wait_for_rising_edge().await,
            EdgeFlank::Falling => input.wait_for_falling_edge().await,
            EdgeFlank::Both => input.wait_for_any_edge().await,
        }
        let now = clock.now();

        match gate.on_edge() {
            EdgeDecision::Forward => ring.trigger(now),
            EdgeDecision::ForwardAndMask(span) => {
                ring.trigger(now);
                Timer::after_micros(u64::from(clock.span_to_micros(span))).await;
                let _ = gate.on_quiet_elapsed();
            }
        }
    }
}
