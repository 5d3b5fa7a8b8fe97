//! EXTI bring-up for the tachometer input line.

use embassy_stm32::Peri;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::Pull;
use embassy_stm32::peripherals;
use embassy_time::Instant as EmbassyInstant;
use tacho_core::{Clock, InitError, PullMode, TachoConfig, TickSpan, Ticks};

/// Monotonic clock over the Embassy time driver, one tick per microsecond.
///
/// `embassy_time` keeps a 64-bit count; the measurement engine works in
/// wrapping `u32` ticks, so the count is truncated here and wrap handling is
/// left to `Ticks::span_since`.
#[derive(Copy, Clone, Debug, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now(&self) -> Ticks {
        Ticks(EmbassyInstant::now().as_micros() as u32)
    }

    fn span_to_micros(&self, span: TickSpan) -> u32 {
        span.raw()
    }

    fn micros_to_span(&self, micros: u32) -> TickSpan {
        TickSpan(micros)
    }
}

/// Claims the tachometer pin and arms its EXTI channel.
///
/// Fails with [`InitError::UnsupportedFlank`] when the configuration asks
/// for a wake-capable input watching both flanks; the wakeup polarity is a
/// single programmed edge on this part. A line that passes the wake check
/// needs no extra arming: the EXTI driver unmasks it in IMR while an edge is
/// awaited, and an unmasked configurable line resumes the core from stop
/// mode.
pub fn init_input(
    pin: Peri<'static, peripherals::PA8>,
    channel: Peri<'static, peripherals::EXTI8>,
    config: &TachoConfig,
) -> Result<ExtiInput<'static>, InitError> {
    super::validate_config(config)?;
    let input = ExtiInput::new(pin, channel, exti_pull(config.pull));
    Ok(input)
}

/// Maps the portable pull-mode configuration onto the HAL's pull setting.
fn exti_pull(pull: PullMode) -> Pull {
    match pull {
        PullMode::Floating => Pull::None,
        PullMode::Up => Pull::Up,
        PullMode::Down => Pull::Down,
    }
}
