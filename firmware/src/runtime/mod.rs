use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use static_cell::StaticCell;

use crate::hw;
use tacho_core::{IntervalSlot, PulseRing, TachoConfig, TickSpan};

mod pulse_task;
mod report_task;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

/// Ring depth; sixteen slots cover ~16 s of history at the 1 s slot bound.
const NUM_SLOTS: usize = 16;

/// Per-slot accumulation bound in microseconds.
const MIN_DURATION_MICROS: u32 = 1_000_000;

/// Slot storage is static so the accumulator can be shared with interrupt
/// priority tasks without allocation.
static SLOTS: [IntervalSlot; NUM_SLOTS] = [const { IntervalSlot::new() }; NUM_SLOTS];
static RING: StaticCell<PulseRing<'static>> = StaticCell::new();

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let config = hal::Config::default();
    let hal::Peripherals { PA8, EXTI8, .. } = hal::init(config);

    let tacho_config = TachoConfig {
        debounce_micros: 5_000,
        wake_from_suspend: true,
        ..TachoConfig::default()
    };

    let input = match hw::init_input(PA8, EXTI8, &tacho_config) {
        Ok(input) => input,
        Err(err) => defmt::panic!("tacho init failed: {}", defmt::Debug2Format(&err)),
    };

    let ring: &'static PulseRing<'static> =
        RING.init(PulseRing::new(&SLOTS, TickSpan(MIN_DURATION_MICROS)));

    spawner
        .spawn(pulse_task::run(input, ring, tacho_config))
        .expect("failed to spawn pulse task");

    spawner
        .spawn(report_task::run(ring))
        .expect("failed to spawn report task");
}
