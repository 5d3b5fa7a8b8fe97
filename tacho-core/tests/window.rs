use core::cell::Cell;

use tacho_core::{Clock, IntervalSlot, PulseRing, TickSpan, Ticks};

/// Host-side clock where one tick equals one microsecond.
struct ScriptClock {
    now: Cell<u32>,
}

impl ScriptClock {
    fn new() -> Self {
        Self { now: Cell::new(0) }
    }

    fn set(&self, micros: u32) {
        self.now.set(micros);
    }
}

impl Clock for ScriptClock {
    fn now(&self) -> Ticks {
        Ticks(self.now.get())
    }

    fn span_to_micros(&self, span: TickSpan) -> u32 {
        span.raw()
    }

    fn micros_to_span(&self, micros: u32) -> TickSpan {
        TickSpan(micros)
    }
}

fn slot_array<const N: usize>() -> [IntervalSlot; N] {
    core::array::from_fn(|_| IntervalSlot::new())
}

#[test]
fn coarse_slots_return_whole_slot_counts() {
    // min_duration far above the pulse spacing: all ten pulses accumulate in
    // one slot, and the window query returns that whole slot even though the
    // request is much shorter. Precision is traded for bounded work.
    let slots = slot_array::<16>();
    let clock = ScriptClock::new();
    let ring = PulseRing::new(&slots, clock.micros_to_span(1_000_000));

    for k in 1..=10u32 {
        clock.set(k * 50_000);
        ring.trigger(clock.now());
    }

    let reading = ring.read(&clock, 100_000);
    assert_eq!(reading.count, 10);
    assert!(reading.duration_micros >= 100_000);
}

#[test]
fn fine_slots_resolve_a_short_window() {
    // min_duration below the pulse spacing: every pulse closes its own
    // gap-spanning slot, so a 100 ms request covers exactly two pulses.
    let slots = slot_array::<16>();
    let clock = ScriptClock::new();
    let ring = PulseRing::new(&slots, clock.micros_to_span(40_000));

    for k in 1..=10u32 {
        clock.set(k * 50_000);
        ring.trigger(clock.now());
    }

    let reading = ring.read(&clock, 100_000);
    assert_eq!(reading.count, 2);
    assert!(reading.duration_micros >= 100_000);
}

#[test]
fn request_exceeding_idle_gap_sees_the_lone_pulse() {
    let slots = slot_array::<8>();
    let clock = ScriptClock::new();
    let ring = PulseRing::new(&slots, clock.micros_to_span(100_000));

    // Long silence from reset, then a single pulse.
    clock.set(2_000_000);
    ring.trigger(clock.now());

    clock.set(2_050_000);
    let reading = ring.read(&clock, 2_500_000);
    assert_eq!(reading.count, 1);
    // The slot carrying the pulse spans the silence, so the covered duration
    // reflects the idle time even though history is shorter than the request.
    assert_eq!(reading.duration_micros, 2_000_000);
}

#[test]
fn moderate_idle_gap_is_folded_into_the_duration() {
    let slots = slot_array::<8>();
    let clock = ScriptClock::new();
    let ring = PulseRing::new(&slots, clock.micros_to_span(100_000));

    clock.set(1_000);
    ring.trigger(clock.now());

    // Idle longer than min_duration but shorter than the request: the gap is
    // counted toward the covered duration so the rate is not overstated.
    clock.set(300_000);
    let reading = ring.read(&clock, 500_000);
    assert_eq!(reading.count, 1);
    assert_eq!(reading.duration_micros, 300_000);
}

#[test]
fn idle_gap_longer_than_request_returns_zero_pulses() {
    let slots = slot_array::<8>();
    let clock = ScriptClock::new();
    let ring = PulseRing::new(&slots, clock.micros_to_span(100_000));

    clock.set(10_000);
    ring.trigger(clock.now());

    clock.set(400_000);
    let reading = ring.read(&clock, 50_000);
    assert_eq!(reading.count, 0);
    assert_eq!(reading.duration_micros, 390_000);
    assert_eq!(reading.window_start, Ticks(10_000));
}

#[test]
fn covered_duration_meets_request_when_history_suffices() {
    let slots = slot_array::<16>();
    let clock = ScriptClock::new();
    let ring = PulseRing::new(&slots, clock.micros_to_span(50_000));

    for k in 1..=100u32 {
        clock.set(k * 10_000);
        ring.trigger(clock.now());
    }

    let reading = ring.read(&clock, 123_456);
    assert!(reading.duration_micros >= 123_456);
    // Roughly one pulse per 10 ms across the covered span.
    assert!(reading.count >= 12);
}

#[test]
fn repeated_reads_are_identical_without_new_pulses() {
    let slots = slot_array::<16>();
    let clock = ScriptClock::new();
    let ring = PulseRing::new(&slots, clock.micros_to_span(50_000));

    for k in 1..=30u32 {
        clock.set(k * 7_000);
        ring.trigger(clock.now());
    }
    clock.set(250_000);

    let first = ring.read(&clock, 150_000);
    for _ in 0..5 {
        assert_eq!(ring.read(&clock, 150_000), first);
    }
}

#[test]
fn rpm_matches_the_reference_computation() {
    // 20 pulses over one second is 1200 rpm.
    let slots = slot_array::<16>();
    let clock = ScriptClock::new();
    let ring = PulseRing::new(&slots, clock.micros_to_span(2_000_000));

    for k in 1..=20u32 {
        clock.set(k * 50_000);
        ring.trigger(clock.now());
    }

    let reading = ring.read(&clock, 500_000);
    assert_eq!(reading.count, 20);
    assert_eq!(reading.duration_micros, 1_000_000);
    assert_eq!(reading.rpm(), 1_200);
}
