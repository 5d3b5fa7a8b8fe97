//! Pulse-interval ring accumulator and sliding-window query.
//!
//! One interrupt-context writer advances the ring through [`PulseRing::trigger`];
//! any number of thread-context readers may call [`PulseRing::read`] or
//! [`PulseRing::snapshot`] concurrently. No lock is taken anywhere: every slot
//! field and the cursor are relaxed atomics, so a reader racing a trigger may
//! observe a partially updated slot (count bumped but `time_end` still stale,
//! or a slot mid-rotation). That skew is bounded by a single slot and is
//! accepted as measurement jitter in a best-effort moving average. Do not
//! replace this with a mutex: the trigger path has a hard interrupt-latency
//! budget and must never block.

use portable_atomic::{AtomicU32, AtomicUsize, Ordering};

use heapless::Vec;

use crate::clock::{Clock, TickSpan, Ticks};

/// One contiguous accumulation window of the ring.
///
/// Slot storage is owned by the caller (typically a `static` array) and
/// borrowed by [`PulseRing`] for its whole life; the ring never allocates.
#[derive(Debug)]
pub struct IntervalSlot {
    time_start: AtomicU32,
    time_end: AtomicU32,
    count: AtomicU32,
}

impl IntervalSlot {
    /// Creates an empty slot. Const so slot arrays can live in `static`s.
    pub const fn new() -> Self {
        Self {
            time_start: AtomicU32::new(0),
            time_end: AtomicU32::new(0),
            count: AtomicU32::new(0),
        }
    }

    fn clear(&self) {
        self.time_start.store(0, Ordering::Relaxed);
        self.time_end.store(0, Ordering::Relaxed);
        self.count.store(0, Ordering::Relaxed);
    }

    fn start(&self) -> Ticks {
        Ticks(self.time_start.load(Ordering::Relaxed))
    }

    fn end(&self) -> Ticks {
        Ticks(self.time_end.load(Ordering::Relaxed))
    }

    fn pulses(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }
}

impl Default for IntervalSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only copy of one slot, as captured by [`PulseRing::snapshot`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SlotView {
    pub time_start: Ticks,
    pub time_end: Ticks,
    pub count: u32,
}

/// Diagnostic capture of the whole ring state.
///
/// Purely observational; taking a snapshot never perturbs accumulation. When
/// the ring holds more than `CAPACITY` slots the excess is truncated.
#[derive(Clone, Debug)]
pub struct RingSnapshot<const CAPACITY: usize = 16> {
    pub slots: Vec<SlotView, CAPACITY>,
    pub cursor: usize,
}

/// Result of a sliding-window query.
///
/// `duration_micros` is the span actually covered: at least the requested
/// window when enough history exists, shorter when the ring holds less, and
/// possibly longer when idle-gap folding or slot granularity push past the
/// request.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct WindowReading {
    /// Total pulses observed inside the covered span.
    pub count: u32,
    /// Span actually covered, in microseconds.
    pub duration_micros: u32,
    /// Earliest slot boundary consumed by the walk.
    pub window_start: Ticks,
}

impl WindowReading {
    /// Average rate over the covered span, in revolutions per minute.
    ///
    /// Returns zero when the covered span is empty.
    pub fn rpm(&self) -> u32 {
        if self.duration_micros == 0 {
            return 0;
        }
        let scaled = u64::from(self.count) * 60_000_000 / u64::from(self.duration_micros);
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }
}

/// Fixed-depth ring of time-stamped pulse counts.
///
/// The ring amortizes two conflicting needs: fine enough slot granularity for
/// a responsive reading, and bounded memory and compute for queries spanning a
/// large window. A slot closes either because it has accumulated for longer
/// than `min_duration`, or because a long pulse-free gap must not be silently
/// absorbed into its span (which would overstate the instantaneous rate once
/// a pulse finally arrives).
pub struct PulseRing<'a> {
    slots: &'a [IntervalSlot],
    min_duration: TickSpan,
    cursor: AtomicUsize,
}

impl<'a> PulseRing<'a> {
    /// Binds the ring to caller-allocated slot storage and clears it.
    ///
    /// # Panics
    ///
    /// Panics when `slots` is empty; a zero-depth ring is a configuration
    /// bug, not a runtime condition.
    pub fn new(slots: &'a [IntervalSlot], min_duration: TickSpan) -> Self {
        assert!(!slots.is_empty(), "pulse ring requires at least one slot");
        for slot in slots {
            slot.clear();
        }
        Self {
            slots,
            min_duration,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Number of slots in the ring.
    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    /// Configured per-slot accumulation bound.
    pub fn min_duration(&self) -> TickSpan {
        self.min_duration
    }

    /// Records one accepted pulse edge observed at `now`.
    ///
    /// Called from interrupt context: allocation-free, lock-free, O(1).
    pub fn trigger(&self, now: Ticks) {
        let mut idx = self.cursor.load(Ordering::Relaxed);
        let mut open = &self.slots[idx];

        if now.span_since(open.end()) > self.min_duration && open.pulses() > 0 {
            // The last pulse came a long time ago. Close the stale slot so
            // the silence becomes a gap-spanning slot carrying this single
            // pulse, instead of inflating the stale slot's span.
            idx = self.rotate(idx);
            open = &self.slots[idx];
        }

        open.count.fetch_add(1, Ordering::Relaxed);
        open.time_end.store(now.raw(), Ordering::Relaxed);

        if now.span_since(open.start()) > self.min_duration {
            // Slot has accumulated long enough; bound its span.
            self.rotate(idx);
        }
    }

    /// Advances the cursor, opening a fresh slot contiguous with the closed
    /// one: `time_start == time_end ==` the closed slot's `time_end`.
    fn rotate(&self, idx: usize) -> usize {
        let next = (idx + 1) % self.slots.len();
        let closed_end = self.slots[idx].time_end.load(Ordering::Relaxed);
        let slot = &self.slots[next];
        slot.count.store(0, Ordering::Relaxed);
        slot.time_start.store(closed_end, Ordering::Relaxed);
        slot.time_end.store(closed_end, Ordering::Relaxed);
        self.cursor.store(next, Ordering::Relaxed);
        next
    }

    /// Reconstructs pulse count and covered duration for roughly the last
    /// `requested_micros` microseconds.
    ///
    /// Walks the ring backward from the open slot, consuming whole slots
    /// until the accumulated span reaches the request or history runs out.
    /// Each slot is visited at most once; worst case O(depth).
    pub fn read<C: Clock>(&self, clock: &C, requested_micros: u32) -> WindowReading {
        let mut idx = self.cursor.load(Ordering::Relaxed);
        let now = clock.now();
        let open_end = self.slots[idx].end();
        let idle = now.span_since(open_end);
        let idle_micros = clock.span_to_micros(idle);

        if requested_micros < idle_micros {
            // No pulses at all within the requested window.
            return WindowReading {
                count: 0,
                duration_micros: idle_micros,
                window_start: open_end,
            };
        }

        let mut count = 0u32;
        let mut duration_micros = 0u32;
        let mut window_start = Ticks::ZERO;

        if idle > self.min_duration {
            // The sensor has been quiet for a while; account for the idle
            // time so the rate is not overstated.
            duration_micros = idle_micros;
        }

        let depth = self.slots.len();
        let mut remaining = depth;
        while remaining > 0 && duration_micros < requested_micros {
            let slot = &self.slots[idx];
            let start = slot.start();
            count = count.saturating_add(slot.pulses());
            duration_micros = duration_micros
                .saturating_add(clock.span_to_micros(slot.end().span_since(start)));
            window_start = start;
            remaining -= 1;
            idx = (idx + depth - 1) % depth;
        }

        WindowReading {
            count,
            duration_micros,
            window_start,
        }
    }

    /// Captures the full ring state for diagnostics.
    pub fn snapshot<const CAPACITY: usize>(&self) -> RingSnapshot<CAPACITY> {
        let mut slots = Vec::new();
        for slot in self.slots.iter().take(CAPACITY) {
            // Capacity was sized by the caller; drop the tail if it was not.
            let _ = slots.push(SlotView {
                time_start: slot.start(),
                time_end: slot.end(),
                count: slot.pulses(),
            });
        }
        RingSnapshot {
            slots,
            cursor: self.cursor.load(Ordering::Relaxed),
        }
    }
}
