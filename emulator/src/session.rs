use std::cell::Cell;

use tacho_core::{
    Clock, DebounceGate, EdgeDecision, InitError, IntervalSlot, PulseRing, RingSnapshot, TickSpan,
    Ticks,
};

/// Highest pin number the emulated input peripheral exposes.
const MAX_PIN: u8 = 15;

/// Ring geometry and emulated wiring for a session.
#[derive(Copy, Clone, Debug)]
pub struct SessionConfig {
    pub num_slots: usize,
    pub min_duration_micros: u32,
    pub pin: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            num_slots: 16,
            min_duration_micros: 1_000_000,
            pin: 8,
        }
    }
}

/// Virtual microsecond clock advanced explicitly by session commands, so
/// transcripts are fully deterministic.
struct VirtualClock {
    now: Cell<u32>,
}

impl VirtualClock {
    fn new() -> Self {
        Self { now: Cell::new(0) }
    }

    fn advance(&self, micros: u32) {
        self.now.set(self.now.get().wrapping_add(micros));
    }
}

impl Clock for VirtualClock {
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

const HELP_TOPICS: &[(&str, &str)] = &[
    ("pulse", "pulse [n] [spacing_us]   - inject n edges spaced spacing_us apart"),
    ("spin", "spin <rpm> <n>           - inject n edges at the given rotation rate"),
    ("wait", "wait <micros>            - advance the virtual clock"),
    ("read", "read <window_us>         - query count, duration and rpm for a window"),
    ("debounce", "debounce <micros>        - set the quiet period (0 disables)"),
    ("dump", "dump                     - print the raw ring state"),
    ("status", "status                   - show session configuration and clock"),
    ("help", "help                     - show this text"),
];

pub struct Session {
    clock: VirtualClock,
    ring: PulseRing<'static>,
    gate: DebounceGate,
    // Virtual time at which the masked pin interrupt re-arms.
    quiet_until: Option<u32>,
    edges_injected: u64,
    edges_suppressed: u64,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, InitError> {
        if config.pin > MAX_PIN {
            return Err(InitError::InvalidPin);
        }

        // Slot storage must outlive the ring; a session lives for the whole
        // process, so leaking the allocation is the simplest way to hand the
        // ring the static borrow it wants.
        let slots: &'static [IntervalSlot] = Box::leak(
            (0..config.num_slots)
                .map(|_| IntervalSlot::new())
                .collect::<Vec<_>>()
                .into_boxed_slice(),
        );

        Ok(Self {
            clock: VirtualClock::new(),
            ring: PulseRing::new(slots, TickSpan(config.min_duration_micros)),
            gate: DebounceGate::new(None),
            quiet_until: None,
            edges_injected: 0,
            edges_suppressed: 0,
        })
    }

    pub fn handle_command(&mut self, input: &str) -> Vec<String> {
        let mut parts = input.split_whitespace();
        let Some(command) = parts.next() else {
            return Vec::new();
        };
        let args: Vec<&str> = parts.collect();

        match command.to_ascii_lowercase().as_str() {
            "pulse" => self.cmd_pulse(&args),
            "spin" => self.cmd_spin(&args),
            "wait" => self.cmd_wait(&args),
            "read" => self.cmd_read(&args),
            "debounce" => self.cmd_debounce(&args),
            "dump" => self.cmd_dump(),
            "status" => self.cmd_status(),
            "help" => HELP_TOPICS
                .iter()
                .map(|(_, text)| (*text).to_string())
                .collect(),
            other => vec![format!("Unknown command `{other}`; try `help`.")],
        }
    }

    fn cmd_pulse(&mut self, args: &[&str]) -> Vec<String> {
        let count: u32 = match args.first().map(|v| v.parse()) {
            None => 1,
            Some(Ok(n)) => n,
            Some(Err(_)) => return vec![format!("Invalid pulse count `{}`", args[0])],
        };
        let spacing: u32 = match args.get(1).map(|v| v.parse()) {
            None => 0,
            Some(Ok(n)) => n,
            Some(Err(_)) => return vec![format!("Invalid spacing `{}`", args[1])],
        };

        let (accepted, suppressed) = self.inject(count, spacing);
        vec![format!(
            "Injected {accepted} edge(s), {suppressed} suppressed by debounce; clock at {} us",
            self.clock.now.get()
        )]
    }

    fn cmd_spin(&mut self, args: &[&str]) -> Vec<String> {
        let (Some(Ok(rpm)), Some(Ok(count))) = (
            args.first().map(|v| v.parse::<u32>()),
            args.get(1).map(|v| v.parse::<u32>()),
        ) else {
            return vec!["Usage: spin <rpm> <n>".to_string()];
        };
        if rpm == 0 {
            return vec!["Rotation rate must be non-zero".to_string()];
        }

        let spacing = 60_000_000 / rpm;
        let (accepted, suppressed) = self.inject(count, spacing);
        vec![format!(
            "Spun {accepted} edge(s) at {rpm} rpm ({spacing} us apart), {suppressed} suppressed"
        )]
    }

    fn cmd_wait(&mut self, args: &[&str]) -> Vec<String> {
        let Some(Ok(micros)) = args.first().map(|v| v.parse::<u32>()) else {
            return vec!["Usage: wait <micros>".to_string()];
        };
        self.clock.advance(micros);
        self.rearm_if_elapsed();
        vec![format!("Clock advanced to {} us", self.clock.now.get())]
    }

    fn cmd_read(&mut self, args: &[&str]) -> Vec<String> {
        let Some(Ok(window)) = args.first().map(|v| v.parse::<u32>()) else {
            return vec!["Usage: read <window_us>".to_string()];
        };

        let reading = self.ring.read(&self.clock, window);
        vec![format!(
            "count={} duration={} us start={} rpm={}",
            reading.count,
            reading.duration_micros,
            reading.window_start.raw(),
            reading.rpm()
        )]
    }

    fn cmd_debounce(&mut self, args: &[&str]) -> Vec<String> {
        let Some(Ok(micros)) = args.first().map(|v| v.parse::<u32>()) else {
            return vec!["Usage: debounce <micros>".to_string()];
        };
        let quiet = if micros == 0 {
            None
        } else {
            Some(self.clock.micros_to_span(micros))
        };
        self.gate = DebounceGate::new(quiet);
        self.quiet_until = None;
        if micros == 0 {
            vec!["Debounce disabled".to_string()]
        } else {
            vec![format!("Debounce quiet period set to {micros} us")]
        }
    }

    fn cmd_dump(&mut self) -> Vec<String> {
        let snapshot: RingSnapshot<64> = self.ring.snapshot();
        let mut lines = vec![format!(
            "ring: {} slots, cursor={}",
            snapshot.slots.len(),
            snapshot.cursor
        )];
        for (k, view) in snapshot.slots.iter().enumerate() {
            let marker = if k == snapshot.cursor { " <---" } else { "" };
            lines.push(format!(
                "  [{k:2}] {:>10}-{:>10}: {:3}{marker}",
                view.time_start.raw(),
                view.time_end.raw(),
                view.count
            ));
        }
        lines
    }

    fn cmd_status(&mut self) -> Vec<String> {
        vec![format!(
            "slots={} min_duration={} us clock={} us injected={} suppressed={}",
            self.ring.depth(),
            self.ring.min_duration().raw(),
            self.clock.now.get(),
            self.edges_injected,
            self.edges_suppressed
        )]
    }

    /// Feeds `count` raw edges through the debounce gate into the ring,
    /// advancing the virtual clock by `spacing` before each edge.
    fn inject(&mut self, count: u32, spacing: u32) -> (u64, u64) {
        let mut accepted = 0u64;
        let mut suppressed = 0u64;
        for _ in 0..count {
            self.clock.advance(spacing);
            self.rearm_if_elapsed();

            if let Some(deadline) = self.quiet_until
                && self.clock.now.get().wrapping_sub(deadline) >= u32::MAX / 2
            {
                // Pin interrupt still masked; hardware never sees this edge.
                suppressed += 1;
                self.edges_suppressed += 1;
                continue;
            }

            let now = self.clock.now();
            match self.gate.on_edge() {
                EdgeDecision::Forward => self.ring.trigger(now),
                EdgeDecision::ForwardAndMask(span) => {
                    self.ring.trigger(now);
                    self.quiet_until = Some(now.raw().wrapping_add(span.raw()));
                }
            }
            accepted += 1;
            self.edges_injected += 1;
        }
        (accepted, suppressed)
    }

    /// Re-arms the gate once virtual time has passed the quiet deadline,
    /// mirroring the one-shot debounce timer callback.
    fn rearm_if_elapsed(&mut self) {
        if let Some(deadline) = self.quiet_until
            && self.clock.now.get().wrapping_sub(deadline) < u32::MAX / 2
        {
            let _ = self.gate.on_quiet_elapsed();
            self.quiet_until = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(SessionConfig {
            num_slots: 8,
            min_duration_micros: 100_000,
            pin: 0,
        })
        .expect("valid session config")
    }

    #[test]
    fn out_of_range_pin_is_rejected() {
        let result = Session::new(SessionConfig {
            pin: MAX_PIN + 1,
            ..SessionConfig::default()
        });
        assert_eq!(result.err(), Some(InitError::InvalidPin));
    }

    #[test]
    fn pulses_show_up_in_a_read() {
        let mut session = session();
        session.handle_command("pulse 10 10000");
        let lines = session.handle_command("read 200000");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("count=10 "), "{}", lines[0]);
    }

    #[test]
    fn debounce_suppresses_fast_retriggers() {
        let mut session = session();
        session.handle_command("debounce 5000");
        // 1 us spacing: first edge accepted, the rest masked.
        let lines = session.handle_command("pulse 5 1");
        assert!(lines[0].contains("Injected 1 edge(s), 4 suppressed"), "{}", lines[0]);

        // After the quiet period the gate re-arms.
        session.handle_command("wait 10000");
        let lines = session.handle_command("pulse 1 0");
        assert!(lines[0].contains("Injected 1 edge(s), 0 suppressed"), "{}", lines[0]);
    }

    #[test]
    fn spin_reports_the_configured_rate() {
        let mut session = session();
        session.handle_command("spin 1200 20");
        let lines = session.handle_command("read 500000");
        assert!(lines[0].contains("rpm=1200"), "{}", lines[0]);
    }

    #[test]
    fn dump_marks_the_open_slot() {
        let mut session = session();
        session.handle_command("pulse 3 50000");
        let lines = session.handle_command("dump");
        assert!(lines[0].starts_with("ring: 8 slots"));
        assert!(lines.iter().any(|line| line.ends_with("<---")));
    }
}
