//! Debounce gate suppressing spurious edge retriggering.
//!
//! The gate is a two-state machine decoupled from any particular pin or
//! timer peripheral: the platform layer reports raw edges and quiet-timer
//! expiry, and obeys the returned decisions (mask the pin interrupt, arm a
//! one-shot timer, unmask). The delivered edge itself is never filtered or
//! delayed; only subsequent retriggering is held off for the quiet period.

use crate::clock::TickSpan;

/// Current phase of the gate.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GateState {
    /// Edges are accepted and forwarded.
    Armed,
    /// An edge was recently accepted; the pin interrupt is masked until the
    /// quiet timer fires.
    Quiet,
}

/// What the platform must do with a raw edge.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EdgeDecision {
    /// Forward the edge to the accumulator; no masking configured.
    Forward,
    /// Forward the edge, mask further pin interrupts, and arm a one-shot
    /// timer for the contained quiet span.
    ForwardAndMask(TickSpan),
}

/// Two-state debounce gate.
///
/// Constructed with `None` the gate is a pass-through and never masks.
#[derive(Copy, Clone, Debug)]
pub struct DebounceGate {
    quiet_span: Option<TickSpan>,
    state: GateState,
}

impl DebounceGate {
    /// Creates a gate with the given quiet period, or a pass-through gate
    /// when no period is configured.
    pub const fn new(quiet_span: Option<TickSpan>) -> Self {
        Self {
            quiet_span,
            state: GateState::Armed,
        }
    }

    /// Returns the gate's current phase.
    pub const fn state(&self) -> GateState {
        self.state
    }

    /// Reports a raw edge and decides how the platform must handle it.
    ///
    /// An edge arriving while already `Quiet` is still forwarded and restarts
    /// the quiet timer: the power-management wake path can deliver an edge
    /// even while the ordinary pin interrupt is masked.
    pub fn on_edge(&mut self) -> EdgeDecision {
        match self.quiet_span {
            None => EdgeDecision::Forward,
            Some(span) => {
                self.state = GateState::Quiet;
                EdgeDecision::ForwardAndMask(span)
            }
        }
    }

    /// Reports expiry of the quiet timer.
    ///
    /// Returns `true` when the platform must unmask the pin interrupt.
    pub fn on_quiet_elapsed(&mut self) -> bool {
        if self.state == GateState::Quiet {
            self.state = GateState::Armed;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_through_gate_never_masks() {
        let mut gate = DebounceGate::new(None);
        assert_eq!(gate.on_edge(), EdgeDecision::Forward);
        assert_eq!(gate.state(), GateState::Armed);
        assert!(!gate.on_quiet_elapsed());
    }

    #[test]
    fn configured_gate_masks_and_rearms() {
        let span = TickSpan(2_000);
        let mut gate = DebounceGate::new(Some(span));
        assert_eq!(gate.on_edge(), EdgeDecision::ForwardAndMask(span));
        assert_eq!(gate.state(), GateState::Quiet);
        assert!(gate.on_quiet_elapsed());
        assert_eq!(gate.state(), GateState::Armed);
    }

    #[test]
    fn wake_edge_during_quiet_restarts_the_timer() {
        let span = TickSpan(500);
        let mut gate = DebounceGate::new(Some(span));
        let _ = gate.on_edge();
        // Wake path fires while the pin interrupt is masked.
        assert_eq!(gate.on_edge(), EdgeDecision::ForwardAndMask(span));
        assert_eq!(gate.state(), GateState::Quiet);
    }
}
