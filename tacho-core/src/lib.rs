#![no_std]

// Shared pulse-interval accounting logic for the tachometer feature set.
//
// This crate stays portable across MCU firmware and host tooling by avoiding
// the Rust standard library and exposing abstractions the other crates can
// adopt. Nothing in here allocates or blocks; the trigger path is safe to run
// from a hardware interrupt context.

pub mod clock;
pub mod config;
pub mod debounce;
pub mod ring;

pub use clock::{Clock, TickSpan, Ticks};
pub use config::{EdgeFlank, InitError, PullMode, TachoConfig};
pub use debounce::{DebounceGate, EdgeDecision, GateState};
pub use ring::{IntervalSlot, PulseRing, RingSnapshot, SlotView, WindowReading};
