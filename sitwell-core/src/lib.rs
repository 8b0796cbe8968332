//! Board-agnostic core logic for the seat posture monitor
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Device traits (sensor array, color output, buzzer, stop signal)
//! - Rolling-window statistics (median, MAD, consistency score)
//! - Presence, zone and drift classification
//! - Debounce state machine
//! - Feedback (color and pulse) controller
//! - The per-tick engine and the cooperative monitor loop
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod engine;
pub mod feedback;
pub mod monitor;
pub mod posture;
pub mod state;
pub mod stats;
pub mod telemetry;
pub mod traits;

pub use engine::{Engine, TickReport};
pub use monitor::{Monitor, StepOutcome};
