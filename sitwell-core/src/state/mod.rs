//! Debounced posture state
//!
//! The per-tick verdict is noisy; the state machine turns it into a
//! posture state that only becomes stable after a run of agreeing ticks.

pub mod events;
pub mod machine;

pub use events::{EngineEvent, MAX_EVENTS};
pub use machine::{DebounceStateMachine, PostureState};
