//! Operator inputs

pub mod button;

pub use button::StopButton;
