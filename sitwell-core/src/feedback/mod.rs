//! Light and buzzer feedback
//!
//! The palette turns a posture state into a [`Cue`]; the controller decides
//! whether that cue is shown solid or pulsing.

pub mod color;
pub mod controller;

pub use color::{Color, Cue, Palette, Rgb};
pub use controller::FeedbackController;
