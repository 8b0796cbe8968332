//! Feedback actuators

pub mod buzzer;
pub mod rgb;

pub use buzzer::GpioBuzzer;
pub use rgb::{GpioRgbLed, PwmRgbLed};
