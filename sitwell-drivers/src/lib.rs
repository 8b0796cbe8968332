//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in sitwell-core on top of the pin-level traits of sitwell-hal:
//!
//! - Sensors (force-sensitive resistor array on an ADC bank)
//! - Feedback (GPIO or PWM RGB LED, GPIO buzzer)
//! - Input (debounced, latching stop button)

#![no_std]
#![deny(unsafe_code)]

pub mod feedback;
pub mod input;
pub mod sensor;
