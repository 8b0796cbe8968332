//! RP2040-specific HAL for the seat monitor firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `sitwell-hal` traits, plus RP2040-specific functionality:
//!
//! - GPIO allocation and `sitwell-hal` pin wrappers
//! - Dynamic pin allocation for config-driven setup
//! - ADC channel management and a blocking ADC bank

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod pins;

pub use adc::{AdcAllocator, AdcBank, AdcChannel, AllocError};
pub use gpio::{GpioAllocator, GpioError, RpInput, RpOutput};
pub use pins::{AdcPins, PinBank, PinError};
