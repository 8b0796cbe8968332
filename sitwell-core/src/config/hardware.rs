//! Hardware configuration types
//!
//! These types define the board-level wiring: which ADC pins carry the
//! sensors, where the LED dies, buzzer and stop button are connected,
//! and how the telemetry port is set up.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::MAX_CHANNELS;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create an active-low input with pull-up (push button to ground)
    pub const fn button(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: true,
        }
    }
}

/// RGB LED wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LedConfig {
    /// Red die
    pub red: PinConfig,
    /// Green die
    pub green: PinConfig,
    /// Blue die
    pub blue: PinConfig,
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            red: PinConfig::new(13),
            green: PinConfig::new(14),
            blue: PinConfig::new(15),
        }
    }
}

/// Board wiring and telemetry setup
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardConfig {
    /// ADC-capable GPIO per sensor channel, in channel order
    pub sensor_pins: Vec<u8, MAX_CHANNELS>,
    /// ADC reference voltage in millivolts
    pub vref_mv: u16,
    /// Sensors wired so that more pressure lowers the reading
    pub sensors_inverted: bool,
    /// Status LED
    pub led: LedConfig,
    /// Buzzer output (optional)
    pub buzzer: Option<PinConfig>,
    /// Stop button input (optional)
    pub stop_button: Option<PinConfig>,
    /// Telemetry UART baud rate
    pub telemetry_baud: u32,
    /// Interval between reading snapshots on the telemetry port (0 = off)
    pub snapshot_interval_ms: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        let mut sensor_pins = Vec::new();
        for pin in 26..=29 {
            let _ = sensor_pins.push(pin);
        }
        Self {
            sensor_pins,
            vref_mv: 3300,
            sensors_inverted: false,
            led: LedConfig::default(),
            buzzer: Some(PinConfig::new(16)),
            stop_button: Some(PinConfig::button(17)),
            telemetry_baud: 115_200,
            snapshot_interval_ms: 1_000,
        }
    }
}

impl BoardConfig {
    /// Every digital pin the board uses, for conflict checks
    pub fn digital_pins(&self) -> Vec<u8, 5> {
        let mut pins = Vec::new();
        let _ = pins.push(self.led.red.pin);
        let _ = pins.push(self.led.green.pin);
        let _ = pins.push(self.led.blue.pin);
        if let Some(b) = self.buzzer {
            let _ = pins.push(b.pin);
        }
        if let Some(s) = self.stop_button {
            let _ = pins.push(s.pin);
        }
        pins
    }
}
