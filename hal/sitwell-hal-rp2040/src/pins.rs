//! Dynamic pin allocation for config-driven hardware setup
//!
//! Provides a way to get GPIO pins by number at runtime, so the seat
//! wiring can live in the TOML config instead of the firmware source.
//!
//! GPIO0/GPIO1 stay with the telemetry UART and GPIO26-29 are handed out
//! as ADC channels; the remaining pins are taken from the [`PinBank`].

use embassy_rp::adc::Channel;
use embassy_rp::gpio::{AnyPin, Pull};
use embassy_rp::peripherals::{ADC, PIN_0, PIN_1, PIN_26, PIN_27, PIN_28, PIN_29, UART0};
use embassy_rp::{Peri, Peripherals};

use crate::adc::AdcChannel;
use crate::gpio::GPIO_COUNT;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
    /// Pin reserved for special function
    Reserved,
    /// Pin has no ADC function
    NotAnalog,
}

/// Check whether a GPIO is kept for the UART or the ADC
pub fn is_reserved(pin: u8) -> bool {
    matches!(pin, 0 | 1) || AdcChannel::from_gpio(pin).is_some()
}

/// Pin bank that holds the general-purpose GPIO pins and allows taking them by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

impl PinBank {
    /// Split the peripherals into the pin bank, the ADC pins and everything else
    pub fn from_peripherals(p: Peripherals) -> (Self, AdcPins, RemainingPeripherals) {
        let bank = Self {
            pins: [
                None,
                None,
                Some(p.PIN_2.into()),
                Some(p.PIN_3.into()),
                Some(p.PIN_4.into()),
                Some(p.PIN_5.into()),
                Some(p.PIN_6.into()),
                Some(p.PIN_7.into()),
                Some(p.PIN_8.into()),
                Some(p.PIN_9.into()),
                Some(p.PIN_10.into()),
                Some(p.PIN_11.into()),
                Some(p.PIN_12.into()),
                Some(p.PIN_13.into()),
                Some(p.PIN_14.into()),
                Some(p.PIN_15.into()),
                Some(p.PIN_16.into()),
                Some(p.PIN_17.into()),
                Some(p.PIN_18.into()),
                Some(p.PIN_19.into()),
                Some(p.PIN_20.into()),
                Some(p.PIN_21.into()),
                Some(p.PIN_22.into()),
                Some(p.PIN_23.into()),
                Some(p.PIN_24.into()),
                Some(p.PIN_25.into()),
                None,
                None,
                None,
                None,
            ],
        };
        let adc_pins = AdcPins {
            pin26: Some(p.PIN_26),
            pin27: Some(p.PIN_27),
            pin28: Some(p.PIN_28),
            pin29: Some(p.PIN_29),
        };
        let remaining = RemainingPeripherals {
            adc: p.ADC,
            uart0: p.UART0,
            uart_tx: p.PIN_0,
            uart_rx: p.PIN_1,
        };
        (bank, adc_pins, remaining)
    }

    /// Take a pin by number
    ///
    /// Returns the pin if available, or an error if:
    /// - Pin number is invalid (>= 30)
    /// - Pin belongs to the UART or the ADC
    /// - Pin was already taken
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        if pin_num as usize >= GPIO_COUNT {
            return Err(PinError::InvalidPin);
        }
        if is_reserved(pin_num) {
            return Err(PinError::Reserved);
        }
        self.pins[pin_num as usize]
            .take()
            .ok_or(PinError::AlreadyTaken)
    }
}

/// The four ADC-capable pins, taken as sensor channels by GPIO number
pub struct AdcPins {
    pin26: Option<Peri<'static, PIN_26>>,
    pin27: Option<Peri<'static, PIN_27>>,
    pin28: Option<Peri<'static, PIN_28>>,
    pin29: Option<Peri<'static, PIN_29>>,
}

impl AdcPins {
    /// Take the ADC channel wired to `gpio`
    ///
    /// The pin is left floating; the sensor divider sets the level.
    pub fn take_channel(&mut self, gpio: u8) -> Result<Channel<'static>, PinError> {
        let channel = match AdcChannel::from_gpio(gpio).ok_or(PinError::NotAnalog)? {
            AdcChannel::Adc0 => self.pin26.take().map(|p| Channel::new_pin(p, Pull::None)),
            AdcChannel::Adc1 => self.pin27.take().map(|p| Channel::new_pin(p, Pull::None)),
            AdcChannel::Adc2 => self.pin28.take().map(|p| Channel::new_pin(p, Pull::None)),
            AdcChannel::Adc3 => self.pin29.take().map(|p| Channel::new_pin(p, Pull::None)),
            AdcChannel::Temperature => return Err(PinError::NotAnalog),
        };
        channel.ok_or(PinError::AlreadyTaken)
    }
}

/// Peripherals that stay outside the pin bank
pub struct RemainingPeripherals {
    pub adc: Peri<'static, ADC>,
    pub uart0: Peri<'static, UART0>,
    pub uart_tx: Peri<'static, PIN_0>,
    pub uart_rx: Peri<'static, PIN_1>,
}
