//! ADC channel management
//!
//! RP2040 has a single ADC with 5 channels:
//! - ADC0: GPIO26
//! - ADC1: GPIO27
//! - ADC2: GPIO28
//! - ADC3: GPIO29
//! - ADC4: Internal temperature sensor
//!
//! Pressure sensors can only sit on ADC0-ADC3.

use embassy_rp::adc::{Adc, Blocking, Channel};
use heapless::Vec;
use sitwell_hal::{AdcError, AnalogBank};

/// Number of external ADC inputs
pub const EXTERNAL_CHANNELS: usize = 4;

/// Full-scale count of the 12-bit converter
pub const FULL_SCALE: u16 = 4095;

/// ADC channel identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcChannel {
    /// ADC0 on GPIO26
    Adc0,
    /// ADC1 on GPIO27
    Adc1,
    /// ADC2 on GPIO28
    Adc2,
    /// ADC3 on GPIO29
    Adc3,
    /// Internal temperature sensor
    Temperature,
}

impl AdcChannel {
    /// Get the GPIO pin for this ADC channel
    pub fn gpio(&self) -> Option<u8> {
        match self {
            AdcChannel::Adc0 => Some(26),
            AdcChannel::Adc1 => Some(27),
            AdcChannel::Adc2 => Some(28),
            AdcChannel::Adc3 => Some(29),
            AdcChannel::Temperature => None,
        }
    }

    /// Get ADC channel from GPIO pin
    pub fn from_gpio(gpio: u8) -> Option<Self> {
        match gpio {
            26 => Some(AdcChannel::Adc0),
            27 => Some(AdcChannel::Adc1),
            28 => Some(AdcChannel::Adc2),
            29 => Some(AdcChannel::Adc3),
            _ => None,
        }
    }
}

/// Error when claiming an ADC channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AllocError {
    /// GPIO has no ADC function
    NotAnalog,
    /// Channel already claimed
    InUse,
}

/// ADC allocator
///
/// Catches two sensors configured on the same input before any
/// peripheral is touched.
pub struct AdcAllocator {
    allocated: [bool; 5],
}

impl Default for AdcAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl AdcAllocator {
    /// Create a new ADC allocator
    pub fn new() -> Self {
        Self {
            allocated: [false; 5],
        }
    }

    /// Allocate an ADC channel
    pub fn allocate(&mut self, channel: AdcChannel) -> Result<(), AllocError> {
        let idx = channel as usize;
        if self.allocated[idx] {
            Err(AllocError::InUse)
        } else {
            self.allocated[idx] = true;
            Ok(())
        }
    }

    /// Allocate the ADC channel behind a GPIO number
    pub fn allocate_gpio(&mut self, gpio: u8) -> Result<AdcChannel, AllocError> {
        let channel = AdcChannel::from_gpio(gpio).ok_or(AllocError::NotAnalog)?;
        self.allocate(channel)?;
        Ok(channel)
    }

    /// Release an ADC channel
    pub fn release(&mut self, channel: AdcChannel) {
        self.allocated[channel as usize] = false;
    }

    /// Check if a channel is allocated
    pub fn is_allocated(&self, channel: AdcChannel) -> bool {
        self.allocated[channel as usize]
    }
}

/// Blocking ADC with its sensor channels in seat channel order
pub struct AdcBank<'d> {
    adc: Adc<'d, Blocking>,
    channels: Vec<Channel<'d>, EXTERNAL_CHANNELS>,
}

impl<'d> AdcBank<'d> {
    /// Create an empty bank around the converter
    pub fn new(adc: Adc<'d, Blocking>) -> Self {
        Self {
            adc,
            channels: Vec::new(),
        }
    }

    /// Append the next sensor channel
    ///
    /// Hands the channel back if the bank is full.
    pub fn push(&mut self, channel: Channel<'d>) -> Result<(), Channel<'d>> {
        self.channels.push(channel)
    }
}

impl AnalogBank for AdcBank<'_> {
    fn channel_count(&self) -> usize {
        self.channels.len()
    }

    fn full_scale(&self) -> u16 {
        FULL_SCALE
    }

    fn read_raw(&mut self, channel: usize) -> Result<u16, AdcError> {
        let ch = self
            .channels
            .get_mut(channel)
            .ok_or(AdcError::InvalidChannel)?;
        self.adc
            .blocking_read(ch)
            .map_err(|_| AdcError::ConversionFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpio_mapping() {
        assert_eq!(AdcChannel::from_gpio(28), Some(AdcChannel::Adc2));
        assert_eq!(AdcChannel::from_gpio(25), None);
        assert_eq!(AdcChannel::Adc3.gpio(), Some(29));
        assert_eq!(AdcChannel::Temperature.gpio(), None);
    }

    #[test]
    fn test_allocator_rejects_duplicates() {
        let mut alloc = AdcAllocator::new();
        assert_eq!(alloc.allocate_gpio(26), Ok(AdcChannel::Adc0));
        assert_eq!(alloc.allocate_gpio(26), Err(AllocError::InUse));
        assert_eq!(alloc.allocate_gpio(12), Err(AllocError::NotAnalog));

        alloc.release(AdcChannel::Adc0);
        assert!(!alloc.is_allocated(AdcChannel::Adc0));
        assert!(alloc.allocate(AdcChannel::Adc0).is_ok());
    }
}
