//! GPIO allocation and pin wrappers
//!
//! Tracks which GPIO pins are in use to prevent conflicts, and adapts
//! Embassy's pin drivers to the `sitwell-hal` pin traits.

use embassy_rp::gpio::{AnyPin, Input, Level, Output, Pull};
use embassy_rp::Peri;
use heapless::FnvIndexSet;

/// Maximum number of GPIO pins on RP2040
pub const GPIO_COUNT: usize = 30;

/// Error when allocating a GPIO pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Pin number out of range
    InvalidPin,
    /// Pin already used by another function
    InUse,
}

/// GPIO allocator to track pin usage
pub struct GpioAllocator {
    /// Set of allocated GPIO pins
    allocated: FnvIndexSet<u8, 32>,
}

impl Default for GpioAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioAllocator {
    /// Create a new GPIO allocator
    pub fn new() -> Self {
        Self {
            allocated: FnvIndexSet::new(),
        }
    }

    /// Allocate a GPIO pin
    pub fn allocate(&mut self, pin: u8) -> Result<(), GpioError> {
        if pin as usize >= GPIO_COUNT {
            return Err(GpioError::InvalidPin);
        }
        if self.allocated.contains(&pin) {
            return Err(GpioError::InUse);
        }
        self.allocated.insert(pin).map_err(|_| GpioError::InUse)?;
        Ok(())
    }

    /// Allocate every pin in `pins`, stopping at the first conflict
    pub fn allocate_all(&mut self, pins: &[u8]) -> Result<(), (u8, GpioError)> {
        for &pin in pins {
            self.allocate(pin).map_err(|e| (pin, e))?;
        }
        Ok(())
    }

    /// Release a GPIO pin
    pub fn release(&mut self, pin: u8) {
        self.allocated.remove(&pin);
    }

    /// Check if a pin is allocated
    pub fn is_allocated(&self, pin: u8) -> bool {
        self.allocated.contains(&pin)
    }

    /// Get the number of allocated pins
    pub fn allocated_count(&self) -> usize {
        self.allocated.len()
    }
}

/// Push-pull output driving a `sitwell-hal` [`OutputPin`](sitwell_hal::OutputPin)
pub struct RpOutput(Output<'static>);

impl RpOutput {
    /// Configure `pin` as an output starting low
    pub fn new(pin: Peri<'static, AnyPin>) -> Self {
        Self(Output::new(pin, Level::Low))
    }
}

impl sitwell_hal::OutputPin for RpOutput {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Digital input read through a `sitwell-hal` [`InputPin`](sitwell_hal::InputPin)
pub struct RpInput(Input<'static>);

impl RpInput {
    /// Configure `pin` as an input, with the pull-up enabled if asked
    pub fn new(pin: Peri<'static, AnyPin>, pull_up: bool) -> Self {
        let pull = if pull_up { Pull::Up } else { Pull::None };
        Self(Input::new(pin, pull))
    }
}

impl sitwell_hal::InputPin for RpInput {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}
