//! GPIO pin abstractions
//!
//! Digital outputs drive the LED dies and the buzzer; digital inputs read
//! the stop button. Wiring differs between boards (common-anode LEDs,
//! pull-up buttons), so [`Polarity`] maps logical on/off to pin levels.

/// Digital output pin
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific level
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Electrical polarity of a digital signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Logical on = pin high
    #[default]
    ActiveHigh,
    /// Logical on = pin low (common-anode LED, pull-up button)
    ActiveLow,
}

impl Polarity {
    /// Pin level that represents the logical state `on`
    pub fn level_for(self, on: bool) -> bool {
        match self {
            Polarity::ActiveHigh => on,
            Polarity::ActiveLow => !on,
        }
    }

    /// Logical state represented by the pin level `high`
    pub fn is_active(self, high: bool) -> bool {
        self.level_for(high)
    }

    /// Polarity from an "inverted" config flag
    pub fn from_inverted(inverted: bool) -> Self {
        if inverted {
            Polarity::ActiveLow
        } else {
            Polarity::ActiveHigh
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarity_levels() {
        assert!(Polarity::ActiveHigh.level_for(true));
        assert!(!Polarity::ActiveHigh.level_for(false));
        assert!(!Polarity::ActiveLow.level_for(true));
        assert!(Polarity::ActiveLow.level_for(false));
    }

    #[test]
    fn test_active_low_input() {
        // Pull-up button: pressed reads low
        assert!(Polarity::ActiveLow.is_active(false));
        assert!(!Polarity::ActiveLow.is_active(true));
    }

    #[test]
    fn test_from_inverted() {
        assert_eq!(Polarity::from_inverted(false), Polarity::ActiveHigh);
        assert_eq!(Polarity::from_inverted(true), Polarity::ActiveLow);
    }
}
