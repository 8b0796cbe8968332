//! GPIO buzzer output
//!
//! Drives an active buzzer (built-in oscillator) directly or through a
//! transistor. The pin can be configured as active-high (default) or
//! active-low.

use sitwell_core::traits::BuzzerOutput;
use sitwell_hal::{OutputPin, Polarity};

/// GPIO buzzer output
pub struct GpioBuzzer<P> {
    pin: P,
    polarity: Polarity,
    /// Current logical state (true = sounding)
    on: bool,
}

impl<P: OutputPin> GpioBuzzer<P> {
    /// Create a new buzzer output, initially silent
    pub fn new(pin: P, polarity: Polarity) -> Self {
        let mut buzzer = Self {
            pin,
            polarity,
            on: false,
        };
        buzzer.set_on(false);
        buzzer
    }

    /// Create a buzzer with active-high output
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, Polarity::ActiveHigh)
    }

    /// Create a buzzer with active-low output
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, Polarity::ActiveLow)
    }
}

impl<P: OutputPin> BuzzerOutput for GpioBuzzer<P> {
    fn set_on(&mut self, on: bool) {
        self.on = on;
        self.pin.set_state(self.polarity.level_for(on));
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
    }

    impl MockPin {
        fn new(high: bool) -> Self {
            Self { high }
        }
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_active_high_buzzer() {
        let mut buzzer = GpioBuzzer::new_active_high(MockPin::new(true));

        // Forced silent at creation
        assert!(!buzzer.is_on());
        assert!(!buzzer.pin.is_set_high());

        buzzer.set_on(true);
        assert!(buzzer.is_on());
        assert!(buzzer.pin.is_set_high());

        buzzer.set_on(false);
        assert!(!buzzer.pin.is_set_high());
    }

    #[test]
    fn test_active_low_buzzer() {
        let mut buzzer = GpioBuzzer::new_active_low(MockPin::new(false));

        assert!(!buzzer.is_on());
        assert!(buzzer.pin.is_set_high());

        buzzer.set_on(true);
        assert!(!buzzer.pin.is_set_high());
    }
}
