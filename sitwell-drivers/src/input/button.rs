//! Stop button
//!
//! The button is polled once per tick. A press must be seen on several
//! consecutive polls to count, which filters contact bounce and EMI spikes.
//! Once a stop is observed it stays requested.

use sitwell_core::traits::StopSignal;
use sitwell_hal::{InputPin, Polarity};

/// Default number of consecutive active polls required
pub const DEFAULT_STOP_POLLS: u8 = 3;

/// Debounced, latching stop button
pub struct StopButton<P> {
    pin: P,
    polarity: Polarity,
    /// Consecutive active polls required
    required: u8,
    /// Consecutive active polls seen
    count: u8,
    latched: bool,
}

impl<P: InputPin> StopButton<P> {
    /// Create a new stop button
    ///
    /// # Arguments
    /// - `pin`: Input pin
    /// - `polarity`: `ActiveLow` for a button to ground with pull-up
    /// - `required`: Consecutive active polls before the stop latches (minimum 1)
    pub fn new(pin: P, polarity: Polarity, required: u8) -> Self {
        Self {
            pin,
            polarity,
            required: required.max(1),
            count: 0,
            latched: false,
        }
    }

    /// Button to ground with internal pull-up, default debounce
    pub fn pull_up(pin: P) -> Self {
        Self::new(pin, Polarity::ActiveLow, DEFAULT_STOP_POLLS)
    }

    /// Whether the button is pressed right now (not debounced)
    pub fn is_pressed(&self) -> bool {
        self.polarity.is_active(self.pin.is_high())
    }

    /// Whether a stop has latched
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Clear the latch
    pub fn reset(&mut self) {
        self.count = 0;
        self.latched = false;
    }
}

impl<P: InputPin> StopSignal for StopButton<P> {
    fn stop_requested(&mut self) -> bool {
        if self.latched {
            return true;
        }

        if self.is_pressed() {
            self.count = self.count.saturating_add(1);
            if self.count >= self.required {
                self.latched = true;
            }
        } else {
            self.count = 0;
        }

        self.latched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Mock input pin whose level the test can change
    struct MockPin<'a> {
        high: &'a Cell<bool>,
    }

    impl InputPin for MockPin<'_> {
        fn is_high(&self) -> bool {
            self.high.get()
        }
    }

    #[test]
    fn test_idle_button_never_stops() {
        let level = Cell::new(true);
        let mut button = StopButton::pull_up(MockPin { high: &level });
        for _ in 0..10 {
            assert!(!button.stop_requested());
        }
    }

    #[test]
    fn test_press_must_be_held() {
        let level = Cell::new(true);
        let mut button = StopButton::pull_up(MockPin { high: &level });

        level.set(false);
        assert!(button.is_pressed());
        assert!(!button.stop_requested());
        assert!(!button.stop_requested());

        // Bounce restarts the count
        level.set(true);
        assert!(!button.stop_requested());

        level.set(false);
        assert!(!button.stop_requested());
        assert!(!button.stop_requested());
        assert!(button.stop_requested());
    }

    #[test]
    fn test_stop_latches() {
        let level = Cell::new(false);
        let mut button = StopButton::new(MockPin { high: &level }, Polarity::ActiveLow, 1);
        assert!(button.stop_requested());

        level.set(true);
        assert!(button.stop_requested());
        assert!(button.is_latched());

        button.reset();
        assert!(!button.stop_requested());
    }

    #[test]
    fn test_active_high_button() {
        let level = Cell::new(true);
        let mut button = StopButton::new(MockPin { high: &level }, Polarity::ActiveHigh, 0);
        // Zero is raised to one poll
        assert!(button.stop_requested());
    }
}
