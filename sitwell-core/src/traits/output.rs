//! Feedback actuator traits

use crate::feedback::Rgb;

/// Trait for an RGB status light
///
/// Implementations are assumed to always succeed.
pub trait ColorOutput {
    /// Show `color`
    fn set_color(&mut self, color: Rgb);

    /// Turn every die off
    fn off(&mut self) {
        self.set_color(Rgb::OFF);
    }
}

/// Trait for a buzzer output
pub trait BuzzerOutput {
    /// Turn the buzzer on or off
    fn set_on(&mut self, on: bool);

    /// Check if the buzzer is currently on
    fn is_on(&self) -> bool;
}

/// A board without a buzzer
impl<T: BuzzerOutput> BuzzerOutput for Option<T> {
    fn set_on(&mut self, on: bool) {
        if let Some(buzzer) = self {
            buzzer.set_on(on);
        }
    }

    fn is_on(&self) -> bool {
        self.as_ref().is_some_and(|b| b.is_on())
    }
}
