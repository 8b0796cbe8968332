//! RGB status LED
//!
//! Two drive modes: plain GPIO, where a component of 128 or more lights its
//! die, and PWM, where each component sets a duty cycle. Common-anode LEDs
//! are driven active-low.

use embedded_hal::pwm::SetDutyCycle;
use sitwell_core::feedback::Rgb;
use sitwell_core::traits::ColorOutput;
use sitwell_hal::{OutputPin, Polarity};

/// Component level at which a GPIO-driven die turns on
const GPIO_ON_LEVEL: u8 = 128;

/// RGB LED on three digital pins
pub struct GpioRgbLed<R, G, B> {
    red: R,
    green: G,
    blue: B,
    polarity: Polarity,
    color: Rgb,
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> GpioRgbLed<R, G, B> {
    /// Create a new LED, initially off
    pub fn new(red: R, green: G, blue: B, polarity: Polarity) -> Self {
        let mut led = Self {
            red,
            green,
            blue,
            polarity,
            color: Rgb::OFF,
        };
        led.set_color(Rgb::OFF);
        led
    }

    /// Color last written
    pub fn color(&self) -> Rgb {
        self.color
    }
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> ColorOutput for GpioRgbLed<R, G, B> {
    fn set_color(&mut self, color: Rgb) {
        let p = self.polarity;
        self.red.set_state(p.level_for(color.r >= GPIO_ON_LEVEL));
        self.green.set_state(p.level_for(color.g >= GPIO_ON_LEVEL));
        self.blue.set_state(p.level_for(color.b >= GPIO_ON_LEVEL));
        self.color = color;
    }
}

/// RGB LED on three PWM channels
pub struct PwmRgbLed<R, G, B> {
    red: R,
    green: G,
    blue: B,
    polarity: Polarity,
    color: Rgb,
    /// A channel rejected its last duty cycle
    fault: bool,
}

impl<R: SetDutyCycle, G: SetDutyCycle, B: SetDutyCycle> PwmRgbLed<R, G, B> {
    /// Create a new LED, initially off
    pub fn new(red: R, green: G, blue: B, polarity: Polarity) -> Self {
        let mut led = Self {
            red,
            green,
            blue,
            polarity,
            color: Rgb::OFF,
            fault: false,
        };
        led.set_color(Rgb::OFF);
        led
    }

    /// Color last written
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Whether any channel failed on the last write
    pub fn has_fault(&self) -> bool {
        self.fault
    }
}

/// Write one 8-bit component as a duty cycle
fn write_component<P: SetDutyCycle>(pwm: &mut P, level: u8, polarity: Polarity) -> bool {
    let level = match polarity {
        Polarity::ActiveHigh => level,
        Polarity::ActiveLow => 255 - level,
    };
    pwm.set_duty_cycle_fraction(level as u16, 255).is_ok()
}

impl<R: SetDutyCycle, G: SetDutyCycle, B: SetDutyCycle> ColorOutput for PwmRgbLed<R, G, B> {
    fn set_color(&mut self, color: Rgb) {
        let p = self.polarity;
        let ok = [
            write_component(&mut self.red, color.r, p),
            write_component(&mut self.green, color.g, p),
            write_component(&mut self.blue, color.b, p),
        ];
        self.fault = ok.contains(&false);
        self.color = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use sitwell_core::feedback::Color;

    /// Mock GPIO pin for testing
    #[derive(Default)]
    struct MockPin {
        high: bool,
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

    /// Mock PWM channel
    #[derive(Default)]
    struct MockPwm {
        duty: u16,
    }

    impl embedded_hal::pwm::ErrorType for MockPwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockPwm {
        fn max_duty_cycle(&self) -> u16 {
            1000
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.duty = duty;
            Ok(())
        }
    }

    fn levels<R: OutputPin, G: OutputPin, B: OutputPin>(led: &GpioRgbLed<R, G, B>) -> [bool; 3] {
        [
            led.red.is_set_high(),
            led.green.is_set_high(),
            led.blue.is_set_high(),
        ]
    }

    #[test]
    fn test_gpio_common_cathode() {
        let mut led = GpioRgbLed::new(
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
            Polarity::ActiveHigh,
        );
        assert_eq!(levels(&led), [false, false, false]);

        led.set_color(Color::Magenta.rgb());
        assert_eq!(levels(&led), [true, false, true]);

        // Orange green component is exactly the on level
        led.set_color(Color::Orange.rgb());
        assert_eq!(levels(&led), [true, true, false]);
        assert_eq!(led.color(), Color::Orange.rgb());
    }

    #[test]
    fn test_gpio_common_anode() {
        let mut led = GpioRgbLed::new(
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
            Polarity::ActiveLow,
        );
        assert_eq!(levels(&led), [true, true, true]);

        led.set_color(Color::Green.rgb());
        assert_eq!(levels(&led), [true, false, true]);

        led.off();
        assert_eq!(levels(&led), [true, true, true]);
    }

    #[test]
    fn test_pwm_duty() {
        let mut led = PwmRgbLed::new(
            MockPwm::default(),
            MockPwm::default(),
            MockPwm::default(),
            Polarity::ActiveHigh,
        );
        led.set_color(Rgb::new(255, 0, 51));
        assert_eq!(led.red.duty, 1000);
        assert_eq!(led.green.duty, 0);
        assert_eq!(led.blue.duty, 200);
        assert!(!led.has_fault());
    }

    #[test]
    fn test_pwm_active_low() {
        let led = PwmRgbLed::new(
            MockPwm::default(),
            MockPwm::default(),
            MockPwm::default(),
            Polarity::ActiveLow,
        );
        // Off means full duty on a common-anode LED
        assert_eq!(led.red.duty, 1000);
        assert_eq!(led.color(), Rgb::OFF);
    }
}
