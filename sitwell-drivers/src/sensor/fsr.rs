//! Force-sensitive resistor array
//!
//! Each FSR sits in a voltage divider read by one ADC channel. With the FSR
//! on the high side more pressure raises the voltage; with it on the low
//! side the reading falls, which [`Divider::LowSide`] corrects.

use sitwell_core::traits::{SensorArray, SensorError};
use sitwell_hal::{AdcError, AnalogBank};

fn sensor_error(e: AdcError) -> SensorError {
    match e {
        AdcError::InvalidChannel => SensorError::NoSuchChannel,
        AdcError::ConversionFailed => SensorError::ConversionError,
    }
}

/// Where the FSR sits in its voltage divider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Divider {
    /// FSR to supply, fixed resistor to ground: pressure raises the voltage
    #[default]
    HighSide,
    /// Fixed resistor to supply, FSR to ground: pressure lowers the voltage
    LowSide,
}

impl Divider {
    /// Divider from an "inverted" config flag
    pub fn from_inverted(inverted: bool) -> Self {
        if inverted {
            Divider::LowSide
        } else {
            Divider::HighSide
        }
    }

    /// Map between divider fraction and pressure fraction (self-inverse)
    fn apply(self, fraction: f32) -> f32 {
        match self {
            Divider::HighSide => fraction,
            Divider::LowSide => 1.0 - fraction,
        }
    }
}

/// FSR dividers on an analog bank
pub struct FsrArray<B> {
    bank: B,
    /// ADC reference voltage in mV
    vref_mv: u16,
    divider: Divider,
}

impl<B: AnalogBank> FsrArray<B> {
    /// Create a new sensor array
    ///
    /// # Arguments
    /// - `bank`: ADC bank, one channel per FSR in channel order
    /// - `vref_mv`: Reference voltage in millivolts (typically 3300)
    /// - `divider`: Divider wiring, shared by every channel
    pub fn new(bank: B, vref_mv: u16, divider: Divider) -> Self {
        Self {
            bank,
            vref_mv,
            divider,
        }
    }

    /// Normalize a raw count to 0.0–1.0
    pub fn normalize(&self, raw: u16) -> Result<f32, SensorError> {
        let full = self.bank.full_scale();
        if full == 0 || raw > full {
            return Err(SensorError::OutOfRange);
        }
        Ok(self.divider.apply(raw as f32 / full as f32))
    }

    /// Voltage at the divider for a normalized value
    pub fn millivolts(&self, value: f32) -> u16 {
        let fraction = self.divider.apply(value.clamp(0.0, 1.0));
        (fraction * self.vref_mv as f32 + 0.5) as u16
    }

    /// Release the ADC bank
    pub fn release(self) -> B {
        self.bank
    }
}

impl<B: AnalogBank> SensorArray for FsrArray<B> {
    fn channel_count(&self) -> usize {
        self.bank.channel_count()
    }

    fn read(&mut self, channel: usize) -> Result<f32, SensorError> {
        let raw = self.bank.read_raw(channel).map_err(sensor_error)?;
        self.normalize(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock 12-bit ADC bank
    struct MockBank {
        values: [Result<u16, AdcError>; 3],
    }

    impl AnalogBank for MockBank {
        fn channel_count(&self) -> usize {
            self.values.len()
        }

        fn full_scale(&self) -> u16 {
            4095
        }

        fn read_raw(&mut self, channel: usize) -> Result<u16, AdcError> {
            self.values
                .get(channel)
                .copied()
                .unwrap_or(Err(AdcError::InvalidChannel))
        }
    }

    fn bank() -> MockBank {
        MockBank {
            values: [Ok(0), Ok(4095), Err(AdcError::ConversionFailed)],
        }
    }

    #[test]
    fn test_normalized_reading() {
        let mut fsr = FsrArray::new(bank(), 3300, Divider::HighSide);
        assert_eq!(fsr.channel_count(), 3);
        assert_eq!(fsr.read(0), Ok(0.0));
        assert_eq!(fsr.read(1), Ok(1.0));
    }

    #[test]
    fn test_inverted_divider() {
        let mut fsr = FsrArray::new(bank(), 3300, Divider::LowSide);
        assert_eq!(fsr.read(0), Ok(1.0));
        assert_eq!(fsr.read(1), Ok(0.0));
        // Voltage is still the physical divider voltage
        let value = fsr.read(0).unwrap();
        assert_eq!(fsr.millivolts(value), 0);
        assert_eq!(fsr.millivolts(0.25), 2475);
    }

    #[test]
    fn test_errors_mapped() {
        let mut fsr = FsrArray::new(bank(), 3300, Divider::HighSide);
        assert_eq!(fsr.read(2), Err(SensorError::ConversionError));
        assert_eq!(fsr.read(5), Err(SensorError::NoSuchChannel));
        assert_eq!(fsr.normalize(5000), Err(SensorError::OutOfRange));
    }

    #[test]
    fn test_millivolts() {
        let fsr = FsrArray::new(bank(), 3300, Divider::HighSide);
        assert_eq!(fsr.millivolts(0.5), 1650);
        assert_eq!(fsr.millivolts(1.0), 3300);
    }
}
