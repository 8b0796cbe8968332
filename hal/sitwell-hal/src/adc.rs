//! Analog input abstractions
//!
//! Seat sensors are read through a single converter multiplexed across
//! several pins, so the trait models the whole bank rather than one pin.

/// Errors from an analog conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// Channel index is not part of this bank
    InvalidChannel,
    /// Converter reported a failed conversion
    ConversionFailed,
}

/// A bank of analog inputs sharing one converter
pub trait AnalogBank {
    /// Number of channels wired into this bank
    fn channel_count(&self) -> usize;

    /// Largest raw value the converter can return (e.g. 4095 for 12-bit)
    fn full_scale(&self) -> u16;

    /// Perform one conversion on `channel` and return the raw count
    ///
    /// Takes `&mut self` because the converter is shared between channels.
    fn read_raw(&mut self, channel: usize) -> Result<u16, AdcError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBank {
        values: [u16; 2],
    }

    impl AnalogBank for FixedBank {
        fn channel_count(&self) -> usize {
            self.values.len()
        }

        fn full_scale(&self) -> u16 {
            1023
        }

        fn read_raw(&mut self, channel: usize) -> Result<u16, AdcError> {
            self.values
                .get(channel)
                .copied()
                .ok_or(AdcError::InvalidChannel)
        }
    }

    #[test]
    fn test_out_of_range_channel() {
        let mut bank = FixedBank { values: [10, 20] };
        assert_eq!(bank.read_raw(1), Ok(20));
        assert_eq!(bank.read_raw(2), Err(AdcError::InvalidChannel));
    }
}
