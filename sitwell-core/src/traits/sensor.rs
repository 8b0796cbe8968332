//! Pressure sensor array trait

/// Errors that can occur while reading a sensor channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// ADC conversion failed
    ConversionError,
    /// Raw reading outside the converter range
    OutOfRange,
    /// Reading is NaN or infinite
    NotFinite,
    /// Channel index not wired on this board
    NoSuchChannel,
}

/// Trait for an array of analog pressure sensors
///
/// Implementations return one normalized sample per call, where 0.0 is no
/// load and 1.0 is full scale.
pub trait SensorArray {
    /// Number of channels in the array
    fn channel_count(&self) -> usize;

    /// Read one normalized sample from `channel`
    ///
    /// Takes `&mut self` because ADC reads typically require mutable access.
    fn read(&mut self, channel: usize) -> Result<f32, SensorError>;
}
