//! Hardware abstraction traits
//!
//! These traits define the interface between the engine and the
//! hardware-specific implementations in `sitwell-drivers`.

pub mod output;
pub mod sensor;
pub mod stop;

pub use output::{BuzzerOutput, ColorOutput};
pub use sensor::{SensorArray, SensorError};
pub use stop::StopSignal;
