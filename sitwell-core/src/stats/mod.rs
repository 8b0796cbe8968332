//! Rolling-window statistics
//!
//! Every sensor channel keeps the last W normalized samples in a circular
//! buffer. Posture decisions are made from robust statistics over that
//! window (median and median absolute deviation) rather than from single
//! samples, so a noisy pad cannot flip the verdict on its own.

pub mod robust;
pub mod window;

pub use robust::{consistency_score, mad, median, MAD_EPSILON};
pub use window::SensorChannel;
