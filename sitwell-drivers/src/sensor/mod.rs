//! Seat sensors

pub mod fsr;

pub use fsr::{Divider, FsrArray};
