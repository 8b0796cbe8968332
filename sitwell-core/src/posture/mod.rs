//! Posture classification
//!
//! Presence, zone and drift checks over the per-channel windows, combined
//! into a single per-tick [`PostureVerdict`] by a fixed-priority rule list.

pub mod drift;
pub mod presence;
pub mod verdict;
pub mod zones;

pub use drift::DriftDetector;
pub use presence::ChairPresenceDetector;
pub use verdict::{evaluate, Evaluation, PostureVerdict};
pub use zones::{Zone, ZonePostureClassifier};
