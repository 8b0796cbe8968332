//! Telemetry record definitions
//!
//! Floating-point quantities travel as fixed-point integers (×1000) so
//! a record has the same size and meaning on every host.

use serde::{Deserialize, Serialize};

/// Maximum number of channels carried in a [`Snapshot`]
pub const MAX_SNAPSHOT_CHANNELS: usize = 8;

/// Wire form of the posture state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PostureCode {
    /// Nobody on the seat
    Absent,
    /// A sensor zone reads empty (zone index)
    ZoneFlag(u8),
    /// Readings are moving; debounce in progress
    Destabilized,
    /// Sensor windows still filling after boot
    Debouncing,
    /// Posture is steady
    Stable,
    /// Posture has been steady for longer than the stability period
    Timeout,
}

/// Latest readings of every channel in millivolts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    /// Timestamp (ms since boot)
    pub at_ms: u32,
    /// Number of valid entries in `millivolts`
    pub count: u8,
    /// Per-channel voltage; `u16::MAX` marks a failed read
    pub millivolts: [u16; MAX_SNAPSHOT_CHANNELS],
}

impl Snapshot {
    /// Marker for a channel whose read failed this tick
    pub const FAULT_MV: u16 = u16::MAX;

    /// Create an empty snapshot
    pub const fn new(at_ms: u32) -> Self {
        Self {
            at_ms,
            count: 0,
            millivolts: [0; MAX_SNAPSHOT_CHANNELS],
        }
    }

    /// Append one channel; returns false once the snapshot is full
    pub fn push(&mut self, millivolts: Option<u16>) -> bool {
        let idx = self.count as usize;
        if idx >= MAX_SNAPSHOT_CHANNELS {
            return false;
        }
        self.millivolts[idx] = millivolts.unwrap_or(Self::FAULT_MV);
        self.count += 1;
        true
    }

    /// Valid entries only
    pub fn channels(&self) -> &[u16] {
        &self.millivolts[..self.count as usize]
    }
}

/// A single telemetry record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryRecord {
    /// Firmware started with this geometry
    Boot {
        channels: u8,
        window: u8,
        debounce: u8,
    },
    /// Posture state changed
    StateChanged {
        from: PostureCode,
        to: PostureCode,
        at_ms: u32,
    },
    /// A channel's consistency score fell below the threshold
    ChannelInconsistent { channel: u8, score_x1000: u16 },
    /// A channel's median moved away from its baseline
    ChannelDrifted { channel: u8, delta_x1000: i16 },
    /// Baseline learned for every channel
    BaselineCaptured { at_ms: u32 },
    /// Baseline dropped after destabilization
    BaselineCleared { at_ms: u32 },
    /// Posture held steady past the stability period (once per episode)
    StableReported { held_ms: u32 },
    /// A sensor read failed or returned a non-finite value
    SensorFault { channel: u8 },
    /// Periodic reading snapshot
    Snapshot(Snapshot),
    /// Stop requested; sampling has ended
    Halted { at_ms: u32 },
}
