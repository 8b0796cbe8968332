//! Events reported by the engine each tick

use super::machine::PostureState;
use crate::traits::SensorError;

/// Upper bound on events reported by a single tick
///
/// Two per channel (fault or inconsistency, drift) plus state and
/// baseline bookkeeping.
pub const MAX_EVENTS: usize = 2 * crate::config::MAX_CHANNELS + 4;

/// Diagnostic events, in the order they happened within a tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineEvent {
    /// Posture state changed
    StateChanged {
        from: PostureState,
        to: PostureState,
    },
    /// Channel consistency score fell below the threshold
    ChannelInconsistent { channel: u8, score: f32 },
    /// Channel median moved away from its baseline (signed delta)
    ChannelDrifted { channel: u8, delta: f32 },
    /// Channel read failed; the sample was discarded
    SensorFault { channel: u8, error: SensorError },
    /// Baseline captured for every channel
    BaselineCaptured,
    /// Baseline discarded after destabilization
    BaselineCleared,
    /// Posture held past the stability time (once per episode)
    StableReported { held_ms: u32 },
    /// Monitor stopped on request
    Halted,
}

impl EngineEvent {
    /// Check if the event reports a problem with a channel
    pub fn is_channel_issue(&self) -> bool {
        matches!(
            self,
            EngineEvent::ChannelInconsistent { .. }
                | EngineEvent::ChannelDrifted { .. }
                | EngineEvent::SensorFault { .. }
        )
    }
}
