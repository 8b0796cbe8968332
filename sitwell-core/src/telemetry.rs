//! Mapping from engine output to telemetry records

use sitwell_protocol::{PostureCode, Snapshot, TelemetryRecord};

use crate::config::SeatConfig;
use crate::state::{EngineEvent, PostureState};

impl From<PostureState> for PostureCode {
    fn from(state: PostureState) -> Self {
        match state {
            PostureState::Absent => PostureCode::Absent,
            PostureState::ZoneFlag(zone) => PostureCode::ZoneFlag(zone),
            PostureState::Destabilized => PostureCode::Destabilized,
            PostureState::Debouncing => PostureCode::Debouncing,
            PostureState::Stable => PostureCode::Stable,
            PostureState::Timeout => PostureCode::Timeout,
        }
    }
}

/// Scale to thousandths, rounding half away from zero
fn milli(value: f32) -> i32 {
    let scaled = value * 1000.0;
    if scaled < 0.0 {
        (scaled - 0.5) as i32
    } else {
        (scaled + 0.5) as i32
    }
}

impl EngineEvent {
    /// Telemetry record for this event, stamped with `at_ms` where the record carries a time
    pub fn to_record(&self, at_ms: u32) -> TelemetryRecord {
        match *self {
            EngineEvent::StateChanged { from, to } => TelemetryRecord::StateChanged {
                from: from.into(),
                to: to.into(),
                at_ms,
            },
            EngineEvent::ChannelInconsistent { channel, score } => {
                TelemetryRecord::ChannelInconsistent {
                    channel,
                    score_x1000: milli(score).clamp(0, 1000) as u16,
                }
            }
            EngineEvent::ChannelDrifted { channel, delta } => TelemetryRecord::ChannelDrifted {
                channel,
                delta_x1000: milli(delta).clamp(-1000, 1000) as i16,
            },
            EngineEvent::SensorFault { channel, .. } => TelemetryRecord::SensorFault { channel },
            EngineEvent::BaselineCaptured => TelemetryRecord::BaselineCaptured { at_ms },
            EngineEvent::BaselineCleared => TelemetryRecord::BaselineCleared { at_ms },
            EngineEvent::StableReported { held_ms } => TelemetryRecord::StableReported { held_ms },
            EngineEvent::Halted => TelemetryRecord::Halted { at_ms },
        }
    }
}

/// Startup record describing the seat geometry
pub fn boot_record(config: &SeatConfig) -> TelemetryRecord {
    TelemetryRecord::Boot {
        channels: config.channel_count,
        window: config.engine.window_size,
        debounce: config.engine.debounce_length,
    }
}

/// Latest samples as millivolts
///
/// `to_mv` converts a normalized sample back to the pin voltage, so the
/// sensor driver keeps the divider wiring. Failed reads are carried as
/// `Snapshot::FAULT_MV`.
pub fn snapshot(samples: &[Option<f32>], at_ms: u32, to_mv: impl Fn(f32) -> u16) -> Snapshot {
    let mut snap = Snapshot::new(at_ms);
    for sample in samples {
        let mv = sample.map(&to_mv);
        if !snap.push(mv) {
            break;
        }
    }
    snap
}
