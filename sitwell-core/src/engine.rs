//! Per-tick posture engine
//!
//! One [`Engine::tick`] runs the whole pipeline: ingest readings, classify,
//! debounce, manage the baseline and pick the feedback cue. The engine owns
//! every piece of mutable state; the result of a tick depends only on that
//! state, the readings and the time.

use heapless::Vec;

use crate::config::{ConfigError, SeatConfig, MAX_CHANNELS};
use crate::feedback::{Cue, FeedbackController};
use crate::posture::{
    evaluate, ChairPresenceDetector, DriftDetector, Evaluation, PostureVerdict,
    ZonePostureClassifier,
};
use crate::state::{DebounceStateMachine, EngineEvent, PostureState, MAX_EVENTS};
use crate::stats::SensorChannel;
use crate::traits::SensorError;

/// Result of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Debounced state after this tick
    pub state: PostureState,
    /// Classification that drove the state
    pub verdict: PostureVerdict,
    /// What the actuators should show now
    pub cue: Cue,
    /// Diagnostics, in the order they happened
    pub events: Vec<EngineEvent, MAX_EVENTS>,
    /// Latest accepted sample per channel (`None` for a failed read)
    pub samples: Vec<Option<f32>, MAX_CHANNELS>,
}

impl TickReport {
    /// Check if the state changed during this tick
    pub fn state_changed(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, EngineEvent::StateChanged { .. }))
    }
}

/// Posture stability engine
#[derive(Debug, Clone)]
pub struct Engine {
    config: SeatConfig,
    channels: Vec<SensorChannel, MAX_CHANNELS>,
    presence: ChairPresenceDetector,
    zones: ZonePostureClassifier,
    drift: DriftDetector,
    machine: DebounceStateMachine,
    feedback: FeedbackController,
    stable_reported: bool,
}

impl Engine {
    /// Build an engine from a validated configuration
    pub fn new(config: SeatConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let e = &config.engine;
        let mut channels = Vec::new();
        for i in 0..config.channel_count {
            let zone = config
                .zones
                .iter()
                .position(|z| z.channels.contains(&i))
                .map(|z| z as u8);
            let _ = channels.push(SensorChannel::new(i, zone, e.window_size as usize));
        }

        Ok(Self {
            presence: ChairPresenceDetector::new(&config.seat_channels, e.at_chair_threshold),
            zones: ZonePostureClassifier::new(&config.zones),
            drift: DriftDetector::new(e.drift_threshold),
            machine: DebounceStateMachine::new(e.debounce_length as usize, e.stability_ms),
            feedback: FeedbackController::new(e.sustain_ms, e.pulse_ms),
            stable_reported: false,
            channels,
            config,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &SeatConfig {
        &self.config
    }

    /// Current debounced state
    pub fn state(&self) -> PostureState {
        self.machine.state()
    }

    /// Whether the debounce buffer is all-true
    pub fn debounced(&self) -> bool {
        self.machine.debounced()
    }

    /// Captured baseline of `channel`
    pub fn baseline(&self, channel: usize) -> Option<f32> {
        self.drift.baseline(channel)
    }

    /// Sensor channel `index`
    pub fn channel(&self, index: usize) -> Option<&SensorChannel> {
        self.channels.get(index)
    }

    /// All sensor channels
    pub fn channels(&self) -> &[SensorChannel] {
        &self.channels
    }

    /// Number of sensor channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Run one tick
    ///
    /// `readings[i]` is the read result for channel `i`; missing entries
    /// count as `SensorError::NoSuchChannel`. Non-finite values and failed
    /// reads are not written to the window and make the channel
    /// inconsistent for this tick.
    pub fn tick(&mut self, readings: &[Result<f32, SensorError>], now: u32) -> TickReport {
        let mut events = Vec::new();

        self.ingest(readings, &mut events);

        let verdict = {
            let eval = Evaluation {
                channels: &self.channels,
                presence: &self.presence,
                zones: &self.zones,
                drift: &self.drift,
                consistency_threshold: self.config.engine.consistency_threshold,
                mad_multiplier: self.config.engine.mad_multiplier,
            };
            evaluate(&eval, &mut events)
        };

        let previous = self.machine.state();
        let state = self.machine.apply(verdict, now);
        if state != previous {
            let _ = events.push(EngineEvent::StateChanged {
                from: previous,
                to: state,
            });
        }

        self.update_baseline(state, &mut events);

        if !state.is_debounced() {
            self.stable_reported = false;
        } else if state == PostureState::Timeout && !self.stable_reported {
            self.stable_reported = true;
            let _ = events.push(EngineEvent::StableReported {
                held_ms: self.machine.held_ms(now),
            });
        }

        let target = self.config.palette.cue_for(state, &self.config.zones);
        let cue = self.feedback.tick(target, now);

        TickReport {
            state,
            verdict,
            cue,
            events,
            samples: self.channels.iter().map(SensorChannel::latest).collect(),
        }
    }

    fn ingest(
        &mut self,
        readings: &[Result<f32, SensorError>],
        events: &mut Vec<EngineEvent, MAX_EVENTS>,
    ) {
        for (i, channel) in self.channels.iter_mut().enumerate() {
            let reading = readings
                .get(i)
                .copied()
                .unwrap_or(Err(SensorError::NoSuchChannel))
                .and_then(|v| {
                    if v.is_finite() {
                        Ok(v)
                    } else {
                        Err(SensorError::NotFinite)
                    }
                });

            match reading {
                Ok(value) => channel.update(value),
                Err(error) => {
                    channel.mark_fault();
                    let _ = events.push(EngineEvent::SensorFault {
                        channel: channel.index(),
                        error,
                    });
                }
            }
        }
    }

    /// Capture on the first debounced tick of an episode, clear on destabilization
    fn update_baseline(&mut self, state: PostureState, events: &mut Vec<EngineEvent, MAX_EVENTS>) {
        if state.is_debounced() && !self.drift.has_baseline() {
            self.drift.capture(&self.channels);
            let _ = events.push(EngineEvent::BaselineCaptured);
        } else if state == PostureState::Destabilized && self.drift.has_baseline() {
            self.drift.clear();
            let _ = events.push(EngineEvent::BaselineCleared);
        }
    }
}
