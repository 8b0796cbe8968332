//! Cooperative tick runner
//!
//! The monitor owns the engine and the devices. Each [`Monitor::step`]
//! checks the stop signal, samples every channel, runs one engine tick and
//! drives the light and buzzer. The caller sleeps between steps.

use heapless::Vec;

use crate::config::{ConfigError, SeatConfig, MAX_CHANNELS};
use crate::engine::{Engine, TickReport};
use crate::feedback::Cue;
use crate::traits::{BuzzerOutput, ColorOutput, SensorArray, SensorError, StopSignal};

/// What a step did
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// A tick ran
    Ran(TickReport),
    /// Stop observed on this step; outputs were switched off
    Stopped,
    /// Already stopped; nothing was sampled
    Halted,
}

/// Engine plus devices
pub struct Monitor<S, L, B, X> {
    engine: Engine,
    sensors: S,
    light: L,
    buzzer: B,
    stop: X,
    halted: bool,
    shown: Option<Cue>,
}

impl<S, L, B, X> Monitor<S, L, B, X>
where
    S: SensorArray,
    L: ColorOutput,
    B: BuzzerOutput,
    X: StopSignal,
{
    /// Create a monitor, with the light and buzzer off
    pub fn new(
        config: SeatConfig,
        sensors: S,
        mut light: L,
        mut buzzer: B,
        stop: X,
    ) -> Result<Self, ConfigError> {
        if sensors.channel_count() < config.channel_count as usize {
            return Err(ConfigError::InvalidChannelCount);
        }
        let engine = Engine::new(config)?;
        light.off();
        buzzer.set_on(false);
        Ok(Self {
            engine,
            sensors,
            light,
            buzzer,
            stop,
            halted: false,
            shown: None,
        })
    }

    /// The engine
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The sensor array
    pub fn sensors(&self) -> &S {
        &self.sensors
    }

    /// Whether a stop has been observed
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Run one tick at time `now`
    pub fn step(&mut self, now: u32) -> StepOutcome {
        if self.halted {
            return StepOutcome::Halted;
        }

        if self.stop.stop_requested() {
            self.halted = true;
            self.light.off();
            self.buzzer.set_on(false);
            self.shown = Some(Cue::OFF);
            return StepOutcome::Stopped;
        }

        let mut readings: Vec<Result<f32, SensorError>, MAX_CHANNELS> = Vec::new();
        for ch in 0..self.engine.channel_count() {
            let _ = readings.push(self.sensors.read(ch));
        }

        let report = self.engine.tick(&readings, now);
        self.actuate(report.cue);
        StepOutcome::Ran(report)
    }

    /// Release the devices
    pub fn into_parts(self) -> (S, L, B, X) {
        (self.sensors, self.light, self.buzzer, self.stop)
    }

    /// Write the cue, skipping outputs that already show it
    fn actuate(&mut self, cue: Cue) {
        let previous = self.shown.replace(cue);
        if previous.map(|c| c.color) != Some(cue.color) {
            self.light.set_color(cue.color.rgb());
        }
        if self.buzzer.is_on() != cue.buzzer {
            self.buzzer.set_on(cue.buzzer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{Color, Rgb};
    use crate::state::PostureState;
    use std::vec::Vec as StdVec;

    struct MockSensors {
        values: [f32; 4],
        reads: usize,
    }

    impl SensorArray for MockSensors {
        fn channel_count(&self) -> usize {
            4
        }

        fn read(&mut self, channel: usize) -> Result<f32, SensorError> {
            self.reads += 1;
            self.values
                .get(channel)
                .copied()
                .ok_or(SensorError::NoSuchChannel)
        }
    }

    #[derive(Default)]
    struct MockLight {
        writes: StdVec<Rgb>,
    }

    impl ColorOutput for MockLight {
        fn set_color(&mut self, color: Rgb) {
            self.writes.push(color);
        }
    }

    #[derive(Default)]
    struct MockBuzzer {
        on: bool,
        switches: usize,
    }

    impl BuzzerOutput for MockBuzzer {
        fn set_on(&mut self, on: bool) {
            self.on = on;
            self.switches += 1;
        }

        fn is_on(&self) -> bool {
            self.on
        }
    }

    struct StopAfter {
        polls: usize,
        limit: usize,
    }

    impl StopSignal for StopAfter {
        fn stop_requested(&mut self) -> bool {
            self.polls += 1;
            self.polls > self.limit
        }
    }

    fn monitor(stop_after: usize) -> Monitor<MockSensors, MockLight, MockBuzzer, StopAfter> {
        let mut config = SeatConfig::default();
        config.engine.window_size = 5;
        config.engine.stability_ms = 1_000;
        Monitor::new(
            config,
            MockSensors {
                values: [0.5; 4],
                reads: 0,
            },
            MockLight::default(),
            MockBuzzer::default(),
            StopAfter {
                polls: 0,
                limit: stop_after,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_outputs_off_at_start() {
        let (_, light, buzzer, _) = monitor(0).into_parts();
        assert_eq!(light.writes.as_slice(), &[Rgb::OFF]);
        assert!(!buzzer.on);
    }

    #[test]
    fn test_too_few_sensors() {
        let mut config = SeatConfig::default();
        config.channel_count = 6;
        let result = Monitor::new(
            config,
            MockSensors {
                values: [0.5; 4],
                reads: 0,
            },
            MockLight::default(),
            MockBuzzer::default(),
            (),
        );
        assert!(matches!(result, Err(ConfigError::InvalidChannelCount)));
    }

    #[test]
    fn test_runs_to_stable_and_timeout() {
        let mut m = monitor(usize::MAX);
        let mut state = PostureState::Destabilized;
        for i in 0..30u32 {
            if let StepOutcome::Ran(report) = m.step(i * 100) {
                state = report.state;
            }
        }
        assert_eq!(state, PostureState::Timeout);

        let (sensors, light, buzzer, _) = m.into_parts();
        assert_eq!(sensors.reads, 30 * 4);
        // Off, blue while filling, green, red
        assert_eq!(
            light.writes.as_slice(),
            &[
                Rgb::OFF,
                Color::Blue.rgb(),
                Color::Green.rgb(),
                Color::Red.rgb()
            ]
        );
        assert!(buzzer.on);
    }

    #[test]
    fn test_stop_halts_and_silences() {
        let mut m = monitor(25);
        for i in 0..25u32 {
            assert!(matches!(m.step(i * 100), StepOutcome::Ran(_)));
        }
        assert_eq!(m.step(2_500), StepOutcome::Stopped);
        assert!(m.is_halted());
        assert_eq!(m.step(2_600), StepOutcome::Halted);
        assert_eq!(m.step(2_700), StepOutcome::Halted);

        let (sensors, light, buzzer, stop) = m.into_parts();
        // No sampling after the stop, stop polled only until it fired
        assert_eq!(sensors.reads, 25 * 4);
        assert_eq!(stop.polls, 26);
        assert_eq!(light.writes.last(), Some(&Rgb::OFF));
        assert!(!buzzer.on);
    }

    #[test]
    fn test_board_without_buzzer_or_button() {
        let mut config = SeatConfig::default();
        config.engine.window_size = 5;
        let mut m = Monitor::new(
            config,
            MockSensors {
                values: [0.5; 4],
                reads: 0,
            },
            MockLight::default(),
            None::<MockBuzzer>,
            None::<StopAfter>,
        )
        .unwrap();

        for i in 0..80u32 {
            assert!(matches!(m.step(i * 100), StepOutcome::Ran(_)));
        }
        assert_eq!(m.engine().state(), PostureState::Timeout);
        assert!(!m.is_halted());
    }
}
