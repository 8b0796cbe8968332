//! Solid-then-pulse feedback controller
//!
//! A cue is shown solid as soon as it changes. If the same cue is still
//! requested after the sustain time, the output starts alternating between
//! the cue and off, one phase every pulse period. Any change of cue goes
//! back to solid.

use super::color::Cue;

/// Feedback output state
#[derive(Debug, Clone)]
pub struct FeedbackController {
    sustain_ms: u32,
    pulse_ms: u32,
    /// Cue currently requested
    current: Cue,
    /// When `current` was first requested
    set_at: u32,
    pulsing: bool,
    /// Start of the current pulse phase
    phase_start: u32,
    /// Whether the current pulse phase shows the cue
    phase_on: bool,
}

impl FeedbackController {
    /// Create a controller showing nothing
    pub fn new(sustain_ms: u32, pulse_ms: u32) -> Self {
        Self {
            sustain_ms,
            pulse_ms: pulse_ms.max(1),
            current: Cue::OFF,
            set_at: 0,
            pulsing: false,
            phase_start: 0,
            phase_on: true,
        }
    }

    /// Cue currently requested (not what the output shows)
    pub fn current(&self) -> Cue {
        self.current
    }

    /// Whether the output is pulsing
    pub fn is_pulsing(&self) -> bool {
        self.pulsing
    }

    /// Request `target` at time `now` and return what the actuators should show
    pub fn tick(&mut self, target: Cue, now: u32) -> Cue {
        if target != self.current {
            self.current = target;
            self.set_at = now;
            self.pulsing = false;
            return target;
        }

        if now.wrapping_sub(self.set_at) >= self.sustain_ms {
            if !self.pulsing {
                self.pulsing = true;
                self.phase_start = now;
                self.phase_on = true;
            } else if now.wrapping_sub(self.phase_start) >= self.pulse_ms {
                self.phase_on = !self.phase_on;
                self.phase_start = now;
            }
            return if self.phase_on { target } else { Cue::OFF };
        }

        self.pulsing = false;
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Color;

    const RED: Cue = Cue::solid(Color::Red);
    const GREEN: Cue = Cue::solid(Color::Green);

    #[test]
    fn test_new_cue_shown_immediately() {
        let mut fb = FeedbackController::new(1_000, 200);
        assert_eq!(fb.tick(RED, 0), RED);
        assert!(!fb.is_pulsing());
        assert_eq!(fb.tick(GREEN, 50), GREEN);
        assert_eq!(fb.current(), GREEN);
    }

    #[test]
    fn test_solid_until_sustain() {
        let mut fb = FeedbackController::new(1_000, 200);
        fb.tick(RED, 0);
        for t in (100..1_000).step_by(100) {
            assert_eq!(fb.tick(RED, t), RED);
            assert!(!fb.is_pulsing());
        }
    }

    #[test]
    fn test_pulses_after_sustain() {
        let mut fb = FeedbackController::new(1_000, 200);
        fb.tick(RED, 0);

        assert_eq!(fb.tick(RED, 1_000), RED);
        assert!(fb.is_pulsing());
        assert_eq!(fb.tick(RED, 1_100), RED);
        assert_eq!(fb.tick(RED, 1_200), Cue::OFF);
        assert_eq!(fb.tick(RED, 1_300), Cue::OFF);
        assert_eq!(fb.tick(RED, 1_400), RED);
    }

    #[test]
    fn test_change_stops_pulsing() {
        let mut fb = FeedbackController::new(1_000, 200);
        fb.tick(RED, 0);
        fb.tick(RED, 1_000);
        fb.tick(RED, 1_200);
        assert!(fb.is_pulsing());

        assert_eq!(fb.tick(GREEN, 1_300), GREEN);
        assert!(!fb.is_pulsing());
        assert_eq!(fb.tick(GREEN, 1_400), GREEN);
    }

    #[test]
    fn test_buzzer_follows_pulse() {
        let alarm = Cue::new(Color::Red, true);
        let mut fb = FeedbackController::new(100, 100);
        fb.tick(alarm, 0);
        assert_eq!(fb.tick(alarm, 100), alarm);
        assert_eq!(fb.tick(alarm, 200), Cue::OFF);
    }

    #[test]
    fn test_clock_wrap() {
        let mut fb = FeedbackController::new(1_000, 200);
        let start = u32::MAX - 500;
        fb.tick(RED, start);
        assert_eq!(fb.tick(RED, start.wrapping_add(999)), RED);
        assert!(!fb.is_pulsing());
        fb.tick(RED, start.wrapping_add(1_000));
        assert!(fb.is_pulsing());
    }
}
