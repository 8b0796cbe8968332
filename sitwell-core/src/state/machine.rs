//! Debounce state machine
//!
//! The debounce buffer is an AND-gate over the last `debounce_length`
//! consistency results. It starts all-true, so the first consistent tick
//! after warm-up is already stable. The stability timer starts at the
//! first applied tick.

use heapless::Deque;

use crate::config::MAX_DEBOUNCE;
use crate::posture::PostureVerdict;

/// Debounced posture states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PostureState {
    /// Nobody on the seat
    Absent,
    /// A zone reads empty (index into the configured zones)
    ZoneFlag(u8),
    /// Readings moved within the debounce span
    Destabilized,
    /// Windows still filling
    Debouncing,
    /// Debounced and held for less than the stability time
    Stable,
    /// Debounced and held for longer than the stability time
    Timeout,
}

impl PostureState {
    /// Check if the debounce gate is open in this state
    pub fn is_debounced(&self) -> bool {
        matches!(self, PostureState::Stable | PostureState::Timeout)
    }

    /// Check if this state asks the occupant to move
    pub fn is_warning(&self) -> bool {
        matches!(self, PostureState::ZoneFlag(_) | PostureState::Timeout)
    }
}

/// Turns per-tick verdicts into a debounced posture state
#[derive(Debug, Clone)]
pub struct DebounceStateMachine {
    buffer: Deque<bool, MAX_DEBOUNCE>,
    length: usize,
    stability_ms: u32,
    state: PostureState,
    unstable_since: Option<u32>,
}

impl DebounceStateMachine {
    /// Create a machine with a pre-seeded all-true buffer
    ///
    /// `length` is limited to 1..=`MAX_DEBOUNCE`.
    pub fn new(length: usize, stability_ms: u32) -> Self {
        let length = length.clamp(1, MAX_DEBOUNCE);
        let mut buffer = Deque::new();
        for _ in 0..length {
            let _ = buffer.push_back(true);
        }
        Self {
            buffer,
            length,
            stability_ms,
            state: PostureState::Destabilized,
            unstable_since: None,
        }
    }

    /// Current state
    pub fn state(&self) -> PostureState {
        self.state
    }

    /// Whether every entry of the debounce buffer is true
    pub fn debounced(&self) -> bool {
        self.buffer.iter().all(|&v| v)
    }

    /// Time since the last reset of the unstable timer (0 before the first tick)
    pub fn held_ms(&self, now: u32) -> u32 {
        self.unstable_since.map_or(0, |t| now.wrapping_sub(t))
    }

    /// Apply one tick's verdict and return the new state
    pub fn apply(&mut self, verdict: PostureVerdict, now: u32) -> PostureState {
        if self.unstable_since.is_none() {
            self.unstable_since = Some(now);
        }
        self.state = match verdict {
            PostureVerdict::AbsentFromSeat => {
                self.unstable_since = Some(now);
                PostureState::Absent
            }
            PostureVerdict::ZoneIncorrect(zone) => {
                self.unstable_since = Some(now);
                PostureState::ZoneFlag(zone)
            }
            PostureVerdict::Warming => {
                self.unstable_since = Some(now);
                PostureState::Debouncing
            }
            PostureVerdict::Inconsistent(_)
            | PostureVerdict::Drifted(_)
            | PostureVerdict::Consistent => {
                self.shift(verdict == PostureVerdict::Consistent);
                if !self.debounced() {
                    self.unstable_since = Some(now);
                    PostureState::Destabilized
                } else if self.held_ms(now) > self.stability_ms {
                    PostureState::Timeout
                } else {
                    PostureState::Stable
                }
            }
        };
        self.state
    }

    fn shift(&mut self, consistent: bool) {
        if self.buffer.len() >= self.length {
            self.buffer.pop_front();
        }
        let _ = self.buffer.push_back(consistent);
    }
}
