//! Seat occupancy detection
//!
//! Presence uses the latest raw sample, not the window, so standing up is
//! noticed on the very next tick.

use heapless::Vec;

use crate::config::MAX_CHANNELS;
use crate::stats::SensorChannel;

/// Decides whether someone is sitting, from the seat-contact channels
#[derive(Debug, Clone)]
pub struct ChairPresenceDetector {
    seat_channels: Vec<u8, MAX_CHANNELS>,
    threshold: f32,
}

impl ChairPresenceDetector {
    pub fn new(seat_channels: &[u8], threshold: f32) -> Self {
        let mut list = Vec::new();
        for &ch in seat_channels.iter().take(MAX_CHANNELS) {
            let _ = list.push(ch);
        }
        Self {
            seat_channels: list,
            threshold,
        }
    }

    /// True if any seat channel's latest sample exceeds the threshold
    ///
    /// Channels whose last read failed do not count.
    pub fn is_present(&self, channels: &[SensorChannel]) -> bool {
        self.seat_channels.iter().any(|&ch| {
            channels
                .get(ch as usize)
                .and_then(SensorChannel::latest)
                .is_some_and(|v| v > self.threshold)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec as StdVec;

    fn channels(latest: &[f32]) -> StdVec<SensorChannel> {
        latest
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let mut ch = SensorChannel::new(i as u8, None, 4);
                ch.update(v);
                ch
            })
            .collect()
    }

    #[test]
    fn test_empty_seat() {
        let detector = ChairPresenceDetector::new(&[0, 1], 0.10);
        assert!(!detector.is_present(&channels(&[0.0, 0.0, 0.9, 0.9])));
    }

    #[test]
    fn test_any_seat_channel_is_enough() {
        let detector = ChairPresenceDetector::new(&[0, 1], 0.10);
        assert!(detector.is_present(&channels(&[0.0, 0.4, 0.0, 0.0])));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let detector = ChairPresenceDetector::new(&[0], 0.5);
        assert!(!detector.is_present(&channels(&[0.5])));
        assert!(detector.is_present(&channels(&[0.51])));
    }

    #[test]
    fn test_faulted_channel_ignored() {
        let detector = ChairPresenceDetector::new(&[0], 0.10);
        let mut chans = channels(&[0.8]);
        chans[0].mark_fault();
        assert!(!detector.is_present(&chans));
    }

    #[test]
    fn test_reacts_on_first_sample() {
        // Window nowhere near full, presence still known
        let detector = ChairPresenceDetector::new(&[0], 0.10);
        let chans = channels(&[0.3]);
        assert!(!chans[0].is_ready());
        assert!(detector.is_present(&chans));
    }
}
