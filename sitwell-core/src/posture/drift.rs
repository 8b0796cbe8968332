//! Baseline drift detection
//!
//! Once the posture first debounces as stable, each channel's window median
//! is captured as its baseline. A channel has drifted when its median later
//! moves more than the drift threshold away from that baseline. Channels
//! without a baseline never drift.

use crate::config::MAX_CHANNELS;
use crate::stats::SensorChannel;

/// Per-channel reference baseline and drift test
#[derive(Debug, Clone)]
pub struct DriftDetector {
    threshold: f32,
    baseline: [Option<f32>; MAX_CHANNELS],
}

impl DriftDetector {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            baseline: [None; MAX_CHANNELS],
        }
    }

    /// Capture the current median of every ready channel
    pub fn capture(&mut self, channels: &[SensorChannel]) {
        for (slot, channel) in self.baseline.iter_mut().zip(channels) {
            *slot = channel.median();
        }
    }

    /// Discard every baseline
    pub fn clear(&mut self) {
        self.baseline = [None; MAX_CHANNELS];
    }

    /// Whether any channel holds a baseline
    pub fn has_baseline(&self) -> bool {
        self.baseline.iter().any(Option::is_some)
    }

    /// Baseline of `channel`
    pub fn baseline(&self, channel: usize) -> Option<f32> {
        self.baseline.get(channel).copied().flatten()
    }

    /// Signed distance of `median` from the channel baseline, if beyond the threshold
    pub fn drift(&self, channel: usize, median: f32) -> Option<f32> {
        let base = self.baseline(channel)?;
        let delta = median - base;
        let magnitude = if delta < 0.0 { -delta } else { delta };
        (magnitude > self.threshold).then_some(delta)
    }

    /// Whether `channel` has drifted from its baseline
    pub fn has_drifted(&self, channel: &SensorChannel) -> bool {
        channel
            .median()
            .and_then(|m| self.drift(channel.index() as usize, m))
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(index: u8, value: f32) -> SensorChannel {
        let mut ch = SensorChannel::new(index, None, 4);
        for _ in 0..4 {
            ch.update(value);
        }
        ch
    }

    #[test]
    fn test_no_drift_without_baseline() {
        let detector = DriftDetector::new(0.15);
        assert!(!detector.has_baseline());
        assert_eq!(detector.drift(0, 1.0), None);
        assert!(!detector.has_drifted(&filled(0, 0.9)));
    }

    #[test]
    fn test_capture_and_drift() {
        let mut detector = DriftDetector::new(0.15);
        detector.capture(&[filled(0, 0.5), filled(1, 0.2)]);
        assert_eq!(detector.baseline(0), Some(0.5));
        assert_eq!(detector.baseline(1), Some(0.2));
        assert_eq!(detector.baseline(2), None);

        assert_eq!(detector.drift(0, 0.6), None);
        let delta = detector.drift(0, 0.3).unwrap();
        assert!(delta < -0.15);
        assert!(detector.has_drifted(&filled(1, 0.4)));
    }

    #[test]
    fn test_clear() {
        let mut detector = DriftDetector::new(0.15);
        detector.capture(&[filled(0, 0.5)]);
        detector.clear();
        assert!(!detector.has_baseline());
        assert!(!detector.has_drifted(&filled(0, 0.0)));
    }

    #[test]
    fn test_unready_channel_not_captured() {
        let mut detector = DriftDetector::new(0.15);
        let mut partial = SensorChannel::new(0, None, 4);
        partial.update(0.5);
        detector.capture(&[partial]);
        assert!(!detector.has_baseline());
    }
}
