//! Zone emptiness classification
//!
//! A zone is empty when every one of its channels has both window median
//! and window MAD at or below the zone threshold. Zones are checked in
//! declared order and the first empty one wins.

use heapless::Vec;

use crate::config::{ZoneConfig, MAX_CHANNELS, MAX_ZONES};
use crate::stats::SensorChannel;

/// Channel group checked for a no-load reading
#[derive(Debug, Clone)]
pub struct Zone {
    pub channels: Vec<u8, MAX_CHANNELS>,
    pub threshold: f32,
}

impl From<&ZoneConfig> for Zone {
    fn from(config: &ZoneConfig) -> Self {
        Self {
            channels: config.channels.clone(),
            threshold: config.threshold,
        }
    }
}

/// Finds the first empty zone
#[derive(Debug, Clone, Default)]
pub struct ZonePostureClassifier {
    zones: Vec<Zone, MAX_ZONES>,
}

impl ZonePostureClassifier {
    pub fn new(zones: &[ZoneConfig]) -> Self {
        let mut list = Vec::new();
        for zone in zones.iter().take(MAX_ZONES) {
            let _ = list.push(Zone::from(zone));
        }
        Self { zones: list }
    }

    /// Number of zones
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Whether zone `index` reads empty
    ///
    /// A channel whose window is not yet full, or that is missing, keeps
    /// the zone from reading empty.
    pub fn zone_empty(&self, index: usize, channels: &[SensorChannel]) -> bool {
        let Some(zone) = self.zones.get(index) else {
            return false;
        };
        zone.channels.iter().all(|&ch| {
            let Some(channel) = channels.get(ch as usize) else {
                return false;
            };
            match (channel.median(), channel.mad()) {
                (Some(median), Some(mad)) => median <= zone.threshold && mad <= zone.threshold,
                _ => false,
            }
        })
    }

    /// Index of the first empty zone in declared order
    pub fn first_empty(&self, channels: &[SensorChannel]) -> Option<u8> {
        (0..self.zones.len())
            .find(|&i| self.zone_empty(i, channels))
            .map(|i| i as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Color;
    use std::vec::Vec as StdVec;

    fn filled(values: &[f32]) -> StdVec<SensorChannel> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let mut ch = SensorChannel::new(i as u8, None, 4);
                for _ in 0..4 {
                    ch.update(v);
                }
                ch
            })
            .collect()
    }

    fn classifier() -> ZonePostureClassifier {
        ZonePostureClassifier::new(&[
            ZoneConfig::new("lower_back", &[2], 0.05, Color::Magenta),
            ZoneConfig::new("upper_back", &[3], 0.05, Color::Cyan),
        ])
    }

    #[test]
    fn test_loaded_zones_not_empty() {
        let zones = classifier();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones.first_empty(&filled(&[0.5, 0.5, 0.4, 0.3])), None);
    }

    #[test]
    fn test_first_empty_zone_wins() {
        let zones = classifier();
        let chans = filled(&[0.5, 0.5, 0.0, 0.0]);
        assert!(zones.zone_empty(0, &chans));
        assert!(zones.zone_empty(1, &chans));
        assert_eq!(zones.first_empty(&chans), Some(0));

        let chans = filled(&[0.5, 0.5, 0.3, 0.02]);
        assert_eq!(zones.first_empty(&chans), Some(1));
    }

    #[test]
    fn test_returning_weight_clears_zone() {
        let zones = classifier();
        let mut chans = filled(&[0.5, 0.5, 0.0, 0.3]);
        assert!(zones.zone_empty(0, &chans));
        chans[2].update(0.2);
        chans[2].update(0.2);
        assert!(!zones.zone_empty(0, &chans));
    }

    #[test]
    fn test_unready_channel_never_empty() {
        let zones = classifier();
        let mut chans = filled(&[0.5, 0.5, 0.3, 0.3]);
        chans[2] = SensorChannel::new(2, Some(0), 4);
        chans[2].update(0.0);
        assert!(!zones.zone_empty(0, &chans));
        assert!(!zones.zone_empty(7, &chans));
    }
}
