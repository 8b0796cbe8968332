//! Configuration type definitions
//!
//! These types describe the seat geometry (how many sensors, which ones
//! detect sitting, which ones form zones) and the tuning of the stability
//! engine. Defaults match the values the cushion prototype was tuned with.

use heapless::{String, Vec};

use crate::feedback::{Color, Palette};

use super::hardware::BoardConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 16;

/// Maximum sensor channels per seat
pub const MAX_CHANNELS: usize = 8;

/// Maximum zones per seat
pub const MAX_ZONES: usize = 4;

/// Maximum rolling window length (samples)
pub const MAX_WINDOW: usize = 64;

/// Maximum debounce buffer length (ticks)
pub const MAX_DEBOUNCE: usize = 16;

/// Current configuration version
pub const CONFIG_VERSION: u8 = 1;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Window size is zero or above `MAX_WINDOW`
    InvalidWindowSize,
    /// Debounce length is zero or above `MAX_DEBOUNCE`
    InvalidDebounceLength,
    /// A threshold lies outside 0.0–1.0 (or is not finite)
    ThresholdOutOfRange,
    /// MAD multiplier is not a positive finite number
    InvalidMultiplier,
    /// Channel count is zero or above `MAX_CHANNELS`
    InvalidChannelCount,
    /// No seat-contact channel configured
    NoSeatChannels,
    /// A channel index is not below `channel_count`
    ChannelOutOfRange,
    /// A zone lists no channels
    EmptyZone,
    /// Tick, pulse or sustain timing is zero
    InvalidTiming,
    /// Configuration was written for another version
    VersionMismatch,
}

/// Tuning of the stability engine
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Rolling window length W (samples per channel)
    pub window_size: u8,
    /// Minimum fraction of window samples near the median
    pub consistency_threshold: f32,
    /// Consecutive consistent ticks required before stable
    pub debounce_length: u8,
    /// Multiplier applied to the MAD when scoring consistency
    pub mad_multiplier: f32,
    /// Steady time before the state becomes `Timeout` (ms)
    pub stability_ms: u32,
    /// Delay between ticks (ms)
    pub tick_interval_ms: u32,
    /// Latest-sample level above which a seat channel counts as occupied
    pub at_chair_threshold: f32,
    /// Largest allowed distance between a channel median and its baseline
    pub drift_threshold: f32,
    /// Time a feedback color is held solid before it starts pulsing (ms)
    pub sustain_ms: u32,
    /// Length of each on/off phase while pulsing (ms)
    pub pulse_ms: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_size: 20,
            consistency_threshold: 0.65,
            debounce_length: 3,
            mad_multiplier: 3.0,
            stability_ms: 5_000,
            tick_interval_ms: 100,
            at_chair_threshold: 0.10,
            drift_threshold: 0.15,
            sustain_ms: 10_000,
            pulse_ms: 500,
        }
    }
}

/// A named group of channels checked together for an empty (no-load) reading
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZoneConfig {
    /// Zone name (e.g. "lower_back")
    pub name: String<MAX_LABEL_LEN>,
    /// Channel indices belonging to the zone
    pub channels: Vec<u8, MAX_CHANNELS>,
    /// Median and MAD at or below this level read as empty
    pub threshold: f32,
    /// Feedback color shown while this zone is flagged
    pub color: Color,
}

impl ZoneConfig {
    /// Build a zone from a name and channel list
    ///
    /// Names longer than `MAX_LABEL_LEN` are truncated; extra channels are dropped.
    pub fn new(name: &str, channels: &[u8], threshold: f32, color: Color) -> Self {
        let mut label = String::new();
        for c in name.chars() {
            if label.push(c).is_err() {
                break;
            }
        }
        let mut list = Vec::new();
        for &ch in channels.iter().take(MAX_CHANNELS) {
            let _ = list.push(ch);
        }
        Self {
            name: label,
            channels: list,
            threshold,
            color,
        }
    }
}

/// Complete seat configuration
///
/// This is the top-level configuration structure that contains the
/// sensor layout, engine tuning, zones, palette and board wiring.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeatConfig {
    /// Configuration version for compatibility checks
    pub version: u8,
    /// Number of sensor channels sampled each tick
    pub channel_count: u8,
    /// Channels whose latest sample decides presence
    pub seat_channels: Vec<u8, MAX_CHANNELS>,
    /// Engine tuning
    pub engine: EngineConfig,
    /// Zones, evaluated in declared order
    pub zones: Vec<ZoneConfig, MAX_ZONES>,
    /// Feedback colors per state
    pub palette: Palette,
    /// Board wiring
    pub board: BoardConfig,
}

impl Default for SeatConfig {
    /// Four-sensor cushion: two seat pads, lower back, upper back
    fn default() -> Self {
        let mut seat_channels = Vec::new();
        let _ = seat_channels.push(0);
        let _ = seat_channels.push(1);

        let mut zones = Vec::new();
        let _ = zones.push(ZoneConfig::new("lower_back", &[2], 0.05, Color::Magenta));
        let _ = zones.push(ZoneConfig::new("upper_back", &[3], 0.05, Color::Cyan));

        Self {
            version: CONFIG_VERSION,
            channel_count: 4,
            seat_channels,
            engine: EngineConfig::default(),
            zones,
            palette: Palette::default(),
            board: BoardConfig::default(),
        }
    }
}

impl SeatConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a zone by name
    pub fn find_zone(&self, name: &str) -> Option<&ZoneConfig> {
        self.zones.iter().find(|z| z.name.as_str() == name)
    }

    /// Check every field for a usable value
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch);
        }

        let count = self.channel_count as usize;
        if count == 0 || count > MAX_CHANNELS {
            return Err(ConfigError::InvalidChannelCount);
        }

        let e = &self.engine;
        let window = e.window_size as usize;
        if window == 0 || window > MAX_WINDOW {
            return Err(ConfigError::InvalidWindowSize);
        }

        let debounce = e.debounce_length as usize;
        if debounce == 0 || debounce > MAX_DEBOUNCE {
            return Err(ConfigError::InvalidDebounceLength);
        }

        for t in [
            e.consistency_threshold,
            e.at_chair_threshold,
            e.drift_threshold,
        ] {
            check_unit_range(t)?;
        }

        if !e.mad_multiplier.is_finite() || e.mad_multiplier <= 0.0 {
            return Err(ConfigError::InvalidMultiplier);
        }

        if e.tick_interval_ms == 0 || e.pulse_ms == 0 || e.sustain_ms == 0 {
            return Err(ConfigError::InvalidTiming);
        }

        if self.seat_channels.is_empty() {
            return Err(ConfigError::NoSeatChannels);
        }
        if self.seat_channels.iter().any(|&ch| ch as usize >= count) {
            return Err(ConfigError::ChannelOutOfRange);
        }

        for zone in &self.zones {
            if zone.channels.is_empty() {
                return Err(ConfigError::EmptyZone);
            }
            if zone.channels.iter().any(|&ch| ch as usize >= count) {
                return Err(ConfigError::ChannelOutOfRange);
            }
            check_unit_range(zone.threshold)?;
        }

        Ok(())
    }
}

fn check_unit_range(value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOutOfRange)
    }
}
