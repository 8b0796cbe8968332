//! Feedback colors and the per-state palette

use crate::config::ZoneConfig;
use crate::state::PostureState;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 8-bit RGB triple sent to the actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// All dies off
    pub const OFF: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Check if every component is zero
    pub fn is_off(&self) -> bool {
        *self == Rgb::OFF
    }
}

/// Closed set of feedback colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    #[default]
    Off,
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    White,
    Orange,
}

impl Color {
    /// RGB value for this color
    pub const fn rgb(self) -> Rgb {
        match self {
            Color::Off => Rgb::new(0, 0, 0),
            Color::Red => Rgb::new(255, 0, 0),
            Color::Green => Rgb::new(0, 255, 0),
            Color::Blue => Rgb::new(0, 0, 255),
            Color::Yellow => Rgb::new(255, 255, 0),
            Color::Cyan => Rgb::new(0, 255, 255),
            Color::Magenta => Rgb::new(255, 0, 255),
            Color::White => Rgb::new(255, 255, 255),
            Color::Orange => Rgb::new(255, 128, 0),
        }
    }

    /// Parse a color name as written in config files
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "off" => Some(Color::Off),
            "red" => Some(Color::Red),
            "green" => Some(Color::Green),
            "blue" => Some(Color::Blue),
            "yellow" => Some(Color::Yellow),
            "cyan" => Some(Color::Cyan),
            "magenta" => Some(Color::Magenta),
            "white" => Some(Color::White),
            "orange" => Some(Color::Orange),
            _ => None,
        }
    }
}

/// What the actuators should show: a color and the buzzer level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cue {
    pub color: Color,
    pub buzzer: bool,
}

impl Cue {
    /// Light off, buzzer silent
    pub const OFF: Cue = Cue {
        color: Color::Off,
        buzzer: false,
    };

    pub const fn new(color: Color, buzzer: bool) -> Self {
        Self { color, buzzer }
    }

    /// Solid color without buzzer
    pub const fn solid(color: Color) -> Self {
        Self::new(color, false)
    }
}

/// Feedback color per posture state
///
/// Zone flags use the color configured on the zone itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Palette {
    pub absent: Color,
    pub destabilized: Color,
    pub debouncing: Color,
    pub stable: Color,
    pub timeout: Color,
    /// Sound the buzzer together with the light in `Timeout`
    pub buzz_on_timeout: bool,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            absent: Color::Off,
            destabilized: Color::Yellow,
            debouncing: Color::Blue,
            stable: Color::Green,
            timeout: Color::Red,
            buzz_on_timeout: true,
        }
    }
}

impl Palette {
    /// Cue for `state`
    ///
    /// A zone index with no matching zone falls back to the destabilized color.
    pub fn cue_for(&self, state: PostureState, zones: &[ZoneConfig]) -> Cue {
        match state {
            PostureState::Absent => Cue::solid(self.absent),
            PostureState::ZoneFlag(zone) => Cue::solid(
                zones
                    .get(zone as usize)
                    .map_or(self.destabilized, |z| z.color),
            ),
            PostureState::Destabilized => Cue::solid(self.destabilized),
            PostureState::Debouncing => Cue::solid(self.debouncing),
            PostureState::Stable => Cue::solid(self.stable),
            PostureState::Timeout => Cue::new(self.timeout, self.buzz_on_timeout),
        }
    }
}
