//! Simple TOML parser for seat configuration
//!
//! This is a minimal, allocation-free parser that handles only the subset
//! needed for `seat.toml`. It does NOT support the full TOML grammar.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float, boolean)
//! - Flat integer arrays: `channels = [0, 1]`
//! - `[section]` headers and `[zone.<name>]` headers
//! - Comments (# ...), including trailing comments
//!
//! NOT supported:
//! - Multi-line strings or arrays
//! - Inline tables
//! - Dotted keys outside section headers
//!
//! Keys not present in the file keep their default value. Zone sections
//! replace the default zone list as a whole.

use heapless::{String as HString, Vec};

use crate::feedback::Color;

use super::hardware::PinConfig;
use super::types::{SeatConfig, ZoneConfig, MAX_CHANNELS, MAX_LABEL_LEN};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header, or a key outside any section
    InvalidSection,
    /// Key not recognised in its section
    UnknownKey,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Invalid value type
    InvalidValue,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
    /// Invalid pin string
    InvalidPin,
}

/// Current parsing context
#[derive(Debug, Clone)]
enum Section {
    Root,
    Seat,
    Engine,
    Palette,
    Board,
    Zone,
}

/// Parse TOML text into a `SeatConfig`
///
/// The result is not validated; call [`SeatConfig::validate`] before use.
pub fn parse_config(input: &str) -> Result<SeatConfig, ParseError> {
    let mut config = SeatConfig::new();
    let mut section = Section::Root;
    let mut current_zone: Option<ZoneConfig> = None;
    let mut zones_seen = false;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        // Check for section header
        if line.starts_with('[') && line.ends_with(']') {
            save_zone(&mut config, &mut current_zone)?;

            let (next, zone_name) = parse_section_header(&line[1..line.len() - 1])?;
            if let Some(name) = zone_name {
                if !zones_seen {
                    config.zones.clear();
                    zones_seen = true;
                }
                let mut zone = ZoneConfig::new("", &[], 0.05, Color::Magenta);
                zone.name = name;
                current_zone = Some(zone);
            }
            section = next;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply_value(&section, key, value, &mut config, &mut current_zone)?;
    }

    save_zone(&mut config, &mut current_zone)?;
    Ok(config)
}

/// Parse section header (without brackets)
///
/// Returns the section and, for zone sections, the zone name.
fn parse_section_header(header: &str) -> Result<(Section, Option<HString<MAX_LABEL_LEN>>), ParseError> {
    let header = header.trim();

    if let Some(name) = header.strip_prefix("zone.") {
        if name.is_empty() || name.contains('.') {
            return Err(ParseError::InvalidSection);
        }
        let name = HString::try_from(name).map_err(|_| ParseError::InvalidSection)?;
        return Ok((Section::Zone, Some(name)));
    }

    let section = match header {
        "seat" => Section::Seat,
        "engine" => Section::Engine,
        "palette" => Section::Palette,
        "board" => Section::Board,
        _ => return Err(ParseError::InvalidSection),
    };
    Ok((section, None))
}

/// Apply a key/value pair to the config
fn apply_value(
    section: &Section,
    key: &str,
    value: &str,
    config: &mut SeatConfig,
    current_zone: &mut Option<ZoneConfig>,
) -> Result<(), ParseError> {
    match section {
        Section::Root => return Err(ParseError::InvalidSection),
        Section::Seat => match key {
            "version" => config.version = parse_int(value)?,
            "channel_count" => config.channel_count = parse_int(value)?,
            "seat_channels" => config.seat_channels = parse_int_array(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Engine => {
            let e = &mut config.engine;
            match key {
                "window_size" => e.window_size = parse_int(value)?,
                "consistency_threshold" => e.consistency_threshold = parse_float(value)?,
                "debounce_length" => e.debounce_length = parse_int(value)?,
                "mad_multiplier" => e.mad_multiplier = parse_float(value)?,
                "stability_ms" => e.stability_ms = parse_int(value)?,
                "tick_interval_ms" => e.tick_interval_ms = parse_int(value)?,
                "at_chair_threshold" => e.at_chair_threshold = parse_float(value)?,
                "drift_threshold" => e.drift_threshold = parse_float(value)?,
                "sustain_ms" => e.sustain_ms = parse_int(value)?,
                "pulse_ms" => e.pulse_ms = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Palette => {
            let p = &mut config.palette;
            match key {
                "absent" => p.absent = parse_color(value)?,
                "destabilized" => p.destabilized = parse_color(value)?,
                "debouncing" => p.debouncing = parse_color(value)?,
                "stable" => p.stable = parse_color(value)?,
                "timeout" => p.timeout = parse_color(value)?,
                "buzz_on_timeout" => p.buzz_on_timeout = parse_bool(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Board => {
            let b = &mut config.board;
            match key {
                "sensor_pins" => b.sensor_pins = parse_int_array(value)?,
                "vref_mv" => b.vref_mv = parse_int(value)?,
                "sensors_inverted" => b.sensors_inverted = parse_bool(value)?,
                "led_red" => b.led.red = parse_pin(value)?,
                "led_green" => b.led.green = parse_pin(value)?,
                "led_blue" => b.led.blue = parse_pin(value)?,
                "buzzer" => b.buzzer = parse_optional_pin(value)?,
                "stop_button" => b.stop_button = parse_optional_pin(value)?,
                "telemetry_baud" => b.telemetry_baud = parse_int(value)?,
                "snapshot_interval_ms" => b.snapshot_interval_ms = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Zone => {
            let z = current_zone.as_mut().ok_or(ParseError::InvalidSection)?;
            match key {
                "channels" => z.channels = parse_int_array(value)?,
                "threshold" => z.threshold = parse_float(value)?,
                "color" => z.color = parse_color(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
    }

    Ok(())
}

/// Push the zone being built, if any
fn save_zone(config: &mut SeatConfig, current_zone: &mut Option<ZoneConfig>) -> Result<(), ParseError> {
    if let Some(zone) = current_zone.take() {
        config
            .zones
            .push(zone)
            .map_err(|_| ParseError::TooManyItems)?;
    }
    Ok(())
}

/// Drop a trailing `# comment` that is not inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        Ok(&value[1..value.len() - 1])
    } else {
        // Allow unquoted strings for simple values
        Ok(value)
    }
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a finite float value
fn parse_float(value: &str) -> Result<f32, ParseError> {
    let v: f32 = value.parse().map_err(|_| ParseError::InvalidValue)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ParseError::InvalidValue)
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a flat array of small integers: `[0, 1, 2]`
fn parse_int_array(value: &str) -> Result<Vec<u8, MAX_CHANNELS>, ParseError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ParseError::InvalidValue)?;

    let mut items = Vec::new();
    for item in inner.split(',') {
        let item = item.trim();
        // Trailing comma
        if item.is_empty() {
            continue;
        }
        items
            .push(parse_int(item)?)
            .map_err(|_| ParseError::TooManyItems)?;
    }
    Ok(items)
}

/// Parse a color name
fn parse_color(value: &str) -> Result<Color, ParseError> {
    Color::from_name(parse_string(value)?).ok_or(ParseError::InvalidValue)
}

/// Parse a pin string like "gpio13", "!gpio12", "^gpio4", "!^gpio17"
fn parse_pin(value: &str) -> Result<PinConfig, ParseError> {
    let mut s = parse_string(value)?;
    let mut inverted = false;
    let mut pull_up = false;

    // Check for modifiers
    loop {
        if let Some(rest) = s.strip_prefix('!') {
            inverted = true;
            s = rest;
        } else if let Some(rest) = s.strip_prefix('^') {
            pull_up = true;
            s = rest;
        } else {
            break;
        }
    }

    // Parse "gpioNN"
    let pin: u8 = s
        .strip_prefix("gpio")
        .ok_or(ParseError::InvalidPin)?
        .parse()
        .map_err(|_| ParseError::InvalidPin)?;

    Ok(PinConfig {
        pin,
        inverted,
        pull_up,
    })
}

/// Parse a pin string, or `"none"` for an unfitted part
fn parse_optional_pin(value: &str) -> Result<Option<PinConfig>, ParseError> {
    if parse_string(value)? == "none" {
        Ok(None)
    } else {
        parse_pin(value).map(Some)
    }
}
