//! Build script for sitwell-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates seat.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Limits shared with `sitwell-core::config`
const MAX_CHANNELS: i64 = 8;
const MAX_ZONES: usize = 4;
const MAX_WINDOW: i64 = 64;
const MAX_DEBOUNCE: i64 = 16;
const MAX_LABEL_LEN: usize = 16;
const CONFIG_VERSION: i64 = 1;

const COLORS: [&str; 9] = [
    "off", "red", "green", "blue", "yellow", "cyan", "magenta", "white", "orange",
];

const ADC_PINS: [i64; 4] = [26, 27, 28, 29];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate seat.toml configuration at compile time
fn validate_config() {
    // Re-run if seat.toml changes
    println!("cargo:rerun-if-changed=seat.toml");

    let config_path = Path::new("seat.toml");

    // Check if config file exists
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: seat.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a seat.toml configuration file.           ║\n\
            ║  Please create one in the sitwell-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    // Read the config file
    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read seat.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in seat.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    // Validate required sections exist
    validate_required_sections(&config);

    // Validate section contents
    let channel_count = validate_seat(&config);
    validate_engine(&config);
    validate_palette(&config);
    validate_zones(&config, channel_count);
    validate_board(&config, channel_count);

    println!("cargo:warning=seat.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Abort the build with a boxed list of problems
fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Section as a table, if present
fn table<'a>(config: &'a toml::Value, name: &str) -> Option<&'a toml::map::Map<String, toml::Value>> {
    config.get(name).and_then(|v| v.as_table())
}

/// Check a float (or integer) key lies in `min..=max`
fn check_range(
    errors: &mut Vec<String>,
    section: &str,
    table: &toml::map::Map<String, toml::Value>,
    key: &str,
    min: f64,
    max: f64,
) {
    let value = match table.get(key) {
        Some(toml::Value::Float(f)) => *f,
        Some(toml::Value::Integer(i)) => *i as f64,
        Some(_) => {
            errors.push(format!("[{}] {} must be a number", section, key));
            return;
        }
        None => return,
    };
    if !(min..=max).contains(&value) {
        errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
    }
}

/// Check an integer key lies in `min..=max`
fn check_int(
    errors: &mut Vec<String>,
    section: &str,
    table: &toml::map::Map<String, toml::Value>,
    key: &str,
    min: i64,
    max: i64,
) {
    match table.get(key) {
        Some(toml::Value::Integer(i)) if (min..=max).contains(i) => {}
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
        }
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
        None => {}
    }
}

/// Check every key in `table` is one of `known`
fn check_keys(
    errors: &mut Vec<String>,
    section: &str,
    table: &toml::map::Map<String, toml::Value>,
    known: &[&str],
) {
    for key in table.keys() {
        if !known.contains(&key.as_str()) {
            errors.push(format!("[{}] unknown key '{}'", section, key));
        }
    }
}

/// Channel indices from an integer array
fn channel_list(value: Option<&toml::Value>) -> Option<Vec<i64>> {
    value?
        .as_array()?
        .iter()
        .map(|v| v.as_integer())
        .collect()
}

/// Validate that required sections exist
fn validate_required_sections(config: &toml::Value) {
    let mut errors = Vec::new();

    for section in ["seat", "engine"] {
        if table(config, section).is_none() {
            errors.push(format!("Missing [{}] section", section));
        }
    }

    if let Some(root) = config.as_table() {
        for key in root.keys() {
            if !["seat", "engine", "palette", "zone", "board"].contains(&key.as_str()) {
                errors.push(format!("Unknown section [{}]", key));
            }
        }
    }

    if !errors.is_empty() {
        fail("Missing or unknown sections in seat.toml", &errors);
    }
}

/// Validate the [seat] section, returning the channel count
fn validate_seat(config: &toml::Value) -> i64 {
    let Some(seat) = table(config, "seat") else {
        return 0;
    };

    let mut errors = Vec::new();
    check_keys(&mut errors, "seat", seat, &["version", "channel_count", "seat_channels"]);

    if let Some(version) = seat.get("version").and_then(|v| v.as_integer()) {
        if version != CONFIG_VERSION {
            errors.push(format!("[seat] version must be {}", CONFIG_VERSION));
        }
    }

    let channel_count = match seat.get("channel_count") {
        Some(toml::Value::Integer(n)) if (1..=MAX_CHANNELS).contains(n) => *n,
        Some(_) => {
            errors.push(format!("[seat] channel_count must be 1-{}", MAX_CHANNELS));
            0
        }
        None => {
            errors.push("[seat] missing 'channel_count'".to_string());
            0
        }
    };

    match channel_list(seat.get("seat_channels")) {
        Some(channels) if channels.is_empty() => {
            errors.push("[seat] seat_channels cannot be empty".to_string());
        }
        Some(channels) => {
            for ch in channels {
                if ch < 0 || ch >= channel_count {
                    errors.push(format!("[seat] seat channel {} out of range", ch));
                }
            }
        }
        None => errors.push("[seat] seat_channels must be an integer array".to_string()),
    }

    if !errors.is_empty() {
        fail("Invalid seat configuration", &errors);
    }
    channel_count
}

/// Validate the [engine] section
fn validate_engine(config: &toml::Value) {
    let Some(engine) = table(config, "engine") else {
        return;
    };

    let mut errors = Vec::new();
    check_keys(
        &mut errors,
        "engine",
        engine,
        &[
            "window_size",
            "consistency_threshold",
            "debounce_length",
            "mad_multiplier",
            "stability_ms",
            "tick_interval_ms",
            "at_chair_threshold",
            "drift_threshold",
            "sustain_ms",
            "pulse_ms",
        ],
    );

    check_int(&mut errors, "engine", engine, "window_size", 1, MAX_WINDOW);
    check_int(&mut errors, "engine", engine, "debounce_length", 1, MAX_DEBOUNCE);
    for key in ["consistency_threshold", "at_chair_threshold", "drift_threshold"] {
        check_range(&mut errors, "engine", engine, key, 0.0, 1.0);
    }
    check_range(&mut errors, "engine", engine, "mad_multiplier", f64::MIN_POSITIVE, 100.0);
    for key in ["tick_interval_ms", "sustain_ms", "pulse_ms"] {
        check_int(&mut errors, "engine", engine, key, 1, u32::MAX as i64);
    }
    check_int(&mut errors, "engine", engine, "stability_ms", 0, u32::MAX as i64);

    if !errors.is_empty() {
        fail("Invalid engine configuration", &errors);
    }
}

/// Validate the [palette] section
fn validate_palette(config: &toml::Value) {
    let Some(palette) = table(config, "palette") else {
        return;
    };

    let mut errors = Vec::new();
    let color_keys = ["absent", "destabilized", "debouncing", "stable", "timeout"];
    for (key, value) in palette {
        if key == "buzz_on_timeout" {
            if !value.is_bool() {
                errors.push("[palette] buzz_on_timeout must be true or false".to_string());
            }
        } else if color_keys.contains(&key.as_str()) {
            check_color(&mut errors, "palette", key, value);
        } else {
            errors.push(format!("[palette] unknown key '{}'", key));
        }
    }

    if !errors.is_empty() {
        fail("Invalid palette configuration", &errors);
    }
}

fn check_color(errors: &mut Vec<String>, section: &str, key: &str, value: &toml::Value) {
    match value.as_str() {
        Some(name) if COLORS.contains(&name) => {}
        _ => errors.push(format!("[{}] {} must be one of {}", section, key, COLORS.join("/"))),
    }
}

/// Validate zone configurations
fn validate_zones(config: &toml::Value, channel_count: i64) {
    let zones = match config.get("zone") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => fail("Invalid zone configuration", &["[zone] must hold [zone.<name>] tables".to_string()]),
        None => return,
    };

    let mut errors = Vec::new();

    if zones.len() > MAX_ZONES {
        errors.push(format!("at most {} zones are supported", MAX_ZONES));
    }

    for (name, zone) in zones {
        let section = format!("zone.{}", name);
        if name.len() > MAX_LABEL_LEN {
            errors.push(format!("[{}] name longer than {} characters", section, MAX_LABEL_LEN));
        }

        let zone = match zone {
            toml::Value::Table(t) => t,
            _ => {
                errors.push(format!("[{}] must be a table", section));
                continue;
            }
        };

        check_keys(&mut errors, &section, zone, &["channels", "threshold", "color"]);

        match channel_list(zone.get("channels")) {
            Some(channels) if channels.is_empty() => {
                errors.push(format!("[{}] channels cannot be empty", section));
            }
            Some(channels) => {
                for ch in channels {
                    if ch < 0 || ch >= channel_count {
                        errors.push(format!("[{}] channel {} out of range", section, ch));
                    }
                }
            }
            None => errors.push(format!("[{}] channels must be an integer array", section)),
        }

        check_range(&mut errors, &section, zone, "threshold", 0.0, 1.0);
        if let Some(color) = zone.get("color") {
            check_color(&mut errors, &section, "color", color);
        }
    }

    if !errors.is_empty() {
        fail("Invalid zone configuration", &errors);
    }
}

/// Validate the [board] section
fn validate_board(config: &toml::Value, channel_count: i64) {
    let Some(board) = table(config, "board") else {
        return;
    };

    let mut errors = Vec::new();
    check_keys(
        &mut errors,
        "board",
        board,
        &[
            "sensor_pins",
            "vref_mv",
            "sensors_inverted",
            "led_red",
            "led_green",
            "led_blue",
            "buzzer",
            "stop_button",
            "telemetry_baud",
            "snapshot_interval_ms",
        ],
    );

    if board.contains_key("sensor_pins") {
        match channel_list(board.get("sensor_pins")) {
            Some(pins) => {
                for pin in &pins {
                    if !ADC_PINS.contains(pin) {
                        errors.push(format!("[board] sensor pin {} is not an ADC pin (26-29)", pin));
                    }
                }
                if (pins.len() as i64) < channel_count {
                    errors.push(format!(
                        "[board] {} sensor pins for {} channels",
                        pins.len(),
                        channel_count
                    ));
                }
            }
            None => errors.push("[board] sensor_pins must be an integer array".to_string()),
        }
    } else if channel_count > ADC_PINS.len() as i64 {
        errors.push("[board] more channels than ADC pins".to_string());
    }

    check_int(&mut errors, "board", board, "vref_mv", 1, u16::MAX as i64);
    check_int(&mut errors, "board", board, "telemetry_baud", 1200, 1_000_000);
    check_int(&mut errors, "board", board, "snapshot_interval_ms", 0, u32::MAX as i64);

    let mut used = Vec::new();
    for key in ["led_red", "led_green", "led_blue", "buzzer", "stop_button"] {
        let Some(value) = board.get(key) else {
            continue;
        };
        let Some(text) = value.as_str() else {
            errors.push(format!("[board] {} must be a pin string", key));
            continue;
        };
        if text == "none" && (key == "buzzer" || key == "stop_button") {
            continue;
        }
        match parse_pin(text) {
            Some(pin) if pin <= 1 || (26..=29).contains(&pin) => {
                errors.push(format!("[board] {} uses reserved gpio{}", key, pin));
            }
            Some(pin) if used.contains(&pin) => {
                errors.push(format!("[board] {} reuses gpio{}", key, pin));
            }
            Some(pin) => used.push(pin),
            None => errors.push(format!("[board] {} is not a pin like \"!^gpio17\"", key)),
        }
    }

    if !errors.is_empty() {
        fail("Invalid board configuration", &errors);
    }
}

/// Pin number from "gpioN" with optional `!`/`^` modifiers
fn parse_pin(text: &str) -> Option<u8> {
    let pin: u8 = text
        .trim_start_matches(['!', '^'])
        .strip_prefix("gpio")?
        .parse()
        .ok()?;
    (pin < 30).then_some(pin)
}
