//! Unit tests for TOML configuration parsing.

use gantry_motion::config::{load_config, parse_config, GantryConfig, Millimeters};
use gantry_motion::error::{ConfigError, Error};
use gantry_motion::{Axis, StepsPerSec, StepsPerSecSquared};

const FULL_CONFIG: &str = r#"
[axes.z]
steps_per_mm = 60.0
max_speed_steps_per_sec = 500.0
acceleration_steps_per_sec2 = 10000.0

[axes.x]
steps_per_mm = 2.0
max_speed_steps_per_sec = 200.0
acceleration_steps_per_sec2 = 800.0

[axes.y]
steps_per_mm = 2.0
max_speed_steps_per_sec = 200.0
acceleration_steps_per_sec2 = 800.0
invert_direction = true

[motion]
base_speed_steps_per_sec = 100.0
move_factor = 3.0
warp_factor = 5.0
home_speed_steps_per_sec = 200.0
home_acceleration_steps_per_sec2 = 600.0

[homing]
search_speed_steps_per_sec = 8000.0
search_acceleration_steps_per_sec2 = 16000.0
search_steps = 1000000
rebound_steps = 200
rebound_speed_steps_per_sec = 500.0
rebound_acceleration_steps_per_sec2 = 1000.0

[magnet]
up_mm = 17.5
down_mm = 0.0

[board]
origin_x_mm = 0.0
origin_y_mm = 0.0
"#;

/// The stock machine written out in full matches the built-in defaults.
#[test]
fn test_full_config_matches_defaults() {
    let config = parse_config(FULL_CONFIG).expect("Failed to parse TOML");
    assert_eq!(config, GantryConfig::default());
}

/// Test parsing straight through serde, without validation.
#[test]
fn test_parse_with_toml_directly() {
    let config: GantryConfig = toml::from_str(FULL_CONFIG).expect("Failed to parse TOML");

    let y = config.axis(Axis::Y);
    assert!(y.invert_direction);
    assert_eq!(y.max_speed, StepsPerSec(200.0));
    assert_eq!(config.axis(Axis::Z).acceleration, StepsPerSecSquared(10_000.0));
}

/// Test that a partial section keeps the other fields at their defaults.
#[test]
fn test_partial_homing_section() {
    let toml_str = r#"
[homing]
rebound_steps = 120
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");
    assert_eq!(config.homing.rebound_steps, 120);
    assert_eq!(config.homing.search_steps, 1_000_000);
    assert_eq!(config.homing.search_speed, StepsPerSec(8000.0));
}

/// Test board origin offsets.
#[test]
fn test_board_origin() {
    let toml_str = r#"
[board]
origin_x_mm = -15.0
origin_y_mm = 7.5
"#;

    let config = parse_config(toml_str).expect("Failed to parse TOML");
    assert_eq!(config.board.origin_x_mm, Millimeters(-15.0));
    assert_eq!(config.board.origin_y_mm, Millimeters(7.5));
}

/// An axis section must name all of its rates.
#[test]
fn test_incomplete_axis_rejected() {
    let toml_str = r#"
[axes.x]
steps_per_mm = 2.0
"#;

    let result = parse_config(toml_str);
    assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
}

/// Test loading from a file on disk.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join(format!("gantry-motion-{}.toml", std::process::id()));
    std::fs::write(&path, "[magnet]\nup_mm = 22.0\n").expect("Failed to write config");

    let config = load_config(&path).expect("Failed to load config");
    assert_eq!(config.magnet.up_mm, Millimeters(22.0));

    let _ = std::fs::remove_file(&path);
}

/// Test that a missing file is an I/O error, not a parse error.
#[test]
fn test_load_missing_file() {
    let result = load_config("/nonexistent/gantry.toml");
    assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
}
