//! Unit tests for configuration validation.

use gantry_motion::config::{validate_config, GantryConfig};
use gantry_motion::error::{ConfigError, Error};
use gantry_motion::{StepsPerSec, StepsPerSecSquared};

/// Test validation of the stock configuration.
#[test]
fn test_default_config_passes_validation() {
    assert!(validate_config(&GantryConfig::default()).is_ok());
}

/// Test validation fails for a non-positive axis speed.
#[test]
fn test_zero_axis_speed() {
    let mut config = GantryConfig::default();
    config.axes.x.max_speed = StepsPerSec(0.0);

    let result = validate_config(&config);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidMaxSpeed { context: "x", .. }))
    ));
}

/// Test validation fails for a non-positive MOVE multiplier.
#[test]
fn test_invalid_move_factor() {
    let mut config = GantryConfig::default();
    config.motion.move_factor = -3.0;

    let result = validate_config(&config);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidSpeedFactor(_)))
    ));
}

/// Test validation fails for a zero base speed.
#[test]
fn test_invalid_base_speed() {
    let mut config = GantryConfig::default();
    config.motion.base_speed = StepsPerSec(0.0);

    assert!(validate_config(&config).is_err());
}

/// Test validation of the homing rates.
#[test]
fn test_invalid_homing_rates() {
    let mut config = GantryConfig::default();
    config.homing.search_acceleration = StepsPerSecSquared(0.0);

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidAcceleration {
            context: "homing.search",
            ..
        }))
    ));

    let mut config = GantryConfig::default();
    config.homing.rebound_speed = StepsPerSec(-1.0);

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidMaxSpeed {
            context: "homing.rebound",
            ..
        }))
    ));
}

/// Test validation of the homing distances.
#[test]
fn test_invalid_homing_distances() {
    let mut config = GantryConfig::default();
    config.homing.search_steps = 0;
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidSearchDistance(0)))
    ));

    let mut config = GantryConfig::default();
    config.homing.rebound_steps = 0;
    assert!(validate_config(&config).is_ok());
}

/// Test the error message.
#[test]
fn test_error_display() {
    let mut config = GantryConfig::default();
    config.axes.z.steps_per_mm = -60.0;

    let err = validate_config(&config).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Configuration error: Invalid steps_per_mm for axis z: -60. Must be > 0"
    );
}
