//! Configuration validation.

use crate::error::{ConfigError, Error, Result};
use crate::motor::Axis;

use super::{AxisConfig, GantryConfig};

/// Validate a gantry configuration.
///
/// Checks:
/// - Every axis has a positive steps/mm ratio, speed and acceleration
/// - Coordinated move and home speeds are positive
/// - Homing search distance is positive and rebound distance non-negative
pub fn validate_config(config: &GantryConfig) -> Result<()> {
    for axis in Axis::ALL {
        validate_axis(axis, config.axis(axis))?;
    }

    let motion = &config.motion;
    if motion.base_speed.0 <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidMaxSpeed {
            context: "motion.base_speed",
            value: motion.base_speed.0,
        }));
    }
    for factor in [motion.move_factor, motion.warp_factor] {
        if factor <= 0.0 {
            return Err(Error::Config(ConfigError::InvalidSpeedFactor(factor)));
        }
    }
    validate_rate("motion.home", motion.home_speed.0, motion.home_acceleration.0)?;

    let homing = &config.homing;
    validate_rate("homing.search", homing.search_speed.0, homing.search_acceleration.0)?;
    validate_rate("homing.rebound", homing.rebound_speed.0, homing.rebound_acceleration.0)?;
    if homing.search_steps <= 0 {
        return Err(Error::Config(ConfigError::InvalidSearchDistance(
            homing.search_steps,
        )));
    }
    if homing.rebound_steps < 0 {
        return Err(Error::Config(ConfigError::InvalidReboundDistance(
            homing.rebound_steps,
        )));
    }

    Ok(())
}

fn validate_axis(axis: Axis, config: &AxisConfig) -> Result<()> {
    if config.steps_per_mm <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerMm {
            axis: axis.name(),
            value: config.steps_per_mm,
        }));
    }

    validate_rate(axis.name(), config.max_speed.0, config.acceleration.0)
}

fn validate_rate(context: &'static str, speed: f32, acceleration: f32) -> Result<()> {
    if speed <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidMaxSpeed {
            context,
            value: speed,
        }));
    }

    if acceleration <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidAcceleration {
            context,
            value: acceleration,
        }));
    }

    Ok(())
}
