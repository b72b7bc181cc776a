//! Per-axis configuration from TOML.

use serde::Deserialize;

use super::units::{Millimeters, Steps, StepsPerSec, StepsPerSecSquared};

/// Complete axis configuration from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AxisConfig {
    /// Steps per millimeter of carriage travel.
    pub steps_per_mm: f32,

    /// Normal operating speed in steps per second.
    ///
    /// Also the jog speed for `ON+`/`ON-`.
    #[serde(rename = "max_speed_steps_per_sec")]
    pub max_speed: StepsPerSec,

    /// Normal operating acceleration in steps per second squared.
    #[serde(rename = "acceleration_steps_per_sec2")]
    pub acceleration: StepsPerSecSquared,

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,
}

impl AxisConfig {
    /// Z axis defaults: lead screw carrying the electromagnet.
    pub fn z_default() -> Self {
        Self {
            steps_per_mm: 60.0,
            max_speed: StepsPerSec(500.0),
            acceleration: StepsPerSecSquared(10_000.0),
            invert_direction: false,
        }
    }

    /// X axis defaults: belt-driven gantry carriage.
    pub fn x_default() -> Self {
        Self {
            steps_per_mm: 2.0,
            max_speed: StepsPerSec(200.0),
            acceleration: StepsPerSecSquared(800.0),
            invert_direction: false,
        }
    }

    /// Y axis defaults: as X, with the motor mounted mirrored.
    pub fn y_default() -> Self {
        Self {
            invert_direction: true,
            ..Self::x_default()
        }
    }

    /// Convert millimeters to steps (truncating toward zero).
    #[inline]
    pub fn mm_to_steps(&self, mm: Millimeters) -> Steps {
        Steps::from_mm(mm, self.steps_per_mm)
    }
}
