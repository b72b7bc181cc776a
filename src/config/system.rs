//! Gantry configuration - root configuration structure.

use serde::Deserialize;

use super::axis::AxisConfig;
use super::units::{Millimeters, StepsPerSec, StepsPerSecSquared};
use crate::motor::Axis;

/// Root configuration structure from TOML.
///
/// Every section is optional; omitted sections take the stock machine values.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct GantryConfig {
    /// Per-axis mechanics.
    #[serde(default)]
    pub axes: AxesConfig,

    /// Coordinated move speeds.
    #[serde(default)]
    pub motion: MotionConfig,

    /// Limit-switch homing parameters.
    #[serde(default)]
    pub homing: HomingConfig,

    /// Electromagnet heights.
    #[serde(default)]
    pub magnet: MagnetConfig,

    /// Board placement.
    #[serde(default)]
    pub board: BoardConfig,
}

impl GantryConfig {
    /// Get an axis configuration.
    pub fn axis(&self, axis: Axis) -> &AxisConfig {
        match axis {
            Axis::Z => &self.axes.z,
            Axis::X => &self.axes.x,
            Axis::Y => &self.axes.y,
        }
    }
}

/// The three axis sections.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AxesConfig {
    /// Magnet lift axis.
    #[serde(default = "AxisConfig::z_default")]
    pub z: AxisConfig,
    /// Gantry X axis.
    #[serde(default = "AxisConfig::x_default")]
    pub x: AxisConfig,
    /// Gantry Y axis.
    #[serde(default = "AxisConfig::y_default")]
    pub y: AxisConfig,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            z: AxisConfig::z_default(),
            x: AxisConfig::x_default(),
            y: AxisConfig::y_default(),
        }
    }
}

/// Speeds for coordinated XY moves.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Nominal speed that MOVE/WARP multiply.
    #[serde(rename = "base_speed_steps_per_sec")]
    pub base_speed: StepsPerSec,
    /// Multiplier applied for MOVE.
    pub move_factor: f32,
    /// Multiplier applied for WARP.
    pub warp_factor: f32,
    /// Speed used by HOME.
    #[serde(rename = "home_speed_steps_per_sec")]
    pub home_speed: StepsPerSec,
    /// Acceleration used by HOME.
    #[serde(rename = "home_acceleration_steps_per_sec2")]
    pub home_acceleration: StepsPerSecSquared,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            base_speed: StepsPerSec(100.0),
            move_factor: 3.0,
            warp_factor: 5.0,
            home_speed: StepsPerSec(200.0),
            home_acceleration: StepsPerSecSquared(600.0),
        }
    }
}

/// Limit-switch homing parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HomingConfig {
    /// Speed while searching for the switch.
    #[serde(rename = "search_speed_steps_per_sec")]
    pub search_speed: StepsPerSec,
    /// Acceleration while searching for the switch.
    #[serde(rename = "search_acceleration_steps_per_sec2")]
    pub search_acceleration: StepsPerSecSquared,
    /// Search target distance toward negative travel.
    pub search_steps: i64,
    /// Switch-contact travel backed out after the trigger.
    pub rebound_steps: i64,
    /// Speed for the rebound move.
    #[serde(rename = "rebound_speed_steps_per_sec")]
    pub rebound_speed: StepsPerSec,
    /// Acceleration for the rebound move.
    #[serde(rename = "rebound_acceleration_steps_per_sec2")]
    pub rebound_acceleration: StepsPerSecSquared,
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            search_speed: StepsPerSec(8000.0),
            search_acceleration: StepsPerSecSquared(16_000.0),
            search_steps: 1_000_000,
            rebound_steps: 200,
            rebound_speed: StepsPerSec(500.0),
            rebound_acceleration: StepsPerSecSquared(1000.0),
        }
    }
}

/// Z heights for the electromagnet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MagnetConfig {
    /// Height for `UP`.
    pub up_mm: Millimeters,
    /// Height for `DOWN`.
    pub down_mm: Millimeters,
}

impl Default for MagnetConfig {
    fn default() -> Self {
        Self {
            up_mm: Millimeters(17.5),
            down_mm: Millimeters(0.0),
        }
    }
}

/// Board placement relative to machine zero.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct BoardConfig {
    /// Offset added to MOVE/WARP X coordinates.
    pub origin_x_mm: Millimeters,
    /// Offset added to MOVE/WARP Y coordinates.
    pub origin_y_mm: Millimeters,
}
