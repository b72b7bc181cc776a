//! Coordinated two-axis linear interpolation.
//!
//! Both axes follow their own trapezoidal ramp, but the axis with the shorter
//! travel is given proportionally lower speed and acceleration. Scaling speed,
//! acceleration and distance by the same ratio leaves the ramp duration
//! unchanged, so both axes start and finish together and the carriage moves
//! along a straight line.

use crate::motor::Actuator;

/// Speed class of a linear move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpeedMode {
    /// `MOVE(x,y)`: carrying a piece.
    Move,
    /// `WARP(x,y)`: repositioning with the magnet off.
    Warp,
}

impl SpeedMode {
    /// Protocol keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            SpeedMode::Move => "MOVE",
            SpeedMode::Warp => "WARP",
        }
    }
}

/// Target and rate limits for one axis of a linear move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisPlan {
    /// Absolute target in steps.
    pub target: i64,
    /// Travel in steps (absolute).
    pub distance: u64,
    /// Scaled speed in steps/sec.
    pub speed: f32,
    /// Scaled acceleration in steps/sec².
    pub acceleration: f32,
}

impl AxisPlan {
    fn scaled(current: i64, target: i64, longest: u64, speed: f32, acceleration: f32) -> Self {
        let distance = target.abs_diff(current);
        let ratio = distance as f32 / longest as f32;
        Self {
            target,
            distance,
            speed: speed * ratio,
            acceleration: acceleration * ratio,
        }
    }

    fn apply(&self, actuator: &mut dyn Actuator) {
        // A stationary axis keeps its limits; zero speed is not a valid setting.
        if self.distance > 0 {
            actuator.set_max_speed(self.speed);
            actuator.set_acceleration(self.acceleration);
        }
        actuator.set_absolute_target(self.target);
    }
}

/// A planned straight-line XY move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMove {
    /// X axis plan.
    pub x: AxisPlan,
    /// Y axis plan.
    pub y: AxisPlan,
}

impl LinearMove {
    /// Plan a move from `current` to `target` (both `(x, y)` in steps).
    ///
    /// The axis with the longer travel runs at `speed`/`acceleration`; the
    /// other is scaled by the ratio of the two travels. Returns `None` when
    /// the carriage is already at the target.
    pub fn plan(current: (i64, i64), target: (i64, i64), speed: f32, acceleration: f32) -> Option<Self> {
        let dx = target.0.abs_diff(current.0);
        let dy = target.1.abs_diff(current.1);
        let longest = dx.max(dy);

        if longest == 0 {
            return None;
        }

        Some(Self {
            x: AxisPlan::scaled(current.0, target.0, longest, speed, acceleration),
            y: AxisPlan::scaled(current.1, target.1, longest, speed, acceleration),
        })
    }

    /// Command both actuators.
    pub fn apply(&self, x: &mut dyn Actuator, y: &mut dyn Actuator) {
        self.x.apply(x);
        self.y.apply(y);
    }
}

/// Outcome of [`move_linear`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinearOutcome {
    /// Both axes were already on target; nothing was commanded.
    AlreadyAtTarget,
    /// Both axes were commanded.
    Started(LinearMove),
}

/// Start a coordinated move of `x` and `y` to absolute step targets.
pub fn move_linear(
    x: &mut dyn Actuator,
    y: &mut dyn Actuator,
    target: (i64, i64),
    speed: f32,
    acceleration: f32,
) -> LinearOutcome {
    let current = (x.current_position(), y.current_position());
    match LinearMove::plan(current, target, speed, acceleration) {
        Some(plan) => {
            debug!(
                "linear move: x {} -> {} @ {}, y {} -> {} @ {}",
                current.0,
                plan.x.target,
                plan.x.speed,
                current.1,
                plan.y.target,
                plan.y.speed
            );
            plan.apply(x, y);
            LinearOutcome::Started(plan)
        }
        None => LinearOutcome::AlreadyAtTarget,
    }
}
