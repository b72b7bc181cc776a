//! Step-rate ramp calculation.
//!
//! Per-step planning for acceleration-limited (trapezoidal) motion. Each step
//! is timed from the continuous profile that would take the axis from its
//! current speed to rest on the target in the least time: change speed toward
//! a peak, hold it, then brake. A step that spans a phase boundary is timed
//! piecewise, so an axis that is given proportionally scaled limits runs a
//! proportionally scaled copy of the same profile and finishes at the same
//! time. All speeds are magnitudes in steps/sec; direction is tracked
//! separately.

use libm::{ceilf, sqrt};

/// Relative excess of `v²` over `2·a·remaining` tolerated as float noise
/// before the axis is treated as unable to stop on the target.
const OVERRUN_TOLERANCE: f64 = 1e-3;

/// Direction of axis motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Toward increasing step count.
    Positive,
    /// Toward decreasing step count.
    Negative,
}

impl Direction {
    /// Get direction from signed step count.
    #[inline]
    pub fn from_steps(steps: i64) -> Self {
        if steps >= 0 {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Positive => 1,
            Direction::Negative => -1,
        }
    }

    /// The opposite direction.
    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }
}

/// Current phase of an axis ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPhase {
    /// Speeding up toward max speed.
    Accelerating,
    /// Moving at constant speed (max speed or jog speed).
    Cruising,
    /// Slowing down toward a stop.
    Decelerating,
    /// At rest.
    Idle,
}

/// Distance in steps needed to brake from `speed` to rest.
#[inline]
pub fn stopping_distance(speed: f32, acceleration: f32) -> f32 {
    if acceleration <= 0.0 {
        return 0.0;
    }
    speed * speed / (2.0 * acceleration)
}

/// Whole steps needed to brake from `speed` to rest.
#[inline]
pub fn stopping_steps(speed: f32, acceleration: f32) -> i64 {
    ceilf(stopping_distance(speed, acceleration)) as i64
}

/// Speed after braking at `acceleration` for one step.
#[inline]
pub fn braking_speed(speed: f32, acceleration: f32) -> f32 {
    let v2 = speed * speed - 2.0 * acceleration;
    if v2 > 0.0 {
        libm::sqrtf(v2)
    } else {
        0.0
    }
}

/// Timing of the next step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    /// Time to cover the step, in nanoseconds.
    pub interval_ns: u64,
    /// Speed at the end of the step.
    pub end_speed: f32,
}

/// Plan the next step.
///
/// `remaining` is the distance to the target measured along the current
/// direction of travel, before the step is taken. Zero or negative means the
/// target is at or behind the carriage. When the target is behind, or too
/// close to stop on, the axis brakes at `acceleration` for the whole step and
/// will overshoot.
pub fn plan_step(speed: f32, remaining: i64, max_speed: f32, acceleration: f32) -> StepPlan {
    let v = f64::from(speed);
    let a = f64::from(acceleration);
    let cap = f64::from(max_speed);
    let r = remaining as f64;

    if remaining <= 0 || v * v > 2.0 * a * r * (1.0 + OVERRUN_TOLERANCE) {
        let end = braking_speed(speed, acceleration);
        return StepPlan {
            interval_ns: nanos(uniform_step_seconds(v, f64::from(end), a)),
            end_speed: end,
        };
    }

    // Peak speed of the fastest profile that still stops on the target.
    let peak = if v > cap {
        cap
    } else {
        cap.min(sqrt((v * v + 2.0 * a * r) / 2.0))
    };
    let change = (peak * peak - v * v).abs() / (2.0 * a);
    let brake = peak * peak / (2.0 * a);
    let cruise = (r - change - brake).max(0.0);

    let mut left = 1.0;
    let mut seconds = 0.0;
    let mut end = v;

    if change >= 1.0 {
        let w2 = if peak > v { v * v + 2.0 * a } else { v * v - 2.0 * a };
        end = sqrt(w2.max(0.0));
        seconds += uniform_step_seconds(v, end, a);
        left = 0.0;
    } else if change > 0.0 {
        seconds += 2.0 * change / (v + peak);
        left -= change;
        end = peak;
    }

    if left > 0.0 {
        let held = cruise.min(left);
        if held > 0.0 {
            seconds += held / peak;
            left -= held;
        }
    }

    if left > 0.0 {
        end = if remaining == 1 {
            0.0
        } else {
            sqrt((peak * peak - 2.0 * a * left).max(0.0))
        };
        seconds += 2.0 * left / (peak + end);
    }

    if remaining == 1 {
        end = 0.0;
    }

    StepPlan {
        interval_ns: nanos(seconds),
        end_speed: end as f32,
    }
}

/// Seconds to cover one step under constant acceleration from `speed` to
/// `next`. A step that starts and ends at rest is covered by half a step of
/// acceleration and half a step of deceleration.
fn uniform_step_seconds(speed: f64, next: f64, acceleration: f64) -> f64 {
    let sum = speed + next;
    if sum > 0.0 {
        2.0 / sum
    } else if acceleration > 0.0 {
        2.0 / sqrt(acceleration)
    } else {
        f64::INFINITY
    }
}

fn nanos(seconds: f64) -> u64 {
    let ns = seconds * 1e9;
    if ns >= u64::MAX as f64 {
        u64::MAX
    } else {
        (ns as u64).max(1)
    }
}

/// Step interval in nanoseconds for a constant speed.
#[inline]
pub fn constant_interval_ns(speed: f32) -> Option<u64> {
    if speed > 0.0 {
        Some(nanos(1.0 / f64::from(speed)))
    } else {
        None
    }
}
