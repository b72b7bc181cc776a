//! Single-axis trapezoidal step generator.
//!
//! [`AxisActuator`] owns everything about one axis' motion: position, target,
//! rate limits and the timing of the next step. It is advanced by calling
//! [`Actuator::tick`] with the current time, at most one step per call, and
//! never blocks.

use crate::config::units::{Millimeters, Steps};
use crate::config::AxisConfig;
use crate::error::Result;
use crate::motion::ramp;
use crate::motion::{Direction, MotionPhase};

use super::axis::Axis;
use super::output::StepOutput;
use super::position::Position;

/// How far away the target is parked while jogging.
///
/// Keeps `distance_to_go()` non-zero so a jogging axis never looks finished.
pub const JOG_REACH_STEPS: i64 = 1_000_000_000;

/// Capability interface for one driven axis.
///
/// Control code (coordinated moves, homing, the tick loop) is written against
/// this trait so it does not care how the motor is wired.
pub trait Actuator {
    /// Which axis this actuator drives.
    fn axis(&self) -> Axis;

    /// Seek an absolute step position under the speed and acceleration limits.
    fn set_absolute_target(&mut self, target: i64);

    /// Run at a fixed signed speed (steps/sec), ignoring the target, until a
    /// new target or a stop is requested. Clamped to the max speed.
    fn set_constant_signed_speed(&mut self, speed: f32);

    /// Decelerate to rest at the configured acceleration.
    ///
    /// The target becomes the nearest position the axis can stop at, so the
    /// axis comes to rest without overshoot.
    fn request_stop(&mut self);

    /// Advance the step generator to `now_us`.
    ///
    /// Emits at most one step. Returns `true` if a step was taken.
    fn tick(&mut self, now_us: u64) -> Result<bool>;

    /// Signed steps between the target and the current position.
    fn distance_to_go(&self) -> i64;

    /// Current absolute position in steps.
    fn current_position(&self) -> i64;

    /// Redefine the current position without moving. Stops the axis.
    fn set_current_position(&mut self, position: i64);

    /// Current absolute target in steps.
    fn target_position(&self) -> i64;

    /// Current signed speed in steps/sec.
    fn speed(&self) -> f32;

    /// Speed limit in steps/sec.
    fn max_speed(&self) -> f32;

    /// Set the speed limit in steps/sec. Non-positive values are ignored.
    fn set_max_speed(&mut self, speed: f32);

    /// Acceleration limit in steps/sec².
    fn acceleration(&self) -> f32;

    /// Set the acceleration limit in steps/sec². Non-positive values are ignored.
    fn set_acceleration(&mut self, acceleration: f32);

    /// Current ramp phase.
    fn phase(&self) -> MotionPhase;

    /// Current position in millimeters.
    fn position_mm(&self) -> Millimeters;

    /// On target and at rest.
    fn is_idle(&self) -> bool {
        self.distance_to_go() == 0 && self.speed() == 0.0
    }
}

/// Target-seeking versus jogging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Seek,
    Constant,
}

/// Trapezoidal step generator for one axis.
#[derive(Debug)]
pub struct AxisActuator<O: StepOutput> {
    axis: Axis,

    /// Step output for the wiring scheme.
    output: O,

    /// Current absolute position.
    position: Position,

    /// Absolute target in steps.
    target: i64,

    /// Speed limit in steps/sec.
    max_speed: f32,

    /// Acceleration limit in steps/sec².
    acceleration: f32,

    /// Speed magnitude reached at the last step.
    speed: f32,

    /// Speed planned for the end of the next step.
    next_speed: f32,

    /// Direction of travel.
    direction: Direction,

    /// Motor turns the other way from the axis.
    invert_direction: bool,

    mode: Mode,

    /// Time allotted to the pending step in nanoseconds, `None` when at rest.
    step_interval_ns: Option<u64>,

    /// When the last step was due in nanoseconds, `None` until the first
    /// tick of a motion.
    last_step_ns: Option<u64>,

    phase: MotionPhase,
}

impl<O: StepOutput> AxisActuator<O> {
    /// Create an actuator at position zero.
    pub fn new(axis: Axis, steps_per_mm: f32, max_speed: f32, acceleration: f32, output: O) -> Self {
        Self {
            axis,
            output,
            position: Position::new(steps_per_mm),
            target: 0,
            max_speed,
            acceleration,
            speed: 0.0,
            next_speed: 0.0,
            direction: Direction::Positive,
            invert_direction: false,
            mode: Mode::Seek,
            step_interval_ns: None,
            last_step_ns: None,
            phase: MotionPhase::Idle,
        }
    }

    /// Create an actuator from an axis configuration.
    pub fn from_config(axis: Axis, config: &AxisConfig, output: O) -> Self {
        Self::new(
            axis,
            config.steps_per_mm,
            config.max_speed.value(),
            config.acceleration.value(),
            output,
        )
        .with_inverted_direction(config.invert_direction)
    }

    /// Drive the motor the other way from the axis.
    pub fn with_inverted_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    /// Whether the axis is jogging at constant speed.
    #[inline]
    pub fn is_jogging(&self) -> bool {
        self.mode == Mode::Constant && self.speed > 0.0
    }

    /// Release the step output.
    pub fn release(self) -> O {
        self.output
    }

    fn come_to_rest(&mut self) {
        self.speed = 0.0;
        self.next_speed = 0.0;
        self.step_interval_ns = None;
        self.last_step_ns = None;
        self.phase = MotionPhase::Idle;
    }

    /// Work out the speed and duration of the next step toward the target.
    fn plan_next_step(&mut self) {
        let distance = self.target - self.position.steps().value();

        if self.speed == 0.0 {
            if distance == 0 {
                self.come_to_rest();
                return;
            }
            self.direction = Direction::from_steps(distance);
        }

        let remaining = distance * self.direction.sign();
        let plan = ramp::plan_step(self.speed, remaining, self.max_speed, self.acceleration);
        let next = plan.end_speed;

        self.phase = if next > self.speed {
            MotionPhase::Accelerating
        } else if next < self.speed {
            MotionPhase::Decelerating
        } else {
            MotionPhase::Cruising
        };
        self.next_speed = next;
        self.step_interval_ns = Some(plan.interval_ns);
    }
}

impl<O: StepOutput> Actuator for AxisActuator<O> {
    #[inline]
    fn axis(&self) -> Axis {
        self.axis
    }

    fn set_absolute_target(&mut self, target: i64) {
        trace!("{} target {}", self.axis, target);
        self.mode = Mode::Seek;
        self.target = target;
        self.plan_next_step();
    }

    fn set_constant_signed_speed(&mut self, speed: f32) {
        let speed = speed.clamp(-self.max_speed, self.max_speed);
        self.mode = Mode::Constant;

        if speed == 0.0 {
            self.target = self.position.steps().value();
            self.come_to_rest();
            return;
        }

        self.direction = if speed > 0.0 {
            Direction::Positive
        } else {
            Direction::Negative
        };
        self.speed = speed.abs();
        self.next_speed = self.speed;
        self.target = self.position.steps().value() + self.direction.sign() * JOG_REACH_STEPS;
        self.step_interval_ns = ramp::constant_interval_ns(self.speed);
        self.phase = MotionPhase::Cruising;
    }

    fn request_stop(&mut self) {
        self.mode = Mode::Seek;
        let position = self.position.steps().value();

        self.target = if self.speed > 0.0 {
            position + self.direction.sign() * ramp::stopping_steps(self.speed, self.acceleration)
        } else {
            position
        };
        debug!("{} stop requested, resting at {}", self.axis, self.target);
        self.plan_next_step();
    }

    fn tick(&mut self, now_us: u64) -> Result<bool> {
        let Some(interval) = self.step_interval_ns else {
            return Ok(false);
        };
        let now = now_us.saturating_mul(1_000);

        let last = match self.last_step_ns {
            Some(last) => last,
            None => {
                // Motion starts now; the first step is one interval away.
                self.last_step_ns = Some(now);
                return Ok(false);
            }
        };

        if now.saturating_sub(last) < interval {
            return Ok(false);
        }

        let sign = self.direction.sign();
        let position = self.position.steps().value() + sign;
        if self.invert_direction {
            self.output.step(self.direction.reversed(), -position)?;
        } else {
            self.output.step(self.direction, position)?;
        }
        self.position.move_steps(sign);

        // Keep the step schedule free of loop jitter unless the loop fell a
        // whole interval behind.
        let due = last.saturating_add(interval);
        self.last_step_ns = Some(if now.saturating_sub(due) >= interval { now } else { due });

        if self.mode == Mode::Seek {
            self.speed = self.next_speed;
            self.plan_next_step();
        }

        Ok(true)
    }

    #[inline]
    fn distance_to_go(&self) -> i64 {
        self.target - self.position.steps().value()
    }

    #[inline]
    fn current_position(&self) -> i64 {
        self.position.steps().value()
    }

    fn set_current_position(&mut self, position: i64) {
        self.position.set_steps(Steps(position));
        self.target = position;
        self.mode = Mode::Seek;
        self.come_to_rest();
    }

    #[inline]
    fn target_position(&self) -> i64 {
        self.target
    }

    #[inline]
    fn speed(&self) -> f32 {
        self.speed * self.direction.sign() as f32
    }

    #[inline]
    fn max_speed(&self) -> f32 {
        self.max_speed
    }

    fn set_max_speed(&mut self, speed: f32) {
        if speed <= 0.0 {
            warn!("{} ignoring max speed {}", self.axis, speed);
            return;
        }
        self.max_speed = speed;
        if self.mode == Mode::Seek {
            self.plan_next_step();
        }
    }

    #[inline]
    fn acceleration(&self) -> f32 {
        self.acceleration
    }

    fn set_acceleration(&mut self, acceleration: f32) {
        if acceleration <= 0.0 {
            warn!("{} ignoring acceleration {}", self.axis, acceleration);
            return;
        }
        self.acceleration = acceleration;
        if self.mode == Mode::Seek {
            self.plan_next_step();
        }
    }

    #[inline]
    fn phase(&self) -> MotionPhase {
        self.phase
    }

    #[inline]
    fn position_mm(&self) -> Millimeters {
        self.position.mm()
    }
}
