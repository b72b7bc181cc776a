//! Step outputs.
//!
//! Each wiring scheme turns "one step in this direction" into pin activity.
//! The ramp logic in [`AxisActuator`](super::AxisActuator) never touches pins
//! directly, so the same actuator drives a STEP/DIR driver, a unipolar
//! four-wire motor, or nothing at all in simulation.
//!
//! Outputs receive motor directions: an axis configured with
//! `invert_direction` is flipped by its actuator before the output sees it.

use embedded_hal::digital::OutputPin;

use crate::error::{MotorError, Result};
use crate::motion::Direction;

/// Emits physical steps for one axis.
pub trait StepOutput {
    /// Emit one step in motor `direction`. `position` is the motor step
    /// count after the step, for schemes that derive coil phase from it.
    fn step(&mut self, direction: Direction, position: i64) -> Result<()>;
}

/// Simulation output: steps are counted by the actuator and go nowhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOutput;

impl StepOutput for NoOutput {
    #[inline]
    fn step(&mut self, _direction: Direction, _position: i64) -> Result<()> {
        Ok(())
    }
}

/// Two-wire step/direction driver (A4988, DRV8825, TMC in STEP/DIR mode).
pub struct StepDir<STEP, DIR>
where
    STEP: OutputPin,
    DIR: OutputPin,
{
    /// STEP pin (pulse to move one step).
    step_pin: STEP,

    /// DIR pin (high = positive).
    dir_pin: DIR,

    /// Current direction (cached to avoid unnecessary pin writes).
    current_direction: Option<Direction>,
}

impl<STEP, DIR> StepDir<STEP, DIR>
where
    STEP: OutputPin,
    DIR: OutputPin,
{
    /// Create a step/direction output.
    pub fn new(step_pin: STEP, dir_pin: DIR) -> Self {
        Self {
            step_pin,
            dir_pin,
            current_direction: None,
        }
    }

    /// Release the pins.
    pub fn release(self) -> (STEP, DIR) {
        (self.step_pin, self.dir_pin)
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        write_pin(&mut self.dir_pin, direction == Direction::Positive)?;

        self.current_direction = Some(direction);
        Ok(())
    }
}

impl<STEP, DIR> StepOutput for StepDir<STEP, DIR>
where
    STEP: OutputPin,
    DIR: OutputPin,
{
    fn step(&mut self, direction: Direction, _position: i64) -> Result<()> {
        self.set_direction(direction)?;

        // Drivers latch on the rising edge; the pin write latency covers
        // the minimum pulse width.
        self.step_pin.set_high().map_err(|_| MotorError::PinError)?;
        self.step_pin.set_low().map_err(|_| MotorError::PinError)?;
        Ok(())
    }
}

/// Coil pattern per full-step phase, pins A..D.
const FULL_STEP_PHASES: [[bool; 4]; 4] = [
    [true, false, true, false],
    [false, true, true, false],
    [false, true, false, true],
    [true, false, false, true],
];

/// Unipolar motor driven full-step through four coil pins (e.g. ULN2003).
pub struct FullFourWire<A, B, C, D>
where
    A: OutputPin,
    B: OutputPin,
    C: OutputPin,
    D: OutputPin,
{
    a: A,
    b: B,
    c: C,
    d: D,
}

impl<A, B, C, D> FullFourWire<A, B, C, D>
where
    A: OutputPin,
    B: OutputPin,
    C: OutputPin,
    D: OutputPin,
{
    /// Create a four-wire output. Pins are given in coil sequence order.
    pub fn new(a: A, b: B, c: C, d: D) -> Self {
        Self { a, b, c, d }
    }

    /// Release the pins.
    pub fn release(self) -> (A, B, C, D) {
        (self.a, self.b, self.c, self.d)
    }

    /// Phase index for a step position.
    fn phase(position: i64) -> usize {
        position.rem_euclid(4) as usize
    }
}

fn write_pin<P: OutputPin>(pin: &mut P, high: bool) -> Result<()> {
    if high {
        pin.set_high().map_err(|_| MotorError::PinError)?;
    } else {
        pin.set_low().map_err(|_| MotorError::PinError)?;
    }
    Ok(())
}

impl<A, B, C, D> StepOutput for FullFourWire<A, B, C, D>
where
    A: OutputPin,
    B: OutputPin,
    C: OutputPin,
    D: OutputPin,
{
    fn step(&mut self, _direction: Direction, position: i64) -> Result<()> {
        let [a, b, c, d] = FULL_STEP_PHASES[Self::phase(position)];
        write_pin(&mut self.a, a)?;
        write_pin(&mut self.b, b)?;
        write_pin(&mut self.c, c)?;
        write_pin(&mut self.d, d)?;
        Ok(())
    }
}
