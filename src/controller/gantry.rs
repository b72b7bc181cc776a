//! The owning motion controller.

use core::fmt::Write;

use crate::command::{
    emit, Command, CommandParser, CommandQueue, Coordinates, Response, StopTarget,
};
use crate::config::{GantryConfig, Millimeters};
use crate::error::{CommandError, Result};
use crate::homing::{HomingEvent, HomingStateMachine, LimitSwitch};
use crate::motion::{move_linear, Direction, LinearOutcome, SpeedMode};
use crate::motor::{Actuator, Axis};

/// How `process_command` handled a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
    /// Executed on arrival; the queue was not touched.
    Immediate,
    /// Appended to the queue.
    Queued,
}

/// Command currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExecutionState {
    /// Queued command whose motion is under way.
    pub current_command: Option<Command>,
    /// Whether the queue is blocked until that motion finishes.
    pub waiting_for_completion: bool,
}

impl ExecutionState {
    fn finish(&mut self) {
        self.current_command = None;
        self.waiting_for_completion = false;
    }
}

/// Three-axis gantry controller.
///
/// Owns the actuators, the limit switches, the command queue and the
/// execution state. Call [`tick`](Self::tick) from a tight loop and feed
/// complete command lines to [`process_command`](Self::process_command).
/// Response lines go to the `out` sink passed to each call.
pub struct GantryController<Z, X, Y, S> {
    config: GantryConfig,
    parser: CommandParser,
    z: Z,
    x: X,
    y: Y,
    x_switch: S,
    y_switch: S,
    queue: CommandQueue,
    execution: ExecutionState,
    homing: Option<HomingStateMachine>,
}

impl<Z, X, Y, S> GantryController<Z, X, Y, S>
where
    Z: Actuator,
    X: Actuator,
    Y: Actuator,
    S: LimitSwitch,
{
    /// Assemble a controller. The X/Y actuators start at the configured
    /// normal speed and acceleration.
    pub fn new(config: GantryConfig, z: Z, x: X, y: Y, x_switch: S, y_switch: S) -> Self {
        let parser = CommandParser::new(&config.magnet);
        let mut controller = Self {
            config,
            parser,
            z,
            x,
            y,
            x_switch,
            y_switch,
            queue: CommandQueue::new(),
            execution: ExecutionState::default(),
            homing: None,
        };
        controller.restore_rates(Axis::Z);
        controller.restore_rates(Axis::X);
        controller.restore_rates(Axis::Y);
        controller
    }

    /// Print the startup banner.
    pub fn begin<W: Write>(&mut self, out: &mut W) {
        info!("gantry ready");
        emit(out, Response::Ready);
    }

    /// Accept one complete command line.
    ///
    /// Jog, stop and `COORD` run at once and never touch the queue. Anything
    /// else is queued for [`tick`](Self::tick) to execute in order.
    ///
    /// # Errors
    ///
    /// [`CommandError::QueueFull`] when the line could not be queued.
    pub fn process_command<W: Write>(&mut self, text: &str, out: &mut W) -> Result<Dispatch> {
        match self.parser.parse_immediate(text) {
            Some(Command::Jog { axis, direction }) => self.jog(axis, direction, out),
            Some(Command::Stop(target)) => self.stop(target, out),
            // COORD
            Some(_) => emit(out, Response::Coordinates(self.coordinates())),
            None => {
                self.enqueue_command(text, out)?;
                return Ok(Dispatch::Queued);
            }
        }
        Ok(Dispatch::Immediate)
    }

    fn jog<W: Write>(&mut self, axis: Axis, direction: Direction, out: &mut W) {
        let actuator = self.actuator_mut(axis);
        let speed = actuator.max_speed() * direction.sign() as f32;
        actuator.set_constant_signed_speed(speed);
        debug!("jog {} at {}", axis, speed);
        emit(out, Response::Jogging(axis, direction));
    }

    /// Controlled deceleration; in-flight commands and the queue are kept.
    fn stop<W: Write>(&mut self, target: StopTarget, out: &mut W) {
        emit(out, Response::Stopping(target, self.coordinates()));
        match target {
            StopTarget::All => {
                for axis in Axis::ALL {
                    self.actuator_mut(axis).request_stop();
                }
            }
            StopTarget::Axis(axis) => self.actuator_mut(axis).request_stop(),
        }
    }

    /// Append a command line to the queue.
    ///
    /// # Errors
    ///
    /// [`CommandError::QueueFull`] when every usable slot is taken. The
    /// command is discarded.
    pub fn enqueue_command<W: Write>(&mut self, text: &str, out: &mut W) -> Result<()> {
        if let Err(e) = self.queue.enqueue(text) {
            warn!("queue full, dropping command");
            emit(out, Response::QueueFull);
            return Err(e.into());
        }
        emit(out, Response::Queued(text));
        Ok(())
    }

    /// Start the command at the front of the queue.
    ///
    /// Commands with motion keep the queue blocked until `tick` sees every
    /// axis come to rest. The rest complete before this returns. Does
    /// nothing while a command is in flight or the queue is empty.
    fn execute_next_command<W: Write>(&mut self, out: &mut W) {
        if self.execution.waiting_for_completion {
            return;
        }
        let Some(text) = self.queue.peek().cloned() else {
            return;
        };
        emit(out, Response::Executing(&text));

        let command = match self.parser.parse(&text) {
            Ok(command) => command,
            Err(CommandError::MalformedArguments(_)) => {
                // Bad coordinates: no motion and no error line.
                warn!("ignoring malformed move");
                self.complete_immediately(out);
                return;
            }
            Err(_) => {
                emit(out, Response::Unknown(&text));
                self.complete_immediately(out);
                return;
            }
        };

        if self.start(command, out) {
            self.execution.current_command = Some(command);
            self.execution.waiting_for_completion = true;
        } else {
            self.complete_immediately(out);
        }
    }

    /// Run one command. Returns whether it started motion to wait for.
    fn start<W: Write>(&mut self, command: Command, out: &mut W) -> bool {
        match command {
            Command::Calibrate => {
                for axis in Axis::ALL {
                    self.actuator_mut(axis).set_current_position(0);
                }
                emit(out, Response::Calibrated);
                false
            }
            Command::AutoCalibrate => {
                emit(out, Response::HomingStarted);
                self.homing = Some(HomingStateMachine::start(
                    &self.config.homing,
                    &mut self.x,
                    &mut self.y,
                ));
                true
            }
            Command::Home => {
                emit(out, Response::ReturningHome);
                self.z.set_absolute_target(0);
                let motion = &self.config.motion;
                move_linear(
                    &mut self.x,
                    &mut self.y,
                    (0, 0),
                    motion.home_speed.value(),
                    motion.home_acceleration.value(),
                );
                true
            }
            Command::QueryCoordinates => {
                emit(out, Response::Coordinates(self.coordinates()));
                false
            }
            Command::MoveZ { lift, target } => {
                emit(out, Response::Magnet(lift, target));
                let steps = self.config.axes.z.mm_to_steps(target);
                self.z.set_absolute_target(steps.value());
                true
            }
            Command::LinearMove { x, y, mode } => self.start_linear_move(x, y, mode, out),
            // Only reachable through `enqueue_command`; behave as on arrival.
            Command::Jog { axis, direction } => {
                self.jog(axis, direction, out);
                false
            }
            Command::Stop(target) => {
                self.stop(target, out);
                false
            }
        }
    }

    fn start_linear_move<W: Write>(
        &mut self,
        x: Millimeters,
        y: Millimeters,
        mode: SpeedMode,
        out: &mut W,
    ) -> bool {
        let board = &self.config.board;
        let (x, y) = (x + board.origin_x_mm, y + board.origin_y_mm);
        emit(out, Response::LinearMove(mode, x, y));

        let target = (
            self.config.axes.x.mm_to_steps(x).value(),
            self.config.axes.y.mm_to_steps(y).value(),
        );

        let motion = &self.config.motion;
        let factor = match mode {
            SpeedMode::Move => motion.move_factor,
            SpeedMode::Warp => motion.warp_factor,
        };
        let speed = motion.base_speed.value() * factor;
        let acceleration = self.x.acceleration() * factor;

        match move_linear(&mut self.x, &mut self.y, target, speed, acceleration) {
            LinearOutcome::AlreadyAtTarget => {
                emit(out, Response::AlreadyAtTarget);
                false
            }
            LinearOutcome::Started(_) => true,
        }
    }

    fn complete_immediately<W: Write>(&mut self, out: &mut W) {
        self.queue.advance();
        emit(out, Response::CompletedImmediately);
    }

    /// Advance the controller to `now_us`.
    ///
    /// Steps every axis that is due, drives homing while it is active,
    /// retires the in-flight command once all axes are at rest, and starts
    /// the next queued command when nothing is in flight.
    ///
    /// # Errors
    ///
    /// Propagates step output and limit switch failures.
    pub fn tick<W: Write>(&mut self, now_us: u64, out: &mut W) -> Result<()> {
        self.z.tick(now_us)?;
        self.x.tick(now_us)?;
        self.y.tick(now_us)?;

        if self.homing.is_some() {
            return self.advance_homing(out);
        }

        if self.execution.waiting_for_completion && self.all_idle() {
            if let Some(text) = self.queue.peek() {
                emit(out, Response::Finished(text));
            }
            emit(out, Response::Position(self.coordinates()));
            self.restore_rates(Axis::X);
            self.restore_rates(Axis::Y);
            self.execution.finish();
            self.queue.advance();
        }

        if !self.execution.waiting_for_completion && !self.queue.is_empty() {
            self.execute_next_command(out);
        }

        Ok(())
    }

    fn advance_homing<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let Some(homing) = self.homing.as_mut() else {
            return Ok(());
        };

        let events = [
            homing.advance(&mut self.x, &mut self.x_switch)?,
            homing.advance(&mut self.y, &mut self.y_switch)?,
        ];
        for event in events.into_iter().flatten() {
            match event {
                HomingEvent::SwitchFound(axis) => emit(out, Response::SwitchFound(axis)),
                HomingEvent::ReboundFinished(axis) => emit(out, Response::ReboundFinished(axis)),
            }
        }

        if homing.is_done() {
            emit(out, Response::HomingFinished);
            self.homing = None;
            self.restore_rates(Axis::X);
            self.restore_rates(Axis::Y);
            self.execution.finish();
            self.queue.advance();
        }
        Ok(())
    }

    /// Put an axis back on its configured speed and acceleration.
    fn restore_rates(&mut self, axis: Axis) {
        let config = self.config.axis(axis);
        let (speed, acceleration) = (config.max_speed.value(), config.acceleration.value());
        let actuator = self.actuator_mut(axis);
        actuator.set_max_speed(speed);
        actuator.set_acceleration(acceleration);
    }

    fn all_idle(&self) -> bool {
        self.z.is_idle() && self.x.is_idle() && self.y.is_idle()
    }

    /// Current X/Y/Z position in millimeters.
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            x: self.x.position_mm(),
            y: self.y.position_mm(),
            z: self.z.position_mm(),
        }
    }

    /// No queued commands, including the one in flight.
    pub fn is_queue_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// The command queue.
    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    /// The in-flight command state.
    pub fn execution(&self) -> &ExecutionState {
        &self.execution
    }

    /// Whether `AUTOCALIB` is running.
    pub fn is_homing(&self) -> bool {
        self.homing.is_some()
    }

    /// Homing progress while `AUTOCALIB` runs.
    pub fn homing(&self) -> Option<&HomingStateMachine> {
        self.homing.as_ref()
    }

    /// Read access to one axis.
    pub fn actuator(&self, axis: Axis) -> &dyn Actuator {
        match axis {
            Axis::Z => &self.z,
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    fn actuator_mut(&mut self, axis: Axis) -> &mut dyn Actuator {
        match axis {
            Axis::Z => &mut self.z,
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    /// Take the controller apart.
    pub fn release(self) -> (Z, X, Y, S, S) {
        (self.z, self.x, self.y, self.x_switch, self.y_switch)
    }
}
