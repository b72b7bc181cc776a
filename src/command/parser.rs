//! Command grammar.
//!
//! Commands are ASCII and case-sensitive. Jog, stop and `COORD` are
//! recognised on arrival by [`CommandParser::parse_immediate`]; everything
//! else is queued as raw text and decoded by [`CommandParser::parse`] when it
//! reaches the front of the queue.

use core::str::FromStr;

use crate::config::{MagnetConfig, Millimeters};
use crate::error::{truncated, CommandError};
use crate::motion::{Direction, SpeedMode};
use crate::motor::Axis;

/// Which axes an `OFF(..)` addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopTarget {
    /// A single axis.
    Axis(Axis),
    /// `OFF(a)`: every axis.
    All,
}

/// Electromagnet height preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MagnetLift {
    /// `UP`: magnet raised against the board.
    Up,
    /// `DOWN`: magnet lowered away from the pieces.
    Down,
}

impl MagnetLift {
    /// Protocol keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            MagnetLift::Up => "UP",
            MagnetLift::Down => "DOWN",
        }
    }
}

/// A decoded command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// `ON+(axis)` / `ON-(axis)`: run one axis at its max speed.
    Jog {
        /// Axis to jog.
        axis: Axis,
        /// Jog direction.
        direction: Direction,
    },
    /// `OFF(axis)` / `OFF(a)`: controlled deceleration to rest.
    Stop(StopTarget),
    /// `CALIB`: declare the current position as the origin.
    Calibrate,
    /// `AUTOCALIB`: find the X/Y limit switches.
    AutoCalibrate,
    /// `HOME`: return to the origin.
    Home,
    /// `COORD`: report the current position.
    QueryCoordinates,
    /// `UP` / `DOWN`: move Z to a preset height.
    MoveZ {
        /// Preset requested.
        lift: MagnetLift,
        /// Resolved height.
        target: Millimeters,
    },
    /// `MOVE(x,y)` / `WARP(x,y)`: straight-line XY move to board coordinates.
    LinearMove {
        /// Board X in millimeters, before the origin offset.
        x: Millimeters,
        /// Board Y in millimeters, before the origin offset.
        y: Millimeters,
        /// Speed class.
        mode: SpeedMode,
    },
}

impl Command {
    /// Whether the command is executed on arrival instead of being queued.
    pub fn is_immediate(&self) -> bool {
        matches!(
            self,
            Command::Jog { .. } | Command::Stop(_) | Command::QueryCoordinates
        )
    }
}

/// Decodes command text.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandParser {
    up: Millimeters,
    down: Millimeters,
}

impl CommandParser {
    /// Create a parser resolving `UP`/`DOWN` from the magnet presets.
    pub fn new(magnet: &MagnetConfig) -> Self {
        Self {
            up: magnet.up_mm,
            down: magnet.down_mm,
        }
    }

    /// Recognise a command that bypasses the queue.
    ///
    /// Returns `None` for anything else, including jog and stop forms naming
    /// an unknown axis; those are queued and rejected at execution.
    pub fn parse_immediate(&self, text: &str) -> Option<Command> {
        if text == "COORD" {
            return Some(Command::QueryCoordinates);
        }

        let direction = if text.starts_with("ON+") {
            Some(Direction::Positive)
        } else if text.starts_with("ON-") {
            Some(Direction::Negative)
        } else {
            None
        };

        // The axis letter sits after the opening parenthesis: `ON+(x)`.
        let letter = text.get(4..).and_then(|rest| rest.chars().next());

        if let Some(direction) = direction {
            let axis = letter.and_then(Axis::from_char)?;
            return Some(Command::Jog { axis, direction });
        }

        if text.starts_with("OFF(") {
            return match letter? {
                'a' => Some(Command::Stop(StopTarget::All)),
                c => Axis::from_char(c).map(|axis| Command::Stop(StopTarget::Axis(axis))),
            };
        }

        None
    }

    /// Decode a queued command.
    ///
    /// # Errors
    ///
    /// - [`CommandError::MalformedArguments`] for a `MOVE(..)`/`WARP(..)` whose
    ///   coordinates are missing or not numbers
    /// - [`CommandError::UnknownCommand`] for anything unrecognised
    pub fn parse(&self, text: &str) -> core::result::Result<Command, CommandError> {
        match text {
            "CALIB" => return Ok(Command::Calibrate),
            "AUTOCALIB" => return Ok(Command::AutoCalibrate),
            "HOME" => return Ok(Command::Home),
            "COORD" => return Ok(Command::QueryCoordinates),
            "UP" => {
                return Ok(Command::MoveZ {
                    lift: MagnetLift::Up,
                    target: self.up,
                })
            }
            "DOWN" => {
                return Ok(Command::MoveZ {
                    lift: MagnetLift::Down,
                    target: self.down,
                })
            }
            _ => {}
        }

        let mode = if text.starts_with("MOVE(") {
            SpeedMode::Move
        } else if text.starts_with("WARP(") {
            SpeedMode::Warp
        } else {
            return Err(CommandError::UnknownCommand(truncated(text)));
        };

        let Some(args) = text[5..].strip_suffix(')') else {
            return Err(CommandError::UnknownCommand(truncated(text)));
        };

        let (x, y) = parse_pair(args).ok_or_else(|| CommandError::MalformedArguments(truncated(text)))?;
        Ok(Command::LinearMove { x, y, mode })
    }
}

/// Parse `x,y` in millimeters.
fn parse_pair(args: &str) -> Option<(Millimeters, Millimeters)> {
    let mut fields = args.split(',').map(str::trim);
    let x = f32::from_str(fields.next()?).ok()?;
    let y = f32::from_str(fields.next()?).ok()?;
    if fields.next().is_some() || !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some((Millimeters(x), Millimeters(y)))
}
