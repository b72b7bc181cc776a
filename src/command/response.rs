//! Response lines written to the host.

use core::fmt;

use crate::config::Millimeters;
use crate::motion::{Direction, SpeedMode};
use crate::motor::Axis;

use super::parser::{MagnetLift, StopTarget};

/// Current carriage position in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Coordinates {
    /// Gantry X.
    pub x: Millimeters,
    /// Gantry Y.
    pub y: Millimeters,
    /// Magnet height.
    pub z: Millimeters,
}

/// One line of controller output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Response<'a> {
    /// Startup banner.
    Ready,
    /// Jog started.
    Jogging(Axis, Direction),
    /// Stop requested, with the position at the time of the request.
    Stopping(StopTarget, Coordinates),
    /// Reply to `COORD`.
    Coordinates(Coordinates),
    /// Position report after a queued motion finishes.
    Position(Coordinates),
    /// Command accepted into the queue.
    Queued(&'a str),
    /// Command discarded, queue full.
    QueueFull,
    /// Queued command taken up for execution.
    Executing(&'a str),
    /// `CALIB` done.
    Calibrated,
    /// `AUTOCALIB` started.
    HomingStarted,
    /// Limit switch hit; rebound started.
    SwitchFound(Axis),
    /// Rebound finished; axis at zero.
    ReboundFinished(Axis),
    /// All homed axes done.
    HomingFinished,
    /// `HOME` started.
    ReturningHome,
    /// `UP`/`DOWN` started.
    Magnet(MagnetLift, Millimeters),
    /// `MOVE`/`WARP` started, with the machine target.
    LinearMove(SpeedMode, Millimeters, Millimeters),
    /// `MOVE`/`WARP` to where the carriage already is.
    AlreadyAtTarget,
    /// Command not understood.
    Unknown(&'a str),
    /// Queued command that finished without motion.
    CompletedImmediately,
    /// Queued command whose motion finished.
    Finished(&'a str),
}

impl fmt::Display for Response<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ready => write!(f, "Robot System Ready (CALIB/HOME/ON+/OFF/MOVE/COORD)"),
            Response::Jogging(axis, direction) => {
                let sign = match direction {
                    Direction::Positive => '+',
                    Direction::Negative => '-',
                };
                write!(f, "{}-Motor ON{}", axis.name(), sign)
            }
            Response::Stopping(target, at) => {
                match target {
                    StopTarget::All => write!(f, "All ")?,
                    StopTarget::Axis(axis) => write!(f, "{}-", axis.name())?,
                }
                write!(
                    f,
                    "Motor OFF (Decelerating): ({:.2},{:.2},{:.2})",
                    at.x.value(),
                    at.y.value(),
                    at.z.value()
                )
            }
            Response::Coordinates(at) => write!(
                f,
                "COORD X:{:.2}, Y:{:.2}, Z:{:.2}",
                at.x.value(),
                at.y.value(),
                at.z.value()
            ),
            Response::Position(at) => write!(
                f,
                "COORD Z:{:.2}, X:{:.2}, Y:{:.2}",
                at.z.value(),
                at.x.value(),
                at.y.value()
            ),
            Response::Queued(text) => write!(f, "Command queued: {}", text),
            Response::QueueFull => write!(f, "Error: Command queue is full. Command rejected."),
            Response::Executing(text) => write!(f, "Executing: {}", text),
            Response::Calibrated => write!(f, "CALIB: All Motor Positions Reset (0 steps)"),
            Response::HomingStarted => write!(
                f,
                "AUTOCALIB START: Moving X and Y axes simultaneously to find limit switches."
            ),
            Response::SwitchFound(axis) => {
                write!(f, "{} axis HOMED (Started REBOUND move to 0).", axis.name())
            }
            Response::ReboundFinished(axis) => write!(
                f,
                "{} axis REBOUND finished. Position confirmed at 0.",
                axis.name()
            ),
            Response::HomingFinished => {
                write!(f, "AUTOCALIB finished successfully. Restoring motor speed.")
            }
            Response::ReturningHome => write!(f, "HOME: Moving to X=0, Y=0, Z=0 (Linear Move)"),
            Response::Magnet(lift, target) => write!(
                f,
                "Z-Magnet {}: Move to {:.2}mm",
                lift.keyword(),
                target.value()
            ),
            Response::LinearMove(mode, x, y) => write!(
                f,
                "{} (Linear Move) to X:{:.2}, Y:{:.2}",
                mode.keyword(),
                x.value(),
                y.value()
            ),
            Response::AlreadyAtTarget => write!(f, "Already at target."),
            Response::Unknown(text) => {
                write!(f, "Error: Unknown command or invalid format: {}", text)
            }
            Response::CompletedImmediately => write!(f, "Command completed immediately."),
            Response::Finished(text) => write!(f, "Command finished: {}", text),
        }
    }
}

/// Write one response line to `out`.
///
/// The host link is best-effort: a sink that refuses the line loses it.
pub fn emit<W: fmt::Write>(out: &mut W, response: Response<'_>) {
    let _ = writeln!(out, "{}", response);
}
