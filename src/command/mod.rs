//! Command intake: grammar, bounded queue and response lines.

pub mod parser;
pub mod queue;
pub mod response;

pub use parser::{Command, CommandParser, MagnetLift, StopTarget};
pub use queue::{CommandQueue, CommandText, COMMAND_TEXT_LEN, DEFAULT_SLOTS};
pub use response::{emit, Coordinates, Response};
