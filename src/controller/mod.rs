//! Command dispatch and the motion tick loop.

mod builder;
mod gantry;

pub use builder::{Gantry, GantryBuilder};
pub use gantry::{Dispatch, ExecutionState, GantryController};
