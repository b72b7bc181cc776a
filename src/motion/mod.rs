//! Motion module for gantry-motion.
//!
//! Provides per-step ramp calculation and coordinated two-axis moves.

pub mod coordinated;
pub mod ramp;

pub use coordinated::{move_linear, AxisPlan, LinearMove, LinearOutcome, SpeedMode};
pub use ramp::{Direction, MotionPhase};
