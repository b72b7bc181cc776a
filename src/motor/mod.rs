//! Motor module for gantry-motion.
//!
//! Provides the per-axis trapezoidal step generator, the pin-level step
//! outputs it drives, and position tracking.

mod actuator;
mod axis;
pub mod output;
mod position;

pub use actuator::{Actuator, AxisActuator, JOG_REACH_STEPS};
pub use axis::Axis;
pub use output::{FullFourWire, NoOutput, StepDir, StepOutput};
pub use position::Position;
