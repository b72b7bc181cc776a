//! # gantry-motion
//!
//! Queued three-axis motion control for an electromagnet chess gantry, with
//! embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Non-blocking**: everything advances from a single `tick(now_us)` call
//! - **Trapezoidal ramps**: per-axis acceleration-limited step generation
//! - **Coordinated moves**: X and Y start and finish together on a straight line
//! - **Bounded command queue**: queued commands run strictly in order
//! - **Limit-switch homing**: concurrent X/Y search and rebound
//! - **no_std compatible**: core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gantry_motion::{ActiveLowSwitch, FullFourWire, GantryBuilder, StepDir};
//!
//! let config = gantry_motion::load_config("gantry.toml")?;
//!
//! let mut gantry = GantryBuilder::new()
//!     .config(config)
//!     .z_output(FullFourWire::new(a, b, c, d))
//!     .x_output(StepDir::new(x_step, x_dir))
//!     .y_output(StepDir::new(y_step, y_dir))
//!     .x_switch(ActiveLowSwitch::new(x_limit))
//!     .y_switch(ActiveLowSwitch::new(y_limit))
//!     .build()?;
//!
//! gantry.begin(&mut serial);
//! gantry.process_command("AUTOCALIB", &mut serial)?;
//! gantry.process_command("WARP(40,10)", &mut serial)?;
//!
//! loop {
//!     gantry.tick(clock.now_us(), &mut serial)?;
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Must come first so the logging macros are visible to every module
mod fmt;

// Core modules
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod homing;
pub mod motion;
pub mod motor;

// Re-exports for ergonomic API
pub use command::{Command, CommandParser, CommandQueue, Coordinates, Response};
pub use config::{validate_config, GantryConfig};
pub use controller::{Dispatch, ExecutionState, Gantry, GantryBuilder, GantryController};
pub use error::{Error, Result};
pub use homing::{ActiveLowSwitch, HomingPhase, HomingStateMachine, LimitSwitch};
pub use motion::{move_linear, Direction, MotionPhase, SpeedMode};
pub use motor::{Actuator, Axis, AxisActuator, FullFourWire, NoOutput, StepDir, StepOutput};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Millimeters, Steps, StepsPerSec, StepsPerSecSquared};
