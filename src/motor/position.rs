//! Position tracking for axis actuators.
//!
//! Provides absolute position tracking in steps with millimeter conversions.

use crate::config::units::{Millimeters, Steps};

/// Axis position tracker.
///
/// Maintains absolute position in steps and provides unit conversions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Position {
    /// Current position in steps (from origin)
    steps: Steps,
    /// Steps per millimeter for conversions
    steps_per_mm: f32,
}

impl Position {
    /// Create a new position tracker at the origin.
    #[inline]
    pub fn new(steps_per_mm: f32) -> Self {
        Self {
            steps: Steps::default(),
            steps_per_mm,
        }
    }

    /// Get current position in steps.
    #[inline]
    pub fn steps(&self) -> Steps {
        self.steps
    }

    /// Get current position in millimeters.
    #[inline]
    pub fn mm(&self) -> Millimeters {
        self.steps.to_mm(self.steps_per_mm)
    }

    /// Redefine the current position without moving.
    #[inline]
    pub fn set_steps(&mut self, steps: Steps) {
        self.steps = steps;
    }

    /// Move by a number of steps.
    #[inline]
    pub fn move_steps(&mut self, delta: i64) {
        self.steps = Steps(self.steps.0 + delta);
    }
}
