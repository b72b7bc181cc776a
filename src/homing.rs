//! Limit-switch homing.
//!
//! `AUTOCALIB` drives X and Y toward negative travel until each hits its
//! limit switch. On contact the axis halts, the contact point is redefined as
//! `-rebound_steps`, and the axis backs off to zero. Both axes home
//! concurrently and independently. There is no timeout: an axis whose switch
//! never triggers keeps searching.

use embedded_hal::digital::InputPin;

use crate::config::HomingConfig;
use crate::error::{MotorError, Result};
use crate::motor::{Actuator, Axis};

/// Contact sensor at the negative end of an axis.
pub trait LimitSwitch {
    /// Whether the carriage is pressing the switch.
    fn is_triggered(&mut self) -> Result<bool>;
}

/// Switch wired to ground with the input pulled up: low means contact.
#[derive(Debug)]
pub struct ActiveLowSwitch<P: InputPin> {
    pin: P,
}

impl<P: InputPin> ActiveLowSwitch<P> {
    /// Wrap an input pin.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Release the pin.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> LimitSwitch for ActiveLowSwitch<P> {
    fn is_triggered(&mut self) -> Result<bool> {
        Ok(self.pin.is_low().map_err(|_| MotorError::PinError)?)
    }
}

/// Progress of one axis through homing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingPhase {
    /// Moving toward the switch.
    Searching,
    /// Switch found; backing off to zero.
    Rebounding,
    /// At zero.
    Done,
}

/// Something worth reporting happened to an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingEvent {
    /// The switch triggered and the rebound started.
    SwitchFound(Axis),
    /// The rebound reached zero.
    ReboundFinished(Axis),
}

/// Concurrent X/Y homing.
#[derive(Debug, Clone, PartialEq)]
pub struct HomingStateMachine {
    config: HomingConfig,
    x: HomingPhase,
    y: HomingPhase,
}

impl HomingStateMachine {
    /// Start searching on both axes.
    pub fn start(config: &HomingConfig, x: &mut dyn Actuator, y: &mut dyn Actuator) -> Self {
        Self::search(config, x);
        Self::search(config, y);
        info!("homing: searching");

        Self {
            config: config.clone(),
            x: HomingPhase::Searching,
            y: HomingPhase::Searching,
        }
    }

    fn search(config: &HomingConfig, actuator: &mut dyn Actuator) {
        actuator.set_max_speed(config.search_speed.value());
        actuator.set_acceleration(config.search_acceleration.value());
        actuator.set_absolute_target(-config.search_steps);
    }

    /// Phase of a homed axis. Z is never homed and reports `Done`.
    pub fn phase(&self, axis: Axis) -> HomingPhase {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => HomingPhase::Done,
        }
    }

    fn phase_mut(&mut self, axis: Axis) -> Option<&mut HomingPhase> {
        match axis {
            Axis::X => Some(&mut self.x),
            Axis::Y => Some(&mut self.y),
            Axis::Z => None,
        }
    }

    /// Both axes at zero.
    pub fn is_done(&self) -> bool {
        Axis::HOMED
            .iter()
            .all(|&axis| self.phase(axis) == HomingPhase::Done)
    }

    /// Advance one axis. Call once per tick per homed axis.
    ///
    /// # Errors
    ///
    /// Propagates limit switch read failures.
    pub fn advance(
        &mut self,
        actuator: &mut dyn Actuator,
        switch: &mut dyn LimitSwitch,
    ) -> Result<Option<HomingEvent>> {
        let axis = actuator.axis();
        let rebound = self.config.rebound_steps;
        let rebound_speed = self.config.rebound_speed.value();
        let rebound_acceleration = self.config.rebound_acceleration.value();

        let Some(phase) = self.phase_mut(axis) else {
            return Ok(None);
        };

        match *phase {
            HomingPhase::Searching => {
                if !switch.is_triggered()? {
                    return Ok(None);
                }
                // Halt on contact; the contact point becomes -rebound.
                actuator.set_current_position(-rebound);
                actuator.set_max_speed(rebound_speed);
                actuator.set_acceleration(rebound_acceleration);
                actuator.set_absolute_target(0);
                *phase = HomingPhase::Rebounding;
                debug!("homing: {} switch found", axis);
                Ok(Some(HomingEvent::SwitchFound(axis)))
            }
            HomingPhase::Rebounding => {
                if actuator.distance_to_go() != 0 {
                    return Ok(None);
                }
                *phase = HomingPhase::Done;
                debug!("homing: {} at zero", axis);
                Ok(Some(HomingEvent::ReboundFinished(axis)))
            }
            HomingPhase::Done => Ok(None),
        }
    }
}
