//! Builder for GantryController.

use crate::config::{validate_config, GantryConfig};
use crate::error::{ConfigError, Error, Result};
use crate::homing::LimitSwitch;
use crate::motor::{Axis, AxisActuator, StepOutput};

use super::gantry::GantryController;

/// Controller with the built-in step generator on every axis.
pub type Gantry<ZO, XO, YO, S> = GantryController<AxisActuator<ZO>, AxisActuator<XO>, AxisActuator<YO>, S>;

/// Builder for creating [`GantryController`] instances from step outputs.
///
/// Each axis gets an [`AxisActuator`] configured from its `[axes.*]`
/// section. The configuration is validated on [`build`](Self::build).
pub struct GantryBuilder<ZO, XO, YO, S>
where
    ZO: StepOutput,
    XO: StepOutput,
    YO: StepOutput,
    S: LimitSwitch,
{
    config: GantryConfig,
    z_output: Option<ZO>,
    x_output: Option<XO>,
    y_output: Option<YO>,
    x_switch: Option<S>,
    y_switch: Option<S>,
}

impl<ZO, XO, YO, S> Default for GantryBuilder<ZO, XO, YO, S>
where
    ZO: StepOutput,
    XO: StepOutput,
    YO: StepOutput,
    S: LimitSwitch,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<ZO, XO, YO, S> GantryBuilder<ZO, XO, YO, S>
where
    ZO: StepOutput,
    XO: StepOutput,
    YO: StepOutput,
    S: LimitSwitch,
{
    /// Create a new builder with the stock machine configuration.
    pub fn new() -> Self {
        Self {
            config: GantryConfig::default(),
            z_output: None,
            x_output: None,
            y_output: None,
            x_switch: None,
            y_switch: None,
        }
    }

    /// Use a loaded configuration.
    pub fn config(mut self, config: GantryConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the Z (magnet lift) step output.
    pub fn z_output(mut self, output: ZO) -> Self {
        self.z_output = Some(output);
        self
    }

    /// Set the X step output.
    pub fn x_output(mut self, output: XO) -> Self {
        self.x_output = Some(output);
        self
    }

    /// Set the Y step output.
    pub fn y_output(mut self, output: YO) -> Self {
        self.y_output = Some(output);
        self
    }

    /// Set the X limit switch.
    pub fn x_switch(mut self, switch: S) -> Self {
        self.x_switch = Some(switch);
        self
    }

    /// Set the Y limit switch.
    pub fn y_switch(mut self, switch: S) -> Self {
        self.y_switch = Some(switch);
        self
    }

    /// Build the controller.
    ///
    /// # Errors
    ///
    /// Returns an error if an output or switch is missing or the
    /// configuration is invalid.
    pub fn build(self) -> Result<Gantry<ZO, XO, YO, S>> {
        validate_config(&self.config)?;

        let z_output = self.z_output.ok_or(Error::Config(ConfigError::Missing("z_output")))?;
        let x_output = self.x_output.ok_or(Error::Config(ConfigError::Missing("x_output")))?;
        let y_output = self.y_output.ok_or(Error::Config(ConfigError::Missing("y_output")))?;
        let x_switch = self.x_switch.ok_or(Error::Config(ConfigError::Missing("x_switch")))?;
        let y_switch = self.y_switch.ok_or(Error::Config(ConfigError::Missing("y_switch")))?;

        let z = AxisActuator::from_config(Axis::Z, &self.config.axes.z, z_output);
        let x = AxisActuator::from_config(Axis::X, &self.config.axes.x, x_output);
        let y = AxisActuator::from_config(Axis::Y, &self.config.axes.y, y_output);

        Ok(GantryController::new(self.config, z, x, y, x_switch, y_switch))
    }
}
