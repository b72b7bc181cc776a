//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::GantryConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
///
/// ```rust,ignore
/// use gantry_motion::load_config;
///
/// let config = load_config("gantry.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<GantryConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = crate::error::truncated(e.to_string().as_str());
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<GantryConfig> {
    let config: GantryConfig = toml::from_str(content).map_err(|e| {
        let msg = crate::error::truncated(e.message());
        Error::Config(ConfigError::ParseError(msg))
    })?;

    super::validation::validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::{Millimeters, StepsPerSec};

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, GantryConfig::default());
    }

    #[test]
    fn test_parse_axis_override() {
        let toml = r#"
[axes.x]
steps_per_mm = 40.0
max_speed_steps_per_sec = 4000.0
acceleration_steps_per_sec2 = 8000.0
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.axes.x.steps_per_mm, 40.0);
        assert_eq!(config.axes.x.max_speed, StepsPerSec(4000.0));
        assert!(!config.axes.x.invert_direction);
        // untouched sections keep stock values
        assert!(config.axes.y.invert_direction);
        assert_eq!(config.axes.z.steps_per_mm, 60.0);
    }

    #[test]
    fn test_parse_board_and_magnet() {
        let toml = r#"
[board]
origin_x_mm = 25.0
origin_y_mm = 12.5

[magnet]
up_mm = 20.0
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.board.origin_x_mm, Millimeters(25.0));
        assert_eq!(config.board.origin_y_mm, Millimeters(12.5));
        assert_eq!(config.magnet.up_mm, Millimeters(20.0));
        assert_eq!(config.magnet.down_mm, Millimeters(0.0));
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        let toml = r#"
[motion]
warp_factor = 0.0
"#;

        assert!(matches!(
            parse_config(toml),
            Err(Error::Config(ConfigError::InvalidSpeedFactor(_)))
        ));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let result = parse_config("[axes.x]\nsteps_per_mm = \"fast\"\n");
        assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
    }
}
