//! Session configuration.

use crate::hex::Orientation;
use crate::input::DEFAULT_MOVE_THRESHOLD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a [`SessionConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("hex radius must be finite and positive, got {0}")]
    InvalidRadius(f64),

    #[error("move threshold must be finite and non-negative, got {0}")]
    InvalidThreshold(f64),

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Board layout and input tuning for one game session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub orientation: Orientation,
    /// Center-to-corner size of a cell
    pub hex_radius: f64,
    /// Screen distance a press must travel to become a drag
    pub move_threshold: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::PointyTop,
            hex_radius: 1.0,
            move_threshold: DEFAULT_MOVE_THRESHOLD,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.hex_radius.is_finite() || self.hex_radius <= 0.0 {
            return Err(ConfigError::InvalidRadius(self.hex_radius));
        }
        if !self.move_threshold.is_finite() || self.move_threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.move_threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::from_json("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = SessionConfig::from_json(r#"{"orientation":"FlatTop","hex_radius":2.5}"#).unwrap();
        assert_eq!(config.orientation, Orientation::FlatTop);
        assert_eq!(config.hex_radius, 2.5);
        assert_eq!(config.move_threshold, DEFAULT_MOVE_THRESHOLD);
    }

    #[test]
    fn test_rejects_bad_radius() {
        assert!(matches!(
            SessionConfig::from_json(r#"{"hex_radius":0.0}"#),
            Err(ConfigError::InvalidRadius(_))
        ));
        assert!(matches!(
            SessionConfig::from_json(r#"{"hex_radius":-1.0}"#),
            Err(ConfigError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let config = SessionConfig {
            move_threshold: f64::NAN,
            ..SessionConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidThreshold(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            SessionConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
