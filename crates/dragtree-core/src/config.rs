//! Resolver configuration.
//!
//! Stored as JSON; every field is optional and falls back to its default.

use crate::keyboard::KeyboardCodes;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default horizontal distance between two indentation levels.
pub const DEFAULT_INDENTATION_WIDTH: f64 = 50.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid indentation width: {0}")]
    InvalidIndentation(f64),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for keyboard-driven tree dragging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Horizontal step per depth level, also used as the keyboard step.
    pub indentation_width: f64,
    /// Origin of the host's drag coordinate system, subtracted from jump
    /// targets.
    pub coordinate_origin: Vec2,
    /// Keys that start, end and cancel a keyboard drag.
    pub keyboard_codes: KeyboardCodes,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            indentation_width: DEFAULT_INDENTATION_WIDTH,
            coordinate_origin: Vec2::ZERO,
            keyboard_codes: KeyboardCodes::default(),
        }
    }
}

impl ResolverConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_json(&json)?;
        log::debug!(
            "Loaded resolver config from {} (indentation width {})",
            path.display(),
            config.indentation_width
        );
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !self.indentation_width.is_finite() || self.indentation_width <= 0.0 {
            return Err(ConfigError::InvalidIndentation(self.indentation_width));
        }
        Ok(())
    }
}
