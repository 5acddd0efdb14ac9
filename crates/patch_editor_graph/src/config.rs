// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor configuration stored as RON.
//!
//! Every field has a default, so a config file only needs the values it
//! overrides.

use crate::interaction::InteractionConfig;
use crate::layout::LayoutConfig;
use crate::render::PatchStyle;
use crate::viewport::ZoomLimits;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading or saving a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the file failed
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid RON for [`EditorConfig`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// Serialization failed
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
    /// Parsed, but holds values the editor cannot use
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything tunable about the editor canvas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Node and port geometry
    pub layout: LayoutConfig,
    /// Colours and sizes
    pub style: PatchStyle,
    /// Zoom clamp
    pub zoom: ZoomLimits,
    /// Pointer interaction tuning
    pub interaction: InteractionConfig,
}

impl EditorConfig {
    /// Parse a RON document
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot: zoom limits must satisfy `0 < min <= max`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.zoom.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "zoom limits must satisfy 0 < min <= max, got min {} max {}",
                self.zoom.min, self.zoom.max
            )));
        }
        Ok(())
    }

    /// Serialize as pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron(&content)?;
        tracing::debug!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Write as a RON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron()?)?;
        tracing::debug!("Saved editor config to {}", path.display());
        Ok(())
    }
}
