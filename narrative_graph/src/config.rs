//! Editor configuration.
//!
//! The host hands over a TOML string; missing keys fall back to defaults.
//!
//! ```toml
//! history_capacity = 100
//! duplicate_offset = { x = 40.0, y = 40.0 }
//!
//! [layout]
//! node_width = 240.0
//!
//! [quick_add]
//! item_height = 28.0
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::graph::Position;
use crate::history::DEFAULT_HISTORY_CAPACITY;

/// Node and port geometry in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub header_height: f64,
    /// Vertical distance between port rows.
    pub port_spacing: f64,
    /// Body area below the port rows reserved for content lines.
    pub content_height: f64,
    /// Pointer hit radius of a port.
    pub port_radius: f64,
    /// Pointer hit distance to a connection curve.
    pub connection_tolerance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 200.0,
            header_height: 28.0,
            port_spacing: 24.0,
            content_height: 48.0,
            port_radius: 7.0,
            connection_tolerance: 6.0,
        }
    }
}

/// Quick-add popup geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickAddConfig {
    pub width: f64,
    pub item_height: f64,
}

impl Default for QuickAddConfig {
    fn default() -> Self {
        Self {
            width: 160.0,
            item_height: 24.0,
        }
    }
}

/// Configuration of an [`Editor`](crate::Editor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of undo steps kept.
    pub history_capacity: usize,

    /// Offset applied to duplicated nodes.
    pub duplicate_offset: Position,

    pub layout: LayoutConfig,

    pub quick_add: QuickAddConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            duplicate_offset: Position::new(30.0, 30.0),
            layout: LayoutConfig::default(),
            quick_add: QuickAddConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the editor cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid(
                "history_capacity must be at least 1".to_string(),
            ));
        }

        let geometry = [
            ("layout.node_width", self.layout.node_width),
            ("layout.header_height", self.layout.header_height),
            ("layout.port_spacing", self.layout.port_spacing),
            ("layout.content_height", self.layout.content_height),
            ("layout.port_radius", self.layout.port_radius),
            ("layout.connection_tolerance", self.layout.connection_tolerance),
            ("quick_add.width", self.quick_add.width),
            ("quick_add.item_height", self.quick_add.item_height),
        ];
        for (key, value) in geometry {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be positive, got {}",
                    key, value
                )));
            }
        }
        Ok(())
    }
}
