//! Application configuration
//!
//! Settings for the wall tool and the grid, persisted as RON, plus the
//! key/value view of the grid values that the host parameter store exposes.

mod manager;
mod storage;

pub use manager::{ConfigError, ConfigManager, SharedConfig, create_shared_config};
pub use storage::{
    GRID_EXTENT_KEY, GRID_SPACING_KEY, MemoryStorage, PARAM_ROOT, SettingsError,
    SettingsStorage, read_grid_settings, write_grid_settings,
};

use buildq_cad::{DEFAULT_WALL_THICKNESS, GridSettings};
use serde::{Deserialize, Serialize};

use crate::snap::DEFAULT_SNAP_THRESHOLD;

/// Wall tool preferences
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ToolConfig {
    /// Thickness of newly drawn walls
    pub wall_thickness: f64,
    /// Maximum snap distance
    pub snap_threshold: f64,
    /// Out-of-plane coordinate of drawn points
    pub level: f64,
    /// Orthogonal lock state when the tool starts
    pub ortho_lock: bool,
    /// Smallest cursor marker size
    pub marker_min_size: f64,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            wall_thickness: DEFAULT_WALL_THICKNESS,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            level: 0.0,
            ortho_lock: true,
            marker_min_size: 5.0,
        }
    }
}

fn positive_or(field: &str, value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        tracing::warn!("Invalid {} {}, using default {}", field, value, default);
        default
    }
}

impl ToolConfig {
    /// Replace unusable values with their defaults, field by field
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            wall_thickness: positive_or(
                "wall_thickness",
                self.wall_thickness,
                defaults.wall_thickness,
            ),
            snap_threshold: positive_or(
                "snap_threshold",
                self.snap_threshold,
                defaults.snap_threshold,
            ),
            level: if self.level.is_finite() {
                self.level
            } else {
                tracing::warn!("Invalid level {}, using default {}", self.level, defaults.level);
                defaults.level
            },
            ortho_lock: self.ortho_lock,
            marker_min_size: positive_or(
                "marker_min_size",
                self.marker_min_size,
                defaults.marker_min_size,
            ),
        }
    }

    /// Size of the cursor marker cross
    pub fn marker_size(&self) -> f64 {
        self.marker_min_size.max(self.wall_thickness * 0.1)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: u32,
    /// Grid settings
    #[serde(default)]
    pub grid: GridSettings,
    /// Wall tool settings
    #[serde(default)]
    pub tool: ToolConfig,
}

impl AppConfig {
    /// Current configuration format version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a new default configuration
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            ..Default::default()
        }
    }

    /// Replace unusable tool and grid values with their defaults
    pub fn sanitized(self) -> Self {
        let defaults = GridSettings::default();
        Self {
            version: self.version,
            grid: GridSettings {
                spacing: positive_or("grid spacing", self.grid.spacing, defaults.spacing),
                extent: positive_or("grid extent", self.grid.extent, defaults.extent),
            },
            tool: self.tool.sanitized(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::new();
        assert_eq!(config.version, AppConfig::CURRENT_VERSION);
        assert_eq!(config.grid.spacing, 100.0);
        assert_eq!(config.grid.extent, 2000.0);
        assert_eq!(config.tool.wall_thickness, 90.0);
        assert!(config.tool.ortho_lock);
    }

    #[test]
    fn test_marker_size() {
        let mut tool = ToolConfig::default();
        assert_eq!(tool.marker_size(), 9.0);
        tool.wall_thickness = 20.0;
        assert_eq!(tool.marker_size(), 5.0);
    }

    #[test]
    fn test_invalid_values_fall_back_per_field() {
        let config: AppConfig = ron::from_str(
            "(tool: (wall_thickness: -90.0, snap_threshold: 8.0, level: 12.0, \
             ortho_lock: false, marker_min_size: 0.0), grid: (spacing: 0.0, extent: 500.0))",
        )
        .unwrap();
        let config = config.sanitized();

        assert_eq!(config.tool.wall_thickness, 90.0);
        assert_eq!(config.tool.snap_threshold, 8.0);
        assert_eq!(config.tool.level, 12.0);
        assert!(!config.tool.ortho_lock);
        assert_eq!(config.tool.marker_min_size, 5.0);
        assert_eq!(config.grid.spacing, 100.0);
        assert_eq!(config.grid.extent, 500.0);
        assert!(config.grid.validate().is_ok());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = ron::from_str("(version: 1, grid: (spacing: 250.0, extent: 500.0))")
            .unwrap();
        assert_eq!(config.grid.spacing, 250.0);
        assert_eq!(config.tool, ToolConfig::default());
    }
}
