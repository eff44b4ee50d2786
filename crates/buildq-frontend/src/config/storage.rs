//! Persisted key/value settings
//!
//! The host keeps add-in parameters under [`PARAM_ROOT`]. Only the two grid
//! values live there. Missing or unreadable values fall back to the
//! built-in defaults.

use std::collections::HashMap;

use buildq_cad::{DEFAULT_GRID_EXTENT, DEFAULT_GRID_SPACING, GridSettings};
use thiserror::Error;

use super::{ConfigManager, SharedConfig};

/// Parameter namespace of the add-in
pub const PARAM_ROOT: &str = "User parameter:Plugins/buildQ";

/// Key of the grid spacing value
pub const GRID_SPACING_KEY: &str = "GridSpacing";

/// Key of the grid half-extent value
pub const GRID_EXTENT_KEY: &str = "GridExtent";

/// Settings storage errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("Settings storage unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: f64 },

    #[error("Unknown settings key: {0}")]
    UnknownKey(String),
}

/// Float parameters stored by the host
pub trait SettingsStorage {
    /// Read a value; `Ok(None)` when the key was never written
    fn get_float(&self, key: &str) -> Result<Option<f64>, SettingsError>;

    /// Write a value
    fn set_float(&mut self, key: &str, value: f64) -> Result<(), SettingsError>;

    /// Persist pending writes
    fn flush(&mut self) -> Result<(), SettingsError> {
        Ok(())
    }
}

fn check_value(key: &str, value: f64) -> Result<f64, SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SettingsError::InvalidValue {
            key: key.to_string(),
            value,
        })
    }
}

impl SettingsStorage for ConfigManager {
    fn get_float(&self, key: &str) -> Result<Option<f64>, SettingsError> {
        let grid = &self.config().grid;
        match key {
            GRID_SPACING_KEY => Ok(Some(grid.spacing)),
            GRID_EXTENT_KEY => Ok(Some(grid.extent)),
            _ => Err(SettingsError::UnknownKey(key.to_string())),
        }
    }

    fn set_float(&mut self, key: &str, value: f64) -> Result<(), SettingsError> {
        let value = check_value(key, value)?;
        match key {
            GRID_SPACING_KEY => self.config_mut().grid.spacing = value,
            GRID_EXTENT_KEY => self.config_mut().grid.extent = value,
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SettingsError> {
        self.save()
            .map_err(|e| SettingsError::Unavailable(e.to_string()))
    }
}

impl SettingsStorage for SharedConfig {
    fn get_float(&self, key: &str) -> Result<Option<f64>, SettingsError> {
        self.read().get_float(key)
    }

    fn set_float(&mut self, key: &str, value: f64) -> Result<(), SettingsError> {
        self.write().set_float(key, value)
    }

    fn flush(&mut self) -> Result<(), SettingsError> {
        self.write().flush()
    }
}

/// In-memory parameter group
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, f64>,
    unavailable: bool,
    /// Number of successful flushes
    pub flushes: usize,
}

impl MemoryStorage {
    /// Create an empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose every access fails
    pub fn failing() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    fn check_available(&self) -> Result<(), SettingsError> {
        if self.unavailable {
            Err(SettingsError::Unavailable(PARAM_ROOT.to_string()))
        } else {
            Ok(())
        }
    }
}

impl SettingsStorage for MemoryStorage {
    fn get_float(&self, key: &str) -> Result<Option<f64>, SettingsError> {
        self.check_available()?;
        Ok(self.values.get(key).copied())
    }

    fn set_float(&mut self, key: &str, value: f64) -> Result<(), SettingsError> {
        self.check_available()?;
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SettingsError> {
        self.check_available()?;
        self.flushes += 1;
        Ok(())
    }
}

fn read_value(storage: &dyn SettingsStorage, key: &str, default: f64) -> f64 {
    match storage.get_float(key) {
        Ok(Some(value)) if value.is_finite() && value > 0.0 => value,
        Ok(Some(value)) => {
            tracing::warn!("Ignoring invalid {} = {}, using {}", key, value, default);
            default
        }
        Ok(None) => default,
        Err(e) => {
            tracing::warn!("Could not read {}: {}", key, e);
            default
        }
    }
}

/// Current grid settings, falling back to the defaults per value
pub fn read_grid_settings(storage: Option<&dyn SettingsStorage>) -> GridSettings {
    let Some(storage) = storage else {
        tracing::debug!("No settings storage, using default grid");
        return GridSettings::default();
    };

    GridSettings {
        spacing: read_value(storage, GRID_SPACING_KEY, DEFAULT_GRID_SPACING),
        extent: read_value(storage, GRID_EXTENT_KEY, DEFAULT_GRID_EXTENT),
    }
}

/// Store both grid values; without storage this does nothing
pub fn write_grid_settings(
    storage: Option<&mut dyn SettingsStorage>,
    settings: &GridSettings,
) -> Result<(), SettingsError> {
    let Some(storage) = storage else {
        tracing::debug!("No settings storage, grid settings not saved");
        return Ok(());
    };

    storage.set_float(GRID_SPACING_KEY, settings.spacing)?;
    storage.set_float(GRID_EXTENT_KEY, settings.extent)?;
    storage.flush()
}
