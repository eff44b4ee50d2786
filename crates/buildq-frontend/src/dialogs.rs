//! Grid settings dialog model
//!
//! Holds the two edit fields of the modal dialog. Values are clamped and
//! rounded the way the spin boxes would display them.

use buildq_cad::{GridSettings, HostDocument};

use crate::config::{SettingsError, SettingsStorage, read_grid_settings, write_grid_settings};

/// Range, precision and unit of one numeric field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub decimals: u32,
    pub suffix: &'static str,
}

impl FieldSpec {
    /// Clamp into range and round to the field precision
    pub fn normalize(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.min;
        }
        let scale = 10f64.powi(self.decimals as i32);
        ((value.clamp(self.min, self.max) * scale).round() / scale).clamp(self.min, self.max)
    }
}

/// Grid spacing field
pub const SPACING_FIELD: FieldSpec = FieldSpec {
    label: "Grid spacing",
    min: 1.0,
    max: 100_000.0,
    decimals: 2,
    suffix: "mm",
};

/// Grid half-extent field
pub const EXTENT_FIELD: FieldSpec = FieldSpec {
    label: "Grid half-extent",
    min: 10.0,
    max: 100_000.0,
    decimals: 1,
    suffix: "mm",
};

/// Edit state of the grid settings dialog
#[derive(Debug, Clone, PartialEq)]
pub struct GridSettingsDialog {
    spacing: f64,
    extent: f64,
}

impl GridSettingsDialog {
    /// Open the dialog with the stored values.
    ///
    /// Fails when the host has no settings storage.
    pub fn open(storage: Option<&dyn SettingsStorage>) -> Result<Self, SettingsError> {
        let Some(storage) = storage else {
            tracing::warn!("Grid settings: drafting storage is unavailable");
            return Err(SettingsError::Unavailable("no settings storage".into()));
        };

        let current = read_grid_settings(Some(storage));
        Ok(Self {
            spacing: SPACING_FIELD.normalize(current.spacing),
            extent: EXTENT_FIELD.normalize(current.extent),
        })
    }

    /// Edit the spacing field
    pub fn set_spacing(&mut self, value: f64) {
        self.spacing = SPACING_FIELD.normalize(value);
    }

    /// Edit the half-extent field
    pub fn set_extent(&mut self, value: f64) {
        self.extent = EXTENT_FIELD.normalize(value);
    }

    /// Values currently shown
    pub fn values(&self) -> GridSettings {
        GridSettings {
            spacing: self.spacing,
            extent: self.extent,
        }
    }

    /// Store the values and recompute the document
    pub fn accept(
        self,
        storage: &mut dyn SettingsStorage,
        document: Option<&mut dyn HostDocument>,
    ) -> Result<GridSettings, SettingsError> {
        let settings = self.values();
        write_grid_settings(Some(storage), &settings)?;
        tracing::info!(
            "Grid settings saved: spacing {} mm, extent {} mm",
            settings.spacing,
            settings.extent
        );

        if let Some(document) = document {
            document.recompute();
        }
        Ok(settings)
    }
}
