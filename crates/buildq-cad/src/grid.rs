//! Square construction grid
//!
//! The grid is centred on the origin, `extent` is the half-size, and lines
//! are placed every `spacing` units along both plan axes.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Point;
use crate::shape::{Shape, Wire};

/// Default distance between grid lines
pub const DEFAULT_GRID_SPACING: f64 = 100.0;

/// Default grid half-extent
pub const DEFAULT_GRID_EXTENT: f64 = 2000.0;

/// Name of the document object that marks the snap grid
pub const GRID_OBJECT_NAME: &str = "BuildQ_Grid";

/// Upper bound on generated lines per direction
pub const MAX_GRID_LINES: usize = 10_000;

/// Grid errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("Invalid grid spacing: {0}")]
    InvalidSpacing(f64),

    #[error("Invalid grid extent: {0}")]
    InvalidExtent(f64),

    #[error("Grid would need {0} lines per direction")]
    TooManyLines(usize),
}

/// Result type for grid operations
pub type GridResult<T> = Result<T, GridError>;

/// Grid spacing and extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    /// Distance between lines
    pub spacing: f64,
    /// Half-size of the grid
    pub extent: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_GRID_SPACING,
            extent: DEFAULT_GRID_EXTENT,
        }
    }
}

impl GridSettings {
    /// Create validated grid settings
    pub fn new(spacing: f64, extent: f64) -> GridResult<Self> {
        let settings = Self { spacing, extent };
        settings.validate()?;
        Ok(settings)
    }

    /// Check that spacing and extent are positive and finite
    pub fn validate(&self) -> GridResult<()> {
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(GridError::InvalidSpacing(self.spacing));
        }
        if !(self.extent.is_finite() && self.extent > 0.0) {
            return Err(GridError::InvalidExtent(self.extent));
        }
        Ok(())
    }

    /// Number of lines on each side of the origin
    pub fn half_line_count(&self) -> GridResult<usize> {
        self.validate()?;
        let n = (self.extent / self.spacing).floor();
        if n > MAX_GRID_LINES as f64 {
            let total = (n * 2.0 + 1.0).min(usize::MAX as f64) as usize;
            return Err(GridError::TooManyLines(total));
        }
        Ok(n as usize)
    }

    /// Nearest grid intersection to a planar point
    pub fn nearest_intersection(&self, uv: DVec2) -> DVec2 {
        (uv / self.spacing).round() * self.spacing
    }
}

/// Line segments of the grid at height `z`.
///
/// Lines parallel to Y come first, then lines parallel to X.
pub fn grid_lines(settings: &GridSettings, z: f64) -> GridResult<Vec<(Point, Point)>> {
    let n = settings.half_line_count()? as i64;
    let extent = settings.extent;
    let mut lines = Vec::with_capacity((2 * n as usize + 1) * 2);

    for i in -n..=n {
        let x = i as f64 * settings.spacing;
        lines.push((DVec3::new(x, -extent, z), DVec3::new(x, extent, z)));
    }
    for j in -n..=n {
        let y = j as f64 * settings.spacing;
        lines.push((DVec3::new(-extent, y, z), DVec3::new(extent, y, z)));
    }

    Ok(lines)
}

/// Compound of line wires forming the grid
pub fn make_grid_shape(settings: &GridSettings, z: f64) -> GridResult<Shape> {
    let wires = grid_lines(settings, z)?
        .into_iter()
        .filter_map(|(a, b)| Wire::line(a, b))
        .map(Shape::Wire)
        .collect();
    Ok(Shape::compound(wires))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = GridSettings::default();
        assert_eq!(settings.spacing, 100.0);
        assert_eq!(settings.extent, 2000.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_settings() {
        assert_eq!(
            GridSettings::new(0.0, 100.0).unwrap_err(),
            GridError::InvalidSpacing(0.0)
        );
        assert_eq!(
            GridSettings::new(10.0, -1.0).unwrap_err(),
            GridError::InvalidExtent(-1.0)
        );
        assert!(matches!(
            GridSettings::new(1e-6, 1e6).unwrap().half_line_count(),
            Err(GridError::TooManyLines(_))
        ));
    }

    #[test]
    fn test_extreme_settings_do_not_overflow() {
        let settings = GridSettings::new(1e-10, 1e10).unwrap();
        assert_eq!(
            settings.half_line_count().unwrap_err(),
            GridError::TooManyLines(usize::MAX)
        );

        let settings = GridSettings::new(f64::MIN_POSITIVE, f64::MAX).unwrap();
        assert!(matches!(
            grid_lines(&settings, 0.0),
            Err(GridError::TooManyLines(_))
        ));
    }

    #[test]
    fn test_nearest_intersection() {
        let settings = GridSettings::default();
        assert_eq!(
            settings.nearest_intersection(DVec2::new(146.0, 83.0)),
            DVec2::new(100.0, 100.0)
        );
        assert_eq!(
            settings.nearest_intersection(DVec2::new(-151.0, 49.0)),
            DVec2::new(-200.0, 0.0)
        );
    }

    #[test]
    fn test_grid_lines() {
        let settings = GridSettings::new(100.0, 250.0).unwrap();
        let lines = grid_lines(&settings, 0.0).unwrap();

        // n = 2 -> 5 lines in each direction
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0].0, DVec3::new(-200.0, -250.0, 0.0));
        assert_eq!(lines[0].1, DVec3::new(-200.0, 250.0, 0.0));
        assert_eq!(lines[9].0, DVec3::new(-250.0, 200.0, 0.0));
    }

    #[test]
    fn test_grid_shape() {
        let shape = make_grid_shape(&GridSettings::default(), 0.0).unwrap();
        assert_eq!(shape.wires().len(), 82);
        let (min, max) = shape.bounds().unwrap();
        assert_eq!(min, DVec3::new(-2000.0, -2000.0, 0.0));
        assert_eq!(max, DVec3::new(2000.0, 2000.0, 0.0));
    }
}
