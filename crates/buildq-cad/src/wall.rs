//! Parametric wall entity
//!
//! A wall is a straight segment with a thickness. Its plan shape is the
//! centreline offset by half the thickness on either side, stored as a
//! compound of the filled face and its boundary wire so both stay visible
//! and selectable.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::geometry::Point;
use crate::shape::{Face, Shape, Wire};

/// Default wall thickness in document units (mm)
pub const DEFAULT_WALL_THICKNESS: f64 = 90.0;

/// Wall parameter errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WallError {
    #[error("Invalid wall thickness: {0}")]
    InvalidThickness(f64),

    #[error("Invalid wall point: {0}")]
    InvalidPoint(DVec3),
}

/// Result type for wall operations
pub type WallResult<T> = Result<T, WallError>;

fn validate_thickness(thickness: f64) -> WallResult<f64> {
    if thickness.is_finite() && thickness > 0.0 {
        Ok(thickness)
    } else {
        Err(WallError::InvalidThickness(thickness))
    }
}

fn validate_point(point: Point) -> WallResult<Point> {
    if point.is_finite() {
        Ok(point)
    } else {
        Err(WallError::InvalidPoint(point))
    }
}

/// In-plane unit normal to a wall direction.
///
/// Plan walls use the Z-up perpendicular; vertical walls fall back to the
/// perpendicular around the Y axis.
fn wall_normal(direction: DVec3) -> DVec3 {
    let plan = DVec3::new(-direction.y, direction.x, 0.0);
    if plan.length_squared() > 1e-24 {
        plan.normalize()
    } else {
        DVec3::Y.cross(direction).normalize()
    }
}

/// Closed outline of a wall: `start+o, end+o, end-o, start-o, start+o`.
///
/// Returns None for zero-length walls or invalid thickness.
pub fn wall_outline(start: Point, end: Point, thickness: f64) -> Option<[Point; 5]> {
    let direction = end - start;
    let length = direction.length();
    if length == 0.0 || !length.is_finite() || validate_thickness(thickness).is_err() {
        return None;
    }

    let direction = direction / length;
    let offset = wall_normal(direction) * (thickness / 2.0);

    Some([
        start + offset,
        end + offset,
        end - offset,
        start - offset,
        start + offset,
    ])
}

/// Build the plan shape of a wall.
///
/// Degenerate input produces `Shape::Empty`. Otherwise the result is a
/// compound of the face and the outline wire.
pub fn make_wall_shape(start: Point, end: Point, thickness: f64) -> Shape {
    let Some(outline) = wall_outline(start, end, thickness) else {
        return Shape::Empty;
    };

    let Some(wire) = Wire::polygon(outline.to_vec()) else {
        return Shape::Empty;
    };

    match Face::from_wire(wire.clone()) {
        Some(face) => Shape::Compound(vec![Shape::Face(face), Shape::Wire(wire)]),
        None => Shape::Wire(wire),
    }
}

/// A persistent parametric wall.
///
/// Only the parameters are stored; loading validates them and derives the
/// shape again.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "WallRecord")]
pub struct WallEntity {
    /// Unique identifier
    pub id: Uuid,
    /// Start of the centreline
    start: Point,
    /// End of the centreline
    end: Point,
    /// Wall thickness (always positive)
    thickness: f64,
    /// Show 2D framing detail
    #[serde(default = "default_show_2d_detail")]
    pub show_2d_detail: bool,
    /// Derived plan shape (not serialized)
    #[serde(skip)]
    shape: Shape,
}

fn default_show_2d_detail() -> bool {
    true
}

/// Stored parameters of a wall
#[derive(Deserialize)]
struct WallRecord {
    id: Uuid,
    start: Point,
    end: Point,
    thickness: f64,
    #[serde(default = "default_show_2d_detail")]
    show_2d_detail: bool,
}

impl TryFrom<WallRecord> for WallEntity {
    type Error = WallError;

    fn try_from(record: WallRecord) -> WallResult<Self> {
        let mut wall = Self {
            id: record.id,
            start: validate_point(record.start)?,
            end: validate_point(record.end)?,
            thickness: validate_thickness(record.thickness)?,
            show_2d_detail: record.show_2d_detail,
            shape: Shape::Empty,
        };
        wall.execute();
        Ok(wall)
    }
}

impl WallEntity {
    /// Create a wall and derive its shape
    pub fn new(start: Point, end: Point, thickness: f64) -> WallResult<Self> {
        let mut wall = Self {
            id: Uuid::new_v4(),
            start: validate_point(start)?,
            end: validate_point(end)?,
            thickness: validate_thickness(thickness)?,
            show_2d_detail: true,
            shape: Shape::Empty,
        };
        wall.execute();
        Ok(wall)
    }

    /// Create a wall with the default thickness
    pub fn with_default_thickness(start: Point, end: Point) -> WallResult<Self> {
        Self::new(start, end, DEFAULT_WALL_THICKNESS)
    }

    /// Start point
    pub fn start(&self) -> Point {
        self.start
    }

    /// End point
    pub fn end(&self) -> Point {
        self.end
    }

    /// Thickness
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Centreline length
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Derived plan shape
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Move the start point (recomputes the shape)
    pub fn set_start(&mut self, start: Point) -> WallResult<()> {
        self.start = validate_point(start)?;
        self.execute();
        Ok(())
    }

    /// Move the end point (recomputes the shape)
    pub fn set_end(&mut self, end: Point) -> WallResult<()> {
        self.end = validate_point(end)?;
        self.execute();
        Ok(())
    }

    /// Change the thickness (recomputes the shape)
    pub fn set_thickness(&mut self, thickness: f64) -> WallResult<()> {
        self.thickness = validate_thickness(thickness)?;
        self.execute();
        Ok(())
    }

    /// Re-derive the shape from start, end and thickness
    pub fn execute(&mut self) {
        self.shape = make_wall_shape(self.start, self.end, self.thickness);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_outline_is_closed_rectangle() {
        let start = DVec3::new(0.0, 0.0, 0.0);
        let end = DVec3::new(1000.0, 0.0, 0.0);
        let outline = wall_outline(start, end, 90.0).unwrap();

        assert_eq!(outline.len(), 5);
        assert_eq!(outline[0], outline[4]);
        assert_eq!(outline[0], DVec3::new(0.0, 45.0, 0.0));
        assert_eq!(outline[1], DVec3::new(1000.0, 45.0, 0.0));
        assert_eq!(outline[2], DVec3::new(1000.0, -45.0, 0.0));
        assert_eq!(outline[3], DVec3::new(0.0, -45.0, 0.0));
    }

    #[test]
    fn test_offset_edges_match_centreline_length() {
        let cases = [
            (DVec3::new(0.0, 0.0, 0.0), DVec3::new(300.0, 400.0, 0.0), 90.0),
            (DVec3::new(-20.0, 5.0, 0.0), DVec3::new(-20.0, -995.0, 0.0), 12.5),
            (DVec3::new(1.0, 2.0, 3.0), DVec3::new(4.0, 6.0, 3.0), 0.5),
            (DVec3::new(0.0, 0.0, 0.0), DVec3::new(0.0, 0.0, 2700.0), 90.0),
        ];

        for (start, end, thickness) in cases {
            let outline = wall_outline(start, end, thickness).unwrap();
            let length = start.distance(end);
            assert_relative_eq!(outline[0].distance(outline[1]), length, epsilon = 1e-9);
            assert_relative_eq!(outline[2].distance(outline[3]), length, epsilon = 1e-9);
            assert_relative_eq!(outline[1].distance(outline[2]), thickness, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_zero_length_wall_is_empty() {
        let p = DVec3::new(5.0, 5.0, 0.0);
        assert!(wall_outline(p, p, 90.0).is_none());
        assert_eq!(make_wall_shape(p, p, 90.0), Shape::Empty);

        let wall = WallEntity::new(p, p, 90.0).unwrap();
        assert!(wall.shape().is_empty());
    }

    #[test]
    fn test_shape_is_face_plus_wire() {
        let shape = make_wall_shape(DVec3::ZERO, DVec3::new(1000.0, 0.0, 0.0), 90.0);
        assert_eq!(shape.faces().len(), 1);
        assert_eq!(shape.wires().len(), 1);
        assert_relative_eq!(shape.faces()[0].area(), 90_000.0);
    }

    #[test]
    fn test_shape_is_idempotent() {
        let start = DVec3::new(12.3, -4.5, 0.0);
        let end = DVec3::new(789.01, 234.5, 0.0);
        let a = make_wall_shape(start, end, 90.0);
        let b = make_wall_shape(start, end, 90.0);
        assert_eq!(a, b);

        let mut wall = WallEntity::new(start, end, 90.0).unwrap();
        let before = wall.shape().clone();
        wall.execute();
        assert_eq!(&before, wall.shape());
    }

    #[test]
    fn test_setters_recompute_shape() {
        let mut wall = WallEntity::with_default_thickness(DVec3::ZERO, DVec3::ZERO).unwrap();
        assert!(wall.shape().is_empty());

        wall.set_end(DVec3::new(500.0, 0.0, 0.0)).unwrap();
        assert!(!wall.shape().is_empty());

        wall.set_thickness(200.0).unwrap();
        let (min, max) = wall.shape().bounds().unwrap();
        assert_relative_eq!(max.y - min.y, 200.0);
        assert_relative_eq!(max.x - min.x, 500.0);
    }

    #[test]
    fn test_loaded_wall_derives_shape() {
        let wall = WallEntity::new(DVec3::ZERO, DVec3::new(100.0, 0.0, 0.0), 10.0).unwrap();
        let json = serde_json::to_string(&wall).unwrap();
        assert!(!json.contains("shape"));

        let loaded: WallEntity = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.id, wall.id);
        assert_eq!(loaded.shape(), wall.shape());
        assert!(!loaded.shape().is_empty());

        let bad = json.replace("10.0", "-10.0");
        assert!(serde_json::from_str::<WallEntity>(&bad).is_err());
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(
            WallEntity::new(DVec3::ZERO, DVec3::X, 0.0).unwrap_err(),
            WallError::InvalidThickness(0.0)
        );
        assert!(WallEntity::new(DVec3::ZERO, DVec3::X, -5.0).is_err());
        assert!(WallEntity::new(DVec3::ZERO, DVec3::X, f64::INFINITY).is_err());

        let mut wall = WallEntity::new(DVec3::ZERO, DVec3::X, 90.0).unwrap();
        assert!(wall.set_thickness(-1.0).is_err());
        assert_eq!(wall.thickness(), 90.0);
        assert!(wall.set_start(DVec3::new(f64::NAN, 0.0, 0.0)).is_err());
        assert_eq!(wall.start(), DVec3::ZERO);
    }
}
