//! Working planes and planar distance math
//!
//! All snap and lock computations happen in one of three axis-aligned
//! working planes. The plane is chosen from the current view direction and
//! decides which two world coordinates take part in 2D distance math; the
//! remaining coordinate is pinned to a caller-supplied level.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// A 3D coordinate in document space
pub type Point = DVec3;

/// Axis-aligned 2D working plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WorkingPlane {
    /// Plan view (Z is the level coordinate)
    #[default]
    XY,
    /// Front view (Y is the level coordinate)
    XZ,
    /// Side view (X is the level coordinate)
    YZ,
}

impl WorkingPlane {
    /// Pick the plane whose normal is most aligned with the view direction.
    ///
    /// Ties go to XY first, then XZ. Non-finite directions fall back to XY.
    pub fn from_view_direction(direction: DVec3) -> Self {
        if !direction.is_finite() {
            return WorkingPlane::XY;
        }

        let abs = direction.abs();
        if abs.z >= abs.x && abs.z >= abs.y {
            WorkingPlane::XY
        } else if abs.y >= abs.x {
            WorkingPlane::XZ
        } else {
            WorkingPlane::YZ
        }
    }

    /// Normal vector of the plane
    pub fn normal(&self) -> DVec3 {
        match self {
            WorkingPlane::XY => DVec3::Z,
            WorkingPlane::XZ => DVec3::Y,
            WorkingPlane::YZ => DVec3::X,
        }
    }

    /// In-plane (u, v) axes in world space
    pub fn axes(&self) -> (DVec3, DVec3) {
        match self {
            WorkingPlane::XY => (DVec3::X, DVec3::Y),
            WorkingPlane::XZ => (DVec3::X, DVec3::Z),
            WorkingPlane::YZ => (DVec3::Y, DVec3::Z),
        }
    }

    /// Project a world point onto the plane's two coordinates
    pub fn to_plane(&self, point: Point) -> DVec2 {
        match self {
            WorkingPlane::XY => DVec2::new(point.x, point.y),
            WorkingPlane::XZ => DVec2::new(point.x, point.z),
            WorkingPlane::YZ => DVec2::new(point.y, point.z),
        }
    }

    /// Lift planar coordinates back to a world point at `level`
    pub fn from_plane(&self, uv: DVec2, level: f64) -> Point {
        match self {
            WorkingPlane::XY => DVec3::new(uv.x, uv.y, level),
            WorkingPlane::XZ => DVec3::new(uv.x, level, uv.y),
            WorkingPlane::YZ => DVec3::new(level, uv.x, uv.y),
        }
    }

    /// Return `point` with its out-of-plane coordinate replaced by `level`
    pub fn pin_to_level(&self, point: Point, level: f64) -> Point {
        self.from_plane(self.to_plane(point), level)
    }

    /// Planar distance between two world points
    pub fn distance(&self, a: Point, b: Point) -> f64 {
        self.to_plane(a).distance(self.to_plane(b))
    }

    /// Get the display name of the plane
    pub fn name(&self) -> &'static str {
        match self {
            WorkingPlane::XY => "XY (Top)",
            WorkingPlane::XZ => "XZ (Front)",
            WorkingPlane::YZ => "YZ (Side)",
        }
    }

    /// Get all working planes
    pub fn all() -> [WorkingPlane; 3] {
        [WorkingPlane::XY, WorkingPlane::XZ, WorkingPlane::YZ]
    }
}

/// Closest point on the segment `a`-`b` to `point`.
///
/// Returns None for zero-length or non-finite segments.
pub fn closest_point_on_segment(point: DVec2, a: DVec2, b: DVec2) -> Option<DVec2> {
    let segment = b - a;
    let len_sq = segment.length_squared();

    if len_sq == 0.0 || !len_sq.is_finite() {
        return None;
    }

    let t = ((point - a).dot(segment) / len_sq).clamp(0.0, 1.0);
    Some(a + segment * t)
}
