//! Orthogonal lock

use buildq_cad::{Point, WorkingPlane};

/// Constrain `free` to an axis-aligned segment from `start`.
///
/// The dominant planar delta wins; on a tie the first planar coordinate is
/// locked. The out-of-plane coordinate of `free` is kept.
pub fn lock_orthogonal(start: Point, free: Point, plane: WorkingPlane) -> Point {
    let origin = plane.to_plane(start);
    let mut uv = plane.to_plane(free);
    let delta = uv - origin;

    if delta.x.abs() > delta.y.abs() {
        uv.y = origin.y;
    } else {
        uv.x = origin.x;
    }

    let level = free.dot(plane.normal());
    plane.from_plane(uv, level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_horizontal_dominates() {
        let locked = lock_orthogonal(
            DVec3::ZERO,
            DVec3::new(10.0, 3.0, 0.0),
            WorkingPlane::XY,
        );
        assert_eq!(locked, DVec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_vertical_dominates() {
        let locked = lock_orthogonal(
            DVec3::ZERO,
            DVec3::new(3.0, 10.0, 0.0),
            WorkingPlane::XY,
        );
        assert_eq!(locked, DVec3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn test_tie_locks_first_coordinate() {
        let locked = lock_orthogonal(
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(6.0, 6.0, 0.0),
            WorkingPlane::XY,
        );
        assert_eq!(locked, DVec3::new(1.0, 6.0, 0.0));
    }

    #[test]
    fn test_lock_in_front_plane_keeps_depth() {
        let locked = lock_orthogonal(
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(50.0, 7.0, 4.0),
            WorkingPlane::XZ,
        );
        assert_eq!(locked, DVec3::new(50.0, 7.0, 0.0));
    }
}
