//! Snap engine
//!
//! Finds the most significant point near the cursor: a grid intersection,
//! a shape vertex, or the closest point on a shape edge. All distances are
//! measured in the working plane chosen from the view direction.

use buildq_cad::{
    GRID_OBJECT_NAME, GridSettings, HostDocument, Point, WorkingPlane, closest_point_on_segment,
};
use glam::{DVec2, DVec3};

/// Default snap distance in document units
pub const DEFAULT_SNAP_THRESHOLD: f64 = 5.0;

/// Candidates closer than this to the start point are never offered
pub const START_EXCLUSION_EPSILON: f64 = 1e-3;

/// Where a snap candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    Grid,
    Vertex,
    Edge,
}

/// A candidate replacement for the raw cursor position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapCandidate {
    /// Planar position of the candidate
    pub position: DVec2,
    /// Planar distance to the reference point
    pub distance: f64,
    pub kind: SnapKind,
    /// Index of the source object in document order
    pub object_index: usize,
}

/// Inputs of one candidate scan, already projected to the working plane
#[derive(Debug, Clone, Copy)]
pub struct SnapQuery<'a> {
    /// Cursor position in plane coordinates
    pub reference: DVec2,
    /// Start point to exclude, in plane coordinates
    pub start: Option<DVec2>,
    pub plane: WorkingPlane,
    /// Grid used for the grid marker object
    pub grid: GridSettings,
    /// Objects owned by the caller that must not be snapped to
    pub ignore: &'a [&'a str],
}

impl SnapQuery<'_> {
    fn excluded(&self, position: DVec2) -> bool {
        self.start
            .is_some_and(|start| start.distance(position) < START_EXCLUSION_EPSILON)
    }

    fn candidate(
        &self,
        position: DVec2,
        kind: SnapKind,
        object_index: usize,
    ) -> Option<SnapCandidate> {
        if !position.is_finite() || self.excluded(position) {
            return None;
        }
        Some(SnapCandidate {
            position,
            distance: self.reference.distance(position),
            kind,
            object_index,
        })
    }
}

/// Enumerate snap candidates from every object in the document.
///
/// Objects named in `query.ignore` are skipped. The grid marker object
/// contributes only its nearest intersection. Other objects contribute
/// their vertices followed by the closest point on each edge. Objects
/// without geometry and zero-length edges are skipped.
pub fn collect_candidates(document: &dyn HostDocument, query: &SnapQuery) -> Vec<SnapCandidate> {
    let mut candidates = Vec::new();

    for (index, object) in document.objects().enumerate() {
        if query.ignore.iter().any(|name| *name == object.name) {
            continue;
        }

        if object.name == GRID_OBJECT_NAME {
            let position = query.grid.nearest_intersection(query.reference);
            candidates.extend(query.candidate(position, SnapKind::Grid, index));
            continue;
        }

        let shape = object.shape();
        if shape.is_empty() {
            continue;
        }

        for vertex in shape.vertices() {
            let position = query.plane.to_plane(vertex);
            candidates.extend(query.candidate(position, SnapKind::Vertex, index));
        }

        for edge in shape.edges() {
            let a = query.plane.to_plane(edge.start);
            let b = query.plane.to_plane(edge.end);
            if let Some(position) = closest_point_on_segment(query.reference, a, b) {
                candidates.extend(query.candidate(position, SnapKind::Edge, index));
            }
        }
    }

    candidates
}

/// Nearest candidate strictly within `threshold`.
///
/// Equidistant candidates resolve to the first one found.
pub fn nearest_candidate(candidates: &[SnapCandidate], threshold: f64) -> Option<SnapCandidate> {
    let mut best: Option<SnapCandidate> = None;
    let mut best_distance = threshold;

    for candidate in candidates {
        if candidate.distance < best_distance {
            best_distance = candidate.distance;
            best = Some(*candidate);
        }
    }

    best
}

/// Outcome of a snap query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// Snapped point, or the unchanged input point
    pub point: Point,
    /// Winning candidate, if any
    pub candidate: Option<SnapCandidate>,
    /// Working plane used for the query
    pub plane: WorkingPlane,
}

impl SnapResult {
    /// Check if the point was replaced by a candidate
    pub fn snapped(&self) -> bool {
        self.candidate.is_some()
    }
}

/// Snap resolver: working plane selection plus nearest-candidate search
#[derive(Debug, Clone, Copy)]
pub struct Snapper {
    /// Maximum snap distance
    pub threshold: f64,
    /// Value of the out-of-plane coordinate for snapped points
    pub level: f64,
    pub grid: GridSettings,
}

impl Default for Snapper {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SNAP_THRESHOLD,
            level: 0.0,
            grid: GridSettings::default(),
        }
    }
}

impl Snapper {
    /// Create a snapper with the given threshold and level
    pub fn new(threshold: f64, level: f64) -> Self {
        Self {
            threshold,
            level,
            ..Default::default()
        }
    }

    /// Use a specific grid for the grid marker
    pub fn with_grid(mut self, grid: GridSettings) -> Self {
        self.grid = grid;
        self
    }

    /// Snap `point` to the nearest significant point in the document.
    ///
    /// `view_direction` of None means the host could not report one; the
    /// plan (XY) plane is used. Without a candidate in range the input
    /// point is returned unchanged.
    pub fn snap(
        &self,
        document: &dyn HostDocument,
        view_direction: Option<DVec3>,
        point: Point,
        start: Option<Point>,
        ignore: &[&str],
    ) -> SnapResult {
        let plane = view_direction
            .map(WorkingPlane::from_view_direction)
            .unwrap_or_default();

        let query = SnapQuery {
            reference: plane.to_plane(point),
            start: start.map(|s| plane.to_plane(s)),
            plane,
            grid: self.grid,
            ignore,
        };

        let candidates = collect_candidates(document, &query);
        match nearest_candidate(&candidates, self.threshold) {
            Some(candidate) => {
                tracing::trace!(
                    "Snapped to {:?} at {:?} ({:.3})",
                    candidate.kind,
                    candidate.position,
                    candidate.distance
                );
                SnapResult {
                    point: plane.from_plane(candidate.position, self.level),
                    candidate: Some(candidate),
                    plane,
                }
            }
            None => SnapResult {
                point,
                candidate: None,
                plane,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use buildq_cad::{Document, Shape, WallEntity, Wire};

    const TOP: Option<DVec3> = Some(DVec3::new(0.0, 0.0, -1.0));

    fn doc_with_line(a: DVec3, b: DVec3) -> Document {
        let mut doc = Document::new("Test");
        let name = doc.add_feature("Line").unwrap();
        doc.set_shape(&name, Shape::Wire(Wire::line(a, b).unwrap()))
            .unwrap();
        doc
    }

    fn doc_with_grid() -> Document {
        let mut doc = Document::new("Test");
        doc.add_feature(GRID_OBJECT_NAME).unwrap();
        doc
    }

    #[test]
    fn test_snap_to_vertex() {
        let doc = doc_with_line(DVec3::new(100.0, 100.0, 0.0), DVec3::new(500.0, 100.0, 0.0));
        let snapper = Snapper::default();

        let result = snapper.snap(&doc, TOP, DVec3::new(98.0, 102.0, 0.0), None, &[]);
        assert!(result.snapped());
        assert_eq!(result.candidate.unwrap().kind, SnapKind::Vertex);
        assert_eq!(result.point, DVec3::new(100.0, 100.0, 0.0));
    }

    #[test]
    fn test_snap_to_edge_projection() {
        let doc = doc_with_line(DVec3::new(0.0, 0.0, 0.0), DVec3::new(1000.0, 0.0, 0.0));
        let snapper = Snapper::default();

        let result = snapper.snap(&doc, TOP, DVec3::new(400.0, 3.0, 0.0), None, &[]);
        assert_eq!(result.candidate.unwrap().kind, SnapKind::Edge);
        assert_eq!(result.point, DVec3::new(400.0, 0.0, 0.0));
    }

    #[test]
    fn test_no_candidate_returns_input_unchanged() {
        let doc = doc_with_line(DVec3::new(0.0, 0.0, 0.0), DVec3::new(1000.0, 0.0, 0.0));
        let snapper = Snapper::default();
        let raw = DVec3::new(400.0, 30.0, 12.0);

        let result = snapper.snap(&doc, TOP, raw, None, &[]);
        assert!(!result.snapped());
        assert_eq!(result.point, raw);

        // Threshold is strict
        let exact = snapper.snap(&doc, TOP, DVec3::new(400.0, 5.0, 0.0), None, &[]);
        assert!(!exact.snapped());
    }

    #[test]
    fn test_candidates_never_exceed_threshold() {
        let doc = doc_with_line(DVec3::new(0.0, 0.0, 0.0), DVec3::new(100.0, 100.0, 0.0));
        let snapper = Snapper::new(2.0, 0.0);

        for i in 0..50 {
            let raw = DVec3::new(i as f64 * 3.0, 0.0, 0.0);
            let result = snapper.snap(&doc, TOP, raw, None, &[]);
            match result.candidate {
                Some(c) => assert!(c.distance < 2.0),
                None => assert_eq!(result.point, raw),
            }
        }
    }

    #[test]
    fn test_start_point_is_excluded() {
        let doc = doc_with_line(DVec3::new(0.0, 0.0, 0.0), DVec3::new(1000.0, 0.0, 0.0));
        let snapper = Snapper::default();
        let start = DVec3::new(0.0, 0.0, 0.0);

        // Near the start: the vertex and the clamped edge projection both
        // coincide with the start and must be dropped.
        let result = snapper.snap(&doc, TOP, DVec3::new(-1.0, -1.0, 0.0), Some(start), &[]);
        assert!(!result.snapped());

        // Without a start point the same query snaps to the vertex
        let result = snapper.snap(&doc, TOP, DVec3::new(-1.0, -1.0, 0.0), None, &[]);
        assert_eq!(result.point, start);

        // Edge projections away from the start are still offered
        let result = snapper.snap(&doc, TOP, DVec3::new(2.0, 1.0, 0.0), Some(start), &[]);
        assert_eq!(result.point, DVec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_grid_snap() {
        let doc = doc_with_grid();

        let wide = Snapper::new(100.0, 0.0);
        let result = wide.snap(&doc, TOP, DVec3::new(146.0, 83.0, 0.0), None, &[]);
        assert_eq!(result.candidate.unwrap().kind, SnapKind::Grid);
        assert_eq!(result.point, DVec3::new(100.0, 100.0, 0.0));

        let narrow = Snapper::default();
        let raw = DVec3::new(146.0, 83.0, 0.0);
        let result = narrow.snap(&doc, TOP, raw, None, &[]);
        assert!(!result.snapped());
        assert_eq!(result.point, raw);
    }

    #[test]
    fn test_grid_uses_configured_spacing() {
        let doc = doc_with_grid();
        let snapper =
            Snapper::default().with_grid(GridSettings::new(250.0, 2000.0).unwrap());

        let result = snapper.snap(&doc, TOP, DVec3::new(248.0, 502.0, 0.0), None, &[]);
        assert_eq!(result.point, DVec3::new(250.0, 500.0, 0.0));
    }

    #[test]
    fn test_ignored_objects_and_empty_shapes() {
        let mut doc = doc_with_line(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0));
        doc.add_feature("Empty").unwrap();
        let snapper = Snapper::default();

        let result = snapper.snap(&doc, TOP, DVec3::new(1.0, 1.0, 0.0), None, &["Line"]);
        assert!(!result.snapped());
    }

    #[test]
    fn test_malformed_objects_do_not_stop_the_scan() {
        let mut doc = Document::new("Test");
        doc.add_feature("Empty").unwrap();

        let a = DVec3::new(-500.0, -500.0, 0.0);
        let b = DVec3::new(-500.0, -800.0, 0.0);
        let degenerate = doc.add_feature("Degenerate").unwrap();
        doc.set_shape(&degenerate, Shape::Wire(Wire::polygon(vec![a, a, b]).unwrap()))
            .unwrap();

        let line = doc.add_feature("Line").unwrap();
        doc.set_shape(
            &line,
            Shape::Wire(Wire::line(DVec3::ZERO, DVec3::new(1000.0, 0.0, 0.0)).unwrap()),
        )
        .unwrap();

        let result = Snapper::default().snap(&doc, TOP, DVec3::new(300.0, 2.0, 0.0), None, &[]);
        let candidate = result.candidate.unwrap();
        assert_eq!(candidate.kind, SnapKind::Edge);
        assert_eq!(candidate.object_index, 2);
        assert_eq!(result.point, DVec3::new(300.0, 0.0, 0.0));
    }

    #[test]
    fn test_snap_pins_level_in_working_plane() {
        let doc = doc_with_line(DVec3::new(0.0, 50.0, 0.0), DVec3::new(0.0, 50.0, 100.0));
        let snapper = Snapper::new(5.0, 7.0);
        let front = Some(DVec3::new(0.0, 1.0, 0.0));

        let result = snapper.snap(&doc, front, DVec3::new(1.0, 0.0, 101.0), None, &[]);
        assert_eq!(result.plane, WorkingPlane::XZ);
        assert_eq!(result.point, DVec3::new(0.0, 7.0, 100.0));
    }

    #[test]
    fn test_snap_against_wall_edges() {
        let mut doc = Document::new("Test");
        let wall = WallEntity::new(DVec3::ZERO, DVec3::new(1000.0, 0.0, 0.0), 90.0).unwrap();
        doc.add_wall("WallAssembly", wall).unwrap();
        let snapper = Snapper::default();

        let result = snapper.snap(&doc, TOP, DVec3::new(500.0, 47.0, 0.0), None, &[]);
        assert_eq!(result.candidate.unwrap().kind, SnapKind::Edge);
        assert_relative_eq!(result.point.y, 45.0);
        assert_relative_eq!(result.point.x, 500.0);
    }

    #[test]
    fn test_nearest_candidate_first_wins_on_tie() {
        let a = SnapCandidate {
            position: DVec2::new(1.0, 0.0),
            distance: 1.0,
            kind: SnapKind::Vertex,
            object_index: 0,
        };
        let b = SnapCandidate {
            position: DVec2::new(-1.0, 0.0),
            object_index: 1,
            ..a
        };
        assert_eq!(nearest_candidate(&[a, b], 5.0), Some(a));
        assert_eq!(nearest_candidate(&[a, b], 1.0), None);
        assert_eq!(nearest_candidate(&[], 5.0), None);
    }
}
