//! Lightweight boundary representation
//!
//! Just enough topology for walls, grids and tool visuals: vertices,
//! straight edges, polyline wires, planar faces bounded by one wire, and
//! compounds of those. Shapes are plain values; documents own them.

use std::collections::HashSet;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Bit-exact key for deduplicating points (treats -0.0 as 0.0)
fn point_key(p: Point) -> [u64; 3] {
    let bits = |v: f64| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() };
    [bits(p.x), bits(p.y), bits(p.z)]
}

/// A straight edge between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
}

impl Edge {
    /// Create an edge
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Length of the edge
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Midpoint of the edge
    pub fn midpoint(&self) -> Point {
        (self.start + self.end) * 0.5
    }

    /// Check if start and end coincide
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    fn key(&self) -> ([u64; 3], [u64; 3]) {
        let a = point_key(self.start);
        let b = point_key(self.end);
        if a <= b { (a, b) } else { (b, a) }
    }
}

/// An ordered polyline. Closed when the last point repeats the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    points: Vec<Point>,
}

impl Wire {
    /// Create a polyline wire through the given points.
    ///
    /// Returns None for fewer than two points or if all points coincide.
    pub fn polygon(points: Vec<Point>) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let first = points[0];
        if points.iter().all(|p| *p == first) {
            return None;
        }
        if points.iter().any(|p| !p.is_finite()) {
            return None;
        }
        Some(Self { points })
    }

    /// Create a single-segment wire
    pub fn line(start: Point, end: Point) -> Option<Self> {
        Self::polygon(vec![start, end])
    }

    /// Points of the wire in order
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Check if the wire forms a closed loop
    pub fn is_closed(&self) -> bool {
        self.points.len() >= 3 && self.points.first() == self.points.last()
    }

    /// Edges between consecutive points
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.points.windows(2).map(|w| Edge::new(w[0], w[1]))
    }

    /// Total length of the wire
    pub fn length(&self) -> f64 {
        self.edges().map(|e| e.length()).sum()
    }
}

/// A planar face bounded by a single closed wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    outer: Wire,
}

impl Face {
    /// Build a face from a closed wire.
    ///
    /// Returns None if the wire is open or encloses no area.
    pub fn from_wire(wire: Wire) -> Option<Self> {
        if !wire.is_closed() {
            return None;
        }
        let face = Self { outer: wire };
        if face.area() <= f64::EPSILON {
            return None;
        }
        Some(face)
    }

    /// Boundary wire
    pub fn outer(&self) -> &Wire {
        &self.outer
    }

    /// Enclosed area (Newell's method, valid for any planar loop)
    pub fn area(&self) -> f64 {
        let sum = self
            .outer
            .points
            .windows(2)
            .fold(DVec3::ZERO, |acc, w| acc + w[0].cross(w[1]));
        sum.length() * 0.5
    }
}

/// A geometric shape held by a document object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Shape {
    /// No geometry
    #[default]
    Empty,
    /// A single point
    Vertex(Point),
    /// A polyline
    Wire(Wire),
    /// A planar face
    Face(Face),
    /// A collection of shapes sharing one object
    Compound(Vec<Shape>),
}

impl Shape {
    /// Create a compound, dropping empty members.
    ///
    /// Returns `Shape::Empty` when nothing remains.
    pub fn compound(shapes: Vec<Shape>) -> Self {
        let shapes: Vec<Shape> = shapes.into_iter().filter(|s| !s.is_empty()).collect();
        if shapes.is_empty() {
            Shape::Empty
        } else {
            Shape::Compound(shapes)
        }
    }

    /// Get the type name of this shape
    pub fn type_name(&self) -> &'static str {
        match self {
            Shape::Empty => "Empty",
            Shape::Vertex(_) => "Vertex",
            Shape::Wire(_) => "Wire",
            Shape::Face(_) => "Face",
            Shape::Compound(_) => "Compound",
        }
    }

    /// Check if the shape carries no geometry
    pub fn is_empty(&self) -> bool {
        match self {
            Shape::Empty => true,
            Shape::Compound(children) => children.iter().all(Shape::is_empty),
            _ => false,
        }
    }

    /// Distinct vertices in traversal order
    pub fn vertices(&self) -> Vec<Point> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.visit_points(&mut |p| {
            if seen.insert(point_key(p)) {
                out.push(p);
            }
        });
        out
    }

    /// Distinct edges in traversal order (reversed duplicates are merged)
    pub fn edges(&self) -> Vec<Edge> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.visit_edges(&mut |e| {
            if seen.insert(e.key()) {
                out.push(e);
            }
        });
        out
    }

    /// All faces in the shape
    pub fn faces(&self) -> Vec<&Face> {
        match self {
            Shape::Face(face) => vec![face],
            Shape::Compound(children) => children.iter().flat_map(Shape::faces).collect(),
            _ => Vec::new(),
        }
    }

    /// Free-standing wires (face boundaries excluded)
    pub fn wires(&self) -> Vec<&Wire> {
        match self {
            Shape::Wire(wire) => vec![wire],
            Shape::Compound(children) => children.iter().flat_map(Shape::wires).collect(),
            _ => Vec::new(),
        }
    }

    /// Axis-aligned bounding box as (min, max)
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let mut bounds: Option<(Point, Point)> = None;
        self.visit_points(&mut |p| {
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(p), max.max(p)),
                None => (p, p),
            });
        });
        bounds
    }

    fn visit_points(&self, f: &mut dyn FnMut(Point)) {
        match self {
            Shape::Empty => {}
            Shape::Vertex(p) => f(*p),
            Shape::Wire(wire) => wire.points.iter().for_each(|p| f(*p)),
            Shape::Face(face) => face.outer.points.iter().for_each(|p| f(*p)),
            Shape::Compound(children) => children.iter().for_each(|c| c.visit_points(f)),
        }
    }

    fn visit_edges(&self, f: &mut dyn FnMut(Edge)) {
        match self {
            Shape::Empty | Shape::Vertex(_) => {}
            Shape::Wire(wire) => wire.edges().for_each(|e| f(e)),
            Shape::Face(face) => face.outer.edges().for_each(|e| f(e)),
            Shape::Compound(children) => children.iter().for_each(|c| c.visit_edges(f)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Wire {
        Wire::polygon(vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::new(10.0, 10.0, 0.0),
            DVec3::new(0.0, 10.0, 0.0),
            DVec3::new(0.0, 0.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_wire_rejects_degenerate_input() {
        assert!(Wire::polygon(vec![DVec3::ONE]).is_none());
        assert!(Wire::line(DVec3::ONE, DVec3::ONE).is_none());
        assert!(Wire::line(DVec3::ZERO, DVec3::new(f64::NAN, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_wire_closed_and_length() {
        let wire = square();
        assert!(wire.is_closed());
        assert_eq!(wire.edges().count(), 4);
        assert_relative_eq!(wire.length(), 40.0);

        let open = Wire::line(DVec3::ZERO, DVec3::X).unwrap();
        assert!(!open.is_closed());
    }

    #[test]
    fn test_face_area() {
        let face = Face::from_wire(square()).unwrap();
        assert_relative_eq!(face.area(), 100.0);

        let open = Wire::line(DVec3::ZERO, DVec3::X).unwrap();
        assert!(Face::from_wire(open).is_none());
    }

    #[test]
    fn test_compound_deduplicates_topology() {
        let wire = square();
        let face = Face::from_wire(wire.clone()).unwrap();
        let shape = Shape::compound(vec![Shape::Face(face), Shape::Wire(wire)]);

        assert_eq!(shape.type_name(), "Compound");
        assert_eq!(shape.vertices().len(), 4);
        assert_eq!(shape.edges().len(), 4);
        assert_eq!(shape.faces().len(), 1);
        assert_eq!(shape.wires().len(), 1);
    }

    #[test]
    fn test_empty_compound() {
        assert_eq!(Shape::compound(vec![Shape::Empty]), Shape::Empty);
        assert!(Shape::Compound(vec![]).is_empty());
        assert!(Shape::Empty.vertices().is_empty());
        assert!(Shape::Empty.bounds().is_none());
    }

    #[test]
    fn test_bounds() {
        let shape = Shape::Wire(square());
        let (min, max) = shape.bounds().unwrap();
        assert_eq!(min, DVec3::ZERO);
        assert_eq!(max, DVec3::new(10.0, 10.0, 0.0));
    }
}
