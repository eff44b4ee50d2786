//! buildQ CAD layer
//!
//! Geometry and document model for drafting building walls:
//!
//! - [`geometry`] - working planes and planar distance math
//! - [`shape`] - lightweight vertices/edges/wires/faces/compounds
//! - [`wall`] - the parametric wall entity and its shape builder
//! - [`grid`] - grid settings and grid line generation
//! - [`document`] - the host document trait and an in-memory implementation

pub mod document;
pub mod geometry;
pub mod grid;
pub mod shape;
pub mod wall;

pub use document::{
    DisplayMode, Document, DocumentError, DocumentObject, DocumentResult, HostDocument,
    NamePolicy, ObjectData, ViewStyle,
};
pub use geometry::{Point, WorkingPlane, closest_point_on_segment};
pub use grid::{
    DEFAULT_GRID_EXTENT, DEFAULT_GRID_SPACING, GRID_OBJECT_NAME, GridError, GridResult,
    GridSettings, grid_lines, make_grid_shape,
};
pub use shape::{Edge, Face, Shape, Wire};
pub use wall::{
    DEFAULT_WALL_THICKNESS, WallEntity, WallError, WallResult, make_wall_shape, wall_outline,
};
