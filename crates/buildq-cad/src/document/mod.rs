//! Host document abstraction
//!
//! The add-in never owns persistence. Everything it creates lives in a host
//! document reached through [`HostDocument`]. [`Document`] is an in-memory
//! implementation used by the headless driver and by tests.

mod memory;

pub use memory::{Document, NamePolicy};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shape::Shape;
use crate::wall::{WallEntity, WallError};

/// Document errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Object name already in use: {0}")]
    DuplicateName(String),

    #[error("Object is not a wall: {0}")]
    NotAWall(String),

    #[error("Shape of {0} is derived from its parameters")]
    DerivedShape(String),

    #[error("Wall error: {0}")]
    Wall(#[from] WallError),
}

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// How the host draws an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    #[default]
    FlatLines,
    Shaded,
    Wireframe,
}

impl DisplayMode {
    /// Host-facing display mode name
    pub fn name(&self) -> &'static str {
        match self {
            DisplayMode::FlatLines => "Flat Lines",
            DisplayMode::Shaded => "Shaded",
            DisplayMode::Wireframe => "Wireframe",
        }
    }
}

/// Visual hints attached to a document object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewStyle {
    pub display_mode: DisplayMode,
    pub line_width: f32,
    pub line_color: [f32; 3],
    pub shape_color: [f32; 3],
    /// Transparency percentage (0-100)
    pub transparency: u8,
    pub selectable: bool,
    pub visible: bool,
}

impl Default for ViewStyle {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::FlatLines,
            line_width: 1.0,
            line_color: [0.1, 0.1, 0.1],
            shape_color: [0.8, 0.8, 0.8],
            transparency: 0,
            selectable: true,
            visible: true,
        }
    }
}

impl ViewStyle {
    /// Style used for committed walls
    pub fn wall() -> Self {
        Self {
            line_width: 2.0,
            ..Default::default()
        }
    }
}

/// Payload of a document object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ObjectData {
    /// Plain shape holder; its shape is set directly
    Feature {
        #[serde(default)]
        shape: Shape,
    },
    /// Parametric wall; its shape is derived on recompute
    Wall(WallEntity),
}

/// An object stored in a host document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentObject {
    /// Unique name within the document
    pub name: String,
    /// User-facing label
    pub label: String,
    /// Display hints
    pub style: ViewStyle,
    data: ObjectData,
}

impl DocumentObject {
    /// Create a plain feature object with an empty shape
    pub fn feature(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            style: ViewStyle::default(),
            data: ObjectData::Feature {
                shape: Shape::Empty,
            },
        }
    }

    /// Create a wall object
    pub fn wall(name: impl Into<String>, wall: WallEntity) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            style: ViewStyle::wall(),
            data: ObjectData::Wall(wall),
        }
    }

    /// Current shape of the object
    pub fn shape(&self) -> &Shape {
        match &self.data {
            ObjectData::Feature { shape } => shape,
            ObjectData::Wall(wall) => wall.shape(),
        }
    }

    /// Wall parameters, if this object is a wall
    pub fn as_wall(&self) -> Option<&WallEntity> {
        match &self.data {
            ObjectData::Wall(wall) => Some(wall),
            ObjectData::Feature { .. } => None,
        }
    }

    /// Check if this object is a wall
    pub fn is_wall(&self) -> bool {
        self.as_wall().is_some()
    }

    /// Get the object payload
    pub fn data(&self) -> &ObjectData {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut ObjectData {
        &mut self.data
    }
}

/// Operations the add-in needs from a host document
pub trait HostDocument {
    /// Iterate over all objects in document order
    fn objects(&self) -> Box<dyn Iterator<Item = &DocumentObject> + '_>;

    /// Look up an object by name
    fn object(&self, name: &str) -> Option<&DocumentObject>;

    /// Add a plain feature object.
    ///
    /// Returns the name actually assigned, which may differ from the
    /// requested one if the host renames duplicates.
    fn add_feature(&mut self, name: &str) -> DocumentResult<String>;

    /// Add a wall object and return its assigned name
    fn add_wall(&mut self, name: &str, wall: WallEntity) -> DocumentResult<String>;

    /// Remove an object by name
    fn remove_object(&mut self, name: &str) -> DocumentResult<()>;

    /// Replace the shape of a feature object
    fn set_shape(&mut self, name: &str, shape: Shape) -> DocumentResult<()>;

    /// Replace the display hints of an object
    fn set_style(&mut self, name: &str, style: ViewStyle) -> DocumentResult<()>;

    /// Mutable access to a wall's parameters
    fn wall_mut(&mut self, name: &str) -> DocumentResult<&mut WallEntity>;

    /// Re-derive all parametric shapes
    fn recompute(&mut self);
}
