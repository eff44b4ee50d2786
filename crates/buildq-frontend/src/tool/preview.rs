//! Tool-owned preview and cursor marker objects

use buildq_cad::{HostDocument, Point, Shape, ViewStyle, Wire, WorkingPlane, wall_outline};

/// Name of the live wall preview object
pub const PREVIEW_OBJECT_NAME: &str = "WallPreview";

/// Name of the cursor marker object
pub const MARKER_OBJECT_NAME: &str = "WallStartMarker";

/// Transparency of the wall preview (percent)
pub const PREVIEW_TRANSPARENCY: u8 = 70;

/// Colour of the cursor marker
pub const MARKER_COLOR: [f32; 3] = [1.0, 0.2, 0.2];

fn preview_style() -> ViewStyle {
    ViewStyle {
        transparency: PREVIEW_TRANSPARENCY,
        selectable: false,
        ..Default::default()
    }
}

fn marker_style() -> ViewStyle {
    ViewStyle {
        line_width: 2.0,
        line_color: MARKER_COLOR,
        selectable: false,
        ..Default::default()
    }
}

/// Cross of two lines along the plane axes, `size` long, centred on `center`
pub fn make_cross(center: Point, size: f64, plane: WorkingPlane) -> Shape {
    let half = size / 2.0;
    let (u, v) = plane.axes();
    let lines = [(center - u * half, center + u * half), (center - v * half, center + v * half)];
    Shape::compound(
        lines
            .into_iter()
            .filter_map(|(a, b)| Wire::line(a, b))
            .map(Shape::Wire)
            .collect(),
    )
}

/// Closed outline wire of a wall, or None for a zero-length wall
pub fn make_preview_shape(start: Point, end: Point, thickness: f64) -> Option<Shape> {
    let outline = wall_outline(start, end, thickness)?;
    Wire::polygon(outline.to_vec()).map(Shape::Wire)
}

/// Names of the preview and marker objects the tool created or adopted
#[derive(Debug, Clone, Default)]
pub struct ToolVisuals {
    preview: Option<String>,
    marker: Option<String>,
}

impl ToolVisuals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the live preview object, if any
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// Name of the cursor marker object, if any
    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }

    /// Objects the snap engine must skip
    pub fn ignored_names(&self) -> Vec<&str> {
        [self.preview.as_deref(), self.marker.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Show the wall outline from `start` to `end`.
    ///
    /// A zero-length request keeps the current preview. Returns true when
    /// the preview shape changed.
    pub fn update_preview(
        &mut self,
        document: &mut dyn HostDocument,
        start: Point,
        end: Point,
        thickness: f64,
    ) -> bool {
        let Some(shape) = make_preview_shape(start, end, thickness) else {
            return false;
        };
        let Some(name) = adopt_object(document, &mut self.preview, PREVIEW_OBJECT_NAME, preview_style())
        else {
            return false;
        };

        match document.set_shape(&name, shape) {
            Ok(()) => {
                document.recompute();
                true
            }
            Err(e) => {
                tracing::warn!("Could not update wall preview: {}", e);
                false
            }
        }
    }

    /// Move the cursor marker to `center`
    pub fn update_marker(
        &mut self,
        document: &mut dyn HostDocument,
        center: Point,
        size: f64,
        plane: WorkingPlane,
    ) -> bool {
        let shape = make_cross(center, size, plane);
        if shape.is_empty() {
            return false;
        }
        let Some(name) = adopt_object(document, &mut self.marker, MARKER_OBJECT_NAME, marker_style())
        else {
            return false;
        };

        match document.set_shape(&name, shape) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Could not update cursor marker: {}", e);
                false
            }
        }
    }

    /// Remove the preview object
    pub fn clear_preview(&mut self, document: &mut dyn HostDocument) {
        remove_object(document, &mut self.preview);
    }

    /// Remove the cursor marker object
    pub fn clear_marker(&mut self, document: &mut dyn HostDocument) {
        remove_object(document, &mut self.marker);
    }

    /// Remove both objects
    pub fn clear(&mut self, document: &mut dyn HostDocument) {
        self.clear_preview(document);
        self.clear_marker(document);
    }
}

/// Name of the object held in `slot`, creating it when needed.
///
/// When the host refuses the requested name, an existing object of that
/// name is adopted instead.
fn adopt_object(
    document: &mut dyn HostDocument,
    slot: &mut Option<String>,
    requested: &str,
    style: ViewStyle,
) -> Option<String> {
    if let Some(name) = slot.as_ref() {
        if document.object(name).is_some() {
            return Some(name.clone());
        }
    }

    let name = match document.add_feature(requested) {
        Ok(name) => {
            if let Err(e) = document.set_style(&name, style) {
                tracing::debug!("Could not style {}: {}", name, e);
            }
            name
        }
        Err(e) if document.object(requested).is_some() => {
            tracing::debug!("Reusing existing {} ({})", requested, e);
            requested.to_string()
        }
        Err(e) => {
            tracing::warn!("Could not create {}: {}", requested, e);
            return None;
        }
    };

    *slot = Some(name.clone());
    Some(name)
}

fn remove_object(document: &mut dyn HostDocument, slot: &mut Option<String>) {
    if let Some(name) = slot.take() {
        if let Err(e) = document.remove_object(&name) {
            tracing::debug!("{} already removed: {}", name, e);
        }
    }
}
