//! Grid display toggling
//!
//! With a scene graph the grid is an overlay node owned by [`GridOverlay`].
//! Without one the grid becomes the `BuildQ_Grid` document object, which
//! the snap engine also treats as the grid marker.

use buildq_cad::{
    DocumentError, GRID_OBJECT_NAME, GridError, GridSettings, HostDocument, ViewStyle, grid_lines,
    make_grid_shape,
};
use thiserror::Error;

use crate::host::{HostError, OverlayId, OverlaySpec, SceneGraph};

/// Colour of grid lines
pub const GRID_COLOR: [f32; 3] = [0.7, 0.7, 0.7];

/// Grid toggle errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridToggleError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Display style of the grid document object
pub fn grid_style() -> ViewStyle {
    ViewStyle {
        line_width: 1.0,
        line_color: GRID_COLOR,
        transparency: 80,
        selectable: false,
        ..Default::default()
    }
}

/// Owned handle of the grid overlay node
#[derive(Debug, Default)]
pub struct GridOverlay {
    handle: Option<OverlayId>,
}

impl GridOverlay {
    /// Create a hidden overlay
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the overlay is attached
    pub fn is_visible(&self) -> bool {
        self.handle.is_some()
    }

    /// Attach the overlay if hidden, detach it if shown.
    ///
    /// Returns the new visibility.
    pub fn toggle(
        &mut self,
        scene: &mut dyn SceneGraph,
        settings: &GridSettings,
    ) -> Result<bool, GridToggleError> {
        if let Some(id) = self.handle.take() {
            if let Err(e) = scene.remove_overlay(id) {
                tracing::warn!("Grid overlay was already gone: {}", e);
            }
            tracing::info!("Grid hidden");
            return Ok(false);
        }

        let overlay = OverlaySpec {
            lines: grid_lines(settings, 0.0)?,
            color: GRID_COLOR,
            pickable: false,
        };
        self.handle = Some(scene.add_overlay(overlay)?);
        tracing::info!(
            "Grid shown (spacing {}, extent {})",
            settings.spacing,
            settings.extent
        );
        Ok(true)
    }
}

/// Add or remove the grid document object, then recompute.
///
/// Returns true when the grid is now present.
pub fn toggle_document_grid(
    document: &mut dyn HostDocument,
    settings: &GridSettings,
) -> Result<bool, GridToggleError> {
    if document.object(GRID_OBJECT_NAME).is_some() {
        document.remove_object(GRID_OBJECT_NAME)?;
        document.recompute();
        tracing::info!("Removed {}", GRID_OBJECT_NAME);
        return Ok(false);
    }

    let shape = make_grid_shape(settings, 0.0)?;
    let name = document.add_feature(GRID_OBJECT_NAME)?;
    document.set_shape(&name, shape)?;
    document.set_style(&name, grid_style())?;
    document.recompute();
    tracing::info!("Added {}", name);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use buildq_cad::Document;

    use super::*;
    use crate::host::RecordingScene;

    #[test]
    fn test_overlay_toggle_never_duplicates() {
        let mut scene = RecordingScene::default();
        let mut overlay = GridOverlay::new();
        let settings = GridSettings::default();

        assert!(overlay.toggle(&mut scene, &settings).unwrap());
        assert!(overlay.is_visible());
        assert_eq!(scene.overlays().len(), 1);
        assert_eq!(scene.overlays()[0].1.lines.len(), 82);
        assert!(!scene.overlays()[0].1.pickable);

        assert!(!overlay.toggle(&mut scene, &settings).unwrap());
        assert!(!overlay.is_visible());
        assert!(scene.overlays().is_empty());

        overlay.toggle(&mut scene, &settings).unwrap();
        assert_eq!(scene.overlays().len(), 1);
    }

    #[test]
    fn test_overlay_rejects_bad_settings() {
        let mut scene = RecordingScene::default();
        let mut overlay = GridOverlay::new();
        let settings = GridSettings {
            spacing: 0.0,
            extent: 100.0,
        };
        assert!(matches!(
            overlay.toggle(&mut scene, &settings),
            Err(GridToggleError::Grid(_))
        ));
        assert!(!overlay.is_visible());
    }

    #[test]
    fn test_document_grid_toggle() {
        let mut document = Document::new("Test");
        let settings = GridSettings::default();

        assert!(toggle_document_grid(&mut document, &settings).unwrap());
        let grid = document.object(GRID_OBJECT_NAME).unwrap();
        assert_eq!(grid.style, grid_style());
        assert!(!grid.style.selectable);
        assert_eq!(grid.shape().wires().len(), 82);
        assert_eq!(document.recompute_count(), 1);

        assert!(!toggle_document_grid(&mut document, &settings).unwrap());
        assert!(document.object(GRID_OBJECT_NAME).is_none());
        assert_eq!(document.recompute_count(), 2);
    }
}
