//! Host application interfaces
//!
//! Viewport, scene graph and command registry are supplied by the CAD host.
//! Every call is fallible: an absent host feature is reported as
//! [`HostError`] and the caller falls back to a default.

use std::collections::HashSet;

use buildq_cad::{Point, WorkingPlane};
use glam::{DVec2, DVec3, Vec2};
use thiserror::Error;

/// Errors reported by host interfaces
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("Host feature unavailable: {0}")]
    Unavailable(String),

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Event callback error: {0}")]
    Callback(String),

    #[error("No active document")]
    NoDocument,
}

/// Result type for host calls
pub type HostResult<T> = Result<T, HostError>;

/// Handle of a registered viewport event callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(pub u64);

/// Handle of a scene-graph overlay node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub u64);

/// 3D view of the active document
pub trait Viewport {
    /// Current view direction
    fn view_direction(&self) -> HostResult<DVec3>;

    /// Map a screen position to a 3D point on the working plane
    fn point_at(&self, screen: Vec2) -> HostResult<Point>;

    /// Start delivering pointer and keyboard events to the active tool
    fn register_event_callback(&mut self) -> HostResult<CallbackHandle>;

    /// Stop delivering events for `handle`
    fn unregister_event_callback(&mut self, handle: CallbackHandle) -> HostResult<()>;
}

/// A renderable overlay made of line segments
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySpec {
    pub lines: Vec<(Point, Point)>,
    pub color: [f32; 3],
    pub pickable: bool,
}

/// Scene graph of the active view
pub trait SceneGraph {
    /// Attach an overlay node
    fn add_overlay(&mut self, overlay: OverlaySpec) -> HostResult<OverlayId>;

    /// Detach an overlay node
    fn remove_overlay(&mut self, id: OverlayId) -> HostResult<()>;
}

/// Command registry of the host
pub trait CommandRunner {
    /// Run a host command by identifier
    fn run_command(&mut self, id: &str) -> HostResult<()>;
}

/// Viewport looking straight at one working plane.
///
/// Screen coordinates map linearly onto the plane's (u, v) axes.
#[derive(Debug, Clone)]
pub struct PlanViewport {
    /// View direction reported to tools
    pub direction: DVec3,
    /// Planar coordinates at screen (0, 0)
    pub origin: DVec2,
    /// World units per screen pixel
    pub scale: f64,
    next_handle: u64,
    registered: HashSet<CallbackHandle>,
}

impl PlanViewport {
    /// Top view with screen pixels equal to world units
    pub fn top() -> Self {
        Self::looking_along(DVec3::new(0.0, 0.0, -1.0))
    }

    /// View along an arbitrary direction
    pub fn looking_along(direction: DVec3) -> Self {
        Self {
            direction,
            origin: DVec2::ZERO,
            scale: 1.0,
            next_handle: 1,
            registered: HashSet::new(),
        }
    }

    /// Number of registered event callbacks
    pub fn callback_count(&self) -> usize {
        self.registered.len()
    }
}

impl Default for PlanViewport {
    fn default() -> Self {
        Self::top()
    }
}

impl Viewport for PlanViewport {
    fn view_direction(&self) -> HostResult<DVec3> {
        Ok(self.direction)
    }

    fn point_at(&self, screen: Vec2) -> HostResult<Point> {
        let plane = WorkingPlane::from_view_direction(self.direction);
        let uv = self.origin + screen.as_dvec2() * self.scale;
        Ok(plane.from_plane(uv, 0.0))
    }

    fn register_event_callback(&mut self) -> HostResult<CallbackHandle> {
        let handle = CallbackHandle(self.next_handle);
        self.next_handle += 1;
        self.registered.insert(handle);
        Ok(handle)
    }

    fn unregister_event_callback(&mut self, handle: CallbackHandle) -> HostResult<()> {
        if self.registered.remove(&handle) {
            Ok(())
        } else {
            Err(HostError::Callback(format!("unknown callback {}", handle.0)))
        }
    }
}

/// Scene graph that records overlays without drawing them
#[derive(Debug, Default)]
pub struct RecordingScene {
    next_id: u64,
    overlays: Vec<(OverlayId, OverlaySpec)>,
}

impl RecordingScene {
    /// Currently attached overlays
    pub fn overlays(&self) -> &[(OverlayId, OverlaySpec)] {
        &self.overlays
    }
}

impl SceneGraph for RecordingScene {
    fn add_overlay(&mut self, overlay: OverlaySpec) -> HostResult<OverlayId> {
        self.next_id += 1;
        let id = OverlayId(self.next_id);
        self.overlays.push((id, overlay));
        Ok(id)
    }

    fn remove_overlay(&mut self, id: OverlayId) -> HostResult<()> {
        let before = self.overlays.len();
        self.overlays.retain(|(existing, _)| *existing != id);
        if self.overlays.len() == before {
            return Err(HostError::Unavailable(format!("overlay {} not attached", id.0)));
        }
        Ok(())
    }
}

/// Command registry that knows a fixed set of commands and logs every run
#[derive(Debug, Default)]
pub struct RecordingCommands {
    known: HashSet<String>,
    /// Commands that ran, in order
    pub history: Vec<String>,
}

impl RecordingCommands {
    /// Create a registry knowing the given command ids
    pub fn with_commands<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: ids.into_iter().map(Into::into).collect(),
            history: Vec::new(),
        }
    }
}

impl CommandRunner for RecordingCommands {
    fn run_command(&mut self, id: &str) -> HostResult<()> {
        if !self.known.contains(id) {
            return Err(HostError::CommandNotFound(id.to_string()));
        }
        self.history.push(id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_viewport_maps_screen_to_plane() {
        let top = PlanViewport::top();
        assert_eq!(
            top.point_at(Vec2::new(10.0, 20.0)).unwrap(),
            DVec3::new(10.0, 20.0, 0.0)
        );

        let front = PlanViewport::looking_along(DVec3::new(0.0, 1.0, 0.0));
        assert_eq!(
            front.point_at(Vec2::new(10.0, 20.0)).unwrap(),
            DVec3::new(10.0, 0.0, 20.0)
        );
    }

    #[test]
    fn test_callback_registration() {
        let mut viewport = PlanViewport::top();
        let handle = viewport.register_event_callback().unwrap();
        assert_eq!(viewport.callback_count(), 1);
        viewport.unregister_event_callback(handle).unwrap();
        assert_eq!(viewport.callback_count(), 0);
        assert!(viewport.unregister_event_callback(handle).is_err());
    }

    #[test]
    fn test_recording_commands() {
        let mut commands = RecordingCommands::with_commands(["Draft_Snap"]);
        assert!(commands.run_command("Draft_Snap").is_ok());
        assert_eq!(
            commands.run_command("Draft_Missing").unwrap_err(),
            HostError::CommandNotFound("Draft_Missing".into())
        );
        assert_eq!(commands.history, vec!["Draft_Snap".to_string()]);
    }
}
