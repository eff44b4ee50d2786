//! Interactive wall tool
//!
//! The tool is a small state machine fed by viewport events:
//!
//! - `Idle`: not drawing; events are ignored
//! - `AwaitingStart`: a cursor marker follows the snapped pointer
//! - `AwaitingEnd`: a live preview runs from the start to the snapped,
//!   optionally axis-locked pointer
//!
//! The second click commits one wall. With Shift held the tool keeps
//! drawing from the end of the committed wall.

mod preview;

pub use preview::{
    MARKER_COLOR, MARKER_OBJECT_NAME, PREVIEW_OBJECT_NAME, PREVIEW_TRANSPARENCY, ToolVisuals,
    make_cross, make_preview_shape,
};

use buildq_cad::{HostDocument, Point, WallEntity, WorkingPlane};
use glam::Vec2;

use crate::commands::CommandId;
use crate::config::{SettingsStorage, ToolConfig, read_grid_settings};
use crate::events::{EventPayload, Key, Modifiers, MouseButton, ToolEvent, dispatch};
use crate::host::{CallbackHandle, Viewport};
use crate::ortho::lock_orthogonal;
use crate::snap::{SnapResult, Snapper};

/// Base name of committed wall objects
pub const WALL_OBJECT_NAME: &str = "WallAssembly";

/// Drawing state of the wall tool
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ToolState {
    #[default]
    Idle,
    AwaitingStart,
    AwaitingEnd {
        start: Point,
    },
}

impl ToolState {
    /// Check if the tool is drawing
    pub fn is_active(&self) -> bool {
        !matches!(self, ToolState::Idle)
    }
}

/// What an event did
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResponse {
    Ignored,
    MarkerMoved(Point),
    PreviewUpdated(Point),
    Started(Point),
    Committed { wall: String, chained: bool },
    Cancelled,
    OrthoLockChanged(bool),
    /// The host should run this command
    RunCommand(CommandId),
}

/// Host services available while the tool runs
pub struct ToolContext<'a> {
    pub document: &'a mut dyn HostDocument,
    pub viewport: &'a mut dyn Viewport,
    pub settings: Option<&'a dyn SettingsStorage>,
}

/// Draws walls from two clicks
#[derive(Debug)]
pub struct WallTool {
    state: ToolState,
    ortho_lock: bool,
    current: Option<Point>,
    config: ToolConfig,
    visuals: ToolVisuals,
    callback: Option<CallbackHandle>,
}

impl WallTool {
    /// Create an idle tool
    pub fn new(config: ToolConfig) -> Self {
        let config = config.sanitized();
        Self {
            state: ToolState::Idle,
            ortho_lock: config.ortho_lock,
            current: None,
            config,
            visuals: ToolVisuals::new(),
            callback: None,
        }
    }

    /// Current state
    pub fn state(&self) -> ToolState {
        self.state
    }

    /// Check if the orthogonal lock is on
    pub fn ortho_lock(&self) -> bool {
        self.ortho_lock
    }

    /// Last resolved end point while drawing
    pub fn current_point(&self) -> Option<Point> {
        self.current
    }

    /// Tool settings
    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Preview and marker objects
    pub fn visuals(&self) -> &ToolVisuals {
        &self.visuals
    }

    /// Start waiting for the first point.
    ///
    /// A viewport that cannot deliver events leaves the tool usable through
    /// [`WallTool::handle_event`].
    pub fn activate(&mut self, ctx: &mut ToolContext) {
        if self.state.is_active() {
            return;
        }

        match ctx.viewport.register_event_callback() {
            Ok(handle) => self.callback = Some(handle),
            Err(e) => tracing::warn!("Event callback unavailable: {}", e),
        }

        self.state = ToolState::AwaitingStart;
        self.current = None;
        self.ortho_lock = self.config.ortho_lock;
        tracing::info!(
            "Wall tool active (thickness {}, level {})",
            self.config.wall_thickness,
            self.config.level
        );
    }

    /// Classify a raw event and handle it
    pub fn handle_payload(
        &mut self,
        ctx: &mut ToolContext,
        payload: &dyn EventPayload,
    ) -> ToolResponse {
        match dispatch(payload) {
            Some(event) => self.handle_event(ctx, event),
            None => ToolResponse::Ignored,
        }
    }

    /// Handle one event
    pub fn handle_event(&mut self, ctx: &mut ToolContext, event: ToolEvent) -> ToolResponse {
        if !self.state.is_active() {
            return ToolResponse::Ignored;
        }

        match event {
            ToolEvent::PointerMove { position } => self.on_move(ctx, position),
            ToolEvent::ButtonDown {
                button: MouseButton::Secondary,
                ..
            } => {
                self.cancel(ctx);
                ToolResponse::Cancelled
            }
            ToolEvent::ButtonDown {
                button: MouseButton::Primary,
                position: Some(position),
                modifiers,
            } => self.on_click(ctx, position, modifiers),
            ToolEvent::ButtonDown { .. } => ToolResponse::Ignored,
            ToolEvent::KeyDown { key, .. } => self.on_key(ctx, key),
            ToolEvent::KeyUp { .. } => ToolResponse::Ignored,
        }
    }

    /// Discard the preview and marker and stop drawing
    pub fn cancel(&mut self, ctx: &mut ToolContext) {
        tracing::info!("Wall tool cancelled");
        self.finish(ctx);
    }

    /// Release every tool resource and return to idle
    pub fn finish(&mut self, ctx: &mut ToolContext) {
        if let Some(handle) = self.callback.take() {
            if let Err(e) = ctx.viewport.unregister_event_callback(handle) {
                tracing::debug!("Event callback already removed: {}", e);
            }
        }
        self.visuals.clear(ctx.document);
        self.state = ToolState::Idle;
        self.current = None;
        tracing::debug!("Wall tool finished");
    }

    fn on_move(&mut self, ctx: &mut ToolContext, position: Vec2) -> ToolResponse {
        match self.state {
            ToolState::AwaitingStart => {
                let Some(snap) = self.resolve(ctx, position, None) else {
                    return ToolResponse::Ignored;
                };
                let size = self.config.marker_size();
                self.visuals
                    .update_marker(ctx.document, snap.point, size, snap.plane);
                ToolResponse::MarkerMoved(snap.point)
            }
            ToolState::AwaitingEnd { start } => {
                let Some(end) = self.resolve_end(ctx, position, start) else {
                    return ToolResponse::Ignored;
                };
                self.current = Some(end);
                self.visuals
                    .update_preview(ctx.document, start, end, self.config.wall_thickness);
                ToolResponse::PreviewUpdated(end)
            }
            ToolState::Idle => ToolResponse::Ignored,
        }
    }

    fn on_click(&mut self, ctx: &mut ToolContext, position: Vec2, modifiers: Modifiers) -> ToolResponse {
        match self.state {
            ToolState::AwaitingStart => {
                let Some(snap) = self.resolve(ctx, position, None) else {
                    return ToolResponse::Ignored;
                };
                let start = snap.point;
                self.visuals.clear_marker(ctx.document);
                self.state = ToolState::AwaitingEnd { start };
                self.current = Some(start);
                self.visuals
                    .update_preview(ctx.document, start, start, self.config.wall_thickness);
                tracing::debug!("Wall start at {:?}", start);
                ToolResponse::Started(start)
            }
            ToolState::AwaitingEnd { start } => {
                let Some(end) = self.resolve_end(ctx, position, start) else {
                    return ToolResponse::Ignored;
                };
                let Some(wall) = self.commit(ctx, start, end) else {
                    return ToolResponse::Ignored;
                };

                self.visuals.clear_preview(ctx.document);
                if modifiers.shift {
                    self.state = ToolState::AwaitingEnd { start: end };
                    self.current = None;
                    ToolResponse::Committed {
                        wall,
                        chained: true,
                    }
                } else {
                    self.finish(ctx);
                    ToolResponse::Committed {
                        wall,
                        chained: false,
                    }
                }
            }
            ToolState::Idle => ToolResponse::Ignored,
        }
    }

    fn on_key(&mut self, ctx: &mut ToolContext, key: Key) -> ToolResponse {
        match key {
            Key::Escape => {
                self.cancel(ctx);
                ToolResponse::Cancelled
            }
            Key::LeftControl => {
                self.ortho_lock = !self.ortho_lock;
                tracing::debug!("Orthogonal lock {}", if self.ortho_lock { "on" } else { "off" });
                ToolResponse::OrthoLockChanged(self.ortho_lock)
            }
            Key::Character('G') => ToolResponse::RunCommand(CommandId::ToggleDraftSnap),
            _ => ToolResponse::Ignored,
        }
    }

    /// Snap the point under the cursor
    fn resolve(
        &self,
        ctx: &ToolContext,
        position: Vec2,
        start: Option<Point>,
    ) -> Option<SnapResult> {
        let raw = match ctx.viewport.point_at(position) {
            Ok(point) => point,
            Err(e) => {
                tracing::warn!("Could not map cursor to the working plane: {}", e);
                return None;
            }
        };
        let direction = match ctx.viewport.view_direction() {
            Ok(direction) => Some(direction),
            Err(e) => {
                tracing::debug!("No view direction, drawing in plan: {}", e);
                None
            }
        };

        let snapper = Snapper::new(self.config.snap_threshold, self.config.level)
            .with_grid(read_grid_settings(ctx.settings));
        let plane = direction
            .map(WorkingPlane::from_view_direction)
            .unwrap_or_default();
        let raw = plane.pin_to_level(raw, self.config.level);

        let ignore = self.visuals.ignored_names();
        Some(snapper.snap(&*ctx.document, direction, raw, start, &ignore))
    }

    /// Snap, then apply the orthogonal lock relative to `start`
    fn resolve_end(&self, ctx: &ToolContext, position: Vec2, start: Point) -> Option<Point> {
        let snap = self.resolve(ctx, position, Some(start))?;
        if self.ortho_lock {
            Some(lock_orthogonal(start, snap.point, snap.plane))
        } else {
            Some(snap.point)
        }
    }

    fn commit(&mut self, ctx: &mut ToolContext, start: Point, end: Point) -> Option<String> {
        let wall = match WallEntity::new(start, end, self.config.wall_thickness) {
            Ok(wall) => wall,
            Err(e) => {
                tracing::warn!("Wall not created: {}", e);
                return None;
            }
        };

        match ctx.document.add_wall(WALL_OBJECT_NAME, wall) {
            Ok(name) => {
                ctx.document.recompute();
                tracing::info!("Created {} from {:?} to {:?}", name, start, end);
                Some(name)
            }
            Err(e) => {
                tracing::warn!("Wall not created: {}", e);
                None
            }
        }
    }
}
