//! Command table
//!
//! Commands the workbench registers with the host, and best-effort
//! delegation to the host's drafting commands, whose ids vary between
//! host versions.

use crate::host::CommandRunner;

/// Drafting grid commands tried when the workbench activates
pub const DRAFT_GRID_CANDIDATES: &[&str] = &[
    "Draft_ToggleGrid",
    "Draft_ToggleGridVisibility",
    "Draft_ToggleGridVisible",
    "Draft_Grid",
];

/// Drafting snap toggles tried by the toggle-snap command
pub const DRAFT_SNAP_CANDIDATES: &[&str] = &[
    "Draft_ToggleSnap",
    "Draft_Snap",
    "Draft_ToggleSnapping",
    "Draft_ToggleDraftSnap",
];

/// Drafting snap toggles tried when the workbench activates
pub const DRAFT_SNAP_ACTIVATION_CANDIDATES: &[&str] = &[
    "Draft_Snap",
    "Draft_ToggleSnap",
    "Draft_ToggleSnapping",
    "Draft_ToggleDraftSnap",
];

/// A workbench command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    DrawWall,
    ToggleGrid,
    GridSettings,
    ToggleDraftSnap,
    SnapVertex,
    SnapEndpoint,
    SnapMidpoint,
    SnapIntersection,
    SnapGrid,
}

impl CommandId {
    /// All commands in toolbar order
    pub fn all() -> [CommandId; 9] {
        [
            CommandId::DrawWall,
            CommandId::ToggleGrid,
            CommandId::GridSettings,
            CommandId::ToggleDraftSnap,
            CommandId::SnapVertex,
            CommandId::SnapEndpoint,
            CommandId::SnapMidpoint,
            CommandId::SnapIntersection,
            CommandId::SnapGrid,
        ]
    }

    /// Identifier registered with the host
    pub fn id(&self) -> &'static str {
        match self {
            CommandId::DrawWall => "BuildQ_DrawWall",
            CommandId::ToggleGrid => "BuildQ_ToggleGrid",
            CommandId::GridSettings => "BuildQ_GridSettings",
            CommandId::ToggleDraftSnap => "BuildQ_ToggleDraftSnap",
            CommandId::SnapVertex => "BuildQ_SnapVertex",
            CommandId::SnapEndpoint => "BuildQ_SnapEndpoint",
            CommandId::SnapMidpoint => "BuildQ_SnapMidpoint",
            CommandId::SnapIntersection => "BuildQ_SnapIntersection",
            CommandId::SnapGrid => "BuildQ_SnapGrid",
        }
    }

    /// Look up a command by its host identifier
    pub fn from_id(id: &str) -> Option<CommandId> {
        Self::all().into_iter().find(|command| command.id() == id)
    }

    /// Snap mode name for the snap-mode toggles
    fn snap_mode(&self) -> Option<&'static str> {
        match self {
            CommandId::SnapVertex => Some("Vertex"),
            CommandId::SnapEndpoint => Some("Endpoint"),
            CommandId::SnapMidpoint => Some("Midpoint"),
            CommandId::SnapIntersection => Some("Intersection"),
            CommandId::SnapGrid => Some("Grid"),
            _ => None,
        }
    }

    pub fn menu_text(&self) -> String {
        if let Some(mode) = self.snap_mode() {
            return format!("Snap: {mode}");
        }
        match self {
            CommandId::DrawWall => "New Wall",
            CommandId::ToggleGrid => "Toggle BuildQ Grid",
            CommandId::GridSettings => "BuildQ Grid Settings",
            _ => "Toggle Draft Snap",
        }
        .to_string()
    }

    pub fn tooltip(&self) -> String {
        if let Some(mode) = self.snap_mode() {
            return format!("Toggle Draft snap mode: {mode}");
        }
        match self {
            CommandId::DrawWall => "Create a new wall object",
            CommandId::ToggleGrid => "Toggle the BuildQ workbench grid",
            CommandId::GridSettings => "Configure BuildQ grid spacing and extent",
            _ => "Toggle Draft snapping (tries several Draft command IDs)",
        }
        .to_string()
    }

    /// Whether the command is greyed out without an open document
    pub fn requires_document(&self) -> bool {
        matches!(self, CommandId::DrawWall | CommandId::ToggleGrid)
    }

    /// External commands this command delegates to, in lookup order
    pub fn delegate_candidates(&self) -> &'static [&'static str] {
        match self {
            CommandId::ToggleDraftSnap => DRAFT_SNAP_CANDIDATES,
            CommandId::SnapVertex => &["Draft_SnapVertex", "Draft_SnapVertexMode"],
            CommandId::SnapEndpoint => &["Draft_SnapEndpoint", "Draft_SnapEndpointMode"],
            CommandId::SnapMidpoint => &["Draft_SnapMidpoint", "Draft_SnapMidpointMode"],
            CommandId::SnapIntersection => {
                &["Draft_SnapIntersection", "Draft_SnapIntersectionMode"]
            }
            CommandId::SnapGrid => &["Draft_SnapGrid", "Draft_SnapGridMode"],
            CommandId::DrawWall | CommandId::ToggleGrid | CommandId::GridSettings => &[],
        }
    }
}

/// Run the first candidate the host knows.
///
/// Returns the id that ran, or None when no candidate exists.
pub fn run_first_available(
    runner: &mut dyn CommandRunner,
    candidates: &[&'static str],
) -> Option<&'static str> {
    for &candidate in candidates {
        match runner.run_command(candidate) {
            Ok(()) => {
                tracing::info!("Draft: ran {}", candidate);
                return Some(candidate);
            }
            Err(e) => tracing::debug!("Draft: {} unavailable ({})", candidate, e),
        }
    }
    tracing::info!("Draft: no command found among {:?}", candidates);
    None
}
