//! Workbench
//!
//! Owns the process-wide state of the add-in (configuration, grid overlay
//! handle, active wall tool) and runs commands against whatever host
//! services are available.

use buildq_cad::{GridSettings, HostDocument};
use thiserror::Error;

use crate::commands::{
    CommandId, DRAFT_GRID_CANDIDATES, DRAFT_SNAP_ACTIVATION_CANDIDATES, run_first_available,
};
use crate::config::{SettingsError, SharedConfig, read_grid_settings};
use crate::dialogs::GridSettingsDialog;
use crate::events::EventPayload;
use crate::grid_overlay::{GridOverlay, GridToggleError, toggle_document_grid};
use crate::host::{CommandRunner, HostError, SceneGraph, Viewport};
use crate::tool::{ToolContext, ToolResponse, WallTool};

/// Workbench errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkbenchError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Grid(#[from] GridToggleError),
}

/// Result type for workbench commands
pub type WorkbenchResult<T> = Result<T, WorkbenchError>;

/// Host services for one command or event
pub struct HostContext<'a> {
    pub document: Option<&'a mut dyn HostDocument>,
    pub viewport: Option<&'a mut dyn Viewport>,
    pub scene: Option<&'a mut dyn SceneGraph>,
    pub commands: &'a mut dyn CommandRunner,
}

/// What a command did
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// The wall tool is waiting for its first point
    ToolStarted,
    /// The grid was toggled
    GridToggled { visible: bool },
    /// The grid settings dialog is open
    GridSettingsOpened(GridSettingsDialog),
    /// An external drafting command ran, or none was found
    Delegated(Option<&'static str>),
}

/// The buildQ workbench
pub struct Workbench {
    config: SharedConfig,
    grid_overlay: GridOverlay,
    wall_tool: Option<WallTool>,
}

impl Workbench {
    /// Create a workbench using the given configuration
    pub fn new(config: SharedConfig) -> Self {
        Self {
            config,
            grid_overlay: GridOverlay::new(),
            wall_tool: None,
        }
    }

    /// Shared configuration
    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// Running wall tool, if any
    pub fn wall_tool(&self) -> Option<&WallTool> {
        self.wall_tool.as_ref()
    }

    /// Grid overlay handle
    pub fn grid_overlay(&self) -> &GridOverlay {
        &self.grid_overlay
    }

    /// Grid settings as currently stored
    pub fn grid_settings(&self) -> GridSettings {
        read_grid_settings(Some(&self.config))
    }

    /// Check if a command can run in this context
    pub fn is_command_active(&self, command: CommandId, ctx: &HostContext) -> bool {
        !command.requires_document() || ctx.document.is_some()
    }

    /// Called when the user switches to the workbench.
    ///
    /// Re-enables the host's drafting grid and snapping so their state
    /// persists across workbenches.
    pub fn activated(&mut self, commands: &mut dyn CommandRunner) {
        tracing::info!("buildQ workbench activated");
        run_first_available(commands, DRAFT_GRID_CANDIDATES);
        run_first_available(commands, DRAFT_SNAP_ACTIVATION_CANDIDATES);
    }

    /// Called when the user leaves the workbench
    pub fn deactivated(&mut self, ctx: &mut HostContext) {
        if let Some(mut tool) = self.wall_tool.take() {
            if let (Some(document), Some(viewport)) =
                (ctx.document.as_deref_mut(), ctx.viewport.as_deref_mut())
            {
                let mut tool_ctx = ToolContext {
                    document,
                    viewport,
                    settings: Some(&self.config),
                };
                tool.cancel(&mut tool_ctx);
            }
        }
        tracing::info!("buildQ workbench deactivated");
    }

    /// Run a workbench command
    pub fn run(
        &mut self,
        command: CommandId,
        ctx: &mut HostContext,
    ) -> WorkbenchResult<CommandOutcome> {
        if !self.is_command_active(command, ctx) {
            return Err(HostError::NoDocument.into());
        }
        tracing::debug!("Running {}", command.id());

        match command {
            CommandId::DrawWall => self.start_wall_tool(ctx),
            CommandId::ToggleGrid => self.toggle_grid(ctx),
            CommandId::GridSettings => {
                let dialog = GridSettingsDialog::open(Some(&self.config))?;
                Ok(CommandOutcome::GridSettingsOpened(dialog))
            }
            CommandId::ToggleDraftSnap
            | CommandId::SnapVertex
            | CommandId::SnapEndpoint
            | CommandId::SnapMidpoint
            | CommandId::SnapIntersection
            | CommandId::SnapGrid => Ok(CommandOutcome::Delegated(run_first_available(
                ctx.commands,
                command.delegate_candidates(),
            ))),
        }
    }

    /// Store the dialog values and recompute the active document
    pub fn accept_grid_settings(
        &mut self,
        dialog: GridSettingsDialog,
        ctx: &mut HostContext,
    ) -> WorkbenchResult<GridSettings> {
        let document = match ctx.document.as_deref_mut() {
            Some(document) => Some(document as &mut dyn HostDocument),
            None => None,
        };
        Ok(dialog.accept(&mut self.config, document)?)
    }

    /// Forward a viewport event to the running wall tool
    pub fn handle_event(
        &mut self,
        ctx: &mut HostContext,
        payload: &dyn EventPayload,
    ) -> ToolResponse {
        let Some(tool) = self.wall_tool.as_mut() else {
            return ToolResponse::Ignored;
        };
        let (Some(document), Some(viewport)) =
            (ctx.document.as_deref_mut(), ctx.viewport.as_deref_mut())
        else {
            return ToolResponse::Ignored;
        };

        let mut tool_ctx = ToolContext {
            document,
            viewport,
            settings: Some(&self.config),
        };
        let response = tool.handle_payload(&mut tool_ctx, payload);
        if !tool.state().is_active() {
            self.wall_tool = None;
        }

        if let ToolResponse::RunCommand(command) = &response {
            if let Err(e) = self.run(*command, ctx) {
                tracing::warn!("{} failed: {}", command.id(), e);
            }
        }
        response
    }

    fn start_wall_tool(&mut self, ctx: &mut HostContext) -> WorkbenchResult<CommandOutcome> {
        let document = ctx.document.as_deref_mut().ok_or(HostError::NoDocument)?;
        let viewport = ctx
            .viewport
            .as_deref_mut()
            .ok_or_else(|| HostError::Unavailable("3D view".into()))?;

        let mut tool_ctx = ToolContext {
            document,
            viewport,
            settings: Some(&self.config),
        };
        if let Some(mut previous) = self.wall_tool.take() {
            previous.cancel(&mut tool_ctx);
        }

        let mut tool = WallTool::new(self.config.read().config().tool);
        tool.activate(&mut tool_ctx);
        self.wall_tool = Some(tool);
        Ok(CommandOutcome::ToolStarted)
    }

    fn toggle_grid(&mut self, ctx: &mut HostContext) -> WorkbenchResult<CommandOutcome> {
        let settings = self.grid_settings();
        let visible = match ctx.scene.as_deref_mut() {
            Some(scene) => self.grid_overlay.toggle(scene, &settings)?,
            None => {
                tracing::debug!("No scene graph, toggling the grid object");
                let document = ctx.document.as_deref_mut().ok_or(HostError::NoDocument)?;
                toggle_document_grid(document, &settings)?
            }
        };
        Ok(CommandOutcome::GridToggled { visible })
    }
}
