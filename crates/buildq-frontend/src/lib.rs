//! buildQ frontend
//!
//! Interactive layer of the wall drafting add-in: snapping, the wall tool,
//! grid toggling, settings and the command table. Host services are reached
//! through the traits in [`host`].

pub mod commands;
pub mod config;
pub mod dialogs;
pub mod events;
pub mod grid_overlay;
pub mod host;
pub mod ortho;
pub mod snap;
pub mod tool;
pub mod workbench;

pub use commands::{CommandId, run_first_available};
pub use config::{AppConfig, ConfigManager, SharedConfig, ToolConfig, create_shared_config};
pub use events::{EventPayload, KeyValueEvent, NativeEvent, ToolEvent, dispatch};
pub use host::{CommandRunner, HostError, HostResult, SceneGraph, Viewport};
pub use ortho::lock_orthogonal;
pub use snap::{SnapCandidate, SnapKind, SnapResult, Snapper};
pub use tool::{ToolContext, ToolResponse, ToolState, WallTool};
pub use workbench::{CommandOutcome, HostContext, Workbench, WorkbenchError};
