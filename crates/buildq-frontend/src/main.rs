//! Headless buildQ driver
//!
//! Replays a RON script of pointer and keyboard steps through the wall tool
//! on an in-memory document and prints the resulting walls as JSON.
//!
//! ```text
//! buildq session.ron
//! ```
//!
//! with `session.ron` such as
//!
//! ```text
//! (steps: [Click(x: 0.0, y: 0.0), Move(x: 1000.0, y: 3.0), Click(x: 1000.0, y: 3.0)])
//! ```

use buildq_cad::{Document, HostDocument};
use buildq_frontend::events::Modifiers;
use buildq_frontend::host::{PlanViewport, RecordingCommands};
use buildq_frontend::{
    CommandId, CommandOutcome, HostContext, KeyValueEvent, NativeEvent, Workbench,
    create_shared_config,
};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// One scripted user action
#[derive(Debug, Clone, Deserialize)]
enum Step {
    Move {
        x: f32,
        y: f32,
    },
    Click {
        x: f32,
        y: f32,
        #[serde(default)]
        shift: bool,
    },
    RightClick {
        x: f32,
        y: f32,
    },
    /// Key name such as `Escape`, `Control` or `G`
    Key(String),
    /// Workbench command id such as `BuildQ_DrawWall`
    Command(String),
}

#[derive(Debug, Clone, Deserialize)]
struct Script {
    steps: Vec<Step>,
}

impl Script {
    /// Activate, click the origin, move to (1000, 3), click again
    fn default_session() -> Self {
        Self {
            steps: vec![
                Step::Click {
                    x: 0.0,
                    y: 0.0,
                    shift: false,
                },
                Step::Move { x: 1000.0, y: 3.0 },
                Step::Click {
                    x: 1000.0,
                    y: 3.0,
                    shift: false,
                },
            ],
        }
    }
}

#[derive(Debug, Serialize)]
struct WallSummary<'a> {
    name: &'a str,
    start: DVec3,
    end: DVec3,
    thickness: f64,
    length: f64,
    shape: &'static str,
}

fn load_script(path: &str) -> Result<Script, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(ron::from_str(&content)?)
}

fn replay(workbench: &mut Workbench, ctx: &mut HostContext, step: &Step) {
    let response = match step {
        Step::Move { x, y } => workbench.handle_event(ctx, &NativeEvent::moved(*x, *y)),
        Step::Click { x, y, shift } => {
            let modifiers = Modifiers {
                shift: *shift,
                ..Default::default()
            };
            workbench.handle_event(ctx, &NativeEvent::pressed(*x, *y, 1, modifiers))
        }
        Step::RightClick { x, y } => {
            workbench.handle_event(ctx, &NativeEvent::pressed(*x, *y, 3, Modifiers::default()))
        }
        Step::Key(name) => {
            let event = KeyValueEvent::from_value(serde_json::json!({
                "Type": "SoKeyboardEvent",
                "Key": name,
                "State": "DOWN",
            }));
            match event {
                Some(event) => workbench.handle_event(ctx, &event),
                None => return,
            }
        }
        Step::Command(id) => {
            let Some(command) = CommandId::from_id(id) else {
                tracing::warn!("Unknown command {}", id);
                return;
            };
            match workbench.run(command, ctx) {
                Ok(CommandOutcome::GridSettingsOpened(dialog)) => {
                    tracing::info!("Grid settings: {:?}", dialog.values());
                }
                Ok(outcome) => tracing::debug!("{} -> {:?}", id, outcome),
                Err(e) => tracing::warn!("{} failed: {}", id, e),
            }
            return;
        }
    };
    tracing::debug!("{:?} -> {:?}", step, response);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "buildq_frontend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let script = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!("Replaying {}", path);
            load_script(&path)?
        }
        None => {
            tracing::info!("No script given, drawing the default wall");
            Script::default_session()
        }
    };

    let mut workbench = Workbench::new(create_shared_config());
    let mut document = Document::new("Unnamed");
    let mut viewport = PlanViewport::top();
    let mut commands = RecordingCommands::default();

    workbench.activated(&mut commands);
    {
        let mut ctx = HostContext {
            document: Some(&mut document),
            viewport: Some(&mut viewport),
            scene: None,
            commands: &mut commands,
        };
        workbench.run(CommandId::DrawWall, &mut ctx)?;
        for step in &script.steps {
            replay(&mut workbench, &mut ctx, step);
        }
        workbench.deactivated(&mut ctx);
    }

    let walls: Vec<WallSummary> = document
        .walls()
        .map(|(name, wall)| WallSummary {
            name,
            start: wall.start(),
            end: wall.end(),
            thickness: wall.thickness(),
            length: wall.length(),
            shape: wall.shape().type_name(),
        })
        .collect();
    tracing::info!("{} wall(s), {} object(s)", walls.len(), document.objects().count());

    println!("{}", serde_json::to_string_pretty(&walls)?);
    Ok(())
}
