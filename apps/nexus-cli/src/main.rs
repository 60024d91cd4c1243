use anyhow::Context;
use clap::{Parser, Subcommand};
use nexus_common::WorldId;
use nexus_input::{InputScript, KeyBindings};
use nexus_kernel::{Notification, PortalTarget, WorldCatalog};
use nexus_render::DebugTextRenderer;
use nexus_runtime::{GameContext, GameLoop, Handoff, LoopConfig, LoopOutcome, Notifier};
use nexus_tools::SessionInspector;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "nexus-cli", about = "Headless tool for the nexus worlds")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// List and validate the world catalog
    Worlds {
        /// YAML catalog to load instead of the built-in worlds
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the built-in world catalog as YAML
    DumpConfig,
    /// Run the game loop headless from a scripted input
    Play {
        /// YAML input script (list of press/release/ticks steps)
        #[arg(short, long)]
        script: Option<PathBuf>,
        /// YAML catalog to load instead of the built-in worlds
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// YAML key bindings (physical key -> forward/backward/left/right)
        #[arg(short, long)]
        bindings: Option<PathBuf>,
        /// World to enter before the first frame
        #[arg(short, long, default_value = "nexus")]
        world: WorldId,
        /// Maximum number of frames to run
        #[arg(short, long, default_value = "600")]
        ticks: u64,
        /// Print the final debug frame
        #[arg(long)]
        frame: bool,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Enter a world and print its initial session
    Inspect {
        #[arg(default_value = "nexus")]
        world: WorldId,
        /// YAML catalog to load instead of the built-in worlds
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Prints notifications to stdout as they happen.
#[derive(Default)]
struct ConsoleNotifier {
    received: Vec<Notification>,
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notification: &Notification) {
        println!("[notify] {notification}");
        self.received.push(*notification);
    }
}

/// Prints the destination instead of leaving the process.
struct PrintHandoff;

impl Handoff for PrintHandoff {
    fn exit_process(&mut self, url: &Url) {
        println!("[handoff] {url}");
    }
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<WorldCatalog> {
    match path {
        Some(p) => WorldCatalog::load_from_file(p)
            .with_context(|| format!("loading world catalog {}", p.display())),
        None => Ok(WorldCatalog::default()),
    }
}

fn load_bindings(path: Option<&Path>) -> anyhow::Result<KeyBindings> {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("reading key bindings {}", p.display()))?;
            Ok(serde_yaml::from_str(&text)?)
        }
        None => Ok(KeyBindings::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("nexus-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", nexus_kernel::crate_info());
            println!("input: {}", nexus_input::crate_info());
            println!("render: {}", nexus_render::crate_info());
            println!("runtime: {}", nexus_runtime::crate_info());
            println!("tools: {}", nexus_tools::crate_info());
        }
        Commands::Worlds { config } => {
            let catalog = load_catalog(config.as_deref())?;
            for def in catalog.definitions() {
                println!(
                    "{:<7} spawn=({:.1}, {:.1}, {:.1}) locomotion={:?} enemies={} runes={} checkpoints={}",
                    def.id,
                    def.spawn.x,
                    def.spawn.y,
                    def.spawn.z,
                    def.locomotion,
                    def.enemies.len(),
                    def.runes.len(),
                    def.course.as_ref().map_or(0, |c| c.checkpoints.len()),
                );
                for portal in &def.portals {
                    let target = match &portal.target {
                        PortalTarget::World { world } => world.to_string(),
                        PortalTarget::Handoff(h) => h.url()?.to_string(),
                    };
                    println!("        portal \"{}\" -> {target}", portal.label);
                }
            }
            println!("catalog OK");
        }
        Commands::DumpConfig => {
            print!("{}", WorldCatalog::default().to_yaml()?);
        }
        Commands::Play {
            script,
            config,
            bindings,
            world,
            ticks,
            frame,
            json,
        } => {
            let catalog = load_catalog(config.as_deref())?;
            let bindings = load_bindings(bindings.as_deref())?;
            let script = match &script {
                Some(p) => InputScript::load_from_file(p)?,
                None => InputScript::default(),
            };

            let mut ctx = GameContext::new(catalog, bindings)?;
            ctx.machine.enter_world(world, Duration::ZERO)?;
            let config = LoopConfig {
                max_frames: Some(ticks),
                ..LoopConfig::default()
            };
            let mut game = GameLoop::new(
                ctx,
                config,
                DebugTextRenderer::new(),
                ConsoleNotifier::default(),
                PrintHandoff,
            );

            let outcome = if script.steps().is_empty() {
                game.run_for(Some(ticks))?
            } else {
                let mut player = script.player();
                game.run_with_input(ticks, |input| player.advance(input))?
            };

            let now = game.context().clock.now();
            let summary = SessionInspector::summary(game.context().machine.session(), now);
            if json {
                let (reason, frames, url) = match &outcome {
                    LoopOutcome::FrameLimit { frames } => ("frame_limit", *frames, None),
                    LoopOutcome::InputExhausted { frames } => ("input_exhausted", *frames, None),
                    LoopOutcome::HandedOff { frames, url } => {
                        ("handed_off", *frames, Some(url.to_string()))
                    }
                };
                let notifications: Vec<String> = game
                    .notifier()
                    .received
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                let report = serde_json::json!({
                    "outcome": reason,
                    "frames": frames,
                    "handoff_url": url,
                    "notifications": notifications,
                    "session": summary,
                    "events": game.context().machine.session().events(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                if frame {
                    print!("{}", game.renderer().last_frame());
                }
                println!("{outcome:?}");
                println!("{summary}");
            }
        }
        Commands::Inspect {
            world,
            config,
            json,
        } => {
            let catalog = load_catalog(config.as_deref())?;
            let mut ctx = GameContext::new(catalog, KeyBindings::default())?;
            ctx.machine.enter_world(world, Duration::ZERO)?;
            let session = ctx.machine.session();
            let summary = SessionInspector::summary(session, Duration::ZERO);
            let items = SessionInspector::list_interactables(session);

            if json {
                let report = serde_json::json!({
                    "session": summary,
                    "interactables": items,
                    "nearest_portal": SessionInspector::nearest_portal(session),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{summary}");
                for item in &items {
                    println!("  {item}");
                }
                if let Some((label, distance)) = SessionInspector::nearest_portal(session) {
                    println!("  nearest portal: \"{label}\" at {distance:.2}");
                }
            }
        }
    }

    Ok(())
}
