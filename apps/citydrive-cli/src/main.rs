mod config;

use anyhow::{Context, Result};
use citydrive_input::{Action, InputScript, Key, ScriptSegment, ScriptedInput};
use citydrive_render::{DebugTextRenderer, DriveLoop, JsonRenderer};
use clap::{Parser, Subcommand};
use config::DriveConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "citydrive-cli", about = "Headless driver for the city drive demo")]
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
    /// Play an input script and print what the renderer would draw
    Drive {
        /// YAML input script
        #[arg(short, long)]
        script: PathBuf,
        /// Config file (YAML, or JSON by extension)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the script-wide frame time, in seconds
        #[arg(long)]
        dt: Option<f32>,
        /// Viewport aspect ratio
        #[arg(long, default_value = "1.7777778")]
        aspect: f32,
        /// Print every Nth frame
        #[arg(short, long, default_value = "60")]
        every: u64,
        /// Emit one JSON object per printed frame
        #[arg(long)]
        json: bool,
    },
    /// Run a built-in session: accelerate, turn, jump, brake
    Demo {
        /// Number of frames to run; the built-in script loops or is cut to fit
        #[arg(short, long)]
        frames: Option<u64>,
        /// Frame time in seconds
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Print every Nth frame
        #[arg(short, long, default_value = "30")]
        every: u64,
    },
    /// Show the active key bindings
    Bindings {
        /// Config file (YAML, or JSON by extension)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("citydrive-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", citydrive_common::crate_info());
            println!("input: {}", citydrive_input::crate_info());
            println!("kernel: {}", citydrive_kernel::crate_info());
            println!("render: {}", citydrive_render::crate_info());
        }
        Commands::Drive {
            script,
            config,
            dt,
            aspect,
            every,
            json,
        } => {
            let config = DriveConfig::load_or_default(config.as_deref())?;
            let text = std::fs::read_to_string(&script)
                .with_context(|| format!("reading script {}", script.display()))?;
            let mut script = InputScript::from_yaml_str(&text)?;
            if let Some(dt) = dt {
                script.dt = dt;
                script.validate()?;
            }
            println!(
                "Driving {} frames ({:.2}s simulated)",
                script.total_frames(),
                script.duration()
            );
            let source = ScriptedInput::new(script, config.bindings.clone());
            run_session(source, &config, aspect, every, json)?;
        }
        Commands::Demo { frames, dt, every } => {
            let mut script = demo_script(dt);
            if let Some(frames) = frames {
                script = script.fit_to_frames(frames);
            }
            script.validate()?;
            let config = DriveConfig::default();
            let source = ScriptedInput::new(script, config.bindings.clone());
            run_session(source, &config, 16.0 / 9.0, every, false)?;
        }
        Commands::Bindings { config } => {
            let config = DriveConfig::load_or_default(config.as_deref())?;
            for action in Action::ALL {
                let keys: Vec<String> = config
                    .bindings
                    .keys_for(action)
                    .iter()
                    .map(Key::to_string)
                    .collect();
                let keys = if keys.is_empty() {
                    "(unbound)".to_string()
                } else {
                    keys.join(", ")
                };
                println!("{:<20} {}", action.label(), keys);
            }
        }
    }

    Ok(())
}

fn run_session(
    mut source: ScriptedInput,
    config: &DriveConfig,
    aspect: f32,
    every: u64,
    json: bool,
) -> Result<()> {
    let every = every.max(1);
    let mut drive = DriveLoop::new(config.motion, config.camera, aspect);
    let text = DebugTextRenderer::new();
    let mut failure = None;

    let frames = drive.run(&mut source, |l| {
        if l.motion().frame() % every != 0 || failure.is_some() {
            return;
        }
        if json {
            match l.render(&JsonRenderer) {
                Ok(line) => println!("{line}"),
                Err(e) => failure = Some(e),
            }
        } else {
            print!("{}", l.render(&text));
        }
    });
    if let Some(e) = failure {
        return Err(e).context("encoding frame");
    }

    let state = drive.motion().state();
    if json {
        println!("{}", serde_json::to_string(&state)?);
    } else {
        println!(
            "Finished after {frames} frames: pos=({:.2}, {:.2}, {:.2}) speed={:.2} heading={:.1}deg",
            state.position.x,
            state.position.y,
            state.position.z,
            state.speed,
            state.heading.to_degrees()
        );
    }
    Ok(())
}

fn demo_script(dt: f32) -> InputScript {
    let seg = |frames, keys: &[Key]| ScriptSegment {
        frames,
        keys: keys.to_vec(),
        dt: None,
    };
    InputScript::new(
        dt,
        vec![
            seg(30, &[]),
            seg(120, &[Key::W]),
            seg(90, &[Key::W, Key::A]),
            seg(1, &[Key::Space]),
            seg(60, &[Key::LeftShift]),
            seg(60, &[Key::W]),
            seg(90, &[Key::S, Key::D]),
        ],
    )
}
