// SPDX-License-Identifier: MIT OR Apache-2.0
//! `ReelForge` command-line tool.
//!
//! Creates, inspects and previews project files without a UI: evaluate a
//! single frame as JSON, or simulate playback at a fixed frame rate.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reelforge_editor::{format_clock, EditorConfig, ProjectFile, MAX_SESSION_DURATION};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "reelforge")]
#[command(about = "ReelForge - timeline composition for video editing")]
#[command(version)]
struct Cli {
    /// Editor configuration file (RON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty project with the starter tracks
    New {
        /// Output project file
        path: PathBuf,

        /// Session duration in seconds (defaults to the configured one)
        #[arg(long)]
        duration: Option<f32>,
    },

    /// List the tracks and clips of a project
    Inspect {
        /// Project file
        path: PathBuf,
    },

    /// Print the frame at a time as JSON
    Evaluate {
        /// Project file
        path: PathBuf,

        /// Global time in seconds
        #[arg(short, long)]
        time: f32,
    },

    /// Simulate playback at a fixed frame rate until the end
    Play {
        /// Project file
        path: PathBuf,

        /// Frames per second
        #[arg(long, default_value = "30")]
        fps: u32,

        /// Start time in seconds
        #[arg(long, default_value = "0")]
        from: f32,
    },
}

fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("reelforge_editor=info".parse()?);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::New { path, duration } => {
            new_project(&path, duration.unwrap_or(config.total_duration))?
        }
        Commands::Inspect { path } => inspect(&path)?,
        Commands::Evaluate { path, time } => evaluate(&path, config, time)?,
        Commands::Play { path, fps, from } => play(&path, config, fps, from)?,
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    match path {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(EditorConfig::default()),
    }
}

fn load_project(path: &Path) -> Result<ProjectFile> {
    ProjectFile::load(path).with_context(|| format!("Failed to load project {}", path.display()))
}

fn new_project(path: &Path, duration: f32) -> Result<()> {
    anyhow::ensure!(
        duration.is_finite() && duration > 0.0,
        "Duration must be a positive number of seconds"
    );
    anyhow::ensure!(
        duration <= MAX_SESSION_DURATION,
        "Duration must not exceed {MAX_SESSION_DURATION} seconds"
    );
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Untitled");
    ProjectFile::new(name, duration)
        .save(path)
        .with_context(|| format!("Failed to write project {}", path.display()))?;
    println!("Created {} ({})", path.display(), format_clock(duration));
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let project = load_project(path)?;
    println!(
        "{} - {} session, {} of content - {} assets",
        project.name,
        format_clock(project.total_duration),
        format_clock(project.timeline.content_duration()),
        project.assets.len()
    );

    for track in project.timeline.tracks() {
        let mut flags = String::new();
        if track.muted {
            flags.push_str(" [muted]");
        }
        if track.locked {
            flags.push_str(" [locked]");
        }
        println!(
            "{} ({}, ends {}){}",
            track.name,
            track.accepted_type,
            format_clock(track.duration()),
            flags
        );

        for clip in track.clips() {
            let asset = project
                .assets
                .get(clip.asset_id)
                .map_or("<missing asset>", |a| a.name.as_str());
            println!("  {:>7.2}s .. {:>7.2}s  {}", clip.start_time, clip.end_time(), asset);
        }
    }
    Ok(())
}

fn evaluate(path: &Path, config: EditorConfig, time: f32) -> Result<()> {
    let state = load_project(path)?.into_state(config);
    let frame = state.evaluate_at(time);
    let json = serde_json::to_string_pretty(&frame).context("Failed to encode frame")?;
    println!("{json}");
    Ok(())
}

fn play(path: &Path, config: EditorConfig, fps: u32, from: f32) -> Result<()> {
    anyhow::ensure!(fps > 0, "Frame rate must be at least 1");

    let mut state = load_project(path)?.into_state(config);
    let step = 1.0 / fps as f32;
    state.seek(from);
    state.play();

    let mut frames = 0u64;
    while state.clock().is_playing() {
        let frame = state.tick(step);
        frames += 1;
        tracing::debug!(
            "{} {} layers ({} media)",
            format_clock(frame.time),
            frame.len(),
            frame.media_layers().count()
        );
    }

    println!("Played {frames} frames, stopped at {}", format_clock(state.clock().current_time()));
    Ok(())
}
