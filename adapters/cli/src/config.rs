//! Run settings resolved from command-line flags and an optional TOML file.
//!
//! Flags take precedence over the file, and the file over built-in defaults.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use community_maze_core::Difficulty;
use community_maze_system_session::SpawnConfig;
use community_maze_world::{Maze, WorldConfig};
use serde::Deserialize;

const DEFAULT_FRAMES: u32 = 3_600;
const DEFAULT_RENDER_EVERY: u32 = 120;

/// Headless runner for the Community Maze engine.
#[derive(Debug, Parser)]
#[command(name = "community-maze", version)]
pub(crate) struct Args {
    /// Difficulty tier: easy, normal (alias default) or hard.
    #[arg(long)]
    pub(crate) difficulty: Option<Difficulty>,
    /// Seed for adversary behaviour and resource spawning.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Number of frames to simulate before exiting.
    #[arg(long)]
    pub(crate) frames: Option<u32>,
    /// Print the maze every N frames; 0 prints only the last frame.
    #[arg(long)]
    pub(crate) render_every: Option<u32>,
    /// TOML file holding run settings.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Maze text file using `#`/`1` for walls and `.`/`0`/space for floors.
    #[arg(long)]
    pub(crate) maze: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    difficulty: Option<Difficulty>,
    seed: Option<u64>,
    frames: Option<u32>,
    render_every: Option<u32>,
    maze: Option<PathBuf>,
    player_speed: Option<u32>,
    inventory_capacity: Option<usize>,
    spawn_interval_ms: Option<u64>,
    max_resources: Option<usize>,
}

/// Fully resolved settings for one run.
#[derive(Debug)]
pub(crate) struct Settings {
    pub(crate) difficulty: Difficulty,
    pub(crate) seed: u64,
    pub(crate) frames: u32,
    pub(crate) render_every: u32,
    pub(crate) world: WorldConfig,
    pub(crate) spawn: SpawnConfig,
}

impl Settings {
    /// Resolves settings from parsed flags, loading referenced files.
    pub(crate) fn resolve(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => load_file_config(path)?,
            None => FileConfig::default(),
        };
        merge(args, file)
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let mut config = parse_file_config(&contents)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    config.maze = config.maze.map(|maze| base.join(maze));
    Ok(config)
}

fn parse_file_config(contents: &str) -> Result<FileConfig> {
    toml::from_str(contents).context("failed to parse config toml contents")
}

fn load_maze(path: &Path) -> Result<Maze> {
    let layout = fs::read_to_string(path)
        .with_context(|| format!("failed to read maze file {}", path.display()))?;
    Maze::parse(&layout).with_context(|| format!("invalid maze in {}", path.display()))
}

fn merge(args: &Args, file: FileConfig) -> Result<Settings> {
    let frames = args.frames.or(file.frames).unwrap_or(DEFAULT_FRAMES);
    if frames == 0 {
        bail!("frame count must be positive");
    }

    let mut world = match args.maze.as_deref().or(file.maze.as_deref()) {
        Some(path) => WorldConfig::with_maze(load_maze(path)?),
        None => WorldConfig::default(),
    };
    if let Some(speed) = file.player_speed {
        world.player_speed = speed;
    }
    if let Some(capacity) = file.inventory_capacity {
        world.inventory_capacity = capacity;
    }

    let mut spawn = SpawnConfig::default();
    if let Some(interval) = file.spawn_interval_ms {
        spawn = spawn.with_spawn_interval(Duration::from_millis(interval));
    }
    if let Some(max) = file.max_resources {
        spawn = spawn.with_max_resources(max);
    }

    Ok(Settings {
        difficulty: args.difficulty.or(file.difficulty).unwrap_or_default(),
        seed: args
            .seed
            .or(file.seed)
            .unwrap_or_else(rand::random::<u64>),
        frames,
        render_every: args
            .render_every
            .or(file.render_every)
            .unwrap_or(DEFAULT_RENDER_EVERY),
        world,
        spawn,
    })
}
