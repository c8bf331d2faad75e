#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Community Maze rounds headlessly.

mod ascii;
mod autopilot;
mod config;

use std::io;

use anyhow::Result;
use clap::Parser;
use community_maze_rendering::{Color, Presentation, RenderingBackend};
use community_maze_system_session::Session;
use community_maze_world::query;
use log::info;

use crate::{
    ascii::AsciiBackend,
    autopilot::Autopilot,
    config::{Args, Settings},
};

const WINDOW_TITLE: &str = "Community Maze";
const AUTOPILOT_INTERVAL: u32 = 20;

/// Entry point for the Community Maze command-line interface.
fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let settings = Settings::resolve(&args)?;
    info!(
        "starting {} round with seed {}",
        settings.difficulty, settings.seed
    );

    let mut session = Session::new(settings.world, settings.spawn, settings.seed)?;
    println!("{}", query::welcome_banner(session.world()));
    let _ = session.start(settings.difficulty);

    let presentation = Presentation::new(
        WINDOW_TITLE,
        Color::from_rgb_u8(0, 0, 0),
        session.scene(),
    );
    let backend = AsciiBackend::new(
        io::stdout(),
        settings.frames,
        settings.render_every,
        Autopilot::new(AUTOPILOT_INTERVAL),
    );

    backend.run(presentation, move |dt, input, scene| {
        session.advance_frame(dt, &input, scene);
    })
}
