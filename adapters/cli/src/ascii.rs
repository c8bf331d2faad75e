//! Text backend that prints scenes to a writer.

use std::{io::Write, time::Duration};

use anyhow::{Context, Result};
use community_maze_core::{
    Archetype, CellCoord, GamePhase, PlayMode, ResourceKind, StationKind, FRAMES_PER_SECOND,
};
use community_maze_rendering::{FrameInput, Presentation, RenderingBackend, Scene};

use crate::autopilot::Autopilot;

const FRAME_DT: Duration = Duration::from_nanos(1_000_000_000 / FRAMES_PER_SECOND as u64);

/// Headless backend driven by the autopilot.
pub(crate) struct AsciiBackend<W> {
    out: W,
    frames: u32,
    render_every: u32,
    autopilot: Autopilot,
}

impl<W: Write> AsciiBackend<W> {
    pub(crate) fn new(out: W, frames: u32, render_every: u32, autopilot: Autopilot) -> Self {
        Self {
            out,
            frames,
            render_every,
            autopilot,
        }
    }
}

impl<W: Write> RenderingBackend for AsciiBackend<W> {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            mut out,
            frames,
            render_every,
            mut autopilot,
        } = self;
        let Presentation {
            window_title,
            scene,
            ..
        } = presentation;

        let mut scene = scene;
        writeln!(out, "{window_title}").context("failed to write title")?;
        write!(out, "{}", render_frame(&scene, 0)).context("failed to write frame")?;

        let mut frame = 0;
        while frame < frames && !scene.is_over() {
            frame += 1;
            let input = autopilot.next_input(frame, &scene);
            update_scene(FRAME_DT, input, &mut scene);

            let scheduled = render_every != 0 && frame % render_every == 0;
            if scheduled || scene.is_over() || frame == frames {
                write!(out, "{}", render_frame(&scene, frame)).context("failed to write frame")?;
            }
        }

        writeln!(out, "{}", summary(&scene)).context("failed to write summary")?;
        out.flush().context("failed to flush output")
    }
}

/// Draws the maze grid followed by a status line.
pub(crate) fn render_frame(scene: &Scene, frame: u32) -> String {
    let mut text = String::new();
    for row in 0..scene.maze.rows {
        for column in 0..scene.maze.columns {
            text.push(glyph(scene, CellCoord::new(column, row)));
        }
        text.push('\n');
    }

    let carried: Vec<&str> = scene
        .player
        .inventory
        .iter()
        .map(|kind| kind.name())
        .collect();
    text.push_str(&format!(
        "frame {frame} | {} | score {} | carrying [{}] {}/{} | {}\n",
        scene.difficulty,
        scene.stats.score,
        carried.join(", "),
        scene.player.inventory.len(),
        scene.player.capacity,
        status(scene),
    ));
    text
}

fn glyph(scene: &Scene, cell: CellCoord) -> char {
    if scene.maze.is_wall(cell.column(), cell.row()) {
        return '#';
    }
    if scene.player.cell == cell {
        return '@';
    }
    if let Some(adversary) = scene.adversary_at(cell) {
        if !adversary.visible {
            return '~';
        }
        let letter = adversary_letter(adversary.archetype);
        return if adversary.is_clone {
            letter.to_ascii_lowercase()
        } else {
            letter
        };
    }
    if let Some(station) = scene.stations.iter().find(|station| station.cell == cell) {
        return station_letter(station.kind);
    }
    if let Some(resource) = scene.resources.iter().find(|resource| resource.cell == cell) {
        return resource_symbol(resource.kind);
    }
    '.'
}

fn adversary_letter(archetype: Archetype) -> char {
    match archetype {
        Archetype::Unemployment => 'U',
        Archetype::Inequality => 'I',
        Archetype::LackOfAccess => 'L',
        Archetype::EconomicCrisis => 'E',
    }
}

fn station_letter(kind: StationKind) -> char {
    match kind {
        StationKind::Housing => 'H',
        StationKind::Market => 'M',
        StationKind::School => 'S',
        StationKind::Hospital => '+',
    }
}

fn resource_symbol(kind: ResourceKind) -> char {
    match kind {
        ResourceKind::Coin => '$',
        ResourceKind::Food => '*',
        ResourceKind::Book => '&',
        ResourceKind::Brick => '=',
    }
}

fn status(scene: &Scene) -> String {
    match scene.phase {
        GamePhase::Running if scene.play_mode == PlayMode::Paused => "paused".to_owned(),
        GamePhase::Running => "running".to_owned(),
        GamePhase::Caught { archetype, .. } => format!("caught by {}", archetype.name()),
        GamePhase::Won => "won".to_owned(),
    }
}

fn summary(scene: &Scene) -> String {
    let stations: Vec<String> = scene
        .stations
        .iter()
        .map(|station| {
            format!(
                "{} {}/{} {:.0}%",
                station.kind.name(),
                station.progress,
                station.max_progress,
                station.completion() * 100.0
            )
        })
        .collect();
    format!(
        "collected {} | delivered {} | stations {} ({}) | score {} | {:.1}s",
        scene.stats.resources_collected,
        scene.stats.items_delivered,
        scene.stats.stations_completed,
        stations.join(", "),
        scene.stats.score,
        scene.stats.elapsed.as_secs_f32(),
    )
}
