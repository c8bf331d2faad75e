//! Scripted input source that plays the round without a human.

use community_maze_core::{CellCoord, ResourceKind};
use community_maze_rendering::{FrameInput, Scene};
use glam::Vec2;

/// Clicks towards the most useful cell at a fixed frame cadence.
///
/// Carried items that an unfinished station still needs are delivered first.
/// Otherwise the nearest needed resource is fetched, then any resource. A full
/// inventory that no station accepts is emptied one item at a time.
#[derive(Debug)]
pub(crate) struct Autopilot {
    interval: u32,
}

impl Autopilot {
    pub(crate) fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
        }
    }

    /// Produces the input for `frame` given the scene drawn before it.
    pub(crate) fn next_input(&mut self, frame: u32, scene: &Scene) -> FrameInput {
        if scene.is_over() || frame % self.interval != 0 {
            return FrameInput::default();
        }

        match choose_target(scene) {
            Some(cell) => FrameInput {
                click: Some(
                    scene.maze.cell_origin(cell) + Vec2::splat(scene.maze.cell_size / 2.0),
                ),
                ..FrameInput::default()
            },
            None => FrameInput {
                discard: scene.player.inventory.len() >= scene.player.capacity,
                ..FrameInput::default()
            },
        }
    }
}

fn choose_target(scene: &Scene) -> Option<CellCoord> {
    let origin = scene.player.cell;
    let needed: Vec<ResourceKind> = scene
        .stations
        .iter()
        .filter(|station| station.progress < station.max_progress)
        .map(|station| station.kind.required_resource())
        .collect();

    let delivery = scene
        .stations
        .iter()
        .filter(|station| station.progress < station.max_progress)
        .filter(|station| {
            scene
                .player
                .inventory
                .contains(&station.kind.required_resource())
        })
        .map(|station| station.cell)
        .min_by_key(|cell| origin.manhattan_distance(*cell));
    if delivery.is_some() {
        return delivery;
    }

    if scene.player.inventory.len() >= scene.player.capacity {
        return None;
    }

    let nearest = |wanted: &dyn Fn(ResourceKind) -> bool| {
        scene
            .resources
            .iter()
            .filter(|resource| wanted(resource.kind))
            .map(|resource| resource.cell)
            .min_by_key(|cell| origin.manhattan_distance(*cell))
    };
    nearest(&|kind: ResourceKind| needed.contains(&kind))
        .or_else(|| nearest(&|_: ResourceKind| true))
}
