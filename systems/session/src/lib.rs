#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-order tick pipeline that wires the pure systems to the world.
//!
//! Every frame runs the same sequence: the world clock advances, then player
//! motion, adversary behaviour, interaction checks and resource spawning each
//! observe the world and emit a command batch. A batch is applied only after
//! the system that produced it has returned, so no system ever observes a
//! collection that is being mutated.

use std::time::Duration;

use community_maze_core::{
    AdversarySnapshot, CellCoord, Command, Difficulty, Direction, Event, PlayMode,
    UNITS_PER_PIXEL,
};
use community_maze_rendering::{
    render_alpha, to_pixels, AdversaryPresentation, Color, FrameInput, MazePresentation,
    PlayerPresentation, RenderingError, ResourcePresentation, Scene, StationPresentation,
};
use community_maze_system_adversaries::Adversaries;
use community_maze_system_interaction::Interaction;
use community_maze_system_player_motion::PlayerMotion;
use community_maze_system_spawning::Spawning;
use community_maze_world::{self as world, query, Maze, ScenarioError, World, WorldConfig};
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

pub use community_maze_system_spawning::Config as SpawnConfig;

const SPAWN_STREAM: u64 = 1;

/// Errors raised while assembling a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The world configuration failed validation.
    #[error("invalid scenario: {0}")]
    Scenario(#[from] ScenarioError),
    /// The maze could not be described for presentation.
    #[error("cannot present maze: {0}")]
    Presentation(#[from] RenderingError),
}

/// Owns the world and the systems that drive it.
pub struct Session {
    world: World,
    player_motion: PlayerMotion,
    adversaries: Adversaries<ChaCha8Rng>,
    interaction: Interaction,
    spawning: Spawning<ChaCha8Rng>,
    maze: MazePresentation,
}

impl Session {
    /// Builds a session for the provided scenario.
    ///
    /// Adversary behaviour and resource spawning draw from independent
    /// streams of a ChaCha generator seeded with `seed`, so two sessions with
    /// the same inputs replay identically. The round does not begin until
    /// [`Session::start`] is called.
    pub fn new(config: WorldConfig, spawn: SpawnConfig, seed: u64) -> Result<Self, SessionError> {
        let maze = present_maze(&config.maze, config.cell_length)?;
        let world = World::with_config(config)?;

        let adversary_rng = ChaCha8Rng::seed_from_u64(seed);
        let mut spawn_rng = ChaCha8Rng::seed_from_u64(seed);
        spawn_rng.set_stream(SPAWN_STREAM);

        Ok(Self {
            world,
            player_motion: PlayerMotion,
            adversaries: Adversaries::new(adversary_rng),
            interaction: Interaction,
            spawning: Spawning::new(spawn, spawn_rng),
            maze,
        })
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Starts or restarts the round on the requested difficulty.
    ///
    /// Adversaries are primed with their randomised timers and the maze is
    /// seeded with its initial resources before this returns.
    pub fn start(&mut self, difficulty: Difficulty) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::StartGame { difficulty },
            &mut events,
        );

        let mut commands = Vec::new();
        self.adversaries.handle(
            &events,
            &query::adversary_view(&self.world),
            query::player(&self.world).cell,
            query::geometry(&self.world),
            query::maze_view(&self.world),
            &mut commands,
        );
        flush(&mut self.world, &mut commands, &mut events);

        let free_cells = query::free_cells(&self.world);
        self.spawning.handle(
            &events,
            &free_cells,
            query::resources(&self.world).len(),
            &mut commands,
        );
        flush(&mut self.world, &mut commands, &mut events);

        log_events(&events);
        events
    }

    /// Queues a directional intent, or clears it with `None`.
    pub fn set_directional_intent(&mut self, direction: Option<Direction>) -> Vec<Event> {
        self.submit(Command::SetDirectionalIntent { direction })
    }

    /// Requests click-to-move navigation towards `cell`.
    pub fn set_target_cell(&mut self, cell: CellCoord) -> Vec<Event> {
        self.submit(Command::SetTargetCell { cell })
    }

    /// Drops the most recently collected item.
    pub fn discard_item(&mut self) -> Vec<Event> {
        self.submit(Command::DiscardItem)
    }

    /// Flips between running and paused.
    pub fn toggle_pause(&mut self) -> Vec<Event> {
        let mode = match query::play_mode(&self.world) {
            PlayMode::Running => PlayMode::Paused,
            PlayMode::Paused => PlayMode::Running,
        };
        self.submit(Command::SetPlayMode { mode })
    }

    /// Translates one frame of adapter input into world commands.
    ///
    /// A frame without a held direction leaves any queued intent untouched.
    pub fn apply_input(&mut self, input: &FrameInput) -> Vec<Event> {
        let mut events = Vec::new();
        if input.pause_toggle {
            events.extend(self.toggle_pause());
        }
        if let Some(direction) = input.direction {
            events.extend(self.set_directional_intent(Some(direction)));
        }
        if let Some(cell) = input.click.and_then(|point| self.maze.cell_at(point)) {
            events.extend(self.set_target_cell(cell));
        }
        if input.discard {
            events.extend(self.discard_item());
        }
        events
    }

    /// Advances the simulation by one frame.
    ///
    /// Returns every event emitted during the frame, in application order.
    /// Nothing but the tick request happens while the round is paused or over.
    pub fn step(&mut self, dt: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return events;
        }

        let mut commands = Vec::new();

        self.player_motion.handle(
            &events,
            &query::player(&self.world),
            query::geometry(&self.world),
            query::maze_view(&self.world),
            &mut commands,
        );
        flush(&mut self.world, &mut commands, &mut events);

        self.adversaries.handle(
            &events,
            &query::adversary_view(&self.world),
            query::player(&self.world).cell,
            query::geometry(&self.world),
            query::maze_view(&self.world),
            &mut commands,
        );
        flush(&mut self.world, &mut commands, &mut events);

        self.interaction.handle(
            &events,
            &query::player(&self.world),
            &query::resources(&self.world),
            &query::stations(&self.world),
            &query::adversary_view(&self.world),
            &mut commands,
        );
        flush(&mut self.world, &mut commands, &mut events);

        let free_cells = query::free_cells(&self.world);
        self.spawning.handle(
            &events,
            &free_cells,
            query::resources(&self.world).len(),
            &mut commands,
        );
        flush(&mut self.world, &mut commands, &mut events);

        log_events(&events);
        events
    }

    /// Applies adapter input, advances one frame and refreshes `scene`.
    pub fn advance_frame(&mut self, dt: Duration, input: &FrameInput, scene: &mut Scene) {
        let _ = self.apply_input(input);
        let _ = self.step(dt);
        *scene = self.scene();
    }

    /// Builds the presentation snapshot of the current world.
    #[must_use]
    pub fn scene(&self) -> Scene {
        let player = query::player(&self.world);
        let stats = query::stats(&self.world);

        Scene {
            maze: self.maze.clone(),
            player: PlayerPresentation {
                position: to_pixels(player.position),
                cell: player.cell,
                facing: player.facing,
                inventory: player.inventory,
                capacity: player.capacity,
            },
            adversaries: query::adversary_view(&self.world)
                .iter()
                .map(present_adversary)
                .collect(),
            resources: query::resources(&self.world)
                .into_iter()
                .map(|resource| ResourcePresentation {
                    id: resource.id,
                    kind: resource.kind,
                    cell: resource.cell,
                    color: resource.kind.color().into(),
                })
                .collect(),
            stations: query::stations(&self.world)
                .into_iter()
                .map(|station| StationPresentation {
                    id: station.id,
                    kind: station.kind,
                    cell: station.cell,
                    progress: station.progress,
                    max_progress: station.max_progress,
                    color: station.kind.color().into(),
                })
                .collect(),
            stats,
            play_mode: query::play_mode(&self.world),
            phase: query::phase(&self.world),
            difficulty: query::difficulty(&self.world),
        }
    }

    fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        log_events(&events);
        events
    }
}

fn flush(world: &mut World, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
    for command in commands.drain(..) {
        world::apply(world, command, events);
    }
}

fn present_adversary(adversary: &AdversarySnapshot) -> AdversaryPresentation {
    let is_clone = adversary.clone_of.is_some();
    let visible = !adversary.is_hidden();
    let color =
        Color::from(adversary.archetype.color()).with_alpha(render_alpha(visible, is_clone));

    AdversaryPresentation {
        id: adversary.id,
        archetype: adversary.archetype,
        position: to_pixels(adversary.position),
        cell: adversary.cell,
        facing: adversary.facing,
        visible,
        is_clone,
        color,
    }
}

fn present_maze(maze: &Maze, cell_length: u32) -> Result<MazePresentation, RenderingError> {
    let mut walls = Vec::with_capacity(maze.columns() as usize * maze.rows() as usize);
    for row in 0..maze.rows() {
        for column in 0..maze.columns() {
            walls.push(maze.is_wall(CellCoord::new(column, row)));
        }
    }

    MazePresentation::new(
        maze.columns(),
        maze.rows(),
        cell_length as f32 / UNITS_PER_PIXEL as f32,
        walls,
    )
}

fn log_events(events: &[Event]) {
    for event in events {
        match event {
            Event::PlayerCaught {
                adversary,
                archetype,
            } => info!("caught by {} ({adversary:?})", archetype.name()),
            Event::GameWon { score } => info!("every station completed, final score {score}"),
            Event::StationCompleted { station } => info!("{station:?} completed"),
            Event::GameStarted { .. }
            | Event::PlayModeChanged { .. }
            | Event::AdversarySpawned { .. }
            | Event::CloneRemoved { .. }
            | Event::ItemsDelivered { .. }
            | Event::ItemDiscarded { .. } => debug!("{event:?}"),
            _ => {}
        }
    }
}
