#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Community Maze.
//!
//! The world owns the player, the adversaries, the resources and the delivery
//! stations. It never takes randomised decisions: every mutation arrives as a
//! [`Command`] validated against the current state, and every accepted
//! mutation is reported through an [`Event`].

mod maze;
pub mod navigation;

use std::{collections::VecDeque, time::Duration};

use community_maze_core::{
    AdversaryId, Archetype, CellCoord, CellGeometry, Command, Difficulty, Direction, Event,
    GamePhase, PlayMode, PlayerSteering, Position, ResourceId, ResourceKind, SessionStats,
    SplitCycle, SplitPhase, SplitTimers, StationId, StationKind, Tuning, VisibilityCycle,
    DEFAULT_CELL_LENGTH, WELCOME_BANNER,
};
use log::{debug, trace, warn};
use thiserror::Error;

pub use maze::{Maze, MazeError, DEFAULT_LAYOUT};

const DEFAULT_PLAYER_SPAWN: CellCoord = CellCoord::new(1, 1);
const DEFAULT_PLAYER_SPEED: u32 = 6;
const DEFAULT_INVENTORY_CAPACITY: usize = 5;
const DEFAULT_STATION_CAPACITY: u32 = 5;
const DEFAULT_POINTS_PER_ITEM: u32 = 20;
const DEFAULT_VICTORY_BONUS: u32 = 500;

const UNPRIMED_VISIBILITY_THRESHOLD: u32 = 30;
const UNPRIMED_SPLIT_TIMERS: SplitTimers = SplitTimers {
    cooldown: Duration::from_millis(5_500),
    duration: Duration::from_millis(2_000),
};

/// Spawn point of an adversary created at the start of every round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdversarySpawn {
    /// Archetype of the adversary.
    pub archetype: Archetype,
    /// Cell the adversary starts in.
    pub cell: CellCoord,
}

/// Fixed placement of a delivery station.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StationPlacement {
    /// Category of the station.
    pub kind: StationKind,
    /// Cell the station occupies.
    pub cell: CellCoord,
}

/// Static scenario the world is built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Wall layout shared by every actor.
    pub maze: Maze,
    /// Side length of a cell in world units.
    pub cell_length: u32,
    /// Cell the player starts every round in.
    pub player_spawn: CellCoord,
    /// Displacement of the player per tick in world units.
    pub player_speed: u32,
    /// Maximum number of items the player carries.
    pub inventory_capacity: usize,
    /// Adversaries created at the start of every round, in identifier order.
    pub adversaries: Vec<AdversarySpawn>,
    /// Delivery stations, in identifier order.
    pub stations: Vec<StationPlacement>,
    /// Progress level at which a station is complete.
    pub station_capacity: u32,
    /// Points awarded per delivered item.
    pub points_per_item: u32,
    /// Points awarded when every station is complete.
    pub victory_bonus: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            maze: Maze::default(),
            cell_length: DEFAULT_CELL_LENGTH,
            player_spawn: DEFAULT_PLAYER_SPAWN,
            player_speed: DEFAULT_PLAYER_SPEED,
            inventory_capacity: DEFAULT_INVENTORY_CAPACITY,
            adversaries: vec![
                AdversarySpawn {
                    archetype: Archetype::Unemployment,
                    cell: CellCoord::new(30, 1),
                },
                AdversarySpawn {
                    archetype: Archetype::Inequality,
                    cell: CellCoord::new(1, 13),
                },
                AdversarySpawn {
                    archetype: Archetype::LackOfAccess,
                    cell: CellCoord::new(30, 13),
                },
                AdversarySpawn {
                    archetype: Archetype::EconomicCrisis,
                    cell: CellCoord::new(15, 7),
                },
            ],
            stations: vec![
                StationPlacement {
                    kind: StationKind::Housing,
                    cell: CellCoord::new(1, 7),
                },
                StationPlacement {
                    kind: StationKind::Market,
                    cell: CellCoord::new(30, 7),
                },
                StationPlacement {
                    kind: StationKind::School,
                    cell: CellCoord::new(15, 1),
                },
                StationPlacement {
                    kind: StationKind::Hospital,
                    cell: CellCoord::new(15, 13),
                },
            ],
            station_capacity: DEFAULT_STATION_CAPACITY,
            points_per_item: DEFAULT_POINTS_PER_ITEM,
            victory_bonus: DEFAULT_VICTORY_BONUS,
        }
    }
}

impl WorldConfig {
    /// Creates the default scenario played on a custom maze.
    ///
    /// Spawn and station cells keep their default coordinates, so they must be
    /// open in the provided maze for [`World::with_config`] to accept it.
    #[must_use]
    pub fn with_maze(maze: Maze) -> Self {
        Self {
            maze,
            ..Self::default()
        }
    }

    /// Checks that every placement is open and every speed fits a cell.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.cell_length == 0 {
            return Err(ScenarioError::ZeroCellLength);
        }

        self.ensure_open("player spawn", self.player_spawn)?;
        for spawn in &self.adversaries {
            self.ensure_open("adversary spawn", spawn.cell)?;
        }
        for (index, station) in self.stations.iter().enumerate() {
            self.ensure_open("station", station.cell)?;
            if self.stations[..index]
                .iter()
                .any(|other| other.cell == station.cell)
            {
                return Err(ScenarioError::SharedStationCell { cell: station.cell });
            }
        }

        self.ensure_speed(self.player_speed)?;
        for difficulty in Difficulty::ALL {
            for spawn in &self.adversaries {
                self.ensure_speed(spawn.archetype.tuning(difficulty).speed())?;
            }
        }

        Ok(())
    }

    fn ensure_open(&self, role: &'static str, cell: CellCoord) -> Result<(), ScenarioError> {
        if self.maze.is_wall(cell) {
            Err(ScenarioError::BlockedCell { role, cell })
        } else {
            Ok(())
        }
    }

    fn ensure_speed(&self, speed: u32) -> Result<(), ScenarioError> {
        if speed == 0 || speed > self.cell_length {
            Err(ScenarioError::SpeedOutOfRange {
                speed,
                cell_length: self.cell_length,
            })
        } else {
            Ok(())
        }
    }
}

/// Errors raised when a scenario cannot be played.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    /// Cells must span at least one world unit.
    #[error("cell length must be positive")]
    ZeroCellLength,
    /// A placement lies on a wall or outside the maze.
    #[error("{role} at column {}, row {} is not an open cell", .cell.column(), .cell.row())]
    BlockedCell {
        /// Kind of placement that failed.
        role: &'static str,
        /// Offending cell.
        cell: CellCoord,
    },
    /// Two stations were placed on the same cell.
    #[error("more than one station occupies column {}, row {}", .cell.column(), .cell.row())]
    SharedStationCell {
        /// Offending cell.
        cell: CellCoord,
    },
    /// A speed is zero or exceeds the cell length.
    #[error("speed {speed} must lie within 1..={cell_length}")]
    SpeedOutOfRange {
        /// Offending speed in world units per tick.
        speed: u32,
        /// Configured cell length in world units.
        cell_length: u32,
    },
}

#[derive(Clone, Debug)]
struct Player {
    position: Position,
    heading: Option<Direction>,
    facing: Direction,
    intent: Option<Direction>,
    path: VecDeque<CellCoord>,
    inventory: Vec<ResourceKind>,
}

impl Player {
    fn at(position: Position) -> Self {
        Self {
            position,
            heading: None,
            facing: Direction::East,
            intent: None,
            path: VecDeque::new(),
            inventory: Vec::new(),
        }
    }

    fn set_heading(&mut self, heading: Option<Direction>) {
        self.heading = heading;
        if let Some(direction) = heading {
            self.facing = direction;
        }
    }
}

#[derive(Clone, Debug)]
struct Adversary {
    id: AdversaryId,
    archetype: Archetype,
    position: Position,
    heading: Option<Direction>,
    facing: Direction,
    tuning: Tuning,
    visible: bool,
    clone_of: Option<AdversaryId>,
    visibility: Option<VisibilityCycle>,
    split: Option<SplitCycle>,
}

impl Adversary {
    fn set_heading(&mut self, heading: Option<Direction>) {
        self.heading = heading;
        if let Some(direction) = heading {
            self.facing = direction;
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Resource {
    id: ResourceId,
    cell: CellCoord,
    kind: ResourceKind,
}

#[derive(Clone, Copy, Debug)]
struct Station {
    id: StationId,
    kind: StationKind,
    cell: CellCoord,
    progress: u32,
}

/// Represents the authoritative Community Maze world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: WorldConfig,
    geometry: CellGeometry,
    difficulty: Difficulty,
    phase: GamePhase,
    play_mode: PlayMode,
    tick_index: u64,
    player: Player,
    adversaries: Vec<Adversary>,
    next_adversary_id: u32,
    resources: Vec<Resource>,
    next_resource_id: u32,
    stations: Vec<Station>,
    stats: SessionStats,
}

impl World {
    /// Creates a world hosting the default community maze scenario.
    #[must_use]
    pub fn new() -> Self {
        Self::from_validated(WorldConfig::default())
    }

    /// Creates a world hosting the provided scenario after validating it.
    pub fn with_config(config: WorldConfig) -> Result<Self, ScenarioError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: WorldConfig) -> Self {
        let geometry = CellGeometry::new(config.cell_length);
        let mut world = Self {
            banner: WELCOME_BANNER,
            player: Player::at(geometry.origin_of(config.player_spawn)),
            geometry,
            config,
            difficulty: Difficulty::default(),
            phase: GamePhase::Running,
            play_mode: PlayMode::Running,
            tick_index: 0,
            adversaries: Vec::new(),
            next_adversary_id: 0,
            resources: Vec::new(),
            next_resource_id: 0,
            stations: Vec::new(),
            stats: SessionStats::default(),
        };
        world.reset(Difficulty::default());
        world
    }

    fn reset(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.phase = GamePhase::Running;
        self.play_mode = PlayMode::Running;
        self.tick_index = 0;
        self.stats = SessionStats::default();

        self.player = Player::at(self.geometry.origin_of(self.config.player_spawn));

        self.next_adversary_id = 0;
        self.adversaries.clear();
        let spawns = self.config.adversaries.clone();
        for spawn in spawns {
            let id = self.allocate_adversary_id();
            let archetype = spawn.archetype;
            self.adversaries.push(Adversary {
                id,
                archetype,
                position: self.geometry.origin_of(spawn.cell),
                heading: None,
                facing: Direction::West,
                tuning: archetype.tuning(difficulty),
                visible: true,
                clone_of: None,
                visibility: archetype.can_vanish().then_some(VisibilityCycle {
                    ticks: 0,
                    threshold: UNPRIMED_VISIBILITY_THRESHOLD,
                }),
                split: archetype.can_split().then_some(SplitCycle {
                    phase: SplitPhase::Idle,
                    elapsed: Duration::ZERO,
                    timers: UNPRIMED_SPLIT_TIMERS,
                    clone: None,
                }),
            });
        }

        self.next_resource_id = 0;
        self.resources.clear();

        self.stations = (0..)
            .zip(self.config.stations.iter())
            .map(|(index, placement)| Station {
                id: StationId::new(index),
                kind: placement.kind,
                cell: placement.cell,
                progress: 0,
            })
            .collect();
    }

    fn allocate_adversary_id(&mut self) -> AdversaryId {
        let id = AdversaryId::new(self.next_adversary_id);
        self.next_adversary_id = self.next_adversary_id.saturating_add(1);
        id
    }

    fn allocate_resource_id(&mut self) -> ResourceId {
        let id = ResourceId::new(self.next_resource_id);
        self.next_resource_id = self.next_resource_id.saturating_add(1);
        id
    }

    fn is_ticking(&self) -> bool {
        self.phase == GamePhase::Running && self.play_mode == PlayMode::Running
    }

    fn player_cell(&self) -> CellCoord {
        self.geometry.cell_of(self.player.position)
    }

    fn adversary_mut(&mut self, id: AdversaryId) -> Option<&mut Adversary> {
        self.adversaries
            .iter_mut()
            .find(|adversary| adversary.id == id)
    }

    fn can_advance(&self, position: Position, heading: Option<Direction>) -> bool {
        let Some(direction) = heading else {
            return false;
        };
        if !self.geometry.is_aligned(position) {
            return true;
        }
        self.config
            .maze
            .view()
            .is_open_towards(self.geometry.cell_of(position), direction)
    }

    fn is_free_cell(&self, cell: CellCoord) -> bool {
        !self.config.maze.is_wall(cell)
            && cell != self.config.player_spawn
            && self.stations.iter().all(|station| station.cell != cell)
            && self.resources.iter().all(|resource| resource.cell != cell)
    }

    fn steer_player(&mut self, steering: PlayerSteering, out_events: &mut Vec<Event>) {
        let cell = self.player_cell();
        if let PlayerSteering::Halt = steering {
            self.player.position = self.geometry.origin_of(cell);
            self.player.heading = None;
            self.player.path.clear();
            out_events.push(Event::PlayerHalted { cell });
            return;
        }

        if !self.geometry.is_aligned(self.player.position) {
            warn!("ignoring {steering:?}: player is between cells");
            return;
        }

        let maze = self.config.maze.view();
        match steering {
            PlayerSteering::Turn { direction } => {
                if maze.is_open_towards(cell, direction) {
                    self.player.set_heading(Some(direction));
                    self.player.intent = None;
                } else {
                    warn!("ignoring turn {direction:?} into a wall at {cell:?}");
                }
            }
            PlayerSteering::FollowPath {
                consumed_head,
                heading,
            } => {
                if consumed_head && self.player.path.front() == Some(&cell) {
                    let _ = self.player.path.pop_front();
                }
                match heading {
                    Some(direction) if maze.is_open_towards(cell, direction) => {
                        self.player.set_heading(Some(direction));
                    }
                    Some(direction) => {
                        warn!("ignoring path step {direction:?} into a wall at {cell:?}");
                    }
                    None => {
                        self.player.heading = None;
                        self.player.path.clear();
                    }
                }
            }
            PlayerSteering::Halt => {}
        }
    }

    fn split_adversary(
        &mut self,
        parent: AdversaryId,
        clone_heading: Option<Direction>,
        out_events: &mut Vec<Event>,
    ) {
        let Some(source) = self
            .adversaries
            .iter()
            .find(|adversary| adversary.id == parent)
            .cloned()
        else {
            return;
        };
        let ready = source.clone_of.is_none()
            && source.split.map_or(false, |cycle| {
                cycle.phase == SplitPhase::Idle && cycle.clone.is_none() && cycle.is_due()
            });
        if !ready {
            warn!("ignoring split request for {parent:?}");
            return;
        }

        let id = self.allocate_adversary_id();
        let mut clone = Adversary {
            id,
            clone_of: Some(parent),
            split: None,
            ..source
        };
        clone.set_heading(clone_heading);
        let cell = self.geometry.cell_of(clone.position);
        let archetype = clone.archetype;
        self.adversaries.push(clone);

        if let Some(cycle) = self
            .adversary_mut(parent)
            .and_then(|adversary| adversary.split.as_mut())
        {
            cycle.phase = SplitPhase::Active;
            cycle.elapsed = Duration::ZERO;
            cycle.clone = Some(id);
        }

        debug!("{parent:?} split into {id:?} at {cell:?}");
        out_events.push(Event::AdversarySpawned {
            adversary: id,
            archetype,
            cell,
            clone_of: Some(parent),
        });
    }

    fn merge_clone(&mut self, parent: AdversaryId, next: SplitTimers, out_events: &mut Vec<Event>) {
        let Some(cycle) = self
            .adversary_mut(parent)
            .and_then(|adversary| adversary.split.as_mut())
        else {
            return;
        };
        if cycle.phase != SplitPhase::Active || !cycle.is_due() {
            warn!("ignoring merge request for {parent:?}");
            return;
        }

        let clone = cycle.clone.take();
        cycle.phase = SplitPhase::Idle;
        cycle.elapsed = Duration::ZERO;
        cycle.timers = next;

        if let Some(clone) = clone {
            self.adversaries.retain(|adversary| adversary.id != clone);
            debug!("{clone:?} merged back into {parent:?}");
            out_events.push(Event::CloneRemoved { clone, parent });
        }
    }

    fn deliver(&mut self, station_id: StationId, out_events: &mut Vec<Event>) {
        let cell = self.player_cell();
        let capacity = self.config.station_capacity;
        let Some(station) = self
            .stations
            .iter_mut()
            .find(|station| station.id == station_id && station.cell == cell)
        else {
            return;
        };

        let kind = station.kind.required_resource();
        let matching = self
            .player
            .inventory
            .iter()
            .filter(|item| **item == kind)
            .count();
        let room = capacity.saturating_sub(station.progress);
        let count = u32::try_from(matching).unwrap_or(u32::MAX).min(room);
        if count == 0 {
            return;
        }

        let mut remaining = count;
        self.player.inventory.retain(|item| {
            if remaining > 0 && *item == kind {
                remaining -= 1;
                false
            } else {
                true
            }
        });

        station.progress += count;
        let completed = station.progress >= capacity;
        self.stats.items_delivered = self.stats.items_delivered.saturating_add(count);
        self.stats.score = self
            .stats
            .score
            .saturating_add(count.saturating_mul(self.config.points_per_item));
        out_events.push(Event::ItemsDelivered {
            station: station_id,
            kind,
            count,
        });

        if completed {
            self.stats.stations_completed = self.stats.stations_completed.saturating_add(1);
            out_events.push(Event::StationCompleted {
                station: station_id,
            });

            if self.stations.iter().all(|station| station.progress >= capacity) {
                self.phase = GamePhase::Won;
                self.stats.victory = true;
                self.stats.score = self.stats.score.saturating_add(self.config.victory_bonus);
                debug!("round won with score {}", self.stats.score);
                out_events.push(Event::GameWon {
                    score: self.stats.score,
                });
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartGame { difficulty } => {
            world.reset(difficulty);
            debug!("round started on {difficulty} difficulty");
            out_events.push(Event::GameStarted { difficulty });
            for adversary in &world.adversaries {
                out_events.push(Event::AdversarySpawned {
                    adversary: adversary.id,
                    archetype: adversary.archetype,
                    cell: world.geometry.cell_of(adversary.position),
                    clone_of: adversary.clone_of,
                });
            }
        }
        Command::SetPlayMode { mode } => {
            if world.play_mode != mode {
                world.play_mode = mode;
                out_events.push(Event::PlayModeChanged { mode });
            }
        }
        Command::Tick { dt } => {
            if !world.is_ticking() {
                trace!("tick ignored in {:?}/{:?}", world.phase, world.play_mode);
                return;
            }

            world.tick_index = world.tick_index.saturating_add(1);
            world.stats.elapsed = world.stats.elapsed.saturating_add(dt);
            for adversary in world.adversaries.iter_mut() {
                if let Some(cycle) = adversary.visibility.as_mut() {
                    cycle.ticks = cycle.ticks.saturating_add(1);
                }
                if let Some(cycle) = adversary.split.as_mut() {
                    cycle.elapsed = cycle.elapsed.saturating_add(dt);
                }
            }
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::SetDirectionalIntent { direction } => {
            if !world.is_ticking() {
                return;
            }
            world.player.intent = direction;
        }
        Command::SetTargetCell { cell } => {
            if !world.is_ticking() {
                return;
            }
            let start = world.player_cell();
            let path = navigation::find_path(&world.config.maze, start, cell);
            if path.is_empty() {
                debug!("no path from {start:?} to {cell:?}");
                out_events.push(Event::PathRejected { target: cell });
                return;
            }

            let length = path.len();
            world.player.path = path.into();
            world.player.intent = None;
            debug!("installed path of {length} cells towards {cell:?}");
            out_events.push(Event::PathInstalled {
                target: cell,
                length,
            });
        }
        Command::DiscardItem => {
            if !world.is_ticking() {
                return;
            }
            if let Some(kind) = world.player.inventory.pop() {
                out_events.push(Event::ItemDiscarded { kind });
            }
        }
        Command::SteerPlayer { steering } => {
            if world.is_ticking() {
                world.steer_player(steering, out_events);
            }
        }
        Command::AdvancePlayer => {
            if !world.is_ticking() {
                return;
            }
            let player = &world.player;
            if world.can_advance(player.position, player.heading) {
                let speed = world.config.player_speed;
                world.player.position =
                    world
                        .geometry
                        .advance(world.player.position, world.player.heading, speed);
            }
        }
        Command::PrimeAdversary {
            adversary,
            heading,
            visibility_threshold,
            split,
        } => {
            let Some(target) = world.adversary_mut(adversary) else {
                return;
            };
            target.set_heading(heading);
            if let (Some(cycle), Some(threshold)) =
                (target.visibility.as_mut(), visibility_threshold)
            {
                cycle.threshold = threshold;
            }
            if let (Some(cycle), Some(timers)) = (target.split.as_mut(), split) {
                cycle.timers = timers;
            }
        }
        Command::SteerAdversary { adversary, heading } => {
            if !world.is_ticking() {
                return;
            }
            let geometry = world.geometry;
            let maze = world.config.maze.view();
            let Some(target) = world
                .adversaries
                .iter_mut()
                .find(|candidate| candidate.id == adversary)
            else {
                return;
            };
            if !geometry.is_aligned(target.position) {
                warn!("ignoring steering for {adversary:?}: adversary is between cells");
                return;
            }
            let cell = geometry.cell_of(target.position);
            if heading.map_or(true, |direction| maze.is_open_towards(cell, direction)) {
                target.set_heading(heading);
            } else {
                warn!("ignoring steering for {adversary:?} into a wall at {cell:?}");
            }
        }
        Command::ToggleVisibility {
            adversary,
            next_threshold,
        } => {
            if !world.is_ticking() {
                return;
            }
            let Some(target) = world.adversary_mut(adversary) else {
                return;
            };
            let Some(cycle) = target.visibility.as_mut() else {
                warn!("ignoring visibility toggle for {adversary:?}");
                return;
            };
            cycle.ticks = 0;
            cycle.threshold = next_threshold;
            target.visible = !target.visible;
            trace!("{adversary:?} visible: {}", target.visible);
            out_events.push(Event::VisibilityChanged {
                adversary,
                visible: target.visible,
            });
        }
        Command::SplitAdversary {
            parent,
            clone_heading,
        } => {
            if world.is_ticking() {
                world.split_adversary(parent, clone_heading, out_events);
            }
        }
        Command::MergeClone { parent, next } => {
            if world.is_ticking() {
                world.merge_clone(parent, next, out_events);
            }
        }
        Command::AdvanceAdversaries => {
            if !world.is_ticking() {
                return;
            }
            let movable: Vec<bool> = world
                .adversaries
                .iter()
                .map(|adversary| world.can_advance(adversary.position, adversary.heading))
                .collect();
            let geometry = world.geometry;
            for (adversary, movable) in world.adversaries.iter_mut().zip(movable) {
                if movable {
                    adversary.position = geometry.advance(
                        adversary.position,
                        adversary.heading,
                        adversary.tuning.speed(),
                    );
                }
            }
        }
        Command::SpawnResource { cell, kind } => {
            if world.phase != GamePhase::Running {
                return;
            }
            if !world.is_free_cell(cell) {
                warn!("ignoring {kind:?} spawn on occupied cell {cell:?}");
                return;
            }
            let resource = world.allocate_resource_id();
            world.resources.push(Resource {
                id: resource,
                cell,
                kind,
            });
            out_events.push(Event::ResourceSpawned {
                resource,
                cell,
                kind,
            });
        }
        Command::CollectResource { resource } => {
            if !world.is_ticking() {
                return;
            }
            if world.player.inventory.len() >= world.config.inventory_capacity {
                return;
            }
            let cell = world.player_cell();
            let Some(index) = world
                .resources
                .iter()
                .position(|candidate| candidate.id == resource && candidate.cell == cell)
            else {
                return;
            };
            let collected = world.resources.remove(index);
            world.player.inventory.push(collected.kind);
            world.stats.resources_collected = world.stats.resources_collected.saturating_add(1);
            out_events.push(Event::ResourceCollected {
                resource,
                kind: collected.kind,
            });
        }
        Command::DeliverToStation { station } => {
            if world.is_ticking() {
                world.deliver(station, out_events);
            }
        }
        Command::CatchPlayer { adversary } => {
            if !world.is_ticking() {
                return;
            }
            let cell = world.player_cell();
            let Some(target) = world.adversaries.iter().find(|candidate| {
                candidate.id == adversary
                    && candidate.visible
                    && world.geometry.cell_of(candidate.position) == cell
            }) else {
                return;
            };
            let archetype = target.archetype;
            world.phase = GamePhase::Caught {
                adversary,
                archetype,
            };
            debug!("player caught by {} ({adversary:?})", archetype.name());
            out_events.push(Event::PlayerCaught {
                adversary,
                archetype,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use community_maze_core::{
        AdversarySnapshot, AdversaryView, CellCoord, CellGeometry, Difficulty, GamePhase,
        MazeView, PlayMode, PlayerSnapshot, ResourceSnapshot, SessionStats, StationSnapshot,
    };

    use super::{Maze, World, WorldConfig};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the scenario the world was built from.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Provides read-only access to the wall layout.
    #[must_use]
    pub fn maze(world: &World) -> &Maze {
        &world.config.maze
    }

    /// Exposes the collision view over the wall layout.
    #[must_use]
    pub fn maze_view(world: &World) -> MazeView<'_> {
        world.config.maze.view()
    }

    /// Conversion rules between continuous positions and cells.
    #[must_use]
    pub fn geometry(world: &World) -> CellGeometry {
        world.geometry
    }

    /// Difficulty tier of the current round.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.difficulty
    }

    /// Outcome of the current round.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Reports whether the simulation clock is paused.
    #[must_use]
    pub fn play_mode(world: &World) -> PlayMode {
        world.play_mode
    }

    /// Number of ticks processed in the current round.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Counters reported to the rewards collaborator.
    #[must_use]
    pub fn stats(world: &World) -> SessionStats {
        world.stats
    }

    /// Captures the player's state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        let player = &world.player;
        PlayerSnapshot {
            position: player.position,
            cell: world.geometry.cell_of(player.position),
            heading: player.heading,
            facing: player.facing,
            speed: world.config.player_speed,
            intent: player.intent,
            path: player.path.iter().copied().collect(),
            inventory: player.inventory.clone(),
            capacity: world.config.inventory_capacity,
        }
    }

    /// Captures a read-only view of the adversaries roaming the maze.
    #[must_use]
    pub fn adversary_view(world: &World) -> AdversaryView {
        AdversaryView::from_snapshots(
            world
                .adversaries
                .iter()
                .map(|adversary| AdversarySnapshot {
                    id: adversary.id,
                    archetype: adversary.archetype,
                    position: adversary.position,
                    cell: world.geometry.cell_of(adversary.position),
                    heading: adversary.heading,
                    facing: adversary.facing,
                    tuning: adversary.tuning,
                    visible: adversary.visible,
                    clone_of: adversary.clone_of,
                    visibility: adversary.visibility,
                    split: adversary.split,
                })
                .collect(),
        )
    }

    /// Resources lying in the maze, in spawn order.
    #[must_use]
    pub fn resources(world: &World) -> Vec<ResourceSnapshot> {
        world
            .resources
            .iter()
            .map(|resource| ResourceSnapshot {
                id: resource.id,
                cell: resource.cell,
                kind: resource.kind,
            })
            .collect()
    }

    /// Delivery stations, in identifier order.
    #[must_use]
    pub fn stations(world: &World) -> Vec<StationSnapshot> {
        world
            .stations
            .iter()
            .map(|station| StationSnapshot {
                id: station.id,
                kind: station.kind,
                cell: station.cell,
                progress: station.progress,
                max_progress: world.config.station_capacity,
            })
            .collect()
    }

    /// Open cells that can receive a resource, ordered by row then column.
    ///
    /// Station cells, cells already holding a resource and the player spawn
    /// are excluded. Cells occupied by adversaries remain eligible.
    #[must_use]
    pub fn free_cells(world: &World) -> Vec<CellCoord> {
        world
            .config
            .maze
            .open_cells()
            .iter()
            .copied()
            .filter(|cell| world.is_free_cell(*cell))
            .collect()
    }
}
