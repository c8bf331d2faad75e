#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Community Maze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Community Maze.";

/// Nominal simulation rate used to scale tick-counted timers.
pub const FRAMES_PER_SECOND: u32 = 60;

/// Number of world units that make up a single presentation pixel.
pub const UNITS_PER_PIXEL: u32 = 2;

/// Default side length of a maze cell expressed in world units (30 pixels).
pub const DEFAULT_CELL_LENGTH: u32 = 60;

/// Describes whether the simulation clock is allowed to advance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlayMode {
    /// Ticks advance actors and timers.
    #[default]
    Running,
    /// Ticks are ignored until the mode switches back.
    Paused,
}

/// Outcome of the current round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// The round is in progress.
    #[default]
    Running,
    /// A visible adversary reached the player.
    Caught {
        /// Adversary that triggered the collision.
        adversary: AdversaryId,
        /// Archetype of the triggering adversary.
        archetype: Archetype,
    },
    /// Every station reached its maximum progress.
    Won,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Resets the round: repositions the player and recreates adversaries.
    StartGame {
        /// Difficulty tier applied to every adversary for the whole round.
        difficulty: Difficulty,
    },
    /// Requests that the world transition to the provided play mode.
    SetPlayMode {
        /// Mode the world should activate.
        mode: PlayMode,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Queues a heading the player adopts at the next aligned position.
    SetDirectionalIntent {
        /// Requested heading, or `None` to clear the queued intent.
        direction: Option<Direction>,
    },
    /// Requests a shortest path from the player's cell to the provided cell.
    SetTargetCell {
        /// Destination cell selected by the pointer.
        cell: CellCoord,
    },
    /// Drops the most recently collected inventory item.
    DiscardItem,
    /// Applies a steering decision taken at an aligned player position.
    SteerPlayer {
        /// Decision computed by the player motion system.
        steering: PlayerSteering,
    },
    /// Displaces the player along its heading by one tick's worth of motion.
    AdvancePlayer,
    /// Seeds the randomised state of a freshly spawned adversary.
    PrimeAdversary {
        /// Adversary being primed.
        adversary: AdversaryId,
        /// Initial heading used to seed reversal avoidance.
        heading: Option<Direction>,
        /// Initial visibility threshold for archetypes that can vanish.
        visibility_threshold: Option<u32>,
        /// Initial split timers for archetypes that can duplicate.
        split: Option<SplitTimers>,
    },
    /// Applies a heading chosen at an aligned adversary position.
    SteerAdversary {
        /// Adversary being redirected.
        adversary: AdversaryId,
        /// New heading, or `None` to hold position.
        heading: Option<Direction>,
    },
    /// Flips the visibility flag of an adversary that can vanish.
    ToggleVisibility {
        /// Adversary whose visibility flips.
        adversary: AdversaryId,
        /// Threshold counted towards the following toggle.
        next_threshold: u32,
    },
    /// Spawns the single clone of a duplicating adversary.
    SplitAdversary {
        /// Adversary that spawns the clone.
        parent: AdversaryId,
        /// Heading assigned to the clone.
        clone_heading: Option<Direction>,
    },
    /// Removes the live clone of a duplicating adversary.
    MergeClone {
        /// Adversary whose clone expires.
        parent: AdversaryId,
        /// Timers drawn for the next split cycle.
        next: SplitTimers,
    },
    /// Displaces every adversary along its heading by one tick's worth of motion.
    AdvanceAdversaries,
    /// Places a resource of the provided kind into a free cell.
    SpawnResource {
        /// Cell that receives the resource.
        cell: CellCoord,
        /// Kind of resource to place.
        kind: ResourceKind,
    },
    /// Moves a resource sharing the player's cell into the inventory.
    CollectResource {
        /// Resource being collected.
        resource: ResourceId,
    },
    /// Hands matching inventory items to a station sharing the player's cell.
    DeliverToStation {
        /// Station receiving the delivery.
        station: StationId,
    },
    /// Ends the round because a visible adversary reached the player.
    CatchPlayer {
        /// Adversary sharing the player's cell.
        adversary: AdversaryId,
    },
}

/// Steering decision taken for the player at an aligned position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerSteering {
    /// Adopts the queued directional intent as the new heading.
    Turn {
        /// Heading leading into an open cell.
        direction: Direction,
    },
    /// Follows the active path.
    FollowPath {
        /// Whether the path head equals the current cell and must be dropped.
        consumed_head: bool,
        /// Heading toward the next waypoint, `None` once the path is finished.
        heading: Option<Direction>,
    },
    /// Snaps onto the current cell, stops and drops any active path.
    Halt,
}

/// Randomised timers that drive one self-duplication cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SplitTimers {
    /// Idle time accumulated before the clone appears.
    pub cooldown: Duration,
    /// Time the clone stays alive.
    pub duration: Duration,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a new round started.
    GameStarted {
        /// Difficulty tier chosen for the round.
        difficulty: Difficulty,
    },
    /// Announces that the simulation entered a new play mode.
    PlayModeChanged {
        /// Mode that became active after processing commands.
        mode: PlayMode,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a path was installed for the player.
    PathInstalled {
        /// Destination requested by the pointer.
        target: CellCoord,
        /// Number of cells in the path, start and goal inclusive.
        length: usize,
    },
    /// Reports that no path exists towards the requested cell.
    PathRejected {
        /// Destination requested by the pointer.
        target: CellCoord,
    },
    /// Reports that the player stopped in front of an obstruction.
    PlayerHalted {
        /// Cell the player was snapped onto.
        cell: CellCoord,
    },
    /// Confirms that an adversary entered the maze.
    AdversarySpawned {
        /// Identifier allocated to the adversary.
        adversary: AdversaryId,
        /// Archetype of the adversary.
        archetype: Archetype,
        /// Cell the adversary occupies after spawning.
        cell: CellCoord,
        /// Parent identifier when the adversary is a transient clone.
        clone_of: Option<AdversaryId>,
    },
    /// Confirms that a transient clone left the maze.
    CloneRemoved {
        /// Identifier of the removed clone.
        clone: AdversaryId,
        /// Identifier of the adversary that spawned it.
        parent: AdversaryId,
    },
    /// Reports that an adversary's visibility flag flipped.
    VisibilityChanged {
        /// Adversary whose visibility flipped.
        adversary: AdversaryId,
        /// Visibility after the flip.
        visible: bool,
    },
    /// Confirms that a resource was placed into the maze.
    ResourceSpawned {
        /// Identifier allocated to the resource.
        resource: ResourceId,
        /// Cell holding the resource.
        cell: CellCoord,
        /// Kind of the resource.
        kind: ResourceKind,
    },
    /// Reports that the player picked up a resource.
    ResourceCollected {
        /// Identifier of the collected resource.
        resource: ResourceId,
        /// Kind added to the inventory.
        kind: ResourceKind,
    },
    /// Reports that inventory items were handed to a station.
    ItemsDelivered {
        /// Station receiving the items.
        station: StationId,
        /// Kind of the delivered items.
        kind: ResourceKind,
        /// Progress actually gained by the station.
        count: u32,
    },
    /// Reports that a station reached its maximum progress.
    StationCompleted {
        /// Station that completed.
        station: StationId,
    },
    /// Reports that the player dropped an inventory item.
    ItemDiscarded {
        /// Kind of the dropped item.
        kind: ResourceKind,
    },
    /// Reports that a visible adversary reached the player.
    PlayerCaught {
        /// Adversary that triggered the collision.
        adversary: AdversaryId,
        /// Archetype of the triggering adversary.
        archetype: Archetype,
    },
    /// Reports that every station reached its maximum progress.
    GameWon {
        /// Final score including the victory bonus.
        score: u32,
    },
}

/// Cardinal movement directions available to actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction, in the order adversaries enumerate candidate headings.
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Returns `true` for east and west.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::East | Self::West)
    }
}

/// Unique identifier assigned to an adversary.
///
/// Identifiers are allocated monotonically and restart from zero on every new
/// round, so removal by identifier never matches a stale adversary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdversaryId(u32);

impl AdversaryId {
    /// Creates a new adversary identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u32);

impl ResourceId {
    /// Creates a new resource identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a delivery station.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(u32);

impl StationId {
    /// Creates a new station identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Cell adjacent in the provided direction, or `None` past the origin.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self
                .row
                .checked_sub(1)
                .map(|row| CellCoord::new(self.column, row)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| CellCoord::new(column, self.row)),
            Direction::South => self
                .row
                .checked_add(1)
                .map(|row| CellCoord::new(self.column, row)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| CellCoord::new(column, self.row)),
        }
    }
}

/// Returns the direction leading from `from` into the orthogonally adjacent `to`.
#[must_use]
pub fn direction_between(from: CellCoord, to: CellCoord) -> Option<Direction> {
    let column_diff = from.column().abs_diff(to.column());
    let row_diff = from.row().abs_diff(to.row());
    if column_diff + row_diff != 1 {
        return None;
    }

    if column_diff == 1 {
        if to.column() > from.column() {
            Some(Direction::East)
        } else {
            Some(Direction::West)
        }
    } else if to.row() > from.row() {
        Some(Direction::South)
    } else {
        Some(Direction::North)
    }
}

/// Continuous actor position expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    x: u32,
    y: u32,
}

impl Position {
    /// Creates a new position from world-unit coordinates.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate in world units.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Vertical coordinate in world units.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }
}

/// Bridge between continuous positions and discrete grid cells.
///
/// All conversions use exact integer arithmetic. An actor is aligned when both
/// coordinates are exact multiples of the cell length, and only then may it
/// commit to a new heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellGeometry {
    cell_length: u32,
}

impl CellGeometry {
    /// Creates a geometry with the provided cell length; zero is raised to one.
    #[must_use]
    pub const fn new(cell_length: u32) -> Self {
        let cell_length = if cell_length == 0 { 1 } else { cell_length };
        Self { cell_length }
    }

    /// Side length of a cell in world units.
    #[must_use]
    pub const fn cell_length(&self) -> u32 {
        self.cell_length
    }

    /// Cell whose center lies closest to the position.
    #[must_use]
    pub const fn cell_of(&self, position: Position) -> CellCoord {
        let half = self.cell_length / 2;
        CellCoord::new(
            position.x.saturating_add(half) / self.cell_length,
            position.y.saturating_add(half) / self.cell_length,
        )
    }

    /// Aligned position of the provided cell.
    #[must_use]
    pub const fn origin_of(&self, cell: CellCoord) -> Position {
        Position::new(
            cell.column.saturating_mul(self.cell_length),
            cell.row.saturating_mul(self.cell_length),
        )
    }

    /// Reports whether the position coincides exactly with a cell origin.
    #[must_use]
    pub const fn is_aligned(&self, position: Position) -> bool {
        position.x % self.cell_length == 0 && position.y % self.cell_length == 0
    }

    /// Displaces `position` along `heading` by at most `speed` units.
    ///
    /// The step is clamped at the next cell boundary so an actor always lands
    /// exactly on the following alignment instead of overshooting it.
    #[must_use]
    pub fn advance(&self, position: Position, heading: Option<Direction>, speed: u32) -> Position {
        let Some(direction) = heading else {
            return position;
        };

        let along = if direction.is_horizontal() {
            position.x
        } else {
            position.y
        };
        let offset = along % self.cell_length;
        let to_boundary = match direction {
            Direction::East | Direction::South => self.cell_length - offset,
            Direction::North | Direction::West => {
                if offset == 0 {
                    self.cell_length
                } else {
                    offset
                }
            }
        };
        let step = speed.min(to_boundary);

        match direction {
            Direction::North => Position::new(position.x, position.y.saturating_sub(step)),
            Direction::East => Position::new(position.x.saturating_add(step), position.y),
            Direction::South => Position::new(position.x, position.y.saturating_add(step)),
            Direction::West => Position::new(position.x.saturating_sub(step), position.y),
        }
    }
}

impl Default for CellGeometry {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_LENGTH)
    }
}

/// Visual appearance applied to an actor or entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActorColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl ActorColor {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Difficulty tier chosen once per round.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Slow adversaries that always wander randomly.
    Easy,
    /// Moderate speed with an occasional chase.
    #[default]
    #[serde(alias = "default")]
    Normal,
    /// Fast adversaries that mostly chase.
    Hard,
}

impl Difficulty {
    /// Every tier, from easiest to hardest.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    /// Human readable name of the tier.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a difficulty name is not recognised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownDifficulty(String);

impl fmt::Display for UnknownDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown difficulty `{}` (expected easy, normal or hard)",
            self.0
        )
    }
}

impl std::error::Error for UnknownDifficulty {}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "normal" | "default" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            _ => Err(UnknownDifficulty(value.to_owned())),
        }
    }
}

/// Behaviour tuning of an adversary for a difficulty tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tuning {
    speed: u32,
    randomness_percent: u32,
}

impl Tuning {
    /// Creates a tuning pair; randomness is clamped to 100 percent.
    #[must_use]
    pub const fn new(speed: u32, randomness_percent: u32) -> Self {
        let randomness_percent = if randomness_percent > 100 {
            100
        } else {
            randomness_percent
        };
        Self {
            speed,
            randomness_percent,
        }
    }

    /// Displacement per tick in world units.
    #[must_use]
    pub const fn speed(&self) -> u32 {
        self.speed
    }

    /// Probability, in percent, of ignoring the player and wandering randomly.
    #[must_use]
    pub const fn randomness_percent(&self) -> u32 {
        self.randomness_percent
    }
}

/// The four fixed adversary archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Archetype {
    /// Baseline chaser.
    Unemployment,
    /// Baseline chaser.
    Inequality,
    /// Periodically vanishes; hidden instances never catch the player.
    LackOfAccess,
    /// Periodically spawns a short-lived clone of itself.
    EconomicCrisis,
}

impl Archetype {
    /// Every archetype, in spawn order.
    pub const ALL: [Archetype; 4] = [
        Archetype::Unemployment,
        Archetype::Inequality,
        Archetype::LackOfAccess,
        Archetype::EconomicCrisis,
    ];

    /// Human readable name of the archetype.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unemployment => "Unemployment",
            Self::Inequality => "Inequality",
            Self::LackOfAccess => "Lack of Access",
            Self::EconomicCrisis => "Economic Crisis",
        }
    }

    /// Identity color of the archetype.
    #[must_use]
    pub const fn color(self) -> ActorColor {
        match self {
            Self::Unemployment => ActorColor::from_rgb(105, 105, 105),
            Self::Inequality => ActorColor::from_rgb(128, 0, 128),
            Self::LackOfAccess => ActorColor::from_rgb(40, 40, 40),
            Self::EconomicCrisis => ActorColor::from_rgb(178, 34, 34),
        }
    }

    /// Whether the archetype cycles its visibility.
    #[must_use]
    pub const fn can_vanish(self) -> bool {
        matches!(self, Self::LackOfAccess)
    }

    /// Whether non-clone instances of the archetype duplicate themselves.
    #[must_use]
    pub const fn can_split(self) -> bool {
        matches!(self, Self::EconomicCrisis)
    }

    /// Speed and randomness selected by the difficulty tier.
    #[must_use]
    pub const fn tuning(self, difficulty: Difficulty) -> Tuning {
        match difficulty {
            Difficulty::Easy => Tuning::new(3, 100),
            Difficulty::Normal => Tuning::new(4, 70),
            Difficulty::Hard => Tuning::new(5, 25),
        }
    }
}

/// Kinds of collectible resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Delivered to the hospital.
    Coin,
    /// Delivered to the market.
    Food,
    /// Delivered to the school.
    Book,
    /// Delivered to the housing project.
    Brick,
}

impl ResourceKind {
    /// Every resource kind.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Coin,
        ResourceKind::Food,
        ResourceKind::Book,
        ResourceKind::Brick,
    ];

    /// Human readable name of the resource.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Coin => "Coin",
            Self::Food => "Food",
            Self::Book => "Book",
            Self::Brick => "Brick",
        }
    }

    /// Color used when drawing the resource.
    #[must_use]
    pub const fn color(self) -> ActorColor {
        match self {
            Self::Coin => ActorColor::from_rgb(220, 30, 30),
            Self::Food => ActorColor::from_rgb(255, 223, 0),
            Self::Book => ActorColor::from_rgb(135, 206, 250),
            Self::Brick => ActorColor::from_rgb(176, 96, 52),
        }
    }
}

/// Categories of community delivery stations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StationKind {
    /// Housing project fed with bricks.
    Housing,
    /// Market fed with food.
    Market,
    /// School fed with books.
    School,
    /// Hospital fed with coins.
    Hospital,
}

impl StationKind {
    /// Resource kind the station accepts.
    #[must_use]
    pub const fn required_resource(self) -> ResourceKind {
        match self {
            Self::Housing => ResourceKind::Brick,
            Self::Market => ResourceKind::Food,
            Self::School => ResourceKind::Book,
            Self::Hospital => ResourceKind::Coin,
        }
    }

    /// Human readable name of the station.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Housing => "Housing",
            Self::Market => "Market",
            Self::School => "School",
            Self::Hospital => "Hospital",
        }
    }

    /// Color used when drawing the station.
    #[must_use]
    pub const fn color(self) -> ActorColor {
        match self {
            Self::Housing => ActorColor::from_rgb(160, 82, 45),
            Self::Market => ActorColor::from_rgb(34, 139, 34),
            Self::School => ActorColor::from_rgb(65, 105, 225),
            Self::Hospital => ActorColor::from_rgb(220, 20, 60),
        }
    }
}

/// Per-round counters consumed by the external rewards collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SessionStats {
    /// Resources moved into the inventory.
    pub resources_collected: u32,
    /// Items accepted by stations.
    pub items_delivered: u32,
    /// Stations that reached maximum progress.
    pub stations_completed: u32,
    /// Points earned so far.
    pub score: u32,
    /// Simulated time spent in the running phase.
    pub elapsed: Duration,
    /// Whether the round ended in victory.
    pub victory: bool,
}

/// Read-only view into the wall matrix of the maze.
#[derive(Clone, Copy, Debug)]
pub struct MazeView<'a> {
    walls: &'a [bool],
    columns: u32,
    rows: u32,
}

impl<'a> MazeView<'a> {
    /// Captures a new maze view backed by a row-major wall slice.
    #[must_use]
    pub fn new(walls: &'a [bool], columns: u32, rows: u32) -> Self {
        Self {
            walls,
            columns,
            rows,
        }
    }

    /// Reports whether the cell blocks movement; out-of-bounds cells are walls.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.walls.get(index).copied())
            .unwrap_or(true)
    }

    /// Reports whether the cell is in bounds and traversable.
    #[must_use]
    pub fn is_open(&self, cell: CellCoord) -> bool {
        !self.is_wall(cell)
    }

    /// Reports whether the neighbor in `direction` is traversable.
    #[must_use]
    pub fn is_open_towards(&self, cell: CellCoord, direction: Direction) -> bool {
        cell.neighbor(direction)
            .map_or(false, |neighbor| self.is_open(neighbor))
    }

    /// Directions leading into open neighbors, in [`Direction::ALL`] order.
    #[must_use]
    pub fn open_directions(&self, cell: CellCoord) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|direction| self.is_open_towards(cell, *direction))
            .collect()
    }

    /// Provides the dimensions of the underlying matrix.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Continuous position of the player.
    pub position: Position,
    /// Cell derived from the continuous position.
    pub cell: CellCoord,
    /// Current heading, `None` while standing still.
    pub heading: Option<Direction>,
    /// Last non-zero heading, used for sprite selection.
    pub facing: Direction,
    /// Displacement per tick in world units.
    pub speed: u32,
    /// Heading queued by directional input.
    pub intent: Option<Direction>,
    /// Remaining cells of the active path, head first.
    pub path: Vec<CellCoord>,
    /// Collected resource kinds in pick-up order.
    pub inventory: Vec<ResourceKind>,
    /// Maximum number of items the inventory holds.
    pub capacity: usize,
}

/// Visibility cycling state of an adversary that can vanish.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VisibilityCycle {
    /// Ticks counted since the last toggle.
    pub ticks: u32,
    /// Threshold, in tenths of a second, before the next toggle.
    pub threshold: u32,
}

impl VisibilityCycle {
    /// Reports whether the counter exceeded the frame-scaled threshold.
    #[must_use]
    pub const fn is_due(&self) -> bool {
        self.ticks > self.threshold.saturating_mul(FRAMES_PER_SECOND / 10)
    }
}

/// Phase of the self-duplication timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplitPhase {
    /// Counting down to the next clone.
    Idle,
    /// A clone is alive and counting down to its removal.
    Active,
}

/// Self-duplication state of a non-clone splitting adversary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SplitCycle {
    /// Current phase of the timer.
    pub phase: SplitPhase,
    /// Time accumulated in the current phase.
    pub elapsed: Duration,
    /// Timers of the current cycle.
    pub timers: SplitTimers,
    /// Identifier of the live clone, if any.
    pub clone: Option<AdversaryId>,
}

impl SplitCycle {
    /// Reports whether the current phase has run its course.
    #[must_use]
    pub fn is_due(&self) -> bool {
        match self.phase {
            SplitPhase::Idle => self.elapsed >= self.timers.cooldown,
            SplitPhase::Active => self.elapsed >= self.timers.duration,
        }
    }
}

/// Immutable representation of a single adversary's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdversarySnapshot {
    /// Unique identifier assigned to the adversary.
    pub id: AdversaryId,
    /// Archetype of the adversary.
    pub archetype: Archetype,
    /// Continuous position of the adversary.
    pub position: Position,
    /// Cell derived from the continuous position.
    pub cell: CellCoord,
    /// Current heading, `None` while holding position.
    pub heading: Option<Direction>,
    /// Last non-zero heading, used for sprite selection.
    pub facing: Direction,
    /// Speed and randomness of the adversary.
    pub tuning: Tuning,
    /// Whether the adversary is currently exposed.
    pub visible: bool,
    /// Parent identifier when the adversary is a transient clone.
    pub clone_of: Option<AdversaryId>,
    /// Visibility cycling state for archetypes that can vanish.
    pub visibility: Option<VisibilityCycle>,
    /// Self-duplication state for non-clone splitting adversaries.
    pub split: Option<SplitCycle>,
}

impl AdversarySnapshot {
    /// Reports whether the adversary is a hidden instance of a vanishing archetype.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.archetype.can_vanish() && !self.visible
    }
}

/// Read-only snapshot describing all adversaries within the maze.
#[derive(Clone, Debug, Default)]
pub struct AdversaryView {
    snapshots: Vec<AdversarySnapshot>,
}

impl AdversaryView {
    /// Creates a new adversary view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AdversarySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &AdversarySnapshot> {
        self.snapshots.iter()
    }

    /// Number of adversaries in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no adversaries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AdversarySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a resource lying in the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceSnapshot {
    /// Identifier allocated to the resource.
    pub id: ResourceId,
    /// Cell holding the resource.
    pub cell: CellCoord,
    /// Kind of the resource.
    pub kind: ResourceKind,
}

/// Immutable representation of a delivery station.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StationSnapshot {
    /// Identifier allocated to the station.
    pub id: StationId,
    /// Category of the station.
    pub kind: StationKind,
    /// Cell occupied by the station.
    pub cell: CellCoord,
    /// Current progress level.
    pub progress: u32,
    /// Progress level at which the station is complete.
    pub max_progress: u32,
}

impl StationSnapshot {
    /// Reports whether the station accepts no further deliveries.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.progress >= self.max_progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn direction_between_neighbors() {
        let origin = CellCoord::new(3, 3);
        assert_eq!(
            direction_between(origin, CellCoord::new(3, 2)),
            Some(Direction::North)
        );
        assert_eq!(
            direction_between(origin, CellCoord::new(4, 3)),
            Some(Direction::East)
        );
        assert_eq!(
            direction_between(origin, CellCoord::new(3, 4)),
            Some(Direction::South)
        );
        assert_eq!(
            direction_between(origin, CellCoord::new(2, 3)),
            Some(Direction::West)
        );
        assert_eq!(direction_between(origin, origin), None);
        assert_eq!(direction_between(origin, CellCoord::new(4, 4)), None);
    }

    #[test]
    fn neighbor_refuses_to_leave_the_origin() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.neighbor(Direction::North), None);
        assert_eq!(corner.neighbor(Direction::West), None);
        assert_eq!(corner.neighbor(Direction::East), Some(CellCoord::new(1, 0)));
        assert_eq!(
            corner.neighbor(Direction::South),
            Some(CellCoord::new(0, 1))
        );
    }

    #[test]
    fn opposite_is_an_involution() {
        for direction in Direction::ALL {
            assert_ne!(direction.opposite(), direction);
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn cell_of_rounds_to_the_nearest_center() {
        let geometry = CellGeometry::new(60);
        assert_eq!(geometry.cell_of(Position::new(60, 60)), CellCoord::new(1, 1));
        assert_eq!(geometry.cell_of(Position::new(89, 60)), CellCoord::new(1, 1));
        assert_eq!(geometry.cell_of(Position::new(90, 60)), CellCoord::new(2, 1));
        assert_eq!(geometry.cell_of(Position::new(60, 31)), CellCoord::new(1, 1));
    }

    #[test]
    fn alignment_requires_both_axes() {
        let geometry = CellGeometry::new(60);
        assert!(geometry.is_aligned(Position::new(120, 60)));
        assert!(!geometry.is_aligned(Position::new(121, 60)));
        assert!(!geometry.is_aligned(Position::new(120, 59)));
        assert_eq!(
            geometry.origin_of(CellCoord::new(3, 2)),
            Position::new(180, 120)
        );
    }

    #[test]
    fn advance_clamps_at_the_next_boundary() {
        let geometry = CellGeometry::new(60);
        let mut position = geometry.origin_of(CellCoord::new(1, 1));
        let mut steps = 0;
        loop {
            position = geometry.advance(position, Some(Direction::East), 7);
            steps += 1;
            if geometry.is_aligned(position) {
                break;
            }
        }
        assert_eq!(position, geometry.origin_of(CellCoord::new(2, 1)));
        assert_eq!(steps, 9);

        let back = geometry.advance(position, Some(Direction::West), 7);
        assert_eq!(back, Position::new(113, 60));
        assert_eq!(geometry.advance(back, None, 7), back);
    }

    #[test]
    fn zero_cell_length_is_raised_to_one() {
        assert_eq!(CellGeometry::new(0).cell_length(), 1);
    }

    #[test]
    fn maze_view_fails_closed_out_of_bounds() {
        let walls = vec![
            true, true, true, //
            true, false, true, //
            true, true, true,
        ];
        let view = MazeView::new(&walls, 3, 3);
        assert!(view.is_open(CellCoord::new(1, 1)));
        assert!(view.is_wall(CellCoord::new(0, 1)));
        assert!(view.is_wall(CellCoord::new(3, 1)));
        assert!(view.is_wall(CellCoord::new(1, 30)));
        assert!(view.open_directions(CellCoord::new(1, 1)).is_empty());
    }

    #[test]
    fn open_directions_follow_candidate_order() {
        let walls = vec![
            true, true, true, //
            false, false, false, //
            true, false, true,
        ];
        let view = MazeView::new(&walls, 3, 3);
        assert_eq!(
            view.open_directions(CellCoord::new(1, 1)),
            vec![Direction::East, Direction::West, Direction::South]
        );
    }

    #[test]
    fn difficulty_parses_names_and_aliases() {
        assert_eq!("Easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!("default".parse::<Difficulty>(), Ok(Difficulty::Normal));
        assert_eq!(" hard ".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("nightmare".parse::<Difficulty>().is_err());
    }

    #[test]
    fn tuning_speeds_divide_the_default_cell() {
        for difficulty in Difficulty::ALL {
            for archetype in Archetype::ALL {
                let tuning = archetype.tuning(difficulty);
                assert!(tuning.speed() > 0);
                assert_eq!(DEFAULT_CELL_LENGTH % tuning.speed(), 0);
                assert!(tuning.randomness_percent() <= 100);
            }
        }
    }

    #[test]
    fn stations_accept_distinct_resources() {
        let kinds = [
            StationKind::Housing,
            StationKind::Market,
            StationKind::School,
            StationKind::Hospital,
        ];
        let mut required: Vec<ResourceKind> =
            kinds.iter().map(|kind| kind.required_resource()).collect();
        required.sort();
        required.dedup();
        assert_eq!(required.len(), ResourceKind::ALL.len());
    }

    #[test]
    fn visibility_cycle_scales_threshold_by_frame_rate() {
        let cycle = VisibilityCycle {
            ticks: 180,
            threshold: 30,
        };
        assert!(!cycle.is_due());
        let cycle = VisibilityCycle {
            ticks: 181,
            threshold: 30,
        };
        assert!(cycle.is_due());
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(5, 7));
    }

    #[test]
    fn difficulty_round_trips_through_bincode() {
        assert_round_trip(&Difficulty::Hard);
    }
}
