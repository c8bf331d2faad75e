#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Community Maze adapters.

use anyhow::Result as AnyResult;
use community_maze_core::{
    ActorColor, AdversaryId, Archetype, CellCoord, Difficulty, Direction, GamePhase, PlayMode,
    Position, ResourceId, ResourceKind, SessionStats, StationId, StationKind, UNITS_PER_PIXEL,
};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// Alpha applied to fully visible actors.
pub const OPAQUE_ALPHA: f32 = 1.0;

/// Alpha applied to duplicated adversaries.
pub const CLONE_ALPHA: f32 = 200.0 / 255.0;

/// Alpha applied to adversaries that are currently invisible.
pub const HIDDEN_ALPHA: f32 = 120.0 / 255.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha channel replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            red: self.red,
            green: self.green,
            blue: self.blue,
            alpha,
        }
    }
}

impl From<ActorColor> for Color {
    fn from(color: ActorColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Computes the render-alpha hint for an adversary.
///
/// Hidden adversaries take precedence over clones.
#[must_use]
pub fn render_alpha(visible: bool, is_clone: bool) -> f32 {
    if !visible {
        HIDDEN_ALPHA
    } else if is_clone {
        CLONE_ALPHA
    } else {
        OPAQUE_ALPHA
    }
}

/// Converts a world-unit position into presentation pixels.
#[must_use]
pub fn to_pixels(position: Position) -> Vec2 {
    let scale = UNITS_PER_PIXEL as f32;
    Vec2::new(position.x() as f32 / scale, position.y() as f32 / scale)
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Direction currently requested by the keyboard, if any.
    pub direction: Option<Direction>,
    /// Pointer click expressed in scene pixels.
    pub click: Option<Vec2>,
    /// Whether the adapter detected a discard request on this frame.
    pub discard: bool,
    /// Whether the adapter detected a pause toggle on this frame.
    pub pause_toggle: bool,
}

/// Static wall layout of the maze expressed in presentation pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct MazePresentation {
    /// Number of columns in the maze.
    pub columns: u32,
    /// Number of rows in the maze.
    pub rows: u32,
    /// Side length of a cell in pixels.
    pub cell_size: f32,
    walls: Vec<bool>,
}

impl MazePresentation {
    /// Creates a maze descriptor from a row-major wall mask.
    pub fn new(
        columns: u32,
        rows: u32,
        cell_size: f32,
        walls: Vec<bool>,
    ) -> Result<Self, RenderingError> {
        if cell_size <= 0.0 {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }

        let expected = columns as usize * rows as usize;
        if walls.len() != expected {
            return Err(RenderingError::WallMaskMismatch {
                expected,
                found: walls.len(),
            });
        }

        Ok(Self {
            columns,
            rows,
            cell_size,
            walls,
        })
    }

    /// Reports whether the cell is a wall. Cells outside the maze count as walls.
    #[must_use]
    pub fn is_wall(&self, column: u32, row: u32) -> bool {
        if column >= self.columns || row >= self.rows {
            return true;
        }
        let index = row as usize * self.columns as usize + column as usize;
        self.walls.get(index).copied().unwrap_or(true)
    }

    /// Width of the maze in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_size
    }

    /// Height of the maze in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }

    /// Top-left pixel of the provided cell.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.cell_size,
            cell.row() as f32 * self.cell_size,
        )
    }

    /// Resolves the cell under a pixel, if it lies inside the maze.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<CellCoord> {
        if point.x < 0.0 || point.y < 0.0 || point.x >= self.width() || point.y >= self.height() {
            return None;
        }
        let column = (point.x / self.cell_size) as u32;
        let row = (point.y / self.cell_size) as u32;
        Some(CellCoord::new(column, row))
    }
}

/// Player state exposed for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Top-left pixel of the player sprite.
    pub position: Vec2,
    /// Cell the player currently occupies.
    pub cell: CellCoord,
    /// Logical facing used for sprite selection.
    pub facing: Direction,
    /// Items carried by the player, oldest first.
    pub inventory: Vec<ResourceKind>,
    /// Maximum number of carried items.
    pub capacity: usize,
}

/// Adversary state exposed for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdversaryPresentation {
    /// Identifier allocated by the world.
    pub id: AdversaryId,
    /// Behaviour archetype of the adversary.
    pub archetype: Archetype,
    /// Top-left pixel of the adversary sprite.
    pub position: Vec2,
    /// Cell the adversary currently occupies.
    pub cell: CellCoord,
    /// Logical facing used for sprite selection.
    pub facing: Direction,
    /// Whether the adversary can currently collide with the player.
    pub visible: bool,
    /// Whether the adversary is a temporary duplicate.
    pub is_clone: bool,
    /// Fill color with the render-alpha hint applied.
    pub color: Color,
}

impl AdversaryPresentation {
    /// Alpha hint the renderer should apply.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.color.alpha
    }
}

/// Resource pickup exposed for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResourcePresentation {
    /// Identifier allocated by the world.
    pub id: ResourceId,
    /// Kind of resource.
    pub kind: ResourceKind,
    /// Cell hosting the resource.
    pub cell: CellCoord,
    /// Fill color of the resource marker.
    pub color: Color,
}

/// Delivery station exposed for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StationPresentation {
    /// Identifier allocated by the world.
    pub id: StationId,
    /// Kind of station.
    pub kind: StationKind,
    /// Cell hosting the station.
    pub cell: CellCoord,
    /// Items delivered so far.
    pub progress: u32,
    /// Items required to complete the station.
    pub max_progress: u32,
    /// Fill color of the station marker.
    pub color: Color,
}

impl StationPresentation {
    /// Fraction of the station that has been completed.
    #[must_use]
    pub fn completion(&self) -> f32 {
        if self.max_progress == 0 {
            return 1.0;
        }
        self.progress as f32 / self.max_progress as f32
    }
}

/// Describes the full scene the adapter should display.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Static maze layout.
    pub maze: MazePresentation,
    /// Player actor.
    pub player: PlayerPresentation,
    /// Adversaries ordered by identifier.
    pub adversaries: Vec<AdversaryPresentation>,
    /// Resources waiting to be collected.
    pub resources: Vec<ResourcePresentation>,
    /// Delivery stations.
    pub stations: Vec<StationPresentation>,
    /// Counters accumulated during the round.
    pub stats: SessionStats,
    /// Whether the clock is running.
    pub play_mode: PlayMode,
    /// Outcome of the round so far.
    pub phase: GamePhase,
    /// Difficulty tier of the round.
    pub difficulty: Difficulty,
}

impl Scene {
    /// Reports whether the round has ended.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase != GamePhase::Running
    }

    /// Returns the adversary drawn at the provided cell, if any.
    #[must_use]
    pub fn adversary_at(&self, cell: CellCoord) -> Option<&AdversaryPresentation> {
        self.adversaries
            .iter()
            .find(|adversary| adversary.cell == cell)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window or printed header.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Community Maze scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cells must have a positive pixel size.
    InvalidCellSize {
        /// Provided size that failed validation.
        cell_size: f32,
    },
    /// The wall mask does not cover the maze exactly.
    WallMaskMismatch {
        /// Number of cells described by the dimensions.
        expected: usize,
        /// Number of entries supplied in the mask.
        found: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellSize { cell_size } => {
                write!(f, "cell size must be positive (received {cell_size})")
            }
            Self::WallMaskMismatch { expected, found } => {
                write!(f, "wall mask holds {found} cells, expected {expected}")
            }
        }
    }
}

impl Error for RenderingError {}
