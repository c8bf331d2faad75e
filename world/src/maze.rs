//! Static wall layout shared by every actor in the world.

use std::collections::BTreeSet;

use community_maze_core::{CellCoord, MazeView};
use thiserror::Error;

/// Rows of the community maze used when no custom layout is configured.
pub const DEFAULT_LAYOUT: [&str; 15] = [
    "################################",
    "#...##......#......#......##...#",
    "#.#....####.#.####.#.####....#.#",
    "#.###.#.................#.####.#",
    "#.....#.###.##.##.##.####.#....#",
    "###.###...#..#....#..#....###.##",
    "#.......#.##.##..##.##.#.......#",
    "#.#######..............#######.#",
    "#.......#.#####..#####.#.......#",
    "###.###.......####.......###.###",
    "#.....#.###.#......#.####.#....#",
    "#.###.#...#.###..###.#....#.##.#",
    "#...#.###.#..........###.##....#",
    "#.#.......#.....##...#.........#",
    "################################",
];

/// Errors raised while parsing a textual maze layout.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    /// The layout contained no rows.
    #[error("maze layout is empty")]
    Empty,
    /// A row did not match the width of the first row.
    #[error("maze row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: u32,
        /// Width established by the first row.
        expected: u32,
        /// Width of the offending row.
        found: u32,
    },
    /// A character was neither a wall nor an open marker.
    #[error("unknown maze symbol {symbol:?} at column {column}, row {row}")]
    UnknownSymbol {
        /// Zero-based column of the symbol.
        column: u32,
        /// Zero-based row of the symbol.
        row: u32,
        /// Offending character.
        symbol: char,
    },
    /// An open cell lies on the outer border.
    #[error("maze border is open at column {}, row {}", .cell.column(), .cell.row())]
    OpenBorder {
        /// First border cell found open.
        cell: CellCoord,
    },
    /// The layout exceeds the supported dimensions.
    #[error("maze layout is too large")]
    TooLarge,
}

/// Immutable occupancy matrix with a precomputed set of open cells.
///
/// Rows are stored top to bottom in row-major order. The outer border is
/// guaranteed to consist of walls, so no actor can leave the matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    columns: u32,
    rows: u32,
    walls: Vec<bool>,
    open_cells: BTreeSet<CellCoord>,
}

impl Maze {
    /// Parses a layout where `#`/`1` mark walls and `.`/`0`/space mark open cells.
    ///
    /// Blank lines are skipped and trailing whitespace (other than a space
    /// used as an open marker inside the row) is trimmed from line endings.
    pub fn parse(layout: &str) -> Result<Self, MazeError> {
        let lines: Vec<&str> = layout
            .lines()
            .map(|line| line.trim_end_matches(['\r', '\t']))
            .filter(|line| !line.trim().is_empty())
            .collect();
        Self::from_rows(&lines)
    }

    /// Builds a maze from individual rows using the same symbols as [`Maze::parse`].
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, MazeError> {
        let Some(first) = rows.first() else {
            return Err(MazeError::Empty);
        };
        let columns =
            u32::try_from(first.as_ref().chars().count()).map_err(|_| MazeError::TooLarge)?;
        let row_count = u32::try_from(rows.len()).map_err(|_| MazeError::TooLarge)?;
        if columns == 0 {
            return Err(MazeError::Empty);
        }

        let mut walls = Vec::with_capacity(rows.len() * first.as_ref().len());
        for (row, line) in (0..row_count).zip(rows) {
            let line = line.as_ref();
            let found = u32::try_from(line.chars().count()).map_err(|_| MazeError::TooLarge)?;
            if found != columns {
                return Err(MazeError::Ragged {
                    row,
                    expected: columns,
                    found,
                });
            }

            for (column, symbol) in (0..columns).zip(line.chars()) {
                let wall = match symbol {
                    '#' | '1' => true,
                    '.' | '0' | ' ' => false,
                    _ => {
                        return Err(MazeError::UnknownSymbol {
                            column,
                            row,
                            symbol,
                        })
                    }
                };
                walls.push(wall);
            }
        }

        let maze = Self::from_walls(columns, row_count, walls);
        if let Some(cell) = maze.first_open_border_cell() {
            return Err(MazeError::OpenBorder { cell });
        }
        Ok(maze)
    }

    fn from_walls(columns: u32, rows: u32, walls: Vec<bool>) -> Self {
        let open_cells = (0..rows)
            .flat_map(|row| (0..columns).map(move |column| CellCoord::new(column, row)))
            .zip(walls.iter())
            .filter(|(_, wall)| !**wall)
            .map(|(cell, _)| cell)
            .collect();

        Self {
            columns,
            rows,
            walls,
            open_cells,
        }
    }

    fn first_open_border_cell(&self) -> Option<CellCoord> {
        self.open_cells.iter().copied().find(|cell| {
            cell.column() == 0
                || cell.row() == 0
                || cell.column() + 1 == self.columns
                || cell.row() + 1 == self.rows
        })
    }

    /// Number of columns in the matrix.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the matrix.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell blocks movement; out-of-bounds cells are walls.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.view().is_wall(cell)
    }

    /// Set of traversable cells, ordered by row then column.
    #[must_use]
    pub fn open_cells(&self) -> &BTreeSet<CellCoord> {
        &self.open_cells
    }

    /// Read-only collision view over the wall matrix.
    #[must_use]
    pub fn view(&self) -> MazeView<'_> {
        MazeView::new(&self.walls, self.columns, self.rows)
    }
}

impl Default for Maze {
    fn default() -> Self {
        let walls = DEFAULT_LAYOUT
            .iter()
            .flat_map(|row| row.bytes().map(|symbol| symbol == b'#'))
            .collect();
        Self::from_walls(DEFAULT_COLUMNS, DEFAULT_ROWS, walls)
    }
}

const DEFAULT_COLUMNS: u32 = 32;
const DEFAULT_ROWS: u32 = 15;
