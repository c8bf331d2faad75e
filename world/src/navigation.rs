//! Breadth-first shortest path queries used for click-to-move.

use std::collections::VecDeque;

use community_maze_core::{CellCoord, Direction};

use crate::maze::Maze;

/// Order in which neighbors are expanded while searching.
const EXPANSION_ORDER: [Direction; 4] = [
    Direction::South,
    Direction::North,
    Direction::East,
    Direction::West,
];

/// Computes the shortest sequence of open cells leading from `start` to `goal`.
///
/// The returned path includes both endpoints. An empty path is returned when
/// either endpoint is a wall or when the goal lies in a region that cannot be
/// reached from the start. The search is recomputed from scratch on every call.
#[must_use]
pub fn find_path(maze: &Maze, start: CellCoord, goal: CellCoord) -> Vec<CellCoord> {
    if maze.is_wall(goal) || maze.is_wall(start) {
        return Vec::new();
    }

    let width = usize::try_from(maze.columns()).unwrap_or(0);
    let height = usize::try_from(maze.rows()).unwrap_or(0);
    let Some(cell_count) = width.checked_mul(height) else {
        return Vec::new();
    };
    let (Some(start_index), Some(goal_index)) = (index(width, start), index(width, goal)) else {
        return Vec::new();
    };

    let mut parents: Vec<Option<usize>> = vec![None; cell_count];
    let mut visited = vec![false; cell_count];
    visited[start_index] = true;

    let mut queue = VecDeque::new();
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        if cell == goal {
            break;
        }
        let Some(current_index) = index(width, cell) else {
            continue;
        };

        for neighbor in neighbors(cell) {
            if maze.is_wall(neighbor) {
                continue;
            }
            let Some(neighbor_index) = index(width, neighbor) else {
                continue;
            };
            if visited[neighbor_index] {
                continue;
            }

            visited[neighbor_index] = true;
            parents[neighbor_index] = Some(current_index);
            queue.push_back(neighbor);
        }
    }

    if !visited[goal_index] {
        return Vec::new();
    }

    let mut path = vec![goal];
    let mut cursor = goal_index;
    while let Some(parent) = parents[cursor] {
        path.push(cell_at(width, parent));
        cursor = parent;
    }
    path.reverse();

    debug_assert_eq!(path.first().copied(), Some(start));
    path
}

fn neighbors(cell: CellCoord) -> impl Iterator<Item = CellCoord> {
    EXPANSION_ORDER
        .into_iter()
        .filter_map(move |direction| cell.neighbor(direction))
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    if column >= width {
        return None;
    }
    row.checked_mul(width)?.checked_add(column)
}

fn cell_at(width: usize, index: usize) -> CellCoord {
    let column = u32::try_from(index % width).unwrap_or(u32::MAX);
    let row = u32::try_from(index / width).unwrap_or(u32::MAX);
    CellCoord::new(column, row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_room() -> Maze {
        Maze::parse("#####\n#...#\n#...#\n#...#\n#####").expect("valid maze")
    }

    #[test]
    fn path_includes_both_endpoints() {
        let maze = open_room();
        let path = find_path(&maze, CellCoord::new(1, 1), CellCoord::new(3, 3));
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(&CellCoord::new(1, 1)));
        assert_eq!(path.last(), Some(&CellCoord::new(3, 3)));
    }

    #[test]
    fn ties_follow_expansion_order() {
        let maze = open_room();
        let path = find_path(&maze, CellCoord::new(1, 1), CellCoord::new(3, 3));
        assert_eq!(
            path,
            vec![
                CellCoord::new(1, 1),
                CellCoord::new(1, 2),
                CellCoord::new(1, 3),
                CellCoord::new(2, 3),
                CellCoord::new(3, 3),
            ]
        );
    }

    #[test]
    fn trivial_path_contains_only_the_start() {
        let maze = open_room();
        let cell = CellCoord::new(2, 2);
        assert_eq!(find_path(&maze, cell, cell), vec![cell]);
    }

    #[test]
    fn wall_goal_yields_empty_path() {
        let maze = open_room();
        assert!(find_path(&maze, CellCoord::new(1, 1), CellCoord::new(0, 0)).is_empty());
        assert!(find_path(&maze, CellCoord::new(1, 1), CellCoord::new(9, 9)).is_empty());
    }

    #[test]
    fn disconnected_regions_yield_empty_path() {
        let maze = Maze::parse("#######\n#..#..#\n#..#..#\n#######").expect("valid maze");
        assert!(find_path(&maze, CellCoord::new(1, 1), CellCoord::new(5, 2)).is_empty());
    }

    #[test]
    fn path_detours_around_walls() {
        let maze = Maze::parse("#####\n#.#.#\n#.#.#\n#...#\n#####").expect("valid maze");
        let path = find_path(&maze, CellCoord::new(1, 1), CellCoord::new(3, 1));
        assert_eq!(path.len(), 7);
        assert!(path.iter().all(|cell| !maze.is_wall(*cell)));
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
        }
    }
}
