use community_maze_core::CellCoord;
use community_maze_world::{navigation::find_path, Maze};
use proptest::prelude::*;

const COLUMNS: usize = 8;
const ROWS: usize = 7;

fn bordered_maze(interior_walls: &[bool]) -> Maze {
    let rows: Vec<String> = (0..ROWS)
        .map(|row| {
            (0..COLUMNS)
                .map(|column| {
                    let border = row == 0 || column == 0 || row + 1 == ROWS || column + 1 == COLUMNS;
                    let interior = !border
                        && interior_walls[(row - 1) * (COLUMNS - 2) + (column - 1)];
                    if border || interior {
                        '#'
                    } else {
                        '.'
                    }
                })
                .collect()
        })
        .collect();
    Maze::from_rows(&rows).expect("bordered maze is valid")
}

/// Relaxes every edge until no distance improves.
fn reference_distance(maze: &Maze, start: CellCoord, goal: CellCoord) -> Option<u32> {
    let cells: Vec<CellCoord> = maze.open_cells().iter().copied().collect();
    let mut distance: Vec<Option<u32>> = cells
        .iter()
        .map(|cell| (*cell == start).then_some(0))
        .collect();

    loop {
        let mut changed = false;
        for (to, target) in cells.iter().enumerate() {
            for (from, source) in cells.iter().enumerate() {
                if source.manhattan_distance(*target) != 1 {
                    continue;
                }
                if let Some(candidate) = distance[from].map(|value| value + 1) {
                    if distance[to].map_or(true, |current| candidate < current) {
                        distance[to] = Some(candidate);
                        changed = true;
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }

    cells
        .iter()
        .position(|cell| *cell == goal)
        .and_then(|index| distance[index])
}

fn interior_cell() -> impl Strategy<Value = CellCoord> {
    (1..COLUMNS as u32 - 1, 1..ROWS as u32 - 1).prop_map(|(column, row)| CellCoord::new(column, row))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn bfs_paths_are_as_short_as_the_reference(
        walls in proptest::collection::vec(prop::bool::weighted(0.3), (COLUMNS - 2) * (ROWS - 2)),
        start in interior_cell(),
        goal in interior_cell(),
    ) {
        let maze = bordered_maze(&walls);
        let path = find_path(&maze, start, goal);

        if maze.is_wall(start) || maze.is_wall(goal) {
            prop_assert!(path.is_empty());
            return Ok(());
        }

        match reference_distance(&maze, start, goal) {
            Some(distance) => {
                prop_assert_eq!(path.len(), distance as usize + 1);
                prop_assert_eq!(path.first().copied(), Some(start));
                prop_assert_eq!(path.last().copied(), Some(goal));
                prop_assert!(path.iter().all(|cell| !maze.is_wall(*cell)));
                for pair in path.windows(2) {
                    prop_assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
                }
            }
            None => prop_assert!(path.is_empty(), "unreachable goal produced {:?}", path),
        }
    }
}

#[test]
fn end_to_end_room_path_has_manhattan_length() {
    let maze = Maze::parse("#####\n#...#\n#...#\n#...#\n#####").expect("valid maze");
    let start = CellCoord::new(1, 1);
    let goal = CellCoord::new(3, 3);
    let path = find_path(&maze, start, goal);
    assert_eq!(path.len(), start.manhattan_distance(goal) as usize + 1);
}

#[test]
fn default_maze_connects_every_open_cell_to_the_player_spawn() {
    let maze = Maze::default();
    let spawn = CellCoord::new(1, 1);
    for cell in maze.open_cells() {
        assert!(
            !find_path(&maze, spawn, *cell).is_empty(),
            "{cell:?} is unreachable from the spawn"
        );
    }
}
