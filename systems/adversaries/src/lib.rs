#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Adversary behaviour system: chase/random steering at alignment, visibility
//! cycling and timed self-duplication.
//!
//! All randomness flows through the injected [`Rng`], so a seeded source
//! reproduces a round exactly. The system never mutates adversaries directly;
//! spawn and removal requests are emitted as commands and applied by the caller
//! once the whole view has been processed.

use std::{ops::RangeInclusive, time::Duration};

use community_maze_core::{
    AdversarySnapshot, AdversaryView, CellCoord, CellGeometry, Command, Direction, Event,
    MazeView, SplitPhase, SplitTimers,
};
use log::{debug, trace};
use rand::{seq::SliceRandom, Rng};

/// Initial visibility threshold range, in tenths of a second.
const FIRST_VISIBILITY_THRESHOLD: RangeInclusive<u32> = 30..=60;
/// Visibility threshold range drawn after every toggle.
const NEXT_VISIBILITY_THRESHOLD: RangeInclusive<u32> = 20..=50;
/// Idle time before a clone appears, in milliseconds.
const SPLIT_COOLDOWN_MS: RangeInclusive<u64> = 5_500..=9_000;
/// Lifetime of a clone, in milliseconds.
const SPLIT_DURATION_MS: RangeInclusive<u64> = 2_000..=3_800;

/// Pure system that steers adversaries and drives their timed behaviours.
#[derive(Debug)]
pub struct Adversaries<R> {
    rng: R,
}

impl<R: Rng> Adversaries<R> {
    /// Creates the system around the provided random source.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Consumes world events and the adversary view to emit behaviour commands.
    ///
    /// Freshly spawned non-clone adversaries are primed with randomised
    /// timers. When the batch contains a `TimeAdvanced` event every adversary
    /// is processed in identifier order and the batch ends with a single
    /// `AdvanceAdversaries` command.
    pub fn handle(
        &mut self,
        events: &[Event],
        adversaries: &AdversaryView,
        player_cell: CellCoord,
        geometry: CellGeometry,
        maze: MazeView<'_>,
        out: &mut Vec<Command>,
    ) {
        let mut time_advanced = false;
        for event in events {
            match event {
                Event::AdversarySpawned {
                    adversary,
                    archetype,
                    clone_of: None,
                    ..
                } => {
                    let heading = Direction::ALL.choose(&mut self.rng).copied();
                    let visibility_threshold = archetype
                        .can_vanish()
                        .then(|| self.rng.gen_range(FIRST_VISIBILITY_THRESHOLD));
                    let split = archetype.can_split().then(|| self.draw_split_timers());
                    out.push(Command::PrimeAdversary {
                        adversary: *adversary,
                        heading,
                        visibility_threshold,
                        split,
                    });
                }
                Event::TimeAdvanced { .. } => time_advanced = true,
                _ => {}
            }
        }

        if !time_advanced {
            return;
        }

        for adversary in adversaries.iter() {
            if adversary.visibility.map_or(false, |cycle| cycle.is_due()) {
                out.push(Command::ToggleVisibility {
                    adversary: adversary.id,
                    next_threshold: self.rng.gen_range(NEXT_VISIBILITY_THRESHOLD),
                });
            }

            let heading = if geometry.is_aligned(adversary.position) {
                let heading = self.choose_heading(adversary, player_cell, maze);
                trace!("{:?} heads {heading:?} from {:?}", adversary.id, adversary.cell);
                out.push(Command::SteerAdversary {
                    adversary: adversary.id,
                    heading,
                });
                heading
            } else {
                adversary.heading
            };

            self.drive_split(adversary, heading, geometry, maze, out);
        }

        out.push(Command::AdvanceAdversaries);
    }

    /// Picks the heading taken from an aligned position.
    fn choose_heading(
        &mut self,
        adversary: &AdversarySnapshot,
        player_cell: CellCoord,
        maze: MazeView<'_>,
    ) -> Option<Direction> {
        let mut candidates = maze.open_directions(adversary.cell);
        if candidates.len() > 1 {
            if let Some(reverse) = adversary.heading.map(Direction::opposite) {
                candidates.retain(|direction| *direction != reverse);
            }
        }
        if candidates.is_empty() {
            return None;
        }

        let wander = self
            .rng
            .gen_ratio(adversary.tuning.randomness_percent(), 100);
        if !wander {
            if let Some(direction) = chase_step(adversary.cell, player_cell, &candidates) {
                return Some(direction);
            }
        }

        candidates.choose(&mut self.rng).copied()
    }

    fn drive_split(
        &mut self,
        adversary: &AdversarySnapshot,
        heading: Option<Direction>,
        geometry: CellGeometry,
        maze: MazeView<'_>,
        out: &mut Vec<Command>,
    ) {
        if adversary.clone_of.is_some() {
            return;
        }
        let Some(cycle) = adversary.split else {
            return;
        };
        if !cycle.is_due() {
            return;
        }

        match cycle.phase {
            SplitPhase::Idle => {
                let options = clone_headings(adversary, heading, geometry, maze);
                let clone_heading = options.choose(&mut self.rng).copied();
                debug!(
                    "{:?} splits at {:?}, clone heads {clone_heading:?}",
                    adversary.id, adversary.cell
                );
                out.push(Command::SplitAdversary {
                    parent: adversary.id,
                    clone_heading,
                });
            }
            SplitPhase::Active => {
                let next = self.draw_split_timers();
                out.push(Command::MergeClone {
                    parent: adversary.id,
                    next,
                });
            }
        }
    }

    fn draw_split_timers(&mut self) -> SplitTimers {
        SplitTimers {
            cooldown: Duration::from_millis(self.rng.gen_range(SPLIT_COOLDOWN_MS)),
            duration: Duration::from_millis(self.rng.gen_range(SPLIT_DURATION_MS)),
        }
    }
}

/// Step towards the player along the axis of larger distance first.
///
/// Ties prefer the vertical axis. Each axis contributes at most the single
/// step pointing at the player, and only when that step is a candidate.
fn chase_step(from: CellCoord, player: CellCoord, candidates: &[Direction]) -> Option<Direction> {
    let dx = i64::from(player.column()) - i64::from(from.column());
    let dy = i64::from(player.row()) - i64::from(from.row());

    let horizontal = match dx.signum() {
        1 => Some(Direction::East),
        -1 => Some(Direction::West),
        _ => None,
    };
    let vertical = match dy.signum() {
        1 => Some(Direction::South),
        -1 => Some(Direction::North),
        _ => None,
    };
    let preferred = if dx.abs() > dy.abs() {
        [horizontal, vertical]
    } else {
        [vertical, horizontal]
    };

    preferred
        .into_iter()
        .flatten()
        .find(|direction| candidates.contains(direction))
}

/// Traversable headings for a clone spawned on the adversary's position,
/// excluding the heading the parent takes this tick.
///
/// Directions blocked by a wall are never offered, so a clone can only start
/// moving into an open neighbour.
fn clone_headings(
    adversary: &AdversarySnapshot,
    parent_heading: Option<Direction>,
    geometry: CellGeometry,
    maze: MazeView<'_>,
) -> Vec<Direction> {
    let traversable = if geometry.is_aligned(adversary.position) {
        maze.open_directions(adversary.cell)
    } else {
        parent_heading
            .map(|direction| vec![direction, direction.opposite()])
            .unwrap_or_default()
    };

    traversable
        .into_iter()
        .filter(|direction| Some(*direction) != parent_heading)
        .collect()
}
