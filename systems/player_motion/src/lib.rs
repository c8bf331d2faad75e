#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player motion system that reconciles queued input, click-to-move paths and
//! the current heading into steering commands.
//!
//! Decisions are only taken while the player sits exactly on a cell origin.
//! Between cells the player keeps its heading and the system merely requests
//! the per-tick displacement.

use community_maze_core::{
    direction_between, CellGeometry, Command, Direction, Event, MazeView, PlayerSnapshot,
    PlayerSteering,
};
use log::trace;

/// Pure system that turns the player snapshot into steering commands.
#[derive(Debug, Default)]
pub struct PlayerMotion;

impl PlayerMotion {
    /// Consumes world events and the player snapshot to emit motion commands.
    ///
    /// Nothing is emitted unless the batch contains a `TimeAdvanced` event.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: &PlayerSnapshot,
        geometry: CellGeometry,
        maze: MazeView<'_>,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        if geometry.is_aligned(player.position) {
            let heading = self.steer(player, maze, out);
            if let Some(direction) = heading {
                if !maze.is_open_towards(player.cell, direction) {
                    trace!("player blocked heading {direction:?} at {:?}", player.cell);
                    out.push(Command::SteerPlayer {
                        steering: PlayerSteering::Halt,
                    });
                }
            }
        }

        out.push(Command::AdvancePlayer);
    }

    /// Emits the steering decision for an aligned player and returns the
    /// heading that will be in effect afterwards.
    fn steer(
        &self,
        player: &PlayerSnapshot,
        maze: MazeView<'_>,
        out: &mut Vec<Command>,
    ) -> Option<Direction> {
        if let Some(head) = player.path.first() {
            let consumed_head = *head == player.cell;
            let remaining = if consumed_head {
                &player.path[1..]
            } else {
                &player.path[..]
            };

            let heading = match remaining.first() {
                Some(next) => {
                    let Some(direction) = direction_between(player.cell, *next) else {
                        trace!("path waypoint {next:?} is not adjacent to {:?}", player.cell);
                        out.push(Command::SteerPlayer {
                            steering: PlayerSteering::Halt,
                        });
                        return None;
                    };
                    Some(direction)
                }
                None => None,
            };

            out.push(Command::SteerPlayer {
                steering: PlayerSteering::FollowPath {
                    consumed_head,
                    heading,
                },
            });
            return heading;
        }

        if let Some(intent) = player.intent {
            if maze.is_open_towards(player.cell, intent) {
                out.push(Command::SteerPlayer {
                    steering: PlayerSteering::Turn { direction: intent },
                });
                return Some(intent);
            }
        }

        player.heading
    }
}
