#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cell-coincidence checks between the player and resources, stations and
//! adversaries.

use community_maze_core::{
    AdversaryView, Command, Event, PlayerSnapshot, ResourceSnapshot, StationSnapshot,
};
use log::trace;

/// Pure system that emits collection, delivery and collision commands.
#[derive(Debug, Default)]
pub struct Interaction;

impl Interaction {
    /// Consumes world events and final positions to emit interaction commands.
    ///
    /// At most one resource is collected per tick: the first one, in spawn
    /// order, that shares the player's cell. Hidden adversaries never trigger
    /// a collision.
    pub fn handle(
        &mut self,
        events: &[Event],
        player: &PlayerSnapshot,
        resources: &[ResourceSnapshot],
        stations: &[StationSnapshot],
        adversaries: &AdversaryView,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        if player.inventory.len() < player.capacity {
            if let Some(resource) = resources
                .iter()
                .find(|resource| resource.cell == player.cell)
            {
                out.push(Command::CollectResource {
                    resource: resource.id,
                });
            }
        }

        for station in stations {
            if station.cell != player.cell || station.is_complete() {
                continue;
            }
            let required = station.kind.required_resource();
            if player.inventory.iter().any(|item| *item == required) {
                out.push(Command::DeliverToStation {
                    station: station.id,
                });
            }
        }

        if let Some(adversary) = adversaries
            .iter()
            .find(|adversary| adversary.visible && adversary.cell == player.cell)
        {
            trace!("{:?} reached the player at {:?}", adversary.id, player.cell);
            out.push(Command::CatchPlayer {
                adversary: adversary.id,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use community_maze_core::{
        AdversaryId, AdversarySnapshot, Archetype, CellCoord, Difficulty, Direction, Position,
        ResourceId, ResourceKind, StationId, StationKind, VisibilityCycle,
    };

    use super::*;

    fn tick() -> Vec<Event> {
        vec![Event::TimeAdvanced {
            dt: Duration::from_millis(16),
        }]
    }

    fn player(inventory: Vec<ResourceKind>) -> PlayerSnapshot {
        PlayerSnapshot {
            position: Position::new(120, 60),
            cell: CellCoord::new(2, 1),
            heading: None,
            facing: Direction::East,
            speed: 6,
            intent: None,
            path: Vec::new(),
            inventory,
            capacity: 2,
        }
    }

    fn lurker(visible: bool) -> AdversarySnapshot {
        AdversarySnapshot {
            id: AdversaryId::new(3),
            archetype: Archetype::LackOfAccess,
            position: Position::new(120, 60),
            cell: CellCoord::new(2, 1),
            heading: None,
            facing: Direction::West,
            tuning: Archetype::LackOfAccess.tuning(Difficulty::Normal),
            visible,
            clone_of: None,
            visibility: Some(VisibilityCycle {
                ticks: 0,
                threshold: 30,
            }),
            split: None,
        }
    }

    fn resource(id: u32, column: u32) -> ResourceSnapshot {
        ResourceSnapshot {
            id: ResourceId::new(id),
            cell: CellCoord::new(column, 1),
            kind: ResourceKind::Coin,
        }
    }

    fn run(
        player: &PlayerSnapshot,
        resources: &[ResourceSnapshot],
        stations: &[StationSnapshot],
        adversaries: &AdversaryView,
    ) -> Vec<Command> {
        let mut out = Vec::new();
        Interaction.handle(&tick(), player, resources, stations, adversaries, &mut out);
        out
    }

    #[test]
    fn collects_only_the_first_resource_on_the_cell() {
        let resources = [resource(0, 3), resource(1, 2), resource(2, 2)];
        assert_eq!(
            run(
                &player(Vec::new()),
                &resources,
                &[],
                &AdversaryView::default()
            ),
            vec![Command::CollectResource {
                resource: ResourceId::new(1)
            }]
        );
    }

    #[test]
    fn full_inventory_skips_collection() {
        let resources = [resource(0, 2)];
        assert!(run(
            &player(vec![ResourceKind::Book, ResourceKind::Food]),
            &resources,
            &[],
            &AdversaryView::default()
        )
        .is_empty());
    }

    #[test]
    fn delivers_only_matching_items_to_open_stations() {
        let station = StationSnapshot {
            id: StationId::new(1),
            kind: StationKind::Hospital,
            cell: CellCoord::new(2, 1),
            progress: 4,
            max_progress: 5,
        };
        let full = StationSnapshot {
            progress: 5,
            ..station
        };

        assert_eq!(
            run(
                &player(vec![ResourceKind::Coin]),
                &[],
                &[station],
                &AdversaryView::default()
            ),
            vec![Command::DeliverToStation {
                station: StationId::new(1)
            }]
        );
        assert!(run(
            &player(vec![ResourceKind::Book]),
            &[],
            &[station],
            &AdversaryView::default()
        )
        .is_empty());
        assert!(run(
            &player(vec![ResourceKind::Coin]),
            &[],
            &[full],
            &AdversaryView::default()
        )
        .is_empty());
    }

    #[test]
    fn hidden_adversary_passes_through_the_player() {
        let hidden = AdversaryView::from_snapshots(vec![lurker(false)]);
        assert!(run(&player(Vec::new()), &[], &[], &hidden).is_empty());

        let exposed = AdversaryView::from_snapshots(vec![lurker(true)]);
        assert_eq!(
            run(&player(Vec::new()), &[], &[], &exposed),
            vec![Command::CatchPlayer {
                adversary: AdversaryId::new(3)
            }]
        );
    }
}
