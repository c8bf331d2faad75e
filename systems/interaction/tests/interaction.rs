use std::time::Duration;

use community_maze_core::{
    CellCoord, Command, Direction, Event, GamePhase, PlayerSteering, ResourceKind, StationId,
    StationKind,
};
use community_maze_system_interaction::Interaction;
use community_maze_world::{self as world, query, Maze, StationPlacement, World, WorldConfig};

fn corridor_world() -> World {
    World::with_config(WorldConfig {
        maze: Maze::parse("#######\n#.....#\n#######").expect("valid maze"),
        player_spawn: CellCoord::new(1, 1),
        adversaries: Vec::new(),
        stations: vec![StationPlacement {
            kind: StationKind::Hospital,
            cell: CellCoord::new(1, 1),
        }],
        ..WorldConfig::default()
    })
    .expect("valid scenario")
}

fn submit(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn walk(world: &mut World, direction: Direction, cells: usize) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..cells {
        let _ = submit(
            world,
            Command::SteerPlayer {
                steering: PlayerSteering::Turn { direction },
            },
        );
        for _ in 0..10 {
            let _ = submit(world, Command::AdvancePlayer);
        }
        events.extend(interact(world));
    }
    events
}

fn interact(world: &mut World) -> Vec<Event> {
    let events = submit(
        world,
        Command::Tick {
            dt: Duration::from_millis(16),
        },
    );
    let mut commands = Vec::new();
    Interaction.handle(
        &events,
        &query::player(world),
        &query::resources(world),
        &query::stations(world),
        &query::adversary_view(world),
        &mut commands,
    );

    let mut emitted = Vec::new();
    for command in commands {
        world::apply(world, command, &mut emitted);
    }
    emitted
}

fn spawn_coins(world: &mut World, columns: std::ops::RangeInclusive<u32>) {
    for column in columns {
        let events = submit(
            world,
            Command::SpawnResource {
                cell: CellCoord::new(column, 1),
                kind: ResourceKind::Coin,
            },
        );
        assert_eq!(events.len(), 1);
    }
}

#[test]
fn delivery_clamps_and_keeps_the_surplus() {
    let mut world = corridor_world();

    spawn_coins(&mut world, 2..=4);
    let collected = walk(&mut world, Direction::East, 3);
    assert_eq!(
        collected
            .iter()
            .filter(|event| matches!(event, Event::ResourceCollected { .. }))
            .count(),
        3
    );
    let _ = walk(&mut world, Direction::West, 3);
    assert_eq!(query::stations(&world)[0].progress, 3);
    assert!(query::player(&world).inventory.is_empty());

    spawn_coins(&mut world, 2..=5);
    let _ = walk(&mut world, Direction::East, 4);
    assert_eq!(query::player(&world).inventory, vec![ResourceKind::Coin; 4]);

    let delivered = walk(&mut world, Direction::West, 4);
    assert!(delivered.contains(&Event::ItemsDelivered {
        station: StationId::new(0),
        kind: ResourceKind::Coin,
        count: 2,
    }));
    assert!(delivered.contains(&Event::StationCompleted {
        station: StationId::new(0),
    }));
    assert!(delivered.contains(&Event::GameWon { score: 600 }));

    assert_eq!(query::stations(&world)[0].progress, 5);
    assert_eq!(query::player(&world).inventory, vec![ResourceKind::Coin; 2]);
    assert_eq!(query::phase(&world), GamePhase::Won);

    let stats = query::stats(&world);
    assert_eq!(stats.resources_collected, 7);
    assert_eq!(stats.items_delivered, 5);
    assert_eq!(stats.stations_completed, 1);
    assert!(stats.victory);
}

#[test]
fn inventory_never_exceeds_capacity() {
    let mut config = query::config(&corridor_world()).clone();
    config.inventory_capacity = 2;
    let mut world = World::with_config(config).expect("valid scenario");
    spawn_coins(&mut world, 2..=5);

    let _ = walk(&mut world, Direction::East, 4);
    assert_eq!(query::player(&world).inventory.len(), 2);
    assert_eq!(query::resources(&world).len(), 2);
    assert_eq!(query::stats(&world).resources_collected, 2);
}
