use std::time::Duration;

use community_maze_core::{
    AdversaryId, Archetype, CellCoord, Difficulty, Direction, Event, GamePhase, PlayMode,
};
use community_maze_rendering::{FrameInput, CLONE_ALPHA, HIDDEN_ALPHA};
use community_maze_system_session::{Session, SpawnConfig};
use community_maze_world::{query, AdversarySpawn, Maze, WorldConfig};
use glam::Vec2;
use proptest::prelude::*;

const FRAME: Duration = Duration::from_millis(16);

fn scenario(layout: &str, adversaries: Vec<AdversarySpawn>) -> WorldConfig {
    WorldConfig {
        maze: Maze::parse(layout).expect("valid maze"),
        player_spawn: CellCoord::new(1, 1),
        adversaries,
        stations: Vec::new(),
        ..WorldConfig::default()
    }
}

fn session(config: WorldConfig, seed: u64) -> Session {
    Session::new(config, SpawnConfig::default(), seed).expect("valid session")
}

fn default_session(seed: u64) -> Session {
    session(WorldConfig::default(), seed)
}

fn click_on(cell: CellCoord) -> FrameInput {
    FrameInput {
        click: Some(Vec2::new(
            cell.column() as f32 * 30.0 + 15.0,
            cell.row() as f32 * 30.0 + 15.0,
        )),
        ..FrameInput::default()
    }
}

#[test]
fn start_primes_adversaries_and_seeds_resources() {
    let mut session = default_session(3);
    let events = session.start(Difficulty::Hard);

    assert!(matches!(
        events.first(),
        Some(Event::GameStarted {
            difficulty: Difficulty::Hard
        })
    ));
    let spawned = events
        .iter()
        .filter(|event| matches!(event, Event::ResourceSpawned { .. }))
        .count();
    assert_eq!(spawned, 24);

    let scene = session.scene();
    assert_eq!(scene.resources.len(), 24);
    assert_eq!(scene.adversaries.len(), 4);
    assert_eq!(scene.stations.len(), 4);
    assert_eq!(scene.difficulty, Difficulty::Hard);
    assert!(query::adversary_view(session.world())
        .iter()
        .all(|adversary| adversary.heading.is_some() && adversary.tuning.speed() == 5));
}

#[test]
fn pointer_click_walks_the_player_to_the_target() {
    let mut session = session(scenario("#####\n#...#\n#.#.#\n#...#\n#####", Vec::new()), 1);
    let _ = session.start(Difficulty::Normal);

    let events = session.apply_input(&click_on(CellCoord::new(3, 3)));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::PathInstalled { target, .. } if *target == CellCoord::new(3, 3)
    )));

    for _ in 0..60 {
        let _ = session.step(FRAME);
    }

    let scene = session.scene();
    assert_eq!(scene.player.cell, CellCoord::new(3, 3));
    assert_eq!(scene.player.position, Vec2::new(90.0, 90.0));
}

#[test]
fn clicks_outside_the_maze_are_ignored() {
    let mut session = default_session(1);
    let _ = session.start(Difficulty::Normal);

    let events = session.apply_input(&FrameInput {
        click: Some(Vec2::new(-5.0, 40.0)),
        ..FrameInput::default()
    });
    assert!(events.is_empty());

    let events = session.apply_input(&click_on(CellCoord::new(0, 0)));
    assert_eq!(
        events,
        vec![Event::PathRejected {
            target: CellCoord::new(0, 0)
        }]
    );
}

#[test]
fn pausing_freezes_the_whole_scene() {
    let mut session = default_session(8);
    let _ = session.start(Difficulty::Normal);
    for _ in 0..30 {
        let _ = session.step(FRAME);
    }

    let events = session.toggle_pause();
    assert_eq!(
        events,
        vec![Event::PlayModeChanged {
            mode: PlayMode::Paused
        }]
    );
    let frozen = session.scene();
    for _ in 0..30 {
        assert!(session.step(FRAME).is_empty());
    }
    assert_eq!(session.scene(), frozen);

    let _ = session.toggle_pause();
    assert!(session
        .step(FRAME)
        .iter()
        .any(|event| matches!(event, Event::TimeAdvanced { .. })));
}

#[test]
fn visible_adversary_ends_the_round() {
    let mut session = session(
        scenario(
            "#######\n#.....#\n#######",
            vec![AdversarySpawn {
                archetype: Archetype::Unemployment,
                cell: CellCoord::new(5, 1),
            }],
        ),
        21,
    );
    let _ = session.start(Difficulty::Hard);

    let mut caught = None;
    for _ in 0..200 {
        caught = session.step(FRAME).into_iter().find_map(|event| match event {
            Event::PlayerCaught { archetype, .. } => Some(archetype),
            _ => None,
        });
        if caught.is_some() {
            break;
        }
    }

    assert_eq!(caught, Some(Archetype::Unemployment));
    assert_eq!(
        session.scene().phase,
        GamePhase::Caught {
            adversary: AdversaryId::new(0),
            archetype: Archetype::Unemployment,
        }
    );

    let elapsed = session.scene().stats.elapsed;
    assert!(session.step(FRAME).is_empty());
    assert_eq!(session.scene().stats.elapsed, elapsed);
    assert!(session.scene().is_over());
}

#[test]
fn invisible_adversary_is_drawn_translucent() {
    let mut session = session(
        scenario(
            "#######\n#.#...#\n#######",
            vec![AdversarySpawn {
                archetype: Archetype::LackOfAccess,
                cell: CellCoord::new(4, 1),
            }],
        ),
        5,
    );
    let _ = session.start(Difficulty::Normal);
    assert_eq!(session.scene().adversaries[0].alpha(), 1.0);

    let mut vanished = false;
    for _ in 0..500 {
        let events = session.step(FRAME);
        if events
            .iter()
            .any(|event| matches!(event, Event::VisibilityChanged { visible: false, .. }))
        {
            vanished = true;
            break;
        }
    }

    assert!(vanished);
    let adversary = session.scene().adversaries[0];
    assert!(!adversary.visible);
    assert_eq!(adversary.alpha(), HIDDEN_ALPHA);
}

#[test]
fn duplicate_is_drawn_as_a_clone() {
    let mut session = session(
        scenario(
            "########\n#.#....#\n########",
            vec![AdversarySpawn {
                archetype: Archetype::EconomicCrisis,
                cell: CellCoord::new(4, 1),
            }],
        ),
        13,
    );
    let _ = session.start(Difficulty::Normal);

    let mut split = false;
    for _ in 0..800 {
        let events = session.step(FRAME);
        if events.iter().any(|event| {
            matches!(
                event,
                Event::AdversarySpawned {
                    clone_of: Some(_),
                    ..
                }
            )
        }) {
            split = true;
            break;
        }
    }

    assert!(split);
    let scene = session.scene();
    assert_eq!(scene.adversaries.len(), 2);
    let clone = scene.adversaries[1];
    assert!(clone.is_clone);
    assert_eq!(clone.id, AdversaryId::new(1));
    assert_eq!(clone.alpha(), CLONE_ALPHA);
    assert_eq!(scene.adversaries[0].alpha(), 1.0);
}

#[test]
fn restart_resets_the_round() {
    let mut session = default_session(4);
    let _ = session.start(Difficulty::Easy);
    let _ = session.set_directional_intent(Some(Direction::East));
    for _ in 0..300 {
        let _ = session.step(FRAME);
    }

    let _ = session.start(Difficulty::Normal);
    let scene = session.scene();
    assert_eq!(scene.player.cell, CellCoord::new(1, 1));
    assert!(scene.player.inventory.is_empty());
    assert_eq!(scene.stats, Default::default());
    assert_eq!(scene.phase, GamePhase::Running);
    assert_eq!(scene.resources.len(), 24);
    let ids: Vec<u32> = scene
        .adversaries
        .iter()
        .map(|adversary| adversary.id.get())
        .collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);
    assert!(scene.stations.iter().all(|station| station.progress == 0));
}

fn scripted_run(seed: u64) -> (Vec<Event>, community_maze_rendering::Scene) {
    let targets = [
        CellCoord::new(15, 1),
        CellCoord::new(30, 7),
        CellCoord::new(15, 13),
        CellCoord::new(1, 7),
    ];
    let mut session = default_session(seed);
    let mut log = session.start(Difficulty::Normal);
    for frame in 0..900usize {
        let input = if frame % 150 == 0 {
            click_on(targets[(frame / 150) % targets.len()])
        } else if frame % 97 == 0 {
            FrameInput {
                direction: Some(Direction::South),
                discard: true,
                ..FrameInput::default()
            }
        } else {
            FrameInput::default()
        };
        log.extend(session.apply_input(&input));
        log.extend(session.step(FRAME));
    }
    (log, session.scene())
}

#[test]
fn seeded_sessions_replay_identically() {
    let (first_log, first_scene) = scripted_run(77);
    let (second_log, second_scene) = scripted_run(77);
    assert_eq!(first_log, second_log);
    assert_eq!(first_scene, second_scene);
}

fn direction_from(index: u8) -> Direction {
    match index % 4 {
        0 => Direction::North,
        1 => Direction::East,
        2 => Direction::South,
        _ => Direction::West,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn player_stays_on_grid_lines(
        seed in any::<u64>(),
        script in prop::collection::vec((0u8..6, any::<u8>(), any::<u8>()), 1..300),
    ) {
        let mut session = default_session(seed);
        let _ = session.start(Difficulty::Easy);
        let cell_length = query::geometry(session.world()).cell_length();

        for (action, first, second) in script {
            match action {
                0 => {
                    let _ = session.set_directional_intent(Some(direction_from(first)));
                }
                1 => {
                    let cell = CellCoord::new(u32::from(first % 32), u32::from(second % 15));
                    let _ = session.set_target_cell(cell);
                }
                2 => {
                    let _ = session.discard_item();
                }
                _ => {}
            }
            let _ = session.step(FRAME);

            let player = query::player(session.world());
            prop_assert!(!query::maze(session.world()).is_wall(player.cell));
            prop_assert!(
                player.position.x() % cell_length == 0 || player.position.y() % cell_length == 0
            );
            prop_assert!(player.inventory.len() <= player.capacity);
        }
    }
}
