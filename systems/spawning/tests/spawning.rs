use std::time::Duration;

use word_defence_core::{Command, Event, MonsterId};
use word_defence_system_spawning::{Config, Spawning};
use word_defence_world::{self as world, query, World, WorldConfig};

#[test]
fn emits_multiple_spawn_commands_for_large_dt() {
    let mut spawning = Spawning::new(Config::new(Duration::from_millis(500)));
    let mut commands = Vec::new();
    spawning.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_secs(2),
        }],
        &mut commands,
    );

    assert_eq!(commands, vec![Command::SpawnMonster; 4]);
}

#[test]
fn waits_for_a_full_interval() {
    let mut spawning = Spawning::new(Config::default());
    let mut commands = Vec::new();

    for _ in 0..2 {
        spawning.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(1_499),
            }],
            &mut commands,
        );
    }
    assert!(commands.is_empty(), "no spawn before full interval");

    spawning.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_millis(2),
        }],
        &mut commands,
    );
    assert_eq!(commands.len(), 1, "expected spawn after full interval");
}

#[test]
fn ignores_unrelated_events() {
    let mut spawning = Spawning::new(Config::new(Duration::from_millis(10)));
    let mut commands = Vec::new();
    spawning.handle(
        &[
            Event::MonsterEscaped {
                monster: MonsterId::new(0),
            },
            Event::QuestionPosed {
                word: "apple".to_owned(),
            },
        ],
        &mut commands,
    );
    assert!(commands.is_empty());
}

#[test]
fn zero_interval_disables_spawning() {
    let mut spawning = Spawning::new(Config::new(Duration::ZERO));
    let mut commands = Vec::new();
    spawning.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_secs(60),
        }],
        &mut commands,
    );
    assert!(commands.is_empty());
}

#[test]
fn replay_spawns_one_monster_every_three_seconds() {
    let mut world = World::new(WorldConfig::default()).expect("default world");
    let mut spawning = Spawning::new(Config::default());
    let mut spawned = Vec::new();

    for _ in 0..600 {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );

        let mut commands = Vec::new();
        spawning.handle(&events, &mut commands);
        for command in commands {
            let mut generated = Vec::new();
            world::apply(&mut world, command, &mut generated);
            for event in generated {
                if let Event::MonsterSpawned { monster, .. } = event {
                    spawned.push(monster);
                }
            }
        }
    }

    assert_eq!(query::clock(&world), Duration::from_millis(9_600));
    assert_eq!(
        spawned,
        vec![MonsterId::new(0), MonsterId::new(1), MonsterId::new(2)]
    );
    assert_eq!(query::monster_view(&world).into_vec().len(), 3);
}
