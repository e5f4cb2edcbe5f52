#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Word Defence.

mod map;
mod path;
mod towers;

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};
use word_defence_core::{
    BulletId, CellCoord, Command, Event, Health, MonsterId, PlacementError, Points, QuizQuestion,
    TileGrid, TowerKind, WorldPoint, BULLET_RADIUS, MONSTER_RADIUS, WELCOME_BANNER,
};

pub use map::{MapError, MapGrid};
pub use path::{MonsterPath, PathError};

use towers::TowerRegistry;

/// Longest stretch of time over which entities move before overlaps are tested.
/// Longer ticks are split so a bullet never skips past a monster.
const MAX_MOTION_STEP: Duration = Duration::from_micros(16_667);

/// Rectangle, anchored at the origin, outside of which bullets are discarded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Horizontal extent in world units.
    pub width: f32,
    /// Vertical extent in world units.
    pub height: f32,
}

impl Bounds {
    fn contains(&self, point: WorldPoint) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x <= self.width && point.y <= self.height
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 750.0,
        }
    }
}

/// Tunable parameters of a play session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    /// Balance the player starts with.
    pub starting_points: Points,
    /// Points credited for each correct answer.
    pub answer_reward: Points,
    /// Hit points of a freshly spawned monster.
    pub monster_health: Health,
    /// Time a monster needs to walk the whole path.
    pub monster_traversal: Duration,
    /// Bullet speed in world units per second.
    pub bullet_speed: f32,
    /// Hit points removed by a single bullet.
    pub bullet_damage: u32,
    /// Area in which bullets stay alive.
    pub bounds: Bounds,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            starting_points: Points::new(520),
            answer_reward: Points::new(100),
            monster_health: Health::new(100),
            monster_traversal: Duration::from_secs(10),
            bullet_speed: 400.0,
            bullet_damage: 50,
            bounds: Bounds::default(),
        }
    }
}

/// Errors reported while constructing a world.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// The map does not describe a usable monster path.
    #[error(transparent)]
    Path(#[from] PathError),
    /// Monsters would need to cover the path in no time at all.
    #[error("monster traversal time must be greater than zero")]
    ZeroTraversal,
    /// The map does not fit inside the world bounds.
    #[error("a {columns}x{rows} map does not fit inside the world bounds")]
    MapTooLarge {
        /// Columns of the rejected map.
        columns: u32,
        /// Rows of the rejected map.
        rows: u32,
    },
}

#[derive(Clone, Debug)]
struct Monster {
    id: MonsterId,
    travelled: f32,
    position: WorldPoint,
    health: Health,
}

#[derive(Clone, Debug)]
struct Bullet {
    id: BulletId,
    position: WorldPoint,
    velocity: WorldPoint,
}

#[derive(Clone, Debug)]
enum QuizState {
    Transitioning,
    AwaitingAnswer(QuizQuestion),
}

/// Represents the authoritative Word Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: WorldConfig,
    tile_grid: TileGrid,
    map: MapGrid,
    path: MonsterPath,
    monster_speed: f32,
    clock: Duration,
    points: Points,
    monsters: Vec<Monster>,
    towers: TowerRegistry,
    bullets: Vec<Bullet>,
    next_monster_id: MonsterId,
    next_bullet_id: BulletId,
    quiz: QuizState,
}

impl World {
    /// Creates a world on the default map.
    pub fn new(config: WorldConfig) -> Result<Self, WorldError> {
        Self::with_map(config, MapGrid::default_layout())
    }

    /// Creates a world on the provided map. The tile grid takes the map's
    /// dimensions and the default tile length and origin.
    pub fn with_map(config: WorldConfig, map: MapGrid) -> Result<Self, WorldError> {
        if config.monster_traversal.is_zero() {
            return Err(WorldError::ZeroTraversal);
        }

        let tile_grid = TileGrid::new(
            map.columns(),
            map.rows(),
            TileGrid::DEFAULT_TILE_LENGTH,
            TileGrid::DEFAULT_ORIGIN,
        );
        let origin = tile_grid.origin();
        if origin.x + tile_grid.width() > config.bounds.width
            || origin.y + tile_grid.height() > config.bounds.height
        {
            return Err(WorldError::MapTooLarge {
                columns: map.columns(),
                rows: map.rows(),
            });
        }
        let path = MonsterPath::trace(&map, &tile_grid)?;
        let monster_speed = path.length() / config.monster_traversal.as_secs_f32();

        Ok(Self {
            banner: WELCOME_BANNER,
            config,
            tile_grid,
            map,
            path,
            monster_speed,
            clock: Duration::ZERO,
            points: config.starting_points,
            monsters: Vec::new(),
            towers: TowerRegistry::new(),
            bullets: Vec::new(),
            next_monster_id: MonsterId::new(0),
            next_bullet_id: BulletId::new(0),
            quiz: QuizState::Transitioning,
        })
    }

    fn placement_error(&self, kind: TowerKind, cell: CellCoord) -> Option<PlacementError> {
        if !self.tile_grid.contains(cell) {
            Some(PlacementError::OutOfBounds)
        } else if self.map.is_path(cell) {
            Some(PlacementError::OnPath)
        } else if self.towers.at(cell).is_some() {
            Some(PlacementError::Occupied)
        } else if self.points.checked_sub(kind.cost()).is_none() {
            Some(PlacementError::InsufficientFunds)
        } else {
            None
        }
    }

    fn advance_monsters(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let step = self.monster_speed * dt.as_secs_f32();
        let path = &self.path;
        self.monsters.retain_mut(|monster| {
            monster.travelled += step;
            if monster.travelled >= path.length() {
                out_events.push(Event::MonsterEscaped {
                    monster: monster.id,
                });
                return false;
            }
            monster.position = path.point_at(monster.travelled);
            true
        });
    }

    fn advance_bullets(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let seconds = dt.as_secs_f32();
        let damage = self.config.bullet_damage;
        let bounds = self.config.bounds;
        let mut remaining = Vec::with_capacity(self.bullets.len());

        for mut bullet in std::mem::take(&mut self.bullets) {
            bullet.position.x += bullet.velocity.x * seconds;
            bullet.position.y += bullet.velocity.y * seconds;

            let hit = self
                .monsters
                .iter()
                .position(|monster| overlaps(bullet.position, monster.position));

            if let Some(index) = hit {
                let monster = &mut self.monsters[index];
                monster.health = monster.health.damaged(damage);
                out_events.push(Event::MonsterDamaged {
                    monster: monster.id,
                    bullet: bullet.id,
                    remaining: monster.health,
                });
                if monster.health.is_depleted() {
                    let defeated = self.monsters.remove(index);
                    out_events.push(Event::MonsterDefeated {
                        monster: defeated.id,
                    });
                }
            } else if !bounds.contains(bullet.position) {
                out_events.push(Event::BulletExpired { bullet: bullet.id });
            } else {
                remaining.push(bullet);
            }
        }

        self.bullets = remaining;
    }
}

fn overlaps(bullet: WorldPoint, monster: WorldPoint) -> bool {
    let reach = BULLET_RADIUS + MONSTER_RADIUS;
    (bullet.x - monster.x).abs() < reach && (bullet.y - monster.y).abs() < reach
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });

            let mut remaining = dt;
            while !remaining.is_zero() {
                let step = remaining.min(MAX_MOTION_STEP);
                remaining -= step;
                world.advance_monsters(step, out_events);
                world.advance_bullets(step, out_events);
            }
        }
        Command::SpawnMonster => {
            let id = world.next_monster_id;
            world.next_monster_id = MonsterId::new(id.get().wrapping_add(1));
            let health = world.config.monster_health;
            world.monsters.push(Monster {
                id,
                travelled: 0.0,
                position: world.path.start(),
                health,
            });
            out_events.push(Event::MonsterSpawned {
                monster: id,
                health,
            });
        }
        Command::PlaceTower { kind, cell } => {
            if let Some(reason) = world.placement_error(kind, cell) {
                debug!(?cell, ?reason, "tower placement rejected");
                out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
                return;
            }

            let cost = kind.cost();
            let Some(balance) = world.points.checked_sub(cost) else {
                return;
            };
            world.points = balance;
            let position = world.tile_grid.cell_center(cell);
            let tower = world.towers.insert(kind, cell, position);
            info!(
                tower = tower.get(),
                column = cell.column(),
                row = cell.row(),
                balance = balance.get(),
                "tower placed"
            );
            out_events.push(Event::TowerPlaced {
                tower,
                kind,
                cell,
                cost,
            });
            out_events.push(Event::PointsChanged { balance });
        }
        Command::FireBullet { tower, target } => {
            let Some(aim) = world
                .monsters
                .iter()
                .find(|monster| monster.id == target)
                .map(|monster| monster.position)
            else {
                debug!(target = target.get(), "fire ignored: target is gone");
                return;
            };

            let now = world.clock;
            let speed = world.config.bullet_speed;
            let Some(state) = world.towers.get_mut(tower) else {
                debug!(tower = tower.get(), "fire ignored: unknown tower");
                return;
            };
            if !state.ready_in(now).is_zero() {
                debug!(tower = tower.get(), "fire ignored: tower cooling down");
                return;
            }

            state.ready_at = now.saturating_add(state.kind.cooldown());
            let origin = state.position;
            let angle = (aim.y - origin.y).atan2(aim.x - origin.x);
            let velocity = WorldPoint::new(angle.cos() * speed, angle.sin() * speed);

            let bullet = world.next_bullet_id;
            world.next_bullet_id = BulletId::new(bullet.get().wrapping_add(1));
            world.bullets.push(Bullet {
                id: bullet,
                position: origin,
                velocity,
            });
            out_events.push(Event::BulletFired {
                bullet,
                tower,
                target,
            });
        }
        Command::PoseQuestion { question } => {
            if matches!(world.quiz, QuizState::AwaitingAnswer(_)) {
                debug!(word = question.word(), "question ignored: one is already active");
                return;
            }
            if !question.is_well_formed() {
                warn!(
                    word = question.word(),
                    options = question.options().len(),
                    correct = question.correct(),
                    "malformed question rejected"
                );
                return;
            }

            info!(word = question.word(), "question posed");
            out_events.push(Event::QuestionPosed {
                word: question.word().to_owned(),
            });
            world.quiz = QuizState::AwaitingAnswer(question);
        }
        Command::AnswerQuestion { option } => {
            let QuizState::AwaitingAnswer(question) = &world.quiz else {
                debug!(option, "answer ignored: no active question");
                return;
            };
            if option >= question.options().len() {
                debug!(option, "answer ignored: option out of range");
                return;
            }

            if option != question.correct() {
                out_events.push(Event::AnswerRejected { option });
                return;
            }

            let word = question.word().to_owned();
            let reward = world.config.answer_reward;
            world.points = world.points.saturating_add(reward);
            world.quiz = QuizState::Transitioning;
            info!(word = %word, balance = world.points.get(), "answer accepted");
            out_events.push(Event::AnswerAccepted {
                option,
                word,
                reward,
            });
            out_events.push(Event::PointsChanged {
                balance: world.points,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{MapGrid, MonsterPath, QuizState, World, WorldConfig};
    use word_defence_core::{
        BulletSnapshot, BulletView, CellCoord, MonsterSnapshot, MonsterView, Points, QuizPhase,
        QuizQuestion, TileGrid, TowerCooldownSnapshot, TowerCooldownView, TowerId, TowerSnapshot,
        TowerView,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Parameters the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &WorldConfig {
        &world.config
    }

    /// Provides read-only access to the world's tile grid definition.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.tile_grid
    }

    /// Provides read-only access to the path flags of every cell.
    #[must_use]
    pub fn map(world: &World) -> &MapGrid {
        &world.map
    }

    /// Route monsters follow.
    #[must_use]
    pub fn path(world: &World) -> &MonsterPath {
        &world.path
    }

    /// Current point balance.
    #[must_use]
    pub fn points(world: &World) -> Points {
        world.points
    }

    /// Simulation time accumulated from ticks.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Captures a read-only view of the monsters on the path.
    #[must_use]
    pub fn monster_view(world: &World) -> MonsterView {
        MonsterView::from_snapshots(
            world
                .monsters
                .iter()
                .map(|monster| MonsterSnapshot {
                    id: monster.id,
                    position: monster.position,
                    health: monster.health,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the towers placed on the map.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| TowerSnapshot {
                    id: tower.id,
                    kind: tower.kind,
                    cell: tower.cell,
                    position: tower.position,
                })
                .collect(),
        )
    }

    /// Reports how long each tower must wait before it may fire again.
    #[must_use]
    pub fn tower_cooldowns(world: &World) -> TowerCooldownView {
        TowerCooldownView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| TowerCooldownSnapshot {
                    tower: tower.id,
                    kind: tower.kind,
                    ready_in: tower.ready_in(world.clock),
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the bullets in flight.
    #[must_use]
    pub fn bullet_view(world: &World) -> BulletView {
        BulletView::from_snapshots(
            world
                .bullets
                .iter()
                .map(|bullet| BulletSnapshot {
                    id: bullet.id,
                    position: bullet.position,
                })
                .collect(),
        )
    }

    /// Current state of the quiz.
    #[must_use]
    pub fn quiz_phase(world: &World) -> QuizPhase {
        match world.quiz {
            QuizState::Transitioning => QuizPhase::Transitioning,
            QuizState::AwaitingAnswer(_) => QuizPhase::AwaitingAnswer,
        }
    }

    /// Question awaiting an answer, if any.
    #[must_use]
    pub fn active_question(world: &World) -> Option<&QuizQuestion> {
        match &world.quiz {
            QuizState::Transitioning => None,
            QuizState::AwaitingAnswer(question) => Some(question),
        }
    }

    /// Reports whether a tower could stand on the cell, ignoring the balance.
    #[must_use]
    pub fn is_buildable(world: &World, cell: CellCoord) -> bool {
        world.tile_grid.contains(cell)
            && !world.map.is_path(cell)
            && world.towers.at(cell).is_none()
    }

    /// Tower standing on the cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerId> {
        world.towers.at(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use word_defence_core::{QuizPhase, TowerId};

    fn world() -> World {
        World::new(WorldConfig::default()).expect("default world")
    }

    fn run(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    fn question() -> QuizQuestion {
        QuizQuestion::new(
            "apple",
            vec![
                "pear".to_owned(),
                "fruit".to_owned(),
                "stone".to_owned(),
                "cloud".to_owned(),
            ],
            1,
        )
    }

    fn place(world: &mut World, column: u32, row: u32) -> Vec<Event> {
        run(
            world,
            Command::PlaceTower {
                kind: TowerKind::Basic,
                cell: CellCoord::new(column, row),
            },
        )
    }

    #[test]
    fn new_world_reports_defaults() {
        let world = world();
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
        assert_eq!(query::points(&world), Points::new(520));
        assert_eq!(query::quiz_phase(&world), QuizPhase::Transitioning);
        assert!(query::active_question(&world).is_none());
        assert!(query::monster_view(&world).is_empty());
        assert!((query::path(&world).length() - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn zero_traversal_is_rejected() {
        let config = WorldConfig {
            monster_traversal: Duration::ZERO,
            ..WorldConfig::default()
        };
        assert_eq!(World::new(config).err(), Some(WorldError::ZeroTraversal));
    }

    #[test]
    fn maps_beyond_the_bounds_are_rejected() {
        let wide = MapGrid::parse_rows(&["0".repeat(17), "1".repeat(17)]).expect("valid map");
        assert_eq!(
            World::with_map(WorldConfig::default(), wide).err(),
            Some(WorldError::MapTooLarge {
                columns: 17,
                rows: 2,
            })
        );

        let mut rows = vec!["0".repeat(16); 10];
        rows[4] = "1".repeat(16);
        let full = MapGrid::parse_rows(&rows).expect("valid map");
        assert!(World::with_map(WorldConfig::default(), full.clone()).is_ok());

        rows.push("0".repeat(16));
        let tall = MapGrid::parse_rows(&rows).expect("valid map");
        assert_eq!(
            World::with_map(WorldConfig::default(), tall).err(),
            Some(WorldError::MapTooLarge {
                columns: 16,
                rows: 11,
            })
        );
    }

    #[test]
    fn untraceable_map_is_rejected() {
        let map = MapGrid::parse_rows(&["000", "000"]).expect("valid map");
        assert_eq!(
            World::with_map(WorldConfig::default(), map).err(),
            Some(WorldError::Path(PathError::NoEntry))
        );
    }

    #[test]
    fn placing_a_tower_deducts_its_cost() {
        let mut world = world();
        let events = place(&mut world, 2, 2);

        assert_eq!(
            events,
            vec![
                Event::TowerPlaced {
                    tower: TowerId::new(0),
                    kind: TowerKind::Basic,
                    cell: CellCoord::new(2, 2),
                    cost: Points::new(100),
                },
                Event::PointsChanged {
                    balance: Points::new(420),
                },
            ]
        );
        assert_eq!(query::points(&world), Points::new(420));
        assert_eq!(query::tower_at(&world, CellCoord::new(2, 2)), Some(TowerId::new(0)));
        assert!(!query::is_buildable(&world, CellCoord::new(2, 2)));

        let tower = query::tower_view(&world).into_vec()[0];
        assert_eq!(tower.position, WorldPoint::new(125.0, 375.0));
    }

    #[test]
    fn placement_rejections_leave_state_untouched() {
        let mut world = world();
        let _ = place(&mut world, 2, 2);

        let cases = [
            (CellCoord::new(16, 0), PlacementError::OutOfBounds),
            (CellCoord::new(0, 1), PlacementError::OnPath),
            (CellCoord::new(2, 2), PlacementError::Occupied),
        ];
        for (cell, reason) in cases {
            let events = run(
                &mut world,
                Command::PlaceTower {
                    kind: TowerKind::Basic,
                    cell,
                },
            );
            assert_eq!(
                events,
                vec![Event::TowerPlacementRejected {
                    kind: TowerKind::Basic,
                    cell,
                    reason,
                }]
            );
        }
        assert_eq!(query::points(&world), Points::new(420));
        assert_eq!(query::tower_view(&world).into_vec().len(), 1);
    }

    #[test]
    fn placement_requires_sufficient_funds() {
        let mut world = world();
        for column in 0..5 {
            let _ = place(&mut world, column, 0);
        }
        assert_eq!(query::points(&world), Points::new(20));

        let events = place(&mut world, 6, 0);
        assert_eq!(
            events,
            vec![Event::TowerPlacementRejected {
                kind: TowerKind::Basic,
                cell: CellCoord::new(6, 0),
                reason: PlacementError::InsufficientFunds,
            }]
        );
        assert_eq!(query::points(&world), Points::new(20));
    }

    #[test]
    fn monsters_follow_the_path_and_escape() {
        let mut world = world();
        let _ = run(&mut world, Command::SpawnMonster);
        assert_eq!(
            query::monster_view(&world).into_vec()[0].position,
            WorldPoint::new(0.0, 325.0)
        );

        let _ = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
        );
        let monster = query::monster_view(&world).into_vec()[0];
        assert!((monster.position.x - 100.0).abs() < 1e-2);
        assert!((monster.position.y - 325.0).abs() < 1e-3);

        let events = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(9_050),
            },
        );
        assert!(events.contains(&Event::MonsterEscaped {
            monster: MonsterId::new(0),
        }));
        assert!(query::monster_view(&world).is_empty());
    }

    #[test]
    fn bullets_damage_then_defeat_monsters() {
        let mut world = world();
        let _ = place(&mut world, 2, 2);
        let _ = run(&mut world, Command::SpawnMonster);
        let _ = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
        );

        let fire = Command::FireBullet {
            tower: TowerId::new(0),
            target: MonsterId::new(0),
        };
        let events = run(&mut world, fire.clone());
        assert_eq!(
            events,
            vec![Event::BulletFired {
                bullet: BulletId::new(0),
                tower: TowerId::new(0),
                target: MonsterId::new(0),
            }]
        );

        let events = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(100),
            },
        );
        assert!(events.contains(&Event::MonsterDamaged {
            monster: MonsterId::new(0),
            bullet: BulletId::new(0),
            remaining: Health::new(50),
        }));
        assert_eq!(query::bullet_view(&world).into_vec().len(), 0);

        let _ = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(700),
            },
        );
        let _ = run(&mut world, fire);
        let mut defeated = false;
        for _ in 0..10 {
            let events = run(
                &mut world,
                Command::Tick {
                    dt: Duration::from_millis(50),
                },
            );
            defeated |= events.contains(&Event::MonsterDefeated {
                monster: MonsterId::new(0),
            });
        }
        assert!(defeated);
        assert!(query::monster_view(&world).is_empty());
    }

    #[test]
    fn long_ticks_still_land_hits() {
        let mut world = world();
        let _ = place(&mut world, 2, 2);
        let _ = run(&mut world, Command::SpawnMonster);
        let _ = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
        );
        let _ = run(
            &mut world,
            Command::FireBullet {
                tower: TowerId::new(0),
                target: MonsterId::new(0),
            },
        );

        let mut log = Vec::new();
        for _ in 0..20 {
            log.extend(run(
                &mut world,
                Command::Tick {
                    dt: Duration::from_millis(250),
                },
            ));
        }

        assert!(log.contains(&Event::MonsterDamaged {
            monster: MonsterId::new(0),
            bullet: BulletId::new(0),
            remaining: Health::new(50),
        }));
        assert!(!log.contains(&Event::BulletExpired {
            bullet: BulletId::new(0),
        }));
    }

    #[test]
    fn long_ticks_report_the_whole_delta_once() {
        let mut world = world();
        let events = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(250),
            },
        );
        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_millis(250),
            }]
        );
        assert_eq!(query::clock(&world), Duration::from_millis(250));
    }

    #[test]
    fn towers_respect_their_cooldown() {
        let mut world = world();
        let _ = place(&mut world, 2, 2);
        let _ = run(&mut world, Command::SpawnMonster);
        let fire = Command::FireBullet {
            tower: TowerId::new(0),
            target: MonsterId::new(0),
        };

        assert_eq!(run(&mut world, fire.clone()).len(), 1);
        assert!(run(&mut world, fire.clone()).is_empty());
        assert_eq!(
            query::tower_cooldowns(&world).into_vec()[0].ready_in,
            Duration::from_millis(800)
        );

        let _ = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(800),
            },
        );
        assert_eq!(
            query::tower_cooldowns(&world).into_vec()[0].ready_in,
            Duration::ZERO
        );
    }

    #[test]
    fn fire_commands_for_missing_entities_are_ignored() {
        let mut world = world();
        let _ = place(&mut world, 2, 2);
        assert!(run(
            &mut world,
            Command::FireBullet {
                tower: TowerId::new(0),
                target: MonsterId::new(3),
            }
        )
        .is_empty());

        let _ = run(&mut world, Command::SpawnMonster);
        assert!(run(
            &mut world,
            Command::FireBullet {
                tower: TowerId::new(7),
                target: MonsterId::new(0),
            }
        )
        .is_empty());
    }

    #[test]
    fn bullets_leaving_the_bounds_expire() {
        let mut world = world();
        let _ = place(&mut world, 2, 2);
        let _ = run(&mut world, Command::SpawnMonster);
        let _ = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
        );
        let _ = run(
            &mut world,
            Command::FireBullet {
                tower: TowerId::new(0),
                target: MonsterId::new(0),
            },
        );

        let events = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(20),
            },
        );
        assert!(events.contains(&Event::MonsterEscaped {
            monster: MonsterId::new(0),
        }));
        assert!(events.contains(&Event::BulletExpired {
            bullet: BulletId::new(0),
        }));
        assert_eq!(query::bullet_view(&world).into_vec().len(), 0);
    }

    #[test]
    fn correct_answer_credits_reward_and_retires_question() {
        let mut world = world();
        let events = run(
            &mut world,
            Command::PoseQuestion {
                question: question(),
            },
        );
        assert_eq!(
            events,
            vec![Event::QuestionPosed {
                word: "apple".to_owned(),
            }]
        );
        assert_eq!(query::quiz_phase(&world), QuizPhase::AwaitingAnswer);

        let events = run(&mut world, Command::AnswerQuestion { option: 1 });
        assert_eq!(
            events,
            vec![
                Event::AnswerAccepted {
                    option: 1,
                    word: "apple".to_owned(),
                    reward: Points::new(100),
                },
                Event::PointsChanged {
                    balance: Points::new(620),
                },
            ]
        );
        assert_eq!(query::quiz_phase(&world), QuizPhase::Transitioning);
    }

    #[test]
    fn wrong_answer_keeps_question_active() {
        let mut world = world();
        let _ = run(
            &mut world,
            Command::PoseQuestion {
                question: question(),
            },
        );

        let events = run(&mut world, Command::AnswerQuestion { option: 3 });
        assert_eq!(events, vec![Event::AnswerRejected { option: 3 }]);
        assert_eq!(query::points(&world), Points::new(520));
        assert_eq!(query::active_question(&world), Some(&question()));

        assert!(run(&mut world, Command::AnswerQuestion { option: 4 }).is_empty());
    }

    #[test]
    fn quiz_ignores_out_of_phase_commands() {
        let mut world = world();
        assert!(run(&mut world, Command::AnswerQuestion { option: 0 }).is_empty());

        let malformed = QuizQuestion::new("apple", Vec::new(), 0);
        assert!(run(&mut world, Command::PoseQuestion { question: malformed }).is_empty());
        assert_eq!(query::quiz_phase(&world), QuizPhase::Transitioning);

        let _ = run(
            &mut world,
            Command::PoseQuestion {
                question: question(),
            },
        );
        let other = QuizQuestion::new("stone", vec!["rock".to_owned()], 0);
        assert!(run(&mut world, Command::PoseQuestion { question: other }).is_empty());
        assert_eq!(
            query::active_question(&world).map(QuizQuestion::word),
            Some("apple")
        );
    }
}
