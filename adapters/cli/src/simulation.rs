//! Frame pump wiring the world to its systems.

use std::{mem, time::Duration};

use anyhow::{Context, Result};
use glam::Vec2;
use word_defence_core::{Command, Event, QuizPhase, SessionStats, TowerTarget, WorldPoint};
use word_defence_rendering::{
    BulletPresentation, FrameInput, HudPresentation, MonsterPresentation, QuizPanelPresentation,
    Scene, SceneHit, TileGridPresentation, TilePresentation, TowerPresentation,
};
use word_defence_system_analytics::{answer_accuracy, Analytics};
use word_defence_system_builder::{Builder, BuilderInput};
use word_defence_system_quiz::Quiz;
use word_defence_system_spawning::Spawning;
use word_defence_system_tower_combat::TowerCombat;
use word_defence_system_tower_targeting::TowerTargeting;
use word_defence_world::{self as world, query, World};

/// Fixed step used when no window drives the simulation.
pub(crate) const HEADLESS_STEP: Duration = Duration::from_micros(16_667);

const WRONG_ANSWER_SHAKE: Duration = Duration::from_millis(100);
const WRONG_ANSWER_SHAKE_INTENSITY: f32 = 0.005;

/// Noteworthy outcomes of a single step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct StepReport {
    pub(crate) answer_rejected: bool,
}

/// Owns the world together with every system that reacts to it.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    spawning: Spawning,
    quiz: Quiz,
    analytics: Analytics,
    builder: Builder,
    targeting: TowerTargeting,
    combat: TowerCombat,
    events: Vec<Event>,
    commands: Vec<Command>,
    targets: Vec<TowerTarget>,
    report: StepReport,
}

impl Simulation {
    pub(crate) fn new(world: World, spawning: Spawning, quiz: Quiz) -> Self {
        Self {
            world,
            spawning,
            quiz,
            analytics: Analytics::new(),
            builder: Builder::new(),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            events: Vec::new(),
            commands: Vec::new(),
            targets: Vec::new(),
            report: StepReport::default(),
        }
    }

    pub(crate) fn stats(&self) -> SessionStats {
        self.analytics.stats()
    }

    /// Advances the world by `dt` and applies the player's selection, if any.
    pub(crate) fn step(&mut self, dt: Duration, selection: Option<SceneHit>) -> StepReport {
        self.report = StepReport::default();

        world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);
        self.dispatch();

        self.targeting.handle(
            &query::tower_view(&self.world),
            &query::monster_view(&self.world),
            &mut self.targets,
        );
        self.combat.handle(
            &query::tower_cooldowns(&self.world),
            &self.targets,
            &mut self.commands,
        );
        self.apply_commands();
        self.dispatch();

        match selection {
            Some(SceneHit::Answer(option)) => {
                if query::quiz_phase(&self.world) == QuizPhase::AwaitingAnswer {
                    self.commands.push(Command::AnswerQuestion { option });
                }
            }
            Some(SceneHit::Tile(cell)) => {
                let world = &self.world;
                self.builder.handle(
                    BuilderInput::new(Some(cell)),
                    query::points(world),
                    |cell| query::is_buildable(world, cell),
                    &mut self.commands,
                );
            }
            None => {}
        }
        self.apply_commands();
        self.dispatch();

        self.report
    }

    /// Runs one rendered frame: resolves the click against the scene, steps
    /// the world and refreshes the scene.
    pub(crate) fn advance_frame(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) {
        let selection = input
            .click_world_space
            .and_then(|position| scene.hit_test(position));
        let report = self.step(dt, selection);

        scene.shake.advance(dt);
        if report.answer_rejected {
            scene.shake.trigger(WRONG_ANSWER_SHAKE, WRONG_ANSWER_SHAKE_INTENSITY);
        }
        self.populate_scene(scene);
    }

    /// Builds the static part of the scene from the world's map.
    pub(crate) fn scene(&self) -> Result<Scene> {
        let grid = query::tile_grid(&self.world);
        let tile_grid = TileGridPresentation::new(
            grid.columns(),
            grid.rows(),
            grid.tile_length(),
            to_vec2(grid.origin()),
        )
        .context("invalid tile grid")?;
        let tiles = query::map(&self.world)
            .cells()
            .map(|(cell, is_path)| TilePresentation::new(cell, is_path))
            .collect();

        let mut scene = Scene::new(tile_grid, tiles);
        self.populate_scene(&mut scene);
        Ok(scene)
    }

    /// Copies the dynamic world state into the scene.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        let world = &self.world;
        let full_health = query::config(world).monster_health.get().max(1) as f32;

        scene.towers = query::tower_view(world)
            .iter()
            .map(|tower| TowerPresentation::new(tower.id, to_vec2(tower.position)))
            .collect();
        scene.monsters = query::monster_view(world)
            .iter()
            .map(|monster| {
                let fraction = (monster.health.get() as f32 / full_health).min(1.0);
                MonsterPresentation::new(monster.id, to_vec2(monster.position), fraction)
            })
            .collect();
        scene.bullets = query::bullet_view(world)
            .iter()
            .map(|bullet| BulletPresentation::new(bullet.id, to_vec2(bullet.position)))
            .collect();
        scene.quiz = match query::active_question(world) {
            Some(question) => {
                QuizPanelPresentation::for_question(question.word(), question.options())
            }
            None => QuizPanelPresentation::default(),
        };

        let stats = self.analytics.stats();
        let accuracy = answer_accuracy(&stats)
            .map(|accuracy| format!("  Accuracy: {:.0}%", accuracy * 100.0))
            .unwrap_or_default();
        scene.hud = HudPresentation {
            points: query::points(world).get(),
            stats_line: Some(format!(
                "Defeated: {}  Escaped: {}{accuracy}",
                stats.monsters_defeated, stats.monsters_escaped
            )),
        };
    }

    /// Steps the world at a fixed rate for `duration` without player input.
    pub(crate) fn run_headless(&mut self, duration: Duration) -> SessionStats {
        let mut elapsed = Duration::ZERO;
        while elapsed < duration {
            let _ = self.step(HEADLESS_STEP, None);
            elapsed += HEADLESS_STEP;
        }
        self.analytics.stats()
    }

    fn apply_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    /// Feeds pending events to the reactive systems until the world settles.
    fn dispatch(&mut self) {
        while !self.events.is_empty() {
            let events = mem::take(&mut self.events);
            let _ = self.analytics.handle(&events);
            if events
                .iter()
                .any(|event| matches!(event, Event::AnswerRejected { .. }))
            {
                self.report.answer_rejected = true;
            }

            self.spawning.handle(&events, &mut self.commands);
            self.quiz
                .handle(&events, query::quiz_phase(&self.world), &mut self.commands);
            self.apply_commands();
        }
    }
}

fn to_vec2(point: WorldPoint) -> Vec2 {
    Vec2::new(point.x, point.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use word_defence_core::{CellCoord, Points};
    use word_defence_system_quiz::{WordBank, WordEntry};
    use word_defence_system_spawning::Config as SpawningConfig;
    use word_defence_world::WorldConfig;

    fn bank() -> WordBank {
        WordBank::from_entries(vec![
            WordEntry::new("apple", "사과"),
            WordEntry::new("book", "책"),
            WordEntry::new("river", "강"),
            WordEntry::new("mountain", "산"),
            WordEntry::new("window", "창문"),
        ])
        .expect("valid bank")
    }

    fn simulation() -> Simulation {
        let world = World::new(WorldConfig::default()).expect("default world");
        Simulation::new(
            world,
            Spawning::new(SpawningConfig::default()),
            Quiz::new(bank(), 11),
        )
    }

    fn correct_option(simulation: &Simulation) -> usize {
        query::active_question(&simulation.world)
            .expect("question posed")
            .correct()
    }

    #[test]
    fn first_step_poses_a_question() {
        let mut simulation = simulation();
        assert!(query::active_question(&simulation.world).is_none());

        let _ = simulation.step(Duration::ZERO, None);
        let question = query::active_question(&simulation.world).expect("question posed");
        assert_eq!(question.options().len(), 4);
    }

    #[test]
    fn clicking_grass_builds_a_tower_for_its_cost() {
        let mut simulation = simulation();
        let cell = CellCoord::new(2, 2);

        let _ = simulation.step(Duration::ZERO, Some(SceneHit::Tile(cell)));

        assert!(query::tower_at(&simulation.world, cell).is_some());
        assert_eq!(query::points(&simulation.world), Points::new(420));
        assert_eq!(simulation.analytics.stats().towers_built, 1);
    }

    #[test]
    fn clicking_the_path_builds_nothing() {
        let mut simulation = simulation();
        let _ = simulation.step(Duration::ZERO, Some(SceneHit::Tile(CellCoord::new(0, 1))));

        assert!(query::tower_view(&simulation.world).is_empty());
        assert_eq!(query::points(&simulation.world), Points::new(520));
    }

    #[test]
    fn correct_answer_pays_out_and_moves_on() {
        let mut simulation = simulation();
        let _ = simulation.step(Duration::ZERO, None);
        let answered = query::active_question(&simulation.world)
            .expect("question posed")
            .word()
            .to_owned();

        let option = correct_option(&simulation);
        let report = simulation.step(Duration::ZERO, Some(SceneHit::Answer(option)));

        assert!(!report.answer_rejected);
        assert_eq!(query::points(&simulation.world), Points::new(620));
        let next = query::active_question(&simulation.world).expect("next question posed");
        assert_ne!(next.word(), answered);
    }

    #[test]
    fn wrong_answer_shakes_the_scene() {
        let mut simulation = simulation();
        let mut scene = simulation.scene().expect("scene");
        simulation.advance_frame(Duration::ZERO, FrameInput::default(), &mut scene);

        let wrong = (correct_option(&simulation) + 1) % 4;
        let center = scene
            .quiz
            .buttons
            .iter()
            .find(|button| button.option == wrong)
            .expect("button for option")
            .center;
        simulation.advance_frame(
            Duration::ZERO,
            FrameInput {
                click_world_space: Some(center),
            },
            &mut scene,
        );

        assert!(scene.shake.is_active());
        assert_eq!(query::points(&simulation.world), Points::new(520));
        assert_eq!(simulation.analytics.stats().answers_wrong, 1);
    }

    #[test]
    fn scene_mirrors_the_world() {
        let mut simulation = simulation();
        let _ = simulation.step(Duration::ZERO, Some(SceneHit::Tile(CellCoord::new(2, 2))));
        let scene = simulation.scene().expect("scene");

        assert_eq!(scene.tiles.len(), 160);
        assert_eq!(scene.tiles.iter().filter(|tile| tile.is_path).count(), 19);
        assert_eq!(scene.towers.len(), 1);
        assert_eq!(scene.hud.points_label(), "Point: 420");
        assert_eq!(scene.quiz.buttons.len(), 4);
    }

    #[test]
    fn monsters_spawn_every_three_seconds() {
        let mut simulation = simulation();
        let _ = simulation.run_headless(Duration::from_millis(2_900));
        assert!(query::monster_view(&simulation.world).is_empty());

        let stats = simulation.run_headless(Duration::from_millis(200));
        assert_eq!(stats.monsters_spawned, 1);
    }

    #[test]
    fn a_single_tower_defends_against_the_first_monster() {
        let mut simulation = simulation();
        let _ = simulation.step(Duration::ZERO, Some(SceneHit::Tile(CellCoord::new(2, 2))));

        let stats = simulation.run_headless(Duration::from_secs(14));

        assert!(stats.bullets_fired >= 2);
        assert!(stats.monsters_defeated >= 1);
    }
}
