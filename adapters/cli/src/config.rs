//! Optional TOML game configuration.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;
use word_defence_core::{Health, Points};
use word_defence_system_spawning::Config as SpawningConfig;
use word_defence_world::{MapError, MapGrid, WorldConfig};

/// Tunables read from the configuration file. Missing keys keep their defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) starting_points: u32,
    pub(crate) answer_reward: u32,
    pub(crate) spawn_interval_ms: u64,
    pub(crate) monster_health: u32,
    pub(crate) monster_traversal_ms: u64,
    pub(crate) bullet_speed: f32,
    pub(crate) bullet_damage: u32,
    pub(crate) seed: Option<u64>,
    /// Rows of `0` (grass) and `1` (path) replacing the default map.
    pub(crate) map: Option<Vec<String>>,
}

impl Default for GameConfig {
    fn default() -> Self {
        let world = WorldConfig::default();
        Self {
            starting_points: world.starting_points.get(),
            answer_reward: world.answer_reward.get(),
            spawn_interval_ms: 3_000,
            monster_health: world.monster_health.get(),
            monster_traversal_ms: duration_millis(world.monster_traversal),
            bullet_speed: world.bullet_speed,
            bullet_damage: world.bullet_damage,
            seed: None,
            map: None,
        }
    }
}

impl GameConfig {
    pub(crate) fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub(crate) fn world_config(&self) -> WorldConfig {
        WorldConfig {
            starting_points: Points::new(self.starting_points),
            answer_reward: Points::new(self.answer_reward),
            monster_health: Health::new(self.monster_health),
            monster_traversal: Duration::from_millis(self.monster_traversal_ms),
            bullet_speed: self.bullet_speed,
            bullet_damage: self.bullet_damage,
            ..WorldConfig::default()
        }
    }

    pub(crate) fn spawning_config(&self) -> SpawningConfig {
        SpawningConfig::new(Duration::from_millis(self.spawn_interval_ms))
    }

    pub(crate) fn map(&self) -> Result<MapGrid, MapError> {
        match &self.map {
            Some(rows) => MapGrid::parse_rows(rows),
            None => Ok(MapGrid::default_layout()),
        }
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
