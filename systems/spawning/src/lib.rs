#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-cadence spawning system responsible for emitting monster spawn commands.

use std::time::Duration;

use word_defence_core::{Command, Event};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    spawn_interval: Duration,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence. A zero
    /// interval disables spawning.
    #[must_use]
    pub const fn new(spawn_interval: Duration) -> Self {
        Self { spawn_interval }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

/// Pure system that emits one spawn command per elapsed interval.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Duration,
    accumulator: Duration,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            accumulator: Duration::ZERO,
        }
    }

    /// Consumes events to emit spawn commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        if self.spawn_interval.is_zero() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        for _ in 0..self.resolve_spawn_attempts() {
            out.push(Command::SpawnMonster);
        }
    }

    fn resolve_spawn_attempts(&mut self) -> usize {
        if self.spawn_interval.is_zero() {
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;
            attempts += 1;
        }
        attempts
    }
}
