#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits bullet firing commands from targeting data.

use word_defence_core::{Command, TowerCooldownView, TowerId, TowerTarget};

/// Tower combat system that queues firing commands for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    ready: Vec<TowerId>,
}

impl TowerCombat {
    /// Creates a new tower combat system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireBullet` entries for targeted towers whose cooldown elapsed.
    pub fn handle(
        &mut self,
        tower_cooldowns: &TowerCooldownView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if tower_targets.is_empty() {
            return;
        }

        self.ready.clear();
        self.ready.extend(
            tower_cooldowns
                .iter()
                .filter(|snapshot| snapshot.ready_in.is_zero())
                .map(|snapshot| snapshot.tower),
        );
        if self.ready.is_empty() {
            return;
        }

        for target in tower_targets {
            if self.ready.binary_search(&target.tower).is_ok() {
                out.push(Command::FireBullet {
                    tower: target.tower,
                    target: target.monster,
                });
            }
        }
    }
}
