#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use word_defence_core::{MonsterId, MonsterView, TowerTarget, TowerView, WorldPoint};

/// Tower targeting system that reuses a scratch buffer to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    monster_workspace: Vec<MonsterCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// Each tower engages the first monster, in spawn order, that lies strictly
    /// inside its range. The output buffer is cleared before populating it with
    /// the latest assignments.
    pub fn handle(
        &mut self,
        towers: &TowerView,
        monsters: &MonsterView,
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();

        if towers.is_empty() || monsters.is_empty() {
            return;
        }

        self.prepare_monster_workspace(monsters);

        for tower in towers.iter() {
            let range = tower.kind.range();
            let candidate = self
                .monster_workspace
                .iter()
                .find(|candidate| tower.position.distance(candidate.position) < range);

            if let Some(candidate) = candidate {
                out.push(TowerTarget {
                    tower: tower.id,
                    monster: candidate.id,
                });
            }
        }
    }

    fn prepare_monster_workspace(&mut self, monsters: &MonsterView) {
        self.monster_workspace.clear();
        self.monster_workspace
            .extend(monsters.iter().map(|snapshot| MonsterCandidate {
                id: snapshot.id,
                position: snapshot.position,
            }));
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct MonsterCandidate {
    id: MonsterId,
    position: WorldPoint,
}
