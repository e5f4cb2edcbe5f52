//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use word_defence_core::{CellCoord, TowerId, TowerKind, WorldPoint};

/// Snapshot of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Cell occupied by the tower.
    pub(crate) cell: CellCoord,
    /// Centre of the tower in world units.
    pub(crate) position: WorldPoint,
    /// Simulation time at which the tower may fire again.
    pub(crate) ready_at: Duration,
}

impl TowerState {
    pub(crate) fn ready_in(&self, now: Duration) -> Duration {
        self.ready_at.saturating_sub(now)
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Stores a new tower that is ready to fire immediately.
    pub(crate) fn insert(
        &mut self,
        kind: TowerKind,
        cell: CellCoord,
        position: WorldPoint,
    ) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));
        let _ = self.entries.insert(
            id,
            TowerState {
                id,
                kind,
                cell,
                position,
                ready_at: Duration::ZERO,
            },
        );
        id
    }

    pub(crate) fn get_mut(&mut self, tower: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&tower)
    }

    /// Finds the tower standing on the provided cell.
    pub(crate) fn at(&self, cell: CellCoord) -> Option<TowerId> {
        self.entries
            .values()
            .find(|state| state.cell == cell)
            .map(|state| state.id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }
}
