#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure builder system responsible for turning map clicks into tower placement commands.

use word_defence_core::{CellCoord, Command, Points, TowerKind};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Map cell the player clicked on this frame, if any.
    pub clicked_cell: Option<CellCoord>,
}

impl BuilderInput {
    /// Creates a new input descriptor.
    #[must_use]
    pub const fn new(clicked_cell: Option<CellCoord>) -> Self {
        Self { clicked_cell }
    }
}

/// System that translates clicks on buildable cells into placement commands.
#[derive(Debug, Clone)]
pub struct Builder {
    kind: TowerKind,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Creates a new builder system that places basic towers.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            kind: TowerKind::Basic,
        }
    }

    /// Emits a placement command when the clicked cell is buildable and the
    /// balance covers the tower cost.
    ///
    /// The `is_buildable` closure should mirror the semantics of the world's
    /// `query::is_buildable` helper. The world validates the request again.
    pub fn handle<F>(
        &mut self,
        input: BuilderInput,
        balance: Points,
        mut is_buildable: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(CellCoord) -> bool,
    {
        let Some(cell) = input.clicked_cell else {
            return;
        };

        if balance < self.kind.cost() || !is_buildable(cell) {
            return;
        }

        out.push(Command::PlaceTower {
            kind: self.kind,
            cell,
        });
    }
}
