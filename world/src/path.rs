//! Route followed by monsters, traced from the map's path cells.

use std::collections::BTreeSet;

use thiserror::Error;
use word_defence_core::{CellCoord, TileGrid, WorldPoint};

use crate::map::MapGrid;

/// Polyline that monsters follow from the left edge of the map to the right edge.
#[derive(Clone, Debug, PartialEq)]
pub struct MonsterPath {
    waypoints: Vec<WorldPoint>,
    segment_lengths: Vec<f32>,
    length: f32,
}

impl MonsterPath {
    /// Traces the route through the map's path cells.
    ///
    /// The trace starts at the single path cell in the leftmost column and walks
    /// orthogonal neighbours until none remain unvisited. It must finish in the
    /// rightmost column. Waypoints are placed at every turn, with the ends
    /// extended to the map edges along the entry and exit rows.
    pub fn trace(map: &MapGrid, grid: &TileGrid) -> Result<Self, PathError> {
        let cells = trace_cells(map)?;
        let (Some(&entry), Some(&exit)) = (cells.first(), cells.last()) else {
            return Err(PathError::NoEntry);
        };

        let mut headings = Vec::with_capacity(cells.len() + 1);
        headings.push(Heading::East);
        for pair in cells.windows(2) {
            headings.push(Heading::between(pair[0], pair[1]));
        }
        headings.push(Heading::East);

        let origin = grid.origin();
        let mut waypoints = Vec::with_capacity(cells.len() + 2);
        waypoints.push(WorldPoint::new(origin.x, grid.cell_center(entry).y));
        for (index, cell) in cells.iter().enumerate() {
            if headings[index] != headings[index + 1] {
                waypoints.push(grid.cell_center(*cell));
            }
        }
        waypoints.push(WorldPoint::new(
            origin.x + grid.width(),
            grid.cell_center(exit).y,
        ));

        Self::from_waypoints(waypoints)
    }

    /// Builds a path from explicit waypoints.
    pub fn from_waypoints(waypoints: Vec<WorldPoint>) -> Result<Self, PathError> {
        let segment_lengths: Vec<f32> = waypoints
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .collect();
        let length: f32 = segment_lengths.iter().sum();

        if !length.is_finite() || length <= 0.0 {
            return Err(PathError::TooShort);
        }

        Ok(Self {
            waypoints,
            segment_lengths,
            length,
        })
    }

    /// Corner points of the polyline, including both ends.
    #[must_use]
    pub fn waypoints(&self) -> &[WorldPoint] {
        &self.waypoints
    }

    /// Total length of the polyline in world units.
    #[must_use]
    pub const fn length(&self) -> f32 {
        self.length
    }

    /// Point where monsters enter the map.
    #[must_use]
    pub fn start(&self) -> WorldPoint {
        self.point_at(0.0)
    }

    /// Position after travelling `distance` units along the path, clamped to the ends.
    #[must_use]
    pub fn point_at(&self, distance: f32) -> WorldPoint {
        let mut remaining = distance.clamp(0.0, self.length);

        for (index, segment) in self.segment_lengths.iter().copied().enumerate() {
            let from = self.waypoints[index];
            let to = self.waypoints[index + 1];
            if remaining <= segment && segment > 0.0 {
                let t = remaining / segment;
                return WorldPoint::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
            }
            remaining -= segment;
        }

        self.waypoints.last().copied().unwrap_or_default()
    }
}

/// Errors reported while tracing the monster path through a map.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// No path cell exists in the leftmost column.
    #[error("map has no path cell in its first column")]
    NoEntry,
    /// More than one path cell exists in the leftmost column.
    #[error("map has {count} path cells in its first column, expected one")]
    MultipleEntries {
        /// Number of entry candidates found.
        count: usize,
    },
    /// The path forks, so the route is ambiguous.
    #[error("path branches at column {column}, row {row}", column = .cell.column(), row = .cell.row())]
    Branching {
        /// Cell with more than one unvisited path neighbour.
        cell: CellCoord,
    },
    /// The path stops before reaching the rightmost column.
    #[error("path ends at column {column}, row {row} before reaching the last column", column = .cell.column(), row = .cell.row())]
    DeadEnd {
        /// Last cell of the trace.
        cell: CellCoord,
    },
    /// The resulting polyline has no length.
    #[error("path has zero length")]
    TooShort,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    fn between(from: CellCoord, to: CellCoord) -> Self {
        if to.column() > from.column() {
            Self::East
        } else if to.column() < from.column() {
            Self::West
        } else if to.row() > from.row() {
            Self::South
        } else {
            Self::North
        }
    }
}

fn trace_cells(map: &MapGrid) -> Result<Vec<CellCoord>, PathError> {
    let entries: Vec<CellCoord> = (0..map.rows())
        .map(|row| CellCoord::new(0, row))
        .filter(|cell| map.is_path(*cell))
        .collect();

    let entry = match entries.as_slice() {
        [] => return Err(PathError::NoEntry),
        [entry] => *entry,
        _ => {
            return Err(PathError::MultipleEntries {
                count: entries.len(),
            })
        }
    };

    let mut visited = BTreeSet::new();
    let _ = visited.insert(entry);
    let mut cells = vec![entry];
    let mut current = entry;

    loop {
        let next: Vec<CellCoord> = neighbours(current)
            .into_iter()
            .flatten()
            .filter(|cell| map.is_path(*cell) && !visited.contains(cell))
            .collect();

        match next.as_slice() {
            [] => break,
            [cell] => {
                let _ = visited.insert(*cell);
                cells.push(*cell);
                current = *cell;
            }
            _ => return Err(PathError::Branching { cell: current }),
        }
    }

    if current.column() + 1 != map.columns() {
        return Err(PathError::DeadEnd { cell: current });
    }

    Ok(cells)
}

fn neighbours(cell: CellCoord) -> [Option<CellCoord>; 4] {
    let column = cell.column();
    let row = cell.row();
    [
        row.checked_sub(1).map(|row| CellCoord::new(column, row)),
        Some(CellCoord::new(column + 1, row)),
        Some(CellCoord::new(column, row + 1)),
        column.checked_sub(1).map(|column| CellCoord::new(column, row)),
    ]
}
