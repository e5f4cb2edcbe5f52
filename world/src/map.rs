//! Static lookup table describing which cells belong to the monster path.

use thiserror::Error;
use word_defence_core::CellCoord;

const DEFAULT_COLUMNS: usize = 16;
const DEFAULT_ROWS: usize = 10;

/// `1` marks a path cell, `0` a cell that may host a tower.
const DEFAULT_LAYOUT: [[u8; DEFAULT_COLUMNS]; DEFAULT_ROWS] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
];

/// Immutable grid of path flags, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapGrid {
    columns: u32,
    rows: u32,
    path: Vec<bool>,
}

impl MapGrid {
    /// Builds the map every session starts with.
    #[must_use]
    pub fn default_layout() -> Self {
        let path = DEFAULT_LAYOUT
            .iter()
            .flat_map(|row| row.iter().map(|flag| *flag == 1))
            .collect();

        Self {
            columns: DEFAULT_COLUMNS as u32,
            rows: DEFAULT_ROWS as u32,
            path,
        }
    }

    /// Parses a map from rows of `0` (buildable) and `1` (path) characters.
    ///
    /// Whitespace inside a row is ignored so rows may be grouped for legibility.
    pub fn parse_rows<S>(rows: &[S]) -> Result<Self, MapError>
    where
        S: AsRef<str>,
    {
        let mut expected: Option<usize> = None;
        let mut path = Vec::new();

        for (row_index, row) in rows.iter().enumerate() {
            let mut found = 0;
            for character in row.as_ref().chars().filter(|c| !c.is_whitespace()) {
                match character {
                    '0' => path.push(false),
                    '1' => path.push(true),
                    other => {
                        return Err(MapError::InvalidCell {
                            row: row_index,
                            column: found,
                            character: other,
                        })
                    }
                }
                found += 1;
            }

            match expected {
                None => expected = Some(found),
                Some(columns) if columns != found => {
                    return Err(MapError::RaggedRow {
                        row: row_index,
                        expected: columns,
                        found,
                    })
                }
                Some(_) => {}
            }
        }

        let columns = expected.unwrap_or(0);
        if columns == 0 || rows.is_empty() {
            return Err(MapError::Empty);
        }

        Ok(Self {
            columns: u32::try_from(columns).map_err(|_| MapError::TooLarge)?,
            rows: u32::try_from(rows.len()).map_err(|_| MapError::TooLarge)?,
            path,
        })
    }

    /// Number of columns in the map.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the map.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies inside the map.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Reports whether the cell belongs to the monster path. Cells outside the
    /// map are never path cells.
    #[must_use]
    pub fn is_path(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.path.get(index).copied())
            .unwrap_or(false)
    }

    /// Iterates over every cell of the map together with its path flag, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, bool)> + '_ {
        let columns = self.columns.max(1);
        self.path.iter().enumerate().map(move |(index, is_path)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *is_path)
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

/// Errors reported while parsing a map description.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// The description contained no cells.
    #[error("map must contain at least one row and one column")]
    Empty,
    /// A row length differs from the first row.
    #[error("map row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A character other than `0` or `1` was found.
    #[error("unexpected map character {character:?} at row {row}, column {column}")]
    InvalidCell {
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        column: usize,
        /// Character that could not be interpreted.
        character: char,
    },
    /// The description has more rows or columns than a cell coordinate can address.
    #[error("map dimensions exceed the addressable range")]
    TooLarge,
}
