//! The world map: a bounded, immutable grid of terrain cells.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    types::Terrain,
};

/// A rectangular grid of [`Terrain`] cells.
///
/// Immutable once constructed. Out-of-bounds queries report [`Terrain::Wall`],
/// so callers never need separate bounds checks when resolving motion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldMap {
    width: usize,
    height: usize,
    cells: Vec<Terrain>,
    starts: Vec<(i32, i32)>,
}

impl WorldMap {
    /// Build a map from rows of terrain. Rows must be non-empty and rectangular,
    /// and at least one cell must be a start cell.
    pub fn from_rows(rows: Vec<Vec<Terrain>>) -> Result<Self> {
        let height = rows.len();
        if height == 0 {
            return Err(Error::EmptyMap);
        }
        let width = rows[0].len();
        if width == 0 {
            return Err(Error::EmptyMap);
        }

        let mut cells = Vec::with_capacity(width * height);
        let mut starts = Vec::new();
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(Error::RaggedMapRow {
                    row: y,
                    got: row.len(),
                    expected: width,
                });
            }
            for (x, terrain) in row.into_iter().enumerate() {
                if terrain == Terrain::Start {
                    starts.push((x as i32, y as i32));
                }
                cells.push(terrain);
            }
        }

        if starts.is_empty() {
            return Err(Error::NoStartCell);
        }

        Ok(Self {
            width,
            height,
            cells,
            starts,
        })
    }

    /// Parse a map from its text form: one row per line, `#` wall, `.` open,
    /// `S` start, `G` goal. Blank lines are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for (y, line) in text.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            let mut row = Vec::with_capacity(line.len());
            for (x, character) in line.trim_end().chars().enumerate() {
                let terrain = match character {
                    '.' => Terrain::Open,
                    '#' => Terrain::Wall,
                    'S' => Terrain::Start,
                    'G' => Terrain::Goal,
                    other => {
                        return Err(Error::InvalidMapCharacter {
                            character: other,
                            row: y,
                            column: x,
                        });
                    }
                };
                row.push(terrain);
            }
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    /// Load a map from its text form on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read map file {}", path.display()),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Terrain at the given position; [`Terrain::Wall`] if out of bounds.
    pub fn terrain(&self, position: (i32, i32)) -> Terrain {
        let (x, y) = position;
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return Terrain::Wall;
        }
        self.cells[y as usize * self.width + x as usize]
    }

    /// Start cells, in row-major order of discovery.
    pub fn start_positions(&self) -> &[(i32, i32)] {
        &self.starts
    }
}
