//! Editable character grid backing the level editor.
//!
//! Reads text through the same `normalize_rows` as the game loader, so
//! what the editor shows is what the game will parse. Saving writes every
//! row followed by `\n`; a file that is already normalized round-trips
//! byte for byte.

use std::io;
use std::path::Path;

use crate::domain::tile::{Tile, EMPTY_CHAR};
use crate::sim::level::{normalize_rows, LevelError};

#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    cells: Vec<Vec<char>>,
    columns: usize,
}

impl TileGrid {
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let cells: Vec<Vec<char>> = normalize_rows(text)
            .into_iter()
            .map(|row| row.chars().collect())
            .collect();
        let columns = cells.first().map_or(0, |r| r.len());
        if cells.is_empty() || columns == 0 {
            return Err(LevelError::Empty);
        }
        Ok(TileGrid { cells, columns })
    }

    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Creates missing parent directories.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_text())?;
        log::info!("saved {}x{} level to {}", self.columns, self.rows(), path.display());
        Ok(())
    }

    pub fn to_text(&self) -> String {
        let lines: Vec<String> = self.cells.iter().map(|r| r.iter().collect()).collect();
        lines.join("\n") + "\n"
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Raw character at (col, row); `None` outside the grid.
    pub fn char_at(&self, col: usize, row: usize) -> Option<char> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Decoded tile; unknown characters read as empty.
    pub fn get(&self, col: usize, row: usize) -> Tile {
        self.char_at(col, row).and_then(Tile::from_char).unwrap_or(Tile::Empty)
    }

    /// First (col, row) holding `tile`, scanning row by row.
    pub fn find(&self, tile: Tile) -> Option<(usize, usize)> {
        let ch = tile.to_char();
        self.cells.iter().enumerate().find_map(|(row, cells)| {
            cells.iter().position(|&c| c == ch).map(|col| (col, row))
        })
    }

    /// Paint one cell. Start and End stay unique: placing one clears the
    /// previous marker. Returns whether the grid changed.
    pub fn place_tile(&mut self, col: usize, row: usize, tile: Tile) -> bool {
        let ch = tile.to_char();
        match self.char_at(col, row) {
            None => return false,
            Some(current) if current == ch => return false,
            Some(_) => {}
        }

        if tile.is_unique_marker() {
            if let Some((ecol, erow)) = self.find(tile) {
                self.cells[erow][ecol] = EMPTY_CHAR;
            }
        }
        self.cells[row][col] = ch;
        true
    }

    /// Insert a Start at column 0 and an End at the last column, both on
    /// the second-to-last row, when either is missing. Returns whether
    /// anything was added.
    ///
    /// An End never overwrites the Start: on a one-column grid it drops to
    /// the bottom row instead, and a 1x1 grid keeps only its Start.
    pub fn ensure_required_markers(&mut self) -> bool {
        let row = self.rows().saturating_sub(2);
        let last_col = self.columns - 1;
        let mut changed = false;
        if self.find(Tile::Start).is_none() {
            self.cells[row][0] = Tile::Start.to_char();
            changed = true;
        }
        if self.find(Tile::End).is_none() {
            let start = Tile::Start.to_char();
            let spot = [(last_col, row), (last_col, self.rows() - 1)]
                .into_iter()
                .find(|&(c, r)| self.cells[r][c] != start);
            match spot {
                Some((c, r)) => {
                    self.cells[r][c] = Tile::End.to_char();
                    changed = true;
                }
                None => log::warn!("grid is too small to hold both a start and an end marker"),
            }
        }
        changed
    }
}
