//! Level loader: character grid → immutable `LevelGeometry`.
//!
//! ## Text format
//!   One line per row. Short rows are right-padded with `.` to the
//!   longest row. Blank lines are skipped wherever they appear and `\r`
//!   is stripped.
//!
//! ## Tile legend
//!   '.' = Empty     '#' = Solid
//!   '^' = Spike     'S' = Start (exactly one)
//!   'E' = End zone (exactly one)
//!
//! Any other character is treated as empty. The level editor reads and
//! writes the same grid, so the text is the contract, not the structs.

use std::fmt;
use std::path::Path;

use crate::domain::geom::Rect;
use crate::domain::tile::{Tile, EMPTY_CHAR, TILE_SIZE};

/// Static level geometry. Never mutated after load.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelGeometry {
    pub solids: Vec<Rect>,
    pub spikes: Vec<Rect>,
    pub end_zone: Rect,
    /// Top-left pixel of the `S` tile.
    pub start: (i32, i32),
    pub width_px: i32,
    pub height_px: i32,
    pub columns: usize,
    pub rows: usize,
}

impl LevelGeometry {
    pub fn start_f32(&self) -> (f32, f32) {
        (self.start.0 as f32, self.start.1 as f32)
    }

    /// First spike overlapping `body`, if any.
    pub fn spike_hit(&self, body: &Rect) -> Option<&Rect> {
        self.spikes.iter().find(|s| s.intersects(body))
    }

    pub fn reached_end(&self, body: &Rect) -> bool {
        self.end_zone.intersects(body)
    }
}

// ══════════════════════════════════════════════════════════════
// Errors
// ══════════════════════════════════════════════════════════════

#[derive(Debug)]
pub enum LevelError {
    Io { path: String, source: std::io::Error },
    Empty,
    MissingStart,
    MissingEnd,
    /// (col, row) of the second marker found.
    DuplicateStart { col: usize, row: usize },
    DuplicateEnd { col: usize, row: usize },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Io { path, source } => write!(f, "could not read level {path}: {source}"),
            LevelError::Empty => write!(f, "level is empty"),
            LevelError::MissingStart => write!(f, "level is missing 'S' start marker"),
            LevelError::MissingEnd => write!(f, "level is missing 'E' end marker"),
            LevelError::DuplicateStart { col, row } => {
                write!(f, "level has a second 'S' start marker at column {col}, row {row}")
            }
            LevelError::DuplicateEnd { col, row } => {
                write!(f, "level has a second 'E' end marker at column {col}, row {row}")
            }
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Read and parse a level file.
pub fn load_level(path: &Path) -> Result<LevelGeometry, LevelError> {
    let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let level = parse_level(&text)?;
    log::info!(
        "loaded level {}: {}x{} tiles, {} solids, {} spikes",
        path.display(),
        level.columns,
        level.rows,
        level.solids.len(),
        level.spikes.len(),
    );
    Ok(level)
}

/// Parse level text into geometry.
pub fn parse_level(text: &str) -> Result<LevelGeometry, LevelError> {
    let rows = normalize_rows(text);
    if rows.is_empty() {
        return Err(LevelError::Empty);
    }
    let columns = rows[0].chars().count();

    let mut solids = vec![];
    let mut spikes = vec![];
    let mut start: Option<(i32, i32)> = None;
    let mut end_zone: Option<Rect> = None;
    let mut unknown = 0usize;

    for (row, line) in rows.iter().enumerate() {
        for (col, ch) in line.chars().enumerate() {
            let tile = match Tile::from_char(ch) {
                Some(t) => t,
                None => {
                    unknown += 1;
                    Tile::Empty
                }
            };
            let rect = Rect::tile(col, row, TILE_SIZE);
            match tile {
                t if t.is_solid() => solids.push(rect),
                t if t.is_hazard() => spikes.push(rect),
                Tile::Start => {
                    if start.is_some() {
                        return Err(LevelError::DuplicateStart { col, row });
                    }
                    start = Some((col as i32 * TILE_SIZE, row as i32 * TILE_SIZE));
                }
                Tile::End => {
                    if end_zone.is_some() {
                        return Err(LevelError::DuplicateEnd { col, row });
                    }
                    end_zone = Some(rect);
                }
                _ => {}
            }
        }
    }

    if unknown > 0 {
        log::warn!("level contains {unknown} unknown tile characters; treated as empty");
    }

    let start = start.ok_or(LevelError::MissingStart)?;
    let end_zone = end_zone.ok_or(LevelError::MissingEnd)?;

    Ok(LevelGeometry {
        solids,
        spikes,
        end_zone,
        start,
        width_px: columns as i32 * TILE_SIZE,
        height_px: rows.len() as i32 * TILE_SIZE,
        columns,
        rows: rows.len(),
    })
}

/// Split into rows, drop blank lines, pad to the widest row.
/// Shared with the level editor so both read the grid identically.
pub fn normalize_rows(text: &str) -> Vec<String> {
    let mut rows: Vec<String> = text
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect();

    let max_width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    for row in &mut rows {
        let len = row.chars().count();
        if len < max_width {
            row.extend(std::iter::repeat(EMPTY_CHAR).take(max_width - len));
        }
    }

    rows
}
