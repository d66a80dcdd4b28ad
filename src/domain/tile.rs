//! Tile types of the level grid and their text encoding.
//! Properties are queried via methods, not stored as flags,
//! so tile semantics are centralized here.

/// Edge length of one grid tile in world pixels.
/// Shared by the loader, the renderer and the editor.
pub const TILE_SIZE: i32 = 40;

/// Character used to right-pad short rows.
pub const EMPTY_CHAR: char = '.';

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    #[default]
    Empty,
    Solid,  // Ground / platform block
    Spike,  // Instant death on overlap
    Start,  // Spawn marker (exactly one)
    End,    // Win zone (exactly one)
}

impl Tile {
    /// All tiles the editor can paint, in hotkey order (1-5).
    pub const PALETTE: [Tile; 5] = [Tile::Empty, Tile::Solid, Tile::Spike, Tile::Start, Tile::End];

    /// Decode a grid character. Unknown characters yield `None`.
    pub fn from_char(c: char) -> Option<Tile> {
        match c {
            '.' => Some(Tile::Empty),
            '#' => Some(Tile::Solid),
            '^' => Some(Tile::Spike),
            'S' => Some(Tile::Start),
            'E' => Some(Tile::End),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Tile::Empty => EMPTY_CHAR,
            Tile::Solid => '#',
            Tile::Spike => '^',
            Tile::Start => 'S',
            Tile::End => 'E',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tile::Empty => "Empty",
            Tile::Solid => "Solid",
            Tile::Spike => "Spike",
            Tile::Start => "Start",
            Tile::End => "End",
        }
    }

    /// Does the collision resolver treat this tile as ground?
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Solid)
    }

    /// Does overlapping this tile end the attempt?
    pub fn is_hazard(self) -> bool {
        matches!(self, Tile::Spike)
    }

    /// Markers that must appear exactly once per level.
    pub fn is_unique_marker(self) -> bool {
        matches!(self, Tile::Start | Tile::End)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_encoding_is_symmetric() {
        for t in Tile::PALETTE {
            assert_eq!(Tile::from_char(t.to_char()), Some(t));
        }
    }

    #[test]
    fn unknown_char_is_none() {
        assert_eq!(Tile::from_char('x'), None);
        assert_eq!(Tile::from_char(' '), None);
    }

    #[test]
    fn properties() {
        assert!(Tile::Solid.is_solid());
        assert!(!Tile::Spike.is_solid());
        assert!(Tile::Spike.is_hazard());
        assert!(Tile::Start.is_unique_marker());
        assert!(Tile::End.is_unique_marker());
        assert!(!Tile::Empty.is_unique_marker());
    }
}
