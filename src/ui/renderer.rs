//! Game view: composes a `WorldState` into a `FrameBuffer`.
//!
//! One tile is two terminal columns by one row, so each column covers half
//! a tile (20 px) of world space. The visible map is `screen.width` by
//! `screen.height` pixels starting at `camera_x`, the same window the
//! simulation uses for its fall-out check.

use crossterm::style::Color;

use super::frame::{Cell, FrameBuffer, BASE_BG};
use crate::domain::tile::{Tile, TILE_SIZE};
use crate::sim::level::LevelGeometry;
use crate::sim::world::{Phase, WorldState};

/// Terminal columns per tile.
pub const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const SOLID_FG: Color = Color::Rgb { r: 120, g: 130, b: 160 };
const SPIKE_FG: Color = Color::Rgb { r: 255, g: 70, b: 70 };
const END_BG: Color = Color::Rgb { r: 30, g: 120, b: 60 };
const PLAYER_FG: Color = Color::Rgb { r: 255, g: 210, b: 40 };

// ── Tile lookup rebuilt from the geometry ──

/// Grid view of a `LevelGeometry`, for drawing only.
pub struct TileMap {
    columns: usize,
    rows: usize,
    tiles: Vec<Tile>,
}

impl TileMap {
    pub fn from_level(level: &LevelGeometry) -> Self {
        let mut map = TileMap {
            columns: level.columns,
            rows: level.rows,
            tiles: vec![Tile::Empty; level.columns * level.rows],
        };
        for r in &level.solids {
            map.put_px(r.x, r.y, Tile::Solid);
        }
        for r in &level.spikes {
            map.put_px(r.x, r.y, Tile::Spike);
        }
        let (sx, sy) = level.start_f32();
        map.put_px(sx, sy, Tile::Start);
        map.put_px(level.end_zone.x, level.end_zone.y, Tile::End);
        map
    }

    fn put_px(&mut self, x: f32, y: f32, tile: Tile) {
        let col = (x / TILE_SIZE as f32) as usize;
        let row = (y / TILE_SIZE as f32) as usize;
        if col < self.columns && row < self.rows {
            self.tiles[row * self.columns + col] = tile;
        }
    }

    /// Empty outside the grid.
    pub fn at_px(&self, x: f32, y: f32) -> Tile {
        if x < 0.0 || y < 0.0 {
            return Tile::Empty;
        }
        let col = (x / TILE_SIZE as f32) as usize;
        let row = (y / TILE_SIZE as f32) as usize;
        if col < self.columns && row < self.rows {
            self.tiles[row * self.columns + col]
        } else {
            Tile::Empty
        }
    }
}

/// Player glyph for a rotation: upright square, or tilted every other 45°.
pub fn player_glyph(rotation_degrees: f32) -> [char; 2] {
    let sector = ((rotation_degrees + 22.5) / 45.0) as usize % 8;
    if sector % 2 == 0 {
        ['█', '█']
    } else {
        ['▞', '▚']
    }
}

fn tile_cell(tile: Tile, left_half: bool) -> Cell {
    match tile {
        Tile::Solid => Cell::new('█', SOLID_FG, BASE_BG),
        Tile::Spike => Cell::new(if left_half { '/' } else { '\\' }, SPIKE_FG, BASE_BG),
        Tile::End => Cell::new('░', Color::White, END_BG),
        Tile::Start => Cell::new(if left_half { '·' } else { ' ' }, Color::DarkGrey, BASE_BG),
        Tile::Empty => Cell::BLANK,
    }
}

// ── GameView ──

pub struct GameView {
    map: TileMap,
    view_cols: usize,
    view_rows: usize,
}

impl GameView {
    pub fn new(world: &WorldState) -> Self {
        let half = (TILE_SIZE as usize / CELL_W) as f32;
        GameView {
            map: TileMap::from_level(&world.level),
            view_cols: (world.camera.screen_width() / half) as usize,
            view_rows: (world.screen_height / TILE_SIZE as f32) as usize,
        }
    }

    pub fn draw(&self, fb: &mut FrameBuffer, world: &WorldState) {
        let view_cols = self.view_cols.min(fb.width());

        self.compose_hud(fb, world);
        self.compose_map(fb, world, view_cols);
        self.compose_player(fb, world, view_cols);

        let center_row = MAP_ROW + self.view_rows / 2;
        match world.phase {
            Phase::Menu => {
                self.banner(fb, center_row - 1, "B L O C K   D A S H", PLAYER_FG, view_cols);
                self.banner(fb, center_row + 1, "Space / Up / W to start", Color::White, view_cols);
            }
            Phase::Dead => {
                let cause = world.death_cause.map(|c| c.describe()).unwrap_or("died");
                let title = format!("You Died ({cause})");
                let hint = format!("Attempt {}  -  Space to retry", world.attempts);
                self.banner(fb, center_row - 1, &title, SPIKE_FG, view_cols);
                self.banner(fb, center_row + 1, &hint, Color::White, view_cols);
            }
            Phase::Win => {
                let hint = format!("Cleared in {} attempt(s)  -  Space to play again", world.attempts);
                self.banner(fb, center_row - 1, "Level Complete!", Color::Rgb { r: 80, g: 255, b: 80 }, view_cols);
                self.banner(fb, center_row + 1, &hint, Color::White, view_cols);
            }
            Phase::Playing => {}
        }

        let help_row = MAP_ROW + self.view_rows + 1;
        fb.put_str(0, help_row, " Space/Up/W: Jump   Esc/Q: Quit", Color::DarkGrey, BASE_BG);
    }

    fn compose_hud(&self, fb: &mut FrameBuffer, world: &WorldState) {
        fb.fill_row(HUD_ROW, HUD_BG);
        let hud = format!(
            " BLOCK DASH   Attempt {:<4}  Progress {:>3}% ",
            world.attempts,
            (world.progress() * 100.0).round() as u32,
        );
        fb.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
    }

    fn compose_map(&self, fb: &mut FrameBuffer, world: &WorldState, view_cols: usize) {
        let half = TILE_SIZE as f32 / CELL_W as f32;
        for vy in 0..self.view_rows {
            let wy = vy as f32 * TILE_SIZE as f32 + half;
            for vx in 0..view_cols {
                let wx = world.camera_x + vx as f32 * half + half * 0.5;
                let tile = self.map.at_px(wx, wy);
                let left_half = (wx / half) as i64 % 2 == 0;
                fb.set(vx, MAP_ROW + vy, tile_cell(tile, left_half));
            }
        }
    }

    fn compose_player(&self, fb: &mut FrameBuffer, world: &WorldState, view_cols: usize) {
        let half = TILE_SIZE as f32 / CELL_W as f32;
        let b = world.body.bounds();
        if b.center_y() < 0.0 {
            return;
        }
        let row = (b.center_y() / TILE_SIZE as f32) as usize;
        if row >= self.view_rows {
            return;
        }
        let col = ((b.left() - world.camera_x) / half).round();
        if col < 0.0 {
            return;
        }
        let col = col as usize;
        let glyph = player_glyph(world.body.rotation_degrees());
        for (i, ch) in glyph.iter().enumerate() {
            if col + i < view_cols {
                let bg = fb.get(col + i, MAP_ROW + row).bg;
                fb.set(col + i, MAP_ROW + row, Cell::new(*ch, PLAYER_FG, bg));
            }
        }
    }

    fn banner(&self, fb: &mut FrameBuffer, row: usize, text: &str, fg: Color, view_cols: usize) {
        let len = text.chars().count() + 4;
        let x = view_cols.saturating_sub(len) / 2;
        let padded = format!("  {text}  ");
        fb.put_str(x, row, &padded, fg, HUD_BG);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::level::parse_level;
    use crate::sim::step::press_jump;

    const LEVEL: &str = "\
..........
.....^...E
S.......##
##########
";

    fn world() -> WorldState {
        WorldState::new(parse_level(LEVEL).unwrap(), &GameConfig::default())
    }

    fn row_text(fb: &FrameBuffer, y: usize) -> String {
        (0..fb.width()).map(|x| fb.get(x, y).ch).collect()
    }

    #[test]
    fn tile_map_mirrors_geometry() {
        let map = TileMap::from_level(&world().level);
        assert_eq!(map.at_px(5.0, 125.0), Tile::Solid);
        assert_eq!(map.at_px(205.0, 45.0), Tile::Spike);
        assert_eq!(map.at_px(365.0, 45.0), Tile::End);
        assert_eq!(map.at_px(5.0, 85.0), Tile::Start);
        assert_eq!(map.at_px(-5.0, 85.0), Tile::Empty);
        assert_eq!(map.at_px(5000.0, 85.0), Tile::Empty);
    }

    #[test]
    fn spin_glyph_alternates_by_sector() {
        assert_eq!(player_glyph(0.0), ['█', '█']);
        assert_eq!(player_glyph(45.0), ['▞', '▚']);
        assert_eq!(player_glyph(90.0), ['█', '█']);
        assert_eq!(player_glyph(350.0), ['█', '█']);
    }

    #[test]
    fn draws_hud_map_and_menu() {
        let w = world();
        let view = GameView::new(&w);
        let mut fb = FrameBuffer::new(60, 16);
        view.draw(&mut fb, &w);

        assert!(row_text(&fb, HUD_ROW).contains("Attempt 1"));
        // Floor on map row 3, two columns per tile.
        assert_eq!(fb.get(0, MAP_ROW + 3).ch, '█');
        assert_eq!(fb.get(19, MAP_ROW + 3).ch, '█');
        // Spike at tile column 5.
        assert_eq!(fb.get(10, MAP_ROW + 1).ch, '/');
        assert_eq!(fb.get(11, MAP_ROW + 1).ch, '\\');
        // Player on the start tile (row 2).
        assert_eq!(fb.get(0, MAP_ROW + 2).fg, PLAYER_FG);

        let all: String = (0..fb.height()).map(|y| row_text(&fb, y)).collect();
        assert!(all.contains("B L O C K   D A S H"));
    }

    #[test]
    fn dead_banner_names_the_cause() {
        let mut w = world();
        press_jump(&mut w);
        w.phase = Phase::Dead;
        w.death_cause = Some(crate::sim::event::DeathCause::Spike);
        let view = GameView::new(&w);
        let mut fb = FrameBuffer::new(60, 16);
        view.draw(&mut fb, &w);
        let all: String = (0..fb.height()).map(|y| row_text(&fb, y)).collect();
        assert!(all.contains("You Died (spiked)"));
        assert!(all.contains("Space to retry"));
    }
}
