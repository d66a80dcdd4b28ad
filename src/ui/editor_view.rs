//! Terminal front end of the level editor: key bindings and drawing.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::Color;

use super::frame::{Cell, FrameBuffer, BASE_BG};
use super::renderer::CELL_W;
use crate::domain::tile::Tile;
use crate::editor::{Action, EditorState};

const STATUS_ROW: usize = 0;
const MESSAGE_ROW: usize = 1;
const GRID_ROW: usize = 3;
/// Rows below the grid reserved for the key help.
const FOOTER_ROWS: usize = 2;

const BAR_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const CURSOR_BG: Color = Color::Rgb { r: 250, g: 204, b: 21 };

/// Map a key press to an editor action.
pub fn action_for_key(key: &KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('s') | KeyCode::Char('S') if ctrl => Some(Action::Save),
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        _ if ctrl => None,
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Some(Action::Move { dx: -1, dy: 0 }),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Some(Action::Move { dx: 1, dy: 0 }),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Some(Action::Move { dx: 0, dy: -1 }),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Some(Action::Move { dx: 0, dy: 1 }),
        KeyCode::PageUp => Some(Action::Move { dx: -10, dy: 0 }),
        KeyCode::PageDown => Some(Action::Move { dx: 10, dy: 0 }),
        KeyCode::Char(c @ '1'..='5') => {
            let idx = c as usize - '1' as usize;
            Some(Action::Select(Tile::PALETTE[idx]))
        }
        KeyCode::Char(' ') | KeyCode::Enter => Some(Action::Paint),
        KeyCode::Char('x') | KeyCode::Backspace | KeyCode::Delete => Some(Action::Erase),
        KeyCode::Char('r') => Some(Action::Reload),
        _ => None,
    }
}

/// Grid cells that fit in a frame of this size.
pub fn viewport(fb_width: usize, fb_height: usize) -> (usize, usize) {
    (
        (fb_width / CELL_W).max(1),
        fb_height.saturating_sub(GRID_ROW + FOOTER_ROWS).max(1),
    )
}

fn tile_cell(tile: Tile) -> Cell {
    match tile {
        Tile::Empty => Cell::new('·', Color::Rgb { r: 71, g: 85, b: 105 }, BASE_BG),
        Tile::Solid => Cell::new('█', Color::Rgb { r: 120, g: 130, b: 160 }, BASE_BG),
        Tile::Spike => Cell::new('^', Color::Rgb { r: 255, g: 70, b: 70 }, BASE_BG),
        Tile::Start => Cell::new('S', Color::White, Color::Rgb { r: 59, g: 130, b: 246 }),
        Tile::End => Cell::new('E', Color::White, Color::Rgb { r: 30, g: 120, b: 60 }),
    }
}

pub fn draw(fb: &mut FrameBuffer, ed: &EditorState) {
    let (view_cols, view_rows) = viewport(fb.width(), fb.height());

    // ── Status line ──
    fb.fill_row(STATUS_ROW, BAR_BG);
    let status = format!(
        " {}{} | Tile {} ({}) | {},{} | {}x{}",
        ed.file_name(),
        if ed.dirty { "*" } else { "" },
        ed.selected.to_char(),
        ed.selected.label(),
        ed.cursor.0,
        ed.cursor.1,
        ed.grid.columns(),
        ed.grid.rows(),
    );
    fb.put_str(0, STATUS_ROW, &status, Color::White, BAR_BG);

    if let Some(msg) = ed.status() {
        fb.put_str(1, MESSAGE_ROW, msg, Color::Rgb { r: 134, g: 239, b: 172 }, BASE_BG);
    }

    // ── Grid ──
    for vy in 0..view_rows {
        let row = ed.scroll.1 + vy;
        if row >= ed.grid.rows() {
            break;
        }
        for vx in 0..view_cols {
            let col = ed.scroll.0 + vx;
            if col >= ed.grid.columns() {
                break;
            }
            let mut cell = tile_cell(ed.grid.get(col, row));
            if (col, row) == ed.cursor {
                cell = Cell::new(cell.ch, Color::Black, CURSOR_BG);
            }
            let x = vx * CELL_W;
            fb.set(x, GRID_ROW + vy, cell);
            fb.set(x + 1, GRID_ROW + vy, Cell::new(' ', cell.fg, cell.bg));
        }
    }

    // ── Help ──
    let help_row = fb.height().saturating_sub(FOOTER_ROWS);
    fb.put_str(
        0,
        help_row,
        " 1 empty 2 solid 3 spike 4 start 5 end | Space paint  X erase | arrows/WASD move",
        Color::DarkGrey,
        BASE_BG,
    );
    fb.put_str(
        0,
        help_row + 1,
        " Ctrl+S save | R reload | Esc quit (saves if modified)",
        Color::DarkGrey,
        BASE_BG,
    );
}
