//! Level editor state: a cursor over a `TileGrid`, the selected brush,
//! and the dirty / status bookkeeping. Terminal glue lives in
//! `ui::editor_view`; everything here is plain data and testable.

pub mod grid;

use std::path::{Path, PathBuf};

use crate::domain::tile::Tile;
use crate::sim::level::LevelError;
use grid::TileGrid;

const SAVED_MESSAGE_SECS: f32 = 1.25;
const RELOADED_MESSAGE_SECS: f32 = 1.0;
const ERROR_MESSAGE_SECS: f32 = 3.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Move { dx: i32, dy: i32 },
    Select(Tile),
    Paint,
    Erase,
    Save,
    Reload,
    Quit,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct EditorState {
    pub grid: TileGrid,
    path: PathBuf,
    /// (col, row), always inside the grid.
    pub cursor: (usize, usize),
    pub selected: Tile,
    pub dirty: bool,
    /// Top-left grid cell of the viewport.
    pub scroll: (usize, usize),
    status: String,
    status_timer: f32,
}

impl EditorState {
    /// Load `path`, inserting any missing Start/End markers. Inserted
    /// markers count as unsaved changes.
    pub fn open(path: &Path) -> Result<Self, LevelError> {
        let mut grid = TileGrid::load(path)?;
        let inserted = grid.ensure_required_markers();
        if inserted {
            log::warn!("{}: inserted missing start/end markers", path.display());
        }
        Ok(EditorState {
            grid,
            path: path.to_path_buf(),
            cursor: (0, 0),
            selected: Tile::Spike,
            dirty: inserted,
            scroll: (0, 0),
            status: String::new(),
            status_timer: 0.0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn apply(&mut self, action: Action) -> Flow {
        match action {
            Action::Move { dx, dy } => self.move_cursor(dx, dy),
            Action::Select(tile) => self.selected = tile,
            Action::Paint => self.paint(self.selected),
            Action::Erase => self.paint(Tile::Empty),
            Action::Save => match self.save() {
                Ok(()) => self.set_status("Saved", SAVED_MESSAGE_SECS),
                Err(e) => {
                    log::error!("save failed: {e}");
                    self.set_status(&format!("Save failed: {e}"), ERROR_MESSAGE_SECS);
                }
            },
            Action::Reload => self.reload(),
            Action::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Save on exit when there are unsaved edits.
    pub fn finish(&mut self) -> std::io::Result<()> {
        if self.dirty {
            self.save()?;
        }
        Ok(())
    }

    fn save(&mut self) -> std::io::Result<()> {
        self.grid.ensure_required_markers();
        self.grid.save(&self.path)?;
        self.dirty = false;
        Ok(())
    }

    fn reload(&mut self) {
        match TileGrid::load(&self.path) {
            Ok(mut grid) => {
                grid.ensure_required_markers();
                self.grid = grid;
                self.dirty = false;
                self.cursor.0 = self.cursor.0.min(self.grid.columns() - 1);
                self.cursor.1 = self.cursor.1.min(self.grid.rows() - 1);
                self.set_status("Reloaded", RELOADED_MESSAGE_SECS);
            }
            Err(e) => {
                log::error!("reload failed: {e}");
                self.set_status(&format!("Reload failed: {e}"), ERROR_MESSAGE_SECS);
            }
        }
    }

    fn paint(&mut self, tile: Tile) {
        let (col, row) = self.cursor;
        if self.grid.place_tile(col, row, tile) {
            self.dirty = true;
        }
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) {
        let clamp = |v: usize, d: i32, len: usize| -> usize {
            (v as i64 + d as i64).clamp(0, len as i64 - 1) as usize
        };
        self.cursor = (
            clamp(self.cursor.0, dx, self.grid.columns()),
            clamp(self.cursor.1, dy, self.grid.rows()),
        );
    }

    /// Shift the viewport the minimum needed to keep the cursor visible.
    pub fn scroll_to_cursor(&mut self, view_cols: usize, view_rows: usize) {
        fn follow(scroll: usize, cursor: usize, view: usize) -> usize {
            let view = view.max(1);
            if cursor < scroll {
                cursor
            } else if cursor >= scroll + view {
                cursor + 1 - view
            } else {
                scroll
            }
        }
        self.scroll = (
            follow(self.scroll.0, self.cursor.0, view_cols),
            follow(self.scroll.1, self.cursor.1, view_rows),
        );
    }

    fn set_status(&mut self, msg: &str, secs: f32) {
        self.status = msg.to_string();
        self.status_timer = secs;
    }

    /// Age the transient status message.
    pub fn tick(&mut self, dt: f32) {
        self.status_timer = (self.status_timer - dt).max(0.0);
    }

    /// The transient message, while it is still showing.
    pub fn status(&self) -> Option<&str> {
        (self.status_timer > 0.0).then_some(self.status.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = "\
..........
..........
S........E
##########
";

    struct TempLevel(PathBuf);

    impl TempLevel {
        fn new(name: &str, text: &str) -> Self {
            let dir = std::env::temp_dir().join(format!("blockdash-editor-{}-{name}", std::process::id()));
            std::fs::create_dir_all(&dir).unwrap();
            let path = dir.join("level.txt");
            std::fs::write(&path, text).unwrap();
            TempLevel(path)
        }
    }

    impl Drop for TempLevel {
        fn drop(&mut self) {
            if let Some(dir) = self.0.parent() {
                let _ = std::fs::remove_dir_all(dir);
            }
        }
    }

    #[test]
    fn open_defaults() {
        let tmp = TempLevel::new("open", LEVEL);
        let ed = EditorState::open(&tmp.0).unwrap();
        assert_eq!(ed.cursor, (0, 0));
        assert_eq!(ed.selected, Tile::Spike);
        assert!(!ed.dirty);
        assert_eq!(ed.file_name(), "level.txt");
        assert_eq!(ed.status(), None);
    }

    #[test]
    fn open_inserts_markers_and_marks_dirty() {
        let tmp = TempLevel::new("markers", "....\n....\n####\n");
        let ed = EditorState::open(&tmp.0).unwrap();
        assert!(ed.dirty);
        assert_eq!(ed.grid.find(Tile::Start), Some((0, 1)));
        assert_eq!(ed.grid.find(Tile::End), Some((3, 1)));
    }

    #[test]
    fn cursor_is_clamped_to_the_grid() {
        let tmp = TempLevel::new("cursor", LEVEL);
        let mut ed = EditorState::open(&tmp.0).unwrap();
        ed.apply(Action::Move { dx: -1, dy: -1 });
        assert_eq!(ed.cursor, (0, 0));
        ed.apply(Action::Move { dx: 50, dy: 50 });
        assert_eq!(ed.cursor, (9, 3));
    }

    #[test]
    fn paint_erase_and_save() {
        let tmp = TempLevel::new("paint", LEVEL);
        let mut ed = EditorState::open(&tmp.0).unwrap();
        ed.apply(Action::Move { dx: 4, dy: 2 });
        ed.apply(Action::Select(Tile::Solid));
        ed.apply(Action::Paint);
        assert!(ed.dirty);
        assert_eq!(ed.grid.get(4, 2), Tile::Solid);

        ed.apply(Action::Save);
        assert!(!ed.dirty);
        assert_eq!(ed.status(), Some("Saved"));
        let saved = std::fs::read_to_string(&tmp.0).unwrap();
        assert_eq!(saved.lines().nth(2), Some("S...#....E"));

        ed.apply(Action::Erase);
        assert!(ed.dirty);
        assert_eq!(ed.grid.get(4, 2), Tile::Empty);
    }

    #[test]
    fn reload_discards_edits() {
        let tmp = TempLevel::new("reload", LEVEL);
        let mut ed = EditorState::open(&tmp.0).unwrap();
        ed.apply(Action::Paint);
        assert!(ed.dirty);
        ed.apply(Action::Reload);
        assert!(!ed.dirty);
        assert_eq!(ed.grid.to_text(), LEVEL);
        assert_eq!(ed.status(), Some("Reloaded"));
    }

    #[test]
    fn quit_saves_only_when_dirty() {
        let tmp = TempLevel::new("quit", LEVEL);
        let mut ed = EditorState::open(&tmp.0).unwrap();
        assert_eq!(ed.apply(Action::Quit), Flow::Quit);
        std::fs::remove_file(&tmp.0).unwrap();
        ed.finish().unwrap();
        assert!(!tmp.0.exists());

        ed.apply(Action::Paint);
        ed.finish().unwrap();
        assert!(tmp.0.exists());
    }

    #[test]
    fn status_message_expires() {
        let tmp = TempLevel::new("status", LEVEL);
        let mut ed = EditorState::open(&tmp.0).unwrap();
        ed.apply(Action::Save);
        ed.tick(1.0);
        assert_eq!(ed.status(), Some("Saved"));
        ed.tick(0.5);
        assert_eq!(ed.status(), None);
    }

    #[test]
    fn viewport_follows_cursor() {
        let tmp = TempLevel::new("scroll", &format!("{}\nS{}E\n", ".".repeat(40), ".".repeat(38)));
        let mut ed = EditorState::open(&tmp.0).unwrap();
        ed.apply(Action::Move { dx: 25, dy: 0 });
        ed.scroll_to_cursor(10, 5);
        assert_eq!(ed.scroll, (16, 0));
        ed.apply(Action::Move { dx: -20, dy: 0 });
        ed.scroll_to_cursor(10, 5);
        assert_eq!(ed.scroll, (5, 0));
    }
}
