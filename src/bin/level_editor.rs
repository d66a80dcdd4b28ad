//! Terminal level editor.
//!
//! Usage: `level-editor [LEVEL]`. Without an argument it edits the level
//! configured in `config.toml`.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use blockdash::config::GameConfig;
use blockdash::editor::{EditorState, Flow};
use blockdash::ui::editor_view;
use blockdash::ui::frame::Screen;
use blockdash::ui::input::InputState;

/// Redraw at least this often so status messages expire on time.
const IDLE_REDRAW: Duration = Duration::from_millis(100);

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let path = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => GameConfig::load().level_path,
    };

    if let Err(e) = run(&path) {
        eprintln!("level-editor: {e}");
        std::process::exit(1);
    }
}

fn run(path: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = EditorState::open(path)?;

    let mut screen = Screen::new();
    let mut input = InputState::new();
    input.honor_release = screen.init()?;

    let result = edit_loop(&mut editor, &mut screen, &mut input);

    if let Err(e) = screen.cleanup() {
        log::error!("terminal cleanup failed: {e}");
    }
    result?;

    editor.finish()?;
    println!("{}", editor.path().display());
    Ok(())
}

fn edit_loop(
    editor: &mut EditorState,
    screen: &mut Screen,
    input: &mut InputState,
) -> std::io::Result<()> {
    let mut last = Instant::now();

    loop {
        let fb = screen.begin()?;
        let (view_cols, view_rows) = editor_view::viewport(fb.width(), fb.height());
        editor.scroll_to_cursor(view_cols, view_rows);
        editor_view::draw(fb, editor);
        screen.present()?;

        let key = input.wait_key(IDLE_REDRAW);

        let now = Instant::now();
        editor.tick(now.duration_since(last).as_secs_f32());
        last = now;

        if let Some(action) = key.as_ref().and_then(editor_view::action_for_key) {
            if editor.apply(action) == Flow::Quit {
                break;
            }
        }
    }

    Ok(())
}
