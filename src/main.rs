//! Entry point and game loop.
//!
//! Usage: `blockdash [LEVEL]`. The optional path overrides `level_path`
//! from `config.toml`.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use blockdash::config::GameConfig;
use blockdash::sim::level::load_level;
use blockdash::sim::step;
use blockdash::sim::world::WorldState;
use blockdash::ui::frame::Screen;
use blockdash::ui::input::{HoldLatch, InputState};
use blockdash::ui::renderer::GameView;
use blockdash::ui::sound::{self, SoundEngine};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut config = GameConfig::load();
    if let Some(arg) = std::env::args_os().nth(1) {
        config.level_path = PathBuf::from(arg);
    }

    if let Err(e) = run(&config) {
        eprintln!("blockdash: {e}");
        std::process::exit(1);
    }
}

fn run(config: &GameConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Fails before the terminal is touched, so the error prints cleanly.
    let level = load_level(&config.level_path)?;
    let mut world = WorldState::new(level, config);

    let mut screen = Screen::new();
    let mut input = InputState::new();
    input.honor_release = screen.init()?;

    let sfx = SoundEngine::new();
    let result = game_loop(&mut world, &mut screen, &mut input, sfx.as_ref(), config);

    if let Err(e) = screen.cleanup() {
        log::error!("terminal cleanup failed: {e}");
    }
    result?;

    println!("Thanks for playing Block Dash! Attempts: {}", world.attempts);
    Ok(())
}

fn game_loop(
    world: &mut WorldState,
    screen: &mut Screen,
    input: &mut InputState,
    sfx: Option<&SoundEngine>,
    config: &GameConfig,
) -> std::io::Result<()> {
    let view = GameView::new(world);
    let frame_budget = Duration::from_secs_f32(1.0 / config.timing.fps as f32);
    let mut last_frame = Instant::now();
    let mut start_latch = HoldLatch::default();

    loop {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last_frame).as_secs_f32();
        last_frame = frame_start;

        input.drain_events();
        if input.quit_pressed() {
            break;
        }

        let mut events = Vec::new();
        if input.jump_pressed() {
            events.extend(step::press_jump(world));
        }
        // The press that starts an attempt is masked and never arms the jump buffer.
        let jump_held = start_latch.update(!events.is_empty(), input.jump_held());
        events.extend(step::step(world, dt, jump_held));
        sound::play_events(sfx, &events);

        view.draw(screen.begin()?, world);
        screen.present()?;

        if let Some(rest) = frame_budget.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    Ok(())
}
