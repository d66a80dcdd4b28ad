//! The step function: advances a Playing session by one frame.
//!
//! Processing order:
//!   1. Clamp dt to `max_frame_dt`
//!   2. Physics body update (jump buffer, integrate, vertical resolve)
//!   3. Hazard checks: spike, ceiling, wall, fell out
//!   4. End zone check (overrides a death found in the same frame)
//!   5. Camera offset
//!
//! Jump presses are routed through `press_jump`, which also drives the
//! Menu / Dead / Win transitions.

use super::event::{DeathCause, GameEvent};
use super::world::{Phase, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, dt: f32, jump_held: bool) -> Vec<GameEvent> {
    if world.phase != Phase::Playing {
        return vec![];
    }

    let mut events: Vec<GameEvent> = Vec::new();
    let dt = dt.clamp(0.0, world.max_frame_dt);
    world.tick += 1;

    let was_grounded = world.body.grounded();
    world.body.update(dt, &world.level.solids, jump_held);

    if world.body.jumped() {
        events.push(GameEvent::Jumped);
    } else if world.body.grounded() && !was_grounded {
        events.push(GameEvent::Landed);
    }

    resolve_hazards(world);
    resolve_win(world, &mut events);

    if let (Phase::Dead, Some(cause)) = (world.phase, world.death_cause) {
        log::debug!("attempt {} ended: {} at tick {}", world.attempts, cause.describe(), world.tick);
        events.push(GameEvent::PlayerKilled { cause });
    }

    world.camera_x = world
        .camera
        .compute_x(world.body.bounds().center_x(), world.level.width_px as f32);

    events
}

/// A fresh jump press. Starts, retries, or buffers a jump depending on phase.
pub fn press_jump(world: &mut WorldState) -> Vec<GameEvent> {
    match world.phase {
        Phase::Menu => {
            restart_level(world);
            log::info!("attempt {} started", world.attempts);
            vec![GameEvent::Started]
        }
        Phase::Playing => {
            world.body.request_jump();
            vec![]
        }
        Phase::Dead => {
            world.attempts += 1;
            restart_level(world);
            log::info!("retry: attempt {}", world.attempts);
            vec![GameEvent::Retry { attempt: world.attempts }]
        }
        Phase::Win => {
            restart_level(world);
            log::info!("replay after clear: attempt {}", world.attempts);
            vec![GameEvent::Retry { attempt: world.attempts }]
        }
    }
}

/// Enter Playing with the body back at the level's start.
pub fn restart_level(world: &mut WorldState) {
    let (sx, sy) = world.level.start_f32();
    world.body.reset(sx, sy);
    world.phase = Phase::Playing;
    world.death_cause = None;
    world.tick = 0;
    world.camera_x = world
        .camera
        .compute_x(world.body.bounds().center_x(), world.level.width_px as f32);
}

// ══════════════════════════════════════════════════════════════
// Hazards / win
// ══════════════════════════════════════════════════════════════

fn resolve_hazards(world: &mut WorldState) {
    let bounds = world.body.bounds();

    let cause = if world.level.spike_hit(&bounds).is_some() {
        Some(DeathCause::Spike)
    } else if world.body.hit_head() {
        Some(DeathCause::Ceiling)
    } else if world.body.hit_wall() {
        Some(DeathCause::Wall)
    } else if bounds.top() > world.screen_height {
        Some(DeathCause::FellOut)
    } else {
        None
    };

    if let Some(cause) = cause {
        world.phase = Phase::Dead;
        world.death_cause = Some(cause);
    }
}

fn resolve_win(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.level.reached_end(&world.body.bounds()) {
        world.phase = Phase::Win;
        world.death_cause = None;
        log::info!("level complete on attempt {} after {} steps", world.attempts, world.tick);
        events.push(GameEvent::LevelComplete);
    }
}

// ══════════════════════════════════════════════════════════════
// Scenario tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::level::parse_level;

    const DT: f32 = 1.0 / 60.0;

    fn world_from(rows: &str) -> WorldState {
        let level = parse_level(rows).unwrap();
        WorldState::new(level, &GameConfig::default())
    }

    /// Run until the phase leaves Playing or `max_steps` is reached.
    fn run(world: &mut WorldState, max_steps: usize, jump_held: bool) -> Vec<GameEvent> {
        let mut all = vec![];
        for _ in 0..max_steps {
            all.extend(step(world, DT, jump_held));
            if world.phase != Phase::Playing {
                break;
            }
        }
        all
    }

    const FLAT: &str = "\
..........
..........
..........
..........
..........
S........E
##########
..........
";

    const SPIKE_AHEAD: &str = "\
..........
..........
..........
..........
..........
S..^.....E
##########
..........
";

    #[test]
    fn menu_ignores_steps_until_first_press() {
        let mut w = world_from(FLAT);
        assert_eq!(w.phase, Phase::Menu);
        assert!(step(&mut w, DT, false).is_empty());
        assert_eq!(w.body.bounds().x, 0.0);

        let events = press_jump(&mut w);
        assert_eq!(events, vec![GameEvent::Started]);
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.attempts, 1);
    }

    #[test]
    fn flat_level_reaches_the_end_without_dying() {
        let mut w = world_from(FLAT);
        press_jump(&mut w);

        let mut died = false;
        for _ in 0..(3 * 60) {
            let events = step(&mut w, DT, false);
            if events.iter().any(|e| matches!(e, GameEvent::PlayerKilled { .. })) {
                died = true;
            }
            if w.phase != Phase::Playing {
                break;
            }
        }
        assert!(!died);
        assert_eq!(w.phase, Phase::Win);
        assert!(w.level.reached_end(&w.body.bounds()));
        assert!(w.body.grounded());
    }

    #[test]
    fn spike_ahead_kills_by_spike() {
        let mut w = world_from(SPIKE_AHEAD);
        press_jump(&mut w);
        let events = run(&mut w, 3 * 60, false);

        assert_eq!(w.phase, Phase::Dead);
        assert_eq!(w.death_cause, Some(DeathCause::Spike));
        assert!(events.contains(&GameEvent::PlayerKilled { cause: DeathCause::Spike }));
        // Still standing on the floor, not fallen through or bonked.
        assert_eq!(w.body.bounds().bottom(), 240.0);
        assert!(!w.body.hit_head());
    }

    #[test]
    fn timed_jump_clears_the_spike() {
        let mut w = world_from(SPIKE_AHEAD);
        press_jump(&mut w);
        // Pressed mid-air before the first landing: buffered, fires on touchdown.
        press_jump(&mut w);
        let events = run(&mut w, 3 * 60, false);
        assert!(events.contains(&GameEvent::Jumped));
        assert_eq!(w.phase, Phase::Win);
    }

    #[test]
    fn ceiling_hit_kills() {
        let mut w = world_from(
            "\
..........
..........
..........
##########
..........
S........E
##########
",
        );
        press_jump(&mut w);
        press_jump(&mut w);
        run(&mut w, 3 * 60, false);
        assert_eq!(w.phase, Phase::Dead);
        assert_eq!(w.death_cause, Some(DeathCause::Ceiling));
    }

    #[test]
    fn wall_hit_kills() {
        let mut w = world_from(
            "\
..........
..........
..........
..........
....#.....
S...#....E
##########
",
        );
        press_jump(&mut w);
        run(&mut w, 3 * 60, false);
        assert_eq!(w.phase, Phase::Dead);
        assert_eq!(w.death_cause, Some(DeathCause::Wall));
    }

    #[test]
    fn falling_into_a_pit_kills() {
        let mut w = world_from(
            "\
..........
..........
..........
..........
..........
S........E
###....###
",
        );
        press_jump(&mut w);
        run(&mut w, 10 * 60, false);
        assert_eq!(w.phase, Phase::Dead);
        assert_eq!(w.death_cause, Some(DeathCause::FellOut));
        assert!(w.body.bounds().top() > w.screen_height);
    }

    #[test]
    fn retry_after_death_counts_an_attempt() {
        let mut w = world_from(SPIKE_AHEAD);
        press_jump(&mut w);
        run(&mut w, 3 * 60, false);
        assert_eq!(w.phase, Phase::Dead);

        let events = press_jump(&mut w);
        assert_eq!(events, vec![GameEvent::Retry { attempt: 2 }]);
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.attempts, 2);
        assert_eq!(w.death_cause, None);
        assert_eq!(w.body.bounds().x, 0.0);
        assert_eq!(w.body.bounds().y, 200.0);
        assert_eq!(w.body.velocity_y(), 0.0);
    }

    #[test]
    fn retry_after_win_keeps_attempts() {
        let mut w = world_from(FLAT);
        press_jump(&mut w);
        run(&mut w, 3 * 60, false);
        assert_eq!(w.phase, Phase::Win);

        press_jump(&mut w);
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.attempts, 1);
        assert_eq!(w.body.bounds().x, 0.0);
    }

    #[test]
    fn oversized_dt_is_clamped() {
        let mut w = world_from(FLAT);
        press_jump(&mut w);
        step(&mut w, 1.0, false);
        let max_dx = GameConfig::default().physics.forward_speed * w.max_frame_dt;
        assert!(w.body.bounds().x <= max_dx + 1e-3);
    }

    #[test]
    fn camera_is_updated_and_clamped() {
        let long = format!(
            "{}\n{}\n{}\n",
            ".".repeat(100),
            format!("S{}E", ".".repeat(98)),
            "#".repeat(100)
        );
        let mut w = world_from(&long);
        press_jump(&mut w);
        assert_eq!(w.camera_x, 0.0);
        run(&mut w, 4 * 60, false);
        assert_eq!(w.phase, Phase::Playing);
        let expected = w.camera.compute_x(w.body.bounds().center_x(), w.level.width_px as f32);
        assert_eq!(w.camera_x, expected);
        assert!(w.camera_x > 0.0);
    }

    #[test]
    fn landing_emits_event_once() {
        let mut w = world_from(FLAT);
        press_jump(&mut w);
        let events = run(&mut w, 10, false);
        let landings = events.iter().filter(|e| **e == GameEvent::Landed).count();
        assert_eq!(landings, 1);
    }
}
