//! WorldState: everything one level-play session owns.
//!
//! ## Ownership
//!   - `level`: loaded once, **never mutated**; read by body, hazards, camera
//!   - `body`: mutated only by `step::step` (and reset on entering Playing)
//!   - `camera_x`: recomputed from the body every Playing frame
//!
//! ## Phases
//!   Menu ──jump──▶ Playing ──hazard──▶ Dead ──jump──▶ Playing
//!                          └──end zone──▶ Win ──jump──▶ Playing

use crate::config::GameConfig;
use crate::domain::camera::Camera;
use crate::domain::physics::PhysicsBody;
use crate::sim::event::DeathCause;
use crate::sim::level::LevelGeometry;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Menu,
    Playing,
    Dead,
    Win,
}

pub struct WorldState {
    // ── Level (immutable after load) ──
    pub level: LevelGeometry,

    // ── Actor ──
    pub body: PhysicsBody,

    // ── Camera ──
    pub camera: Camera,
    pub camera_x: f32,

    // ── Meta ──
    pub phase: Phase,
    /// Starts at 1; bumped on every retry after a death.
    pub attempts: u32,
    pub death_cause: Option<DeathCause>,
    /// Steps simulated in the current attempt.
    pub tick: u64,

    // ── Bounds ──
    /// A body whose top passes this y has fallen off the screen.
    pub screen_height: f32,
    pub max_frame_dt: f32,
}

impl WorldState {
    pub fn new(level: LevelGeometry, config: &GameConfig) -> Self {
        let screen_height = config.screen.height as f32;
        if level.height_px as f32 > screen_height {
            log::warn!(
                "level is {}px tall but the screen is {}px; rows below the screen are fall-out territory",
                level.height_px,
                config.screen.height,
            );
        }
        let (sx, sy) = level.start_f32();
        let body = PhysicsBody::new(config.physics, sx, sy);
        let camera = Camera::from_config(&config.screen, &config.physics);
        let camera_x = camera.compute_x(body.bounds().center_x(), level.width_px as f32);
        WorldState {
            level,
            body,
            camera,
            camera_x,
            phase: Phase::Menu,
            attempts: 1,
            death_cause: None,
            tick: 0,
            screen_height,
            max_frame_dt: config.timing.max_frame_dt,
        }
    }

    /// Fraction of the level's width covered so far, 0.0 ..= 1.0.
    pub fn progress(&self) -> f32 {
        let (sx, _) = self.level.start_f32();
        let span = self.level.end_zone.left() - sx;
        if span <= 0.0 {
            return 1.0;
        }
        ((self.body.bounds().right() - sx) / span).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::parse_level;

    #[test]
    fn level_taller_than_the_screen_still_loads() {
        let mut text = String::from("S........E\n");
        for _ in 0..13 {
            text.push_str("..........\n");
        }
        text.push_str("##########\n");
        let level = parse_level(&text).unwrap();
        assert_eq!(level.height_px, 600);

        let world = WorldState::new(level, &GameConfig::default());
        assert_eq!(world.phase, Phase::Menu);
        assert_eq!(world.screen_height, 480.0);
    }

    #[test]
    fn progress_is_small_at_spawn() {
        let level = parse_level("..........\nS........E\n##########\n").unwrap();
        let world = WorldState::new(level, &GameConfig::default());
        assert!(world.progress() < 0.2);
    }
}
