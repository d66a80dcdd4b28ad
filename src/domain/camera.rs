//! Horizontal camera framing.
//!
//! The camera has no state of its own: the offset is recomputed from the
//! player's position every frame, with no smoothing. The player is held at
//! one third of the screen, biased forward by a look-ahead, and the view
//! never scrolls past either end of the level.

use crate::config::{PhysicsConfig, ScreenConfig};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    screen_width: f32,
    look_ahead: f32,
}

impl Camera {
    pub fn new(screen_width: f32, look_ahead: f32) -> Self {
        Camera { screen_width, look_ahead }
    }

    /// Look-ahead is a fixed fraction of the forward speed.
    pub fn from_config(screen: &ScreenConfig, physics: &PhysicsConfig) -> Self {
        Camera::new(
            screen.width as f32,
            (physics.forward_speed * screen.look_ahead_factor).floor(),
        )
    }

    /// World x of the left screen edge. Always within
    /// `[0, max(0, level_width - screen_width)]`.
    pub fn compute_x(&self, player_center_x: f32, level_width: f32) -> f32 {
        let target = player_center_x - (self.screen_width / 3.0).floor() + self.look_ahead;
        let max_x = (level_width - self.screen_width).max(0.0);
        target.clamp(0.0, max_x)
    }

    pub fn screen_width(&self) -> f32 {
        self.screen_width
    }
}
