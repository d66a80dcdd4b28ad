//! Physics body: the player actor's integrator and collision resolver.
//!
//! ## Step order (load-bearing; it defines the feel)
//!
//!   1. clear transient flags (`hit_head`, `hit_wall`, `jumped`)
//!   2. jump held → refresh jump buffer, else decay it
//!   3. grounded  → refresh coyote timer, else decay it
//!   4. try to consume a jump
//!   5. advance x by `forward_speed * dt` (never blocked)
//!   6. gravity, clamped to `max_fall_speed`
//!   7. advance y by `velocity_y * dt`
//!   8. vertical collision resolution against the solids
//!   9. grounded → refresh coyote timer again
//!  10. try to consume a jump again (landing + buffered jump in one step)
//!  11. cosmetic rotation
//!
//! ## Collision resolution
//!
//! Every solid overlapping the body after step 7 is handled on its own,
//! in slice order:
//!   - already overlapping before the vertical move → entered from the
//!     side: flag `hit_wall`, no correction
//!   - falling → bottom snaps to the solid's top, grounded
//!   - rising  → top snaps to the solid's bottom, `hit_head`
//!
//! Once velocity is zeroed, later overlaps in the same step are left alone.
//! This is only sound for non-overlapping grid tiles where at most one
//! vertical contact is possible per step; it is not a general solver.

use super::geom::Rect;
use super::tile::TILE_SIZE;
use crate::config::PhysicsConfig;

#[derive(Clone, Debug)]
pub struct PhysicsBody {
    config: PhysicsConfig,
    bounds: Rect,
    velocity_y: f32,
    grounded: bool,
    coyote_timer: f32,
    jump_buffer_timer: f32,
    rotation_degrees: f32,
    hit_head: bool,
    hit_wall: bool,
    jumped: bool,
}

impl PhysicsBody {
    /// Body whose top-left corner sits at (x, y).
    pub fn new(config: PhysicsConfig, x: f32, y: f32) -> Self {
        let size = (TILE_SIZE as f32 * config.body_scale).floor();
        PhysicsBody {
            config,
            bounds: Rect::new(x, y, size, size),
            velocity_y: 0.0,
            grounded: false,
            coyote_timer: 0.0,
            jump_buffer_timer: 0.0,
            rotation_degrees: 0.0,
            hit_head: false,
            hit_wall: false,
            jumped: false,
        }
    }

    /// Teleport to (x, y) and clear all kinematic and timer state.
    pub fn reset(&mut self, x: f32, y: f32) {
        self.bounds.x = x;
        self.bounds.y = y;
        self.velocity_y = 0.0;
        self.grounded = false;
        self.coyote_timer = 0.0;
        self.jump_buffer_timer = 0.0;
        self.rotation_degrees = 0.0;
        self.hit_head = false;
        self.hit_wall = false;
        self.jumped = false;
    }

    /// Arm the jump buffer to its full duration. Re-arming resets, never adds.
    pub fn request_jump(&mut self) {
        self.jump_buffer_timer = self.config.jump_buffer_time;
    }

    /// Advance one step. `dt` must already be clamped by the caller.
    pub fn update(&mut self, dt: f32, solids: &[Rect], jump_held: bool) {
        self.hit_head = false;
        self.hit_wall = false;
        self.jumped = false;

        if jump_held {
            self.request_jump();
        } else {
            self.jump_buffer_timer = (self.jump_buffer_timer - dt).max(0.0);
        }

        if self.grounded {
            self.coyote_timer = self.config.coyote_time;
        } else {
            self.coyote_timer = (self.coyote_timer - dt).max(0.0);
        }

        self.try_consume_jump();

        self.bounds.translate(self.config.forward_speed * dt, 0.0);

        self.velocity_y = (self.velocity_y + self.config.gravity * dt).min(self.config.max_fall_speed);

        let before_vertical = self.bounds;
        self.bounds.translate(0.0, self.velocity_y * dt);
        self.resolve_vertical(solids, &before_vertical);

        if self.grounded {
            self.coyote_timer = self.config.coyote_time;
        }

        self.try_consume_jump();

        if self.grounded {
            self.rotation_degrees = 0.0;
        } else {
            self.rotation_degrees = (self.rotation_degrees + self.config.spin_rate * dt).rem_euclid(360.0);
        }
    }

    fn resolve_vertical(&mut self, solids: &[Rect], before_vertical: &Rect) {
        self.grounded = false;

        for solid in solids {
            if !self.bounds.intersects(solid) {
                continue;
            }
            if before_vertical.intersects(solid) {
                self.hit_wall = true;
                continue;
            }
            if self.velocity_y > 0.0 {
                self.bounds.set_bottom(solid.top());
                self.velocity_y = 0.0;
                self.grounded = true;
            } else if self.velocity_y < 0.0 {
                self.bounds.set_top(solid.bottom());
                self.velocity_y = 0.0;
                self.hit_head = true;
            }
        }
    }

    /// Honored when the buffer is armed and the body is grounded or still
    /// inside its coyote window. No-op otherwise.
    fn try_consume_jump(&mut self) {
        if self.jump_buffer_timer <= 0.0 {
            return;
        }
        if self.grounded || self.coyote_timer > 0.0 {
            self.velocity_y = self.config.jump_velocity;
            self.grounded = false;
            self.coyote_timer = 0.0;
            self.jump_buffer_timer = 0.0;
            self.jumped = true;
        }
    }

    // ── Queries ──

    pub fn bounds(&self) -> Rect { self.bounds }
    pub fn velocity_y(&self) -> f32 { self.velocity_y }
    pub fn grounded(&self) -> bool { self.grounded }
    pub fn hit_head(&self) -> bool { self.hit_head }
    pub fn hit_wall(&self) -> bool { self.hit_wall }
    pub fn jumped(&self) -> bool { self.jumped }
    pub fn rotation_degrees(&self) -> f32 { self.rotation_degrees }
    pub fn coyote_timer(&self) -> f32 { self.coyote_timer }
    pub fn jump_buffer_timer(&self) -> f32 { self.jump_buffer_timer }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
