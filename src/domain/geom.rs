//! Axis-aligned rectangles in world pixels.
//!
//! `y` grows downward (screen convention), so `top() < bottom()`.
//! Intersection is strict: rectangles that only share an edge do not
//! intersect. A body resting exactly on a floor therefore does not
//! collide with it, which is what lets the resolver snap to an edge.

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Square tile at grid cell (col, row).
    pub fn tile(col: usize, row: usize, size: i32) -> Self {
        let s = size as f32;
        Rect::new(col as f32 * s, row as f32 * s, s, s)
    }

    #[inline]
    pub fn left(&self) -> f32 { self.x }
    #[inline]
    pub fn right(&self) -> f32 { self.x + self.w }
    #[inline]
    pub fn top(&self) -> f32 { self.y }
    #[inline]
    pub fn bottom(&self) -> f32 { self.y + self.h }
    #[inline]
    pub fn center_x(&self) -> f32 { self.x + self.w * 0.5 }
    #[inline]
    pub fn center_y(&self) -> f32 { self.y + self.h * 0.5 }

    /// Move so that the bottom edge sits at `y`.
    #[inline]
    pub fn set_bottom(&mut self, y: f32) {
        self.y = y - self.h;
    }

    /// Move so that the top edge sits at `y`.
    #[inline]
    pub fn set_top(&mut self, y: f32) {
        self.y = y;
    }

    #[inline]
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    /// Strict overlap test (shared edges do not count).
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}
