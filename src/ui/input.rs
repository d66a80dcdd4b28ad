//! Input state tracker.
//!
//! Tracks which keys are currently held down, enabling:
//!   - Continuous jumping while the jump key is held
//!   - Edge-triggered presses (start, retry, editor actions)
//!
//! Uses crossterm's keyboard enhancement for Release events when available.
//! Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub const JUMP_KEYS: [KeyCode; 4] = [
    KeyCode::Char(' '),
    KeyCode::Up,
    KeyCode::Char('w'),
    KeyCode::Char('W'),
];

pub const QUIT_KEYS: [KeyCode; 3] = [KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that transitioned from "not held" → "held" during the
    /// most recent drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for modifier handling.
    pub raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before the simulation step.
    pub fn drain_events(&mut self) {
        self.begin_frame();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.handle_key(key);
            }
        }

        self.expire(Instant::now());
    }

    /// Block up to `timeout` for the next key press. Used by the editor,
    /// which has no frame clock.
    pub fn wait_key(&mut self, timeout: Duration) -> Option<KeyEvent> {
        self.begin_frame();
        if !poll(timeout).unwrap_or(false) {
            return None;
        }
        match event::read() {
            Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                self.handle_key(key);
                Some(key)
            }
            _ => None,
        }
    }

    fn begin_frame(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        self.raw_events.push(key);

        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {
                // Not trusted without enhancement; the timeout expires it.
            }
            _ => {
                let was_held = self.is_held(key.code);
                self.last_active.insert(key.code, Instant::now());
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    /// Expire keys that have timed out (fallback for terminals without Release).
    fn expire(&mut self, now: Instant) {
        if self.honor_release {
            return;
        }
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        match self.last_active.get(&code) {
            Some(_) if self.honor_release => true,
            Some(t) => t.elapsed() < HOLD_TIMEOUT,
            None => false,
        }
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    pub fn jump_held(&self) -> bool {
        self.any_held(&JUMP_KEYS)
    }

    pub fn jump_pressed(&self) -> bool {
        self.any_pressed(&JUMP_KEYS)
    }

    pub fn quit_pressed(&self) -> bool {
        self.any_pressed(&QUIT_KEYS) || self.ctrl_c_pressed()
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

/// Masks a held jump key after the press that started or retried an
/// attempt, until the key is released.
///
/// The masked press never arms the jump buffer: a tap that starts the run
/// does not also jump on the first frames. On terminals without Release
/// events a tap reads as held for `HOLD_TIMEOUT`, which would otherwise
/// jump right after the start.
#[derive(Default, Debug)]
pub struct HoldLatch {
    latched: bool,
}

impl HoldLatch {
    /// `transitioned` is whether this frame's press changed phase. Returns
    /// the held state the simulation should see.
    pub fn update(&mut self, transitioned: bool, held: bool) -> bool {
        self.latched |= transitioned;
        if !held {
            self.latched = false;
        }
        held && !self.latched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn first_press_is_fresh_repeat_is_not() {
        let mut input = InputState::new();
        input.begin_frame();
        input.handle_key(key(KeyCode::Char(' '), KeyEventKind::Press));
        assert!(input.jump_pressed());
        assert!(input.jump_held());

        input.begin_frame();
        input.handle_key(key(KeyCode::Char(' '), KeyEventKind::Repeat));
        assert!(!input.jump_pressed());
        assert!(input.jump_held());
    }

    #[test]
    fn release_is_honored_only_with_enhancement() {
        let mut input = InputState::new();
        input.handle_key(key(KeyCode::Up, KeyEventKind::Press));
        input.handle_key(key(KeyCode::Up, KeyEventKind::Release));
        assert!(input.jump_held());

        let mut enhanced = InputState::new();
        enhanced.honor_release = true;
        enhanced.handle_key(key(KeyCode::Up, KeyEventKind::Press));
        enhanced.handle_key(key(KeyCode::Up, KeyEventKind::Release));
        assert!(!enhanced.jump_held());
    }

    #[test]
    fn held_keys_expire_without_release_events() {
        let mut input = InputState::new();
        input.handle_key(key(KeyCode::Char('w'), KeyEventKind::Press));
        input.expire(Instant::now() + HOLD_TIMEOUT * 2);
        assert!(!input.jump_held());
    }

    #[test]
    fn ctrl_c_quits() {
        let mut input = InputState::new();
        input.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(input.quit_pressed());
        assert!(!input.jump_pressed());
    }

    #[test]
    fn start_press_is_masked_until_release() {
        let mut latch = HoldLatch::default();
        assert!(!latch.update(true, true));
        assert!(!latch.update(false, true));
        assert!(!latch.update(false, false));
        assert!(latch.update(false, true));
    }

    #[test]
    fn ordinary_holds_pass_through() {
        let mut latch = HoldLatch::default();
        assert!(latch.update(false, true));
        assert!(!latch.update(false, false));
    }

    #[test]
    fn tap_that_starts_and_releases_in_one_frame_leaves_no_latch() {
        let mut latch = HoldLatch::default();
        assert!(!latch.update(true, false));
        assert!(latch.update(false, true));
    }
}
