//! Block Dash: an auto-scrolling terminal platformer.
//!
//! Layers:
//!   - `domain`: rectangles, tiles, the physics body and the camera (pure)
//!   - `sim`: level loading, session state and the per-frame step
//!   - `editor`: the level grid model shared with the `level-editor` binary
//!   - `ui`: crossterm input, rendering and optional sound
//!   - `config`: `config.toml` loading with defaults

pub mod config;
pub mod domain;
pub mod editor;
pub mod sim;
pub mod ui;
