//! External configuration loader.
//!
//! Reads `config.toml` from the executable's directory (or CWD).
//! Falls back to sensible defaults if the file is missing or incomplete.
//! All tuning constants of the physics body live here and are handed to
//! the body as an immutable value at construction.

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ── Public Config Structs ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub screen: ScreenConfig,
    pub timing: TimingConfig,
    pub level_path: PathBuf,
}

/// Movement tuning. Units are pixels and seconds; `y` grows downward,
/// so `jump_velocity` is negative.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub forward_speed: f32,
    pub gravity: f32,
    pub jump_velocity: f32,
    pub max_fall_speed: f32,
    pub coyote_time: f32,
    pub jump_buffer_time: f32,
    /// Cosmetic spin while airborne, degrees per second.
    pub spin_rate: f32,
    /// Body edge length as a fraction of `TILE_SIZE`.
    pub body_scale: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: i32,
    pub height: i32,
    /// Camera look-ahead as a fraction of `forward_speed`.
    pub look_ahead_factor: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub fps: u32,
    /// Upper bound on one physics step; prevents tunneling on slow frames.
    pub max_frame_dt: f32,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    physics: PhysicsConfig,
    #[serde(default)]
    screen: ScreenConfig,
    #[serde(default)]
    timing: TimingConfig,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_level_path")]
    level_path: String,
}

// ── Defaults ──

fn default_forward_speed() -> f32 { 330.0 }
fn default_gravity() -> f32 { 2600.0 }
fn default_jump_velocity() -> f32 { -760.0 }  // apex ≈ 111px ≈ 2.8 tiles
fn default_max_fall_speed() -> f32 { 1100.0 }
fn default_coyote_time() -> f32 { 0.08 }
fn default_jump_buffer() -> f32 { 0.12 }
fn default_spin_rate() -> f32 { 450.0 }
fn default_body_scale() -> f32 { 0.85 }

fn default_screen_width() -> i32 { 960 }
fn default_screen_height() -> i32 { 480 }
fn default_look_ahead() -> f32 { 0.6 }

fn default_fps() -> u32 { 60 }
fn default_max_frame_dt() -> f32 { 1.0 / 30.0 }

fn default_level_path() -> String { "levels/level1.txt".into() }

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            forward_speed: default_forward_speed(),
            gravity: default_gravity(),
            jump_velocity: default_jump_velocity(),
            max_fall_speed: default_max_fall_speed(),
            coyote_time: default_coyote_time(),
            jump_buffer_time: default_jump_buffer(),
            spin_rate: default_spin_rate(),
            body_scale: default_body_scale(),
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        ScreenConfig {
            width: default_screen_width(),
            height: default_screen_height(),
            look_ahead_factor: default_look_ahead(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            fps: default_fps(),
            max_frame_dt: default_max_frame_dt(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            level_path: default_level_path(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            physics: PhysicsConfig::default(),
            screen: ScreenConfig::default(),
            timing: TimingConfig::default(),
            level_path: PathBuf::from(default_level_path()),
        }
    }
}

// ── Validation ──

impl PhysicsConfig {
    /// Repair values that would break the integrator's sign conventions.
    fn sanitize(mut self) -> Self {
        if self.gravity <= 0.0 {
            log::warn!("physics.gravity must be positive; using default");
            self.gravity = default_gravity();
        }
        if self.forward_speed <= 0.0 {
            log::warn!("physics.forward_speed must be positive; using default");
            self.forward_speed = default_forward_speed();
        }
        if self.jump_velocity > 0.0 {
            log::warn!("physics.jump_velocity must be negative (upward); negating {}", self.jump_velocity);
            self.jump_velocity = -self.jump_velocity;
        }
        if self.max_fall_speed <= 0.0 {
            log::warn!("physics.max_fall_speed must be positive; using default");
            self.max_fall_speed = default_max_fall_speed();
        }
        self.coyote_time = self.coyote_time.max(0.0);
        self.jump_buffer_time = self.jump_buffer_time.max(0.0);
        if self.body_scale <= 0.0 || self.body_scale > 1.0 {
            log::warn!("physics.body_scale {} outside (0, 1]; using default", self.body_scale);
            self.body_scale = default_body_scale();
        }
        self
    }
}

impl ScreenConfig {
    fn sanitize(mut self) -> Self {
        if self.width <= 0 || self.height <= 0 {
            log::warn!("screen size {}x{} is not positive; using default", self.width, self.height);
            self.width = default_screen_width();
            self.height = default_screen_height();
        }
        self.look_ahead_factor = self.look_ahead_factor.max(0.0);
        self
    }
}

impl TimingConfig {
    fn sanitize(mut self) -> Self {
        if self.fps == 0 {
            self.fps = default_fps();
        }
        if !(self.max_frame_dt > 0.0) {
            log::warn!("timing.max_frame_dt must be positive; using default");
            self.max_frame_dt = default_max_frame_dt();
        }
        self
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) `~/.local/share/blockdash`.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        let level_path = resolve_level_path(&toml_cfg.general.level_path, &search_dirs);
        Self::from_parts(toml_cfg, level_path)
    }

    /// Parse a config document without touching the filesystem.
    /// The level path is kept exactly as written.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        let level_path = PathBuf::from(&toml_cfg.general.level_path);
        Ok(Self::from_parts(toml_cfg, level_path))
    }

    fn from_parts(toml_cfg: TomlConfig, level_path: PathBuf) -> Self {
        GameConfig {
            physics: toml_cfg.physics.sanitize(),
            screen: toml_cfg.screen.sanitize(),
            timing: toml_cfg.timing.sanitize(),
            level_path,
        }
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable (symlinks resolved)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/blockdash)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/blockdash");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Relative level paths are looked up in the candidate dirs; the first
/// existing file wins, otherwise the path stays relative to CWD.
fn resolve_level_path(raw: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    search_dirs
        .iter()
        .map(|d| d.join(path))
        .find(|p| p.is_file())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => {
                    log::info!("loaded config from {}", path.display());
                    return cfg;
                }
                Err(e) => {
                    log::warn!("config.toml parse error: {e}; using default settings");
                    return TomlConfig::default();
                }
            },
            Err(e) => {
                log::warn!("could not read {}: {e}", path.display());
            }
        }
    }
    log::debug!("no config.toml found; using defaults");
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.physics.spin_rate, 450.0);
        assert!(cfg.physics.jump_velocity < 0.0);
        assert!((cfg.timing.max_frame_dt - 1.0 / 30.0).abs() < 1e-6);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            "[physics]\nforward_speed = 200.0\n\n[general]\nlevel_path = \"custom.txt\"\n",
        )
        .unwrap();
        assert_eq!(cfg.physics.forward_speed, 200.0);
        assert_eq!(cfg.physics.gravity, default_gravity());
        assert_eq!(cfg.screen, ScreenConfig::default());
        assert_eq!(cfg.level_path, PathBuf::from("custom.txt"));
    }

    #[test]
    fn upward_jump_is_forced_negative() {
        let cfg = GameConfig::from_toml_str("[physics]\njump_velocity = 500.0\n").unwrap();
        assert_eq!(cfg.physics.jump_velocity, -500.0);
    }

    #[test]
    fn non_positive_gravity_and_speed_are_repaired() {
        let cfg = GameConfig::from_toml_str("[physics]\ngravity = 0.0\nforward_speed = -330.0\n").unwrap();
        assert_eq!(cfg.physics.gravity, PhysicsConfig::default().gravity);
        assert_eq!(cfg.physics.forward_speed, PhysicsConfig::default().forward_speed);
    }

    #[test]
    fn bad_timing_is_repaired() {
        let cfg = GameConfig::from_toml_str("[timing]\nfps = 0\nmax_frame_dt = -1.0\n").unwrap();
        assert_eq!(cfg.timing, TimingConfig::default());
    }

    #[test]
    fn non_positive_screen_is_repaired() {
        let cfg = GameConfig::from_toml_str("[screen]\nwidth = 0\n").unwrap();
        assert_eq!(cfg.screen, ScreenConfig::default());
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(GameConfig::from_toml_str("[physics\n").is_err());
        assert!(GameConfig::from_toml_str("[physics]\ngravity = \"heavy\"\n").is_err());
    }

    #[test]
    fn bundled_config_matches_defaults() {
        let cfg = GameConfig::from_toml_str(include_str!("../config.toml")).unwrap();
        assert_eq!(cfg.physics, PhysicsConfig::default());
        assert_eq!(cfg.screen, ScreenConfig::default());
        assert_eq!(cfg.timing.fps, 60);
        assert_eq!(cfg.level_path, PathBuf::from("levels/level1.txt"));
    }

    #[test]
    fn absolute_level_path_is_untouched() {
        let p = resolve_level_path("/tmp/some/level.txt", &[PathBuf::from(".")]);
        assert_eq!(p, PathBuf::from("/tmp/some/level.txt"));
    }
}
