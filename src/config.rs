/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Values that would stall or break the simulation are clamped with a warning.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

// ── Public Config Structs ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub physics: PhysicsConfig,
    pub playfield: PlayfieldConfig,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    pub sim_tick_ms: u64,
    pub spawn_tick_ms: u64,
    pub max_frame_ms: u64, // cap on wall-clock time replayed per frame
}

impl TimingConfig {
    pub fn sim_interval(&self) -> Duration { Duration::from_millis(self.sim_tick_ms) }
    pub fn spawn_interval(&self) -> Duration { Duration::from_millis(self.spawn_tick_ms) }
    pub fn max_frame(&self) -> Duration { Duration::from_millis(self.max_frame_ms) }
}

/// Discrete-step kinematics, all in playfield units per simulation tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicsConfig {
    pub gravity_step: i32,
    pub jump_height: i32,
    pub obstacle_speed: i32,
}

/// Playfield geometry in abstract units. Y grows downward from the top edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayfieldConfig {
    pub width: i32,
    pub height: i32,
    pub ground_offset: i32, // ground line = height - ground_offset
    pub player_x: i32,
    pub player_size: i32,
    pub obstacle_width: i32,
    pub obstacle_height: i32,
}

impl PlayfieldConfig {
    /// Y of the ground line: where a grounded player's top edge sits and
    /// where every obstacle is spawned.
    #[inline]
    pub fn ground_y(&self) -> i32 {
        self.height - self.ground_offset
    }
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub restart: Vec<String>,
    pub pause: Vec<String>,
    pub quit: Vec<String>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            sim_tick_ms: default_sim_tick(),
            spawn_tick_ms: default_spawn_tick(),
            max_frame_ms: default_max_frame(),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity_step: default_gravity_step(),
            jump_height: default_jump_height(),
            obstacle_speed: default_obstacle_speed(),
        }
    }
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        PlayfieldConfig {
            width: default_width(),
            height: default_height(),
            ground_offset: default_ground_offset(),
            player_x: default_player_x(),
            player_size: default_player_size(),
            obstacle_width: default_obstacle_width(),
            obstacle_height: default_obstacle_height(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    playfield: TomlPlayfield,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_sim_tick")]
    sim_tick_ms: u64,
    #[serde(default = "default_spawn_tick")]
    spawn_tick_ms: u64,
    #[serde(default = "default_max_frame")]
    max_frame_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_gravity_step")]
    gravity_step: i32,
    #[serde(default = "default_jump_height")]
    jump_height: i32,
    #[serde(default = "default_obstacle_speed")]
    obstacle_speed: i32,
}

#[derive(Deserialize, Debug)]
struct TomlPlayfield {
    #[serde(default = "default_width")]
    width: i32,
    #[serde(default = "default_height")]
    height: i32,
    #[serde(default = "default_ground_offset")]
    ground_offset: i32,
    #[serde(default = "default_player_x")]
    player_x: i32,
    #[serde(default = "default_player_size")]
    player_size: i32,
    #[serde(default = "default_obstacle_width")]
    obstacle_width: i32,
    #[serde(default = "default_obstacle_height")]
    obstacle_height: i32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pad_jump")]
    jump: Vec<String>,
    #[serde(default = "default_pad_restart")]
    restart: Vec<String>,
    #[serde(default = "default_pad_pause")]
    pause: Vec<String>,
    #[serde(default = "default_pad_quit")]
    quit: Vec<String>,
}

// ── Defaults ──

fn default_sim_tick() -> u64 { 30 }
fn default_spawn_tick() -> u64 { 2000 }
fn default_max_frame() -> u64 { 250 }

fn default_gravity_step() -> i32 { 6 }
fn default_jump_height() -> i32 { 120 }
fn default_obstacle_speed() -> i32 { 5 }

fn default_width() -> i32 { 800 }
fn default_height() -> i32 { 400 }
fn default_ground_offset() -> i32 { 150 }
fn default_player_x() -> i32 { 50 }
fn default_player_size() -> i32 { 40 }
fn default_obstacle_width() -> i32 { 40 }
fn default_obstacle_height() -> i32 { 40 }

fn default_pad_jump() -> Vec<String> { vec!["A".into(), "B".into()] }
fn default_pad_restart() -> Vec<String> { vec!["Start".into()] }
fn default_pad_pause() -> Vec<String> { vec!["Y".into()] }
fn default_pad_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            sim_tick_ms: default_sim_tick(),
            spawn_tick_ms: default_spawn_tick(),
            max_frame_ms: default_max_frame(),
        }
    }
}

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            gravity_step: default_gravity_step(),
            jump_height: default_jump_height(),
            obstacle_speed: default_obstacle_speed(),
        }
    }
}

impl Default for TomlPlayfield {
    fn default() -> Self {
        TomlPlayfield {
            width: default_width(),
            height: default_height(),
            ground_offset: default_ground_offset(),
            player_x: default_player_x(),
            player_size: default_player_size(),
            obstacle_width: default_obstacle_width(),
            obstacle_height: default_obstacle_height(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_pad_jump(),
            restart: default_pad_restart(),
            pause: default_pad_pause(),
            quit: default_pad_quit(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        match read_config_text(&candidate_dirs()) {
            Some(text) => GameConfig::parse(&text),
            None => GameConfig::default(),
        }
    }

    /// Parse a config from TOML text. Parse errors fall back to defaults.
    pub fn parse(text: &str) -> Self {
        match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => GameConfig::from_toml(cfg),
            Err(e) => {
                log::warn!("config.toml parse error: {e}; using default settings");
                GameConfig::default()
            }
        }
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let timing = TimingConfig {
            sim_tick_ms: at_least("timing.sim_tick_ms", cfg.timing.sim_tick_ms, 1),
            spawn_tick_ms: at_least("timing.spawn_tick_ms", cfg.timing.spawn_tick_ms, 1),
            max_frame_ms: at_least("timing.max_frame_ms", cfg.timing.max_frame_ms, 1),
        };
        let physics = PhysicsConfig {
            gravity_step: clamp_to("physics.gravity_step", cfg.physics.gravity_step, 1, MAX_EXTENT),
            jump_height: clamp_to("physics.jump_height", cfg.physics.jump_height, 1, MAX_EXTENT),
            obstacle_speed: clamp_to("physics.obstacle_speed", cfg.physics.obstacle_speed, 1, MAX_EXTENT),
        };

        let p = &cfg.playfield;
        let width = clamp_to("playfield.width", p.width, 1, MAX_EXTENT);
        let height = clamp_to("playfield.height", p.height, 1, MAX_EXTENT);
        let playfield = PlayfieldConfig {
            width,
            height,
            // Ground line must lie inside the playfield.
            ground_offset: clamp_to("playfield.ground_offset", p.ground_offset, 0, height),
            player_x: clamp_to("playfield.player_x", p.player_x, 0, width),
            player_size: clamp_to("playfield.player_size", p.player_size, 1, MAX_EXTENT),
            obstacle_width: clamp_to("playfield.obstacle_width", p.obstacle_width, 1, MAX_EXTENT),
            obstacle_height: clamp_to("playfield.obstacle_height", p.obstacle_height, 1, MAX_EXTENT),
        };

        GameConfig {
            timing,
            physics,
            playfield,
            gamepad: GamepadConfig {
                jump: cfg.gamepad.jump,
                restart: cfg.gamepad.restart,
                pause: cfg.gamepad.pause,
                quit: cfg.gamepad.quit,
            },
        }
    }
}

/// Upper bound for every length and step in playfield units. Far above any
/// playable value, and small enough that sums of a few of them fit in i32.
const MAX_EXTENT: i32 = 100_000;

fn at_least<T: PartialOrd + Copy + std::fmt::Display>(key: &str, value: T, min: T) -> T {
    if value < min {
        log::warn!("config {key} = {value} is below {min}; clamped");
        min
    } else {
        value
    }
}

fn clamp_to(key: &str, value: i32, min: i32, max: i32) -> i32 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::warn!("config {key} = {value} is outside {min}..={max}; clamped to {clamped}");
    }
    clamped
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so an installed link still finds the real config.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories and return its text.
fn read_config_text(search_dirs: &[PathBuf]) -> Option<String> {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                log::info!("using {}", path.display());
                return Some(text);
            }
            Err(e) => log::warn!("could not read {}: {e}", path.display()),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_tuning() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.timing.sim_tick_ms, 30);
        assert_eq!(cfg.timing.spawn_tick_ms, 2000);
        assert_eq!(cfg.physics, PhysicsConfig { gravity_step: 6, jump_height: 120, obstacle_speed: 5 });
        assert_eq!(cfg.playfield.ground_y(), 250);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = GameConfig::parse("[physics]\njump_height = 90\n");
        assert_eq!(cfg.physics.jump_height, 90);
        assert_eq!(cfg.physics.gravity_step, 6);
        assert_eq!(cfg.playfield.width, 800);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let cfg = GameConfig::parse("this is = = not toml");
        assert_eq!(cfg.physics, PhysicsConfig::default());
    }

    #[test]
    fn degenerate_values_are_clamped() {
        let cfg = GameConfig::parse(
            "[timing]\nsim_tick_ms = 0\n[physics]\ngravity_step = 0\nobstacle_speed = -3\n\
             [playfield]\nheight = 100\nground_offset = 500\n",
        );
        assert_eq!(cfg.timing.sim_tick_ms, 1);
        assert_eq!(cfg.physics.gravity_step, 1);
        assert_eq!(cfg.physics.obstacle_speed, 1);
        assert_eq!(cfg.playfield.ground_offset, 100);
        assert_eq!(cfg.playfield.ground_y(), 0);
    }

    #[test]
    fn huge_values_are_clamped() {
        let cfg = GameConfig::parse(
            "[physics]\njump_height = 2147483647\nobstacle_speed = 2147483647\n\
             [playfield]\nwidth = 2147483647\nheight = 2147483647\nplayer_size = 2147483647\n\
             obstacle_width = 2147483647\nobstacle_height = 2147483647\n",
        );
        assert_eq!(cfg.physics.jump_height, MAX_EXTENT);
        assert_eq!(cfg.physics.obstacle_speed, MAX_EXTENT);
        assert_eq!(cfg.playfield.width, MAX_EXTENT);
        assert_eq!(cfg.playfield.height, MAX_EXTENT);
        assert_eq!(cfg.playfield.player_size, MAX_EXTENT);
        assert_eq!(cfg.playfield.obstacle_width, MAX_EXTENT);
        assert_eq!(cfg.playfield.obstacle_height, MAX_EXTENT);
    }

    #[test]
    fn huge_playfield_runs_without_overflow() {
        use crate::sim::session::Session;
        use std::time::Duration;

        let cfg = GameConfig::parse("[playfield]\nwidth = 2147483647\n");
        let mut session = Session::new(&cfg);
        for _ in 0..20 {
            session.advance(Duration::from_millis(250));
        }
        assert!(!session.snapshot().obstacles.is_empty());
    }

    #[test]
    fn gamepad_lists_override_per_action() {
        let cfg = GameConfig::parse("[gamepad]\njump = [\"X\"]\n");
        assert_eq!(cfg.gamepad.jump, vec!["X".to_string()]);
        assert_eq!(cfg.gamepad.quit, vec!["Select".to_string()]);
    }
}
