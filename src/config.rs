/// External configuration loader.
///
/// Reads `wordfall.toml` from the executable's directory (or CWD, or
/// `~/.config/wordfall`). Falls back to sensible defaults if the file is
/// missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::collision::LandingPolicy;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct FallConfig {
    pub spawn: SpawnConfig,
    pub look: LookConfig,
    pub collision: CollisionConfig,
    pub timing: TimingConfig,
    pub log: LogConfig,
}

#[derive(Clone, Debug)]
pub struct SpawnConfig {
    pub cadence_frames: u64,  // spawn roll happens once every N frames
    pub chance: f64,          // probability of a spawn on an eligible frame
    pub speed_min: f32,
    pub speed_max: f32,
    pub tilt: f32,            // initial rotation in [-tilt, tilt]
    pub spin: f32,            // rotation speed in [-spin, spin]
    pub start_y: f32,
    pub padding: f32,         // added to text width, and kept clear at both canvas edges
}

/// When the floor strip is drawn.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloorMode {
    /// Only for the first `floor_intro_secs` after startup.
    Intro,
    Always,
}

#[derive(Clone, Debug)]
pub struct LookConfig {
    pub gray_min: u8,
    pub gray_max: u8,
    pub floor: FloorMode,
    pub floor_intro: Duration,
    pub word_height: f32,
    pub floor_offset: f32,
    pub stroke_gray: u8,
    pub text_gray: u8,
    pub floor_gray: u8,
    pub corner_radius: f32,
    pub text_inset: f32,
}

#[derive(Clone, Debug)]
pub struct CollisionConfig {
    pub min_gap: f32,
    pub policy: LandingPolicy,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub frame: Duration,
    pub timer_period: Duration,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    /// Empty path disables logging.
    pub file: Option<PathBuf>,
    pub level: log::LevelFilter,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    spawn: TomlSpawn,
    #[serde(default)]
    look: TomlLook,
    #[serde(default)]
    collision: TomlCollision,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlSpawn {
    #[serde(default = "default_cadence")]
    cadence_frames: u64,
    #[serde(default = "default_chance")]
    chance: f64,
    #[serde(default = "default_speed_min")]
    speed_min: f32,
    #[serde(default = "default_speed_max")]
    speed_max: f32,
    #[serde(default = "default_tilt")]
    tilt: f32,
    #[serde(default = "default_spin")]
    spin: f32,
    #[serde(default = "default_start_y")]
    start_y: f32,
    #[serde(default = "default_padding")]
    padding: f32,
}

#[derive(Deserialize, Debug)]
struct TomlLook {
    #[serde(default = "default_gray_min")]
    gray_min: u8,
    #[serde(default = "default_gray_max")]
    gray_max: u8,
    #[serde(default = "default_floor")]
    floor: FloorMode,
    #[serde(default = "default_floor_intro")]
    floor_intro_secs: u64,
    #[serde(default = "default_word_height")]
    word_height: f32,
    #[serde(default = "default_floor_offset")]
    floor_offset: f32,
    #[serde(default = "default_stroke_gray")]
    stroke_gray: u8,
    #[serde(default = "default_text_gray")]
    text_gray: u8,
    #[serde(default = "default_floor_gray")]
    floor_gray: u8,
    #[serde(default = "default_corner_radius")]
    corner_radius: f32,
    #[serde(default = "default_text_inset")]
    text_inset: f32,
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum TomlPolicy {
    First,
    Nearest,
}

#[derive(Deserialize, Debug)]
struct TomlCollision {
    #[serde(default = "default_min_gap")]
    min_gap: f32,
    #[serde(default = "default_policy")]
    policy: TomlPolicy,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
    #[serde(default = "default_timer_period")]
    timer_period_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default)]
    file: String,
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

fn default_cadence() -> u64 { 10 }
fn default_chance() -> f64 { 0.3 }
fn default_speed_min() -> f32 { 1.0 }
fn default_speed_max() -> f32 { 3.0 }
fn default_tilt() -> f32 { 0.1 }
fn default_spin() -> f32 { 0.02 }
fn default_start_y() -> f32 { -40.0 }
fn default_padding() -> f32 { 20.0 }

fn default_gray_min() -> u8 { 50 }    // the brighter variant uses 75..225
fn default_gray_max() -> u8 { 200 }
fn default_floor() -> FloorMode { FloorMode::Intro }
fn default_floor_intro() -> u64 { 10 }
fn default_word_height() -> f32 { 40.0 }
fn default_floor_offset() -> f32 { 20.0 }
fn default_stroke_gray() -> u8 { 100 }
fn default_text_gray() -> u8 { 255 }
fn default_floor_gray() -> u8 { 50 }
fn default_corner_radius() -> f32 { 3.0 }
fn default_text_inset() -> f32 { 10.0 }

fn default_min_gap() -> f32 { 5.0 }
fn default_policy() -> TomlPolicy { TomlPolicy::First }

fn default_frame_ms() -> u64 { 16 }
fn default_timer_period() -> u64 { 1000 }

fn default_log_level() -> String { "info".into() }

impl Default for TomlSpawn {
    fn default() -> Self {
        TomlSpawn {
            cadence_frames: default_cadence(),
            chance: default_chance(),
            speed_min: default_speed_min(),
            speed_max: default_speed_max(),
            tilt: default_tilt(),
            spin: default_spin(),
            start_y: default_start_y(),
            padding: default_padding(),
        }
    }
}

impl Default for TomlLook {
    fn default() -> Self {
        TomlLook {
            gray_min: default_gray_min(),
            gray_max: default_gray_max(),
            floor: default_floor(),
            floor_intro_secs: default_floor_intro(),
            word_height: default_word_height(),
            floor_offset: default_floor_offset(),
            stroke_gray: default_stroke_gray(),
            text_gray: default_text_gray(),
            floor_gray: default_floor_gray(),
            corner_radius: default_corner_radius(),
            text_inset: default_text_inset(),
        }
    }
}

impl Default for TomlCollision {
    fn default() -> Self {
        TomlCollision {
            min_gap: default_min_gap(),
            policy: default_policy(),
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            frame_ms: default_frame_ms(),
            timer_period_ms: default_timer_period(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog {
            file: String::new(),
            level: default_log_level(),
        }
    }
}

// ── Loading ──

impl Default for FallConfig {
    fn default() -> Self {
        FallConfig::from_toml(TomlConfig::default())
    }
}

impl FallConfig {
    /// Load config from `wordfall.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) `~/.config/wordfall`.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        FallConfig::from_toml(load_toml(&candidate_dirs()))
    }

    /// Parse a config document. Errors fall back to defaults, like `load`.
    #[cfg(test)]
    pub fn parse(text: &str) -> Self {
        match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => FallConfig::from_toml(cfg),
            Err(_) => FallConfig::default(),
        }
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let s = cfg.spawn;
        let (speed_min, speed_max) = ordered(s.speed_min.abs(), s.speed_max.abs());
        let (gray_min, gray_max) = if cfg.look.gray_min <= cfg.look.gray_max {
            (cfg.look.gray_min, cfg.look.gray_max)
        } else {
            (cfg.look.gray_max, cfg.look.gray_min)
        };

        let level = cfg.log.level.parse::<log::LevelFilter>().unwrap_or_else(|_| {
            eprintln!("Warning: unknown log level {:?}, using info", cfg.log.level);
            log::LevelFilter::Info
        });
        let file = if cfg.log.file.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(cfg.log.file.trim()))
        };

        FallConfig {
            spawn: SpawnConfig {
                cadence_frames: s.cadence_frames.max(1),
                chance: if s.chance.is_nan() { 0.0 } else { s.chance.clamp(0.0, 1.0) },
                // speed must stay positive so y keeps advancing
                speed_min: speed_min.max(0.01),
                speed_max: speed_max.max(0.01),
                tilt: s.tilt.abs(),
                spin: s.spin.abs(),
                start_y: s.start_y,
                padding: s.padding.max(0.0),
            },
            look: LookConfig {
                gray_min,
                gray_max,
                floor: cfg.look.floor,
                floor_intro: Duration::from_secs(cfg.look.floor_intro_secs),
                word_height: cfg.look.word_height.max(1.0),
                floor_offset: cfg.look.floor_offset.max(0.0),
                stroke_gray: cfg.look.stroke_gray,
                text_gray: cfg.look.text_gray,
                floor_gray: cfg.look.floor_gray,
                corner_radius: cfg.look.corner_radius.max(0.0),
                text_inset: cfg.look.text_inset.max(0.0),
            },
            collision: CollisionConfig {
                min_gap: cfg.collision.min_gap,
                policy: match cfg.collision.policy {
                    TomlPolicy::First => LandingPolicy::First,
                    TomlPolicy::Nearest => LandingPolicy::Nearest,
                },
            },
            timing: TimingConfig {
                frame: Duration::from_millis(cfg.timing.frame_ms.max(1)),
                timer_period: Duration::from_millis(cfg.timing.timer_period_ms.max(1)),
            },
            log: LogConfig { file, level },
        }
    }
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Candidate directories to search: exe dir + CWD + user config dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
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

    // 3. ~/.config/wordfall
    if let Ok(home) = std::env::var("HOME") {
        let user = PathBuf::from(&home).join(".config/wordfall");
        if user.is_dir() && !dirs.iter().any(|d| d == &user) {
            dirs.push(user);
        }
    }

    dirs
}

/// Search for wordfall.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("wordfall.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: wordfall.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
