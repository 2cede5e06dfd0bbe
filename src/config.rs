//! Game configuration: playfield size, timer periods, and gameplay tuning.
//!
//! Every section is `#[serde(default)]`, so a RON file only needs to name
//! the values it overrides:
//!
//! ```text
//! (
//!     playfield: (width: 800, height: 600),
//!     timing: (enemy_step_ms: 200),
//! )
//! ```
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::entities::{ENEMY_HEIGHT, ENEMY_WIDTH, HERO_HEIGHT, HERO_WIDTH};
use crate::error::ConfigError;
use crate::intent::Intent;

// ── Sections ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayfieldConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

/// Timer periods, all in milliseconds.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Main loop period: intent application, collision pass, prune.
    pub tick_ms: u32,
    pub enemy_step_ms: u32,
    pub laser_step_ms: u32,
    pub cooldown_step_ms: u32,
    /// Lifetime of an explosion.
    pub explosion_ms: u32,
    /// Delay between a round ending and its banner appearing.
    pub banner_delay_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            enemy_step_ms: 300,
            laser_step_ms: 100,
            cooldown_step_ms: 100,
            explosion_ms: 300,
            banner_delay_ms: 200,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TuningConfig {
    /// Lateral pixels per tick while a direction is held.
    pub hero_speed: i32,
    /// Vertical pixels per `MoveUp`/`MoveDown`.
    pub hero_step: f32,
    pub enemy_step: f32,
    pub laser_step: f32,
    /// Laser spawn offset from the hero's top-left corner.
    pub laser_offset_x: f32,
    pub laser_offset_y: f32,
    pub cooldown: u32,
    pub cooldown_decay: u32,
    pub reward: u32,
    pub lives: u32,
    pub grid_columns: u32,
    pub grid_rows: u32,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            hero_speed: 10,
            hero_step: 5.0,
            enemy_step: 5.0,
            laser_step: 15.0,
            laser_offset_x: 45.0,
            laser_offset_y: -30.0,
            cooldown: 500,
            cooldown_decay: 100,
            reward: 100,
            lives: 3,
            grid_columns: 5,
            grid_rows: 5,
        }
    }
}

/// Terminal front-end settings. The simulation never reads these.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlsConfig {
    pub fps: u32,
    /// Frames a direction key counts as held after its last press/repeat,
    /// for terminals that never report key releases.
    pub hold_window_frames: u64,
    /// Key name → intent name, e.g. `"Left": "MoveLeftStart"`.
    pub bindings: BTreeMap<String, String>,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        let bindings = [
            ("Left", "MoveLeftStart"),
            ("a", "MoveLeftStart"),
            ("Right", "MoveRightStart"),
            ("d", "MoveRightStart"),
            ("Up", "MoveUp"),
            ("Down", "MoveDown"),
            ("Space", "Fire"),
            ("Enter", "StartOrRestart"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            fps: 30,
            hold_window_frames: 4,
            bindings,
        }
    }
}

impl ControlsConfig {
    /// Resolve the binding table, dropping entries whose intent name is
    /// unknown.
    pub fn resolved_bindings(&self) -> Vec<(String, Intent)> {
        self.bindings
            .iter()
            .filter_map(|(key, name)| match Intent::parse(name) {
                Some(intent) => Some((key.clone(), intent)),
                None => {
                    warn!(key = %key, intent = %name, "ignoring binding to unknown intent");
                    None
                }
            })
            .collect()
    }
}

// ── Root ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub playfield: PlayfieldConfig,
    pub timing: TimingConfig,
    pub tuning: TuningConfig,
    pub controls: ControlsConfig,
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Self = ron::from_str(&data).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load `path`, falling back to defaults. The second value carries the
    /// reason when the fallback was taken.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e.to_string())),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timing;
        for (field, value) in [
            ("timing.tick_ms", t.tick_ms),
            ("timing.enemy_step_ms", t.enemy_step_ms),
            ("timing.laser_step_ms", t.laser_step_ms),
            ("timing.cooldown_step_ms", t.cooldown_step_ms),
            ("timing.explosion_ms", t.explosion_ms),
        ] {
            if value == 0 {
                return Err(invalid(field, "period must be non-zero"));
            }
        }

        let u = &self.tuning;
        if u.lives == 0 {
            return Err(invalid("tuning.lives", "must be at least 1"));
        }
        if u.grid_columns == 0 || u.grid_rows == 0 {
            return Err(invalid("tuning.grid_columns", "enemy grid cannot be empty"));
        }
        if u.cooldown > 0 && u.cooldown_decay == 0 {
            return Err(invalid("tuning.cooldown_decay", "cooldown would never expire"));
        }

        let p = &self.playfield;
        if p.width < (u.grid_columns * ENEMY_WIDTH).max(HERO_WIDTH) {
            return Err(invalid(
                "playfield.width",
                format!("{} px cannot fit {} enemy columns", p.width, u.grid_columns),
            ));
        }
        if p.height < (u.grid_rows * ENEMY_HEIGHT).max(HERO_HEIGHT) {
            return Err(invalid(
                "playfield.height",
                format!("{} px cannot fit {} enemy rows", p.height, u.grid_rows),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
