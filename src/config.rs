//! Game configuration loaded from JSON
//!
//! Every field has a default, so a config file only needs to list the values
//! it wants to change. The binary looks for a file in this order:
//! 1. the `--config` path given on the command line
//! 2. `~/.arena3d/config.json`
//! 3. built-in defaults

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "arena3d".to_string(),
            width: 960,
            height: 540,
            fullscreen: false,
        }
    }
}

/// Resolution of the software framebuffer. SDL stretches it to the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub clear_color: Vec3,
    pub ambient_color: Vec3,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: 320,
            height: 180,
            clear_color: Vec3::new(0.05, 0.075, 0.1),
            ambient_color: Vec3::new(0.1, 0.05, 0.075),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 200.0,
            position: Vec3::new(0.0, 1.5, 8.0),
        }
    }
}

/// Tuning values for the player and the projectiles it fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub move_speed: f32,
    pub turn_speed_degrees: f32,
    pub jump_speed: f32,
    pub max_health: f32,
    pub bullet_speed: f32,
    pub bullet_lifetime_ticks: u32,
    pub grenade_force: f32,
    /// Ticks before a thrown grenade detonates. 0 means "explode on impact".
    pub grenade_fuse_ticks: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            move_speed: 0.15,
            turn_speed_degrees: 3.0,
            jump_speed: 0.25,
            max_health: 100.0,
            bullet_speed: 1.0,
            bullet_lifetime_ticks: 20,
            grenade_force: 0.5,
            grenade_fuse_ticks: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub camera: CameraConfig,
    pub player: PlayerConfig,
    pub tick_rate_hz: u32,
    /// Velocity change applied to falling bodies every tick.
    pub gravity: Vec3,
    pub level_duration_secs: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            window: WindowConfig::default(),
            render: RenderConfig::default(),
            camera: CameraConfig::default(),
            player: PlayerConfig::default(),
            tick_rate_hz: 30,
            gravity: Vec3::new(0.0, -0.015, 0.0),
            level_duration_secs: 300,
        }
    }
}

impl GameConfig {
    /// Loads and validates a config file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Resolves the config to use at startup.
    ///
    /// An explicit path must load; the per-user file is optional and falls
    /// back to defaults when it is missing.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            log::info!("Loading config from {}", path.display());
            return Self::load_from_file(path);
        }

        match Self::user_config_path() {
            Some(path) if path.exists() => {
                log::info!("Loading config from {}", path.display());
                Self::load_from_file(&path)
            }
            _ => {
                log::warn!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// `~/.arena3d/config.json`, when a home directory is known.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".arena3d").join("config.json"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::Invalid("tick_rate_hz must be positive".to_string()));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero".to_string()));
        }
        if self.render.width == 0 || self.render.height == 0 {
            return Err(ConfigError::Invalid("render size must be non-zero".to_string()));
        }
        if !(self.camera.near > 0.0 && self.camera.near < self.camera.far) {
            return Err(ConfigError::Invalid(format!(
                "camera planes must satisfy 0 < near < far (near={}, far={})",
                self.camera.near, self.camera.far
            )));
        }
        Ok(())
    }

    /// Time between two simulation ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate_hz.max(1)))
    }

    /// Level length expressed in ticks.
    pub fn level_duration_ticks(&self) -> u64 {
        u64::from(self.level_duration_secs) * u64::from(self.tick_rate_hz)
    }
}
