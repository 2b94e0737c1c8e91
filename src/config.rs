//! Game configuration
//!
//! Loaded once at startup and handed to the simulation by reference. Nothing
//! in the core reads configuration from a global.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a configuration document
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Width and height of a rectangular hitbox
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Length of the rectangle's diagonal
    #[inline]
    pub fn diagonal(&self) -> f32 {
        (self.width * self.width + self.height * self.height).sqrt()
    }

    /// Half extents (half-width, half-height)
    #[inline]
    pub fn half_extents(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Tank tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TankConfig {
    /// Hitbox length along the heading (pixels)
    pub width: f32,
    /// Hitbox breadth across the heading (pixels)
    pub height: f32,
    /// Minimum time between two shots (seconds)
    pub reload_secs: f32,
    /// Forward speed (pixels/second)
    pub speed: f32,
    /// Turn rate (radians/second)
    pub turn_rate: f32,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            width: 30.0,
            height: 20.0,
            reload_secs: 1.0,
            speed: 90.0,
            turn_rate: 2.5,
        }
    }
}

impl TankConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Reload interval; negative or non-finite values mean no reload delay
    pub fn reload_interval(&self) -> Duration {
        Duration::try_from_secs_f32(self.reload_secs).unwrap_or_default()
    }
}

/// Shell (projectile) tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub width: f32,
    pub height: f32,
    /// Travel speed (pixels/second)
    pub speed: f32,
    /// Lifetime before the shell fizzles (seconds)
    pub ttl_secs: f32,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            width: 6.0,
            height: 4.0,
            speed: 300.0,
            ttl_secs: 2.0,
        }
    }
}

impl ShellConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Playfield bounds and respawn placement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
    /// Extra padding around each tank when checking spawn spots
    pub spawn_margin: f32,
    /// Random spots tried per tank before giving up on a clear one
    pub spawn_attempts: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            spawn_margin: 10.0,
            spawn_attempts: 64,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tank: TankConfig,
    pub shell: ShellConfig,
    pub arena: ArenaConfig,
}

impl GameConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded game config from {}", path.display());
        Ok(config)
    }

    /// Reject values the simulation cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("tank.width", self.tank.width)?;
        positive("tank.height", self.tank.height)?;
        positive("tank.reload_secs", self.tank.reload_secs)?;
        non_negative("tank.speed", self.tank.speed)?;
        non_negative("tank.turn_rate", self.tank.turn_rate)?;
        positive("shell.width", self.shell.width)?;
        positive("shell.height", self.shell.height)?;
        positive("shell.speed", self.shell.speed)?;
        positive("shell.ttl_secs", self.shell.ttl_secs)?;
        positive("arena.width", self.arena.width)?;
        positive("arena.height", self.arena.height)?;
        non_negative("arena.spawn_margin", self.arena.spawn_margin)?;
        if self.arena.width <= self.tank.size().diagonal()
            || self.arena.height <= self.tank.size().diagonal()
        {
            return Err(ConfigError::Invalid {
                field: "arena",
                reason: "arena must be larger than a tank".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a finite value > 0, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("expected a finite value >= 0, got {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json_str(r#"{"tank": {"width": 20, "height": 10}}"#)
            .expect("valid config");
        assert_eq!(config.tank.size(), Size::new(20.0, 10.0));
        assert_eq!(config.tank.reload_secs, TankConfig::default().reload_secs);
        assert_eq!(config.shell.width, ShellConfig::default().width);
    }

    #[test]
    fn test_rejects_non_positive_size() {
        let err = GameConfig::from_json_str(r#"{"shell": {"width": 0}}"#).unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "shell.width"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            GameConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            GameConfig::load("/nonexistent/tank-arena.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_reload_interval_never_panics() {
        for reload_secs in [-1.0, f32::NAN, f32::INFINITY] {
            let config = TankConfig {
                reload_secs,
                ..TankConfig::default()
            };
            assert_eq!(config.reload_interval(), Duration::ZERO);
        }
    }

    #[test]
    fn test_diagonal() {
        assert!((Size::new(3.0, 4.0).diagonal() - 5.0).abs() < 1e-6);
    }
}
