//! Tank Arena - simulation core for a multiplayer tank battle game
//!
//! Core modules:
//! - `config`: Startup constants (tank/shell sizes, reload interval, arena bounds)
//! - `sim`: Entity state, hitbox polygons, SAT collision engine and a reference tick

pub mod config;
pub mod sim;

pub use config::{ArenaConfig, ConfigError, GameConfig, ShellConfig, Size, TankConfig};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (30 Hz server tick)
    pub const SIM_DT: f32 = 1.0 / 30.0;

    /// Where freshly constructed tanks wait until placed by a round start
    pub const UNPLACED_X: f32 = -100.0;
    pub const UNPLACED_Y: f32 = -100.0;

    /// Display string used until a controller supplies its own
    pub const DEFAULT_TANK_INFO: &str = "This player has not provided any info.";
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    if !angle.is_finite() {
        return 0.0;
    }
    // Already wrapped angles come back bit-identical
    if (-PI..PI).contains(&angle) {
        return angle;
    }
    angle = angle.rem_euclid(2.0 * PI);
    if angle >= PI {
        angle -= 2.0 * PI;
    }
    angle
}

/// Unit vector for a heading in screen space (y grows downward)
#[inline]
pub fn heading_to_screen(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), -heading.sin())
}
