//! Tank state and derived geometry

use std::time::{Duration, Instant};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::shape::{Hitbox, ShapeKind, oriented_rect};
use crate::config::{Size, TankConfig};
use crate::consts::*;
use crate::{heading_to_screen, normalize_angle};

/// A player-controlled tank
#[derive(Debug, Clone)]
pub struct Tank {
    /// Center of the hitbox (screen space, y grows downward)
    pub pos: Vec2,
    /// Facing in radians from +x, counter-clockwise
    heading: f32,
    pub moving: bool,
    /// Dead tanks must be left out of collision checks
    pub alive: bool,
    /// Kills in the current round
    pub kills: u32,
    /// Rounds won this session
    pub wins: u32,
    /// Free-form text from the tank's controller (author, bot name)
    pub info: String,
    /// Time of the last shot; `None` until the tank fires after a spawn
    last_shot: Option<Instant>,
    size: Size,
    reload: Duration,
}

/// Publicly observable tank fields.
///
/// The shot timer has no field here, so no snapshot can carry it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankSnapshot {
    pub x: f32,
    pub y: f32,
    pub heading: f32,
    pub moving: bool,
    pub alive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kills: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wins: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl TankSnapshot {
    /// Key/value form for the transport layer
    pub fn into_map(self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            // A struct of plain fields always serializes to an object
            _ => Map::new(),
        }
    }
}

impl Tank {
    pub fn new(config: &TankConfig) -> Self {
        Self {
            pos: Vec2::new(UNPLACED_X, UNPLACED_Y),
            heading: 0.0,
            moving: false,
            alive: false,
            kills: 0,
            wins: 0,
            info: DEFAULT_TANK_INFO.to_string(),
            last_shot: None,
            size: config.size(),
            reload: config.reload_interval(),
        }
    }

    pub fn with_info(config: &TankConfig, info: impl Into<String>) -> Self {
        Self {
            info: info.into(),
            ..Self::new(config)
        }
    }

    /// Reset per-round state. Position, wins and info are kept.
    pub fn spawn(&mut self) {
        self.heading = 0.0;
        self.moving = false;
        self.alive = true;
        self.kills = 0;
        self.last_shot = None;
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Set the heading, wrapped to [-π, π)
    pub fn set_heading(&mut self, heading: f32) {
        self.heading = normalize_angle(heading);
    }

    pub fn turn(&mut self, delta: f32) {
        self.set_heading(self.heading + delta);
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Whether the reload interval has passed since the last shot
    pub fn can_shoot(&self) -> bool {
        self.can_shoot_at(Instant::now())
    }

    pub fn can_shoot_at(&self, now: Instant) -> bool {
        match self.last_shot {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.reload,
        }
    }

    /// Record a shot. Callers check [`Tank::can_shoot`] first; this does not.
    pub fn did_shoot(&mut self) {
        self.did_shoot_at(Instant::now());
    }

    pub fn did_shoot_at(&mut self, now: Instant) {
        // Never move the timer backwards
        self.last_shot = Some(match self.last_shot {
            Some(last) => last.max(now),
            None => now,
        });
    }

    /// Translate along the heading (screen space: positive heading moves up)
    pub fn move_by(&mut self, distance: f32) {
        self.pos += heading_to_screen(self.heading) * distance;
    }

    /// Point just ahead of the tank's front edge, where shells leave the barrel
    pub fn muzzle(&self, clearance: f32) -> Vec2 {
        self.pos + heading_to_screen(self.heading) * (self.size.width / 2.0 + clearance)
    }

    /// Observable state. `clean` hides kills, wins and info (opponent view).
    pub fn snapshot(&self, clean: bool) -> TankSnapshot {
        let mut snapshot = TankSnapshot {
            x: self.pos.x,
            y: self.pos.y,
            heading: self.heading,
            moving: self.moving,
            alive: self.alive,
            kills: Some(self.kills),
            wins: Some(self.wins),
            info: Some(self.info.clone()),
        };
        if clean {
            snapshot.kills = None;
            snapshot.wins = None;
            snapshot.info = None;
        }
        snapshot
    }
}

impl Hitbox for Tank {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Tank
    }

    fn to_polygon(&self, margin: f32) -> [Vec2; 4] {
        oriented_rect(self.pos, self.size, self.heading, margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::{compute_max_dist, has_collided, within_broad_phase};
    use crate::sim::shape::centroid;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    fn config_20x10() -> TankConfig {
        TankConfig {
            width: 20.0,
            height: 10.0,
            ..TankConfig::default()
        }
    }

    #[test]
    fn test_new_tank_is_unspawned() {
        let tank = Tank::new(&TankConfig::default());
        assert!(!tank.alive);
        assert_eq!(tank.pos, Vec2::new(UNPLACED_X, UNPLACED_Y));
        assert_eq!(tank.info, DEFAULT_TANK_INFO);
    }

    #[test]
    fn test_spawn_resets_round_state() {
        let mut tank = Tank::with_info(&TankConfig::default(), "bot-7");
        tank.pos = Vec2::new(40.0, 50.0);
        tank.set_heading(1.2);
        tank.moving = true;
        tank.kills = 3;
        tank.wins = 2;
        tank.did_shoot();

        tank.spawn();

        assert!(tank.alive);
        assert!(!tank.moving);
        assert_eq!(tank.heading(), 0.0);
        assert_eq!(tank.kills, 0);
        assert!(tank.can_shoot());
        assert_eq!(tank.pos, Vec2::new(40.0, 50.0));
        assert_eq!(tank.wins, 2);
        assert_eq!(tank.info, "bot-7");
    }

    #[test]
    fn test_reload_gate() {
        let config = TankConfig::default();
        let mut tank = Tank::new(&config);
        tank.spawn();

        let now = Instant::now();
        assert!(tank.can_shoot_at(now));
        tank.did_shoot_at(now);
        assert!(!tank.can_shoot_at(now));
        assert!(!tank.can_shoot_at(now + config.reload_interval() / 2));
        assert!(tank.can_shoot_at(now + config.reload_interval()));
    }

    #[test]
    fn test_negative_reload_means_no_delay() {
        let config = TankConfig {
            reload_secs: -1.0,
            ..TankConfig::default()
        };
        let mut tank = Tank::new(&config);
        tank.spawn();
        let now = Instant::now();
        tank.did_shoot_at(now);
        assert!(tank.can_shoot_at(now));
    }

    #[test]
    fn test_did_shoot_is_monotonic() {
        let config = TankConfig::default();
        let mut tank = Tank::new(&config);
        let later = Instant::now() + Duration::from_secs(5);
        tank.did_shoot_at(later);
        tank.did_shoot_at(Instant::now());
        assert!(!tank.can_shoot_at(later + config.reload_interval() / 2));
    }

    #[test]
    fn test_move_heading_zero() {
        let mut tank = Tank::new(&TankConfig::default());
        tank.pos = Vec2::new(1.0, 2.0);
        tank.move_by(5.0);
        assert!((tank.pos.x - 6.0).abs() < 1e-6);
        assert_eq!(tank.pos.y, 2.0);
    }

    #[test]
    fn test_move_heading_up_decreases_y() {
        let mut tank = Tank::new(&TankConfig::default());
        tank.pos = Vec2::new(1.0, 2.0);
        tank.set_heading(FRAC_PI_2);
        tank.move_by(5.0);
        assert!((tank.pos.x - 1.0).abs() < 1e-5);
        assert!((tank.pos.y - (-3.0)).abs() < 1e-5);
    }

    #[test]
    fn test_heading_stays_finite() {
        let mut tank = Tank::new(&TankConfig::default());
        tank.turn(f32::NAN);
        assert!(tank.heading().is_finite());
        tank.turn(100.0);
        assert!(tank.heading().abs() <= std::f32::consts::PI);
    }

    #[test]
    fn test_clean_snapshot_hides_score_and_info() {
        let mut tank = Tank::with_info(&TankConfig::default(), "someone");
        tank.spawn();
        let map = tank.snapshot(true).into_map();
        for key in ["x", "y", "heading", "moving", "alive"] {
            assert!(map.contains_key(key), "missing {key}");
        }
        for key in ["kills", "wins", "info", "last_shot"] {
            assert!(!map.contains_key(key), "leaked {key}");
        }
    }

    #[test]
    fn test_owner_snapshot_has_score_but_no_timer() {
        let mut tank = Tank::with_info(&TankConfig::default(), "someone");
        tank.spawn();
        tank.did_shoot();
        tank.wins = 4;
        let map = tank.snapshot(false).into_map();
        assert_eq!(map["kills"], 0);
        assert_eq!(map["wins"], 4);
        assert_eq!(map["info"], "someone");
        assert_eq!(map.len(), 8);
        assert!(!map.keys().any(|k| k.contains("shot")));
    }

    #[test]
    fn test_polygon_scenario() {
        let config = config_20x10();
        let mut a = Tank::new(&config);
        a.pos = Vec2::ZERO;
        a.spawn();
        let poly = a.to_polygon(0.0);
        let expected = [
            Vec2::new(-10.0, -5.0),
            Vec2::new(10.0, -5.0),
            Vec2::new(10.0, 5.0),
            Vec2::new(-10.0, 5.0),
        ];
        for (got, want) in poly.iter().zip(expected) {
            assert!(got.distance(want) < 1e-5);
        }

        let max_dist = compute_max_dist(config.size(), config.size());
        let mut b = Tank::new(&config);
        b.spawn();
        b.pos = Vec2::new(100.0, 0.0);
        assert!(!within_broad_phase(&poly, &b.to_polygon(0.0), max_dist));
        assert!(!has_collided(&poly, &b.to_polygon(0.0), Some(max_dist)));

        b.pos = Vec2::new(15.0, 0.0);
        assert!(has_collided(&poly, &b.to_polygon(0.0), Some(max_dist)));
    }

    proptest! {
        #[test]
        fn prop_polygon_centroid_is_position(
            x in -500.0f32..500.0,
            y in -500.0f32..500.0,
            heading in -10.0f32..10.0
        ) {
            let mut tank = Tank::new(&TankConfig::default());
            tank.pos = Vec2::new(x, y);
            tank.set_heading(heading);
            let c = centroid(&tank.to_polygon(0.0));
            prop_assert!(c.distance(tank.pos) < 1e-3);
        }

        #[test]
        fn prop_margin_strictly_contains(heading in -3.2f32..3.2, margin in 0.1f32..10.0) {
            let mut tank = Tank::new(&TankConfig::default());
            tank.pos = Vec2::new(12.0, -7.0);
            tank.set_heading(heading);
            let outer = tank.to_polygon(margin);
            // Corners wind counter-clockwise, so interior points sit left of every edge
            for corner in tank.to_polygon(0.0) {
                for i in 0..4 {
                    let start = outer[i];
                    let edge = outer[(i + 1) % 4] - start;
                    prop_assert!(edge.perp_dot(corner - start) > 0.0);
                }
            }
            prop_assert!(has_collided(&tank.to_polygon(0.0), &outer, None));
        }
    }
}
