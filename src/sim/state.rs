//! Arena state: tanks, shells and the round lifecycle
//!
//! Everything a match needs between ticks lives here. Respawn placement uses a
//! seeded RNG so the same seed always produces the same layout.

use std::time::{Duration, Instant};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{MaxDistTable, compute_max_dist, has_collided};
use super::shape::{Hitbox, oriented_rect};
use super::shell::Shell;
use super::tank::{Tank, TankSnapshot};
use crate::config::{GameConfig, Size};

/// A match in progress
///
/// Reload timers of arena tanks run on the simulation clock ([`Arena::now`]),
/// not the wall clock. Code outside [`tick`](super::tick::tick) must use the
/// `_at` variants with `arena.now()`: `Tank::can_shoot_at` / `Tank::did_shoot_at`.
#[derive(Debug, Clone)]
pub struct Arena {
    pub config: GameConfig,
    /// Tanks by slot index; slots are never removed
    pub tanks: Vec<Tank>,
    /// Shells in flight (sorted by id)
    pub shells: Vec<Shell>,
    /// Broad-phase thresholds derived from `config`
    pub max_dist: MaxDistTable,
    /// Rounds started so far
    pub round: u32,
    /// Whether the current round still has a fight going
    pub round_active: bool,
    /// Simulation time elapsed, drives the reload timers
    pub(crate) elapsed: Duration,
    epoch: Instant,
    rng: Pcg32,
    next_id: u32,
}

impl Arena {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let max_dist = MaxDistTable::new(&config);
        Self {
            config,
            tanks: Vec::new(),
            shells: Vec::new(),
            max_dist,
            round: 0,
            round_active: false,
            elapsed: Duration::ZERO,
            epoch: Instant::now(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Add a tank slot. The tank stays unspawned until the next round.
    pub fn add_tank(&mut self, info: impl Into<String>) -> usize {
        self.tanks.push(Tank::with_info(&self.config.tank, info));
        self.tanks.len() - 1
    }

    /// Allocate a new shell ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Simulation clock reading used for reload checks
    pub fn now(&self) -> Instant {
        self.epoch + self.elapsed
    }

    /// Place every tank at a clear random spot and spawn it
    pub fn start_round(&mut self) {
        self.shells.clear();
        for i in 0..self.tanks.len() {
            let pos = self.pick_spawn_point(i);
            let tank = &mut self.tanks[i];
            tank.pos = pos;
            tank.spawn();
        }
        self.round += 1;
        self.round_active = true;
        log::info!("Round {} started with {} tanks", self.round, self.tanks.len());
    }

    /// Random spot whose padded hitbox misses tanks already placed this round
    fn pick_spawn_point(&mut self, index: usize) -> Vec2 {
        let tank_size = self.config.tank.size();
        let margin = self.config.arena.spawn_margin;
        let padded = Size::new(tank_size.width + 2.0 * margin, tank_size.height + 2.0 * margin);
        let max_dist = compute_max_dist(padded, tank_size);
        let (lo, hi) = self.spawn_bounds(padded.diagonal() / 2.0);

        let mut candidate = (lo + hi) / 2.0;
        for _ in 0..self.config.arena.spawn_attempts.max(1) {
            candidate = Vec2::new(
                random_between(&mut self.rng, lo.x, hi.x),
                random_between(&mut self.rng, lo.y, hi.y),
            );
            // Spawned tanks always face heading 0
            let poly = oriented_rect(candidate, tank_size, 0.0, margin);
            let blocked = self.tanks[..index]
                .iter()
                .any(|other| has_collided(&poly, &other.to_polygon(0.0), Some(max_dist)));
            if !blocked {
                return candidate;
            }
        }

        log::warn!("No clear spawn spot for tank {index}, placing it anyway");
        candidate
    }

    /// Corners of the box a tank center may occupy, given its bounding radius
    pub(crate) fn spawn_bounds(&self, radius: f32) -> (Vec2, Vec2) {
        let arena = &self.config.arena;
        let lo = Vec2::splat(radius).min(Vec2::new(arena.width, arena.height) / 2.0);
        let hi = (Vec2::new(arena.width, arena.height) - Vec2::splat(radius)).max(lo);
        (lo, hi)
    }

    pub fn alive_count(&self) -> usize {
        self.tanks.iter().filter(|t| t.alive).count()
    }

    /// Snapshots for one viewer: its own tank in full, everyone else clean.
    /// `None` gives the clean view of every tank.
    pub fn snapshots(&self, viewer: Option<usize>) -> Vec<TankSnapshot> {
        self.tanks
            .iter()
            .enumerate()
            .map(|(i, tank)| tank.snapshot(viewer != Some(i)))
            .collect()
    }
}

fn random_between(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if lo < hi { rng.random_range(lo..hi) } else { lo }
}
