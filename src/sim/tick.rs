//! Fixed timestep simulation tick
//!
//! Reference game loop: applies tank inputs, blocks overlapping tanks, fires
//! and flies shells, and settles the round. Dead tanks never enter a
//! collision check.

use std::time::Duration;

use glam::Vec2;
use serde::Serialize;

use super::collision::has_collided;
use super::shape::Hitbox;
use super::shell::Shell;
use super::state::Arena;

/// Commands for one tank for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TankInput {
    /// Turn direction, -1.0 (clockwise) to 1.0 (counter-clockwise)
    pub turn: f32,
    /// Drive forward
    pub throttle: bool,
    /// Fire if reloaded
    pub fire: bool,
}

/// Things that happened during a tick, for the caller to broadcast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// Two tanks ran into each other and were stopped
    TanksCollided { a: usize, b: usize },
    ShotFired { tank: usize, shell: u32 },
    TankDestroyed { victim: usize, shooter: usize },
    /// The round ended; `None` when the last tanks died together
    RoundOver { winner: Option<usize> },
}

/// Advance the arena by one fixed timestep.
///
/// `inputs[i]` drives tank `i`; missing entries mean "do nothing".
pub fn tick(arena: &mut Arena, inputs: &[TankInput], dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    // Time never runs backwards
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    arena.elapsed += Duration::try_from_secs_f32(dt).unwrap_or_default();
    let now = arena.now();

    drive_tanks(arena, inputs, dt, &mut events);

    // Fire after movement so shells leave from the current muzzle
    let clearance = arena.config.shell.width / 2.0 + 1.0;
    for i in 0..arena.tanks.len() {
        let input = inputs.get(i).copied().unwrap_or_default();
        let tank = &arena.tanks[i];
        if !tank.alive || !input.fire || !tank.can_shoot_at(now) {
            continue;
        }
        let (muzzle, heading) = (tank.muzzle(clearance), tank.heading());
        let id = arena.next_entity_id();
        arena
            .shells
            .push(Shell::new(id, i, muzzle, heading, &arena.config.shell));
        arena.tanks[i].did_shoot_at(now);
        events.push(GameEvent::ShotFired { tank: i, shell: id });
    }

    fly_shells(arena, dt, &mut events);
    settle_round(arena, &mut events);

    events
}

/// Turn and move alive tanks, undoing turns and moves that end in another tank.
///
/// Pairs that already overlapped before the tick are left alone so they can
/// drive apart. Undoing one tank can push it back onto a tank that just took
/// its old spot, so undos repeat until nothing new overlaps.
fn drive_tanks(arena: &mut Arena, inputs: &[TankInput], dt: f32, events: &mut Vec<GameEvent>) {
    let tank_cfg = &arena.config.tank;
    let radius = tank_cfg.size().diagonal() / 2.0;
    let (lo, hi) = arena.spawn_bounds(radius);

    let before: Vec<_> = arena.tanks.iter().map(|t| (t.pos, t.heading())).collect();
    let old_polys: Vec<_> = arena.tanks.iter().map(|t| t.to_polygon(0.0)).collect();
    for (i, tank) in arena.tanks.iter_mut().enumerate() {
        if !tank.alive {
            continue;
        }
        let input = inputs.get(i).copied().unwrap_or_default();
        tank.turn(input.turn.clamp(-1.0, 1.0) * tank_cfg.turn_rate * dt);
        tank.moving = input.throttle;
        if tank.moving {
            tank.move_by(tank_cfg.speed * dt);
            tank.pos = tank.pos.clamp(lo, hi);
        }
    }

    let max_dist = arena.max_dist.tank_tank();
    let mut polys: Vec<_> = arena.tanks.iter().map(|t| t.to_polygon(0.0)).collect();
    let mut undone = vec![false; arena.tanks.len()];
    loop {
        let mut changed = false;
        for i in 0..arena.tanks.len() {
            for j in (i + 1)..arena.tanks.len() {
                if !arena.tanks[i].alive || !arena.tanks[j].alive {
                    continue;
                }
                if !has_collided(&polys[i], &polys[j], Some(max_dist))
                    || has_collided(&old_polys[i], &old_polys[j], Some(max_dist))
                {
                    continue;
                }
                log::debug!("Tanks {i} and {j} collided");
                events.push(GameEvent::TanksCollided { a: i, b: j });
                for k in [i, j] {
                    if !undone[k] {
                        let (pos, heading) = before[k];
                        arena.tanks[k].pos = pos;
                        arena.tanks[k].set_heading(heading);
                        polys[k] = old_polys[k];
                        undone[k] = true;
                        changed = true;
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }
}

/// Move shells, drop stale ones and resolve hits against alive tanks
fn fly_shells(arena: &mut Arena, dt: f32, events: &mut Vec<GameEvent>) {
    let Arena {
        config,
        tanks,
        shells,
        max_dist,
        ..
    } = arena;
    let bounds = Vec2::new(config.arena.width, config.arena.height);
    let max_dist = max_dist.tank_shell();

    shells.retain_mut(|shell| {
        shell.advance(dt, config.shell.speed);
        if shell.expired() || shell.pos.cmplt(Vec2::ZERO).any() || shell.pos.cmpgt(bounds).any() {
            return false;
        }

        let poly = shell.to_polygon(0.0);
        let victim = tanks.iter().enumerate().find_map(|(i, tank)| {
            let hit = i != shell.owner
                && tank.alive
                && has_collided(&poly, &tank.to_polygon(0.0), Some(max_dist));
            hit.then_some(i)
        });
        let Some(victim) = victim else {
            return true;
        };

        tanks[victim].alive = false;
        tanks[victim].moving = false;
        if let Some(shooter) = tanks.get_mut(shell.owner) {
            shooter.kills += 1;
        }
        log::debug!("Shell {} from tank {} destroyed tank {victim}", shell.id, shell.owner);
        events.push(GameEvent::TankDestroyed {
            victim,
            shooter: shell.owner,
        });
        false
    });
}

/// End the round once at most one tank is left standing
fn settle_round(arena: &mut Arena, events: &mut Vec<GameEvent>) {
    if !arena.round_active || arena.tanks.len() < 2 || arena.alive_count() > 1 {
        return;
    }
    arena.round_active = false;
    let winner = arena.tanks.iter().position(|t| t.alive);
    if let Some(winner) = winner {
        arena.tanks[winner].wins += 1;
    }
    log::info!("Round {} over, winner: {:?}", arena.round, winner);
    events.push(GameEvent::RoundOver { winner });
}
