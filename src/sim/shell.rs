//! Shells fired by tanks

use glam::Vec2;

use super::shape::{Hitbox, ShapeKind, oriented_rect};
use crate::config::{ShellConfig, Size};
use crate::heading_to_screen;

/// A shell in flight
#[derive(Debug, Clone)]
pub struct Shell {
    pub id: u32,
    /// Index of the tank that fired it
    pub owner: usize,
    pub pos: Vec2,
    pub heading: f32,
    /// Seconds left before the shell fizzles
    pub ttl: f32,
    size: Size,
}

impl Shell {
    pub fn new(id: u32, owner: usize, pos: Vec2, heading: f32, config: &ShellConfig) -> Self {
        Self {
            id,
            owner,
            pos,
            heading,
            ttl: config.ttl_secs,
            size: config.size(),
        }
    }

    /// Fly forward for `dt` seconds, same screen-space convention as tanks
    pub fn advance(&mut self, dt: f32, speed: f32) {
        self.pos += heading_to_screen(self.heading) * speed * dt;
        self.ttl -= dt;
    }

    pub fn expired(&self) -> bool {
        self.ttl <= 0.0
    }
}

impl Hitbox for Shell {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Shell
    }

    fn to_polygon(&self, margin: f32) -> [Vec2; 4] {
        oriented_rect(self.pos, self.size, self.heading, margin)
    }
}
