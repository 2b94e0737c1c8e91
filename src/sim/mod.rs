//! Deterministic simulation module
//!
//! Tank state, hitbox polygons and the collision engine. This module must be
//! pure and synchronous:
//! - No I/O, no background tasks
//! - Seeded RNG only
//! - Stable iteration order (by tank slot, shell ID)

pub mod collision;
pub mod shape;
pub mod shell;
pub mod state;
pub mod tank;
pub mod tick;

pub use collision::{MaxDistTable, compute_max_dist, has_collided, within_broad_phase};
pub use shape::{Hitbox, ShapeKind, oriented_rect};
pub use shell::Shell;
pub use state::Arena;
pub use tank::{Tank, TankSnapshot};
pub use tick::{GameEvent, TankInput, tick};
