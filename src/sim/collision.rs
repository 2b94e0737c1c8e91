//! Collision detection for convex polygons
//!
//! A cheap distance bound rejects far-apart pairs, then the separating axis
//! theorem (SAT) gives the exact answer. Only yes/no is reported; there is no
//! collision response.
//!
//! Polygons must be convex, have at least two points, no duplicate
//! consecutive points, and be listed in a consistent winding order.

use std::collections::BTreeMap;

use glam::Vec2;

use super::shape::ShapeKind;
use crate::config::{GameConfig, Size};

/// Index of the point used as each polygon's anchor in the broad phase.
///
/// Any vertex works as long as `max_dist` is derived with
/// [`compute_max_dist`]: every vertex of a rectangle lies within one diagonal
/// of any point of that rectangle, so two touching rectangles have every
/// vertex pair within the sum of their diagonals.
pub const REFERENCE_POINT: usize = 1;

/// Check whether two convex polygons intersect.
///
/// When `max_dist` is given, pairs whose reference points are further apart
/// than `max_dist` are rejected without running SAT. Touching counts as
/// colliding.
pub fn has_collided(poly_a: &[Vec2], poly_b: &[Vec2], max_dist: Option<f32>) -> bool {
    if let Some(max_dist) = max_dist {
        if !within_broad_phase(poly_a, poly_b, max_dist) {
            return false;
        }
    }
    separating_axis_test(poly_a, poly_b)
}

/// Broad phase only: true if the pair might be touching
#[inline]
pub fn within_broad_phase(poly_a: &[Vec2], poly_b: &[Vec2], max_dist: f32) -> bool {
    poly_a[REFERENCE_POINT].distance_squared(poly_b[REFERENCE_POINT]) <= max_dist * max_dist
}

/// Largest reference-point distance at which two rectangles can still touch
pub fn compute_max_dist(a: Size, b: Size) -> f32 {
    a.diagonal() + b.diagonal()
}

/// Narrow phase: true unless some edge normal separates the polygons
fn separating_axis_test(poly_a: &[Vec2], poly_b: &[Vec2]) -> bool {
    edges(poly_a)
        .chain(edges(poly_b))
        .map(edge_axis)
        .all(|axis| overlap(project(poly_a, axis), project(poly_b, axis)))
}

/// Edge vectors, wrapping from the last point back to the first
fn edges(poly: &[Vec2]) -> impl Iterator<Item = Vec2> + '_ {
    let n = poly.len();
    (0..n).map(move |i| poly[(i + 1) % n] - poly[i])
}

/// Unit normal of an edge
fn edge_axis(edge: Vec2) -> Vec2 {
    let normal = Vec2::new(edge.y, -edge.x);
    let len = normal.length();
    assert!(
        len > 0.0 && len.is_finite(),
        "zero-length or non-finite polygon edge {edge}: duplicate consecutive points"
    );
    normal / len
}

/// Closed interval [min, max] of the polygon projected onto `axis`
fn project(poly: &[Vec2], axis: Vec2) -> (f32, f32) {
    poly.iter()
        .map(|p| p.dot(axis))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), d| {
            (lo.min(d), hi.max(d))
        })
}

#[inline]
fn contains(n: f32, (lo, hi): (f32, f32)) -> bool {
    n >= lo && n <= hi
}

/// Closed intervals overlap when an endpoint of either lies in the other
fn overlap(a: (f32, f32), b: (f32, f32)) -> bool {
    contains(a.0, b) || contains(a.1, b) || contains(b.0, a) || contains(b.1, a)
}

/// Precomputed broad-phase thresholds per pair of shape kinds.
///
/// Built once from configuration and read-only afterwards. Only the pairs the
/// simulation checks are tracked: tank-tank and tank-shell.
#[derive(Debug, Clone)]
pub struct MaxDistTable {
    values: BTreeMap<(ShapeKind, ShapeKind), f32>,
}

impl MaxDistTable {
    pub fn new(config: &GameConfig) -> Self {
        let tank = config.tank.size();
        let shell = config.shell.size();
        let values = BTreeMap::from([
            ((ShapeKind::Tank, ShapeKind::Tank), compute_max_dist(tank, tank)),
            ((ShapeKind::Tank, ShapeKind::Shell), compute_max_dist(tank, shell)),
        ]);
        Self { values }
    }

    /// Threshold for a pair of kinds, in either order
    pub fn get(&self, a: ShapeKind, b: ShapeKind) -> Option<f32> {
        let key = if a <= b { (a, b) } else { (b, a) };
        self.values.get(&key).copied()
    }

    // Both tank pairs are always inserted by `new`
    pub fn tank_tank(&self) -> f32 {
        self.values[&(ShapeKind::Tank, ShapeKind::Tank)]
    }

    pub fn tank_shell(&self) -> f32 {
        self.values[&(ShapeKind::Tank, ShapeKind::Shell)]
    }
}
