//! Oriented rectangle hitboxes
//!
//! Hitboxes are never stored. They are rebuilt from an entity's position,
//! heading and configured size every time geometry is needed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::Size;

/// Kinds of shapes that take part in collision checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShapeKind {
    Tank,
    Shell,
}

/// Anything that can produce a convex hitbox polygon
pub trait Hitbox {
    fn kind(&self) -> ShapeKind;

    /// Hitbox corners, inflated by `margin` on every side
    fn to_polygon(&self, margin: f32) -> [Vec2; 4];
}

/// Build a rectangle of `size` centered at `center`, rotated by `heading`.
///
/// Corners are listed bottom-left, bottom-right, top-right, top-left in local
/// space, so the result is always traversed in a consistent direction.
pub fn oriented_rect(center: Vec2, size: Size, heading: f32, margin: f32) -> [Vec2; 4] {
    let (half_w, half_h) = size.half_extents();
    let half_w = half_w + margin;
    let half_h = half_h + margin;
    let rotation = Vec2::from_angle(heading);

    [
        Vec2::new(-half_w, -half_h),
        Vec2::new(half_w, -half_h),
        Vec2::new(half_w, half_h),
        Vec2::new(-half_w, half_h),
    ]
    .map(|corner| rotation.rotate(corner) + center)
}

/// Average of a polygon's points
pub fn centroid(poly: &[Vec2]) -> Vec2 {
    poly.iter().copied().sum::<Vec2>() / poly.len() as f32
}
