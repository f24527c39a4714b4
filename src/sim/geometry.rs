//! Axis-aligned bounding boxes and intersection-depth math
//!
//! Pure functions only; everything else in the simulation builds its spatial
//! queries out of these.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box spanning `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box with `pos` as the minimum corner.
    pub fn from_pos_size(pos: Vec3, size: Vec3) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Strict overlap on every axis. Exactly-touching boxes do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Strict overlap ignoring the vertical axis.
    pub fn overlaps_horizontally(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    pub fn shifted(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

/// 2D axis-aligned rectangle for the circle-vs-rect variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }
}

/// Per-axis signed penetration between two boxes.
///
/// Zero when the boxes do not overlap (including exact touch). Otherwise each
/// component's magnitude is the overlap on that axis and its sign is the
/// direction `a` must move to separate the centers. Anti-symmetric under
/// argument swap.
pub fn intersection_depth(a: &Aabb, b: &Aabb) -> Vec3 {
    let delta = a.center() - b.center();
    let overlap = a.half_extents() + b.half_extents() - delta.abs();

    if overlap.x <= 0.0 || overlap.y <= 0.0 || overlap.z <= 0.0 {
        return Vec3::ZERO;
    }

    Vec3::new(
        overlap.x * delta.x.signum(),
        overlap.y * delta.y.signum(),
        overlap.z * delta.z.signum(),
    )
}

/// Circle-vs-rectangle depth via the clamped-point method.
///
/// Returns the 2D push vector for the circle and whether it hit at all.
pub fn circle_rect_depth(center: Vec2, radius: f32, rect: &Rect) -> (Vec2, bool) {
    let closest = center.clamp(rect.min, rect.max);
    let delta = center - closest;
    let dist_sq = delta.length_squared();

    if dist_sq >= radius * radius {
        return (Vec2::ZERO, false);
    }

    if dist_sq > 1e-12 {
        let dist = dist_sq.sqrt();
        return ((delta / dist) * (radius - dist), true);
    }

    // Center inside the rect: push out along the shallowest side
    let to_left = center.x - rect.min.x;
    let to_right = rect.max.x - center.x;
    let to_bottom = center.y - rect.min.y;
    let to_top = rect.max.y - center.y;

    let x_push = if to_left < to_right {
        -(to_left + radius)
    } else {
        to_right + radius
    };
    let y_push = if to_bottom < to_top {
        -(to_bottom + radius)
    } else {
        to_top + radius
    };

    if x_push.abs() <= y_push.abs() {
        (Vec2::new(x_push, 0.0), true)
    } else {
        (Vec2::new(0.0, y_push), true)
    }
}
