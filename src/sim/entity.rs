//! Shared entity contract
//!
//! Every concrete entity (player, hammer, tile) owns a [`Body`]: position,
//! last intended heading, and extents. Entities never hold references to each
//! other; cross-entity lookups go through the arena registries by id.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;

/// Index of a player slot in the arena registries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PlayerId(pub usize);

impl PlayerId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0 + 1)
    }
}

/// Spatial state every entity owns exclusively.
#[derive(Debug, Clone)]
pub struct Body {
    /// World position of the AABB's minimum corner
    pub pos: Vec3,
    /// Last intended heading (unit length once set, zero before)
    pub dir: Vec3,
    /// AABB extents
    pub size: Vec3,
    /// Whether render collaborators should draw this entity
    pub visible: bool,
    /// Disabled entities sit out the pre-round countdown
    pub enabled: bool,
}

impl Body {
    pub fn new(pos: Vec3, size: Vec3) -> Self {
        Self {
            pos,
            dir: Vec3::ZERO,
            size,
            visible: true,
            enabled: true,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec3 {
        self.pos + self.size * 0.5
    }
}

/// Common read surface over the concrete entity types.
pub trait Entity {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    fn aabb(&self) -> Aabb {
        self.body().aabb()
    }
}
