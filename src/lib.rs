//! Hammer Havoc - a local multiplayer arena brawler
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity state machines, physics,
//!   collisions, match lifecycle)
//! - `rules`: Match configuration
//!
//! Rendering, audio playback, input device polling and map-file parsing live
//! outside this crate. The simulation consumes abstracted per-player input
//! snapshots and a pre-parsed cell grid, and exposes read-only snapshots and
//! fire-and-forget cues in return.

pub mod rules;
pub mod sim;

pub use rules::MatchRules;
pub use sim::{GameEvent, InputFrame, InputSnapshot, Match, MatchSnapshot, tick};

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Player slot capacity; registries are indexed by player id
    pub const MAX_PLAYERS: usize = 4;

    /// Tile grid cell extents (world units)
    pub const TILE_SIZE: f32 = 1.0;
    pub const TILE_HEIGHT: f32 = 1.0;
    /// Vertical tile layers: floor level and wall-top level
    pub const TILE_LAYERS: usize = 2;

    /// Player extents
    pub const PLAYER_SIZE: Vec3 = Vec3::new(0.8, 1.0, 0.8);
    /// Horizontal acceleration from movement intent
    pub const PLAYER_ACCEL: f32 = 60.0;
    /// Horizontal speed cap (vector norm, not per-axis)
    pub const PLAYER_MAX_SPEED: f32 = 6.0;
    /// Fraction of acceleration retained while airborne
    pub const AIR_CONTROL: f32 = 0.35;
    /// Per-tick velocity scale on the ground
    pub const GROUND_DRAG: f32 = 0.85;
    /// Per-tick velocity scale in the air
    pub const AIR_DRAG: f32 = 0.96;

    /// Downward acceleration (units/s^2); applies in every state
    pub const GRAVITY: f32 = 30.0;
    /// Terminal fall speed
    pub const MAX_FALL_SPEED: f32 = 20.0;
    /// Y below which a falling player dies
    pub const KILL_PLANE_Y: f32 = -10.0;

    /// Nominal dash distance before the ground probe shortens it
    pub const DASH_DISTANCE: f32 = 3.0;
    pub const DASH_SPEED: f32 = 18.0;
    /// Post-dash freeze (ms)
    pub const IMMOBILIZE_MS: f32 = 250.0;

    /// Pushback travel from a hammer strike
    pub const PUSHBACK_DISTANCE: f32 = 2.5;
    pub const PUSHBACK_SPEED: f32 = 14.0;

    /// Hammer extents
    pub const HAMMER_SIZE: Vec3 = Vec3::new(0.5, 0.5, 0.5);
    pub const HAMMER_SPEED: f32 = 12.0;
    /// Distance to the owner at which a returning hammer is caught
    pub const HAMMER_PICKUP_RADIUS: f32 = 0.75;

    /// Throw distance gained per millisecond of charge
    pub const CHARGE_UNIT: f32 = 0.005;
    pub const MIN_THROW_DISTANCE: f32 = 2.0;
    pub const MAX_THROW_DISTANCE: f32 = 8.0;

    /// Countdown before a round starts; entities are disabled until it elapses
    pub const PRE_ROUND_DELAY: f32 = 3.0;
    /// Display delay between a decided round and the next reload
    pub const POST_ROUND_DELAY: f32 = 2.5;

    /// Footstep cue cadence while walking
    pub const FOOTSTEP_INTERVAL: f32 = 0.3;

    /// Heading used when neither aim nor movement history gives a direction
    pub const DEFAULT_HEADING: Vec3 = Vec3::new(0.0, 0.0, 1.0);
}

/// Lift a 2D control axis onto the ground plane (x = columns, y = rows).
#[inline]
pub fn horizontal(axis: Vec2) -> Vec3 {
    Vec3::new(axis.x, 0.0, axis.y)
}

/// Pick a usable unit heading: `primary` if non-zero, else `fallback`, else
/// the fixed default. Never normalizes a zero vector.
#[inline]
pub fn heading_or_default(primary: Vec3, fallback: Vec3) -> Vec3 {
    let p = Vec3::new(primary.x, 0.0, primary.z);
    if p.length_squared() > 1e-8 {
        return p.normalize();
    }
    let f = Vec3::new(fallback.x, 0.0, fallback.z);
    if f.length_squared() > 1e-8 {
        return f.normalize();
    }
    consts::DEFAULT_HEADING
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_fallback_chain() {
        let aim = Vec3::new(2.0, 0.0, 0.0);
        assert_eq!(heading_or_default(aim, Vec3::ZERO), Vec3::X);

        let last = Vec3::new(0.0, 0.0, -3.0);
        assert_eq!(heading_or_default(Vec3::ZERO, last), Vec3::NEG_Z);

        assert_eq!(
            heading_or_default(Vec3::ZERO, Vec3::ZERO),
            consts::DEFAULT_HEADING
        );
    }

    #[test]
    fn test_heading_ignores_vertical_component() {
        let aim = Vec3::new(1.0, 5.0, 0.0);
        assert_eq!(heading_or_default(aim, Vec3::ZERO), Vec3::X);
    }
}
