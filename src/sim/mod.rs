//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Fixed update order (tiles, then hammers, then players in slot order)
//! - No rendering or platform dependencies

pub mod arena;
pub mod entity;
pub mod events;
pub mod game;
pub mod geometry;
pub mod hammer;
pub mod input;
pub mod player;
pub mod snapshot;
pub mod tick;
pub mod tile;

pub use arena::{Arena, Grid, MapError};
pub use entity::{Body, Entity, PlayerId};
pub use events::GameEvent;
pub use game::{Match, ScoreState};
pub use geometry::{Aabb, Rect, circle_rect_depth, intersection_depth};
pub use hammer::{Hammer, HammerState};
pub use input::{InputFrame, InputSnapshot, PlayerInput};
pub use player::{Player, PlayerState, Unstoppable};
pub use snapshot::MatchSnapshot;
pub use tick::tick;
pub use tile::{Tile, TileKind, TileState};
