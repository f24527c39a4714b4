//! Per-tick input snapshots
//!
//! The input provider polls devices outside the core and hands the sim one
//! [`InputSnapshot`] per player per tick. Edges (pressed/released) are
//! derived by diffing the previous tick's snapshot against the current one;
//! there is no hidden polling state inside the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_PLAYERS;

use super::entity::PlayerId;

/// Raw level state of one player's controls for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Movement intent on the ground plane (x = columns, y = rows)
    pub move_axis: Vec2,
    /// Aim intent for the held hammer
    pub aim_axis: Vec2,
    pub throw: bool,
    pub dash: bool,
    pub pause: bool,
}

/// Previous/current snapshot pair exposing level and edge queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    prev: InputSnapshot,
    cur: InputSnapshot,
}

impl PlayerInput {
    /// Rotate in the next tick's snapshot.
    pub fn advance(&mut self, next: InputSnapshot) {
        self.prev = self.cur;
        self.cur = next;
    }

    /// Movement intent, clamped to unit length.
    pub fn movement(&self) -> Vec2 {
        self.cur.move_axis.clamp_length_max(1.0)
    }

    /// Aim intent, clamped to unit length.
    pub fn aim(&self) -> Vec2 {
        self.cur.aim_axis.clamp_length_max(1.0)
    }

    pub fn throw_held(&self) -> bool {
        self.cur.throw
    }

    pub fn throw_released(&self) -> bool {
        self.prev.throw && !self.cur.throw
    }

    pub fn dash_pressed(&self) -> bool {
        self.cur.dash && !self.prev.dash
    }

    pub fn pause_pressed(&self) -> bool {
        self.cur.pause && !self.prev.pause
    }
}

/// All connected players' inputs for one tick.
#[derive(Debug, Clone)]
pub struct InputFrame {
    players: [PlayerInput; MAX_PLAYERS],
    connected: usize,
}

impl InputFrame {
    pub fn new(connected: usize) -> Self {
        Self {
            players: [PlayerInput::default(); MAX_PLAYERS],
            connected: connected.min(MAX_PLAYERS),
        }
    }

    /// Number of currently connected players.
    pub fn connected(&self) -> usize {
        self.connected
    }

    /// Feed the next snapshot for one player.
    pub fn advance(&mut self, id: PlayerId, next: InputSnapshot) {
        self.players[id.index()].advance(next);
    }

    pub fn player(&self, id: PlayerId) -> &PlayerInput {
        &self.players[id.index()]
    }

    /// Pause edge on any connected controller.
    pub fn pause_pressed_any(&self) -> bool {
        self.players[..self.connected]
            .iter()
            .any(|p| p.pause_pressed())
    }
}

impl Default for InputFrame {
    fn default() -> Self {
        Self::new(MAX_PLAYERS)
    }
}
