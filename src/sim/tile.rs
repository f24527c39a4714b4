//! Floor and wall tiles
//!
//! A tile degrades along a kind-specific health chain and becomes non-solid
//! and invisible exactly once when it breaks. Floors take damage on an
//! occupancy *exit* edge, tracked through per-player visitor slots so one
//! continuous stay deals at most one step of damage. Walls take damage from
//! hammer contact instead; that pass lives in `tick.rs`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_PLAYERS;

use super::entity::{Body, Entity, PlayerId};

/// Six-level tile health. Monotonically non-increasing until a map reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileState {
    Hp100,
    Hp80,
    Hp60,
    Hp40,
    Hp20,
    Hp0,
}

impl TileState {
    pub fn is_broken(self) -> bool {
        matches!(self, TileState::Hp0)
    }
}

/// What drives a tile's degradation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Breakable floor: damaged when a player walks off it
    Floor,
    /// Indestructible floor under walls and rims
    Solid,
    /// Wall block: damaged by flying or returning hammers
    Wall,
}

#[derive(Debug, Clone)]
pub struct Tile {
    kind: TileKind,
    state: TileState,
    body: Body,
    visitors: [bool; MAX_PLAYERS],
}

impl Tile {
    pub fn new(kind: TileKind, pos: Vec3, size: Vec3) -> Self {
        Self {
            kind,
            state: TileState::Hp100,
            body: Body::new(pos, size),
            visitors: [false; MAX_PLAYERS],
        }
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn state(&self) -> TileState {
        self.state
    }

    /// Broken tiles stop colliding and stop supporting players.
    pub fn is_solid(&self) -> bool {
        !self.state.is_broken()
    }

    /// One damage step along this tile's chain. Returns true when this call
    /// broke the tile; the break side effects run exactly once.
    pub fn damage(&mut self) -> bool {
        let next = match self.kind {
            TileKind::Solid => self.state,
            // Floors skip Hp60: four exits from pristine to gone
            TileKind::Floor => match self.state {
                TileState::Hp100 => TileState::Hp80,
                TileState::Hp80 => TileState::Hp40,
                TileState::Hp60 => TileState::Hp40,
                TileState::Hp40 => TileState::Hp20,
                TileState::Hp20 => TileState::Hp0,
                TileState::Hp0 => TileState::Hp0,
            },
            // Walls go down in three hammer hits
            TileKind::Wall => match self.state {
                TileState::Hp100 => TileState::Hp60,
                TileState::Hp80 => TileState::Hp60,
                TileState::Hp60 => TileState::Hp20,
                TileState::Hp40 => TileState::Hp20,
                TileState::Hp20 => TileState::Hp0,
                TileState::Hp0 => TileState::Hp0,
            },
        };

        let was_broken = self.state.is_broken();
        self.state = next;
        let broke = !was_broken && self.state.is_broken();
        if broke {
            self.body.visible = false;
        }
        broke
    }

    pub fn has_visitor(&self, player: PlayerId) -> bool {
        self.visitors[player.index()]
    }

    /// Entry edge. Returns true only on a fresh entry.
    pub fn on_enter(&mut self, player: PlayerId) -> bool {
        if self.visitors[player.index()] {
            return false;
        }
        self.visitors[player.index()] = true;
        true
    }

    /// Exit edge. Applies one damage step for floor tiles and returns true
    /// when damage was applied. Without an intervening entry this is a no-op,
    /// so repeated exits cannot re-damage the tile.
    pub fn on_exit(&mut self, player: PlayerId) -> bool {
        if !self.visitors[player.index()] {
            return false;
        }
        self.visitors[player.index()] = false;
        if self.kind == TileKind::Floor && !self.state.is_broken() {
            self.damage();
            return true;
        }
        false
    }

    /// Drop a player from the visitor slots without dealing exit damage.
    pub fn clear_visitor(&mut self, player: PlayerId) {
        self.visitors[player.index()] = false;
    }
}

impl Entity for Tile {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}
