//! Read-only view for render/HUD collaborators
//!
//! Captured from the authoritative [`Match`] after a tick; collaborators
//! never reach into live state and the sim never blocks on a draw.

use glam::Vec3;
use serde::Serialize;

use super::entity::{Entity, PlayerId};
use super::game::{Match, ScoreState};
use super::hammer::HammerState;
use super::player::PlayerState;
use super::tile::{TileKind, TileState};

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub pos: Vec3,
    pub dir: Vec3,
    pub state: PlayerState,
    pub visible: bool,
    pub charge_ms: f32,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct HammerView {
    pub owner: PlayerId,
    pub pos: Vec3,
    pub state: HammerState,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TileView {
    pub layer: usize,
    pub row: usize,
    pub col: usize,
    pub kind: TileKind,
    pub state: TileState,
    pub visible: bool,
}

/// Everything a renderer or HUD needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSnapshot {
    pub paused: bool,
    pub round: u32,
    pub map_index: usize,
    pub countdown_s: f32,
    pub score_state: ScoreState,
    pub champion: Option<PlayerId>,
    pub players: Vec<PlayerView>,
    pub hammers: Vec<HammerView>,
    pub tiles: Vec<TileView>,
}

impl MatchSnapshot {
    pub fn capture(m: &Match) -> Self {
        let players = m
            .arena
            .players
            .iter()
            .map(|p| PlayerView {
                id: p.id(),
                pos: p.body().pos,
                dir: p.body().dir,
                state: p.state(),
                visible: p.body().visible,
                charge_ms: p.charge_ms(),
                score: m.scores()[p.id().index()],
            })
            .collect();

        let hammers = m
            .arena
            .hammers
            .iter()
            .map(|h| HammerView {
                owner: h.owner(),
                pos: h.body().pos,
                state: h.state(),
                visible: h.body().visible,
            })
            .collect();

        let tiles = m
            .arena
            .grid
            .cells()
            .map(|(layer, row, col, tile)| TileView {
                layer,
                row,
                col,
                kind: tile.kind(),
                state: tile.state(),
                visible: tile.body().visible,
            })
            .collect();

        Self {
            paused: m.is_paused(),
            round: m.round(),
            map_index: m.map_index(),
            countdown_s: m.countdown_s(),
            score_state: m.score_state(),
            champion: m.champion(),
            players,
            hammers,
            tiles,
        }
    }
}
