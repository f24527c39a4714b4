//! The arena: tile grid, entity registries, spatial queries
//!
//! The arena owns the shared mutable resources of a round - the tile grid
//! and the fixed-slot player/hammer registries - and answers the spatial
//! questions everything else asks: cell bounds, solid colliders, and the
//! ground check that decides whether a footprint is supported.

use glam::Vec3;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::consts::{MAX_PLAYERS, TILE_HEIGHT, TILE_LAYERS, TILE_SIZE};

use super::entity::{Entity, PlayerId};
use super::geometry::Aabb;
use super::hammer::Hammer;
use super::player::Player;
use super::tile::{Tile, TileKind};

/// Map-construction failures. Fatal: nothing is built on error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map has no rows")]
    Empty,
    #[error("row {row} has {len} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("unknown cell code {code:?} at row {row}, column {col}")]
    UnknownCell { code: char, row: usize, col: usize },
    #[error("map provides {found} spawn points but {required} players are configured")]
    NotEnoughSpawns { found: usize, required: usize },
    #[error("player count {0} is outside the supported range")]
    BadPlayerCount(usize),
}

/// Tolerance for "top at or below the footprint bottom" support tests.
const SUPPORT_EPS: f32 = 1e-3;

/// The tile grid: `TILE_LAYERS` stacked row-major layers of optional tiles.
#[derive(Debug, Clone)]
pub struct Grid {
    cols: usize,
    rows: usize,
    tiles: Vec<Option<Tile>>,
}

impl Grid {
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn index(&self, layer: usize, row: usize, col: usize) -> usize {
        (layer * self.rows + row) * self.cols + col
    }

    /// Tile lookup tolerant of out-of-range queries; anything off the grid
    /// is empty space.
    pub fn tile(&self, layer: usize, row: isize, col: isize) -> Option<&Tile> {
        if layer >= TILE_LAYERS
            || row < 0
            || col < 0
            || row as usize >= self.rows
            || col as usize >= self.cols
        {
            return None;
        }
        self.tiles[self.index(layer, row as usize, col as usize)].as_ref()
    }

    /// World-space bounds of a cell, occupied or not.
    pub fn cell_bounds(&self, layer: usize, row: usize, col: usize) -> Aabb {
        let min = Vec3::new(
            col as f32 * TILE_SIZE,
            layer as f32 * TILE_HEIGHT,
            row as f32 * TILE_SIZE,
        );
        Aabb::from_pos_size(min, Vec3::new(TILE_SIZE, TILE_HEIGHT, TILE_SIZE))
    }

    /// Every occupied cell, layer-major then row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, usize, &Tile)> {
        let rows = self.rows;
        let cols = self.cols;
        self.tiles.iter().enumerate().filter_map(move |(i, slot)| {
            let tile = slot.as_ref()?;
            let layer = i / (rows * cols);
            let rest = i % (rows * cols);
            Some((layer, rest / cols, rest % cols, tile))
        })
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut().filter_map(|slot| slot.as_mut())
    }

    /// AABBs of every solid tile; the collision pass resolves against these.
    pub fn solid_aabbs(&self) -> Vec<Aabb> {
        self.tiles
            .iter()
            .filter_map(|slot| slot.as_ref())
            .filter(|t| t.is_solid())
            .map(|t| t.aabb())
            .collect()
    }

    /// True when no solid tile supports the footprint: there is no tile in
    /// the footprint's column range, on any layer, whose top sits at or
    /// below the footprint's bottom.
    ///
    /// The footprint-to-index conversion floors the minimum edge and ceils
    /// the maximum edge (exclusive), so a box exactly touching a cell
    /// boundary does not count the next cell over. These boundary semantics
    /// decide fall detection at platform edges; change with care.
    pub fn is_airborne(&self, footprint: &Aabb) -> bool {
        let col0 = (footprint.min.x / TILE_SIZE).floor() as isize;
        let col1 = (footprint.max.x / TILE_SIZE).ceil() as isize;
        let row0 = (footprint.min.z / TILE_SIZE).floor() as isize;
        let row1 = (footprint.max.z / TILE_SIZE).ceil() as isize;

        for col in col0..col1 {
            for row in row0..row1 {
                for layer in 0..TILE_LAYERS {
                    let Some(tile) = self.tile(layer, row, col) else {
                        continue;
                    };
                    let top = (layer as f32 + 1.0) * TILE_HEIGHT;
                    if tile.is_solid() && top <= footprint.min.y + SUPPORT_EPS {
                        return false;
                    }
                }
            }
        }
        true
    }
}

/// One round's worth of world state.
#[derive(Debug)]
pub struct Arena {
    pub grid: Grid,
    pub players: Vec<Player>,
    pub hammers: Vec<Hammer>,
    pub paused: bool,
    spawn_points: Vec<Vec3>,
}

impl Arena {
    /// Build the arena from loader-produced cell codes. Fails atomically:
    /// an error leaves no partially constructed grid behind.
    ///
    /// Cell codes: `.` empty, `x` breakable floor, `#` solid floor, `w` wall
    /// (solid floor plus a hammer-breakable block above), `P` spawn point on
    /// breakable floor.
    pub fn from_cells<S: AsRef<str>>(
        cells: &[S],
        player_count: usize,
        rng: &mut Pcg32,
    ) -> Result<Self, MapError> {
        if !(2..=MAX_PLAYERS).contains(&player_count) {
            return Err(MapError::BadPlayerCount(player_count));
        }
        let rows = cells.len();
        if rows == 0 {
            return Err(MapError::Empty);
        }
        let cols = cells[0].as_ref().chars().count();
        if cols == 0 {
            return Err(MapError::Empty);
        }

        let mut tiles = vec![None; TILE_LAYERS * rows * cols];
        let mut spawn_points = Vec::new();

        for (row, line) in cells.iter().enumerate() {
            let line = line.as_ref();
            let len = line.chars().count();
            if len != cols {
                return Err(MapError::RaggedRow {
                    row,
                    len,
                    expected: cols,
                });
            }
            for (col, code) in line.chars().enumerate() {
                let floor_pos = Vec3::new(col as f32 * TILE_SIZE, 0.0, row as f32 * TILE_SIZE);
                let size = Vec3::new(TILE_SIZE, TILE_HEIGHT, TILE_SIZE);
                let floor_slot = row * cols + col;
                let wall_slot = (rows + row) * cols + col;
                match code {
                    '.' => {}
                    'x' => tiles[floor_slot] = Some(Tile::new(TileKind::Floor, floor_pos, size)),
                    '#' => tiles[floor_slot] = Some(Tile::new(TileKind::Solid, floor_pos, size)),
                    'w' => {
                        tiles[floor_slot] = Some(Tile::new(TileKind::Solid, floor_pos, size));
                        let wall_pos = floor_pos + Vec3::new(0.0, TILE_HEIGHT, 0.0);
                        tiles[wall_slot] = Some(Tile::new(TileKind::Wall, wall_pos, size));
                    }
                    'P' => {
                        tiles[floor_slot] = Some(Tile::new(TileKind::Floor, floor_pos, size));
                        spawn_points.push(Vec3::new(
                            floor_pos.x + TILE_SIZE * 0.5,
                            TILE_HEIGHT,
                            floor_pos.z + TILE_SIZE * 0.5,
                        ));
                    }
                    _ => return Err(MapError::UnknownCell { code, row, col }),
                }
            }
        }

        if spawn_points.len() < player_count {
            return Err(MapError::NotEnoughSpawns {
                found: spawn_points.len(),
                required: player_count,
            });
        }

        // Rotate starting positions deterministically round over round
        spawn_points.shuffle(rng);

        let grid = Grid { cols, rows, tiles };
        let mut players = Vec::with_capacity(player_count);
        let mut hammers = Vec::with_capacity(player_count);
        for i in 0..player_count {
            let id = PlayerId(i);
            let spawn = spawn_points[i];
            let pos = Vec3::new(
                spawn.x - crate::consts::PLAYER_SIZE.x * 0.5,
                spawn.y,
                spawn.z - crate::consts::PLAYER_SIZE.z * 0.5,
            );
            let player = Player::spawn(id, pos);
            hammers.push(Hammer::new(id, player.body().center()));
            players.push(player);
        }

        Ok(Self {
            grid,
            players,
            hammers,
            paused: false,
            spawn_points,
        })
    }

    pub fn spawn_points(&self) -> &[Vec3] {
        &self.spawn_points
    }

    /// Players that still count for win/draw evaluation.
    pub fn players_alive(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive())
    }

    pub fn alive_count(&self) -> usize {
        self.players_alive().count()
    }

    /// Enable or disable every entity at once; the pre-round countdown keeps
    /// the whole arena inert until it elapses.
    pub fn set_enabled(&mut self, enabled: bool) {
        for player in &mut self.players {
            player.body_mut().enabled = enabled;
        }
        for hammer in &mut self.hammers {
            hammer.body_mut().enabled = enabled;
        }
        for tile in self.grid.tiles_mut() {
            tile.body_mut().enabled = enabled;
        }
    }

    /// Drop a dead player from every visitor set without exit damage.
    pub fn clear_visitors_of(&mut self, player: PlayerId) {
        for tile in self.grid.tiles_mut() {
            tile.clear_visitor(player);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_ragged_rows_abort_the_load() {
        let err = Arena::from_cells(&["xxx", "xx"], 2, &mut rng()).unwrap_err();
        assert_eq!(
            err,
            MapError::RaggedRow {
                row: 1,
                len: 2,
                expected: 3
            }
        );
    }

    #[test]
    fn test_insufficient_spawns_abort_the_load() {
        let err = Arena::from_cells(&["xxPxx"], 2, &mut rng()).unwrap_err();
        assert_eq!(
            err,
            MapError::NotEnoughSpawns {
                found: 1,
                required: 2
            }
        );
    }

    #[test]
    fn test_unknown_cell_code_is_rejected() {
        let err = Arena::from_cells(&["P?.P"], 2, &mut rng()).unwrap_err();
        assert_eq!(
            err,
            MapError::UnknownCell {
                code: '?',
                row: 0,
                col: 1
            }
        );
    }

    #[test]
    fn test_empty_map_is_rejected() {
        let rows: [&str; 0] = [];
        assert_eq!(
            Arena::from_cells(&rows, 2, &mut rng()).unwrap_err(),
            MapError::Empty
        );
    }

    #[test]
    fn test_two_spawn_grid_builds_two_live_players() {
        let arena = Arena::from_cells(&["P...P"], 2, &mut rng()).unwrap();
        assert_eq!(arena.players.len(), 2);
        assert_eq!(arena.hammers.len(), 2);
        assert_eq!(arena.alive_count(), 2);
        assert_eq!(arena.grid.cols(), 5);
        assert_eq!(arena.grid.rows(), 1);
    }

    #[test]
    fn test_wall_cells_stack_two_layers() {
        let arena = Arena::from_cells(&["wPP"], 2, &mut rng()).unwrap();
        let base = arena.grid.tile(0, 0, 0).unwrap();
        assert_eq!(base.kind(), TileKind::Solid);
        let top = arena.grid.tile(1, 0, 0).unwrap();
        assert_eq!(top.kind(), TileKind::Wall);
        assert!(arena.grid.tile(1, 0, 1).is_none());
    }

    #[test]
    fn test_footprint_over_tile_is_supported() {
        let arena = Arena::from_cells(&["PP"], 2, &mut rng()).unwrap();
        let standing = Aabb::from_pos_size(
            Vec3::new(0.1, TILE_HEIGHT, 0.1),
            Vec3::new(0.8, 1.0, 0.8),
        );
        assert!(!arena.grid.is_airborne(&standing));
    }

    #[test]
    fn test_footprint_past_the_edge_is_airborne() {
        let arena = Arena::from_cells(&["PP"], 2, &mut rng()).unwrap();
        let off_edge = Aabb::from_pos_size(
            Vec3::new(2.5, TILE_HEIGHT, 0.1),
            Vec3::new(0.8, 1.0, 0.8),
        );
        assert!(arena.grid.is_airborne(&off_edge));
    }

    #[test]
    fn test_exact_boundary_does_not_count_next_cell() {
        let arena = Arena::from_cells(&["PP."], 2, &mut rng()).unwrap();
        // Box spans exactly [2.0, 2.8]: column 2 is empty, and the max edge
        // at 2.8 ceils to 3 so column 3 (off-grid) is never reached; the min
        // edge exactly on the 2.0 boundary must not pull in column 1.
        let footprint = Aabb::from_pos_size(
            Vec3::new(2.0, TILE_HEIGHT, 0.1),
            Vec3::new(0.8, 1.0, 0.8),
        );
        assert!(arena.grid.is_airborne(&footprint));

        // Nudge the minimum edge a hair back over the last solid column
        let touching = Aabb::from_pos_size(
            Vec3::new(1.999, TILE_HEIGHT, 0.1),
            Vec3::new(0.8, 1.0, 0.8),
        );
        assert!(!arena.grid.is_airborne(&touching));
    }

    #[test]
    fn test_broken_tile_no_longer_supports() {
        let mut arena = Arena::from_cells(&["PP"], 2, &mut rng()).unwrap();
        let footprint = Aabb::from_pos_size(
            Vec3::new(0.1, TILE_HEIGHT, 0.1),
            Vec3::new(0.8, 1.0, 0.8),
        );
        assert!(!arena.grid.is_airborne(&footprint));
        for tile in arena.grid.tiles_mut() {
            while !tile.state().is_broken() {
                let pid = PlayerId(0);
                tile.on_enter(pid);
                tile.on_exit(pid);
            }
        }
        assert!(arena.grid.is_airborne(&footprint));
    }

    #[test]
    fn test_tile_above_the_footprint_is_not_support() {
        // Wall-top tiles (top at 2.0) cannot support a player standing at 1.0
        let arena = Arena::from_cells(&["wPP"], 2, &mut rng()).unwrap();
        let next_to_wall = Aabb::from_pos_size(
            Vec3::new(0.1, TILE_HEIGHT, 0.1),
            Vec3::new(0.8, 1.0, 0.8),
        );
        // Supported by the wall's solid base (top at 1.0), not the wall top
        assert!(!arena.grid.is_airborne(&next_to_wall));

        let floating = Aabb::from_pos_size(
            Vec3::new(0.1, TILE_HEIGHT + 0.5, 0.1),
            Vec3::new(0.8, 1.0, 0.8),
        );
        // Base top (1.0) is below the raised bottom (1.5): still "support"
        // by the at-or-below rule
        assert!(!arena.grid.is_airborne(&floating));
    }

    #[test]
    fn test_bad_player_count_is_rejected() {
        assert_eq!(
            Arena::from_cells(&["PP"], 1, &mut rng()).unwrap_err(),
            MapError::BadPlayerCount(1)
        );
        assert_eq!(
            Arena::from_cells(&["PP"], 9, &mut rng()).unwrap_err(),
            MapError::BadPlayerCount(9)
        );
    }

    #[test]
    fn test_cell_bounds_math() {
        let arena = Arena::from_cells(&["PP"], 2, &mut rng()).unwrap();
        let bounds = arena.grid.cell_bounds(1, 0, 1);
        assert_eq!(bounds.min, Vec3::new(TILE_SIZE, TILE_HEIGHT, 0.0));
        assert_eq!(
            bounds.max,
            Vec3::new(2.0 * TILE_SIZE, 2.0 * TILE_HEIGHT, TILE_SIZE)
        );
    }

    #[test]
    fn test_spawn_assignment_is_seed_deterministic() {
        let a = Arena::from_cells(&["P..P", "P..P"], 2, &mut rng()).unwrap();
        let b = Arena::from_cells(&["P..P", "P..P"], 2, &mut rng()).unwrap();
        for (pa, pb) in a.players.iter().zip(b.players.iter()) {
            assert_eq!(pa.body().pos, pb.body().pos);
        }
    }
}
