//! Fixed timestep simulation tick
//!
//! Update order within a tick is fixed and must never change, or collision
//! outcomes stop being reproducible: pause and countdown gates first, then
//! tiles, then hammers, then players in slot order, then round scoring.
//! Hammers move before players, so a strike this tick creates the pushback
//! the player integrates next tick.

use glam::Vec3;

use crate::consts::{DASH_DISTANCE, KILL_PLANE_Y, POST_ROUND_DELAY};
use crate::{heading_or_default, horizontal};

use super::arena::{Arena, Grid};
use super::entity::Entity;
use super::events::GameEvent;
use super::game::{Match, ScoreState};
use super::geometry::{Aabb, intersection_depth};
use super::input::InputFrame;
use super::player::{Player, PlayerState};
use super::tile::TileKind;

/// Advance the match by one fixed timestep.
pub fn tick(m: &mut Match, inputs: &InputFrame, dt: f32) {
    // Pause edges are honored even while paused; nothing else is
    if inputs.pause_pressed_any() {
        m.arena.paused = !m.arena.paused;
        m.push_event(GameEvent::ButtonPress);
    }
    if m.arena.paused || m.champion().is_some() {
        return;
    }

    // Pre-round countdown: the whole arena stays inert until it elapses,
    // then everything goes live atomically
    if m.countdown_s() > 0.0 {
        let remaining = m.countdown_s() - dt;
        *m.countdown_mut() = remaining.max(0.0);
        if remaining <= 0.0 {
            m.arena.set_enabled(true);
            m.push_event(GameEvent::RoundStart);
            log::debug!("round {} live", m.round() + 1);
        }
        return;
    }

    let mut events = Vec::new();
    update_tiles(&mut m.arena, &mut events);
    update_hammers(&mut m.arena, inputs, dt, &mut events);
    update_players(&mut m.arena, inputs, dt, &mut events);
    m.events_mut().append(&mut events);

    // Round scoring: a decision is terminal for the round
    if m.score_state() == ScoreState::None {
        if m.arena.alive_count() <= 1 {
            let decision = match m.arena.players_alive().next() {
                Some(winner) => ScoreState::Winner(winner.id()),
                None => ScoreState::Draw,
            };
            m.decide_round(decision);
        }
    } else {
        let elapsed = {
            let over = m.over_elapsed_mut();
            *over += dt;
            *over
        };
        if elapsed >= POST_ROUND_DELAY {
            if m.target_reached() {
                m.finish();
            } else {
                m.next_round();
            }
        }
    }
}

/// Tile pass: occupancy exit damage for floors, hammer contact for walls.
fn update_tiles(arena: &mut Arena, events: &mut Vec<GameEvent>) {
    let players = &arena.players;
    let hammers = &arena.hammers;
    let grid = &mut arena.grid;

    for tile in grid.tiles_mut() {
        if !tile.is_solid() {
            continue;
        }
        match tile.kind() {
            TileKind::Floor => {
                let bounds = tile.aabb();
                for p in players {
                    if p.state() == PlayerState::Dead {
                        tile.clear_visitor(p.id());
                        continue;
                    }
                    if p.aabb().overlaps_horizontally(&bounds) {
                        tile.on_enter(p.id());
                    } else if tile.has_visitor(p.id()) && tile.on_exit(p.id()) {
                        events.push(if tile.state().is_broken() {
                            GameEvent::TileBroken
                        } else {
                            GameEvent::TileCracked
                        });
                    }
                }
            }
            TileKind::Wall => {
                let bounds = tile.aabb();
                // One step per tick no matter how many hammers overlap
                let struck = hammers
                    .iter()
                    .any(|h| h.in_flight() && h.aabb().intersects(&bounds));
                if struck {
                    let broke = tile.damage();
                    events.push(if broke {
                        GameEvent::TileBroken
                    } else {
                        GameEvent::TileCracked
                    });
                }
            }
            TileKind::Solid => {}
        }
    }
}

/// Hammer pass: aim pass-through while held, flight/homing otherwise.
fn update_hammers(arena: &mut Arena, inputs: &InputFrame, dt: f32, events: &mut Vec<GameEvent>) {
    let players = &arena.players;
    let hammers = &mut arena.hammers;

    for h in hammers.iter_mut() {
        let owner = &players[h.owner().index()];
        if h.is_held() {
            h.set_aim(horizontal(inputs.player(owner.id()).aim()));
        }
        let owner_dead = owner.state() == PlayerState::Dead;
        if h.update(owner.body().center(), owner_dead, dt) {
            events.push(GameEvent::HammerReturned { to: owner.id() });
        }
    }
}

/// Player pass: state machine, integration, resolution, hammer strikes,
/// fall and death detection, in slot order. Later slots observe earlier
/// slots' already-updated positions; that is the documented order.
fn update_players(arena: &mut Arena, inputs: &InputFrame, dt: f32, events: &mut Vec<GameEvent>) {
    let grid = &arena.grid;
    let solids = grid.solid_aabbs();
    let players = &mut arena.players;
    let hammers = &mut arena.hammers;

    for i in 0..players.len() {
        let (before, rest) = players.split_at_mut(i);
        let Some((player, after)) = rest.split_first_mut() else {
            continue;
        };
        if player.state() == PlayerState::Dead {
            continue;
        }

        let input = inputs.player(player.id());
        let move_dir = horizontal(input.movement());
        let on_ground = !grid.is_airborne(&player.aabb());

        // Primary per-state switch
        match player.state() {
            PlayerState::Standing | PlayerState::Walking => {
                if input.throw_held() && hammers[i].is_held() {
                    player.begin_charge();
                } else if player.state() == PlayerState::Walking && input.dash_pressed() {
                    let dir = heading_or_default(move_dir, player.heading());
                    let distance = dash_distance(grid, &player.aabb(), dir, player.body().size);
                    player.start_dash(dir, distance);
                    events.push(GameEvent::Dashed { id: player.id() });
                } else {
                    player.set_moving(move_dir.length_squared() > 1e-8);
                }
            }
            PlayerState::Charging => {
                player.accumulate_charge(dt);
                if input.throw_released() {
                    let distance = player.throw_distance();
                    hammers[i].throw(distance, horizontal(input.aim()), player.heading());
                    events.push(GameEvent::HammerThrown { by: player.id() });
                    player.end_charge();
                }
            }
            PlayerState::Immobilized => {
                player.tick_immobilized(dt);
            }
            // Unstoppable moves and falling integrate below without control
            PlayerState::Dashing
            | PlayerState::Pushback
            | PlayerState::Falling
            | PlayerState::Dead => {}
        }

        let control = match player.state() {
            PlayerState::Standing
            | PlayerState::Walking
            | PlayerState::Charging
            | PlayerState::Falling => move_dir,
            _ => Vec3::ZERO,
        };

        let pre_move = player.body().pos;
        player.integrate(control, on_ground, dt);

        for obstacle in &solids {
            resolve(player, obstacle);
        }
        for other in before.iter().chain(after.iter()) {
            if other.state() == PlayerState::Dead {
                continue;
            }
            resolve(player, &other.aabb());
        }
        player.settle_after_move(pre_move);

        // Hammer strikes: once per flight per player, first hit wins
        for h in hammers.iter_mut() {
            if h.owner() == player.id() || !h.in_flight() {
                continue;
            }
            if !h.aabb().intersects(&player.aabb()) {
                continue;
            }
            if !h.mark_hit(player.id()) {
                continue;
            }
            let dir = h.heading();
            h.hit();
            player.start_pushback(dir);
            events.push(GameEvent::PlayerHit {
                victim: player.id(),
                by: h.owner(),
            });
        }

        // Nothing under the footprint: over the edge
        if !matches!(
            player.state(),
            PlayerState::Dashing | PlayerState::Falling | PlayerState::Dead
        ) && grid.is_airborne(&player.aabb())
        {
            player.start_falling();
            events.push(GameEvent::PlayerFell { id: player.id() });
        }

        if player.body().pos.y < KILL_PLANE_Y {
            player.die();
            events.push(GameEvent::PlayerDied { id: player.id() });
        }

        if player.state() == PlayerState::Walking && on_ground && player.step(dt) {
            events.push(GameEvent::Footstep { id: player.id() });
        }
    }
}

/// Push the player out of `obstacle` along the single shallowest axis;
/// ties break X, then Y, then Z. Resolving one axis at a time keeps a
/// box wedged into a corner from jittering between both faces.
fn resolve(player: &mut Player, obstacle: &Aabb) {
    let depth = intersection_depth(&player.aabb(), obstacle);
    if depth == Vec3::ZERO {
        return;
    }
    let (ax, ay, az) = (depth.x.abs(), depth.y.abs(), depth.z.abs());
    let pos = &mut player.body_mut().pos;
    if ax <= ay && ax <= az {
        pos.x += depth.x;
    } else if ay <= az {
        pos.y += depth.y;
    } else {
        pos.z += depth.z;
    }
}

/// Smart dash range: probe shrinking distances (in footprint-sized steps)
/// until one lands over ground; a dash over nothing but void floors at 0.
fn dash_distance(grid: &Grid, footprint: &Aabb, dir: Vec3, size: Vec3) -> f32 {
    let step = size.x.min(size.z);
    let mut distance = DASH_DISTANCE;
    while distance > 0.0 {
        if !grid.is_airborne(&footprint.shifted(dir * distance)) {
            return distance;
        }
        distance -= step;
    }
    0.0
}
