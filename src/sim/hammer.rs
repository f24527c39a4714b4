//! The boomeranging hammer
//!
//! One hammer per player, created at spawn and never destroyed until the map
//! reloads; its state resets each throw cycle. While held it shadows the
//! owner and mirrors the aim input. Thrown, it flies straight until its
//! charge-derived range runs out, then homes back to the owner's current
//! position every tick until caught.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{HAMMER_PICKUP_RADIUS, HAMMER_SIZE, HAMMER_SPEED, MAX_PLAYERS};
use crate::heading_or_default;

use super::entity::{Body, Entity, PlayerId};

/// Hammer flight state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HammerState {
    /// In the owner's hand; direction is aim pass-through
    Held,
    /// Outbound leg of a throw
    Flying,
    /// Homing back to the owner
    Returning,
}

#[derive(Debug, Clone)]
pub struct Hammer {
    owner: PlayerId,
    state: HammerState,
    body: Body,
    /// Position the current flight started from
    origin: Vec3,
    /// Straight-line range of the current flight
    max_distance: f32,
    speed: f32,
    /// Players already struck during the current flight
    hit_players: [bool; MAX_PLAYERS],
}

impl Hammer {
    pub fn new(owner: PlayerId, pos: Vec3) -> Self {
        let mut body = Body::new(pos, HAMMER_SIZE);
        body.visible = false;
        Self {
            owner,
            state: HammerState::Held,
            body,
            origin: pos,
            max_distance: 0.0,
            speed: HAMMER_SPEED,
            hit_players: [false; MAX_PLAYERS],
        }
    }

    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn state(&self) -> HammerState {
        self.state
    }

    pub fn is_held(&self) -> bool {
        self.state == HammerState::Held
    }

    /// Flying or returning; the states in which the hammer hits things.
    pub fn in_flight(&self) -> bool {
        matches!(self.state, HammerState::Flying | HammerState::Returning)
    }

    pub fn heading(&self) -> Vec3 {
        self.body.dir
    }

    /// Straight-line range of the current flight.
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Aim pass-through while held. Not a state transition.
    pub fn set_aim(&mut self, aim: Vec3) {
        if self.is_held() && aim.length_squared() > 1e-8 {
            self.body.dir = aim.normalize();
        }
    }

    /// Held -> Flying. A throw while not held is a no-op; it must never reset
    /// an in-flight hammer.
    pub fn throw(&mut self, distance: f32, aim: Vec3, fallback: Vec3) {
        if !self.is_held() {
            return;
        }
        self.body.dir = heading_or_default(aim, fallback);
        self.origin = self.body.pos;
        self.max_distance = distance;
        self.hit_players = [false; MAX_PLAYERS];
        self.body.visible = true;
        self.state = HammerState::Flying;
    }

    /// Strike feedback: cut the outbound leg short and return immediately.
    pub fn hit(&mut self) {
        if self.in_flight() {
            self.state = HammerState::Returning;
        }
    }

    /// Check-and-mark the per-flight hit slot for `player`. True exactly once
    /// per player per flight, no matter how many ticks the boxes overlap.
    pub fn mark_hit(&mut self, player: PlayerId) -> bool {
        if self.hit_players[player.index()] {
            return false;
        }
        self.hit_players[player.index()] = true;
        true
    }

    /// Advance one tick. The caller resolves the owner through the registry
    /// and passes its current center; the hammer holds no reference back.
    /// Returns true when the hammer lands back in the owner's hand this tick.
    pub fn update(&mut self, owner_center: Vec3, owner_dead: bool, dt: f32) -> bool {
        match self.state {
            HammerState::Held => {
                // Shadow the owner at chest height
                self.body.pos = owner_center - self.body.size * 0.5;
                false
            }
            HammerState::Flying => {
                self.body.pos += self.body.dir * self.speed * dt;
                if (self.body.pos - self.origin).length_squared()
                    >= self.max_distance * self.max_distance
                {
                    self.state = HammerState::Returning;
                }
                false
            }
            HammerState::Returning => {
                let to_owner = owner_center - self.body.center();
                if owner_dead
                    || to_owner.length_squared() <= HAMMER_PICKUP_RADIUS * HAMMER_PICKUP_RADIUS
                {
                    self.pickup();
                    return true;
                }
                // Retarget every tick; the owner keeps moving
                self.body.dir = to_owner.normalize();
                self.body.pos += self.body.dir * self.speed * dt;
                false
            }
        }
    }

    fn pickup(&mut self) {
        self.state = HammerState::Held;
        self.body.dir = Vec3::ZERO;
        self.body.visible = false;
    }
}

impl Entity for Hammer {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}
