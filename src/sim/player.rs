//! Player state machine and movement physics
//!
//! The per-tick orchestration (reading inputs, querying the grid, resolving
//! collisions) lives in `tick.rs`; this module owns the player's own state
//! transitions and integration math.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::{
    AIR_CONTROL, AIR_DRAG, DASH_SPEED, GRAVITY, GROUND_DRAG, IMMOBILIZE_MS, MAX_FALL_SPEED,
    MAX_THROW_DISTANCE, MIN_THROW_DISTANCE, CHARGE_UNIT, FOOTSTEP_INTERVAL, PLAYER_ACCEL,
    PLAYER_MAX_SPEED, PLAYER_SIZE, PUSHBACK_DISTANCE, PUSHBACK_SPEED,
};

use super::entity::{Body, Entity, PlayerId};

/// Player lifecycle and movement states. `Dead` is terminal until reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Standing,
    Walking,
    /// Holding the throw input, winding up a hammer flight
    Charging,
    Dashing,
    /// Knocked back by a hammer strike
    Pushback,
    /// Post-dash freeze; gravity still applies
    Immobilized,
    Falling,
    Dead,
}

/// An in-progress dash or pushback: a constant-velocity displacement that
/// overrides player control until its distance budget runs out. At most one
/// exists at a time, and only while the state is Dashing/Pushback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Unstoppable {
    Dash { dir: Vec3, remaining: f32 },
    Pushback { dir: Vec3, remaining: f32 },
}

impl Unstoppable {
    fn speed(&self) -> f32 {
        match self {
            Unstoppable::Dash { .. } => DASH_SPEED,
            Unstoppable::Pushback { .. } => PUSHBACK_SPEED,
        }
    }

    fn dir(&self) -> Vec3 {
        match self {
            Unstoppable::Dash { dir, .. } | Unstoppable::Pushback { dir, .. } => *dir,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    body: Body,
    vel: Vec3,
    state: PlayerState,
    /// Accumulated while Charging; converted to throw distance on release
    charge_ms: f32,
    unstoppable: Option<Unstoppable>,
    immobilized_ms: f32,
    footstep_s: f32,
}

impl Player {
    pub fn spawn(id: PlayerId, pos: Vec3) -> Self {
        Self {
            id,
            body: Body::new(pos, PLAYER_SIZE),
            vel: Vec3::ZERO,
            state: PlayerState::Standing,
            charge_ms: 0.0,
            unstoppable: None,
            immobilized_ms: 0.0,
            footstep_s: 0.0,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn velocity(&self) -> Vec3 {
        self.vel
    }

    pub fn charge_ms(&self) -> f32 {
        self.charge_ms
    }

    pub fn unstoppable(&self) -> Option<&Unstoppable> {
        self.unstoppable.as_ref()
    }

    /// Last intended heading; zero until the player first moves.
    pub fn heading(&self) -> Vec3 {
        self.body.dir
    }

    /// Not Dead and not past the point of no return.
    pub fn is_alive(&self) -> bool {
        !matches!(self.state, PlayerState::Dead | PlayerState::Falling)
    }

    // --- state transitions -------------------------------------------------

    pub fn begin_charge(&mut self) {
        self.state = PlayerState::Charging;
        self.charge_ms = 0.0;
    }

    pub fn accumulate_charge(&mut self, dt: f32) {
        self.charge_ms += dt * 1000.0;
    }

    /// Charge converted to throw distance, clamped into the configured band.
    pub fn throw_distance(&self) -> f32 {
        (self.charge_ms * CHARGE_UNIT).clamp(MIN_THROW_DISTANCE, MAX_THROW_DISTANCE)
    }

    pub fn end_charge(&mut self) {
        self.state = PlayerState::Standing;
    }

    /// Toggle Standing/Walking purely on whether there is movement intent.
    pub fn set_moving(&mut self, moving: bool) {
        self.state = if moving {
            PlayerState::Walking
        } else {
            PlayerState::Standing
        };
    }

    pub fn start_dash(&mut self, dir: Vec3, distance: f32) {
        self.unstoppable = Some(Unstoppable::Dash {
            dir,
            remaining: distance,
        });
        self.state = PlayerState::Dashing;
        self.body.visible = false;
    }

    /// Knockback from a hammer strike. Refused while a dash or another
    /// pushback is active; a second hit the same tick never overrides.
    pub fn start_pushback(&mut self, dir: Vec3) -> bool {
        if self.unstoppable.is_some() || self.state == PlayerState::Dead {
            return false;
        }
        let dir = Vec3::new(dir.x, 0.0, dir.z);
        if dir.length_squared() < 1e-8 {
            return false;
        }
        self.unstoppable = Some(Unstoppable::Pushback {
            dir: dir.normalize(),
            remaining: PUSHBACK_DISTANCE,
        });
        self.state = PlayerState::Pushback;
        true
    }

    /// Counts down the post-dash freeze. Returns true when it elapses.
    pub fn tick_immobilized(&mut self, dt: f32) -> bool {
        self.immobilized_ms -= dt * 1000.0;
        if self.immobilized_ms <= 0.0 {
            self.immobilized_ms = 0.0;
            self.state = PlayerState::Standing;
            return true;
        }
        false
    }

    pub fn start_falling(&mut self) {
        // A knockback or dash interrupted by the edge ends here; the
        // unstoppable record only lives alongside its own state.
        self.unstoppable = None;
        self.state = PlayerState::Falling;
    }

    /// Terminal transition. Side effects run at most once; callers guard on
    /// the current state.
    pub fn die(&mut self) {
        self.state = PlayerState::Dead;
        self.vel = Vec3::ZERO;
        self.unstoppable = None;
        self.body.visible = false;
        self.body.enabled = false;
    }

    /// Footstep cadence while walking. Returns true when a step lands.
    pub fn step(&mut self, dt: f32) -> bool {
        self.footstep_s += dt;
        if self.footstep_s >= FOOTSTEP_INTERVAL {
            self.footstep_s = 0.0;
            return true;
        }
        false
    }

    // --- physics -----------------------------------------------------------

    /// One integration step. `control` is the (unit-clamped) movement intent
    /// on the ground plane; ignored while an unstoppable move drives the
    /// player. Gravity applies in every state.
    pub fn integrate(&mut self, control: Vec3, on_ground: bool, dt: f32) {
        let drag = if on_ground { GROUND_DRAG } else { AIR_DRAG };

        match self.unstoppable {
            Some(mv) => {
                let v = mv.dir() * mv.speed() * drag;
                self.vel.x = v.x;
                self.vel.z = v.z;
            }
            None => {
                let accel = if on_ground {
                    PLAYER_ACCEL
                } else {
                    PLAYER_ACCEL * AIR_CONTROL
                };
                self.vel.x += control.x * accel * dt;
                self.vel.z += control.z * accel * dt;

                // Clamp the horizontal norm, not each axis, then apply drag
                let h = Vec2::new(self.vel.x, self.vel.z).clamp_length_max(PLAYER_MAX_SPEED) * drag;
                self.vel.x = h.x;
                self.vel.z = h.y;

                if control.length_squared() > 1e-8 {
                    self.body.dir = Vec3::new(control.x, 0.0, control.z).normalize();
                }
            }
        }

        self.vel.y = (self.vel.y - GRAVITY * dt).max(-MAX_FALL_SPEED);
        self.body.pos += self.vel * dt;
    }

    /// Post-resolution bookkeeping: zero velocity on axes the resolver held
    /// in place, and charge the unstoppable budget with the distance actually
    /// covered (collision truncation included). Handles dash/pushback
    /// exhaustion transitions.
    pub fn settle_after_move(&mut self, pre_move: Vec3) {
        const EPS: f32 = 1e-5;
        let moved = self.body.pos - pre_move;
        if moved.x.abs() < EPS {
            self.vel.x = 0.0;
        }
        if moved.y.abs() < EPS {
            self.vel.y = 0.0;
        }
        if moved.z.abs() < EPS {
            self.vel.z = 0.0;
        }

        let Some(mv) = self.unstoppable.as_mut() else {
            return;
        };
        let actual = Vec2::new(moved.x, moved.z).length();
        let remaining = match mv {
            Unstoppable::Dash { remaining, .. } | Unstoppable::Pushback { remaining, .. } => {
                *remaining -= actual;
                *remaining
            }
        };

        // A fully blocked move would never drain its budget; end it instead
        // of pinning the player against the obstacle forever.
        if remaining <= 0.0 || actual < EPS {
            let was_dash = matches!(mv, Unstoppable::Dash { .. });
            self.unstoppable = None;
            if was_dash {
                self.state = PlayerState::Immobilized;
                self.immobilized_ms = IMMOBILIZE_MS;
                self.body.visible = true;
            } else {
                self.state = PlayerState::Standing;
            }
        }
    }
}

impl Entity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    const P0: PlayerId = PlayerId(0);

    fn grounded_player() -> Player {
        Player::spawn(P0, Vec3::new(0.0, 1.0, 0.0))
    }

    #[test]
    fn test_charge_clamps_to_throw_band() {
        let mut p = grounded_player();
        p.begin_charge();
        assert_eq!(p.charge_ms(), 0.0);

        // A tap still throws the minimum distance
        p.accumulate_charge(SIM_DT);
        assert_eq!(p.throw_distance(), MIN_THROW_DISTANCE);

        // Ten seconds of winding up cannot exceed the maximum
        for _ in 0..1200 {
            p.accumulate_charge(SIM_DT);
        }
        assert!(p.charge_ms() * CHARGE_UNIT > MAX_THROW_DISTANCE);
        assert_eq!(p.throw_distance(), MAX_THROW_DISTANCE);
    }

    #[test]
    fn test_pushback_never_overrides_active_move() {
        let mut p = grounded_player();
        assert!(p.start_pushback(Vec3::X));
        assert!(!p.start_pushback(Vec3::NEG_Z));
        match p.unstoppable() {
            Some(Unstoppable::Pushback { dir, .. }) => assert_eq!(*dir, Vec3::X),
            other => panic!("unexpected move: {other:?}"),
        }
    }

    #[test]
    fn test_pushback_refused_during_dash() {
        let mut p = grounded_player();
        p.start_dash(Vec3::X, 3.0);
        assert!(!p.start_pushback(Vec3::NEG_X));
        assert_eq!(p.state(), PlayerState::Dashing);
    }

    #[test]
    fn test_zero_direction_pushback_is_refused() {
        let mut p = grounded_player();
        assert!(!p.start_pushback(Vec3::ZERO));
        assert!(p.unstoppable().is_none());
    }

    #[test]
    fn test_dash_exhaustion_immobilizes_and_restores_visibility() {
        let mut p = grounded_player();
        p.start_dash(Vec3::X, 0.1);
        assert!(!p.body().visible);

        // Drive until the budget drains
        for _ in 0..100 {
            let pre = p.body().pos;
            p.integrate(Vec3::ZERO, true, SIM_DT);
            // Keep it on the ground so only horizontal motion counts
            p.body_mut().pos.y = pre.y;
            p.settle_after_move(pre);
            if p.state() != PlayerState::Dashing {
                break;
            }
        }
        assert_eq!(p.state(), PlayerState::Immobilized);
        assert!(p.body().visible);
        assert!(p.unstoppable().is_none());

        // Cooldown releases back to Standing
        let mut released = false;
        for _ in 0..100 {
            if p.tick_immobilized(SIM_DT) {
                released = true;
                break;
            }
        }
        assert!(released);
        assert_eq!(p.state(), PlayerState::Standing);
    }

    #[test]
    fn test_pushback_exhaustion_returns_to_standing() {
        let mut p = grounded_player();
        assert!(p.start_pushback(Vec3::X));
        for _ in 0..500 {
            let pre = p.body().pos;
            p.integrate(Vec3::ZERO, true, SIM_DT);
            p.body_mut().pos.y = pre.y;
            p.settle_after_move(pre);
            if p.state() != PlayerState::Pushback {
                break;
            }
        }
        assert_eq!(p.state(), PlayerState::Standing);
        assert!(p.unstoppable().is_none());
    }

    #[test]
    fn test_blocked_unstoppable_ends_instead_of_pinning() {
        let mut p = grounded_player();
        assert!(p.start_pushback(Vec3::X));
        let pre = p.body().pos;
        p.integrate(Vec3::ZERO, true, SIM_DT);
        // Resolver pushed the player all the way back
        p.body_mut().pos = pre;
        p.settle_after_move(pre);
        assert_eq!(p.state(), PlayerState::Standing);
        assert!(p.unstoppable().is_none());
    }

    #[test]
    fn test_horizontal_speed_clamped_by_norm() {
        let mut p = grounded_player();
        let control = Vec3::new(1.0, 0.0, 1.0).normalize();
        for _ in 0..600 {
            let pre = p.body().pos;
            p.integrate(control, true, SIM_DT);
            p.body_mut().pos.y = pre.y;
            p.settle_after_move(pre);
        }
        let h = Vec2::new(p.velocity().x, p.velocity().z);
        assert!(h.length() <= PLAYER_MAX_SPEED + 1e-3);
    }

    #[test]
    fn test_fall_speed_clamped() {
        let mut p = grounded_player();
        for _ in 0..600 {
            p.integrate(Vec3::ZERO, false, SIM_DT);
        }
        assert!(p.velocity().y >= -MAX_FALL_SPEED - 1e-6);
    }

    #[test]
    fn test_integrate_records_last_heading() {
        let mut p = grounded_player();
        p.integrate(Vec3::X, true, SIM_DT);
        assert_eq!(p.heading(), Vec3::X);
        // No intent keeps the last heading
        p.integrate(Vec3::ZERO, true, SIM_DT);
        assert_eq!(p.heading(), Vec3::X);
    }

    #[test]
    fn test_die_is_terminal_and_disables() {
        let mut p = grounded_player();
        p.die();
        assert_eq!(p.state(), PlayerState::Dead);
        assert!(!p.body().visible);
        assert!(!p.body().enabled);
        assert!(!p.is_alive());
    }

    #[test]
    fn test_falling_counts_as_not_alive() {
        let mut p = grounded_player();
        p.start_falling();
        assert!(!p.is_alive());
    }
}
