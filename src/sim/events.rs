//! Fire-and-forget cues for audio/haptics collaborators
//!
//! The simulation pushes events as they happen; collaborators drain them
//! after each tick via [`crate::sim::Match::drain_events`]. The sim never
//! waits on or checks delivery.

use super::entity::PlayerId;

/// Gameplay cue emitted by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Pause toggled
    ButtonPress,
    /// Countdown elapsed; entities are live
    RoundStart,
    HammerThrown { by: PlayerId },
    HammerReturned { to: PlayerId },
    PlayerHit { victim: PlayerId, by: PlayerId },
    PlayerFell { id: PlayerId },
    PlayerDied { id: PlayerId },
    Dashed { id: PlayerId },
    Footstep { id: PlayerId },
    TileCracked,
    TileBroken,
    RoundWon { winner: PlayerId },
    RoundDraw,
    MatchOver { champion: PlayerId },
}

impl GameEvent {
    /// Stable identifier keying the audio/haptics boundary.
    pub fn cue(&self) -> &'static str {
        match self {
            GameEvent::ButtonPress => "button_press",
            GameEvent::RoundStart => "round_start",
            GameEvent::HammerThrown { .. } => "throw",
            GameEvent::HammerReturned { .. } => "hammer_return",
            GameEvent::PlayerHit { .. } => "hit",
            GameEvent::PlayerFell { .. } => "fall",
            GameEvent::PlayerDied { .. } => "death",
            GameEvent::Dashed { .. } => "dash",
            GameEvent::Footstep { .. } => "footstep",
            GameEvent::TileCracked => "tile_crack",
            GameEvent::TileBroken => "tile_break",
            GameEvent::RoundWon { .. } => "round_win",
            GameEvent::RoundDraw => "round_draw",
            GameEvent::MatchOver { .. } => "match_over",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cues_match_boundary_identifiers() {
        assert_eq!(GameEvent::PlayerHit { victim: PlayerId(0), by: PlayerId(1) }.cue(), "hit");
        assert_eq!(GameEvent::PlayerFell { id: PlayerId(0) }.cue(), "fall");
        assert_eq!(GameEvent::PlayerDied { id: PlayerId(0) }.cue(), "death");
        assert_eq!(GameEvent::Dashed { id: PlayerId(0) }.cue(), "dash");
        assert_eq!(GameEvent::Footstep { id: PlayerId(0) }.cue(), "footstep");
        assert_eq!(GameEvent::ButtonPress.cue(), "button_press");
    }
}
