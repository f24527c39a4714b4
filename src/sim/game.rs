//! Match and round lifecycle
//!
//! A match is a sequence of rounds over a rotating map list until one player
//! collects enough round wins. Round state (score decision, countdown and
//! display timers) resets on every reload; scores persist for the life of
//! the match. All delays are accumulated elapsed-time counters compared
//! against constants - reloading implicitly cancels them.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::PRE_ROUND_DELAY;
use crate::rules::MatchRules;

use super::arena::{Arena, MapError};
use super::entity::PlayerId;
use super::events::GameEvent;
use super::input::InputFrame;

/// Round scoring decision. Terminal per round: the only transitions are
/// `None -> Winner` and `None -> Draw`, never backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreState {
    None,
    Winner(PlayerId),
    Draw,
}

/// Authoritative match state. Drive it with [`super::tick::tick`].
#[derive(Debug)]
pub struct Match {
    pub arena: Arena,
    rules: MatchRules,
    scores: Vec<u32>,
    score_state: ScoreState,
    /// Pre-round countdown remaining (s); entities are disabled while > 0
    countdown_s: f32,
    /// Time since the round was decided (s)
    over_s: f32,
    round: u32,
    map_index: usize,
    champion: Option<PlayerId>,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl Match {
    pub fn new(rules: MatchRules) -> Result<Self, MapError> {
        if rules.maps.is_empty() {
            return Err(MapError::Empty);
        }
        let player_count = rules.effective_player_count();

        // Validate the whole rotation up front; a bad map should fail match
        // creation, not round three.
        let mut scratch = Pcg32::seed_from_u64(rules.seed);
        for map in &rules.maps[1..] {
            Arena::from_cells(map, player_count, &mut scratch)?;
        }

        let mut rng = Pcg32::seed_from_u64(rules.seed);
        let mut arena = Arena::from_cells(rules.map(0), player_count, &mut rng)?;
        arena.set_enabled(false);

        log::info!(
            "match start: {} players, first to {} rounds, {} maps in rotation",
            player_count,
            rules.rounds_to_win,
            rules.maps.len()
        );

        Ok(Self {
            arena,
            scores: vec![0; player_count],
            rules,
            score_state: ScoreState::None,
            countdown_s: PRE_ROUND_DELAY,
            over_s: 0.0,
            round: 0,
            map_index: 0,
            champion: None,
            rng,
            events: Vec::new(),
        })
    }

    /// Advance one fixed timestep. Convenience wrapper over [`super::tick::tick`].
    pub fn tick(&mut self, inputs: &InputFrame, dt: f32) {
        super::tick::tick(self, inputs, dt);
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn score_state(&self) -> ScoreState {
        self.score_state
    }

    /// Zero-based round counter.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn map_index(&self) -> usize {
        self.map_index
    }

    /// Seconds of pre-round countdown left; zero once the round is live.
    pub fn countdown_s(&self) -> f32 {
        self.countdown_s
    }

    pub fn is_paused(&self) -> bool {
        self.arena.paused
    }

    /// The match winner, once a score reaches the target.
    pub fn champion(&self) -> Option<PlayerId> {
        self.champion
    }

    /// Hand queued cues to the audio/haptics collaborator.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn events_mut(&mut self) -> &mut Vec<GameEvent> {
        &mut self.events
    }

    // --- lifecycle internals (driven by tick.rs) ---------------------------

    pub(crate) fn countdown_mut(&mut self) -> &mut f32 {
        &mut self.countdown_s
    }

    pub(crate) fn over_elapsed_mut(&mut self) -> &mut f32 {
        &mut self.over_s
    }

    /// Decide the round. Only the first call per round sticks.
    pub(crate) fn decide_round(&mut self, decision: ScoreState) {
        if self.score_state != ScoreState::None || decision == ScoreState::None {
            return;
        }
        self.score_state = decision;
        match decision {
            ScoreState::Winner(id) => {
                self.scores[id.index()] += 1;
                log::info!(
                    "round {} won by {id}; score {:?}",
                    self.round + 1,
                    self.scores
                );
                self.events.push(GameEvent::RoundWon { winner: id });
            }
            ScoreState::Draw => {
                log::info!("round {} drawn", self.round + 1);
                self.events.push(GameEvent::RoundDraw);
            }
            ScoreState::None => unreachable!(),
        }
    }

    /// True when the decided round's winner has hit the target.
    pub(crate) fn target_reached(&self) -> bool {
        match self.score_state {
            ScoreState::Winner(id) => self.scores[id.index()] >= self.rules.rounds_to_win,
            _ => false,
        }
    }

    pub(crate) fn finish(&mut self) {
        if let ScoreState::Winner(id) = self.score_state {
            self.champion = Some(id);
            log::info!("match over: {id} takes it {:?}", self.scores);
            self.events.push(GameEvent::MatchOver { champion: id });
        }
    }

    /// Reload onto the next map in the rotation and reset all round state.
    /// Scores survive; everything else starts fresh.
    pub(crate) fn next_round(&mut self) {
        self.round += 1;
        self.map_index = (self.map_index + 1) % self.rules.maps.len();
        let player_count = self.rules.effective_player_count();
        let map = self.rules.map(self.map_index).to_vec();
        // The rotation validated at match creation; failing now means the
        // rules were mutated out from under us - fail loudly.
        let mut arena = Arena::from_cells(&map, player_count, &mut self.rng)
            .unwrap_or_else(|e| panic!("map {} invalid on reload: {e}", self.map_index));
        arena.set_enabled(false);
        self.arena = arena;
        self.score_state = ScoreState::None;
        self.countdown_s = PRE_ROUND_DELAY;
        self.over_s = 0.0;
        log::info!(
            "round {} loading map {}",
            self.round + 1,
            self.map_index
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::entity::Entity;
    use crate::consts::POST_ROUND_DELAY;

    fn flat_rules() -> MatchRules {
        MatchRules {
            player_count: 2,
            rounds_to_win: 2,
            seed: 11,
            maps: vec![
                vec!["PxxP".into()],
                vec!["PxxxP".into()],
            ],
        }
    }

    #[test]
    fn test_new_match_is_counting_down() {
        let m = Match::new(flat_rules()).unwrap();
        assert_eq!(m.score_state(), ScoreState::None);
        assert_eq!(m.round(), 0);
        assert!(m.countdown_s() > 0.0);
        assert_eq!(m.scores(), &[0, 0]);
        assert!(m.champion().is_none());
        assert!(!m.arena.players[0].body().enabled);
    }

    #[test]
    fn test_empty_rotation_is_rejected() {
        let rules = MatchRules {
            maps: vec![],
            ..flat_rules()
        };
        assert_eq!(Match::new(rules).unwrap_err(), MapError::Empty);
    }

    #[test]
    fn test_round_decision_sticks() {
        let mut m = Match::new(flat_rules()).unwrap();
        m.decide_round(ScoreState::Winner(PlayerId(0)));
        assert_eq!(m.score_state(), ScoreState::Winner(PlayerId(0)));
        assert_eq!(m.scores(), &[1, 0]);

        // Later decisions in the same round are ignored
        m.decide_round(ScoreState::Draw);
        m.decide_round(ScoreState::Winner(PlayerId(1)));
        assert_eq!(m.score_state(), ScoreState::Winner(PlayerId(0)));
        assert_eq!(m.scores(), &[1, 0]);
    }

    #[test]
    fn test_draw_scores_nobody() {
        let mut m = Match::new(flat_rules()).unwrap();
        m.decide_round(ScoreState::Draw);
        assert_eq!(m.scores(), &[0, 0]);
        assert!(!m.target_reached());
    }

    #[test]
    fn test_next_round_rotates_and_keeps_scores() {
        let mut m = Match::new(flat_rules()).unwrap();
        m.decide_round(ScoreState::Winner(PlayerId(1)));
        *m.over_elapsed_mut() = POST_ROUND_DELAY;
        m.next_round();

        assert_eq!(m.round(), 1);
        assert_eq!(m.map_index(), 1);
        assert_eq!(m.scores(), &[0, 1]);
        assert_eq!(m.score_state(), ScoreState::None);
        assert!(m.countdown_s() > 0.0);
        assert_eq!(m.arena.grid.cols(), 5);
    }

    #[test]
    fn test_target_reached_crowns_champion() {
        let mut m = Match::new(flat_rules()).unwrap();
        m.decide_round(ScoreState::Winner(PlayerId(0)));
        assert!(!m.target_reached());
        m.next_round();
        m.decide_round(ScoreState::Winner(PlayerId(0)));
        assert!(m.target_reached());
        m.finish();
        assert_eq!(m.champion(), Some(PlayerId(0)));
        let cues: Vec<_> = m.drain_events().iter().map(|e| e.cue()).collect();
        assert!(cues.contains(&"match_over"));
    }
}
