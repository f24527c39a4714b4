//! Match configuration
//!
//! Handed to [`crate::sim::Match::new`] by the front end once per match.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_PLAYERS;

/// Match setup: who plays, how long, and on which maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRules {
    /// Number of connected players (2..=MAX_PLAYERS)
    pub player_count: usize,
    /// Round wins required to take the match
    pub rounds_to_win: u32,
    /// Seed for spawn assignment; same seed, same match
    pub seed: u64,
    /// Map rotation as loader-produced cell-code rows.
    ///
    /// Cell codes: `.` empty, `x` breakable floor, `#` solid floor,
    /// `w` wall (solid floor plus a hammer-breakable block on top),
    /// `P` player spawn on breakable floor.
    pub maps: Vec<Vec<String>>,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            player_count: 2,
            rounds_to_win: 3,
            seed: 0x4a6d_a7a1,
            maps: vec![
                rows(&[
                    "wwwwwwwwww",
                    "wxxxxxxxxw",
                    "wxPxxxxPxw",
                    "wxxxxxxxxw",
                    "wwwwwwwwww",
                ]),
                rows(&[
                    "##xxxxxx##",
                    "#xxwwwwxx#",
                    "xxPx..xPxx",
                    "#xxwwwwxx#",
                    "##xxxxxx##",
                ]),
            ],
        }
    }
}

impl MatchRules {
    /// Current map's rows.
    pub fn map(&self, index: usize) -> &[String] {
        &self.maps[index % self.maps.len()]
    }

    /// Clamp the configured player count into the supported range.
    pub fn effective_player_count(&self) -> usize {
        self.player_count.clamp(2, MAX_PLAYERS)
    }
}

fn rows(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_are_playable() {
        let rules = MatchRules::default();
        assert_eq!(rules.effective_player_count(), 2);
        assert!(!rules.maps.is_empty());
        for map in &rules.maps {
            let spawns: usize = map.iter().map(|r| r.matches('P').count()).sum();
            assert!(spawns >= rules.player_count);
        }
    }

    #[test]
    fn test_map_rotation_wraps() {
        let rules = MatchRules::default();
        assert_eq!(rules.map(0), rules.map(rules.maps.len()));
    }

    #[test]
    fn test_player_count_clamped() {
        let rules = MatchRules {
            player_count: 9,
            ..MatchRules::default()
        };
        assert_eq!(rules.effective_player_count(), MAX_PLAYERS);
    }
}
