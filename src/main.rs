//! Hammer Havoc entry point
//!
//! Headless demo driver: runs a scripted two-player skirmish at the fixed
//! timestep and prints the final snapshot as JSON. Real front ends replace
//! the scripted inputs with device polling and read snapshots every frame.

use glam::Vec2;

use hammer_havoc::consts::SIM_DT;
use hammer_havoc::sim::{InputSnapshot, Match, MatchSnapshot, PlayerId};
use hammer_havoc::{InputFrame, MatchRules};

/// Scripted intent for the demo: walk in, wind up, throw, dash away.
fn scripted_input(player: PlayerId, tick_no: u32) -> InputSnapshot {
    let t = tick_no as f32 * SIM_DT;
    match player {
        PlayerId(0) => {
            if t < 1.0 {
                InputSnapshot {
                    move_axis: Vec2::new(1.0, 0.0),
                    ..InputSnapshot::default()
                }
            } else if t < 1.8 {
                InputSnapshot {
                    throw: true,
                    aim_axis: Vec2::new(1.0, 0.0),
                    ..InputSnapshot::default()
                }
            } else {
                InputSnapshot::default()
            }
        }
        _ => {
            if t < 0.8 {
                InputSnapshot {
                    move_axis: Vec2::new(-1.0, 0.0),
                    ..InputSnapshot::default()
                }
            } else if t < 0.9 {
                InputSnapshot {
                    move_axis: Vec2::new(-1.0, 0.0),
                    dash: true,
                    ..InputSnapshot::default()
                }
            } else {
                InputSnapshot::default()
            }
        }
    }
}

fn main() {
    env_logger::init();

    let rules = MatchRules::default();
    let player_count = rules.effective_player_count();
    let mut game = Match::new(rules).expect("built-in maps are valid");

    // Twenty simulated seconds is plenty for the scripted skirmish
    let max_ticks = (20.0 / SIM_DT) as u32;
    let mut inputs = InputFrame::new(player_count);

    for tick_no in 0..max_ticks {
        for slot in 0..player_count {
            let id = PlayerId(slot);
            inputs.advance(id, scripted_input(id, tick_no));
        }
        game.tick(&inputs, SIM_DT);

        for event in game.drain_events() {
            log::debug!("cue {:>12} {event:?}", event.cue());
        }

        if game.champion().is_some() {
            break;
        }
    }

    let snapshot = MatchSnapshot::capture(&game);
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).expect("snapshot serializes")
    );
}
