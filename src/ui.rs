#![cfg(feature = "std")]

//! Text rendering for the command-line front end.

use std::fmt::Write;

use crate::core::{
    Direction, EndReason, MatchOutcome, MatchView, Phase, Side, Winner, LANE_LABELS, MAX_DISTANCE,
};

const TRACK_CELLS: i8 = 21;

fn track(pos: i8) -> String {
    let span = 2 * MAX_DISTANCE as i16;
    let cell = ((pos as i16 + MAX_DISTANCE as i16) * (TRACK_CELLS as i16 - 1) / span) as i8;
    let mid = TRACK_CELLS / 2;
    (0..TRACK_CELLS)
        .map(|i| {
            if i == cell {
                '#'
            } else if i == mid {
                '|'
            } else {
                '.'
            }
        })
        .collect()
}

fn goal_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Positive => "+30 (right)",
        Direction::Negative => "-30 (left)",
    }
}

/// Board, clocks and whose turn it is.
pub fn render_view(view: &MatchView) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    for (i, pos) in view.lanes.iter().enumerate() {
        let label = LANE_LABELS.get(i).copied().unwrap_or("?");
        let _ = writeln!(out, "  {} {:<11} -30 [{}] +30  {:+}", i + 1, label, track(*pos), pos);
    }
    let _ = writeln!(
        out,
        "  You push towards {}. Clock: you {}s, opponent {}s",
        goal_label(view.direction),
        view.local_clock,
        view.remote_clock
    );
    let turn = match view.phase {
        Phase::Rolling(Side::Local) => "Your turn to roll".to_string(),
        Phase::Moving(Side::Local, face) => match view.move_clock {
            Some(left) => format!("You rolled {} ({}s to choose a lane)", face, left),
            None => format!("You rolled {}", face),
        },
        Phase::Rolling(Side::Remote) => "Opponent is rolling".to_string(),
        Phase::Moving(Side::Remote, face) => format!("Opponent rolled {}", face),
        Phase::Settling(_) => "Opponent moved".to_string(),
        Phase::Resolved => "Match over".to_string(),
    };
    let _ = write!(out, "  {}", turn);
    out
}

/// Final message shown to the local player.
pub fn render_outcome(outcome: &MatchOutcome) -> String {
    let headline = match outcome.winner {
        Winner::Local => "You win!",
        Winner::Remote => "You lose.",
        Winner::Draw => "It's a draw.",
    };
    let reason = match outcome.reason {
        EndReason::Threshold { lane } => format!("lane {} reached the goal", lane + 1),
        EndReason::ClockExpired(Side::Local) => "your clock ran out".to_string(),
        EndReason::ClockExpired(Side::Remote) => "the opponent's clock ran out".to_string(),
        EndReason::PeerLost => "the opponent left".to_string(),
    };
    format!(
        "{} ({}; final positions {:?})",
        headline, reason, outcome.lanes
    )
}
