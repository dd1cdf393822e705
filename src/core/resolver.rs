//! Terminal conditions: goal threshold and the timeout tie-break.

use super::common::Direction;
use super::ledger::Lanes;

/// Verdict in board terms. Callers map the direction onto a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Winner(Direction),
    Draw,
}

/// Per-direction lane counts and displacement used by the tie-break.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub positive_lanes: usize,
    pub negative_lanes: usize,
    pub positive_distance: u32,
    pub negative_distance: u32,
}

pub fn tally(lanes: &Lanes) -> Tally {
    let mut t = Tally::default();
    for &pos in lanes.iter() {
        if pos > 0 {
            t.positive_lanes += 1;
            t.positive_distance += pos as u32;
        } else if pos < 0 {
            t.negative_lanes += 1;
            t.negative_distance += pos.unsigned_abs() as u32;
        }
    }
    t
}

/// First lane sitting on a goal, with the direction that owns that goal.
pub fn threshold_winner(lanes: &Lanes) -> Option<(usize, Direction)> {
    lanes.iter().enumerate().find_map(|(lane, &pos)| {
        if pos == Direction::Positive.goal() {
            Some((lane, Direction::Positive))
        } else if pos == Direction::Negative.goal() {
            Some((lane, Direction::Negative))
        } else {
            None
        }
    })
}

/// Decide a match that ran out of time: more favourable lanes wins, then
/// larger summed displacement, otherwise a draw.
pub fn resolve_timeout(lanes: &Lanes) -> Verdict {
    let t = tally(lanes);
    if t.positive_lanes != t.negative_lanes {
        return if t.positive_lanes > t.negative_lanes {
            Verdict::Winner(Direction::Positive)
        } else {
            Verdict::Winner(Direction::Negative)
        };
    }
    if t.positive_distance != t.negative_distance {
        return if t.positive_distance > t.negative_distance {
            Verdict::Winner(Direction::Positive)
        } else {
            Verdict::Winner(Direction::Negative)
        };
    }
    Verdict::Draw
}
