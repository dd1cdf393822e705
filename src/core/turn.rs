//! Whose turn it is, what was rolled, and the consecutive-six penalty.

use super::common::{ActionError, Side};
use super::config::MAX_CONSECUTIVE_SIXES;
use super::dice::DieFace;

/// Phase of the turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// `side` must roll.
    Rolling(Side),
    /// `side` rolled `face` and must choose a lane.
    Moving(Side, DieFace),
    /// A remote move is animating; `side` acts next.
    Settling(Side),
    /// The match has an outcome.
    Resolved,
}

/// Result of a roll accepted by [`TurnMachine::roll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollOutcome {
    /// The roll is pending and the side must now pick a lane.
    Pending(DieFace),
    /// Third consecutive six: roll voided, turn handed over.
    Penalty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnMachine {
    phase: Phase,
    sixes: [u8; 2],
}

impl TurnMachine {
    pub fn new(first: Side) -> Self {
        Self {
            phase: Phase::Rolling(first),
            sixes: [0; 2],
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Side whose clock is running, if any.
    pub fn active(&self) -> Option<Side> {
        match self.phase {
            Phase::Rolling(s) | Phase::Moving(s, _) | Phase::Settling(s) => Some(s),
            Phase::Resolved => None,
        }
    }

    pub fn pending(&self, side: Side) -> Option<DieFace> {
        match self.phase {
            Phase::Moving(s, face) if s == side => Some(face),
            _ => None,
        }
    }

    pub fn consecutive_sixes(&self, side: Side) -> u8 {
        self.sixes[side.index()]
    }

    fn require_turn(&self, side: Side) -> Result<(), ActionError> {
        match self.phase {
            Phase::Resolved => Err(ActionError::MatchOver),
            Phase::Settling(s) if s == side => Err(ActionError::Settling),
            Phase::Rolling(s) | Phase::Moving(s, _) if s == side => Ok(()),
            _ => Err(ActionError::NotYourTurn),
        }
    }

    pub fn roll(&mut self, side: Side, face: DieFace) -> Result<RollOutcome, ActionError> {
        self.require_turn(side)?;
        if let Phase::Moving(..) = self.phase {
            return Err(ActionError::RollPending);
        }
        let count = &mut self.sixes[side.index()];
        if face.is_six() {
            *count += 1;
            if *count >= MAX_CONSECUTIVE_SIXES {
                self.hand_over(side);
                return Ok(RollOutcome::Penalty);
            }
        } else {
            *count = 0;
        }
        self.phase = Phase::Moving(side, face);
        Ok(RollOutcome::Pending(face))
    }

    /// Pending face of `side`, validating that it may move now.
    pub fn pending_for_move(&self, side: Side) -> Result<DieFace, ActionError> {
        self.require_turn(side)?;
        self.pending(side).ok_or(ActionError::NoPendingRoll)
    }

    /// Next side to act after `side` moved with `face`: a six keeps the turn.
    pub fn next_after_move(side: Side, face: DieFace) -> Side {
        if face.is_six() {
            side
        } else {
            side.opponent()
        }
    }

    /// Consume the pending roll of `side` and go straight to the next roll.
    pub fn complete_move(&mut self, side: Side, face: DieFace) {
        let next = Self::next_after_move(side, face);
        if next == side {
            self.phase = Phase::Rolling(side);
        } else {
            self.hand_over(side);
        }
    }

    /// Consume the pending roll of `side` and gate the next roll behind a
    /// settle delay.
    pub fn complete_move_settling(&mut self, side: Side, face: DieFace) {
        let next = Self::next_after_move(side, face);
        if next != side {
            self.sixes[side.index()] = 0;
        }
        self.phase = Phase::Settling(next);
    }

    /// End the turn of `from` without a move. Clears any pending roll.
    pub fn hand_over(&mut self, from: Side) {
        self.sixes[from.index()] = 0;
        self.phase = Phase::Rolling(from.opponent());
    }

    /// Open the settling gate. Returns the side that may now roll.
    pub fn finish_settle(&mut self) -> Option<Side> {
        match self.phase {
            Phase::Settling(s) => {
                self.phase = Phase::Rolling(s);
                Some(s)
            }
            _ => None,
        }
    }

    pub fn resolve(&mut self) {
        self.phase = Phase::Resolved;
    }
}
