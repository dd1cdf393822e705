//! Common types for Cargo Push: sides, push directions and errors.

use super::config::MAX_DISTANCE;

/// One of the two participants, from the point of view of the local peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Side {
    Local,
    Remote,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Local => Side::Remote,
            Side::Remote => Side::Local,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Side::Local => 0,
            Side::Remote => 1,
        }
    }
}

/// Direction in which a side pushes cargo. Player 1 pushes towards `+30`,
/// player 2 towards `-30`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    /// Direction of the given seat.
    pub fn for_seat(is_player1: bool) -> Self {
        if is_player1 {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }

    pub fn is_player1(self) -> bool {
        matches!(self, Direction::Positive)
    }

    pub fn sign(self) -> i8 {
        match self {
            Direction::Positive => 1,
            Direction::Negative => -1,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }

    /// Lane position at which this direction wins.
    pub fn goal(self) -> i8 {
        self.sign() * MAX_DISTANCE
    }

    /// Signed lane delta for pushing `steps` in this direction.
    pub fn delta(self, steps: u8) -> i8 {
        self.sign() * steps as i8
    }
}

/// Errors returned for local actions that are not allowed right now.
///
/// The display text is meant to be shown to the player as a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    /// The opponent is rolling or moving.
    NotYourTurn,
    /// A roll is pending; choose a lane first.
    RollPending,
    /// No roll to apply yet.
    NoPendingRoll,
    /// Lane index outside `0..NUM_LANES`.
    InvalidLane(usize),
    /// The last remote move is still settling.
    Settling,
    /// The match already has an outcome.
    MatchOver,
}

impl core::fmt::Display for ActionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ActionError::NotYourTurn => write!(f, "It is the opponent's turn, please wait"),
            ActionError::RollPending => write!(f, "Choose a lane for your roll first"),
            ActionError::NoPendingRoll => write!(f, "Roll the die before choosing a lane"),
            ActionError::InvalidLane(lane) => write!(f, "Lane {} does not exist", lane + 1),
            ActionError::Settling => write!(f, "The opponent's move is still settling"),
            ActionError::MatchOver => write!(f, "The match is over"),
        }
    }
}

/// Reasons an inbound peer message is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerError {
    /// Message claims an action while the remote side is not active.
    OutOfTurn,
    /// Dice value outside `1..=6`.
    InvalidFace(u8),
    /// Lane index outside `0..NUM_LANES`.
    InvalidLane(u8),
    /// Move carries a different value than the announced roll.
    DiceMismatch { announced: u8, moved: u8 },
    /// The match already has an outcome.
    MatchOver,
}

impl core::fmt::Display for PeerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PeerError::OutOfTurn => write!(f, "out-of-turn message from peer"),
            PeerError::InvalidFace(v) => write!(f, "invalid dice value {}", v),
            PeerError::InvalidLane(l) => write!(f, "invalid lane index {}", l),
            PeerError::DiceMismatch { announced, moved } => write!(
                f,
                "move uses dice value {} but {} was announced",
                moved, announced
            ),
            PeerError::MatchOver => write!(f, "message arrived after the match ended"),
        }
    }
}

/// Errors returned by lane ledger operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    InvalidLane(usize),
}

impl core::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LedgerError::InvalidLane(l) => write!(f, "lane index {} is out of range", l),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ActionError {}
#[cfg(feature = "std")]
impl std::error::Error for PeerError {}
#[cfg(feature = "std")]
impl std::error::Error for LedgerError {}
