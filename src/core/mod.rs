//! Core Cargo Push match engine (no_std compatible)
//!
//! Pure turn, ledger and resolution logic with no I/O. The async controller,
//! transports and peer sync live outside this module and drive it.

pub mod ai;
pub mod clock;
pub mod common;
pub mod config;
pub mod dice;
pub mod game;
pub mod ledger;
pub mod resolver;
pub mod turn;

// Re-export commonly used types
pub use common::{ActionError, Direction, LedgerError, PeerError, Side};
pub use config::*;
pub use dice::DieFace;
pub use game::{
    EndReason, LocalTransition, Match, MatchOutcome, MatchRules, MatchView, RemoteApplied,
    TickOutcome, Winner,
};
pub use ledger::{Applied, LaneLedger, Lanes, MoveId};
pub use resolver::{resolve_timeout, tally, threshold_winner, Tally, Verdict};
pub use turn::{Phase, RollOutcome, TurnMachine};
