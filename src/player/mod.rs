#![cfg(feature = "std")]

//! Player trait and implementations
//!
//! - AiPlayer: rolls at once and picks lanes with `core::ai`
//! - CliPlayer: interactive command-line player

use crate::core::{MatchOutcome, MatchView};

/// Local input for one step of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Roll,
    /// Push the given lane, zero-based.
    Push(usize),
}

/// Source of local commands driven by the match controller.
///
/// `next_command` is only polled while the local side may act, and may be
/// dropped at any await point when a timer fires first.
#[async_trait::async_trait]
pub trait Player: Send {
    /// Wait for the next command. `None` means the player has left.
    async fn next_command(&mut self, view: &MatchView) -> Option<Command>;

    /// A status line, e.g. why the last command was rejected.
    fn handle_status(&mut self, _status: &str) {}

    /// The match is over.
    fn handle_outcome(&mut self, _outcome: &MatchOutcome) {}
}

pub mod ai;
pub use ai::AiPlayer;

pub mod cli;
pub use cli::CliPlayer;
