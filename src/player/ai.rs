use crate::core::{ai, MatchView, Phase, Side};

use super::{Command, Player};

/// Computer player: rolls immediately and uses [`ai::choose_lane`].
#[derive(Debug, Default)]
pub struct AiPlayer;

impl AiPlayer {
    pub fn new() -> Self {
        Self
    }

    pub fn decide(view: &MatchView) -> Option<Command> {
        match view.phase {
            Phase::Rolling(Side::Local) => Some(Command::Roll),
            Phase::Moving(Side::Local, face) => Some(Command::Push(ai::choose_lane(
                &view.lanes,
                view.direction,
                face,
            ))),
            _ => None,
        }
    }
}

#[async_trait::async_trait]
impl Player for AiPlayer {
    async fn next_command(&mut self, view: &MatchView) -> Option<Command> {
        match Self::decide(view) {
            Some(cmd) => Some(cmd),
            // not our move; wait to be polled again
            None => std::future::pending().await,
        }
    }

    fn handle_status(&mut self, status: &str) {
        log::debug!("[ai] {}", status);
    }
}
