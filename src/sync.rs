#![cfg(feature = "std")]

//! Translation between local match transitions and peer messages.
//!
//! Every outbound message is tagged with the local player id and a
//! monotonic sequence number. Inbound messages are filtered by both before
//! they reach the match: our own messages reflected by a broadcast relay are
//! dropped, and anything at or below the highest sequence already seen from
//! the peer is a replay.

use crate::core::{LocalTransition, Match, PeerError, RemoteApplied};
use crate::protocol::{
    DiceRollPayload, Message, MovePayload, Payload, PeerMessage, TurnChangePayload,
};
use crate::session::Seat;

/// What happened to an inbound peer message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound {
    /// The match state changed.
    Applied,
    /// Replay of something already applied; nothing changed.
    Duplicate,
    /// Our own message came back; ignored.
    Echo,
}

#[derive(Debug, Clone)]
pub struct PeerSync {
    local_id: String,
    is_player1: bool,
    next_seq: u64,
    last_seen: Option<u64>,
}

impl PeerSync {
    pub fn new(seat: &Seat) -> Self {
        Self {
            local_id: seat.local_id.clone(),
            is_player1: seat.is_player1,
            next_seq: 0,
            last_seen: None,
        }
    }

    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    /// Highest sequence number received from the peer so far.
    pub fn last_seen(&self) -> Option<u64> {
        self.last_seen
    }

    /// Build the message announcing one local transition.
    pub fn outbound(&mut self, transition: &LocalTransition) -> PeerMessage {
        let payload = match *transition {
            LocalTransition::DiceRolled(face) => Payload::DiceRoll(DiceRollPayload {
                dice_value: face.value(),
            }),
            LocalTransition::Moved { lane, face, lanes } => Payload::Move(MovePayload {
                lane_index: lane as u8,
                dice_value: face.value(),
                positions: lanes,
                is_player1: self.is_player1,
            }),
            LocalTransition::TurnPassed => {
                Payload::TurnChange(TurnChangePayload { is_my_turn: false })
            }
        };
        let seq = self.next_seq;
        self.next_seq += 1;
        PeerMessage {
            player_id: self.local_id.clone(),
            seq,
            payload,
        }
    }

    /// Sent once when this peer tears its match down.
    pub fn leave(&self) -> Message {
        Message::Leave {
            player_id: self.local_id.clone(),
        }
    }

    /// Filter one inbound message and apply it to the match.
    pub fn inbound(&mut self, msg: PeerMessage, game: &mut Match) -> Result<Inbound, PeerError> {
        if msg.player_id == self.local_id {
            return Ok(Inbound::Echo);
        }
        if let Some(last) = self.last_seen {
            if msg.seq <= last {
                log::debug!(
                    "[sync] Dropping replayed {} seq={} (last seen {})",
                    msg.payload.kind(),
                    msg.seq,
                    last
                );
                return Ok(Inbound::Duplicate);
            }
        }
        let expected = self.last_seen.map_or(0, |s| s + 1);
        if msg.seq > expected {
            log::warn!(
                "[sync] Gap in peer sequence: expected {}, got {} ({} missing)",
                expected,
                msg.seq,
                msg.seq - expected
            );
        }
        self.last_seen = Some(msg.seq);

        let applied = match msg.payload {
            Payload::DiceRoll(roll) => game.apply_remote_roll(roll.dice_value)?,
            Payload::Move(mv) => {
                if mv.is_player1 == self.is_player1 {
                    log::warn!(
                        "[sync] Peer {} claims the same seat as us (is_player1={}); using its flag",
                        msg.player_id,
                        mv.is_player1
                    );
                }
                let applied =
                    game.apply_remote_move(msg.seq, mv.lane_index, mv.dice_value, mv.is_player1)?;
                if applied == RemoteApplied::Applied && game.lanes() != mv.positions {
                    log::warn!(
                        "[sync] Peer positions {:?} differ from local {:?}",
                        mv.positions,
                        game.lanes()
                    );
                }
                applied
            }
            Payload::TurnChange(change) => game.apply_remote_turn_change(change.is_my_turn)?,
        };
        Ok(match applied {
            RemoteApplied::Applied => Inbound::Applied,
            RemoteApplied::Duplicate => Inbound::Duplicate,
        })
    }
}
