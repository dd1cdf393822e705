#![cfg(feature = "std")]

//! Messages exchanged between two peers of a match.

use serde::{Deserialize, Serialize};

use crate::core::Lanes;
use crate::session::SessionRecord;

/// Protocol version checked during the handshake and on heartbeats.
pub const PROTOCOL_VERSION: u8 = 1;

/// Transport-level envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    /// Host offers the session to the joining peer.
    Handshake { version: u8, session: SessionRecord },
    /// Joining peer accepts and identifies itself.
    HandshakeAck { version: u8, player_id: String },
    /// Connection keep-alive; filtered by [`crate::HeartbeatTransport`].
    Heartbeat { version: u8 },
    /// A match transition from one player.
    Peer(PeerMessage),
    /// The sender is tearing its match down.
    Leave { player_id: String },
}

/// One local state transition, tagged with its origin.
///
/// `seq` is monotonic per sender and lets the receiver drop replays without
/// comparing payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerMessage {
    pub player_id: String,
    pub seq: u64,
    pub payload: Payload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    DiceRoll(DiceRollPayload),
    Move(MovePayload),
    TurnChange(TurnChangePayload),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRollPayload {
    pub dice_value: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePayload {
    pub lane_index: u8,
    pub dice_value: u8,
    /// Sender's lane snapshot after the move.
    pub positions: Lanes,
    /// Sender's seat; decides the sign of the delta.
    pub is_player1: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnChangePayload {
    /// Whether, after this change, it is the sender's turn.
    pub is_my_turn: bool,
}

impl Payload {
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::DiceRoll(_) => "dice_roll",
            Payload::Move(_) => "move",
            Payload::TurnChange(_) => "turn_change",
        }
    }
}
