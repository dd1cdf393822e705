#![cfg(feature = "std")]

//! Session bootstrap: who is player 1, who starts, and who the opponent is.

use serde::{Deserialize, Serialize};

use crate::core::{Direction, Side};
use crate::protocol::{Message, PROTOCOL_VERSION};
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub player_id: String,
    pub username: String,
    pub avatar: String,
}

impl Participant {
    pub fn new(player_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            username: username.into(),
            avatar: String::new(),
        }
    }
}

/// Session as handed out by the matchmaking service. The first listed
/// participant is player 1 and moves first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session_id: String,
    pub game_type: String,
    pub players: Vec<Participant>,
}

impl SessionRecord {
    pub fn new(session_id: impl Into<String>, players: Vec<Participant>) -> Self {
        Self {
            session_id: session_id.into(),
            game_type: crate::core::GAME_TYPE.to_string(),
            players,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatError {
    /// A match needs exactly two participants.
    WrongPlayerCount(usize),
    /// The local player is not listed in the session.
    NotInSession(String),
    /// Both entries carry the same player id.
    DuplicatePlayer(String),
}

impl core::fmt::Display for SeatError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SeatError::WrongPlayerCount(n) => {
                write!(f, "session has {} participants, expected 2", n)
            }
            SeatError::NotInSession(id) => write!(f, "player {} is not in this session", id),
            SeatError::DuplicatePlayer(id) => write!(f, "player {} is listed twice", id),
        }
    }
}

impl std::error::Error for SeatError {}

/// The local peer's resolved place in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub session_id: String,
    pub game_type: String,
    pub local_id: String,
    pub is_player1: bool,
    pub opponent: Participant,
}

impl Seat {
    pub fn resolve(session: &SessionRecord, local_id: &str) -> Result<Self, SeatError> {
        let [first, second] = session.players.as_slice() else {
            return Err(SeatError::WrongPlayerCount(session.players.len()));
        };
        if first.player_id == second.player_id {
            return Err(SeatError::DuplicatePlayer(first.player_id.clone()));
        }
        let (is_player1, opponent) = if first.player_id == local_id {
            (true, second)
        } else if second.player_id == local_id {
            (false, first)
        } else {
            return Err(SeatError::NotInSession(local_id.to_string()));
        };
        Ok(Self {
            session_id: session.session_id.clone(),
            game_type: session.game_type.clone(),
            local_id: local_id.to_string(),
            is_player1,
            opponent: opponent.clone(),
        })
    }

    pub fn direction(&self) -> Direction {
        Direction::for_seat(self.is_player1)
    }

    /// Side that rolls first.
    pub fn first_side(&self) -> Side {
        if self.is_player1 {
            Side::Local
        } else {
            Side::Remote
        }
    }
}

/// Host side of the handshake: offer the session and wait for the ack.
/// The joiner must ack as the other participant; the host's seat is
/// returned.
pub async fn host_handshake(
    transport: &mut dyn Transport,
    session: &SessionRecord,
    host_id: &str,
) -> anyhow::Result<Seat> {
    let seat = Seat::resolve(session, host_id)?;
    transport
        .send(Message::Handshake {
            version: PROTOCOL_VERSION,
            session: session.clone(),
        })
        .await?;

    match transport.recv().await? {
        Message::HandshakeAck { version, player_id } if version == PROTOCOL_VERSION => {
            if player_id != seat.opponent.player_id {
                log::warn!(
                    "[session] Peer acked as {} but {} expects {}",
                    player_id,
                    session.session_id,
                    seat.opponent.player_id
                );
                let err = if player_id == seat.local_id {
                    SeatError::DuplicatePlayer(player_id)
                } else {
                    SeatError::NotInSession(player_id)
                };
                return Err(anyhow::anyhow!(err));
            }
            log::info!("[session] {} joined {}", player_id, session.session_id);
            Ok(seat)
        }
        Message::HandshakeAck { version, .. } => {
            log::warn!(
                "[session] Handshake protocol version mismatch: expected {}, peer responded with {}",
                PROTOCOL_VERSION,
                version
            );
            Err(anyhow::anyhow!(
                "Protocol version mismatch in HandshakeAck: expected {}, got {}",
                PROTOCOL_VERSION,
                version
            ))
        }
        other => {
            log::warn!("[session] Expected HandshakeAck, got {:?}", other);
            Err(anyhow::anyhow!(
                "Expected HandshakeAck, got unexpected message (closing session)"
            ))
        }
    }
}

/// Joining side of the handshake: receive the session, check that we are
/// seated in it, and acknowledge.
pub async fn join_handshake(
    transport: &mut dyn Transport,
    local_id: &str,
) -> anyhow::Result<SessionRecord> {
    match transport.recv().await? {
        Message::Handshake { version, session } if version == PROTOCOL_VERSION => {
            Seat::resolve(&session, local_id)?;
            transport
                .send(Message::HandshakeAck {
                    version: PROTOCOL_VERSION,
                    player_id: local_id.to_string(),
                })
                .await?;
            Ok(session)
        }
        Message::Handshake { version, .. } => {
            log::warn!(
                "[session] Handshake protocol version mismatch: expected {}, peer sent {}",
                PROTOCOL_VERSION,
                version
            );
            Err(anyhow::anyhow!(
                "Protocol version mismatch in Handshake: expected {}, got {}",
                PROTOCOL_VERSION,
                version
            ))
        }
        other => {
            log::warn!("[session] Expected Handshake, got {:?}", other);
            Err(anyhow::anyhow!(
                "Expected Handshake, got unexpected message (closing session)"
            ))
        }
    }
}
