#![cfg_attr(not(feature = "std"), no_std)]

pub mod core;

#[cfg(feature = "std")]
pub mod config;
#[cfg(feature = "std")]
pub mod controller;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod player;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
pub mod results;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod sync;
#[cfg(feature = "std")]
pub mod transport;
#[cfg(feature = "std")]
pub mod ui;

pub use crate::core::{
    ActionError, Direction, DieFace, EndReason, LocalTransition, Match, MatchOutcome, MatchRules,
    MatchView, PeerError, Phase, Side, TickOutcome, Winner,
};

#[cfg(feature = "std")]
pub use config::MatchConfig;
#[cfg(feature = "std")]
pub use controller::MatchController;
#[cfg(feature = "std")]
pub use logging::{init_logging, LOG_ENV};
#[cfg(feature = "std")]
pub use player::{AiPlayer, CliPlayer, Command, Player};
#[cfg(feature = "std")]
pub use protocol::{Message, Payload, PeerMessage, PROTOCOL_VERSION};
#[cfg(feature = "std")]
pub use results::{JsonLinesSink, LogSink, MatchReport, ResultSink};
#[cfg(feature = "std")]
pub use session::{host_handshake, join_handshake, Participant, Seat, SeatError, SessionRecord};
#[cfg(feature = "std")]
pub use sync::{Inbound, PeerSync};
#[cfg(feature = "std")]
pub use transport::{
    heartbeat::HeartbeatTransport, in_memory::InMemoryTransport, tcp::TcpTransport, Transport,
};
