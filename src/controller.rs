#![cfg(feature = "std")]

//! Async driver for one match on one peer.
//!
//! A single task owns the match and multiplexes the clock tick, the settle
//! deadline, local commands and inbound peer messages through one
//! `select!`. Every branch only produces an [`Event`]; the event is handled
//! after the select returns, so match transitions are strictly sequential.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::SmallRng;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Duration, Instant, MissedTickBehavior};

use crate::config::MatchConfig;
use crate::core::{DieFace, LocalTransition, Match, MatchOutcome, Phase, TickOutcome};
use crate::player::{Command, Player};
use crate::protocol::Message;
use crate::results::{submit_detached, MatchReport, ResultSink};
use crate::session::Seat;
use crate::sync::{Inbound, PeerSync};
use crate::transport::Transport;

enum Event {
    Tick,
    Settled,
    Command(Option<Command>),
    Inbound(anyhow::Result<Message>),
}

pub struct MatchController {
    seat: Seat,
    game: Match,
    sync: PeerSync,
    player: Box<dyn Player>,
    transport: Box<dyn Transport>,
    config: MatchConfig,
    sink: Arc<dyn ResultSink>,
    shutdown: Arc<AtomicBool>,
    settle_at: Option<Instant>,
    report_task: Option<JoinHandle<()>>,
}

impl MatchController {
    pub fn new(
        seat: Seat,
        player: Box<dyn Player>,
        transport: Box<dyn Transport>,
        config: MatchConfig,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        let game = Match::new(seat.direction(), seat.first_side(), config.rules());
        let sync = PeerSync::new(&seat);
        Self {
            seat,
            game,
            sync,
            player,
            transport,
            config,
            sink,
            shutdown: Arc::new(AtomicBool::new(false)),
            settle_at: None,
            report_task: None,
        }
    }

    pub fn game(&self) -> &Match {
        &self.game
    }

    pub fn seat(&self) -> &Seat {
        &self.seat
    }

    /// Setting the flag ends the match at the next loop iteration.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    /// Background task submitting the report of the finished match.
    pub fn take_report_task(&mut self) -> Option<JoinHandle<()>> {
        self.report_task.take()
    }

    /// Play the match to its outcome.
    pub async fn run(&mut self, rng: &mut SmallRng) -> anyhow::Result<MatchOutcome> {
        let started = Instant::now();
        let tick = self.config.tick.max(Duration::from_millis(1));
        let mut ticker = interval_at(started + tick, tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::info!(
            "[match] {} as player {} ({:?}), {} moves first",
            self.seat.session_id,
            if self.seat.is_player1 { 1 } else { 2 },
            self.seat.direction(),
            if self.seat.is_player1 {
                self.seat.local_id.as_str()
            } else {
                self.seat.opponent.player_id.as_str()
            }
        );

        while !self.game.is_over() {
            if self.shutdown.load(Ordering::SeqCst) {
                log::info!("[match] Shutdown requested");
                self.game.force_timeout();
                break;
            }

            let view = self.game.view();
            let may_act = self.game.awaiting_local_input();
            let settle_at = self.settle_at.unwrap_or_else(Instant::now);

            let event = tokio::select! {
                _ = ticker.tick() => Event::Tick,
                _ = sleep_until(settle_at), if self.settle_at.is_some() => Event::Settled,
                cmd = self.player.next_command(&view), if may_act => Event::Command(cmd),
                msg = self.transport.recv() => Event::Inbound(msg),
            };

            match event {
                Event::Tick => self.on_tick().await,
                Event::Settled => {
                    self.settle_at = None;
                    self.game.settle();
                }
                Event::Command(Some(cmd)) => self.on_command(cmd, rng).await,
                Event::Command(None) => {
                    log::info!("[match] Local player left");
                    self.game.force_timeout();
                }
                Event::Inbound(Ok(msg)) => self.on_message(msg),
                Event::Inbound(Err(e)) => {
                    log::warn!("[match] Connection lost: {}", e);
                    self.game.force_timeout();
                }
            }
        }

        // dropping the ticker and the deadline here cancels both
        self.settle_at = None;
        let outcome = *self
            .game
            .outcome()
            .ok_or_else(|| anyhow::anyhow!("match loop ended without an outcome"))?;
        log::info!(
            "[match] {} finished: {:?} ({:?}) lanes={:?}",
            self.seat.session_id,
            outcome.winner,
            outcome.reason,
            outcome.lanes
        );
        self.player.handle_outcome(&outcome);

        if let Err(e) = self.transport.send(self.sync.leave()).await {
            log::debug!("[match] Could not send leave: {}", e);
        }

        let report = MatchReport::new(&self.seat, &outcome, started.elapsed().as_secs_f64());
        self.report_task = Some(submit_detached(self.sink.clone(), report));
        Ok(outcome)
    }

    async fn on_tick(&mut self) {
        match self.game.tick() {
            TickOutcome::Idle | TickOutcome::Resolved(_) => {}
            TickOutcome::MoveForfeited => {
                self.player
                    .handle_status("Time's up! Your roll was forfeited and the turn passes.");
                self.publish(LocalTransition::TurnPassed).await;
            }
        }
    }

    async fn on_command(&mut self, cmd: Command, rng: &mut SmallRng) {
        let result = match cmd {
            Command::Roll => self.game.roll_dice(DieFace::roll(rng)),
            Command::Push(lane) => self.game.apply_move(lane),
        };
        match result {
            Ok(LocalTransition::TurnPassed) => {
                self.player
                    .handle_status("Third six in a row! The roll is void and the turn passes.");
                self.publish(LocalTransition::TurnPassed).await;
            }
            Ok(transition) => self.publish(transition).await,
            Err(e) => self.player.handle_status(&e.to_string()),
        }
    }

    async fn publish(&mut self, transition: LocalTransition) {
        let msg = self.sync.outbound(&transition);
        log::debug!("[match] -> {} seq={}", msg.payload.kind(), msg.seq);
        if let Err(e) = self.transport.send(Message::Peer(msg)).await {
            log::warn!("[match] Failed to send {:?}: {}", transition, e);
            self.game.force_timeout();
        }
    }

    fn on_message(&mut self, msg: Message) {
        match msg {
            Message::Peer(peer_msg) => {
                let kind = peer_msg.payload.kind();
                let seq = peer_msg.seq;
                match self.sync.inbound(peer_msg, &mut self.game) {
                    Ok(Inbound::Applied) => {
                        log::debug!("[match] <- {} seq={}", kind, seq);
                        self.settle_at = match self.game.phase() {
                            Phase::Settling(_) => Some(Instant::now() + self.config.settle_delay),
                            _ => None,
                        };
                    }
                    Ok(Inbound::Duplicate) => {
                        log::debug!("[match] Ignoring duplicate {} seq={}", kind, seq)
                    }
                    Ok(Inbound::Echo) => {}
                    Err(e) => log::warn!("[match] Dropping {} seq={}: {}", kind, seq, e),
                }
            }
            Message::Leave { player_id } if player_id == self.seat.local_id => {}
            Message::Leave { player_id } => {
                log::info!("[match] {} left the match", player_id);
                self.game.force_timeout();
            }
            Message::Heartbeat { .. } => {}
            other => log::warn!("[match] Unexpected message during match: {:?}", other),
        }
    }
}
