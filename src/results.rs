#![cfg(feature = "std")]

//! Match reports handed to an external results store.
//!
//! Submission never blocks the match: the controller spawns it and only
//! logs a failure.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;

use crate::core::{EndReason, Lanes, MatchOutcome, Winner};
use crate::session::Seat;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub session_id: String,
    pub game_type: String,
    /// The reporting peer.
    pub player_id: String,
    pub final_positions: Lanes,
    pub winner_side: Winner,
    /// Player id of the winner, `None` on a draw.
    pub winner_id: Option<String>,
    /// Score earned by the reporting peer.
    pub score: u32,
    pub rank: u8,
    /// Seconds from match start to outcome.
    #[serde(rename = "elapsedTime")]
    pub elapsed_secs: f64,
    pub reason: String,
}

impl MatchReport {
    pub fn new(seat: &Seat, outcome: &MatchOutcome, elapsed_secs: f64) -> Self {
        let winner_id = match outcome.winner {
            Winner::Local => Some(seat.local_id.clone()),
            Winner::Remote => Some(seat.opponent.player_id.clone()),
            Winner::Draw => None,
        };
        let reason = match outcome.reason {
            EndReason::Threshold { lane } => format!("threshold:{}", lane),
            EndReason::ClockExpired(side) => format!("clock_expired:{:?}", side).to_lowercase(),
            EndReason::PeerLost => "peer_lost".to_string(),
        };
        Self {
            session_id: seat.session_id.clone(),
            game_type: seat.game_type.clone(),
            player_id: seat.local_id.clone(),
            final_positions: outcome.lanes,
            winner_side: outcome.winner,
            winner_id,
            score: outcome.winner.score(),
            rank: outcome.winner.rank(),
            elapsed_secs,
            reason,
        }
    }
}

/// Destination for finished match reports.
#[async_trait::async_trait]
pub trait ResultSink: Send + Sync {
    async fn submit(&self, report: &MatchReport) -> anyhow::Result<()>;
}

/// Writes the report to the log only.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait::async_trait]
impl ResultSink for LogSink {
    async fn submit(&self, report: &MatchReport) -> anyhow::Result<()> {
        log::info!(
            "[results] {} {}: winner={:?} score={} rank={} positions={:?} after {:.1}s",
            report.game_type,
            report.session_id,
            report.winner_side,
            report.score,
            report.rank,
            report.final_positions,
            report.elapsed_secs
        );
        Ok(())
    }
}

/// Appends one JSON object per report to a file.
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl ResultSink for JsonLinesSink {
    async fn submit(&self, report: &MatchReport) -> anyhow::Result<()> {
        let mut line = serde_json::to_string(report)?;
        line.push('\n');
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| anyhow::anyhow!("Cannot open {}: {}", self.path.display(), e))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Submit in the background. Failures are logged and otherwise ignored.
pub fn submit_detached(sink: Arc<dyn ResultSink>, report: MatchReport) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = sink.submit(&report).await {
            log::warn!(
                "[results] Failed to submit result for {}: {}",
                report.session_id,
                e
            );
        }
    })
}
