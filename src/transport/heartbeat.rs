use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::time::{sleep_until, Duration, Instant};

use crate::protocol::{Message, PROTOCOL_VERSION};
use crate::transport::Transport;

/// Transport wrapper that keeps a quiet connection alive and notices a dead one.
///
/// - sends a heartbeat whenever nothing was sent for `heartbeat_interval`
/// - fails `recv` once nothing was heard for `idle_timeout`
/// - filters heartbeats out of the stream returned to the caller
///
/// The heartbeat deadline is stored on the wrapper rather than in the `recv`
/// future, so a caller that drops `recv` on every clock tick still sends
/// heartbeats on schedule.
pub struct HeartbeatTransport<T: Transport> {
    inner: T,
    heartbeat_interval: Duration,
    idle_timeout: Duration,
    last_heard: Instant,
    next_heartbeat: Instant,
    enabled: bool,
    shutdown: Arc<AtomicBool>,
}

impl<T: Transport> HeartbeatTransport<T> {
    pub fn new(inner: T, heartbeat_interval: Duration, idle_timeout: Duration) -> Self {
        let now = Instant::now();
        Self {
            inner,
            heartbeat_interval,
            idle_timeout,
            last_heard: now,
            next_heartbeat: now + heartbeat_interval,
            enabled: true,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Pass-through wrapper for transports that need no liveness checks,
    /// such as the in-memory pair.
    pub fn disabled(inner: T) -> Self {
        let mut transport = Self::new(inner, Duration::from_secs(10), Duration::from_secs(45));
        transport.enabled = false;
        transport
    }

    fn idle_deadline(&self) -> Instant {
        self.last_heard + self.idle_timeout
    }

    /// Request graceful shutdown of the transport.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    async fn send_heartbeat(&mut self) -> anyhow::Result<()> {
        self.next_heartbeat = Instant::now() + self.heartbeat_interval;
        self.inner
            .send(Message::Heartbeat {
                version: PROTOCOL_VERSION,
            })
            .await
            .map_err(|e| {
                log::warn!("[heartbeat] Failed to send heartbeat: {}", e);
                e
            })
    }
}

#[async_trait::async_trait]
impl<T: Transport> Transport for HeartbeatTransport<T> {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        if self.is_shutdown() {
            return Err(anyhow::anyhow!("Transport is shut down"));
        }
        self.inner.send(msg).await?;
        self.next_heartbeat = Instant::now() + self.heartbeat_interval;
        Ok(())
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        if !self.enabled {
            return self.inner.recv().await;
        }
        if self.is_shutdown() {
            return Err(anyhow::anyhow!("Transport is shut down"));
        }

        loop {
            let idle_at = self.idle_deadline();
            let beat_at = self.next_heartbeat;
            tokio::select! {
                msg = self.inner.recv() => {
                    let msg = msg?;
                    self.last_heard = Instant::now();
                    match msg {
                        Message::Heartbeat { version } if version != PROTOCOL_VERSION => {
                            log::warn!(
                                "[heartbeat] Heartbeat version mismatch: expected {}, got {}",
                                PROTOCOL_VERSION, version
                            );
                            return Err(anyhow::anyhow!(
                                "Heartbeat version mismatch: expected {}, got {}",
                                PROTOCOL_VERSION, version
                            ));
                        }
                        Message::Heartbeat { .. } => continue,
                        other => return Ok(other),
                    }
                }
                _ = sleep_until(idle_at) => {
                    log::warn!("[heartbeat] Idle timeout exceeded ({:?})", self.idle_timeout);
                    return Err(anyhow::anyhow!(
                        "Connection idle timeout exceeded ({:?})",
                        self.idle_timeout
                    ));
                }
                _ = sleep_until(beat_at) => {
                    self.send_heartbeat().await?;
                }
            }
        }
    }
}
