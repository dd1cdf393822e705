use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::task::yield_now;

use crate::protocol::Message;
use crate::transport::Transport;

type Queue = Arc<Mutex<VecDeque<Message>>>;

/// Process-local transport built on shared queues.
///
/// [`InMemoryTransport::pair`] behaves like a direct socket. The echoing
/// variant delivers every message to the sender as well, the way a broadcast
/// room on a relay server does.
pub struct InMemoryTransport {
    recv_queue: Queue,
    deliver_to: Vec<Queue>,
    own_refs: usize,
}

impl InMemoryTransport {
    pub fn pair() -> (Self, Self) {
        let q1: Queue = Arc::new(Mutex::new(VecDeque::new()));
        let q2: Queue = Arc::new(Mutex::new(VecDeque::new()));
        (
            Self {
                recv_queue: q1.clone(),
                deliver_to: vec![q2.clone()],
                own_refs: 1,
            },
            Self {
                recv_queue: q2,
                deliver_to: vec![q1],
                own_refs: 1,
            },
        )
    }

    /// Like [`pair`](Self::pair), but each side also receives its own messages.
    pub fn echoing_pair() -> (Self, Self) {
        let q1: Queue = Arc::new(Mutex::new(VecDeque::new()));
        let q2: Queue = Arc::new(Mutex::new(VecDeque::new()));
        (
            Self {
                recv_queue: q1.clone(),
                deliver_to: vec![q2.clone(), q1.clone()],
                own_refs: 2,
            },
            Self {
                recv_queue: q2.clone(),
                deliver_to: vec![q1, q2],
                own_refs: 2,
            },
        )
    }

    fn lock(queue: &Queue) -> anyhow::Result<std::sync::MutexGuard<'_, VecDeque<Message>>> {
        queue
            .lock()
            .map_err(|_| anyhow::anyhow!("In-memory queue poisoned"))
    }
}

#[async_trait::async_trait]
impl Transport for InMemoryTransport {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        for queue in &self.deliver_to {
            Self::lock(queue)?.push_back(msg.clone());
        }
        Ok(())
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        loop {
            let next = Self::lock(&self.recv_queue)?.pop_front();
            if let Some(msg) = next {
                return Ok(msg);
            }
            if Arc::strong_count(&self.recv_queue) <= self.own_refs {
                return Err(anyhow::anyhow!("Channel closed"));
            }
            yield_now().await;
        }
    }
}
