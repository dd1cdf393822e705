use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::protocol::Message;
use crate::transport::Transport;

/// Default timeout for a single send or receive.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Largest accepted frame. Match messages are a few dozen bytes; the
/// handshake carries the session record.
const MAX_MESSAGE_SIZE: u32 = 64 * 1024;

const READ_CHUNK: usize = 4096;

/// Length-prefixed bincode frames over a TCP stream.
///
/// Each frame is a 4-byte big-endian length followed by the encoded
/// [`Message`]. Partial reads and writes are kept in internal buffers, so
/// `send` and `recv` may be dropped mid-way (as `select!` does) without
/// corrupting the stream.
pub struct TcpTransport {
    stream: TcpStream,
    timeout_duration: Duration,
    max_message_size: u32,
    read_buf: Vec<u8>,
    write_buf: Vec<u8>,
    shutdown: Arc<AtomicBool>,
}

fn io_error(e: std::io::Error, what: &str) -> anyhow::Error {
    match e.kind() {
        std::io::ErrorKind::UnexpectedEof | std::io::ErrorKind::BrokenPipe => {
            anyhow::anyhow!("Connection closed by peer")
        }
        std::io::ErrorKind::ConnectionReset => anyhow::anyhow!("Connection reset by peer"),
        _ => anyhow::anyhow!("{} error: {}", what, e),
    }
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self::with_timeout(stream, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(stream: TcpStream, timeout_duration: Duration) -> Self {
        Self {
            stream,
            timeout_duration,
            max_message_size: MAX_MESSAGE_SIZE,
            read_buf: Vec::new(),
            write_buf: Vec::new(),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream))
    }

    /// Request graceful shutdown of the transport.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    fn encode(&mut self, msg: &Message) -> anyhow::Result<()> {
        let data = bincode::serialize(msg)
            .map_err(|e| anyhow::anyhow!("Serialization error: {}", e))?;
        if data.len() as u32 > self.max_message_size {
            return Err(anyhow::anyhow!(
                "Message too large: {} bytes (max: {})",
                data.len(),
                self.max_message_size
            ));
        }
        self.write_buf
            .extend_from_slice(&(data.len() as u32).to_be_bytes());
        self.write_buf.extend_from_slice(&data);
        Ok(())
    }

    /// Write out everything buffered so far.
    async fn flush_pending(&mut self) -> anyhow::Result<()> {
        while !self.write_buf.is_empty() {
            let n = self
                .stream
                .write(&self.write_buf)
                .await
                .map_err(|e| io_error(e, "Write"))?;
            if n == 0 {
                return Err(anyhow::anyhow!("Connection closed by peer"));
            }
            self.write_buf.drain(..n);
        }
        Ok(())
    }

    /// Decode one complete frame from the read buffer, if present.
    fn take_frame(&mut self) -> anyhow::Result<Option<Message>> {
        if self.read_buf.len() < 4 {
            return Ok(None);
        }
        let len = u32::from_be_bytes([
            self.read_buf[0],
            self.read_buf[1],
            self.read_buf[2],
            self.read_buf[3],
        ]);
        if len > self.max_message_size {
            return Err(anyhow::anyhow!(
                "Message too large: {} bytes (max: {})",
                len,
                self.max_message_size
            ));
        }
        if len == 0 {
            return Err(anyhow::anyhow!("Invalid message length: 0"));
        }
        let end = 4 + len as usize;
        if self.read_buf.len() < end {
            return Ok(None);
        }
        let msg = bincode::deserialize(&self.read_buf[4..end])
            .map_err(|e| anyhow::anyhow!("Deserialization error: {}", e));
        self.read_buf.drain(..end);
        msg.map(Some)
    }

    async fn read_message(&mut self) -> anyhow::Result<Message> {
        self.flush_pending().await?;
        loop {
            if let Some(msg) = self.take_frame()? {
                return Ok(msg);
            }
            let mut chunk = [0u8; READ_CHUNK];
            let n = self
                .stream
                .read(&mut chunk)
                .await
                .map_err(|e| io_error(e, "Read"))?;
            if n == 0 {
                return Err(anyhow::anyhow!("Connection closed by peer"));
            }
            self.read_buf.extend_from_slice(&chunk[..n]);
        }
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        if self.is_shutdown() {
            return Err(anyhow::anyhow!("Transport is shut down"));
        }
        self.encode(&msg)?;
        let limit = self.timeout_duration;
        timeout(limit, self.flush_pending())
            .await
            .map_err(|_| anyhow::anyhow!("Send timeout after {:?}", limit))?
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        if self.is_shutdown() {
            return Err(anyhow::anyhow!("Transport is shut down"));
        }
        let limit = self.timeout_duration;
        timeout(limit, self.read_message())
            .await
            .map_err(|_| anyhow::anyhow!("Receive timeout after {:?}", limit))?
    }
}
