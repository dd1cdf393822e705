#![cfg(feature = "std")]

use std::time::Duration;

use cargo_push::protocol::{DiceRollPayload, Payload, PeerMessage};
use cargo_push::{HeartbeatTransport, InMemoryTransport, Message, TcpTransport, Transport};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};

fn peer(seq: u64) -> Message {
    Message::Peer(PeerMessage {
        player_id: "p".to_string(),
        seq,
        payload: Payload::DiceRoll(DiceRollPayload { dice_value: 3 }),
    })
}

async fn tcp_pair() -> anyhow::Result<(TcpTransport, TcpTransport)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (client, accepted) = tokio::join!(TcpTransport::connect(addr), listener.accept());
    let (socket, _) = accepted?;
    Ok((TcpTransport::new(socket), client?))
}

#[tokio::test]
async fn in_memory_pair_delivers_in_order_and_reports_close() {
    let (mut a, mut b) = InMemoryTransport::pair();
    for seq in 0..3 {
        a.send(peer(seq)).await.unwrap();
    }
    for seq in 0..3 {
        assert_eq!(b.recv().await.unwrap(), peer(seq));
    }
    drop(a);
    assert!(b.recv().await.is_err());
}

#[tokio::test]
async fn echoing_pair_reflects_to_sender() {
    let (mut a, mut b) = InMemoryTransport::echoing_pair();
    a.send(peer(0)).await.unwrap();
    assert_eq!(a.recv().await.unwrap(), peer(0));
    assert_eq!(b.recv().await.unwrap(), peer(0));
}

#[tokio::test]
async fn tcp_round_trip() -> anyhow::Result<()> {
    let (mut server, mut client) = tcp_pair().await?;
    client.send(peer(1)).await?;
    assert_eq!(server.recv().await?, peer(1));
    server
        .send(Message::Leave {
            player_id: "host".to_string(),
        })
        .await?;
    assert_eq!(
        client.recv().await?,
        Message::Leave {
            player_id: "host".to_string()
        }
    );
    Ok(())
}

#[tokio::test]
async fn tcp_recv_survives_being_cancelled() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let writer = tokio::spawn(async move {
        let (mut raw, _) = listener.accept().await.unwrap();
        for seq in 0..20u64 {
            let body = bincode::serialize(&peer(seq)).unwrap();
            let mut frame = (body.len() as u32).to_be_bytes().to_vec();
            frame.extend_from_slice(&body);
            // dribble the frame out in two halves
            let mid = frame.len() / 2;
            raw.write_all(&frame[..mid]).await.unwrap();
            raw.flush().await.unwrap();
            tokio::time::sleep(Duration::from_millis(2)).await;
            raw.write_all(&frame[mid..]).await.unwrap();
        }
        raw
    });

    let mut client = TcpTransport::connect(addr).await?;
    let mut got = Vec::new();
    while got.len() < 20 {
        tokio::select! {
            msg = client.recv() => got.push(msg?),
            _ = tokio::time::sleep(Duration::from_millis(1)) => {}
        }
    }
    let _raw = writer.await?;
    let expected: Vec<Message> = (0..20).map(peer).collect();
    assert_eq!(got, expected);
    Ok(())
}

#[tokio::test]
async fn tcp_rejects_oversized_frames() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let mut raw = TcpStream::connect(addr).await?;
    let (socket, _) = listener.accept().await?;
    let mut server = TcpTransport::new(socket);
    raw.write_all(&(10 * 1024 * 1024u32).to_be_bytes()).await?;
    raw.flush().await?;
    let err = server.recv().await.unwrap_err();
    assert!(err.to_string().contains("too large"));
    Ok(())
}

#[tokio::test]
async fn tcp_reports_closed_peer() -> anyhow::Result<()> {
    let (mut server, client) = tcp_pair().await?;
    drop(client);
    assert!(server.recv().await.is_err());
    Ok(())
}

#[tokio::test]
async fn shut_down_transport_refuses_io() -> anyhow::Result<()> {
    let (server, mut client) = tcp_pair().await?;
    client.shutdown();
    assert!(client.is_shutdown());
    assert!(client.send(peer(0)).await.is_err());
    drop(server);
    Ok(())
}

#[tokio::test]
async fn heartbeats_are_hidden_from_the_caller() -> anyhow::Result<()> {
    let (server, client) = tcp_pair().await?;
    let mut server = HeartbeatTransport::new(
        server,
        Duration::from_millis(20),
        Duration::from_secs(2),
    );
    let mut client = HeartbeatTransport::new(
        client,
        Duration::from_millis(20),
        Duration::from_secs(2),
    );
    let sender = tokio::spawn(async move {
        // keep polling so heartbeats go out while we wait
        let _ = tokio::time::timeout(Duration::from_millis(200), client.recv()).await;
        client.send(peer(7)).await.unwrap();
        client
    });
    assert_eq!(server.recv().await?, peer(7));
    let _client = sender.await?;
    Ok(())
}

#[tokio::test]
async fn silent_peer_hits_idle_timeout() -> anyhow::Result<()> {
    let (server, _silent) = tcp_pair().await?;
    let mut server = HeartbeatTransport::new(
        server,
        Duration::from_millis(20),
        Duration::from_millis(150),
    );
    let err = server.recv().await.unwrap_err();
    assert!(err.to_string().contains("idle timeout"));
    Ok(())
}

#[tokio::test]
async fn disabled_heartbeat_is_a_pass_through() {
    let (a, b) = InMemoryTransport::pair();
    let mut a = HeartbeatTransport::disabled(a);
    let mut b = HeartbeatTransport::disabled(b);
    a.send(peer(2)).await.unwrap();
    assert_eq!(b.recv().await.unwrap(), peer(2));
}
