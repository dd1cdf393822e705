use std::sync::Arc;
use std::time::Duration;

use cargo_push::{
    AiPlayer, HeartbeatTransport, InMemoryTransport, LogSink, MatchConfig, MatchController,
    Participant, Seat, SessionRecord, Winner,
};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    let mut rng1 = SmallRng::seed_from_u64(seed1);
    let mut rng2 = SmallRng::seed_from_u64(seed2);

    // clocks long enough that only a goal ends the match
    let config = MatchConfig {
        tick: Duration::from_millis(10),
        turn_clock_ticks: 100_000,
        settle_delay: Duration::ZERO,
        ..MatchConfig::default()
    };
    let session = SessionRecord::new(
        "sim",
        vec![
            Participant::new("player1", "Player 1"),
            Participant::new("player2", "Player 2"),
        ],
    );

    let (t1, t2) = InMemoryTransport::pair();
    let mut c1 = MatchController::new(
        Seat::resolve(&session, "player1")?,
        Box::new(AiPlayer::new()),
        Box::new(HeartbeatTransport::disabled(t1)),
        config,
        Arc::new(LogSink),
    );
    let mut c2 = MatchController::new(
        Seat::resolve(&session, "player2")?,
        Box::new(AiPlayer::new()),
        Box::new(HeartbeatTransport::disabled(t2)),
        config,
        Arc::new(LogSink),
    );

    let (res1, res2) = tokio::join!(c1.run(&mut rng1), c2.run(&mut rng2));
    let (o1, o2) = (res1?, res2?);

    let winner = match o1.winner {
        Winner::Local => "player1",
        Winner::Remote => "player2",
        Winner::Draw => "draw",
    };
    let agreed = o1.lanes == o2.lanes
        && match o1.winner {
            Winner::Local => o2.winner == Winner::Remote,
            Winner::Remote => o2.winner == Winner::Local,
            Winner::Draw => o2.winner == Winner::Draw,
        };

    let result = json!({
        "winner": winner,
        "reason": format!("{:?}", o1.reason),
        "lanes": o1.lanes,
        "ticks": c1.game().ticks(),
        "agreed": agreed,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
