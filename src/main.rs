#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use cargo_push::{
    host_handshake, init_logging, join_handshake, ui, AiPlayer, CliPlayer, HeartbeatTransport,
    InMemoryTransport, JsonLinesSink, LogSink, MatchConfig, MatchController, MatchOutcome,
    Participant, Player, ResultSink, Seat, SessionRecord, TcpTransport, Transport,
};

#[cfg(feature = "std")]
use clap::{Args, Parser, ValueEnum};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use std::{path::PathBuf, sync::Arc};
#[cfg(feature = "std")]
use tokio::net::TcpListener;
#[cfg(feature = "std")]
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
#[cfg(feature = "std")]
enum PlayerType {
    Human,
    Ai,
}

#[derive(Args, Clone, Debug)]
#[cfg(feature = "std")]
struct MatchArgs {
    #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
    #[arg(long, help = "Append a JSON line per finished match to this file")]
    results: Option<PathBuf>,
    #[arg(long, default_value_t = 1000, help = "Length of one clock tick in milliseconds")]
    tick_ms: u64,
    #[arg(long, default_value_t = cargo_push::core::TURN_CLOCK_TICKS)]
    turn_clock: u32,
    #[arg(long, default_value_t = cargo_push::core::MOVE_CLOCK_TICKS)]
    move_clock: u32,
    #[arg(long, default_value_t = 600, help = "Pause after an opponent move, in milliseconds")]
    settle_ms: u64,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Play a match on the local machine against the AI.
    Local {
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[command(flatten)]
        args: MatchArgs,
    },
    /// Host a match and wait for the second player to connect.
    TcpServer {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[arg(long, default_value = "cargo-push-session")]
        session: String,
        #[arg(long, default_value = "host")]
        host_id: String,
        #[arg(long, default_value = "guest")]
        guest_id: String,
        #[command(flatten)]
        args: MatchArgs,
    },
    /// Join a match hosted by a server.
    TcpClient {
        #[arg(long, default_value = "127.0.0.1:8080")]
        connect: String,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[arg(long, default_value = "guest")]
        player_id: String,
        #[command(flatten)]
        args: MatchArgs,
    },
}

#[cfg(feature = "std")]
impl MatchArgs {
    fn config(&self) -> MatchConfig {
        MatchConfig {
            tick: Duration::from_millis(self.tick_ms),
            turn_clock_ticks: self.turn_clock,
            move_clock_ticks: self.move_clock,
            settle_delay: Duration::from_millis(self.settle_ms),
            ..MatchConfig::default()
        }
    }

    fn rng(&self, offset: u64) -> SmallRng {
        if let Some(s) = self.seed {
            println!("Using fixed seed: {} (game will be reproducible)", s);
            SmallRng::seed_from_u64(s.wrapping_add(offset))
        } else {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }

    fn sink(&self) -> Arc<dyn ResultSink> {
        match &self.results {
            Some(path) => Arc::new(JsonLinesSink::new(path.clone())),
            None => Arc::new(LogSink),
        }
    }
}

#[cfg(feature = "std")]
fn make_player(kind: PlayerType) -> Box<dyn Player> {
    match kind {
        PlayerType::Human => Box::new(CliPlayer::new()),
        PlayerType::Ai => {
            println!("AI player selected.");
            Box::new(AiPlayer::new())
        }
    }
}

#[cfg(feature = "std")]
fn two_player_session(session_id: &str, first: &str, second: &str) -> SessionRecord {
    SessionRecord::new(
        session_id,
        vec![Participant::new(first, first), Participant::new(second, second)],
    )
}

#[cfg(feature = "std")]
async fn run_match(
    seat: Seat,
    player: Box<dyn Player>,
    transport: Box<dyn Transport>,
    args: &MatchArgs,
    rng: &mut SmallRng,
) -> anyhow::Result<MatchOutcome> {
    let mut controller = MatchController::new(seat, player, transport, args.config(), args.sink());
    let outcome = controller.run(rng).await?;
    if let Some(report) = controller.take_report_task() {
        let _ = report.await;
    }
    Ok(outcome)
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Local { player, args } => {
            println!("Starting local match against the AI...");
            let session = two_player_session("local", "you", "ai");
            let mut rng1 = args.rng(0);
            let mut rng2 = args.rng(1);
            let (t1, t2) = InMemoryTransport::pair();

            let mut you = MatchController::new(
                Seat::resolve(&session, "you")?,
                make_player(player),
                Box::new(HeartbeatTransport::disabled(t1)),
                args.config(),
                args.sink(),
            );
            let mut ai = MatchController::new(
                Seat::resolve(&session, "ai")?,
                Box::new(AiPlayer::new()),
                Box::new(HeartbeatTransport::disabled(t2)),
                args.config(),
                Arc::new(LogSink),
            );

            let (outcome, _) = tokio::join!(you.run(&mut rng1), ai.run(&mut rng2));
            let outcome = outcome?;
            if let Some(report) = you.take_report_task() {
                let _ = report.await;
            }
            if let PlayerType::Ai = player {
                println!("{}", ui::render_outcome(&outcome));
            }
        }
        Commands::TcpServer {
            bind,
            player,
            session,
            host_id,
            guest_id,
            args,
        } => {
            println!("Starting TCP server at {}...", bind);
            let listener = TcpListener::bind(&bind).await?;
            println!("Waiting for a player to connect...");
            let (stream, addr) = listener.accept().await?;
            stream.set_nodelay(true)?;
            println!("Player connected from {}", addr);

            let config = args.config();
            let mut transport = HeartbeatTransport::new(
                TcpTransport::new(stream),
                config.heartbeat_interval,
                config.idle_timeout,
            );
            let record = two_player_session(&session, &host_id, &guest_id);
            let seat = host_handshake(&mut transport, &record, &host_id).await?;

            let mut rng = args.rng(0);
            if let Err(e) = run_match(seat, make_player(player), Box::new(transport), &args, &mut rng).await {
                eprintln!("Match ended with an error: {}", e);
            }
        }
        Commands::TcpClient {
            connect,
            player,
            player_id,
            args,
        } => {
            println!("Connecting to TCP server at {}...", connect);
            let config = args.config();
            let mut transport = HeartbeatTransport::new(
                TcpTransport::connect(&connect).await?,
                config.heartbeat_interval,
                config.idle_timeout,
            );
            let record = join_handshake(&mut transport, &player_id).await?;
            let seat = Seat::resolve(&record, &player_id)?;
            println!("Joined session {} against {}", seat.session_id, seat.opponent.username);

            let mut rng = args.rng(0);
            if let Err(e) = run_match(seat, make_player(player), Box::new(transport), &args, &mut rng).await {
                eprintln!("Match ended with an error: {}", e);
            }
        }
    }
    Ok(())
}
