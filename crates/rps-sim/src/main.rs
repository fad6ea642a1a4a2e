//! Headless simulator for the rock-paper-scissors engine.
//!
//! Plays a series of matches in one session with a scripted player and
//! prints a summary per match plus the final rank and currency.
//! Run with: `cargo run -p rps-sim -- --matches 10 --player counter`

mod player;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use rps_engine::{
    EngineConfig, MatchOutcome, OpponentStrategy, RoundPhase, SeededRng, Session, SessionSnapshot,
};

use tracing_subscriber::EnvFilter;

use player::{Player, PlayerPolicy};

/// Guard against a config whose timings never let a match finish.
const MAX_TICKS_PER_MATCH: u32 = 1_000_000;

#[derive(Parser)]
#[command(name = "rps-sim")]
#[command(about = "Simulate rock-paper-scissors matches", long_about = None)]
#[command(version)]
struct Cli {
    /// Number of matches to play in the session
    #[arg(long, default_value_t = 10)]
    matches: u32,

    /// Session seed; the same seed and flags replay the same run
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// JSON engine config; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated frame length in milliseconds
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    #[arg(long, value_enum, default_value_t = PlayerPolicy::Random)]
    player: PlayerPolicy,

    /// Overrides the opponent strategy from the config file
    #[arg(long, value_enum)]
    opponent: Option<OpponentKind>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OpponentKind {
    Uniform,
    Habitual,
    Cycling,
}

impl From<OpponentKind> for OpponentStrategy {
    fn from(kind: OpponentKind) -> Self {
        match kind {
            OpponentKind::Uniform => OpponentStrategy::Uniform,
            OpponentKind::Habitual => OpponentStrategy::Habitual { stickiness: 60 },
            OpponentKind::Cycling => OpponentStrategy::Cycling,
        }
    }
}

#[derive(Debug, Default)]
struct Tally {
    victories: u32,
    defeats: u32,
    rounds: u32,
}

fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    if cli.tick_ms == 0 {
        bail!("--tick-ms must be greater than zero");
    }

    let mut config = load_config(cli.config.as_ref())?;
    if let Some(kind) = cli.opponent {
        config.opponent = kind.into();
    }
    tracing::info!(opponent = %config.opponent.describe(), player = ?cli.player, "starting simulation");

    let mut session = Session::new(config, cli.seed).context("invalid engine config")?;
    let log = session.record_events();
    let mut player = Player::new(cli.player, SeededRng::new(cli.seed).fork(1));
    let tick = Duration::from_millis(cli.tick_ms);
    let mut tally = Tally::default();

    for index in 1..=cli.matches {
        session.start_match();
        let rounds = play_match(&mut session, &mut player, tick)?;
        for event in log.drain() {
            tracing::debug!(event = %serde_json::to_string(&event)?, "notification");
        }
        let snap = session.snapshot();

        match session.match_outcome() {
            Some(MatchOutcome::Victory) => tally.victories += 1,
            Some(MatchOutcome::Defeat) => tally.defeats += 1,
            None => bail!("match {} stopped without an outcome", index),
        }
        tally.rounds += rounds;
        print_match(index, rounds, &snap, &session);
    }

    let snap = session.snapshot();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snap)?);
    } else {
        print_final(&tally, &snap, &session);
    }
    Ok(())
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_writer(std::io::stderr)
        .init();
}

/// `RUST_LOG` directives when set and valid, `info` otherwise.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    EngineConfig::from_json(&json).with_context(|| format!("invalid config {}", path.display()))
}

/// Tick one match to completion. Returns the number of rounds played.
fn play_match(session: &mut Session, player: &mut Player, tick: Duration) -> Result<u32> {
    let mut submitted_round = 0;

    for _ in 0..MAX_TICKS_PER_MATCH {
        let round = session.ledgers().battle.current_round();
        if session.phase() == RoundPhase::Selecting && submitted_round != round {
            submitted_round = round;
            if let Some(choice) = player.choose(&session.ledgers().patterns) {
                session.submit_move(choice);
            }
        }

        if session.advance(tick) == RoundPhase::MatchEnd {
            return Ok(session.ledgers().battle.current_round());
        }
    }
    bail!("match did not finish within {} ticks", MAX_TICKS_PER_MATCH)
}

fn print_match(index: u32, rounds: u32, snap: &SessionSnapshot, session: &Session) {
    let outcome = snap
        .match_outcome
        .map(|o| o.to_string())
        .unwrap_or_else(|| "unfinished".to_string());

    println!(
        "match {:>3}: {:<8} rounds {:>2}  hp {:>3}/{:<3}  streak {}  {} ({} pts)  gold {}",
        index,
        outcome,
        rounds,
        snap.player_hp,
        snap.opponent_hp,
        snap.streak,
        session.ledgers().rank.rank_display(),
        snap.points,
        snap.gold,
    );
}

fn print_final(tally: &Tally, snap: &SessionSnapshot, session: &Session) {
    println!();
    println!(
        "{} victories, {} defeats over {} rounds",
        tally.victories, tally.defeats, tally.rounds
    );
    println!(
        "rank: {} with {} points ({} to next tier)",
        session.ledgers().rank.rank_display(),
        snap.points,
        snap.points_to_next_tier
    );
    println!("currency: {} gold, {} gems", snap.gold, snap.gems);
    println!("opponent {}", session.ledgers().patterns);
}
