#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays headless lane defence matches.

mod layout_transfer;
mod render;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lane_defence_core::{Command, Event, Gold, PlayerId, Strategy, UnitKind};
use lane_defence_system_chessboard::{Chessboard, ChessboardConfig};
use lane_defence_system_idle::Idle;
use lane_defence_world::{self as world, query, Seat, World};
use layout_transfer::LaneLayoutSnapshot;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use render::{MatchSummary, PlayerSummary};
use serde::Serialize;
use settings::Settings;
use tracing_subscriber::EnvFilter;

/// Command-line arguments accepted by the lane defence binary.
#[derive(Debug, Parser)]
#[command(name = "lane-defence", about = "Plays headless lane defence matches.")]
struct Args {
    /// Optional TOML file with match and strategy settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Number of decision cycles to play.
    #[arg(long, default_value_t = 20)]
    cycles: u32,
    /// Seed for the random source; drawn from entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Gold granted to each player at the start of every cycle.
    #[arg(long, default_value_t = 10)]
    income: u32,
    /// Strategy controlling the first player.
    #[arg(long, value_enum, default_value_t = StrategyKind::Chessboard)]
    first: StrategyKind,
    /// Strategy controlling the second player.
    #[arg(long, value_enum, default_value_t = StrategyKind::Idle)]
    second: StrategyKind,
    /// Layout code placed on the second player's lane before the first cycle.
    #[arg(long, value_name = "CODE")]
    enemy_layout: Option<String>,
    /// Output format of the final report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Strategies selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum StrategyKind {
    /// Checkerboard defence with least-danger attacks.
    Chessboard,
    /// Never spends gold.
    Idle,
}

impl StrategyKind {
    fn build(self, config: ChessboardConfig) -> Box<dyn Strategy> {
        match self {
            Self::Chessboard => Box::new(Chessboard::new(config)),
            Self::Idle => Box::new(Idle),
        }
    }
}

/// Formats of the final report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human readable lanes and totals.
    Text,
    /// Machine readable JSON document.
    Json,
}

/// Entry point for the lane defence command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, cycles = args.cycles, "starting match");

    let mut world = World::new(settings.match_config);
    if let Some(code) = &args.enemy_layout {
        LaneLayoutSnapshot::decode(code)
            .context("failed to decode enemy layout")?
            .apply_to(&mut world, PlayerId::Second)
            .context("failed to place enemy layout")?;
    }

    let kinds = [args.first, args.second];
    let mut strategies = kinds.map(|kind| kind.build(settings.chessboard));
    let events = play(
        &mut world,
        &mut strategies,
        args.cycles,
        Gold::new(args.income),
        seed,
    )?;

    let players = PlayerId::ALL
        .into_iter()
        .zip(kinds)
        .zip(&strategies)
        .map(|((player, kind), strategy)| {
            summarize(&world, &events, player, kind, strategy.as_ref())
        })
        .collect::<Result<Vec<_>>>()?;
    let summary = MatchSummary {
        seed,
        cycles: args.cycles,
        players,
    };

    match args.format {
        OutputFormat::Text => print!("{}", render::render_text(&world, &summary)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("failed to serialise summary")?
        ),
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn play(
    world: &mut World,
    strategies: &mut [Box<dyn Strategy>; 2],
    cycles: u32,
    income: Gold,
    seed: u64,
) -> Result<Vec<Event>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut events = Vec::new();

    for cycle in 0..cycles {
        for (player, strategy) in PlayerId::ALL.into_iter().zip(strategies.iter_mut()) {
            world::apply(
                world,
                Command::GrantGold {
                    player,
                    amount: income,
                },
                &mut events,
            );

            let mut seat = Seat::new(world, player);
            strategy
                .deploy_towers(&mut seat)
                .with_context(|| format!("{player:?} failed to deploy towers in cycle {cycle}"))?;
            strategy
                .deploy_soldiers(&mut seat, &mut rng)
                .with_context(|| format!("{player:?} failed to deploy soldiers in cycle {cycle}"))?;
            events.extend(seat.into_events());
        }
        tracing::debug!(
            cycle,
            first_gold = query::gold(world, PlayerId::First).get(),
            second_gold = query::gold(world, PlayerId::Second).get(),
            "cycle finished"
        );
    }
    Ok(events)
}

fn summarize(
    world: &World,
    events: &[Event],
    player: PlayerId,
    strategy_kind: StrategyKind,
    strategy: &dyn Strategy,
) -> Result<PlayerSummary> {
    let order = strategy.order_soldiers(query::soldiers(world, player).to_vec());
    tracing::debug!(?player, lead = ?order.first(), "soldier order");

    let rejected_purchases = events
        .iter()
        .filter(|event| {
            matches!(event, Event::PurchaseRejected { player: rejected, .. } if *rejected == player)
        })
        .count();
    let layout = LaneLayoutSnapshot::capture(world, player)
        .encode()
        .context("failed to encode lane layout")?;

    Ok(PlayerSummary {
        player,
        strategy: strategy_kind,
        gold: query::gold(world, player),
        towers: query::lane(world, player).unit_count(UnitKind::Tower),
        soldiers_sent: order.len(),
        rejected_purchases,
        layout,
    })
}
