//! Headless Duel Runner
//!
//! Runs an AI vs AI match at a fixed 60 Hz and prints a summary.

use std::process;

use clap::Parser;
use duel_sim::animation::FrameTable;
use duel_sim::core::{MatchConfig, Result};
use duel_sim::input::InputManager;
use duel_sim::match_flow::MatchEventType;
use duel_sim::simulation::{Duel, DuelSummary};

const TICK_RATE: f32 = 60.0;

/// Headless Duel Runner - AI vs AI matches for tuning
#[derive(Parser, Debug)]
#[command(name = "duel_runner")]
#[command(about = "Run an AI vs AI match and print the result")]
struct Args {
    /// Match config (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<String>,

    /// Frame table (JSON) with authored hurtboxes/hitboxes
    #[arg(long)]
    frames: Option<String>,

    /// Character for side A (requires --frames)
    #[arg(long, default_value = "ryu")]
    character_a: String,

    /// Character for side B (requires --frames)
    #[arg(long, default_value = "ken")]
    character_b: String,

    /// Seed for side B's AI; side A uses seed + 1
    #[arg(long)]
    seed: Option<u64>,

    /// Give up after this many simulated seconds
    #[arg(long, default_value_t = 600.0)]
    max_seconds: f32,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Log every match event to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn build_duel(args: &Args) -> Result<Duel> {
    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.ai.seed = seed;
    }
    let seed_a = config.ai.seed.wrapping_add(1);

    let duel = match &args.frames {
        Some(path) => {
            let table = FrameTable::load(path)?;
            Duel::from_frame_table(config, &table, &args.character_a, &args.character_b)?
        }
        None => Duel::new(config)?,
    };
    Ok(duel.with_ai_for_a(seed_a))
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("duel_sim=info")),
        )
        .init();

    let mut duel = match build_duel(&args) {
        Ok(duel) => duel,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let dt = 1.0 / TICK_RATE;
    let max_ticks = (args.max_seconds * TICK_RATE).ceil() as u64;
    let idle_input = InputManager::new();

    if args.verbose {
        eprintln!("=== Match Started (seed {}) ===", duel.config().ai.seed);
    }

    while !duel.is_match_over() && duel.current_tick() < max_ticks {
        let events = duel.tick(dt, &idle_input);
        if args.verbose {
            for event in events.iter() {
                // Landing cues are noise in a text log
                if !matches!(event.event_type, MatchEventType::LandingImpact { .. }) {
                    eprintln!("[{:>6}] {}", event.tick, event.description);
                }
            }
        }
    }

    let summary = DuelSummary::from_duel(&duel);

    match args.format.as_str() {
        "text" => {
            println!("Duel Result");
            println!("===========");
            match summary.winner {
                Some(side) => println!("Winner: {side:?}"),
                None => println!("Winner: none (stopped after {:.1}s)", summary.elapsed_seconds),
            }
            println!("Rounds: {}", summary.rounds_played);
            println!("Wins: A {} - B {}", summary.wins[0], summary.wins[1]);
            println!("Hits: A {} - B {}", summary.hits_landed[0], summary.hits_landed[1]);
            println!("Damage: A {} - B {}", summary.damage_dealt[0], summary.damage_dealt[1]);
            println!("Elapsed: {:.2}s ({} ticks)", summary.elapsed_seconds, summary.ticks);
            println!("Seed: {}", summary.seed);
        }
        other => {
            if other != "json" {
                eprintln!("Unknown format '{other}', defaulting to json");
            }
            match serde_json::to_string_pretty(&summary) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error: failed to serialize summary: {e}");
                    process::exit(1);
                }
            }
        }
    }
}
