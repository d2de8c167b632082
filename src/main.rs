//! Immortal Arena - Entry Point
//!
//! Runs a timed simulation: build a population, let it fight for the
//! requested duration, pause for a stable snapshot, print the report, stop.

use clap::Parser;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use immortal_arena::arena::ArenaManager;
use immortal_arena::core::config::SimulationConfig;
use immortal_arena::core::error::Result;
use immortal_arena::core::types::FightMode;

#[derive(Parser, Debug)]
#[command(name = "immortal-arena", about = "Concurrent immortal-fight simulator")]
struct Cli {
    /// Number of immortals (one worker thread each)
    #[arg(long, default_value_t = 8)]
    count: usize,

    /// Starting health per immortal
    #[arg(long, default_value_t = 100)]
    health: u32,

    /// Damage attempted per strike
    #[arg(long, default_value_t = 10)]
    damage: u32,

    /// Lock discipline: "ordered" (deadlock-free) or "naive" (can stall)
    #[arg(long, default_value = "ordered")]
    mode: FightMode,

    /// How long to let the simulation run, in milliseconds
    #[arg(long, default_value_t = 3000)]
    run_ms: u64,

    /// Load the whole configuration from a TOML file instead of the flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit the final report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SimulationConfig::from_toml_file(path)?,
        None => SimulationConfig {
            count: cli.count,
            initial_health: cli.health,
            damage: cli.damage,
            mode: cli.mode,
        },
    };
    config.validate()?;

    let mut manager = ArenaManager::new(config)?;
    manager.start()?;
    thread::sleep(Duration::from_millis(cli.run_ms));

    manager.pause();
    let report = manager.report();
    manager.stop();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("=== IMMORTAL ARENA ===");
        println!(
            "mode={}  fights={}  alive={}/{}  total health={}",
            report.mode,
            report.total_fights,
            report.alive_count,
            report.immortals.len(),
            report.total_health
        );
        for im in &report.immortals {
            let status = if im.alive { "alive" } else { "dead" };
            println!("  {:<14} {:>6} hp  ({status})", im.name, im.health);
        }
    }
    Ok(())
}
