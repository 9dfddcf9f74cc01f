//! Eaters - Entry Point
//!
//! Loads a world from TOML and either runs it headless for a fixed number of
//! ticks or drives it from a line-oriented prompt, where typed commands are
//! the human players' input.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use eaters::core::config::{SimulationConfig, TurnConfig};
use eaters::core::error::Result;
use eaters::core::types::PlayerId;
use eaters::input::InputQueue;
use eaters::player::{MoveInfo, Player};
use eaters::simulation::{run_tick, TickEvent, TickOutcome, TickReport};
use eaters::world::World;

/// Report format for headless runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Turn-based eaters on a grid
#[derive(Parser, Debug)]
#[command(name = "eaters")]
struct Args {
    /// World config (TOML); defaults to an empty 16x16 map
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Run this many ticks without a prompt, then exit (capped by max_ticks)
    #[arg(long)]
    ticks: Option<u64>,

    /// Report format for headless runs
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("eaters=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let mut world = World::from_config(&config)?;

    match args.ticks {
        Some(n) => run_headless(&mut world, &config.turn, n, args.format),
        None => run_interactive(&mut world, config.turn.max_ticks),
    }
}

/// Scripted players only; humans get no input and are idle or block the tick
fn run_headless(world: &mut World, turn: &TurnConfig, requested: u64, format: Format) -> Result<()> {
    let ticks = turn.tick_limit(requested);
    if ticks < requested {
        tracing::info!("Capping run at max_ticks = {} ({} requested)", ticks, requested);
    }

    let mut input = InputQueue::new();
    let mut reports = Vec::new();

    for _ in 0..ticks {
        match run_tick(world, &mut input) {
            TickOutcome::Completed(report) => reports.push(report),
            TickOutcome::Waiting { tick, not_ready } => {
                tracing::warn!("Tick {} needs human input from {:?}; stopping", tick, not_ready);
                break;
            }
            TickOutcome::Stopped => break,
        }
    }

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        Format::Text => {
            for report in &reports {
                print_report(report);
            }
            println!("Ran {} ticks.", reports.len());
        }
    }
    Ok(())
}

fn run_interactive(world: &mut World, max_ticks: Option<u64>) -> Result<()> {
    let mut input = InputQueue::new();

    println!("\n=== EATERS ===");
    println!();
    println!("Commands:");
    println!("  move <id> <dir> [jump|open|dont_eat|stop]  - Queue a move for a human player");
    println!("  remove <id>     - Take a player out of the world");
    println!("  tick / t        - Advance the simulation by one tick");
    println!("  run <n>         - Advance n ticks");
    println!("  status / s      - Show players");
    println!("  quit / q        - Exit");
    println!();

    // Main game loop
    loop {
        if world.is_stopped() {
            println!("Simulation stopped at tick {}.", world.current_tick);
            break;
        }
        if max_ticks.is_some_and(|max| world.current_tick >= max) {
            println!("Reached tick limit {}.", world.current_tick);
            break;
        }

        // Prompt for input
        print!("[tick {}]> ", world.current_tick);
        io::stdout().flush()?;

        // Read input; EOF ends the session
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        // Handle quit command
        if line == "quit" || line == "q" {
            break;
        }

        // Handle status command
        if line == "status" || line == "s" {
            display_status(world, &input);
            continue;
        }

        // Handle tick command
        if line == "tick" || line == "t" {
            step(world, &mut input);
            continue;
        }

        // Handle run <n> command, stopping early if a tick waits
        if let Some(rest) = line.strip_prefix("run ") {
            match rest.trim().parse::<u64>() {
                Ok(n) => {
                    for _ in 0..n {
                        if !step(world, &mut input) {
                            break;
                        }
                    }
                }
                Err(_) => println!("Usage: run <number>"),
            }
            continue;
        }

        // Handle move command: humans only, scripted players never read input
        if let Some(rest) = line.strip_prefix("move ") {
            let Some((id, mv)) = rest.trim().split_once(char::is_whitespace) else {
                println!("Usage: move <id> <dir> [flags]");
                continue;
            };
            let id = PlayerId::from(id);
            if let Err(e) = world.check_human(&id) {
                println!("{}", e);
                continue;
            }
            match mv.parse::<MoveInfo>() {
                Ok(mv) => {
                    input.push(id.clone(), mv);
                    println!("Queued for {} ({} pending)", id, input.pending(&id));
                }
                Err(e) => println!("{}", e),
            }
            continue;
        }

        // Handle remove command
        if let Some(rest) = line.strip_prefix("remove ") {
            let id = PlayerId::from(rest.trim());
            match world.disconnect(&id, &mut input) {
                Ok(_) => println!("Removed {}", id),
                Err(e) => println!("{}", e),
            }
            continue;
        }

        println!("Unknown command: {}", line);
    }

    Ok(())
}

/// One tick from the prompt. Returns false when the tick did not complete.
fn step(world: &mut World, input: &mut InputQueue) -> bool {
    match run_tick(world, input) {
        TickOutcome::Completed(report) => {
            print_report(&report);
            true
        }
        TickOutcome::Waiting { tick, not_ready } => {
            let names: Vec<String> = not_ready.iter().map(ToString::to_string).collect();
            println!("Tick {} waiting on: {}", tick, names.join(", "));
            false
        }
        TickOutcome::Stopped => false,
    }
}

fn print_report(report: &TickReport) {
    println!("--- tick {} ---", report.tick);
    for event in &report.events {
        match event {
            TickEvent::Moved { player, from, to, facing } => println!(
                "  {} moved ({}, {}) -> ({}, {}), facing {}",
                player, from.x, from.y, to.x, to.y, facing
            ),
            TickEvent::Blocked { player, at, direction } => {
                println!("  {} blocked going {} at ({}, {})", player, direction, at.x, at.y)
            }
            TickEvent::Stayed { player } => println!("  {} stayed", player),
            TickEvent::Idle { player } => println!("  {} idle", player),
            TickEvent::Failed { player, reason } => println!("  {} skipped: {}", player, reason),
            TickEvent::StopRequested { player } => println!("  {} asked to stop", player),
        }
    }
}

fn display_status(world: &World, input: &InputQueue) {
    println!(
        "Tick {} | {}x{} map | {:?}{}",
        world.current_tick,
        world.map().width,
        world.map().height,
        world.policy(),
        if world.is_waiting() { " | waiting" } else { "" }
    );
    for (player, location) in world.players() {
        println!(
            "  {:<10} {:?} at ({}, {}) facing {} | ready: {} | queued: {}",
            player.id().to_string(),
            player.kind(),
            location.x,
            location.y,
            player.facing(),
            player.has_move(),
            input.pending(player.id())
        );
    }
}
