//! Hex Travel - command line front end
//!
//! Plans routes, reachability and spawn points on a generated or TOML-loaded
//! map, and can walk an agent along a route with simulated encounters.

use std::cell::Cell;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use hex_travel::map::{HexCoord, HexMap};
use hex_travel::movement::{
    EventLog, MoveCommand, MoveEnd, MovementEvent, MovementObserver, NeverInterrupted, RequestOutcome,
    ResumeToken, TravelController, TurnCounter, Walker,
};
use hex_travel::MovementConfig;

/// Hex Travel - terrain-aware movement on a hex grid
#[derive(Parser, Debug)]
#[command(name = "hex-travel")]
#[command(about = "Plan and walk routes across a hex map")]
struct Args {
    /// TOML map file; a map is generated when omitted
    #[arg(long)]
    map: Option<PathBuf>,

    /// TOML movement configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Generated map width in hexes
    #[arg(long, default_value_t = 30)]
    width: u32,

    /// Generated map height in hexes
    #[arg(long, default_value_t = 20)]
    height: u32,

    /// Seed for map generation and spawn selection
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Preview the cheapest route between two hexes
    Path {
        #[arg(long)]
        from: HexCoord,
        #[arg(long)]
        to: HexCoord,
    },
    /// List hexes reachable within a turn budget
    Reach {
        #[arg(long)]
        from: HexCoord,
        #[arg(long)]
        budget: u32,
    },
    /// Pick starting hexes
    Spawn {
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Walk an agent to a destination, pausing for encounters
    Walk {
        /// Starting hex; a spawn point is chosen when omitted
        #[arg(long)]
        from: Option<HexCoord>,
        #[arg(long)]
        to: HexCoord,
        /// Trigger an encounter on every Nth arrival (0 disables)
        #[arg(long, default_value_t = 0)]
        encounter_every: u32,
        /// Skip step and resume delays
        #[arg(long)]
        no_delay: bool,
    },
}

#[derive(Serialize)]
struct WalkReport {
    from: HexCoord,
    to: HexCoord,
    outcome: &'static str,
    position: HexCoord,
    turns_elapsed: u64,
    events: Vec<MovementEvent>,
}

/// Hands every suspension straight back as a resume, like an encounter
/// that resolves itself
struct AutoResume {
    commands: UnboundedSender<MoveCommand>,
}

impl MovementObserver for AutoResume {
    fn on_suspended(&mut self, hex: HexCoord, token: ResumeToken) {
        tracing::info!(%hex, "encounter resolved");
        if self.commands.send(MoveCommand::Resume(token)).is_err() {
            tracing::warn!("command channel closed before resume");
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hex_travel=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => MovementConfig::load(path)?,
        None => MovementConfig::default(),
    };
    config.seed.get_or_insert(args.seed);
    config.validate()?;

    let map = match &args.map {
        Some(path) => HexMap::load_from_toml(path)?,
        None => HexMap::generate(args.width, args.height, args.seed),
    };
    tracing::info!(width = map.width, height = map.height, "map ready");

    match args.command {
        Command::Path { from, to } => run_path(map, config, from, to, args.json),
        Command::Reach { from, budget } => run_reach(map, config, from, budget, args.json),
        Command::Spawn { count } => run_spawn(map, config, count, args.json),
        Command::Walk {
            from,
            to,
            encounter_every,
            no_delay,
        } => {
            if no_delay {
                config.step_delay = Duration::ZERO;
                config.resume_delay = Duration::ZERO;
            }
            run_walk(map, config, from, to, encounter_every, args.json)
        }
    }
}

/// Controller for a one-shot query: a stationary agent and no encounters
fn query_controller(
    map: HexMap,
    config: MovementConfig,
    from: HexCoord,
) -> Result<TravelController<Walker, TurnCounter, NeverInterrupted>, Box<dyn Error>> {
    Ok(TravelController::builder()
        .map(map)
        .config(config)
        .agent(Walker::at(from))
        .clock(TurnCounter::default())
        .interrupts(NeverInterrupted)
        .build()?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_path(map: HexMap, config: MovementConfig, from: HexCoord, to: HexCoord, json: bool) -> Result<(), Box<dyn Error>> {
    let mut ctl = query_controller(map, config, from)?;
    let RequestOutcome::Previewed(preview) = ctl.request(to)? else {
        return Err("unexpected move start on first request".into());
    };

    if json {
        return print_json(&preview);
    }
    println!("Route {} -> {}: {} hexes, {} turns", from, to, preview.path.len(), preview.total_cost);
    for step in &preview.breakdown {
        let terrain = step.terrain.map_or("off-map", |t| t.name());
        println!("  {:>10} {:<10} +{:<4} = {}", step.coord.to_string(), terrain, step.cost, step.cumulative);
    }
    Ok(())
}

fn run_reach(map: HexMap, config: MovementConfig, from: HexCoord, budget: u32, json: bool) -> Result<(), Box<dyn Error>> {
    let ctl = query_controller(map, config, from)?;
    let mut hexes: Vec<HexCoord> = ctl.reachable(budget).into_iter().collect();
    hexes.sort_unstable();

    if json {
        return print_json(&hexes);
    }
    println!("{} hexes reachable from {} within {} turns", hexes.len(), from, budget);
    for hex in hexes {
        println!("  {}", hex);
    }
    Ok(())
}

fn run_spawn(map: HexMap, config: MovementConfig, count: usize, json: bool) -> Result<(), Box<dyn Error>> {
    let mut ctl = query_controller(map, config, HexCoord::default())?;
    let spawns = (0..count).map(|_| ctl.find_spawn()).collect::<Result<Vec<_>, _>>()?;

    if json {
        return print_json(&spawns);
    }
    for hex in spawns {
        let terrain = ctl.map().terrain_at(hex).map_or("off-map", |t| t.name());
        println!("{} ({})", hex, terrain);
    }
    Ok(())
}

fn run_walk(
    map: HexMap,
    config: MovementConfig,
    from: Option<HexCoord>,
    to: HexCoord,
    encounter_every: u32,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let (tx, mut rx) = unbounded_channel();
    let log = EventLog::new();

    let arrivals = Cell::new(0u32);
    let encounters = move || {
        arrivals.set(arrivals.get() + 1);
        encounter_every > 0 && arrivals.get() % encounter_every == 0
    };

    let mut ctl = TravelController::builder()
        .map(map)
        .config(config)
        .agent(Walker::at(from.unwrap_or_default()))
        .clock(TurnCounter::default())
        .interrupts(encounters)
        .observer(Box::new(log.clone()))
        .observer(Box::new(AutoResume { commands: tx }))
        .build()?;

    let start = match from {
        Some(hex) => hex,
        None => ctl.place_at_spawn()?,
    };

    ctl.request(to)?;
    let started = ctl.confirm()?;
    tracing::info!(hexes = started.hexes, cost = started.cost, "walking");

    let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
    let end = runtime.block_on(ctl.travel(&mut rx));

    let outcome = match end {
        MoveEnd::Completed(_) => "completed",
        MoveEnd::Cancelled(_) => "cancelled",
        MoveEnd::Idle => "idle",
    };
    let report = WalkReport {
        from: start,
        to,
        outcome,
        position: ctl.agent().position,
        turns_elapsed: ctl.clock().elapsed,
        events: log.events(),
    };

    if json {
        return print_json(&report);
    }
    for event in &report.events {
        match event {
            MovementEvent::Arrived { hex, index } => println!("  step {:>3}: {}", index, hex),
            MovementEvent::Suspended { hex, .. } => println!("  encounter at {}", hex),
            MovementEvent::Resumed { .. } => println!("  resuming"),
            MovementEvent::Completed(summary) => {
                println!("Arrived at {} after {} turns", summary.to, summary.total_cost)
            }
            MovementEvent::Cancelled(cancelled) => println!("Stopped at {}", cancelled.position),
        }
    }
    println!("{} at {} ({} turns elapsed)", report.outcome, report.position, report.turns_elapsed);
    Ok(())
}
