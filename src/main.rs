use anyhow::Result;
use clap::Parser;
use log::info;

use intersection_sim::simulation::{
    SimConfig, World, DEFAULT_GREEN_MS, DEFAULT_MAX_AGENTS, DEFAULT_SPAWN_RATE,
    DEFAULT_VEHICLE_SPEED, DEFAULT_YELLOW_MS,
};

#[derive(Parser)]
#[command(name = "intersection_sim")]
#[command(about = "Headless four-way intersection simulation")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "3600")]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    delta: f32,

    /// Seed for spawn decisions; omit for a different run every time
    #[arg(long)]
    seed: Option<u64>,

    /// Print a summary every this many simulated seconds
    #[arg(long, default_value = "10")]
    report_secs: f32,

    /// Green time per axis in milliseconds
    #[arg(long, default_value_t = DEFAULT_GREEN_MS)]
    green_ms: u64,

    /// Yellow time per axis in milliseconds
    #[arg(long, default_value_t = DEFAULT_YELLOW_MS)]
    yellow_ms: u64,

    /// Vehicle speed in units per second
    #[arg(long, default_value_t = DEFAULT_VEHICLE_SPEED)]
    speed: f32,

    /// Probability of a spawn attempt per tick
    #[arg(long, default_value_t = DEFAULT_SPAWN_RATE)]
    spawn_rate: f64,

    /// Maximum number of live vehicles
    #[arg(long, default_value_t = DEFAULT_MAX_AGENTS)]
    max_agents: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,intersection_sim=info"),
    )
    .init();

    let cli = Cli::parse();
    let config = SimConfig::new()
        .with_green_ms(cli.green_ms)
        .with_yellow_ms(cli.yellow_ms)
        .with_vehicle_speed(cli.speed)
        .with_spawn_rate(cli.spawn_rate)
        .with_max_agents(cli.max_agents);
    config.validate()?;

    run_headless(&cli, &config)
}

/// Run the simulation without any graphics
fn run_headless(cli: &Cli, config: &SimConfig) -> Result<()> {
    println!("Running intersection simulation in headless mode...");
    println!("Ticks: {}, Delta: {}s", cli.ticks, cli.delta);
    println!();

    let mut world = match cli.seed {
        Some(seed) => World::new_with_seed(seed),
        None => World::new(),
    };

    let ticks_per_report = ((cli.report_secs / cli.delta).ceil() as u32).max(1);

    println!("Initial state:");
    world.print_summary();
    println!();

    let mut tick = 0;
    while tick < cli.ticks {
        let ticks_to_run = ticks_per_report.min(cli.ticks - tick);

        for _ in 0..ticks_to_run {
            tick += 1;
            world.tick(cli.delta, config)?;
        }

        println!(
            "--- After tick {} ({:.1}s simulated time) ---",
            tick,
            world.time().as_secs_f32()
        );
        world.print_summary();
        println!();
    }

    let stats = world.stats();
    info!(
        "simulation complete: {} spawned, {} exited, {} light cycles",
        stats.total_spawned, stats.total_reaped, stats.cycles_completed
    );

    println!("=== Final State ===");
    world.print_summary();
    Ok(())
}
