//! Burglary hotspot simulation binary
//!
//! Reads `simulation.toml` from the working directory when present and runs a
//! fixed-length experiment. Set `RUST_LOG=burglary_sim=debug` for per-tick logs.

use std::path::Path;

use burglary_sim::simulation::{simulate_with, MetricsCollector};
use burglary_sim::{Result, SimulationConfig};
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "simulation.toml";
const OUTPUT_PATH: &str = "simulation_output.json";
const TICKS: u64 = 1000;
const MAP_INTERVAL: u64 = 100;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("burglary_sim=info")),
        )
        .init();

    let path = Path::new(CONFIG_PATH);
    let config = if path.exists() {
        tracing::info!(path = CONFIG_PATH, "loading config");
        SimulationConfig::load(path)?
    } else {
        SimulationConfig::default()
    };

    println!("Starting Burglary Hotspot Simulation");
    println!("====================================");
    println!(
        "Lattice: {}x{} ({:?}), {} initial offenders",
        config.width, config.height, config.boundary, config.initial_offenders
    );
    println!(
        "delta={} omega={} theta={} mu={} gamma={} base={}",
        config.delta, config.omega, config.theta, config.mu, config.gamma, config.base_attractiveness
    );
    println!("Simulating {} ticks...", TICKS);
    println!();

    let output = simulate_with(config, TICKS, MetricsCollector::with_map_interval(MAP_INTERVAL))?;
    println!("{}", output.summary());

    std::fs::write(OUTPUT_PATH, output.to_json()?)?;
    println!("\nFull output written to {}", OUTPUT_PATH);

    if let Some(last) = output.history.last() {
        println!("\n--- Final Tick ---");
        println!(
            "Attractiveness mean {:.4}, min {:.4}, max {:.4} at {}",
            last.mean_attractiveness, last.min_attractiveness, last.max_attractiveness, last.max_position
        );
        println!("Offenders: {}", last.offenders);
    }

    Ok(())
}
