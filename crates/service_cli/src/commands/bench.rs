//! Bench command implementation
//!
//! Times each set of trials with the wall clock and reports seconds per set.

use std::time::Instant;
use tracing::info;

use search_kernel::sim::{SearchTimeStats, SimulationDriver};

use crate::config::RunConfig;
use crate::Result;

/// Run the bench command
pub fn run(config: &RunConfig) -> Result<()> {
    let sim = config.to_simulation_config()?;
    let set_count = sim.set_count();
    let repeat_count = sim.repeat_count();

    info!("Starting benchmark...");
    info!(
        "  Domain: {}D {} ({})",
        sim.domain().dimension(),
        sim.domain().shape(),
        sim.domain().boundary()
    );
    info!("  Sets: {} x {} repetitions", set_count, repeat_count);

    let mut driver = SimulationDriver::new(sim);
    let mut total = 0.0;

    println!("{:>5} {:>12} {:>16}", "set", "seconds", "mean_time");
    for set_index in 0..set_count {
        let start = Instant::now();
        let outcomes = driver.run_set(set_index)?;
        let elapsed = start.elapsed().as_secs_f64();
        total += elapsed;

        let stats = SearchTimeStats::from_outcomes(&outcomes);
        println!(
            "{:>5} {:>12.6} {:>16.6}",
            set_index,
            elapsed,
            stats.mean().unwrap_or(f64::NAN)
        );
    }

    let per_set = total / f64::from(set_count);
    println!();
    println!("seconds per set: {:.6}", per_set);
    info!(total_seconds = total, seconds_per_set = per_set, "Benchmark complete");
    Ok(())
}
