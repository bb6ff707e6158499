//! Check command implementation
//!
//! Validates the layered configuration and prints it with derived values.

use tracing::info;

use search_kernel::sim::SimulationDriver;

use crate::config::RunConfig;
use crate::Result;

/// Run the check command
pub fn run(config: &RunConfig) -> Result<()> {
    print!("{}", render(config)?);
    info!("Configuration is valid");
    Ok(())
}

/// Renders the effective configuration as TOML followed by derived values.
pub fn render(config: &RunConfig) -> Result<String> {
    let sim = config.to_simulation_config()?;
    let driver = SimulationDriver::new(sim);
    let sim = driver.config();

    let mut out = toml::to_string_pretty(config)?;
    out.push_str(&format!(
        "\n# derived\n\
         # step_scale = {}\n\
         # max_step_magnitude = {}\n\
         # trials = {}\n\
         # first_set_seed = {}\n",
        sim.step_scale(),
        sim.max_step_magnitude(),
        sim.trial_count(),
        driver.set_seed(0),
    ));
    Ok(out)
}
