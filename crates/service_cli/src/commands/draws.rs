//! Draws command implementation
//!
//! Writes a raw uniform or Gaussian stream from the configured base seed,
//! one value per line in scientific notation with ten decimals.

use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use search_kernel::rng::SearchRng;

use super::open_output;
use crate::config::RunConfig;
use crate::{CliError, Result};

const CHUNK: usize = 4096;

/// Raw stream kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    Uniform,
    Normal,
}

impl FromStr for DrawKind {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "uniform" => Ok(DrawKind::Uniform),
            "normal" | "gaussian" => Ok(DrawKind::Normal),
            other => Err(CliError::InvalidArgument(format!(
                "Unknown draw kind: {}. Supported: uniform, normal",
                other
            ))),
        }
    }
}

/// Run the draws command
pub fn run(config: &RunConfig, kind: &str, count: usize, output: Option<&Path>) -> Result<()> {
    let kind = DrawKind::from_str(kind)?;
    info!(?kind, count, seed = config.base_seed, "Writing draws");

    let mut rng = SearchRng::from_seed(config.base_seed);
    let mut writer = open_output(output)?;
    write_draws(&mut rng, kind, count, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes `count` draws of `kind` from `rng`.
pub fn write_draws<W: Write>(
    rng: &mut SearchRng,
    kind: DrawKind,
    count: usize,
    mut writer: W,
) -> Result<()> {
    let mut buffer = vec![0.0; CHUNK.min(count)];
    let mut remaining = count;
    while remaining > 0 {
        let chunk = &mut buffer[..CHUNK.min(remaining)];
        match kind {
            DrawKind::Uniform => rng.fill_uniform(chunk),
            DrawKind::Normal => rng.fill_normal(chunk)?,
        }
        for value in chunk.iter() {
            writeln!(writer, "{:.10e}", value)?;
        }
        remaining -= chunk.len();
    }
    Ok(())
}
