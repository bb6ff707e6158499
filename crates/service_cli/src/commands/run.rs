//! Run command implementation
//!
//! Runs every set of the configured batch and writes the trial outcomes,
//! optionally followed by a histogram of the absorbed search times.

use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use search_kernel::sim::{
    BatchResult, BinScale, HistogramBin, SearchTimeHistogram, SimulationDriver, TrialOutcome,
};

use super::open_output;
use crate::config::RunConfig;
use crate::{CliError, Result};

/// Output formats of `rts run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: json, csv, table",
                other
            ))),
        }
    }
}

/// Batch summary as written in JSON reports.
#[derive(Debug, Serialize)]
struct Summary {
    trials: usize,
    absorbed: u64,
    unconverged: u64,
    mean_search_time: Option<f64>,
    std_error: Option<f64>,
    min_search_time: Option<f64>,
    max_search_time: Option<f64>,
}

impl Summary {
    fn of(batch: &BatchResult) -> Self {
        let stats = &batch.stats;
        Self {
            trials: batch.outcomes.len(),
            absorbed: stats.count(),
            unconverged: stats.unconverged(),
            mean_search_time: stats.mean(),
            std_error: stats.std_error(),
            min_search_time: stats.min(),
            max_search_time: stats.max(),
        }
    }
}

/// Requested histogram layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramSpec {
    pub bins: usize,
    pub scale: BinScale,
}

#[derive(Debug, Serialize)]
struct HistogramReport {
    scale: BinScale,
    bins: Vec<HistogramBin>,
    underflow: u64,
    overflow: u64,
}

impl HistogramReport {
    fn of(histogram: &SearchTimeHistogram) -> Self {
        Self {
            scale: histogram.scale(),
            bins: histogram.bins(),
            underflow: histogram.underflow(),
            overflow: histogram.overflow(),
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    config: &'a RunConfig,
    summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    histogram: Option<HistogramReport>,
    outcomes: &'a [TrialOutcome],
}

/// Run the run command
pub fn run(
    config: &RunConfig,
    format: &str,
    output: Option<&Path>,
    histogram: Option<HistogramSpec>,
) -> Result<()> {
    let format = OutputFormat::from_str(format)?;
    let sim = config.to_simulation_config()?;

    info!("Starting batch...");
    info!("  Sets: {}", sim.set_count());
    info!("  Repetitions per set: {}", sim.repeat_count());
    info!("  Output format: {:?}", format);
    if let Some(spec) = histogram {
        info!("  Histogram: {} {:?} bins", spec.bins, spec.scale);
        if format == OutputFormat::Csv {
            warn!("CSV output carries outcomes only; the histogram is not written");
        }
    }

    let mut driver = SimulationDriver::new(sim);
    let batch = driver.run_batch()?;

    if batch.stats.unconverged() > 0 {
        warn!(
            unconverged = batch.stats.unconverged(),
            "Some trials hit the step cap"
        );
    }

    let histogram = match histogram {
        Some(spec) => SearchTimeHistogram::from_outcomes(&batch.outcomes, spec.scale, spec.bins)?,
        None => None,
    };

    let mut writer = open_output(output)?;
    write_batch(config, &batch, histogram.as_ref(), format, &mut writer)?;
    writer.flush()?;

    info!(
        trials = batch.outcomes.len(),
        mean_search_time = batch.stats.mean(),
        "Batch complete"
    );
    Ok(())
}

/// Writes `batch` to `writer` in `format`.
///
/// The histogram, when given, is appended to table and JSON output.
pub fn write_batch<W: Write>(
    config: &RunConfig,
    batch: &BatchResult,
    histogram: Option<&SearchTimeHistogram>,
    format: OutputFormat,
    mut writer: W,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            write_table(batch, &mut writer)?;
            if let Some(histogram) = histogram {
                write_histogram(histogram, &mut writer)?;
            }
        }
        OutputFormat::Csv => {
            let mut csv = csv::Writer::from_writer(writer);
            for outcome in &batch.outcomes {
                csv.serialize(outcome)?;
            }
            csv.flush()?;
        }
        OutputFormat::Json => {
            let report = Report {
                config,
                summary: Summary::of(batch),
                histogram: histogram.map(HistogramReport::of),
                outcomes: &batch.outcomes,
            };
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

fn write_table<W: Write>(batch: &BatchResult, writer: &mut W) -> std::io::Result<()> {
    writeln!(
        writer,
        "{:>5} {:>7} {:>12} {:>12} {:>16}  status",
        "set", "repeat", "seed", "steps", "search_time"
    )?;
    for o in &batch.outcomes {
        writeln!(
            writer,
            "{:>5} {:>7} {:>12} {:>12} {:>16.6}  {}",
            o.set_index,
            o.repeat_index,
            o.seed,
            o.steps,
            o.search_time,
            if o.is_absorbed() { "absorbed" } else { "step-limit" }
        )?;
    }

    let summary = Summary::of(batch);
    let show = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{:.6}", v));
    writeln!(writer)?;
    writeln!(
        writer,
        "trials {}  absorbed {}  unconverged {}",
        summary.trials, summary.absorbed, summary.unconverged
    )?;
    writeln!(
        writer,
        "mean {}  std_error {}  min {}  max {}",
        show(summary.mean_search_time),
        show(summary.std_error),
        show(summary.min_search_time),
        show(summary.max_search_time)
    )
}

fn write_histogram<W: Write>(histogram: &SearchTimeHistogram, writer: &mut W) -> std::io::Result<()> {
    let scale = match histogram.scale() {
        BinScale::Linear => "linear",
        BinScale::Log => "log",
    };
    writeln!(writer)?;
    writeln!(
        writer,
        "histogram ({}, {} bins)",
        scale,
        histogram.counts().len()
    )?;
    writeln!(writer, "{:>16} {:>16} {:>8}", "from", "to", "count")?;
    for bin in histogram.bins() {
        writeln!(
            writer,
            "{:>16.6} {:>16.6} {:>8}",
            bin.lower, bin.upper, bin.count
        )?;
    }
    if histogram.underflow() + histogram.overflow() > 0 {
        writeln!(
            writer,
            "underflow {}  overflow {}",
            histogram.underflow(),
            histogram.overflow()
        )?;
    }
    Ok(())
}
