//! Running statistics and histograms of search times.
//!
//! Only absorbed trials contribute to the moments and histograms; trials
//! stopped by the step cap are counted separately so a partial batch is never
//! mistaken for a shorter mean first-passage time.

use std::str::FromStr;

use super::driver::TrialOutcome;
use crate::error::ConfigError;

/// Running mean, variance and range of first-passage times.
///
/// Moments are accumulated with Welford's update, so long and tightly spread
/// search times keep their variance.
///
/// # Examples
///
/// ```rust
/// use search_kernel::sim::SearchTimeStats;
///
/// let mut stats = SearchTimeStats::new();
/// for t in [1.0, 2.0, 3.0] {
///     stats.push(t);
/// }
/// assert_eq!(stats.mean(), Some(2.0));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SearchTimeStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: Option<f64>,
    max: Option<f64>,
    unconverged: u64,
}

impl SearchTimeStats {
    /// Creates empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds statistics over a slice of outcomes.
    pub fn from_outcomes(outcomes: &[TrialOutcome]) -> Self {
        let mut stats = Self::new();
        for outcome in outcomes {
            stats.record(outcome);
        }
        stats
    }

    /// Adds one absorbed search time.
    pub fn push(&mut self, search_time: f64) {
        self.count += 1;
        let delta = search_time - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (search_time - self.mean);
        self.min = Some(self.min.map_or(search_time, |m| m.min(search_time)));
        self.max = Some(self.max.map_or(search_time, |m| m.max(search_time)));
    }

    /// Adds an outcome; unconverged trials only bump their counter.
    pub fn record(&mut self, outcome: &TrialOutcome) {
        if outcome.is_absorbed() {
            self.push(outcome.search_time);
        } else {
            self.unconverged += 1;
        }
    }

    /// Number of absorbed samples.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Number of trials that hit the step cap.
    #[inline]
    pub fn unconverged(&self) -> u64 {
        self.unconverged
    }

    /// Mean first-passage time.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Unbiased sample variance; needs at least two samples.
    pub fn variance(&self) -> Option<f64> {
        (self.count > 1).then(|| self.m2 / (self.count - 1) as f64)
    }

    /// Standard error of the mean.
    pub fn std_error(&self) -> Option<f64> {
        self.variance()
            .map(|variance| (variance / self.count as f64).sqrt())
    }

    /// Shortest search time seen.
    #[inline]
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    /// Longest search time seen.
    #[inline]
    pub fn max(&self) -> Option<f64> {
        self.max
    }
}

/// Bin spacing of a [`SearchTimeHistogram`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BinScale {
    /// Equal-width bins.
    #[default]
    Linear,
    /// Equal-ratio bins, for heavy-tailed search times.
    Log,
}

impl FromStr for BinScale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(BinScale::Linear),
            "log" => Ok(BinScale::Log),
            _ => Err(ConfigError::invalid("bin_scale", format!("unknown scale '{}'", s))),
        }
    }
}

/// One histogram bin, `[lower, upper)` except the last, which is closed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HistogramBin {
    /// Lower edge.
    pub lower: f64,
    /// Upper edge.
    pub upper: f64,
    /// Samples in the bin.
    pub count: u64,
}

/// Binned distribution of first-passage times over a fixed range.
///
/// Samples below the range or above it are tallied separately and never
/// dropped silently.
///
/// # Examples
///
/// ```rust
/// use search_kernel::sim::{BinScale, SearchTimeHistogram};
///
/// let mut hist = SearchTimeHistogram::new(BinScale::Linear, 0.0, 4.0, 4).unwrap();
/// for t in [0.5, 1.5, 1.7, 4.0, 9.0] {
///     hist.push(t);
/// }
/// assert_eq!(hist.counts(), &[1, 2, 0, 1]);
/// assert_eq!(hist.overflow(), 1);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SearchTimeHistogram {
    scale: BinScale,
    lower: f64,
    upper: f64,
    counts: Vec<u64>,
    underflow: u64,
    overflow: u64,
}

impl SearchTimeHistogram {
    /// Creates an empty histogram of `bins` bins spanning `[lower, upper]`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidParameter`] if `bins == 0`, the range is not
    /// finite and increasing, or a log scale starts at a non-positive time.
    pub fn new(scale: BinScale, lower: f64, upper: f64, bins: usize) -> Result<Self, ConfigError> {
        if bins == 0 {
            return Err(ConfigError::invalid("bins", "must be at least 1"));
        }
        if !(lower.is_finite() && upper.is_finite() && lower < upper) {
            return Err(ConfigError::invalid(
                "histogram_range",
                format!("[{}, {}] must be finite and increasing", lower, upper),
            ));
        }
        if scale == BinScale::Log && lower <= 0.0 {
            return Err(ConfigError::invalid(
                "histogram_range",
                format!("log bins need a positive lower edge, got {}", lower),
            ));
        }
        Ok(Self {
            scale,
            lower,
            upper,
            counts: vec![0; bins],
            underflow: 0,
            overflow: 0,
        })
    }

    /// Builds a histogram spanning the absorbed search times of `outcomes`.
    ///
    /// Returns `Ok(None)` when no trial was absorbed. A batch whose times are
    /// all equal gets a range of `[t, 2t]`.
    pub fn from_outcomes(
        outcomes: &[TrialOutcome],
        scale: BinScale,
        bins: usize,
    ) -> Result<Option<Self>, ConfigError> {
        let stats = SearchTimeStats::from_outcomes(outcomes);
        let (Some(lower), Some(max)) = (stats.min(), stats.max()) else {
            return Ok(None);
        };
        let upper = if max > lower { max } else { 2.0 * lower };

        let mut hist = Self::new(scale, lower, upper, bins)?;
        for outcome in outcomes.iter().filter(|o| o.is_absorbed()) {
            hist.push(outcome.search_time);
        }
        Ok(Some(hist))
    }

    /// Adds one search time.
    pub fn push(&mut self, search_time: f64) {
        if search_time < self.lower {
            self.underflow += 1;
        } else if search_time > self.upper {
            self.overflow += 1;
        } else {
            let bins = self.counts.len();
            let fraction = match self.scale {
                BinScale::Linear => (search_time - self.lower) / (self.upper - self.lower),
                BinScale::Log => (search_time / self.lower).ln() / (self.upper / self.lower).ln(),
            };
            let index = ((fraction * bins as f64) as usize).min(bins - 1);
            self.counts[index] += 1;
        }
    }

    /// Bin spacing.
    #[inline]
    pub fn scale(&self) -> BinScale {
        self.scale
    }

    /// Per-bin counts, lowest bin first.
    #[inline]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Samples below the lower edge.
    #[inline]
    pub fn underflow(&self) -> u64 {
        self.underflow
    }

    /// Samples above the upper edge.
    #[inline]
    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    /// Samples inside the range.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Bin edges, `bins + 1` values from `lower` to `upper`.
    pub fn edges(&self) -> Vec<f64> {
        let bins = self.counts.len();
        (0..=bins)
            .map(|i| {
                if i == bins {
                    return self.upper;
                }
                let fraction = i as f64 / bins as f64;
                match self.scale {
                    BinScale::Linear => self.lower + fraction * (self.upper - self.lower),
                    BinScale::Log => self.lower * (self.upper / self.lower).powf(fraction),
                }
            })
            .collect()
    }

    /// Bins with their edges.
    pub fn bins(&self) -> Vec<HistogramBin> {
        let edges = self.edges();
        self.counts
            .iter()
            .zip(edges.windows(2))
            .map(|(&count, edge)| HistogramBin {
                lower: edge[0],
                upper: edge[1],
                count,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::TrialStatus;
    use approx::assert_relative_eq;

    fn outcome(search_time: f64, status: TrialStatus) -> TrialOutcome {
        TrialOutcome {
            set_index: 0,
            repeat_index: 0,
            seed: 1,
            search_time,
            steps: 1,
            status,
        }
    }

    #[test]
    fn test_empty() {
        let stats = SearchTimeStats::new();
        assert_eq!(stats.count(), 0);
        assert_eq!(stats.mean(), None);
        assert_eq!(stats.variance(), None);
        assert_eq!(stats.std_error(), None);
        assert_eq!(stats.min(), None);
    }

    #[test]
    fn test_moments() {
        let mut stats = SearchTimeStats::new();
        for t in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            stats.push(t);
        }
        assert_eq!(stats.mean(), Some(5.0));
        assert_relative_eq!(stats.variance().unwrap(), 32.0 / 7.0, epsilon = 1e-12);
        assert_relative_eq!(
            stats.std_error().unwrap(),
            (32.0 / 7.0 / 8.0_f64).sqrt(),
            epsilon = 1e-12
        );
        assert_eq!(stats.min(), Some(2.0));
        assert_eq!(stats.max(), Some(9.0));
    }

    #[test]
    fn test_variance_of_long_tightly_spread_times() {
        // sum of squares near 1e18 swamps a spread of 1e-3 in f64
        let mut stats = SearchTimeStats::new();
        for i in 0..1000 {
            stats.push(1e9 + if i % 2 == 0 { 1e-3 } else { -1e-3 });
        }
        let expected = 1e-6 * 1000.0 / 999.0;
        assert_relative_eq!(stats.variance().unwrap(), expected, max_relative = 1e-3);
        assert_relative_eq!(stats.mean().unwrap(), 1e9, max_relative = 1e-15);
    }

    #[test]
    fn test_unconverged_excluded() {
        let outcomes = [
            outcome(1.0, TrialStatus::Absorbed),
            outcome(50.0, TrialStatus::StepLimitReached),
            outcome(3.0, TrialStatus::Absorbed),
        ];
        let stats = SearchTimeStats::from_outcomes(&outcomes);
        assert_eq!(stats.count(), 2);
        assert_eq!(stats.unconverged(), 1);
        assert_eq!(stats.mean(), Some(2.0));
        assert_eq!(stats.max(), Some(3.0));
    }

    #[test]
    fn test_linear_histogram() {
        let mut hist = SearchTimeHistogram::new(BinScale::Linear, 1.0, 3.0, 4).unwrap();
        for t in [0.5, 1.0, 1.4, 1.5, 2.9, 3.0, 3.5] {
            hist.push(t);
        }
        assert_eq!(hist.counts(), &[2, 1, 0, 2]);
        assert_eq!(hist.underflow(), 1);
        assert_eq!(hist.overflow(), 1);
        assert_eq!(hist.total(), 5);
        assert_eq!(hist.edges(), vec![1.0, 1.5, 2.0, 2.5, 3.0]);
    }

    #[test]
    fn test_log_histogram() {
        let mut hist = SearchTimeHistogram::new(BinScale::Log, 1.0, 1000.0, 3).unwrap();
        for t in [1.0, 5.0, 50.0, 500.0, 1000.0] {
            hist.push(t);
        }
        assert_eq!(hist.counts(), &[2, 1, 2]);

        let edges = hist.edges();
        assert_relative_eq!(edges[1], 10.0, epsilon = 1e-12);
        assert_relative_eq!(edges[2], 100.0, epsilon = 1e-9);
        assert_eq!(edges[3], 1000.0);
    }

    #[test]
    fn test_histogram_rejects_bad_ranges() {
        assert!(SearchTimeHistogram::new(BinScale::Linear, 0.0, 1.0, 0).is_err());
        assert!(SearchTimeHistogram::new(BinScale::Linear, 2.0, 1.0, 4).is_err());
        assert!(SearchTimeHistogram::new(BinScale::Linear, 0.0, f64::NAN, 4).is_err());
        assert!(SearchTimeHistogram::new(BinScale::Log, 0.0, 1.0, 4).is_err());
        assert!(SearchTimeHistogram::new(BinScale::Linear, 0.0, 1.0, 4).is_ok());
    }

    #[test]
    fn test_histogram_from_outcomes() {
        let outcomes = [
            outcome(1.0, TrialStatus::Absorbed),
            outcome(2.0, TrialStatus::Absorbed),
            outcome(99.0, TrialStatus::StepLimitReached),
            outcome(3.0, TrialStatus::Absorbed),
        ];
        let hist = SearchTimeHistogram::from_outcomes(&outcomes, BinScale::Linear, 2)
            .unwrap()
            .unwrap();
        assert_eq!(hist.counts(), &[1, 2]);
        assert_eq!(hist.overflow(), 0);

        let bins = hist.bins();
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].lower, 1.0);
        assert_eq!(bins[1].upper, 3.0);
    }

    #[test]
    fn test_histogram_from_degenerate_outcomes() {
        let none = [outcome(5.0, TrialStatus::StepLimitReached)];
        assert!(SearchTimeHistogram::from_outcomes(&none, BinScale::Log, 4)
            .unwrap()
            .is_none());

        let same = [
            outcome(2.0, TrialStatus::Absorbed),
            outcome(2.0, TrialStatus::Absorbed),
        ];
        let hist = SearchTimeHistogram::from_outcomes(&same, BinScale::Log, 4)
            .unwrap()
            .unwrap();
        assert_eq!(hist.edges()[4], 4.0);
        assert_eq!(hist.counts()[0], 2);
    }

    #[test]
    fn test_bin_scale_parsing() {
        assert_eq!(BinScale::from_str("LOG").unwrap(), BinScale::Log);
        assert_eq!(BinScale::from_str("linear").unwrap(), BinScale::Linear);
        assert!(BinScale::from_str("cubic").is_err());
    }
}
