//! Statistics Calculator Module
//! Descriptive statistics for the first selected Y column.

use crate::data::{DataProcessor, ProcessorError};
use polars::prelude::*;
use std::fmt;

/// Message shown instead of statistics for a non-numeric Y column.
pub const NON_NUMERIC_MESSAGE: &str = "Y-axis must be numeric for stats.";

/// Mean, median and sample standard deviation of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
}

impl Default for SummaryStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
        }
    }
}

impl fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mean: {:.2}, Median: {:.2}, Std: {:.2}",
            self.mean, self.median, self.std
        )
    }
}

/// What the stats line reports for a column.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsOutcome {
    Computed(SummaryStats),
    NonNumeric,
}

impl fmt::Display for StatsOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsOutcome::Computed(stats) => stats.fmt(f),
            StatsOutcome::NonNumeric => f.write_str(NON_NUMERIC_MESSAGE),
        }
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    ///
    /// The standard deviation uses n - 1 degrees of freedom, so a single value
    /// yields NaN.
    pub fn compute_descriptive_stats(values: &[f64]) -> SummaryStats {
        let n = values.len();
        if n == 0 {
            return SummaryStats::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / n as f64;
        let median = Self::percentile(&sorted, 50.0);

        let std = if n > 1 {
            let variance =
                values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            variance.sqrt()
        } else {
            f64::NAN
        };

        SummaryStats {
            count: n,
            mean,
            median,
            std,
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Statistics for column `y`, or [`StatsOutcome::NonNumeric`] when it is not
    /// a numeric column. Missing values are ignored.
    pub fn summarize(df: &DataFrame, y: &str) -> Result<StatsOutcome, ProcessorError> {
        if !DataProcessor::is_numeric(df, y)? {
            return Ok(StatsOutcome::NonNumeric);
        }
        let values = DataProcessor::finite_values(df, y)?;
        Ok(StatsOutcome::Computed(Self::compute_descriptive_stats(
            &values,
        )))
    }
}
