//! Statistics module - summary statistics for the stats line

mod calculator;

pub use calculator::{StatsCalculator, StatsOutcome, SummaryStats, NON_NUMERIC_MESSAGE};
