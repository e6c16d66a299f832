//! Chart Geometry Module
//! Box statistics, histogram bins and violin kernel densities.

use crate::charts::figure::{BarRect, BoxStats, ViolinShape};
use crate::stats::StatsCalculator;
use statrs::distribution::{Continuous, Normal};

/// Default width of a box, violin or bar slot on a categorical axis.
pub const SLOT_WIDTH: f64 = 0.8;
/// Number of histogram bins.
pub const HISTOGRAM_BINS: usize = 10;
/// Evaluation points along a violin outline.
const VIOLIN_GRID: usize = 100;
/// Violin outline extends this many bandwidths past the data.
const VIOLIN_CUT: f64 = 2.0;

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Quartiles with 1.5 IQR whiskers. `None` for an empty group.
pub fn box_stats(values: &[f64], position: f64) -> Option<BoxStats> {
    let sorted = sorted(values);
    if sorted.is_empty() {
        return None;
    }

    let q1 = StatsCalculator::percentile(&sorted, 25.0);
    let median = StatsCalculator::percentile(&sorted, 50.0);
    let q3 = StatsCalculator::percentile(&sorted, 75.0);
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let whisker_low = sorted
        .iter()
        .copied()
        .find(|&v| v >= low_fence)
        .unwrap_or(q1);
    let whisker_high = sorted
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= high_fence)
        .unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|&v| v < low_fence || v > high_fence)
        .collect();

    Some(BoxStats {
        position,
        width: SLOT_WIDTH,
        whisker_low,
        q1,
        median,
        q3,
        whisker_high,
        outliers,
    })
}

/// Equal-width frequency bins over `[min, max]`; the last bin is closed.
pub fn histogram(values: &[f64], bins: usize) -> Vec<BarRect> {
    let sorted = sorted(values);
    let (Some(&first), Some(&last)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };
    let bins = bins.max(1);
    let (lo, hi) = if first == last {
        (first - 0.5, last + 0.5)
    } else {
        (first, last)
    };
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in sorted {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| BarRect {
            center: lo + width * (i as f64 + 0.5),
            width,
            bottom: 0.0,
            height: count as f64,
        })
        .collect()
}

/// Scott's rule: `n^(-1/5)` times the sample standard deviation.
pub fn scott_bandwidth(values: &[f64]) -> f64 {
    let stats = StatsCalculator::compute_descriptive_stats(values);
    stats.std * (values.len() as f64).powf(-0.2)
}

/// Gaussian kernel density outline scaled to half a slot. `None` for an empty group.
///
/// Groups without spread get a flat outline at their single value.
pub fn violin(values: &[f64], position: f64) -> Option<ViolinShape> {
    let sorted = sorted(values);
    let (&first, &last) = (sorted.first()?, sorted.last()?);

    let q1 = StatsCalculator::percentile(&sorted, 25.0);
    let median = StatsCalculator::percentile(&sorted, 50.0);
    let q3 = StatsCalculator::percentile(&sorted, 75.0);
    let max_half = SLOT_WIDTH / 2.0;

    let bandwidth = scott_bandwidth(&sorted);
    let kernel = Normal::new(0.0, 1.0).ok();
    let (Some(kernel), true) = (kernel, bandwidth.is_finite() && bandwidth > 0.0) else {
        return Some(ViolinShape {
            position,
            outline: vec![[first, max_half], [last, max_half]],
            q1,
            median,
            q3,
        });
    };

    let lo = first - VIOLIN_CUT * bandwidth;
    let hi = last + VIOLIN_CUT * bandwidth;
    let step = (hi - lo) / (VIOLIN_GRID - 1) as f64;
    let n = sorted.len() as f64;

    let density: Vec<[f64; 2]> = (0..VIOLIN_GRID)
        .map(|i| {
            let at = lo + step * i as f64;
            let d = sorted
                .iter()
                .map(|&v| kernel.pdf((at - v) / bandwidth))
                .sum::<f64>()
                / (n * bandwidth);
            [at, d]
        })
        .collect();

    let peak = density.iter().map(|p| p[1]).fold(0.0, f64::max);
    let outline = density
        .into_iter()
        .map(|[at, d]| [at, if peak > 0.0 { d / peak * max_half } else { 0.0 }])
        .collect();

    Some(ViolinShape {
        position,
        outline,
        q1,
        median,
        q3,
    })
}
