//! Series Planning Module
//! Pairs each selected Y column with an X column and a color, cyclically.

use crate::charts::config::{PlotConfig, PlotKind, SeriesColor, SeriesColorMap};
use polars::prelude::DataFrame;

/// Everything a render or export reads.
#[derive(Clone, Copy)]
pub struct PlotRequest<'a> {
    pub df: &'a DataFrame,
    pub x: &'a [String],
    pub y: &'a [String],
    pub colors: &'a SeriesColorMap,
    pub config: &'a PlotConfig,
}

/// One series: Y column `index` with its paired X column and color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSpec {
    pub index: usize,
    pub y: String,
    pub x: Option<String>,
    pub color: SeriesColor,
}

/// What gets drawn for one series. Each kind carries only the columns it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesPlot<'a> {
    Boxplot { x: Option<&'a str>, y: &'a str },
    Violin { x: Option<&'a str>, y: &'a str },
    Scatter { x: &'a str, y: &'a str },
    Line { x: &'a str, y: &'a str },
    Histogram { y: &'a str },
    Bar { x: &'a str, y: &'a str },
}

impl SeriesSpec {
    /// Plot for this series, or `None` when the kind needs an X column and
    /// none is paired.
    pub fn plot(&self, kind: PlotKind) -> Option<SeriesPlot<'_>> {
        let y = self.y.as_str();
        let x = self.x.as_deref();
        Some(match kind {
            PlotKind::Boxplot => SeriesPlot::Boxplot { x, y },
            PlotKind::Violin => SeriesPlot::Violin { x, y },
            PlotKind::Histogram => SeriesPlot::Histogram { y },
            PlotKind::Scatter => SeriesPlot::Scatter { x: x?, y },
            PlotKind::Line => SeriesPlot::Line { x: x?, y },
            PlotKind::Bar => SeriesPlot::Bar { x: x?, y },
        })
    }
}

/// Series `i` uses `y[i]`, `x[i % len(x)]` and color slot `i % len(colors)`.
pub fn plan_series(x: &[String], y: &[String], colors: &SeriesColorMap) -> Vec<SeriesSpec> {
    y.iter()
        .enumerate()
        .map(|(i, y_col)| SeriesSpec {
            index: i,
            y: y_col.clone(),
            x: (!x.is_empty()).then(|| x[i % x.len()].clone()),
            color: colors.color_for(i),
        })
        .collect()
}
