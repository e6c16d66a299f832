//! Charts module - Shared drawing surface, static rendering and interactive export

mod config;
mod figure;
mod geometry;
mod interactive;
mod plotter;
mod renderer;
mod series;

pub use config::{PlotConfig, PlotKind, SeriesColor, SeriesColorMap, COLOR_SLOTS, PALETTE};
pub use figure::{
    AxisConflict, AxisKind, BarRect, BoxStats, Figure, PlotBounds, Trace, TraceShape,
    ViolinShape,
};
pub use geometry::{box_stats, histogram, violin, HISTOGRAM_BINS, SLOT_WIDTH};
pub use interactive::{ExportError, InteractiveChart, PLOTLY_CDN};
pub use plotter::ChartPlotter;
pub use renderer::{RenderError, RenderReport, StaticChartRenderer, IMAGE_SIZE};
pub use series::{plan_series, PlotRequest, SeriesPlot, SeriesSpec};
