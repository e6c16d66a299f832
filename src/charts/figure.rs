//! Drawing Surface Module
//! A backend-neutral chart: traces overlaid on one set of axes plus decorations.
//! The egui viewer and the PNG renderer both paint from this.

use crate::charts::config::{PlotConfig, SeriesColor};
use crate::data::Axis;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot mix numeric and categorical {} values on one plot", .0.label())]
pub struct AxisConflict(pub Axis);

/// A filled rectangle in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub center: f64,
    pub width: f64,
    pub bottom: f64,
    pub height: f64,
}

impl BarRect {
    pub fn left(&self) -> f64 {
        self.center - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.center + self.width / 2.0
    }

    pub fn top(&self) -> f64 {
        self.bottom + self.height
    }
}

/// Five-number summary of one group, drawn at `position`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub position: f64,
    pub width: f64,
    pub whisker_low: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// Mirrored density outline of one group.
#[derive(Debug, Clone, PartialEq)]
pub struct ViolinShape {
    pub position: f64,
    /// `[value, half_width]` pairs in ascending value order.
    pub outline: Vec<[f64; 2]>,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

impl ViolinShape {
    /// Closed outline as `[x, y]` points: right side upwards, left side downwards.
    pub fn polygon(&self) -> Vec<[f64; 2]> {
        let right = self
            .outline
            .iter()
            .map(|[v, hw]| [self.position + hw, *v]);
        let left = self
            .outline
            .iter()
            .rev()
            .map(|[v, hw]| [self.position - hw, *v]);
        right.chain(left).collect()
    }

    pub fn max_half_width(&self) -> f64 {
        self.outline.iter().map(|p| p[1]).fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraceShape {
    Points(Vec<[f64; 2]>),
    Line(Vec<[f64; 2]>),
    Bars(Vec<BarRect>),
    Boxes(Vec<BoxStats>),
    Violins(Vec<ViolinShape>),
}

/// One drawn series.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub name: String,
    pub color: SeriesColor,
    pub alpha: f64,
    pub in_legend: bool,
    pub shape: TraceShape,
}

impl Trace {
    pub fn new(name: impl Into<String>, color: SeriesColor, shape: TraceShape) -> Self {
        Self {
            name: name.into(),
            color,
            alpha: 1.0,
            in_legend: false,
            shape,
        }
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn in_legend(mut self, in_legend: bool) -> Self {
        self.in_legend = in_legend;
        self
    }

    /// `(x_min, x_max, y_min, y_max)` covered by this trace.
    fn extent(&self) -> Option<(f64, f64, f64, f64)> {
        let mut ext = Extent::default();
        match &self.shape {
            TraceShape::Points(pts) | TraceShape::Line(pts) => {
                for p in pts {
                    ext.add(p[0], p[1]);
                }
            }
            TraceShape::Bars(bars) => {
                for b in bars {
                    ext.add(b.left(), b.bottom);
                    ext.add(b.right(), b.top());
                }
            }
            TraceShape::Boxes(boxes) => {
                for b in boxes {
                    let half = b.width / 2.0;
                    ext.add(b.position - half, b.whisker_low);
                    ext.add(b.position + half, b.whisker_high);
                    for &o in &b.outliers {
                        ext.add(b.position, o);
                    }
                }
            }
            TraceShape::Violins(violins) => {
                for v in violins {
                    let half = v.max_half_width().max(0.4);
                    for [value, _] in &v.outline {
                        ext.add(v.position, *value);
                    }
                    ext.add(v.position - half, v.median);
                    ext.add(v.position + half, v.median);
                }
            }
        }
        ext.finish()
    }
}

#[derive(Debug, Default)]
struct Extent(Option<(f64, f64, f64, f64)>);

impl Extent {
    fn add(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.0 = Some(match self.0 {
            None => (x, x, y, y),
            Some((x0, x1, y0, y1)) => (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
        });
    }

    fn finish(self) -> Option<(f64, f64, f64, f64)> {
        self.0
    }
}

/// Data-space rectangle to show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisKind {
    #[default]
    Unset,
    Numeric,
    Categorical,
}

/// How one axis maps values: numeric as-is, or text labels onto 0, 1, 2, ...
#[derive(Debug, Clone, Default)]
struct AxisScale {
    kind: AxisKind,
    labels: Vec<String>,
    positions: HashMap<String, usize>,
}

impl AxisScale {
    fn claim_numeric(&mut self, axis: Axis) -> Result<(), AxisConflict> {
        match self.kind {
            AxisKind::Categorical => Err(AxisConflict(axis)),
            _ => {
                self.kind = AxisKind::Numeric;
                Ok(())
            }
        }
    }

    fn position(&mut self, axis: Axis, label: &str) -> Result<f64, AxisConflict> {
        if self.kind == AxisKind::Numeric {
            return Err(AxisConflict(axis));
        }
        self.kind = AxisKind::Categorical;
        if let Some(&idx) = self.positions.get(label) {
            return Ok(idx as f64);
        }
        let idx = self.labels.len();
        self.labels.push(label.to_string());
        self.positions.insert(label.to_string(), idx);
        Ok(idx as f64)
    }

    fn label(&self, value: f64) -> Option<&str> {
        let rounded = value.round();
        if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return None;
        }
        self.labels.get(rounded as usize).map(|s| s.as_str())
    }

    /// `-0.5 ..= n - 0.5` for a categorical axis with labels.
    fn span(&self) -> Option<(f64, f64)> {
        (self.kind == AxisKind::Categorical && !self.labels.is_empty())
            .then(|| (-0.5, self.labels.len() as f64 - 0.5))
    }
}

/// The shared drawing surface every series of a render lands on.
#[derive(Debug, Clone, Default)]
pub struct Figure {
    pub traces: Vec<Trace>,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub show_grid: bool,
    pub show_legend: bool,
    x_scale: AxisScale,
    y_scale: AxisScale,
    revision: u64,
}

impl Figure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all traces and decorations.
    pub fn clear(&mut self) {
        let revision = self.revision.wrapping_add(1);
        *self = Self {
            revision,
            ..Self::default()
        };
    }

    /// Bumped on every clear, so views can reset zoom state.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn push(&mut self, trace: Trace) {
        self.traces.push(trace);
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Apply title, axis labels, grid and legend from the configuration.
    pub fn decorate(&mut self, config: &PlotConfig) {
        self.title = config.title.clone();
        self.x_label = config.x_label.clone();
        self.y_label = config.y_label.clone();
        self.show_grid = config.show_grid;
        self.show_legend = config.kind.has_legend();
    }

    fn scale(&self, axis: Axis) -> &AxisScale {
        match axis {
            Axis::X => &self.x_scale,
            Axis::Y => &self.y_scale,
        }
    }

    fn scale_mut(&mut self, axis: Axis) -> &mut AxisScale {
        match axis {
            Axis::X => &mut self.x_scale,
            Axis::Y => &mut self.y_scale,
        }
    }

    pub fn axis_kind(&self, axis: Axis) -> AxisKind {
        self.scale(axis).kind
    }

    /// Category labels of an axis, indexed by their position.
    pub fn categories(&self, axis: Axis) -> &[String] {
        &self.scale(axis).labels
    }

    /// Mark an axis numeric.
    pub fn claim_numeric(&mut self, axis: Axis) -> Result<(), AxisConflict> {
        self.scale_mut(axis).claim_numeric(axis)
    }

    /// Position of a category label on an axis, registering it on first use.
    pub fn category_position(&mut self, axis: Axis, label: &str) -> Result<f64, AxisConflict> {
        self.scale_mut(axis).position(axis, label)
    }

    /// Label for a tick value on a categorical axis.
    pub fn category_label(&self, axis: Axis, value: f64) -> Option<&str> {
        self.scale(axis).label(value)
    }

    /// Padded bounds over every trace, or `None` for an empty surface.
    pub fn bounds(&self) -> Option<PlotBounds> {
        let mut ext = Extent::default();
        for (x0, x1, y0, y1) in self.traces.iter().filter_map(|t| t.extent()) {
            ext.add(x0, y0);
            ext.add(x1, y1);
        }
        if let Some((_, _, y0, _)) = ext.0 {
            if let Some((lo, hi)) = self.x_scale.span() {
                ext.add(lo, y0);
                ext.add(hi, y0);
            }
        }
        if let Some((x0, _, _, _)) = ext.0 {
            if let Some((lo, hi)) = self.y_scale.span() {
                ext.add(x0, lo);
                ext.add(x0, hi);
            }
        }
        let (x_min, x_max, y_min, y_max) = ext.finish()?;
        let (x_min, x_max) = pad(x_min, x_max);
        let (y_min, y_max) = pad(y_min, y_max);
        Some(PlotBounds {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }
}

fn pad(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    if span <= 0.0 {
        (min - 0.5, max + 0.5)
    } else {
        (min - span * 0.05, max + span * 0.05)
    }
}
