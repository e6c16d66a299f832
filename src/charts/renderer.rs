//! Static Chart Renderer
//! Draws every selected series onto one shared surface and optionally saves it as PNG.
//!
//! Pipeline:
//! 1. Reject selections larger than the cap without touching the surface
//! 2. Clear the surface
//! 3. Draw series `i` from Y column `i`, its cyclic X partner and color slot
//! 4. Apply title, axis labels, grid and legend
//! 5. Save `<save_name>.png` when a save name is set
//! 6. Compute summary statistics for the first Y column

use crate::charts::config::{PlotKind, SeriesColor};
use crate::charts::figure::{AxisConflict, AxisKind, BarRect, Figure, Trace, TraceShape};
use crate::charts::geometry::{self, HISTOGRAM_BINS, SLOT_WIDTH};
use crate::charts::series::{plan_series, PlotRequest, SeriesPlot};
use crate::data::{Axis, AxisValues, DataProcessor, ProcessorError, ValueGroup, MAX_SELECTION};
use crate::stats::{StatsCalculator, StatsOutcome};
use plotters::coord::Shift;
use plotters::prelude::*;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// PNG output size in pixels.
pub const IMAGE_SIZE: (u32, u32) = (1000, 700);
/// Fill opacity for histogram bars.
const HISTOGRAM_ALPHA: f64 = 0.5;
const VIOLIN_ALPHA: f64 = 0.7;
const BOX_ALPHA: f64 = 0.8;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Select up to {max} columns for both X and Y.", max = MAX_SELECTION)]
    SelectionTooLarge { axis: Axis, count: usize },
    #[error("No data loaded")]
    NoData,
    #[error("{0} plot requires an X-axis column")]
    MissingX(PlotKind),
    #[error(transparent)]
    Data(#[from] ProcessorError),
    #[error(transparent)]
    Axis(#[from] AxisConflict),
    #[error("Failed to save image: {0}")]
    Image(String),
}

/// What a successful render produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub series_drawn: usize,
    pub saved_to: Option<PathBuf>,
    /// `None` when no Y column was selected.
    pub stats: Option<StatsOutcome>,
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the request onto `figure`, saving PNG output under `output_dir`.
    ///
    /// On error the surface keeps whatever was drawn before the failure.
    pub fn render(
        request: &PlotRequest<'_>,
        figure: &mut Figure,
        output_dir: &Path,
    ) -> Result<RenderReport, RenderError> {
        for (axis, selected) in [(Axis::X, request.x), (Axis::Y, request.y)] {
            if selected.len() > MAX_SELECTION {
                return Err(RenderError::SelectionTooLarge {
                    axis,
                    count: selected.len(),
                });
            }
        }

        figure.clear();

        let kind = request.config.kind;
        let plan = plan_series(request.x, request.y, request.colors);
        for spec in &plan {
            let plot = spec.plot(kind).ok_or(RenderError::MissingX(kind))?;
            tracing::debug!(series = spec.index, ?plot, color = %spec.color, "drawing series");
            Self::draw_series(request.df, plot, spec.color, figure)?;
        }

        figure.decorate(request.config);

        let saved_to = match request.config.save_path(output_dir) {
            Some(path) => {
                Self::save_png(figure, &path)?;
                tracing::info!(path = %path.display(), "saved chart image");
                Some(path)
            }
            None => None,
        };

        let stats = request
            .y
            .first()
            .map(|y| StatsCalculator::summarize(request.df, y))
            .transpose()?;

        Ok(RenderReport {
            series_drawn: plan.len(),
            saved_to,
            stats,
        })
    }

    fn draw_series(
        df: &DataFrame,
        plot: SeriesPlot<'_>,
        color: SeriesColor,
        figure: &mut Figure,
    ) -> Result<(), RenderError> {
        let trace = match plot {
            SeriesPlot::Boxplot { x, y } => {
                let mut boxes = Vec::new();
                for (index, group) in Self::groups(df, x, y)? {
                    let position = Self::slot(figure, x, &group, index)?;
                    boxes.extend(geometry::box_stats(&group.values, position));
                }
                Trace::new(y, color, TraceShape::Boxes(boxes)).alpha(BOX_ALPHA)
            }
            SeriesPlot::Violin { x, y } => {
                let mut violins = Vec::new();
                for (index, group) in Self::groups(df, x, y)? {
                    let position = Self::slot(figure, x, &group, index)?;
                    violins.extend(geometry::violin(&group.values, position));
                }
                Trace::new(y, color, TraceShape::Violins(violins)).alpha(VIOLIN_ALPHA)
            }
            SeriesPlot::Scatter { x, y } => {
                let points = Self::xy_points(df, x, y, figure)?;
                Trace::new(y, color, TraceShape::Points(points))
            }
            SeriesPlot::Line { x, y } => {
                let points = Self::xy_points(df, x, y, figure)?;
                Trace::new(y, color, TraceShape::Line(points)).in_legend(true)
            }
            SeriesPlot::Histogram { y } => {
                let bars = match DataProcessor::axis_values(df, y)? {
                    AxisValues::Numeric(values) => {
                        figure.claim_numeric(Axis::X)?;
                        let values: Vec<f64> = values.into_iter().flatten().collect();
                        geometry::histogram(&values, HISTOGRAM_BINS)
                    }
                    AxisValues::Categorical(labels) => Self::category_counts(&labels, figure)?,
                };
                Trace::new(y, color, TraceShape::Bars(bars)).alpha(HISTOGRAM_ALPHA)
            }
            SeriesPlot::Bar { x, y } => {
                let heights = DataProcessor::numeric_values(df, y)?;
                let bars = Self::positions(df, x, Axis::X, figure)?
                    .into_iter()
                    .zip(heights)
                    .filter_map(|(center, height)| {
                        Some(BarRect {
                            center: center?,
                            width: SLOT_WIDTH,
                            bottom: 0.0,
                            height: height?,
                        })
                    })
                    .collect();
                Trace::new(y, color, TraceShape::Bars(bars))
            }
        };
        figure.push(trace);
        Ok(())
    }

    /// Y values grouped by X, or one group at position 0 without an X column.
    fn groups(
        df: &DataFrame,
        x: Option<&str>,
        y: &str,
    ) -> Result<Vec<(usize, ValueGroup)>, ProcessorError> {
        let groups = match x {
            Some(x) => DataProcessor::group_by_category(df, x, y)?,
            None => vec![ValueGroup {
                label: String::new(),
                values: DataProcessor::finite_values(df, y)?,
            }],
        };
        Ok(groups.into_iter().enumerate().collect())
    }

    fn slot(
        figure: &mut Figure,
        x: Option<&str>,
        group: &ValueGroup,
        index: usize,
    ) -> Result<f64, AxisConflict> {
        match x {
            Some(_) => figure.category_position(Axis::X, &group.label),
            None => Ok(index as f64),
        }
    }

    /// `[x, y]` pairs for rows where both values are present.
    fn xy_points(
        df: &DataFrame,
        x: &str,
        y: &str,
        figure: &mut Figure,
    ) -> Result<Vec<[f64; 2]>, RenderError> {
        let xs = Self::positions(df, x, Axis::X, figure)?;
        let ys = Self::positions(df, y, Axis::Y, figure)?;
        Ok(xs
            .into_iter()
            .zip(ys)
            .filter_map(|(x, y)| Some([x?, y?]))
            .collect())
    }

    /// Column values as positions on `axis`. Text columns are mapped onto the
    /// figure's categorical scale for that axis.
    fn positions(
        df: &DataFrame,
        column: &str,
        axis: Axis,
        figure: &mut Figure,
    ) -> Result<Vec<Option<f64>>, RenderError> {
        Ok(match DataProcessor::axis_values(df, column)? {
            AxisValues::Numeric(values) => {
                figure.claim_numeric(axis)?;
                values
            }
            AxisValues::Categorical(labels) => labels
                .iter()
                .map(|label| {
                    label
                        .as_deref()
                        .map(|l| figure.category_position(axis, l))
                        .transpose()
                })
                .collect::<Result<Vec<_>, AxisConflict>>()?,
        })
    }

    /// One bar per category on the X axis, counting its occurrences.
    fn category_counts(
        labels: &[Option<String>],
        figure: &mut Figure,
    ) -> Result<Vec<BarRect>, AxisConflict> {
        let mut counts: Vec<f64> = Vec::new();
        for label in labels.iter().flatten() {
            let slot = figure.category_position(Axis::X, label)? as usize;
            if counts.len() <= slot {
                counts.resize(slot + 1, 0.0);
            }
            counts[slot] += 1.0;
        }
        Ok(counts
            .into_iter()
            .enumerate()
            .filter(|(_, count)| *count > 0.0)
            .map(|(slot, count)| BarRect {
                center: slot as f64,
                width: SLOT_WIDTH,
                bottom: 0.0,
                height: count,
            })
            .collect())
    }

    /// Paint the figure into an in-memory bitmap and write it as PNG.
    /// The file is only created once drawing has succeeded.
    pub fn save_png(figure: &Figure, path: &Path) -> Result<(), RenderError> {
        let (width, height) = IMAGE_SIZE;
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, IMAGE_SIZE).into_drawing_area();
            Self::paint(figure, &root)
                .and_then(|_| root.present().map_err(anyhow::Error::from))
                .map_err(|e| RenderError::Image(e.to_string()))?;
        }

        let image = image::RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| RenderError::Image("bitmap size mismatch".to_string()))?;
        image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| RenderError::Image(e.to_string()))
    }

    fn paint(figure: &Figure, root: &DrawingArea<BitMapBackend<'_>, Shift>) -> anyhow::Result<()> {
        root.fill(&WHITE)?;

        let bounds = figure.bounds();
        let (x_range, y_range) = match bounds {
            Some(b) => (b.x_min..b.x_max, b.y_min..b.y_max),
            None => (0.0..1.0, 0.0..1.0),
        };

        let mut builder = ChartBuilder::on(root);
        builder
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60);
        if !figure.title.is_empty() {
            builder.caption(&figure.title, ("sans-serif", 24));
        }
        let mut chart = builder.build_cartesian_2d(x_range, y_range)?;

        let x_categories =
            |v: &f64| figure.category_label(Axis::X, *v).unwrap_or_default().to_string();
        let y_categories =
            |v: &f64| figure.category_label(Axis::Y, *v).unwrap_or_default().to_string();
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(figure.x_label.as_str())
            .y_desc(figure.y_label.as_str());
        if !figure.show_grid {
            mesh.disable_mesh();
        }
        if figure.axis_kind(Axis::X) == AxisKind::Categorical {
            mesh.x_labels(figure.categories(Axis::X).len() * 2 + 1)
                .x_label_formatter(&x_categories);
        }
        if figure.axis_kind(Axis::Y) == AxisKind::Categorical {
            mesh.y_labels(figure.categories(Axis::Y).len() * 2 + 1)
                .y_label_formatter(&y_categories);
        }
        mesh.draw()?;

        for trace in &figure.traces {
            let color: RGBColor = trace.color.into();
            let fill = color.mix(trace.alpha).filled();
            match &trace.shape {
                TraceShape::Points(points) => {
                    chart.draw_series(
                        points
                            .iter()
                            .map(|p| Circle::new((p[0], p[1]), 3, fill)),
                    )?;
                }
                TraceShape::Line(points) => {
                    let series = chart.draw_series(LineSeries::new(
                        points.iter().map(|p| (p[0], p[1])),
                        color.stroke_width(2),
                    ))?;
                    if trace.in_legend {
                        series.label(trace.name.as_str()).legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                        });
                    }
                }
                TraceShape::Bars(bars) => {
                    chart.draw_series(bars.iter().map(|b| {
                        Rectangle::new([(b.left(), b.bottom), (b.right(), b.top())], fill)
                    }))?;
                }
                TraceShape::Boxes(boxes) => {
                    for b in boxes {
                        let (l, r) = (b.position - b.width / 2.0, b.position + b.width / 2.0);
                        let (cl, cr) = (b.position - b.width / 4.0, b.position + b.width / 4.0);
                        chart.draw_series(std::iter::once(Rectangle::new(
                            [(l, b.q1), (r, b.q3)],
                            fill,
                        )))?;
                        chart.draw_series(
                            [
                                vec![(l, b.q1), (r, b.q1), (r, b.q3), (l, b.q3), (l, b.q1)],
                                vec![(l, b.median), (r, b.median)],
                                vec![(b.position, b.whisker_low), (b.position, b.q1)],
                                vec![(b.position, b.q3), (b.position, b.whisker_high)],
                                vec![(cl, b.whisker_low), (cr, b.whisker_low)],
                                vec![(cl, b.whisker_high), (cr, b.whisker_high)],
                            ]
                            .into_iter()
                            .map(|path| PathElement::new(path, BLACK.stroke_width(1))),
                        )?;
                        chart.draw_series(
                            b.outliers
                                .iter()
                                .map(|&o| Circle::new((b.position, o), 3, BLACK.stroke_width(1))),
                        )?;
                    }
                }
                TraceShape::Violins(violins) => {
                    for v in violins {
                        let outline: Vec<(f64, f64)> =
                            v.polygon().into_iter().map(|p| (p[0], p[1])).collect();
                        chart.draw_series(std::iter::once(Polygon::new(outline, fill)))?;
                        chart.draw_series(std::iter::once(PathElement::new(
                            vec![(v.position, v.q1), (v.position, v.q3)],
                            BLACK.stroke_width(4),
                        )))?;
                        chart.draw_series(std::iter::once(Circle::new(
                            (v.position, v.median),
                            3,
                            WHITE.filled(),
                        )))?;
                    }
                }
            }
        }

        if figure.show_legend {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::config::{PlotConfig, SeriesColorMap, PALETTE};
    use polars::prelude::*;

    fn table() -> DataFrame {
        DataFrame::new(vec![
            Column::new("t".into(), vec![1.0, 2.0, 3.0, 4.0]),
            Column::new("a".into(), vec![1.0, 2.0, 3.0, 4.0]),
            Column::new("b".into(), vec![Some(4.0), None, Some(2.0), Some(1.0)]),
            Column::new("site".into(), vec!["n", "s", "n", "s"]),
            Column::new("label".into(), vec!["w", "x", "y", "z"]),
        ])
        .unwrap()
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn render(
        df: &DataFrame,
        x: &[&str],
        y: &[&str],
        config: &PlotConfig,
        figure: &mut Figure,
    ) -> Result<RenderReport, RenderError> {
        let (x, y) = (cols(x), cols(y));
        let colors = SeriesColorMap::default();
        let dir = tempfile::tempdir().unwrap();
        StaticChartRenderer::render(
            &PlotRequest {
                df,
                x: &x,
                y: &y,
                colors: &colors,
                config,
            },
            figure,
            dir.path(),
        )
    }

    fn config(kind: PlotKind) -> PlotConfig {
        PlotConfig {
            kind,
            ..Default::default()
        }
    }

    #[test]
    fn oversized_selection_leaves_surface_untouched() {
        let df = table();
        let mut figure = Figure::new();
        figure.push(Trace::new("old", PALETTE[0], TraceShape::Points(vec![[0.0, 0.0]])));
        let revision = figure.revision();

        let many: Vec<String> = (0..11).map(|i| format!("c{}", i)).collect();
        let refs: Vec<&str> = many.iter().map(|s| s.as_str()).collect();
        let err = render(&df, &refs, &["a"], &config(PlotKind::Line), &mut figure).unwrap_err();

        assert!(matches!(
            err,
            RenderError::SelectionTooLarge {
                axis: Axis::X,
                count: 11
            }
        ));
        assert_eq!(err.to_string(), "Select up to 10 columns for both X and Y.");
        assert_eq!(figure.traces.len(), 1);
        assert_eq!(figure.revision(), revision);
    }

    #[test]
    fn empty_y_selection_only_decorates() {
        let df = table();
        let mut figure = Figure::new();
        figure.push(Trace::new("old", PALETTE[0], TraceShape::Points(vec![[0.0, 0.0]])));
        let cfg = PlotConfig {
            title: "Empty".to_string(),
            x_label: "X".to_string(),
            show_grid: true,
            ..config(PlotKind::Scatter)
        };

        let report = render(&df, &["t"], &[], &cfg, &mut figure).unwrap();
        assert_eq!(report.series_drawn, 0);
        assert_eq!(report.stats, None);
        assert!(figure.is_empty());
        assert_eq!(figure.title, "Empty");
        assert_eq!(figure.x_label, "X");
        assert!(figure.show_grid);
    }

    #[test]
    fn line_series_overlay_with_legend_and_stats() {
        let df = table();
        let mut figure = Figure::new();
        let report = render(&df, &["t"], &["a", "b"], &config(PlotKind::Line), &mut figure).unwrap();

        assert_eq!(report.series_drawn, 2);
        assert_eq!(figure.traces.len(), 2);
        assert!(figure.show_legend);
        assert!(figure.traces.iter().all(|t| t.in_legend));
        assert_eq!(figure.traces[1].name, "b");
        assert_eq!(figure.traces[1].color, PALETTE[1]);
        // the null row in `b` is skipped
        assert_eq!(
            figure.traces[1].shape,
            TraceShape::Line(vec![[1.0, 4.0], [3.0, 2.0], [4.0, 1.0]])
        );
        assert_eq!(
            report.stats.unwrap().to_string(),
            "Mean: 2.50, Median: 2.50, Std: 1.29"
        );
    }

    #[test]
    fn scatter_without_x_is_an_error() {
        let df = table();
        let mut figure = Figure::new();
        let err = render(&df, &[], &["a"], &config(PlotKind::Scatter), &mut figure).unwrap_err();
        assert!(matches!(err, RenderError::MissingX(PlotKind::Scatter)));
        assert!(figure.is_empty());
    }

    #[test]
    fn histogram_is_translucent_and_ignores_x() {
        let df = table();
        let mut figure = Figure::new();
        render(&df, &["site"], &["a"], &config(PlotKind::Histogram), &mut figure).unwrap();

        let trace = &figure.traces[0];
        assert_eq!(trace.alpha, HISTOGRAM_ALPHA);
        assert!(matches!(trace.shape, TraceShape::Bars(ref bars) if bars.len() == HISTOGRAM_BINS));
        assert_eq!(figure.axis_kind(Axis::X), AxisKind::Numeric);
    }

    #[test]
    fn boxplot_groups_by_text_column() {
        let df = table();
        let mut figure = Figure::new();
        render(&df, &["site"], &["a"], &config(PlotKind::Boxplot), &mut figure).unwrap();

        assert_eq!(figure.categories(Axis::X), ["n".to_string(), "s".to_string()]);
        let TraceShape::Boxes(boxes) = &figure.traces[0].shape else {
            panic!("expected boxes");
        };
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].median, 2.0);
        assert_eq!(boxes[1].position, 1.0);
    }

    #[test]
    fn violin_without_x_is_single_distribution() {
        let df = table();
        let mut figure = Figure::new();
        render(&df, &[], &["a"], &config(PlotKind::Violin), &mut figure).unwrap();
        let TraceShape::Violins(violins) = &figure.traces[0].shape else {
            panic!("expected violins");
        };
        assert_eq!(violins.len(), 1);
        assert_eq!(violins[0].position, 0.0);
    }

    #[test]
    fn bar_over_text_column_uses_categories() {
        let df = table();
        let mut figure = Figure::new();
        render(&df, &["label"], &["a"], &config(PlotKind::Bar), &mut figure).unwrap();
        assert_eq!(figure.categories(Axis::X).len(), 4);
        let TraceShape::Bars(bars) = &figure.traces[0].shape else {
            panic!("expected bars");
        };
        assert_eq!(bars[2].center, 2.0);
        assert_eq!(bars[2].height, 3.0);
    }

    #[test]
    fn mixed_axis_keeps_partial_render() {
        let df = table();
        let mut figure = Figure::new();
        let err = render(&df, &["t", "site"], &["a", "b"], &config(PlotKind::Scatter), &mut figure)
            .unwrap_err();
        assert!(matches!(err, RenderError::Axis(_)));
        assert_eq!(figure.traces.len(), 1);
    }

    #[test]
    fn text_y_scatter_uses_categorical_y_axis() {
        let df = table();
        let mut figure = Figure::new();
        let report =
            render(&df, &["t"], &["site"], &config(PlotKind::Scatter), &mut figure).unwrap();

        assert_eq!(figure.axis_kind(Axis::Y), AxisKind::Categorical);
        assert_eq!(figure.categories(Axis::Y), ["n".to_string(), "s".to_string()]);
        assert_eq!(
            figure.traces[0].shape,
            TraceShape::Points(vec![[1.0, 0.0], [2.0, 1.0], [3.0, 0.0], [4.0, 1.0]])
        );
        assert_eq!(report.stats, Some(StatsOutcome::NonNumeric));
    }

    #[test]
    fn text_y_histogram_counts_categories() {
        let df = table();
        let mut figure = Figure::new();
        render(&df, &[], &["site"], &config(PlotKind::Histogram), &mut figure).unwrap();

        assert_eq!(figure.categories(Axis::X), ["n".to_string(), "s".to_string()]);
        let TraceShape::Bars(bars) = &figure.traces[0].shape else {
            panic!("expected bars");
        };
        let counts: Vec<(f64, f64)> = bars.iter().map(|b| (b.center, b.height)).collect();
        assert_eq!(counts, vec![(0.0, 2.0), (1.0, 2.0)]);
    }

    #[test]
    fn text_y_bar_needs_numeric_heights() {
        let df = table();
        let mut figure = Figure::new();
        let err = render(&df, &["t"], &["site"], &config(PlotKind::Bar), &mut figure).unwrap_err();
        assert_eq!(err.to_string(), "Column 'site' is not numeric");
    }

    #[test]
    fn mixed_y_axis_is_a_conflict() {
        let df = table();
        let mut figure = Figure::new();
        let err = render(&df, &["t"], &["site", "a"], &config(PlotKind::Line), &mut figure)
            .unwrap_err();
        assert!(matches!(err, RenderError::Axis(AxisConflict(Axis::Y))));
        assert_eq!(figure.traces.len(), 1);
    }

    #[test]
    fn no_save_name_writes_nothing() {
        let df = table();
        let (x, y) = (cols(&["t"]), cols(&["a"]));
        let colors = SeriesColorMap::default();
        let cfg = config(PlotKind::Scatter);
        let dir = tempfile::tempdir().unwrap();
        let mut figure = Figure::new();

        let report = StaticChartRenderer::render(
            &PlotRequest {
                df: &df,
                x: &x,
                y: &y,
                colors: &colors,
                config: &cfg,
            },
            &mut figure,
            dir.path(),
        )
        .unwrap();

        assert_eq!(report.saved_to, None);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
