//! Chart Plotter Module
//! Paints a `Figure` interactively using egui_plot.

use crate::charts::figure::{AxisKind, Figure, Trace, TraceShape};
use crate::data::Axis;
use egui::{Color32, RichText, Stroke};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, PlotUi, Points,
    Polygon,
};

/// Paints figures with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw the figure title and its plot, filling the available space.
    pub fn draw_figure(ui: &mut egui::Ui, figure: &Figure) {
        if !figure.title.is_empty() {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(&figure.title).size(18.0).strong());
            });
        }

        // New id per render so zoom and pan from the last figure don't carry over.
        let mut plot = Plot::new(("figure", figure.revision()))
            .show_grid(figure.show_grid)
            .x_axis_label(figure.x_label.clone())
            .y_axis_label(figure.y_label.clone());

        if figure.show_legend {
            plot = plot.legend(Legend::default());
        }

        if figure.axis_kind(Axis::X) == AxisKind::Categorical {
            let labels = figure.categories(Axis::X).to_vec();
            plot = plot.x_axis_formatter(move |mark, _range| category_tick(&labels, mark.value));
        }
        if figure.axis_kind(Axis::Y) == AxisKind::Categorical {
            let labels = figure.categories(Axis::Y).to_vec();
            plot = plot.y_axis_formatter(move |mark, _range| category_tick(&labels, mark.value));
        }

        if let Some(bounds) = figure.bounds() {
            plot = plot
                .include_x(bounds.x_min)
                .include_x(bounds.x_max)
                .include_y(bounds.y_min)
                .include_y(bounds.y_max);
        }

        plot.show(ui, |plot_ui| {
            for trace in &figure.traces {
                Self::draw_trace(plot_ui, trace);
            }
        });
    }

    fn draw_trace(plot_ui: &mut PlotUi, trace: &Trace) {
        let color: Color32 = trace.color.into();
        let fill = color.gamma_multiply(trace.alpha as f32);
        // Only legend entries get a name; egui_plot hides unnamed items.
        let name = if trace.in_legend {
            trace.name.clone()
        } else {
            String::new()
        };

        match &trace.shape {
            TraceShape::Points(points) => {
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(3.0)
                        .color(fill)
                        .name(name),
                );
            }
            TraceShape::Line(points) => {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(color)
                        .width(2.0)
                        .name(name),
                );
            }
            TraceShape::Bars(bars) => {
                let bars: Vec<Bar> = bars
                    .iter()
                    .map(|b| {
                        Bar::new(b.center, b.height)
                            .width(b.width)
                            .base_offset(b.bottom)
                            .fill(fill)
                            .stroke(Stroke::new(1.0, color))
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).color(color).name(name));
            }
            TraceShape::Boxes(boxes) => {
                let elems: Vec<BoxElem> = boxes
                    .iter()
                    .map(|b| {
                        BoxElem::new(
                            b.position,
                            BoxSpread::new(b.whisker_low, b.q1, b.median, b.q3, b.whisker_high),
                        )
                        .box_width(b.width)
                        .whisker_width(b.width / 2.0)
                        .fill(fill)
                        .stroke(Stroke::new(1.5, Color32::BLACK))
                    })
                    .collect();
                plot_ui.box_plot(BoxPlot::new(elems).name(name));

                let outliers: Vec<[f64; 2]> = boxes
                    .iter()
                    .flat_map(|b| b.outliers.iter().map(move |&o| [b.position, o]))
                    .collect();
                if !outliers.is_empty() {
                    plot_ui.points(
                        Points::new(PlotPoints::from_iter(outliers))
                            .radius(3.0)
                            .filled(false)
                            .color(Color32::BLACK),
                    );
                }
            }
            TraceShape::Violins(violins) => {
                for v in violins {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from_iter(v.polygon()))
                            .fill_color(fill)
                            .stroke(Stroke::new(1.0, color))
                            .name(name.clone()),
                    );
                    plot_ui.line(
                        Line::new(PlotPoints::from_iter([[v.position, v.q1], [v.position, v.q3]]))
                            .color(Color32::BLACK)
                            .width(4.0),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from_iter([[v.position, v.median]]))
                            .radius(3.0)
                            .color(Color32::WHITE),
                    );
                }
            }
        }
    }
}

/// Tick text on a categorical axis: the label at whole positions, nothing between.
fn category_tick(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}
