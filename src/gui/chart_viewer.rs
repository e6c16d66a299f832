//! Chart Viewer Widget
//! Central panel showing the shared drawing surface.

use crate::charts::{ChartPlotter, Figure};
use egui::RichText;

pub struct ChartViewer;

impl ChartViewer {
    pub fn show(ui: &mut egui::Ui, figure: &Figure) {
        // A decorated figure with no traces (empty Y selection) still shows its axes.
        if figure.is_empty() && figure.revision() == 0 {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Plot").size(20.0));
            });
            return;
        }

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ChartPlotter::draw_figure(ui, figure);
            });
    }
}
