//! Plotter Main Application
//! Main window with control panel and chart viewer.

use crate::data::FileFormat;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::state::AppState;
use egui::SidePanel;
use rfd::{FileDialog, MessageDialog, MessageLevel};
use std::path::PathBuf;

/// Main application window.
pub struct PlotterApp {
    state: AppState,
    /// Directory PNG output is written to.
    output_dir: PathBuf,
}

impl PlotterApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let output_dir = std::env::current_dir().unwrap_or_else(|e| {
            tracing::warn!("no working directory, saving PNGs to '.': {}", e);
            PathBuf::from(".")
        });
        Self {
            state: AppState::new(),
            output_dir,
        }
    }

    /// Handle file selection. Load failures get a blocking dialog.
    fn handle_browse_file(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("Data Files", &FileFormat::EXTENSIONS)
            .pick_file()
        else {
            return;
        };

        if let Err(e) = self.state.load_file(&path) {
            MessageDialog::new()
                .set_level(MessageLevel::Error)
                .set_title("Error")
                .set_description(e.to_string())
                .show();
        }
    }

    fn handle_generate_plot(&mut self) {
        // Outcome is reported through the status line.
        let _ = self.state.generate_plot(&self.output_dir);
    }

    fn handle_export_interactive(&mut self) {
        let _ = self.state.export_interactive(|| {
            FileDialog::new()
                .add_filter("HTML Files", &["html"])
                .set_file_name("plot.html")
                .save_file()
        });
    }
}

impl eframe::App for PlotterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(320.0)
            .max_width(380.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match ControlPanel::show(ui, &mut self.state) {
                        ControlPanelAction::BrowseFile => self.handle_browse_file(),
                        ControlPanelAction::GeneratePlot => self.handle_generate_plot(),
                        ControlPanelAction::ExportInteractive => self.handle_export_interactive(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            ChartViewer::show(ui, &self.state.figure);
        });
    }
}
