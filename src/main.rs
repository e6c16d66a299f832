//! Chartify Plotter - Advanced Excel/CSV Plotter
//!
//! Desktop application for plotting spreadsheet and delimited-text data.

use anyhow::{anyhow, Result};
use chartify_plotter::gui::PlotterApp;
use eframe::egui;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();
    tracing::info!("Starting Advanced Excel/CSV Plotter");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Advanced Excel/CSV Plotter"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Advanced Excel/CSV Plotter",
        options,
        Box::new(|cc| Ok(Box::new(PlotterApp::new(cc)))),
    )
    .map_err(|e| anyhow!("GUI error: {}", e))
}
