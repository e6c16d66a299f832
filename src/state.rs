//! Application State
//! Everything a session holds, plus the load / render / export handlers.
//! The GUI only collects input and shows `status`; every outcome lands here.

use crate::charts::{
    ExportError, Figure, InteractiveChart, PlotConfig, PlotRequest, RenderError, RenderReport,
    SeriesColorMap, StaticChartRenderer,
};
use crate::data::{ColumnSelection, DataLoader, LoaderError};
use crate::stats::StatsOutcome;
use std::path::{Path, PathBuf};

pub const INITIAL_STATUS: &str = "Stats will appear here.";

/// How the status line should be read: plain info, a notice about the
/// input, or a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusKind {
    #[default]
    Info,
    Notice,
    Error,
}

pub struct AppState {
    pub loader: DataLoader,
    pub selection: ColumnSelection,
    pub colors: SeriesColorMap,
    pub config: PlotConfig,
    pub figure: Figure,
    /// The single user-facing status line.
    pub status: String,
    pub status_kind: StatusKind,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            loader: DataLoader::new(),
            selection: ColumnSelection::default(),
            colors: SeriesColorMap::default(),
            config: PlotConfig::default(),
            figure: Figure::new(),
            status: INITIAL_STATUS.to_string(),
            status_kind: StatusKind::Info,
        }
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = text.into();
        self.status_kind = kind;
    }

    /// Load a file and reset the selection to its columns.
    ///
    /// On failure nothing changes; the caller shows the error in a dialog.
    pub fn load_file(&mut self, path: &Path) -> Result<(), LoaderError> {
        match self.loader.load(path) {
            Ok(df) => {
                let (rows, cols) = (df.height(), df.width());
                self.selection.reset(self.loader.get_columns());
                tracing::info!(path = %path.display(), rows, cols, "loaded table");
                self.set_status(StatusKind::Info, format!("Loaded {} rows, {} columns", rows, cols));
                Ok(())
            }
            Err(e) => {
                tracing::error!(path = %path.display(), "failed to load file: {}", e);
                Err(e)
            }
        }
    }

    /// Render the current selection onto the figure and update the status line.
    pub fn generate_plot(&mut self, output_dir: &Path) -> Result<RenderReport, RenderError> {
        let result = self.render(output_dir);
        match &result {
            Ok(report) => {
                if let Some(stats) = &report.stats {
                    let kind = match stats {
                        StatsOutcome::Computed(_) => StatusKind::Info,
                        StatsOutcome::NonNumeric => StatusKind::Notice,
                    };
                    self.set_status(kind, stats.to_string());
                }
            }
            Err(e @ RenderError::SelectionTooLarge { .. }) | Err(e @ RenderError::NoData) => {
                tracing::warn!("render rejected: {}", e);
                self.set_status(StatusKind::Notice, e.to_string());
            }
            Err(e) => {
                tracing::error!("render failed: {}", e);
                self.set_status(StatusKind::Error, format!("Error: {}", e));
            }
        }
        result
    }

    fn render(&mut self, output_dir: &Path) -> Result<RenderReport, RenderError> {
        let df = self.loader.get_dataframe().ok_or(RenderError::NoData)?;
        let (x, y) = (self.selection.x(), self.selection.y());
        tracing::debug!(
            config = %serde_json::to_string(&self.config).unwrap_or_default(),
            ?x,
            ?y,
            "rendering"
        );
        StaticChartRenderer::render(
            &PlotRequest {
                df,
                x: &x,
                y: &y,
                colors: &self.colors,
                config: &self.config,
            },
            &mut self.figure,
            output_dir,
        )
    }

    /// Build the interactive chart, ask `pick_destination` where to write it,
    /// and write it there. Returns the written path, or `None` if the prompt
    /// was cancelled, in which case the status line is left as it was.
    pub fn export_interactive<F>(&mut self, pick_destination: F) -> Result<Option<PathBuf>, ExportError>
    where
        F: FnOnce() -> Option<PathBuf>,
    {
        let result = self.export_with(pick_destination);
        match &result {
            Ok(Some(path)) => {
                tracing::info!(path = %path.display(), "exported interactive chart");
                self.set_status(
                    StatusKind::Info,
                    format!("Interactive plot saved as {}", path.display()),
                );
                if self.config.open_after_export {
                    if let Err(e) = open::that(path) {
                        tracing::warn!("could not open exported chart: {}", e);
                    }
                }
            }
            Ok(None) => tracing::debug!("interactive export cancelled"),
            Err(e) => {
                tracing::error!("interactive export failed: {}", e);
                self.set_status(StatusKind::Error, format!("Interactive Export Error: {}", e));
            }
        }
        result
    }

    fn export_with<F>(&self, pick_destination: F) -> Result<Option<PathBuf>, ExportError>
    where
        F: FnOnce() -> Option<PathBuf>,
    {
        let df = self.loader.get_dataframe().ok_or(ExportError::NoData)?;
        let (x, y) = (self.selection.x(), self.selection.y());
        let chart = InteractiveChart::build(&PlotRequest {
            df,
            x: &x,
            y: &y,
            colors: &self.colors,
            config: &self.config,
        })?;

        let Some(path) = pick_destination() else {
            return Ok(None);
        };
        chart.write_html(&path)?;
        Ok(Some(path))
    }
}
