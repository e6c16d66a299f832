//! Interactive Chart Exporter
//! Builds a single plotly.js chart from the first X/Y pair and writes it as HTML.

use crate::charts::config::PlotKind;
use crate::charts::series::PlotRequest;
use crate::data::{AxisValues, DataProcessor, ProcessorError};
use polars::prelude::DataFrame;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// plotly.js bundle referenced by exported documents.
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No data loaded")]
    NoData,
    #[error("Select a Y-axis column to export")]
    NoYColumn,
    #[error(transparent)]
    Data(#[from] ProcessorError),
    #[error("Failed to serialize chart: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A plotly figure: one trace plus layout.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveChart {
    pub trace: Value,
    pub layout: Value,
}

impl InteractiveChart {
    /// Chart for `x[0]` / `y[0]` drawn in color slot 0.
    pub fn build(request: &PlotRequest<'_>) -> Result<Self, ExportError> {
        let y = request.y.first().ok_or(ExportError::NoYColumn)?;
        let x = request.x.first().map(String::as_str);
        let kind = request.config.kind;
        let color = request.colors.color_for(0).to_hex();
        let df = request.df;

        let mut trace = match kind {
            PlotKind::Scatter => json!({
                "type": "scatter",
                "mode": "markers",
                "marker": { "color": color },
            }),
            PlotKind::Line => json!({
                "type": "scatter",
                "mode": "lines",
                "line": { "color": color },
            }),
            PlotKind::Bar => json!({
                "type": "bar",
                "marker": { "color": color },
            }),
            PlotKind::Histogram => json!({
                "type": "histogram",
                "marker": { "color": color },
            }),
            PlotKind::Boxplot => json!({
                "type": "box",
                "marker": { "color": color },
            }),
            PlotKind::Violin => json!({
                "type": "violin",
                "line": { "color": color },
            }),
        };

        // Histograms chart the Y column along X and count along Y.
        let (x_title, y_title) = if kind == PlotKind::Histogram {
            trace["x"] = Value::Array(column_json(df, y)?);
            (y.as_str(), "count")
        } else {
            if let Some(x) = x {
                trace["x"] = Value::Array(column_json(df, x)?);
            }
            trace["y"] = Value::Array(column_json(df, y)?);
            (x.unwrap_or("index"), y.as_str())
        };
        trace["name"] = json!(y);

        let layout = json!({
            "title": { "text": request.config.title },
            "xaxis": { "title": { "text": x_title } },
            "yaxis": { "title": { "text": y_title } },
            "showlegend": false,
        });

        Ok(Self { trace, layout })
    }

    /// Self-contained HTML page rendering the chart with plotly.js.
    pub fn to_html(&self) -> Result<String, ExportError> {
        let data = escape_script(&serde_json::to_string(&[&self.trace])?);
        let layout = escape_script(&serde_json::to_string(&self.layout)?);
        let title = self.layout["title"]["text"].as_str().unwrap_or_default();
        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{cdn}"></script>
</head>
<body>
<div id="chart" style="width:100%;height:95vh;"></div>
<script>
Plotly.newPlot("chart", {data}, {layout}, {{"responsive": true}});
</script>
</body>
</html>
"#,
            title = escape_html(title),
            cdn = PLOTLY_CDN,
        ))
    }

    /// Serialize first, then write, so a failed build never leaves a file behind.
    pub fn write_html(&self, path: &Path) -> Result<(), ExportError> {
        let html = self.to_html()?;
        fs::write(path, html).map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Column values as JSON: numbers stay numbers, everything else is text, missing is null.
fn column_json(df: &DataFrame, name: &str) -> Result<Vec<Value>, ProcessorError> {
    Ok(match DataProcessor::axis_values(df, name)? {
        AxisValues::Numeric(values) => values
            .into_iter()
            .map(|v| v.map(Value::from).unwrap_or(Value::Null))
            .collect(),
        AxisValues::Categorical(values) => values
            .into_iter()
            .map(|v| v.map(Value::String).unwrap_or(Value::Null))
            .collect(),
    })
}

fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::config::{PlotConfig, SeriesColorMap, PALETTE};
    use polars::prelude::*;

    fn table() -> DataFrame {
        DataFrame::new(vec![
            Column::new("day".into(), vec!["mon", "tue", "wed"]),
            Column::new("sales".into(), vec![Some(3.5), None, Some(1.0)]),
            Column::new("units".into(), vec![1i64, 2, 3]),
        ])
        .unwrap()
    }

    fn build(kind: PlotKind, x: &[&str], y: &[&str]) -> Result<InteractiveChart, ExportError> {
        let df = table();
        let x: Vec<String> = x.iter().map(|s| s.to_string()).collect();
        let y: Vec<String> = y.iter().map(|s| s.to_string()).collect();
        let colors = SeriesColorMap::new(vec![PALETTE[3], PALETTE[4]]);
        let config = PlotConfig {
            kind,
            title: "Weekly <sales>".to_string(),
            ..Default::default()
        };
        InteractiveChart::build(&PlotRequest {
            df: &df,
            x: &x,
            y: &y,
            colors: &colors,
            config: &config,
        })
    }

    #[test]
    fn scatter_uses_first_pair_and_first_color() {
        let chart = build(PlotKind::Scatter, &["day", "units"], &["sales", "units"]).unwrap();
        assert_eq!(chart.trace["type"], "scatter");
        assert_eq!(chart.trace["mode"], "markers");
        assert_eq!(chart.trace["x"], json!(["mon", "tue", "wed"]));
        assert_eq!(chart.trace["y"], json!([3.5, null, 1.0]));
        assert_eq!(chart.trace["marker"]["color"], PALETTE[3].to_hex());
        assert_eq!(chart.layout["title"]["text"], "Weekly <sales>");
    }

    #[test]
    fn histogram_charts_y_and_ignores_x() {
        let chart = build(PlotKind::Histogram, &["day"], &["units"]).unwrap();
        assert_eq!(chart.trace["type"], "histogram");
        assert_eq!(chart.trace["x"], json!([1.0, 2.0, 3.0]));
        assert!(chart.trace.get("y").is_none());
    }

    #[test]
    fn box_without_x_is_single_distribution() {
        let chart = build(PlotKind::Boxplot, &[], &["units"]).unwrap();
        assert_eq!(chart.trace["type"], "box");
        assert!(chart.trace.get("x").is_none());
    }

    #[test]
    fn each_kind_maps_to_a_plotly_trace() {
        let expected = [
            (PlotKind::Boxplot, "box"),
            (PlotKind::Scatter, "scatter"),
            (PlotKind::Line, "scatter"),
            (PlotKind::Histogram, "histogram"),
            (PlotKind::Bar, "bar"),
            (PlotKind::Violin, "violin"),
        ];
        for (kind, plotly_type) in expected {
            let chart = build(kind, &["day"], &["units"]).unwrap();
            assert_eq!(chart.trace["type"], plotly_type, "{kind}");
        }
    }

    #[test]
    fn missing_y_is_an_error() {
        assert!(matches!(
            build(PlotKind::Line, &["day"], &[]),
            Err(ExportError::NoYColumn)
        ));
    }

    #[test]
    fn html_escapes_title_and_embeds_chart() {
        let chart = build(PlotKind::Bar, &["day"], &["units"]).unwrap();
        let html = chart.to_html().unwrap();
        assert!(html.contains("<title>Weekly &lt;sales&gt;</title>"));
        assert!(html.contains(PLOTLY_CDN));
        assert!(html.contains(r#"Plotly.newPlot("chart", [{"#));
        assert!(html.contains(r#""type":"bar""#));
    }

    #[test]
    fn script_closing_tags_are_escaped() {
        assert_eq!(escape_script(r#"{"a":"</script>"}"#), r#"{"a":"<\/script>"}"#);
    }

    #[test]
    fn write_html_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.html");
        let chart = build(PlotKind::Line, &["day"], &["sales"]).unwrap();
        chart.write_html(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<!DOCTYPE html>"));
    }
}
