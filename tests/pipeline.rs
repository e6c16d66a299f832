use chartify_plotter::charts::{AxisKind, PlotKind, SeriesColor, TraceShape, PALETTE};
use chartify_plotter::data::Axis;
use chartify_plotter::state::AppState;
use std::fs;
use std::path::PathBuf;

fn write_csv(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("measurements.csv");
    fs::write(
        &path,
        "time,temp,humidity,site\n\
         1,20.5,40,north\n\
         2,21.0,42,south\n\
         3,22.5,45,north\n\
         4,21.5,47,south\n\
         5,23.0,50,north\n",
    )
    .unwrap();
    path
}

#[test]
fn load_plot_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = AppState::new();
    state.load_file(&write_csv(&dir)).unwrap();
    assert_eq!(state.status, "Loaded 5 rows, 4 columns");

    state.config.kind = PlotKind::Line;
    state.config.title = "Climate".to_string();
    state.selection.toggle(Axis::X, "time");
    state.selection.toggle(Axis::Y, "temp");
    state.selection.toggle(Axis::Y, "humidity");

    let report = state.generate_plot(dir.path()).unwrap();
    assert_eq!(report.series_drawn, 2);
    assert_eq!(report.saved_to, None);
    assert_eq!(state.status, "Mean: 21.70, Median: 21.50, Std: 1.04");

    let figure = &state.figure;
    assert_eq!(figure.title, "Climate");
    assert!(figure.show_legend);
    assert_eq!(figure.axis_kind(Axis::X), AxisKind::Numeric);
    let colors: Vec<SeriesColor> = figure.traces.iter().map(|t| t.color).collect();
    assert_eq!(colors, vec![PALETTE[0], PALETTE[1]]);

    let target = dir.path().join("climate.html");
    let written = state.export_interactive(|| Some(target.clone())).unwrap();
    assert_eq!(written, Some(target.clone()));
    let html = fs::read_to_string(&target).unwrap();
    assert!(html.contains("\"mode\":\"lines\""));
    assert!(html.contains("Climate"));
}

#[test]
fn boxplot_by_site_then_cancelled_export() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = AppState::new();
    state.load_file(&write_csv(&dir)).unwrap();

    state.config.kind = PlotKind::Boxplot;
    state.selection.toggle(Axis::X, "site");
    state.selection.toggle(Axis::Y, "temp");
    state.generate_plot(dir.path()).unwrap();

    assert_eq!(state.figure.categories(Axis::X), ["north".to_string(), "south".to_string()]);
    match &state.figure.traces[0].shape {
        TraceShape::Boxes(boxes) => assert_eq!(boxes.len(), 2),
        other => panic!("expected boxes, got {:?}", other),
    }

    let status = state.status.clone();
    assert_eq!(state.export_interactive(|| None).unwrap(), None);
    assert_eq!(state.status, status);
}

#[test]
fn reloading_a_bad_file_keeps_the_table() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = AppState::new();
    state.load_file(&write_csv(&dir)).unwrap();

    let broken = dir.path().join("broken.xlsx");
    fs::write(&broken, b"not a workbook").unwrap();
    assert!(state.load_file(&broken).is_err());

    assert_eq!(state.loader.get_row_count(), 5);
    assert_eq!(state.selection.candidates().len(), 4);
}
