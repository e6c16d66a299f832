//! Control Panel Widget
//! Left side panel with file selection, column lists, colors and plot options.

use crate::charts::{PlotKind, PALETTE};
use crate::data::{Axis, MAX_SELECTION};
use crate::state::{AppState, StatusKind};
use egui::{Color32, ComboBox, RichText, ScrollArea};

/// Left side control panel. Holds no state of its own; it edits `AppState`
/// and reports which handler the user asked for.
pub struct ControlPanel;

impl ControlPanel {
    /// Draw the control panel
    pub fn show(ui: &mut egui::Ui, state: &mut AppState) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // ===== Data Source =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path = state.loader.get_file_path();
                    let path_text = path
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    let text_color = if path.is_some() {
                        ui.visuals().strong_text_color()
                    } else {
                        Color32::GRAY
                    };
                    ui.label(RichText::new(&path_text).size(12.0).color(text_color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseFile;
                        }
                    });
                });
            });

        ui.add_space(10.0);
        ui.separator();

        // ===== Columns =====
        ui.label(RichText::new("🔧 Columns").size(14.0).strong());
        ui.label(
            RichText::new(format!("Pick up to {} per axis", MAX_SELECTION))
                .size(11.0)
                .color(Color32::GRAY),
        );
        ui.add_space(5.0);

        ui.columns(2, |cols| {
            Self::column_list(&mut cols[0], state, Axis::X);
            Self::column_list(&mut cols[1], state, Axis::Y);
        });

        ui.add_space(10.0);
        ui.separator();

        // ===== Colors =====
        ui.label(RichText::new("🎨 Series Colors").size(14.0).strong());
        ui.add_space(5.0);

        egui::Grid::new("series_colors")
            .num_columns(2)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                for slot in 0..state.colors.len() {
                    let current = state.colors.color_for(slot);
                    ui.label(format!("Series {}", slot + 1));
                    ui.horizontal(|ui| {
                        Self::swatch(ui, current.into());
                        ComboBox::from_id_salt(("series_color", slot))
                            .width(100.0)
                            .selected_text(current.to_hex())
                            .show_ui(ui, |ui| {
                                for color in PALETTE {
                                    ui.horizontal(|ui| {
                                        Self::swatch(ui, color.into());
                                        if ui
                                            .selectable_label(current == color, color.to_hex())
                                            .clicked()
                                        {
                                            state.colors.set(slot, color);
                                        }
                                    });
                                }
                            });
                    });
                    ui.end_row();
                }
            });

        ui.add_space(10.0);
        ui.separator();

        // ===== Plot Options =====
        ui.label(RichText::new("⚙️ Plot Options").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal_wrapped(|ui| {
            for kind in PlotKind::ALL {
                ui.radio_value(&mut state.config.kind, kind, kind.as_str());
            }
        });
        ui.add_space(5.0);

        let label_width = 80.0;
        egui::Grid::new("plot_labels")
            .num_columns(2)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                for (label, value) in [
                    ("Title:", &mut state.config.title),
                    ("X Label:", &mut state.config.x_label),
                    ("Y Label:", &mut state.config.y_label),
                    ("Save As:", &mut state.config.save_name),
                ] {
                    ui.add_sized([label_width, 20.0], egui::Label::new(label));
                    ui.text_edit_singleline(value);
                    ui.end_row();
                }
            });
        ui.label(
            RichText::new("Leave \"Save As\" empty to skip the PNG file")
                .size(11.0)
                .color(Color32::GRAY),
        );

        ui.checkbox(&mut state.config.show_grid, "Show Grid");
        ui.checkbox(
            &mut state.config.open_after_export,
            "Open interactive chart after export",
        );

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        let has_data = state.loader.get_dataframe().is_some();
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(has_data, |ui| {
                let button = egui::Button::new(RichText::new("▶ Generate Plot").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::GeneratePlot;
                }

                ui.add_space(8.0);

                let export = egui::Button::new(RichText::new("🌐 Export Interactive").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(export).clicked() {
                    action = ControlPanelAction::ExportInteractive;
                }
            });
        });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = match state.status_kind {
            StatusKind::Info => Color32::GRAY,
            StatusKind::Notice => Color32::from_rgb(243, 156, 18),
            StatusKind::Error => Color32::from_rgb(220, 53, 69),
        };
        ui.label(RichText::new(&state.status).size(12.0).color(status_color));

        action
    }

    /// Multi-select list of every column for one axis.
    fn column_list(ui: &mut egui::Ui, state: &mut AppState, axis: Axis) {
        let count = state.selection.selected(axis).len();
        let header = format!("{}-Axis ({})", axis.label(), count);
        let header = if count > MAX_SELECTION {
            RichText::new(header).strong().color(Color32::from_rgb(220, 53, 69))
        } else {
            RichText::new(header).strong()
        };
        ui.label(header);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt(("columns", axis.label()))
                    .max_height(160.0)
                    .show(ui, |ui| {
                        let candidates = state.selection.candidates().to_vec();
                        for col in &candidates {
                            let selected = state.selection.is_selected(axis, col);
                            if ui.selectable_label(selected, col).clicked() {
                                state.selection.toggle(axis, col);
                            }
                        }
                    });
            });

        if ui.small_button("Clear").clicked() {
            state.selection.clear(axis);
        }
    }

    fn swatch(ui: &mut egui::Ui, color: Color32) {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
        ui.painter().rect_filled(rect, 3.0, color);
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    BrowseFile,
    GeneratePlot,
    ExportInteractive,
}
