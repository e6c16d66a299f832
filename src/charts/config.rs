//! Plot Configuration Module
//! User-chosen rendering options: plot kind, series colors, labels, grid and output name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Number of configurable series color slots.
pub const COLOR_SLOTS: usize = 10;

/// Default categorical palette ("deep").
pub const PALETTE: [SeriesColor; 10] = [
    SeriesColor::rgb(76, 114, 176),  // Blue
    SeriesColor::rgb(221, 132, 82),  // Orange
    SeriesColor::rgb(85, 168, 104),  // Green
    SeriesColor::rgb(196, 78, 82),   // Red
    SeriesColor::rgb(129, 114, 179), // Purple
    SeriesColor::rgb(147, 120, 96),  // Brown
    SeriesColor::rgb(218, 139, 195), // Pink
    SeriesColor::rgb(140, 140, 140), // Gray
    SeriesColor::rgb(204, 185, 116), // Olive
    SeriesColor::rgb(100, 181, 205), // Cyan
];

/// Supported plot kinds, in the order the UI offers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlotKind {
    #[default]
    Boxplot,
    Scatter,
    Line,
    Histogram,
    Bar,
    Violin,
}

impl PlotKind {
    pub const ALL: [Self; 6] = [
        Self::Boxplot,
        Self::Scatter,
        Self::Line,
        Self::Histogram,
        Self::Bar,
        Self::Violin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boxplot => "Boxplot",
            Self::Scatter => "Scatter",
            Self::Line => "Line",
            Self::Histogram => "Histogram",
            Self::Bar => "Bar",
            Self::Violin => "Violin",
        }
    }

    /// Only line plots get a legend.
    pub fn has_legend(self) -> bool {
        matches!(self, Self::Line)
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl SeriesColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for SeriesColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<SeriesColor> for egui::Color32 {
    fn from(c: SeriesColor) -> Self {
        egui::Color32::from_rgb(c.r, c.g, c.b)
    }
}

impl From<SeriesColor> for plotters::style::RGBColor {
    fn from(c: SeriesColor) -> Self {
        plotters::style::RGBColor(c.r, c.g, c.b)
    }
}

/// Ordered color slots, read cyclically by series index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesColorMap {
    colors: Vec<SeriesColor>,
}

impl Default for SeriesColorMap {
    fn default() -> Self {
        Self {
            colors: (0..COLOR_SLOTS).map(|i| PALETTE[i % PALETTE.len()]).collect(),
        }
    }
}

impl SeriesColorMap {
    /// Build from explicit colors; an empty list falls back to the palette.
    pub fn new(colors: Vec<SeriesColor>) -> Self {
        if colors.is_empty() {
            return Self::default();
        }
        Self {
            colors: colors.into_iter().take(COLOR_SLOTS).collect(),
        }
    }

    /// Color for series `index`, wrapping around the configured slots.
    pub fn color_for(&self, index: usize) -> SeriesColor {
        self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn slots(&self) -> &[SeriesColor] {
        &self.colors
    }

    pub fn set(&mut self, slot: usize, color: SeriesColor) {
        if let Some(c) = self.colors.get_mut(slot) {
            *c = color;
        }
    }
}

/// Rendering options edited in the control panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    pub kind: PlotKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub show_grid: bool,
    /// File stem for the PNG output; blank disables saving.
    pub save_name: String,
    pub open_after_export: bool,
}

impl PlotConfig {
    /// `<dir>/<save_name>.png`, or `None` when no save name is set.
    pub fn save_path(&self, dir: &Path) -> Option<PathBuf> {
        let name = self.save_name.trim();
        if name.is_empty() {
            None
        } else {
            Some(dir.join(format!("{}.png", name)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_are_read_cyclically() {
        let colors = SeriesColorMap::new(PALETTE[..3].to_vec());
        assert_eq!(colors.len(), 3);
        assert_eq!(colors.color_for(3), colors.color_for(0));
        assert_eq!(colors.color_for(4), PALETTE[1]);
    }

    #[test]
    fn default_map_has_ten_distinct_slots() {
        let colors = SeriesColorMap::default();
        assert_eq!(colors.len(), COLOR_SLOTS);
        assert_eq!(colors.color_for(10), colors.color_for(0));
        assert_ne!(colors.color_for(1), colors.color_for(0));
    }

    #[test]
    fn empty_color_list_falls_back_to_palette() {
        assert_eq!(SeriesColorMap::new(Vec::new()), SeriesColorMap::default());
    }

    #[test]
    fn hex_is_lowercase_rrggbb() {
        assert_eq!(PALETTE[0].to_hex(), "#4c72b0");
    }

    #[test]
    fn blank_save_name_skips_output() {
        let mut config = PlotConfig::default();
        assert_eq!(config.save_path(Path::new("/tmp")), None);
        config.save_name = "   ".to_string();
        assert_eq!(config.save_path(Path::new("/tmp")), None);
        config.save_name = " chart ".to_string();
        assert_eq!(
            config.save_path(Path::new("/tmp")),
            Some(PathBuf::from("/tmp/chart.png"))
        );
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = PlotConfig {
            kind: PlotKind::Violin,
            title: "t".to_string(),
            show_grid: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"Violin\""));
        let back: PlotConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
