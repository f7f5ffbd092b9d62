use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Series name → Color32
// ---------------------------------------------------------------------------

/// Stable colours for the timing chart, one per `strategy · operation` series.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl SeriesColors {
    pub fn new<I, S>(series: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = series.into_iter().map(Into::into).collect();
        let palette = generate_palette(names.len());
        let mapping = names.into_iter().zip(palette).collect();
        SeriesColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, series: &str) -> Color32 {
        self.mapping
            .get(series)
            .copied()
            .unwrap_or(self.default_color)
    }
}

/// Display name of one chart series.
pub fn series_name(strategy: &str, operation: &str) -> String {
    format!("{strategy} · {operation}")
}

/// Every series the chart draws, in legend order.
pub fn series_names() -> Vec<String> {
    let mut names = Vec::new();
    for strategy in ["Polars", "Arrow"] {
        for operation in CHART_OPERATIONS {
            names.push(series_name(strategy, operation));
        }
    }
    names
}

pub const CHART_OPERATIONS: [&str; 4] = ["Reading", "Group By", "Search", "Sorting"];

impl Default for SeriesColors {
    fn default() -> Self {
        Self::new(series_names())
    }
}
