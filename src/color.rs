use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::OutcomeClass;

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

/// Fixed wedge colours for the outcome pie chart.
pub fn outcome_color(class: OutcomeClass) -> Color32 {
    match class {
        OutcomeClass::Success => Color32::from_rgb(99, 110, 250),
        OutcomeClass::Failure => Color32::from_rgb(239, 85, 59),
    }
}

// ---------------------------------------------------------------------------
// Booster category → Color32
// ---------------------------------------------------------------------------

/// Maps booster version categories to distinct colours for the scatter chart.
#[derive(Debug, Clone, Default)]
pub struct CategoryColors {
    mapping: BTreeMap<String, Color32>,
}

impl CategoryColors {
    /// Build the map from the dataset's sorted category set, so a category
    /// keeps its colour whatever the current filter shows.
    pub fn new(categories: &BTreeSet<String>) -> Self {
        let palette = generate_palette(categories.len());
        CategoryColors {
            mapping: categories.iter().cloned().zip(palette).collect(),
        }
    }

    pub fn color_for(&self, category: &str) -> Color32 {
        self.mapping
            .get(category)
            .copied()
            .unwrap_or(Color32::GRAY)
    }

    /// Legend entries (category → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping
            .iter()
            .map(|(cat, c)| (cat.clone(), *c))
            .collect()
    }
}
