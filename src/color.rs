use std::collections::HashMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette
// ---------------------------------------------------------------------------

/// Hand-picked colours for the first geographies; these cover the usual
/// four-geography dataset.
const BASE_PALETTE: [Color32; 8] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0x2c, 0xa0, 0x2c),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0x94, 0x67, 0xbd),
    Color32::from_rgb(0x8c, 0x56, 0x4b),
    Color32::from_rgb(0xe3, 0x77, 0xc2),
    Color32::from_rgb(0x17, 0xbe, 0xcf),
];

const GOLDEN_ANGLE: f32 = 137.507_77;

/// Colour for the geography at canonical position `index`.
///
/// Depends on nothing but `index`. Past the base palette, hues step by the
/// golden angle and lightness alternates between three bands. Colours are
/// distinct for the first 300 indices; beyond that, 8-bit rounding can map
/// two indices to the same colour.
pub fn color_for_index(index: usize) -> Color32 {
    if let Some(c) = BASE_PALETTE.get(index) {
        return *c;
    }
    let k = index - BASE_PALETTE.len();
    let hue = (k as f32 * GOLDEN_ANGLE) % 360.0;
    let lightness = [0.45, 0.58, 0.36][k % 3];
    let hsl = Hsl::new(hue, 0.70, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

/// Generates the first `n` geography colours.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n).map(color_for_index).collect()
}

// ---------------------------------------------------------------------------
// Line roles and stroke styles
// ---------------------------------------------------------------------------

/// What a line represents in a paired-metric chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesRole {
    Observed,
    Benchmark,
}

impl SeriesRole {
    pub fn label(self) -> &'static str {
        match self {
            SeriesRole::Observed => "observed",
            SeriesRole::Benchmark => "benchmark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrokeStyle {
    Solid,
    Dashed,
}

/// Role alone decides the stroke; geography alone decides the colour.
pub fn style_for(role: SeriesRole) -> StrokeStyle {
    match role {
        SeriesRole::Observed => StrokeStyle::Solid,
        SeriesRole::Benchmark => StrokeStyle::Dashed,
    }
}

// ---------------------------------------------------------------------------
// Visual encoder: geography → Color32
// ---------------------------------------------------------------------------

/// Maps each geography of a dataset to its colour. Shared by every chart.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualEncoder {
    order: Vec<String>,
    mapping: HashMap<String, Color32>,
}

impl VisualEncoder {
    /// Build from the canonical geography list.
    pub fn new(geographies: &[String]) -> Self {
        let mapping = geographies
            .iter()
            .cloned()
            .zip(generate_palette(geographies.len()))
            .collect();
        Self {
            order: geographies.to_vec(),
            mapping,
        }
    }

    /// Colour for a listed geography; `None` for anything not in the list.
    pub fn color_for(&self, geo_name: &str) -> Option<Color32> {
        self.mapping.get(geo_name).copied()
    }

    /// Legend entries (geography → colour) in canonical order.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.order
            .iter()
            .filter_map(|g| self.color_for(g).map(|c| (g.clone(), c)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn geos(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Geo {i}")).collect()
    }

    #[test]
    fn color_is_idempotent() {
        let enc = VisualEncoder::new(&geos(4));
        assert_eq!(enc.color_for("Geo 2"), enc.color_for("Geo 2"));
        assert_eq!(enc, VisualEncoder::new(&geos(4)));
    }

    #[test]
    fn distinct_geographies_never_share_a_color() {
        let g = geos(300);
        let enc = VisualEncoder::new(&g);
        let colors: HashSet<Color32> = g.iter().filter_map(|n| enc.color_for(n)).collect();
        assert_eq!(colors.len(), g.len());
    }

    #[test]
    fn color_depends_only_on_canonical_index() {
        let a = VisualEncoder::new(&["A".to_string(), "B".to_string()]);
        let b = VisualEncoder::new(&["B".to_string(), "A".to_string()]);
        assert_eq!(a.color_for("A"), Some(color_for_index(0)));
        assert_eq!(b.color_for("A"), Some(color_for_index(1)));
        assert_eq!(a.color_for("A"), b.color_for("B"));
    }

    #[test]
    fn unknown_geography_has_no_color() {
        let enc = VisualEncoder::new(&geos(2));
        assert_eq!(enc.color_for("Unknown City"), None);
    }

    #[test]
    fn legend_is_in_canonical_order() {
        let g = vec!["Z".to_string(), "A".to_string()];
        let entries = VisualEncoder::new(&g).legend_entries();
        assert_eq!(entries[0], ("Z".to_string(), color_for_index(0)));
        assert_eq!(entries[1], ("A".to_string(), color_for_index(1)));
    }

    #[test]
    fn role_decides_stroke() {
        assert_eq!(style_for(SeriesRole::Observed), StrokeStyle::Solid);
        assert_eq!(style_for(SeriesRole::Benchmark), StrokeStyle::Dashed);
    }

    #[test]
    fn palette_prefix_is_stable() {
        assert_eq!(generate_palette(10)[..4], generate_palette(4)[..]);
    }
}
