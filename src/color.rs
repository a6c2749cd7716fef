use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

use crate::data::choropleth::ColorDomain;
use crate::data::model::Year;

// ---------------------------------------------------------------------------
// Sequential colour scale for the choropleth
// ---------------------------------------------------------------------------

/// Stops of a light-to-dark green ramp.
const GREENS: [(u8, u8, u8); 5] = [
    (0xf7, 0xfc, 0xf5),
    (0xc7, 0xe9, 0xc0),
    (0x74, 0xc4, 0x76),
    (0x23, 0x8b, 0x45),
    (0x00, 0x44, 0x1b),
];

/// Maps values inside a [`ColorDomain`] onto the green ramp.
///
/// Interpolation happens in linear RGB so the midpoints do not look muddy.
#[derive(Debug, Clone)]
pub struct SequentialScale {
    pub domain: ColorDomain,
    stops: Vec<LinSrgb>,
}

impl SequentialScale {
    pub fn greens(domain: ColorDomain) -> Self {
        let stops: Vec<LinSrgb> = GREENS
            .iter()
            .map(|&(r, g, b)| Srgb::new(r, g, b).into_format::<f32>().into_linear())
            .collect();
        SequentialScale { domain, stops }
    }

    /// Colour for a position `t` in `[0, 1]` along the ramp.
    pub fn at(&self, t: f32) -> Color32 {
        let t = t.clamp(0.0, 1.0);
        let segments = (self.stops.len() - 1) as f32;
        let scaled = t * segments;
        let i = (scaled.floor() as usize).min(self.stops.len() - 2);
        let mixed = self.stops[i].mix(self.stops[i + 1], scaled - i as f32);
        let rgb: Srgb<u8> = Srgb::<f32>::from_linear(mixed).into_format();
        Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
    }

    /// Colour for a statistic value, positioned by the domain.
    pub fn color_for(&self, value: f64) -> Color32 {
        self.at(self.domain.normalize(value))
    }

    /// `n` evenly spaced legend entries from min to max.
    pub fn legend_entries(&self, n: usize) -> Vec<(String, Color32)> {
        let n = n.max(2);
        (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                let value = self.domain.min + t * (self.domain.max - self.domain.min);
                (format!("{value:.2}%"), self.at(t as f32))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Staff / student series colours
// ---------------------------------------------------------------------------

/// Fixed colours of the four stacked series, so the same series keeps its
/// colour whatever the filter state.
pub fn series_color(year: Year, students: bool) -> Color32 {
    match (year, students) {
        (Year::Y2017, false) => Color32::from_rgb(0x1f, 0x77, 0xb4),
        (Year::Y2017, true) => Color32::from_rgb(0xae, 0xc7, 0xe8),
        (Year::Y2018, false) => Color32::from_rgb(0xff, 0x7f, 0x0e),
        (Year::Y2018, true) => Color32::from_rgb(0xff, 0xbb, 0x78),
    }
}
