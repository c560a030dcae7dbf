//! Visual settings shared by every chart.
//!
//! Figure sizes are given in inches and scaled by the configured DPI, and
//! font sizes in points, the same way a print layout would specify them.

use crate::config::ChartsConfig;
use crate::models::Species;
use plotters::prelude::*;

/// Explicit style passed to every renderer.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    /// Pixels per inch.
    pub dpi: u32,
    /// Font family for every text element.
    pub font_family: String,
    /// Title size in points.
    pub title_pt: f64,
    /// Axis description size in points.
    pub label_pt: f64,
    /// Tick and annotation size in points.
    pub tick_pt: f64,
    /// Number of histogram bins.
    pub histogram_bins: usize,
    /// Dashboard size in inches.
    pub dashboard_size: (f64, f64),
    /// Heatmap size in inches.
    pub heatmap_size: (f64, f64),
    /// Boxplot grid size in inches.
    pub boxplot_size: (f64, f64),
    /// Scatter colour per species, in species order.
    pub species_colors: [RGBColor; 3],
    /// Bar colour per species, in species order.
    pub bar_colors: [RGBColor; 3],
    /// Box fill per species, in species order.
    pub box_colors: [RGBColor; 3],
    /// Colour of the time-series line and band.
    pub trend_color: RGBColor,
    /// Colour of the histogram bars.
    pub histogram_color: RGBColor,
    /// Colour of the histogram mean marker.
    pub mean_color: RGBColor,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::from(&ChartsConfig::default())
    }
}

impl From<&ChartsConfig> for ChartStyle {
    fn from(config: &ChartsConfig) -> Self {
        Self {
            dpi: config.dpi,
            font_family: config.font_family.clone(),
            title_pt: 14.0,
            label_pt: 12.0,
            tick_pt: 10.0,
            histogram_bins: config.histogram_bins,
            dashboard_size: (16.0, 12.0),
            heatmap_size: (10.0, 8.0),
            boxplot_size: (14.0, 10.0),
            species_colors: [
                RGBColor(0xF7, 0x71, 0x89),
                RGBColor(0x50, 0xB1, 0x31),
                RGBColor(0x3B, 0xA3, 0xEC),
            ],
            bar_colors: [
                RGBColor(0xA2, 0x3B, 0x72),
                RGBColor(0xF1, 0x8F, 0x01),
                RGBColor(0xC7, 0x3E, 0x1D),
            ],
            box_colors: [
                RGBColor(0x66, 0xC2, 0xA5),
                RGBColor(0xFC, 0x8D, 0x62),
                RGBColor(0x8D, 0xA0, 0xCB),
            ],
            trend_color: RGBColor(0x2E, 0x86, 0xAB),
            histogram_color: RGBColor(0x06, 0xA7, 0x7D),
            mean_color: RED,
        }
    }
}

impl ChartStyle {
    /// Pixel dimensions of a figure given in inches.
    pub fn pixels(&self, (w, h): (f64, f64)) -> (u32, u32) {
        let dpi = self.dpi as f64;
        ((w * dpi).round() as u32, (h * dpi).round() as u32)
    }

    /// Converts a size in points to pixels.
    pub fn px(&self, points: f64) -> i32 {
        ((points * self.dpi as f64 / 72.0).round() as i32).max(1)
    }

    /// Bold font used for chart captions.
    pub fn title_font(&self) -> FontDesc<'_> {
        (self.font_family.as_str(), self.px(self.title_pt))
            .into_font()
            .style(FontStyle::Bold)
    }

    /// Bold font used for axis descriptions.
    pub fn label_font(&self) -> FontDesc<'_> {
        (self.font_family.as_str(), self.px(self.label_pt))
            .into_font()
            .style(FontStyle::Bold)
    }

    /// Regular font for ticks, legends and annotations.
    pub fn tick_font(&self) -> FontDesc<'_> {
        (self.font_family.as_str(), self.px(self.tick_pt)).into_font()
    }

    /// Scatter colour of a species.
    pub fn species_color(&self, species: Species) -> RGBColor {
        self.species_colors[species.index()]
    }
}

/// Diverging blue-white-red colour for a coefficient in `[-1, 1]`.
///
/// `NaN` maps to a neutral grey.
pub fn diverging(value: f64) -> RGBColor {
    const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const HOT: (f64, f64, f64) = (180.0, 4.0, 38.0);

    if value.is_nan() {
        return RGBColor(160, 160, 160);
    }
    let v = value.clamp(-1.0, 1.0);
    let (from, to, t) = if v < 0.0 {
        (MID, COLD, -v)
    } else {
        (MID, HOT, v)
    };
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixels_scale_with_dpi() {
        let mut style = ChartStyle::default();
        assert_eq!(style.pixels((16.0, 12.0)), (4800, 3600));
        style.dpi = 100;
        assert_eq!(style.pixels((16.0, 12.0)), (1600, 1200));
        style.dpi = 300;
        assert_eq!(style.pixels((10.0, 8.0)), (3000, 2400));
        assert_eq!(style.px(72.0), 300);
    }

    #[test]
    fn test_style_follows_config() {
        let config = ChartsConfig {
            dpi: 50,
            histogram_bins: 7,
            ..ChartsConfig::default()
        };
        let style = ChartStyle::from(&config);
        assert_eq!(style.dpi, 50);
        assert_eq!(style.histogram_bins, 7);
        assert_eq!(style.font_family, "sans-serif");
    }

    #[test]
    fn test_diverging_endpoints() {
        assert_eq!(diverging(0.0), RGBColor(221, 221, 221));
        assert_eq!(diverging(1.0), RGBColor(180, 4, 38));
        assert_eq!(diverging(-1.0), RGBColor(59, 76, 192));
        assert_eq!(diverging(5.0), diverging(1.0));
        assert_eq!(diverging(f64::NAN), RGBColor(160, 160, 160));
    }
}
