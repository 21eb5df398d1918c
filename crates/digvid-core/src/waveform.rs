//! Waveform bar geometry and selection overlay
//!
//! Converts a normalized amplitude summary into one rectangle per value.
//! Rendering is a pure function of its inputs; the toolkit that paints the
//! rectangles lives elsewhere (see `digvid-widgets`).

use crate::config::WaveformConfig;
use crate::selection::TimeSelectionModel;
use crate::types::TimeRange;

/// One vertical bar of the waveform, in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformBar {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Fill opacity (0.0 to 1.0)
    pub opacity: f32,
}

/// Maps amplitudes to bars using the configured fill and opacity
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformRenderer {
    bar_height_fill: f32,
    min_bar_opacity: f32,
}

impl Default for WaveformRenderer {
    fn default() -> Self {
        Self::from_config(&WaveformConfig::default())
    }
}

impl WaveformRenderer {
    pub fn from_config(config: &WaveformConfig) -> Self {
        Self {
            bar_height_fill: config.bar_height_fill,
            min_bar_opacity: config.min_bar_opacity,
        }
    }

    /// Lay out one bar per amplitude across a `width` x `height` surface
    ///
    /// Bar `i` starts at `i * width / n`, is one pixel narrower than its slot
    /// (but at least one pixel wide) and is vertically centered.
    pub fn render(&self, amplitudes: &[f32], width: f32, height: f32) -> Vec<WaveformBar> {
        if amplitudes.is_empty() || width <= 0.0 || height <= 0.0 {
            return Vec::new();
        }

        let slot = width / amplitudes.len() as f32;
        let bar_width = (slot - 1.0).max(1.0);
        let center_y = height / 2.0;

        amplitudes
            .iter()
            .enumerate()
            .map(|(i, &amplitude)| {
                let amplitude = if amplitude.is_finite() { amplitude.clamp(0.0, 1.0) } else { 0.0 };
                let bar_height = amplitude * height * self.bar_height_fill;
                WaveformBar {
                    x: i as f32 * slot,
                    y: center_y - bar_height / 2.0,
                    width: bar_width,
                    height: bar_height,
                    opacity: (self.min_bar_opacity + amplitude * (1.0 - self.min_bar_opacity)).min(1.0),
                }
            })
            .collect()
    }
}

/// Render with the default parameters (80% height, 0.3 base opacity)
pub fn render_bars(amplitudes: &[f32], width: f32, height: f32) -> Vec<WaveformBar> {
    WaveformRenderer::default().render(amplitudes, width, height)
}

/// Horizontal extent of the selection band, in percent of surface width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionBand {
    pub left_percent: f64,
    pub width_percent: f64,
}

impl SelectionBand {
    /// Left and right edges in pixels for a surface `width` wide
    pub fn to_pixels(&self, width: f32) -> (f32, f32) {
        let left = (self.left_percent / 100.0) as f32 * width;
        let right = ((self.left_percent + self.width_percent) / 100.0) as f32 * width;
        (left, right)
    }
}

/// Band for `range` on a track of `duration` seconds
pub fn band_for(range: TimeRange, duration: f64) -> Option<SelectionBand> {
    if duration <= 0.0 || !duration.is_finite() {
        return None;
    }
    let percent = |t: u32| (t as f64 / duration).clamp(0.0, 1.0) * 100.0;
    let left = percent(range.start);
    let right = percent(range.end);
    Some(SelectionBand {
        left_percent: left,
        width_percent: (right - left).max(0.0),
    })
}

/// Band for the model's current selection
pub fn selection_band(model: &TimeSelectionModel) -> Option<SelectionBand> {
    band_for(model.range(), model.duration())
}

/// Selection band plus its duration label, kept current from notifications
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionOverlay {
    duration: f64,
    band: Option<SelectionBand>,
    label: String,
}

impl SelectionOverlay {
    /// Overlay showing the model's current selection
    pub fn for_model(model: &TimeSelectionModel) -> Self {
        let mut overlay = Self {
            duration: model.duration(),
            ..Self::default()
        };
        overlay.update(model.range());
        overlay
    }

    /// Recompute after a selection change
    pub fn update(&mut self, range: TimeRange) {
        self.band = band_for(range, self.duration);
        self.label = format!("{}s", range.len());
    }

    pub fn band(&self) -> Option<SelectionBand> {
        self.band
    }

    /// Selected length, e.g. `"30s"`
    pub fn label(&self) -> &str {
        &self.label
    }
}
