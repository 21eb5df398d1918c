//! Configuration for DigVid
//!
//! Settings are stored as YAML. Every section uses `#[serde(default)]` so a
//! partial file only overrides the keys it names.
//!
//! [`DigvidConfig::load`] validates after parsing, so callers always get
//! values in range.
//!
//! ```ignore
//! use digvid_core::config::DigvidConfig;
//! use digvid_core::session::TrimSession;
//!
//! let config = DigvidConfig::load_default();
//! let session: TrimSession<MyPlayer> = TrimSession::new(&config);
//! ```

mod io;
mod paths;

pub use paths::{default_config_dir, default_config_path};

use crate::types::{DEFAULT_SELECTION_SECS, MIN_SELECTION_SECS};
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigvidConfig {
    pub selection: SelectionConfig,
    pub waveform: WaveformConfig,
    pub batch: BatchConfig,
}

impl DigvidConfig {
    /// Clamp every section into its supported range
    pub fn validate(&mut self) {
        self.selection.validate();
        self.waveform.validate();
        self.batch.validate();
    }
}

/// Selection defaults applied when a track loads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Length of the initial segment in seconds
    pub default_length_secs: u32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            default_length_secs: DEFAULT_SELECTION_SECS,
        }
    }
}

impl SelectionConfig {
    pub fn validate(&mut self) {
        self.default_length_secs = self.default_length_secs.max(MIN_SELECTION_SECS);
    }
}

/// Waveform drawing and hit-testing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveformConfig {
    /// Pixel distance from a boundary that still grabs its handle
    pub handle_tolerance_px: f32,
    /// Fraction of the surface height a full-scale bar covers
    pub bar_height_fill: f32,
    /// Opacity of a silent bar; louder bars scale up to 1.0
    pub min_bar_opacity: f32,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            handle_tolerance_px: 15.0,
            bar_height_fill: 0.8,
            min_bar_opacity: 0.3,
        }
    }
}

impl WaveformConfig {
    pub fn validate(&mut self) {
        let defaults = Self::default();
        if !self.handle_tolerance_px.is_finite() || self.handle_tolerance_px < 0.0 {
            self.handle_tolerance_px = defaults.handle_tolerance_px;
        }
        if !self.bar_height_fill.is_finite() {
            self.bar_height_fill = defaults.bar_height_fill;
        }
        if !self.min_bar_opacity.is_finite() {
            self.min_bar_opacity = defaults.min_bar_opacity;
        }
        self.bar_height_fill = self.bar_height_fill.clamp(0.0, 1.0);
        self.min_bar_opacity = self.min_bar_opacity.clamp(0.0, 1.0);
    }
}

/// Batch queue settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum number of files a batch accepts
    pub max_items: usize,
    /// Prefix of the generated folder name when the user gives none
    pub folder_prefix: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_items: 10,
            folder_prefix: String::from("Playlist"),
        }
    }
}

impl BatchConfig {
    pub fn validate(&mut self) {
        self.max_items = self.max_items.clamp(1, 100);
        if self.folder_prefix.trim().is_empty() {
            self.folder_prefix = Self::default().folder_prefix;
        }
    }
}
