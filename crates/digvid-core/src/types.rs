//! Common types for DigVid
//!
//! Tracks, time ranges and display metadata shared by the single-item
//! session and the batch orchestrator.

use crate::services::UploadedAudio;
use serde::{Deserialize, Serialize};

/// Default segment length in seconds when a track loads
pub const DEFAULT_SELECTION_SECS: u32 = 30;

/// Shortest segment a selection can hold, in seconds
pub const MIN_SELECTION_SECS: u32 = 1;

/// Artist used when the user leaves the field blank
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Title used when the user leaves the field blank
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// A loaded audio file
///
/// Immutable once loaded; a new upload replaces the whole track.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Server-side file identifier
    pub file_id: String,
    /// Original filename for display
    pub filename: String,
    /// Duration in seconds
    pub duration: f64,
    /// Normalized amplitude summary (0.0 to 1.0), one value per waveform bar
    pub amplitudes: Vec<f32>,
}

impl Track {
    /// Create a track, clamping a negative or non-finite duration to zero
    pub fn new(file_id: impl Into<String>, filename: impl Into<String>, duration: f64, amplitudes: Vec<f32>) -> Self {
        let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        Self {
            file_id: file_id.into(),
            filename: filename.into(),
            duration,
            amplitudes,
        }
    }

    /// Build a track from an upload response and its fetched waveform
    ///
    /// Falls back to the amplitude summary embedded in the upload response
    /// when `amplitudes` is `None`.
    pub fn from_upload(upload: &UploadedAudio, amplitudes: Option<Vec<f32>>) -> Self {
        let amplitudes = amplitudes
            .or_else(|| upload.amplitude_summary.clone())
            .unwrap_or_default();
        Self::new(&upload.file_id, &upload.filename, upload.duration, amplitudes)
    }

    /// Largest whole second a selection may end on
    pub fn max_end(&self) -> u32 {
        max_end_for(self.duration)
    }
}

/// Largest whole second inside `duration`
pub(crate) fn max_end_for(duration: f64) -> u32 {
    if duration.is_finite() && duration > 0.0 {
        duration.floor().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// A time window in whole seconds, `start..end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: u32,
    pub end: u32,
}

impl TimeRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Segment length in seconds (zero for an inverted range)
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether `time` lies in `[start, end)`
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start as f64 && time < self.end as f64
    }
}

/// Artist and title shown on the generated video
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub artist: String,
    pub title: String,
}

impl TrackMetadata {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }

    /// Metadata suggested by the upload response (empty when absent)
    pub fn from_upload(upload: &UploadedAudio) -> Self {
        Self {
            artist: upload.suggested_artist.clone().unwrap_or_default(),
            title: upload.suggested_title.clone().unwrap_or_default(),
        }
    }

    /// Trimmed artist, or [`UNKNOWN_ARTIST`] when blank
    pub fn resolved_artist(&self) -> String {
        non_blank_or(&self.artist, UNKNOWN_ARTIST)
    }

    /// Trimmed title, or [`UNKNOWN_TITLE`] when blank
    pub fn resolved_title(&self) -> String {
        non_blank_or(&self.title, UNKNOWN_TITLE)
    }
}

fn non_blank_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_end_floors_fractional_duration() {
        let track = Track::new("f", "a.mp3", 20.6, Vec::new());
        assert_eq!(track.max_end(), 20);
        assert_eq!(max_end_for(0.4), 0);
        assert_eq!(max_end_for(f64::NAN), 0);
    }

    #[test]
    fn test_track_rejects_negative_duration() {
        let track = Track::new("f", "a.mp3", -3.0, Vec::new());
        assert_eq!(track.duration, 0.0);
    }

    #[test]
    fn test_time_range_contains_is_half_open() {
        let range = TimeRange::new(10, 40);
        assert!(range.contains(10.0));
        assert!(range.contains(39.9));
        assert!(!range.contains(40.0));
        assert!(!range.contains(9.99));
        assert_eq!(range.len(), 30);
        assert!(TimeRange::new(5, 5).is_empty());
    }

    #[test]
    fn test_metadata_falls_back_when_blank() {
        let meta = TrackMetadata::new("   ", " Song ");
        assert_eq!(meta.resolved_artist(), UNKNOWN_ARTIST);
        assert_eq!(meta.resolved_title(), "Song");
    }
}
