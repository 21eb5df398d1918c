//! Display state for the trim waveform

use digvid_core::config::WaveformConfig;
use digvid_core::drag::HANDLE_TOLERANCE_PX;
use digvid_core::playback::MediaPlayer;
use digvid_core::session::TrimSession;
use digvid_core::waveform::{band_for, SelectionBand, WaveformRenderer};
use digvid_core::{TimeRange, Track};

/// Height of the trim waveform in pixels
pub const WAVEFORM_HEIGHT: f32 = 150.0;

/// Everything the canvas needs to draw one frame
#[derive(Debug, Clone)]
pub struct TrimWaveformState {
    /// Normalized amplitude summary, one bar per value
    pub amplitudes: Vec<f32>,
    /// Track duration in seconds
    pub duration: f64,
    pub selection: Option<TimeRange>,
    /// Playback position in seconds, while a player is attached
    pub playhead: Option<f64>,
    pub renderer: WaveformRenderer,
    /// Pixel reach of a handle, matching the drag controller's
    pub handle_tolerance: f32,
}

impl Default for TrimWaveformState {
    fn default() -> Self {
        Self {
            amplitudes: Vec::new(),
            duration: 0.0,
            selection: None,
            playhead: None,
            renderer: WaveformRenderer::default(),
            handle_tolerance: HANDLE_TOLERANCE_PX,
        }
    }
}

impl TrimWaveformState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_renderer(renderer: WaveformRenderer) -> Self {
        Self {
            renderer,
            ..Self::default()
        }
    }

    /// Bar styling and handle reach from the waveform config
    ///
    /// Pair with `PointerDragController::from_config` on the same section so
    /// the cursor icon agrees with hit-testing.
    pub fn from_config(config: &WaveformConfig) -> Self {
        Self {
            renderer: WaveformRenderer::from_config(config),
            handle_tolerance: config.handle_tolerance_px,
            ..Self::default()
        }
    }

    /// Show a newly loaded track with no selection yet
    pub fn load(&mut self, track: &Track) {
        log::debug!(
            "load: Waveform for '{}' with {} bars",
            track.filename,
            track.amplitudes.len()
        );
        self.amplitudes = track.amplitudes.clone();
        self.duration = track.duration;
        self.selection = None;
        self.playhead = None;
    }

    pub fn clear(&mut self) {
        self.amplitudes.clear();
        self.duration = 0.0;
        self.selection = None;
        self.playhead = None;
    }

    pub fn has_track(&self) -> bool {
        self.duration > 0.0
    }

    pub fn set_selection(&mut self, range: TimeRange) {
        self.selection = Some(range);
    }

    pub fn set_playhead(&mut self, time: Option<f64>) {
        self.playhead = time;
    }

    /// Copy track, selection and playhead from a session
    ///
    /// Reloads the bars only when the session holds a different track.
    pub fn sync_from_session<P: MediaPlayer>(&mut self, session: &TrimSession<P>) {
        match session.track() {
            Some(track) => {
                if track.duration != self.duration || track.amplitudes != self.amplitudes {
                    self.load(track);
                }
                self.selection = session.range();
                self.playhead = session.playback_state().map(|s| s.current_time);
            }
            None => self.clear(),
        }
    }

    /// Horizontal extent of the selection band
    pub fn band(&self) -> Option<SelectionBand> {
        self.selection.and_then(|range| band_for(range, self.duration))
    }

    /// Playhead as a fraction of the width (0.0 to 1.0)
    pub fn playhead_fraction(&self) -> Option<f32> {
        if !self.has_track() {
            return None;
        }
        self.playhead
            .filter(|t| t.is_finite())
            .map(|t| (t / self.duration).clamp(0.0, 1.0) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digvid_core::{Result, TrackMetadata};

    struct StubPlayer {
        time: f64,
    }

    impl MediaPlayer for StubPlayer {
        fn current_time(&self) -> f64 {
            self.time
        }
        fn is_playing(&self) -> bool {
            false
        }
        fn play(&mut self) -> Result<()> {
            Ok(())
        }
        fn pause(&mut self) {}
        fn seek(&mut self, time: f64) {
            self.time = time;
        }
    }

    #[test]
    fn test_band_and_playhead() {
        let mut state = TrimWaveformState::new();
        assert!(state.band().is_none());
        assert!(state.playhead_fraction().is_none());

        state.load(&Track::new("f", "a.mp3", 200.0, vec![0.2, 0.8]));
        state.set_selection(TimeRange::new(50, 100));
        state.set_playhead(Some(300.0));

        let band = state.band().unwrap();
        assert_eq!(band.left_percent, 25.0);
        assert_eq!(band.width_percent, 25.0);
        assert_eq!(state.playhead_fraction(), Some(1.0));
    }

    #[test]
    fn test_from_config_carries_tolerance() {
        let config = WaveformConfig {
            handle_tolerance_px: 30.0,
            ..WaveformConfig::default()
        };
        let state = TrimWaveformState::from_config(&config);
        assert_eq!(state.handle_tolerance, 30.0);
        assert_eq!(TrimWaveformState::new().handle_tolerance, HANDLE_TOLERANCE_PX);
    }

    #[test]
    fn test_sync_from_session() {
        let mut session: TrimSession<StubPlayer> = TrimSession::default();
        let mut state = TrimWaveformState::new();

        session.load(Track::new("f", "a.mp3", 120.0, vec![0.5; 3]), TrackMetadata::default(), None);
        session.attach_player(StubPlayer { time: 12.0 }).unwrap();
        state.sync_from_session(&session);

        assert_eq!(state.amplitudes.len(), 3);
        assert_eq!(state.selection, Some(TimeRange::new(0, 30)));
        assert_eq!(state.playhead, Some(12.0));

        session.reset();
        state.sync_from_session(&session);
        assert!(!state.has_track());
        assert!(state.selection.is_none());
    }
}
