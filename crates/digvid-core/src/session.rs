//! Single-track trimming session
//!
//! [`TrimSession`] owns everything that belongs to one loaded track: the
//! selection model, the drag controller, the overlay band and, once a player
//! is attached, the playback synchronizer. All selection changes go through
//! the model; the session drains the model's change subscription after every
//! mutation and forwards the latest range to the overlay and player.

use crate::config::DigvidConfig;
use crate::drag::{DragState, DragTransition, PointerDragController, PointerEvent};
use crate::error::{Result, TrimError};
use crate::media::{AudioFile, CoverFile};
use crate::playback::{MediaPlayer, PlaybackState, PlaybackSynchronizer, TickOutcome};
use crate::selection::{validate_bounds, TimeSelectionModel};
use crate::services::{AudioService, GenerateRequest, GeneratedVideo, GenerationService};
use crate::types::{TimeRange, Track, TrackMetadata, DEFAULT_SELECTION_SECS};
use crate::waveform::SelectionOverlay;
use std::sync::mpsc::Receiver;

/// State owned by a loaded track
#[derive(Debug)]
struct LoadedTrack {
    track: Track,
    model: TimeSelectionModel,
    changes: Receiver<TimeRange>,
    overlay: SelectionOverlay,
    metadata: TrackMetadata,
    cover_id: Option<String>,
}

/// One track being trimmed, previewed and sent for generation
#[derive(Debug)]
pub struct TrimSession<P: MediaPlayer> {
    default_length: u32,
    drag: PointerDragController,
    loaded: Option<LoadedTrack>,
    player: Option<PlaybackSynchronizer<P>>,
}

impl<P: MediaPlayer> Default for TrimSession<P> {
    fn default() -> Self {
        Self {
            default_length: DEFAULT_SELECTION_SECS,
            drag: PointerDragController::new(),
            loaded: None,
            player: None,
        }
    }
}

impl<P: MediaPlayer> TrimSession<P> {
    pub fn new(config: &DigvidConfig) -> Self {
        Self {
            default_length: config.selection.default_length_secs,
            drag: PointerDragController::from_config(&config.waveform),
            loaded: None,
            player: None,
        }
    }

    /// Replace the current track
    ///
    /// The selection resets to its default and any attached player is
    /// detached and returned.
    pub fn load(&mut self, track: Track, metadata: TrackMetadata, cover_id: Option<String>) -> Option<P> {
        let mut model = TimeSelectionModel::with_default_length(track.duration, self.default_length);
        let changes = model.subscribe();
        let overlay = SelectionOverlay::for_model(&model);

        log::info!(
            "load: Loaded '{}' ({:.2}s), selection {}..{}",
            track.filename,
            track.duration,
            model.start(),
            model.end()
        );

        self.drag.reset();
        self.loaded = Some(LoadedTrack {
            track,
            model,
            changes,
            overlay,
            metadata,
            cover_id,
        });
        self.detach_player()
    }

    /// Validate, upload and load an audio file
    ///
    /// A waveform fetch failure is not fatal: the upload's embedded summary
    /// (or an empty waveform) is used instead.
    pub async fn open<S: AudioService>(&mut self, service: &S, file: &AudioFile) -> Result<Option<P>> {
        file.validate()?;
        let upload = service.upload_audio(file).await?;

        let amplitudes = match service.fetch_waveform(&upload.file_id).await {
            Ok(amplitudes) => Some(amplitudes),
            Err(e) => {
                log::warn!("open: Waveform for '{}' unavailable: {}", upload.filename, e);
                None
            }
        };

        let track = Track::from_upload(&upload, amplitudes);
        let metadata = TrackMetadata::from_upload(&upload);
        Ok(self.load(track, metadata, upload.cover_id.clone()))
    }

    /// Attach a player to the loaded track, replacing any previous one
    pub fn attach_player(&mut self, player: P) -> Result<Option<P>> {
        let range = self.loaded()?.model.range();
        let previous = self.detach_player();
        self.player = Some(PlaybackSynchronizer::attach(player, range));
        Ok(previous)
    }

    pub fn detach_player(&mut self) -> Option<P> {
        self.player.take().map(PlaybackSynchronizer::detach)
    }

    /// Drop the track, player and any drag session
    pub fn reset(&mut self) -> Option<P> {
        self.drag.reset();
        self.loaded = None;
        self.detach_player()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn track(&self) -> Option<&Track> {
        self.loaded.as_ref().map(|l| &l.track)
    }

    pub fn model(&self) -> Option<&TimeSelectionModel> {
        self.loaded.as_ref().map(|l| &l.model)
    }

    pub fn range(&self) -> Option<TimeRange> {
        self.loaded.as_ref().map(|l| l.model.range())
    }

    pub fn overlay(&self) -> Option<&SelectionOverlay> {
        self.loaded.as_ref().map(|l| &l.overlay)
    }

    pub fn metadata(&self) -> Option<&TrackMetadata> {
        self.loaded.as_ref().map(|l| &l.metadata)
    }

    pub fn set_metadata(&mut self, metadata: TrackMetadata) -> Result<()> {
        self.loaded_mut()?.metadata = metadata;
        Ok(())
    }

    pub fn cover_id(&self) -> Option<&str> {
        self.loaded.as_ref().and_then(|l| l.cover_id.as_deref())
    }

    pub fn set_cover(&mut self, cover_id: Option<String>) -> Result<()> {
        self.loaded_mut()?.cover_id = cover_id;
        Ok(())
    }

    /// Validate and upload a cover image, then use it for this track
    pub async fn upload_cover<S: AudioService>(&mut self, service: &S, file: &CoverFile) -> Result<String> {
        self.loaded()?;
        file.validate()?;
        let cover_id = service.upload_cover(file).await?;
        self.set_cover(Some(cover_id.clone()))?;
        Ok(cover_id)
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn player(&self) -> Option<&P> {
        self.player.as_ref().map(PlaybackSynchronizer::player)
    }

    pub fn playback_state(&self) -> Option<PlaybackState> {
        self.player.as_ref().map(PlaybackSynchronizer::state)
    }

    /// Feed a pointer event from the waveform surface
    ///
    /// Moving during a drag pauses a playing player before the selection is
    /// updated.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<DragTransition> {
        let loaded = self.loaded.as_mut().ok_or(TrimError::NoTrack)?;
        let transition = self.drag.handle_event(event, &loaded.model);

        if matches!(transition, DragTransition::Moved { .. }) {
            if let Some(sync) = self.player.as_mut() {
                if sync.pause() {
                    log::debug!("handle_pointer: Paused playback for drag");
                }
            }
        }

        if let Some((start, end)) = transition.proposed_bounds() {
            loaded.model.set(start, end);
        }
        self.forward_changes();
        Ok(transition)
    }

    /// Apply bounds typed into numeric inputs
    ///
    /// Values are rounded and clamped like a drag. Rejected while a drag
    /// session owns the selection.
    pub fn set_selection_input(&mut self, start: f64, end: f64) -> Result<TimeRange> {
        if self.drag.is_dragging() {
            return Err(TrimError::DragInProgress);
        }
        let loaded = self.loaded_mut()?;
        let range = loaded.model.set(start, end).ok_or_else(|| {
            TrimError::InvalidSelection(format!(
                "track is too short ({:.2}s) to hold a selection",
                loaded.track.duration
            ))
        })?;
        self.forward_changes();
        Ok(range)
    }

    /// Playback position update; `None` without a player
    pub fn tick(&mut self) -> Option<TickOutcome> {
        self.player.as_mut().map(PlaybackSynchronizer::on_tick)
    }

    pub fn media_ended(&mut self) {
        if let Some(sync) = self.player.as_mut() {
            sync.on_ended();
        }
    }

    pub fn toggle_playback(&mut self) -> Result<PlaybackState> {
        self.loaded()?;
        let sync = self
            .player
            .as_mut()
            .ok_or_else(|| TrimError::Playback("no player attached".to_string()))?;
        sync.toggle_playback()
    }

    /// Build the generation request for the current selection
    pub fn generation_request(&self) -> Result<GenerateRequest> {
        let loaded = self.loaded()?;
        let range = loaded.model.range();
        validate_bounds(range, loaded.track.duration)?;
        Ok(GenerateRequest::new(
            &loaded.track.file_id,
            &loaded.metadata,
            range,
            loaded.cover_id.clone(),
        ))
    }

    /// Submit the current selection; failures are returned as-is, not retried
    pub async fn generate<S: GenerationService>(&self, service: &S) -> Result<GeneratedVideo> {
        let request = self.generation_request()?;
        log::info!(
            "generate: Requesting {}s..{}s of '{}'",
            request.start_time,
            request.end_time,
            request.audio_file_id
        );
        match service.generate_single(&request).await {
            Ok(video) => {
                log::info!("generate: Video ready: {}", video.video_id);
                Ok(video)
            }
            Err(e) => {
                log::error!("generate: {}", e);
                Err(e.into())
            }
        }
    }

    fn loaded(&self) -> Result<&LoadedTrack> {
        self.loaded.as_ref().ok_or(TrimError::NoTrack)
    }

    fn loaded_mut(&mut self) -> Result<&mut LoadedTrack> {
        self.loaded.as_mut().ok_or(TrimError::NoTrack)
    }

    /// Push the latest stored range to the overlay and player
    fn forward_changes(&mut self) {
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        let Some(range) = loaded.changes.try_iter().last() else {
            return;
        };

        loaded.overlay.update(range);
        if let Some(sync) = self.player.as_mut() {
            if sync.selection_changed(range) {
                log::debug!("forward_changes: Player moved to new start {}s", range.start);
            }
        }
    }
}
