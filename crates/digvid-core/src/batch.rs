//! Batch trimming and generation
//!
//! A batch run replays the single-track workflow over a queue of files:
//!
//! ```text
//! Collecting ──begin_configuring──▶ Configuring ──generate──▶ Generating ──▶ Completed
//!      ▲                                 ▲                        │
//!      └──────────── reset ──────────────┴── service unreachable ─┘
//! ```
//!
//! Items are generated strictly one after another, in queue order. A failed
//! item is recorded and the run moves on; only an unreachable service aborts
//! the run, keeping a partial report of what finished.
//!
//! # Usage
//!
//! ```ignore
//! let (progress_tx, progress_rx) = std::sync::mpsc::channel();
//!
//! let mut batch = BatchOrchestrator::from_config(&config);
//! batch.collect(&files, &audio_service).await?;
//! batch.begin_configuring()?;
//! let report = batch.generate(&generation_service, Some(&progress_tx)).await?;
//!
//! // Poll progress_rx for updates
//! ```

use crate::config::DigvidConfig;
use crate::error::{Result, TrimError};
use crate::format::resolve_folder_name_with_prefix;
use crate::media::AudioFile;
use crate::selection::{validate_bounds, TimeSelectionModel};
use crate::services::{AudioService, BatchGenerateRequest, GenerateRequest, GenerationService, UploadedAudio};
use crate::types::{TimeRange, Track, TrackMetadata, DEFAULT_SELECTION_SECS};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::mpsc::Sender;

/// Default number of files one batch accepts
pub const DEFAULT_BATCH_CAPACITY: usize = 10;

/// Where a batch run is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase {
    Collecting,
    Configuring,
    Generating,
    Completed,
}

/// One queued file with its own selection and metadata
#[derive(Debug)]
pub struct BatchItem {
    pub track: Track,
    pub selection: TimeSelectionModel,
    pub metadata: TrackMetadata,
    pub cover_id: Option<String>,
}

impl BatchItem {
    pub fn new(track: Track, metadata: TrackMetadata, cover_id: Option<String>, default_length: u32) -> Self {
        let selection = TimeSelectionModel::with_default_length(track.duration, default_length);
        Self {
            track,
            selection,
            metadata,
            cover_id,
        }
    }

    pub fn range(&self) -> TimeRange {
        self.selection.range()
    }

    /// Check the selection before anything is sent
    pub fn validate(&self) -> Result<()> {
        validate_bounds(self.range(), self.track.duration)
    }

    pub fn request(&self) -> GenerateRequest {
        GenerateRequest::new(&self.track.file_id, &self.metadata, self.range(), self.cover_id.clone())
    }
}

/// A generated item
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSuccess {
    /// Position in the queue when the run started
    pub index: usize,
    pub artist: String,
    pub title: String,
    /// Reference to the produced output
    pub output_ref: String,
}

/// An item that could not be generated
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationFailure {
    pub index: usize,
    pub artist: String,
    pub title: String,
    pub error: String,
}

/// Result of one item within a run
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Succeeded(GenerationSuccess),
    Failed(GenerationFailure),
}

/// Outcome of a completed run, both lists in queue order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub succeeded: Vec<GenerationSuccess>,
    pub failed: Vec<GenerationFailure>,
    /// Output folder, for service-side batches
    pub folder_name: Option<String>,
}

impl BatchReport {
    fn from_outcomes(outcomes: Vec<ItemOutcome>, folder_name: Option<String>) -> Self {
        let mut report = Self {
            folder_name,
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome {
                ItemOutcome::Succeeded(s) => report.succeeded.push(s),
                ItemOutcome::Failed(f) => report.failed.push(f),
            }
        }
        report
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Progress updates sent while a run is generating
#[derive(Debug, Clone)]
pub enum BatchProgress {
    /// Run started
    Started { total: usize },
    /// Starting an item
    ItemStarted { index: usize, total: usize, title: String },
    /// Finished an item
    ItemCompleted(ItemOutcome),
    /// Every item has been processed
    AllComplete { report: BatchReport },
}

/// A file that was not added to the batch
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedFile {
    pub name: String,
    pub error: TrimError,
}

/// Result of [`BatchOrchestrator::collect`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectReport {
    /// Queue indices of the newly added items
    pub accepted: Vec<usize>,
    /// Files beyond the batch capacity, never uploaded
    pub dropped: Vec<String>,
    /// Files that failed validation or upload
    pub rejected: Vec<RejectedFile>,
}

/// Sequential multi-file trimming and generation
#[derive(Debug)]
pub struct BatchOrchestrator {
    phase: BatchPhase,
    items: Vec<BatchItem>,
    capacity: usize,
    default_length: u32,
    folder_prefix: String,
    report: Option<BatchReport>,
}

impl Default for BatchOrchestrator {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_BATCH_CAPACITY)
    }
}

impl BatchOrchestrator {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            phase: BatchPhase::Collecting,
            items: Vec::new(),
            capacity: capacity.max(1),
            default_length: DEFAULT_SELECTION_SECS,
            folder_prefix: crate::format::DEFAULT_FOLDER_PREFIX.to_string(),
            report: None,
        }
    }

    pub fn from_config(config: &DigvidConfig) -> Self {
        Self {
            default_length: config.selection.default_length_secs,
            folder_prefix: config.batch.folder_prefix.clone(),
            ..Self::with_capacity(config.batch.max_items)
        }
    }

    pub fn phase(&self) -> BatchPhase {
        self.phase
    }

    pub fn items(&self) -> &[BatchItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots left in the queue
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }

    /// Report of the last run, partial when it was aborted
    pub fn report(&self) -> Option<&BatchReport> {
        self.report.as_ref()
    }

    /// Queue an already-loaded track
    pub fn push(&mut self, track: Track, metadata: TrackMetadata, cover_id: Option<String>) -> Result<usize> {
        self.require_phase(&[BatchPhase::Collecting])?;
        if self.remaining() == 0 {
            return Err(TrimError::BatchFull(self.capacity));
        }
        log::debug!("push: Queued '{}' ({:.2}s)", track.filename, track.duration);
        self.items.push(BatchItem::new(track, metadata, cover_id, self.default_length));
        Ok(self.items.len() - 1)
    }

    /// Queue an uploaded file with its waveform
    pub fn accept(&mut self, upload: &UploadedAudio, amplitudes: Option<Vec<f32>>) -> Result<usize> {
        self.push(
            Track::from_upload(upload, amplitudes),
            TrackMetadata::from_upload(upload),
            upload.cover_id.clone(),
        )
    }

    /// Validate, upload and queue files one at a time
    ///
    /// A file that fails validation or upload is reported as rejected and
    /// the rest are still processed. Files past the remaining capacity are
    /// reported as dropped without being uploaded.
    pub async fn collect<S: AudioService>(&mut self, files: &[AudioFile], service: &S) -> Result<CollectReport> {
        self.require_phase(&[BatchPhase::Collecting])?;
        let mut report = CollectReport::default();

        for file in files {
            if self.remaining() == 0 {
                report.dropped.push(file.name.clone());
                continue;
            }

            if let Err(error) = file.validate() {
                log::warn!("collect: Skipping '{}': {}", file.name, error);
                report.rejected.push(RejectedFile {
                    name: file.name.clone(),
                    error,
                });
                continue;
            }

            let upload = match service.upload_audio(file).await {
                Ok(upload) => upload,
                Err(e) => {
                    log::warn!("collect: Upload of '{}' failed: {}", file.name, e);
                    report.rejected.push(RejectedFile {
                        name: file.name.clone(),
                        error: e.into(),
                    });
                    continue;
                }
            };

            let amplitudes = match service.fetch_waveform(&upload.file_id).await {
                Ok(amplitudes) => Some(amplitudes),
                Err(e) => {
                    log::warn!("collect: Waveform for '{}' unavailable: {}", file.name, e);
                    None
                }
            };

            report.accepted.push(self.accept(&upload, amplitudes)?);
        }

        if !report.dropped.is_empty() {
            log::warn!(
                "collect: Batch full ({} max), dropped {} file(s)",
                self.capacity,
                report.dropped.len()
            );
        }
        log::info!(
            "collect: {} accepted, {} rejected, {} dropped",
            report.accepted.len(),
            report.rejected.len(),
            report.dropped.len()
        );
        Ok(report)
    }

    pub fn item(&self, index: usize) -> Result<&BatchItem> {
        self.items.get(index).ok_or(TrimError::NoSuchItem(index))
    }

    /// Edit an item's selection, metadata or cover before generation
    pub fn item_mut(&mut self, index: usize) -> Result<&mut BatchItem> {
        self.require_phase(&[BatchPhase::Collecting, BatchPhase::Configuring])?;
        self.items.get_mut(index).ok_or(TrimError::NoSuchItem(index))
    }

    pub fn remove(&mut self, index: usize) -> Result<BatchItem> {
        self.require_phase(&[BatchPhase::Collecting, BatchPhase::Configuring])?;
        if index >= self.items.len() {
            return Err(TrimError::NoSuchItem(index));
        }
        Ok(self.items.remove(index))
    }

    /// Stop collecting and move to per-item configuration
    pub fn begin_configuring(&mut self) -> Result<()> {
        self.require_phase(&[BatchPhase::Collecting, BatchPhase::Configuring])?;
        if self.items.is_empty() {
            return Err(TrimError::EmptyBatch);
        }
        self.phase = BatchPhase::Configuring;
        Ok(())
    }

    /// Generate every item in order, one request at a time
    ///
    /// Each item is validated first; invalid items are recorded as failures
    /// without contacting the service. If the service is unreachable the run
    /// stops and the phase returns to `Configuring`. The items finished so far
    /// and the item that hit the error stay available through
    /// [`BatchOrchestrator::report`] until the next run or reset.
    pub async fn generate<S: GenerationService>(
        &mut self,
        service: &S,
        progress: Option<&Sender<BatchProgress>>,
    ) -> Result<BatchReport> {
        self.start_run()?;
        let total = self.items.len();
        log::info!("generate: Starting batch of {} items", total);
        emit(progress, BatchProgress::Started { total });

        let mut outcomes = Vec::with_capacity(total);
        for (index, item) in self.items.iter().enumerate() {
            let artist = item.metadata.resolved_artist();
            let title = item.metadata.resolved_title();
            emit(
                progress,
                BatchProgress::ItemStarted {
                    index,
                    total,
                    title: title.clone(),
                },
            );

            let outcome = match item.validate() {
                Err(e) => failure(index, artist, title, e.to_string()),
                Ok(()) => match service.generate_single(&item.request()).await {
                    Ok(video) => ItemOutcome::Succeeded(GenerationSuccess {
                        index,
                        artist,
                        title,
                        output_ref: video.video_id,
                    }),
                    Err(e) if e.is_structural() => {
                        log::error!("generate: Aborting at item {}: {}", index, e);
                        outcomes.push(failure(index, artist, title, e.to_string()));
                        self.phase = BatchPhase::Configuring;
                        self.report = Some(BatchReport::from_outcomes(outcomes, None));
                        return Err(e.into());
                    }
                    Err(e) => failure(index, artist, title, e.to_string()),
                },
            };

            if let ItemOutcome::Failed(f) = &outcome {
                log::warn!("generate: Item {} '{}' failed: {}", index, f.title, f.error);
            }
            emit(progress, BatchProgress::ItemCompleted(outcome.clone()));
            outcomes.push(outcome);
        }

        Ok(self.finish_run(BatchReport::from_outcomes(outcomes, None), progress))
    }

    /// Send every valid item to the service in a single batch request
    ///
    /// `folder_name` is sanitized; a blank name becomes `{prefix}_{today}`.
    /// Items failing local validation are recorded as failures and left out
    /// of the request. Any error from the batch call itself aborts the run.
    pub async fn submit_batch<S: GenerationService>(
        &mut self,
        service: &S,
        folder_name: &str,
        today: NaiveDate,
    ) -> Result<BatchReport> {
        self.start_run()?;
        let folder_name = resolve_folder_name_with_prefix(folder_name, &self.folder_prefix, today);

        let mut outcomes: Vec<Option<ItemOutcome>> = vec![None; self.items.len()];
        let mut sent = Vec::new();
        for (index, item) in self.items.iter().enumerate() {
            match item.validate() {
                Ok(()) => sent.push(index),
                Err(e) => {
                    outcomes[index] = Some(failure(
                        index,
                        item.metadata.resolved_artist(),
                        item.metadata.resolved_title(),
                        e.to_string(),
                    ))
                }
            }
        }

        let mut report_folder = Some(folder_name.clone());
        if !sent.is_empty() {
            let request = BatchGenerateRequest {
                songs: sent.iter().map(|&i| self.items[i].request()).collect(),
                folder_name,
                start_time: 0.0,
                end_time: self.default_length as f64,
            };
            log::info!(
                "submit_batch: Sending {} songs to '{}'",
                request.songs.len(),
                request.folder_name
            );

            let response = match service.generate_batch(&request).await {
                Ok(response) => response,
                Err(e) => {
                    log::error!("submit_batch: {}", e);
                    self.phase = BatchPhase::Configuring;
                    return Err(e.into());
                }
            };

            let errors: HashMap<usize, String> = response
                .errors_list
                .into_iter()
                .map(|f| (f.song_index, f.error))
                .collect();
            let mut processed = response.processed_songs.into_iter();

            for (song_index, &item_index) in sent.iter().enumerate() {
                let song = &request.songs[song_index];
                let outcome = match errors.get(&song_index) {
                    Some(error) => failure(item_index, song.artist.clone(), song.title.clone(), error.clone()),
                    None => match processed.next() {
                        Some(done) => ItemOutcome::Succeeded(GenerationSuccess {
                            index: item_index,
                            artist: song.artist.clone(),
                            title: song.title.clone(),
                            output_ref: done.filename,
                        }),
                        None => failure(
                            item_index,
                            song.artist.clone(),
                            song.title.clone(),
                            "missing from service response".to_string(),
                        ),
                    },
                };
                outcomes[item_index] = Some(outcome);
            }
            report_folder = Some(response.folder_name);
        }

        let report = BatchReport::from_outcomes(outcomes.into_iter().flatten().collect(), report_folder);
        Ok(self.finish_run(report, None))
    }

    /// Clear the queue and start collecting again
    pub fn reset(&mut self) {
        self.items.clear();
        self.report = None;
        self.phase = BatchPhase::Collecting;
    }

    fn require_phase(&self, allowed: &[BatchPhase]) -> Result<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(TrimError::InvalidPhase(self.phase))
        }
    }

    fn start_run(&mut self) -> Result<()> {
        self.require_phase(&[BatchPhase::Collecting, BatchPhase::Configuring])?;
        if self.items.is_empty() {
            return Err(TrimError::EmptyBatch);
        }
        self.phase = BatchPhase::Generating;
        self.report = None;
        Ok(())
    }

    fn finish_run(&mut self, report: BatchReport, progress: Option<&Sender<BatchProgress>>) -> BatchReport {
        log::info!(
            "finish_run: Complete - {} succeeded, {} failed",
            report.succeeded.len(),
            report.failed.len()
        );
        self.phase = BatchPhase::Completed;
        self.report = Some(report.clone());
        emit(progress, BatchProgress::AllComplete { report: report.clone() });
        report
    }
}

fn failure(index: usize, artist: String, title: String, error: String) -> ItemOutcome {
    ItemOutcome::Failed(GenerationFailure {
        index,
        artist,
        title,
        error,
    })
}

fn emit(progress: Option<&Sender<BatchProgress>>, event: BatchProgress) {
    if let Some(tx) = progress {
        let _ = tx.send(event);
    }
}
