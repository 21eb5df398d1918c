//! External service contracts
//!
//! Uploading, waveform extraction and video generation happen outside this
//! crate. The traits below are the seams the session and batch code call
//! through; the structs are the JSON bodies exchanged with the generation
//! backend and keep its field names.

use crate::error::ServiceError;
use crate::media::{AudioFile, CoverFile};
use crate::types::{TimeRange, TrackMetadata};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Response to a successful audio upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedAudio {
    pub file_id: String,
    pub filename: String,
    /// Duration in seconds
    pub duration: f64,
    /// Amplitude summary embedded in the upload response, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amplitude_summary: Option<Vec<f32>>,
    /// Artist read from the file's tags
    #[serde(default, rename = "artist")]
    pub suggested_artist: Option<String>,
    /// Title read from the file's tags
    #[serde(default, rename = "title")]
    pub suggested_title: Option<String>,
    /// Embedded cover art extracted during upload
    #[serde(default, rename = "cover_file_id")]
    pub cover_id: Option<String>,
}

/// Request body for one video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub audio_file_id: String,
    pub artist: String,
    pub title: String,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default)]
    pub cover_file_id: Option<String>,
}

impl GenerateRequest {
    /// Request for `range` of `file_id`, with blank metadata replaced by
    /// the unknown-artist/title placeholders
    pub fn new(file_id: &str, metadata: &TrackMetadata, range: TimeRange, cover_file_id: Option<String>) -> Self {
        Self {
            audio_file_id: file_id.to_string(),
            artist: metadata.resolved_artist(),
            title: metadata.resolved_title(),
            start_time: range.start as f64,
            end_time: range.end as f64,
            cover_file_id,
        }
    }
}

/// Response to a single generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedVideo {
    /// Reference to the downloadable output
    pub video_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// One entry of a service-side batch
pub type BatchSong = GenerateRequest;

/// Request body for a service-side batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchGenerateRequest {
    pub songs: Vec<BatchSong>,
    pub folder_name: String,
    /// Fallback bounds for songs without their own
    pub start_time: f64,
    pub end_time: f64,
}

/// A song the backend rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedSong {
    pub artist: String,
    pub title: String,
    pub filename: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// A song the backend refused
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedSong {
    /// Index into the request's `songs`
    pub song_index: usize,
    pub artist: String,
    pub title: String,
    pub error: String,
}

/// Response to a service-side batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchGenerateResponse {
    /// Sanitized folder the outputs were written to
    pub folder_name: String,
    #[serde(default)]
    pub processed_songs: Vec<ProcessedSong>,
    #[serde(default)]
    pub errors_list: Vec<FailedSong>,
    #[serde(default)]
    pub list_file: Option<String>,
}

/// Upload and analysis backend
pub trait AudioService {
    /// Upload an audio file and return its identifier, duration and tags
    fn upload_audio(&self, file: &AudioFile) -> impl Future<Output = Result<UploadedAudio, ServiceError>>;

    /// Normalized amplitude summary for an uploaded file
    fn fetch_waveform(&self, file_id: &str) -> impl Future<Output = Result<Vec<f32>, ServiceError>>;

    /// Upload a cover image and return its identifier
    fn upload_cover(&self, file: &CoverFile) -> impl Future<Output = Result<String, ServiceError>>;
}

/// Video generation backend
pub trait GenerationService {
    fn generate_single(&self, request: &GenerateRequest) -> impl Future<Output = Result<GeneratedVideo, ServiceError>>;

    /// Render many songs into one folder; per-song failures come back in
    /// `errors_list` rather than as an `Err`
    fn generate_batch(
        &self,
        request: &BatchGenerateRequest,
    ) -> impl Future<Output = Result<BatchGenerateResponse, ServiceError>>;
}
