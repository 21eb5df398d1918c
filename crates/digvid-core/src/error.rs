//! Error types for the trimming engine
//!
//! `ServiceError` describes failures reported by external collaborators
//! (upload, waveform, cover and generation services). `TrimError` is the
//! crate-level error and wraps service failures.

use crate::batch::BatchPhase;
use thiserror::Error;

/// Failures surfaced by the external services
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Audio upload rejected (non-2xx response)
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Waveform summary could not be fetched
    #[error("Waveform unavailable: {0}")]
    Waveform(String),

    /// Cover image upload rejected
    #[error("Cover upload failed: {0}")]
    Cover(String),

    /// Video generation failed for one request
    #[error("Generation failed: {0}")]
    Generation(String),

    /// The service could not be reached at all
    #[error("Service unreachable: {0}")]
    Unreachable(String),
}

impl ServiceError {
    /// Whether this failure means the service itself is gone,
    /// as opposed to a single request being refused.
    pub fn is_structural(&self) -> bool {
        matches!(self, ServiceError::Unreachable(_))
    }
}

/// Errors raised by the trimming engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrimError {
    /// Selection bounds violate `0 <= start < end <= duration`
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// File failed MIME/extension validation before upload
    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),

    /// External collaborator failure
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The media player refused to start
    #[error("Playback failed: {0}")]
    Playback(String),

    /// Batch already holds the maximum number of items
    #[error("Batch is full ({0} items max)")]
    BatchFull(usize),

    /// Operation not allowed in the current batch phase
    #[error("Operation not allowed while batch is {0:?}")]
    InvalidPhase(BatchPhase),

    /// Index out of range for the batch item list
    #[error("No batch item at index {0}")]
    NoSuchItem(usize),

    /// Generation requested with nothing queued
    #[error("Batch is empty")]
    EmptyBatch,

    /// Operation requires a loaded track
    #[error("No track loaded")]
    NoTrack,

    /// Numeric input arrived while a pointer drag owns the selection
    #[error("Selection is being dragged")]
    DragInProgress,
}

/// Result type for trimming operations
pub type Result<T> = std::result::Result<T, TrimError>;
