//! DigVid Core - Time-selection engine for the DigVid video generator
//!
//! This crate holds everything between "an audio file was uploaded" and
//! "a generation request for a slice of it was sent":
//!
//! - **selection**: the trimmed segment and its invariants
//! - **waveform**: bar geometry and the selection overlay band
//! - **drag**: pointer hit-testing and the drag state machine
//! - **playback**: keeps a media player inside the selection
//! - **session**: one track's owned state, wiring the pieces together
//! - **batch**: sequential multi-file generation with per-item failures
//!
//! Nothing here depends on a GUI toolkit; see `digvid-widgets` for the
//! iced canvas that feeds pointer events into a [`session::TrimSession`].

pub mod batch;
pub mod config;
pub mod drag;
pub mod error;
pub mod format;
pub mod media;
pub mod playback;
pub mod selection;
pub mod services;
pub mod session;
pub mod types;
pub mod waveform;

pub use error::{Result, ServiceError, TrimError};
pub use types::*;
