//! Local files picked by the user
//!
//! Files are checked here before anything is uploaded. A file passes if
//! either its reported MIME type or its extension looks right; browsers and
//! file pickers often report an empty or generic type.

use crate::error::{Result, TrimError};
use std::path::{Path, PathBuf};

/// Extensions accepted as audio regardless of the reported MIME type
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "m4a", "ogg", "aac", "mp4"];

/// Extensions accepted as cover images
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp"];

/// An audio file selected for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    /// Display name, usually the file name
    pub name: String,
    /// Reported MIME type (may be empty)
    pub mime_type: String,
    pub path: PathBuf,
}

impl AudioFile {
    /// Describe the file at `path`, taking the display name from it
    pub fn from_path(path: impl Into<PathBuf>, mime_type: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: display_name(&path),
            mime_type: mime_type.into(),
            path,
        }
    }

    /// Reject anything that is neither an audio/video MIME type nor a
    /// known audio extension
    pub fn validate(&self) -> Result<()> {
        let mime_ok = self.mime_type.starts_with("audio/") || self.mime_type.starts_with("video/");
        if mime_ok || has_extension(&self.name, AUDIO_EXTENSIONS) || has_extension_path(&self.path, AUDIO_EXTENSIONS) {
            return Ok(());
        }
        Err(TrimError::UnsupportedFile(format!(
            "{}: expected one of {}",
            self.name,
            AUDIO_EXTENSIONS.join(", ")
        )))
    }
}

/// A cover image selected for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverFile {
    pub name: String,
    pub mime_type: String,
    pub path: PathBuf,
}

impl CoverFile {
    pub fn from_path(path: impl Into<PathBuf>, mime_type: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: display_name(&path),
            mime_type: mime_type.into(),
            path,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.mime_type.starts_with("image/")
            || has_extension(&self.name, IMAGE_EXTENSIONS)
            || has_extension_path(&self.path, IMAGE_EXTENSIONS)
        {
            return Ok(());
        }
        Err(TrimError::UnsupportedFile(format!("{}: not an image", self.name)))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

fn has_extension(name: &str, allowed: &[&str]) -> bool {
    has_extension_path(Path::new(name), allowed)
}

fn has_extension_path(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| allowed.iter().any(|a| ext.eq_ignore_ascii_case(a)))
        .unwrap_or(false)
}
