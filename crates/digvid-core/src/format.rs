//! Display and naming helpers

use chrono::NaiveDate;

/// Folder prefix used when no configuration overrides it
pub const DEFAULT_FOLDER_PREFIX: &str = "Playlist";

/// Format seconds as `m:ss` (e.g. `65.0` -> `"1:05"`)
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() { seconds.max(0.0).floor() as u64 } else { 0 };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Keep word characters, whitespace and `-`; trim the result
pub fn sanitize_folder_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// `Playlist_YYYY-MM-DD`
pub fn default_folder_name(date: NaiveDate) -> String {
    prefixed_folder_name(DEFAULT_FOLDER_PREFIX, date)
}

/// `{prefix}_YYYY-MM-DD`
pub fn prefixed_folder_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}", prefix, date.format("%Y-%m-%d"))
}

/// Sanitized user input, or the dated default when nothing usable remains
pub fn resolve_folder_name(input: &str, today: NaiveDate) -> String {
    resolve_folder_name_with_prefix(input, DEFAULT_FOLDER_PREFIX, today)
}

pub fn resolve_folder_name_with_prefix(input: &str, prefix: &str, today: NaiveDate) -> String {
    let sanitized = sanitize_folder_name(input);
    if sanitized.is_empty() {
        prefixed_folder_name(prefix, today)
    } else {
        sanitized
    }
}
