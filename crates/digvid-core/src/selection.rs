//! Trimmed-segment model
//!
//! [`TimeSelectionModel`] owns the `[start, end]` window of one track and is
//! the only place the selection invariants are enforced. Both the pointer
//! drag path and numeric input go through [`TimeSelectionModel::set`].
//!
//! After any accepted `set`:
//! - `0 <= start < end <= floor(duration)`
//! - `end - start >= 1`
//!
//! Tracks shorter than one second cannot hold a selection; `set` is a no-op
//! for them and the model keeps the empty range `(0, 0)`.

use crate::error::{Result, TrimError};
use crate::types::{max_end_for, TimeRange, DEFAULT_SELECTION_SECS, MIN_SELECTION_SECS};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Selection bounds for one track, with change notification
#[derive(Debug)]
pub struct TimeSelectionModel {
    duration: f64,
    range: TimeRange,
    subscribers: Vec<Sender<TimeRange>>,
}

impl TimeSelectionModel {
    /// Create a model with the default 30 second segment
    pub fn new(duration: f64) -> Self {
        Self::with_default_length(duration, DEFAULT_SELECTION_SECS)
    }

    /// Create a model whose initial segment is `(0, min(length, duration))`
    pub fn with_default_length(duration: f64, length: u32) -> Self {
        let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        let max_end = max_end_for(duration);
        let range = if max_end >= MIN_SELECTION_SECS {
            TimeRange::new(0, length.max(MIN_SELECTION_SECS).min(max_end))
        } else {
            TimeRange::default()
        };

        Self {
            duration,
            range,
            subscribers: Vec::new(),
        }
    }

    /// Track duration in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Current selection
    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn start(&self) -> u32 {
        self.range.start
    }

    pub fn end(&self) -> u32 {
        self.range.end
    }

    /// Largest whole second the selection may end on
    pub fn max_end(&self) -> u32 {
        max_end_for(self.duration)
    }

    /// Whether the track is long enough to hold a selection at all
    pub fn is_valid(&self) -> bool {
        self.max_end() >= MIN_SELECTION_SECS && !self.range.is_empty()
    }

    /// Selected length in seconds
    pub fn selection_duration(&self) -> u32 {
        self.range.len()
    }

    /// Position of `time` as a percentage of the track, clamped to 0..=100
    pub fn as_percent(&self, time: f64) -> f64 {
        if self.duration <= 0.0 || !time.is_finite() {
            return 0.0;
        }
        (time / self.duration).clamp(0.0, 1.0) * 100.0
    }

    /// Set both bounds, rounding and clamping into a valid segment
    ///
    /// Returns the stored range when accepted, or `None` if the track is too
    /// short to hold a selection (model unchanged). Subscribers are notified
    /// only when the stored range actually changes.
    pub fn set(&mut self, start: f64, end: f64) -> Option<TimeRange> {
        let max_end = self.max_end();
        if max_end < MIN_SELECTION_SECS {
            log::debug!("set: Track too short ({:.2}s), ignoring", self.duration);
            return None;
        }

        let max_end = max_end as f64;
        let min_len = MIN_SELECTION_SECS as f64;
        let start = finite_or_zero(start).round().min(max_end - min_len).max(0.0);
        let end = finite_or_zero(end).round().min(max_end).max(start + min_len);

        let next = TimeRange::new(start as u32, end as u32);
        if next != self.range {
            self.range = next;
            self.notify();
        }
        Some(next)
    }

    /// Register a change listener
    ///
    /// The receiver gets every range stored from now on. Dropping the
    /// receiver unsubscribes it.
    pub fn subscribe(&mut self) -> Receiver<TimeRange> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self) {
        let range = self.range;
        self.subscribers.retain(|tx| tx.send(range).is_ok());
    }
}

/// Check a range against a track before it is sent for generation
///
/// Requires `end > start` and `end <= duration`.
pub fn validate_bounds(range: TimeRange, duration: f64) -> Result<()> {
    if range.end <= range.start {
        return Err(TrimError::InvalidSelection(format!(
            "end ({}s) must be greater than start ({}s)",
            range.end, range.start
        )));
    }
    if range.end as f64 > duration {
        return Err(TrimError::InvalidSelection(format!(
            "end ({}s) exceeds track duration ({:.2}s)",
            range.end, duration
        )));
    }
    Ok(())
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariants(model: &TimeSelectionModel) {
        let r = model.range();
        assert!(r.start < r.end, "start {} must be < end {}", r.start, r.end);
        assert!(r.end as f64 <= model.duration());
        assert!(r.len() >= MIN_SELECTION_SECS);
    }

    #[test]
    fn test_default_selection_for_long_track() {
        let model = TimeSelectionModel::new(120.0);
        assert_eq!(model.range(), TimeRange::new(0, 30));
    }

    #[test]
    fn test_default_selection_for_short_track() {
        let model = TimeSelectionModel::new(12.7);
        assert_eq!(model.range(), TimeRange::new(0, 12));
        assert_invariants(&model);
    }

    #[test]
    fn test_sub_second_track_rejects_set() {
        let mut model = TimeSelectionModel::new(0.6);
        assert!(!model.is_valid());
        assert_eq!(model.set(0.0, 1.0), None);
        assert_eq!(model.range(), TimeRange::default());
    }

    #[test]
    fn test_set_rounds_to_whole_seconds() {
        let mut model = TimeSelectionModel::new(120.0);
        assert_eq!(model.set(10.4, 39.6), Some(TimeRange::new(10, 40)));
    }

    #[test]
    fn test_set_clamps_into_bounds() {
        let mut model = TimeSelectionModel::new(60.0);

        assert_eq!(model.set(-5.0, 500.0), Some(TimeRange::new(0, 60)));
        assert_eq!(model.set(70.0, 80.0), Some(TimeRange::new(59, 60)));
        assert_eq!(model.set(30.0, 10.0), Some(TimeRange::new(30, 31)));
        assert_eq!(model.set(20.0, 20.0), Some(TimeRange::new(20, 21)));
    }

    #[test]
    fn test_set_invariants_hold_over_input_grid() {
        let mut model = TimeSelectionModel::new(45.5);
        let values = [-100.0, -0.5, 0.0, 0.49, 1.0, 22.5, 44.6, 45.0, 45.5, 46.0, 1e9, f64::INFINITY, f64::NAN];
        for &start in &values {
            for &end in &values {
                assert!(model.set(start, end).is_some());
                assert_invariants(&model);
            }
        }
    }

    #[test]
    fn test_validate_bounds() {
        assert!(validate_bounds(TimeRange::new(0, 30), 30.0).is_ok());
        assert!(validate_bounds(TimeRange::new(10, 10), 60.0).is_err());
        assert!(validate_bounds(TimeRange::new(10, 31), 30.5).is_err());
    }

    #[test]
    fn test_nan_is_treated_as_zero() {
        let mut model = TimeSelectionModel::new(100.0);
        assert_eq!(model.set(f64::NAN, 20.0), Some(TimeRange::new(0, 20)));
    }

    #[test]
    fn test_as_percent_clamps() {
        let model = TimeSelectionModel::new(200.0);
        assert_eq!(model.as_percent(50.0), 25.0);
        assert_eq!(model.as_percent(-10.0), 0.0);
        assert_eq!(model.as_percent(400.0), 100.0);
    }

    #[test]
    fn test_subscribers_receive_changes_only() {
        let mut model = TimeSelectionModel::new(120.0);
        let rx = model.subscribe();

        model.set(5.0, 15.0);
        model.set(5.0, 15.0);
        model.set(6.0, 15.0);

        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(received, vec![TimeRange::new(5, 15), TimeRange::new(6, 15)]);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut model = TimeSelectionModel::new(120.0);
        let rx = model.subscribe();
        drop(rx);
        let live = model.subscribe();

        model.set(1.0, 2.0);
        assert_eq!(model.subscribers.len(), 1);
        assert_eq!(live.try_recv().unwrap(), TimeRange::new(1, 2));
    }
}
