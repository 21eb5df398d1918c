//! Pointer drag state machine for the selection
//!
//! [`PointerDragController`] hit-tests pointer presses against the current
//! selection and turns pointer motion into proposed selection bounds. It never
//! touches the model itself: every call returns a [`DragTransition`] that the
//! owner applies through [`TimeSelectionModel::set`], which keeps the
//! controller testable without a pointer device or a player.
//!
//! ```text
//!            down near start          down near end
//!   Idle ───────────────────▶ Left   ───────────────▶ Right
//!    │  down inside band ──────────▶ Whole
//!    │  down outside band: recenter, stays Idle
//!    ◀──────────────────── up (from any state)
//! ```

use crate::config::WaveformConfig;
use crate::selection::TimeSelectionModel;

/// The two boundary handles of the selection band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Left,
    Right,
}

/// Current drag session, if any
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    DraggingLeft,
    DraggingRight,
    /// Moving the whole band; `anchor_offset` is pointer time minus start at press
    DraggingWhole { anchor_offset: f64 },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        !matches!(self, DragState::Idle)
    }
}

/// Raw pointer input against the waveform surface
///
/// `x` is relative to the surface's left edge; `width` is the surface width,
/// both in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, width: f32 },
    Move { x: f32, width: f32 },
    Up,
    /// A boundary handle was activated directly, skipping hit-testing
    HandleDown(Handle),
}

/// Outcome of feeding one pointer event to the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragTransition {
    /// A drag session opened; the selection is unchanged
    Began(DragState),
    /// Selection should become `(start, end)` as part of an ongoing drag
    Moved { start: f64, end: f64 },
    /// Click outside the band: jump the selection, no drag session
    Recenter { start: f64, end: f64 },
    /// The drag session closed
    Ended,
    /// Nothing to do
    Ignored,
}

impl DragTransition {
    /// Proposed bounds, for transitions that change the selection
    pub fn proposed_bounds(&self) -> Option<(f64, f64)> {
        match *self {
            DragTransition::Moved { start, end } | DragTransition::Recenter { start, end } => Some((start, end)),
            _ => None,
        }
    }
}

/// Default pixel tolerance around a boundary that still grabs its handle
pub const HANDLE_TOLERANCE_PX: f32 = 15.0;

/// Hit-testing and drag tracking for a single pointer
#[derive(Debug, Clone)]
pub struct PointerDragController {
    state: DragState,
    handle_tolerance: f32,
}

impl Default for PointerDragController {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerDragController {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
            handle_tolerance: HANDLE_TOLERANCE_PX,
        }
    }

    pub fn from_config(config: &WaveformConfig) -> Self {
        Self {
            state: DragState::Idle,
            handle_tolerance: config.handle_tolerance_px,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// Drop any drag session without producing a transition
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }

    /// Dispatch a pointer event
    pub fn handle_event(&mut self, event: PointerEvent, model: &TimeSelectionModel) -> DragTransition {
        match event {
            PointerEvent::Down { x, width } => self.pointer_down(x, width, model),
            PointerEvent::Move { x, width } => self.pointer_move(x, width, model),
            PointerEvent::Up => self.pointer_up(),
            PointerEvent::HandleDown(handle) => self.handle_down(handle, model),
        }
    }

    /// Press on the waveform surface at pixel `x`
    ///
    /// Handles are tested before the band so a press on a boundary always
    /// resizes rather than moves.
    pub fn pointer_down(&mut self, x: f32, width: f32, model: &TimeSelectionModel) -> DragTransition {
        if !model.is_valid() || !(width > 0.0) || !x.is_finite() {
            return DragTransition::Ignored;
        }

        let x = x.clamp(0.0, width) as f64;
        let width = width as f64;
        let duration = model.duration();
        let range = model.range();

        let left_px = range.start as f64 * width / duration;
        let right_px = range.end as f64 * width / duration;
        let tolerance = self.handle_tolerance as f64;
        let time = x * duration / width;

        self.state = if (x - left_px).abs() < tolerance {
            DragState::DraggingLeft
        } else if (x - right_px).abs() < tolerance {
            DragState::DraggingRight
        } else if x >= left_px && x <= right_px {
            DragState::DraggingWhole {
                anchor_offset: time - range.start as f64,
            }
        } else {
            let len = range.len() as f64;
            let latest_start = (model.max_end() as f64 - len).max(0.0);
            let start = (time - len / 2.0).round().min(latest_start).max(0.0);
            log::debug!("pointer_down: Recentering {}s selection at {:.2}s", range.len(), time);
            return DragTransition::Recenter { start, end: start + len };
        };

        log::debug!("pointer_down: Began {:?}", self.state);
        DragTransition::Began(self.state)
    }

    /// Direct activation of a boundary handle
    pub fn handle_down(&mut self, handle: Handle, model: &TimeSelectionModel) -> DragTransition {
        if !model.is_valid() {
            return DragTransition::Ignored;
        }
        self.state = match handle {
            Handle::Left => DragState::DraggingLeft,
            Handle::Right => DragState::DraggingRight,
        };
        DragTransition::Began(self.state)
    }

    /// Pointer motion; only meaningful while a drag session is open
    pub fn pointer_move(&mut self, x: f32, width: f32, model: &TimeSelectionModel) -> DragTransition {
        if !self.state.is_dragging() || !(width > 0.0) || !x.is_finite() {
            return DragTransition::Ignored;
        }

        let duration = model.duration();
        let time = (x.clamp(0.0, width) as f64 * duration / width as f64).clamp(0.0, duration);
        let range = model.range();
        let start = range.start as f64;
        let end = range.end as f64;
        let max_end = model.max_end() as f64;

        let (start, end) = match self.state {
            DragState::DraggingLeft => (time.round().min(end - 1.0).max(0.0), end),
            DragState::DraggingRight => (start, time.round().max(start + 1.0).min(max_end)),
            DragState::DraggingWhole { anchor_offset } => {
                let len = end - start;
                let new_start = (time - anchor_offset).round().min(max_end - len).max(0.0);
                (new_start, new_start + len)
            }
            DragState::Idle => return DragTransition::Ignored,
        };

        DragTransition::Moved { start, end }
    }

    /// Release; closes any drag session
    pub fn pointer_up(&mut self) -> DragTransition {
        if self.state.is_dragging() {
            self.state = DragState::Idle;
            DragTransition::Ended
        } else {
            DragTransition::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimeRange;

    /// 100 second track on a 1000px surface: 10px per second
    fn model_with(start: f64, end: f64) -> TimeSelectionModel {
        let mut model = TimeSelectionModel::new(100.0);
        model.set(start, end);
        model
    }

    fn apply(model: &mut TimeSelectionModel, transition: DragTransition) {
        if let Some((start, end)) = transition.proposed_bounds() {
            model.set(start, end);
        }
    }

    #[test]
    fn test_press_near_left_handle() {
        let model = model_with(20.0, 50.0);
        let mut drag = PointerDragController::new();
        assert_eq!(drag.pointer_down(210.0, 1000.0, &model), DragTransition::Began(DragState::DraggingLeft));
    }

    #[test]
    fn test_press_near_right_handle() {
        let model = model_with(20.0, 50.0);
        let mut drag = PointerDragController::new();
        assert_eq!(drag.pointer_down(489.0, 1000.0, &model), DragTransition::Began(DragState::DraggingRight));
    }

    #[test]
    fn test_left_handle_wins_when_both_in_reach() {
        let model = model_with(20.0, 21.0);
        let mut drag = PointerDragController::new();
        assert_eq!(drag.pointer_down(205.0, 1000.0, &model), DragTransition::Began(DragState::DraggingLeft));
    }

    #[test]
    fn test_press_inside_band_records_anchor() {
        let model = model_with(20.0, 50.0);
        let mut drag = PointerDragController::new();
        let transition = drag.pointer_down(300.0, 1000.0, &model);
        assert_eq!(transition, DragTransition::Began(DragState::DraggingWhole { anchor_offset: 10.0 }));
    }

    #[test]
    fn test_press_outside_band_recenters_without_session() {
        let mut model = model_with(20.0, 50.0);
        let mut drag = PointerDragController::new();

        let transition = drag.pointer_down(800.0, 1000.0, &model);
        assert_eq!(transition, DragTransition::Recenter { start: 65.0, end: 95.0 });
        assert!(!drag.is_dragging());

        apply(&mut model, transition);
        assert_eq!(model.range(), TimeRange::new(65, 95));
        assert_eq!(drag.pointer_move(900.0, 1000.0, &model), DragTransition::Ignored);
    }

    #[test]
    fn test_recenter_clamps_to_track_edges() {
        let model = model_with(40.0, 70.0);
        let mut drag = PointerDragController::new();
        assert_eq!(drag.pointer_down(20.0, 1000.0, &model), DragTransition::Recenter { start: 0.0, end: 30.0 });
        assert_eq!(drag.pointer_down(990.0, 1000.0, &model), DragTransition::Recenter { start: 70.0, end: 100.0 });
    }

    #[test]
    fn test_left_drag_stops_one_second_before_end() {
        let mut model = model_with(20.0, 50.0);
        let mut drag = PointerDragController::new();
        drag.pointer_down(200.0, 1000.0, &model);

        let transition = drag.pointer_move(900.0, 1000.0, &model);
        assert_eq!(transition, DragTransition::Moved { start: 49.0, end: 50.0 });
        apply(&mut model, transition);
        assert_eq!(model.range(), TimeRange::new(49, 50));
    }

    #[test]
    fn test_right_drag_stops_one_second_after_start() {
        let model = model_with(20.0, 50.0);
        let mut drag = PointerDragController::new();
        drag.handle_down(Handle::Right, &model);

        assert_eq!(drag.pointer_move(0.0, 1000.0, &model), DragTransition::Moved { start: 20.0, end: 21.0 });
        assert_eq!(drag.pointer_move(5000.0, 1000.0, &model), DragTransition::Moved { start: 20.0, end: 100.0 });
    }

    #[test]
    fn test_whole_drag_preserves_width() {
        let mut model = model_with(20.0, 50.0);
        let mut drag = PointerDragController::new();
        drag.pointer_down(300.0, 1000.0, &model);

        for x in [350.0, 520.0, 130.0, 0.0, 999.0, 610.0] {
            let transition = drag.pointer_move(x, 1000.0, &model);
            apply(&mut model, transition);
            assert_eq!(model.selection_duration(), 30);
            assert!(model.end() <= 100);
        }
        assert_eq!(model.range(), TimeRange::new(51, 81));
    }

    #[test]
    fn test_whole_drag_clamps_start_not_width() {
        let mut model = model_with(60.0, 90.0);
        let mut drag = PointerDragController::new();
        drag.pointer_down(700.0, 1000.0, &model);

        let transition = drag.pointer_move(1000.0, 1000.0, &model);
        apply(&mut model, transition);
        assert_eq!(model.range(), TimeRange::new(70, 100));

        let transition = drag.pointer_move(0.0, 1000.0, &model);
        apply(&mut model, transition);
        assert_eq!(model.range(), TimeRange::new(0, 30));
    }

    #[test]
    fn test_nan_width_is_ignored() {
        let model = model_with(20.0, 50.0);
        let mut drag = PointerDragController::new();
        assert_eq!(drag.pointer_down(10.0, f32::NAN, &model), DragTransition::Ignored);
        assert!(!drag.is_dragging());

        drag.handle_down(Handle::Right, &model);
        assert_eq!(drag.pointer_move(10.0, f32::NAN, &model), DragTransition::Ignored);
        assert_eq!(drag.pointer_move(10.0, 0.0, &model), DragTransition::Ignored);
        assert!(drag.is_dragging());
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let model = model_with(20.0, 50.0);
        let mut drag = PointerDragController::new();
        assert_eq!(drag.pointer_move(400.0, 1000.0, &model), DragTransition::Ignored);
    }

    #[test]
    fn test_release_returns_to_idle() {
        let model = model_with(20.0, 50.0);
        let mut drag = PointerDragController::new();
        drag.pointer_down(300.0, 1000.0, &model);
        assert_eq!(drag.pointer_up(), DragTransition::Ended);
        assert_eq!(drag.state(), DragState::Idle);
        assert_eq!(drag.pointer_up(), DragTransition::Ignored);
    }

    #[test]
    fn test_sub_second_track_ignores_presses() {
        let model = TimeSelectionModel::new(0.5);
        let mut drag = PointerDragController::new();
        assert_eq!(drag.pointer_down(10.0, 100.0, &model), DragTransition::Ignored);
        assert_eq!(drag.handle_down(Handle::Left, &model), DragTransition::Ignored);
    }
}
