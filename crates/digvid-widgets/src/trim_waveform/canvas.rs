//! Canvas Program for the trim waveform
//!
//! Draws bars, selection band, handles and playhead, and translates mouse
//! input into [`PointerEvent`]s published through the `on_pointer` callback.

use super::state::TrimWaveformState;
use crate::theme::{bar_color, BACKGROUND_COLOR, HANDLE_COLOR, HANDLE_WIDTH, PLAYHEAD_COLOR, SELECTION_FILL};
use digvid_core::drag::PointerEvent;
use iced::widget::canvas::{self, Event, Frame, Geometry, Path, Program, Stroke};
use iced::{mouse, Point, Rectangle, Size, Theme};

/// Canvas state for tracking the pressed mouse button
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimInteraction {
    /// Left button went down inside the canvas and has not been released
    pub pressed: bool,
}

/// What the cursor is over, for choosing its icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget {
    Outside,
    Handle,
    Band,
    Waveform,
}

/// Classify pixel `x` on a surface `width` wide
///
/// Uses the state's handle tolerance and the drag controller's ordering, so
/// the icon matches what a press would do.
pub fn hover_target(state: &TrimWaveformState, x: f32, width: f32) -> HoverTarget {
    if !(width > 0.0) || x < 0.0 || x > width {
        return HoverTarget::Outside;
    }
    let Some(band) = state.band() else {
        return HoverTarget::Waveform;
    };
    let (left, right) = band.to_pixels(width);
    let tolerance = state.handle_tolerance;
    if (x - left).abs() < tolerance || (x - right).abs() < tolerance {
        HoverTarget::Handle
    } else if x >= left && x <= right {
        HoverTarget::Band
    } else {
        HoverTarget::Waveform
    }
}

/// Canvas program for the waveform with a draggable selection
pub struct TrimWaveformCanvas<'a, Message, F>
where
    F: Fn(PointerEvent) -> Message,
{
    pub state: &'a TrimWaveformState,
    pub on_pointer: F,
}

impl<'a, Message, F> Program<Message> for TrimWaveformCanvas<'a, Message, F>
where
    Message: Clone,
    F: Fn(PointerEvent) -> Message,
{
    type State = TrimInteraction;

    fn update(
        &self,
        interaction: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        if !self.state.has_track() {
            return None;
        }

        match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                interaction.pressed = true;
                let event = PointerEvent::Down {
                    x: position.x,
                    width: bounds.width,
                };
                Some(canvas::Action::publish((self.on_pointer)(event)))
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) if interaction.pressed => {
                // Keep tracking outside the bounds; the controller clamps x
                let position = cursor.position()?;
                let event = PointerEvent::Move {
                    x: position.x - bounds.x,
                    width: bounds.width,
                };
                Some(canvas::Action::publish((self.on_pointer)(event)))
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) if interaction.pressed => {
                interaction.pressed = false;
                Some(canvas::Action::publish((self.on_pointer)(PointerEvent::Up)))
            }
            _ => None,
        }
    }

    fn mouse_interaction(
        &self,
        interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if interaction.pressed {
            return mouse::Interaction::Grabbing;
        }
        let Some(position) = cursor.position_in(bounds) else {
            return mouse::Interaction::default();
        };
        match hover_target(self.state, position.x, bounds.width) {
            HoverTarget::Handle => mouse::Interaction::ResizingHorizontally,
            HoverTarget::Band => mouse::Interaction::Grab,
            HoverTarget::Waveform => mouse::Interaction::Pointer,
            HoverTarget::Outside => mouse::Interaction::default(),
        }
    }

    fn draw(
        &self,
        _interaction: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), BACKGROUND_COLOR);

        if !self.state.has_track() {
            return vec![frame.into_geometry()];
        }

        let width = bounds.width;
        let height = bounds.height;

        for bar in self.state.renderer.render(&self.state.amplitudes, width, height) {
            frame.fill_rectangle(
                Point::new(bar.x, bar.y),
                Size::new(bar.width, bar.height),
                bar_color(bar.opacity),
            );
        }

        if let Some(band) = self.state.band() {
            let (left, right) = band.to_pixels(width);
            frame.fill_rectangle(Point::new(left, 0.0), Size::new(right - left, height), SELECTION_FILL);

            for x in [left, right] {
                frame.stroke(
                    &Path::line(Point::new(x, 0.0), Point::new(x, height)),
                    Stroke::default().with_color(HANDLE_COLOR).with_width(HANDLE_WIDTH),
                );
            }
        }

        if let Some(fraction) = self.state.playhead_fraction() {
            let x = fraction * width;
            frame.stroke(
                &Path::line(Point::new(x, 0.0), Point::new(x, height)),
                Stroke::default().with_color(PLAYHEAD_COLOR).with_width(2.0),
            );
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digvid_core::{TimeRange, Track};

    fn state_with(range: TimeRange) -> TrimWaveformState {
        let mut state = TrimWaveformState::new();
        state.load(&Track::new("f", "a.mp3", 100.0, vec![0.5; 10]));
        state.set_selection(range);
        state
    }

    #[test]
    fn test_hover_target_matches_hit_testing() {
        // 10px per second
        let state = state_with(TimeRange::new(20, 50));
        assert_eq!(hover_target(&state, 205.0, 1000.0), HoverTarget::Handle);
        assert_eq!(hover_target(&state, 490.0, 1000.0), HoverTarget::Handle);
        assert_eq!(hover_target(&state, 350.0, 1000.0), HoverTarget::Band);
        assert_eq!(hover_target(&state, 800.0, 1000.0), HoverTarget::Waveform);
        assert_eq!(hover_target(&state, 1200.0, 1000.0), HoverTarget::Outside);
    }

    #[test]
    fn test_hover_follows_configured_tolerance() {
        let mut state = state_with(TimeRange::new(20, 50));
        assert_eq!(hover_target(&state, 225.0, 1000.0), HoverTarget::Band);

        state.handle_tolerance = 30.0;
        assert_eq!(hover_target(&state, 225.0, 1000.0), HoverTarget::Handle);
        assert_eq!(hover_target(&state, 175.0, 1000.0), HoverTarget::Handle);
        assert_eq!(hover_target(&state, 225.0, f32::NAN), HoverTarget::Outside);
    }

    #[test]
    fn test_hover_without_selection() {
        let mut state = state_with(TimeRange::new(0, 10));
        state.selection = None;
        assert_eq!(hover_target(&state, 50.0, 1000.0), HoverTarget::Waveform);
    }
}
