//! Trim waveform view function

use super::canvas::TrimWaveformCanvas;
use super::state::{TrimWaveformState, WAVEFORM_HEIGHT};
use digvid_core::drag::PointerEvent;
use iced::widget::Canvas;
use iced::{Element, Length};

/// Create a trim waveform element
///
/// # Arguments
///
/// * `state` - Bars, selection and playhead to draw
/// * `on_pointer` - Called with every press, drag and release on the canvas
///
/// # Example
///
/// ```ignore
/// let waveform = trim_waveform(&self.waveform_state, Message::Pointer);
/// ```
pub fn trim_waveform<'a, Message>(
    state: &'a TrimWaveformState,
    on_pointer: impl Fn(PointerEvent) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    Canvas::new(TrimWaveformCanvas { state, on_pointer })
        .width(Length::Fill)
        .height(Length::Fixed(WAVEFORM_HEIGHT))
        .into()
}
