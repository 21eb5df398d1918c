//! Colors for the trim waveform

use iced::Color;

/// Surface background behind the bars
pub const BACKGROUND_COLOR: Color = Color::from_rgb(0.0, 0.0, 0.0);

/// Translucent band over the selected segment
pub const SELECTION_FILL: Color = Color::from_rgba(0.4, 0.49, 0.92, 0.3);

/// Selection boundary handles
pub const HANDLE_COLOR: Color = Color::from_rgb(0.4, 0.49, 0.92);

/// Current playback position
pub const PLAYHEAD_COLOR: Color = Color::from_rgb(1.0, 0.3, 0.3);

/// Width of a boundary handle stroke in pixels
pub const HANDLE_WIDTH: f32 = 3.0;

/// White bar at the given opacity
pub fn bar_color(opacity: f32) -> Color {
    Color::from_rgba(1.0, 1.0, 1.0, opacity.clamp(0.0, 1.0))
}
