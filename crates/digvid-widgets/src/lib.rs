//! Shared UI widgets for DigVid
//!
//! iced widgets that draw a track's waveform with its trim selection and
//! turn mouse input into [`digvid_core::drag::PointerEvent`]s.
//!
//! ## Architecture (iced 0.14 patterns)
//!
//! - **State structs**: Pure data (`TrimWaveformState`)
//! - **View functions**: Take state + callbacks, return `Element<Message>`
//! - **Canvas Programs**: Handle custom rendering and event-to-callback translation
//!
//! The canvas never changes the selection itself. It publishes pointer
//! events; the application feeds them to its `TrimSession` and copies the
//! resulting selection back into the state.

pub mod theme;
pub mod trim_waveform;

pub use theme::{bar_color, BACKGROUND_COLOR, HANDLE_COLOR, PLAYHEAD_COLOR, SELECTION_FILL};

pub use trim_waveform::{trim_waveform, HoverTarget, TrimInteraction, TrimWaveformState, WAVEFORM_HEIGHT};
