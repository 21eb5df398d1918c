//! Waveform with a draggable trim selection
//!
//! ```ignore
//! // In your application's view function:
//! let waveform = trim_waveform(&self.waveform_state, Message::Pointer);
//!
//! // In update:
//! Message::Pointer(event) => {
//!     self.session.handle_pointer(event)?;
//!     self.waveform_state.sync_from_session(&self.session);
//! }
//! ```

mod canvas;
mod state;
mod view;

pub use canvas::{hover_target, HoverTarget, TrimInteraction, TrimWaveformCanvas};
pub use state::{TrimWaveformState, WAVEFORM_HEIGHT};
pub use view::trim_waveform;
