//! SF editor: commands, history, playback, and voice input on top of
//! [`sf_core`]'s model and [`sf_render`]'s connection geometry.

pub mod commands;
pub mod history;
pub mod playback;
pub mod voice;

pub use commands::{Editor, EditorError, InputRequest, UtteranceOutcome};
pub use history::{HISTORY_KEY, History, MemoryStore, StateStore};
pub use playback::{ADVANCE_DELAY, CancelToken, PAN_DURATION, PanTask, Playback, PlaybackState};
pub use voice::{Narrator, Utterance, VoiceCommand, interpret};
