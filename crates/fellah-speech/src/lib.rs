//! Fellah Speech Library
//!
//! Read-aloud support for the Fellah UI:
//! - `SpeechBackend` abstraction over a platform synthesizer, with a
//!   default backend driving an external espeak-ng-compatible program
//! - Voice-selection policy (exact locale, language prefix, name keyword,
//!   locale-hint fallback)
//! - `Speaker` with single-utterance discipline and a bounded wait for the
//!   asynchronously loading voice catalog

pub mod backend;
pub mod error;
pub mod speaker;
pub mod voice;

pub use backend::{CommandBackend, Outcome, SpeechBackend, Utterance};
pub use error::{Result, SpeechError};
pub use speaker::{Speaker, SpeakerConfig, SpeechEvent};
pub use voice::{select_voice, SpeechLanguage, Voice};
