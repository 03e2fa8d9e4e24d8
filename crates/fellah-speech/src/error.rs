//! Error types for the speech helper.

use thiserror::Error;

/// Result type alias using [`SpeechError`].
pub type Result<T> = std::result::Result<T, SpeechError>;

/// Speech failures. None of these are fatal: the UI degrades to "nothing is
/// read aloud" plus at most one localized notice per session.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The platform synthesizer is entirely unavailable (program missing or
    /// not executable).
    #[error("speech synthesis unavailable: {0}")]
    CapabilityUnavailable(String),

    /// Synthesis started but failed for the requested locale, commonly
    /// because no matching voice is installed.
    #[error("synthesis failed for locale {locale}")]
    Synthesis { locale: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
