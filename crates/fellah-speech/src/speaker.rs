//! The speaker: single-utterance read-aloud over a [`SpeechBackend`].
//!
//! Owns the asynchronously loading voice catalog and the in-flight
//! utterance. Speaking is fire-and-forget from the UI's point of view;
//! completion and failure come back as [`SpeechEvent`]s so the UI can clear
//! its reading indicator and publish deduplicated notices.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::backend::{Outcome, SpeechBackend, Utterance};
use crate::error::SpeechError;
use crate::voice::{select_voice, SpeechLanguage, Voice};

/// Events emitted by in-flight utterances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// The utterance played to the end.
    Finished,
    /// The synthesizer is entirely unavailable on this platform.
    Unavailable,
    /// Synthesis failed for this locale (commonly: no voice installed).
    Failed { locale: String },
}

/// Speaker tuning.
#[derive(Debug, Clone)]
pub struct SpeakerConfig {
    /// Upper bound on waiting for the voice list before speaking with only
    /// a locale hint.
    pub voices_timeout: Duration,
}

impl Default for SpeakerConfig {
    fn default() -> Self {
        Self {
            voices_timeout: Duration::from_millis(1500),
        }
    }
}

/// Reads text aloud, one utterance at a time.
pub struct Speaker {
    backend: Arc<dyn SpeechBackend>,
    config: SpeakerConfig,
    voices_rx: watch::Receiver<Option<Vec<Voice>>>,
    events_tx: mpsc::UnboundedSender<SpeechEvent>,
    current: Option<oneshot::Sender<()>>,
}

impl Speaker {
    /// Create a speaker and start loading the voice catalog in the
    /// background. Returns the event stream alongside.
    pub fn new(
        backend: Arc<dyn SpeechBackend>,
        config: SpeakerConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (voices_tx, voices_rx) = watch::channel(None);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let loader_backend = Arc::clone(&backend);
        let loader_events = events_tx.clone();
        tokio::spawn(async move {
            match loader_backend.voices().await {
                Ok(voices) => {
                    info!(count = voices.len(), "Voices loaded");
                    let _ = voices_tx.send(Some(voices));
                }
                Err(SpeechError::CapabilityUnavailable(reason)) => {
                    warn!(%reason, "Speech synthesis unavailable");
                    let _ = voices_tx.send(Some(Vec::new()));
                    let _ = loader_events.send(SpeechEvent::Unavailable);
                }
                Err(e) => {
                    warn!(error = %e, "Voice listing failed");
                    let _ = voices_tx.send(Some(Vec::new()));
                }
            }
        });

        (
            Self {
                backend,
                config,
                voices_rx,
                events_tx,
                current: None,
            },
            events_rx,
        )
    }

    /// Read `text` aloud in `lang`. Empty (after trimming) text is a no-op.
    /// Any in-flight utterance is cancelled first: a new `speak` always
    /// supersedes the previous one.
    pub async fn speak(&mut self, text: &str, lang: &SpeechLanguage) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        self.stop();

        let voices = self.voices_snapshot().await;
        let voice = select_voice(&voices, lang).cloned();
        if voice.is_none() {
            debug!(locale = %lang.locale, "No matching voice, using locale hint only");
        }

        let utterance = Utterance {
            text: text.to_string(),
            locale: lang.locale.clone(),
            voice,
            rate: lang.rate,
        };

        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.current = Some(cancel_tx);

        let backend = Arc::clone(&self.backend);
        let events = self.events_tx.clone();
        let locale = lang.locale.clone();
        tokio::spawn(async move {
            match backend.speak(utterance, cancel_rx).await {
                Ok(Outcome::Completed) => {
                    let _ = events.send(SpeechEvent::Finished);
                }
                Ok(Outcome::Cancelled) => {}
                Err(SpeechError::CapabilityUnavailable(_)) => {
                    let _ = events.send(SpeechEvent::Unavailable);
                }
                Err(e) => {
                    warn!(error = %e, %locale, "Synthesis failed");
                    let _ = events.send(SpeechEvent::Failed { locale });
                }
            }
        });
    }

    /// Cancel any in-flight utterance.
    pub fn stop(&mut self) {
        if let Some(cancel) = self.current.take() {
            let _ = cancel.send(());
        }
    }

    /// Current voice catalog; waits (bounded) for the asynchronous first
    /// load, then falls back to an empty catalog.
    async fn voices_snapshot(&mut self) -> Vec<Voice> {
        let snapshot = self.voices_rx.borrow().clone();
        if let Some(voices) = snapshot {
            return voices;
        }

        let mut rx = self.voices_rx.clone();
        match tokio::time::timeout(self.config.voices_timeout, rx.wait_for(Option::is_some)).await
        {
            Ok(Ok(guard)) => guard.clone().unwrap_or_default(),
            _ => {
                debug!("Voice list not ready in time, proceeding without it");
                Vec::new()
            }
        }
    }
}
