//! Platform synthesizer abstraction.
//!
//! The default backend drives an external espeak-ng-compatible program as a
//! child process; tests substitute a scripted backend behind the same trait.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::oneshot;
use tracing::debug;

use crate::error::{Result, SpeechError};
use crate::voice::Voice;

/// One utterance to synthesize.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub text: String,
    /// Locale hint, always set -- it shifts pronunciation in many engines
    /// even when no dedicated voice was found.
    pub locale: String,
    /// Selected voice, if the selection policy found one.
    pub voice: Option<Voice>,
    /// Words per minute.
    pub rate: u32,
}

/// How an utterance ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Cancelled,
}

/// A platform speech synthesizer.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Enumerate installed voices. May take a while on first call; the
    /// speaker treats the list as loading asynchronously.
    async fn voices(&self) -> Result<Vec<Voice>>;

    /// Synthesize one utterance. Resolves when playback finishes, or with
    /// [`Outcome::Cancelled`] when `cancel` fires first.
    async fn speak(&self, utterance: Utterance, cancel: oneshot::Receiver<()>) -> Result<Outcome>;
}

/// Backend driving an external synthesizer program.
pub struct CommandBackend {
    program: PathBuf,
}

impl CommandBackend {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl SpeechBackend for CommandBackend {
    async fn voices(&self) -> Result<Vec<Voice>> {
        let output = Command::new(&self.program)
            .arg("--voices")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| map_spawn_error(&self.program, e))?;

        if !output.status.success() {
            return Err(SpeechError::CapabilityUnavailable(format!(
                "{} --voices exited with {}",
                self.program.display(),
                output.status
            )));
        }

        Ok(parse_voice_listing(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn speak(&self, utterance: Utterance, cancel: oneshot::Receiver<()>) -> Result<Outcome> {
        // Prefer the selected voice's name; fall back to the bare locale
        // hint, which espeak-style engines accept as a voice specifier.
        let voice_arg = utterance
            .voice
            .as_ref()
            .map_or_else(|| utterance.locale.to_ascii_lowercase(), |v| v.name.clone());

        let mut child = Command::new(&self.program)
            .arg("-v")
            .arg(&voice_arg)
            .arg("-s")
            .arg(utterance.rate.to_string())
            .arg("--")
            .arg(&utterance.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| map_spawn_error(&self.program, e))?;

        debug!(voice = %voice_arg, rate = utterance.rate, "Synthesis started");

        // Race playback against cancellation; the wait future is dropped
        // before the child is killed.
        let waited = {
            let wait = child.wait();
            tokio::pin!(wait);
            tokio::select! {
                biased;
                _ = cancel => None,
                status = &mut wait => Some(status),
            }
        };

        match waited {
            None => {
                let _ = child.kill().await;
                Ok(Outcome::Cancelled)
            }
            Some(status) => {
                let status = status?;
                if status.success() {
                    Ok(Outcome::Completed)
                } else {
                    Err(SpeechError::Synthesis {
                        locale: utterance.locale,
                    })
                }
            }
        }
    }
}

fn map_spawn_error(program: &std::path::Path, error: std::io::Error) -> SpeechError {
    match error.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
            SpeechError::CapabilityUnavailable(format!("{}: {}", program.display(), error))
        }
        _ => SpeechError::Io(error),
    }
}

/// Parse an espeak-ng `--voices` listing: a header line, then rows of
/// `Pty Language Age/Gender VoiceName File ...`. Malformed rows are skipped.
fn parse_voice_listing(output: &str) -> Vec<Voice> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 4 || cols[0].parse::<u32>().is_err() {
                return None;
            }
            Some(Voice {
                locale: cols[1].to_string(),
                name: cols[3].to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  ar              --/M      arabic             roa/ar
 5  fr-FR           --/M      french             roa/fr
 5  fr-BE           --/M      french-belgium     roa/fr-BE
";

    #[test]
    fn listing_parses_locale_and_name_columns() {
        let voices = parse_voice_listing(LISTING);
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[0].locale, "ar");
        assert_eq!(voices[0].name, "arabic");
        assert_eq!(voices[1].locale, "fr-FR");
        assert_eq!(voices[1].name, "french");
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let voices = parse_voice_listing("header\nnot a voice row\n 5  ar  --/M  arabic  roa/ar\n");
        assert_eq!(voices.len(), 1);
    }

    #[test]
    fn empty_listing_is_empty() {
        assert!(parse_voice_listing("").is_empty());
        assert!(parse_voice_listing("Pty Language\n").is_empty());
    }

    #[tokio::test]
    async fn missing_program_is_capability_unavailable() {
        let backend = CommandBackend::new("/nonexistent/fellah-synth");
        assert!(matches!(
            backend.voices().await,
            Err(SpeechError::CapabilityUnavailable(_))
        ));

        let (_cancel_tx, cancel_rx) = oneshot::channel();
        let utterance = Utterance {
            text: "hello".to_string(),
            locale: "fr-FR".to_string(),
            voice: None,
            rate: 150,
        };
        assert!(matches!(
            backend.speak(utterance, cancel_rx).await,
            Err(SpeechError::CapabilityUnavailable(_))
        ));
    }
}
