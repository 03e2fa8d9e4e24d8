//! Headless mode: the TUI's operations as scriptable subcommands.
//!
//! Records are printed as JSON; failures exit non-zero with a localized
//! message on stderr.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Subcommand;
use serde::Serialize;

use fellah_core::chat;
use fellah_core::config::SpeechConfig;
use fellah_core::i18n::{error_message, tr, Language, Text};
use fellah_core::model::{ApplicationDraft, BankType, DocumentCategory, FileMeta, Solution};
use fellah_core::repository::ApplicationRepository;
use fellah_speech::{CommandBackend, Speaker, SpeakerConfig, SpeechEvent, SpeechLanguage};

/// Scriptable operations.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a farmer application (replaces any prior one for the same
    /// email and track)
    Submit {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        cin: String,
        /// Financing track: 1 (land loan) or 2 (equipment)
        #[arg(long)]
        solution: i64,
        /// National-ID scan files
        #[arg(long = "cin-file")]
        cin_files: Vec<PathBuf>,
        /// Land-paper files
        #[arg(long = "land-file")]
        land_files: Vec<PathBuf>,
        /// Proof-of-exploitation files
        #[arg(long = "proof-file")]
        proof_files: Vec<PathBuf>,
        /// Expert-report files (optional)
        #[arg(long = "expert-file")]
        expert_files: Vec<PathBuf>,
    },
    /// List applications reviewed by a bank type
    List {
        /// Bank type: normal or islamic
        #[arg(long)]
        bank: String,
    },
    /// Approve a pending application
    Approve { id: String },
    /// Reject a pending application
    Reject { id: String },
    /// Ask the scripted legal advisor a question
    Ask {
        /// Financing track context: 1 or 2
        #[arg(long, default_value_t = 1)]
        solution: i64,
        question: String,
    },
    /// Read text aloud through the configured synthesizer
    Speak { text: String },
}

/// Execute one subcommand.
pub async fn run(
    command: Command,
    repo: Arc<dyn ApplicationRepository>,
    language: Language,
    speech: &SpeechConfig,
) -> anyhow::Result<()> {
    match command {
        Command::Submit {
            email,
            name,
            cin,
            solution,
            cin_files,
            land_files,
            proof_files,
            expert_files,
        } => {
            let solution = Solution::from_i64(solution)
                .with_context(|| format!("unknown solution {solution}, expected 1 or 2"))?;
            let mut draft = ApplicationDraft::new(email, name, cin, solution);
            for (category, paths) in [
                (DocumentCategory::Cin, &cin_files),
                (DocumentCategory::LandPapers, &land_files),
                (DocumentCategory::ProofOfExploitation, &proof_files),
                (DocumentCategory::ExpertReport, &expert_files),
            ] {
                for path in paths {
                    let meta = FileMeta::from_path(path)
                        .with_context(|| format!("cannot read {}", path.display()))?;
                    draft.add_file(category, meta);
                }
            }

            match repo.submit(draft).await {
                Ok(record) => print_json(&record),
                Err(e) => bail!(error_message(language, &e)),
            }
        }
        Command::List { bank } => {
            let bank_type = BankType::parse(&bank)
                .with_context(|| format!("unknown bank type {bank:?}, expected normal or islamic"))?;
            let records = repo
                .list_for(bank_type)
                .await
                .map_err(|e| anyhow::anyhow!(error_message(language, &e)))?;
            print_json(&records)
        }
        Command::Approve { id } => match repo.approve(&id).await {
            Ok(record) => print_json(&record),
            Err(e) => bail!(error_message(language, &e)),
        },
        Command::Reject { id } => match repo.reject(&id).await {
            Ok(record) => print_json(&record),
            Err(e) => bail!(error_message(language, &e)),
        },
        Command::Ask { solution, question } => {
            let _track = Solution::from_i64(solution)
                .with_context(|| format!("unknown solution {solution}, expected 1 or 2"))?;
            print_text(chat::answer(language, &question))
        }
        Command::Speak { text } => speak(&text, language, speech).await,
    }
}

/// Speak once and wait for the outcome.
async fn speak(text: &str, language: Language, speech: &SpeechConfig) -> anyhow::Result<()> {
    let backend = Arc::new(CommandBackend::new(&speech.program));
    let (mut speaker, mut events) = Speaker::new(
        backend,
        SpeakerConfig {
            voices_timeout: Duration::from_millis(speech.voices_timeout_ms),
        },
    );

    let speech_language = SpeechLanguage {
        locale: language.locale().to_string(),
        rate: match language {
            Language::Ar => speech.arabic_rate,
            Language::Fr => speech.french_rate,
        },
        name_keywords: match language {
            Language::Ar => vec!["arabic".to_string(), "عربي".to_string()],
            Language::Fr => vec!["french".to_string(), "français".to_string()],
        },
    };

    speaker.speak(text, &speech_language).await;
    if text.trim().is_empty() {
        return Ok(());
    }

    while let Some(event) = events.recv().await {
        match event {
            SpeechEvent::Finished => return Ok(()),
            SpeechEvent::Unavailable => bail!(tr(language, Text::SpeechUnavailable).to_string()),
            SpeechEvent::Failed { .. } => bail!(tr(language, Text::SpeechFailed).to_string()),
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_text(text: &str) -> anyhow::Result<()> {
    println!("{text}");
    Ok(())
}
