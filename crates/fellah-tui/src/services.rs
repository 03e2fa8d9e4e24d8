//! The services handle injected into the UI: repository, session/profile
//! store, and the speaker.

use std::sync::Arc;

use fellah_core::config::SpeechConfig;
use fellah_core::i18n::Language;
use fellah_core::repository::ApplicationRepository;
use fellah_core::storage::Database;
use fellah_speech::{Speaker, SpeechLanguage};

/// Everything the input layer needs to act on user intent.
pub struct Services {
    pub repo: Arc<dyn ApplicationRepository>,
    pub db: Database,
    speaker: Speaker,
    speech_enabled: bool,
    arabic: SpeechLanguage,
    french: SpeechLanguage,
}

impl Services {
    pub fn new(
        db: Database,
        repo: Arc<dyn ApplicationRepository>,
        speaker: Speaker,
        speech: &SpeechConfig,
    ) -> Self {
        Self {
            repo,
            db,
            speaker,
            speech_enabled: speech.enabled,
            arabic: SpeechLanguage {
                locale: Language::Ar.locale().to_string(),
                rate: speech.arabic_rate,
                name_keywords: vec!["arabic".to_string(), "عربي".to_string()],
            },
            french: SpeechLanguage {
                locale: Language::Fr.locale().to_string(),
                rate: speech.french_rate,
                name_keywords: vec!["french".to_string(), "français".to_string()],
            },
        }
    }

    pub const fn speech_enabled(&self) -> bool {
        self.speech_enabled
    }

    pub const fn speech_language(&self, lang: Language) -> &SpeechLanguage {
        match lang {
            Language::Ar => &self.arabic,
            Language::Fr => &self.french,
        }
    }

    /// Read text aloud in the given UI language. No-op when speech is
    /// disabled by configuration.
    pub async fn speak(&mut self, text: &str, lang: Language) {
        if !self.speech_enabled {
            return;
        }
        let speech_lang = match lang {
            Language::Ar => self.arabic.clone(),
            Language::Fr => self.french.clone(),
        };
        self.speaker.speak(text, &speech_lang).await;
    }

    /// Cancel any in-flight utterance.
    pub fn stop_speaking(&mut self) {
        self.speaker.stop();
    }
}
