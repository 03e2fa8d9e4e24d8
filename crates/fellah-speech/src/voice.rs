//! Installed voices and the voice-selection policy.

/// An installed synthesizer voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Name the synthesizer addresses the voice by.
    pub name: String,
    /// BCP-47-ish locale the voice speaks (`ar`, `ar-SA`, `fr-FR`, ...).
    pub locale: String,
}

/// What the speaker needs to know about a UI language.
#[derive(Debug, Clone)]
pub struct SpeechLanguage {
    /// Locale hint passed to the synthesizer even when no voice matches;
    /// many engines shift pronunciation on the hint alone.
    pub locale: String,
    /// Speaking rate in words per minute.
    pub rate: u32,
    /// Lowercased substrings matched against voice names as a last resort
    /// (e.g. "arabic", "عربي").
    pub name_keywords: Vec<String>,
}

impl SpeechLanguage {
    /// The bare language tag of the locale hint (`ar` for `ar-SA`).
    pub fn language_tag(&self) -> &str {
        self.locale.split(['-', '_']).next().unwrap_or(&self.locale)
    }
}

/// Pick a voice for a language, in priority order:
/// 1. exact locale match;
/// 2. language-prefix match;
/// 3. name substring match against the language keywords;
/// 4. none -- the utterance then carries only the locale hint.
pub fn select_voice<'a>(voices: &'a [Voice], lang: &SpeechLanguage) -> Option<&'a Voice> {
    let wanted = lang.locale.to_ascii_lowercase();
    if let Some(voice) = voices
        .iter()
        .find(|v| v.locale.to_ascii_lowercase() == wanted)
    {
        return Some(voice);
    }

    let tag = lang.language_tag().to_ascii_lowercase();
    if let Some(voice) = voices.iter().find(|v| {
        let locale = v.locale.to_ascii_lowercase();
        locale == tag || locale.starts_with(&format!("{tag}-")) || locale.starts_with(&format!("{tag}_"))
    }) {
        return Some(voice);
    }

    voices.iter().find(|v| {
        let name = v.name.to_lowercase();
        lang.name_keywords.iter().any(|kw| name.contains(kw.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(name: &str, locale: &str) -> Voice {
        Voice {
            name: name.to_string(),
            locale: locale.to_string(),
        }
    }

    fn arabic() -> SpeechLanguage {
        SpeechLanguage {
            locale: "ar-SA".to_string(),
            rate: 130,
            name_keywords: vec!["arabic".to_string(), "عربي".to_string()],
        }
    }

    #[test]
    fn exact_locale_wins_over_prefix() {
        let voices = vec![voice("ar-generic", "ar"), voice("ar-saudi", "ar-SA")];
        assert_eq!(
            select_voice(&voices, &arabic()).map(|v| v.name.as_str()),
            Some("ar-saudi")
        );
    }

    #[test]
    fn language_prefix_is_second_choice() {
        let voices = vec![voice("french", "fr-FR"), voice("egyptian", "ar-EG")];
        assert_eq!(
            select_voice(&voices, &arabic()).map(|v| v.name.as_str()),
            Some("egyptian")
        );
    }

    #[test]
    fn prefix_match_does_not_cross_languages() {
        // "ar" must not match a locale that merely contains it.
        let voices = vec![voice("argentinian spanish", "es-AR")];
        assert_eq!(select_voice(&voices, &arabic()), None);
    }

    #[test]
    fn name_keyword_is_the_last_resort() {
        let voices = vec![
            voice("french", "fr-FR"),
            voice("Microsoft Arabic Desktop", "und"),
        ];
        assert_eq!(
            select_voice(&voices, &arabic()).map(|v| v.name.as_str()),
            Some("Microsoft Arabic Desktop")
        );
    }

    #[test]
    fn no_match_yields_none() {
        let voices = vec![voice("french", "fr-FR"), voice("german", "de-DE")];
        assert_eq!(select_voice(&voices, &arabic()), None);
        assert_eq!(select_voice(&[], &arabic()), None);
    }

    #[test]
    fn language_tag_strips_region() {
        assert_eq!(arabic().language_tag(), "ar");
        let plain = SpeechLanguage {
            locale: "fr".to_string(),
            rate: 150,
            name_keywords: Vec::new(),
        };
        assert_eq!(plain.language_tag(), "fr");
    }
}
