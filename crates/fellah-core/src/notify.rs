//! Session-scoped notice deduplication.
//!
//! Some diagnostics (a missing speech voice, an unsupported synthesizer)
//! would otherwise fire on every user action. The `NoticeCenter` shows each
//! keyed notice once per session: it is created when a session starts and
//! dropped with it, so the suppression state never outlives the session.

use std::collections::HashSet;

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// A localized user-facing notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Per-session notice deduplication service.
#[derive(Debug, Default)]
pub struct NoticeCenter {
    seen: HashSet<String>,
}

impl NoticeCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a keyed notice. Returns the notice the first time the key is
    /// seen in this session, `None` on repeats.
    pub fn publish(&mut self, key: &str, notice: Notice) -> Option<Notice> {
        if self.seen.insert(key.to_string()) {
            Some(notice)
        } else {
            None
        }
    }

    /// Whether a key has already been published this session.
    pub fn was_published(&self, key: &str) -> bool {
        self.seen.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_publish_passes_repeats_are_suppressed() {
        let mut center = NoticeCenter::new();

        let first = center.publish("speech-ar", Notice::warning("no arabic voice"));
        assert!(first.is_some());
        assert!(center.was_published("speech-ar"));

        let repeat = center.publish("speech-ar", Notice::warning("no arabic voice"));
        assert!(repeat.is_none());
    }

    #[test]
    fn keys_are_independent() {
        let mut center = NoticeCenter::new();
        assert!(center.publish("speech-ar", Notice::warning("a")).is_some());
        assert!(center.publish("speech-fr", Notice::warning("b")).is_some());
    }

    #[test]
    fn a_new_session_starts_clean() {
        let mut center = NoticeCenter::new();
        center.publish("speech-ar", Notice::warning("a"));
        drop(center);

        let mut next_session = NoticeCenter::new();
        assert!(
            next_session
                .publish("speech-ar", Notice::warning("a"))
                .is_some()
        );
    }
}
