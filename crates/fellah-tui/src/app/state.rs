//! Application state and types.

use fellah_core::chat;
use fellah_core::i18n::{category_label, status_label, tr, Language, Text};
use fellah_core::model::{
    ApplicationDraft, ApplicationRecord, BankType, DocumentCategory, Session, Solution,
};
use fellah_core::notify::{Notice, NoticeCenter};
use fellah_speech::SpeechEvent;

/// Which screen is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    FarmerSolutions,
    FarmerLogin,
    FarmerDashboard,
    BankerLogin,
    BankerDashboard,
}

/// A text field of a login form.
#[derive(Debug, Clone)]
pub struct FormField {
    /// Stable key matching validation error fields.
    pub key: &'static str,
    pub label: Text,
    pub value: String,
}

/// Focusable form state.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub fields: Vec<FormField>,
    pub focus: usize,
}

impl FormState {
    pub fn farmer_login() -> Self {
        Self {
            fields: vec![
                FormField {
                    key: "farmer_email",
                    label: Text::Email,
                    value: String::new(),
                },
                FormField {
                    key: "farmer_name",
                    label: Text::FullName,
                    value: String::new(),
                },
                FormField {
                    key: "cin",
                    label: Text::CinLabel,
                    value: String::new(),
                },
            ],
            focus: 0,
        }
    }

    pub fn banker_login() -> Self {
        Self {
            fields: vec![FormField {
                key: "email",
                label: Text::Email,
                value: String::new(),
            }],
            focus: 0,
        }
    }

    pub fn value(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map_or("", |f| f.value.as_str())
    }

    pub fn focused_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.focus)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }
}

/// One message in the chat transcript.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub from_user: bool,
    pub text: String,
}

/// State of the legal-advisor chat popup.
#[derive(Debug, Clone)]
pub struct ChatState {
    pub solution: Solution,
    pub messages: Vec<ChatMessage>,
    pub input: String,
    /// Highlighted standard question, if navigating the quick picks.
    pub question_index: Option<usize>,
}

impl ChatState {
    pub fn open(language: Language, solution: Solution) -> Self {
        Self {
            solution,
            messages: vec![ChatMessage {
                from_user: false,
                text: chat::welcome(language, solution).to_string(),
            }],
            input: String::new(),
            question_index: None,
        }
    }

    /// Send a question: the typed input if non-empty, otherwise the
    /// highlighted standard question. Appends question and scripted answer.
    pub fn send(&mut self, language: Language) {
        let question = if self.input.trim().is_empty() {
            let questions = chat::standard_questions(language, self.solution);
            match self.question_index.and_then(|i| questions.get(i)) {
                Some(q) => (*q).to_string(),
                None => return,
            }
        } else {
            self.input.trim().to_string()
        };

        let answer = chat::answer(language, &question).to_string();
        self.messages.push(ChatMessage {
            from_user: true,
            text: question,
        });
        self.messages.push(ChatMessage {
            from_user: false,
            text: answer,
        });
        self.input.clear();
        self.question_index = None;
    }
}

/// Sub-mode of the farmer dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardMode {
    Browse,
    /// Typing a file path to attach to the selected category.
    PathInput,
}

/// TUI application state.
pub struct App {
    pub language: Language,
    pub screen: Screen,
    pub should_quit: bool,
    /// Last notice shown in the status bar.
    pub status: Option<Notice>,
    /// Session-scoped notice deduplication; recreated on login and logout.
    pub notices: NoticeCenter,

    /// Selection index on menu screens (home, solutions, bank pick).
    pub menu_index: usize,
    pub form: FormState,

    pub session: Option<Session>,
    pub selected_solution: Option<Solution>,
    pub selected_bank: Option<BankType>,

    /// The farmer's submitted record for the chosen track, if any.
    pub farmer_record: Option<ApplicationRecord>,
    /// The draft being assembled on the farmer dashboard.
    pub draft: Option<ApplicationDraft>,
    pub draft_category: usize,
    pub dashboard_mode: DashboardMode,
    pub path_input: String,

    /// Applications listed on the banker dashboard.
    pub applications: Vec<ApplicationRecord>,
    pub banker_index: usize,

    pub chat: Option<ChatState>,
    pub reading: bool,
}

impl App {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            screen: Screen::Home,
            should_quit: false,
            status: None,
            notices: NoticeCenter::new(),
            menu_index: 0,
            form: FormState::default(),
            session: None,
            selected_solution: None,
            selected_bank: None,
            farmer_record: None,
            draft: None,
            draft_category: 0,
            dashboard_mode: DashboardMode::Browse,
            path_input: String::new(),
            applications: Vec::new(),
            banker_index: 0,
            chat: None,
            reading: false,
        }
    }

    pub fn toggle_language(&mut self) {
        self.language = self.language.toggled();
    }

    pub fn set_status(&mut self, notice: Notice) {
        self.status = Some(notice);
    }

    /// Publish a deduplicated notice; repeats within the session are dropped.
    pub fn publish_once(&mut self, key: &str, notice: Notice) {
        if let Some(notice) = self.notices.publish(key, notice) {
            self.status = Some(notice);
        }
    }

    /// Start a fresh session scope: clears the notice dedup state and any
    /// lingering status line.
    pub fn reset_session_scope(&mut self) {
        self.notices = NoticeCenter::new();
        self.status = None;
    }

    pub fn handle_speech_event(&mut self, event: SpeechEvent) {
        match event {
            SpeechEvent::Finished => {
                self.reading = false;
            }
            SpeechEvent::Unavailable => {
                self.reading = false;
                let text = tr(self.language, Text::SpeechUnavailable).to_string();
                self.publish_once("speech-unavailable", Notice::warning(text));
            }
            SpeechEvent::Failed { locale } => {
                self.reading = false;
                let text = tr(self.language, Text::SpeechFailed).to_string();
                self.publish_once(&format!("speech-failed-{locale}"), Notice::warning(text));
            }
        }
    }

    /// The currently selected record on the banker dashboard.
    pub fn selected_application(&self) -> Option<&ApplicationRecord> {
        self.applications.get(self.banker_index)
    }

    /// The document category row selected on the farmer dashboard.
    pub fn selected_category(&self) -> DocumentCategory {
        DocumentCategory::ALL[self.draft_category.min(DocumentCategory::ALL.len() - 1)]
    }

    /// Text read aloud for the whole active screen (the "read all" region).
    pub fn read_all_text(&self) -> String {
        let lang = self.language;
        let mut parts: Vec<String> = vec![tr(lang, Text::AppTitle).to_string()];

        match self.screen {
            Screen::Home => {
                parts.push(tr(lang, Text::ChooseRole).to_string());
                parts.push(tr(lang, Text::FarmerRole).to_string());
                parts.push(tr(lang, Text::BankerRole).to_string());
            }
            Screen::FarmerSolutions => {
                parts.push(tr(lang, Text::ChooseSolution).to_string());
                parts.push(tr(lang, Text::SolutionOneTitle).to_string());
                parts.push(tr(lang, Text::SolutionTwoTitle).to_string());
            }
            Screen::FarmerLogin | Screen::BankerLogin => {
                parts.push(tr(lang, Text::LoginTitle).to_string());
                for field in &self.form.fields {
                    parts.push(tr(lang, field.label).to_string());
                }
            }
            Screen::FarmerDashboard => {
                parts.push(tr(lang, Text::FarmerDashboardTitle).to_string());
                if let Some(draft) = &self.draft {
                    for category in DocumentCategory::ALL {
                        let files = draft.files_for(category);
                        if !files.is_empty() {
                            parts.push(format!(
                                "{}: {}",
                                category_label(lang, category),
                                files
                                    .iter()
                                    .map(|f| f.name.as_str())
                                    .collect::<Vec<_>>()
                                    .join(", ")
                            ));
                        }
                    }
                }
                parts.push(self.farmer_status_text());
            }
            Screen::BankerDashboard => {
                parts.push(tr(lang, Text::BankerDashboardTitle).to_string());
                parts.push(tr(lang, Text::FarmersFolders).to_string());
                if self.applications.is_empty() {
                    parts.push(tr(lang, Text::NoApplications).to_string());
                } else {
                    for record in &self.applications {
                        parts.push(format!(
                            "{}, {}",
                            record.farmer_name,
                            status_label(lang, record.status)
                        ));
                    }
                }
            }
        }

        parts.retain(|p| !p.trim().is_empty());
        parts.join(". ")
    }

    /// Text read aloud for the current selection (list item or field).
    pub fn read_selection_text(&self) -> String {
        let lang = self.language;
        match self.screen {
            Screen::BankerDashboard => self.selected_application().map_or_else(
                || tr(lang, Text::NoApplications).to_string(),
                |record| {
                    format!(
                        "{}. {}: {}. {}",
                        record.farmer_name,
                        tr(lang, Text::CinLabel),
                        record.cin,
                        status_label(lang, record.status)
                    )
                },
            ),
            Screen::FarmerDashboard => {
                let category = self.selected_category();
                let files = self
                    .draft
                    .as_ref()
                    .map_or(&[][..], |d| d.files_for(category));
                if files.is_empty() {
                    category_label(lang, category).to_string()
                } else {
                    format!(
                        "{}: {}",
                        category_label(lang, category),
                        files
                            .iter()
                            .map(|f| f.name.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    )
                }
            }
            _ => self.read_all_text(),
        }
    }

    /// Localized one-line summary of the farmer's application status.
    pub fn farmer_status_text(&self) -> String {
        let lang = self.language;
        self.farmer_record.as_ref().map_or_else(
            || tr(lang, Text::NoApplicationYet).to_string(),
            |record| {
                format!(
                    "{}: {}",
                    tr(lang, Text::ApplicationStatusTitle),
                    status_label(lang, record.status)
                )
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fellah_core::model::{ApplicationStatus, DocumentFiles};

    fn record(status: ApplicationStatus) -> ApplicationRecord {
        ApplicationRecord {
            id: "rec-1".to_string(),
            farmer_email: "a@b.tn".to_string(),
            farmer_name: "Amine".to_string(),
            cin: "12345678".to_string(),
            solution: Solution::LandLoan,
            status,
            submitted_at: 1_750_000_000,
            files: DocumentFiles::new(),
        }
    }

    #[test]
    fn speech_failure_notice_is_deduplicated_per_session() {
        let mut app = App::new(Language::Ar);

        app.handle_speech_event(SpeechEvent::Failed {
            locale: "ar-SA".to_string(),
        });
        assert!(app.status.is_some());

        app.status = None;
        app.handle_speech_event(SpeechEvent::Failed {
            locale: "ar-SA".to_string(),
        });
        assert!(app.status.is_none());

        // A new session scope shows it again.
        app.reset_session_scope();
        app.handle_speech_event(SpeechEvent::Failed {
            locale: "ar-SA".to_string(),
        });
        assert!(app.status.is_some());
    }

    #[test]
    fn finished_event_clears_the_reading_flag() {
        let mut app = App::new(Language::Fr);
        app.reading = true;
        app.handle_speech_event(SpeechEvent::Finished);
        assert!(!app.reading);
        assert!(app.status.is_none());
    }

    #[test]
    fn chat_send_uses_typed_input_over_quick_pick() {
        let mut chat = ChatState::open(Language::Fr, Solution::LandLoan);
        chat.question_index = Some(0);
        chat.input = "Puis-je suivre l'état de ma demande ?".to_string();
        chat.send(Language::Fr);

        // welcome + question + answer
        assert_eq!(chat.messages.len(), 3);
        assert!(chat.messages[2].text.contains("tableau de bord"));
        assert!(chat.input.is_empty());
    }

    #[test]
    fn chat_send_with_no_input_and_no_pick_is_a_no_op() {
        let mut chat = ChatState::open(Language::Ar, Solution::Equipment);
        chat.send(Language::Ar);
        assert_eq!(chat.messages.len(), 1);
    }

    #[test]
    fn unknown_chat_question_gets_the_fallback() {
        let mut chat = ChatState::open(Language::Fr, Solution::LandLoan);
        chat.input = "Quelle heure est-il ?".to_string();
        chat.send(Language::Fr);
        assert_eq!(chat.messages[2].text, chat::fallback(Language::Fr));
    }

    #[test]
    fn read_all_text_covers_banker_folders() {
        let mut app = App::new(Language::Fr);
        app.screen = Screen::BankerDashboard;
        app.applications = vec![record(ApplicationStatus::Approved)];

        let text = app.read_all_text();
        assert!(text.contains("Amine"));
        assert!(text.contains("Approuvée"));
    }

    #[test]
    fn selection_text_reads_the_selected_folder() {
        let mut app = App::new(Language::Fr);
        app.screen = Screen::BankerDashboard;
        app.applications = vec![record(ApplicationStatus::Pending)];
        app.banker_index = 0;

        let text = app.read_selection_text();
        assert!(text.contains("12345678"));
        assert!(text.contains("En attente"));
    }

    #[test]
    fn form_focus_wraps_both_directions() {
        let mut form = FormState::farmer_login();
        assert_eq!(form.focus, 0);
        form.focus_prev();
        assert_eq!(form.focus, 2);
        form.focus_next();
        assert_eq!(form.focus, 0);
    }
}
