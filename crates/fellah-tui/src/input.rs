//! Keyboard handling: maps key events to state transitions and store calls.
//!
//! Failures never propagate out of here; every error becomes a localized
//! status-bar notice and the user can simply retry the action.

use crossterm::event::{KeyCode, KeyModifiers};

use fellah_core::db::unix_timestamp;
use fellah_core::error::Error;
use fellah_core::i18n::{error_message, tr, Text};
use fellah_core::model::{
    ApplicationDraft, BankType, FarmerProfile, FileMeta, Persona, Session, Solution,
    is_valid_email,
};
use fellah_core::notify::Notice;
use fellah_core::repository::ApplicationRepository;

use crate::app::{App, ChatState, DashboardMode, FormState, Screen};
use crate::services::Services;

/// Handle one key press.
pub async fn handle_key(
    app: &mut App,
    services: &mut Services,
    code: KeyCode,
    modifiers: KeyModifiers,
) {
    if modifiers.contains(KeyModifiers::CONTROL) {
        handle_control_key(app, services, code).await;
        return;
    }

    if app.chat.is_some() {
        handle_chat_key(app, code);
        return;
    }

    match app.screen {
        Screen::Home => handle_home_key(app, code),
        Screen::FarmerSolutions => handle_solutions_key(app, code),
        Screen::FarmerLogin => handle_farmer_login_key(app, services, code).await,
        Screen::FarmerDashboard => handle_farmer_dashboard_key(app, services, code).await,
        Screen::BankerLogin => handle_banker_login_key(app, services, code).await,
        Screen::BankerDashboard => handle_banker_dashboard_key(app, services, code).await,
    }
}

async fn handle_control_key(app: &mut App, services: &mut Services, code: KeyCode) {
    match code {
        KeyCode::Char('c') => app.should_quit = true,
        KeyCode::Char('l') => app.toggle_language(),
        // Read the whole screen region; pressing again stops.
        KeyCode::Char('r') => {
            if app.reading {
                services.stop_speaking();
                app.reading = false;
            } else {
                let text = app.read_all_text();
                services.speak(&text, app.language).await;
                app.reading = services.speech_enabled();
            }
        }
        // Read only the current selection.
        KeyCode::Char('s') => {
            let text = app.read_selection_text();
            services.speak(&text, app.language).await;
            app.reading = services.speech_enabled();
        }
        _ => {}
    }
}

fn handle_chat_key(app: &mut App, code: KeyCode) {
    let language = app.language;
    if code == KeyCode::Esc {
        app.chat = None;
        return;
    }
    let Some(chat) = app.chat.as_mut() else {
        return;
    };

    match code {
        KeyCode::Enter => chat.send(language),
        KeyCode::Up => {
            chat.question_index = Some(chat.question_index.map_or(4, |i| (i + 4) % 5));
        }
        KeyCode::Down => {
            chat.question_index = Some(chat.question_index.map_or(0, |i| (i + 1) % 5));
        }
        KeyCode::Backspace => {
            chat.input.pop();
        }
        KeyCode::Char(c) => chat.input.push(c),
        _ => {}
    }
}

fn handle_home_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
            app.menu_index = 1 - app.menu_index.min(1);
        }
        KeyCode::Enter => {
            if app.menu_index == 0 {
                app.screen = Screen::FarmerSolutions;
            } else {
                app.selected_bank = None;
                app.screen = Screen::BankerLogin;
            }
            app.menu_index = 0;
        }
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn handle_solutions_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
            app.menu_index = 1 - app.menu_index.min(1);
        }
        KeyCode::Enter => {
            app.selected_solution = Some(if app.menu_index == 0 {
                Solution::LandLoan
            } else {
                Solution::Equipment
            });
            app.form = FormState::farmer_login();
            app.screen = Screen::FarmerLogin;
        }
        KeyCode::Esc => {
            app.screen = Screen::Home;
            app.menu_index = 0;
        }
        _ => {}
    }
}

async fn handle_farmer_login_key(app: &mut App, services: &mut Services, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.screen = Screen::FarmerSolutions;
            app.menu_index = 0;
        }
        KeyCode::Up => app.form.focus_prev(),
        KeyCode::Down | KeyCode::Tab => app.form.focus_next(),
        KeyCode::Backspace => {
            if let Some(field) = app.form.focused_mut() {
                field.value.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(field) = app.form.focused_mut() {
                field.value.push(c);
            }
        }
        KeyCode::Enter => {
            if app.form.focus + 1 < app.form.fields.len() {
                app.form.focus_next();
            } else {
                farmer_login(app, services).await;
            }
        }
        _ => {}
    }
}

/// Validate the login form and enter the farmer dashboard. Demo-grade: any
/// well-formed input creates the session; there is no real authentication.
async fn farmer_login(app: &mut App, services: &mut Services) {
    let email = app.form.value("farmer_email").trim().to_string();
    let name = app.form.value("farmer_name").trim().to_string();
    let cin = app.form.value("cin").trim().to_string();

    if email.is_empty() || !is_valid_email(&email) {
        app.set_status(Notice::error(
            tr(app.language, Text::InvalidEmail).to_string(),
        ));
        return;
    }
    for (value, key) in [(&name, "farmer_name"), (&cin, "cin")] {
        if value.is_empty() {
            let err = Error::validation(key);
            app.set_status(Notice::error(error_message(app.language, &err)));
            return;
        }
    }

    let solution = app.selected_solution.unwrap_or(Solution::LandLoan);
    let profile = FarmerProfile {
        email: email.clone(),
        name: name.clone(),
        cin: cin.clone(),
    };
    if let Err(e) = services.db.store_profile(&profile).await {
        store_error(app, e);
        return;
    }

    let session = Session::farmer(email.clone(), solution, unix_timestamp());
    if let Err(e) = services.db.store_session(&session).await {
        store_error(app, e);
        return;
    }

    let record = match services.db.find_application(&email, solution).await {
        Ok(record) => record,
        Err(e) => {
            store_error(app, e);
            return;
        }
    };

    let mut draft = ApplicationDraft::new(email.clone(), name, cin, solution);
    if let Some(existing) = &record {
        draft.files = existing.files.clone();
    }

    app.session = Some(session);
    app.reset_session_scope();
    app.farmer_record = record;
    app.draft = Some(draft);
    app.draft_category = 0;
    app.dashboard_mode = DashboardMode::Browse;
    app.screen = Screen::FarmerDashboard;
    app.set_status(Notice::info(format!(
        "{} {email}",
        tr(app.language, Text::WelcomeBack)
    )));
}

async fn handle_farmer_dashboard_key(app: &mut App, services: &mut Services, code: KeyCode) {
    if app.dashboard_mode == DashboardMode::PathInput {
        handle_path_input_key(app, code);
        return;
    }

    match code {
        KeyCode::Up => {
            app.draft_category = app.draft_category.saturating_sub(1);
        }
        KeyCode::Down => {
            app.draft_category = (app.draft_category + 1).min(3);
        }
        KeyCode::Enter | KeyCode::Char('a') => {
            app.dashboard_mode = DashboardMode::PathInput;
            app.path_input.clear();
        }
        KeyCode::Char('s') => submit_draft(app, services).await,
        KeyCode::Char('c') => {
            let solution = app.selected_solution.unwrap_or(Solution::LandLoan);
            app.chat = Some(ChatState::open(app.language, solution));
        }
        KeyCode::Esc => logout(app, services, Persona::Farmer).await,
        _ => {}
    }
}

fn handle_path_input_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.dashboard_mode = DashboardMode::Browse;
        }
        KeyCode::Backspace => {
            app.path_input.pop();
        }
        KeyCode::Char(c) => app.path_input.push(c),
        KeyCode::Enter => {
            let path = std::path::PathBuf::from(app.path_input.trim());
            let category = app.selected_category();
            match FileMeta::from_path(&path) {
                Ok(meta) => {
                    if let Some(draft) = app.draft.as_mut() {
                        draft.add_file(category, meta);
                    }
                    app.set_status(Notice::info(
                        tr(app.language, Text::FileAdded).to_string(),
                    ));
                }
                Err(_) => {
                    app.set_status(Notice::error(
                        tr(app.language, Text::FileNotFound).to_string(),
                    ));
                }
            }
            app.dashboard_mode = DashboardMode::Browse;
        }
        _ => {}
    }
}

async fn submit_draft(app: &mut App, services: &mut Services) {
    let Some(draft) = app.draft.clone() else {
        return;
    };

    match services.repo.submit(draft).await {
        Ok(record) => {
            app.farmer_record = Some(record);
            app.set_status(Notice::info(
                tr(app.language, Text::SubmittedNotice).to_string(),
            ));
        }
        Err(e) => {
            app.set_status(Notice::error(error_message(app.language, &e)));
        }
    }
}

async fn handle_banker_login_key(app: &mut App, services: &mut Services, code: KeyCode) {
    if app.selected_bank.is_none() {
        // Phase one: pick the bank type.
        match code {
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                app.menu_index = 1 - app.menu_index.min(1);
            }
            KeyCode::Enter => {
                app.selected_bank = Some(if app.menu_index == 0 {
                    BankType::Normal
                } else {
                    BankType::Islamic
                });
                app.form = FormState::banker_login();
            }
            KeyCode::Esc => {
                app.screen = Screen::Home;
                app.menu_index = 0;
            }
            _ => {}
        }
        return;
    }

    // Phase two: the email form.
    match code {
        KeyCode::Esc => app.selected_bank = None,
        KeyCode::Backspace => {
            if let Some(field) = app.form.focused_mut() {
                field.value.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(field) = app.form.focused_mut() {
                field.value.push(c);
            }
        }
        KeyCode::Enter => banker_login(app, services).await,
        _ => {}
    }
}

async fn banker_login(app: &mut App, services: &mut Services) {
    let email = app.form.value("email").trim().to_string();
    if email.is_empty() || !is_valid_email(&email) {
        app.set_status(Notice::error(
            tr(app.language, Text::InvalidEmail).to_string(),
        ));
        return;
    }
    let Some(bank_type) = app.selected_bank else {
        return;
    };

    let session = Session::banker(email, bank_type, unix_timestamp());
    if let Err(e) = services.db.store_session(&session).await {
        store_error(app, e);
        return;
    }

    app.session = Some(session);
    app.reset_session_scope();
    refresh_applications(app, services).await;
    app.banker_index = 0;
    app.screen = Screen::BankerDashboard;
}

async fn handle_banker_dashboard_key(app: &mut App, services: &mut Services, code: KeyCode) {
    match code {
        KeyCode::Up => {
            app.banker_index = app.banker_index.saturating_sub(1);
        }
        KeyCode::Down => {
            if !app.applications.is_empty() {
                app.banker_index = (app.banker_index + 1).min(app.applications.len() - 1);
            }
        }
        KeyCode::Char('a') => decide(app, services, true).await,
        KeyCode::Char('r') => decide(app, services, false).await,
        KeyCode::Esc => logout(app, services, Persona::Banker).await,
        _ => {}
    }
}

/// Apply the banker's approve/reject decision to the selected record.
async fn decide(app: &mut App, services: &mut Services, approve: bool) {
    let Some(record) = app.selected_application() else {
        return;
    };
    let id = record.id.clone();

    let result = if approve {
        services.repo.approve(&id).await
    } else {
        services.repo.reject(&id).await
    };

    match result {
        Ok(updated) => {
            let label = if approve { Text::Approve } else { Text::Reject };
            app.set_status(Notice::info(format!(
                "{}: {}",
                tr(app.language, label),
                updated.farmer_name
            )));
        }
        Err(e) => {
            app.set_status(Notice::error(error_message(app.language, &e)));
        }
    }

    refresh_applications(app, services).await;
}

async fn refresh_applications(app: &mut App, services: &mut Services) {
    let Some(bank_type) = app.selected_bank else {
        return;
    };
    match services.repo.list_for(bank_type).await {
        Ok(applications) => {
            app.applications = applications;
            if app.banker_index >= app.applications.len() {
                app.banker_index = app.applications.len().saturating_sub(1);
            }
        }
        Err(e) => {
            app.set_status(Notice::error(error_message(app.language, &e)));
        }
    }
}

async fn logout(app: &mut App, services: &mut Services, persona: Persona) {
    if let Err(e) = services.db.clear_session(persona).await {
        store_error(app, e);
        return;
    }

    app.session = None;
    app.reset_session_scope();
    app.farmer_record = None;
    app.draft = None;
    app.applications.clear();
    app.selected_solution = None;
    app.selected_bank = None;
    app.chat = None;
    app.menu_index = 0;
    app.screen = Screen::Home;
}

fn store_error(app: &mut App, e: fellah_core::db::DatabaseError) {
    let err = Error::Database(e);
    app.set_status(Notice::error(error_message(app.language, &err)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use fellah_core::config::SpeechConfig;
    use fellah_core::i18n::Language;
    use fellah_core::model::{ApplicationStatus, DocumentCategory};
    use fellah_core::repository::SqliteRepository;
    use fellah_core::storage::Database;
    use fellah_speech::{Speaker, SpeakerConfig, SpeechBackend, Utterance};

    use async_trait::async_trait;

    struct SilentBackend;

    #[async_trait]
    impl SpeechBackend for SilentBackend {
        async fn voices(&self) -> fellah_speech::Result<Vec<fellah_speech::Voice>> {
            Ok(Vec::new())
        }

        async fn speak(
            &self,
            _utterance: Utterance,
            _cancel: tokio::sync::oneshot::Receiver<()>,
        ) -> fellah_speech::Result<fellah_speech::Outcome> {
            Ok(fellah_speech::Outcome::Completed)
        }
    }

    async fn services() -> Services {
        let db = Database::open_in_memory().await.unwrap();
        let repo = Arc::new(SqliteRepository::new(db.clone()));
        let (speaker, _events) = Speaker::new(Arc::new(SilentBackend), SpeakerConfig::default());
        Services::new(db, repo, speaker, &SpeechConfig::default())
    }

    async fn type_text(app: &mut App, services: &mut Services, text: &str) {
        for c in text.chars() {
            handle_key(app, services, KeyCode::Char(c), KeyModifiers::NONE).await;
        }
    }

    async fn login_farmer(app: &mut App, services: &mut Services, email: &str) {
        // Home -> farmer -> solution 1 -> login form
        handle_key(app, services, KeyCode::Enter, KeyModifiers::NONE).await;
        handle_key(app, services, KeyCode::Enter, KeyModifiers::NONE).await;
        assert_eq!(app.screen, Screen::FarmerLogin);

        type_text(app, services, email).await;
        handle_key(app, services, KeyCode::Enter, KeyModifiers::NONE).await;
        type_text(app, services, "Amine Trabelsi").await;
        handle_key(app, services, KeyCode::Enter, KeyModifiers::NONE).await;
        type_text(app, services, "12345678").await;
        handle_key(app, services, KeyCode::Enter, KeyModifiers::NONE).await;
    }

    fn attach_required_files(app: &mut App, dir: &std::path::Path) {
        for category in DocumentCategory::REQUIRED {
            let path = dir.join(format!("{}.pdf", category.as_str()));
            std::fs::write(&path, b"stub").unwrap();
            let meta = FileMeta::from_path(&path).unwrap();
            app.draft.as_mut().unwrap().add_file(category, meta);
        }
    }

    #[tokio::test]
    async fn farmer_login_reaches_the_dashboard() {
        let mut services = services().await;
        let mut app = App::new(Language::Fr);

        login_farmer(&mut app, &mut services, "amine@mail.tn").await;

        assert_eq!(app.screen, Screen::FarmerDashboard);
        assert!(app.session.is_some());
        assert!(app.farmer_record.is_none());
        let stored = services.db.get_session(Persona::Farmer).await.unwrap();
        assert_eq!(stored.unwrap().email, "amine@mail.tn");
    }

    #[tokio::test]
    async fn malformed_email_blocks_login() {
        let mut services = services().await;
        let mut app = App::new(Language::Fr);

        handle_key(&mut app, &mut services, KeyCode::Enter, KeyModifiers::NONE).await;
        handle_key(&mut app, &mut services, KeyCode::Enter, KeyModifiers::NONE).await;
        type_text(&mut app, &mut services, "not-an-email").await;
        handle_key(&mut app, &mut services, KeyCode::Enter, KeyModifiers::NONE).await;
        type_text(&mut app, &mut services, "Amine").await;
        handle_key(&mut app, &mut services, KeyCode::Enter, KeyModifiers::NONE).await;
        type_text(&mut app, &mut services, "12345678").await;
        handle_key(&mut app, &mut services, KeyCode::Enter, KeyModifiers::NONE).await;

        assert_eq!(app.screen, Screen::FarmerLogin);
        assert!(app.status.is_some());
    }

    #[tokio::test]
    async fn submit_without_documents_shows_validation_notice() {
        let mut services = services().await;
        let mut app = App::new(Language::Fr);
        login_farmer(&mut app, &mut services, "amine@mail.tn").await;

        handle_key(&mut app, &mut services, KeyCode::Char('s'), KeyModifiers::NONE).await;

        assert!(app.farmer_record.is_none());
        let status = app.status.as_ref().unwrap();
        assert!(status.text.contains("Champ requis"));
    }

    #[tokio::test]
    async fn full_submit_and_banker_approval_flow() {
        let dir = tempfile::tempdir().unwrap();
        let mut services = services().await;
        let mut app = App::new(Language::Fr);

        login_farmer(&mut app, &mut services, "amine@mail.tn").await;
        attach_required_files(&mut app, dir.path());
        handle_key(&mut app, &mut services, KeyCode::Char('s'), KeyModifiers::NONE).await;

        let record = app.farmer_record.clone().unwrap();
        assert_eq!(record.status, ApplicationStatus::Pending);

        // Farmer logs out; banker of the normal bank logs in.
        handle_key(&mut app, &mut services, KeyCode::Esc, KeyModifiers::NONE).await;
        assert_eq!(app.screen, Screen::Home);

        handle_key(&mut app, &mut services, KeyCode::Down, KeyModifiers::NONE).await;
        handle_key(&mut app, &mut services, KeyCode::Enter, KeyModifiers::NONE).await;
        assert_eq!(app.screen, Screen::BankerLogin);
        handle_key(&mut app, &mut services, KeyCode::Enter, KeyModifiers::NONE).await;
        type_text(&mut app, &mut services, "banker@bank.tn").await;
        handle_key(&mut app, &mut services, KeyCode::Enter, KeyModifiers::NONE).await;

        assert_eq!(app.screen, Screen::BankerDashboard);
        assert_eq!(app.applications.len(), 1);

        // Approve, then a second decision hits the terminal-status guard.
        handle_key(&mut app, &mut services, KeyCode::Char('a'), KeyModifiers::NONE).await;
        assert_eq!(app.applications[0].status, ApplicationStatus::Approved);

        handle_key(&mut app, &mut services, KeyCode::Char('r'), KeyModifiers::NONE).await;
        assert_eq!(app.applications[0].status, ApplicationStatus::Approved);
        assert!(app.status.as_ref().unwrap().text.contains("déjà"));

        // The farmer-side status view reflects the approval.
        handle_key(&mut app, &mut services, KeyCode::Esc, KeyModifiers::NONE).await;
        login_farmer(&mut app, &mut services, "amine@mail.tn").await;
        assert_eq!(
            app.farmer_record.as_ref().unwrap().status,
            ApplicationStatus::Approved
        );
        assert!(app.farmer_status_text().contains("Approuvée"));
    }

    #[tokio::test]
    async fn islamic_banker_never_sees_land_loan_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut services = services().await;
        let mut app = App::new(Language::Fr);

        login_farmer(&mut app, &mut services, "amine@mail.tn").await;
        attach_required_files(&mut app, dir.path());
        handle_key(&mut app, &mut services, KeyCode::Char('s'), KeyModifiers::NONE).await;
        handle_key(&mut app, &mut services, KeyCode::Esc, KeyModifiers::NONE).await;

        // Banker picks the Islamic bank.
        handle_key(&mut app, &mut services, KeyCode::Down, KeyModifiers::NONE).await;
        handle_key(&mut app, &mut services, KeyCode::Enter, KeyModifiers::NONE).await;
        handle_key(&mut app, &mut services, KeyCode::Down, KeyModifiers::NONE).await;
        handle_key(&mut app, &mut services, KeyCode::Enter, KeyModifiers::NONE).await;
        type_text(&mut app, &mut services, "banker@bank.tn").await;
        handle_key(&mut app, &mut services, KeyCode::Enter, KeyModifiers::NONE).await;

        assert_eq!(app.screen, Screen::BankerDashboard);
        assert_eq!(app.selected_bank, Some(BankType::Islamic));
        assert!(app.applications.is_empty());
    }

    #[tokio::test]
    async fn attaching_a_missing_file_is_a_localized_error() {
        let mut services = services().await;
        let mut app = App::new(Language::Fr);
        login_farmer(&mut app, &mut services, "amine@mail.tn").await;

        handle_key(&mut app, &mut services, KeyCode::Char('a'), KeyModifiers::NONE).await;
        assert_eq!(app.dashboard_mode, DashboardMode::PathInput);
        type_text(&mut app, &mut services, "/no/such/file.pdf").await;
        handle_key(&mut app, &mut services, KeyCode::Enter, KeyModifiers::NONE).await;

        assert_eq!(app.dashboard_mode, DashboardMode::Browse);
        assert_eq!(
            app.status.as_ref().unwrap().text,
            "Fichier introuvable"
        );
    }

    #[tokio::test]
    async fn chat_opens_sends_and_closes() {
        let mut services = services().await;
        let mut app = App::new(Language::Fr);
        login_farmer(&mut app, &mut services, "amine@mail.tn").await;

        handle_key(&mut app, &mut services, KeyCode::Char('c'), KeyModifiers::NONE).await;
        assert!(app.chat.is_some());

        // Pick the first standard question and send it.
        handle_key(&mut app, &mut services, KeyCode::Down, KeyModifiers::NONE).await;
        handle_key(&mut app, &mut services, KeyCode::Enter, KeyModifiers::NONE).await;
        let chat = app.chat.as_ref().unwrap();
        assert_eq!(chat.messages.len(), 3);
        assert!(chat.messages[2].text.contains("CIN"));

        handle_key(&mut app, &mut services, KeyCode::Esc, KeyModifiers::NONE).await;
        assert!(app.chat.is_none());
        assert_eq!(app.screen, Screen::FarmerDashboard);
    }

    #[tokio::test]
    async fn language_toggle_is_global() {
        let mut services = services().await;
        let mut app = App::new(Language::Ar);
        handle_key(&mut app, &mut services, KeyCode::Char('l'), KeyModifiers::CONTROL).await;
        assert_eq!(app.language, Language::Fr);
        handle_key(&mut app, &mut services, KeyCode::Char('l'), KeyModifiers::CONTROL).await;
        assert_eq!(app.language, Language::Ar);
    }

    #[tokio::test]
    async fn resubmission_replaces_the_farmer_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut services = services().await;
        let mut app = App::new(Language::Fr);

        login_farmer(&mut app, &mut services, "amine@mail.tn").await;
        attach_required_files(&mut app, dir.path());
        handle_key(&mut app, &mut services, KeyCode::Char('s'), KeyModifiers::NONE).await;
        let first_id = app.farmer_record.as_ref().unwrap().id.clone();

        handle_key(&mut app, &mut services, KeyCode::Char('s'), KeyModifiers::NONE).await;
        let second_id = app.farmer_record.as_ref().unwrap().id.clone();
        assert_ne!(first_id, second_id);

        let listed = services.repo.list_for(BankType::Normal).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, second_id);
    }
}
