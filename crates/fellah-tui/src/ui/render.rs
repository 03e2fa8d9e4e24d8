//! TUI rendering functions.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use fellah_core::i18n::{category_label, status_label, tr, Text};
use fellah_core::model::{ApplicationRecord, ApplicationStatus, BankType, DocumentCategory};
use fellah_core::notify::NoticeKind;

use crate::app::{App, DashboardMode, FormState, Screen};
use crate::ui::chat_panel;

/// Draw the full UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(5),    // Body
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    match app.screen {
        Screen::Home => draw_home(frame, app, chunks[1]),
        Screen::FarmerSolutions => draw_solutions(frame, app, chunks[1]),
        Screen::FarmerLogin => draw_login_form(frame, app, chunks[1], Text::LoginTitle),
        Screen::FarmerDashboard => draw_farmer_dashboard(frame, app, chunks[1]),
        Screen::BankerLogin => draw_banker_login(frame, app, chunks[1]),
        Screen::BankerDashboard => draw_banker_dashboard(frame, app, chunks[1]),
    }
    draw_status_bar(frame, app, chunks[2]);
    draw_help_bar(frame, app, chunks[3]);

    if app.chat.is_some() {
        chat_panel::draw_chat(frame, app);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let lang = app.language;
    let mut spans = vec![Span::styled(
        tr(lang, Text::AppTitle),
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )];

    spans.push(Span::raw(format!(" | {}", lang.as_str())));

    if let Some(session) = &app.session {
        spans.push(Span::raw(format!(
            " | {}: {}",
            tr(lang, Text::LoggedInAs),
            session.email
        )));
    }

    if app.reading {
        spans.push(Span::styled(
            format!(" [{}]", tr(lang, Text::ReadAloud)),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Two-option menu rendered as side-by-side cards, the selected one
/// highlighted.
fn draw_cards(
    frame: &mut Frame,
    area: Rect,
    heading: &str,
    cards: [(&str, &str); 2],
    selected: usize,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(5)])
        .split(area);

    frame.render_widget(
        Paragraph::new(heading).alignment(Alignment::Center).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        rows[0],
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    for (i, (title, body)) in cards.iter().enumerate() {
        let style = if i == selected {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default().borders(Borders::ALL).border_style(style);
        let text = Paragraph::new(format!("{title}\n\n{body}"))
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(text, columns[i]);
    }
}

fn draw_home(frame: &mut Frame, app: &App, area: Rect) {
    let lang = app.language;
    draw_cards(
        frame,
        area,
        tr(lang, Text::ChooseRole),
        [
            (tr(lang, Text::FarmerRole), tr(lang, Text::GetStarted)),
            (tr(lang, Text::BankerRole), tr(lang, Text::GetStarted)),
        ],
        app.menu_index,
    );
}

fn draw_solutions(frame: &mut Frame, app: &App, area: Rect) {
    let lang = app.language;
    draw_cards(
        frame,
        area,
        tr(lang, Text::ChooseSolution),
        [
            (
                tr(lang, Text::SolutionOneBadge),
                tr(lang, Text::SolutionOneTitle),
            ),
            (
                tr(lang, Text::SolutionTwoBadge),
                tr(lang, Text::SolutionTwoTitle),
            ),
        ],
        app.menu_index,
    );
}

fn draw_form_fields(frame: &mut Frame, app: &App, area: Rect, form: &FormState, title: &str) {
    let mut constraints = vec![Constraint::Length(2)];
    constraints.extend(std::iter::repeat_n(Constraint::Length(3), form.fields.len()));
    constraints.push(Constraint::Min(0));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    frame.render_widget(
        Paragraph::new(title).alignment(Alignment::Center).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        rows[0],
    );

    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let border_style = if focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let cursor = if focused { "█" } else { "" };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(tr(app.language, field.label));
        frame.render_widget(
            Paragraph::new(format!("{}{cursor}", field.value)).block(block),
            rows[i + 1],
        );
    }
}

fn draw_login_form(frame: &mut Frame, app: &App, area: Rect, title: Text) {
    draw_form_fields(frame, app, area, &app.form, tr(app.language, title));
}

fn draw_banker_login(frame: &mut Frame, app: &App, area: Rect) {
    let lang = app.language;
    if app.selected_bank.is_none() {
        draw_cards(
            frame,
            area,
            tr(lang, Text::SelectBankType),
            [
                (tr(lang, Text::NormalBank), tr(lang, Text::GetStarted)),
                (tr(lang, Text::IslamicBank), tr(lang, Text::GetStarted)),
            ],
            app.menu_index,
        );
    } else {
        draw_login_form(frame, app, area, Text::LoginTitle);
    }
}

fn draw_farmer_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let lang = app.language;
    let input_height = if app.dashboard_mode == DashboardMode::PathInput {
        3
    } else {
        0
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),            // title + status line
            Constraint::Min(5),               // documents
            Constraint::Length(input_height), // path input
        ])
        .split(area);

    let status_line = app.farmer_status_text();
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                tr(lang, Text::FarmerDashboardTitle),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(status_line),
        ]),
        rows[0],
    );

    let mut lines: Vec<Line<'_>> = Vec::new();
    for (i, category) in DocumentCategory::ALL.iter().enumerate() {
        let selected = i == app.draft_category;
        let marker = if selected { "▸ " } else { "  " };
        let files = app
            .draft
            .as_ref()
            .map_or(&[][..], |d| d.files_for(*category));
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        let required = if category.is_required() { "*" } else { " " };

        let style = if selected {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!(
                "{marker}{required}{}: {} ({})",
                category_label(lang, *category),
                if names.is_empty() {
                    "-".to_string()
                } else {
                    names.join(", ")
                },
                files.len()
            ),
            style,
        )));
    }

    let documents = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(tr(lang, Text::Documents)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(documents, rows[1]);

    if app.dashboard_mode == DashboardMode::PathInput {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(tr(lang, Text::AddFile));
        frame.render_widget(
            Paragraph::new(format!("{}█", app.path_input)).block(block),
            rows[2],
        );
    }
}

fn status_style(status: ApplicationStatus) -> Style {
    match status {
        ApplicationStatus::Pending => Style::default().fg(Color::Yellow),
        ApplicationStatus::Approved => Style::default().fg(Color::Green),
        ApplicationStatus::Rejected => Style::default().fg(Color::Red),
    }
}

fn draw_banker_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let lang = app.language;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Percentage(40),
            Constraint::Min(5),
        ])
        .split(area);

    let bank_label = app.selected_bank.map_or("", |b| match b {
        BankType::Normal => tr(lang, Text::NormalBank),
        BankType::Islamic => tr(lang, Text::IslamicBank),
    });
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                tr(lang, Text::BankerDashboardTitle),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" | {bank_label}")),
        ])),
        rows[0],
    );

    // Folder list.
    let mut lines: Vec<Line<'_>> = Vec::new();
    if app.applications.is_empty() {
        lines.push(Line::from(tr(lang, Text::NoApplications)));
    } else {
        for (i, record) in app.applications.iter().enumerate() {
            let marker = if i == app.banker_index { "▸ " } else { "  " };
            lines.push(Line::from(vec![
                Span::raw(format!("{marker}#{} {} — ", i + 1, record.farmer_name)),
                Span::styled(status_label(lang, record.status), status_style(record.status)),
            ]));
        }
    }
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(tr(lang, Text::FarmersFolders)),
        ),
        rows[1],
    );

    // Detail panel for the selected folder.
    let detail = app
        .selected_application()
        .map_or_else(Vec::new, |record| folder_detail_lines(app, record));
    frame.render_widget(
        Paragraph::new(detail)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(tr(lang, Text::PersonalInformation)),
            )
            .wrap(Wrap { trim: true }),
        rows[2],
    );
}

fn folder_detail_lines<'a>(app: &App, record: &'a ApplicationRecord) -> Vec<Line<'a>> {
    let lang = app.language;
    let mut lines = vec![
        Line::from(format!("{}: {}", tr(lang, Text::NameLabel), record.farmer_name)),
        Line::from(format!("{}: {}", tr(lang, Text::CinLabel), record.cin)),
        Line::from(format!("{}: {}", tr(lang, Text::Email), record.farmer_email)),
        Line::from(Span::styled(
            status_label(lang, record.status),
            status_style(record.status).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            tr(lang, Text::Documents),
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
    ];

    for category in DocumentCategory::ALL {
        let files = record.files.get(&category).map_or(&[][..], Vec::as_slice);
        if files.is_empty() {
            continue;
        }
        for file in files {
            lines.push(Line::from(format!(
                "  {}: {} ({} B, {})",
                category_label(lang, category),
                file.name,
                file.size,
                file.mime
            )));
        }
    }

    if record.status == ApplicationStatus::Pending {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("a ", Style::default().fg(Color::Green)),
            Span::raw(tr(lang, Text::Approve)),
            Span::raw("  "),
            Span::styled("r ", Style::default().fg(Color::Red)),
            Span::raw(tr(lang, Text::Reject)),
        ]));
    }

    lines
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let Some(notice) = &app.status else {
        return;
    };
    let style = match notice.kind {
        NoticeKind::Info => Style::default().fg(Color::Green),
        NoticeKind::Warning => Style::default().fg(Color::Yellow),
        NoticeKind::Error => Style::default().fg(Color::Red),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(notice.text.as_str(), style)),
        area,
    );
}

fn draw_help_bar(frame: &mut Frame, app: &App, area: Rect) {
    let lang = app.language;
    let mut parts: Vec<String> = Vec::new();

    if app.chat.is_some() {
        parts.push(format!("Enter {}", tr(lang, Text::HelpSelect)));
        parts.push(format!("↑↓ {}", tr(lang, Text::HelpNavigate)));
        parts.push(format!("Esc {}", tr(lang, Text::HelpBack)));
    } else {
        match app.screen {
            Screen::Home => {
                parts.push(format!("↑↓ {}", tr(lang, Text::HelpNavigate)));
                parts.push(format!("Enter {}", tr(lang, Text::HelpSelect)));
                parts.push(format!("q {}", tr(lang, Text::HelpQuit)));
            }
            Screen::FarmerSolutions | Screen::BankerLogin | Screen::FarmerLogin => {
                parts.push(format!("↑↓ {}", tr(lang, Text::HelpNavigate)));
                parts.push(format!("Enter {}", tr(lang, Text::HelpSelect)));
                parts.push(format!("Esc {}", tr(lang, Text::HelpBack)));
            }
            Screen::FarmerDashboard => {
                parts.push(format!("a {}", tr(lang, Text::AddFile)));
                parts.push(format!("s {}", tr(lang, Text::SubmitApplication)));
                parts.push(format!("c {}", tr(lang, Text::HelpChat)));
                parts.push(format!("Esc {}", tr(lang, Text::Logout)));
            }
            Screen::BankerDashboard => {
                parts.push(format!("a {}", tr(lang, Text::Approve)));
                parts.push(format!("r {}", tr(lang, Text::Reject)));
                parts.push(format!("Esc {}", tr(lang, Text::Logout)));
            }
        }
    }
    parts.push(format!("Ctrl+L {}", tr(lang, Text::HelpLanguage)));
    parts.push(format!("Ctrl+R {}", tr(lang, Text::HelpRead)));

    frame.render_widget(
        Paragraph::new(Span::styled(
            parts.join(" | "),
            Style::default().fg(Color::DarkGray),
        )),
        area,
    );
}

/// Centered sub-rectangle used for popup overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
