//! Legal-advisor chat popup overlay.

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use fellah_core::chat;
use fellah_core::i18n::{tr, Text};

use crate::app::App;
use crate::ui::render::centered_rect;

/// Draw the chat popup over the current screen.
pub fn draw_chat(frame: &mut Frame, app: &App) {
    let Some(chat_state) = &app.chat else {
        return;
    };
    let lang = app.language;

    let area = centered_rect(70, 80, frame.area());
    frame.render_widget(Clear, area);

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(format!(
            "⚖ {} — {}",
            tr(lang, Text::ChatTitle),
            tr(lang, Text::ChatOnline)
        ));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(4),    // transcript
            Constraint::Length(7), // standard questions
            Constraint::Length(3), // input
        ])
        .split(inner);

    // Transcript, most recent messages last. Show the tail that fits.
    let mut lines: Vec<Line<'_>> = Vec::new();
    for message in &chat_state.messages {
        let (prefix, color) = if message.from_user {
            ("> ", Color::Cyan)
        } else {
            ("⚖ ", Color::Green)
        };
        lines.push(Line::from(vec![
            Span::styled(prefix, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::raw(message.text.as_str()),
        ]));
    }
    let visible = rows[0].height as usize;
    let skip = lines.len().saturating_sub(visible);
    frame.render_widget(
        Paragraph::new(lines.split_off(skip)).wrap(Wrap { trim: true }),
        rows[0],
    );

    // Standard question quick picks.
    let questions = chat::standard_questions(lang, chat_state.solution);
    let mut question_lines = vec![Line::from(Span::styled(
        tr(lang, Text::FrequentQuestions),
        Style::default().add_modifier(Modifier::UNDERLINED),
    ))];
    for (i, question) in questions.iter().enumerate() {
        let selected = chat_state.question_index == Some(i);
        let marker = if selected { "▸ " } else { "  " };
        let style = if selected {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        question_lines.push(Line::from(Span::styled(
            format!("{marker}{question}"),
            style,
        )));
    }
    frame.render_widget(Paragraph::new(question_lines), rows[1]);

    // Input line.
    let input_block = Block::default().borders(Borders::ALL);
    let input_text = if chat_state.input.is_empty() {
        Span::styled(
            tr(lang, Text::ChatPlaceholder),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(format!("{}█", chat_state.input))
    };
    frame.render_widget(Paragraph::new(input_text).block(input_block), rows[2]);
}
