use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::app::{AddForm, FormField, MessageType, Mode, StatusMessage};
use super::layout::{AppLayout, popup_area};
use crate::models::QuerySession;
use crate::termbase::LoadState;
use crate::utils::sanitize_cell;

const MUTED: Color = Color::Rgb(113, 113, 122);
const BRIGHT: Color = Color::Rgb(250, 250, 250);
const ACCENT: Color = Color::Rgb(16, 185, 129);
const ERROR: Color = Color::Rgb(239, 68, 68);
const BAR_BG: Color = Color::Rgb(24, 24, 27);

/// Everything the renderer needs from the app, borrowed for one frame
pub struct RenderState<'a> {
    pub input: &'a str,
    pub session: &'a QuerySession,
    pub source: &'a str,
    pub load_state: LoadState,
    pub record_count: usize,
    pub mode: Mode,
    pub form: &'a AddForm,
    pub source_input: &'a str,
    pub unsaved_count: usize,
    pub status_message: Option<&'a StatusMessage>,
}

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, state: &RenderState) {
    let layout = AppLayout::new(frame.area());

    render_input(frame, layout.input_area, state.input, state.mode == Mode::Search);
    render_result(frame, layout.result_area, state.session);
    render_notes(frame, layout.notes_area, state.session);
    render_status_bar(frame, layout.status_area, state);

    match state.mode {
        Mode::AddForm => render_add_form(frame, state.form),
        Mode::ChangeSource => render_source_form(frame, state.source_input, state.source),
        Mode::Help => render_help(frame),
        Mode::Search => {}
    }
}

fn bordered(title: &str) -> Block<'_> {
    Block::default().borders(Borders::ALL).border_style(Style::default().fg(MUTED)).title(title)
}

fn render_input(frame: &mut Frame, area: Rect, input: &str, focused: bool) {
    let paragraph = Paragraph::new(sanitize_cell(input, false)).block(bordered(" Term "));
    frame.render_widget(paragraph, area);

    if focused {
        let x = area.x + 1 + input.chars().count() as u16;
        frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn render_result(frame: &mut Frame, area: Rect, session: &QuerySession) {
    let line = match (session.current(), session.position()) {
        (Some(record), Some(position)) => {
            let target = sanitize_cell(record.target_term(), false);
            if session.has_alternatives() {
                // Several translations: highlight and show which one this is
                Line::from(vec![
                    Span::styled(
                        format!(" {} ", target),
                        Style::default().fg(BRIGHT).bg(ACCENT).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}/{}", position + 1, session.len()),
                        Style::default().fg(MUTED),
                    ),
                ])
            } else {
                Line::from(Span::styled(target, Style::default().add_modifier(Modifier::BOLD)))
            }
        }
        _ if !session.term().is_empty() => {
            Line::from(Span::styled("Term not found", Style::default().fg(ERROR)))
        }
        _ => Line::from(Span::styled("Type a term and press Enter", Style::default().fg(MUTED))),
    };

    frame.render_widget(Paragraph::new(line).block(bordered(" Translation ")), area);
}

fn render_notes(frame: &mut Frame, area: Rect, session: &QuerySession) {
    let content = match session.current() {
        Some(record) if !record.notes().is_empty() => {
            Text::from(sanitize_cell(record.notes(), true))
        }
        Some(_) => Text::styled("No notes", Style::default().fg(MUTED)),
        None => Text::default(),
    };

    let paragraph = Paragraph::new(content).block(bordered(" Notes ")).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    let (status_text, style) = if let Some(msg) = state.status_message {
        let fg = match msg.message_type {
            MessageType::Success => ACCENT,
            MessageType::Error => ERROR,
        };
        (format!(" {} ", msg.text), Style::default().fg(fg).bg(BAR_BG))
    } else {
        let mut parts = vec![];

        match state.load_state {
            LoadState::LoadFailed => parts.push("[LOAD FAILED]".to_string()),
            LoadState::Loading => parts.push("[LOADING]".to_string()),
            LoadState::Unloaded | LoadState::Loaded => {}
        }
        parts.push(format!("{} entries", state.record_count));
        parts.push(state.source.to_string());
        if state.unsaved_count > 0 {
            parts.push(format!("{} unsaved, Ctrl+S: retry", state.unsaved_count));
        }
        parts.push("F1: help".to_string());
        parts.push("Ctrl+C: quit".to_string());

        (format!(" {} ", parts.join(" | ")), Style::default().fg(BRIGHT).bg(BAR_BG))
    };

    frame.render_widget(Paragraph::new(status_text).style(style), area);
}

fn render_add_form(frame: &mut Frame, form: &AddForm) {
    let area = popup_area(frame.area(), 60, 11);
    frame.render_widget(Clear, area);

    let block = bordered(" Add entry (Enter: save, Tab: next field, Esc: cancel) ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([Constraint::Length(3); 3]).split(inner);
    let fields = [
        (FormField::Source, " Source term ", &form.source),
        (FormField::Target, " Target term ", &form.target),
        (FormField::Notes, " Notes ", &form.notes),
    ];

    for ((field, title, value), row) in fields.into_iter().zip(rows.iter()) {
        let focused = form.focus == field;
        let border = if focused { ACCENT } else { MUTED };
        let paragraph = Paragraph::new(sanitize_cell(value, false)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(title),
        );
        frame.render_widget(paragraph, *row);

        if focused {
            let x = row.x + 1 + value.chars().count() as u16;
            frame.set_cursor_position((x.min(row.right().saturating_sub(2)), row.y + 1));
        }
    }
}

fn render_source_form(frame: &mut Frame, input: &str, current: &str) {
    let area = popup_area(frame.area(), 70, 7);
    frame.render_widget(Clear, area);

    let block = bordered(" Change source (Enter: open, Esc: cancel) ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(3)]).split(inner);
    let current = Line::from(vec![
        Span::styled("Current: ", Style::default().fg(MUTED)),
        Span::raw(sanitize_cell(current, false)),
    ]);
    frame.render_widget(Paragraph::new(current), rows[0]);

    let field = Paragraph::new(sanitize_cell(input, false)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .title(" File path, sheet URL or sheet ID "),
    );
    frame.render_widget(field, rows[1]);

    let x = rows[1].x + 1 + input.chars().count() as u16;
    frame.set_cursor_position((x.min(rows[1].right().saturating_sub(2)), rows[1].y + 1));
}

const HELP_LINES: &[(&str, &str)] = &[
    ("Enter", "Look up the typed term"),
    ("Tab / →", "Next translation"),
    ("← / Shift+Tab", "Previous translation"),
    ("Ctrl+Y", "Copy current translation"),
    ("Ctrl+N", "Add a new entry"),
    ("Ctrl+S", "Retry saving unsaved entries"),
    ("Ctrl+R / F5", "Reload the termbase"),
    ("F2", "Switch to another file or sheet"),
    ("Ctrl+O", "Open the file or sheet externally"),
    ("F1 / F3", "Toggle this help"),
    ("Esc", "Clear input, quit when empty"),
    ("Ctrl+C", "Quit"),
];

fn render_help(frame: &mut Frame) {
    let area = popup_area(frame.area(), 60, HELP_LINES.len() as u16 + 2);
    frame.render_widget(Clear, area);

    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("{:<16}", key), Style::default().fg(ACCENT)),
                Span::raw(*desc),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(bordered(" Keys ")), area);
}
