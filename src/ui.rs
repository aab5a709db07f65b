//! TUI rendering module.
//!
//! Draws the form for the selected tool:
//! - Tool tabs at the top
//! - Two path fields with the focused one highlighted
//! - A run button that turns into a progress line while a job runs
//! - The status area with the last outcome and its warnings

pub mod glyphs;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::{AppState, Field, Tool};
use glyphs::Glyphs;

/// Height of a bordered single-line field.
const FIELD_HEIGHT: u16 = 3;
/// Height of the key help line.
const HELP_HEIGHT: u16 = 1;

/// Renders the complete UI.
pub fn render(frame: &mut Frame, state: &AppState, glyphs: &Glyphs) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(HELP_HEIGHT),
        ])
        .split(area);

    render_tabs(frame, state, layout[0]);
    render_field(frame, state, glyphs, Field::Primary, layout[1]);
    render_field(frame, state, glyphs, Field::Secondary, layout[2]);
    render_run_button(frame, state, glyphs, layout[3]);
    render_status(frame, state, glyphs, layout[4]);
    render_help(frame, layout[5]);
}

fn render_tabs(frame: &mut Frame, state: &AppState, area: Rect) {
    let spans: Vec<Span> = [Tool::Retrieve, Tool::Convert]
        .iter()
        .flat_map(|tool| {
            let style = if *tool == state.tool {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            [Span::styled(format!(" {} ", tool.title()), style), Span::raw(" ")]
        })
        .collect();

    let block = Block::default().borders(Borders::ALL).title("AMR Sequence Tools");
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_field(frame: &mut Frame, state: &AppState, glyphs: &Glyphs, field: Field, area: Rect) {
    let label = state.tool.field_labels()[field as usize];
    let focused = state.focus == field && !state.is_running();

    let mut spans = vec![Span::raw(state.field(field).to_string())];
    let border_style = if focused {
        spans.push(Span::styled(
            glyphs.cursor,
            Style::default().add_modifier(Modifier::SLOW_BLINK),
        ));
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let title = if focused {
        format!("{} {}", glyphs.focus_marker, label)
    } else {
        label.to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Text of the run button for the current state.
pub fn run_button_label(state: &AppState, glyphs: &Glyphs) -> String {
    match (state.is_running(), state.tool) {
        (true, Tool::Retrieve) => format!("{} Retrieving sequences, please wait...", glyphs.busy),
        (true, Tool::Convert) => format!("{} Converting, please wait...", glyphs.busy),
        (false, Tool::Retrieve) => "[Enter] Retrieve AMR Sequences".to_string(),
        (false, Tool::Convert) => "[Enter] Convert to FASTA".to_string(),
    }
}

fn render_run_button(frame: &mut Frame, state: &AppState, glyphs: &Glyphs, area: Rect) {
    let style = if state.is_running() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Black).bg(Color::Green)
    };
    let line = Line::from(Span::styled(run_button_label(state, glyphs), style));
    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Wraps the status message and warnings to `width` columns.
pub fn status_lines(state: &AppState, glyphs: &Glyphs, width: usize) -> Vec<String> {
    let width = width.max(10);
    let mut lines = Vec::new();

    if let Some(message) = &state.status_message {
        let marker = if state.last_failed {
            glyphs.failure
        } else {
            glyphs.success
        };
        for (i, paragraph) in message.lines().enumerate() {
            let text = if i == 0 {
                format!("{} {}", marker, paragraph)
            } else {
                paragraph.to_string()
            };
            lines.extend(textwrap::wrap(&text, width).into_iter().map(|l| l.into_owned()));
        }
    }

    if !state.warnings.is_empty() {
        lines.push(format!("Warnings ({}):", state.warnings.len()));
        for warning in &state.warnings {
            let text = format!("{} {}", glyphs.bullet, warning);
            let options = textwrap::Options::new(width).subsequent_indent("  ");
            lines.extend(textwrap::wrap(&text, options).into_iter().map(|l| l.into_owned()));
        }
    }

    lines
}

fn render_status(frame: &mut Frame, state: &AppState, glyphs: &Glyphs, area: Rect) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let style = if state.last_failed {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let lines: Vec<Line> = status_lines(state, glyphs, inner_width)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, style)))
        .collect();

    let block = Block::default().borders(Borders::ALL).title("Status");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help = " Tab: next field | Enter: run | F2: switch tool | Esc: quit ";
    let line = Line::from(Span::styled(
        help,
        Style::default().fg(Color::Black).bg(Color::Cyan),
    ));
    frame.render_widget(Paragraph::new(line), area);
}
