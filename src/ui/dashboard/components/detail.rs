//! Dashboard detail panel component
//!
//! Shows the last known good data of the selected source

use super::super::state::DashboardState;
use super::super::utils::clean_http_error_message;
use crate::render::summarize;
use ratatui::Frame;
use ratatui::prelude::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};

/// Render the summary of the selected source. A failed refresh adds a
/// warning line above the data instead of replacing it.
pub fn render_detail_panel(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let mut lines = Vec::new();

    if let Some(snapshot) = state.selected_snapshot() {
        if let Some(error) = &snapshot.last_error {
            lines.push(Line::from(Span::styled(
                format!("⚠ {}", clean_http_error_message(&error.to_string())),
                Style::default().fg(Color::LightRed),
            )));
            lines.push(Line::from(""));
        }

        match &snapshot.last_value {
            Some(value) => {
                let summary = summarize(value);
                if summary.is_empty() {
                    lines.push(Line::from("No items"));
                }
                lines.extend(summary.into_iter().map(|line| {
                    Line::from(vec![
                        Span::styled("• ", Style::default().fg(Color::DarkGray)),
                        Span::raw(line),
                    ])
                }));
            }
            None if snapshot.is_in_flight() => lines.push(Line::from("Loading...")),
            None => lines.push(Line::from("No data yet")),
        }
    }

    let title = match state.selected_id() {
        Some(id) => format!("DATA: {}", id.to_uppercase()),
        None => "DATA".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::uniform(1));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
