//! Dashboard sources panel component
//!
//! Lists every registered source with its state and the age of its data

use super::super::state::DashboardState;
use super::super::utils::{format_age, get_state_color};
use chrono::Local;
use ratatui::Frame;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph};

/// Render the list of sources, highlighting the selected one.
pub fn render_sources_panel(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let now = Local::now();
    let selected = state.selected_index();

    let lines: Vec<Line> = state
        .sources
        .iter()
        .enumerate()
        .map(|(index, (id, snapshot))| {
            let is_selected = selected == Some(index);
            let marker = if is_selected { "▶ " } else { "  " };
            let id_style = if is_selected {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };

            Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<16}", id), id_style),
                Span::styled(
                    format!("{:<9}", snapshot.state.to_string()),
                    Style::default().fg(get_state_color(snapshot.state)),
                ),
                Span::styled(
                    format_age(snapshot.last_settled_at, now),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    let paragraph = if lines.is_empty() {
        Paragraph::new(vec![Line::from("No sources registered")])
    } else {
        Paragraph::new(lines)
    };

    let block = Block::default()
        .title("SOURCES")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::uniform(1));

    f.render_widget(paragraph.block(block), area);
}
