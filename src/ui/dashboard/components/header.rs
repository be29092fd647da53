//! Dashboard header component
//!
//! Renders the title and the source health gauge

use super::super::state::DashboardState;
use crate::poller::SourceState;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

/// Render header with title, environment and source health.
pub fn render_header(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let uptime = state.start_time.elapsed().as_secs();
    let title_text = format!(
        "TREND DASH v{} | {} | {} | up {}m {}s",
        env!("CARGO_PKG_VERSION"),
        state.environment,
        state.base_url,
        uptime / 60,
        uptime % 60
    );

    let title = Paragraph::new(title_text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Thick),
        );
    f.render_widget(title, header_chunks[0]);

    let count = |wanted: SourceState| {
        state
            .sources
            .iter()
            .filter(|(_, snapshot)| snapshot.state == wanted)
            .count()
    };
    let total = state.sources.len();
    let healthy = count(SourceState::Settled);
    let failed = count(SourceState::Failed);
    let fetching = count(SourceState::Fetching);

    let progress_percent = if total == 0 {
        0
    } else {
        (healthy * 100 / total) as u16
    };
    let gauge_color = if failed > 0 {
        Color::LightYellow
    } else {
        Color::LightGreen
    };
    let progress_text = format!(
        "{}/{} sources up to date | {} failing | {} fetching",
        healthy, total, failed, fetching
    );

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .gauge_style(
            Style::default()
                .fg(gauge_color)
                .add_modifier(Modifier::BOLD),
        )
        .percent(progress_percent)
        .label(progress_text);

    f.render_widget(gauge, header_chunks[1]);
}
