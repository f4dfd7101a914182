use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::status::{AppState, StatusIndicator};
use crate::theme::{color, BUTTON_BG_COLOR};

const CLOSE_LABEL: &str = " [ Close ] ";

/// Bottom bar: status label on the left, close button on the right.
pub fn render_status_bar(frame: &mut Frame, area: Rect, status: &StatusIndicator, state: AppState) {
    let bar_bg = Color::Rgb(25, 25, 25);
    let chunks = Layout::horizontal([
        Constraint::Min(1),
        Constraint::Length(CLOSE_LABEL.len() as u16),
    ])
    .split(area);

    let left = Line::from(vec![
        Span::styled(
            format!(" {} ", state.label().to_uppercase()),
            Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
        ),
        Span::styled("  ", Style::default().bg(bar_bg)),
        Span::styled(
            status.text.clone(),
            Style::default().fg(color(status.color)).bg(bar_bg).bold(),
        ),
    ]);
    frame.render_widget(Paragraph::new(left).style(Style::default().bg(bar_bg)), chunks[0]);

    let close = Paragraph::new(Line::from(Span::styled(
        CLOSE_LABEL,
        Style::default()
            .fg(Color::White)
            .bg(color(BUTTON_BG_COLOR))
            .bold(),
    )));
    frame.render_widget(close, chunks[1]);
}
