use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::dialog::{Dialog, DialogKind};
use crate::theme::{color, STATUS_ERROR_COLOR};

/// Centered modal box over `area`.
pub fn render_dialog(frame: &mut Frame, area: Rect, dialog: &Dialog) {
    let accent = match dialog.kind {
        DialogKind::Info => Color::Cyan,
        DialogKind::Error => color(STATUS_ERROR_COLOR),
    };

    let width = area.width.min(60);
    let text_width = usize::from(width.saturating_sub(4).max(1));
    let message_rows: usize = dialog
        .message
        .split('\n')
        .map(|l| l.chars().count().max(1).div_ceil(text_width))
        .sum();
    // borders (2) + blank + hint
    let height = u16::try_from(message_rows + 4)
        .unwrap_or(u16::MAX)
        .min(area.height);

    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, popup_area);

    let mut lines: Vec<Line> = dialog
        .message
        .split('\n')
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::White))))
        .collect();
    lines.push(Line::from(" "));
    lines.push(Line::from(Span::styled(
        "press Enter to dismiss",
        Style::default().fg(Color::DarkGray).italic(),
    )));

    let popup = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(Style::default().fg(accent))
            .title(Span::styled(
                format!(" {} ", dialog.title),
                Style::default().fg(accent).bold(),
            ))
            .style(Style::default().bg(Color::Rgb(30, 30, 30))),
    );
    frame.render_widget(popup, popup_area);
}
