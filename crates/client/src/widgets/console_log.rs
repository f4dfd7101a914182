use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};

use botshell_core::buffer::BufferLine;
use botshell_core::surface::{SurfaceSnapshot, SURFACE_BACKGROUND};

use crate::theme::color;

const BORDER_COLOR: Color = Color::Rgb(60, 60, 60);

fn styled_line(line: &BufferLine, default_fg: Color) -> Line<'static> {
    line.segments
        .iter()
        .map(|seg| {
            let fg = seg.tag.map_or(default_fg, |tag| color(tag.color()));
            Span::styled(seg.text.clone(), Style::default().fg(fg))
        })
        .collect()
}

fn frame_block(title: &str, lines: usize) -> Block<'static> {
    let heading = Line::from(vec![
        Span::raw(" "),
        Span::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()),
        Span::styled(format!(" {} ", lines), Style::default().fg(Color::DarkGray)),
    ]);
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(color(SURFACE_BACKGROUND)))
        .title(heading)
}

/// Draw the console surface. When following the tail, the last wrapped row
/// sits on the bottom edge.
pub fn render_console_log(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    snapshot: Option<&SurfaceSnapshot>,
) {
    let block = frame_block(title, snapshot.map_or(0, |s| s.lines.len()));
    let inner = block.inner(area);

    let Some(snapshot) = snapshot.filter(|_| inner.width > 0 && inner.height > 0) else {
        frame.render_widget(block, area);
        return;
    };

    let default_fg = color(snapshot.foreground);
    let body = Paragraph::new(
        snapshot
            .lines
            .iter()
            .map(|line| styled_line(line, default_fg))
            .collect::<Vec<_>>(),
    )
    .wrap(Wrap { trim: false });

    // Counted before the block is attached so only text rows are measured.
    let offset = if snapshot.follow_tail {
        body.line_count(inner.width)
            .saturating_sub(usize::from(inner.height))
    } else {
        0
    };
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);

    frame.render_widget(body.block(block).scroll((offset, 0)), area);
}
