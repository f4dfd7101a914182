use ratatui::prelude::*;

use botshell_core::surface::SurfaceSnapshot;

use crate::dialog::Dialog;
use crate::status::{AppState, StatusIndicator};
use crate::widgets::console_log::render_console_log;
use crate::widgets::dialog::render_dialog;
use crate::widgets::status_bar::render_status_bar;

/// Everything the window needs for one frame.
pub struct ShellView<'a> {
    pub title: &'a str,
    pub state: AppState,
    pub status: &'a StatusIndicator,
    /// `None` once the console surface is gone.
    pub console: Option<SurfaceSnapshot>,
    pub dialog: Option<&'a Dialog>,
}

impl ShellView<'_> {
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1), // status bar
        ])
        .split(frame.area());

        render_console_log(frame, chunks[0], self.title, self.console.as_ref());
        render_status_bar(frame, chunks[1], self.status, self.state);

        if let Some(dialog) = self.dialog {
            render_dialog(frame, frame.area(), dialog);
        }
    }
}
