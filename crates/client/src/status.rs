use botshell_core::severity::Rgb;

use crate::theme::STATUS_WAKEUP_COLOR;

/// Lifecycle of the shell around one bot run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    NotStarted,
    Running,
    ShuttingDown,
    Terminated,
}

impl AppState {
    pub fn label(&self) -> &'static str {
        match self {
            AppState::NotStarted => "idle",
            AppState::Running => "running",
            AppState::ShuttingDown => "stopping",
            AppState::Terminated => "stopped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicator {
    pub text: String,
    pub color: Rgb,
}

impl Default for StatusIndicator {
    fn default() -> Self {
        Self {
            text: "Starting...".to_string(),
            color: STATUS_WAKEUP_COLOR,
        }
    }
}
