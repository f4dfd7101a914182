use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use botshell_core::severity::Rgb;
use botshell_core::streams::OutputStream;

use crate::theme::STATUS_DEFAULT_COLOR;

/// The unit of work the shell supervises.
///
/// `start` runs until the bot is done. The shell may cancel it at any await
/// point, so it must not rely on running to completion.
#[async_trait]
pub trait Bot: Send {
    fn name(&self) -> &str;
    fn version(&self) -> &str;
    async fn start(&mut self, ctx: BotContext) -> anyhow::Result<()>;
}

/// Window updates requested from inside the bot task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiRequest {
    Status { text: String, color: Rgb },
    Info { title: String, message: String },
    Error { title: String, message: String },
}

/// Queue into the shell loop; drained once per pump.
#[derive(Clone)]
pub struct UiHandle {
    tx: mpsc::UnboundedSender<UiRequest>,
}

impl UiHandle {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<UiRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn set_status(&self, text: impl Into<String>, color: Rgb) {
        let _ = self.tx.send(UiRequest::Status {
            text: text.into(),
            color,
        });
    }

    /// Status text in the default color.
    pub fn set_status_text(&self, text: impl Into<String>) {
        self.set_status(text, STATUS_DEFAULT_COLOR);
    }

    pub fn show_info(&self, title: impl Into<String>, message: impl Into<String>) {
        let _ = self.tx.send(UiRequest::Info {
            title: title.into(),
            message: message.into(),
        });
    }

    pub fn show_error(&self, title: impl Into<String>, message: impl Into<String>) {
        let _ = self.tx.send(UiRequest::Error {
            title: title.into(),
            message: message.into(),
        });
    }
}

/// External close signal. Cloneable; any clone can fire it.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: std::sync::Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            tx: std::sync::Arc::new(tx),
        }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// What the shell hands to a running bot.
pub struct BotContext {
    pub stdout: OutputStream,
    pub stderr: OutputStream,
    /// Flips to `true` when the shell starts closing.
    pub shutdown: watch::Receiver<bool>,
    pub ui: UiHandle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_handle_is_shared() {
        let handle = ShutdownHandle::new();
        let rx = handle.subscribe();
        let other = handle.clone();
        assert!(!handle.is_triggered());
        other.trigger();
        assert!(handle.is_triggered());
        assert!(*rx.borrow());
    }

    #[test]
    fn test_ui_requests_arrive_in_order() {
        let (ui, mut rx) = UiHandle::channel();
        ui.set_status("Joined", Rgb(1, 2, 3));
        ui.show_error("Oops", "Error");
        ui.set_status_text("Idle");

        assert_eq!(
            rx.try_recv().unwrap(),
            UiRequest::Status {
                text: "Joined".into(),
                color: Rgb(1, 2, 3)
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            UiRequest::Error {
                title: "Oops".into(),
                message: "Error".into()
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            UiRequest::Status {
                text: "Idle".into(),
                color: STATUS_DEFAULT_COLOR
            }
        );
        assert!(rx.try_recv().is_err());
    }
}
