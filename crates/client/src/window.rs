use std::io;

use ratatui::backend::Backend;
use ratatui::Terminal;

use botshell_core::error::WindowError;

use crate::event::{Event, EventSource};
use crate::view::ShellView;

/// The single top-level window the shell drives.
///
/// All calls are synchronous; none of them may wait for input.
pub trait Window {
    fn set_title(&mut self, title: &str) -> Result<(), WindowError>;

    /// Redraw from `view` immediately.
    fn draw(&mut self, view: &ShellView<'_>) -> Result<(), WindowError>;

    /// Pending input, without blocking.
    fn poll_events(&mut self) -> Result<Vec<Event>, WindowError>;

    /// Tear the window down. A second call reports [`WindowError::Destroyed`].
    fn destroy(&mut self) -> Result<(), WindowError>;
}

type Hook = Box<dyn FnOnce() -> io::Result<()>>;

/// A ratatui terminal plus its input source.
pub struct TerminalWindow<B: Backend, E: EventSource> {
    terminal: Option<Terminal<B>>,
    events: E,
    title_fn: fn(&str) -> io::Result<()>,
    on_destroy: Option<Hook>,
}

impl TerminalWindow<ratatui::backend::CrosstermBackend<std::io::Stdout>, crate::event::CrosstermEvents> {
    /// Take over the controlling terminal (raw mode, alternate screen).
    pub fn open(title: &str) -> io::Result<Self> {
        let terminal = crate::tui::init(title)?;
        Ok(Self::new(terminal, crate::event::CrosstermEvents)
            .with_title_fn(crate::tui::set_title)
            .on_destroy(Box::new(crate::tui::restore)))
    }
}

impl<B: Backend, E: EventSource> TerminalWindow<B, E> {
    pub fn new(terminal: Terminal<B>, events: E) -> Self {
        Self {
            terminal: Some(terminal),
            events,
            title_fn: |_| Ok(()),
            on_destroy: None,
        }
    }

    #[must_use]
    pub fn with_title_fn(mut self, title_fn: fn(&str) -> io::Result<()>) -> Self {
        self.title_fn = title_fn;
        self
    }

    /// Run once when the window is destroyed (or dropped while still open).
    #[must_use]
    pub fn on_destroy(mut self, hook: Hook) -> Self {
        self.on_destroy = Some(hook);
        self
    }

    pub fn is_open(&self) -> bool {
        self.terminal.is_some()
    }

    fn terminal(&mut self) -> Result<&mut Terminal<B>, WindowError> {
        self.terminal.as_mut().ok_or(WindowError::Destroyed)
    }
}

impl<B: Backend, E: EventSource> Window for TerminalWindow<B, E> {
    fn set_title(&mut self, title: &str) -> Result<(), WindowError> {
        self.terminal()?;
        (self.title_fn)(title)?;
        Ok(())
    }

    fn draw(&mut self, view: &ShellView<'_>) -> Result<(), WindowError> {
        self.terminal()?.draw(|frame| view.render(frame))?;
        Ok(())
    }

    fn poll_events(&mut self) -> Result<Vec<Event>, WindowError> {
        self.terminal()?;
        match self.events.drain() {
            Ok(events) => Ok(events),
            Err(e) => {
                // Input is gone for good; treat it as the window closing.
                self.terminal = None;
                if let Some(hook) = self.on_destroy.take() {
                    let _ = hook();
                }
                Err(WindowError::Io(e))
            }
        }
    }

    fn destroy(&mut self) -> Result<(), WindowError> {
        if self.terminal.take().is_none() {
            return Err(WindowError::Destroyed);
        }
        if let Some(hook) = self.on_destroy.take() {
            hook()?;
        }
        Ok(())
    }
}

impl<B: Backend, E: EventSource> Drop for TerminalWindow<B, E> {
    fn drop(&mut self) {
        if self.is_open() {
            let _ = self.destroy();
        }
    }
}


#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::testing::{headless, screen};
    use super::*;
    use crate::event::scripted::ScriptedEvents;
    use crate::status::{AppState, StatusIndicator};

    fn view(status: &StatusIndicator) -> ShellView<'_> {
        ShellView {
            title: "Test Bot",
            state: AppState::Running,
            status,
            console: None,
            dialog: None,
        }
    }

    #[test]
    fn test_draw_renders_title_and_status() {
        let (mut window, _) = headless(ScriptedEvents::new());
        let status = StatusIndicator {
            text: "Bot running...".into(),
            color: crate::theme::STATUS_RUNNING_COLOR,
        };
        window.draw(&view(&status)).unwrap();

        let text = screen(&window);
        assert!(text.contains("Test Bot"));
        assert!(text.contains("Bot running..."));
        assert!(text.contains("[ Close ]"));
    }

    #[test]
    fn test_destroy_runs_hook_once() {
        let (mut window, destroyed) = headless(ScriptedEvents::new());
        window.destroy().unwrap();
        assert!(matches!(window.destroy(), Err(WindowError::Destroyed)));
        drop(window);
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_restores_open_window() {
        let (window, destroyed) = headless(ScriptedEvents::new());
        drop(window);
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hang_up_closes_window() {
        let (mut window, destroyed) = headless(ScriptedEvents::new().then_hang_up());
        assert!(matches!(window.poll_events(), Err(WindowError::Io(_))));
        assert!(!window.is_open());
        let status = StatusIndicator::default();
        assert!(matches!(window.draw(&view(&status)), Err(WindowError::Destroyed)));
        assert!(matches!(window.destroy(), Err(WindowError::Destroyed)));
        assert_eq!(destroyed.load(Ordering::SeqCst), 1);
    }
}
