use std::io;
use std::time::Duration;

use crossterm::event::{
    self as term, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    /// The window manager (or terminal) asked us to go away.
    CloseRequested,
}

/// Non-blocking source of window input.
pub trait EventSource {
    /// Return whatever is already queued without waiting.
    fn drain(&mut self) -> io::Result<Vec<Event>>;
}

pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn drain(&mut self) -> io::Result<Vec<Event>> {
        let mut events = Vec::new();
        while term::poll(Duration::ZERO)? {
            match term::read()? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    // Raw mode swallows SIGINT; treat Ctrl+C like the close button.
                    if is_interrupt(&key) {
                        events.push(Event::CloseRequested);
                    } else {
                        events.push(Event::Key(key));
                    }
                }
                CrosstermEvent::Resize(w, h) => events.push(Event::Resize(w, h)),
                _ => {}
            }
        }
        Ok(events)
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}
