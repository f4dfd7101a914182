//! Scrollable console text area shared by the log sink and stream capture.
//!
//! The surface mirrors a read-only text widget: writers must enable editing,
//! insert, trim and disable editing again. Once destroyed, every call fails
//! with [`SurfaceError::Destroyed`].

use std::sync::{Arc, Mutex, MutexGuard};

use crate::buffer::{BoundedTextBuffer, BufferLine};
use crate::error::SurfaceError;
use crate::severity::{Rgb, Tag};

/// Green-on-dark console defaults.
pub const SURFACE_BACKGROUND: Rgb = Rgb(0x1E, 0x1E, 0x1E);
pub const SURFACE_FOREGROUND: Rgb = Rgb(0x00, 0xFF, 0x00);

struct SurfaceState {
    buffer: BoundedTextBuffer,
    editable: bool,
    follow_tail: bool,
    foreground: Rgb,
    destroyed: bool,
}

/// Point-in-time copy of what the surface shows.
#[derive(Debug, Clone)]
pub struct SurfaceSnapshot {
    pub lines: Vec<BufferLine>,
    pub foreground: Rgb,
    pub follow_tail: bool,
}

#[derive(Clone)]
pub struct ConsoleSurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl ConsoleSurface {
    /// `hard_limit` bounds the underlying buffer regardless of what writers
    /// trim to.
    pub fn new(hard_limit: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(SurfaceState {
                buffer: BoundedTextBuffer::new(hard_limit),
                editable: false,
                follow_tail: true,
                foreground: SURFACE_FOREGROUND,
                destroyed: false,
            })),
        }
    }

    fn live(&self) -> Result<MutexGuard<'_, SurfaceState>, SurfaceError> {
        let guard = self.state.lock().map_err(|_| SurfaceError::Destroyed)?;
        if guard.destroyed {
            return Err(SurfaceError::Destroyed);
        }
        Ok(guard)
    }

    pub fn set_editable(&self, editable: bool) -> Result<(), SurfaceError> {
        self.live()?.editable = editable;
        Ok(())
    }

    pub fn set_foreground(&self, color: Rgb) -> Result<(), SurfaceError> {
        self.live()?.foreground = color;
        Ok(())
    }

    /// Append at the end. Rejected unless editing is enabled.
    pub fn insert_end(&self, text: &str, tag: Option<Tag>) -> Result<(), SurfaceError> {
        let mut state = self.live()?;
        if !state.editable {
            return Err(SurfaceError::ReadOnly);
        }
        state.buffer.insert(text, tag);
        let limit = state.buffer.capacity();
        state.buffer.trim_to(limit);
        Ok(())
    }

    /// Evict the earliest lines until at most `max_lines` remain.
    pub fn trim_to(&self, max_lines: usize) -> Result<usize, SurfaceError> {
        Ok(self.live()?.buffer.trim_to(max_lines))
    }

    /// Scroll so the last line is visible.
    pub fn see_end(&self) -> Result<(), SurfaceError> {
        self.live()?.follow_tail = true;
        Ok(())
    }

    pub fn content(&self) -> Result<String, SurfaceError> {
        Ok(self.live()?.buffer.content())
    }

    pub fn snapshot(&self) -> Result<SurfaceSnapshot, SurfaceError> {
        let state = self.live()?;
        Ok(SurfaceSnapshot {
            lines: state.buffer.lines().cloned().collect(),
            foreground: state.foreground,
            follow_tail: state.follow_tail,
        })
    }

    pub fn destroy(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.destroyed = true;
            state.buffer.clear();
        }
    }

    /// Insert with the enable-edit / trim / scroll / disable-edit sequence.
    pub fn write_bounded(
        &self,
        text: &str,
        tag: Option<Tag>,
        max_lines: usize,
    ) -> Result<(), SurfaceError> {
        self.set_editable(true)?;
        let result = self
            .insert_end(text, tag)
            .and_then(|_| self.trim_to(max_lines))
            .and_then(|_| self.see_end());
        // Leave the surface read-only even if the insert failed.
        let relock = self.set_editable(false);
        result.and(relock)
    }
}
