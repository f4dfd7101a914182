//! Tracing layer that routes WARNING-and-above records onto the console surface.
//!
//! [`ConsoleLayer`] is installed once in the process-wide registry. It holds an
//! empty slot until a [`ConsoleSink`] is attached through its [`SinkHandle`];
//! detaching empties the slot again and the layer goes quiet.

use std::fmt::{self, Write as _};
use std::io::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::Local;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use crate::error::SurfaceError;
use crate::severity::Severity;
use crate::surface::ConsoleSurface;

/// How a record becomes a console line.
#[derive(Debug, Clone, Default)]
pub struct LineFormat {
    pub show_time: bool,
    pub show_target: bool,
}

impl LineFormat {
    pub fn format(&self, severity: Severity, target: &str, record: &RecordText) -> String {
        let mut line = String::new();
        if self.show_time {
            let _ = write!(line, "{} ", Local::now().format("%H:%M:%S"));
        }
        let _ = write!(line, "{}: ", severity.label());
        if self.show_target {
            let _ = write!(line, "{} - ", target);
        }
        line.push_str(record.message.as_deref().unwrap_or_default());
        for (key, value) in &record.fields {
            let _ = write!(line, " {}={}", key, value);
        }
        line
    }
}

/// Message and structured fields pulled out of an event.
#[derive(Debug, Default)]
pub struct RecordText {
    pub message: Option<String>,
    pub fields: Vec<(String, String)>,
    critical: bool,
}

impl Visit for RecordText {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{:?}", value);
        if field.name() == "message" {
            self.message = Some(rendered);
        } else {
            self.fields.push((field.name().to_string(), rendered));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "critical" {
            self.critical = value;
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }
}

/// Bounded, severity-tagged writer onto a [`ConsoleSurface`].
#[derive(Clone)]
pub struct ConsoleSink {
    surface: ConsoleSurface,
    capacity: usize,
    min_severity: Severity,
    format: LineFormat,
}

impl ConsoleSink {
    pub fn new(surface: ConsoleSurface, capacity: usize) -> Self {
        Self {
            surface,
            capacity,
            min_severity: Severity::Warning,
            format: LineFormat::default(),
        }
    }

    #[must_use]
    pub fn with_min_severity(mut self, min: Severity) -> Self {
        self.min_severity = min;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LineFormat) -> Self {
        self.format = format;
        self
    }

    pub fn accepts(&self, severity: Severity) -> bool {
        severity >= self.min_severity
    }

    /// Append one formatted line, tagged by severity, then trim and scroll.
    pub fn emit(&self, line: &str, severity: Severity) -> Result<(), SurfaceError> {
        let mut text = String::with_capacity(line.len() + 1);
        text.push_str(line);
        text.push('\n');
        self.surface.write_bounded(&text, severity.tag(), self.capacity)
    }
}

/// Cloneable handle used to attach or detach the sink at runtime.
#[derive(Clone, Default)]
pub struct SinkHandle {
    slot: Arc<RwLock<Option<ConsoleSink>>>,
    failures: Arc<AtomicU64>,
}

impl SinkHandle {
    pub fn attach(&self, sink: ConsoleSink) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = Some(sink);
        }
    }

    /// Take the sink out of the registry. Returns it if one was attached.
    pub fn detach(&self) -> Option<ConsoleSink> {
        self.slot.write().ok().and_then(|mut slot| slot.take())
    }

    pub fn is_attached(&self) -> bool {
        self.slot.read().map(|s| s.is_some()).unwrap_or(false)
    }

    /// Number of records the surface refused.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

pub struct ConsoleLayer {
    handle: SinkHandle,
}

impl ConsoleLayer {
    pub fn new() -> (Self, SinkHandle) {
        let handle = SinkHandle::default();
        (
            Self {
                handle: handle.clone(),
            },
            handle,
        )
    }

    fn report_failure(&self, err: SurfaceError) {
        self.handle.failures.fetch_add(1, Ordering::Relaxed);
        // Straight to the real stderr: logging from here would re-enter this layer.
        let _ = writeln!(std::io::stderr(), "console sink: {}", err);
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let Ok(slot) = self.handle.slot.read() else {
            return;
        };
        let Some(sink) = slot.as_ref() else {
            return;
        };

        let meta = event.metadata();
        let mut record = RecordText::default();
        event.record(&mut record);

        let severity = Severity::from_level(meta.level(), record.critical);
        if !sink.accepts(severity) {
            return;
        }

        let line = sink.format.format(severity, meta.target(), &record);
        if let Err(err) = sink.emit(&line, severity) {
            self.report_failure(err);
        }
    }
}
