//! Injectable stdout/stderr handles.
//!
//! Components that print take an [`OutputStream`] instead of touching the
//! process handles. The shell redirects the stream to its capture adapter
//! while running and restores the original target afterwards.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

pub fn shared<W: Write + Send + 'static>(writer: W) -> SharedWriter {
    Arc::new(Mutex::new(writer))
}

fn same_writer(a: &SharedWriter, b: &SharedWriter) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

#[derive(Clone)]
pub struct OutputStream {
    name: &'static str,
    original: SharedWriter,
    current: Arc<Mutex<SharedWriter>>,
}

impl OutputStream {
    pub fn new(name: &'static str, original: SharedWriter) -> Self {
        Self {
            name,
            current: Arc::new(Mutex::new(original.clone())),
            original,
        }
    }

    pub fn stdout() -> Self {
        Self::new("stdout", shared(io::stdout()))
    }

    pub fn stderr() -> Self {
        Self::new("stderr", shared(io::stderr()))
    }

    pub fn redirect(&self, to: SharedWriter) {
        if let Ok(mut current) = self.current.lock() {
            *current = to;
        }
    }

    pub fn restore(&self) {
        self.redirect(self.original.clone());
    }

    pub fn original(&self) -> SharedWriter {
        self.original.clone()
    }

    pub fn is_redirected(&self) -> bool {
        !self.points_to(&self.original)
    }

    /// Whether writes currently land in `writer`.
    pub fn points_to(&self, writer: &SharedWriter) -> bool {
        self.current
            .lock()
            .map(|current| same_writer(&current, writer))
            .unwrap_or(false)
    }

    fn poisoned(&self) -> io::Error {
        io::Error::new(io::ErrorKind::Other, format!("{} writer poisoned", self.name))
    }

    fn target(&self) -> io::Result<SharedWriter> {
        self.current
            .lock()
            .map(|current| current.clone())
            .map_err(|_| self.poisoned())
    }
}

impl Write for OutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let target = self.target()?;
        let mut writer = target
            .lock()
            .map_err(|_| self.poisoned())?;
        writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let target = self.target()?;
        let mut writer = target
            .lock()
            .map_err(|_| self.poisoned())?;
        writer.flush()
    }
}

/// The pair of handles a shell owns and hands out.
#[derive(Clone)]
pub struct StdStreams {
    pub stdout: OutputStream,
    pub stderr: OutputStream,
}

impl StdStreams {
    pub fn process() -> Self {
        Self {
            stdout: OutputStream::stdout(),
            stderr: OutputStream::stderr(),
        }
    }

    pub fn redirect_all(&self, to: SharedWriter) {
        self.stdout.redirect(to.clone());
        self.stderr.redirect(to);
    }

    pub fn restore_all(&self) {
        self.stdout.restore();
        self.stderr.restore();
    }
}
