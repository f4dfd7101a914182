use std::io::{self, Write};

use crate::severity::Rgb;
use crate::surface::ConsoleSurface;

/// Foreground used once raw output lands on the console (floral white).
pub const CAPTURE_TEXT_COLOR: Rgb = Rgb(0xFF, 0xFA, 0xF0);

/// Tee for raw program output: mirror to a backing writer, show on the
/// console surface, and keep an unbounded copy.
pub struct StreamCapture {
    surface: ConsoleSurface,
    backing: Box<dyn Write + Send>,
    max_lines: usize,
    captured: String,
}

impl StreamCapture {
    pub fn new(surface: ConsoleSurface, backing: Box<dyn Write + Send>, max_lines: usize) -> Self {
        Self {
            surface,
            backing,
            max_lines,
            captured: String::new(),
        }
    }

    /// Everything written so far, regardless of what the console still shows.
    pub fn captured(&self) -> &str {
        &self.captured
    }

    pub fn write_text(&mut self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }

        // Backing stream may be closed; keep going.
        let _ = self
            .backing
            .write_all(text.as_bytes())
            .and_then(|_| self.backing.flush());

        let _ = self
            .surface
            .set_foreground(CAPTURE_TEXT_COLOR)
            .and_then(|_| self.surface.write_bounded(text, None, self.max_lines));

        self.captured.push_str(text);
        text.len()
    }
}

impl Write for StreamCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let text = String::from_utf8_lossy(buf);
        self.write_text(&text);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let _ = self.backing.flush();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Writer that always fails, like a closed pipe.
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_trims_lines() {
        let surface = ConsoleSurface::new(1000);
        let mut capture = StreamCapture::new(surface.clone(), Box::new(io::sink()), 2);

        capture.write_all(b"line1\n").unwrap();
        capture.write_all(b"line2\n").unwrap();
        capture.write_all(b"line3\n").unwrap();

        let content = surface.content().unwrap();
        assert!(!content.contains("line1"));
        assert!(content.contains("line2"));
        assert!(content.contains("line3"));
        assert_eq!(capture.captured(), "line1\nline2\nline3\n");
    }

    #[test]
    fn test_mirrors_to_backing_first() {
        let surface = ConsoleSurface::new(1000);
        let backing = Shared::default();
        let mut capture = StreamCapture::new(surface.clone(), Box::new(backing.clone()), 10);

        writeln!(capture, "hello {}", 42).unwrap();

        assert_eq!(backing.0.lock().unwrap().as_slice(), b"hello 42\n");
        assert_eq!(surface.content().unwrap(), "hello 42\n");
        assert_eq!(surface.snapshot().unwrap().foreground, CAPTURE_TEXT_COLOR);
    }

    #[test]
    fn test_empty_write_is_noop() {
        let surface = ConsoleSurface::new(1000);
        let backing = Shared::default();
        let mut capture = StreamCapture::new(surface.clone(), Box::new(backing.clone()), 10);

        assert_eq!(capture.write(b"").unwrap(), 0);
        assert_eq!(capture.write_text(""), 0);
        assert!(backing.0.lock().unwrap().is_empty());
        assert_eq!(surface.snapshot().unwrap().lines.len(), 0);
    }

    #[test]
    fn test_errors_are_ignored() {
        let surface = ConsoleSurface::new(1000);
        surface.destroy();
        let mut capture = StreamCapture::new(surface, Box::new(Broken), 10);

        assert_eq!(capture.write(b"still counted\n").unwrap(), 14);
        capture.flush().unwrap();
        assert_eq!(capture.captured(), "still counted\n");
    }
}
