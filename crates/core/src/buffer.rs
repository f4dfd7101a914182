use std::collections::VecDeque;

use crate::severity::Tag;

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub tag: Option<Tag>,
}

/// One display line, possibly assembled from several writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferLine {
    pub segments: Vec<Segment>,
}

impl BufferLine {
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn push(&mut self, text: &str, tag: Option<Tag>) {
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(last) if last.tag == tag => last.text.push_str(text),
            _ => self.segments.push(Segment {
                text: text.to_string(),
                tag,
            }),
        }
    }
}

/// Line-bounded text buffer with FIFO eviction of whole lines.
///
/// Text after the last `'\n'` forms an open line that the next insert
/// continues. An empty open line does not count towards capacity.
#[derive(Debug, Clone)]
pub struct BoundedTextBuffer {
    lines: VecDeque<BufferLine>,
    open: BufferLine,
    capacity: usize,
}

impl BoundedTextBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(1024)),
            open: BufferLine::default(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert text at the end without trimming.
    pub fn insert(&mut self, text: &str, tag: Option<Tag>) {
        let mut parts = text.split('\n');
        if let Some(first) = parts.next() {
            self.open.push(first, tag);
        }
        for part in parts {
            let finished = std::mem::take(&mut self.open);
            self.lines.push_back(finished);
            self.open.push(part, tag);
        }
    }

    /// Number of lines currently held.
    pub fn line_count(&self) -> usize {
        self.lines.len() + usize::from(!self.open.is_empty())
    }

    /// Drop the earliest lines until at most `max` remain.
    /// Returns how many lines were evicted.
    pub fn trim_to(&mut self, max: usize) -> usize {
        let mut evicted = 0;
        while self.line_count() > max {
            if self.lines.pop_front().is_none() {
                self.open = BufferLine::default();
            }
            evicted += 1;
        }
        evicted
    }

    /// Insert and trim to this buffer's own capacity.
    pub fn append(&mut self, text: &str, tag: Option<Tag>) -> usize {
        self.insert(text, tag);
        self.trim_to(self.capacity)
    }

    /// Retained lines in order, including a non-empty open line.
    pub fn lines(&self) -> impl Iterator<Item = &BufferLine> {
        let open = (!self.open.is_empty()).then_some(&self.open);
        self.lines.iter().chain(open)
    }

    /// Full text content, newline separators included.
    pub fn content(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text());
            out.push('\n');
        }
        out.push_str(&self.open.text());
        out
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.open = BufferLine::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(buf: &BoundedTextBuffer) -> Vec<String> {
        buf.lines().map(|l| l.text()).collect()
    }

    #[test]
    fn test_capacity_two_keeps_last_two() {
        let mut buf = BoundedTextBuffer::new(2);
        buf.append("line1\n", None);
        buf.append("line2\n", None);
        buf.append("line3\n", None);

        let content = buf.content();
        assert!(!content.contains("line1"));
        assert!(content.contains("line2"));
        assert!(content.contains("line3"));
        assert_eq!(texts(&buf), vec!["line2", "line3"]);
    }

    #[test]
    fn test_never_exceeds_capacity_and_keeps_newest_in_order() {
        let cap = 5;
        let mut buf = BoundedTextBuffer::new(cap);
        for i in 0..23 {
            buf.append(&format!("entry {}\n", i), None);
            assert!(buf.line_count() <= cap);

            let total: usize = i + 1;
            let expected: Vec<String> = (total.saturating_sub(cap)..total)
                .map(|n| format!("entry {}", n))
                .collect();
            assert_eq!(texts(&buf), expected);
        }
    }

    #[test]
    fn test_partial_writes_join_into_one_line() {
        let mut buf = BoundedTextBuffer::new(10);
        buf.append("hel", None);
        buf.append("lo\nwor", None);
        assert_eq!(texts(&buf), vec!["hello", "wor"]);
        buf.append("ld\n", None);
        assert_eq!(texts(&buf), vec!["hello", "world"]);
        assert_eq!(buf.content(), "hello\nworld\n");
    }

    #[test]
    fn test_open_line_counts_when_not_empty() {
        let mut buf = BoundedTextBuffer::new(2);
        buf.append("a\nb\nc", None);
        assert_eq!(texts(&buf), vec!["b", "c"]);
    }

    #[test]
    fn test_multi_line_insert_evicts_whole_lines() {
        let mut buf = BoundedTextBuffer::new(3);
        let evicted = buf.append("1\n2\n3\n4\n5\n", None);
        assert_eq!(evicted, 2);
        assert_eq!(texts(&buf), vec!["3", "4", "5"]);
    }

    #[test]
    fn test_segments_keep_tags() {
        let mut buf = BoundedTextBuffer::new(4);
        buf.insert("plain ", None);
        buf.insert("warn\n", Some(Tag::Warning));
        let line = buf.lines().next().cloned().unwrap();
        assert_eq!(line.segments.len(), 2);
        assert_eq!(line.segments[0].tag, None);
        assert_eq!(line.segments[1].tag, Some(Tag::Warning));
        assert_eq!(line.text(), "plain warn");
    }

    #[test]
    fn test_zero_capacity_holds_nothing() {
        let mut buf = BoundedTextBuffer::new(0);
        buf.append("x\ny", None);
        assert_eq!(buf.line_count(), 0);
        assert_eq!(buf.content(), "");
    }
}
