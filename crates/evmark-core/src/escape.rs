//! Escaping output sinks
//!
//! Content text (words, spaces, plain symbols) is buffered and only escaped
//! when the sink is flushed, because whether a character collides with
//! Markdown syntax depends on what surrounds it (a `1` followed later by a
//! `.` and a space at the start of a line reads as a list marker). Markdown
//! syntax produced by the renderer is written raw and flushes the buffer
//! first.

use crate::error::{RenderError, RenderResult};

/// A text sink that escapes Markdown metacharacters in content text
#[derive(Debug, Clone)]
pub struct EscapingSink {
    output: String,
    /// Content text waiting to be escaped
    pending: String,
    /// Line-start state at the position where `pending` begins
    pending_at_line_start: bool,
    /// Line-start state at the end of `output`
    at_line_start: bool,
    escape_pipes: bool,
}

impl Default for EscapingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EscapingSink {
    /// Create an empty sink positioned at the start of a line
    pub fn new() -> Self {
        Self {
            output: String::new(),
            pending: String::new(),
            pending_at_line_start: true,
            at_line_start: true,
            escape_pipes: false,
        }
    }

    /// Create a sink for table cell content, where `|` must be escaped
    pub fn table_cell() -> Self {
        Self {
            escape_pipes: true,
            at_line_start: false,
            ..Self::new()
        }
    }

    /// Write content text; it is escaped on the next flush
    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.pending.is_empty() {
            self.pending_at_line_start = self.at_line_start;
        }
        self.pending.push_str(text);
    }

    /// Write Markdown syntax verbatim
    pub fn write_raw(&mut self, text: &str) {
        self.flush();
        if text.is_empty() {
            return;
        }
        self.output.push_str(text);
        self.at_line_start = text.ends_with('\n');
    }

    /// Escape and materialize any pending content text
    pub fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let escaped = escape_markdown(&self.pending, self.pending_at_line_start, self.escape_pipes);
        self.pending.clear();
        self.at_line_start = escaped.ends_with('\n');
        self.output.push_str(&escaped);
    }

    /// Whether the next character written would start a new line
    pub fn is_at_line_start(&self) -> bool {
        if self.pending.is_empty() {
            self.at_line_start
        } else {
            self.pending.ends_with('\n')
        }
    }

    pub fn set_at_line_start(&mut self, at_line_start: bool) {
        if self.pending.is_empty() {
            self.at_line_start = at_line_start;
        }
    }

    /// Flush and return the materialized text
    pub fn into_string(mut self) -> String {
        self.flush();
        self.output
    }
}

/// Escape Markdown metacharacters in `text`.
///
/// `at_line_start` tells whether the first character of `text` starts a line.
/// Block markers (`#`, `>`, `-`/`+` bullets, `1.` ordinals, lines of only `-`
/// or only `=`) are only escaped at the start of a line, after optional spaces.
pub fn escape_markdown(text: &str, at_line_start: bool, escape_pipes: bool) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        escape_line(line, at_line_start || i > 0, escape_pipes, &mut out);
    }
    out
}

fn escape_line(line: &str, at_line_start: bool, escape_pipes: bool, out: &mut String) {
    let mut rest = line;
    if at_line_start {
        let body = line.trim_start_matches(' ');
        out.push_str(&line[..line.len() - body.len()]);
        rest = escape_block_marker(body, out);
    }
    for c in rest.chars() {
        match c {
            '\\' | '*' | '_' | '`' => {
                out.push('\\');
                out.push(c);
            }
            '|' if escape_pipes => out.push_str("\\|"),
            _ => out.push(c),
        }
    }
}

/// Escape a block marker at the start of `line`, returning the unprocessed remainder
fn escape_block_marker<'a>(line: &'a str, out: &mut String) -> &'a str {
    let bytes = line.as_bytes();
    if is_setext_underline(line) {
        out.push('\\');
        out.push(bytes[0] as char);
        return &line[1..];
    }
    match bytes.first() {
        Some(b'#') | Some(b'>') => {
            out.push('\\');
            out.push(bytes[0] as char);
            &line[1..]
        }
        Some(b'-') | Some(b'+') if marker_ends_at(bytes, 1) => {
            out.push('\\');
            out.push(bytes[0] as char);
            &line[1..]
        }
        Some(b) if b.is_ascii_digit() => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if bytes.get(digits) == Some(&b'.') && marker_ends_at(bytes, digits + 1) {
                out.push_str(&line[..digits]);
                out.push_str("\\.");
                &line[digits + 1..]
            } else {
                line
            }
        }
        _ => line,
    }
}

/// A line of only `-` or only `=` would turn the previous line into a heading
fn is_setext_underline(line: &str) -> bool {
    let marker = line.trim_end_matches([' ', '\t']);
    !marker.is_empty() && (marker.bytes().all(|b| b == b'-') || marker.bytes().all(|b| b == b'='))
}

fn marker_ends_at(bytes: &[u8], idx: usize) -> bool {
    matches!(bytes.get(idx), None | Some(b' ') | Some(b'\t'))
}

/// The renderer's stack of output sinks; the last one is active.
///
/// The bottom sink holds the document output and can never be popped.
#[derive(Debug)]
pub struct SinkStack {
    sinks: Vec<EscapingSink>,
}

impl Default for SinkStack {
    fn default() -> Self {
        Self::new()
    }
}

impl SinkStack {
    pub fn new() -> Self {
        Self {
            sinks: vec![EscapingSink::new()],
        }
    }

    pub fn active(&mut self) -> &mut EscapingSink {
        let last = self.sinks.len() - 1;
        &mut self.sinks[last]
    }

    pub fn push(&mut self, sink: EscapingSink) {
        self.sinks.push(sink);
    }

    /// Pop the active sink and return its flushed text
    pub fn pop(&mut self) -> RenderResult<String> {
        if self.sinks.len() <= 1 {
            return Err(RenderError::EmptySinkStack);
        }
        let sink = self.sinks.pop().ok_or(RenderError::EmptySinkStack)?;
        Ok(sink.into_string())
    }

    /// Number of sinks, including the document sink
    pub fn depth(&self) -> usize {
        self.sinks.len()
    }

    /// Consume the stack and return the document text
    pub fn into_output(mut self) -> String {
        self.sinks.truncate(1);
        self.sinks
            .pop()
            .map(EscapingSink::into_string)
            .unwrap_or_default()
    }
}
