//! Event stream reader
//!
//! An event stream is either a JSON array of events or JSON Lines (one event
//! object per line). Blank lines in JSON Lines input are ignored.

use crate::event::Event;
use thiserror::Error;

/// Event stream errors
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Invalid event array at line {line}, column {column}: {message}")]
    InvalidArray {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Invalid event at line {line}: {message}")]
    InvalidEvent { line: usize, message: String },
}

/// Stream result type
pub type StreamResult<T> = Result<T, StreamError>;

/// Parse an event stream from source text
pub fn parse_events(source: &str) -> StreamResult<Vec<Event>> {
    if source.trim_start().starts_with('[') {
        parse_array(source)
    } else {
        parse_lines(source)
    }
}

fn parse_array(source: &str) -> StreamResult<Vec<Event>> {
    serde_json::from_str(source).map_err(|e| StreamError::InvalidArray {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })
}

fn parse_lines(source: &str) -> StreamResult<Vec<Event>> {
    let mut events = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event = serde_json::from_str(line).map_err(|e| StreamError::InvalidEvent {
            line: idx + 1,
            message: e.to_string(),
        })?;
        events.push(event);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_are_skipped() {
        let source = "{\"type\":\"onSpace\"}\n\n   \n{\"type\":\"onNewLine\"}\n";
        let events = parse_events(source).unwrap();
        assert_eq!(events, vec![Event::OnSpace, Event::OnNewLine]);
    }

    #[test]
    fn test_empty_source() {
        assert!(parse_events("").unwrap().is_empty());
    }

    #[test]
    fn test_line_error_reports_line_number() {
        let source = "{\"type\":\"onSpace\"}\n{\"type\":\"onNothing\"}\n";
        match parse_events(source) {
            Err(StreamError::InvalidEvent { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_array_error_reports_position() {
        let source = "[\n  {\"type\":\"onSpace\"},\n  {\"type\": 3}\n]";
        match parse_events(source) {
            Err(StreamError::InvalidArray { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
