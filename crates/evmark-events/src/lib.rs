//! evmark-events: document event model for evmark
//!
//! This crate provides:
//! - Document event types (begin/end/on events)
//! - Resource references used by links and images
//! - A reader for JSON and JSON Lines event streams
//!
//! # Example
//!
//! ```
//! use evmark_events::{parse_events, Event};
//!
//! let source = r#"
//! {"type": "beginParagraph"}
//! {"type": "onWord", "text": "Hello"}
//! {"type": "endParagraph"}
//! "#;
//!
//! let events = parse_events(source).unwrap();
//! assert_eq!(events[1], Event::word("Hello"));
//! ```

pub mod event;
pub mod reference;
pub mod stream;

pub use event::{Event, Format, ListKind, Parameters};
pub use reference::{ResourceReference, ResourceType};
pub use stream::{StreamError, StreamResult, parse_events};
