//! evmark-core: render document event streams as Markdown
//!
//! This crate provides:
//! - An escaping output sink with deferred escaping
//! - A block-nesting state tracker
//! - Link and image reference serialization
//! - The event to Markdown renderer
//!
//! # Example
//!
//! ```
//! use evmark_core::{Event, RenderOptions, render};
//!
//! let events = vec![
//!     Event::begin_document(),
//!     Event::begin_header(1),
//!     Event::word("Title"),
//!     Event::end_header(1),
//!     Event::end_document(),
//! ];
//!
//! let markdown = render(&events, &RenderOptions::default()).unwrap();
//! assert_eq!(markdown, "Title\n=====");
//! ```

pub mod abbr;
pub mod error;
pub mod escape;
pub mod reference;
pub mod renderer;
pub mod state;

// Re-export main types for convenient access
pub use abbr::{AbbrError, Abbreviation, parse_abbreviation};
pub use error::{RenderError, RenderResult};
pub use escape::{EscapingSink, SinkStack, escape_markdown};
pub use evmark_events::{Event, Format, ListKind, Parameters, ResourceReference, ResourceType};
pub use reference::{DefaultReferenceSerializer, ReferenceSerializer};
pub use renderer::{MacroFallback, RenderOptions, Rendered, Renderer, format_table, render};
pub use state::{BlockState, Container, Transition};
