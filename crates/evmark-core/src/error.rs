//! Render errors
//!
//! Every error here is a structural violation of the event stream. The
//! render of the current document is aborted when one is returned.

use thiserror::Error;

/// Renderer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Unbalanced events: {event} closes a {expected}, but the innermost open element is a {found}")]
    Unbalanced {
        event: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Unexpected {event}: no {expected} is open")]
    UnexpectedEnd {
        event: &'static str,
        expected: &'static str,
    },

    #[error("{event} is only valid inside a {container}")]
    Misplaced {
        event: &'static str,
        container: &'static str,
    },

    #[error("Unclosed {0} at end of stream")]
    Unclosed(&'static str),

    #[error("Cannot pop the document output sink")]
    EmptySinkStack,

    #[error("List item without an open list")]
    NoOpenList,

    #[error("Table event without an open table")]
    NoOpenTable,

    #[error("Table cell outside of a table row")]
    NoTableRow,
}

/// Render result type
pub type RenderResult<T> = Result<T, RenderError>;
