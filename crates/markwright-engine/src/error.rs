//! Error types for building and writing Markdown.

use thiserror::Error;

use crate::writer::State;

/// A caller supplied a value outside the domain of the construct.
///
/// Raised at the point of construction (element records, format options) or
/// at the point of writing, never clamped or corrected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("heading level must be between 1 and 6, got {0}")]
    HeadingLevel(u8),

    #[error("horizontal rule count must be at least 3, got {0}")]
    HorizontalRuleCount(usize),

    #[error("horizontal rule separator may only contain spaces, got {0:?}")]
    HorizontalRuleSeparator(String),

    #[error("ordered list number must not exceed 999999999, got {0}")]
    OrderedListNumber(usize),

    #[error("{argument} must not contain whitespace: {value:?}")]
    Whitespace {
        argument: &'static str,
        value: String,
    },

    #[error("entity name must be non-empty and alphanumeric, got {0:?}")]
    EntityName(String),

    #[error("comment text must not contain \"--\" or end with \"-\": {0:?}")]
    Comment(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("code fence info string must not contain a backtick or a newline: {0:?}")]
    InfoString(String),
}

/// Errors produced while driving a [`MarkdownWriter`](crate::MarkdownWriter)
/// or editing a [`Document`](crate::Document).
#[derive(Debug, Error)]
pub enum MarkdownError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("cannot end {expected:?}: innermost open construct is {found:?}")]
    UnexpectedEnd {
        expected: State,
        found: Option<State>,
    },

    #[error("{0:?} can only be written inside {1:?}")]
    Misplaced(State, State),

    #[error("tables cannot be nested")]
    NestedTable,

    #[error("writer is closed")]
    Closed,

    #[error("node {0} is not a container")]
    NotAContainer(usize),

    #[error("node {0} does not belong to this document")]
    UnknownNode(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("formatting error")]
    Fmt(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, MarkdownError>;
