//! Immutable element records.
//!
//! Each record holds only its own fields, validates them on construction
//! and offers `with_*` copies instead of setters. Equality compares fields
//! ordinally. Every record implements [`WriteMarkdown`](crate::WriteMarkdown)
//! and can be added to a [`Document`](crate::Document) as a leaf.

mod block;
mod inline;

pub use block::{
    FencedCodeBlock, Heading, HorizontalRule, IndentedCodeBlock, ListItem, OrderedListItem,
    TableColumn, TaskListItem,
};
pub use inline::{
    Autolink, CharacterReference, Comment, EntityReference, Image, ImageReference, InlineCode,
    Link, LinkDefinition, LinkReference,
};
