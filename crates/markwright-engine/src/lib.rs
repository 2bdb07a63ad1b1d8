//! Markdown generation: a document model and a streaming writer.
//!
//! Content is either built as a [`Document`] tree and rendered with
//! [`Document::to_markdown`], or streamed straight into a
//! [`MarkdownWriter`] through its `write_*` methods. Every value that
//! implements [`WriteMarkdown`] (strings, element records, tables,
//! documents, tuples and sequences of them) can be passed wherever content
//! is expected.
//!
//! ```
//! use markwright_engine::{Bold, MarkdownFormat, MarkdownWriter};
//!
//! let mut w = MarkdownWriter::new(MarkdownFormat::default());
//! w.write_list_item(&("price: ", Bold("2*3"))).unwrap();
//! w.close().unwrap();
//! assert_eq!(w.buffer(), Some("- price: **2\\*3**\n"));
//! ```
//!
//! Style choices (emphasis characters, list markers, heading form, code
//! fences, table layout) live in [`MarkdownFormat`], which is plain data
//! and can be loaded from configuration.

pub mod escape;
pub mod format;

mod elements;
mod error;
mod table;
mod tree;
mod writer;

pub use elements::{
    Autolink, CharacterReference, Comment, EntityReference, FencedCodeBlock, Heading,
    HorizontalRule, Image, ImageReference, IndentedCodeBlock, InlineCode, Link, LinkDefinition,
    LinkReference, ListItem, OrderedListItem, TableColumn, TaskListItem,
};
pub use error::{MarkdownError, Result, ValidationError};
pub use format::{Alignment, MarkdownFormat, NewLine};
pub use table::{Table, TableSource, analyze};
pub use tree::{ContainerKind, Content, Descendants, Document, Elements, Kind, Leaf, NodeId, NodeRef};
pub use writer::{
    Bold, ColumnInfo, EncodedSink, FmtSink, IoSink, Italic, MAX_ORDERED_LIST_NUMBER,
    MarkdownWriter, Sink, State, Strikethrough, WriteMarkdown, WriterSettings, fence_length,
    render,
};
