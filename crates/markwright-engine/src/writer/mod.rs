//! Streaming Markdown writer.
//!
//! [`MarkdownWriter`] turns `write_*` calls into Markdown text. It keeps a
//! stack of open constructs and never emits a line break at the moment
//! content logically ends a line. Ends of lines and requested blank lines
//! are queued instead, and the next append flushes them before writing
//! anything else:
//!
//! - a blank line is never duplicated, and never written into empty output
//! - indentation (quote markers, list continuation, indented code) is
//!   computed fresh for every new line from the open constructs
//! - `close()` writes an owed line break but never a trailing blank line
//!
//! ```
//! use markwright_engine::{MarkdownFormat, MarkdownWriter};
//!
//! let mut w = MarkdownWriter::new(MarkdownFormat::default());
//! w.write_heading(1, "Title").unwrap();
//! w.write_text("hello").unwrap();
//! w.close().unwrap();
//! assert_eq!(w.buffer(), Some("# Title\n\nhello"));
//! ```

mod block;
mod inline;
mod sink;
mod state;
mod table;
mod value;

use crate::error::{MarkdownError, Result};
use crate::escape::{ESCAPE_CHAR, EscapeContext, escape_with};
use crate::format::{MarkdownFormat, NewLine};

pub use block::{MAX_ORDERED_LIST_NUMBER, fence_length};
pub use sink::{EncodedSink, FmtSink, IoSink, Sink};
pub use state::State;
pub use table::ColumnInfo;
pub use value::{Bold, Italic, Strikethrough, WriteMarkdown, render};

pub(crate) use block::{validate_heading_level, validate_info_line, validate_list_number};
pub(crate) use state::{Frame, Separation};
use table::TableState;

/// Settings that affect the output but not the Markdown style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriterSettings {
    pub newline: NewLine,
}

enum Output<'a> {
    Buffer(String),
    Sink(&'a mut dyn Sink),
}

/// Width of the indentation owed by an indented code block.
const CODE_BLOCK_INDENT: usize = 4;

pub struct MarkdownWriter<'a> {
    output: Output<'a>,
    format: MarkdownFormat,
    settings: WriterSettings,
    stack: Vec<Frame>,
    quote_depth: usize,
    list_depth: usize,
    /// Characters written so far, including buffered table cell text.
    len: usize,
    /// Value of `len` where the current line began.
    line_start: usize,
    /// Value of `line_start` for the line that follows the last blank line.
    blank_line_start: Option<usize>,
    pending_line: bool,
    pending_empty_line: bool,
    /// The current line holds nothing but list markers (and quote markers
    /// opened right after them).
    prefix_only: bool,
    separation: Option<Separation>,
    /// The last line written holds paragraph text, which a following list
    /// item could be read as continuing.
    paragraph: bool,
    /// Opening span delimiters not yet written; an empty span writes none.
    pending_delimiters: String,
    table: Option<TableState>,
    /// Treat every write as table cell content (width measurement).
    measuring: bool,
    closed: bool,
}

impl MarkdownWriter<'static> {
    /// A writer that renders into its own string buffer.
    pub fn new(format: MarkdownFormat) -> Self {
        Self::with_output(Output::Buffer(String::new()), format)
    }

    /// A buffer writer reusing `buffer`'s allocation. The buffer is cleared.
    pub fn with_buffer(mut buffer: String, format: MarkdownFormat) -> Self {
        buffer.clear();
        Self::with_output(Output::Buffer(buffer), format)
    }

    /// A buffer writer that formats everything as table cell content.
    pub(crate) fn cell_measurer(buffer: String, format: MarkdownFormat) -> Self {
        let mut writer = Self::with_buffer(buffer, format);
        writer.measuring = true;
        writer
    }
}

impl<'a> MarkdownWriter<'a> {
    /// A writer that appends to an external sink.
    pub fn with_sink(sink: &'a mut dyn Sink, format: MarkdownFormat) -> Self {
        Self::with_output(Output::Sink(sink), format)
    }

    fn with_output(output: Output<'a>, format: MarkdownFormat) -> Self {
        Self {
            output,
            format,
            settings: WriterSettings::default(),
            stack: Vec::new(),
            quote_depth: 0,
            list_depth: 0,
            len: 0,
            line_start: 0,
            blank_line_start: None,
            pending_line: false,
            pending_empty_line: false,
            prefix_only: false,
            separation: None,
            paragraph: false,
            pending_delimiters: String::new(),
            table: None,
            measuring: false,
            closed: false,
        }
    }

    pub fn with_settings(mut self, settings: WriterSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn format(&self) -> &MarkdownFormat {
        &self.format
    }

    pub fn settings(&self) -> WriterSettings {
        self.settings
    }

    /// Number of characters written so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn quote_depth(&self) -> usize {
        self.quote_depth
    }

    pub fn list_depth(&self) -> usize {
        self.list_depth
    }

    /// Innermost open construct.
    pub fn current_state(&self) -> Option<State> {
        self.stack.last().map(Frame::state)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Rendered text of a buffer writer; `None` for sink writers.
    pub fn buffer(&self) -> Option<&str> {
        match &self.output {
            Output::Buffer(buffer) => Some(buffer),
            Output::Sink(_) => None,
        }
    }

    pub fn into_buffer(self) -> Option<String> {
        match self.output {
            Output::Buffer(buffer) => Some(buffer),
            Output::Sink(_) => None,
        }
    }

    /// Discard all session state so the writer can render a new document.
    ///
    /// A buffer writer also empties its buffer; a sink writer keeps what the
    /// sink already received and starts counting from zero.
    pub fn clear(&mut self) {
        if let Output::Buffer(buffer) = &mut self.output {
            buffer.clear();
        }
        self.stack.clear();
        self.quote_depth = 0;
        self.list_depth = 0;
        self.len = 0;
        self.line_start = 0;
        self.blank_line_start = None;
        self.pending_line = false;
        self.pending_empty_line = false;
        self.prefix_only = false;
        self.separation = None;
        self.paragraph = false;
        self.pending_delimiters.clear();
        self.table = None;
        self.closed = false;
    }

    /// Write the owed line break, flush the sink and refuse further writes.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        if self.pending_line && self.len > 0 {
            self.write_newline()?;
        }
        self.pending_line = false;
        self.pending_empty_line = false;
        if !self.stack.is_empty() {
            log::debug!("closing writer with open constructs: {:?}", self.stack);
        }
        self.flush()?;
        self.closed = true;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        match &mut self.output {
            Output::Buffer(_) => Ok(()),
            Output::Sink(sink) => sink.flush(),
        }
    }

    /// Write `value` through its [`WriteMarkdown`] implementation.
    pub fn write<T: WriteMarkdown + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.write_markdown(self)
    }

    /// Write user text escaped for the current context.
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        let context = self.text_context();
        self.write_escaped(text, context)
    }

    /// Write text without escaping. Line breaks still go through line
    /// management so every line is indented.
    pub fn write_raw(&mut self, text: &str) -> Result<()> {
        self.write_lines(text, |w, line| w.put(line))
    }

    /// End the current line, even if it is empty.
    pub fn write_line_break(&mut self) -> Result<()> {
        self.check_open()?;
        self.line_break()
    }

    /// End the current line unless the writer is already at a line start.
    pub fn write_line_if_necessary(&mut self) -> Result<()> {
        self.check_open()?;
        self.request_line();
        Ok(())
    }

    /// Queue a blank line before the next content.
    pub fn write_empty_line(&mut self) -> Result<()> {
        self.check_open()?;
        self.request_empty_line();
        Ok(())
    }

    // --- line management -------------------------------------------------

    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(MarkdownError::Closed);
        }
        Ok(())
    }

    fn in_cell(&self) -> bool {
        self.measuring || matches!(&self.table, Some(t) if t.cell.is_some())
    }

    fn at_line_start(&self) -> bool {
        self.len == self.line_start
    }

    fn at_blank_line(&self) -> bool {
        self.at_line_start() && self.blank_line_start == Some(self.line_start)
    }

    pub(crate) fn request_line(&mut self) {
        if self.in_cell() || self.prefix_only {
            return;
        }
        if !self.at_line_start() {
            self.pending_line = true;
        }
    }

    pub(crate) fn request_empty_line(&mut self) {
        if self.in_cell() || self.prefix_only {
            return;
        }
        self.request_line();
        self.pending_empty_line = true;
    }

    /// Flush queued line breaks and write the indentation of a new line.
    /// Runs before every piece of content.
    pub(crate) fn before_write(&mut self) -> Result<()> {
        self.check_open()?;
        if self.in_cell() {
            return Ok(());
        }
        self.flush_pending()?;
        if self.at_line_start() {
            let indent = self.indentation();
            self.emit(&indent)?;
        }
        Ok(())
    }

    /// Write queued line breaks without starting the next line. Constructs
    /// that add indentation call this before pushing their frame, so blank
    /// lines in front of them carry the outer indentation only.
    pub(crate) fn flush_pending(&mut self) -> Result<()> {
        if self.in_cell() {
            return Ok(());
        }
        if self.separation.take().is_some() {
            self.request_empty_line();
        }
        if self.pending_line {
            self.pending_line = false;
            self.write_newline()?;
        }
        if self.pending_empty_line {
            self.pending_empty_line = false;
            if self.len > 0 && !self.at_blank_line() {
                if !self.at_line_start() {
                    self.write_newline()?;
                }
                self.write_newline()?;
            }
        }
        Ok(())
    }

    /// A line break found in text.
    fn line_break(&mut self) -> Result<()> {
        if self.in_cell() {
            return self.put(" ");
        }
        if self.pending_line {
            self.write_newline()?;
        }
        self.prefix_only = false;
        self.pending_line = true;
        Ok(())
    }

    fn write_newline(&mut self) -> Result<()> {
        let was_empty = self.at_line_start();
        if was_empty {
            let indent = self.indentation();
            self.emit(indent.trim_end())?;
        }
        self.emit(self.settings.newline.as_str())?;
        self.line_start = self.len;
        if was_empty {
            self.blank_line_start = Some(self.line_start);
            self.paragraph = false;
        }
        self.prefix_only = false;
        Ok(())
    }

    fn indentation(&self) -> String {
        let mut indent = String::new();
        for frame in &self.stack {
            match frame {
                Frame::BlockQuote => indent.push_str("> "),
                Frame::ListItem { indent: width, .. } => {
                    indent.extend(std::iter::repeat_n(' ', *width));
                }
                Frame::IndentedCodeBlock => {
                    indent.extend(std::iter::repeat_n(' ', CODE_BLOCK_INDENT));
                }
                _ => {}
            }
        }
        indent
    }

    // --- output primitives -----------------------------------------------

    /// Append `s` to the output (or the open table cell) and count it.
    fn emit(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            return Ok(());
        }
        if let Some(cell) = self.table.as_mut().and_then(|t| t.cell.as_mut()) {
            cell.push_str(s);
        } else {
            match &mut self.output {
                Output::Buffer(buffer) => buffer.push_str(s),
                Output::Sink(sink) => sink.write_str(s)?,
            }
        }
        self.len += s.chars().count();
        Ok(())
    }

    /// Write content that belongs on the current line.
    pub(crate) fn put(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            return Ok(());
        }
        self.before_write()?;
        if !self.pending_delimiters.is_empty() {
            let delimiters = std::mem::take(&mut self.pending_delimiters);
            self.emit(&delimiters)?;
        }
        self.emit(s)?;
        self.prefix_only = false;
        if !self.in_cell() {
            self.paragraph = true;
        }
        Ok(())
    }

    /// Write a list marker; the line stays "prefix only" afterwards.
    pub(crate) fn put_prefix(&mut self, s: &str) -> Result<()> {
        self.before_write()?;
        self.emit(s)?;
        self.prefix_only = true;
        Ok(())
    }

    /// Split `text` at `\n`, `\r\n` and `\r`, writing each line with
    /// `write_line` and routing every break through line management.
    fn write_lines<F>(&mut self, text: &str, mut write_line: F) -> Result<()>
    where
        F: FnMut(&mut Self, &str) -> Result<()>,
    {
        self.check_open()?;
        let mut rest = text;
        loop {
            match rest.find(['\n', '\r']) {
                Some(i) => {
                    write_line(self, &rest[..i])?;
                    self.line_break()?;
                    let skip = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                    rest = &rest[i + skip..];
                }
                None => {
                    write_line(self, rest)?;
                    return Ok(());
                }
            }
        }
    }

    pub(crate) fn write_escaped(&mut self, text: &str, context: EscapeContext) -> Result<()> {
        self.write_lines(text, |w, line| {
            let in_cell = w.in_cell();
            let escaped = escape_with(
                line,
                |ch| context.should_escape(ch) || (in_cell && ch == '|'),
                ESCAPE_CHAR,
            );
            w.put(&escaped)
        })
    }

    fn text_context(&self) -> EscapeContext {
        let in_link = self
            .stack
            .iter()
            .any(|f| matches!(f.state(), State::Link | State::Image));
        if in_link {
            EscapeContext::LinkText
        } else {
            EscapeContext::Text
        }
    }

    // --- construct stack -------------------------------------------------

    pub(crate) fn push(&mut self, frame: Frame) {
        self.stack.push(frame);
    }

    /// Pop the innermost construct, which must be `expected`.
    pub(crate) fn pop(&mut self, expected: State) -> Result<Frame> {
        self.check_open()?;
        let found = self.stack.last().map(Frame::state);
        if found == Some(expected)
            && let Some(frame) = self.stack.pop()
        {
            return Ok(frame);
        }
        Err(MarkdownError::UnexpectedEnd { expected, found })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn writer() -> MarkdownWriter<'static> {
        MarkdownWriter::new(MarkdownFormat::default())
    }

    fn finish(mut w: MarkdownWriter<'static>) -> String {
        w.close().unwrap();
        w.into_buffer().unwrap()
    }

    #[test]
    fn text_is_escaped() {
        let mut w = writer();
        w.write_text("1 + 1 = *2*").unwrap();
        assert_eq!(finish(w), "1 \\+ 1 = \\*2\\*");
    }

    #[test]
    fn raw_is_not_escaped() {
        let mut w = writer();
        w.write_raw("**already**").unwrap();
        assert_eq!(finish(w), "**already**");
    }

    #[test]
    fn line_breaks_are_deferred() {
        let mut w = writer();
        w.write_text("a\n").unwrap();
        assert_eq!(w.buffer(), Some("a"));
        w.write_text("b").unwrap();
        assert_eq!(finish(w), "a\nb");
    }

    #[test]
    fn consecutive_newlines_keep_blank_line() {
        let mut w = writer();
        w.write_text("a\n\nb").unwrap();
        assert_eq!(finish(w), "a\n\nb");
    }

    #[test]
    fn crlf_input_is_normalized() {
        let mut w = writer();
        w.write_text("a\r\nb\rc").unwrap();
        assert_eq!(finish(w), "a\nb\nc");
    }

    #[test]
    fn crlf_output_setting() {
        let mut w = writer().with_settings(WriterSettings {
            newline: NewLine::CrLf,
        });
        w.write_text("a\nb").unwrap();
        assert_eq!(finish(w), "a\r\nb");
    }

    #[test]
    fn empty_line_requests_are_idempotent() {
        let mut w = writer();
        w.write_text("a").unwrap();
        w.write_empty_line().unwrap();
        w.write_empty_line().unwrap();
        w.write_text("\n").unwrap();
        w.write_empty_line().unwrap();
        w.write_text("b").unwrap();
        assert_eq!(finish(w), "a\n\nb");
    }

    #[test]
    fn no_blank_line_into_empty_output() {
        let mut w = writer();
        w.write_empty_line().unwrap();
        w.write_text("a").unwrap();
        assert_eq!(finish(w), "a");
    }

    #[test]
    fn write_after_close_fails() {
        let mut w = writer();
        w.close().unwrap();
        assert!(matches!(w.write_text("x"), Err(MarkdownError::Closed)));
    }

    #[test]
    fn unmatched_end_fails() {
        let mut w = writer();
        let err = w.write_end_bold().unwrap_err();
        assert!(matches!(
            err,
            MarkdownError::UnexpectedEnd {
                expected: State::Bold,
                found: None
            }
        ));
    }

    #[test]
    fn crossed_end_fails() {
        let mut w = writer();
        w.write_start_bold().unwrap();
        w.write_start_italic().unwrap();
        let err = w.write_end_bold().unwrap_err();
        assert!(matches!(
            err,
            MarkdownError::UnexpectedEnd {
                expected: State::Bold,
                found: Some(State::Italic)
            }
        ));
    }

    #[test]
    fn clear_resets_session() {
        let mut w = writer();
        w.write_start_block_quote().unwrap();
        w.write_text("quoted").unwrap();
        w.clear();
        assert_eq!(w.quote_depth(), 0);
        assert_eq!(w.current_state(), None);
        w.write_text("fresh").unwrap();
        assert_eq!(finish(w), "fresh");
    }

    #[test]
    fn sink_writer_appends_to_external_string() {
        let mut out = String::from("> ");
        {
            let mut w = MarkdownWriter::with_sink(&mut out, MarkdownFormat::default());
            w.write_bold("x").unwrap();
            w.close().unwrap();
            assert_eq!(w.buffer(), None);
        }
        assert_eq!(out, "> **x**");
    }

    #[test]
    fn len_counts_characters() {
        let mut w = writer();
        w.write_text("héllo").unwrap();
        assert_eq!(w.len(), 5);
    }
}
