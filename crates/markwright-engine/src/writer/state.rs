/// Kind of construct currently open in a writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Bold,
    Italic,
    Strikethrough,
    Link,
    Image,
    Heading,
    ListItem,
    OrderedListItem,
    TaskListItem,
    BlockQuote,
    IndentedCodeBlock,
    Table,
    TableRow,
    TableCell,
}

/// One entry of the writer's open-construct stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Frame {
    /// Delimited inline span (emphasis, link or image text).
    Inline(State),
    Heading {
        level: u8,
        /// Setext underline character, `None` for ATX headings.
        underline: Option<char>,
        /// Written length when the heading text began.
        start: usize,
    },
    /// Any list item kind; `indent` is the width of its marker.
    ListItem { state: State, indent: usize },
    BlockQuote,
    IndentedCodeBlock,
    Table,
    TableRow,
    TableCell,
}

impl Frame {
    pub(crate) fn state(&self) -> State {
        match self {
            Frame::Inline(state) => *state,
            Frame::Heading { .. } => State::Heading,
            Frame::ListItem { state, .. } => *state,
            Frame::BlockQuote => State::BlockQuote,
            Frame::IndentedCodeBlock => State::IndentedCodeBlock,
            Frame::Table => State::Table,
            Frame::TableRow => State::TableRow,
            Frame::TableCell => State::TableCell,
        }
    }
}

/// Why the next block needs a blank line in front of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Separation {
    /// A list item just closed; another list item may follow directly.
    ListItem,
    /// A block quote just closed.
    BlockQuote,
}
