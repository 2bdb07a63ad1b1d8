//! Context-dependent backslash escaping.
//!
//! Every piece of user text passes through [`escape_with`] before it reaches
//! the output. The character set that needs an escape depends on where the
//! text lands: body text, a code span, link text, a link destination, a link
//! title or an angle-bracket construct. Newlines never reach these
//! predicates; the writer splits text at line breaks first.

use std::borrow::Cow;

use crate::error::ValidationError;

/// The default escape introducer.
pub const ESCAPE_CHAR: char = '\\';

/// Syntactic position of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EscapeContext {
    /// Paragraph, heading, list item and emphasis content.
    Text,
    /// Content of a code span; only the backtick delimiter is escaped.
    InlineCode,
    /// Text between `[` and `]` of a link, image or reference.
    LinkText,
    /// A link destination. Nothing is escaped; whitespace is rejected by
    /// [`validate_url`] before the text gets here.
    LinkUrl,
    /// A double-quoted link title.
    LinkTitle,
    /// Autolinks and other `<...>` constructs.
    AngleBrackets,
}

impl EscapeContext {
    pub fn should_escape(self, ch: char) -> bool {
        match self {
            EscapeContext::Text => should_escape_in_text(ch),
            EscapeContext::InlineCode => ch == '`',
            EscapeContext::LinkText => matches!(ch, '[' | ']'),
            EscapeContext::LinkUrl => false,
            EscapeContext::LinkTitle => ch == '"',
            EscapeContext::AngleBrackets => matches!(ch, '<' | '>'),
        }
    }

    /// Escape `text` for this context with the default introducer.
    pub fn escape(self, text: &str) -> Cow<'_, str> {
        escape_with(text, |ch| self.should_escape(ch), ESCAPE_CHAR)
    }
}

/// Markdown metacharacters escaped in body text.
pub fn should_escape_in_text(ch: char) -> bool {
    matches!(
        ch,
        '\\' | '`'
            | '*'
            | '_'
            | '{'
            | '}'
            | '['
            | ']'
            | '('
            | ')'
            | '#'
            | '+'
            | '-'
            | '.'
            | '!'
            | '<'
    )
}

/// Escape every character of `text` for which `should_escape` holds by
/// prefixing it with `escape_char`.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping. An
/// introducer that is already followed by an escapable character is kept as
/// an existing escape sequence, so escaping an escaped string is a no-op.
///
/// # Examples
///
/// ```
/// use markwright_engine::escape::{escape_with, should_escape_in_text};
///
/// assert_eq!(escape_with("*bold*", should_escape_in_text, '\\'), "\\*bold\\*");
/// assert_eq!(escape_with("\\*bold\\*", should_escape_in_text, '\\'), "\\*bold\\*");
/// ```
pub fn escape_with<F>(text: &str, should_escape: F, escape_char: char) -> Cow<'_, str>
where
    F: Fn(char) -> bool,
{
    let Some(first) = first_unescaped(text, &should_escape, escape_char) else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len() + text.len() / 8 + 1);
    out.push_str(&text[..first]);

    let mut chars = text[first..].chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == escape_char
            && let Some(&next) = chars.peek()
            && should_escape(next)
        {
            out.push(ch);
            out.push(next);
            chars.next();
            continue;
        }
        if should_escape(ch) {
            out.push(escape_char);
        }
        out.push(ch);
    }

    Cow::Owned(out)
}

/// Byte offset of the first character that needs an escape, skipping
/// existing escape sequences.
fn first_unescaped<F>(text: &str, should_escape: &F, escape_char: char) -> Option<usize>
where
    F: Fn(char) -> bool,
{
    let mut chars = text.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if ch == escape_char
            && let Some(&(_, next)) = chars.peek()
            && should_escape(next)
        {
            chars.next();
            continue;
        }
        if should_escape(ch) {
            return Some(i);
        }
    }
    None
}

/// Link destinations and autolinks may not contain literal whitespace.
pub fn validate_url(argument: &'static str, url: &str) -> Result<(), ValidationError> {
    if url.chars().any(char::is_whitespace) {
        return Err(ValidationError::Whitespace {
            argument,
            value: url.to_string(),
        });
    }
    Ok(())
}

/// `&name;` references only accept ASCII alphanumeric names.
pub fn validate_entity_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::EntityName(name.to_string()));
    }
    Ok(())
}

/// HTML comments have no escape mechanism, so bodies that would terminate
/// or malform the comment are rejected.
pub fn validate_comment(text: &str) -> Result<(), ValidationError> {
    if text.contains("--") || text.ends_with('-') {
        return Err(ValidationError::Comment(text.to_string()));
    }
    Ok(())
}
