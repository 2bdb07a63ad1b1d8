use crate::error::Result;
use crate::escape::{self, EscapeContext};
use crate::format::CharReferenceFormat;

use super::value::WriteMarkdown;
use super::{Frame, MarkdownWriter, State};

impl MarkdownWriter<'_> {
    pub fn write_start_bold(&mut self) -> Result<()> {
        self.start_span(State::Bold, self.format.bold_delimiter())
    }

    pub fn write_end_bold(&mut self) -> Result<()> {
        self.end_span(State::Bold, self.format.bold_delimiter())
    }

    pub fn write_bold<T: WriteMarkdown + ?Sized>(&mut self, content: &T) -> Result<()> {
        self.write_start_bold()?;
        content.write_markdown(self)?;
        self.write_end_bold()
    }

    pub fn write_start_italic(&mut self) -> Result<()> {
        self.start_span(State::Italic, self.format.italic_delimiter())
    }

    pub fn write_end_italic(&mut self) -> Result<()> {
        self.end_span(State::Italic, self.format.italic_delimiter())
    }

    pub fn write_italic<T: WriteMarkdown + ?Sized>(&mut self, content: &T) -> Result<()> {
        self.write_start_italic()?;
        content.write_markdown(self)?;
        self.write_end_italic()
    }

    pub fn write_start_strikethrough(&mut self) -> Result<()> {
        self.start_span(State::Strikethrough, self.format.strikethrough_delimiter())
    }

    pub fn write_end_strikethrough(&mut self) -> Result<()> {
        self.end_span(State::Strikethrough, self.format.strikethrough_delimiter())
    }

    pub fn write_strikethrough<T: WriteMarkdown + ?Sized>(&mut self, content: &T) -> Result<()> {
        self.write_start_strikethrough()?;
        content.write_markdown(self)?;
        self.write_end_strikethrough()
    }

    /// The opening delimiter waits for the first content, so a span that
    /// stays empty leaves no `****` or `~~~~` behind.
    fn start_span(&mut self, state: State, delimiter: &str) -> Result<()> {
        self.check_open()?;
        self.pending_delimiters.push_str(delimiter);
        self.push(Frame::Inline(state));
        Ok(())
    }

    fn end_span(&mut self, state: State, delimiter: &str) -> Result<()> {
        self.pop(state)?;
        if !self.pending_delimiters.is_empty() {
            // spans nest, so the innermost pending opener is this one
            let keep = self.pending_delimiters.len().saturating_sub(delimiter.len());
            self.pending_delimiters.truncate(keep);
            return Ok(());
        }
        self.put(delimiter)
    }

    /// Write a code span. Only backticks are escaped; a space pads each side
    /// when the text starts or ends with a backtick.
    pub fn write_inline_code(&mut self, text: &str) -> Result<()> {
        let padding = if text.starts_with('`') || text.ends_with('`') {
            " "
        } else {
            ""
        };
        self.put("`")?;
        self.put(padding)?;
        self.write_escaped(text, EscapeContext::InlineCode)?;
        self.put(padding)?;
        self.put("`")
    }

    /// Open `[` of an inline link; text written until
    /// [`write_end_link`](Self::write_end_link) is escaped as link text.
    pub fn write_start_link(&mut self) -> Result<()> {
        self.put("[")?;
        self.push(Frame::Inline(State::Link));
        Ok(())
    }

    pub fn write_end_link(&mut self, url: &str, title: Option<&str>) -> Result<()> {
        escape::validate_url("url", url)?;
        self.pop(State::Link)?;
        self.put("]")?;
        self.write_destination(url, title)
    }

    pub fn write_start_image(&mut self) -> Result<()> {
        self.put("![")?;
        self.push(Frame::Inline(State::Image));
        Ok(())
    }

    pub fn write_end_image(&mut self, url: &str, title: Option<&str>) -> Result<()> {
        escape::validate_url("url", url)?;
        self.pop(State::Image)?;
        self.put("]")?;
        self.write_destination(url, title)
    }

    /// `[text](url "title")`
    pub fn write_link(&mut self, text: &str, url: &str, title: Option<&str>) -> Result<()> {
        escape::validate_url("url", url)?;
        self.put("[")?;
        self.write_escaped(text, EscapeContext::LinkText)?;
        self.put("]")?;
        self.write_destination(url, title)
    }

    /// `![text](url "title")`
    pub fn write_image(&mut self, text: &str, url: &str, title: Option<&str>) -> Result<()> {
        escape::validate_url("url", url)?;
        self.put("!")?;
        self.write_link(text, url, title)
    }

    fn write_destination(&mut self, url: &str, title: Option<&str>) -> Result<()> {
        self.put("(")?;
        self.write_escaped(url, EscapeContext::LinkUrl)?;
        if let Some(title) = title {
            self.put(" \"")?;
            self.write_escaped(title, EscapeContext::LinkTitle)?;
            self.put("\"")?;
        }
        self.put(")")
    }

    /// `<url>`
    pub fn write_autolink(&mut self, url: &str) -> Result<()> {
        escape::validate_url("url", url)?;
        self.put("<")?;
        self.write_escaped(url, EscapeContext::AngleBrackets)?;
        self.put(">")
    }

    /// `[text][label]`
    pub fn write_link_reference(&mut self, text: &str, label: &str) -> Result<()> {
        self.put("[")?;
        self.write_escaped(text, EscapeContext::LinkText)?;
        self.put("][")?;
        self.write_escaped(label, EscapeContext::LinkText)?;
        self.put("]")
    }

    /// `![text][label]`
    pub fn write_image_reference(&mut self, text: &str, label: &str) -> Result<()> {
        self.put("!")?;
        self.write_link_reference(text, label)
    }

    /// `&#xHEX;` or `&#N;` depending on the format.
    pub fn write_char_reference(&mut self, value: char) -> Result<()> {
        let reference = match self.format.char_reference_format() {
            CharReferenceFormat::Hexadecimal => format!("&#x{:X};", u32::from(value)),
            CharReferenceFormat::Decimal => format!("&#{};", u32::from(value)),
        };
        self.put(&reference)
    }

    /// `&name;`
    pub fn write_entity_reference(&mut self, name: &str) -> Result<()> {
        escape::validate_entity_name(name)?;
        self.put(&format!("&{name};"))
    }

    /// `<!-- text -->`
    pub fn write_comment(&mut self, text: &str) -> Result<()> {
        escape::validate_comment(text)?;
        self.put("<!-- ")?;
        self.write_raw(text)?;
        self.put(" -->")
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{MarkdownError, ValidationError};
    use crate::format::{CharReferenceFormat, EmphasisStyle, MarkdownFormat};
    use crate::writer::MarkdownWriter;
    use insta::assert_snapshot;

    fn render_with<F>(format: MarkdownFormat, f: F) -> String
    where
        F: FnOnce(&mut MarkdownWriter<'static>) -> crate::error::Result<()>,
    {
        let mut w = MarkdownWriter::new(format);
        f(&mut w).unwrap();
        w.close().unwrap();
        w.into_buffer().unwrap()
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut MarkdownWriter<'static>) -> crate::error::Result<()>,
    {
        render_with(MarkdownFormat::default(), f)
    }

    #[test]
    fn emphasis_delimiters_follow_format() {
        assert_eq!(render(|w| w.write_bold("b")), "**b**");
        assert_eq!(render(|w| w.write_italic("i")), "*i*");
        assert_eq!(render(|w| w.write_strikethrough("s")), "~~s~~");

        let underscores = MarkdownFormat::default()
            .with_bold_style(EmphasisStyle::Underscore)
            .with_italic_style(EmphasisStyle::Underscore);
        assert_eq!(
            render_with(underscores, |w| w.write_italic(&("a ", crate::writer::Bold("b")))),
            "_a __b___"
        );
    }

    #[test]
    fn empty_spans_write_nothing() {
        assert_eq!(render(|w| w.write_bold("")), "");
        assert_eq!(render(|w| w.write_italic("")), "");
        assert_eq!(render(|w| w.write_strikethrough("")), "");
        let out = render(|w| {
            w.write_text("a ")?;
            w.write_bold(&crate::writer::Italic(""))?;
            w.write_text("b")
        });
        assert_eq!(out, "a b");
    }

    #[test]
    fn span_opener_waits_for_content() {
        let mut w = MarkdownWriter::new(MarkdownFormat::default());
        w.write_start_strikethrough().unwrap();
        assert_eq!(w.buffer(), Some(""));
        w.write_text("x").unwrap();
        w.write_end_strikethrough().unwrap();
        assert_eq!(w.buffer(), Some("~~x~~"));
    }

    #[test]
    fn streaming_spans_nest() {
        let out = render(|w| {
            w.write_start_italic()?;
            w.write_text("x ")?;
            w.write_start_bold()?;
            w.write_text("y")?;
            w.write_end_bold()?;
            w.write_end_italic()
        });
        assert_snapshot!(out, @"*x **y***");
    }

    #[test]
    fn inline_code_escapes_backtick_only() {
        assert_eq!(render(|w| w.write_inline_code("a`b")), "`a\\`b`");
        assert_eq!(render(|w| w.write_inline_code("*x*")), "`*x*`");
    }

    #[test]
    fn inline_code_pads_leading_backtick() {
        assert_eq!(render(|w| w.write_inline_code("`tick")), "` \\`tick `");
    }

    #[test]
    fn links_and_images() {
        assert_eq!(
            render(|w| w.write_link("a [b]", "https://x.org/p", None)),
            "[a \\[b\\]](https://x.org/p)"
        );
        assert_eq!(
            render(|w| w.write_link("t", "u", Some("say \"hi\""))),
            "[t](u \"say \\\"hi\\\"\")"
        );
        assert_eq!(
            render(|w| w.write_image("alt", "img.png", Some("T"))),
            "![alt](img.png \"T\")"
        );
    }

    #[test]
    fn link_text_inside_streaming_link() {
        let out = render(|w| {
            w.write_start_link()?;
            w.write_text("see ")?;
            w.write_bold("[docs]")?;
            w.write_end_link("https://docs.rs", None)
        });
        assert_snapshot!(out, @r"[see **\[docs\]**](https://docs.rs)");
    }

    #[test]
    fn url_with_whitespace_is_rejected() {
        let mut w = MarkdownWriter::new(MarkdownFormat::default());
        let err = w.write_link("t", "a b", None).unwrap_err();
        assert!(matches!(
            err,
            MarkdownError::Validation(ValidationError::Whitespace { argument: "url", .. })
        ));
        // nothing was written before the validation failed
        assert_eq!(w.buffer(), Some(""));
    }

    #[test]
    fn autolinks_and_references() {
        assert_eq!(render(|w| w.write_autolink("https://x.org")), "<https://x.org>");
        assert_eq!(
            render(|w| w.write_link_reference("text", "label")),
            "[text][label]"
        );
        assert_eq!(render(|w| w.write_image_reference("a", "1")), "![a][1]");
    }

    #[test]
    fn character_references() {
        assert_eq!(render(|w| w.write_char_reference('©')), "&#xA9;");
        let decimal =
            MarkdownFormat::default().with_char_reference_format(CharReferenceFormat::Decimal);
        assert_eq!(render_with(decimal, |w| w.write_char_reference('©')), "&#169;");
        assert_eq!(render(|w| w.write_entity_reference("nbsp")), "&nbsp;");
    }

    #[test]
    fn invalid_entity_name() {
        let mut w = MarkdownWriter::new(MarkdownFormat::default());
        assert!(w.write_entity_reference("no;pe").is_err());
    }

    #[test]
    fn comments() {
        assert_eq!(render(|w| w.write_comment("note")), "<!-- note -->");
        let mut w = MarkdownWriter::new(MarkdownFormat::default());
        assert!(w.write_comment("a--b").is_err());
        assert!(w.write_comment("dash-").is_err());
    }
}
