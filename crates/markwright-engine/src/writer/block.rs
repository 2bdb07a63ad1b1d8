use crate::error::{MarkdownError, Result, ValidationError};
use crate::escape::{self, EscapeContext};
use crate::format::{CodeFenceStyle, HorizontalRuleStyle, validate_rule};

use super::value::WriteMarkdown;
use super::{CODE_BLOCK_INDENT, Frame, MarkdownWriter, Separation, State};

/// Largest item number CommonMark accepts in an ordered list marker.
pub const MAX_ORDERED_LIST_NUMBER: usize = 999_999_999;

pub(crate) fn validate_heading_level(level: u8) -> std::result::Result<(), ValidationError> {
    if !(1..=6).contains(&level) {
        return Err(ValidationError::HeadingLevel(level));
    }
    Ok(())
}

pub(crate) fn validate_list_number(number: usize) -> std::result::Result<(), ValidationError> {
    if number > MAX_ORDERED_LIST_NUMBER {
        return Err(ValidationError::OrderedListNumber(number));
    }
    Ok(())
}

/// Info strings share the opening fence line, so they cannot span lines.
pub(crate) fn validate_info_line(info: &str) -> std::result::Result<(), ValidationError> {
    if info.contains(['\n', '\r']) {
        return Err(ValidationError::InfoString(info.to_string()));
    }
    Ok(())
}

/// A backtick in the info string would end a backtick fence early.
fn validate_info_string(info: &str, style: CodeFenceStyle) -> std::result::Result<(), ValidationError> {
    validate_info_line(info)?;
    if style == CodeFenceStyle::Backtick && info.contains('`') {
        return Err(ValidationError::InfoString(info.to_string()));
    }
    Ok(())
}

/// Shortest fence (at least three characters) longer than every run of the
/// fence character in `content`.
pub fn fence_length(content: &str, fence_char: char) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;
    for c in content.chars() {
        if c == fence_char {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }
    max_run.max(2) + 1
}

impl MarkdownWriter<'_> {
    // --- headings --------------------------------------------------------

    pub fn write_start_heading(&mut self, level: u8) -> Result<()> {
        self.check_open()?;
        validate_heading_level(level)?;
        let options = self.format.heading_options();
        if options.empty_line_before {
            self.request_empty_line();
        } else {
            self.request_line();
        }
        let underline = match level {
            1 if options.underline_h1 => Some('='),
            2 if options.underline_h2 => Some('-'),
            _ => None,
        };
        self.before_write()?;
        if underline.is_none() {
            let mut marker = "#".repeat(usize::from(level));
            marker.push(' ');
            self.put(&marker)?;
        }
        self.push(Frame::Heading {
            level,
            underline,
            start: self.len,
        });
        Ok(())
    }

    pub fn write_end_heading(&mut self) -> Result<()> {
        let Frame::Heading {
            level,
            underline,
            start,
        } = self.pop(State::Heading)?
        else {
            return Err(MarkdownError::UnexpectedEnd {
                expected: State::Heading,
                found: self.current_state(),
            });
        };
        match underline {
            // a lone underline is not a heading; fall back to ATX
            Some(_) if self.len == start => {
                self.put(&"#".repeat(usize::from(level)))?;
            }
            Some(ch) => {
                let width = self.len.saturating_sub(start);
                self.line_break()?;
                self.put(&ch.to_string().repeat(width))?;
            }
            None if self.format.heading_options().close => {
                let mut closing = String::from(" ");
                closing.push_str(&"#".repeat(usize::from(level)));
                self.put(&closing)?;
            }
            None => {}
        }
        self.paragraph = false;
        if self.format.heading_options().empty_line_after {
            self.request_empty_line();
        } else {
            self.request_line();
        }
        Ok(())
    }

    /// Write a complete heading. `content` is escaped as body text.
    pub fn write_heading<T: WriteMarkdown + ?Sized>(&mut self, level: u8, content: &T) -> Result<()> {
        self.write_start_heading(level)?;
        content.write_markdown(self)?;
        self.write_end_heading()
    }

    // --- list items ------------------------------------------------------

    pub fn write_start_list_item(&mut self) -> Result<()> {
        let marker = format!("{} ", self.format.bullet_list_style().char());
        self.start_list_item(State::ListItem, &marker, 2, true)
    }

    pub fn write_end_list_item(&mut self) -> Result<()> {
        self.end_list_item(State::ListItem)
    }

    pub fn write_list_item<T: WriteMarkdown + ?Sized>(&mut self, content: &T) -> Result<()> {
        self.write_start_list_item()?;
        content.write_markdown(self)?;
        self.write_end_list_item()
    }

    pub fn write_start_ordered_list_item(&mut self, number: usize) -> Result<()> {
        self.check_open()?;
        validate_list_number(number)?;
        let marker = format!("{number}{} ", self.format.ordered_list_style().char());
        let indent = marker.len();
        self.start_list_item(State::OrderedListItem, &marker, indent, number == 1)
    }

    pub fn write_end_ordered_list_item(&mut self) -> Result<()> {
        self.end_list_item(State::OrderedListItem)
    }

    pub fn write_ordered_list_item<T: WriteMarkdown + ?Sized>(
        &mut self,
        number: usize,
        content: &T,
    ) -> Result<()> {
        self.write_start_ordered_list_item(number)?;
        content.write_markdown(self)?;
        self.write_end_ordered_list_item()
    }

    pub fn write_start_task_list_item(&mut self, completed: bool) -> Result<()> {
        let check = if completed { 'x' } else { ' ' };
        let marker = format!("{} [{check}] ", self.format.bullet_list_style().char());
        self.start_list_item(State::TaskListItem, &marker, 2, true)
    }

    pub fn write_end_task_list_item(&mut self) -> Result<()> {
        self.end_list_item(State::TaskListItem)
    }

    pub fn write_task_list_item<T: WriteMarkdown + ?Sized>(
        &mut self,
        completed: bool,
        content: &T,
    ) -> Result<()> {
        self.write_start_task_list_item(completed)?;
        content.write_markdown(self)?;
        self.write_end_task_list_item()
    }

    /// `interrupts` is whether the marker may end a paragraph directly: an
    /// ordered list only can when it starts at 1.
    fn start_list_item(
        &mut self,
        state: State,
        marker: &str,
        indent: usize,
        interrupts: bool,
    ) -> Result<()> {
        self.check_open()?;
        let after_item = self.separation == Some(Separation::ListItem);
        if after_item {
            self.separation = None;
        }
        // Text of the enclosing item may be followed by its nested list
        // directly. Any other paragraph gets a blank line, or an empty item
        // would become a setext underline.
        let in_item = matches!(self.stack.last(), Some(Frame::ListItem { .. }));
        if self.paragraph && !after_item && (!in_item || !interrupts) {
            self.request_empty_line();
        } else {
            self.request_line();
        }
        self.put_prefix(marker)?;
        self.paragraph = false;
        self.push(Frame::ListItem { state, indent });
        self.list_depth += 1;
        Ok(())
    }

    fn end_list_item(&mut self, state: State) -> Result<()> {
        self.pop(state)?;
        self.list_depth = self.list_depth.saturating_sub(1);
        self.prefix_only = false;
        self.request_line();
        self.separation = Some(Separation::ListItem);
        Ok(())
    }

    // --- block quotes ----------------------------------------------------

    pub fn write_start_block_quote(&mut self) -> Result<()> {
        self.check_open()?;
        if self.prefix_only {
            // "- > text": the marker shares the list item line
            self.before_write()?;
            self.emit("> ")?;
        } else {
            self.request_empty_line();
            self.flush_pending()?;
        }
        self.paragraph = false;
        self.push(Frame::BlockQuote);
        self.quote_depth += 1;
        Ok(())
    }

    pub fn write_end_block_quote(&mut self) -> Result<()> {
        self.pop(State::BlockQuote)?;
        self.quote_depth = self.quote_depth.saturating_sub(1);
        self.prefix_only = false;
        self.request_line();
        self.separation = Some(Separation::BlockQuote);
        Ok(())
    }

    pub fn write_block_quote<T: WriteMarkdown + ?Sized>(&mut self, content: &T) -> Result<()> {
        self.write_start_block_quote()?;
        content.write_markdown(self)?;
        self.write_end_block_quote()
    }

    // --- code blocks -----------------------------------------------------

    /// Write a fenced code block. The body is written verbatim; the fence
    /// grows past the longest run of fence characters in it.
    pub fn write_fenced_code_block(&mut self, text: &str, info: Option<&str>) -> Result<()> {
        self.check_open()?;
        let style = self.format.code_fence_style();
        let info = info.unwrap_or("");
        validate_info_string(info, style)?;
        let options = self.format.code_block_options();
        if options.empty_line_before {
            self.request_empty_line();
        } else {
            self.request_line();
        }

        let fence = style
            .char()
            .to_string()
            .repeat(fence_length(text, style.char()));
        self.put(&fence)?;
        self.put(info)?;
        self.line_break()?;
        self.write_raw(text)?;
        self.request_line();
        self.put(&fence)?;
        self.paragraph = false;

        if options.empty_line_after {
            self.request_empty_line();
        } else {
            self.request_line();
        }
        Ok(())
    }

    /// Open an indented code block: every following line is indented by
    /// four spaces until the matching end.
    pub fn write_start_indented_code_block(&mut self) -> Result<()> {
        self.check_open()?;
        if self.prefix_only {
            self.before_write()?;
            self.emit(&" ".repeat(CODE_BLOCK_INDENT))?;
        } else {
            if self.format.code_block_options().empty_line_before {
                self.request_empty_line();
            } else {
                self.request_line();
            }
            self.flush_pending()?;
        }
        self.push(Frame::IndentedCodeBlock);
        Ok(())
    }

    pub fn write_end_indented_code_block(&mut self) -> Result<()> {
        self.pop(State::IndentedCodeBlock)?;
        self.prefix_only = false;
        self.paragraph = false;
        if self.format.code_block_options().empty_line_after {
            self.request_empty_line();
        } else {
            self.request_line();
        }
        Ok(())
    }

    pub fn write_indented_code_block(&mut self, text: &str) -> Result<()> {
        self.write_start_indented_code_block()?;
        self.write_raw(text)?;
        self.write_end_indented_code_block()
    }

    // --- leaf blocks -----------------------------------------------------

    /// Thematic break in the configured style.
    pub fn write_horizontal_rule(&mut self) -> Result<()> {
        let rule = self.format.horizontal_rule_format().clone();
        self.write_horizontal_rule_with(rule.style(), rule.count(), rule.separator())
    }

    /// Thematic break with an explicit shape. Blank lines always surround
    /// it so a `---` rule can never turn the previous line into a setext
    /// heading.
    pub fn write_horizontal_rule_with(
        &mut self,
        style: HorizontalRuleStyle,
        count: usize,
        separator: &str,
    ) -> Result<()> {
        self.check_open()?;
        validate_rule(count, separator)?;
        let ch = style.char().to_string();
        let rule = vec![ch.as_str(); count].join(separator);
        self.request_empty_line();
        self.put(&rule)?;
        self.paragraph = false;
        self.request_empty_line();
        Ok(())
    }

    /// `[label]: url "title"`
    pub fn write_link_definition(
        &mut self,
        label: &str,
        url: &str,
        title: Option<&str>,
    ) -> Result<()> {
        self.check_open()?;
        if label.is_empty() {
            return Err(ValidationError::Empty("label").into());
        }
        escape::validate_url("url", url)?;
        self.request_line();
        self.put("[")?;
        self.write_escaped(label, EscapeContext::LinkText)?;
        self.put("]: ")?;
        self.write_escaped(url, EscapeContext::LinkUrl)?;
        if let Some(title) = title {
            self.put(" \"")?;
            self.write_escaped(title, EscapeContext::LinkTitle)?;
            self.put("\"")?;
        }
        self.paragraph = false;
        self.request_line();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{
        BulletListStyle, CodeBlockOptions, CodeFenceStyle, HeadingOptions, HorizontalRuleFormat,
        MarkdownFormat, OrderedListStyle,
    };
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn render_with<F>(format: MarkdownFormat, f: F) -> String
    where
        F: FnOnce(&mut MarkdownWriter<'static>) -> Result<()>,
    {
        let mut w = MarkdownWriter::new(format);
        f(&mut w).unwrap();
        w.close().unwrap();
        w.into_buffer().unwrap()
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut MarkdownWriter<'static>) -> Result<()>,
    {
        render_with(MarkdownFormat::default(), f)
    }

    #[rstest]
    #[case(1, "# Title\n")]
    #[case(2, "## Title\n")]
    #[case(6, "###### Title\n")]
    fn atx_headings(#[case] level: u8, #[case] expected: &str) {
        assert_eq!(render(|w| w.write_heading(level, "Title")), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(7)]
    fn heading_level_out_of_range(#[case] level: u8) {
        let mut w = MarkdownWriter::new(MarkdownFormat::default());
        let err = w.write_heading(level, "x").unwrap_err();
        assert!(matches!(
            err,
            MarkdownError::Validation(ValidationError::HeadingLevel(l)) if l == level
        ));
    }

    #[test]
    fn closed_heading() {
        let format = MarkdownFormat::default().with_heading_options(HeadingOptions {
            close: true,
            ..HeadingOptions::default()
        });
        assert_eq!(render_with(format, |w| w.write_heading(3, "T")), "### T ###\n");
    }

    #[test]
    fn setext_headings_measure_written_text() {
        let format = MarkdownFormat::default().with_heading_options(HeadingOptions {
            underline_h1: true,
            underline_h2: true,
            ..HeadingOptions::default()
        });
        let out = render_with(format, |w| {
            w.write_heading(1, "a*b")?;
            w.write_heading(2, "Sub")?;
            w.write_heading(3, "Atx")
        });
        assert_snapshot!(out, @r"
        a\*b
        ====

        Sub
        ---

        ### Atx
        ");
    }

    #[test]
    fn empty_setext_heading_falls_back_to_atx() {
        let format = MarkdownFormat::default().with_heading_options(HeadingOptions {
            underline_h1: true,
            underline_h2: true,
            ..HeadingOptions::default()
        });
        let out = render_with(format, |w| {
            w.write_text("a")?;
            w.write_heading(1, "")?;
            w.write_heading(2, "")
        });
        assert_eq!(out, "a\n\n#\n\n##\n");
    }

    #[test]
    fn heading_blank_lines_are_not_duplicated() {
        let out = render(|w| {
            w.write_text("intro")?;
            w.write_empty_line()?;
            w.write_heading(1, "A")?;
            w.write_heading(2, "B")?;
            w.write_text("body")
        });
        assert_eq!(out, "intro\n\n# A\n\n## B\n\nbody");
    }

    #[test]
    fn heading_without_surrounding_blank_lines() {
        let format = MarkdownFormat::default().with_heading_options(HeadingOptions {
            empty_line_before: false,
            empty_line_after: false,
            ..HeadingOptions::default()
        });
        let out = render_with(format, |w| {
            w.write_text("a")?;
            w.write_heading(2, "B")?;
            w.write_text("c")
        });
        assert_eq!(out, "a\n## B\nc");
    }

    #[test]
    fn bullet_list() {
        let out = render(|w| {
            w.write_list_item("one")?;
            w.write_list_item("two")?;
            w.write_text("after")
        });
        assert_eq!(out, "- one\n- two\n\nafter");
    }

    #[test]
    fn bullet_style_follows_format() {
        let format = MarkdownFormat::default().with_bullet_list_style(BulletListStyle::Plus);
        assert_eq!(render_with(format, |w| w.write_list_item("x")), "+ x\n");
    }

    #[test]
    fn list_after_paragraph_is_separated() {
        let ordered = render(|w| {
            w.write_text("para")?;
            w.write_ordered_list_item(2, "two")?;
            w.write_ordered_list_item(3, "three")
        });
        assert_eq!(ordered, "para\n\n2. two\n3. three\n");

        let empty = render(|w| {
            w.write_text("para")?;
            w.write_list_item("")
        });
        assert_eq!(empty, "para\n\n- \n");
    }

    #[test]
    fn nested_ordered_list_not_starting_at_one() {
        let out = render(|w| {
            w.write_start_list_item()?;
            w.write_text("outer")?;
            w.write_ordered_list_item(2, "two")?;
            w.write_end_list_item()
        });
        assert_eq!(out, "- outer\n\n  2. two\n");
    }

    #[test]
    fn ordered_and_task_items() {
        let out = render(|w| {
            w.write_ordered_list_item(1, "first")?;
            w.write_ordered_list_item(10, "tenth")?;
            w.write_task_list_item(false, "todo")?;
            w.write_task_list_item(true, "done")
        });
        assert_eq!(out, "1. first\n10. tenth\n- [ ] todo\n- [x] done\n");
    }

    #[test]
    fn ordered_parenthesis_style() {
        let format =
            MarkdownFormat::default().with_ordered_list_style(OrderedListStyle::Parenthesis);
        assert_eq!(
            render_with(format, |w| w.write_ordered_list_item(3, "c")),
            "3) c\n"
        );
    }

    #[test]
    fn ordered_number_limit() {
        let mut w = MarkdownWriter::new(MarkdownFormat::default());
        assert!(w.write_start_ordered_list_item(MAX_ORDERED_LIST_NUMBER).is_ok());
        let mut w = MarkdownWriter::new(MarkdownFormat::default());
        let err = w
            .write_start_ordered_list_item(MAX_ORDERED_LIST_NUMBER + 1)
            .unwrap_err();
        assert!(matches!(
            err,
            MarkdownError::Validation(ValidationError::OrderedListNumber(_))
        ));
    }

    #[test]
    fn nested_emphasis_in_list_item() {
        let out = render(|w| {
            w.write_start_list_item()?;
            w.write_start_italic()?;
            w.write_text("text with ")?;
            w.write_bold("bold")?;
            w.write_text(" inside")?;
            w.write_end_italic()?;
            w.write_end_list_item()
        });
        assert_eq!(out, "- *text with **bold** inside*\n");
    }

    #[test]
    fn nested_lists_indent_by_marker_width() {
        let out = render(|w| {
            w.write_start_ordered_list_item(1)?;
            w.write_text("outer")?;
            w.write_list_item("inner")?;
            w.write_end_ordered_list_item()?;
            w.write_start_list_item()?;
            w.write_text("line one\nline two")?;
            w.write_end_list_item()
        });
        assert_snapshot!(out, @r"
        1. outer
           - inner
        - line one
          line two
        ");
    }

    #[test]
    fn list_depth_tracks_open_items() {
        let mut w = MarkdownWriter::new(MarkdownFormat::default());
        w.write_start_list_item().unwrap();
        w.write_start_task_list_item(false).unwrap();
        assert_eq!(w.list_depth(), 2);
        w.write_end_task_list_item().unwrap();
        w.write_end_list_item().unwrap();
        assert_eq!(w.list_depth(), 0);
    }

    #[test]
    fn block_quote_prefixes_every_line() {
        let out = render(|w| {
            w.write_text("before")?;
            w.write_block_quote("a\n\nb")?;
            w.write_text("after")
        });
        assert_snapshot!(out, @r"
        before

        > a
        >
        > b

        after
        ");
    }

    #[test]
    fn nested_quotes() {
        let out = render(|w| {
            w.write_start_block_quote()?;
            w.write_text("outer")?;
            w.write_start_block_quote()?;
            w.write_text("inner")?;
            w.write_end_block_quote()?;
            w.write_end_block_quote()
        });
        assert_eq!(out, "> outer\n>\n> > inner\n");
        let mut w = MarkdownWriter::new(MarkdownFormat::default());
        w.write_start_block_quote().unwrap();
        w.write_start_block_quote().unwrap();
        assert_eq!(w.quote_depth(), 2);
    }

    #[test]
    fn quote_inside_list_item_shares_marker_line() {
        let out = render(|w| {
            w.write_start_list_item()?;
            w.write_block_quote("q1\nq2")?;
            w.write_end_list_item()
        });
        assert_eq!(out, "- > q1\n  > q2\n");
    }

    #[test]
    fn list_inside_quote() {
        let out = render(|w| {
            w.write_start_block_quote()?;
            w.write_list_item("a")?;
            w.write_list_item("b")?;
            w.write_end_block_quote()
        });
        assert_eq!(out, "> - a\n> - b\n");
    }

    #[test]
    fn fenced_code_block_is_verbatim() {
        let out = render(|w| {
            w.write_text("x")?;
            w.write_fenced_code_block("let a = *b*;\nfn f() {}", Some("rust"))?;
            w.write_text("y")
        });
        assert_snapshot!(out, @r"
        x

        ```rust
        let a = *b*;
        fn f() {}
        ```

        y
        ");
    }

    #[test]
    fn fence_grows_past_backtick_runs() {
        let out = render(|w| w.write_fenced_code_block("a ```` b", None));
        assert_eq!(out, "`````\na ```` b\n`````\n");
        assert_eq!(fence_length("", '`'), 3);
    }

    #[test]
    fn tilde_fence_and_tight_blocks() {
        let format = MarkdownFormat::default()
            .with_code_fence_style(CodeFenceStyle::Tilde)
            .with_code_block_options(CodeBlockOptions {
                empty_line_before: false,
                empty_line_after: false,
            });
        let out = render_with(format, |w| {
            w.write_text("a")?;
            w.write_fenced_code_block("code\n", None)?;
            w.write_text("b")
        });
        assert_eq!(out, "a\n~~~\ncode\n~~~\nb");
    }

    #[test]
    fn info_string_validation() {
        let mut w = MarkdownWriter::new(MarkdownFormat::default());
        assert!(w.write_fenced_code_block("x", Some("a`b")).is_err());
        assert!(w.write_fenced_code_block("x", Some("a\nb")).is_err());
    }

    #[test]
    fn indented_code_block() {
        let out = render(|w| {
            w.write_text("para")?;
            w.write_indented_code_block("fn main() {\n\n}")?;
            w.write_text("after")
        });
        assert_eq!(out, "para\n\n    fn main() {\n\n    }\n\nafter");
    }

    #[test]
    fn horizontal_rule_is_surrounded_by_blank_lines() {
        let out = render(|w| {
            w.write_text("setext bait")?;
            w.write_horizontal_rule()?;
            w.write_text("after")
        });
        assert_eq!(out, "setext bait\n\n---\n\nafter");
    }

    #[test]
    fn horizontal_rule_shapes() {
        let format = MarkdownFormat::default().with_horizontal_rule_format(
            HorizontalRuleFormat::new(HorizontalRuleStyle::Asterisk, 5, " ").unwrap(),
        );
        assert_eq!(render_with(format, |w| w.write_horizontal_rule()), "* * * * *\n");

        let mut w = MarkdownWriter::new(MarkdownFormat::default());
        assert!(
            w.write_horizontal_rule_with(HorizontalRuleStyle::Underscore, 2, "")
                .is_err()
        );
    }

    #[test]
    fn link_definitions() {
        let out = render(|w| {
            w.write_link_definition("1", "https://a.org", None)?;
            w.write_link_definition("docs", "/d", Some("The \"docs\""))
        });
        assert_eq!(out, "[1]: https://a.org\n[docs]: /d \"The \\\"docs\\\"\"\n");

        let mut w = MarkdownWriter::new(MarkdownFormat::default());
        assert!(matches!(
            w.write_link_definition("", "u", None),
            Err(MarkdownError::Validation(ValidationError::Empty("label")))
        ));
    }
}
