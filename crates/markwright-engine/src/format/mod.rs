//! Style policy consumed by the writer.
//!
//! [`MarkdownFormat`] is built once and never mutated; every `with_*`
//! method returns a new value. The writer asks it for every stylistic
//! decision: which delimiter to use, whether to pad table cells, whether a
//! heading gets surrounding blank lines.

mod styles;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub use styles::{
    Alignment, BulletListStyle, CharReferenceFormat, CodeFenceStyle, EmphasisStyle,
    HorizontalRuleStyle, OrderedListStyle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingOptions {
    /// Level 1 headings use a `===` underline instead of `#`.
    pub underline_h1: bool,
    /// Level 2 headings use a `---` underline instead of `##`.
    pub underline_h2: bool,
    /// ATX headings repeat the marker after the text.
    pub close: bool,
    pub empty_line_before: bool,
    pub empty_line_after: bool,
}

impl Default for HeadingOptions {
    fn default() -> Self {
        Self {
            underline_h1: false,
            underline_h2: false,
            close: false,
            empty_line_before: true,
            empty_line_after: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeBlockOptions {
    pub empty_line_before: bool,
    pub empty_line_after: bool,
}

impl Default for CodeBlockOptions {
    fn default() -> Self {
        Self {
            empty_line_before: true,
            empty_line_after: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Pad header cells to the measured column width.
    pub format_header: bool,
    /// Widen columns to fit body cells and pad them.
    pub format_content: bool,
    /// One space between a pipe and the cell content.
    pub padding: bool,
    /// Leading and trailing pipe on every row.
    pub outer_delimiter: bool,
    /// Pad according to the column alignment instead of always on the right.
    pub align_content: bool,
    pub empty_line_before: bool,
    pub empty_line_after: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            format_header: true,
            format_content: true,
            padding: true,
            outer_delimiter: true,
            align_content: true,
            empty_line_before: true,
            empty_line_after: true,
        }
    }
}

impl TableOptions {
    pub fn is_formatted(&self) -> bool {
        self.format_header || self.format_content
    }
}

/// Shape of a thematic break: `count` copies of the style character joined
/// by `separator`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawHorizontalRuleFormat")]
pub struct HorizontalRuleFormat {
    style: HorizontalRuleStyle,
    count: usize,
    separator: String,
}

#[derive(Deserialize)]
#[serde(default)]
struct RawHorizontalRuleFormat {
    style: HorizontalRuleStyle,
    count: usize,
    separator: String,
}

impl Default for RawHorizontalRuleFormat {
    fn default() -> Self {
        let d = HorizontalRuleFormat::default();
        Self {
            style: d.style,
            count: d.count,
            separator: d.separator,
        }
    }
}

impl TryFrom<RawHorizontalRuleFormat> for HorizontalRuleFormat {
    type Error = ValidationError;

    fn try_from(raw: RawHorizontalRuleFormat) -> Result<Self, Self::Error> {
        Self::new(raw.style, raw.count, raw.separator)
    }
}

impl Default for HorizontalRuleFormat {
    fn default() -> Self {
        Self {
            style: HorizontalRuleStyle::Hyphen,
            count: 3,
            separator: String::new(),
        }
    }
}

impl HorizontalRuleFormat {
    pub fn new(
        style: HorizontalRuleStyle,
        count: usize,
        separator: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let separator = separator.into();
        validate_rule(count, &separator)?;
        Ok(Self {
            style,
            count,
            separator,
        })
    }

    pub fn style(&self) -> HorizontalRuleStyle {
        self.style
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }
}

pub(crate) fn validate_rule(count: usize, separator: &str) -> Result<(), ValidationError> {
    if count < 3 {
        return Err(ValidationError::HorizontalRuleCount(count));
    }
    if !separator.chars().all(|c| c == ' ') {
        return Err(ValidationError::HorizontalRuleSeparator(
            separator.to_string(),
        ));
    }
    Ok(())
}

/// Line terminator written by the writer. Input text may use either form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewLine {
    #[default]
    Lf,
    CrLf,
}

impl NewLine {
    pub fn as_str(self) -> &'static str {
        match self {
            NewLine::Lf => "\n",
            NewLine::CrLf => "\r\n",
        }
    }
}

/// Immutable set of style choices shared by every render.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownFormat {
    bold_style: EmphasisStyle,
    italic_style: EmphasisStyle,
    bullet_list_style: BulletListStyle,
    ordered_list_style: OrderedListStyle,
    heading_options: HeadingOptions,
    code_fence_style: CodeFenceStyle,
    code_block_options: CodeBlockOptions,
    char_reference_format: CharReferenceFormat,
    horizontal_rule_format: HorizontalRuleFormat,
    table_options: TableOptions,
}

impl MarkdownFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bold_style(&self) -> EmphasisStyle {
        self.bold_style
    }

    pub fn italic_style(&self) -> EmphasisStyle {
        self.italic_style
    }

    pub fn bullet_list_style(&self) -> BulletListStyle {
        self.bullet_list_style
    }

    pub fn ordered_list_style(&self) -> OrderedListStyle {
        self.ordered_list_style
    }

    pub fn heading_options(&self) -> HeadingOptions {
        self.heading_options
    }

    pub fn code_fence_style(&self) -> CodeFenceStyle {
        self.code_fence_style
    }

    pub fn code_block_options(&self) -> CodeBlockOptions {
        self.code_block_options
    }

    pub fn char_reference_format(&self) -> CharReferenceFormat {
        self.char_reference_format
    }

    pub fn horizontal_rule_format(&self) -> &HorizontalRuleFormat {
        &self.horizontal_rule_format
    }

    pub fn table_options(&self) -> TableOptions {
        self.table_options
    }

    pub fn bold_delimiter(&self) -> &'static str {
        match self.bold_style {
            EmphasisStyle::Asterisk => "**",
            EmphasisStyle::Underscore => "__",
        }
    }

    pub fn italic_delimiter(&self) -> &'static str {
        match self.italic_style {
            EmphasisStyle::Asterisk => "*",
            EmphasisStyle::Underscore => "_",
        }
    }

    pub fn strikethrough_delimiter(&self) -> &'static str {
        "~~"
    }

    pub fn code_fence(&self) -> &'static str {
        match self.code_fence_style {
            CodeFenceStyle::Backtick => "```",
            CodeFenceStyle::Tilde => "~~~",
        }
    }

    pub fn with_bold_style(&self, bold_style: EmphasisStyle) -> Self {
        Self {
            bold_style,
            ..self.clone()
        }
    }

    pub fn with_italic_style(&self, italic_style: EmphasisStyle) -> Self {
        Self {
            italic_style,
            ..self.clone()
        }
    }

    pub fn with_bullet_list_style(&self, bullet_list_style: BulletListStyle) -> Self {
        Self {
            bullet_list_style,
            ..self.clone()
        }
    }

    pub fn with_ordered_list_style(&self, ordered_list_style: OrderedListStyle) -> Self {
        Self {
            ordered_list_style,
            ..self.clone()
        }
    }

    pub fn with_heading_options(&self, heading_options: HeadingOptions) -> Self {
        Self {
            heading_options,
            ..self.clone()
        }
    }

    pub fn with_code_fence_style(&self, code_fence_style: CodeFenceStyle) -> Self {
        Self {
            code_fence_style,
            ..self.clone()
        }
    }

    pub fn with_code_block_options(&self, code_block_options: CodeBlockOptions) -> Self {
        Self {
            code_block_options,
            ..self.clone()
        }
    }

    pub fn with_char_reference_format(&self, char_reference_format: CharReferenceFormat) -> Self {
        Self {
            char_reference_format,
            ..self.clone()
        }
    }

    pub fn with_horizontal_rule_format(&self, horizontal_rule_format: HorizontalRuleFormat) -> Self {
        Self {
            horizontal_rule_format,
            ..self.clone()
        }
    }

    pub fn with_table_options(&self, table_options: TableOptions) -> Self {
        Self {
            table_options,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_delimiters() {
        let format = MarkdownFormat::default();
        assert_eq!(format.bold_delimiter(), "**");
        assert_eq!(format.italic_delimiter(), "*");
        assert_eq!(format.code_fence(), "```");
        assert_eq!(format.bullet_list_style().char(), '-');
        assert_eq!(format.ordered_list_style().char(), '.');
    }

    #[test]
    fn with_methods_leave_original_untouched() {
        let original = MarkdownFormat::default();
        let underscored = original
            .with_bold_style(EmphasisStyle::Underscore)
            .with_italic_style(EmphasisStyle::Underscore);

        assert_eq!(underscored.bold_delimiter(), "__");
        assert_eq!(underscored.italic_delimiter(), "_");
        assert_eq!(original.bold_delimiter(), "**");
        assert_ne!(original, underscored);
    }

    #[test]
    fn horizontal_rule_validation() {
        assert!(HorizontalRuleFormat::new(HorizontalRuleStyle::Asterisk, 5, " ").is_ok());
        assert_eq!(
            HorizontalRuleFormat::new(HorizontalRuleStyle::Hyphen, 2, ""),
            Err(ValidationError::HorizontalRuleCount(2))
        );
        assert_eq!(
            HorizontalRuleFormat::new(HorizontalRuleStyle::Hyphen, 3, "x"),
            Err(ValidationError::HorizontalRuleSeparator("x".to_string()))
        );
    }

    #[test]
    fn table_formatting_flag() {
        let mut options = TableOptions::default();
        assert!(options.is_formatted());
        options.format_header = false;
        options.format_content = false;
        assert!(!options.is_formatted());
    }
}
