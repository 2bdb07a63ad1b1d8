use crate::error::{Result, ValidationError};
use crate::format::{Alignment, HorizontalRuleStyle, validate_rule};
use crate::writer::{
    MarkdownWriter, WriteMarkdown, validate_heading_level, validate_info_line,
    validate_list_number,
};

/// `## text`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Heading {
    text: String,
    level: u8,
}

impl Heading {
    pub fn new(text: impl Into<String>, level: u8) -> std::result::Result<Self, ValidationError> {
        validate_heading_level(level)?;
        Ok(Self {
            text: text.into(),
            level,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    pub fn with_level(&self, level: u8) -> std::result::Result<Self, ValidationError> {
        Self::new(self.text.clone(), level)
    }
}

impl WriteMarkdown for Heading {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_heading(self.level, self.text.as_str())
    }
}

/// `- text`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListItem {
    text: String,
}

impl ListItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self::new(text)
    }
}

impl WriteMarkdown for ListItem {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_list_item(self.text.as_str())
    }
}

/// `1. text`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderedListItem {
    number: usize,
    text: String,
}

impl OrderedListItem {
    pub fn new(number: usize, text: impl Into<String>) -> std::result::Result<Self, ValidationError> {
        validate_list_number(number)?;
        Ok(Self {
            number,
            text: text.into(),
        })
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn with_number(&self, number: usize) -> std::result::Result<Self, ValidationError> {
        Self::new(number, self.text.clone())
    }

    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }
}

impl WriteMarkdown for OrderedListItem {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_ordered_list_item(self.number, self.text.as_str())
    }
}

/// `- [x] text`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskListItem {
    text: String,
    completed: bool,
}

impl TaskListItem {
    pub fn new(text: impl Into<String>, completed: bool) -> Self {
        Self {
            text: text.into(),
            completed,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self::new(text, self.completed)
    }

    pub fn with_completed(&self, completed: bool) -> Self {
        Self::new(self.text.clone(), completed)
    }
}

impl WriteMarkdown for TaskListItem {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_task_list_item(self.completed, self.text.as_str())
    }
}

/// A fenced code block with an optional info string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FencedCodeBlock {
    text: String,
    info: Option<String>,
}

impl FencedCodeBlock {
    /// The info string may not span lines. A backtick in it is only
    /// rejected at write time, when the fence style is known.
    pub fn new(
        text: impl Into<String>,
        info: Option<impl Into<String>>,
    ) -> std::result::Result<Self, ValidationError> {
        let info = info.map(Into::into);
        if let Some(info) = &info {
            validate_info_line(info)?;
        }
        Ok(Self {
            text: text.into(),
            info,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    pub fn with_info(
        &self,
        info: Option<impl Into<String>>,
    ) -> std::result::Result<Self, ValidationError> {
        Self::new(self.text.clone(), info)
    }
}

impl WriteMarkdown for FencedCodeBlock {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_fenced_code_block(&self.text, self.info.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndentedCodeBlock {
    text: String,
}

impl IndentedCodeBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self::new(text)
    }
}

impl WriteMarkdown for IndentedCodeBlock {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_indented_code_block(&self.text)
    }
}

/// A thematic break with an explicit shape.
///
/// [`HorizontalRule::default`] has no shape of its own and writes the rule
/// configured in the writer's format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct HorizontalRule {
    shape: Option<(HorizontalRuleStyle, usize, String)>,
}

impl HorizontalRule {
    pub fn new(
        style: HorizontalRuleStyle,
        count: usize,
        separator: impl Into<String>,
    ) -> std::result::Result<Self, ValidationError> {
        let separator = separator.into();
        validate_rule(count, &separator)?;
        Ok(Self {
            shape: Some((style, count, separator)),
        })
    }

    pub fn style(&self) -> Option<HorizontalRuleStyle> {
        self.shape.as_ref().map(|(style, _, _)| *style)
    }

    pub fn count(&self) -> Option<usize> {
        self.shape.as_ref().map(|(_, count, _)| *count)
    }

    pub fn separator(&self) -> Option<&str> {
        self.shape.as_ref().map(|(_, _, separator)| separator.as_str())
    }
}

impl WriteMarkdown for HorizontalRule {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        match &self.shape {
            Some((style, count, separator)) => {
                writer.write_horizontal_rule_with(*style, *count, separator)
            }
            None => writer.write_horizontal_rule(),
        }
    }
}

/// Header cell of a table column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableColumn {
    name: String,
    alignment: Alignment,
}

impl TableColumn {
    pub fn new(name: impl Into<String>, alignment: Alignment) -> Self {
        Self {
            name: name.into(),
            alignment,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self::new(name, self.alignment)
    }

    pub fn with_alignment(&self, alignment: Alignment) -> Self {
        Self::new(self.name.clone(), alignment)
    }
}

impl From<&str> for TableColumn {
    fn from(name: &str) -> Self {
        Self::new(name, Alignment::None)
    }
}

/// Writes the column name; alignment is consumed by the table analyzer.
impl WriteMarkdown for TableColumn {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_text(&self.name)
    }
}
