use crate::error::{Result, ValidationError};
use crate::escape::{validate_comment, validate_entity_name, validate_url};
use crate::writer::{MarkdownWriter, WriteMarkdown};

type Validated<T> = std::result::Result<T, ValidationError>;

/// `[text](url "title")`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    text: String,
    url: String,
    title: Option<String>,
}

impl Link {
    pub fn new(
        text: impl Into<String>,
        url: impl Into<String>,
        title: Option<impl Into<String>>,
    ) -> Validated<Self> {
        let url = url.into();
        validate_url("url", &url)?;
        Ok(Self {
            text: text.into(),
            url,
            title: title.map(Into::into),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    pub fn with_url(&self, url: impl Into<String>) -> Validated<Self> {
        Self::new(self.text.clone(), url, self.title.clone())
    }

    pub fn with_title(&self, title: Option<impl Into<String>>) -> Self {
        Self {
            title: title.map(Into::into),
            ..self.clone()
        }
    }
}

impl WriteMarkdown for Link {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_link(&self.text, &self.url, self.title.as_deref())
    }
}

/// `![text](url "title")`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Image {
    text: String,
    url: String,
    title: Option<String>,
}

impl Image {
    pub fn new(
        text: impl Into<String>,
        url: impl Into<String>,
        title: Option<impl Into<String>>,
    ) -> Validated<Self> {
        let url = url.into();
        validate_url("url", &url)?;
        Ok(Self {
            text: text.into(),
            url,
            title: title.map(Into::into),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }

    pub fn with_url(&self, url: impl Into<String>) -> Validated<Self> {
        Self::new(self.text.clone(), url, self.title.clone())
    }

    pub fn with_title(&self, title: Option<impl Into<String>>) -> Self {
        Self {
            title: title.map(Into::into),
            ..self.clone()
        }
    }
}

impl WriteMarkdown for Image {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_image(&self.text, &self.url, self.title.as_deref())
    }
}

/// `<url>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Autolink {
    url: String,
}

impl Autolink {
    pub fn new(url: impl Into<String>) -> Validated<Self> {
        let url = url.into();
        validate_url("url", &url)?;
        Ok(Self { url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl WriteMarkdown for Autolink {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_autolink(&self.url)
    }
}

/// `[text][label]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkReference {
    text: String,
    label: String,
}

impl LinkReference {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self::new(text, self.label.clone())
    }

    pub fn with_label(&self, label: impl Into<String>) -> Self {
        Self::new(self.text.clone(), label)
    }
}

impl WriteMarkdown for LinkReference {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_link_reference(&self.text, &self.label)
    }
}

/// `![text][label]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference {
    text: String,
    label: String,
}

impl ImageReference {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self::new(text, self.label.clone())
    }

    pub fn with_label(&self, label: impl Into<String>) -> Self {
        Self::new(self.text.clone(), label)
    }
}

impl WriteMarkdown for ImageReference {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_image_reference(&self.text, &self.label)
    }
}

/// `[label]: url "title"` on its own line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkDefinition {
    label: String,
    url: String,
    title: Option<String>,
}

impl LinkDefinition {
    pub fn new(
        label: impl Into<String>,
        url: impl Into<String>,
        title: Option<impl Into<String>>,
    ) -> Validated<Self> {
        let label = label.into();
        if label.is_empty() {
            return Err(ValidationError::Empty("label"));
        }
        let url = url.into();
        validate_url("url", &url)?;
        Ok(Self {
            label,
            url,
            title: title.map(Into::into),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

impl WriteMarkdown for LinkDefinition {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_link_definition(&self.label, &self.url, self.title.as_deref())
    }
}

/// `` `text` ``
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InlineCode {
    text: String,
}

impl InlineCode {
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

impl WriteMarkdown for InlineCode {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_inline_code(&self.text)
    }
}

/// Numeric character reference, `&#xA9;` or `&#169;` depending on format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharacterReference {
    value: char,
}

impl CharacterReference {
    pub fn new(value: char) -> Self {
        Self { value }
    }

    pub fn value(&self) -> char {
        self.value
    }
}

impl WriteMarkdown for CharacterReference {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_char_reference(self.value)
    }
}

/// Named reference such as `&nbsp;`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityReference {
    name: String,
}

impl EntityReference {
    pub fn new(name: impl Into<String>) -> Validated<Self> {
        let name = name.into();
        validate_entity_name(&name)?;
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl WriteMarkdown for EntityReference {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_entity_reference(&self.name)
    }
}

/// `<!-- text -->`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comment {
    text: String,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Validated<Self> {
        let text = text.into();
        validate_comment(&text)?;
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl WriteMarkdown for Comment {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        writer.write_comment(&self.text)
    }
}
