use crate::error::Result;
use crate::format::{Alignment, MarkdownFormat};
use crate::table::TableSource;
use crate::writer::{MarkdownWriter, WriteMarkdown};

use super::{ContainerKind, Document, Leaf, NodeId, NodeValue};

impl Document {
    /// Render the whole document, ending its last line.
    pub fn to_markdown(&self, format: &MarkdownFormat) -> Result<String> {
        let mut writer = MarkdownWriter::new(format.clone());
        self.write_node(self.root(), &mut writer)?;
        writer.write_line_if_necessary()?;
        writer.close()?;
        Ok(writer.into_buffer().unwrap_or_default())
    }

    /// Write the subtree at `id`.
    pub fn write_node(&self, id: NodeId, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        let (kind, children) = match &self.data(id)?.value {
            NodeValue::Leaf(leaf) => return leaf.write_markdown(writer),
            NodeValue::Container { kind, children } => (*kind, children.as_slice()),
        };
        let children = Children {
            document: self,
            ids: children,
        };
        match kind {
            ContainerKind::Document => children.write_markdown(writer),
            ContainerKind::Bold => writer.write_bold(&children),
            ContainerKind::Italic => writer.write_italic(&children),
            ContainerKind::Strikethrough => writer.write_strikethrough(&children),
            ContainerKind::Heading(level) => writer.write_heading(level, &children),
            ContainerKind::ListItem => writer.write_list_item(&children),
            ContainerKind::OrderedListItem(number) => {
                writer.write_ordered_list_item(number, &children)
            }
            ContainerKind::TaskListItem(completed) => {
                writer.write_task_list_item(completed, &children)
            }
            ContainerKind::BlockQuote => writer.write_block_quote(&children),
            ContainerKind::Table => writer.write_table(&TreeTable {
                document: self,
                rows: children.ids,
            }),
            // a row on its own is a table with only a header
            ContainerKind::TableRow => writer.write_table(&TreeTable {
                document: self,
                rows: std::slice::from_ref(&id),
            }),
        }
    }

    /// A handle that writes the subtree at `id` as a value.
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { document: self, id }
    }
}

/// A node borrowed together with its document.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    document: &'a Document,
    id: NodeId,
}

impl NodeRef<'_> {
    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl WriteMarkdown for NodeRef<'_> {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        self.document.write_node(self.id, writer)
    }
}

/// The document's content, without ending the last line.
impl WriteMarkdown for Document {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        self.write_node(self.root(), writer)
    }
}

impl WriteMarkdown for Leaf {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        match self {
            Leaf::Text(text) => writer.write_text(text),
            Leaf::Raw(markdown) => writer.write_raw(markdown),
            Leaf::Link(link) => link.write_markdown(writer),
            Leaf::Image(image) => image.write_markdown(writer),
            Leaf::Autolink(link) => link.write_markdown(writer),
            Leaf::LinkReference(reference) => reference.write_markdown(writer),
            Leaf::ImageReference(reference) => reference.write_markdown(writer),
            Leaf::LinkDefinition(definition) => definition.write_markdown(writer),
            Leaf::InlineCode(code) => code.write_markdown(writer),
            Leaf::FencedCodeBlock(block) => block.write_markdown(writer),
            Leaf::IndentedCodeBlock(block) => block.write_markdown(writer),
            Leaf::HorizontalRule(rule) => rule.write_markdown(writer),
            Leaf::TableColumn(column) => column.write_markdown(writer),
            Leaf::CharacterReference(reference) => reference.write_markdown(writer),
            Leaf::EntityReference(reference) => reference.write_markdown(writer),
            Leaf::Comment(comment) => comment.write_markdown(writer),
        }
    }
}

struct Children<'a> {
    document: &'a Document,
    ids: &'a [NodeId],
}

impl WriteMarkdown for Children<'_> {
    fn write_markdown(&self, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        self.ids
            .iter()
            .try_for_each(|&id| self.document.write_node(id, writer))
    }
}

/// Table and row nodes seen as rows of cells. A row child that is not a
/// `TableRow` is a row with one cell.
struct TreeTable<'a> {
    document: &'a Document,
    rows: &'a [NodeId],
}

impl TreeTable<'_> {
    fn cell(&self, row: usize, column: usize) -> Option<NodeId> {
        let &id = self.rows.get(row)?;
        match self.document.container_kind(id) {
            Ok(ContainerKind::TableRow) => self.document.elements(id).nth(column),
            _ => (column == 0).then_some(id),
        }
    }
}

impl TableSource for TreeTable<'_> {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn cell_count(&self, row: usize) -> usize {
        match self.rows.get(row) {
            Some(&id) => match self.document.container_kind(id) {
                Ok(ContainerKind::TableRow) => self.document.elements(id).len(),
                _ => 1,
            },
            None => 0,
        }
    }

    fn alignment(&self, column: usize) -> Alignment {
        match self.cell(0, column).and_then(|id| self.document.leaf_value(id)) {
            Some(Leaf::TableColumn(declared)) => declared.alignment(),
            _ => Alignment::None,
        }
    }

    fn write_cell(&self, row: usize, column: usize, writer: &mut MarkdownWriter<'_>) -> Result<()> {
        match self.cell(row, column) {
            Some(id) => self.document.write_node(id, writer),
            None => Ok(()),
        }
    }
}
