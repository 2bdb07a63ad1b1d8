//! In-memory document model.
//!
//! A [`Document`] is an arena of nodes addressed by [`NodeId`]; index 0 is
//! always the root. Containers list their children in order and every
//! attached node names its container as parent, so a node is owned by at
//! most one container at a time. Attaching a node that already has a
//! parent, or one that is an ancestor of the target, attaches a deep copy
//! instead.
//!
//! ```
//! use markwright_engine::{Document, MarkdownFormat};
//!
//! let mut doc = Document::new();
//! let heading = doc.heading(1, "Title").unwrap();
//! doc.add(doc.root(), (heading, "hello")).unwrap();
//! assert_eq!(
//!     doc.to_markdown(&MarkdownFormat::default()).unwrap(),
//!     "# Title\n\nhello\n"
//! );
//! ```

mod content;
mod render;
mod walk;

use crate::error::{MarkdownError, Result};
use crate::writer::{validate_heading_level, validate_list_number};

pub use content::{Content, Leaf};
pub use render::NodeRef;
pub use walk::{Descendants, Elements};

/// Handle of a node inside one [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The document root.
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Syntactic category of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Document,
    Text,
    Raw,
    Bold,
    Italic,
    Strikethrough,
    Heading,
    ListItem,
    OrderedListItem,
    TaskListItem,
    BlockQuote,
    Table,
    TableRow,
    TableColumn,
    Link,
    Image,
    Autolink,
    LinkReference,
    ImageReference,
    LinkDefinition,
    InlineCode,
    FencedCodeBlock,
    IndentedCodeBlock,
    HorizontalRule,
    CharacterReference,
    EntityReference,
    Comment,
}

/// A node that owns children, with the data its delimiters need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Document,
    Bold,
    Italic,
    Strikethrough,
    Heading(u8),
    ListItem,
    OrderedListItem(usize),
    TaskListItem(bool),
    BlockQuote,
    /// Children are rows; a child that is not a row is a one-cell row.
    Table,
    /// Children are cells.
    TableRow,
}

impl ContainerKind {
    pub fn kind(self) -> Kind {
        match self {
            ContainerKind::Document => Kind::Document,
            ContainerKind::Bold => Kind::Bold,
            ContainerKind::Italic => Kind::Italic,
            ContainerKind::Strikethrough => Kind::Strikethrough,
            ContainerKind::Heading(_) => Kind::Heading,
            ContainerKind::ListItem => Kind::ListItem,
            ContainerKind::OrderedListItem(_) => Kind::OrderedListItem,
            ContainerKind::TaskListItem(_) => Kind::TaskListItem,
            ContainerKind::BlockQuote => Kind::BlockQuote,
            ContainerKind::Table => Kind::Table,
            ContainerKind::TableRow => Kind::TableRow,
        }
    }

    /// Whether adding a string may extend a trailing text node.
    fn joins_text(self) -> bool {
        !matches!(self, ContainerKind::Table | ContainerKind::TableRow)
    }
}

#[derive(Debug, Clone)]
enum NodeValue {
    Container {
        kind: ContainerKind,
        children: Vec<NodeId>,
    },
    Leaf(Leaf),
}

#[derive(Debug, Clone)]
struct NodeData {
    parent: Option<NodeId>,
    value: NodeValue,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                parent: None,
                value: NodeValue::Container {
                    kind: ContainerKind::Document,
                    children: Vec::new(),
                },
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes ever allocated, detached ones included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // --- factories -------------------------------------------------------

    pub fn text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeValue::Leaf(Leaf::Text(text.into())))
    }

    pub fn raw(&mut self, markdown: impl Into<String>) -> NodeId {
        self.alloc(NodeValue::Leaf(Leaf::Raw(markdown.into())))
    }

    pub fn leaf(&mut self, leaf: impl Into<Leaf>) -> NodeId {
        self.alloc(NodeValue::Leaf(leaf.into()))
    }

    /// A detached container of `kind` holding `content`.
    pub fn container(&mut self, kind: ContainerKind, content: impl Into<Content>) -> Result<NodeId> {
        match kind {
            ContainerKind::Heading(level) => validate_heading_level(level)?,
            ContainerKind::OrderedListItem(number) => validate_list_number(number)?,
            _ => {}
        }
        let id = self.alloc(NodeValue::Container {
            kind,
            children: Vec::new(),
        });
        self.add_content(id, content.into())?;
        Ok(id)
    }

    pub fn bold(&mut self, content: impl Into<Content>) -> Result<NodeId> {
        self.container(ContainerKind::Bold, content)
    }

    pub fn italic(&mut self, content: impl Into<Content>) -> Result<NodeId> {
        self.container(ContainerKind::Italic, content)
    }

    pub fn strikethrough(&mut self, content: impl Into<Content>) -> Result<NodeId> {
        self.container(ContainerKind::Strikethrough, content)
    }

    pub fn heading(&mut self, level: u8, content: impl Into<Content>) -> Result<NodeId> {
        self.container(ContainerKind::Heading(level), content)
    }

    pub fn list_item(&mut self, content: impl Into<Content>) -> Result<NodeId> {
        self.container(ContainerKind::ListItem, content)
    }

    pub fn ordered_item(&mut self, number: usize, content: impl Into<Content>) -> Result<NodeId> {
        self.container(ContainerKind::OrderedListItem(number), content)
    }

    pub fn task_item(&mut self, completed: bool, content: impl Into<Content>) -> Result<NodeId> {
        self.container(ContainerKind::TaskListItem(completed), content)
    }

    pub fn block_quote(&mut self, content: impl Into<Content>) -> Result<NodeId> {
        self.container(ContainerKind::BlockQuote, content)
    }

    /// A table whose children are rows; the first row is the header.
    pub fn table(&mut self, rows: impl Into<Content>) -> Result<NodeId> {
        self.container(ContainerKind::Table, rows)
    }

    /// A row; every added string becomes its own cell.
    pub fn table_row(&mut self, cells: impl Into<Content>) -> Result<NodeId> {
        self.container(ContainerKind::TableRow, cells)
    }

    // --- editing ---------------------------------------------------------

    /// Add `content` at the end of `container`.
    ///
    /// Strings extend a trailing text node unless the container is a table
    /// or row. Nested [`Document`] roots are flattened into their children.
    pub fn add(&mut self, container: NodeId, content: impl Into<Content>) -> Result<()> {
        self.container_kind(container)?;
        self.add_content(container, content.into())
    }

    fn add_content(&mut self, container: NodeId, content: Content) -> Result<()> {
        match content {
            Content::Empty => Ok(()),
            Content::Many(items) => items
                .into_iter()
                .try_for_each(|item| self.add_content(container, item)),
            Content::Text(text) => self.add_text(container, text),
            Content::Leaf(leaf) => {
                let id = self.leaf(leaf);
                self.attach(container, id)
            }
            Content::Heading(heading) => {
                let id = self.heading(heading.level(), heading.text())?;
                self.attach(container, id)
            }
            Content::ListItem(item) => {
                let id = self.list_item(item.text())?;
                self.attach(container, id)
            }
            Content::OrderedListItem(item) => {
                let id = self.ordered_item(item.number(), item.text())?;
                self.attach(container, id)
            }
            Content::TaskListItem(item) => {
                let id = self.task_item(item.is_completed(), item.text())?;
                self.attach(container, id)
            }
            Content::Node(id) => self.add_node(container, id),
        }
    }

    fn add_node(&mut self, container: NodeId, id: NodeId) -> Result<()> {
        let data = self.data(id)?;
        if let NodeValue::Container {
            kind: ContainerKind::Document,
            children,
        } = &data.value
        {
            let children = children.clone();
            return children
                .into_iter()
                .try_for_each(|child| self.add_node(container, child));
        }
        let id = if data.parent.is_some() || self.is_ancestor_or_self(id, container) {
            self.clone_node(id)?
        } else {
            id
        };
        self.attach(container, id)
    }

    fn add_text(&mut self, container: NodeId, text: String) -> Result<()> {
        let kind = self.container_kind(container)?;
        if kind.joins_text()
            && let Some(&last) = self.children(container).last()
            && let Some(NodeData {
                value: NodeValue::Leaf(Leaf::Text(existing)),
                ..
            }) = self.nodes.get_mut(last.0)
        {
            existing.push_str(&text);
            return Ok(());
        }
        let id = self.text(text);
        self.attach(container, id)
    }

    /// Detach `id` from its container. The node and its subtree stay valid
    /// and can be added again.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        let Some(parent) = self.data(id)?.parent else {
            return Ok(());
        };
        if let Some(NodeData {
            value: NodeValue::Container { children, .. },
            ..
        }) = self.nodes.get_mut(parent.0)
        {
            children.retain(|&child| child != id);
        }
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.parent = None;
        }
        Ok(())
    }

    /// Deep copy of the subtree at `id`, detached.
    pub fn clone_node(&mut self, id: NodeId) -> Result<NodeId> {
        let value = match &self.data(id)?.value {
            NodeValue::Leaf(leaf) => NodeValue::Leaf(leaf.clone()),
            NodeValue::Container { kind, children } => {
                let (kind, children) = (*kind, children.clone());
                let copy = self.alloc(NodeValue::Container {
                    kind,
                    children: Vec::new(),
                });
                for child in children {
                    let child_copy = self.clone_node(child)?;
                    self.attach(copy, child_copy)?;
                }
                return Ok(copy);
            }
        };
        Ok(self.alloc(value))
    }

    // --- queries ---------------------------------------------------------

    pub fn kind(&self, id: NodeId) -> Result<Kind> {
        Ok(match &self.data(id)?.value {
            NodeValue::Container { kind, .. } => kind.kind(),
            NodeValue::Leaf(leaf) => leaf.kind(),
        })
    }

    /// Kind of a container node; fails for leaves.
    pub fn container_kind(&self, id: NodeId) -> Result<ContainerKind> {
        match &self.data(id)?.value {
            NodeValue::Container { kind, .. } => Ok(*kind),
            NodeValue::Leaf(_) => Err(MarkdownError::NotAContainer(id.0)),
        }
    }

    /// Value of a leaf node; `None` for containers and unknown ids.
    pub fn leaf_value(&self, id: NodeId) -> Option<&Leaf> {
        match &self.nodes.get(id.0)?.value {
            NodeValue::Leaf(leaf) => Some(leaf),
            NodeValue::Container { .. } => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0)?.parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let position = siblings.iter().position(|&sibling| sibling == id)?;
        siblings.get(position + 1).copied()
    }

    /// Direct children of `id`, in order. Empty for leaves.
    pub fn elements(&self, id: NodeId) -> Elements<'_> {
        Elements::new(self.children(id))
    }

    /// Pre-order walk of the subtree below `id`.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants::below(self, id)
    }

    /// Pre-order walk starting with `id` itself.
    pub fn descendants_and_self(&self, id: NodeId) -> Descendants<'_> {
        let start = self.nodes.get(id.0).map(|_| id);
        Descendants::starting_at(self, start)
    }

    /// Concatenated text of every text and raw leaf below `id`.
    pub fn plain_text(&self, id: NodeId) -> String {
        self.descendants_and_self(id)
            .filter_map(|node| match self.leaf_value(node) {
                Some(Leaf::Text(text) | Leaf::Raw(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    // --- internals -------------------------------------------------------

    fn data(&self, id: NodeId) -> Result<&NodeData> {
        self.nodes.get(id.0).ok_or(MarkdownError::UnknownNode(id.0))
    }

    fn children(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(id.0).map(|node| &node.value) {
            Some(NodeValue::Container { children, .. }) => children,
            _ => &[],
        }
    }

    fn alloc(&mut self, value: NodeValue) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            parent: None,
            value,
        });
        id
    }

    fn attach(&mut self, container: NodeId, child: NodeId) -> Result<()> {
        match self.nodes.get_mut(container.0) {
            Some(NodeData {
                value: NodeValue::Container { children, .. },
                ..
            }) => children.push(child),
            Some(_) => return Err(MarkdownError::NotAContainer(container.0)),
            None => return Err(MarkdownError::UnknownNode(container.0)),
        }
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.parent = Some(container);
        }
        Ok(())
    }

    /// Whether `node` is `target` or one of its ancestors.
    fn is_ancestor_or_self(&self, node: NodeId, target: NodeId) -> bool {
        let mut current = Some(target);
        while let Some(id) = current {
            if id == node {
                return true;
            }
            current = self.parent(id);
        }
        false
    }
}
