use crate::elements::{
    Autolink, CharacterReference, Comment, EntityReference, FencedCodeBlock, Heading,
    HorizontalRule, Image, ImageReference, IndentedCodeBlock, InlineCode, Link, LinkDefinition,
    LinkReference, ListItem, OrderedListItem, TableColumn, TaskListItem,
};

use super::{Kind, NodeId};

/// Value of a node without children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Leaf {
    /// Body text, escaped when written.
    Text(String),
    /// Markdown written verbatim.
    Raw(String),
    Link(Link),
    Image(Image),
    Autolink(Autolink),
    LinkReference(LinkReference),
    ImageReference(ImageReference),
    LinkDefinition(LinkDefinition),
    InlineCode(InlineCode),
    FencedCodeBlock(FencedCodeBlock),
    IndentedCodeBlock(IndentedCodeBlock),
    HorizontalRule(HorizontalRule),
    TableColumn(TableColumn),
    CharacterReference(CharacterReference),
    EntityReference(EntityReference),
    Comment(Comment),
}

impl Leaf {
    pub fn kind(&self) -> Kind {
        match self {
            Leaf::Text(_) => Kind::Text,
            Leaf::Raw(_) => Kind::Raw,
            Leaf::Link(_) => Kind::Link,
            Leaf::Image(_) => Kind::Image,
            Leaf::Autolink(_) => Kind::Autolink,
            Leaf::LinkReference(_) => Kind::LinkReference,
            Leaf::ImageReference(_) => Kind::ImageReference,
            Leaf::LinkDefinition(_) => Kind::LinkDefinition,
            Leaf::InlineCode(_) => Kind::InlineCode,
            Leaf::FencedCodeBlock(_) => Kind::FencedCodeBlock,
            Leaf::IndentedCodeBlock(_) => Kind::IndentedCodeBlock,
            Leaf::HorizontalRule(_) => Kind::HorizontalRule,
            Leaf::TableColumn(_) => Kind::TableColumn,
            Leaf::CharacterReference(_) => Kind::CharacterReference,
            Leaf::EntityReference(_) => Kind::EntityReference,
            Leaf::Comment(_) => Kind::Comment,
        }
    }
}

macro_rules! leaf_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Leaf {
                fn from(value: $variant) -> Self {
                    Leaf::$variant(value)
                }
            }

            impl From<$variant> for Content {
                fn from(value: $variant) -> Self {
                    Content::Leaf(Leaf::$variant(value))
                }
            }
        )*
    };
}

leaf_from!(
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
    TableColumn,
    CharacterReference,
    EntityReference,
    Comment
);

/// Anything that can be added to a container.
///
/// Sequences are flattened in order; `Empty` and `None` add nothing. The
/// heading and list item records become containers holding their text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Empty,
    Node(NodeId),
    Text(String),
    Leaf(Leaf),
    Heading(Heading),
    ListItem(ListItem),
    OrderedListItem(OrderedListItem),
    TaskListItem(TaskListItem),
    Many(Vec<Content>),
}

impl From<NodeId> for Content {
    fn from(id: NodeId) -> Self {
        Content::Node(id)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<Leaf> for Content {
    fn from(leaf: Leaf) -> Self {
        Content::Leaf(leaf)
    }
}

impl From<Heading> for Content {
    fn from(heading: Heading) -> Self {
        Content::Heading(heading)
    }
}

impl From<ListItem> for Content {
    fn from(item: ListItem) -> Self {
        Content::ListItem(item)
    }
}

impl From<OrderedListItem> for Content {
    fn from(item: OrderedListItem) -> Self {
        Content::OrderedListItem(item)
    }
}

impl From<TaskListItem> for Content {
    fn from(item: TaskListItem) -> Self {
        Content::TaskListItem(item)
    }
}

impl<T: Into<Content>> From<Option<T>> for Content {
    fn from(value: Option<T>) -> Self {
        value.map_or(Content::Empty, Into::into)
    }
}

impl<T: Into<Content>> From<Vec<T>> for Content {
    fn from(items: Vec<T>) -> Self {
        Content::Many(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Content>, const N: usize> From<[T; N]> for Content {
    fn from(items: [T; N]) -> Self {
        Content::Many(items.into_iter().map(Into::into).collect())
    }
}

impl<A: Into<Content>, B: Into<Content>> From<(A, B)> for Content {
    fn from((a, b): (A, B)) -> Self {
        Content::Many(vec![a.into(), b.into()])
    }
}

impl<A: Into<Content>, B: Into<Content>, C: Into<Content>> From<(A, B, C)> for Content {
    fn from((a, b, c): (A, B, C)) -> Self {
        Content::Many(vec![a.into(), b.into(), c.into()])
    }
}
