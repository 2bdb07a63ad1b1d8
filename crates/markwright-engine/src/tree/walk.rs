use std::iter::Copied;
use std::slice::Iter;

use super::{Document, NodeId};

/// Direct children of a node.
#[derive(Debug, Clone)]
pub struct Elements<'a> {
    inner: Copied<Iter<'a, NodeId>>,
}

impl<'a> Elements<'a> {
    pub(super) fn new(children: &'a [NodeId]) -> Self {
        Self {
            inner: children.iter().copied(),
        }
    }
}

impl Iterator for Elements<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Elements<'_> {
    fn next_back(&mut self) -> Option<NodeId> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Elements<'_> {}

/// Pre-order traversal that never leaves the subtree it started in.
///
/// Keeps the remaining children of every level it has descended into, so
/// moving to the next sibling is constant time however wide the parent is.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    document: &'a Document,
    /// Start node, yielded before its subtree by `descendants_and_self`.
    start: Option<NodeId>,
    levels: Vec<Elements<'a>>,
}

impl<'a> Descendants<'a> {
    /// Walk below `id`.
    pub(super) fn below(document: &'a Document, id: NodeId) -> Self {
        Self {
            document,
            start: None,
            levels: vec![document.elements(id)],
        }
    }

    /// Walk `id` and then everything below it; empty for unknown ids.
    pub(super) fn starting_at(document: &'a Document, id: Option<NodeId>) -> Self {
        Self {
            document,
            start: id,
            levels: Vec::new(),
        }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if let Some(start) = self.start.take() {
            self.levels.push(self.document.elements(start));
            return Some(start);
        }
        loop {
            match self.levels.last_mut()?.next() {
                Some(id) => {
                    self.levels.push(self.document.elements(id));
                    return Some(id);
                }
                None => {
                    self.levels.pop();
                }
            }
        }
    }
}
