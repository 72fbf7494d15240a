//! # Tree Walker
//!
//! Depth-first, top-down traversal that rebuilds a document tree.
//!
//! Dispatch is purely on [`NodeKind`]:
//!
//! - `document`: [`Visitor::visit_document`] may replace the whole node;
//!   otherwise the children are walked in order.
//! - `block` / `inline`: the visitor either declines (`Ok(None)`), in which
//!   case the node gets the default projection, or returns a [`Visited`].
//!   Unless the result is final, the *original* children are walked and
//!   attached to the returned node.
//! - `text` and unknown kinds: default projection.
//!
//! The default projection copies the node without its children and then
//! attaches the walked children, so no subtree is deep-copied twice.
//! Visitor errors propagate unchanged and no partial tree is returned.

use crate::node::{Node, NodeKind};

/// Result of visiting a block or inline node
#[derive(Debug, Clone, PartialEq)]
pub struct Visited {
    pub node: Node,

    /// The visitor took ownership of the whole subtree; children are not walked
    pub is_final: bool,
}

impl Visited {
    pub fn new(node: Node) -> Self {
        Self {
            node,
            is_final: false,
        }
    }

    pub fn finalized(node: Node) -> Self {
        Self {
            node,
            is_final: true,
        }
    }
}

/// Callbacks invoked by [`walk`]
///
/// Every method defaults to "not handled".
pub trait Visitor {
    type Error;

    fn visit_document(&mut self, _node: &Node) -> Result<Option<Node>, Self::Error> {
        Ok(None)
    }

    fn visit_block(&mut self, _node: &Node) -> Result<Option<Visited>, Self::Error> {
        Ok(None)
    }

    fn visit_inline(&mut self, _node: &Node) -> Result<Option<Visited>, Self::Error> {
        Ok(None)
    }
}

/// Walk `node`, returning the rebuilt tree
pub fn walk<V: Visitor>(visitor: &mut V, node: &Node) -> Result<Node, V::Error> {
    match node.kind {
        NodeKind::Document => match visitor.visit_document(node)? {
            Some(document) => Ok(document),
            None => walk_default(visitor, node),
        },
        NodeKind::Block => {
            let visited = visitor.visit_block(node)?;
            finish_visit(visitor, node, visited)
        }
        NodeKind::Inline => {
            let visited = visitor.visit_inline(node)?;
            finish_visit(visitor, node, visited)
        }
        NodeKind::Text | NodeKind::Other(_) => walk_default(visitor, node),
    }
}

/// Default projection: shallow copy, then walk the children
pub fn walk_default<V: Visitor>(visitor: &mut V, node: &Node) -> Result<Node, V::Error> {
    let mut projected = node.shallow_clone();

    if let Some(children) = &node.children {
        projected.children = Some(walk_children(visitor, children)?);
    }

    Ok(projected)
}

/// Walk a sibling list, preserving order
pub fn walk_children<V: Visitor>(visitor: &mut V, children: &[Node]) -> Result<Vec<Node>, V::Error> {
    children.iter().map(|child| walk(visitor, child)).collect()
}

fn finish_visit<V: Visitor>(
    visitor: &mut V,
    original: &Node,
    visited: Option<Visited>,
) -> Result<Node, V::Error> {
    let Some(Visited { mut node, is_final }) = visited else {
        return walk_default(visitor, original);
    };

    if !is_final {
        if let Some(children) = &original.children {
            node.children = Some(walk_children(visitor, children)?);
        }
    }

    Ok(node)
}
