//! Depth-first, document-order traversal over a [`Document`].
//!
//! Nodes are addressed by [`NodePath`], the child indices leading from the
//! document root. Paths collected before a one-for-one replacement stay
//! valid for every node outside the replaced subtree.

use crate::node::{Document, Element, Node};

/// Location of a node as child indices from the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// Path from raw indices.
    #[must_use]
    pub fn from_indices(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }

    /// Child indices from the root.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Path of the `index`-th child of this node.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Path of the parent node, `None` for top-level nodes.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        match self.0.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(Self(rest.to_vec())),
            _ => None,
        }
    }

    /// Whether `other` lies strictly inside the subtree at this path.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &NodePath) -> bool {
        other.0.len() > self.0.len() && other.0.starts_with(&self.0)
    }
}

/// Traversal control returned by a visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Visit children, then continue with siblings.
    Continue,
    /// Do not descend into this node's children.
    SkipChildren,
    /// Stop the whole traversal.
    Stop,
}

/// Visit `nodes` depth-first; returns `false` once a visitor asked to stop.
fn walk_nodes<'a, F>(nodes: &'a [Node], path: &mut Vec<usize>, visit: &mut F) -> bool
where
    F: FnMut(&[usize], &'a Node) -> Walk,
{
    for (index, node) in nodes.iter().enumerate() {
        path.push(index);
        let control = visit(path, node);
        let keep_going = match control {
            Walk::Stop => false,
            Walk::SkipChildren => true,
            Walk::Continue => match node {
                Node::Element(el) => walk_nodes(&el.children, path, visit),
                Node::Text(_) | Node::Comment(_) | Node::Doctype(_) => true,
            },
        };
        path.pop();
        if !keep_going {
            return false;
        }
    }
    true
}

impl Document {
    /// Walk every node in document order.
    pub fn walk<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(&[usize], &'a Node) -> Walk,
    {
        let mut path = Vec::new();
        walk_nodes(&self.children, &mut path, &mut visit);
    }

    /// Walk the descendants of the node at `root` in document order.
    pub fn walk_within<'a, F>(&'a self, root: &NodePath, mut visit: F)
    where
        F: FnMut(&[usize], &'a Node) -> Walk,
    {
        let Some(Node::Element(el)) = self.node(root) else {
            return;
        };
        let mut path = root.0.clone();
        walk_nodes(&el.children, &mut path, &mut visit);
    }

    /// Paths of all elements matching `pred`, in document order.
    pub fn find_elements<P>(&self, pred: P) -> Vec<NodePath>
    where
        P: Fn(&Element) -> bool,
    {
        let mut found = Vec::new();
        self.walk(|path, node| {
            if let Node::Element(el) = node
                && pred(el)
            {
                found.push(NodePath::from_indices(path));
            }
            Walk::Continue
        });
        found
    }

    /// Paths of descendant elements of `root` matching `pred`, in document order.
    pub fn find_elements_within<P>(&self, root: &NodePath, pred: P) -> Vec<NodePath>
    where
        P: Fn(&Element) -> bool,
    {
        let mut found = Vec::new();
        self.walk_within(root, |path, node| {
            if let Node::Element(el) = node
                && pred(el)
            {
                found.push(NodePath::from_indices(path));
            }
            Walk::Continue
        });
        found
    }

    /// First descendant text node of `root` whose text satisfies `pred`.
    pub fn find_text_within<P>(&self, root: &NodePath, pred: P) -> Option<NodePath>
    where
        P: Fn(&str) -> bool,
    {
        let mut found = None;
        self.walk_within(root, |path, node| match node {
            Node::Text(text) if pred(text) => {
                found = Some(NodePath::from_indices(path));
                Walk::Stop
            }
            _ => Walk::Continue,
        });
        found
    }

    /// Whether any element in the document carries the given `id`.
    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        let mut exists = false;
        self.walk(|_, node| match node {
            Node::Element(el) if el.id() == Some(id) => {
                exists = true;
                Walk::Stop
            }
            _ => Walk::Continue,
        });
        exists
    }

    /// Node at `path`.
    #[must_use]
    pub fn node(&self, path: &NodePath) -> Option<&Node> {
        let (first, rest) = path.0.split_first()?;
        let mut node = self.children.get(*first)?;
        for &index in rest {
            node = node.as_element()?.children.get(index)?;
        }
        Some(node)
    }

    /// Mutable node at `path`.
    pub fn node_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        let (first, rest) = path.0.split_first()?;
        let mut node = self.children.get_mut(*first)?;
        for &index in rest {
            node = node.as_element_mut()?.children.get_mut(index)?;
        }
        Some(node)
    }

    /// Element at `path`.
    #[must_use]
    pub fn element(&self, path: &NodePath) -> Option<&Element> {
        self.node(path)?.as_element()
    }

    /// Mutable element at `path`.
    pub fn element_mut(&mut self, path: &NodePath) -> Option<&mut Element> {
        self.node_mut(path)?.as_element_mut()
    }

    /// Replace the node at `path`, returning the previous node.
    pub fn replace(&mut self, path: &NodePath, replacement: Node) -> Option<Node> {
        let slot = self.node_mut(path)?;
        Some(std::mem::replace(slot, replacement))
    }
}
