//! The positioned node arena produced by composition.
//!
//! Every [`ResourceNode`] of the input becomes exactly one [`LayoutNode`]
//! stored in a [`LayoutTree`], except the children of a resource classified
//! as a leaf: leaves never enclose anything, so those are left out.
//!
//! Nodes refer to each other by [`NodeIndex`]: a child stores its parent's
//! index as a plain key, and a container keeps an ordered name → index map of
//! its direct children. The tree additionally
//! keeps a flat name → index map over every node.
//!
//! Sizes and positions start at zero when the tree is built and are filled
//! in by a layout engine. Positions are top-left corners relative to the
//! parent's top-left corner; use [`LayoutTree::absolute_position`] for canvas
//! coordinates.

use std::{collections::BTreeMap, fmt, path::PathBuf};

use indexmap::IndexMap;
use log::{debug, trace, warn};

use arbor_core::{
    geometry::{Bounds, Point, Size},
    resource::{NodeStyle, ResourceNode},
};

use crate::{classify::TypeClassifier, error::ArborError, icons::IconResolver};

// =============================================================================
// Node primitives
// =============================================================================

/// Stable index of a node inside its [`LayoutTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a node encloses other nodes or renders as a single shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Container,
    Leaf,
}

/// The derived, positioned form of one resource.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    name: String,
    resource_type: String,
    kind: NodeKind,
    size: Size,
    position: Point,
    parent: Option<NodeIndex>,
    depth: usize,
    children: IndexMap<String, NodeIndex>,
    icon: Option<PathBuf>,
    metadata: BTreeMap<String, String>,
    style: Option<NodeStyle>,
}

impl LayoutNode {
    /// Returns the resource name, which is also the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_container(&self) -> bool {
        self.kind == NodeKind::Container
    }

    /// Returns the node's own size. For leaves this excludes the label.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the top-left corner relative to the parent (or the canvas).
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Nesting depth, 0 for top-level nodes.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Direct children in input order, keyed by name. Empty for leaves.
    pub fn children(&self) -> &IndexMap<String, NodeIndex> {
        &self.children
    }

    pub fn icon(&self) -> Option<&PathBuf> {
        self.icon.as_ref()
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Returns the user style override carried over from the resource.
    pub fn style(&self) -> Option<&NodeStyle> {
        self.style.as_ref()
    }

    pub(crate) fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }
}

// =============================================================================
// Arena
// =============================================================================

/// Arena of [`LayoutNode`]s with a flat name index.
#[derive(Debug, Clone, Default)]
pub struct LayoutTree {
    nodes: Vec<LayoutNode>,
    roots: Vec<NodeIndex>,
    index: IndexMap<String, NodeIndex>,
}

impl LayoutTree {
    /// Builds the arena from a resource tree whose names are unique.
    ///
    /// Each node is classified with `classifier` and, for leaves, an icon is
    /// looked up through `icons`. Containers never get an icon.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::IconNotFound`] for the first leaf without an icon
    /// when `strict_icons` is set.
    pub fn build(
        resources: &[ResourceNode],
        classifier: &TypeClassifier,
        icons: &dyn IconResolver,
        strict_icons: bool,
    ) -> Result<Self, ArborError> {
        let mut builder = TreeBuilder {
            tree: Self::default(),
            classifier,
            icons,
            strict_icons,
        };

        for resource in resources {
            let idx = builder.add(resource, None, 0)?;
            builder.tree.roots.push(idx);
        }

        debug!(nodes = builder.tree.len(), roots = builder.tree.roots.len(); "Built layout tree");
        Ok(builder.tree)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` was not issued by this tree.
    pub fn node(&self, idx: NodeIndex) -> &LayoutNode {
        &self.nodes[idx.0]
    }

    pub(crate) fn node_mut(&mut self, idx: NodeIndex) -> &mut LayoutNode {
        &mut self.nodes[idx.0]
    }

    /// Looks a node up by resource name.
    pub fn get(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&LayoutNode> {
        self.get(name).map(|idx| self.node(idx))
    }

    /// Returns the flat name → index map over every node, in pre-order.
    pub fn name_index(&self) -> &IndexMap<String, NodeIndex> {
        &self.index
    }

    /// Top-level nodes in input order.
    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    /// Direct children of `idx` in input order.
    pub fn children(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.node(idx).children.values().copied()
    }

    /// Every node in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &LayoutNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIndex(i), node))
    }

    /// Every node with children before their parent.
    ///
    /// The arena is stored in pre-order, so reversing it visits every child
    /// before its parent.
    pub fn post_order(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.nodes.len()).rev().map(NodeIndex)
    }

    /// Canvas position of the node's top-left corner.
    pub fn absolute_position(&self, idx: NodeIndex) -> Point {
        let mut position = self.node(idx).position;
        let mut parent = self.node(idx).parent;
        while let Some(p) = parent {
            position = position.add_point(self.node(p).position);
            parent = self.node(p).parent;
        }
        position
    }

    /// Canvas bounds of the node's own shape (labels excluded).
    pub fn absolute_bounds(&self, idx: NodeIndex) -> Bounds {
        Bounds::new_from_top_left(self.absolute_position(idx), self.node(idx).size)
    }

    /// Bounds enclosing every top-level node, or `None` for an empty tree.
    pub fn canvas_bounds(&self) -> Option<Bounds> {
        self.roots
            .iter()
            .map(|&idx| self.absolute_bounds(idx))
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}

struct TreeBuilder<'a> {
    tree: LayoutTree,
    classifier: &'a TypeClassifier,
    icons: &'a dyn IconResolver,
    strict_icons: bool,
}

impl TreeBuilder<'_> {
    fn add(
        &mut self,
        resource: &ResourceNode,
        parent: Option<NodeIndex>,
        depth: usize,
    ) -> Result<NodeIndex, ArborError> {
        let kind = self.classifier.classify(resource.resource_type());
        let icon = match kind {
            NodeKind::Container => None,
            NodeKind::Leaf => self.leaf_icon(resource.resource_type())?,
        };

        let idx = NodeIndex(self.tree.nodes.len());
        trace!(name = resource.name(), kind:? = kind, idx:% = idx; "Adding node");
        self.tree.nodes.push(LayoutNode {
            name: resource.name().to_string(),
            resource_type: resource.resource_type().to_string(),
            kind,
            size: Size::default(),
            position: Point::default(),
            parent,
            depth,
            children: IndexMap::new(),
            icon,
            metadata: resource.metadata().clone(),
            style: resource.style().cloned(),
        });
        self.tree.index.insert(resource.name().to_string(), idx);

        if kind == NodeKind::Leaf {
            if !resource.children().is_empty() {
                warn!(
                    name = resource.name(),
                    resource_type = resource.resource_type(),
                    dropped = resource.children().len();
                    "Leaf resource has children, ignoring them"
                );
            }
            return Ok(idx);
        }

        for child in resource.children() {
            let child_idx = self.add(child, Some(idx), depth + 1)?;
            self.tree
                .node_mut(idx)
                .children
                .insert(child.name().to_string(), child_idx);
        }

        Ok(idx)
    }

    fn leaf_icon(&self, resource_type: &str) -> Result<Option<PathBuf>, ArborError> {
        match self.icons.resolve(resource_type) {
            Some(path) => Ok(Some(path)),
            None if self.strict_icons => Err(ArborError::IconNotFound {
                resource_type: resource_type.to_string(),
            }),
            None => {
                debug!(resource_type; "No icon found, using placeholder");
                Ok(None)
            }
        }
    }
}
