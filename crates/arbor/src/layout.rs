//! Sizing and positioning of the node arena.
//!
//! Layout runs in two directions over a [`LayoutTree`]: sizes are computed
//! bottom-up (every child before its container) and each container places
//! its direct children relative to its own top-left corner. The top-level
//! nodes are finally placed on the canvas.
//!
//! Two engines share the rules in this module:
//!
//! - **basic**: every container lays its children out in a single row.
//! - **sugiyama**: children connected by edges are layered; unconnected
//!   children fall back to row placement.
//!
//! Use [`EngineBuilder`] to obtain an engine for a
//! [`LayoutEngine`](arbor_core::diagram::LayoutEngine) value.

mod engines;

pub use engines::{EngineBuilder, TreeEngine};

use arbor_core::geometry::{Point, Size};

use crate::{
    config::LayoutConfig,
    structure::{LayoutTree, NodeIndex, NodeKind},
};

/// The fixed layout constants, copied out of [`LayoutConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub node_size: Size,
    pub label_height: f32,
    pub child_spacing: f32,
    pub padding: f32,
    pub header_height: f32,
    pub min_container_size: Size,
    pub margin: Point,
    pub layer_spacing: f32,
}

impl From<&LayoutConfig> for Metrics {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            node_size: Size::new(config.node_width(), config.node_height()),
            label_height: config.label_height(),
            child_spacing: config.child_spacing(),
            padding: config.padding(),
            header_height: config.header_height(),
            min_container_size: Size::new(
                config.min_container_width(),
                config.min_container_height(),
            ),
            margin: Point::new(config.margin_x(), config.margin_y()),
            layer_spacing: config.layer_spacing(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::from(&LayoutConfig::default())
    }
}

impl Metrics {
    /// Offset of a container's content area from its top-left corner.
    pub fn content_origin(&self) -> Point {
        Point::new(self.padding, self.header_height + self.padding)
    }

    /// Room a node occupies inside its parent.
    ///
    /// A leaf reserves its label band below the icon; a container's label
    /// sits in its own header, so its extent is its size.
    pub fn extent(&self, tree: &LayoutTree, idx: NodeIndex) -> Size {
        let node = tree.node(idx);
        match node.kind() {
            NodeKind::Leaf => node.size().grow_height(self.label_height),
            NodeKind::Container => node.size(),
        }
    }

    /// Size of a container whose placed children span `content`.
    ///
    /// Height follows the content exactly; only the width is floored.
    pub fn container_size(&self, content: Size) -> Size {
        Size::new(
            (content.width() + 2.0 * self.padding).max(self.min_container_size.width()),
            content.height() + self.header_height + 2.0 * self.padding,
        )
    }
}

/// Gives every leaf the fixed node size and every childless container the
/// minimum container size.
///
/// Returns the containers that do have children, children first.
pub(crate) fn size_fixed_nodes(tree: &mut LayoutTree, metrics: &Metrics) -> Vec<NodeIndex> {
    let mut containers = Vec::new();
    for idx in tree.post_order().collect::<Vec<_>>() {
        let kind = tree.node(idx).kind();
        let childless = tree.node(idx).children().is_empty();
        match kind {
            NodeKind::Leaf => tree.node_mut(idx).set_size(metrics.node_size),
            NodeKind::Container if childless => {
                tree.node_mut(idx).set_size(metrics.min_container_size)
            }
            NodeKind::Container => containers.push(idx),
        }
    }
    containers
}

/// Places `nodes` left to right from `origin`, top-aligned.
///
/// Returns the extent of the row; zero for no nodes.
pub(crate) fn place_row(
    tree: &mut LayoutTree,
    metrics: &Metrics,
    nodes: &[NodeIndex],
    origin: Point,
) -> Size {
    let mut cursor = origin.x();
    let mut height = 0.0f32;
    for &idx in nodes {
        let extent = metrics.extent(tree, idx);
        tree.node_mut(idx)
            .set_position(Point::new(cursor, origin.y()));
        cursor += extent.width() + metrics.child_spacing;
        height = height.max(extent.height());
    }

    if nodes.is_empty() {
        Size::default()
    } else {
        Size::new(cursor - metrics.child_spacing - origin.x(), height)
    }
}

#[cfg(test)]
mod tests {
    use arbor_core::resource::ResourceNode;

    use crate::{classify::TypeClassifier, icons::NoIcons};

    use super::*;

    fn build(resources: &[ResourceNode]) -> LayoutTree {
        LayoutTree::build(resources, &TypeClassifier::default(), &NoIcons, false)
            .expect("non-strict build")
    }

    #[test]
    fn test_metrics_from_config() {
        let metrics = Metrics::from(&LayoutConfig::default().with_padding(10.0));
        assert_eq!(metrics.padding, 10.0);
        assert_eq!(metrics.content_origin(), Point::new(10.0, 40.0));
        assert_eq!(metrics.min_container_size, Size::new(200.0, 100.0));
    }

    #[test]
    fn test_size_fixed_nodes() {
        let mut tree = build(&[
            ResourceNode::new("azure/resource-group", "rg")
                .with_children(vec![ResourceNode::new("azure/vm", "vm1")]),
            ResourceNode::new("azure/subnet", "empty"),
        ]);
        let metrics = Metrics::default();

        let containers = size_fixed_nodes(&mut tree, &metrics);
        assert_eq!(containers, [tree.get("rg").unwrap()]);
        assert_eq!(tree.by_name("vm1").unwrap().size(), Size::new(64.0, 64.0));
        assert_eq!(tree.by_name("empty").unwrap().size(), Size::new(200.0, 100.0));

        let vm1 = tree.get("vm1").unwrap();
        assert_eq!(metrics.extent(&tree, vm1), Size::new(64.0, 84.0));
    }

    #[test]
    fn test_place_row() {
        let mut tree = build(&[
            ResourceNode::new("azure/vm", "a"),
            ResourceNode::new("azure/vm", "b"),
        ]);
        let metrics = Metrics::default();
        size_fixed_nodes(&mut tree, &metrics);

        let nodes = tree.roots().to_vec();
        let extent = place_row(&mut tree, &metrics, &nodes, Point::new(20.0, 50.0));
        assert_eq!(extent, Size::new(168.0, 84.0));
        assert_eq!(tree.by_name("a").unwrap().position(), Point::new(20.0, 50.0));
        assert_eq!(tree.by_name("b").unwrap().position(), Point::new(124.0, 50.0));

        assert_eq!(place_row(&mut tree, &metrics, &[], Point::default()), Size::default());
    }
}
