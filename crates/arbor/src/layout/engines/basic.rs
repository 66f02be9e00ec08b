//! Basic tree layout engine
//!
//! Every container lays out its direct children in a single row, left to
//! right in input order, and grows to enclose them. The top-level nodes form
//! one more row starting at the canvas margin. No connection influences the
//! placement.

use log::debug;

use arbor_core::resource::ConnectionEdge;

use crate::{
    layout::{Metrics, engines::TreeEngine, place_row, size_fixed_nodes},
    structure::LayoutTree,
};

/// Basic layout engine implementation.
#[derive(Debug, Clone)]
pub struct Engine {
    metrics: Metrics,
}

impl Engine {
    /// Create a new basic layout engine
    pub fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }
}

impl TreeEngine for Engine {
    fn calculate(&self, tree: &mut LayoutTree, _connections: &[ConnectionEdge]) {
        let metrics = &self.metrics;

        // Children first, so every child extent is final when its container places it.
        for container in size_fixed_nodes(tree, metrics) {
            let children: Vec<_> = tree.children(container).collect();
            let content = place_row(tree, metrics, &children, metrics.content_origin());
            let size = metrics.container_size(content);
            tree.node_mut(container).set_size(size);
        }

        let roots = tree.roots().to_vec();
        let extent = place_row(tree, metrics, &roots, metrics.margin);
        debug!(
            nodes = tree.len(),
            width = extent.width(),
            height = extent.height();
            "Basic layout calculated"
        );
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use arbor_core::{
        geometry::{Point, Size},
        resource::ResourceNode,
    };

    use crate::{classify::TypeClassifier, icons::NoIcons};

    use super::*;

    fn layout(resources: &[ResourceNode]) -> LayoutTree {
        let mut tree = LayoutTree::build(resources, &TypeClassifier::default(), &NoIcons, false)
            .expect("non-strict build");
        Engine::new(Metrics::default()).calculate(&mut tree, &[]);
        tree
    }

    #[test]
    fn test_top_level_row() {
        let tree = layout(&[
            ResourceNode::new("azure/vm", "vm1"),
            ResourceNode::new("azure/vm", "vm2"),
            ResourceNode::new("azure/resource-group", "rg"),
        ]);

        assert_eq!(tree.by_name("vm1").unwrap().position(), Point::new(50.0, 50.0));
        assert_eq!(tree.by_name("vm2").unwrap().position(), Point::new(154.0, 50.0));
        assert_eq!(tree.by_name("rg").unwrap().position(), Point::new(258.0, 50.0));
    }

    #[test]
    fn test_container_with_one_leaf() {
        let tree = layout(&[ResourceNode::new("azure/resource-group", "rg")
            .with_children(vec![ResourceNode::new("azure/vm", "vm1")])]);

        let rg = tree.by_name("rg").unwrap();
        // width: max(20 + 64 + 20, 200); height: 84 + 30 + 40.
        assert_eq!(rg.size(), Size::new(200.0, 154.0));
        assert_eq!(tree.by_name("vm1").unwrap().position(), Point::new(20.0, 50.0));
    }

    #[test]
    fn test_wide_container_exceeds_floor() {
        let children = (0..4)
            .map(|i| ResourceNode::new("azure/vm", format!("vm{i}")))
            .collect();
        let tree = layout(&[ResourceNode::new("azure/subnet", "app").with_children(children)]);

        let app = tree.by_name("app").unwrap();
        // 20 + 4 * 64 + 3 * 40 + 20
        assert!(approx_eq!(f32, app.size().width(), 416.0));
        assert_eq!(
            tree.by_name("vm3").unwrap().position(),
            Point::new(20.0 + 3.0 * 104.0, 50.0)
        );
    }

    #[test]
    fn test_nested_empty_container_propagates_floor() {
        let tree = layout(&[ResourceNode::new("azure/vnet", "outer")
            .with_children(vec![ResourceNode::new("azure/subnet", "inner")])]);

        assert_eq!(tree.by_name("inner").unwrap().size(), Size::new(200.0, 100.0));
        // 20 + 200 + 20 by 100 + 30 + 40
        assert_eq!(tree.by_name("outer").unwrap().size(), Size::new(240.0, 170.0));
    }

    #[test]
    fn test_three_levels_enclose() {
        let tree = layout(&[ResourceNode::new("azure/vnet", "hub").with_children(vec![
            ResourceNode::new("azure/subnet", "app").with_children(vec![
                ResourceNode::new("azure/vm", "vm1"),
                ResourceNode::new("azure/vm", "vm2"),
            ]),
            ResourceNode::new("azure/subnet", "data")
                .with_children(vec![ResourceNode::new("azure/sql-database", "db")]),
        ])]);

        for (idx, node) in tree.iter() {
            if let Some(parent) = node.parent() {
                let outer = tree.absolute_bounds(parent);
                let inner = tree.absolute_bounds(idx);
                assert!(outer.contains(inner), "{} escapes its parent", node.name());
            }
        }
    }
}
