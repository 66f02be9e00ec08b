//! One composition pass from resources to a positioned [`LayoutResult`].

use log::info;

use arbor_core::{
    diagram::LayoutEngine,
    resource::{ConnectionEdge, ResourceNode},
};

use crate::{
    classify::TypeClassifier,
    config::LayoutConfig,
    connect::{ConnectionResolver, ResolvedEdge},
    error::ArborError,
    icons::IconResolver,
    layout::EngineBuilder,
    structure::{LayoutNode, LayoutTree},
    validate,
};

/// The positioned node arena together with its resolved connections.
///
/// This is everything a rendering backend needs: every node's kind, size,
/// relative and absolute position and name, every container's children,
/// and every edge's endpoints, label and style hints.
#[derive(Debug, Clone)]
pub struct LayoutResult {
    tree: LayoutTree,
    edges: Vec<ResolvedEdge>,
}

impl LayoutResult {
    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    pub fn edges(&self) -> &[ResolvedEdge] {
        &self.edges
    }

    /// Looks a node up by resource name.
    pub fn node(&self, name: &str) -> Option<&LayoutNode> {
        self.tree.by_name(name)
    }
}

/// Validates, builds, lays out and connects a resource tree.
///
/// The pipeline only borrows its collaborators, so one classifier and one
/// icon resolver can serve any number of concurrent passes. Each call to
/// [`compose`](Self::compose) builds a fresh arena.
pub struct CompositionPipeline<'a> {
    layout: &'a LayoutConfig,
    classifier: &'a TypeClassifier,
    icons: &'a dyn IconResolver,
    engine: LayoutEngine,
    strict_icons: bool,
}

impl<'a> CompositionPipeline<'a> {
    /// Creates a pipeline using the engine named in `layout`.
    pub fn new(
        layout: &'a LayoutConfig,
        classifier: &'a TypeClassifier,
        icons: &'a dyn IconResolver,
    ) -> Self {
        Self {
            layout,
            classifier,
            icons,
            engine: layout.engine(),
            strict_icons: false,
        }
    }

    pub fn with_engine(mut self, engine: LayoutEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Fail on leaves without an icon instead of rendering a placeholder.
    pub fn with_strict_icons(mut self, strict: bool) -> Self {
        self.strict_icons = strict;
        self
    }

    /// Runs one composition pass.
    ///
    /// # Errors
    ///
    /// - [`ArborError::DuplicateResourceName`] before any node is built.
    /// - [`ArborError::IconNotFound`] in strict icon mode, before layout.
    /// - [`ArborError::ConnectionTargetNotFound`] after layout.
    pub fn compose(
        &self,
        resources: &[ResourceNode],
        connections: &[ConnectionEdge],
    ) -> Result<LayoutResult, ArborError> {
        validate::validate_unique(resources)?;

        let mut tree =
            LayoutTree::build(resources, self.classifier, self.icons, self.strict_icons)?;

        let mut engines = EngineBuilder::from_config(self.layout);
        engines.engine(self.engine).calculate(&mut tree, connections);

        let edges = ConnectionResolver::resolve(connections, &tree)?;

        info!(
            engine:% = self.engine,
            nodes = tree.len(),
            edges = edges.len();
            "Composition complete"
        );
        Ok(LayoutResult { tree, edges })
    }
}

#[cfg(test)]
mod tests {
    use arbor_core::geometry::Size;

    use crate::{error::EndpointField, icons::NoIcons, structure::NodeKind};

    use super::*;

    fn compose(
        resources: &[ResourceNode],
        connections: &[ConnectionEdge],
    ) -> Result<LayoutResult, ArborError> {
        let layout = LayoutConfig::default();
        let classifier = TypeClassifier::default();
        CompositionPipeline::new(&layout, &classifier, &NoIcons).compose(resources, connections)
    }

    #[test]
    fn test_two_connected_leaves() {
        let result = compose(
            &[
                ResourceNode::new("azure/vm", "vm1"),
                ResourceNode::new("azure/vm", "vm2"),
            ],
            &[ConnectionEdge::new("vm1", "vm2")],
        )
        .expect("valid input");

        let vm1 = result.node("vm1").unwrap();
        let vm2 = result.node("vm2").unwrap();
        assert_eq!(vm1.kind(), NodeKind::Leaf);
        assert_eq!(vm1.parent(), None);
        assert!(vm2.position().x() > vm1.position().x());
        assert_eq!(result.edges().len(), 1);
        assert_eq!(result.tree().roots().len(), 2);
    }

    #[test]
    fn test_duplicate_stops_before_layout() {
        let err = compose(
            &[
                ResourceNode::new("azure/vm", "dup"),
                ResourceNode::new("azure/vm", "dup"),
            ],
            &[ConnectionEdge::new("dup", "missing")],
        )
        .unwrap_err();
        assert!(matches!(err, ArborError::DuplicateResourceName { name } if name == "dup"));
    }

    #[test]
    fn test_missing_target_after_layout() {
        let err = compose(
            &[ResourceNode::new("azure/vm", "vm1")],
            &[ConnectionEdge::new("vm1", "missing")],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ArborError::ConnectionTargetNotFound { name, field: EndpointField::To } if name == "missing"
        ));
    }

    #[test]
    fn test_connection_into_leaf_children_fails() {
        let resources = [
            ResourceNode::new("azure/vm", "vm1").with_children(vec![
                ResourceNode::new("azure/disk", "d1"),
                ResourceNode::new("azure/disk", "d2"),
            ]),
            ResourceNode::new("azure/vm", "vm2"),
        ];

        let result = compose(&resources, &[]).expect("valid input");
        let vm1 = result.tree().absolute_bounds(result.tree().get("vm1").unwrap());
        let vm2 = result.tree().absolute_bounds(result.tree().get("vm2").unwrap());
        assert!(!vm1.overlaps(vm2));
        assert!(result.node("d1").is_none());

        let err = compose(&resources, &[ConnectionEdge::new("d1", "vm2")]).unwrap_err();
        assert!(matches!(
            err,
            ArborError::ConnectionTargetNotFound { name, field: EndpointField::From } if name == "d1"
        ));
    }

    #[test]
    fn test_strict_icons() {
        let layout = LayoutConfig::default();
        let classifier = TypeClassifier::default();
        let pipeline =
            CompositionPipeline::new(&layout, &classifier, &NoIcons).with_strict_icons(true);

        // Containers never need an icon.
        let result = pipeline
            .compose(&[ResourceNode::new("azure/resource-group", "rg")], &[])
            .expect("containers only");
        assert_eq!(result.node("rg").unwrap().size(), Size::new(200.0, 100.0));

        let err = pipeline
            .compose(&[ResourceNode::new("azure/vm", "vm1")], &[])
            .unwrap_err();
        assert!(matches!(err, ArborError::IconNotFound { resource_type } if resource_type == "azure/vm"));
    }

    #[test]
    fn test_engine_override() {
        let layout = LayoutConfig::default();
        let classifier = TypeClassifier::default();
        let resources = [
            ResourceNode::new("azure/vm", "a"),
            ResourceNode::new("azure/vm", "b"),
        ];
        let edges = [ConnectionEdge::new("a", "b")];

        let basic = CompositionPipeline::new(&layout, &classifier, &NoIcons)
            .compose(&resources, &edges)
            .expect("valid input");
        let layered = CompositionPipeline::new(&layout, &classifier, &NoIcons)
            .with_engine(LayoutEngine::Sugiyama)
            .compose(&resources, &edges)
            .expect("valid input");

        assert_eq!(
            basic.node("b").unwrap().position().y(),
            basic.node("a").unwrap().position().y()
        );
        assert!(layered.node("b").unwrap().position().y() > layered.node("a").unwrap().position().y());
    }

    #[test]
    fn test_empty_input() {
        let result = compose(&[], &[]).expect("empty input");
        assert!(result.tree().is_empty());
        assert!(result.edges().is_empty());
    }
}
