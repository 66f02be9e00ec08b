//! Connection endpoint resolution.

use log::debug;

use arbor_core::resource::{ConnectionEdge, EdgeHints};

use crate::{
    error::{ArborError, EndpointField},
    structure::{LayoutTree, NodeIndex},
};

/// A connection whose endpoints are nodes of a [`LayoutTree`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEdge {
    source: NodeIndex,
    target: NodeIndex,
    label: Option<String>,
    hints: EdgeHints,
}

impl ResolvedEdge {
    pub fn source(&self) -> NodeIndex {
        self.source
    }

    pub fn target(&self) -> NodeIndex {
        self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Style hints exactly as given on the input connection.
    pub fn hints(&self) -> &EdgeHints {
        &self.hints
    }
}

/// Resolves connection endpoints against a tree's name index.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConnectionResolver;

impl ConnectionResolver {
    /// Resolves every edge in input order.
    ///
    /// The source of an edge is checked before its target. The first
    /// endpoint that names no node aborts resolution with
    /// [`ArborError::ConnectionTargetNotFound`]; nothing is returned for
    /// the edges before it.
    pub fn resolve(
        edges: &[ConnectionEdge],
        tree: &LayoutTree,
    ) -> Result<Vec<ResolvedEdge>, ArborError> {
        let resolved = edges
            .iter()
            .map(|edge| {
                let source = lookup(tree, edge.source(), EndpointField::From)?;
                let target = lookup(tree, edge.target(), EndpointField::To)?;
                Ok(ResolvedEdge {
                    source,
                    target,
                    label: edge.label().map(str::to_string),
                    hints: edge.hints().clone(),
                })
            })
            .collect::<Result<Vec<_>, ArborError>>()?;

        debug!(edges = resolved.len(); "Resolved connections");
        Ok(resolved)
    }
}

fn lookup(tree: &LayoutTree, name: &str, field: EndpointField) -> Result<NodeIndex, ArborError> {
    tree.get(name)
        .ok_or_else(|| ArborError::ConnectionTargetNotFound {
            name: name.to_string(),
            field,
        })
}

#[cfg(test)]
mod tests {
    use arbor_core::resource::{LineStyle, ResourceNode};

    use crate::{classify::TypeClassifier, icons::NoIcons};

    use super::*;

    fn tree() -> LayoutTree {
        LayoutTree::build(
            &[
                ResourceNode::new("azure/vnet", "hub")
                    .with_children(vec![ResourceNode::new("azure/vm", "vm1")]),
                ResourceNode::new("azure/vm", "vm2"),
            ],
            &TypeClassifier::default(),
            &NoIcons,
            false,
        )
        .expect("non-strict build")
    }

    #[test]
    fn test_resolve_keeps_label_and_hints() {
        let tree = tree();
        let hints = EdgeHints {
            line: Some(LineStyle::Dashed),
            ..EdgeHints::default()
        };
        let edges = vec![
            ConnectionEdge::new("vm1", "vm2")
                .with_label("https")
                .with_hints(hints.clone()),
            ConnectionEdge::new("hub", "vm2"),
        ];

        let resolved = ConnectionResolver::resolve(&edges, &tree).expect("all endpoints exist");
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].source(), tree.get("vm1").unwrap());
        assert_eq!(resolved[0].target(), tree.get("vm2").unwrap());
        assert_eq!(resolved[0].label(), Some("https"));
        assert_eq!(resolved[0].hints(), &hints);
        assert_eq!(resolved[1].source(), tree.get("hub").unwrap());
    }

    #[test]
    fn test_missing_source_reports_from() {
        let edges = vec![ConnectionEdge::new("ghost", "also-missing")];
        match ConnectionResolver::resolve(&edges, &tree()) {
            Err(ArborError::ConnectionTargetNotFound { name, field }) => {
                assert_eq!(name, "ghost");
                assert_eq!(field, EndpointField::From);
            }
            other => panic!("expected connection error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_target_reports_to() {
        let edges = vec![ConnectionEdge::new("vm1", "missing")];
        match ConnectionResolver::resolve(&edges, &tree()) {
            Err(ArborError::ConnectionTargetNotFound { name, field }) => {
                assert_eq!(name, "missing");
                assert_eq!(field, EndpointField::To);
            }
            other => panic!("expected connection error, got {other:?}"),
        }
    }

    #[test]
    fn test_first_invalid_edge_in_input_order() {
        let edges = vec![
            ConnectionEdge::new("vm1", "vm2"),
            ConnectionEdge::new("vm1", "first"),
            ConnectionEdge::new("second", "vm2"),
        ];
        assert!(matches!(
            ConnectionResolver::resolve(&edges, &tree()),
            Err(ArborError::ConnectionTargetNotFound { name, .. }) if name == "first"
        ));
    }

    #[test]
    fn test_no_edges() {
        assert!(ConnectionResolver::resolve(&[], &tree()).unwrap().is_empty());
    }
}
