//! End-to-end composition scenarios
//!
//! Each test runs a full composition pass through the public pipeline with
//! the default layout configuration.

use float_cmp::approx_eq;

use arbor::{
    ArborError, CompositionPipeline, EndpointField, LayoutResult,
    classify::TypeClassifier,
    config::LayoutConfig,
    icons::NoIcons,
    resource::{ConnectionEdge, ResourceNode},
    structure::NodeKind,
    validate,
};

fn compose(
    resources: &[ResourceNode],
    connections: &[ConnectionEdge],
) -> Result<LayoutResult, ArborError> {
    let layout = LayoutConfig::default();
    let classifier = TypeClassifier::default();
    CompositionPipeline::new(&layout, &classifier, &NoIcons).compose(resources, connections)
}

#[test]
fn test_two_connected_vms() {
    let result = compose(
        &[
            ResourceNode::new("azure/vm", "vm1"),
            ResourceNode::new("azure/vm", "vm2"),
        ],
        &[ConnectionEdge::new("vm1", "vm2")],
    )
    .expect("composition succeeds");

    let tree = result.tree();
    assert_eq!(tree.roots().len(), 2);

    let vm1 = result.node("vm1").expect("vm1 exists");
    let vm2 = result.node("vm2").expect("vm2 exists");
    assert_eq!(vm1.kind(), NodeKind::Leaf);
    assert_eq!(vm2.kind(), NodeKind::Leaf);
    assert!(vm1.parent().is_none());
    assert!(vm2.position().x() > vm1.position().x());

    assert_eq!(result.edges().len(), 1);
    let edge = &result.edges()[0];
    assert_eq!(tree.node(edge.source()).name(), "vm1");
    assert_eq!(tree.node(edge.target()).name(), "vm2");
}

#[test]
fn test_resource_group_encloses_vm() {
    let layout = LayoutConfig::default();
    let result = compose(
        &[ResourceNode::new("azure/resource-group", "rg")
            .with_children(vec![ResourceNode::new("azure/vm", "vm1")])],
        &[],
    )
    .expect("composition succeeds");

    let rg = result.node("rg").expect("rg exists");
    let vm1 = result.node("vm1").expect("vm1 exists");
    assert_eq!(rg.kind(), NodeKind::Container);
    assert_eq!(vm1.kind(), NodeKind::Leaf);
    assert_eq!(rg.children().len(), 1);
    assert!(rg.children().contains_key("vm1"));

    assert!(rg.size().width() >= vm1.size().width() + 2.0 * layout.padding());
    assert!(
        rg.size().height()
            >= vm1.size().height()
                + layout.label_height()
                + layout.header_height()
                + 2.0 * layout.padding()
    );

    let tree = result.tree();
    let rg_idx = tree.get("rg").expect("indexed");
    let vm_idx = tree.get("vm1").expect("indexed");
    assert!(tree.absolute_bounds(rg_idx).contains(tree.absolute_bounds(vm_idx)));
}

#[test]
fn test_duplicate_name_stops_before_layout() {
    let resources = [
        ResourceNode::new("azure/vnet", "net").with_children(vec![
            ResourceNode::new("azure/subnet", "a")
                .with_children(vec![ResourceNode::new("azure/vm", "dup")]),
        ]),
        ResourceNode::new("azure/vm", "dup"),
    ];

    match validate::validate_unique(&resources) {
        Err(ArborError::DuplicateResourceName { name }) => assert_eq!(name, "dup"),
        other => panic!("expected a duplicate name error, got {other:?}"),
    }

    // The second "dup" would also break the connection below; the name
    // check must win.
    let err = compose(&resources, &[ConnectionEdge::new("dup", "missing")]).unwrap_err();
    assert!(
        matches!(err, ArborError::DuplicateResourceName { ref name } if name == "dup"),
        "{err:?}"
    );
}

#[test]
fn test_missing_connection_target() {
    let err = compose(
        &[ResourceNode::new("azure/vm", "vm1")],
        &[ConnectionEdge::new("vm1", "missing")],
    )
    .unwrap_err();

    match err {
        ArborError::ConnectionTargetNotFound { name, field } => {
            assert_eq!(name, "missing");
            assert_eq!(field, EndpointField::To);
            assert_eq!(field.to_string(), "to");
        }
        other => panic!("expected a connection error, got {other:?}"),
    }
}

#[test]
fn test_empty_container_gets_floor() {
    let layout = LayoutConfig::default();
    let result = compose(&[ResourceNode::new("azure/resource-group", "rg")], &[])
        .expect("composition succeeds");

    let rg = result.node("rg").expect("rg exists");
    assert_eq!(rg.kind(), NodeKind::Container);
    assert!(rg.children().is_empty());
    assert!(approx_eq!(f32, rg.size().width(), layout.min_container_width()));
    assert!(approx_eq!(f32, rg.size().height(), layout.min_container_height()));
    assert!(approx_eq!(f32, rg.size().width(), 200.0));
    assert!(approx_eq!(f32, rg.size().height(), 100.0));
}

#[test]
fn test_custom_floor_is_honored() {
    let layout = LayoutConfig::default().with_min_container_size(320.0, 180.0);
    let classifier = TypeClassifier::default();
    let result = CompositionPipeline::new(&layout, &classifier, &NoIcons)
        .compose(&[ResourceNode::new("aws/vpc", "vpc")], &[])
        .expect("composition succeeds");

    let vpc = result.node("vpc").expect("vpc exists");
    assert!(approx_eq!(f32, vpc.size().width(), 320.0));
    assert!(approx_eq!(f32, vpc.size().height(), 180.0));
}
