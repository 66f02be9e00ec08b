//! Sugiyama (layered) tree layout engine
//!
//! Inside every container, and at the top level, the direct children that
//! are linked by connections are arranged in layers with the rust-sugiyama
//! implementation. A connection between two deeply nested resources counts
//! as a link between the two direct children of the scope that contain them.
//!
//! Only the layer and the order inside each layer are taken from
//! rust-sugiyama. The geometry is rebuilt from the real node extents, so
//! containers of any size stack without overlapping.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    panic,
};

use log::{debug, warn};
use petgraph::graph::{DiGraph, NodeIndex as GraphIndex};
use rust_sugiyama::configure::Config;

use arbor_core::{
    geometry::{Point, Size},
    resource::ConnectionEdge,
};

use crate::{
    layout::{Metrics, engines::TreeEngine, place_row, size_fixed_nodes},
    structure::{LayoutTree, NodeIndex},
};

/// Members of one scope, grouped into layers, each ordered left to right.
/// Values are positions in the scope's member list.
type Layers = Vec<Vec<usize>>;

/// Sugiyama layout engine implementation.
#[derive(Debug, Clone)]
pub struct Engine {
    metrics: Metrics,
}

impl Engine {
    /// Create a new layered layout engine
    pub fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }

    /// Positions `members` (the direct children of `scope`) from `origin`
    /// and returns the extent they cover.
    fn place_scope(
        &self,
        tree: &mut LayoutTree,
        scope: Option<NodeIndex>,
        members: &[NodeIndex],
        links: &[(NodeIndex, NodeIndex)],
        origin: Point,
    ) -> Size {
        let graph = scope_graph(tree, scope, members, links);
        if graph.edge_count() == 0 {
            return place_row(tree, &self.metrics, members, origin);
        }

        let Some(components) = layer_components(&graph) else {
            return place_row(tree, &self.metrics, members, origin);
        };

        // Every component and every unlinked member becomes a block; blocks
        // keep the input order of their first member.
        let covered: HashSet<usize> = components.iter().flatten().flatten().copied().collect();
        let mut blocks: Vec<Layers> = components;
        blocks.extend(
            (0..members.len())
                .filter(|i| !covered.contains(i))
                .map(|i| vec![vec![i]]),
        );
        blocks.sort_by_key(|block| block.iter().flatten().min().copied().unwrap_or(usize::MAX));

        let mut cursor = origin.x();
        let mut height = 0.0f32;
        for block in &blocks {
            let size = self.place_block(tree, members, block, Point::new(cursor, origin.y()));
            cursor += size.width() + self.metrics.child_spacing;
            height = height.max(size.height());
        }

        Size::new(cursor - self.metrics.child_spacing - origin.x(), height)
    }

    /// Stacks the layers of one block from `origin`, centering each layer
    /// within the widest one.
    fn place_block(
        &self,
        tree: &mut LayoutTree,
        members: &[NodeIndex],
        layers: &Layers,
        origin: Point,
    ) -> Size {
        let metrics = &self.metrics;
        let rows: Vec<(Vec<NodeIndex>, Size)> = layers
            .iter()
            .map(|layer| {
                let nodes: Vec<NodeIndex> = layer.iter().map(|&i| members[i]).collect();
                let mut width = 0.0f32;
                let mut height = 0.0f32;
                for &idx in &nodes {
                    let extent = metrics.extent(tree, idx);
                    width += extent.width();
                    height = height.max(extent.height());
                }
                width += metrics.child_spacing * nodes.len().saturating_sub(1) as f32;
                (nodes, Size::new(width, height))
            })
            .collect();

        let width = rows
            .iter()
            .map(|(_, size)| size.width())
            .fold(0.0f32, f32::max);

        let mut y = origin.y();
        for (nodes, size) in &rows {
            let x = origin.x() + (width - size.width()) / 2.0;
            place_row(tree, metrics, nodes, Point::new(x, y));
            y += size.height() + metrics.layer_spacing;
        }

        let height = if rows.is_empty() {
            0.0
        } else {
            y - metrics.layer_spacing - origin.y()
        };
        Size::new(width, height)
    }
}

impl TreeEngine for Engine {
    fn calculate(&self, tree: &mut LayoutTree, connections: &[ConnectionEdge]) {
        let metrics = &self.metrics;

        // Unknown names are reported by connection resolution, not here.
        let links: Vec<(NodeIndex, NodeIndex)> = connections
            .iter()
            .filter_map(|edge| Some((tree.get(edge.source())?, tree.get(edge.target())?)))
            .collect();

        for container in size_fixed_nodes(tree, metrics) {
            let members: Vec<_> = tree.children(container).collect();
            let content = self.place_scope(
                tree,
                Some(container),
                &members,
                &links,
                metrics.content_origin(),
            );
            let size = metrics.container_size(content);
            tree.node_mut(container).set_size(size);
        }

        let roots = tree.roots().to_vec();
        let extent = self.place_scope(tree, None, &roots, &links, metrics.margin);
        debug!(
            nodes = tree.len(),
            links = links.len(),
            width = extent.width(),
            height = extent.height();
            "Sugiyama layout calculated"
        );
    }
}

/// Returns the direct child of `scope` that contains `idx`, or `None` when
/// `idx` lies outside the scope or is the scope itself.
fn lift_to_scope(tree: &LayoutTree, idx: NodeIndex, scope: Option<NodeIndex>) -> Option<NodeIndex> {
    let mut current = idx;
    loop {
        let parent = tree.node(current).parent();
        if parent == scope {
            return Some(current);
        }
        current = parent?;
    }
}

/// Builds the graph of links between the members of one scope.
///
/// Graph node `i` is `members[i]`. Self links and repeated links collapse.
fn scope_graph(
    tree: &LayoutTree,
    scope: Option<NodeIndex>,
    members: &[NodeIndex],
    links: &[(NodeIndex, NodeIndex)],
) -> DiGraph<NodeIndex, ()> {
    let mut graph = DiGraph::with_capacity(members.len(), links.len());
    let positions: HashMap<NodeIndex, GraphIndex> = members
        .iter()
        .map(|&idx| (idx, graph.add_node(idx)))
        .collect();

    for &(source, target) in links {
        let (Some(source), Some(target)) = (
            lift_to_scope(tree, source, scope),
            lift_to_scope(tree, target, scope),
        ) else {
            continue;
        };
        if source == target {
            continue;
        }
        if let (Some(&a), Some(&b)) = (positions.get(&source), positions.get(&target)) {
            graph.update_edge(a, b, ());
        }
    }
    graph
}

/// Layers every linked component of `graph` with rust-sugiyama.
///
/// Returns `None` when the layering call panics or yields nothing usable.
fn layer_components(graph: &DiGraph<NodeIndex, ()>) -> Option<Vec<Layers>> {
    let edges: Vec<(u32, u32)> = graph
        .raw_edges()
        .iter()
        .map(|edge| (edge.source().index() as u32, edge.target().index() as u32))
        .collect();
    let node_count = graph.node_count();

    debug!(nodes = node_count, edges = edges.len(); "Applying Sugiyama algorithm to scope");

    let sugiyama_edges = edges.clone();
    let layouts = panic::catch_unwind(move || {
        let config = Config {
            minimum_length: 1,
            vertex_spacing: 3.0,
            ..Default::default()
        };
        rust_sugiyama::from_edges(&sugiyama_edges, &config)
    });

    let layouts = match layouts {
        Ok(layouts) if !layouts.is_empty() => layouts,
        Ok(_) => {
            warn!("Rust-sugiyama returned empty layout results, falling back to a row");
            return None;
        }
        Err(err) => {
            let message = err
                .downcast_ref::<String>()
                .map(String::as_str)
                .or_else(|| err.downcast_ref::<&str>().copied())
                .unwrap_or("unknown error");
            warn!(message; "Rust-sugiyama layout engine panicked, falling back to a row");
            return None;
        }
    };

    let mut seen = HashSet::new();
    let components: Vec<Layers> = layouts
        .iter()
        .map(|(coords, _, _)| {
            let coords: Vec<(usize, (f64, f64))> = coords
                .iter()
                .copied()
                .filter(|&(id, _)| id < node_count && seen.insert(id))
                .collect();
            layers_from_coords(&coords, &edges)
        })
        .filter(|layers| !layers.is_empty())
        .collect();

    if components.is_empty() {
        warn!("Failed to map any rust-sugiyama positions back to scope members");
        return None;
    }
    Some(components)
}

/// Groups coordinates into layers by their vertical coordinate and orders
/// each layer by the horizontal one.
///
/// The layer order is flipped when needed so that links point from an
/// upper layer to a lower one.
fn layers_from_coords(coords: &[(usize, (f64, f64))], edges: &[(u32, u32)]) -> Layers {
    let mut by_level: BTreeMap<i64, Vec<(f64, usize)>> = BTreeMap::new();
    for &(id, (x, y)) in coords {
        let level = (y * 1000.0).round() as i64;
        by_level.entry(level).or_default().push((x, id));
    }

    let mut layers: Layers = by_level
        .into_values()
        .map(|mut layer| {
            layer.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            layer.into_iter().map(|(_, id)| id).collect()
        })
        .collect();

    let layer_of: HashMap<usize, usize> = layers
        .iter()
        .enumerate()
        .flat_map(|(layer, ids)| ids.iter().map(move |&id| (id, layer)))
        .collect();

    let downward = edges.iter().find_map(|&(source, target)| {
        let source = layer_of.get(&(source as usize))?;
        let target = layer_of.get(&(target as usize))?;
        (source != target).then_some(source < target)
    });
    if downward == Some(false) {
        layers.reverse();
    }
    layers
}
