//! Mermaid flowchart text backend.
//!
//! The flowchart mirrors the containment tree: containers become
//! `subgraph` blocks and leaves become plain nodes. Mermaid lays the chart
//! out itself, so positions are not emitted.

use std::fmt::{self, Write as _};

use arbor_core::{diagram::Direction, resource::LineStyle};

use crate::{
    export::{self, Exporter},
    pipeline::LayoutResult,
    structure::{LayoutTree, NodeIndex, NodeKind},
    style::StyleSheet,
};

const INDENT: &str = "    ";

/// Renders a [`LayoutResult`] as a Mermaid `flowchart` definition.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mermaid {
    direction: Direction,
}

/// Turns a resource name into a Mermaid node id.
pub fn sanitize_id(name: &str) -> String {
    name.replace(['-', ' '], "_")
}

/// Mermaid has no `BT` keyword and spells top-down `TD`.
fn flowchart_direction(direction: Direction) -> &'static str {
    match direction {
        Direction::Tb => "TD",
        Direction::Lr => "LR",
        Direction::Bt => "BU",
        Direction::Rl => "RL",
    }
}

impl Mermaid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    fn write_node(
        &self,
        out: &mut String,
        tree: &LayoutTree,
        idx: NodeIndex,
        depth: usize,
    ) -> fmt::Result {
        let node = tree.node(idx);
        let indent = INDENT.repeat(depth);
        let id = sanitize_id(node.name());
        match node.kind() {
            NodeKind::Container => {
                writeln!(out, "{indent}subgraph {id}[{}]", node.name())?;
                for child in tree.children(idx) {
                    self.write_node(out, tree, child, depth + 1)?;
                }
                writeln!(out, "{indent}end")
            }
            NodeKind::Leaf => writeln!(out, "{indent}{id}[{}]", node.name()),
        }
    }

    fn write_chart(
        &self,
        out: &mut String,
        result: &LayoutResult,
        styles: &StyleSheet,
    ) -> fmt::Result {
        let tree = result.tree();
        writeln!(out, "flowchart {}", flowchart_direction(self.direction))?;

        for &root in tree.roots() {
            self.write_node(out, tree, root, 1)?;
        }

        for (position, edge) in result.edges().iter().enumerate() {
            let source = sanitize_id(tree.node(edge.source()).name());
            let target = sanitize_id(tree.node(edge.target()).name());
            let arrow = match styles.edge(position).line {
                LineStyle::Solid => "-->",
                LineStyle::Dashed | LineStyle::Dotted => "-.->",
            };
            match edge.label() {
                Some(label) => writeln!(out, "{INDENT}{source} {arrow}|{label}| {target}")?,
                None => writeln!(out, "{INDENT}{source} {arrow} {target}")?,
            }
        }

        Ok(())
    }
}

impl Exporter for Mermaid {
    fn export(&self, result: &LayoutResult, styles: &StyleSheet) -> Result<String, export::Error> {
        let mut out = String::new();
        self.write_chart(&mut out, result, styles)
            .map_err(|err| export::Error::Render(err.to_string()))?;
        Ok(out)
    }
}
