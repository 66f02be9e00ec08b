//! PlantUML component diagram text backend.
//!
//! Containers become `package` blocks and leaves become `component`
//! declarations. Like Mermaid, PlantUML places everything itself, so only the
//! structure, the edges and a flow direction are written.

use std::fmt::{self, Write as _};

use arbor_core::{diagram::Direction, resource::LineStyle};

use crate::{
    export::{self, Exporter, mermaid::sanitize_id},
    pipeline::LayoutResult,
    structure::{LayoutTree, NodeIndex, NodeKind},
    style::StyleSheet,
};

const INDENT: &str = "  ";

/// Renders a [`LayoutResult`] as a PlantUML `@startuml` document.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlantUml {
    direction: Direction,
}

/// PlantUML only knows the two axes, not which end the flow starts from.
fn direction_statement(direction: Direction) -> &'static str {
    match direction {
        Direction::Tb | Direction::Bt => "top to bottom direction",
        Direction::Lr | Direction::Rl => "left to right direction",
    }
}

impl PlantUml {
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
        match node.kind() {
            NodeKind::Container => {
                writeln!(out, "{indent}package \"{}\" {{", node.name())?;
                for child in tree.children(idx) {
                    self.write_node(out, tree, child, depth + 1)?;
                }
                writeln!(out, "{indent}}}")
            }
            NodeKind::Leaf => writeln!(
                out,
                "{indent}component \"{}\" as {}",
                node.name(),
                sanitize_id(node.name())
            ),
        }
    }

    fn write_document(
        &self,
        out: &mut String,
        result: &LayoutResult,
        styles: &StyleSheet,
    ) -> fmt::Result {
        let tree = result.tree();
        writeln!(out, "@startuml")?;
        writeln!(out, "{}", direction_statement(self.direction))?;
        writeln!(out)?;

        for &root in tree.roots() {
            self.write_node(out, tree, root, 0)?;
        }
        writeln!(out)?;

        for (position, edge) in result.edges().iter().enumerate() {
            let source = sanitize_id(tree.node(edge.source()).name());
            let target = sanitize_id(tree.node(edge.target()).name());
            let arrow = match styles.edge(position).line {
                LineStyle::Solid => "-->",
                LineStyle::Dashed | LineStyle::Dotted => "..>",
            };
            match edge.label() {
                Some(label) => writeln!(out, "{source} {arrow} {target} : {label}")?,
                None => writeln!(out, "{source} {arrow} {target}")?,
            }
        }
        writeln!(out)?;

        writeln!(out, "@enduml")
    }
}

impl Exporter for PlantUml {
    fn export(&self, result: &LayoutResult, styles: &StyleSheet) -> Result<String, export::Error> {
        let mut out = String::new();
        self.write_document(&mut out, result, styles)
            .map_err(|err| export::Error::Render(err.to_string()))?;
        Ok(out)
    }
}
