//! SVG rendering backend.

mod arrows;

use log::debug;
use svg::{
    Document,
    node::element::{Group, Image, Rectangle, Text},
};

use arbor_core::{
    color::Color,
    geometry::{Bounds, Point},
};

use crate::{
    export::{self, Exporter},
    pipeline::LayoutResult,
    structure::{LayoutNode, NodeIndex, NodeKind},
    style::{ShapeStyle, StyleSheet},
};

const FONT_FAMILY: &str = "Sans-Serif";
const CORNER_RADIUS: f32 = 8.0;

/// Renders a [`LayoutResult`] as a standalone SVG document.
///
/// Containers are drawn as rounded rectangles with their name in the header
/// band. Leaves are drawn as their icon image, or as a placeholder rectangle
/// when no icon was resolved, with the name centered below. Connections are
/// straight lines between node centers.
#[derive(Debug, Clone)]
pub struct Svg {
    title: Option<String>,
    margin: f32,
}

impl Default for Svg {
    fn default() -> Self {
        Self {
            title: None,
            margin: 50.0,
        }
    }
}

impl Svg {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `title` in the top margin.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Space kept around the content on the right and bottom edges.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    fn render(&self, result: &LayoutResult, styles: &StyleSheet) -> Result<Document, export::Error> {
        let tree = result.tree();
        let content = tree
            .iter()
            .map(|(idx, _)| tree.absolute_bounds(idx))
            .reduce(|acc, bounds| acc.merge(&bounds))
            .unwrap_or_default();
        let width = content.max_x() + self.margin;
        let height = content.max_y() + self.margin;
        debug!(width, height; "SVG canvas size");

        let background = styles.background();
        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height)
            .add(
                Rectangle::new()
                    .set("width", "100%")
                    .set("height", "100%")
                    .set("fill", background.to_string())
                    .set("fill-opacity", background.alpha()),
            );

        doc = doc.add(arrows::create_marker_definitions(styles.edges()));

        if let Some(title) = &self.title {
            doc = doc.add(
                Text::new(title.as_str())
                    .set("x", width / 2.0)
                    .set("y", self.margin / 2.0)
                    .set("text-anchor", "middle")
                    .set("dominant-baseline", "middle")
                    .set("font-family", FONT_FAMILY)
                    .set("font-size", 16)
                    .set("fill", styles.font_color().to_string()),
            );
        }

        // Pre-order draws every container before anything nested in it.
        let mut nodes = Group::new().set("class", "nodes");
        for (idx, node) in tree.iter() {
            let bounds = tree.absolute_bounds(idx);
            let style = styles.node(idx);
            nodes = match node.kind() {
                NodeKind::Container => nodes.add(self.render_container(node, bounds, style)),
                NodeKind::Leaf => nodes.add(self.render_leaf(idx, node, bounds, style)?),
            };
        }
        doc = doc.add(nodes);

        let mut edges = Group::new().set("class", "edges");
        for (position, edge) in result.edges().iter().enumerate() {
            let style = styles.edge(position);
            let start = tree.absolute_bounds(edge.source()).center();
            let end = tree.absolute_bounds(edge.target()).center();

            let mut group = Group::new().add(arrows::create_path(start, end, style));
            if let Some(label) = edge.label() {
                group = group.add(self.render_label(
                    label,
                    start.midpoint(end),
                    11,
                    style.font_color,
                ));
            }
            edges = edges.add(group);
        }
        doc = doc.add(edges);

        Ok(doc)
    }

    fn render_container(&self, node: &LayoutNode, bounds: Bounds, style: &ShapeStyle) -> Group {
        let mut frame = shape_rectangle(bounds, style).set("rx", CORNER_RADIUS);
        if style.dashed {
            frame = frame.set("stroke-dasharray", "6 4");
        }

        let header = Text::new(node.name())
            .set("x", bounds.min_x() + 10.0)
            .set("y", bounds.min_y() + 20.0)
            .set("font-family", FONT_FAMILY)
            .set("font-size", 13)
            .set("font-weight", "bold")
            .set("fill", style.font_color.to_string());

        Group::new()
            .set("data-name", node.name())
            .set("data-type", node.resource_type())
            .add(frame)
            .add(header)
    }

    fn render_leaf(
        &self,
        idx: NodeIndex,
        node: &LayoutNode,
        bounds: Bounds,
        style: &ShapeStyle,
    ) -> Result<Group, export::Error> {
        let mut group = Group::new()
            .set("data-name", node.name())
            .set("data-type", node.resource_type());

        group = match node.icon() {
            Some(icon) => {
                let href = icon.to_str().ok_or_else(|| {
                    export::Error::Render(format!(
                        "Icon path of node {idx} is not valid UTF-8: {}",
                        icon.display()
                    ))
                })?;
                group.add(
                    Image::new()
                        .set("href", href)
                        .set("x", bounds.min_x())
                        .set("y", bounds.min_y())
                        .set("width", bounds.width())
                        .set("height", bounds.height()),
                )
            }
            None => {
                let mut placeholder = shape_rectangle(bounds, style).set("rx", 4.0);
                if style.dashed {
                    placeholder = placeholder.set("stroke-dasharray", "6 4");
                }
                group.add(placeholder)
            }
        };

        let label_anchor = Point::new(bounds.center().x(), bounds.max_y() + 12.0);
        Ok(group.add(self.render_label(node.name(), label_anchor, 12, style.font_color)))
    }

    fn render_label(&self, content: &str, anchor: Point, font_size: u32, color: Color) -> Text {
        Text::new(content)
            .set("x", anchor.x())
            .set("y", anchor.y())
            .set("text-anchor", "middle")
            .set("dominant-baseline", "middle")
            .set("font-family", FONT_FAMILY)
            .set("font-size", font_size)
            .set("fill", color.to_string())
    }
}

fn shape_rectangle(bounds: Bounds, style: &ShapeStyle) -> Rectangle {
    let min = bounds.min_point();
    Rectangle::new()
        .set("x", min.x())
        .set("y", min.y())
        .set("width", bounds.width())
        .set("height", bounds.height())
        .set("fill", style.fill.to_string())
        .set("fill-opacity", style.fill.alpha())
        .set("stroke", style.stroke.to_string())
        .set("stroke-width", style.stroke_width)
}

impl Exporter for Svg {
    fn export(&self, result: &LayoutResult, styles: &StyleSheet) -> Result<String, export::Error> {
        let doc = self.render(result, styles)?;
        debug!("SVG document rendered");
        Ok(doc.to_string())
    }
}
