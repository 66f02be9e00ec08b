//! Theme palettes and style resolution for rendering backends.
//!
//! Styles never affect layout. They are resolved after composition, in
//! three tiers where the most specific tier wins:
//!
//! 1. the theme [`Palette`],
//! 2. the container type override (nodes) or the named connection preset
//!    referenced by `style_ref` (edges),
//! 3. the resource's own style or the connection's own hints.
//!
//! Every color string is parsed through [`Color`], so a typo in a theme
//! override or user style surfaces as [`ArborError::Config`].

use log::warn;

use arbor_core::{
    color::Color,
    diagram::Theme,
    resource::{ArrowHead, ConnectionStyle, EdgeDirection, EdgeHints, LineStyle, NodeStyle},
};

use crate::{
    error::ArborError,
    pipeline::LayoutResult,
    structure::{LayoutNode, NodeKind},
};

// =============================================================================
// Theme palettes
// =============================================================================

/// Base colors and widths of a theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: &'static str,
    pub font: &'static str,
    pub node_fill: &'static str,
    pub node_stroke: &'static str,
    pub edge_color: &'static str,
    pub edge_width: f32,
    pub edge_font: &'static str,
    pub container_stroke_width: f32,
    /// Container fill shared by every type, when the theme sets one.
    pub container_fill: Option<&'static str>,
    pub container_stroke: Option<&'static str>,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Default => Self {
                background: "white",
                font: "#2D3436",
                node_fill: "#FFFFFF",
                node_stroke: "#B2BEC3",
                edge_color: "#7B8894",
                edge_width: 1.5,
                edge_font: "#636E72",
                container_stroke_width: 2.0,
                container_fill: None,
                container_stroke: None,
            },
            Theme::Light => Self {
                background: "#FAFAFA",
                ..Self::for_theme(Theme::Default)
            },
            Theme::Dark => Self {
                background: "#1E1E2E",
                font: "#CDD6F4",
                node_fill: "#313244",
                node_stroke: "#585B70",
                edge_color: "#89B4FA",
                edge_width: 1.5,
                edge_font: "#A6ADC8",
                container_stroke_width: 2.5,
                container_fill: Some("#1A1A3E"),
                container_stroke: None,
            },
            Theme::Presentation => Self {
                background: "#0A0E1A",
                font: "#FFFFFF",
                node_fill: "#1B2030",
                node_stroke: "#4FC3F7",
                edge_color: "#4FC3F7",
                edge_width: 2.0,
                edge_font: "#E0E0E0",
                container_stroke_width: 3.0,
                container_fill: Some("#0D1B2A80"),
                container_stroke: Some("#0078D4"),
            },
        }
    }

    fn container_base(&self) -> NodeStyle {
        NodeStyle {
            fill_color: self.container_fill.map(str::to_string),
            stroke_color: self.container_stroke.map(str::to_string),
            font_color: Some(self.font.to_string()),
            dashed: Some(false),
        }
    }

    fn leaf_base(&self) -> NodeStyle {
        NodeStyle {
            fill_color: Some(self.node_fill.to_string()),
            stroke_color: Some(self.node_stroke.to_string()),
            font_color: Some(self.font.to_string()),
            dashed: Some(false),
        }
    }

    fn edge_base(&self) -> EdgeHints {
        EdgeHints {
            line: Some(LineStyle::Solid),
            color: Some(self.edge_color.to_string()),
            width: Some(self.edge_width),
            arrowhead: Some(ArrowHead::Vee),
            direction: Some(EdgeDirection::Forward),
            style_ref: None,
        }
    }
}

/// (type, fill, stroke, dashed)
type ContainerOverride = (&'static str, &'static str, &'static str, bool);

const LIGHT_CONTAINERS: &[ContainerOverride] = &[
    ("resource-group", "#F5F5F580", "#666666", true),
    ("resource-groups", "#F5F5F580", "#666666", true),
    ("vnet", "#DAE8FC80", "#6C8EBF", false),
    ("virtual-network", "#DAE8FC80", "#6C8EBF", false),
    ("virtual-networks", "#DAE8FC80", "#6C8EBF", false),
    ("subnet", "#E1D5E780", "#9673A6", false),
    ("subnets", "#E1D5E780", "#9673A6", false),
    ("subscription", "#FFF2CC80", "#D6B656", false),
    ("subscriptions", "#FFF2CC80", "#D6B656", false),
    ("aws/vpc", "#FF990020", "#FF9900", false),
    ("aws/subnet", "#FF990010", "#CC7A00", true),
    ("aws/region", "#23282020", "#232F3E", true),
    ("gcp/vpc", "#4285F420", "#4285F4", false),
    ("gcp/subnet", "#4285F410", "#3367D6", true),
    ("namespace", "#326CE520", "#326CE5", false),
];

const LIGHT_CONTAINER_FALLBACK: ContainerOverride = ("", "#F5F5F580", "#666666", false);

const DARK_CONTAINERS: &[ContainerOverride] = &[
    ("resource-group", "#0D1B2A70", "#0078D4", true),
    ("resource-groups", "#0D1B2A70", "#0078D4", true),
    ("vnet", "#0A264760", "#00B4D8", false),
    ("virtual-network", "#0A264760", "#00B4D8", false),
    ("virtual-networks", "#0A264760", "#00B4D8", false),
    ("subnet", "#0D213760", "#5C6BC0", false),
    ("subnets", "#0D213760", "#5C6BC0", false),
    ("subscription", "#1A150060", "#FFB300", false),
    ("subscriptions", "#1A150060", "#FFB300", false),
];

const DARK_CONTAINER_FALLBACK: ContainerOverride = ("", "#0D1B2A70", "#0078D4", false);

/// Type tier for a container: full lowercased type, then the suffix after
/// the first `/`, then the family fallback.
pub fn container_override(theme: Theme, resource_type: &str) -> NodeStyle {
    let (table, fallback) = if theme.is_dark() {
        (DARK_CONTAINERS, DARK_CONTAINER_FALLBACK)
    } else {
        (LIGHT_CONTAINERS, LIGHT_CONTAINER_FALLBACK)
    };

    let key = resource_type.to_lowercase();
    let find = |k: &str| table.iter().find(|(t, ..)| *t == k).copied();
    let (_, fill, stroke, dashed) = find(&key)
        .or_else(|| key.split_once('/').and_then(|(_, suffix)| find(suffix)))
        .unwrap_or(fallback);

    NodeStyle {
        fill_color: Some(fill.to_string()),
        stroke_color: Some(stroke.to_string()),
        font_color: None,
        dashed: Some(dashed),
    }
}

// =============================================================================
// Resolved styles
// =============================================================================

/// Final style of a node shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
    pub font_color: Color,
    pub dashed: bool,
}

/// Final style of a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStyle {
    pub line: LineStyle,
    pub color: Color,
    pub width: f32,
    pub arrowhead: ArrowHead,
    pub direction: EdgeDirection,
    pub font_color: Color,
}

/// Styles of every node and edge of one [`LayoutResult`].
///
/// `nodes` is indexed by [`NodeIndex::index`](crate::structure::NodeIndex::index)
/// and `edges` follows the order of [`LayoutResult::edges`].
#[derive(Debug, Clone)]
pub struct StyleSheet {
    theme: Theme,
    background: Color,
    font_color: Color,
    nodes: Vec<ShapeStyle>,
    edges: Vec<EdgeStyle>,
}

impl StyleSheet {
    /// Resolves the three style tiers for every node and edge.
    ///
    /// `background` replaces the theme background when set. An edge whose
    /// `style_ref` names no preset is drawn with its own hints over the
    /// theme base.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::Config`] for the first color string that does
    /// not parse.
    pub fn resolve(
        result: &LayoutResult,
        theme: Theme,
        background: Option<Color>,
        presets: &[ConnectionStyle],
    ) -> Result<Self, ArborError> {
        let palette = Palette::for_theme(theme);
        let background = match background {
            Some(color) => color,
            None => parse_color(palette.background, "theme background")?,
        };
        let font_color = parse_color(palette.font, "theme font")?;

        let nodes = result
            .tree()
            .iter()
            .map(|(_, node)| node_style(&palette, theme, node))
            .collect::<Result<Vec<_>, _>>()?;

        let edge_font = parse_color(palette.edge_font, "theme edge font")?;
        let edges = result
            .edges()
            .iter()
            .map(|edge| {
                let mut hints = palette.edge_base();
                if let Some(name) = edge.hints().style_ref.as_deref() {
                    match presets.iter().find(|preset| preset.name == name) {
                        Some(preset) => hints = hints.overlay(&preset.hints),
                        None => warn!(style_ref = name; "Unknown connection style, ignoring"),
                    }
                }
                edge_style(&hints.overlay(edge.hints()), &edge_font)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            theme,
            background,
            font_color,
            nodes,
            edges,
        })
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Color of diagram-level text.
    pub fn font_color(&self) -> Color {
        self.font_color
    }

    pub fn node(&self, idx: crate::structure::NodeIndex) -> &ShapeStyle {
        &self.nodes[idx.index()]
    }

    pub fn edge(&self, position: usize) -> &EdgeStyle {
        &self.edges[position]
    }

    pub fn edges(&self) -> &[EdgeStyle] {
        &self.edges
    }
}

fn node_style(palette: &Palette, theme: Theme, node: &LayoutNode) -> Result<ShapeStyle, ArborError> {
    let (base, stroke_width) = match node.kind() {
        NodeKind::Container => (
            palette
                .container_base()
                .overlay(&container_override(theme, node.resource_type())),
            palette.container_stroke_width,
        ),
        NodeKind::Leaf => (palette.leaf_base(), 1.0),
    };
    let merged = match node.style() {
        Some(user) => base.overlay(user),
        None => base,
    };

    let field = |value: &Option<String>, what: &str| -> Result<Color, ArborError> {
        let value = value.as_deref().unwrap_or("transparent");
        parse_color(value, &format!("{what} of '{}'", node.name()))
    };

    Ok(ShapeStyle {
        fill: field(&merged.fill_color, "fill color")?,
        stroke: field(&merged.stroke_color, "stroke color")?,
        stroke_width,
        font_color: field(&merged.font_color, "font color")?,
        dashed: merged.dashed.unwrap_or(false),
    })
}

fn edge_style(hints: &EdgeHints, font_color: &Color) -> Result<EdgeStyle, ArborError> {
    let color = match hints.color.as_deref() {
        Some(color) => parse_color(color, "connection color")?,
        None => Color::default(),
    };
    Ok(EdgeStyle {
        line: hints.line.unwrap_or_default(),
        color,
        width: hints.width.unwrap_or(1.0),
        arrowhead: hints.arrowhead.unwrap_or_default(),
        direction: hints.direction.unwrap_or_default(),
        font_color: *font_color,
    })
}

fn parse_color(value: &str, what: &str) -> Result<Color, ArborError> {
    Color::new(value).map_err(|err| ArborError::Config(format!("Invalid {what}: {err}")))
}
