//! Resource tree and connection types.
//!
//! These are the input types of the layout core. They are produced by an
//! input collaborator (the CLI deserializes them from TOML) and are never
//! mutated during layout.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single resource, optionally containing child resources.
///
/// # Examples
///
/// ```
/// use arbor_core::resource::ResourceNode;
///
/// let rg = ResourceNode::new("azure/resource-group", "rg")
///     .with_children(vec![ResourceNode::new("azure/vm", "vm1")]);
///
/// assert_eq!(rg.children().len(), 1);
/// assert_eq!(rg.children()[0].name(), "vm1");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ResourceNode {
    #[serde(rename = "type")]
    resource_type: String,

    name: String,

    #[serde(default)]
    children: Vec<ResourceNode>,

    #[serde(default)]
    metadata: BTreeMap<String, String>,

    #[serde(default)]
    style: Option<NodeStyle>,
}

impl ResourceNode {
    /// Creates a resource with no children, metadata or style.
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
            children: Vec::new(),
            metadata: BTreeMap::new(),
            style: None,
        }
    }

    pub fn with_children(mut self, children: Vec<ResourceNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Returns the namespaced type identifier, e.g. `"azure/vnet"`.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Returns the globally unique resource name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[ResourceNode] {
        &self.children
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub fn style(&self) -> Option<&NodeStyle> {
        self.style.as_ref()
    }
}

/// Per-node visual overrides. This is the most specific style tier.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NodeStyle {
    /// Fill color (CSS color string).
    #[serde(default)]
    pub fill_color: Option<String>,

    /// Border color (CSS color string).
    #[serde(default)]
    pub stroke_color: Option<String>,

    /// Label color (CSS color string).
    #[serde(default)]
    pub font_color: Option<String>,

    /// Draw the border dashed.
    #[serde(default)]
    pub dashed: Option<bool>,
}

impl NodeStyle {
    /// Layers `other` on top of `self`: every field set in `other` wins.
    pub fn overlay(&self, other: &NodeStyle) -> NodeStyle {
        NodeStyle {
            fill_color: other.fill_color.clone().or_else(|| self.fill_color.clone()),
            stroke_color: other
                .stroke_color
                .clone()
                .or_else(|| self.stroke_color.clone()),
            font_color: other.font_color.clone().or_else(|| self.font_color.clone()),
            dashed: other.dashed.or(self.dashed),
        }
    }
}

/// Line pattern of a connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Arrow head drawn at an arrow end of a connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowHead {
    #[default]
    Vee,
    Normal,
    Diamond,
    Dot,
    None,
}

/// Which ends of a connection carry an arrow head.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDirection {
    #[default]
    Forward,
    Back,
    Both,
    None,
}

/// Style hints attached to a connection.
///
/// Layout never reads these; they are passed through to the rendering
/// backend. Every field is optional so hints can be layered: theme defaults,
/// then a named preset, then the connection's own hints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EdgeHints {
    #[serde(default)]
    pub line: Option<LineStyle>,

    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub width: Option<f32>,

    #[serde(default)]
    pub arrowhead: Option<ArrowHead>,

    #[serde(default)]
    pub direction: Option<EdgeDirection>,

    /// Name of a connection style preset to apply underneath these hints.
    #[serde(default)]
    pub style_ref: Option<String>,
}

impl EdgeHints {
    /// Layers `other` on top of `self`: every field set in `other` wins.
    pub fn overlay(&self, other: &EdgeHints) -> EdgeHints {
        EdgeHints {
            line: other.line.or(self.line),
            color: other.color.clone().or_else(|| self.color.clone()),
            width: other.width.or(self.width),
            arrowhead: other.arrowhead.or(self.arrowhead),
            direction: other.direction.or(self.direction),
            style_ref: other.style_ref.clone().or_else(|| self.style_ref.clone()),
        }
    }
}

/// A directed connection between two named resources.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConnectionEdge {
    #[serde(rename = "from")]
    source: String,

    #[serde(rename = "to")]
    target: String,

    #[serde(default)]
    label: Option<String>,

    #[serde(flatten)]
    hints: EdgeHints,
}

impl ConnectionEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: None,
            hints: EdgeHints::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_hints(mut self, hints: EdgeHints) -> Self {
        self.hints = hints;
        self
    }

    /// Returns the name of the source resource.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the name of the target resource.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn hints(&self) -> &EdgeHints {
        &self.hints
    }
}

/// A named, reusable set of connection hints referenced by `style_ref`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConnectionStyle {
    pub name: String,

    #[serde(flatten)]
    pub hints: EdgeHints,
}
