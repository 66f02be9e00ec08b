//! Top-level architecture document types.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::resource::{ConnectionEdge, ConnectionStyle, ResourceNode};

/// Available layout engines controlling automatic positioning.
///
/// The names match external configuration strings (snake_case).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutEngine {
    /// Direct geometric layout: children in a single row inside each container (default)
    #[default]
    Basic,
    /// Layered layout of connected children inside each container
    Sugiyama,
}

impl FromStr for LayoutEngine {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "sugiyama" => Ok(Self::Sugiyama),
            _ => Err("Unsupported layout engine"),
        }
    }
}

impl From<LayoutEngine> for &'static str {
    fn from(val: LayoutEngine) -> Self {
        match val {
            LayoutEngine::Basic => "basic",
            LayoutEngine::Sugiyama => "sugiyama",
        }
    }
}

impl Display for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Visual theme presets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Default,
    Light,
    Dark,
    Presentation,
}

impl Theme {
    /// Returns true for themes drawn on a dark background.
    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark | Self::Presentation)
    }
}

impl FromStr for Theme {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "presentation" => Ok(Self::Presentation),
            _ => Err("Unknown theme"),
        }
    }
}

/// Flow direction of the diagram, as understood by the text backends.
///
/// Accepted case-insensitively on input and written upper-case.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Top to bottom (default)
    #[default]
    Tb,
    /// Left to right
    Lr,
    /// Bottom to top
    Bt,
    /// Right to left
    Rl,
}

impl FromStr for Direction {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TB" => Ok(Self::Tb),
            "LR" => Ok(Self::Lr),
            "BT" => Ok(Self::Bt),
            "RL" => Ok(Self::Rl),
            _ => Err("Unsupported direction, expected one of TB, LR, BT, RL"),
        }
    }
}

impl From<Direction> for &'static str {
    fn from(val: Direction) -> Self {
        match val {
            Direction::Tb => "TB",
            Direction::Lr => "LR",
            Direction::Bt => "BT",
            Direction::Rl => "RL",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}

/// Metadata about the diagram.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DiagramMeta {
    #[serde(default = "DiagramMeta::default_name")]
    pub name: String,

    /// Theme override; falls back to the configured default theme.
    #[serde(default)]
    pub theme: Option<Theme>,

    /// Layout engine override; falls back to the configured engine.
    #[serde(default)]
    pub layout_engine: Option<LayoutEngine>,

    #[serde(default)]
    pub direction: Direction,
}

impl DiagramMeta {
    fn default_name() -> String {
        "Architecture".to_string()
    }
}

impl Default for DiagramMeta {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            theme: None,
            layout_engine: None,
            direction: Direction::default(),
        }
    }
}

/// Root document describing an entire architecture diagram.
///
/// # Examples
///
/// ```
/// use arbor_core::{diagram::Architecture, resource::{ConnectionEdge, ResourceNode}};
///
/// let architecture = Architecture::new(
///     vec![ResourceNode::new("azure/vm", "vm1"), ResourceNode::new("azure/vm", "vm2")],
///     vec![ConnectionEdge::new("vm1", "vm2")],
/// );
/// assert_eq!(architecture.resources.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Architecture {
    #[serde(default)]
    pub diagram: DiagramMeta,

    #[serde(default)]
    pub resources: Vec<ResourceNode>,

    #[serde(default)]
    pub connections: Vec<ConnectionEdge>,

    #[serde(default)]
    pub connection_styles: Vec<ConnectionStyle>,
}

impl Architecture {
    pub fn new(resources: Vec<ResourceNode>, connections: Vec<ConnectionEdge>) -> Self {
        Self {
            diagram: DiagramMeta::default(),
            resources,
            connections,
            connection_styles: Vec::new(),
        }
    }

    /// Looks up a connection style preset by name.
    pub fn connection_style(&self, name: &str) -> Option<&ConnectionStyle> {
        self.connection_styles.iter().find(|style| style.name == name)
    }
}
