//! Configuration types for Arbor diagram composition.
//!
//! This module provides configuration structures that control how
//! architecture diagrams are classified, laid out, styled and linted. All
//! types implement [`serde::Deserialize`] for loading from external sources,
//! and every section falls back to its defaults when omitted.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`LayoutConfig`] - Engine selection and the fixed layout constants.
//! - [`StyleConfig`] - Default theme and background.
//! - [`IconConfig`] - Icon directories and strict mode.
//! - [`LintConfig`] - Lint rule settings.
//!
//! # Example
//!
//! ```
//! # use arbor::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().min_container_width(), 200.0);
//! assert!(!config.icons().strict());
//! ```

use std::path::PathBuf;

use serde::Deserialize;

use arbor_core::{
    color::Color,
    diagram::{LayoutEngine, Theme},
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    icons: IconConfig,

    #[serde(default)]
    lint: LintConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        layout: LayoutConfig,
        style: StyleConfig,
        icons: IconConfig,
        lint: LintConfig,
    ) -> Self {
        Self {
            layout,
            style,
            icons,
            lint,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn icons(&self) -> &IconConfig {
        &self.icons
    }

    pub fn lint(&self) -> &LintConfig {
        &self.lint
    }

    /// Returns a copy with strict icon resolution switched on or off.
    pub fn with_strict_icons(mut self, strict: bool) -> Self {
        self.icons.strict = strict;
        self
    }
}

/// Layout engine selection and fixed layout constants.
///
/// All values are in backend units. None of them is derived from content:
/// leaves always have the node size, and containers are sized from their
/// children plus the padding and header constants, never below the minimum
/// container size.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    engine: LayoutEngine,
    node_width: f32,
    node_height: f32,
    label_height: f32,
    child_spacing: f32,
    padding: f32,
    header_height: f32,
    min_container_width: f32,
    min_container_height: f32,
    margin_x: f32,
    margin_y: f32,
    layer_spacing: f32,
    container_types: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            engine: LayoutEngine::default(),
            node_width: 64.0,
            node_height: 64.0,
            label_height: 20.0,
            child_spacing: 40.0,
            padding: 20.0,
            header_height: 30.0,
            min_container_width: 200.0,
            min_container_height: 100.0,
            margin_x: 50.0,
            margin_y: 50.0,
            layer_spacing: 60.0,
            container_types: Vec::new(),
        }
    }
}

impl LayoutConfig {
    /// Returns the configured [`LayoutEngine`].
    pub fn engine(&self) -> LayoutEngine {
        self.engine
    }

    pub fn with_engine(mut self, engine: LayoutEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Width of every leaf node.
    pub fn node_width(&self) -> f32 {
        self.node_width
    }

    /// Height of every leaf node, excluding its label.
    pub fn node_height(&self) -> f32 {
        self.node_height
    }

    /// Vertical room a parent reserves below a leaf for its label.
    pub fn label_height(&self) -> f32 {
        self.label_height
    }

    /// Horizontal gap between siblings.
    pub fn child_spacing(&self) -> f32 {
        self.child_spacing
    }

    /// Interior margin of a container around its children.
    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Band reserved at the top of a container for its own label.
    pub fn header_height(&self) -> f32 {
        self.header_height
    }

    pub fn min_container_width(&self) -> f32 {
        self.min_container_width
    }

    pub fn min_container_height(&self) -> f32 {
        self.min_container_height
    }

    /// Left margin of the first top-level resource.
    pub fn margin_x(&self) -> f32 {
        self.margin_x
    }

    /// Top margin shared by every top-level resource.
    pub fn margin_y(&self) -> f32 {
        self.margin_y
    }

    /// Vertical gap between layers (layered engine only).
    pub fn layer_spacing(&self) -> f32 {
        self.layer_spacing
    }

    /// Extra container type identifiers on top of the built-in registry.
    pub fn container_types(&self) -> &[String] {
        &self.container_types
    }

    pub fn with_container_types(mut self, container_types: Vec<String>) -> Self {
        self.container_types = container_types;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_child_spacing(mut self, spacing: f32) -> Self {
        self.child_spacing = spacing;
        self
    }

    pub fn with_node_size(mut self, width: f32, height: f32) -> Self {
        self.node_width = width;
        self.node_height = height;
        self
    }

    pub fn with_min_container_size(mut self, width: f32, height: f32) -> Self {
        self.min_container_width = width;
        self.min_container_height = height;
        self
    }
}

/// Visual styling configuration for rendered diagrams.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Theme used when the diagram does not name one.
    #[serde(default)]
    theme: Theme,

    /// Background color overriding the theme's, as a color string.
    #[serde(default)]
    background_color: Option<String>,
}

impl StyleConfig {
    pub fn new(theme: Theme, background_color: Option<String>) -> Self {
        Self {
            theme,
            background_color,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }
}

/// A directory of SVG icons serving one type namespace (e.g. `azure`).
#[derive(Debug, Clone, Deserialize)]
pub struct IconDirectory {
    pub namespace: String,
    pub path: PathBuf,
}

/// Icon resolution settings.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct IconConfig {
    /// Fail composition when a leaf type has no icon.
    #[serde(default)]
    strict: bool,

    #[serde(default)]
    directories: Vec<IconDirectory>,
}

impl IconConfig {
    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn directories(&self) -> &[IconDirectory] {
        &self.directories
    }
}

/// Lint rule settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    max_nesting_depth: usize,
    naming_pattern: String,
    orphan_resources: bool,
    duplicate_connections: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: 5,
            naming_pattern: r"^[a-z0-9][a-z0-9-]*$".to_string(),
            orphan_resources: true,
            duplicate_connections: true,
        }
    }
}

impl LintConfig {
    /// Depth (0 for top level) at which a resource is reported as too deep.
    pub fn max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }

    pub fn naming_pattern(&self) -> &str {
        &self.naming_pattern
    }

    pub fn orphan_resources(&self) -> bool {
        self.orphan_resources
    }

    pub fn duplicate_connections(&self) -> bool {
        self.duplicate_connections
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn with_naming_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.naming_pattern = pattern.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_defaults() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.engine(), LayoutEngine::Basic);
        assert_eq!(layout.node_width(), 64.0);
        assert_eq!(layout.min_container_width(), 200.0);
        assert_eq!(layout.min_container_height(), 100.0);
        assert!(layout.container_types().is_empty());
    }

    #[test]
    fn test_partial_layout_section_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [layout]
            engine = "sugiyama"
            padding = 32.0
            container_types = ["azure/landing-zone"]
            "#,
        )
        .expect("valid config");

        assert_eq!(config.layout().engine(), LayoutEngine::Sugiyama);
        assert_eq!(config.layout().padding(), 32.0);
        assert_eq!(config.layout().header_height(), 30.0);
        assert_eq!(config.layout().container_types(), ["azure/landing-zone"]);
    }

    #[test]
    fn test_style_background_color() {
        let style = StyleConfig::new(Theme::Dark, Some("#1E1E2E".to_string()));
        assert!(style.background_color().unwrap().is_some());

        let style = StyleConfig::new(Theme::Dark, Some("nope".to_string()));
        assert!(style.background_color().is_err());

        assert!(StyleConfig::default().background_color().unwrap().is_none());
    }

    #[test]
    fn test_icons_and_lint_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [icons]
            strict = true

            [[icons.directories]]
            namespace = "azure"
            path = "/opt/icons/azure"

            [lint]
            max_nesting_depth = 3
            "#,
        )
        .expect("valid config");

        assert!(config.icons().strict());
        assert_eq!(config.icons().directories()[0].namespace, "azure");
        assert_eq!(config.lint().max_nesting_depth(), 3);
        assert!(config.lint().orphan_resources());
    }
}
