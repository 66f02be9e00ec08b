//! Arbor - Layout and composition of nested cloud architecture diagrams.
//!
//! Arbor takes a tree of typed resources, some of which are containers that
//! visually enclose their children, plus the connections between them, and
//! computes a consistent geometry: every container is sized to enclose its
//! children, children are positioned inside their parents and siblings never
//! overlap. The positioned result is handed to a rendering backend (SVG,
//! Mermaid or PlantUML text).
//!
//! [`diff`] compares two documents structurally, without composing them.
//!
//! The pipeline runs in one direction:
//!
//! 1. [`validate`] rejects duplicate resource names.
//! 2. [`structure`] classifies each resource and builds the node arena.
//! 3. [`layout`] sizes and positions the arena with the selected engine.
//! 4. [`connect`] resolves connection endpoints against the name index.
//! 5. [`export`] renders the result with the resolved [`style`] sheet.

pub mod classify;
pub mod config;
pub mod connect;
pub mod diff;
pub mod error;
pub mod export;
pub mod icons;
pub mod layout;
pub mod lint;
pub mod pipeline;
pub mod structure;
pub mod style;
pub mod validate;

pub use arbor_core::{color, diagram, geometry, resource};

pub use error::{ArborError, EndpointField};
pub use pipeline::{CompositionPipeline, LayoutResult};

use log::{debug, info};

use arbor_core::diagram::Architecture;

use classify::TypeClassifier;
use config::AppConfig;
use export::Exporter;
use icons::{IconRegistry, IconResolver, NoIcons};
use lint::LintWarning;
use style::StyleSheet;

/// Builder for composing and rendering Arbor diagrams.
///
/// This provides an API for running an [`Architecture`] document through
/// composition, styling and rendering with one configuration.
///
/// # Examples
///
/// ```rust
/// use arbor::{
///     DiagramBuilder,
///     config::AppConfig,
///     diagram::Architecture,
///     resource::{ConnectionEdge, ResourceNode},
/// };
///
/// let architecture = Architecture::new(
///     vec![
///         ResourceNode::new("azure/resource-group", "rg")
///             .with_children(vec![ResourceNode::new("azure/vm", "vm1")]),
///         ResourceNode::new("azure/sql-database", "db"),
///     ],
///     vec![ConnectionEdge::new("vm1", "db")],
/// );
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let result = builder.compose(&architecture).expect("Failed to compose");
/// assert!(result.node("rg").is_some());
///
/// let mermaid = builder.render_mermaid(&architecture).expect("Failed to render");
/// assert!(mermaid.starts_with("flowchart TD"));
/// ```
pub struct DiagramBuilder {
    config: AppConfig,
    classifier: TypeClassifier,
    icons: Box<dyn IconResolver>,
}

impl Default for DiagramBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// No icons are resolved until a resolver is attached with
    /// [`with_icons`](Self::with_icons). Use
    /// [`from_config`](Self::from_config) to load the icon directories named
    /// in the configuration.
    pub fn new(config: AppConfig) -> Self {
        let classifier = TypeClassifier::with_extra_types(config.layout().container_types());
        Self {
            config,
            classifier,
            icons: Box::new(NoIcons),
        }
    }

    /// Create a diagram builder and scan the configured icon directories.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::Io`] if an icon directory cannot be read.
    pub fn from_config(config: AppConfig) -> Result<Self, ArborError> {
        let registry = IconRegistry::from_config(config.icons())?;
        debug!(namespaces:? = registry.namespaces().collect::<Vec<_>>(); "Icon registry loaded");
        Ok(Self::new(config).with_icons(registry))
    }

    /// Replace the icon resolver used while building nodes.
    pub fn with_icons(mut self, icons: impl IconResolver + 'static) -> Self {
        self.icons = Box::new(icons);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn classifier(&self) -> &TypeClassifier {
        &self.classifier
    }

    /// Compose an architecture into a positioned [`LayoutResult`].
    ///
    /// The diagram's own layout engine takes precedence over the configured
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::DuplicateResourceName`],
    /// [`ArborError::IconNotFound`] (strict icon mode only) or
    /// [`ArborError::ConnectionTargetNotFound`].
    pub fn compose(&self, architecture: &Architecture) -> Result<LayoutResult, ArborError> {
        let engine = architecture
            .diagram
            .layout_engine
            .unwrap_or_else(|| self.config.layout().engine());
        info!(
            diagram = architecture.diagram.name.as_str(),
            engine:%,
            resources = architecture.resources.len(),
            connections = architecture.connections.len();
            "Composing diagram"
        );

        CompositionPipeline::new(self.config.layout(), &self.classifier, &*self.icons)
            .with_engine(engine)
            .with_strict_icons(self.config.icons().strict())
            .compose(&architecture.resources, &architecture.connections)
    }

    /// Resolve the style sheet for a composed architecture.
    ///
    /// The diagram's own theme takes precedence over the configured one.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::Config`] if any configured or user color is
    /// invalid.
    pub fn styles(
        &self,
        architecture: &Architecture,
        result: &LayoutResult,
    ) -> Result<StyleSheet, ArborError> {
        let theme = architecture
            .diagram
            .theme
            .unwrap_or_else(|| self.config.style().theme());
        let background = self
            .config
            .style()
            .background_color()
            .map_err(ArborError::Config)?;
        debug!(theme:?; "Resolving styles");
        StyleSheet::resolve(result, theme, background, &architecture.connection_styles)
    }

    /// Compose and render an architecture to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns any composition or style error, or [`ArborError::Export`]
    /// if rendering fails.
    pub fn render_svg(&self, architecture: &Architecture) -> Result<String, ArborError> {
        let exporter = export::svg::Svg::new().with_title(architecture.diagram.name.as_str());
        self.render(architecture, &exporter)
    }

    /// Compose and render an architecture to Mermaid flowchart text.
    ///
    /// # Errors
    ///
    /// Returns any composition or style error, or [`ArborError::Export`]
    /// if rendering fails.
    pub fn render_mermaid(&self, architecture: &Architecture) -> Result<String, ArborError> {
        let exporter = export::mermaid::Mermaid::new().with_direction(architecture.diagram.direction);
        self.render(architecture, &exporter)
    }

    /// Compose and render an architecture to a PlantUML component diagram.
    ///
    /// # Errors
    ///
    /// Returns any composition or style error, or [`ArborError::Export`]
    /// if rendering fails.
    pub fn render_plantuml(&self, architecture: &Architecture) -> Result<String, ArborError> {
        let exporter =
            export::plantuml::PlantUml::new().with_direction(architecture.diagram.direction);
        self.render(architecture, &exporter)
    }

    /// Run the lint rules from the configuration over an architecture.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::Config`] if the naming pattern is invalid.
    pub fn lint(&self, architecture: &Architecture) -> Result<Vec<LintWarning>, ArborError> {
        let warnings = lint::lint(architecture, self.config.lint(), &self.classifier)?;
        debug!(warnings = warnings.len(); "Lint complete");
        Ok(warnings)
    }

    fn render(
        &self,
        architecture: &Architecture,
        exporter: &dyn Exporter,
    ) -> Result<String, ArborError> {
        let result = self.compose(architecture)?;
        let styles = self.styles(architecture, &result)?;
        let output = exporter.export(&result, &styles)?;
        info!(bytes = output.len(); "Diagram rendered");
        Ok(output)
    }
}
