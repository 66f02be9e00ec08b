//! Layout engine factory module
//!
//! Engines are selected by [`LayoutEngine`] and configured from the layout
//! section of the application config through [`EngineBuilder`].

mod basic;
mod sugiyama;

use std::collections::HashMap;

use log::debug;

use arbor_core::{diagram::LayoutEngine, resource::ConnectionEdge};

use crate::{config::LayoutConfig, layout::Metrics, structure::LayoutTree};

/// Trait defining the interface for tree layout engines.
pub trait TreeEngine: Send + Sync {
    /// Assigns a size and a parent-relative position to every node of `tree`.
    ///
    /// `connections` may reference names that are not in the tree; engines
    /// ignore such endpoints. Layout is total and never fails.
    fn calculate(&self, tree: &mut LayoutTree, connections: &[ConnectionEdge]);
}

/// Builder for creating and caching configured layout engines.
pub struct EngineBuilder {
    engines: HashMap<LayoutEngine, Box<dyn TreeEngine>>,
    metrics: Metrics,
}

impl EngineBuilder {
    /// Create a new engine builder with the default layout constants
    pub fn new() -> Self {
        Self {
            engines: HashMap::new(),
            metrics: Metrics::default(),
        }
    }

    /// Create an engine builder configured from the layout section
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new().with_metrics(Metrics::from(config))
    }

    /// Replace the layout constants used by engines built afterwards
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self.engines.clear();
        self
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Get an engine of the specified type with configured options
    pub fn engine(&mut self, engine_type: LayoutEngine) -> &dyn TreeEngine {
        let metrics = self.metrics;
        let engine = self.engines.entry(engine_type).or_insert_with(|| {
            debug!(engine:% = engine_type; "Creating layout engine");
            let engine: Box<dyn TreeEngine> = match engine_type {
                LayoutEngine::Basic => Box::new(basic::Engine::new(metrics)),
                LayoutEngine::Sugiyama => Box::new(sugiyama::Engine::new(metrics)),
            };
            engine
        });
        &**engine
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
