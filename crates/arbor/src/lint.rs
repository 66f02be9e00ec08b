//! Non-fatal lint rules over an architecture document.
//!
//! Lint findings never stop composition; callers decide whether to print
//! them, fail on them or ignore them.

use std::{collections::HashSet, fmt};

use regex::Regex;

use arbor_core::{diagram::Architecture, resource::ResourceNode};

use crate::{classify::TypeClassifier, config::LintConfig, error::ArborError};

/// The rule that produced a [`LintWarning`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LintRule {
    MaxNestingDepth,
    NamingPattern,
    OrphanResources,
    DuplicateConnections,
}

impl From<LintRule> for &'static str {
    fn from(rule: LintRule) -> Self {
        match rule {
            LintRule::MaxNestingDepth => "max_nesting_depth",
            LintRule::NamingPattern => "naming_pattern",
            LintRule::OrphanResources => "orphan_resources",
            LintRule::DuplicateConnections => "duplicate_connections",
        }
    }
}

impl fmt::Display for LintRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintWarning {
    pub rule: LintRule,
    pub message: String,
    pub resource_name: String,
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.rule, self.message)
    }
}

/// Runs every enabled rule and returns the warnings, rule by rule.
///
/// # Errors
///
/// Returns [`ArborError::Config`] if the naming pattern is not a valid
/// regular expression.
pub fn lint(
    architecture: &Architecture,
    config: &LintConfig,
    classifier: &TypeClassifier,
) -> Result<Vec<LintWarning>, ArborError> {
    // Names must match from their first character; the end is left open.
    let pattern = Regex::new(&format!("^(?:{})", config.naming_pattern())).map_err(|err| {
        ArborError::Config(format!(
            "Invalid lint naming pattern '{}': {err}",
            config.naming_pattern()
        ))
    })?;

    let mut resources = Vec::new();
    collect_with_depth(&architecture.resources, 0, &mut resources);

    let mut warnings = Vec::new();

    for &(resource, depth) in &resources {
        if depth >= config.max_nesting_depth() {
            warnings.push(LintWarning {
                rule: LintRule::MaxNestingDepth,
                message: format!(
                    "Resource '{}' is nested {depth} levels deep (max {}).",
                    resource.name(),
                    config.max_nesting_depth()
                ),
                resource_name: resource.name().to_string(),
            });
        }
    }

    for &(resource, _) in &resources {
        if !pattern.is_match(resource.name()) {
            warnings.push(LintWarning {
                rule: LintRule::NamingPattern,
                message: format!(
                    "Resource name '{}' does not match pattern '{}'.",
                    resource.name(),
                    config.naming_pattern()
                ),
                resource_name: resource.name().to_string(),
            });
        }
    }

    if config.orphan_resources() {
        let connected: HashSet<&str> = architecture
            .connections
            .iter()
            .flat_map(|edge| [edge.source(), edge.target()])
            .collect();

        for &(resource, _) in &resources {
            if !classifier.is_container(resource.resource_type())
                && !connected.contains(resource.name())
            {
                warnings.push(LintWarning {
                    rule: LintRule::OrphanResources,
                    message: format!("Resource '{}' has no connections.", resource.name()),
                    resource_name: resource.name().to_string(),
                });
            }
        }
    }

    if config.duplicate_connections() {
        let mut seen = HashSet::new();
        for edge in &architecture.connections {
            if !seen.insert((edge.source(), edge.target())) {
                warnings.push(LintWarning {
                    rule: LintRule::DuplicateConnections,
                    message: format!(
                        "Duplicate connection from '{}' to '{}'.",
                        edge.source(),
                        edge.target()
                    ),
                    resource_name: edge.source().to_string(),
                });
            }
        }
    }

    Ok(warnings)
}

fn collect_with_depth<'a>(
    resources: &'a [ResourceNode],
    depth: usize,
    out: &mut Vec<(&'a ResourceNode, usize)>,
) {
    for resource in resources {
        out.push((resource, depth));
        collect_with_depth(resource.children(), depth + 1, out);
    }
}
