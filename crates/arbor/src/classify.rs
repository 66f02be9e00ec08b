//! Container versus leaf classification of resource types.

use std::collections::HashSet;

use crate::structure::NodeKind;

/// Type identifiers that render as enclosing regions.
const BUILTIN_CONTAINER_TYPES: &[&str] = &[
    "resource-group",
    "resource-groups",
    "vnet",
    "virtual-network",
    "virtual-networks",
    "subnet",
    "subnets",
    "subscription",
    "subscriptions",
    "aws/vpc",
    "aws/subnet",
    "aws/region",
    "gcp/vpc",
    "gcp/subnet",
    "namespace",
];

/// Decides whether a resource type is a [`NodeKind::Container`] or a
/// [`NodeKind::Leaf`].
///
/// Matching is exact and case-insensitive. A type is looked up in full first
/// (`"aws/vpc"`), then by the suffix after its first `/`, so an unknown
/// namespace in front of a known container keyword (`"foo/subnet"`) still
/// classifies as a container. Anything else is a leaf.
///
/// The registry is fixed at construction.
///
/// # Examples
///
/// ```
/// # use arbor::classify::TypeClassifier;
/// let classifier = TypeClassifier::default();
/// assert!(classifier.is_container("azure/resource-group"));
/// assert!(classifier.is_container("AWS/VPC"));
/// assert!(!classifier.is_container("azure/vm"));
/// ```
#[derive(Debug, Clone)]
pub struct TypeClassifier {
    container_types: HashSet<String>,
}

impl Default for TypeClassifier {
    fn default() -> Self {
        Self::with_extra_types(std::iter::empty::<&str>())
    }
}

impl TypeClassifier {
    /// Creates a classifier with the built-in registry plus `extra` types.
    pub fn with_extra_types<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let container_types = BUILTIN_CONTAINER_TYPES
            .iter()
            .map(|t| t.to_string())
            .chain(extra.into_iter().map(|t| t.as_ref().to_lowercase()))
            .collect();
        Self { container_types }
    }

    pub fn is_container(&self, resource_type: &str) -> bool {
        let key = resource_type.to_lowercase();
        if self.container_types.contains(&key) {
            return true;
        }
        match key.split_once('/') {
            Some((_, suffix)) => self.container_types.contains(suffix),
            None => false,
        }
    }

    pub fn classify(&self, resource_type: &str) -> NodeKind {
        if self.is_container(resource_type) {
            NodeKind::Container
        } else {
            NodeKind::Leaf
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_full_key_match() {
        let classifier = TypeClassifier::default();
        assert!(classifier.is_container("aws/vpc"));
        assert!(classifier.is_container("gcp/subnet"));
        assert!(classifier.is_container("namespace"));
        assert!(classifier.is_container("vnet"));
    }

    #[test]
    fn test_suffix_fallback_is_namespace_agnostic() {
        let classifier = TypeClassifier::default();
        assert!(classifier.is_container("azure/vnet"));
        assert!(classifier.is_container("foo/subnet"));
        assert!(classifier.is_container("k8s/namespace"));
        assert!(classifier.is_container("Azure/Resource-Group"));
    }

    #[test]
    fn test_leaves() {
        let classifier = TypeClassifier::default();
        assert_eq!(classifier.classify("azure/vm"), NodeKind::Leaf);
        assert_eq!(classifier.classify(""), NodeKind::Leaf);
        assert_eq!(classifier.classify("/"), NodeKind::Leaf);
        // Only the first separator splits, so the suffix here is "a/subnet".
        assert_eq!(classifier.classify("x/a/subnet"), NodeKind::Leaf);
        // No substring matching.
        assert_eq!(classifier.classify("azure/subnet-gateway"), NodeKind::Leaf);
    }

    #[test]
    fn test_extra_types() {
        let classifier = TypeClassifier::with_extra_types(["Landing-Zone"]);
        assert!(classifier.is_container("landing-zone"));
        assert!(classifier.is_container("azure/landing-zone"));
        assert!(classifier.is_container("azure/vnet"));
    }

    proptest! {
        #[test]
        fn prop_known_suffix_under_any_namespace(ns in "[a-z0-9]{1,12}") {
            let classifier = TypeClassifier::default();
            for suffix in ["subnet", "vnet", "resource-group", "subscription", "namespace"] {
                let resource_type = format!("{ns}/{suffix}");
                prop_assert!(classifier.is_container(&resource_type));
            }
        }

        #[test]
        fn prop_classification_is_total_and_stable(resource_type in "\\PC*") {
            let classifier = TypeClassifier::default();
            let first = classifier.classify(&resource_type);
            prop_assert_eq!(first, classifier.classify(&resource_type));
            prop_assert_eq!(first == NodeKind::Container, classifier.is_container(&resource_type));
        }
    }
}
