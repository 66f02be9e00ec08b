//! Name validation over the resource tree.

use std::collections::HashSet;

use arbor_core::resource::ResourceNode;

use crate::error::ArborError;

/// Flattens the names of `resources` in pre-order.
pub fn collect_names(resources: &[ResourceNode]) -> Vec<&str> {
    let mut names = Vec::new();
    walk(resources, &mut |node| {
        names.push(node.name());
        true
    });
    names
}

/// Fails with [`ArborError::DuplicateResourceName`] on the first name seen
/// twice in a pre-order walk of `resources`.
///
/// Names must be unique across the whole tree, not only among siblings.
pub fn validate_unique(resources: &[ResourceNode]) -> Result<(), ArborError> {
    let mut seen = HashSet::new();
    let mut duplicate = None;
    walk(resources, &mut |node| {
        if seen.insert(node.name()) {
            true
        } else {
            duplicate = Some(node.name().to_string());
            false
        }
    });

    match duplicate {
        Some(name) => Err(ArborError::DuplicateResourceName { name }),
        None => Ok(()),
    }
}

/// Pre-order walk that stops as soon as `visit` returns false.
fn walk<'a, F>(resources: &'a [ResourceNode], visit: &mut F) -> bool
where
    F: FnMut(&'a ResourceNode) -> bool,
{
    for node in resources {
        if !visit(node) || !walk(node.children(), visit) {
            return false;
        }
    }
    true
}
