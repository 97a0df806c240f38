//! Descendant-closure resolution over the category tree.

use std::collections::{HashMap, HashSet};

use crate::models::CategoryNode;

/// Traversal depth bound. The adjacency is a tree by invariant, but a
/// mis-parented row must not be able to stall a request.
const MAX_DEPTH: usize = 64;

/// Compute the descendant closure of `roots` over the active-category
/// adjacency: each root plus every category reachable through child links,
/// deduplicated across roots.
///
/// A root that does not appear among the active categories contributes
/// nothing. Empty input yields an empty set.
pub fn descendants(roots: &[i64], nodes: &[CategoryNode]) -> HashSet<i64> {
    let existing: HashSet<i64> = nodes.iter().map(|n| n.id).collect();

    let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
    for node in nodes {
        if let Some(parent_id) = node.parent_id {
            children.entry(parent_id).or_default().push(node.id);
        }
    }

    let mut closure = HashSet::new();
    let mut stack: Vec<(i64, usize)> = Vec::new();

    for &root in roots {
        if !existing.contains(&root) {
            continue;
        }
        stack.push((root, 0));

        while let Some((id, depth)) = stack.pop() {
            if !closure.insert(id) {
                continue;
            }
            if depth >= MAX_DEPTH {
                continue;
            }
            if let Some(child_ids) = children.get(&id) {
                for &child in child_ids {
                    stack.push((child, depth + 1));
                }
            }
        }
    }

    closure
}
