//! Projection of cross-level relations onto a single hierarchy level.
//!
//! Edges connect components at arbitrary depths and under arbitrary
//! parents. Before a container's children can be arranged as a graph, each
//! edge must be re-expressed between the two ancestors living at that
//! container's child depth; edges that degenerate there are discarded.

use std::collections::HashSet;

use log::debug;

use trellis_core::{identifier::Id, model::Edge};

use crate::tree::LayoutTree;

/// An edge resolved to a single hierarchy level.
///
/// Both endpoints belong to the sibling set the projection was requested
/// for; endpoint order follows the original edge's direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectedEdge {
    source: Id,
    target: Id,
}

impl ProjectedEdge {
    /// Returns the resolved source component id
    pub fn source(&self) -> Id {
        self.source
    }

    /// Returns the resolved target component id
    pub fn target(&self) -> Id {
        self.target
    }
}

/// Projects edges onto the hierarchy level at `target_depth`.
///
/// For each edge, each endpoint is replaced by its ancestor at
/// `target_depth` (found by walking parent pointers upward). An edge is
/// dropped when:
///
/// - an endpoint is unknown to the tree (upstream data can reference ids
///   removed in the same transaction),
/// - an endpoint's own depth is shallower than `target_depth`, so no
///   ancestor at that level exists,
/// - both endpoints resolve to the same ancestor (a self-loop at this
///   level), or
/// - a resolved endpoint is not a member of `siblings`.
///
/// Output order follows input order; each edge resolves to exactly one
/// level pair under a level-by-level sweep, so no edge is duplicated among
/// the levels that do resolve it.
pub fn project_edges(
    edges: &[Edge],
    tree: &LayoutTree,
    target_depth: usize,
    siblings: &HashSet<Id>,
) -> Vec<ProjectedEdge> {
    edges
        .iter()
        .filter_map(|edge| {
            let source = resolve_endpoint(tree, edge.source(), target_depth)?;
            let target = resolve_endpoint(tree, edge.target(), target_depth)?;
            if source == target {
                debug!(
                    source:% = edge.source(),
                    target:% = edge.target(),
                    depth = target_depth;
                    "Edge collapses to a self-loop at this level, dropping",
                );
                return None;
            }
            if !siblings.contains(&source) || !siblings.contains(&target) {
                return None;
            }
            Some(ProjectedEdge { source, target })
        })
        .collect()
}

/// Resolves one endpoint to its ancestor id at `target_depth`.
fn resolve_endpoint(tree: &LayoutTree, endpoint: Id, target_depth: usize) -> Option<Id> {
    let node_idx = tree.node_index(endpoint)?;
    let ancestor_idx = tree.ancestor_at_depth(node_idx, target_depth)?;
    tree.node(ancestor_idx).id()
}
