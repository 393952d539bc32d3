//! Ephemeral containment tree built fresh for every layout pass.
//!
//! Components reference their container by [`Id`] only; this module turns a
//! flat component slice plus a caller-supplied container query into an
//! explicit rooted tree with per-node depth. The tree is engine-owned and
//! discarded at the end of the pass, so the persistent component model never
//! carries parent/child pointers that could go stale.
//!
//! # Structure
//!
//! Nodes live in an arena (`Vec<TreeNode>`); node `0` is always the
//! synthetic root, an entity-less node that unifies all parentless
//! components into a single tree. Depth counts edges from the root:
//! the root is `0`, top-level components are `1`, and so on.

use std::cmp::Reverse;

use indexmap::IndexMap;
use log::debug;

use trellis_core::{identifier::Id, model::Component};

/// Arena index of the synthetic root node.
const ROOT: usize = 0;

/// One node of the containment tree.
///
/// Wraps a single component (or nothing, for the synthetic root) together
/// with its structural position: parent index, ordered child indices, and
/// depth. The parent does not own its children's components; all nodes
/// merely index into the caller's component slice.
#[derive(Debug)]
pub struct TreeNode {
    id: Option<Id>,
    component: Option<usize>,
    parent: Option<usize>,
    children: Vec<usize>,
    depth: usize,
}

impl TreeNode {
    fn synthetic_root() -> Self {
        Self {
            id: None,
            component: None,
            parent: None,
            children: Vec::new(),
            depth: 0,
        }
    }

    fn new(id: Id, component: usize) -> Self {
        Self {
            id: Some(id),
            component: Some(component),
            parent: None,
            children: Vec::new(),
            depth: 0,
        }
    }

    /// Returns the component id, or `None` for the synthetic root
    pub fn id(&self) -> Option<Id> {
        self.id
    }

    /// Returns the index of this node's component in the caller's slice,
    /// or `None` for the synthetic root
    pub fn component_index(&self) -> Option<usize> {
        self.component
    }

    /// Returns the arena index of the parent node, or `None` for the root
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Returns the arena indices of this node's children, in insertion order
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// Returns the depth of this node (synthetic root = 0)
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether this node is the entity-less synthetic root
    pub fn is_synthetic_root(&self) -> bool {
        self.component.is_none()
    }
}

/// The containment tree for one layout pass.
///
/// Built by [`LayoutTree::build`] from a component slice and a container
/// query. Exactly one synthetic root exists per tree and every component is
/// reachable from it.
///
/// # Caller contract
///
/// Duplicate component ids and cyclic container references are contract
/// violations with undefined results; they are not guarded. A component
/// referencing a container id that does not exist in the slice is *not* an
/// error: it attaches to the synthetic root, because upstream data can
/// reference ids removed in the same transaction.
#[derive(Debug)]
pub struct LayoutTree {
    nodes: Vec<TreeNode>,
    index_by_id: IndexMap<Id, usize>,
}

impl LayoutTree {
    /// Builds the containment tree for the given components.
    ///
    /// `container_of` resolves a component's containing component, if any.
    /// Depths are computed by iterative parent walks rather than recursion,
    /// so deep (or malformed) chains cannot grow the stack.
    pub fn build<F>(components: &[Component], container_of: F) -> Self
    where
        F: Fn(&Component) -> Option<Id>,
    {
        let mut nodes = Vec::with_capacity(components.len() + 1);
        nodes.push(TreeNode::synthetic_root());

        let mut index_by_id = IndexMap::with_capacity(components.len());
        for (component_idx, component) in components.iter().enumerate() {
            let node_idx = nodes.len();
            nodes.push(TreeNode::new(component.id(), component_idx));
            index_by_id.insert(component.id(), node_idx);
        }

        // Attach every node to its container, or to the synthetic root when
        // the container id is absent or unknown.
        for (component_idx, component) in components.iter().enumerate() {
            let node_idx = component_idx + 1;
            let parent_idx = match container_of(component) {
                Some(container_id) => match index_by_id.get(&container_id) {
                    Some(&parent_idx) => parent_idx,
                    None => {
                        debug!(
                            component:% = component.id(),
                            container:% = container_id;
                            "Container id not found, attaching to root",
                        );
                        ROOT
                    }
                },
                None => ROOT,
            };
            nodes[node_idx].parent = Some(parent_idx);
            nodes[parent_idx].children.push(node_idx);
        }

        // Depth = number of edges on the walk to the root.
        for node_idx in 1..nodes.len() {
            let mut depth = 0;
            let mut current = node_idx;
            while let Some(parent_idx) = nodes[current].parent {
                depth += 1;
                current = parent_idx;
            }
            nodes[node_idx].depth = depth;
        }

        Self { nodes, index_by_id }
    }

    /// Returns the arena index of the synthetic root
    pub fn root(&self) -> usize {
        ROOT
    }

    /// Returns the node at the given arena index
    pub fn node(&self, index: usize) -> &TreeNode {
        &self.nodes[index]
    }

    /// Returns the number of nodes, including the synthetic root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true when the tree holds only the synthetic root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Returns the arena index of the node for the given component id
    pub fn node_index(&self, id: Id) -> Option<usize> {
        self.index_by_id.get(&id).copied()
    }

    /// Walks parent pointers upward until reaching the ancestor at `depth`.
    ///
    /// Returns the node itself when its depth already equals `depth`, and
    /// `None` when the node is shallower than `depth` (no such ancestor
    /// exists).
    pub fn ancestor_at_depth(&self, index: usize, depth: usize) -> Option<usize> {
        if self.nodes[index].depth < depth {
            return None;
        }
        let mut current = index;
        while self.nodes[current].depth > depth {
            current = self.nodes[current].parent?;
        }
        Some(current)
    }

    /// Returns node indices in post-order: every node appears after all of
    /// its descendants, so bottom-up passes can process children first.
    // PERF: This allocates an extra queue.
    pub fn iter_post_order(&self) -> impl Iterator<Item = usize> {
        let mut stack = Vec::with_capacity(self.nodes.len());
        stack.push(ROOT);
        let mut i = 0;
        while i < stack.len() {
            let node_idx = stack[i];
            for &child in self.nodes[node_idx].children.iter().rev() {
                stack.push(child);
            }
            i += 1;
        }
        stack.into_iter().rev()
    }

    /// Returns the indices of all container nodes (nodes with at least one
    /// child, synthetic root included), sorted by strictly decreasing depth.
    ///
    /// Ties break by arena index, keeping the order deterministic. Deepest
    /// containers must be processed first: a container's own footprint is
    /// unknown until its children have been arranged and measured.
    pub fn containers_deepest_first(&self) -> Vec<usize> {
        let mut containers: Vec<usize> = (0..self.nodes.len())
            .filter(|&idx| !self.nodes[idx].children.is_empty())
            .collect();
        containers.sort_by_key(|&idx| (Reverse(self.nodes[idx].depth), idx));
        containers
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use trellis_core::model::Definition;

    use super::*;

    fn component(id: &str, container: Option<&str>) -> Component {
        let definition = Rc::new(Definition::new());
        let component = Component::new(Id::new(id), definition);
        match container {
            Some(parent) => component.with_container(Id::new(parent)),
            None => component,
        }
    }

    fn build(components: &[Component]) -> LayoutTree {
        LayoutTree::build(components, Component::container)
    }

    #[test]
    fn test_three_level_chain_depths() {
        let components = vec![
            component("a", None),
            component("b", Some("a")),
            component("c", Some("b")),
        ];
        let tree = build(&components);

        assert_eq!(tree.node(tree.root()).depth(), 0);
        assert_eq!(tree.node(tree.node_index(Id::new("a")).unwrap()).depth(), 1);
        assert_eq!(tree.node(tree.node_index(Id::new("b")).unwrap()).depth(), 2);
        assert_eq!(tree.node(tree.node_index(Id::new("c")).unwrap()).depth(), 3);
    }

    #[test]
    fn test_parentless_components_attach_to_root() {
        let components = vec![component("x", None), component("y", None)];
        let tree = build(&components);

        let root = tree.node(tree.root());
        assert!(root.is_synthetic_root());
        assert_eq!(root.children().len(), 2);
    }

    #[test]
    fn test_dangling_container_attaches_to_root() {
        let components = vec![component("orphan", Some("deleted"))];
        let tree = build(&components);

        let node_idx = tree.node_index(Id::new("orphan")).unwrap();
        assert_eq!(tree.node(node_idx).parent(), Some(tree.root()));
        assert_eq!(tree.node(node_idx).depth(), 1);
    }

    #[test]
    fn test_children_keep_input_order() {
        let components = vec![
            component("parent", None),
            component("first", Some("parent")),
            component("second", Some("parent")),
            component("third", Some("parent")),
        ];
        let tree = build(&components);

        let parent_idx = tree.node_index(Id::new("parent")).unwrap();
        let ids: Vec<Id> = tree
            .node(parent_idx)
            .children()
            .iter()
            .map(|&child| tree.node(child).id().unwrap())
            .collect();
        assert_eq!(ids, vec![Id::new("first"), Id::new("second"), Id::new("third")]);
    }

    #[test]
    fn test_post_order_visits_children_before_parents() {
        let components = vec![
            component("a", None),
            component("b", Some("a")),
            component("c", Some("b")),
        ];
        let tree = build(&components);

        let order: Vec<usize> = tree.iter_post_order().collect();
        let position = |id: &str| {
            let idx = tree.node_index(Id::new(id)).unwrap();
            order.iter().position(|&n| n == idx).unwrap()
        };
        assert!(position("c") < position("b"));
        assert!(position("b") < position("a"));
        assert_eq!(order.last(), Some(&tree.root()));
    }

    #[test]
    fn test_ancestor_at_depth() {
        let components = vec![
            component("a", None),
            component("b", Some("a")),
            component("c", Some("b")),
        ];
        let tree = build(&components);
        let c_idx = tree.node_index(Id::new("c")).unwrap();
        let a_idx = tree.node_index(Id::new("a")).unwrap();

        assert_eq!(tree.ancestor_at_depth(c_idx, 3), Some(c_idx));
        assert_eq!(tree.ancestor_at_depth(c_idx, 1), Some(a_idx));
        assert_eq!(tree.ancestor_at_depth(c_idx, 0), Some(tree.root()));
        assert_eq!(tree.ancestor_at_depth(a_idx, 2), None);
    }

    #[test]
    fn test_containers_deepest_first() {
        let components = vec![
            component("outer", None),
            component("inner", Some("outer")),
            component("leaf", Some("inner")),
            component("top", None),
        ];
        let tree = build(&components);

        let containers = tree.containers_deepest_first();
        let depths: Vec<usize> = containers.iter().map(|&idx| tree.node(idx).depth()).collect();
        let mut sorted = depths.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(depths, sorted);

        // "inner" (depth 2) comes before "outer" (depth 1), root is last.
        assert_eq!(containers.first(), tree.node_index(Id::new("inner")).as_ref());
        assert_eq!(containers.last(), Some(&tree.root()));
    }

    #[test]
    fn test_empty_input() {
        let tree = build(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
        assert!(tree.containers_deepest_first().is_empty());
    }
}
