//! Delegation of per-level arrangement to an external graph algorithm.
//!
//! Instead of the built-in strategies, a caller can hand each hierarchy
//! level to a general-purpose graph layout algorithm. The boundary is the
//! [`GraphAlgorithm`] trait over serializable request/response types, so any
//! conforming algorithm can be substituted; [`sugiyama::Sugiyama`] is the
//! built-in implementation.
//!
//! Levels are processed strictly one at a time, deepest first, because a
//! container's own footprint is unknown until its children have been
//! arranged and measured.

pub mod sugiyama;

use std::collections::HashSet;

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use trellis_core::{
    geometry::Point,
    identifier::Id,
    model::{Component, Edge},
};

use crate::{error::TrellisError, projection::project_edges, tree::LayoutTree};

/// One container's direct children as a flat graph.
///
/// `id` names the container ("root" for the synthetic root). Children are
/// opaque sized boxes; the algorithm updates their `x`/`y` and returns the
/// graph otherwise unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelGraph {
    pub id: String,
    pub layout_options: IndexMap<String, String>,
    pub children: Vec<LevelNode>,
    pub edges: Vec<LevelEdge>,
}

/// One child of the level being arranged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelNode {
    pub id: String,
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub y: f32,
}

/// One projected edge between two children of the level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelEdge {
    pub id: String,
    pub sources: Vec<String>,
    pub targets: Vec<String>,
}

/// An external single-level graph layout algorithm.
pub trait GraphAlgorithm {
    /// Arranges one level and returns it with children's `x`/`y` updated.
    ///
    /// Implementations must keep every child id they were given and must
    /// not invent new ones. Sizes are inputs only.
    fn arrange(&self, graph: LevelGraph) -> Result<LevelGraph, TrellisError>;
}

/// Drives an external algorithm over every hierarchy level.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    layout_options: IndexMap<String, String>,
}

impl Orchestrator {
    /// Creates an orchestrator with no per-level options
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a key/value option passed to the algorithm with every level
    pub fn with_option(mut self, key: &str, value: &str) -> Self {
        self.layout_options.insert(key.to_string(), value.to_string());
        self
    }

    /// Arranges every container's direct children via the external
    /// algorithm, mutating component positions in place.
    ///
    /// Containers are visited strictly sequentially, deepest level first.
    /// Only positions are written back; sizes are never rewritten. If a
    /// call fails, the pass aborts with that error and positions already
    /// written for deeper containers remain as written.
    pub fn arrange_all(
        &self,
        components: &mut [Component],
        edges: &[Edge],
        algorithm: &dyn GraphAlgorithm,
    ) -> Result<(), TrellisError> {
        let tree = LayoutTree::build(components, Component::container);

        for container_idx in tree.containers_deepest_first() {
            let container = tree.node(container_idx);
            let graph_id = match container.id() {
                Some(id) => id.to_string(),
                None => "root".to_string(),
            };

            let child_ids: Vec<Id> = container
                .children()
                .iter()
                .map(|&child| {
                    tree.node(child)
                        .id()
                        .expect("child nodes always wrap a component")
                })
                .collect();
            let siblings: HashSet<Id> = child_ids.iter().copied().collect();

            let children: Vec<LevelNode> = container
                .children()
                .iter()
                .map(|&child| {
                    let component_idx = tree
                        .node(child)
                        .component_index()
                        .expect("child nodes always wrap a component");
                    let component = &components[component_idx];
                    let size = component.measured_size();
                    let position = component.placement().position().unwrap_or_default();
                    LevelNode {
                        id: component.id().to_string(),
                        width: size.width(),
                        height: size.height(),
                        x: position.x(),
                        y: position.y(),
                    }
                })
                .collect();

            let level_edges: Vec<LevelEdge> =
                project_edges(edges, &tree, container.depth() + 1, &siblings)
                    .iter()
                    .enumerate()
                    .map(|(i, projected)| LevelEdge {
                        id: format!("e{i}"),
                        sources: vec![projected.source().to_string()],
                        targets: vec![projected.target().to_string()],
                    })
                    .collect();

            debug!(
                container:% = graph_id,
                children = children.len(),
                edges = level_edges.len();
                "Delegating level to external algorithm",
            );

            let request = LevelGraph {
                id: graph_id,
                layout_options: self.layout_options.clone(),
                children,
                edges: level_edges,
            };
            let response = algorithm.arrange(request)?;

            self.write_positions(components, &tree, &siblings, &response)?;
        }

        Ok(())
    }

    /// Writes the returned positions back onto the level's components.
    fn write_positions(
        &self,
        components: &mut [Component],
        tree: &LayoutTree,
        siblings: &HashSet<Id>,
        response: &LevelGraph,
    ) -> Result<(), TrellisError> {
        for node in &response.children {
            let id = Id::new(&node.id);
            if !siblings.contains(&id) {
                return Err(TrellisError::Algorithm(format!(
                    "Algorithm returned unknown child id {id} for level {}",
                    response.id
                )));
            }
            let component_idx = tree
                .node_index(id)
                .and_then(|idx| tree.node(idx).component_index())
                .ok_or_else(|| {
                    TrellisError::Layout(format!("Component not found for id {id}"))
                })?;
            components[component_idx]
                .placement_mut()
                .set_position(Point::new(node.x, node.y));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use trellis_core::model::Definition;

    use super::*;

    fn component(id: &str, container: Option<&str>) -> Component {
        let definition = Rc::new(Definition::new().with_default_size(10.0, 10.0));
        let component = Component::new(Id::new(id), definition);
        match container {
            Some(parent) => component.with_container(Id::new(parent)),
            None => component,
        }
    }

    /// Records every request and replies with a scripted position per id.
    struct Scripted {
        requests: RefCell<Vec<LevelGraph>>,
        fail_on: Option<String>,
    }

    impl Scripted {
        fn new() -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                fail_on: None,
            }
        }

        fn failing_on(level_id: &str) -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                fail_on: Some(level_id.to_string()),
            }
        }

        fn request_ids(&self) -> Vec<String> {
            self.requests.borrow().iter().map(|g| g.id.clone()).collect()
        }
    }

    impl GraphAlgorithm for Scripted {
        fn arrange(&self, graph: LevelGraph) -> Result<LevelGraph, TrellisError> {
            self.requests.borrow_mut().push(graph.clone());
            if self.fail_on.as_deref() == Some(graph.id.as_str()) {
                return Err(TrellisError::Algorithm("scripted failure".to_string()));
            }
            let mut response = graph;
            for (i, node) in response.children.iter_mut().enumerate() {
                node.x = 100.0 * (i as f32 + 1.0);
                node.y = 7.0;
            }
            Ok(response)
        }
    }

    fn nested_components() -> Vec<Component> {
        vec![
            component("outer", None),
            component("inner", Some("outer")),
            component("leaf", Some("inner")),
        ]
    }

    #[test]
    fn test_levels_are_visited_deepest_first() {
        let mut components = nested_components();
        let algorithm = Scripted::new();

        Orchestrator::new()
            .arrange_all(&mut components, &[], &algorithm)
            .unwrap();

        assert_eq!(algorithm.request_ids(), vec!["inner", "outer", "root"]);
    }

    #[test]
    fn test_positions_written_back_sizes_untouched() {
        let mut components = vec![
            component("a", None),
            component("b", None),
        ];
        let algorithm = Scripted::new();

        Orchestrator::new()
            .arrange_all(&mut components, &[], &algorithm)
            .unwrap();

        assert_eq!(components[0].placement().position(), Some(Point::new(100.0, 7.0)));
        assert_eq!(components[1].placement().position(), Some(Point::new(200.0, 7.0)));
        // Sizes stay whatever they were before the pass.
        assert_eq!(components[0].placement().size(), None);
    }

    #[test]
    fn test_projected_edges_reach_the_algorithm() {
        let mut components = vec![
            component("p1", None),
            component("p2", None),
            component("c1", Some("p1")),
            component("c2", Some("p2")),
        ];
        let edges = vec![Edge::new(Id::new("c1"), Id::new("c2"))];
        let algorithm = Scripted::new();

        Orchestrator::new()
            .arrange_all(&mut components, &edges, &algorithm)
            .unwrap();

        // The edge lifts to p1 -> p2 on the root level only.
        let requests = algorithm.requests.borrow();
        let root_level = requests.iter().find(|g| g.id == "root").unwrap();
        assert_eq!(root_level.edges.len(), 1);
        assert_eq!(root_level.edges[0].sources, vec!["p1".to_string()]);
        assert_eq!(root_level.edges[0].targets, vec!["p2".to_string()]);
        for level in requests.iter().filter(|g| g.id != "root") {
            assert!(level.edges.is_empty());
        }
    }

    #[test]
    fn test_failure_aborts_but_keeps_earlier_writes() {
        let mut components = nested_components();
        let algorithm = Scripted::failing_on("outer");

        let result = Orchestrator::new().arrange_all(&mut components, &[], &algorithm);
        assert!(matches!(result, Err(TrellisError::Algorithm(_))));

        // "inner" was processed first, so its child keeps the written
        // position; "outer" itself failed before any write.
        let leaf = components.iter().find(|c| c.id() == Id::new("leaf")).unwrap();
        assert_eq!(leaf.placement().position(), Some(Point::new(100.0, 7.0)));
        let inner = components.iter().find(|c| c.id() == Id::new("inner")).unwrap();
        assert_eq!(inner.placement().position(), None);
    }

    #[test]
    fn test_unknown_returned_id_is_an_error() {
        struct Inventive;
        impl GraphAlgorithm for Inventive {
            fn arrange(&self, mut graph: LevelGraph) -> Result<LevelGraph, TrellisError> {
                graph.children.push(LevelNode {
                    id: "phantom".to_string(),
                    width: 1.0,
                    height: 1.0,
                    x: 0.0,
                    y: 0.0,
                });
                Ok(graph)
            }
        }

        let mut components = vec![component("only", None)];
        let result = Orchestrator::new().arrange_all(&mut components, &[], &Inventive);
        assert!(matches!(result, Err(TrellisError::Algorithm(_))));
    }

    #[test]
    fn test_layout_options_pass_through() {
        let mut components = vec![component("a", None)];
        let algorithm = Scripted::new();

        Orchestrator::new()
            .with_option("direction", "down")
            .arrange_all(&mut components, &[], &algorithm)
            .unwrap();

        let requests = algorithm.requests.borrow();
        assert_eq!(
            requests[0].layout_options.get("direction"),
            Some(&"down".to_string())
        );
    }

    #[test]
    fn test_level_graph_wire_shape() {
        let graph = LevelGraph {
            id: "root".to_string(),
            layout_options: IndexMap::new(),
            children: vec![LevelNode {
                id: "n1".to_string(),
                width: 10.0,
                height: 20.0,
                x: 0.0,
                y: 0.0,
            }],
            edges: vec![LevelEdge {
                id: "e0".to_string(),
                sources: vec!["n1".to_string()],
                targets: vec!["n2".to_string()],
            }],
        };
        let json = serde_json::to_value(&graph).unwrap();
        assert!(json.get("layoutOptions").is_some());
        assert_eq!(json["children"][0]["id"], "n1");
        assert_eq!(json["edges"][0]["sources"][0], "n1");
    }
}
