//! Built-in level algorithm based on layered graph drawing.
//!
//! Delegates to the `rust-sugiyama` crate with a fallback to a simple row
//! arrangement when the level has no edges.

use std::collections::HashMap;

use log::debug;
use rust_sugiyama::configure::Config;

use crate::{
    config::LayoutConfig,
    engines::{GraphAlgorithm, LevelGraph},
    error::TrellisError,
};

/// Arranges one level with the Sugiyama layered-drawing algorithm.
///
/// Children connected by edges are assigned to layers and spread with
/// spacing adapted to their measured sizes. Children untouched by any edge
/// are appended in a row after the positioned ones. All returned
/// coordinates are non-negative top-left positions.
pub struct Sugiyama {
    /// Horizontal spacing between components
    horizontal_spacing: f32,

    /// Vertical spacing between layers
    vertical_spacing: f32,
}

impl Sugiyama {
    /// Creates the algorithm with default spacing
    pub fn new() -> Self {
        Self {
            horizontal_spacing: 50.0,
            vertical_spacing: 80.0,
        }
    }

    /// Creates the algorithm with spacing taken from configuration
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            horizontal_spacing: config.horizontal_spacing,
            vertical_spacing: config.vertical_spacing,
        }
    }

    /// Sets the horizontal spacing between components
    pub fn set_horizontal_spacing(&mut self, spacing: f32) -> &mut Self {
        self.horizontal_spacing = spacing;
        self
    }

    /// Sets the vertical spacing between layers
    pub fn set_vertical_spacing(&mut self, spacing: f32) -> &mut Self {
        self.vertical_spacing = spacing;
        self
    }

    /// Places every child of an edge-less level in a single row.
    fn arrange_row(&self, graph: &mut LevelGraph) {
        debug!(
            level:% = graph.id;
            "Level has no edges, arranging children in a row",
        );
        let mut cursor = 0.0;
        for node in &mut graph.children {
            node.x = cursor;
            node.y = 0.0;
            cursor += node.width + self.horizontal_spacing * 0.5;
        }
    }

    /// Runs the layered algorithm over the level's edges.
    fn arrange_layered(&self, graph: &mut LevelGraph) -> Result<(), TrellisError> {
        let index_by_id: HashMap<&str, u32> = graph
            .children
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.as_str(), i as u32))
            .collect();

        let mut edges = Vec::with_capacity(graph.edges.len());
        for edge in &graph.edges {
            let endpoints = edge
                .sources
                .iter()
                .flat_map(|source| edge.targets.iter().map(move |target| (source, target)));
            for (source, target) in endpoints {
                if let (Some(&source_idx), Some(&target_idx)) =
                    (index_by_id.get(source.as_str()), index_by_id.get(target.as_str()))
                {
                    // Skip self-loops
                    if source_idx != target_idx {
                        edges.push((source_idx, target_idx));
                    }
                }
            }
        }

        if edges.is_empty() {
            self.arrange_row(graph);
            return Ok(());
        }

        debug!(
            level:% = graph.id,
            nodes = graph.children.len(),
            edges = edges.len();
            "Applying Sugiyama algorithm to level",
        );

        // Spacing adapts to the actual child sizes so large boxes do not
        // land on top of each other.
        let max_width = graph
            .children
            .iter()
            .map(|node| node.width)
            .fold(0.0f32, f32::max)
            .max(1.0);
        let max_height = graph
            .children
            .iter()
            .map(|node| node.height)
            .fold(0.0f32, f32::max)
            .max(1.0);
        let avg_node_size = graph
            .children
            .iter()
            .map(|node| (node.width + node.height) / 2.0)
            .sum::<f32>()
            / graph.children.len() as f32;

        // rust-sugiyama panics on some malformed graphs, so run it behind
        // catch_unwind and surface the panic as an ordinary error.
        let layouts = std::panic::catch_unwind(move || {
            let config = Config {
                minimum_length: 1,
                vertex_spacing: (avg_node_size / 50.0).clamp(2.0, 5.0) as f64,
                ..Default::default()
            };
            rust_sugiyama::from_edges(&edges, &config)
        });

        let results = match layouts {
            Ok(results) if !results.is_empty() => results,
            Ok(_) => {
                return Err(TrellisError::Algorithm(
                    "Layered algorithm returned empty layout results".to_string(),
                ));
            }
            Err(err) => {
                let message = if let Some(panic_msg) = err.downcast_ref::<String>() {
                    format!("Layered algorithm panicked: {panic_msg}")
                } else {
                    "Layered algorithm panicked with unknown error".to_string()
                };
                return Err(TrellisError::Algorithm(message));
            }
        };

        let effective_h_spacing = self.horizontal_spacing + max_width * 0.5;
        let effective_v_spacing = self.vertical_spacing + max_height * 0.5;

        // The algorithm returns component centers on an abstract grid; scale
        // them to diagram space and convert to top-left coordinates.
        let mut positioned = vec![false; graph.children.len()];
        let (coords, _, _) = &results[0];
        for &(id, (x, y)) in coords {
            let child_idx = id as usize;
            let Some(node) = graph.children.get_mut(child_idx) else {
                debug!(id = child_idx; "Layered algorithm returned unknown node id");
                continue;
            };
            node.x = (x as f32) * effective_h_spacing - node.width / 2.0;
            node.y = (y as f32) * effective_v_spacing - node.height / 2.0;
            positioned[child_idx] = true;
        }

        if !positioned.iter().any(|&p| p) {
            return Err(TrellisError::Algorithm(
                "Failed to map any layered-algorithm positions back to level children".to_string(),
            ));
        }

        // Shift everything so the top-left of the positioned set is at the
        // origin.
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        for (node, &placed) in graph.children.iter().zip(&positioned) {
            if placed {
                min_x = min_x.min(node.x);
                min_y = min_y.min(node.y);
            }
        }
        let mut max_x = 0.0f32;
        for (node, &placed) in graph.children.iter_mut().zip(&positioned) {
            if placed {
                node.x -= min_x;
                node.y -= min_y;
                max_x = max_x.max(node.x + node.width);
            }
        }

        // Children no edge reaches (and any further connected components)
        // line up after the positioned set.
        let mut cursor = max_x + self.horizontal_spacing * 0.5;
        for (node, &placed) in graph.children.iter_mut().zip(&positioned) {
            if !placed {
                node.x = cursor;
                node.y = 0.0;
                cursor += node.width + self.horizontal_spacing * 0.5;
            }
        }

        Ok(())
    }
}

impl Default for Sugiyama {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphAlgorithm for Sugiyama {
    fn arrange(&self, mut graph: LevelGraph) -> Result<LevelGraph, TrellisError> {
        if graph.children.is_empty() {
            return Ok(graph);
        }
        if graph.edges.is_empty() {
            self.arrange_row(&mut graph);
        } else {
            self.arrange_layered(&mut graph)?;
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use crate::engines::{LevelEdge, LevelNode};

    use super::*;

    fn node(id: &str, width: f32, height: f32) -> LevelNode {
        LevelNode {
            id: id.to_string(),
            width,
            height,
            x: 0.0,
            y: 0.0,
        }
    }

    fn edge(id: &str, source: &str, target: &str) -> LevelEdge {
        LevelEdge {
            id: id.to_string(),
            sources: vec![source.to_string()],
            targets: vec![target.to_string()],
        }
    }

    fn level(children: Vec<LevelNode>, edges: Vec<LevelEdge>) -> LevelGraph {
        LevelGraph {
            id: "root".to_string(),
            layout_options: IndexMap::new(),
            children,
            edges,
        }
    }

    #[test]
    fn test_empty_level_passes_through() {
        let result = Sugiyama::new().arrange(level(vec![], vec![])).unwrap();
        assert!(result.children.is_empty());
    }

    #[test]
    fn test_edgeless_level_becomes_a_row() {
        let graph = level(
            vec![node("a", 20.0, 10.0), node("b", 30.0, 10.0), node("c", 10.0, 10.0)],
            vec![],
        );
        let result = Sugiyama::new().arrange(graph).unwrap();

        let xs: Vec<f32> = result.children.iter().map(|n| n.x).collect();
        assert!(xs[0] < xs[1] && xs[1] < xs[2]);
        assert!(result.children.iter().all(|n| n.y == 0.0));
        // Consecutive children never overlap horizontally.
        assert!(xs[1] >= xs[0] + 20.0);
        assert!(xs[2] >= xs[1] + 30.0);
    }

    #[test]
    fn test_chain_separates_layers() {
        let graph = level(
            vec![node("a", 10.0, 10.0), node("b", 10.0, 10.0)],
            vec![edge("e0", "a", "b")],
        );
        let result = Sugiyama::new().arrange(graph).unwrap();

        let a = &result.children[0];
        let b = &result.children[1];
        // A connected pair lands on two different layers.
        assert_ne!(a.y, b.y);
        assert!(a.x >= 0.0 && a.y >= 0.0);
        assert!(b.x >= 0.0 && b.y >= 0.0);
    }

    #[test]
    fn test_coordinates_are_non_negative() {
        let graph = level(
            vec![
                node("a", 40.0, 20.0),
                node("b", 40.0, 20.0),
                node("c", 40.0, 20.0),
                node("d", 40.0, 20.0),
            ],
            vec![
                edge("e0", "a", "b"),
                edge("e1", "a", "c"),
                edge("e2", "b", "d"),
                edge("e3", "c", "d"),
            ],
        );
        let result = Sugiyama::new().arrange(graph).unwrap();
        for node in &result.children {
            assert!(node.x >= 0.0, "{} has negative x: {}", node.id, node.x);
            assert!(node.y >= 0.0, "{} has negative y: {}", node.id, node.y);
        }
    }

    #[test]
    fn test_isolated_child_is_appended() {
        let graph = level(
            vec![node("a", 10.0, 10.0), node("b", 10.0, 10.0), node("lone", 10.0, 10.0)],
            vec![edge("e0", "a", "b")],
        );
        let result = Sugiyama::new().arrange(graph).unwrap();

        let lone = result.children.iter().find(|n| n.id == "lone").unwrap();
        let connected_max_x = result
            .children
            .iter()
            .filter(|n| n.id != "lone")
            .map(|n| n.x + n.width)
            .fold(0.0f32, f32::max);
        assert!(lone.x >= connected_max_x);
    }

    #[test]
    fn test_self_loop_edge_is_ignored() {
        let graph = level(
            vec![node("a", 10.0, 10.0), node("b", 10.0, 10.0)],
            vec![edge("e0", "a", "a")],
        );
        // Only the self-loop exists, so the row fallback applies.
        let result = Sugiyama::new().arrange(graph).unwrap();
        assert!(result.children.iter().all(|n| n.y == 0.0));
    }

    #[test]
    fn test_unknown_edge_endpoint_is_ignored() {
        let graph = level(
            vec![node("a", 10.0, 10.0)],
            vec![edge("e0", "a", "ghost")],
        );
        let result = Sugiyama::new().arrange(graph).unwrap();
        assert_eq!(result.children.len(), 1);
    }
}
