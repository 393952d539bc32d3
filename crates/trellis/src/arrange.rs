//! Bottom-up placement and size propagation over the containment tree.
//!
//! Containers cannot be sized until their children are placed, so the pass
//! walks the tree in post-order: leaves first, then each container once all
//! of its descendants carry final sizes. For every container the pass
//! dispatches to the strategy named by its definition, places the direct
//! children, and derives the container's own size from the returned content
//! extent plus its margin, never letting it fall below the configured
//! minimum.

use log::debug;

use trellis_core::{geometry::Size, model::Component, model::LayoutStrategy};

use crate::{
    strategy::{ContainerStrategy, Flow, Packing},
    tree::LayoutTree,
};

/// Runs the built-in strategies bottom-up over a whole containment tree.
///
/// The synthetic root has no definition of its own; its direct children
/// (the top-level components) are packed with the pass-level margin and gap
/// carried here.
#[derive(Debug, Clone, Copy)]
pub struct Arranger {
    root_margin: f32,
    root_gap: f32,
    keep_positions: bool,
}

impl Arranger {
    /// Creates an arranger with the given root-level margin and gap
    pub fn new(root_margin: f32, root_gap: f32) -> Self {
        Self {
            root_margin,
            root_gap,
            keep_positions: false,
        }
    }

    /// Sets whether already-positioned children are kept as obstacles
    pub fn with_keep_positions(mut self, keep_positions: bool) -> Self {
        self.keep_positions = keep_positions;
        self
    }

    /// Places every component and propagates container sizes upward.
    ///
    /// After this returns, every component carries a position and a size:
    /// leaves keep their measured size or take the definition default,
    /// empty containers take their minimum size, and populated containers
    /// grow to their content extent plus margin.
    pub fn run(&self, components: &mut [Component], tree: &LayoutTree) {
        for node_idx in tree.iter_post_order() {
            let node = tree.node(node_idx);

            if node.is_synthetic_root() {
                let children = child_component_indices(tree, node_idx);
                Packing::new(self.root_margin, self.root_gap).arrange(
                    components,
                    &children,
                    self.keep_positions,
                );
                continue;
            }

            let component_idx = node
                .component_index()
                .expect("non-root nodes always wrap a component");

            if node.children().is_empty() {
                self.size_childless(&mut components[component_idx]);
                continue;
            }

            let children = child_component_indices(tree, node_idx);
            let (strategy, axis, margin, gap, min_size) = {
                let definition = components[component_idx].definition();
                (
                    definition.strategy(),
                    definition.axis(),
                    definition.margin(),
                    definition.gap(),
                    definition.min_size(),
                )
            };

            let extent = match strategy {
                LayoutStrategy::Packed => Packing::new(margin, gap).arrange(
                    components,
                    &children,
                    self.keep_positions,
                ),
                LayoutStrategy::Flow => Flow::new(axis, margin, gap).arrange(
                    components,
                    &children,
                    self.keep_positions,
                ),
            };

            let size = extent.grow(margin).max(min_size);
            debug!(
                container:% = components[component_idx].id(),
                width = size.width(),
                height = size.height();
                "Propagated container size",
            );
            components[component_idx].placement_mut().set_size(size);
        }
    }

    /// Sizes a node without children: containers collapse to their minimum,
    /// leaves keep an externally measured size or fall back to the default.
    fn size_childless(&self, component: &mut Component) {
        let size = if component.definition().container() {
            component.definition().min_size()
        } else {
            component.measured_size()
        };
        component.placement_mut().set_size(size);
    }
}

/// Maps a node's tree children to their component slice indices.
fn child_component_indices(tree: &LayoutTree, node_idx: usize) -> Vec<usize> {
    tree.node(node_idx)
        .children()
        .iter()
        .map(|&child| {
            tree.node(child)
                .component_index()
                .expect("child nodes always wrap a component")
        })
        .collect()
}
