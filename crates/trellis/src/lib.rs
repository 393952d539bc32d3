//! Trellis is a layout engine for hierarchical diagrams.
//!
//! Components form a containment hierarchy (referenced by id, never by
//! pointer) and the engine assigns each one a position and size, bottom-up:
//! a container's footprint follows from its children. Two paths exist:
//!
//! - **Built-in**: each container arranges its direct children with either
//!   greedy ring [`Packing`](strategy::Packing) or linear
//!   [`Flow`](strategy::Flow), then grows around them.
//! - **Delegated**: each hierarchy level is handed to an external
//!   [`GraphAlgorithm`](engines::GraphAlgorithm) such as the built-in
//!   [`Sugiyama`](engines::sugiyama::Sugiyama) layered algorithm.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//!
//! use trellis::{LayoutPass, Definition, LayoutStrategy};
//! use trellis::identifier::Id;
//! use trellis::model::Component;
//!
//! let container = Rc::new(Definition::new_container(LayoutStrategy::Packed));
//! let leaf = Rc::new(Definition::new());
//!
//! let mut components = vec![
//!     Component::new(Id::new("system"), container),
//!     Component::new(Id::new("service"), Rc::clone(&leaf)).with_container(Id::new("system")),
//!     Component::new(Id::new("database"), leaf).with_container(Id::new("system")),
//! ];
//!
//! LayoutPass::default().run(&mut components);
//!
//! for component in &components {
//!     assert!(component.placement().rect().is_some());
//! }
//! ```

pub mod arrange;
pub mod config;
pub mod engines;
pub mod error;
pub mod projection;
pub mod strategy;
pub mod tree;

pub use trellis_core::{geometry, identifier, model};

pub use config::AppConfig;
pub use error::TrellisError;
pub use model::{Definition, FlowAxis, LayoutStrategy};

use model::{Component, Edge};

use crate::{arrange::Arranger, engines::GraphAlgorithm, engines::Orchestrator, tree::LayoutTree};

/// One full layout computation over a component collection.
///
/// Holds the configuration and drives the passes; the component data stays
/// with the caller and is mutated in place.
#[derive(Debug, Clone, Default)]
pub struct LayoutPass {
    config: AppConfig,
}

impl LayoutPass {
    /// Creates a layout pass with the given configuration
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this pass runs with
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Runs the built-in strategies over the whole hierarchy.
    ///
    /// Every component ends up with a position and size. This path cannot
    /// fail: the built-in strategies are total over well-formed input.
    pub fn run(&self, components: &mut [Component]) {
        let tree = LayoutTree::build(components, Component::container);
        self.arranger().run(components, &tree);
    }

    /// Sizes the hierarchy bottom-up, then delegates each level's
    /// arrangement to the given external algorithm.
    ///
    /// The sizing pass runs first so every child crosses the boundary as an
    /// opaque sized box. The algorithm rewrites positions only.
    pub fn run_delegated(
        &self,
        components: &mut [Component],
        edges: &[Edge],
        algorithm: &dyn GraphAlgorithm,
    ) -> Result<(), TrellisError> {
        let tree = LayoutTree::build(components, Component::container);
        self.arranger().run(components, &tree);

        Orchestrator::new().arrange_all(components, edges, algorithm)
    }

    fn arranger(&self) -> Arranger {
        Arranger::new(self.config.layout.root_margin, self.config.layout.root_gap)
            .with_keep_positions(self.config.layout.keep_positions)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::config::LayoutConfig;
    use crate::identifier::Id;

    use super::*;

    #[test]
    fn test_run_places_every_component() {
        let container = Rc::new(Definition::new_container(LayoutStrategy::Packed));
        let leaf = Rc::new(Definition::new());
        let mut components = vec![
            Component::new(Id::new("sys"), container),
            Component::new(Id::new("svc"), leaf).with_container(Id::new("sys")),
        ];

        LayoutPass::default().run(&mut components);
        for component in &components {
            assert!(component.placement().rect().is_some());
        }
    }

    #[test]
    fn test_config_controls_root_packing() {
        let leaf = Rc::new(Definition::new().with_default_size(10.0, 10.0));
        let mut components = vec![Component::new(Id::new("only"), leaf)];

        let config = AppConfig {
            layout: LayoutConfig {
                root_margin: 7.0,
                ..LayoutConfig::default()
            },
        };
        LayoutPass::new(config).run(&mut components);

        let position = components[0].placement().position().unwrap();
        assert_eq!(position.x(), 7.0);
        assert_eq!(position.y(), 7.0);
    }

    #[test]
    fn test_keep_positions_respects_existing_placement() {
        let leaf = Rc::new(Definition::new().with_default_size(10.0, 10.0));
        let mut components = vec![
            Component::new(Id::new("pinned"), Rc::clone(&leaf)),
            Component::new(Id::new("fresh"), leaf),
        ];
        components[0]
            .placement_mut()
            .set_position(geometry::Point::new(42.0, 42.0));

        let config = AppConfig {
            layout: LayoutConfig {
                keep_positions: true,
                ..LayoutConfig::default()
            },
        };
        LayoutPass::new(config).run(&mut components);

        assert_eq!(
            components[0].placement().position(),
            Some(geometry::Point::new(42.0, 42.0))
        );
        assert!(components[1].placement().position().is_some());
    }
}
