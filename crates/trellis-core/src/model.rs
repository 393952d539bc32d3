//! The component data model consumed and mutated by the layout engine.
//!
//! This module defines the entities a layout pass operates on:
//!
//! - [`Component`]: a placeable, possibly-containing visual unit
//! - [`Definition`]: immutable, shared per-type metadata (sizing defaults,
//!   containment capability, layout strategy)
//! - [`Placement`]: the mutable position/size record, nullable until computed
//! - [`Edge`]: a directed relation between two components, independent of
//!   the containment tree
//!
//! Components are created externally (by a parser or user action) and
//! mutated in place by the engine. They reference each other by [`Id`] only;
//! the engine never embeds parent/child pointers in the persistent model and
//! instead rebuilds an ephemeral tree from container queries on every pass.

use std::rc::Rc;

use serde::Deserialize;

use crate::{
    geometry::{Point, Rect, Size},
    identifier::Id,
};

/// How a container arranges its direct children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutStrategy {
    /// Greedy collision-free packing over an expanding ring lattice.
    #[default]
    Packed,
    /// Children laid out one after another along a single axis.
    Flow,
}

/// The axis a [`LayoutStrategy::Flow`] container lays its children along.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowAxis {
    #[default]
    Horizontal,
    Vertical,
}

/// Immutable per-type metadata shared by all components of the same type.
///
/// Definitions are shared via `Rc` and never mutated by the engine. Which
/// strategy a container type uses is external configuration; the engine only
/// reads it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Definition {
    container: bool,
    strategy: LayoutStrategy,
    axis: FlowAxis,
    default_width: f32,
    default_height: f32,
    min_width: f32,
    min_height: f32,
    margin: f32,
    gap: f32,
}

impl Default for Definition {
    fn default() -> Self {
        Self {
            container: false,
            strategy: LayoutStrategy::default(),
            axis: FlowAxis::default(),
            default_width: 120.0,
            default_height: 60.0,
            min_width: 40.0,
            min_height: 30.0,
            margin: 10.0,
            gap: 10.0,
        }
    }
}

impl Definition {
    /// Creates a definition for a plain (non-container) component type
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a definition for a container type using the given strategy
    pub fn new_container(strategy: LayoutStrategy) -> Self {
        Self {
            container: true,
            strategy,
            ..Self::default()
        }
    }

    /// Sets the flow axis and returns the modified definition
    pub fn with_axis(mut self, axis: FlowAxis) -> Self {
        self.axis = axis;
        self
    }

    /// Sets the default size and returns the modified definition
    pub fn with_default_size(mut self, width: f32, height: f32) -> Self {
        self.default_width = width;
        self.default_height = height;
        self
    }

    /// Sets the minimum size and returns the modified definition
    pub fn with_min_size(mut self, width: f32, height: f32) -> Self {
        self.min_width = width;
        self.min_height = height;
        self
    }

    /// Sets the container inner margin and returns the modified definition
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the inter-child gap and returns the modified definition
    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    /// Whether components of this type can hold children
    pub fn container(&self) -> bool {
        self.container
    }

    /// The layout strategy for this type's children
    pub fn strategy(&self) -> LayoutStrategy {
        self.strategy
    }

    /// The flow axis used when the strategy is [`LayoutStrategy::Flow`]
    pub fn axis(&self) -> FlowAxis {
        self.axis
    }

    /// The size a component of this type takes when nothing has measured it
    pub fn default_size(&self) -> Size {
        Size::new(self.default_width, self.default_height)
    }

    /// The size floor a container of this type never shrinks below
    pub fn min_size(&self) -> Size {
        Size::new(self.min_width, self.min_height)
    }

    /// The inner margin between a container's border and its content
    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// The gap between sibling children (also the packing lattice spacing)
    pub fn gap(&self) -> f32 {
        self.gap
    }
}

/// Mutable position and size record of a component.
///
/// All fields are nullable until a layout pass computes them. The position
/// refers to the top-left corner, relative to the containing component's
/// padded interior (or the canvas for top-level components).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Placement {
    x: Option<f32>,
    y: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
}

impl Placement {
    /// Returns the x-coordinate if computed
    pub fn x(&self) -> Option<f32> {
        self.x
    }

    /// Returns the y-coordinate if computed
    pub fn y(&self) -> Option<f32> {
        self.y
    }

    /// Returns the width if computed
    pub fn width(&self) -> Option<f32> {
        self.width
    }

    /// Returns the height if computed
    pub fn height(&self) -> Option<f32> {
        self.height
    }

    /// Returns the position if both coordinates are computed
    pub fn position(&self) -> Option<Point> {
        Some(Point::new(self.x?, self.y?))
    }

    /// Returns the size if both dimensions are computed
    pub fn size(&self) -> Option<Size> {
        Some(Size::new(self.width?, self.height?))
    }

    /// Returns the full rectangle if position and size are both computed
    pub fn rect(&self) -> Option<Rect> {
        Some(Rect::new(self.position()?, self.size()?))
    }

    /// Sets the position (top-left corner)
    pub fn set_position(&mut self, position: Point) {
        self.x = Some(position.x());
        self.y = Some(position.y());
    }

    /// Sets the size
    pub fn set_size(&mut self, size: Size) {
        self.width = Some(size.width());
        self.height = Some(size.height());
    }
}

/// A placeable, possibly-containing visual unit.
///
/// Components carry a stable [`Id`], an optional reference to their
/// containing component, shared [`Definition`] metadata, and the mutable
/// [`Placement`] the engine writes. The containment relation is derived from
/// component state through a caller-supplied query, so a component holds at
/// most one container reference and the collection forms a forest.
#[derive(Debug, Clone)]
pub struct Component {
    id: Id,
    container: Option<Id>,
    definition: Rc<Definition>,
    placement: Placement,
}

impl Component {
    /// Creates a new component with the given identity and type definition
    pub fn new(id: Id, definition: Rc<Definition>) -> Self {
        Self {
            id,
            container: None,
            definition,
            placement: Placement::default(),
        }
    }

    /// Sets the containing component and returns the modified component
    pub fn with_container(mut self, container: Id) -> Self {
        self.container = Some(container);
        self
    }

    /// Returns the stable identifier of this component
    pub fn id(&self) -> Id {
        self.id
    }

    /// Returns the id of the containing component, if any
    pub fn container(&self) -> Option<Id> {
        self.container
    }

    /// Returns the shared type definition
    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    /// Returns the current placement record
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Returns a mutable reference to the placement record
    pub fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    /// Returns the placed size, falling back to the definition default.
    ///
    /// Containers get their real size from bottom-up propagation; until then
    /// (and for leaves that were never measured externally) the definition
    /// default stands in.
    pub fn measured_size(&self) -> Size {
        self.placement.size().unwrap_or(self.definition.default_size())
    }
}

/// A directed relation between two components, independent of containment.
///
/// Edges may connect components at different depths or under different
/// parents; the projection step resolves them onto a single hierarchy level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    source: Id,
    target: Id,
}

impl Edge {
    /// Creates a new edge from source to target
    pub fn new(source: Id, target: Id) -> Self {
        Self { source, target }
    }

    /// Returns the source component id
    pub fn source(&self) -> Id {
        self.source
    }

    /// Returns the target component id
    pub fn target(&self) -> Id {
        self.target
    }
}
