//! Built-in single-container placement strategies.
//!
//! A strategy arranges one container's direct children and reports the
//! resulting content extent; it never touches the container itself or any
//! deeper descendant. Which strategy a container uses is external metadata
//! on its [`Definition`](trellis_core::model::Definition); the bottom-up
//! pass in [`arrange`](crate::arrange) dispatches accordingly.
//!
//! Two implementations exist:
//!
//! - [`Packing`] - greedy collision-free placement over an expanding ring
//!   lattice (the default)
//! - [`Flow`] - children laid out along one axis in array order
//!
//! Both guarantee that no two sibling rectangles overlap. The delegating
//! back-end in [`engines`](crate::engines) replaces this trait entirely
//! rather than implementing it, since it arranges whole hierarchy levels at
//! once.

mod flow;
mod packing;

pub use flow::Flow;
pub use packing::Packing;

use trellis_core::{geometry::Size, model::Component};

/// A placement strategy for one container's direct children.
pub trait ContainerStrategy {
    /// Assigns a position to every child and returns the content extent.
    ///
    /// `children` holds indices into `components` identifying the
    /// container's direct children, in their original order. The returned
    /// extent is the running maximum of `x + width` / `y + height` over all
    /// placed children, measured from the container's interior origin.
    ///
    /// With `keep_positions` set, children that already carry a position are
    /// left untouched and act as obstacles (meaningful for [`Packing`];
    /// [`Flow`] placement is fully determined by order and ignores the
    /// flag).
    fn arrange(
        &self,
        components: &mut [Component],
        children: &[usize],
        keep_positions: bool,
    ) -> Size;
}
