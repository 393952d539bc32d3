//! Linear flow placement along a single axis.

use trellis_core::{
    geometry::{Point, Size},
    model::{Component, FlowAxis},
};

use super::ContainerStrategy;

/// Lays children out one after another along the flow axis.
///
/// Children keep their array order; each is placed `gap` after the previous
/// one on the main axis, at `margin` on the cross axis. Order fully
/// determines placement, so no collision search is needed.
#[derive(Debug, Clone, Copy)]
pub struct Flow {
    axis: FlowAxis,
    margin: f32,
    gap: f32,
}

impl Flow {
    /// Creates a flow strategy for the given axis, margin and gap
    pub fn new(axis: FlowAxis, margin: f32, gap: f32) -> Self {
        Self { axis, margin, gap }
    }
}

impl ContainerStrategy for Flow {
    fn arrange(
        &self,
        components: &mut [Component],
        children: &[usize],
        _keep_positions: bool,
    ) -> Size {
        let mut main_cursor = self.margin;
        let mut extent = Size::default();

        for &child_idx in children {
            let size = components[child_idx].measured_size();
            let origin = match self.axis {
                FlowAxis::Horizontal => Point::new(main_cursor, self.margin),
                FlowAxis::Vertical => Point::new(self.margin, main_cursor),
            };
            components[child_idx].placement_mut().set_position(origin);

            extent = extent.max(Size::new(
                origin.x() + size.width(),
                origin.y() + size.height(),
            ));
            main_cursor += self.gap
                + match self.axis {
                    FlowAxis::Horizontal => size.width(),
                    FlowAxis::Vertical => size.height(),
                };
        }

        extent
    }
}
