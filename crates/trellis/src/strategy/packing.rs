//! Greedy collision-free packing over an expanding ring lattice.

use log::trace;

use trellis_core::{
    geometry::{Point, Rect, Size},
    model::Component,
};

use super::ContainerStrategy;

/// The default container strategy: place each child at the first
/// collision-free lattice point found by scanning expanding square rings.
///
/// Candidate points form a square lattice with spacing `gap`, offset by
/// `margin` from the container's interior origin. Ring `0` is the single
/// point `(margin, margin)`; ring `i` is the set of lattice points at
/// Chebyshev distance `i` from the origin. A single cursor advances
/// monotonically through the candidate sequence and is shared by all queued
/// children - after a child is placed, the scan resumes at the *next*
/// candidate rather than restarting at ring `0`. This shared cursor is what
/// produces the characteristic left-to-right, outward-spiraling packing.
#[derive(Debug, Clone, Copy)]
pub struct Packing {
    margin: f32,
    gap: f32,
}

impl Packing {
    /// Creates a packing strategy with the given interior margin and
    /// lattice spacing
    pub fn new(margin: f32, gap: f32) -> Self {
        Self { margin, gap }
    }
}

impl ContainerStrategy for Packing {
    fn arrange(
        &self,
        components: &mut [Component],
        children: &[usize],
        keep_positions: bool,
    ) -> Size {
        let mut placed: Vec<Rect> = Vec::with_capacity(children.len());
        let mut extent = Size::default();

        // Pre-placed children become obstacles; the rest queue up in their
        // original order.
        let mut queue: Vec<usize> = Vec::with_capacity(children.len());
        for &child_idx in children {
            let component = &components[child_idx];
            match component.placement().position() {
                Some(position) if keep_positions => {
                    let rect = Rect::new(position, component.measured_size());
                    extent = extent.max(Size::new(rect.max_x(), rect.max_y()));
                    placed.push(rect);
                }
                _ => queue.push(child_idx),
            }
        }

        let mut cursor = RingCursor::new();
        for child_idx in queue {
            let size = components[child_idx].measured_size();
            loop {
                let (a, b) = cursor.advance();
                let origin = Point::new(
                    self.margin + a as f32 * cursor.step(self.gap),
                    self.margin + b as f32 * cursor.step(self.gap),
                );
                let candidate = Rect::new(origin, size);
                if placed.iter().any(|obstacle| obstacle.overlaps(&candidate)) {
                    continue;
                }
                trace!(
                    child:% = components[child_idx].id(),
                    x = origin.x(),
                    y = origin.y();
                    "Placed child",
                );
                components[child_idx].placement_mut().set_position(origin);
                extent = extent.max(Size::new(candidate.max_x(), candidate.max_y()));
                placed.push(candidate);
                break;
            }
        }

        extent
    }
}

/// Cursor over the deterministic candidate-point sequence.
///
/// Ring `0` yields `(0, 0)`. Ring `i > 0` yields, in order,
/// `(i,0), (0,i), (i,1), (1,i), …, (i,i-1), (i-1,i), (i,i)`: alternating
/// points on the two far edges of the growing square, so every lattice
/// point at Chebyshev distance `i` is visited exactly once, nearest the
/// origin edges first.
#[derive(Debug)]
struct RingCursor {
    ring: usize,
    index: usize,
}

impl RingCursor {
    fn new() -> Self {
        Self { ring: 0, index: 0 }
    }

    /// Effective lattice spacing. A non-positive gap would pin every
    /// candidate to the origin and stall the scan.
    fn step(&self, gap: f32) -> f32 {
        if gap > 0.0 { gap } else { 1.0 }
    }

    /// Returns the current lattice point and moves the cursor forward
    fn advance(&mut self) -> (usize, usize) {
        let ring = self.ring;
        let index = self.index;

        let ring_len = if ring == 0 { 1 } else { 2 * ring + 1 };
        self.index += 1;
        if self.index == ring_len {
            self.ring += 1;
            self.index = 0;
        }

        if ring == 0 {
            (0, 0)
        } else if index == 2 * ring {
            (ring, ring)
        } else if index % 2 == 0 {
            (ring, index / 2)
        } else {
            (index / 2, ring)
        }
    }
}
