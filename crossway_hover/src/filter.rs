// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover eligibility.

use crossway_network::{Categories, ElementFlags, NodeGeometry, NodeId, SegmentGeometry, SegmentId};

/// Decides which elements may be hovered.
///
/// Hosts implement this to follow their view layers and tool modes; the
/// tester asks it before testing any candidate.
pub trait HoverFilter {
    /// Whether node `id` may be hovered.
    fn accept_node(&self, id: NodeId, node: &NodeGeometry) -> bool;

    /// Whether segment `id` may be hovered.
    fn accept_segment(&self, id: SegmentId, segment: &SegmentGeometry) -> bool;
}

/// Active elements on one layer, segments restricted to some categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefaultFilter {
    /// Segment categories that may be hovered.
    pub categories: Categories,
    /// Whether the underground layer is the one being viewed.
    pub underground: bool,
}

impl Default for DefaultFilter {
    fn default() -> Self {
        Self {
            categories: Categories::all(),
            underground: false,
        }
    }
}

impl DefaultFilter {
    fn on_layer(&self, flags: ElementFlags) -> bool {
        flags.contains(ElementFlags::ACTIVE)
            && flags.contains(ElementFlags::UNDERGROUND) == self.underground
    }
}

impl HoverFilter for DefaultFilter {
    fn accept_node(&self, _: NodeId, node: &NodeGeometry) -> bool {
        self.on_layer(node.flags)
    }

    fn accept_segment(&self, _: SegmentId, segment: &SegmentGeometry) -> bool {
        self.on_layer(segment.flags) && self.categories.intersects(segment.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Vec2};

    fn segment(flags: ElementFlags, category: Categories) -> SegmentGeometry {
        SegmentGeometry {
            start_node: NodeId(0),
            end_node: NodeId(1),
            start_direction: Vec2::new(1.0, 0.0),
            end_direction: Vec2::new(-1.0, 0.0),
            half_width: 2.0,
            flags,
            category,
        }
    }

    #[test]
    fn layer_and_category_gate_segments() {
        let surface = DefaultFilter::default();
        let rail_only = DefaultFilter {
            categories: Categories::RAIL,
            ..DefaultFilter::default()
        };
        let below = DefaultFilter {
            underground: true,
            ..DefaultFilter::default()
        };
        let road = segment(ElementFlags::ACTIVE, Categories::ROAD);
        let tunnel = segment(ElementFlags::ACTIVE | ElementFlags::UNDERGROUND, Categories::ROAD);
        let retired = segment(ElementFlags::empty(), Categories::ROAD);

        assert!(surface.accept_segment(SegmentId(0), &road));
        assert!(!rail_only.accept_segment(SegmentId(0), &road));
        assert!(!surface.accept_segment(SegmentId(0), &tunnel));
        assert!(below.accept_segment(SegmentId(0), &tunnel));
        assert!(!surface.accept_segment(SegmentId(0), &retired));
    }

    #[test]
    fn nodes_ignore_categories() {
        let rail_only = DefaultFilter {
            categories: Categories::RAIL,
            ..DefaultFilter::default()
        };
        let mut node = NodeGeometry::new(Point::ORIGIN, 0.0);
        assert!(rail_only.accept_node(NodeId(0), &node));
        node.flags = ElementFlags::empty();
        assert!(!rail_only.accept_node(NodeId(0), &node));
    }
}
