// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element identifiers, flags, and per-element geometry.

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

/// Identifier of a junction node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub u32);

impl NodeId {
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Identifier of a segment connecting two nodes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SegmentId(pub u32);

impl SegmentId {
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// State flags shared by nodes and segments.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element exists and is in use.
        const ACTIVE      = 0b0000_0001;
        /// Element lives on the underground layer.
        const UNDERGROUND = 0b0000_0010;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::ACTIVE
    }
}

bitflags::bitflags! {
    /// Network categories. A segment carries exactly one; filters hold sets.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Categories: u16 {
        /// Roads for vehicles.
        const ROAD       = 0b0000_0001;
        /// Rail tracks.
        const RAIL       = 0b0000_0010;
        /// Footpaths and bike lanes.
        const PEDESTRIAN = 0b0000_0100;
        /// Canals and shipping lanes.
        const WATERWAY   = 0b0000_1000;
        /// Power lines, pipes, and similar.
        const UTILITY    = 0b0001_0000;
    }
}

impl Default for Categories {
    fn default() -> Self {
        Self::ROAD
    }
}

/// Geometry of a junction node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeGeometry {
    /// Ground-plane position (world x, world z).
    pub position: Point,
    /// World height of the node.
    pub height: f64,
    /// State flags.
    pub flags: ElementFlags,
    /// Distance from the node centre to where connected segments begin.
    ///
    /// Zero means "derive from the widest connected segment".
    pub corner_offset: f64,
    /// Connected segments, in insertion order.
    pub segments: SmallVec<[SegmentId; 4]>,
}

impl NodeGeometry {
    /// An active node with no connections.
    pub fn new(position: Point, height: f64) -> Self {
        Self {
            position,
            height,
            flags: ElementFlags::default(),
            corner_offset: 0.0,
            segments: SmallVec::new(),
        }
    }
}

/// Geometry of a segment between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentGeometry {
    /// Node at `t = 0`.
    pub start_node: NodeId,
    /// Node at `t = 1`.
    pub end_node: NodeId,
    /// Unit direction leaving the start node into the segment.
    pub start_direction: Vec2,
    /// Unit direction leaving the end node into the segment.
    pub end_direction: Vec2,
    /// Half of the segment's width.
    pub half_width: f64,
    /// State flags.
    pub flags: ElementFlags,
    /// Network category.
    pub category: Categories,
}

impl SegmentGeometry {
    /// The end node other than `node`, if `node` is one of this segment's ends.
    pub fn other_node(&self, node: NodeId) -> Option<NodeId> {
        if node == self.start_node {
            Some(self.end_node)
        } else if node == self.end_node {
            Some(self.start_node)
        } else {
            None
        }
    }

    /// Direction leaving `node` into this segment.
    pub fn direction_at(&self, node: NodeId) -> Option<Vec2> {
        if node == self.start_node {
            Some(self.start_direction)
        } else if node == self.end_node {
            Some(self.end_direction)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment() -> SegmentGeometry {
        SegmentGeometry {
            start_node: NodeId(1),
            end_node: NodeId(2),
            start_direction: Vec2::new(1.0, 0.0),
            end_direction: Vec2::new(-1.0, 0.0),
            half_width: 4.0,
            flags: ElementFlags::default(),
            category: Categories::ROAD,
        }
    }

    #[test]
    fn other_node_and_direction() {
        let s = segment();
        assert_eq!(s.other_node(NodeId(1)), Some(NodeId(2)));
        assert_eq!(s.other_node(NodeId(2)), Some(NodeId(1)));
        assert_eq!(s.other_node(NodeId(3)), None);
        assert_eq!(s.direction_at(NodeId(2)), Some(Vec2::new(-1.0, 0.0)));
        assert_eq!(s.direction_at(NodeId(9)), None);
    }

    #[test]
    fn default_flags_are_active_surface() {
        let flags = ElementFlags::default();
        assert!(flags.contains(ElementFlags::ACTIVE));
        assert!(!flags.contains(ElementFlags::UNDERGROUND));
    }
}
