// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only access to a network scene model.

use crossway_trajectory::Trajectory;

use crate::grid::GridLayout;
use crate::types::{NodeGeometry, NodeId, SegmentGeometry, SegmentId};

/// Handle length of a segment's centre curve, relative to its end distance.
pub const SEGMENT_SMOOTHNESS: f64 = 1.0 / 3.0;

/// Read-only view of a network and its segment grid.
///
/// Implemented by host scene models; Crossway never writes through it.
/// Lookups of ids that no longer exist return `None`.
pub trait NetworkView {
    /// Geometry of node `id`.
    fn node(&self, id: NodeId) -> Option<&NodeGeometry>;

    /// Geometry of segment `id`.
    fn segment(&self, id: SegmentId) -> Option<&SegmentGeometry>;

    /// Shape of the segment grid.
    fn grid_layout(&self) -> GridLayout;

    /// First segment linked in cell `(ix, iz)`.
    fn cell_head(&self, ix: u32, iz: u32) -> Option<SegmentId>;

    /// Successor of `id` in its cell's list.
    ///
    /// Host data may be malformed (for example cyclic); readers bound their
    /// walks.
    fn next_in_cell(&self, id: SegmentId) -> Option<SegmentId>;

    /// The centre curve of segment `id`, from its start node to its end node.
    fn segment_trajectory(&self, id: SegmentId) -> Option<Trajectory> {
        let segment = self.segment(id)?;
        let start = self.node(segment.start_node)?;
        let end = self.node(segment.end_node)?;
        Some(Trajectory::smooth(
            start.position,
            segment.start_direction,
            end.position,
            segment.end_direction,
            SEGMENT_SMOOTHNESS,
        ))
    }

    /// Distance from node `id`'s centre to where its segments begin.
    ///
    /// Uses the node's explicit offset when set, otherwise the widest
    /// connected half-width.
    fn corner_offset(&self, id: NodeId) -> Option<f64> {
        let node = self.node(id)?;
        if node.corner_offset > 0.0 {
            return Some(node.corner_offset);
        }
        Some(
            node.segments
                .iter()
                .filter_map(|&s| self.segment(s))
                .map(|s| s.half_width)
                .fold(0.0, f64::max),
        )
    }
}
