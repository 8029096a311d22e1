// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory reference store.

use alloc::vec::Vec;

use crossway_trajectory::normalize_or_zero;
use kurbo::{Point, Vec2};

use crate::grid::{GridLayout, SegmentGrid};
use crate::types::{Categories, ElementFlags, NodeGeometry, NodeId, SegmentGeometry, SegmentId};
use crate::view::NetworkView;

/// A small network store implementing [`NetworkView`].
///
/// Ids are handed out sequentially and never reused, so a removed element
/// stays absent for the lifetime of the store. Segments are linked into the
/// grid cell containing the midpoint of their centre curve.
#[derive(Clone, Debug)]
pub struct Network {
    nodes: Vec<Option<NodeGeometry>>,
    segments: Vec<Option<SegmentGeometry>>,
    grid: SegmentGrid,
}

impl Default for Network {
    fn default() -> Self {
        Self::new(GridLayout::default())
    }
}

impl Network {
    /// Create an empty network over a grid of the given shape.
    pub fn new(layout: GridLayout) -> Self {
        Self {
            nodes: Vec::new(),
            segments: Vec::new(),
            grid: SegmentGrid::new(layout),
        }
    }

    /// The segment grid.
    pub fn grid(&self) -> &SegmentGrid {
        &self.grid
    }

    /// Add an active node at ground position `position` and world `height`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Stores beyond u32::MAX elements are not supported."
    )]
    pub fn add_node(&mut self, position: Point, height: f64) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(NodeGeometry::new(position, height)));
        id
    }

    /// Add a straight segment between two existing nodes.
    ///
    /// Returns `None` if either node is missing or both ends coincide.
    pub fn add_segment(&mut self, start: NodeId, end: NodeId, half_width: f64) -> Option<SegmentId> {
        let a = self.node(start)?.position;
        let b = self.node(end)?.position;
        let dir = normalize_or_zero(b - a);
        if dir == Vec2::ZERO {
            return None;
        }
        self.add_curved_segment(start, end, dir, -dir, half_width)
    }

    /// Add a segment with explicit end directions.
    ///
    /// Each direction points from its node into the segment and is
    /// normalized here. Returns `None` if either node is missing, the ends
    /// are the same node, or a direction is degenerate.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Stores beyond u32::MAX elements are not supported."
    )]
    pub fn add_curved_segment(
        &mut self,
        start: NodeId,
        end: NodeId,
        start_direction: Vec2,
        end_direction: Vec2,
        half_width: f64,
    ) -> Option<SegmentId> {
        if start == end || self.node(start).is_none() || self.node(end).is_none() {
            return None;
        }
        let start_direction = normalize_or_zero(start_direction);
        let end_direction = normalize_or_zero(end_direction);
        if start_direction == Vec2::ZERO || end_direction == Vec2::ZERO {
            return None;
        }

        let id = SegmentId(self.segments.len() as u32);
        self.segments.push(Some(SegmentGeometry {
            start_node: start,
            end_node: end,
            start_direction,
            end_direction,
            half_width: half_width.max(0.0),
            flags: ElementFlags::default(),
            category: Categories::default(),
        }));
        for node in [start, end] {
            if let Some(n) = self.node_mut(node) {
                n.segments.push(id);
            }
        }
        if let Some(mid) = self.segment_trajectory(id).map(|t| t.position(0.5)) {
            self.grid.insert(id, mid);
        }
        Some(id)
    }

    /// Remove a segment and detach it from its nodes. Returns the removed
    /// geometry.
    pub fn remove_segment(&mut self, id: SegmentId) -> Option<SegmentGeometry> {
        let segment = self.segments.get_mut(id.idx())?.take()?;
        self.grid.remove(id);
        for node in [segment.start_node, segment.end_node] {
            if let Some(n) = self.node_mut(node) {
                n.segments.retain(|s| *s != id);
            }
        }
        Some(segment)
    }

    /// Remove a node together with every segment connected to it.
    pub fn remove_node(&mut self, id: NodeId) -> Option<NodeGeometry> {
        let connected = self.node(id)?.segments.clone();
        for segment in connected {
            self.remove_segment(segment);
        }
        self.nodes.get_mut(id.idx())?.take()
    }

    /// Replace a node's flags. Returns `false` if the node is missing.
    pub fn set_node_flags(&mut self, id: NodeId, flags: ElementFlags) -> bool {
        self.node_mut(id).map(|n| n.flags = flags).is_some()
    }

    /// Set a node's explicit corner offset; zero derives it from the widest
    /// connected segment. Returns `false` if the node is missing.
    pub fn set_node_corner_offset(&mut self, id: NodeId, offset: f64) -> bool {
        self.node_mut(id)
            .map(|n| n.corner_offset = offset.max(0.0))
            .is_some()
    }

    /// Replace a segment's flags. Returns `false` if the segment is missing.
    pub fn set_segment_flags(&mut self, id: SegmentId, flags: ElementFlags) -> bool {
        self.segment_mut(id).map(|s| s.flags = flags).is_some()
    }

    /// Replace a segment's category. Returns `false` if the segment is
    /// missing.
    pub fn set_segment_category(&mut self, id: SegmentId, category: Categories) -> bool {
        self.segment_mut(id).map(|s| s.category = category).is_some()
    }

    /// Live node ids in ascending order.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Ids were assigned from u32 indices."
    )]
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_some())
            .map(|(i, _)| NodeId(i as u32))
    }

    /// Live segment ids in ascending order.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Ids were assigned from u32 indices."
    )]
    pub fn segment_ids(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| SegmentId(i as u32))
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeGeometry> {
        self.nodes.get_mut(id.idx()).and_then(Option::as_mut)
    }

    fn segment_mut(&mut self, id: SegmentId) -> Option<&mut SegmentGeometry> {
        self.segments.get_mut(id.idx()).and_then(Option::as_mut)
    }
}

impl NetworkView for Network {
    fn node(&self, id: NodeId) -> Option<&NodeGeometry> {
        self.nodes.get(id.idx()).and_then(Option::as_ref)
    }

    fn segment(&self, id: SegmentId) -> Option<&SegmentGeometry> {
        self.segments.get(id.idx()).and_then(Option::as_ref)
    }

    fn grid_layout(&self) -> GridLayout {
        self.grid.layout()
    }

    fn cell_head(&self, ix: u32, iz: u32) -> Option<SegmentId> {
        self.grid.cell_head(ix, iz)
    }

    fn next_in_cell(&self, id: SegmentId) -> Option<SegmentId> {
        self.grid.next_in_cell(id)
    }
}
