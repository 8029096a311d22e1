// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-size segment grid.
//!
//! The world is divided into `resolution × resolution` square cells centred
//! on the origin. Each cell holds an intrusive singly linked list of segment
//! ids: the cell stores the head, and every segment stores its successor.
//! This is the layout host scene models expose, so readers walk lists rather
//! than slices and must tolerate broken links.

use alloc::vec;
use alloc::vec::Vec;
use core::ops::RangeInclusive;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

use crate::types::SegmentId;

/// Shape of the segment grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    /// Edge length of a cell in world units. Must be strictly positive.
    pub cell_size: f64,
    /// Number of cells along each axis.
    pub resolution: u32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            cell_size: 64.0,
            resolution: 270,
        }
    }
}

impl GridLayout {
    /// Map a world coordinate to an unclamped cell coordinate along one axis.
    ///
    /// Rounds towards -∞ and saturates at the `i64` range.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Cell coordinates saturate; out-of-range values are clamped by callers."
    )]
    #[inline]
    pub fn cell_coord(&self, value: f64) -> i64 {
        debug_assert!(
            self.cell_size > 0.0,
            "grid cell_size must be strictly positive"
        );
        let t = value / self.cell_size + f64::from(self.resolution) * 0.5;
        // `as` saturates and maps NaN to zero.
        t.floor() as i64
    }

    /// Clamp a cell coordinate into the grid.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "The clamped value lies in 0..resolution, which fits in u32."
    )]
    #[inline]
    pub fn clamp_coord(&self, coord: i64) -> u32 {
        coord.clamp(0, i64::from(self.resolution.saturating_sub(1))) as u32
    }

    /// The cell containing `point`, clamped into the grid.
    pub fn cell_of(&self, point: Point) -> (u32, u32) {
        (
            self.clamp_coord(self.cell_coord(point.x)),
            self.clamp_coord(self.cell_coord(point.y)),
        )
    }

    /// Cell ranges covering `center ± half_extent` on both axes, clamped into
    /// the grid.
    pub fn window(
        &self,
        center: Point,
        half_extent: f64,
    ) -> (RangeInclusive<u32>, RangeInclusive<u32>) {
        let axis = |c: f64| {
            let lo = self.clamp_coord(self.cell_coord(c - half_extent));
            let hi = self.clamp_coord(self.cell_coord(c + half_extent));
            if lo <= hi { lo..=hi } else { hi..=lo }
        };
        (axis(center.x), axis(center.y))
    }

    #[inline]
    fn flat(&self, ix: u32, iz: u32) -> Option<usize> {
        (ix < self.resolution && iz < self.resolution)
            .then(|| iz as usize * self.resolution as usize + ix as usize)
    }
}

/// Linked-list segment grid.
#[derive(Clone, Debug)]
pub struct SegmentGrid {
    layout: GridLayout,
    heads: Vec<Option<SegmentId>>,
    links: Vec<Link>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Link {
    next: Option<SegmentId>,
    cell: Option<usize>,
}

impl SegmentGrid {
    /// Create an empty grid.
    pub fn new(layout: GridLayout) -> Self {
        let cells = layout.resolution as usize * layout.resolution as usize;
        Self {
            layout,
            heads: vec![None; cells],
            links: Vec::new(),
        }
    }

    /// The grid's shape.
    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// First segment in cell `(ix, iz)`.
    pub fn cell_head(&self, ix: u32, iz: u32) -> Option<SegmentId> {
        self.layout.flat(ix, iz).and_then(|i| self.heads[i])
    }

    /// Successor of `id` in its cell's list.
    pub fn next_in_cell(&self, id: SegmentId) -> Option<SegmentId> {
        self.links.get(id.idx()).and_then(|l| l.next)
    }

    /// Link `id` at the head of the cell containing `anchor`.
    ///
    /// A segment already in the grid is moved.
    pub fn insert(&mut self, id: SegmentId, anchor: Point) {
        self.remove(id);
        if self.links.len() <= id.idx() {
            self.links.resize_with(id.idx() + 1, Link::default);
        }
        let (ix, iz) = self.layout.cell_of(anchor);
        let Some(cell) = self.layout.flat(ix, iz) else {
            return;
        };
        self.links[id.idx()] = Link {
            next: self.heads[cell],
            cell: Some(cell),
        };
        self.heads[cell] = Some(id);
    }

    /// Unlink `id` from its cell. Unknown ids are ignored.
    pub fn remove(&mut self, id: SegmentId) {
        let Some(Link {
            next,
            cell: Some(cell),
        }) = self.links.get(id.idx()).copied()
        else {
            return;
        };
        self.links[id.idx()] = Link::default();

        if self.heads[cell] == Some(id) {
            self.heads[cell] = next;
            return;
        }
        let mut cursor = self.heads[cell];
        while let Some(current) = cursor {
            let link = &mut self.links[current.idx()];
            if link.next == Some(id) {
                link.next = next;
                return;
            }
            cursor = link.next;
        }
    }

    /// Segments in cell `(ix, iz)`, following at most `limit` links.
    pub fn cell_segments(&self, ix: u32, iz: u32, limit: usize) -> CellIter<'_> {
        CellIter {
            grid: self,
            next: self.cell_head(ix, iz),
            remaining: limit,
        }
    }
}

/// Iterator over one cell's linked list, bounded by a step limit.
#[derive(Clone, Debug)]
pub struct CellIter<'a> {
    grid: &'a SegmentGrid,
    next: Option<SegmentId>,
    remaining: usize,
}

impl Iterator for CellIter<'_> {
    type Item = SegmentId;

    fn next(&mut self) -> Option<SegmentId> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next?;
        self.next = self.grid.next_in_cell(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn small() -> GridLayout {
        GridLayout {
            cell_size: 10.0,
            resolution: 8,
        }
    }

    #[test]
    fn cell_coord_is_centred_and_floors() {
        let layout = small();
        assert_eq!(layout.cell_coord(0.0), 4);
        assert_eq!(layout.cell_coord(-0.1), 3);
        assert_eq!(layout.cell_coord(9.9), 4);
        assert_eq!(layout.cell_coord(10.0), 5);
        assert_eq!(layout.cell_coord(-40.0), 0);
        assert_eq!(layout.cell_coord(-41.0), -1);
    }

    #[test]
    fn cell_coord_saturates_and_clamps() {
        let layout = small();
        assert_eq!(layout.cell_coord(1e300), i64::MAX);
        assert_eq!(layout.cell_coord(-1e300), i64::MIN);
        assert_eq!(layout.clamp_coord(i64::MAX), 7);
        assert_eq!(layout.clamp_coord(i64::MIN), 0);
        assert_eq!(layout.cell_of(Point::new(1e9, -1e9)), (7, 0));
    }

    #[test]
    fn window_is_clamped_to_bounds() {
        let layout = small();
        let (xs, zs) = layout.window(Point::new(0.0, 0.0), 16.0);
        assert_eq!(xs, 2..=5);
        assert_eq!(zs, 2..=5);

        let (xs, zs) = layout.window(Point::new(-39.0, 39.0), 16.0);
        assert_eq!(xs, 0..=1);
        assert_eq!(zs, 6..=7);
    }

    #[test]
    fn insert_links_at_head_and_remove_unlinks() {
        let mut grid = SegmentGrid::new(small());
        let p = Point::new(1.0, 1.0);
        grid.insert(SegmentId(0), p);
        grid.insert(SegmentId(3), p);
        grid.insert(SegmentId(5), p);

        let ids: Vec<_> = grid.cell_segments(4, 4, 100).collect();
        assert_eq!(ids, [SegmentId(5), SegmentId(3), SegmentId(0)]);

        grid.remove(SegmentId(3));
        let ids: Vec<_> = grid.cell_segments(4, 4, 100).collect();
        assert_eq!(ids, [SegmentId(5), SegmentId(0)]);

        grid.remove(SegmentId(5));
        let ids: Vec<_> = grid.cell_segments(4, 4, 100).collect();
        assert_eq!(ids, [SegmentId(0)]);

        // Unknown and already-removed ids are ignored.
        grid.remove(SegmentId(5));
        grid.remove(SegmentId(42));
        assert_eq!(grid.cell_head(4, 4), Some(SegmentId(0)));
    }

    #[test]
    fn reinsert_moves_between_cells() {
        let mut grid = SegmentGrid::new(small());
        grid.insert(SegmentId(1), Point::new(1.0, 1.0));
        grid.insert(SegmentId(1), Point::new(25.0, 1.0));
        assert_eq!(grid.cell_head(4, 4), None);
        assert_eq!(grid.cell_head(6, 4), Some(SegmentId(1)));
    }

    #[test]
    fn cell_iteration_is_bounded() {
        let mut grid = SegmentGrid::new(small());
        for i in 0..10 {
            grid.insert(SegmentId(i), Point::new(1.0, 1.0));
        }
        assert_eq!(grid.cell_segments(4, 4, 3).count(), 3);
        assert_eq!(grid.cell_segments(4, 4, 100).count(), 10);
        assert_eq!(grid.cell_segments(99, 4, 100).count(), 0);
    }
}
