// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-edge corner records.

use core::f64::consts::{PI, TAU};

use crossway_network::{NetworkView, NodeId, SegmentGeometry, SegmentId};
use crossway_trajectory::{Trajectory, normalize_or_zero};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};
use smallvec::SmallVec;

/// Corner lists of typical junctions fit inline.
pub(crate) type Corners = SmallVec<[CornerData; 4]>;

/// Handle length of a single-corner end cap, relative to the half-width.
///
/// Two handles of `4/3 · r` perpendicular to a chord of `2r` give a cap that
/// bulges about `r` past the chord.
const END_CAP_HANDLE: f64 = 4.0 / 3.0;

/// Gaps wider than a half turn by more than this wrap around the hub.
const REFLEX_TOLERANCE: f64 = 1e-9;

/// Where one connected edge meets a selection's boundary.
///
/// The boundary crosses the edge at `position`, from `right` to `left`.
/// "Left" is counter-clockwise of the outward `direction`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CornerData {
    /// The edge this corner sits on.
    pub segment: SegmentId,
    /// Absolute heading of `direction`, in radians.
    pub heading: f64,
    /// Point on the edge's centre line.
    pub position: Point,
    /// Unit direction pointing out of the selection along the edge.
    pub direction: Vec2,
    /// Boundary point counter-clockwise of `position`.
    pub left: Point,
    /// Boundary point clockwise of `position`.
    pub right: Point,
    /// Unit direction the boundary takes when leaving `left`.
    pub left_direction: Vec2,
    /// Unit direction the boundary takes when arriving at `right`, reversed.
    pub right_direction: Vec2,
    /// Handle length of the piece leaving `left`.
    pub left_magnitude: f64,
    /// Handle length of the piece arriving at `right`.
    pub right_magnitude: f64,
    /// Half of the edge's width.
    pub half_width: f64,
}

impl CornerData {
    /// A corner on `segment` at `position`, facing `direction`.
    ///
    /// Returns `None` for a degenerate direction.
    pub fn new(segment: SegmentId, position: Point, direction: Vec2, half_width: f64) -> Option<Self> {
        let direction = normalize_or_zero(direction);
        if direction == Vec2::ZERO || !position.is_finite() {
            return None;
        }
        let half_width = half_width.max(0.0);
        let side = left_normal(direction) * half_width;
        Some(Self {
            segment,
            heading: direction.atan2(),
            position,
            direction,
            left: position + side,
            right: position - side,
            left_direction: -direction,
            right_direction: -direction,
            left_magnitude: 0.0,
            right_magnitude: 0.0,
            half_width,
        })
    }

    /// How far `position` lies from `hub` along the outward direction.
    pub(crate) fn reach(&self, hub: Point) -> f64 {
        (self.position - hub).dot(self.direction)
    }

    /// A point just inside the data line, on the edge's centre line.
    pub(crate) fn inset_point(&self) -> Point {
        self.position - self.direction * (self.half_width * 0.5).min(1.0)
    }

    /// Move both boundary points outwards by `distance`.
    pub(crate) fn push_out(&mut self, distance: f64) {
        let shift = self.direction * distance;
        self.position += shift;
        self.left += shift;
        self.right += shift;
    }
}

/// Counter-clockwise perpendicular of `v`.
#[inline]
pub(crate) fn left_normal(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// One corner per edge connected to `node`, sorted by heading.
pub(crate) fn node_corners(view: &(impl NetworkView + ?Sized), node: NodeId) -> Corners {
    let Some(geometry) = view.node(node) else {
        return Corners::new();
    };
    let offset = view.corner_offset(node).unwrap_or_default();
    let mut corners: Corners = geometry
        .segments
        .iter()
        .filter_map(|&id| {
            let segment = view.segment(id)?;
            let direction = normalize_or_zero(segment.direction_at(node)?);
            CornerData::new(
                id,
                geometry.position + direction * offset,
                direction,
                segment.half_width,
            )
        })
        .collect();
    sort_by_heading(&mut corners);
    corners
}

/// The start and end corners of `id`, facing away from the segment.
pub(crate) fn segment_corners(
    view: &(impl NetworkView + ?Sized),
    id: SegmentId,
    segment: &SegmentGeometry,
) -> Corners {
    let mut corners = Corners::new();
    for (node, inward) in [
        (segment.start_node, segment.start_direction),
        (segment.end_node, segment.end_direction),
    ] {
        let Some(position) = view.node(node).map(|n| n.position) else {
            continue;
        };
        let offset = view.corner_offset(node).unwrap_or_default();
        let inward = normalize_or_zero(inward);
        if let Some(corner) =
            CornerData::new(id, position + inward * offset, -inward, segment.half_width)
        {
            corners.push(corner);
        }
    }
    sort_by_heading(&mut corners);
    corners
}

fn sort_by_heading(corners: &mut Corners) {
    corners.sort_by(|a, b| a.heading.total_cmp(&b.heading));
}

/// Counter-clockwise angle from `a`'s heading to `b`'s, in `[0, 2π)`.
fn gap(a: &CornerData, b: &CornerData) -> f64 {
    let gap = b.heading - a.heading;
    if gap < 0.0 { gap + TAU } else { gap }
}

/// Push the corners of a junction at `hub` out along their edges until the
/// edges of neighbouring corners no longer overlap.
///
/// For a gap `θ < π` the left edge of `a` meets the right edge of `b` at
/// `(w_b + w_a cos θ) / sin θ` along `a`, and symmetrically along `b`.
/// Corners are moved at least that far, capped at the distance where equal
/// edges would meet so nearly opposite edges of different widths stay put.
pub(crate) fn separate_arms(corners: &mut [CornerData], hub: Point) {
    let n = corners.len();
    if n < 2 {
        return;
    }
    let mut reach: SmallVec<[f64; 4]> = corners.iter().map(|c| c.reach(hub)).collect();
    for i in 0..n {
        let j = (i + 1) % n;
        let (a, b) = (&corners[i], &corners[j]);
        let theta = gap(a, b);
        if theta <= 0.0 || theta >= PI {
            continue;
        }
        let (sin, cos) = theta.sin_cos();
        let cap = a.half_width.max(b.half_width) / (0.5 * theta).sin();
        let need_a = ((b.half_width + a.half_width * cos) / sin).min(cap);
        let need_b = ((a.half_width + b.half_width * cos) / sin).min(cap);
        reach[i] = reach[i].max(need_a);
        reach[j] = reach[j].max(need_b);
    }
    for (corner, wanted) in corners.iter_mut().zip(reach) {
        let current = corner.reach(hub);
        if wanted > current {
            corner.push_out(wanted - current);
        }
    }
}

/// Set the handle magnitudes of every piece joining consecutive corners.
///
/// With a `hub`, pieces spanning more than a half turn get handles long
/// enough to reach back around it, growing with how far the gap exceeds the
/// half turn.
pub(crate) fn assign_magnitudes(corners: &mut [CornerData], smoothness: f64, hub: Option<Point>) {
    let n = corners.len();
    if n == 1 {
        let cap = corners[0].half_width * END_CAP_HANDLE;
        corners[0].left_magnitude = cap;
        corners[0].right_magnitude = cap;
        return;
    }
    for i in 0..n {
        let j = (i + 1) % n;
        let m = corners[i].left.distance(corners[j].right) * smoothness;
        let (mut left, mut right) = (m, m);
        if let Some(hub) = hub {
            let theta = gap(&corners[i], &corners[j]);
            if theta > PI + REFLEX_TOLERANCE {
                let wrap = ((theta - PI) / PI).min(1.0);
                let (a, b) = (&corners[i], &corners[j]);
                left = left.max(wrap * (a.reach(hub) + a.half_width));
                right = right.max(wrap * (b.reach(hub) + b.half_width));
            }
        }
        corners[i].left_magnitude = left;
        corners[j].right_magnitude = right;
    }
}

/// The curved piece from corner `a`'s left point to corner `b`'s right point.
///
/// With a single corner, `a` and `b` are the same and this is its end cap.
pub(crate) fn between(a: &CornerData, b: &CornerData) -> Trajectory {
    Trajectory::curve(
        a.left,
        a.left + a.left_direction * a.left_magnitude,
        b.right + b.right_direction * b.right_magnitude,
        b.right,
    )
}

/// The straight piece across a corner, from its right point to its left.
pub(crate) fn data_line(c: &CornerData) -> Trajectory {
    Trajectory::section(c.right, c.left)
}

/// Single corners sit just inside their edge; otherwise the mean of the
/// between pieces' midpoints.
pub(crate) fn centroid(corners: &[CornerData]) -> Point {
    match corners {
        [] => Point::ORIGIN,
        [c] => c.inset_point(),
        _ => {
            let n = corners.len();
            let sum = (0..n).fold(Vec2::ZERO, |acc, i| {
                acc + between(&corners[i], &corners[(i + 1) % n])
                    .position(0.5)
                    .to_vec2()
            });
            (sum / n as f64).to_point()
        }
    }
}

/// Push boundary points that sit closer than `min_clearance` to `centre`,
/// measured along their corner's outward direction.
pub(crate) fn apply_clearance(corners: &mut [CornerData], centre: Point, min_clearance: f64) {
    if corners.len() < 2 {
        return;
    }
    for corner in corners {
        let reach = [corner.left, corner.right]
            .into_iter()
            .map(|p| (p - centre).dot(corner.direction))
            .fold(f64::INFINITY, f64::min);
        if reach < min_clearance {
            corner.push_out(min_clearance - reach);
        }
    }
}
