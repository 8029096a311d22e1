// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay contours for highlighting a selection.

use alloc::vec::Vec;
use core::f64::consts::PI;

use crossway_trajectory::{Trajectory, normalize_or_zero};
use kurbo::{BezPath, Point, Vec2};

use crate::corner::left_normal;
use crate::selection::{BoundaryPiece, Selection};
use crate::triangulate::{signed_area2, triangulate};

/// Pieces shorter than this contribute no points.
const DEGENERATE_LENGTH: f64 = 1e-9;

/// Consecutive contour points closer than this are merged.
const DEDUP_DISTANCE: f64 = 1e-9;

/// Below this `1 + cos θ`, joints fall back to a unit bevel offset.
const MIN_MITER_DENOM: f64 = 0.25;

/// How an overlay contour is derived from a selection boundary.
#[derive(Clone, Copy, Debug)]
pub struct OverlayStyle {
    /// Width of the highlight border; the contour is inset by half of it.
    pub border_width: f64,
    /// Largest turning angle of one contour piece, in radians.
    pub max_turn_angle: f64,
    /// Longest contour piece, in world units.
    pub max_piece_length: f64,
    /// How often a boundary piece may be halved.
    pub max_split_depth: u32,
    /// Whether to triangulate the contour for a filled overlay.
    pub fill: bool,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            border_width: 1.0,
            max_turn_angle: PI / 12.0,
            max_piece_length: 4.0,
            max_split_depth: 5,
            fill: true,
        }
    }
}

/// A renderable ring of points at a selection's height.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayContour {
    /// World height of the contour plane.
    pub height: f64,
    /// Ground-plane ring, same winding as the boundary, not repeated at the
    /// end.
    pub points: Vec<Point>,
    /// Counter-clockwise triangles indexing into `points`. Empty unless the
    /// style asked for a fill.
    pub triangles: Vec<[usize; 3]>,
}

impl OverlayContour {
    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.points.len() < 3
    }

    /// The ring as a closed polyline path.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut points = self.points.iter();
        if let Some(&first) = points.next() {
            path.move_to(first);
            for &p in points {
                path.line_to(p);
            }
            path.close_path();
        }
        path
    }
}

impl Selection {
    /// Build the overlay contour of this selection.
    pub fn render(&self, style: &OverlayStyle) -> OverlayContour {
        let points = inset_ring(self.boundary().pieces(), style);
        let triangles = if style.fill {
            triangulate(&points)
        } else {
            Vec::new()
        };
        OverlayContour {
            height: self.height(),
            points,
            triangles,
        }
    }
}

/// Parameters splitting `trajectory` into pieces no longer and no more
/// curved than `style` allows. Starts at `0` and ends at `1`.
fn breakpoints(trajectory: &Trajectory, style: &OverlayStyle) -> Vec<f64> {
    let mut out = Vec::new();
    out.push(0.0);
    if let Trajectory::Curve(_) = trajectory {
        split(trajectory, 0.0, 1.0, style, 0, &mut out);
    } else {
        out.push(1.0);
    }
    out
}

fn split(trajectory: &Trajectory, t0: f64, t1: f64, style: &OverlayStyle, depth: u32, out: &mut Vec<f64>) {
    let piece = trajectory.cut(t0, t1);
    let flat = piece.turning_angle() <= style.max_turn_angle
        && piece.estimated_length() <= style.max_piece_length;
    if flat || depth >= style.max_split_depth {
        out.push(t1);
        return;
    }
    let mid = 0.5 * (t0 + t1);
    split(trajectory, t0, mid, style, depth + 1, out);
    split(trajectory, mid, t1, style, depth + 1, out);
}

/// Offset direction at a joint between pieces with normals `n1` and `n2`,
/// scaled so both offset edges meet there.
fn miter(n1: Vec2, n2: Vec2) -> Vec2 {
    let denom = 1.0 + n1.dot(n2);
    if denom > MIN_MITER_DENOM {
        return (n1 + n2) / denom;
    }
    let bevel = normalize_or_zero(n1 + n2);
    if bevel == Vec2::ZERO { n1 } else { bevel }
}

/// Sample the boundary and move every sample towards the interior by half
/// the border width.
fn inset_ring(pieces: &[BoundaryPiece], style: &OverlayStyle) -> Vec<Point> {
    let pieces: Vec<&Trajectory> = pieces
        .iter()
        .map(|p| &p.trajectory)
        .filter(|t| t.estimated_length() > DEGENERATE_LENGTH)
        .collect();
    let splits: Vec<Vec<f64>> = pieces.iter().map(|t| breakpoints(t, style)).collect();

    let raw: Vec<Point> = pieces
        .iter()
        .zip(&splits)
        .flat_map(|(t, ts)| ts[..ts.len() - 1].iter().map(|&s| t.position(s)))
        .collect();
    // Interior is on the left of a counter-clockwise loop.
    let inset = if signed_area2(&raw) < 0.0 {
        -0.5 * style.border_width
    } else {
        0.5 * style.border_width
    };

    let n = pieces.len();
    let mut ring: Vec<Point> = Vec::with_capacity(raw.len());
    for (k, (trajectory, ts)) in pieces.iter().zip(&splits).enumerate() {
        for &t in &ts[1..ts.len() - 1] {
            let normal = left_normal(trajectory.tangent(t));
            push_dedup(&mut ring, trajectory.position(t) + normal * inset);
        }
        let next = pieces[(k + 1) % n];
        let joint = miter(
            left_normal(trajectory.tangent(1.0)),
            left_normal(next.tangent(0.0)),
        );
        push_dedup(&mut ring, trajectory.end() + joint * inset);
    }
    while ring.len() > 1
        && ring
            .first()
            .zip(ring.last())
            .is_some_and(|(a, b)| a.distance(*b) <= DEDUP_DISTANCE)
    {
        ring.pop();
    }
    ring
}

fn push_dedup(ring: &mut Vec<Point>, p: Point) {
    if ring.last().is_none_or(|last| last.distance(p) > DEDUP_DISTANCE) {
        ring.push(p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SelectionParams;
    use crossway_network::{GridLayout, Network, NodeId};
    use kurbo::Shape;

    fn four_way() -> (Network, NodeId) {
        let mut net = Network::new(GridLayout {
            cell_size: 32.0,
            resolution: 32,
        });
        let hub = net.add_node(Point::new(0.0, 0.0), 3.0);
        net.set_node_corner_offset(hub, 8.0);
        for (x, y) in [(50.0, 0.0), (0.0, 50.0), (-50.0, 0.0), (0.0, -50.0)] {
            let arm = net.add_node(Point::new(x, y), 3.0);
            net.add_segment(hub, arm, 4.0).expect("nodes exist");
        }
        (net, hub)
    }

    fn triangle_area(points: &[Point], triangles: &[[usize; 3]]) -> f64 {
        triangles
            .iter()
            .map(|&[a, b, c]| 0.5 * (points[b] - points[a]).cross(points[c] - points[a]))
            .sum()
    }

    #[test]
    fn contour_is_inset_and_filled() {
        let (net, hub) = four_way();
        let sel = Selection::for_node(&net, hub, SelectionParams::default()).expect("exists");
        let contour = sel.render(&OverlayStyle::default());
        assert_eq!(contour.height, 3.0);
        assert!(!contour.is_empty());
        for &p in &contour.points {
            assert!(sel.contains_point(p), "{p:?} should be inside");
        }
        // Mitred corner of the eastern data line.
        assert!(
            contour
                .points
                .iter()
                .any(|p| p.distance(Point::new(7.5, 3.5)) < 1e-9)
        );

        let ring_area = 0.5 * signed_area2(&contour.points);
        let outline_area = sel.outline().area();
        assert!(ring_area > 0.0);
        assert!(ring_area < outline_area);
        let filled = triangle_area(&contour.points, &contour.triangles);
        assert!((filled - ring_area).abs() < 1e-6 * ring_area);
        assert!((contour.to_bez_path().area() - ring_area).abs() < 1e-9);
    }

    #[test]
    fn finer_styles_give_more_points() {
        let (net, hub) = four_way();
        let sel = Selection::for_node(&net, hub, SelectionParams::default()).expect("exists");
        let coarse = sel.render(&OverlayStyle {
            max_turn_angle: PI,
            max_piece_length: 1e6,
            ..OverlayStyle::default()
        });
        let fine = sel.render(&OverlayStyle {
            max_turn_angle: PI / 32.0,
            max_piece_length: 0.5,
            ..OverlayStyle::default()
        });
        // One mitred joint per piece when nothing is split.
        assert_eq!(coarse.points.len(), 8);
        assert!(fine.points.len() > coarse.points.len());
    }

    #[test]
    fn outline_only_skips_triangles() {
        let (net, hub) = four_way();
        let sel = Selection::for_node(&net, hub, SelectionParams::default()).expect("exists");
        let contour = sel.render(&OverlayStyle {
            fill: false,
            ..OverlayStyle::default()
        });
        assert!(contour.triangles.is_empty());
        assert!(contour.points.len() > 8);
    }

    #[test]
    fn miter_meets_both_offset_edges() {
        let m = miter(Vec2::new(-1.0, 0.0), Vec2::new(0.0, -1.0));
        assert_eq!(m, Vec2::new(-1.0, -1.0));
        let straight = miter(Vec2::new(0.0, 1.0), Vec2::new(0.0, 1.0));
        assert_eq!(straight, Vec2::new(0.0, 1.0));
        let hairpin = miter(Vec2::new(0.0, 1.0), Vec2::new(0.0, -1.0));
        assert_eq!(hairpin, Vec2::new(0.0, 1.0));
    }
}
