// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed footprints of network elements.

use alloc::vec::Vec;
use core::cell::OnceCell;
use core::hash::{Hash, Hasher};

use crossway_network::{NetworkView, NodeId, Ray, SegmentId};
use crossway_trajectory::{IntersectParams, Intersector, Trajectory, normalize_or_zero};
use kurbo::{BezPath, Point, Rect, Vec2};

use crate::corner::{self, CornerData, Corners};
use crate::error::SelectionError;

/// Crossings this close to the end of a piece belong to the next piece.
const JOINT_EPSILON: f64 = 1e-7;

/// Probe crossings with one piece closer than this are the same crossing.
const CROSSING_MERGE_DISTANCE: f64 = 1e-7;

/// Two boundary pieces meet when their ends are closer than this.
const CLOSURE_TOLERANCE: f64 = 1e-9;

/// Identity of a hoverable element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum SelectionKey {
    /// A junction node.
    Node(NodeId),
    /// A segment between two nodes.
    Segment(SegmentId),
}

/// Shape parameters of a [`Selection`].
#[derive(Clone, Copy, Debug)]
pub struct SelectionParams {
    /// Subdivision tuning of containment probes.
    pub intersect: IntersectParams,
    /// Smallest distance kept between the centroid and any boundary point,
    /// measured along the point's edge.
    pub min_clearance: f64,
    /// Handle length of the curved pieces between corners, relative to the
    /// distance they span.
    pub between_smoothness: f64,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            intersect: IntersectParams::default(),
            min_clearance: 1.0,
            between_smoothness: 0.35,
        }
    }
}

/// Role of a boundary piece.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PieceKind {
    /// Straight line across a corner, right point to left point.
    DataLine,
    /// Curve from one corner's left point to the next corner's right point.
    Between,
    /// Curve closing a single-corner selection.
    EndCap,
}

/// One piece of a selection boundary.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundaryPiece {
    /// What the piece is.
    pub kind: PieceKind,
    /// Its geometry.
    pub trajectory: Trajectory,
}

/// A counter-clockwise closed loop of pieces and its bounding rectangle.
#[derive(Clone, Debug)]
pub struct Boundary {
    pieces: Vec<BoundaryPiece>,
    bounds: Rect,
}

impl Boundary {
    fn build(corners: &[CornerData]) -> Self {
        let mut pieces = Vec::with_capacity(corners.len() * 2);
        let n = corners.len();
        for (i, c) in corners.iter().enumerate() {
            pieces.push(BoundaryPiece {
                kind: PieceKind::DataLine,
                trajectory: corner::data_line(c),
            });
            pieces.push(BoundaryPiece {
                kind: if n == 1 {
                    PieceKind::EndCap
                } else {
                    PieceKind::Between
                },
                trajectory: corner::between(c, &corners[(i + 1) % n]),
            });
        }
        let bounds = pieces
            .iter()
            .map(|p| p.trajectory.bounding_box())
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO);
        Self { pieces, bounds }
    }

    /// Pieces in loop order.
    pub fn pieces(&self) -> &[BoundaryPiece] {
        &self.pieces
    }

    /// Bounding rectangle of all pieces.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Whether every piece ends where the next one starts.
    pub fn is_closed(&self) -> bool {
        let n = self.pieces.len();
        n > 0
            && (0..n).all(|i| {
                let end = self.pieces[i].trajectory.end();
                let start = self.pieces[(i + 1) % n].trajectory.start();
                end.distance(start) <= CLOSURE_TOLERANCE
            })
    }
}

/// The closed footprint of one node or segment.
///
/// Built from the element's corners, one per connected edge. Equality and
/// hashing consider only the [`SelectionKey`]. A selection never changes
/// after construction; when the element changes, build a new one.
#[derive(Clone, Debug)]
pub struct Selection {
    key: SelectionKey,
    height: f64,
    corners: Corners,
    centroid: Point,
    params: SelectionParams,
    boundary: OnceCell<Boundary>,
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Selection {}

impl Hash for Selection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Selection {
    /// Build the selection of element `key`.
    pub fn build(
        view: &(impl NetworkView + ?Sized),
        key: SelectionKey,
        params: SelectionParams,
    ) -> Result<Self, SelectionError> {
        match key {
            SelectionKey::Node(id) => Self::for_node(view, id, params),
            SelectionKey::Segment(id) => Self::for_segment(view, id, params),
        }
    }

    /// Build the selection of junction `id`.
    pub fn for_node(
        view: &(impl NetworkView + ?Sized),
        id: NodeId,
        params: SelectionParams,
    ) -> Result<Self, SelectionError> {
        let node = view.node(id).ok_or(SelectionError::NodeNotFound(id))?;
        let corners = corner::node_corners(view, id);
        Self::from_corners(
            SelectionKey::Node(id),
            node.height,
            corners,
            Some(node.position),
            params,
        )
    }

    /// Build the selection of segment `id`.
    pub fn for_segment(
        view: &(impl NetworkView + ?Sized),
        id: SegmentId,
        params: SelectionParams,
    ) -> Result<Self, SelectionError> {
        let segment = view.segment(id).ok_or(SelectionError::SegmentNotFound(id))?;
        let start = view
            .node(segment.start_node)
            .ok_or(SelectionError::NodeNotFound(segment.start_node))?;
        let end = view
            .node(segment.end_node)
            .ok_or(SelectionError::NodeNotFound(segment.end_node))?;
        let height = 0.5 * (start.height + end.height);
        let corners = corner::segment_corners(view, id, segment);
        Self::from_corners(SelectionKey::Segment(id), height, corners, None, params)
    }

    /// Shape `corners` into a selection.
    ///
    /// Junction corners around `hub` are first separated so neighbouring
    /// edges cannot overlap. The centroid is taken from the final corners
    /// and replaced by a point just inside a data line if the averaged one
    /// falls outside the boundary.
    fn from_corners(
        key: SelectionKey,
        height: f64,
        mut corners: Corners,
        hub: Option<Point>,
        params: SelectionParams,
    ) -> Result<Self, SelectionError> {
        if corners.is_empty() {
            return Err(SelectionError::NoCorners(key));
        }
        if let Some(hub) = hub {
            corner::separate_arms(&mut corners, hub);
        }
        corner::assign_magnitudes(&mut corners, params.between_smoothness, hub);
        if corners.len() > 1 {
            let centroid = corner::centroid(&corners);
            corner::apply_clearance(&mut corners, centroid, params.min_clearance);
            corner::assign_magnitudes(&mut corners, params.between_smoothness, hub);
        }
        let mut selection = Self {
            key,
            height,
            centroid: corner::centroid(&corners),
            corners,
            params,
            boundary: OnceCell::new(),
        };
        if !selection.contains_point(selection.centroid)
            && let Some(inside) = selection
                .corners
                .iter()
                .map(CornerData::inset_point)
                .find(|&p| selection.contains_point(p))
        {
            selection.centroid = inside;
        }
        Ok(selection)
    }

    /// The element this selection belongs to.
    pub fn key(&self) -> SelectionKey {
        self.key
    }

    /// Corners sorted by heading.
    pub fn corners(&self) -> &[CornerData] {
        &self.corners
    }

    /// A point inside the footprint.
    pub fn centroid(&self) -> Point {
        self.centroid
    }

    /// World height of the plane containment is tested on.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Parameters the selection was built with.
    pub fn params(&self) -> &SelectionParams {
        &self.params
    }

    /// The boundary loop, assembled on first use.
    pub fn boundary(&self) -> &Boundary {
        self.boundary.get_or_init(|| Boundary::build(&self.corners))
    }

    /// Bounding rectangle of the boundary.
    pub fn bounds(&self) -> Rect {
        self.boundary().bounds()
    }

    /// Whether the boundary forms a closed loop.
    pub fn is_closed(&self) -> bool {
        self.boundary().is_closed()
    }

    /// Where `ray` enters the footprint, as the ray parameter of the hit on
    /// this selection's height plane.
    pub fn contains(&self, ray: &Ray) -> Option<f64> {
        let (t, point) = ray.at_height(self.height)?;
        self.contains_point(point).then_some(t)
    }

    /// Whether ground point `point` lies inside the footprint.
    ///
    /// Counts crossings of a long probe with the boundary; odd means inside.
    pub fn contains_point(&self, point: Point) -> bool {
        let boundary = self.boundary();
        let b = boundary.bounds();
        if !point.is_finite() || point.x < b.x0 || point.x > b.x1 || point.y < b.y0 || point.y > b.y1
        {
            return false;
        }
        // An irrational slope keeps the probe off joints and axis-aligned edges.
        let direction = normalize_or_zero(Vec2::new(1.0, 0.618_033_988_749_895));
        let reach = 2.0 * (b.width() + b.height()) + 1.0;
        let probe = Trajectory::section(point, point + direction * reach);
        let intersector = Intersector::new(IntersectParams {
            merge_distance: CROSSING_MERGE_DISTANCE,
            ..self.params.intersect
        });
        count_crossings(&intersector, &probe, boundary.pieces()) % 2 == 1
    }

    /// The boundary as a closed path.
    pub fn outline(&self) -> BezPath {
        let mut path = BezPath::new();
        let pieces = self.boundary().pieces();
        let Some(first) = pieces.first() else {
            return path;
        };
        path.move_to(first.trajectory.start());
        for piece in pieces {
            match piece.trajectory {
                Trajectory::Straight(s) => path.line_to(s.line.p1),
                Trajectory::Curve(c) => path.curve_to(c.p1, c.p2, c.p3),
            }
        }
        path.close_path();
        path
    }
}

/// Crossings of `probe` with `pieces`. A crossing at a joint belongs to the
/// piece it starts.
fn count_crossings(intersector: &Intersector, probe: &Trajectory, pieces: &[BoundaryPiece]) -> usize {
    pieces
        .iter()
        .map(|piece| {
            intersector
                .all(probe, &piece.trajectory)
                .iter()
                .filter(|hit| hit.second_t < 1.0 - JOINT_EPSILON)
                .count()
        })
        .sum()
}
