// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parametric ground-plane trajectories.

use core::f64::consts::PI;
use core::ops::Range;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{
    CubicBez, Line, ParamCurve, ParamCurveArclen, ParamCurveDeriv, ParamCurveExtrema, Point, Rect,
    Vec2,
};

/// Accuracy used for arclength evaluation of curves, in world units.
const ARCLEN_ACCURACY: f64 = 1e-3;

/// A straight trajectory: a line plus how far it extends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Straight {
    /// The defining line; `t = 0` at `p0`, `t = 1` at `p1`.
    pub line: Line,
    /// `true` when the trajectory is a real section bounded to `[0, 1]`.
    ///
    /// When `false` it is a ray: any `t >= 0` lies on it.
    pub section: bool,
}

impl Straight {
    /// Whether `t` lies on this trajectory, with a small tolerance.
    #[inline]
    pub fn accepts(&self, t: f64, tolerance: f64) -> bool {
        if self.section {
            (-tolerance..=1.0 + tolerance).contains(&t)
        } else {
            t >= -tolerance
        }
    }

    /// Clamp `t` into the valid parameter range.
    #[inline]
    pub fn clamp(&self, t: f64) -> f64 {
        if self.section {
            t.clamp(0.0, 1.0)
        } else {
            t.max(0.0)
        }
    }
}

/// A parametric primitive over `t ∈ [0, 1]` in the ground plane.
///
/// World `x` maps to `x` and world `z` maps to `y`; heights are carried by
/// the callers that need them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Trajectory {
    /// A straight section or ray.
    Straight(Straight),
    /// A cubic Bézier curve.
    Curve(CubicBez),
}

impl Trajectory {
    /// A bounded straight section from `p0` to `p1`.
    pub fn section(p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        Self::Straight(Straight {
            line: Line::new(p0, p1),
            section: true,
        })
    }

    /// A ray starting at `origin` and passing through `through` at `t = 1`.
    pub fn ray(origin: impl Into<Point>, through: impl Into<Point>) -> Self {
        Self::Straight(Straight {
            line: Line::new(origin, through),
            section: false,
        })
    }

    /// A cubic curve from its four control points.
    pub fn curve(
        p0: impl Into<Point>,
        p1: impl Into<Point>,
        p2: impl Into<Point>,
        p3: impl Into<Point>,
    ) -> Self {
        Self::Curve(CubicBez::new(p0.into(), p1.into(), p2.into(), p3.into()))
    }

    /// A smooth curve leaving `start` along `start_dir` and arriving at `end`
    /// travelling along `-end_dir`.
    ///
    /// Both directions point *away* from their endpoint into the curve, which
    /// is how segment ends are described by the network. `smoothness` scales
    /// the handle length relative to the endpoint distance.
    pub fn smooth(start: Point, start_dir: Vec2, end: Point, end_dir: Vec2, smoothness: f64) -> Self {
        let handle = start.distance(end) * smoothness;
        Self::curve(
            start,
            start + normalize_or_zero(start_dir) * handle,
            end + normalize_or_zero(end_dir) * handle,
            end,
        )
    }

    /// Start point (`t = 0`).
    pub fn start(&self) -> Point {
        match self {
            Self::Straight(s) => s.line.p0,
            Self::Curve(c) => c.p0,
        }
    }

    /// End point (`t = 1`).
    pub fn end(&self) -> Point {
        match self {
            Self::Straight(s) => s.line.p1,
            Self::Curve(c) => c.p3,
        }
    }

    /// Whether the trajectory is bounded to `[0, 1]`. Curves always are.
    pub fn is_section(&self) -> bool {
        match self {
            Self::Straight(s) => s.section,
            Self::Curve(_) => true,
        }
    }

    /// Position at parameter `t`.
    ///
    /// Rays may be evaluated beyond `t = 1`.
    pub fn position(&self, t: f64) -> Point {
        match self {
            Self::Straight(s) => s.line.p0.lerp(s.line.p1, t),
            Self::Curve(c) => c.eval(t),
        }
    }

    /// Unit tangent at parameter `t`, or zero for degenerate geometry.
    pub fn tangent(&self, t: f64) -> Vec2 {
        let d = match self {
            Self::Straight(s) => s.line.p1 - s.line.p0,
            Self::Curve(c) => {
                let d = c.deriv().eval(t.clamp(0.0, 1.0)).to_vec2();
                if d.hypot2() > f64::EPSILON {
                    d
                } else if t < 0.5 {
                    // Coincident first handle: fall back to the next control point.
                    c.p2 - c.p0
                } else {
                    c.p3 - c.p1
                }
            }
        };
        normalize_or_zero(d)
    }

    /// The part of this trajectory between `t0` and `t1`, reparameterized to
    /// `[0, 1]`.
    pub fn cut(&self, t0: f64, t1: f64) -> Self {
        let range: Range<f64> = t0..t1;
        match self {
            Self::Straight(s) => Self::Straight(Straight {
                line: s.line.subsegment(range),
                section: s.section,
            }),
            Self::Curve(c) => Self::Curve(c.subsegment(range)),
        }
    }

    /// Split at `t = 0.5`.
    pub fn subdivide(&self) -> (Self, Self) {
        match self {
            Self::Straight(s) => {
                let (a, b) = s.line.subdivide();
                (
                    Self::Straight(Straight { line: a, ..*s }),
                    Self::Straight(Straight { line: b, ..*s }),
                )
            }
            Self::Curve(c) => {
                let (a, b) = c.subdivide();
                (Self::Curve(a), Self::Curve(b))
            }
        }
    }

    /// The same trajectory traversed backwards.
    pub fn reversed(&self) -> Self {
        match self {
            Self::Straight(s) => Self::Straight(Straight {
                line: Line::new(s.line.p1, s.line.p0),
                section: s.section,
            }),
            Self::Curve(c) => Self::Curve(CubicBez::new(c.p3, c.p2, c.p1, c.p0)),
        }
    }

    /// Length over `[0, 1]`.
    pub fn length(&self) -> f64 {
        match self {
            Self::Straight(s) => s.line.length(),
            Self::Curve(c) => c.arclen(ARCLEN_ACCURACY),
        }
    }

    /// Cheap length estimate: the mean of the chord and control polygon
    /// lengths for curves, the exact length for straight trajectories.
    pub fn estimated_length(&self) -> f64 {
        match self {
            Self::Straight(s) => s.line.length(),
            Self::Curve(c) => {
                let chord = c.p0.distance(c.p3);
                let polygon = c.p0.distance(c.p1) + c.p1.distance(c.p2) + c.p2.distance(c.p3);
                0.5 * (chord + polygon)
            }
        }
    }

    /// Total turning angle in radians.
    ///
    /// For curves this is the sum of the absolute turns between consecutive
    /// legs of the control polygon, an upper bound on the curve's own turning.
    pub fn turning_angle(&self) -> f64 {
        match self {
            Self::Straight(_) => 0.0,
            Self::Curve(c) => {
                let legs = [c.p1 - c.p0, c.p2 - c.p1, c.p3 - c.p2];
                let mut total = 0.0;
                let mut prev: Option<Vec2> = None;
                for leg in legs {
                    if leg.hypot2() <= f64::EPSILON {
                        continue;
                    }
                    if let Some(p) = prev {
                        total += angle_between(p, leg);
                    }
                    prev = Some(leg);
                }
                total.min(2.0 * PI)
            }
        }
    }

    /// Tight axis-aligned bounds over `[0, 1]`.
    pub fn bounding_box(&self) -> Rect {
        match self {
            Self::Straight(s) => s.line.bounding_box(),
            Self::Curve(c) => c.bounding_box(),
        }
    }

    /// Whether every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Straight(s) => s.line.p0.is_finite() && s.line.p1.is_finite(),
            Self::Curve(c) => {
                c.p0.is_finite() && c.p1.is_finite() && c.p2.is_finite() && c.p3.is_finite()
            }
        }
    }
}

impl From<Line> for Trajectory {
    fn from(line: Line) -> Self {
        Self::Straight(Straight {
            line,
            section: true,
        })
    }
}

impl From<CubicBez> for Trajectory {
    fn from(curve: CubicBez) -> Self {
        Self::Curve(curve)
    }
}

/// Unsigned angle between two vectors in `[0, π]`.
#[inline]
pub fn angle_between(a: Vec2, b: Vec2) -> f64 {
    a.cross(b).atan2(a.dot(b)).abs()
}

/// Normalize `v`, returning zero for vectors too short to normalize.
#[inline]
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len > f64::EPSILON && len.is_finite() {
        v / len
    } else {
        Vec2::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn straight_position_and_tangent() {
        let t = Trajectory::section((0.0, 0.0), (10.0, 0.0));
        assert_eq!(t.position(0.5), Point::new(5.0, 0.0));
        assert_eq!(t.tangent(0.3), Vec2::new(1.0, 0.0));
        assert!((t.length() - 10.0).abs() < EPSILON);
        assert_eq!(t.turning_angle(), 0.0);
    }

    #[test]
    fn ray_extends_past_one() {
        let t = Trajectory::ray((0.0, 0.0), (1.0, 1.0));
        assert_eq!(t.position(3.0), Point::new(3.0, 3.0));
        let Trajectory::Straight(s) = t else {
            panic!("expected a straight trajectory");
        };
        assert!(s.accepts(42.0, EPSILON));
        assert!(!s.accepts(-0.5, EPSILON));
    }

    #[test]
    fn curve_accepts_mixed_point_types() {
        let start = Point::new(0.0, 0.0);
        let c = Trajectory::curve(start, (0.0, 10.0), Point::new(10.0, 10.0), (10.0, 0.0));
        assert_eq!(c.start(), start);
        assert_eq!(c.end(), Point::new(10.0, 0.0));
        assert!((c.position(0.5).y - 7.5).abs() < EPSILON);
    }

    #[test]
    fn cut_keeps_positions() {
        let c = Trajectory::curve((0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0));
        let part = c.cut(0.25, 0.75);
        assert!(part.start().distance(c.position(0.25)) < EPSILON);
        assert!(part.end().distance(c.position(0.75)) < EPSILON);
        assert!(part.position(0.5).distance(c.position(0.5)) < EPSILON);
    }

    #[test]
    fn subdivide_meets_in_the_middle() {
        let c = Trajectory::curve((0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0));
        let (a, b) = c.subdivide();
        assert!(a.end().distance(b.start()) < EPSILON);
        assert!(a.end().distance(c.position(0.5)) < EPSILON);
    }

    #[test]
    fn half_turn_curve_turning_angle() {
        // Control polygon turns right twice by 90 degrees.
        let c = Trajectory::curve((0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0));
        assert!((c.turning_angle() - PI).abs() < 1e-9);
    }

    #[test]
    fn estimated_length_brackets_arclength() {
        let c = Trajectory::curve((0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0));
        let chord = 10.0;
        let polygon = 30.0;
        let arclen = c.length();
        assert!(arclen > chord && arclen < polygon);
        assert!((c.estimated_length() - 20.0).abs() < EPSILON);
    }

    #[test]
    fn smooth_curve_follows_directions() {
        let c = Trajectory::smooth(
            Point::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Point::new(10.0, 0.0),
            Vec2::new(-1.0, 0.0),
            1.0 / 3.0,
        );
        assert!((c.tangent(0.0) - Vec2::new(1.0, 0.0)).hypot() < EPSILON);
        assert!((c.tangent(1.0) - Vec2::new(1.0, 0.0)).hypot() < EPSILON);
        assert!(c.position(0.5).y.abs() < EPSILON);
    }

    #[test]
    fn degenerate_tangent_is_zero() {
        let t = Trajectory::section((1.0, 1.0), (1.0, 1.0));
        assert_eq!(t.tangent(0.5), Vec2::ZERO);
    }

    #[test]
    fn reversed_swaps_ends() {
        let c = Trajectory::curve((0.0, 0.0), (1.0, 2.0), (3.0, 2.0), (4.0, 0.0));
        let r = c.reversed();
        assert_eq!(r.start(), c.end());
        assert!(r.position(0.3).distance(c.position(0.7)) < EPSILON);
    }
}
