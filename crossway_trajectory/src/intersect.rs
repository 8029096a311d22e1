// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Crossings between trajectories.
//!
//! Straight pairs are solved in closed form. Pairs involving a curve are
//! bootstrapped by approximating every curve with a handful of chords; chord
//! pairs that cross are refined by recutting the original curves to the
//! matching sub-ranges and recursing until both sides reduce to one chord.

use alloc::vec::Vec;
use core::f64::consts::{FRAC_PI_2, PI};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Line;
use smallvec::SmallVec;

use crate::trajectory::{Straight, Trajectory, angle_between};

/// Parameter tolerance for accepting a chord crossing at its very ends.
const T_TOLERANCE: f64 = 1e-9;

/// Relative tolerance under which two directions count as parallel.
const PARALLEL_TOLERANCE: f64 = 1e-12;

/// A single crossing between two trajectories.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    /// Parameter on the first trajectory.
    pub first_t: f64,
    /// Parameter on the second trajectory.
    pub second_t: f64,
    /// Unsigned tangent-to-tangent angle in radians.
    ///
    /// In `[0, π]`, or `[0, π/2]` when either side is a ray.
    pub angle: f64,
}

impl Intersection {
    /// The same crossing seen from the other trajectory.
    #[inline]
    pub fn swapped(self) -> Self {
        Self {
            first_t: self.second_t,
            second_t: self.first_t,
            angle: self.angle,
        }
    }

    /// Direction-independent crossing sharpness in `[0, π/2]`.
    #[inline]
    pub fn sharpness(&self) -> f64 {
        reduce_angle(self.angle)
    }
}

/// Whether to stop at the first crossing or collect all of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Report every crossing found.
    All,
    /// Stop as soon as one crossing is found.
    First,
}

/// Tuning for curve subdivision.
///
/// The defaults are tuned for a scene measured in metres with roads a few
/// metres wide; scale them together with the scene.
#[derive(Clone, Copy, Debug)]
pub struct IntersectParams {
    /// Shortest chord a curve is split into.
    pub min_chord_length: f64,
    /// Upper bound on the number of chords per curve and level.
    pub max_chords: usize,
    /// Fraction of a chord near either end where a failed refinement is
    /// retried against the neighbouring chord.
    pub boundary_margin: f64,
    /// Recursion depth after which chords are solved directly.
    pub max_depth: u32,
    /// Crossings closer than this on the first trajectory are merged.
    pub merge_distance: f64,
}

impl Default for IntersectParams {
    fn default() -> Self {
        Self {
            min_chord_length: 1.0,
            max_chords: 10,
            boundary_margin: 0.1,
            max_depth: 10,
            merge_distance: 0.05,
        }
    }
}

/// Intersection calculator with explicit parameters.
#[derive(Clone, Copy, Debug, Default)]
pub struct Intersector {
    /// Subdivision tuning.
    pub params: IntersectParams,
}

impl Intersector {
    /// Create a calculator with the given parameters.
    pub const fn new(params: IntersectParams) -> Self {
        Self { params }
    }

    /// All crossings between `a` and `b`.
    pub fn all(&self, a: &Trajectory, b: &Trajectory) -> Vec<Intersection> {
        self.calculate(a, b, Mode::All)
    }

    /// The first crossing found between `a` and `b`, if any.
    pub fn first(&self, a: &Trajectory, b: &Trajectory) -> Option<Intersection> {
        self.calculate(a, b, Mode::First).into_iter().next()
    }

    /// Crossings between `a` and `b` in the given mode.
    ///
    /// Never panics: degenerate, parallel or non-finite input yields an
    /// empty list.
    pub fn calculate(&self, a: &Trajectory, b: &Trajectory, mode: Mode) -> Vec<Intersection> {
        if !a.is_finite() || !b.is_finite() {
            return Vec::new();
        }
        let mut solver = Solver {
            a,
            b,
            params: &self.params,
            mode,
            ray_involved: !a.is_section() || !b.is_section(),
            out: Vec::new(),
        };
        solver.solve(Piece::whole(*a), Piece::whole(*b), 0);
        solver.out
    }
}

/// All crossings between `a` and `b` with default parameters.
pub fn calculate_all(a: &Trajectory, b: &Trajectory) -> Vec<Intersection> {
    Intersector::default().all(a, b)
}

/// The first crossing between `a` and `b` with default parameters.
pub fn calculate_first(a: &Trajectory, b: &Trajectory) -> Option<Intersection> {
    Intersector::default().first(a, b)
}

/// Solve two straight trajectories in closed form.
///
/// Returns the parameters on `a` and `b`, each clamped into its valid range,
/// or `None` for parallel, degenerate or out-of-range configurations.
pub fn line_params(a: &Straight, b: &Straight) -> Option<(f64, f64)> {
    let d1 = a.line.p1 - a.line.p0;
    let d2 = b.line.p1 - b.line.p0;
    let scale = d1.hypot() * d2.hypot();
    if scale.is_nan() || scale <= f64::EPSILON {
        return None;
    }
    let denom = d1.cross(d2);
    if denom.abs() <= PARALLEL_TOLERANCE * scale {
        return None;
    }
    let w = b.line.p0 - a.line.p0;
    let ta = w.cross(d2) / denom;
    let tb = w.cross(d1) / denom;
    if a.accepts(ta, T_TOLERANCE) && b.accepts(tb, T_TOLERANCE) {
        Some((a.clamp(ta), b.clamp(tb)))
    } else {
        None
    }
}

#[inline]
fn reduce_angle(angle: f64) -> f64 {
    if angle > FRAC_PI_2 { PI - angle } else { angle }
}

/// A sub-range `[t0, t1]` of an original trajectory, recut to `[0, 1]`.
#[derive(Clone, Copy, Debug)]
struct Piece {
    trajectory: Trajectory,
    t0: f64,
    t1: f64,
}

impl Piece {
    fn whole(trajectory: Trajectory) -> Self {
        Self {
            trajectory,
            t0: 0.0,
            t1: 1.0,
        }
    }

    /// Map a local parameter back onto the original trajectory.
    #[inline]
    fn global(&self, local: f64) -> f64 {
        match self.trajectory {
            // Straight pieces are never recut, and rays run past one.
            Trajectory::Straight(_) => local,
            Trajectory::Curve(_) => self.t0 + local * (self.t1 - self.t0),
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Chord counts are small and clamped; NaN maps to zero and is clamped up."
    )]
    fn chord_count(&self, params: &IntersectParams) -> usize {
        match self.trajectory {
            Trajectory::Straight(_) => 1,
            Trajectory::Curve(_) => {
                let estimate = self.trajectory.estimated_length() / params.min_chord_length;
                (estimate.ceil() as usize).clamp(1, params.max_chords.max(1))
            }
        }
    }

    /// Chord `i` of `n`, as a straight trajectory.
    fn chord(&self, i: usize, n: usize) -> Straight {
        match self.trajectory {
            Trajectory::Straight(s) => s,
            Trajectory::Curve(_) => {
                let (l0, l1) = local_range(i, n);
                Straight {
                    line: Line::new(self.trajectory.position(l0), self.trajectory.position(l1)),
                    section: true,
                }
            }
        }
    }

    /// The piece covering chord `i` of `n`, recut from `original`.
    fn sub(&self, original: &Trajectory, i: usize, n: usize) -> Self {
        match self.trajectory {
            Trajectory::Straight(_) => *self,
            Trajectory::Curve(_) => {
                let (l0, l1) = local_range(i, n);
                let (t0, t1) = (self.global(l0), self.global(l1));
                Self {
                    trajectory: original.cut(t0, t1),
                    t0,
                    t1,
                }
            }
        }
    }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "Chord indices are at most a few dozen."
)]
#[inline]
fn local_range(i: usize, n: usize) -> (f64, f64) {
    let n = n as f64;
    (i as f64 / n, (i + 1) as f64 / n)
}

/// Chords adjacent to `i` worth retrying when `t` sits near a chord end.
fn neighbours(i: usize, n: usize, t: f64, margin: f64) -> SmallVec<[usize; 2]> {
    let mut out = SmallVec::new();
    if t < margin && i > 0 {
        out.push(i - 1);
    }
    if t > 1.0 - margin && i + 1 < n {
        out.push(i + 1);
    }
    out
}

struct Solver<'a> {
    a: &'a Trajectory,
    b: &'a Trajectory,
    params: &'a IntersectParams,
    mode: Mode,
    ray_involved: bool,
    out: Vec<Intersection>,
}

impl Solver<'_> {
    fn done(&self) -> bool {
        self.mode == Mode::First && !self.out.is_empty()
    }

    fn solve(&mut self, pa: Piece, pb: Piece, depth: u32) -> bool {
        let na = pa.chord_count(self.params);
        let nb = pb.chord_count(self.params);

        if (na == 1 && nb == 1) || depth >= self.params.max_depth {
            let Some((ta, tb)) = line_params(&pa.chord(0, 1), &pb.chord(0, 1)) else {
                return false;
            };
            self.emit(pa.global(ta), pb.global(tb));
            return true;
        }

        let mut found = false;
        for i in 0..na {
            let chord_a = pa.chord(i, na);
            for j in 0..nb {
                let Some((ta, tb)) = line_params(&chord_a, &pb.chord(j, nb)) else {
                    continue;
                };
                if self.refine(&pa, (i, na, ta), &pb, (j, nb, tb), depth) {
                    found = true;
                    if self.done() {
                        return true;
                    }
                }
            }
        }
        found
    }

    /// Recurse into a crossing chord pair, retrying neighbouring chords when
    /// the crossing sits close to a chord boundary.
    fn refine(
        &mut self,
        pa: &Piece,
        (i, na, ta): (usize, usize, f64),
        pb: &Piece,
        (j, nb, tb): (usize, usize, f64),
        depth: u32,
    ) -> bool {
        if self.solve(pa.sub(self.a, i, na), pb.sub(self.b, j, nb), depth + 1) {
            return true;
        }

        let margin = self.params.boundary_margin;
        let around_a = neighbours(i, na, ta, margin);
        let around_b = neighbours(j, nb, tb, margin);

        let mut retries: SmallVec<[(usize, usize); 8]> = SmallVec::new();
        retries.extend(around_a.iter().map(|&ia| (ia, j)));
        retries.extend(around_b.iter().map(|&jb| (i, jb)));
        for &ia in &around_a {
            retries.extend(around_b.iter().map(|&jb| (ia, jb)));
        }

        for (ia, jb) in retries {
            if self.solve(pa.sub(self.a, ia, na), pb.sub(self.b, jb, nb), depth + 1) {
                return true;
            }
        }
        false
    }

    fn emit(&mut self, first_t: f64, second_t: f64) {
        let point = self.a.position(first_t);
        let merge = self.params.merge_distance;
        if self
            .out
            .iter()
            .any(|x| self.a.position(x.first_t).distance(point) <= merge)
        {
            return;
        }

        let angle = angle_between(self.a.tangent(first_t), self.b.tangent(second_t));
        self.out.push(Intersection {
            first_t,
            second_t,
            angle: if self.ray_involved {
                reduce_angle(angle)
            } else {
                angle
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    const EPSILON: f64 = 1e-9;

    fn arch() -> Trajectory {
        Trajectory::curve((0.0, 0.0), (0.0, 20.0), (20.0, 20.0), (20.0, 0.0))
    }

    #[test]
    fn perpendicular_sections_cross_in_the_middle() {
        let a = Trajectory::section((0.0, 0.0), (10.0, 0.0));
        let b = Trajectory::section((5.0, -5.0), (5.0, 5.0));
        let hits = calculate_all(&a, &b);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].first_t - 0.5).abs() < EPSILON);
        assert!((hits[0].second_t - 0.5).abs() < EPSILON);
        assert!((hits[0].angle - FRAC_PI_2).abs() < EPSILON);
    }

    #[test]
    fn parallel_sections_never_cross() {
        let a = Trajectory::section((0.0, 0.0), (10.0, 0.0));
        let b = Trajectory::section((0.0, 0.0), (10.0, 0.0));
        assert!(calculate_all(&a, &b).is_empty());
        let c = Trajectory::section((0.0, 3.0), (10.0, 3.0));
        assert!(calculate_all(&a, &c).is_empty());
        assert!(calculate_first(&a, &c).is_none());
    }

    #[test]
    fn degenerate_and_non_finite_inputs_are_empty() {
        let point = Trajectory::section((1.0, 1.0), (1.0, 1.0));
        let line = Trajectory::section((0.0, 0.0), (2.0, 2.0));
        assert!(calculate_all(&point, &line).is_empty());

        let nan = Trajectory::section((f64::NAN, 0.0), (1.0, 0.0));
        assert!(calculate_all(&nan, &line).is_empty());
        assert!(calculate_all(&line, &nan).is_empty());
    }

    #[test]
    fn sections_that_miss_do_not_cross() {
        let a = Trajectory::section((0.0, 0.0), (10.0, 0.0));
        let b = Trajectory::section((15.0, -5.0), (15.0, 5.0));
        assert!(calculate_all(&a, &b).is_empty());
    }

    #[test]
    fn ray_reaches_past_its_second_point() {
        let ray = Trajectory::ray((0.0, 0.0), (1.0, 0.0));
        let wall = Trajectory::section((30.0, -5.0), (30.0, 5.0));
        let hit = calculate_first(&ray, &wall).expect("ray should hit the wall");
        assert!((hit.first_t - 30.0).abs() < EPSILON);
        assert!((hit.second_t - 0.5).abs() < EPSILON);

        let behind = Trajectory::section((-30.0, -5.0), (-30.0, 5.0));
        assert!(calculate_first(&ray, &behind).is_none());
    }

    #[test]
    fn ray_angle_is_reduced() {
        // Crossing at 135 degrees reports a 45 degree sharpness against a ray.
        let ray = Trajectory::ray((0.0, 0.0), (1.0, 0.0));
        let slanted = Trajectory::section((6.0, -1.0), (4.0, 1.0));
        let hit = calculate_first(&ray, &slanted).expect("should cross");
        assert!((hit.angle - PI / 4.0).abs() < 1e-9);

        let section = Trajectory::section((0.0, 0.0), (10.0, 0.0));
        let hit = calculate_first(&section, &slanted).expect("should cross");
        assert!((hit.angle - 3.0 * PI / 4.0).abs() < 1e-9);
        assert!((hit.sharpness() - PI / 4.0).abs() < 1e-9);
    }

    #[test]
    fn line_through_arch_crosses_twice() {
        let line = Trajectory::section((-5.0, 10.0), (25.0, 10.0));
        let hits = calculate_all(&arch(), &line);
        assert_eq!(hits.len(), 2, "got {hits:?}");
        for hit in &hits {
            let p = arch().position(hit.first_t);
            assert!((p.y - 10.0).abs() < 0.05, "crossing off the line: {p:?}");
            let q = line.position(hit.second_t);
            assert!(p.distance(q) < 0.1, "{p:?} vs {q:?}");
        }
    }

    #[test]
    fn first_mode_stops_after_one() {
        let line = Trajectory::section((-5.0, 10.0), (25.0, 10.0));
        let all = calculate_all(&arch(), &line);
        let first = calculate_first(&arch(), &line).expect("should cross");
        assert!(all.iter().any(|h| (h.first_t - first.first_t).abs() < EPSILON));
    }

    #[test]
    fn curve_crosses_curve() {
        let a = arch();
        // Mirrored arch dipping down through the first one.
        let b = Trajectory::curve((0.0, 25.0), (0.0, 0.0), (20.0, 0.0), (20.0, 25.0));
        let hits = calculate_all(&a, &b);
        assert_eq!(hits.len(), 2, "got {hits:?}");
        for hit in &hits {
            let p = a.position(hit.first_t);
            let q = b.position(hit.second_t);
            assert!(p.distance(q) < 0.1, "{p:?} vs {q:?}");
            assert!(hit.angle > 0.0 && hit.angle <= PI);
        }
    }

    #[test]
    fn curve_crossing_near_chord_boundary_is_found() {
        // Vertical lines sweeping across the arch, including exact chord joints.
        for x in [0.5, 2.0, 5.0, 10.0, 13.3, 19.5] {
            let line = Trajectory::section((x, -1.0), (x, 30.0));
            let hits = calculate_all(&arch(), &line);
            assert_eq!(hits.len(), 1, "x = {x}: {hits:?}");
        }
    }

    #[test]
    fn curve_that_misses_is_empty() {
        let line = Trajectory::section((-5.0, 40.0), (25.0, 40.0));
        assert!(calculate_all(&arch(), &line).is_empty());
    }

    #[test]
    fn neighbours_respect_bounds() {
        assert_eq!(neighbours(0, 4, 0.05, 0.1).as_slice(), &[] as &[usize]);
        assert_eq!(neighbours(2, 4, 0.05, 0.1).as_slice(), &[1]);
        assert_eq!(neighbours(3, 4, 0.95, 0.1).as_slice(), &[] as &[usize]);
        assert_eq!(neighbours(1, 4, 0.95, 0.1).as_slice(), &[2]);
        assert_eq!(neighbours(1, 4, 0.5, 0.1).as_slice(), &[] as &[usize]);
    }

    #[test]
    fn custom_params_bound_the_work() {
        let coarse = Intersector::new(IntersectParams {
            min_chord_length: 100.0,
            ..IntersectParams::default()
        });
        // One chord per curve: the arch collapses to its base chord, which the
        // horizontal line no longer reaches.
        let line = Trajectory::section((-5.0, 10.0), (25.0, 10.0));
        assert!(coarse.all(&arch(), &line).is_empty());

        let base = Trajectory::section((10.0, -5.0), (10.0, 5.0));
        assert_eq!(coarse.all(&arch(), &base), vec![Intersection {
            first_t: 0.5,
            second_t: 0.5,
            angle: FRAC_PI_2,
        }]);
    }
}
