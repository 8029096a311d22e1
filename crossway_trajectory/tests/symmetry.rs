// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swapping the operands of an intersection swaps the reported parameters.

use crossway_trajectory::{Intersection, Trajectory, calculate_all};
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-6;

fn sorted(mut hits: Vec<Intersection>) -> Vec<Intersection> {
    hits.sort_by(|a, b| a.first_t.total_cmp(&b.first_t));
    hits
}

fn assert_symmetric(a: &Trajectory, b: &Trajectory) {
    let forward = sorted(calculate_all(a, b));
    let backward = sorted(calculate_all(b, a).into_iter().map(Intersection::swapped).collect());
    assert_eq!(
        forward.len(),
        backward.len(),
        "forward {forward:?} backward {backward:?}"
    );
    for (f, b) in forward.iter().zip(&backward) {
        assert!((f.first_t - b.first_t).abs() < TOLERANCE, "{f:?} vs {b:?}");
        assert!((f.second_t - b.second_t).abs() < TOLERANCE, "{f:?} vs {b:?}");
        assert!((f.angle - b.angle).abs() < TOLERANCE, "{f:?} vs {b:?}");
    }
}

#[test]
fn arch_pair_is_symmetric() {
    let a = Trajectory::curve((0.0, 0.0), (0.0, 20.0), (20.0, 20.0), (20.0, 0.0));
    let b = Trajectory::curve((0.0, 25.0), (0.0, 0.0), (20.0, 0.0), (20.0, 25.0));
    assert_symmetric(&a, &b);
    let line = Trajectory::section((-5.0, 10.0), (25.0, 10.0));
    assert_symmetric(&a, &line);
    let ray = Trajectory::ray((10.0, -10.0), (10.0, -9.0));
    assert_symmetric(&a, &ray);
}

proptest! {
    #[test]
    fn sections_are_symmetric(
        ax in -50.0..50.0_f64, ay in -50.0..50.0_f64,
        bx in -50.0..50.0_f64, by in -50.0..50.0_f64,
        cx in -50.0..50.0_f64, cy in -50.0..50.0_f64,
        dx in -50.0..50.0_f64, dy in -50.0..50.0_f64,
    ) {
        let a = Trajectory::section((ax, ay), (bx, by));
        let b = Trajectory::section((cx, cy), (dx, dy));
        assert_symmetric(&a, &b);
    }

    #[test]
    fn monotone_curve_against_vertical_section_is_symmetric(
        y0 in -20.0..20.0_f64, y1 in -20.0..20.0_f64,
        y2 in -20.0..20.0_f64, y3 in -20.0..20.0_f64,
        x in 1.0..29.0_f64,
    ) {
        // Strictly increasing x: every vertical line crosses the curve once.
        let curve = Trajectory::curve((0.0, y0), (10.0, y1), (20.0, y2), (30.0, y3));
        let line = Trajectory::section((x, -100.0), (x, 100.0));
        let hits = calculate_all(&curve, &line);
        prop_assert_eq!(hits.len(), 1, "{:?}", hits);
        assert_symmetric(&curve, &line);
    }
}
