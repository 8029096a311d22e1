// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fill triangulation of simple rings.

use alloc::vec::Vec;

use kurbo::Point;

/// Twice the signed area of `ring`; positive for counter-clockwise rings.
pub(crate) fn signed_area2(ring: &[Point]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| ring[i].to_vec2().cross(ring[(i + 1) % n].to_vec2()))
        .sum()
}

/// Triangulate a simple polygon given as a ring of points.
///
/// Either winding is accepted. Triangles index into `ring` and are returned
/// counter-clockwise. Degenerate rings yield no triangles.
pub(crate) fn triangulate(ring: &[Point]) -> Vec<[usize; 3]> {
    if ring.len() < 3 {
        return Vec::new();
    }
    let coords: Vec<f64> = ring.iter().flat_map(|p| [p.x, p.y]).collect();
    let indices = earcutr::earcut(&coords, &[], 2).unwrap_or_default();
    indices
        .chunks_exact(3)
        .map(|t| {
            let (a, b, c) = (t[0], t[1], t[2]);
            if (ring[b] - ring[a]).cross(ring[c] - ring[a]) < 0.0 {
                [a, c, b]
            } else {
                [a, b, c]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn area(ring: &[Point], triangles: &[[usize; 3]]) -> f64 {
        triangles
            .iter()
            .map(|&[a, b, c]| 0.5 * (ring[b] - ring[a]).cross(ring[c] - ring[a]))
            .sum()
    }

    #[test]
    fn square_gives_two_triangles() {
        let ring = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        let triangles = triangulate(&ring);
        assert_eq!(triangles.len(), 2);
        assert!((area(&ring, &triangles) - 1.0).abs() < 1e-12);
        assert!((0.5 * signed_area2(&ring) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn concave_ring_in_either_winding() {
        let mut ring = vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 2.0),
            Point::new(0.0, 2.0),
        ];
        let triangles = triangulate(&ring);
        assert_eq!(triangles.len(), 4);
        assert!((area(&ring, &triangles) - 3.0).abs() < 1e-12);
        for &[a, b, c] in &triangles {
            assert!(
                (ring[b] - ring[a]).cross(ring[c] - ring[a]) > 0.0,
                "triangles are ccw"
            );
        }

        ring.reverse();
        assert!(signed_area2(&ring) < 0.0);
        let triangles = triangulate(&ring);
        assert_eq!(triangles.len(), 4);
        assert!((area(&ring, &triangles) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn collinear_points_add_no_area() {
        let ring = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ];
        let triangles = triangulate(&ring);
        assert!(!triangles.is_empty());
        assert!((area(&ring, &triangles) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_rings_have_no_fill() {
        assert!(triangulate(&[Point::ORIGIN, Point::new(1.0, 1.0)]).is_empty());
        let line = [Point::ORIGIN, Point::new(1.0, 0.0), Point::new(2.0, 0.0)];
        assert!(area(&line, &triangulate(&line)).abs() < 1e-12);
    }
}
