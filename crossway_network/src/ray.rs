// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer rays in world space.

use glam::DVec3;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

/// Rays nearly parallel to a horizontal plane never meet it.
const PARALLEL_EPSILON: f64 = 1e-12;

/// A world-space ray, `y` up.
///
/// The host resolves this from the pointer and camera before each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Origin, usually the camera position.
    pub origin: DVec3,
    /// Direction; not required to be normalized.
    pub direction: DVec3,
}

impl Ray {
    /// Create a ray.
    pub const fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// A ray pointing straight down onto ground point `(x, z)` from `height`.
    pub fn vertical(x: f64, z: f64, height: f64) -> Self {
        Self::new(DVec3::new(x, height, z), DVec3::NEG_Y)
    }

    /// Position at parameter `t`.
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Where the ray meets the horizontal plane `y = height`.
    ///
    /// Returns the ray parameter and the ground-plane point, or `None` when
    /// the ray runs parallel to the plane or meets it behind its origin.
    pub fn at_height(&self, height: f64) -> Option<(f64, Point)> {
        if self.direction.y.abs() <= PARALLEL_EPSILON {
            return None;
        }
        let t = (height - self.origin.y) / self.direction.y;
        if !(t.is_finite() && t >= 0.0) {
            return None;
        }
        let p = self.at(t);
        Some((t, ground(p)))
    }
}

/// Project a world position onto the ground plane.
#[inline]
pub fn ground(p: DVec3) -> Point {
    Point::new(p.x, p.z)
}
