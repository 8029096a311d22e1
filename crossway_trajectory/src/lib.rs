// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Crossway Trajectory: ground-plane trajectories and their crossings.
//!
//! This crate provides the geometric primitives the rest of Crossway builds
//! on, expressed with [`kurbo`] types:
//!
//! - [`Trajectory`] – a straight section or ray ([`Straight`]) or a cubic
//!   Bézier curve, with position, tangent, cut, subdivide, length and
//!   turning-angle queries.
//! - [`Intersector`] – crossing parameters between two trajectories.
//!   Straight pairs are solved in closed form; anything involving a curve is
//!   approximated by capped chord counts and refined recursively.
//! - [`Intersection`] – a crossing: the parameter on each trajectory and the
//!   unsigned angle between their tangents.
//!
//! Coordinates are ground-plane only: world `x` maps to `x` and world `z`
//! maps to `y`. Heights never take part in crossing tests.
//!
//! # Example
//!
//! ```rust
//! use crossway_trajectory::{Trajectory, calculate_all};
//!
//! let a = Trajectory::section((0.0, 0.0), (10.0, 0.0));
//! let b = Trajectory::section((5.0, -5.0), (5.0, 5.0));
//! let hits = calculate_all(&a, &b);
//! assert_eq!(hits.len(), 1);
//! assert!((hits[0].first_t - 0.5).abs() < 1e-9);
//! assert!((hits[0].angle - core::f64::consts::FRAC_PI_2).abs() < 1e-9);
//! ```
//!
//! ## First-found versus all crossings
//!
//! [`Mode::First`] stops at the first crossing the subdivision reaches, which
//! is what callers asking "does it cross, and where" want. [`Mode::All`]
//! keeps going over the remaining chord pairs. Both modes resolve each
//! refined chord pair to a single crossing.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support in `kurbo`.
//! - `libm`: `no_std` floating-point support through `libm`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod intersect;
mod trajectory;

pub use intersect::{
    Intersection, IntersectParams, Intersector, Mode, calculate_all, calculate_first, line_params,
};
pub use trajectory::{Straight, Trajectory, angle_between, normalize_or_zero};
