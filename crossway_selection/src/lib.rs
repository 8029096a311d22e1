// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Crossway Selection: closed footprints of network elements.
//!
//! A [`Selection`] turns one junction node or one segment into a closed,
//! counter-clockwise boundary that can be tested for containment and drawn
//! as a highlight.
//!
//! - [`CornerData`] – where one connected edge crosses the boundary: the
//!   edge's outward direction, its left and right boundary points, and the
//!   handle magnitudes of the curved pieces leaving them.
//! - [`Boundary`] – the loop itself: a straight data line across every
//!   corner, joined by curved between pieces (or a single end cap for dead
//!   ends), plus its bounding rectangle.
//! - [`Selection::contains`] – project a pointer [`Ray`](crossway_network::Ray)
//!   to the element's height and count probe crossings with the boundary.
//! - [`Selection::render`] – an inset, adaptively flattened
//!   [`OverlayContour`], optionally triangulated for a filled overlay.
//!
//! Selections are immutable and compare equal by [`SelectionKey`] alone.
//! When an element changes, discard its selection and build a new one.
//!
//! # Example
//!
//! ```rust
//! use crossway_network::{GridLayout, Network, Ray};
//! use crossway_selection::{Selection, SelectionParams};
//! use kurbo::Point;
//!
//! let mut net = Network::new(GridLayout::default());
//! let a = net.add_node(Point::new(0.0, 0.0), 0.0);
//! let b = net.add_node(Point::new(40.0, 0.0), 0.0);
//! let road = net.add_segment(a, b, 4.0).unwrap();
//!
//! let sel = Selection::for_segment(&net, road, SelectionParams::default()).unwrap();
//! assert!(sel.is_closed());
//! assert_eq!(sel.contains(&Ray::vertical(20.0, 1.0, 50.0)), Some(50.0));
//! assert_eq!(sel.contains(&Ray::vertical(20.0, 9.0, 50.0)), None);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support in `kurbo` and `thiserror`.
//! - `libm`: `no_std` floating-point support through `libm`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod corner;
mod error;
mod render;
mod selection;
mod triangulate;

pub use corner::CornerData;
pub use error::SelectionError;
pub use render::{OverlayContour, OverlayStyle};
pub use selection::{Boundary, BoundaryPiece, PieceKind, Selection, SelectionKey, SelectionParams};
