// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Crossway Network: the scene model Crossway reads.
//!
//! Crossway never owns network data. Hosts expose their junction nodes,
//! segments and spatial grid through the read-only [`NetworkView`] trait;
//! this crate defines that trait together with the types it speaks in:
//!
//! - [`NodeId`], [`SegmentId`], [`NodeGeometry`] and [`SegmentGeometry`].
//! - [`ElementFlags`] and [`Categories`], the state and category bitsets
//!   hover filters look at.
//! - [`GridLayout`] and [`SegmentGrid`], a square grid of cells centred on
//!   the world origin whose cells hold intrusive linked lists of segments.
//! - [`Ray`], the world-space pointer ray (`y` up) resolved by the host.
//!
//! [`Network`] is a small in-memory store implementing [`NetworkView`], used
//! by tests and demos and usable as a starting point for simple hosts.
//!
//! # Example
//!
//! ```rust
//! use crossway_network::{GridLayout, Network, NetworkView};
//! use kurbo::Point;
//!
//! let mut net = Network::new(GridLayout::default());
//! let a = net.add_node(Point::new(0.0, 0.0), 0.0);
//! let b = net.add_node(Point::new(40.0, 0.0), 0.0);
//! let s = net.add_segment(a, b, 4.0).unwrap();
//!
//! let (ix, iz) = net.grid_layout().cell_of(Point::new(20.0, 0.0));
//! assert_eq!(net.cell_head(ix, iz), Some(s));
//! assert_eq!(net.corner_offset(a), Some(4.0));
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support in `kurbo` and `glam`.
//! - `libm`: `no_std` floating-point support through `libm`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod grid;
mod network;
mod ray;
mod types;
mod view;

pub use grid::{CellIter, GridLayout, SegmentGrid};
pub use network::Network;
pub use ray::{Ray, ground};
pub use types::{Categories, ElementFlags, NodeGeometry, NodeId, SegmentGeometry, SegmentId};
pub use view::{NetworkView, SEGMENT_SMOOTHNESS};
