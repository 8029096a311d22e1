// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Crossway Hover: which node or segment is under the pointer.
//!
//! [`HoverTester`] answers one question per frame: given the pointer
//! [`Ray`](crossway_network::Ray) and the terrain hit position, which single
//! network element does the user mean? It reads the host's scene through
//! [`NetworkView`](crossway_network::NetworkView) and never writes to it.
//!
//! Each query:
//!
//! 1. Clears the ignore-set if the hit position moved.
//! 2. Re-tests the previous winner's segment and its end nodes, and keeps the
//!    result if the pointer is still inside.
//! 3. Otherwise walks the segment grid cells around the hit position,
//!    testing every eligible end node and segment once, and keeps the
//!    candidate the ray reaches first.
//! 4. If every candidate was ignored, clears the ignore-set and (by default)
//!    scans once more.
//!
//! Calling [`HoverTester::ignore_current_hover`] between queries cycles
//! through overlapping candidates, for example a road passing under a
//! bridge.
//!
//! Eligibility is decided by a [`HoverFilter`]; [`DefaultFilter`] accepts
//! active elements on the current layer and segments of selected
//! categories. Tuning lives in [`HoverConfig`].
//!
//! ## Logging
//!
//! Cache evictions, capped cell walks and ignore-set resets are reported
//! through [`tracing`] at `debug` level; per-query results at `trace`. No
//! subscriber is installed here.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support in `kurbo`, `glam` and `tracing`.
//! - `libm`: `no_std` floating-point support through `libm`.
//!
//! This crate is `no_std`.

#![no_std]

mod config;
mod filter;
mod tester;

pub use config::{HoverConfig, SelectionMode};
pub use filter::{DefaultFilter, HoverFilter};
pub use tester::{HoverResult, HoverTester};
