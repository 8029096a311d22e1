// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crossway_selection::SelectionParams;

bitflags::bitflags! {
    /// Which element kinds the hover tester resolves.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SelectionMode: u8 {
        /// Junction nodes.
        const NODES    = 0b0000_0001;
        /// Segments between nodes.
        const SEGMENTS = 0b0000_0010;
    }
}

impl Default for SelectionMode {
    fn default() -> Self {
        Self::NODES | Self::SEGMENTS
    }
}

/// Hover tester tuning.
///
/// Distances are in world units. The defaults suit a scene measured in
/// metres.
#[derive(Clone, Copy, Debug)]
pub struct HoverConfig {
    /// Element kinds to resolve.
    pub mode: SelectionMode,
    /// Half-extent of the grid window scanned around the hit position.
    pub grid_window: f64,
    /// Most links followed in one cell's list per scan.
    pub max_cell_iterations: usize,
    /// Ground distance the hit position must move before the ignore-set is
    /// cleared.
    pub move_tolerance: f64,
    /// Whether to rescan once when every candidate was ignored.
    ///
    /// When `false`, that tick reports nothing and the ignore-set is still
    /// cleared.
    pub retry_when_exhausted: bool,
    /// Parameters of the selections built for candidates.
    pub selection: SelectionParams,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            mode: SelectionMode::default(),
            grid_window: 16.0,
            max_cell_iterations: 36_864,
            move_tolerance: 0.01,
            retry_when_exhausted: true,
            selection: SelectionParams::default(),
        }
    }
}
