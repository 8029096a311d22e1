// Copyright 2025 the Crossway Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crossway_network::{NodeId, SegmentId};

use crate::selection::SelectionKey;

/// Why a [`Selection`](crate::Selection) could not be built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// The node is not present in the view.
    #[error("node {0:?} not found")]
    NodeNotFound(NodeId),
    /// The segment is not present in the view.
    #[error("segment {0:?} not found")]
    SegmentNotFound(SegmentId),
    /// The element has no connected edge a corner can be built from.
    #[error("{0:?} has no corners")]
    NoCorners(SelectionKey),
}
