// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The messages exchanged between the coordinator and its workers.
//! There are exactly three: an assignment, a result, and a request to
//! stop.

use crate::grid::TileId;

/// Index of a worker in the pool, in `[0, workers)`.
pub type WorkerId = usize;

/// What the coordinator tells a worker to do next.
#[derive(Debug, PartialEq)]
pub enum Assignment {
    /// Compute this tile.  `scratch` is a tile-sized buffer to fill;
    /// it comes back inside the result and is handed out again with
    /// the worker's next tile.
    Assign {
        /// The tile to compute
        tile: TileId,
        /// Storage for the tile's counts
        scratch: Vec<u32>,
    },
    /// No tiles remain.  The worker exits.
    Terminate,
}

/// A computed tile, counts in row-major order.
#[derive(Debug, PartialEq)]
pub struct TileResult {
    /// The worker that did the work
    pub worker: WorkerId,
    /// The tile that was computed
    pub tile: TileId,
    /// One count per cell of the tile
    pub counts: Vec<u32>,
}
