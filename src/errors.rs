// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong between reading a configuration and
//! writing the final image.  Configuration problems are caught before
//! any thread is started; protocol and transport problems abort the
//! run; there is no retry and no partial output.

use failure::Fail;

use crate::grid::TileId;
use crate::protocol::WorkerId;

/// The single error type of the renderer.
#[derive(Debug, Fail)]
pub enum JuliaError {
    /// The grid must have at least one cell.
    #[fail(display = "grid width must be greater than zero")]
    ZeroWidth,

    /// Tiles must have at least one cell.
    #[fail(display = "tile width must be greater than zero")]
    ZeroTileWidth,

    /// Tiles have to cover the grid exactly.
    #[fail(
        display = "grid width {} is not divisible by tile width {}",
        width, tile_width
    )]
    UnevenTiles {
        /// Full grid width
        width: usize,
        /// Requested tile width
        tile_width: usize,
    },

    /// A pool with no workers can never finish.
    #[fail(display = "at least one worker is required")]
    NoWorkers,

    /// The recurrence has to be allowed at least one step.
    #[fail(display = "maximum iteration count must be greater than zero")]
    ZeroIterations,

    /// The Julia constant has a NaN or infinite part.
    #[fail(display = "the complex constant must be finite")]
    NonFiniteConstant,

    /// Some piece of textual input was not understood.
    #[fail(display = "could not parse {} from {:?}", what, input)]
    Parse {
        /// What we were trying to read
        what: &'static str,
        /// The offending text
        input: String,
    },

    /// A worker returned a tile the coordinator never gave it.
    #[fail(
        display = "protocol violation: worker {} returned tile {} which is not assigned to it",
        worker, tile
    )]
    UnexpectedResult {
        /// Worker that sent the result
        worker: WorkerId,
        /// Tile it claimed to have computed
        tile: TileId,
    },

    /// A worker returned a tile of the wrong size.
    #[fail(
        display = "protocol violation: worker {} returned {} cells for tile {}, expected {}",
        worker, len, tile, expected
    )]
    MalformedResult {
        /// Worker that sent the result
        worker: WorkerId,
        /// Tile it claimed to have computed
        tile: TileId,
        /// Number of cells received
        len: usize,
        /// Number of cells in a tile
        expected: usize,
    },

    /// An assignment could not be delivered.
    #[fail(display = "worker {} is no longer receiving assignments", worker)]
    WorkerGone {
        /// The unreachable worker
        worker: WorkerId,
    },

    /// A worker lost contact with the coordinator.
    #[fail(display = "worker {} lost its connection to the coordinator", worker)]
    CoordinatorGone {
        /// The orphaned worker
        worker: WorkerId,
    },

    /// Every worker hung up while tiles were still in flight.
    #[fail(
        display = "worker pool shut down with {} tiles still outstanding",
        outstanding
    )]
    PoolHungUp {
        /// Tiles assigned or queued but never returned
        outstanding: usize,
    },

    /// A worker thread panicked.
    #[fail(display = "a worker thread panicked")]
    WorkerPanicked,

    /// The output buffer was requested before every worker terminated.
    #[fail(display = "render is unfinished: {} tiles outstanding", outstanding)]
    Unfinished {
        /// Tiles assigned or queued but never returned
        outstanding: usize,
    },

    /// The image could not be written.
    #[fail(display = "could not write image: {}", _0)]
    Io(#[cause] std::io::Error),
}

impl From<std::io::Error> for JuliaError {
    fn from(err: std::io::Error) -> Self {
        JuliaError::Io(err)
    }
}
