// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The scheduling core.  The coordinator owns the queue of tiles not
//! yet handed out, the state of every worker slot, and the output
//! buffer.  It never touches a channel itself: `seed()` says what to
//! send first, and `accept()` takes one returned tile and says what
//! that worker should do next.  The caller moves the messages, so the
//! same state machine can be driven by threads or by a test that
//! delivers results in whatever order it likes.
//!
//! Scheduling is pull-based.  A worker gets its next tile only by
//! returning its last one, so fast workers end up computing more tiles
//! than slow ones, and nobody waits on a fixed partition.
//!
//! There is no timeout and no re-queueing: a worker that dies or hangs
//! with a tile in hand stalls the render, and that tile's cells are
//! never written.

use std::ops::Range;

use tracing::trace;

use crate::buffer::{IterationGrid, TileSink};
use crate::errors::JuliaError;
use crate::grid::{TileGrid, TileId};
use crate::protocol::{Assignment, TileResult, WorkerId};

/// Where a worker slot is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorkerState {
    /// Not yet given anything
    Idle,
    /// Computing the given tile
    Assigned(TileId),
    /// Told to stop
    Terminated,
}

/// Assigns tiles to a fixed pool of workers and scatters their
/// results into a `TileSink`.
pub struct Coordinator<S: TileSink = IterationGrid> {
    grid: TileGrid,
    sink: S,
    // Tiles never yet assigned.  Ids leave from the front and never
    // come back.
    queue: Range<TileId>,
    workers: Vec<WorkerState>,
    tiles_per_worker: Vec<usize>,
    in_flight: usize,
}

impl Coordinator<IterationGrid> {
    /// A coordinator writing into a fresh buffer the size of the grid.
    pub fn new(grid: TileGrid, workers: usize) -> Result<Self, JuliaError> {
        let sink = IterationGrid::new(grid.width());
        Coordinator::with_sink(grid, workers, sink)
    }
}

impl<S: TileSink> Coordinator<S> {
    /// A coordinator writing into the given sink, which must cover the
    /// whole grid.
    pub fn with_sink(grid: TileGrid, workers: usize, sink: S) -> Result<Self, JuliaError> {
        if workers == 0 {
            return Err(JuliaError::NoWorkers);
        }
        Ok(Coordinator {
            queue: 0..grid.tile_count(),
            grid,
            sink,
            workers: vec![WorkerState::Idle; workers],
            tiles_per_worker: vec![0; workers],
            in_flight: 0,
        })
    }

    /// The initial message for every worker: one tile each while tiles
    /// last, `Terminate` for the rest.
    pub fn seed(&mut self) -> Vec<(WorkerId, Assignment)> {
        let mut seeds = Vec::with_capacity(self.workers.len());
        for worker in 0..self.workers.len() {
            if self.workers[worker] != WorkerState::Idle {
                continue;
            }
            let scratch = vec![0; self.grid.tile_len()];
            seeds.push((worker, self.next_for(worker, scratch)));
        }
        seeds
    }

    /// Take a finished tile, write it into the sink, and decide the
    /// worker's next step.  A result for a tile that is not currently
    /// assigned to the sending worker, or of the wrong size, is a
    /// protocol violation and nothing is written.
    pub fn accept(&mut self, result: TileResult) -> Result<Assignment, JuliaError> {
        let TileResult {
            worker,
            tile,
            counts,
        } = result;

        match self.workers.get(worker) {
            Some(&WorkerState::Assigned(assigned)) if assigned == tile => {}
            _ => return Err(JuliaError::UnexpectedResult { worker, tile }),
        }
        if counts.len() != self.grid.tile_len() {
            return Err(JuliaError::MalformedResult {
                worker,
                tile,
                len: counts.len(),
                expected: self.grid.tile_len(),
            });
        }

        self.sink
            .write_tile(self.grid.tile_origin(tile), self.grid.tile_width(), &counts);
        self.workers[worker] = WorkerState::Idle;
        self.tiles_per_worker[worker] += 1;
        self.in_flight -= 1;
        trace!(worker, tile, remaining = self.queue.len(), "accepted tile");

        Ok(self.next_for(worker, counts))
    }

    // Pop the next tile for an idle worker, or retire it.
    fn next_for(&mut self, worker: WorkerId, scratch: Vec<u32>) -> Assignment {
        match self.queue.next() {
            Some(tile) => {
                self.workers[worker] = WorkerState::Assigned(tile);
                self.in_flight += 1;
                Assignment::Assign { tile, scratch }
            }
            None => {
                self.workers[worker] = WorkerState::Terminated;
                Assignment::Terminate
            }
        }
    }

    /// The state of one worker slot.
    pub fn state(&self, worker: WorkerId) -> Option<WorkerState> {
        self.workers.get(worker).cloned()
    }

    /// Tiles that have been queued or assigned but not yet returned.
    pub fn outstanding(&self) -> usize {
        self.queue.len() + self.in_flight
    }

    /// True once every worker has been told to stop.  Since a worker is
    /// only stopped when the queue is empty, and only after its last
    /// tile has been accepted, this is also the moment every tile has
    /// been written.
    pub fn is_finished(&self) -> bool {
        self.workers.iter().all(|w| *w == WorkerState::Terminated)
    }

    /// The grid being scheduled.
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Hand over the filled sink and the number of tiles each worker
    /// completed.  Fails if any tile is still outstanding.
    pub fn finish(self) -> Result<(S, Vec<usize>), JuliaError> {
        if !self.is_finished() {
            return Err(JuliaError::Unfinished {
                outstanding: self.outstanding(),
            });
        }
        Ok((self.sink, self.tiles_per_worker))
    }
}
