// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A worker waits for an assignment, computes every cell of the tile
//! it names, sends the counts back, and waits again, until it is told
//! to stop.

use crossbeam::channel::{Receiver, Sender};
use itertools::iproduct;
use tracing::{debug, trace};

use crate::errors::JuliaError;
use crate::grid::{Pixel, TileGrid, TileId};
use crate::julia::Evaluator;
use crate::protocol::{Assignment, TileResult, WorkerId};

/// One member of the pool.  Shares the grid and evaluator with the
/// others by reference; owns nothing else but the scratch buffer it is
/// currently filling.
pub struct Worker<'a, E: Evaluator> {
    id: WorkerId,
    grid: &'a TileGrid,
    evaluator: &'a E,
}

impl<'a, E: Evaluator> Worker<'a, E> {
    /// Constructor.
    pub fn new(id: WorkerId, grid: &'a TileGrid, evaluator: &'a E) -> Self {
        Worker {
            id,
            grid,
            evaluator,
        }
    }

    /// This worker's index in the pool.
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Fill `counts` with the tile's iteration counts, row-major.
    /// `counts` is resized to the tile if it is not already.
    pub fn compute(&self, tile: TileId, counts: &mut Vec<u32>) {
        let width = self.grid.tile_width();
        let origin = self.grid.tile_origin(tile);
        counts.resize(self.grid.tile_len(), 0);
        for (row, col) in iproduct!(0..width, 0..width) {
            let pixel = Pixel::new(origin.row + row, origin.col + col);
            counts[row * width + col] = self.evaluator.evaluate(self.grid.pixel_to_point(&pixel));
        }
    }

    /// The worker loop.  Returns the number of tiles computed once the
    /// coordinator sends `Terminate`.  Losing either channel first is
    /// an error.
    pub fn run(
        self,
        assignments: Receiver<Assignment>,
        results: Sender<TileResult>,
    ) -> Result<usize, JuliaError> {
        let mut computed = 0;
        loop {
            match assignments.recv() {
                Ok(Assignment::Assign { tile, mut scratch }) => {
                    trace!(worker = self.id, tile, "computing tile");
                    self.compute(tile, &mut scratch);
                    results
                        .send(TileResult {
                            worker: self.id,
                            tile,
                            counts: scratch,
                        })
                        .map_err(|_| JuliaError::CoordinatorGone { worker: self.id })?;
                    computed += 1;
                }
                Ok(Assignment::Terminate) => {
                    debug!(worker = self.id, tiles = computed, "worker exiting");
                    return Ok(computed);
                }
                Err(_) => return Err(JuliaError::CoordinatorGone { worker: self.id }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::unbounded;
    use num::Complex;

    use crate::julia::JuliaEvaluator;

    // Scores every cell with its own row-major index in the full grid.
    struct IndexEvaluator {
        grid: TileGrid,
    }

    impl Evaluator for IndexEvaluator {
        fn evaluate(&self, z0: Complex<f64>) -> u32 {
            let width = self.grid.width() as f64;
            let half = (self.grid.width() / 2) as f64;
            let col = (z0.re / 2.0 * width + half).round() as usize;
            let row = (-z0.im / 2.0 * width + half).round() as usize;
            self.grid.pixel_offset(Pixel::new(row, col)) as u32
        }
    }

    #[test]
    fn compute_fills_tile_row_major() {
        let grid = TileGrid::new(8, 2).unwrap();
        let evaluator = IndexEvaluator { grid: grid.clone() };
        let worker = Worker::new(0, &grid, &evaluator);
        let mut counts = vec![];
        worker.compute(5, &mut counts);
        // Tile 5 starts at row 2, column 2.
        assert_eq!(counts, vec![18, 19, 26, 27]);
    }

    #[test]
    fn compute_agrees_with_direct_evaluation() {
        let grid = TileGrid::new(16, 4).unwrap();
        let julia = JuliaEvaluator::new(Complex::new(-0.4, 0.6), 200);
        let worker = Worker::new(3, &grid, &julia);
        let mut counts = vec![0; grid.tile_len()];
        worker.compute(6, &mut counts);
        let origin = grid.tile_origin(6);
        for row in 0..4 {
            for col in 0..4 {
                let point = grid.pixel_to_point(&Pixel::new(origin.row + row, origin.col + col));
                assert_eq!(counts[row * 4 + col], julia.evaluate(point));
            }
        }
    }

    #[test]
    fn run_answers_each_assignment_then_exits() {
        let grid = TileGrid::new(4, 2).unwrap();
        let evaluator = IndexEvaluator { grid: grid.clone() };
        let (assign_tx, assign_rx) = unbounded();
        let (result_tx, result_rx) = unbounded();
        assign_tx
            .send(Assignment::Assign { tile: 3, scratch: vec![0; 4] })
            .unwrap();
        assign_tx
            .send(Assignment::Assign { tile: 0, scratch: vec![0; 4] })
            .unwrap();
        assign_tx.send(Assignment::Terminate).unwrap();

        let computed = Worker::new(1, &grid, &evaluator)
            .run(assign_rx, result_tx)
            .unwrap();
        assert_eq!(computed, 2);

        let results: Vec<TileResult> = result_rx.iter().collect();
        assert_eq!(
            results,
            vec![
                TileResult { worker: 1, tile: 3, counts: vec![10, 11, 14, 15] },
                TileResult { worker: 1, tile: 0, counts: vec![0, 1, 4, 5] },
            ]
        );
    }

    #[test]
    fn run_fails_when_coordinator_disappears() {
        let grid = TileGrid::new(4, 2).unwrap();
        let evaluator = IndexEvaluator { grid: grid.clone() };
        let (assign_tx, assign_rx) = unbounded::<Assignment>();
        let (result_tx, _result_rx) = unbounded();
        drop(assign_tx);
        assert!(match Worker::new(2, &grid, &evaluator).run(assign_rx, result_tx) {
            Err(JuliaError::CoordinatorGone { worker: 2 }) => true,
            _ => false,
        });
    }
}
