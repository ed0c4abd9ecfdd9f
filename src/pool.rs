// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Runs a render: either on a pool of worker threads fed by the
//! coordinator, or on the calling thread in plain row-major order.
//! Both produce the same buffer.

use std::time::{Duration, Instant};

use crossbeam::channel::{unbounded, Receiver, Sender};
use crossbeam::thread::ScopedJoinHandle;
use tracing::{debug, info, warn};

use crate::buffer::{IterationGrid, TileSink};
use crate::coordinator::Coordinator;
use crate::errors::JuliaError;
use crate::grid::{Pixel, TileGrid};
use crate::julia::Evaluator;
use crate::protocol::{Assignment, TileResult, WorkerId};
use crate::worker::Worker;

/// The finished buffer and how it was produced.
#[derive(Debug)]
pub struct Rendering {
    /// Iteration counts for every cell
    pub grid: IterationGrid,
    /// Tiles computed by each worker; a single entry for a serial run
    pub tiles_per_worker: Vec<usize>,
    /// Wall time spent computing
    pub elapsed: Duration,
}

fn deliver(
    mailboxes: &[Sender<Assignment>],
    worker: WorkerId,
    assignment: Assignment,
) -> Result<(), JuliaError> {
    mailboxes[worker]
        .send(assignment)
        .map_err(|_| JuliaError::WorkerGone { worker })
}

// The coordinator's side of the protocol: seed everyone, then answer
// each result with the sender's next assignment until all have been
// told to stop.
fn drive<S: TileSink>(
    coordinator: &mut Coordinator<S>,
    mailboxes: &[Sender<Assignment>],
    results: &Receiver<TileResult>,
) -> Result<(), JuliaError> {
    for (worker, assignment) in coordinator.seed() {
        deliver(mailboxes, worker, assignment)?;
    }
    while !coordinator.is_finished() {
        let result = results.recv().map_err(|_| JuliaError::PoolHungUp {
            outstanding: coordinator.outstanding(),
        })?;
        let worker = result.worker;
        let next = coordinator.accept(result)?;
        deliver(mailboxes, worker, next)?;
    }
    Ok(())
}

/// Render the grid on `workers` threads, handing out tiles as workers
/// ask for them.
pub fn render_threaded<E: Evaluator>(
    grid: &TileGrid,
    evaluator: &E,
    workers: usize,
) -> Result<Rendering, JuliaError> {
    let start = Instant::now();
    let mut coordinator = Coordinator::new(grid.clone(), workers)?;
    info!(
        width = grid.width(),
        tile_width = grid.tile_width(),
        tiles = grid.tile_count(),
        workers,
        "starting render"
    );

    let outcome = crossbeam::scope(|spawner| {
        let (results_tx, results_rx) = unbounded();
        let mut mailboxes = Vec::with_capacity(workers);
        let mut handles: Vec<ScopedJoinHandle<Result<usize, JuliaError>>> =
            Vec::with_capacity(workers);
        for id in 0..workers {
            let (tx, rx) = unbounded();
            mailboxes.push(tx);
            let results = results_tx.clone();
            let worker = Worker::new(id, grid, evaluator);
            handles.push(spawner.spawn(move |_| worker.run(rx, results)));
        }
        // Only the workers hold result senders now, so the coordinator
        // sees a hang-up if they all die.
        drop(results_tx);

        let driven = drive(&mut coordinator, &mailboxes, &results_rx);
        // Unblock anyone still waiting for work before joining.
        drop(mailboxes);
        drop(results_rx);

        for (id, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(Ok(tiles)) => debug!(worker = id, tiles, "worker joined"),
                Ok(Err(err)) => warn!(worker = id, error = %err, "worker stopped early"),
                Err(_) => return Err(JuliaError::WorkerPanicked),
            }
        }
        driven
    })
    .map_err(|_| JuliaError::WorkerPanicked)?;
    outcome?;

    let (buffer, tiles_per_worker) = coordinator.finish()?;
    let elapsed = start.elapsed();
    for (worker, tiles) in tiles_per_worker.iter().enumerate() {
        debug!(worker, tiles, "tile tally");
    }
    Ok(Rendering {
        grid: buffer,
        tiles_per_worker,
        elapsed,
    })
}

/// Render the grid on the calling thread, cell by cell in row-major
/// order, with no tiling at all.  The reference the pool is checked
/// against.
pub fn render_single<E: Evaluator>(grid: &TileGrid, evaluator: &E) -> Rendering {
    let start = Instant::now();
    let mut buffer = IterationGrid::new(grid.width());
    let width = grid.width();
    for (offset, cell) in buffer.as_mut_slice().iter_mut().enumerate() {
        let pixel = Pixel::new(offset / width, offset % width);
        *cell = evaluator.evaluate(grid.pixel_to_point(&pixel));
    }
    Rendering {
        grid: buffer,
        tiles_per_worker: vec![grid.tile_count()],
        elapsed: start.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::julia::JuliaEvaluator;
    use num::Complex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    const EXPECTED_8X8: [[u32; 8]; 8] = [
        [0, 2, 24, 20, 5, 50, 23, 1],
        [1, 4, 16, 34, 17, 17, 37, 4],
        [1, 50, 18, 17, 20, 50, 50, 30],
        [2, 24, 17, 15, 50, 50, 50, 26],
        [2, 4, 9, 18, 18, 18, 9, 4],
        [2, 26, 50, 50, 50, 15, 17, 24],
        [1, 30, 50, 50, 20, 17, 18, 50],
        [1, 4, 37, 17, 17, 34, 16, 4],
    ];

    fn small_julia() -> (TileGrid, JuliaEvaluator) {
        (
            TileGrid::new(8, 2).unwrap(),
            JuliaEvaluator::new(Complex::new(0.285, 0.01), 50),
        )
    }

    #[test]
    fn threaded_render_of_small_grid() {
        let (grid, julia) = small_julia();
        let rendering = render_threaded(&grid, &julia, 2).unwrap();
        assert_eq!(grid.tile_count(), 16);
        assert_eq!(rendering.tiles_per_worker.len(), 2);
        assert_eq!(rendering.tiles_per_worker.iter().sum::<usize>(), 16);
        let rows: Vec<&[u32]> = rendering.grid.rows().collect();
        for (row, expected) in rows.iter().zip(EXPECTED_8X8.iter()) {
            assert_eq!(*row, &expected[..]);
        }
    }

    #[test]
    fn threaded_matches_single_for_any_pool_size() {
        let grid = TileGrid::new(48, 6).unwrap();
        let julia = JuliaEvaluator::new(Complex::new(-0.4, 0.6), 300);
        let reference = render_single(&grid, &julia);
        for &workers in &[1, 2, 3, 7, 64, 100] {
            let rendering = render_threaded(&grid, &julia, workers).unwrap();
            assert_eq!(rendering.grid, reference.grid, "{} workers", workers);
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let (grid, julia) = small_julia();
        let first = render_threaded(&grid, &julia, 2).unwrap();
        let second = render_threaded(&grid, &julia, 2).unwrap();
        assert_eq!(first.grid, second.grid);
    }

    #[test]
    fn zero_workers_is_a_configuration_error() {
        let (grid, julia) = small_julia();
        assert!(match render_threaded(&grid, &julia, 0) {
            Err(JuliaError::NoWorkers) => true,
            _ => false,
        });
    }

    // Slow on the left half of the plane, fast on the right.
    struct Lopsided {
        inner: JuliaEvaluator,
        calls: AtomicUsize,
    }

    impl Evaluator for Lopsided {
        fn evaluate(&self, z0: Complex<f64>) -> u32 {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if z0.re < 0.0 {
                thread::sleep(Duration::from_micros(200));
            }
            self.inner.evaluate(z0)
        }
    }

    #[test]
    fn uneven_tiles_still_complete() {
        let grid = TileGrid::new(16, 4).unwrap();
        let slow = Lopsided {
            inner: JuliaEvaluator::new(Complex::new(0.285, 0.01), 100),
            calls: AtomicUsize::new(0),
        };
        let rendering = render_threaded(&grid, &slow, 4).unwrap();
        assert_eq!(slow.calls.load(Ordering::Relaxed), grid.len());
        assert_eq!(rendering.grid, render_single(&grid, &slow.inner).grid);
    }

    #[test]
    fn single_reports_one_worker() {
        let (grid, julia) = small_julia();
        let rendering = render_single(&grid, &julia);
        assert_eq!(rendering.tiles_per_worker, vec![16]);
        assert_eq!(rendering.grid.get(Pixel::new(0, 5)), 50);
    }
}
