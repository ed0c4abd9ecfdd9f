#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tiled Julia set renderer
//!
//! A filled Julia set fixes a complex constant `c` and asks, for every
//! starting point `z` on the plane, how many times `z = z * z + c` can
//! be applied before `z` runs away past radius 2.  That count, mapped
//! to a colour, is the image.
//!
//! Every point is independent, which makes the image easy to farm out.
//! The grid is cut into equal square tiles.  A coordinator hands one
//! tile to each worker thread; whenever a worker returns a finished
//! tile, the coordinator copies it into place in the output buffer and
//! gives that worker the next unassigned tile, or tells it to stop.
//! Workers that are quicker (or less contended) simply end up doing
//! more tiles.
//!
//! ```no_run
//! let config = julia_tiles::RenderConfig::default();
//! let rendering = julia_tiles::render(&config).unwrap();
//! let raster = julia_tiles::rasterize(&rendering.grid);
//! julia_tiles::write_pnm("image_out.ppm", &raster, config.width()).unwrap();
//! ```

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
extern crate num;
extern crate num_cpus;

pub mod buffer;
pub mod colour;
pub mod config;
pub mod coordinator;
pub mod errors;
pub mod grid;
pub mod julia;
pub mod pool;
pub mod protocol;
pub mod render;
pub mod worker;

pub use buffer::{IterationGrid, TileSink};
pub use colour::map_colour;
pub use config::RenderConfig;
pub use coordinator::{Coordinator, WorkerState};
pub use errors::JuliaError;
pub use grid::{Pixel, TileGrid, TileId};
pub use julia::{escape_time, Evaluator, JuliaEvaluator};
pub use pool::{render_single, render_threaded, Rendering};
pub use protocol::{Assignment, TileResult, WorkerId};
pub use render::{rasterize, write_pnm};

/// Render the configured Julia set on the configured number of workers.
pub fn render(config: &RenderConfig) -> Result<Rendering, JuliaError> {
    render_threaded(&config.grid()?, &config.evaluator(), config.workers())
}
