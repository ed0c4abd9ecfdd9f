// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The assembled output of a render: one iteration count per cell of
//! the full grid, in row-major order.

use crate::grid::Pixel;

/// Somewhere finished tiles can be scattered to.
pub trait TileSink {
    /// Copy a `tile_width` x `tile_width` block of counts, stored
    /// row-major, into the square whose top-left cell is `origin`.
    fn write_tile(&mut self, origin: Pixel, tile_width: usize, counts: &[u32]);
}

/// A square, row-major buffer of iteration counts.  Owned by the
/// coordinator while tiles are arriving and read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct IterationGrid {
    width: usize,
    cells: Vec<u32>,
}

impl IterationGrid {
    /// A zeroed `width` x `width` buffer.
    pub fn new(width: usize) -> Self {
        IterationGrid {
            width,
            cells: vec![0 as u32; width * width],
        }
    }

    /// Cells per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The count at a cell.
    pub fn get(&self, pixel: Pixel) -> u32 {
        self.cells[pixel.row * self.width + pixel.col]
    }

    /// Every count, top row first.
    pub fn as_slice(&self) -> &[u32] {
        &self.cells
    }

    /// Mutable access for producers that fill the buffer directly.
    pub fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.cells
    }

    /// The buffer one row at a time.
    pub fn rows(&self) -> std::slice::Chunks<u32> {
        self.cells.chunks(self.width)
    }
}

impl TileSink for IterationGrid {
    fn write_tile(&mut self, origin: Pixel, tile_width: usize, counts: &[u32]) {
        debug_assert_eq!(counts.len(), tile_width * tile_width);
        // The tile is not contiguous here: each of its rows lands a full
        // grid row further on.
        for (i, line) in counts.chunks(tile_width).enumerate() {
            let start = (origin.row + i) * self.width + origin.col;
            self.cells[start..start + tile_width].copy_from_slice(line);
        }
    }
}
