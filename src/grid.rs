// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the TileGrid struct, which describes a square integral
//! plane of cells cut into equal square tiles, and the fixed window
//! of the complex plane those cells sample.
//!
//! The complex window is always centered at the origin and spans 2.0
//! along each axis, whatever the width of the grid, so a bigger grid
//! samples the same region more densely.
use num::Complex;

use crate::errors::JuliaError;

/// Linear tile identifier in `[0, tile_count)`, numbered row-major.
pub type TileId = usize;

/// The row and column of a cell in the full grid.  Row zero is the
/// top of the image.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pixel {
    /// Distance from the top edge
    pub row: usize,
    /// Distance from the left edge
    pub col: usize,
}

impl Pixel {
    /// Shorthand constructor.
    pub fn new(row: usize, col: usize) -> Self {
        Pixel { row, col }
    }
}

/// The geometry of a render: a `width` x `width` grid cut into
/// `tile_width` x `tile_width` tiles.  Holds no cell data.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    width: usize,
    tile_width: usize,
    // Tiles along one edge of the grid
    tiles_per_side: usize,
}

impl TileGrid {
    /// Constructor.  Fails unless both widths are non-zero and the
    /// tiles cover the grid exactly.
    pub fn new(width: usize, tile_width: usize) -> Result<TileGrid, JuliaError> {
        if width == 0 {
            return Err(JuliaError::ZeroWidth);
        }
        if tile_width == 0 {
            return Err(JuliaError::ZeroTileWidth);
        }
        if width % tile_width != 0 {
            return Err(JuliaError::UnevenTiles { width, tile_width });
        }

        Ok(TileGrid {
            width,
            tile_width,
            tiles_per_side: width / tile_width,
        })
    }

    /// Width (and height) of the full grid, in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Width (and height) of one tile, in cells.
    pub fn tile_width(&self) -> usize {
        self.tile_width
    }

    /// The number of tiles along one edge of the grid.
    pub fn tiles_per_side(&self) -> usize {
        self.tiles_per_side
    }

    /// The total number of tiles, and so the number of assignments a
    /// render hands out.
    pub fn tile_count(&self) -> usize {
        self.tiles_per_side * self.tiles_per_side
    }

    /// Cells in a single tile.
    pub fn tile_len(&self) -> usize {
        self.tile_width * self.tile_width
    }

    /// The total number of cells in the grid.  Used to calculate
    /// memory needs.
    pub fn len(&self) -> usize {
        self.width * self.width
    }

    /// A validated grid always has cells; kept alongside `len()`.
    pub fn is_empty(&self) -> bool {
        self.width == 0
    }

    /// The top-left cell of a tile.
    ///
    /// # Panics
    ///
    /// Asking for a tile outside `[0, tile_count)` is a bookkeeping bug
    /// in the caller, not a recoverable condition.
    pub fn tile_origin(&self, tile: TileId) -> Pixel {
        assert!(
            tile < self.tile_count(),
            "tile {} out of range for a grid of {} tiles",
            tile,
            self.tile_count()
        );
        Pixel {
            row: (tile / self.tiles_per_side) * self.tile_width,
            col: (tile % self.tiles_per_side) * self.tile_width,
        }
    }

    /// The linear offset of a tile's top-left cell from the root of a
    /// flattened, row-major buffer of the whole grid.  The tile's other
    /// rows follow at a stride of `width()`.
    pub fn tile_offset(&self, tile: TileId) -> usize {
        self.pixel_offset(self.tile_origin(tile))
    }

    /// The linear offset of a cell in a flattened, row-major buffer.
    pub fn pixel_offset(&self, pixel: Pixel) -> usize {
        pixel.row * self.width + pixel.col
    }

    /// Given a cell of the grid, return the point on the complex plane
    /// it samples.  Moving down a row decreases the imaginary part.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let half = (self.width / 2) as i64;
        let width = self.width as f64;
        Complex::new(
            (((pixel.col as i64 - half) as f64) / width) * 2.0,
            -((((pixel.row as i64 - half) as f64) / width) * 2.0),
        )
    }
}
