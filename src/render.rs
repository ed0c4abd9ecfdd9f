// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns an assembled buffer into an RGB raster, and the raster into
//! a binary PPM file.

use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use std::fs::File;
use std::path::Path;

use crate::buffer::IterationGrid;
use crate::colour::map_colour;
use crate::errors::JuliaError;

/// Three bytes per cell, top row first, left to right.
pub fn rasterize(grid: &IterationGrid) -> Vec<u8> {
    let mut raster = Vec::with_capacity(grid.as_slice().len() * 3);
    for &count in grid.as_slice() {
        raster.extend_from_slice(&map_colour(count));
    }
    raster
}

/// Write a square RGB raster as a binary (P6) pixmap.
pub fn write_pnm<P: AsRef<Path>>(path: P, raster: &[u8], width: usize) -> Result<(), JuliaError> {
    let output = File::create(path.as_ref())?;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
    encoder.encode(raster, width as u32, width as u32, ColorType::RGB(8))?;
    Ok(())
}
