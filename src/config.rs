// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Run parameters, and the small parsers used to read them from text.

use num::Complex;
use std::str::FromStr;

use crate::errors::JuliaError;
use crate::grid::TileGrid;
use crate::julia::JuliaEvaluator;

/// Given a string and a separator, returns the two values
/// separated by the separator.
pub fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// A specific implementation of parse_pair using a comma and expecting
/// floating point numbers.
pub fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

/// Everything fixed for the length of one render.  Construct with
/// `new()` so that the values are checked before any work starts.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    width: usize,
    tile_width: usize,
    max_iterations: u32,
    c: Complex<f64>,
    workers: usize,
}

impl RenderConfig {
    /// Validate and bundle the run parameters.
    pub fn new(
        width: usize,
        tile_width: usize,
        max_iterations: u32,
        c: Complex<f64>,
        workers: usize,
    ) -> Result<Self, JuliaError> {
        TileGrid::new(width, tile_width)?;
        if max_iterations == 0 {
            return Err(JuliaError::ZeroIterations);
        }
        if !(c.re.is_finite() && c.im.is_finite()) {
            return Err(JuliaError::NonFiniteConstant);
        }
        if workers == 0 {
            return Err(JuliaError::NoWorkers);
        }
        Ok(RenderConfig {
            width,
            tile_width,
            max_iterations,
            c,
            workers,
        })
    }

    /// Like `new()`, but reads the constant from `"re,im"` text.
    pub fn from_text(
        width: usize,
        tile_width: usize,
        max_iterations: u32,
        c: &str,
        workers: usize,
    ) -> Result<Self, JuliaError> {
        let c = parse_complex(c).ok_or_else(|| JuliaError::Parse {
            what: "complex constant",
            input: c.to_string(),
        })?;
        RenderConfig::new(width, tile_width, max_iterations, c, workers)
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Tile width in cells.
    pub fn tile_width(&self) -> usize {
        self.tile_width
    }

    /// Upper bound on the iteration count.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// The Julia constant.
    pub fn c(&self) -> Complex<f64> {
        self.c
    }

    /// Size of the worker pool.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The tiling this configuration describes.
    pub fn grid(&self) -> Result<TileGrid, JuliaError> {
        TileGrid::new(self.width, self.tile_width)
    }

    /// The kernel this configuration describes.
    pub fn evaluator(&self) -> JuliaEvaluator {
        JuliaEvaluator::new(self.c, self.max_iterations)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: 1024,
            tile_width: 32,
            max_iterations: 1000,
            c: Complex::new(0.285, 0.01),
            workers: num_cpus::get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pair_splits_on_separator() {
        assert_eq!(parse_pair::<usize>("640x480", 'x'), Some((640, 480)));
        assert_eq!(parse_pair::<usize>("640x", 'x'), None);
        assert_eq!(parse_pair::<usize>("640", 'x'), None);
        assert_eq!(parse_pair::<f64>("-0.4,0.6", ','), Some((-0.4, 0.6)));
    }

    #[test]
    fn parse_complex_reads_re_im() {
        assert_eq!(parse_complex("0.285,0.01"), Some(Complex::new(0.285, 0.01)));
        assert_eq!(parse_complex("0.285;0.01"), None);
        assert_eq!(parse_complex("abc,1"), None);
    }

    #[test]
    fn default_is_valid() {
        let config = RenderConfig::default();
        let checked = RenderConfig::new(
            config.width(),
            config.tile_width(),
            config.max_iterations(),
            config.c(),
            config.workers(),
        )
        .unwrap();
        assert_eq!(checked, config);
        assert_eq!(config.grid().unwrap().tile_count(), 1024);
    }

    #[test]
    fn rejects_bad_values() {
        let c = Complex::new(0.285, 0.01);
        assert!(match RenderConfig::new(100, 32, 10, c, 1) {
            Err(JuliaError::UnevenTiles { width: 100, tile_width: 32 }) => true,
            _ => false,
        });
        assert!(match RenderConfig::new(64, 32, 10, c, 0) {
            Err(JuliaError::NoWorkers) => true,
            _ => false,
        });
        assert!(match RenderConfig::new(64, 32, 0, c, 1) {
            Err(JuliaError::ZeroIterations) => true,
            _ => false,
        });
        assert!(match RenderConfig::new(64, 32, 10, Complex::new(std::f64::NAN, 0.0), 1) {
            Err(JuliaError::NonFiniteConstant) => true,
            _ => false,
        });
    }

    #[test]
    fn from_text_rejects_non_numeric_constant() {
        assert!(match RenderConfig::from_text(64, 32, 10, "0.2,i", 1) {
            Err(JuliaError::Parse { what: "complex constant", .. }) => true,
            _ => false,
        });
        let config = RenderConfig::from_text(64, 32, 10, "-0.4,0.6", 2).unwrap();
        assert_eq!(config.evaluator(), JuliaEvaluator::new(Complex::new(-0.4, 0.6), 10));
    }
}
