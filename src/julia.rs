// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernel.  A Julia set fixes the constant `c` and
//! starts the orbit at the point being sampled; the count of steps
//! before the orbit leaves the circle of radius 2 is that point's
//! value.

use num::Complex;

/// Anything that can turn a sampled point into an iteration count.
/// Workers share one evaluator by reference, so it must be `Sync` and
/// must not keep per-call state.
pub trait Evaluator: Sync {
    /// The iteration count for the orbit starting at `z0`.
    fn evaluate(&self, z0: Complex<f64>) -> u32;
}

/// Apply `z = z * z + c` starting from `z0` until `|z|^2` exceeds 4 or
/// `max_iterations` steps have been taken.
///
/// The value is the number of steps completed *before* the escaping
/// one, so a point that escapes on its first step scores 0 and a point
/// that never escapes scores `max_iterations`.
pub fn escape_time(c: Complex<f64>, z0: Complex<f64>, max_iterations: u32) -> u32 {
    let mut z = z0;
    for i in 0..max_iterations {
        z = z * z + c;
        if z.norm_sqr() > 4.0 {
            return i;
        }
    }
    max_iterations
}

/// The filled Julia set for one constant.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JuliaEvaluator {
    c: Complex<f64>,
    max_iterations: u32,
}

impl JuliaEvaluator {
    /// Constructor.
    pub fn new(c: Complex<f64>, max_iterations: u32) -> Self {
        JuliaEvaluator { c, max_iterations }
    }

    /// The upper bound on any count this evaluator returns.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }
}

impl Evaluator for JuliaEvaluator {
    fn evaluate(&self, z0: Complex<f64>) -> u32 {
        escape_time(self.c, z0, self.max_iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_time_reference_point() {
        let count = escape_time(Complex::new(-0.4, 0.6), Complex::new(0.0, 0.0), 1000);
        assert_eq!(count, 25);
        assert_eq!(
            count,
            escape_time(Complex::new(-0.4, 0.6), Complex::new(0.0, 0.0), 1000)
        );
    }

    #[test]
    fn escape_on_first_step_scores_zero() {
        assert_eq!(escape_time(Complex::new(0.285, 0.01), Complex::new(2.0, 2.0), 50), 0);
    }

    #[test]
    fn bounded_orbit_scores_max_iterations() {
        assert_eq!(escape_time(Complex::new(0.0, 0.0), Complex::new(0.5, 0.0), 1000), 1000);
        assert_eq!(escape_time(Complex::new(0.0, 0.0), Complex::new(0.0, 0.0), 1), 1);
    }

    #[test]
    fn counts_stay_within_bounds() {
        let julia = JuliaEvaluator::new(Complex::new(-0.4, 0.6), 64);
        for step in 0..=40 {
            let z0 = Complex::new(-2.0 + 0.1 * step as f64, 1.0 - 0.05 * step as f64);
            assert!(julia.evaluate(z0) <= julia.max_iterations());
        }
    }

    #[test]
    fn evaluator_delegates_to_escape_time() {
        let julia = JuliaEvaluator::new(Complex::new(0.285, 0.01), 50);
        assert_eq!(julia.evaluate(Complex::new(0.0, 0.0)), 18);
    }
}
