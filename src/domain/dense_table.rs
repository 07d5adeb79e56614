// ============================================================================
// Dense Table
// Uniformly spaced abscissas with O(1) bucket lookup
// ============================================================================

use super::piece::{cumulative_integrals, Piece};
use crate::interfaces::Table;
use crate::numeric::{QuantityError, QuantityResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Table over breakpoints `first + i·delta`.
///
/// The bucket holding `x` is found by arithmetic division; interpolation
/// inside a bucket is linear and the cache holds trapezoid sums.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DenseTable {
    first: f64,
    delta: f64,
    ys: Vec<f64>,
    pieces: Vec<Piece>,
    cache: Vec<f64>,
}

impl DenseTable {
    /// Create from the first abscissa, the spacing, and the ordinates.
    ///
    /// # Errors
    /// - `InsufficientPoints` for fewer than two ordinates
    /// - `MalformedPointSequence` if `first` is not finite, `delta` is not
    ///   positive and finite, or the last abscissa overflows
    pub fn new(first: f64, delta: f64, ys: Vec<f64>) -> QuantityResult<Self> {
        if ys.len() < 2 {
            return Err(QuantityError::InsufficientPoints {
                required: 2,
                found: ys.len(),
            });
        }
        if !first.is_finite() {
            return Err(QuantityError::MalformedPointSequence { index: 0 });
        }
        if !(delta.is_finite() && delta > 0.0) {
            return Err(QuantityError::MalformedPointSequence { index: 1 });
        }
        let last = first + (ys.len() - 1) as f64 * delta;
        if !last.is_finite() {
            return Err(QuantityError::MalformedPointSequence {
                index: ys.len() - 1,
            });
        }

        let pieces = ys.windows(2).map(|y| Piece::linear(delta, y[0], y[1])).collect();
        Ok(Self::from_parts(first, delta, ys, pieces))
    }

    /// Sample `f` at `n` evenly spaced points covering `[a, b]`.
    ///
    /// # Errors
    /// Same as [`DenseTable::new`]; `b <= a` is a malformed sequence.
    pub fn from_fn(a: f64, b: f64, n: usize, mut f: impl FnMut(f64) -> f64) -> QuantityResult<Self> {
        if n < 2 {
            return Err(QuantityError::InsufficientPoints {
                required: 2,
                found: n,
            });
        }
        let delta = (b - a) / (n - 1) as f64;
        let ys = (0..n).map(|i| f(a + i as f64 * delta)).collect();
        Self::new(a, delta, ys)
    }

    fn from_parts(first: f64, delta: f64, ys: Vec<f64>, pieces: Vec<Piece>) -> Self {
        let cache = cumulative_integrals(std::iter::repeat(delta), &pieces);
        Self {
            first,
            delta,
            ys,
            pieces,
            cache,
        }
    }

    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    #[inline]
    fn abscissa(&self, i: usize) -> f64 {
        self.first + i as f64 * self.delta
    }

    /// Bucket `i` such that `x` lies in `[x_i, x_{i+1}]`.
    fn bucket(&self, x: f64) -> QuantityResult<usize> {
        let (min, max) = self.domain();
        if !(x >= min && x <= max) {
            return Err(QuantityError::OutOfRange { x, min, max });
        }
        let last_bucket = self.ys.len() - 2;
        let mut i = (((x - self.first) / self.delta) as usize).min(last_bucket);
        // Rounding in the division can land one bucket off
        if i > 0 && x < self.abscissa(i) {
            i -= 1;
        } else if i < last_bucket && x >= self.abscissa(i + 1) {
            i += 1;
        }
        Ok(i)
    }
}

impl Table for DenseTable {
    fn name(&self) -> &'static str {
        "DenseTable"
    }

    #[inline]
    fn domain(&self) -> (f64, f64) {
        (self.first, self.abscissa(self.ys.len() - 1))
    }

    #[inline]
    fn len(&self) -> usize {
        self.ys.len()
    }

    fn breakpoints(&self) -> Vec<f64> {
        (0..self.ys.len()).map(|i| self.abscissa(i)).collect()
    }

    fn ordinates(&self) -> &[f64] {
        &self.ys
    }

    fn evaluate(&self, x: f64) -> QuantityResult<f64> {
        let i = self.bucket(x)?;
        let xi = self.abscissa(i);
        if x == xi {
            return Ok(self.ys[i]);
        }
        if x == self.abscissa(i + 1) {
            return Ok(self.ys[i + 1]);
        }
        Ok(self.pieces[i].value(x - xi))
    }

    fn antiderivative(&self, x: f64) -> QuantityResult<f64> {
        let i = self.bucket(x)?;
        if x == self.abscissa(i + 1) {
            return Ok(self.cache[i + 1]);
        }
        Ok(self.cache[i] + self.pieces[i].integral(x - self.abscissa(i)))
    }

    fn total_integral(&self) -> f64 {
        self.cache[self.cache.len() - 1]
    }

    fn scaled(&self, factor: f64) -> Box<dyn Table> {
        let ys = self.ys.iter().map(|y| y * factor).collect();
        let pieces = self.pieces.iter().map(|p| p.scaled(factor)).collect();
        Box::new(Self::from_parts(self.first, self.delta, ys, pieces))
    }

    fn boxed_clone(&self) -> Box<dyn Table> {
        Box::new(self.clone())
    }
}
