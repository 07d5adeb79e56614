// ============================================================================
// Sparse Table
// Arbitrary strictly increasing abscissas with a cumulative-integral cache
// ============================================================================

use super::piece::{cumulative_integrals, Piece};
use super::point::validate_abscissas;
use crate::interfaces::Table;
use crate::numeric::{QuantityError, QuantityResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Table over non-uniform breakpoints.
///
/// Lookup is a binary search over the abscissas. The running integral at each
/// breakpoint is cached, so `integral(a, b)` reads two cache entries and adds
/// the partial integrals of the two boundary pieces.
///
/// # Example
/// ```
/// use dimnum::domain::SparseTable;
/// use dimnum::interfaces::Table;
///
/// let table = SparseTable::linear(vec![0.0, 1.0, 3.0], vec![0.0, 2.0, 2.0]).unwrap();
/// assert_eq!(table.evaluate(0.5).unwrap(), 1.0);
/// assert_eq!(table.integral(0.0, 3.0).unwrap(), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SparseTable {
    xs: Vec<f64>,
    ys: Vec<f64>,
    pieces: Vec<Piece>,
    cache: Vec<f64>,
}

impl SparseTable {
    /// Piecewise-linear table through the given points.
    ///
    /// # Errors
    /// - `InsufficientPoints` for fewer than two points
    /// - `MalformedPointSequence` for non-increasing abscissas or unequal lengths
    pub fn linear(xs: Vec<f64>, ys: Vec<f64>) -> QuantityResult<Self> {
        Self::check_lengths(&xs, ys.len())?;
        validate_abscissas(&xs)?;

        let pieces = xs
            .windows(2)
            .zip(ys.windows(2))
            .map(|(x, y)| Piece::linear(x[1] - x[0], y[0], y[1]))
            .collect();

        Ok(Self::from_parts(xs, ys, pieces))
    }

    /// Piecewise-quadratic table whose piece `i` passes through points `i`
    /// and `i + 1` and integrates to `areas[i]`.
    ///
    /// # Errors
    /// - `InsufficientPoints` for fewer than two points
    /// - `MalformedPointSequence` for non-increasing abscissas or when the
    ///   lengths of `ys` and `areas` do not match `xs`
    pub fn curvature_matched(xs: Vec<f64>, ys: Vec<f64>, areas: &[f64]) -> QuantityResult<Self> {
        Self::check_lengths(&xs, ys.len())?;
        validate_abscissas(&xs)?;
        if areas.len() + 1 != xs.len() {
            return Err(QuantityError::MalformedPointSequence {
                index: areas.len().min(xs.len()),
            });
        }

        let pieces = xs
            .windows(2)
            .zip(ys.windows(2))
            .zip(areas)
            .map(|((x, y), &area)| Piece::curvature_matched(x[1] - x[0], y[0], y[1], area))
            .collect();

        Ok(Self::from_parts(xs, ys, pieces))
    }

    fn check_lengths(xs: &[f64], ys_len: usize) -> QuantityResult<()> {
        if xs.len() != ys_len {
            return Err(QuantityError::MalformedPointSequence {
                index: xs.len().min(ys_len),
            });
        }
        Ok(())
    }

    fn from_parts(xs: Vec<f64>, ys: Vec<f64>, pieces: Vec<Piece>) -> Self {
        let cache = cumulative_integrals(xs.windows(2).map(|w| w[1] - w[0]), &pieces);
        Self {
            xs,
            ys,
            pieces,
            cache,
        }
    }

    /// Local polynomial of every interval.
    #[inline]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Cached running integral at every breakpoint.
    #[inline]
    pub fn cumulative(&self) -> &[f64] {
        &self.cache
    }

    /// Index `i` of the interval `[xs[i], xs[i + 1]]` holding `x`.
    fn segment(&self, x: f64) -> QuantityResult<usize> {
        let (min, max) = self.domain();
        if !(x >= min && x <= max) {
            return Err(QuantityError::OutOfRange { x, min, max });
        }
        let upper = self.xs.partition_point(|&b| b <= x);
        Ok(upper.saturating_sub(1).min(self.xs.len() - 2))
    }
}

impl Table for SparseTable {
    fn name(&self) -> &'static str {
        "SparseTable"
    }

    #[inline]
    fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    #[inline]
    fn len(&self) -> usize {
        self.xs.len()
    }

    fn breakpoints(&self) -> Vec<f64> {
        self.xs.clone()
    }

    fn ordinates(&self) -> &[f64] {
        &self.ys
    }

    fn evaluate(&self, x: f64) -> QuantityResult<f64> {
        let i = self.segment(x)?;
        if x == self.xs[i] {
            return Ok(self.ys[i]);
        }
        if x == self.xs[i + 1] {
            return Ok(self.ys[i + 1]);
        }
        Ok(self.pieces[i].value(x - self.xs[i]))
    }

    fn antiderivative(&self, x: f64) -> QuantityResult<f64> {
        let i = self.segment(x)?;
        if x == self.xs[i + 1] {
            return Ok(self.cache[i + 1]);
        }
        Ok(self.cache[i] + self.pieces[i].integral(x - self.xs[i]))
    }

    fn total_integral(&self) -> f64 {
        self.cache[self.cache.len() - 1]
    }

    fn scaled(&self, factor: f64) -> Box<dyn Table> {
        let ys = self.ys.iter().map(|y| y * factor).collect();
        let pieces = self.pieces.iter().map(|p| p.scaled(factor)).collect();
        Box::new(Self::from_parts(self.xs.clone(), ys, pieces))
    }

    fn boxed_clone(&self) -> Box<dyn Table> {
        Box::new(self.clone())
    }
}
