// ============================================================================
// Table Interface
// Storage and query backend behind an interpolant
// ============================================================================

use crate::numeric::QuantityResult;
use std::fmt;

/// Strategy interface for piecewise tables over SI magnitudes
/// Implementations: DenseTable (uniform abscissas), SparseTable (arbitrary)
///
/// A table is immutable once built. Queries outside `domain()` fail with
/// `OutOfRange`; nothing is extrapolated.
pub trait Table: Send + Sync + fmt::Debug {
    /// Get the table name for logging
    fn name(&self) -> &'static str;

    /// First and last abscissa
    fn domain(&self) -> (f64, f64);

    /// Number of breakpoints
    fn len(&self) -> usize;

    /// Tables always hold at least two breakpoints
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Abscissas of every breakpoint, ascending
    fn breakpoints(&self) -> Vec<f64>;

    /// Stored ordinate at every breakpoint
    fn ordinates(&self) -> &[f64];

    /// Interpolated value at `x`
    ///
    /// # Errors
    /// Returns `OutOfRange` if `x` is outside `domain()` or NaN.
    fn evaluate(&self, x: f64) -> QuantityResult<f64>;

    /// Integral from the first breakpoint to `x`
    ///
    /// # Errors
    /// Returns `OutOfRange` if `x` is outside `domain()` or NaN.
    fn antiderivative(&self, x: f64) -> QuantityResult<f64>;

    /// Integral over `[a, b]`; a reversed range gives the negated value
    ///
    /// # Errors
    /// Returns `OutOfRange` if either bound is outside `domain()`.
    fn integral(&self, a: f64, b: f64) -> QuantityResult<f64> {
        Ok(self.antiderivative(b)? - self.antiderivative(a)?)
    }

    /// Integral over the whole domain
    fn total_integral(&self) -> f64;

    /// New table with every ordinate multiplied by `factor`
    fn scaled(&self, factor: f64) -> Box<dyn Table>;

    /// Clone behind a box
    fn boxed_clone(&self) -> Box<dyn Table>;

    /// Check if `x` lies inside the domain
    fn contains(&self, x: f64) -> bool {
        let (lo, hi) = self.domain();
        x >= lo && x <= hi
    }
}

impl Clone for Box<dyn Table> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}
