// ============================================================================
// Polynomial Piece
// Local polynomial between two adjacent breakpoints
// ============================================================================

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `c0 + c1·t + c2·t²` in the local coordinate `t = x − x_i`.
///
/// Linear pieces have `c2 == 0`. Point evaluation and the cumulative integral
/// cache of a table both use the same piece, so they are always consistent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Piece {
    pub c0: f64,
    pub c1: f64,
    pub c2: f64,
}

impl Piece {
    /// Straight line from `(0, y0)` to `(dx, y1)`.
    #[inline]
    pub fn linear(dx: f64, y0: f64, y1: f64) -> Self {
        Self {
            c0: y0,
            c1: (y1 - y0) / dx,
            c2: 0.0,
        }
    }

    /// Quadratic through `(0, y0)` and `(dx, y1)` whose integral over
    /// `[0, dx]` equals `area`.
    ///
    /// Used to interpolate between integrator samples with the curvature the
    /// integrator itself saw on the step.
    pub fn curvature_matched(dx: f64, y0: f64, y1: f64, area: f64) -> Self {
        let dy = y1 - y0;
        let c2 = -6.0 * (area - (y0 + 0.5 * dy) * dx) / (dx * dx * dx);
        let c1 = (dy - c2 * dx * dx) / dx;
        Self { c0: y0, c1, c2 }
    }

    /// Value at local coordinate `t`.
    #[inline]
    pub fn value(&self, t: f64) -> f64 {
        self.c0 + t * (self.c1 + t * self.c2)
    }

    /// Integral over `[0, t]`.
    #[inline]
    pub fn integral(&self, t: f64) -> f64 {
        t * (self.c0 + t * (0.5 * self.c1 + t * self.c2 / 3.0))
    }

    #[inline]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            c0: self.c0 * factor,
            c1: self.c1 * factor,
            c2: self.c2 * factor,
        }
    }
}

/// Cumulative integral at each breakpoint: `cache[0] = 0`,
/// `cache[i] = cache[i-1] + ∫ piece[i-1]` over its full width.
///
/// One left-to-right pass. `widths` and `pieces` are parallel.
pub fn cumulative_integrals(widths: impl Iterator<Item = f64>, pieces: &[Piece]) -> Vec<f64> {
    let mut cache = Vec::with_capacity(pieces.len() + 1);
    let mut running = 0.0;
    cache.push(running);
    for (dx, piece) in widths.zip(pieces) {
        running += piece.integral(dx);
        cache.push(running);
    }
    cache
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_piece() {
        let p = Piece::linear(2.0, 1.0, 5.0);
        assert_eq!(p.value(0.0), 1.0);
        assert_eq!(p.value(2.0), 5.0);
        assert_eq!(p.value(1.0), 3.0);
        // Trapezoid
        assert_eq!(p.integral(2.0), 6.0);
    }

    #[test]
    fn test_curvature_matched_hits_endpoints_and_area() {
        // y = t² on [0, 3]: area 9
        let p = Piece::curvature_matched(3.0, 0.0, 9.0, 9.0);
        assert!((p.value(3.0) - 9.0).abs() < 1e-12);
        assert!((p.integral(3.0) - 9.0).abs() < 1e-12);
        assert!((p.c2 - 1.0).abs() < 1e-12);
        assert!(p.c1.abs() < 1e-12);
    }

    #[test]
    fn test_curvature_matched_reduces_to_linear() {
        let area = 0.5 * (2.0 + 4.0) * 1.5;
        let p = Piece::curvature_matched(1.5, 2.0, 4.0, area);
        let l = Piece::linear(1.5, 2.0, 4.0);
        assert!(p.c2.abs() < 1e-12);
        assert!((p.c1 - l.c1).abs() < 1e-12);
    }

    #[test]
    fn test_cumulative_integrals() {
        let pieces = [Piece::linear(1.0, 0.0, 1.0), Piece::linear(2.0, 1.0, 1.0)];
        let cache = cumulative_integrals([1.0, 2.0].into_iter(), &pieces);
        assert_eq!(cache, vec![0.0, 0.5, 2.5]);
    }

    #[test]
    fn test_scaled() {
        let p = Piece::curvature_matched(1.0, 1.0, 2.0, 1.6).scaled(-2.0);
        assert!((p.integral(1.0) + 3.2).abs() < 1e-12);
    }
}
