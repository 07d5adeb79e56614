// ============================================================================
// Sampled Points
// Ordered (x, y) pairs and their validation before table construction
// ============================================================================

use crate::numeric::{DimensionVector, Dimensioned, QuantityError, QuantityResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One sample of a function: argument `x` and value `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampledPoint<X, Y> {
    pub x: X,
    pub y: Y,
}

impl<X, Y> SampledPoint<X, Y> {
    #[inline]
    pub fn new(x: X, y: Y) -> Self {
        Self { x, y }
    }
}

impl<X, Y> From<(X, Y)> for SampledPoint<X, Y> {
    #[inline]
    fn from((x, y): (X, Y)) -> Self {
        Self::new(x, y)
    }
}

/// Check that abscissas are finite and strictly increasing, and that there
/// are at least two of them.
///
/// # Errors
/// - `InsufficientPoints` for fewer than two abscissas
/// - `MalformedPointSequence` with the index of the first bad abscissa
pub fn validate_abscissas(xs: &[f64]) -> QuantityResult<()> {
    if xs.len() < 2 {
        return Err(QuantityError::InsufficientPoints {
            required: 2,
            found: xs.len(),
        });
    }

    if !xs[0].is_finite() {
        return Err(QuantityError::MalformedPointSequence { index: 0 });
    }

    for (i, pair) in xs.windows(2).enumerate() {
        if !(pair[1].is_finite() && pair[1] > pair[0]) {
            return Err(QuantityError::MalformedPointSequence { index: i + 1 });
        }
    }

    Ok(())
}

/// Points halfway between each neighbouring pair, in the input order.
///
/// Fewer than two points give an empty list.
///
/// # Errors
/// Returns `DimensionMismatch` if neighbouring points disagree in dimension.
///
/// # Example
/// ```
/// use dimnum::domain::{midpoints, SampledPoint};
///
/// let points = [SampledPoint::new(0.0, 1.0), SampledPoint::new(2.0, 3.0), SampledPoint::new(3.0, 0.0)];
/// let mids = midpoints(&points).unwrap();
/// assert_eq!(mids, vec![SampledPoint::new(1.0, 2.0), SampledPoint::new(2.5, 1.5)]);
/// ```
pub fn midpoints<X, Y>(points: &[SampledPoint<X, Y>]) -> QuantityResult<Vec<SampledPoint<X, Y>>>
where
    X: Dimensioned,
    Y: Dimensioned,
{
    points
        .windows(2)
        .map(|pair| {
            let (p, q) = (&pair[0], &pair[1]);
            let x_dims = p.x.dimension();
            let y_dims = p.y.dimension();
            x_dims.ensure_same(q.x.dimension())?;
            y_dims.ensure_same(q.y.dimension())?;
            Ok(SampledPoint::new(
                X::from_magnitude(0.5 * (p.x.magnitude() + q.x.magnitude()), x_dims)?,
                Y::from_magnitude(0.5 * (p.y.magnitude() + q.y.magnitude()), y_dims)?,
            ))
        })
        .collect()
}

/// Point sequence reduced to SI magnitudes plus the common dimensions of
/// abscissas and ordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct MagnitudeSeries {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub x_dims: DimensionVector,
    pub y_dims: DimensionVector,
}

impl MagnitudeSeries {
    /// Split dimensioned points into magnitudes, checking that every point
    /// carries the same dimensions and that the abscissas are valid.
    ///
    /// # Errors
    /// - `InsufficientPoints` / `MalformedPointSequence` from abscissa validation
    /// - `DimensionMismatch` if a point's dimensions differ from the first point's
    pub fn from_points<X, Y>(points: &[SampledPoint<X, Y>]) -> QuantityResult<Self>
    where
        X: Dimensioned,
        Y: Dimensioned,
    {
        let first = points.first().ok_or(QuantityError::InsufficientPoints {
            required: 2,
            found: 0,
        })?;
        let x_dims = first.x.dimension();
        let y_dims = first.y.dimension();

        let mut xs = Vec::with_capacity(points.len());
        let mut ys = Vec::with_capacity(points.len());
        for point in points {
            x_dims.ensure_same(point.x.dimension())?;
            y_dims.ensure_same(point.y.dimension())?;
            xs.push(point.x.magnitude());
            ys.push(point.y.magnitude());
        }

        validate_abscissas(&xs)?;

        Ok(Self {
            xs,
            ys,
            x_dims,
            y_dims,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{DynDimValue, Length, StaticDimValue};

    #[test]
    fn test_validate_abscissas() {
        assert!(validate_abscissas(&[0.0, 1.0, 2.5]).is_ok());
        assert_eq!(
            validate_abscissas(&[1.0]),
            Err(QuantityError::InsufficientPoints {
                required: 2,
                found: 1
            })
        );
        assert_eq!(
            validate_abscissas(&[0.0, 1.0, 1.0]),
            Err(QuantityError::MalformedPointSequence { index: 2 })
        );
        assert_eq!(
            validate_abscissas(&[0.0, -1.0]),
            Err(QuantityError::MalformedPointSequence { index: 1 })
        );
        assert_eq!(
            validate_abscissas(&[f64::NAN, 1.0]),
            Err(QuantityError::MalformedPointSequence { index: 0 })
        );
        assert_eq!(
            validate_abscissas(&[0.0, f64::INFINITY]),
            Err(QuantityError::MalformedPointSequence { index: 1 })
        );
    }

    #[test]
    fn test_series_from_static_points() {
        let points: Vec<SampledPoint<StaticDimValue<Length>, f64>> = (0..4)
            .map(|i| SampledPoint::new(StaticDimValue::new(i as f64), (i * i) as f64))
            .collect();
        let series = MagnitudeSeries::from_points(&points).unwrap();
        assert_eq!(series.xs, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(series.ys, vec![0.0, 1.0, 4.0, 9.0]);
        assert_eq!(series.x_dims, DimensionVector::LENGTH);
        assert!(series.y_dims.is_dimensionless());
    }

    #[test]
    fn test_series_rejects_mixed_dimensions() {
        let points = vec![
            SampledPoint::new(DynDimValue::new(0.0, DimensionVector::LENGTH), 1.0),
            SampledPoint::new(DynDimValue::new(1.0, DimensionVector::TIME), 2.0),
        ];
        assert!(matches!(
            MagnitudeSeries::from_points(&points),
            Err(QuantityError::DimensionMismatch { .. })
        ));

        let empty: Vec<SampledPoint<f64, f64>> = Vec::new();
        assert!(matches!(
            MagnitudeSeries::from_points(&empty),
            Err(QuantityError::InsufficientPoints { found: 0, .. })
        ));
    }

    #[test]
    fn test_midpoints() {
        type Meters = StaticDimValue<Length>;
        let points: Vec<SampledPoint<Meters, f64>> = [(0.0, 4.0), (1.0, 2.0), (4.0, -2.0)]
            .iter()
            .map(|&(x, y)| SampledPoint::new(Meters::new(x), y))
            .collect();
        let mids = midpoints(&points).unwrap();
        assert_eq!(mids.len(), 2);
        assert_eq!(mids[0], SampledPoint::new(Meters::new(0.5), 3.0));
        assert_eq!(mids[1], SampledPoint::new(Meters::new(2.5), 0.0));

        assert!(midpoints(&points[..1]).unwrap().is_empty());
        assert!(midpoints::<f64, f64>(&[]).unwrap().is_empty());

        let mixed = vec![
            SampledPoint::new(DynDimValue::new(0.0, DimensionVector::LENGTH), 1.0),
            SampledPoint::new(DynDimValue::new(1.0, DimensionVector::TIME), 2.0),
        ];
        assert!(matches!(
            midpoints(&mixed),
            Err(QuantityError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_point_from_tuple() {
        let p: SampledPoint<f64, f64> = (1.0, 2.0).into();
        assert_eq!(p, SampledPoint::new(1.0, 2.0));
    }
}
