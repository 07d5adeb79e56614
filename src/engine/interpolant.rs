// ============================================================================
// Interpolant
// User-facing approximated function over a table of SI magnitudes
// ============================================================================

use crate::domain::{DenseTable, MagnitudeSeries, SampledPoint, SamplingConfig, SparseTable};
use crate::engine::subinterval::sample_adaptively;
use crate::interfaces::Table;
use crate::numeric::{DimensionVector, Dimensioned, MagnitudeFn, QuantityError, QuantityResult};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Div, Mul};

/// Piecewise approximation of a function `X -> Y`.
///
/// Owns exactly one [`Table`] plus the dimensions used to turn stored
/// magnitudes back into `X` and `Y`. Every algebraic operation builds a new
/// table; an interpolant is never modified in place.
///
/// # Example
/// ```
/// use dimnum::engine::Interpolant;
///
/// let f = Interpolant::<f64, f64>::from_pairs(vec![(0.0, 0.0), (1.0, 2.0), (2.0, 0.0)]).unwrap();
/// assert_eq!(f.evaluate(0.5).unwrap(), 1.0);
/// assert_eq!(f.total_integral().unwrap(), 2.0);
///
/// let g = &f * 3.0;
/// assert_eq!(g.evaluate(1.0).unwrap(), 6.0);
/// ```
pub struct Interpolant<X, Y> {
    table: Box<dyn Table>,
    x_dims: DimensionVector,
    y_dims: DimensionVector,
    _types: PhantomData<fn(X) -> Y>,
}

impl<X, Y> Clone for Interpolant<X, Y> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.boxed_clone(),
            x_dims: self.x_dims,
            y_dims: self.y_dims,
            _types: PhantomData,
        }
    }
}

impl<X, Y> fmt::Debug for Interpolant<X, Y> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpolant")
            .field("table", &self.table)
            .field("x_dims", &self.x_dims)
            .field("y_dims", &self.y_dims)
            .finish()
    }
}

impl<X, Y> Interpolant<X, Y>
where
    X: Dimensioned,
    Y: Dimensioned,
{
    pub(crate) fn from_table(
        table: Box<dyn Table>,
        x_dims: DimensionVector,
        y_dims: DimensionVector,
    ) -> Self {
        Self {
            table,
            x_dims,
            y_dims,
            _types: PhantomData,
        }
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Piecewise-linear interpolant through externally supplied points.
    ///
    /// # Errors
    /// - `InsufficientPoints` for fewer than two points
    /// - `MalformedPointSequence` if abscissas are not strictly increasing
    /// - `DimensionMismatch` if points disagree in dimension
    pub fn from_points(points: &[SampledPoint<X, Y>]) -> QuantityResult<Self> {
        let series = MagnitudeSeries::from_points(points)?;
        let table = SparseTable::linear(series.xs, series.ys)?;
        Ok(Self::from_table(
            Box::new(table),
            series.x_dims,
            series.y_dims,
        ))
    }

    /// Same as [`Interpolant::from_points`] for `(x, y)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (X, Y)>) -> QuantityResult<Self> {
        let points: Vec<SampledPoint<X, Y>> = pairs.into_iter().map(SampledPoint::from).collect();
        Self::from_points(&points)
    }

    /// Interpolant over uniformly spaced abscissas `first + i·delta`.
    ///
    /// # Errors
    /// - `InsufficientPoints` for fewer than two ordinates
    /// - `MalformedPointSequence` if `delta` is not positive
    /// - `DimensionMismatch` if `first` and `delta`, or the ordinates,
    ///   disagree in dimension
    pub fn from_uniform(first: X, delta: X, ordinates: &[Y]) -> QuantityResult<Self> {
        let x_dims = first.dimension();
        x_dims.ensure_same(delta.dimension())?;

        let y_dims = match ordinates.first() {
            Some(y) => y.dimension(),
            None => {
                return Err(QuantityError::InsufficientPoints {
                    required: 2,
                    found: 0,
                })
            },
        };
        let mut ys = Vec::with_capacity(ordinates.len());
        for y in ordinates {
            y_dims.ensure_same(y.dimension())?;
            ys.push(y.magnitude());
        }

        let table = DenseTable::new(first.magnitude(), delta.magnitude(), ys)?;
        Ok(Self::from_table(Box::new(table), x_dims, y_dims))
    }

    /// Sample `f` adaptively on `[a, b]` until linear interpolation is
    /// accurate to the configured tolerance.
    ///
    /// # Errors
    /// - `DimensionMismatch` if the bounds differ in dimension or `f`
    ///   changes the dimension of its result
    /// - `Convergence` if the minimum interval width is reached
    /// - `InvalidConfiguration` if `config` fails validation
    pub fn sample<F>(f: F, a: X, b: X, config: &SamplingConfig) -> QuantityResult<Self>
    where
        F: FnMut(X) -> Y,
    {
        let x_dims = a.dimension();
        x_dims.ensure_same(b.dimension())?;

        let mut g = MagnitudeFn::new(f, x_dims);
        let sampling = sample_adaptively(
            &mut |x: f64| g.call(x),
            a.magnitude(),
            b.magnitude(),
            config,
        )?;
        let table = SparseTable::linear(sampling.xs, sampling.ys)?;
        Ok(Self::from_table(Box::new(table), x_dims, g.y_dims()))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Interpolated value at `x`.
    ///
    /// # Errors
    /// - `DimensionMismatch` if `x` has the wrong dimension
    /// - `OutOfRange` if `x` is outside the domain
    pub fn evaluate(&self, x: X) -> QuantityResult<Y> {
        self.x_dims.ensure_same(x.dimension())?;
        let y = self.table.evaluate(x.magnitude())?;
        Y::from_magnitude(y, self.y_dims)
    }

    /// Integral over `[a, b]`; a reversed range gives the negated value.
    ///
    /// # Errors
    /// - `DimensionMismatch` if a bound has the wrong dimension
    /// - `OutOfRange` if a bound is outside the domain
    pub fn integral(&self, a: X, b: X) -> QuantityResult<<Y as Mul<X>>::Output>
    where
        Y: Mul<X>,
        <Y as Mul<X>>::Output: Dimensioned,
    {
        self.x_dims.ensure_same(a.dimension())?;
        self.x_dims.ensure_same(b.dimension())?;
        let value = self.table.integral(a.magnitude(), b.magnitude())?;
        <<Y as Mul<X>>::Output as Dimensioned>::from_magnitude(value, self.y_dims.product(self.x_dims)?)
    }

    /// Integral over the whole domain.
    pub fn total_integral(&self) -> QuantityResult<<Y as Mul<X>>::Output>
    where
        Y: Mul<X>,
        <Y as Mul<X>>::Output: Dimensioned,
    {
        <<Y as Mul<X>>::Output as Dimensioned>::from_magnitude(
            self.table.total_integral(),
            self.y_dims.product(self.x_dims)?,
        )
    }

    /// First and last breakpoint.
    pub fn domain(&self) -> QuantityResult<(X, X)> {
        let (lo, hi) = self.table.domain();
        Ok((
            X::from_magnitude(lo, self.x_dims)?,
            X::from_magnitude(hi, self.x_dims)?,
        ))
    }

    /// Breakpoints with their stored ordinates.
    pub fn points(&self) -> QuantityResult<Vec<SampledPoint<X, Y>>> {
        self.table
            .breakpoints()
            .into_iter()
            .zip(self.table.ordinates())
            .map(|(x, &y)| {
                Ok(SampledPoint::new(
                    X::from_magnitude(x, self.x_dims)?,
                    Y::from_magnitude(y, self.y_dims)?,
                ))
            })
            .collect()
    }

    #[inline]
    pub fn table_name(&self) -> &'static str {
        self.table.name()
    }

    #[inline]
    pub fn table(&self) -> &dyn Table {
        self.table.as_ref()
    }

    #[inline]
    pub fn x_dims(&self) -> DimensionVector {
        self.x_dims
    }

    #[inline]
    pub fn y_dims(&self) -> DimensionVector {
        self.y_dims
    }

    // ========================================================================
    // Algebra
    // ========================================================================

    /// New interpolant with every ordinate multiplied by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        Self::from_table(self.table.scaled(factor), self.x_dims, self.y_dims)
    }

    /// Multiply by a dimensioned constant.
    ///
    /// # Errors
    /// Returns `ExponentOverflow` if the combined dimension is not representable.
    pub fn mul_quantity<V>(&self, value: V) -> QuantityResult<Interpolant<X, <Y as Mul<V>>::Output>>
    where
        V: Dimensioned,
        Y: Mul<V>,
        <Y as Mul<V>>::Output: Dimensioned,
    {
        Ok(Interpolant::from_table(
            self.table.scaled(value.magnitude()),
            self.x_dims,
            self.y_dims.product(value.dimension())?,
        ))
    }

    /// Divide by a dimensioned constant.
    ///
    /// # Errors
    /// Returns `ExponentOverflow` if the combined dimension is not representable.
    pub fn div_quantity<V>(&self, value: V) -> QuantityResult<Interpolant<X, <Y as Div<V>>::Output>>
    where
        V: Dimensioned,
        Y: Div<V>,
        <Y as Div<V>>::Output: Dimensioned,
    {
        Ok(Interpolant::from_table(
            self.table.scaled(value.magnitude().recip()),
            self.x_dims,
            self.y_dims.quotient(value.dimension())?,
        ))
    }

    /// Pointwise product, resampled at the union of both breakpoint sets
    /// inside the common domain.
    ///
    /// # Errors
    /// - `DimensionMismatch` if the abscissa dimensions differ
    /// - `DomainMismatch` if the domains overlap in less than an interval
    /// - `ExponentOverflow` if the combined dimension is not representable
    pub fn mul_interpolant<Z>(
        &self,
        other: &Interpolant<X, Z>,
    ) -> QuantityResult<Interpolant<X, <Y as Mul<Z>>::Output>>
    where
        Z: Dimensioned,
        Y: Mul<Z>,
        <Y as Mul<Z>>::Output: Dimensioned,
    {
        let y_dims = self.y_dims.product(other.y_dims)?;
        let table = self.combine(other, |l, r| l * r)?;
        Ok(Interpolant::from_table(table, self.x_dims, y_dims))
    }

    /// Pointwise quotient, resampled like [`Interpolant::mul_interpolant`].
    ///
    /// # Errors
    /// Same as [`Interpolant::mul_interpolant`].
    pub fn div_interpolant<Z>(
        &self,
        other: &Interpolant<X, Z>,
    ) -> QuantityResult<Interpolant<X, <Y as Div<Z>>::Output>>
    where
        Z: Dimensioned,
        Y: Div<Z>,
        <Y as Div<Z>>::Output: Dimensioned,
    {
        let y_dims = self.y_dims.quotient(other.y_dims)?;
        let table = self.combine(other, |l, r| l / r)?;
        Ok(Interpolant::from_table(table, self.x_dims, y_dims))
    }

    /// Evaluate `op` of both tables at every breakpoint of either one that
    /// lies in the domain intersection.
    fn combine<Z>(
        &self,
        other: &Interpolant<X, Z>,
        op: impl Fn(f64, f64) -> f64,
    ) -> QuantityResult<Box<dyn Table>> {
        self.x_dims.ensure_same(other.x_dims)?;

        let left = self.table.domain();
        let right = other.table.domain();
        let lo = left.0.max(right.0);
        let hi = left.1.min(right.1);
        if !(lo < hi) {
            return Err(QuantityError::DomainMismatch { left, right });
        }

        let mut xs: Vec<f64> = self
            .table
            .breakpoints()
            .into_iter()
            .chain(other.table.breakpoints())
            .filter(|x| *x > lo && *x < hi)
            .chain([lo, hi])
            .collect();
        xs.sort_by(f64::total_cmp);
        xs.dedup();

        let ys = xs
            .iter()
            .map(|&x| Ok(op(self.table.evaluate(x)?, other.table.evaluate(x)?)))
            .collect::<QuantityResult<Vec<f64>>>()?;

        tracing::debug!(
            "combined {} and {} over [{}, {}] at {} breakpoints",
            self.table.name(),
            other.table.name(),
            lo,
            hi,
            xs.len()
        );

        Ok(Box::new(SparseTable::linear(xs, ys)?))
    }
}

// ============================================================================
// Operators
// ============================================================================

impl<X: Dimensioned, Y: Dimensioned> Mul<f64> for &Interpolant<X, Y> {
    type Output = Interpolant<X, Y>;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl<X: Dimensioned, Y: Dimensioned> Div<f64> for &Interpolant<X, Y> {
    type Output = Interpolant<X, Y>;

    fn div(self, rhs: f64) -> Self::Output {
        self.scale(rhs.recip())
    }
}

impl<X: Dimensioned, Y: Dimensioned> Mul<f64> for Interpolant<X, Y> {
    type Output = Interpolant<X, Y>;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl<X: Dimensioned, Y: Dimensioned> Div<f64> for Interpolant<X, Y> {
    type Output = Interpolant<X, Y>;

    fn div(self, rhs: f64) -> Self::Output {
        self.scale(rhs.recip())
    }
}

impl<'a, X, Y, Z> Mul<&'a Interpolant<X, Z>> for &Interpolant<X, Y>
where
    X: Dimensioned,
    Y: Dimensioned + Mul<Z>,
    Z: Dimensioned,
    <Y as Mul<Z>>::Output: Dimensioned,
{
    type Output = QuantityResult<Interpolant<X, <Y as Mul<Z>>::Output>>;

    fn mul(self, rhs: &'a Interpolant<X, Z>) -> Self::Output {
        self.mul_interpolant(rhs)
    }
}

impl<'a, X, Y, Z> Div<&'a Interpolant<X, Z>> for &Interpolant<X, Y>
where
    X: Dimensioned,
    Y: Dimensioned + Div<Z>,
    Z: Dimensioned,
    <Y as Div<Z>>::Output: Dimensioned,
{
    type Output = QuantityResult<Interpolant<X, <Y as Div<Z>>::Output>>;

    fn div(self, rhs: &'a Interpolant<X, Z>) -> Self::Output {
        self.div_interpolant(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{DynDimValue, Length, Mass, StaticDimValue, Time};
    use proptest::prelude::*;

    type Meters = StaticDimValue<Length>;
    type Seconds = StaticDimValue<Time>;

    fn m(v: f64) -> Meters {
        Meters::new(v)
    }

    fn s(v: f64) -> Seconds {
        Seconds::new(v)
    }

    /// Position of a body under constant 2 m/s² acceleration, sampled each second
    fn trajectory() -> Interpolant<Seconds, Meters> {
        Interpolant::from_pairs((0..=4).map(|i| (s(i as f64), m((i * i) as f64)))).unwrap()
    }

    #[test]
    fn test_evaluate_and_integral() {
        let x = trajectory();
        assert_eq!(x.evaluate(s(2.0)).unwrap(), m(4.0));
        assert_eq!(x.evaluate(s(2.5)).unwrap(), m(6.5));
        let area = x.integral(s(0.0), s(2.0)).unwrap();
        assert_eq!(area.magnitude(), 3.0);
        assert_eq!(x.total_integral().unwrap().magnitude(), 22.0);
        assert_eq!(x.domain().unwrap(), (s(0.0), s(4.0)));
        assert_eq!(x.table_name(), "SparseTable");
        assert_eq!(x.points().unwrap().len(), 5);
    }

    #[test]
    fn test_out_of_range() {
        let x = trajectory();
        assert!(matches!(
            x.evaluate(s(4.5)),
            Err(QuantityError::OutOfRange { .. })
        ));
        assert!(matches!(
            x.integral(s(-1.0), s(1.0)),
            Err(QuantityError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_dynamic_argument_checked() {
        let f: Interpolant<DynDimValue, f64> = Interpolant::from_pairs(vec![
            (DynDimValue::new(0.0, DimensionVector::LENGTH), 1.0),
            (DynDimValue::new(1.0, DimensionVector::LENGTH), 3.0),
        ])
        .unwrap();
        assert_eq!(f.evaluate(DynDimValue::new(0.5, DimensionVector::LENGTH)).unwrap(), 2.0);
        assert!(matches!(
            f.evaluate(DynDimValue::new(0.5, DimensionVector::TIME)),
            Err(QuantityError::DimensionMismatch { .. })
        ));
        let area = f
            .integral(
                DynDimValue::new(0.0, DimensionVector::LENGTH),
                DynDimValue::new(1.0, DimensionVector::LENGTH),
            )
            .unwrap();
        assert_eq!(area, DynDimValue::new(2.0, DimensionVector::LENGTH));
    }

    #[test]
    fn test_malformed_points() {
        let result = Interpolant::<f64, f64>::from_pairs(vec![(0.0, 1.0), (2.0, 1.0), (1.0, 1.0)]);
        assert!(matches!(
            result,
            Err(QuantityError::MalformedPointSequence { index: 2 })
        ));
    }

    #[test]
    fn test_uniform_interpolant() {
        let f = Interpolant::from_uniform(s(0.0), s(0.5), &[m(0.0), m(1.0), m(1.0)]).unwrap();
        assert_eq!(f.table_name(), "DenseTable");
        assert_eq!(f.evaluate(s(0.25)).unwrap(), m(0.5));
        assert_eq!(f.total_integral().unwrap().magnitude(), 0.75);
        assert!(Interpolant::<Seconds, Meters>::from_uniform(s(0.0), s(1.0), &[]).is_err());
        assert!(Interpolant::<Seconds, Meters>::from_uniform(s(0.0), s(-1.0), &[m(0.0), m(1.0)]).is_err());
    }

    #[test]
    fn test_sampled_interpolant() {
        let config = SamplingConfig::new(1.0e-5);
        let f = Interpolant::sample(|t: Seconds| m(t.magnitude().sin()), s(0.0), s(3.0), &config).unwrap();
        for k in 0..=30 {
            let t = 0.1 * k as f64;
            let y = f.evaluate(s(t)).unwrap().magnitude();
            assert!((y - t.sin()).abs() < 1.0e-4);
        }
        assert_eq!(f.y_dims(), DimensionVector::LENGTH);
    }

    #[test]
    fn test_scalar_and_quantity_algebra() {
        let x = trajectory();
        let doubled = &x * 2.0;
        assert_eq!(doubled.evaluate(s(3.0)).unwrap(), m(18.0));
        let halved = &x / 2.0;
        assert_eq!(halved.evaluate(s(2.0)).unwrap(), m(2.0));
        // Original untouched
        assert_eq!(x.evaluate(s(3.0)).unwrap(), m(9.0));

        let mass = StaticDimValue::<Mass>::new(3.0);
        let moment = x.mul_quantity(mass).unwrap();
        assert_eq!(moment.evaluate(s(2.0)).unwrap().magnitude(), 12.0);
        assert_eq!(moment.y_dims(), DimensionVector::LENGTH + DimensionVector::MASS);

        let per_time = x.div_quantity(s(2.0)).unwrap();
        assert_eq!(per_time.evaluate(s(4.0)).unwrap().magnitude(), 8.0);
        assert_eq!(per_time.y_dims(), DimensionVector::LENGTH - DimensionVector::TIME);

        let scaled = x.clone() * 0.5;
        assert_eq!(scaled.total_integral().unwrap().magnitude(), 11.0);
    }

    #[test]
    fn test_interpolant_product() {
        let a = Interpolant::<f64, f64>::from_pairs(vec![(0.0, 1.0), (2.0, 3.0)]).unwrap();
        let b = Interpolant::<f64, f64>::from_pairs(vec![(1.0, 2.0), (1.5, 1.0), (3.0, 3.0)]).unwrap();

        let product = (&a * &b).unwrap();
        assert_eq!(product.domain().unwrap(), (1.0, 2.0));
        let xs: Vec<f64> = product.points().unwrap().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 1.5, 2.0]);
        for p in product.points().unwrap() {
            let expected = a.evaluate(p.x).unwrap() * b.evaluate(p.x).unwrap();
            assert_eq!(p.y, expected);
        }

        let quotient = (&a / &b).unwrap();
        assert_eq!(quotient.evaluate(1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_dimensioned_product() {
        let velocity: Interpolant<Seconds, StaticDimValue<crate::numeric::Velocity>> =
            Interpolant::from_pairs(vec![(s(0.0), m(0.0) / s(1.0)), (s(2.0), m(4.0) / s(1.0))])
                .unwrap();
        let mass: Interpolant<Seconds, StaticDimValue<Mass>> =
            Interpolant::from_pairs(vec![(s(0.0), StaticDimValue::new(2.0)), (s(2.0), StaticDimValue::new(2.0))])
                .unwrap();
        let momentum = velocity.mul_interpolant(&mass).unwrap();
        assert_eq!(
            momentum.y_dims(),
            DimensionVector::new(-1, 1, 1, 0, 0)
        );
        assert_eq!(momentum.evaluate(s(1.0)).unwrap().magnitude(), 4.0);
    }

    #[test]
    fn test_disjoint_domains() {
        let a = Interpolant::<f64, f64>::from_pairs(vec![(0.0, 1.0), (1.0, 1.0)]).unwrap();
        let b = Interpolant::<f64, f64>::from_pairs(vec![(2.0, 1.0), (3.0, 1.0)]).unwrap();
        assert_eq!(
            a.mul_interpolant(&b).unwrap_err(),
            QuantityError::DomainMismatch {
                left: (0.0, 1.0),
                right: (2.0, 3.0)
            }
        );

        // Touching at a single point is not an overlap
        let c = Interpolant::<f64, f64>::from_pairs(vec![(1.0, 1.0), (2.0, 1.0)]).unwrap();
        assert!(matches!(
            a.div_interpolant(&c),
            Err(QuantityError::DomainMismatch { .. })
        ));
    }

    #[test]
    fn test_mismatched_argument_dims() {
        let a: Interpolant<DynDimValue, f64> = Interpolant::from_pairs(vec![
            (DynDimValue::new(0.0, DimensionVector::TIME), 1.0),
            (DynDimValue::new(1.0, DimensionVector::TIME), 1.0),
        ])
        .unwrap();
        let b: Interpolant<DynDimValue, f64> = Interpolant::from_pairs(vec![
            (DynDimValue::new(0.0, DimensionVector::LENGTH), 1.0),
            (DynDimValue::new(1.0, DimensionVector::LENGTH), 1.0),
        ])
        .unwrap();
        assert!(matches!(
            a.mul_interpolant(&b),
            Err(QuantityError::DimensionMismatch { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_product_matches_pointwise(
            ya in prop::collection::vec(-5.0f64..5.0, 2..12),
            yb in prop::collection::vec(-5.0f64..5.0, 2..12),
            t in 0.0f64..1.0,
        ) {
            let a = Interpolant::<f64, f64>::from_pairs(
                ya.iter().enumerate().map(|(i, y)| (i as f64 / (ya.len() - 1) as f64, *y)),
            ).unwrap();
            let b = Interpolant::<f64, f64>::from_pairs(
                yb.iter().enumerate().map(|(i, y)| (i as f64 / (yb.len() - 1) as f64, *y)),
            ).unwrap();
            let product = (&a * &b).unwrap();

            // Exact at every resampled breakpoint
            for p in product.points().unwrap() {
                prop_assert_eq!(p.y, a.evaluate(p.x).unwrap() * b.evaluate(p.x).unwrap());
            }

            // Between breakpoints the error is the curvature of the product of
            // two lines over one interval
            let exact = a.evaluate(t).unwrap() * b.evaluate(t).unwrap();
            let approx = product.evaluate(t).unwrap();
            let sa = ya.iter().fold(0.0f64, |m, y| m.max(y.abs())) * (ya.len() as f64);
            let sb = yb.iter().fold(0.0f64, |m, y| m.max(y.abs())) * (yb.len() as f64);
            prop_assert!((exact - approx).abs() <= 0.5 * sa * sb + 1e-9);
        }
    }
}
