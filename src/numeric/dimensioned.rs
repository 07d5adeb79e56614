// ============================================================================
// Dimensioned Trait
// Boundary between typed dimensioned values and the f64 numeric engines
// ============================================================================

use super::dimension::DimensionVector;
use super::dynamic_dim::DynDimValue;
use super::errors::QuantityResult;
use super::static_dim::{Dimension, StaticDimValue};
use std::marker::PhantomData;

/// Any scalar that can be split into an SI magnitude and a dimension, and
/// rebuilt from them.
///
/// The integrator, the subdivision stack and the tables all compute on plain
/// `f64` magnitudes; this trait is how arguments and results cross that
/// boundary. It is implemented for `f64` (dimensionless), [`StaticDimValue`]
/// and [`DynDimValue`].
pub trait Dimensioned: Copy + std::fmt::Debug {
    /// Exponents of this value's dimension.
    fn dimension(&self) -> DimensionVector;

    /// Magnitude in SI base units.
    fn magnitude(&self) -> f64;

    /// Rebuild a value from a magnitude and dimension.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if `Self` cannot carry `dims`.
    fn from_magnitude(magnitude: f64, dims: DimensionVector) -> QuantityResult<Self>;
}

impl Dimensioned for f64 {
    #[inline]
    fn dimension(&self) -> DimensionVector {
        DimensionVector::NONE
    }

    #[inline]
    fn magnitude(&self) -> f64 {
        *self
    }

    #[inline]
    fn from_magnitude(magnitude: f64, dims: DimensionVector) -> QuantityResult<Self> {
        DimensionVector::NONE.ensure_same(dims)?;
        Ok(magnitude)
    }
}

impl<D: Dimension> Dimensioned for StaticDimValue<D> {
    #[inline]
    fn dimension(&self) -> DimensionVector {
        D::EXPONENTS
    }

    #[inline]
    fn magnitude(&self) -> f64 {
        StaticDimValue::magnitude(*self)
    }

    #[inline]
    fn from_magnitude(magnitude: f64, dims: DimensionVector) -> QuantityResult<Self> {
        D::EXPONENTS.ensure_same(dims)?;
        Ok(StaticDimValue::new(magnitude))
    }
}

impl Dimensioned for DynDimValue {
    #[inline]
    fn dimension(&self) -> DimensionVector {
        self.dims()
    }

    #[inline]
    fn magnitude(&self) -> f64 {
        DynDimValue::magnitude(*self)
    }

    #[inline]
    fn from_magnitude(magnitude: f64, dims: DimensionVector) -> QuantityResult<Self> {
        Ok(DynDimValue::new(magnitude, dims))
    }
}

/// A dimensioned callback `f: X -> Y` seen as a function of magnitudes.
///
/// The dimension of `Y` is learned from the first call; every later result
/// must carry the same dimension (a `DynDimValue`-returning closure could
/// otherwise change it mid-walk).
pub(crate) struct MagnitudeFn<X, Y, F> {
    f: F,
    x_dims: DimensionVector,
    y_dims: Option<DimensionVector>,
    evaluations: usize,
    _types: PhantomData<fn(X) -> Y>,
}

impl<X, Y, F> MagnitudeFn<X, Y, F>
where
    X: Dimensioned,
    Y: Dimensioned,
    F: FnMut(X) -> Y,
{
    pub(crate) fn new(f: F, x_dims: DimensionVector) -> Self {
        Self {
            f,
            x_dims,
            y_dims: None,
            evaluations: 0,
            _types: PhantomData,
        }
    }

    /// Evaluate at the SI magnitude `x`.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the result's dimension differs from
    /// earlier results, or if `X` cannot carry the argument dimension.
    pub(crate) fn call(&mut self, x: f64) -> QuantityResult<f64> {
        let y = (self.f)(X::from_magnitude(x, self.x_dims)?);
        self.evaluations += 1;
        let dims = y.dimension();
        match self.y_dims {
            Some(expected) => expected.ensure_same(dims)?,
            None => self.y_dims = Some(dims),
        }
        Ok(y.magnitude())
    }

    /// Dimension of the results seen so far (dimensionless before any call).
    #[inline]
    pub(crate) fn y_dims(&self) -> DimensionVector {
        self.y_dims.unwrap_or(DimensionVector::NONE)
    }

    #[inline]
    pub(crate) fn evaluations(&self) -> usize {
        self.evaluations
    }
}

/// Real `r`-th root that keeps the sign for odd roots of negative numbers.
pub(crate) fn nth_root(value: f64, r: i32) -> f64 {
    match r {
        1 => value,
        2 => value.sqrt(),
        3 => value.cbrt(),
        _ if value < 0.0 && r % 2 != 0 => -(-value).powf(1.0 / r as f64),
        _ => value.powf(1.0 / r as f64),
    }
}
