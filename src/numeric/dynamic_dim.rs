// ============================================================================
// Dynamic Dimensioned Value
// Dimension carried alongside the magnitude and checked at runtime
// ============================================================================

use super::dimension::DimensionVector;
use super::dimensioned::nth_root;
use super::errors::{QuantityError, QuantityResult};
use super::static_dim::{Dimension, StaticDimValue};
use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scalar whose dimension is runtime data.
///
/// Multiplication and division combine exponents. The operators panic if an
/// exponent leaves the `i32` range; `checked_mul`, `checked_div` and `powi`
/// report it as `ExponentOverflow` instead. Addition, subtraction and ordering require equal dimensions; the `+` and
/// `-` operators therefore return a [`QuantityResult`].
///
/// # Example
/// ```
/// use dimnum::numeric::{DimensionVector, DynDimValue, QuantityError};
///
/// let length = DynDimValue::new(3.0, DimensionVector::LENGTH);
/// let time = DynDimValue::new(2.0, DimensionVector::TIME);
///
/// let speed = length / time;
/// assert_eq!(speed.dims(), DimensionVector::new(-1, 1, 0, 0, 0));
///
/// assert!(matches!(length + time, Err(QuantityError::DimensionMismatch { .. })));
/// assert_eq!((length + length).unwrap().magnitude(), 6.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DynDimValue {
    magnitude: f64,
    dims: DimensionVector,
}

impl DynDimValue {
    /// Create from a magnitude in SI base units and its dimension.
    #[inline]
    pub const fn new(magnitude: f64, dims: DimensionVector) -> Self {
        Self { magnitude, dims }
    }

    /// Dimensionless value.
    #[inline]
    pub const fn scalar(magnitude: f64) -> Self {
        Self::new(magnitude, DimensionVector::NONE)
    }

    #[inline]
    pub const fn magnitude(self) -> f64 {
        self.magnitude
    }

    #[inline]
    pub const fn dims(self) -> DimensionVector {
        self.dims
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self::new(self.magnitude.abs(), self.dims)
    }

    // ========================================================================
    // Checked Arithmetic
    // ========================================================================

    /// Checked addition.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the dimensions differ.
    #[inline]
    pub fn checked_add(self, rhs: Self) -> QuantityResult<Self> {
        self.dims.ensure_same(rhs.dims)?;
        Ok(Self::new(self.magnitude + rhs.magnitude, self.dims))
    }

    /// Checked subtraction.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the dimensions differ.
    #[inline]
    pub fn checked_sub(self, rhs: Self) -> QuantityResult<Self> {
        self.dims.ensure_same(rhs.dims)?;
        Ok(Self::new(self.magnitude - rhs.magnitude, self.dims))
    }

    /// Checked multiplication.
    ///
    /// # Errors
    /// Returns `ExponentOverflow` if a combined exponent is not representable.
    #[inline]
    pub fn checked_mul(self, rhs: Self) -> QuantityResult<Self> {
        let dims = self.dims.product(rhs.dims)?;
        Ok(Self::new(self.magnitude * rhs.magnitude, dims))
    }

    /// Checked division.
    ///
    /// # Errors
    /// Returns `ExponentOverflow` if a combined exponent is not representable.
    #[inline]
    pub fn checked_div(self, rhs: Self) -> QuantityResult<Self> {
        let dims = self.dims.quotient(rhs.dims)?;
        Ok(Self::new(self.magnitude / rhs.magnitude, dims))
    }

    /// Raise to an integer power.
    ///
    /// # Errors
    /// Returns `ExponentOverflow` if a scaled exponent is not representable.
    #[inline]
    pub fn powi(self, power: i32) -> QuantityResult<Self> {
        let dims = self.dims.power(power)?;
        Ok(Self::new(self.magnitude.powi(power), dims))
    }

    /// Take an integer root.
    ///
    /// # Errors
    /// - `InvalidRoot` if `root` is zero or negative
    /// - `NonIntegerRootExponent` if `root` does not divide every exponent
    pub fn root(self, root: i32) -> QuantityResult<Self> {
        let dims = self.dims.root(root)?;
        Ok(Self::new(nth_root(self.magnitude, root), dims))
    }

    #[inline]
    pub fn sqrt(self) -> QuantityResult<Self> {
        self.root(2)
    }

    // ========================================================================
    // Checked Comparison
    // ========================================================================

    /// Compare magnitudes after confirming equal dimensions.
    ///
    /// The inner `None` means one of the magnitudes is NaN.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the dimensions differ.
    #[inline]
    pub fn try_partial_cmp(&self, other: &Self) -> QuantityResult<Option<Ordering>> {
        self.dims.ensure_same(other.dims)?;
        Ok(self.magnitude.partial_cmp(&other.magnitude))
    }

    /// Exact (no epsilon) equality after confirming equal dimensions.
    pub fn try_eq(&self, other: &Self) -> QuantityResult<bool> {
        self.dims.ensure_same(other.dims)?;
        Ok(self.magnitude == other.magnitude)
    }

    pub fn try_lt(&self, other: &Self) -> QuantityResult<bool> {
        self.dims.ensure_same(other.dims)?;
        Ok(self.magnitude < other.magnitude)
    }

    pub fn try_le(&self, other: &Self) -> QuantityResult<bool> {
        self.dims.ensure_same(other.dims)?;
        Ok(self.magnitude <= other.magnitude)
    }

    pub fn try_gt(&self, other: &Self) -> QuantityResult<bool> {
        self.dims.ensure_same(other.dims)?;
        Ok(self.magnitude > other.magnitude)
    }

    pub fn try_ge(&self, other: &Self) -> QuantityResult<bool> {
        self.dims.ensure_same(other.dims)?;
        Ok(self.magnitude >= other.magnitude)
    }

    // ========================================================================
    // Static Conversion
    // ========================================================================

    /// Convert to a statically tagged value, asserting its dimension.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` unless `self.dims() == D::EXPONENTS`.
    pub fn to_static<D: Dimension>(self) -> QuantityResult<StaticDimValue<D>> {
        D::EXPONENTS.ensure_same(self.dims)?;
        Ok(StaticDimValue::new(self.magnitude))
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl<D: Dimension> From<StaticDimValue<D>> for DynDimValue {
    #[inline]
    fn from(value: StaticDimValue<D>) -> Self {
        Self::new(value.magnitude(), D::EXPONENTS)
    }
}

impl<D: Dimension> TryFrom<DynDimValue> for StaticDimValue<D> {
    type Error = QuantityError;

    #[inline]
    fn try_from(value: DynDimValue) -> Result<Self, Self::Error> {
        value.to_static()
    }
}

impl From<f64> for DynDimValue {
    #[inline]
    fn from(value: f64) -> Self {
        Self::scalar(value)
    }
}

// ============================================================================
// Comparison
// ============================================================================

/// Equal only when both dimensions and magnitudes match.
impl PartialEq for DynDimValue {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.dims == other.dims && self.magnitude == other.magnitude
    }
}

/// Values of different dimensions are unordered (`None`), so every ordering
/// operator between them evaluates to `false`. Use `try_partial_cmp` to get
/// an inspectable `DimensionMismatch` instead.
impl PartialOrd for DynDimValue {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_partial_cmp(other).ok().flatten()
    }
}

// ============================================================================
// Operators
// ============================================================================

impl Add for DynDimValue {
    type Output = QuantityResult<DynDimValue>;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs)
    }
}

impl Sub for DynDimValue {
    type Output = QuantityResult<DynDimValue>;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs)
    }
}

impl Neg for DynDimValue {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self::new(-self.magnitude, self.dims)
    }
}

// Infallible operators for ergonomics (panic on exponent overflow - use
// checked_mul/checked_div where exponents are not known to be small)
impl Mul for DynDimValue {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self::new(self.magnitude * rhs.magnitude, self.dims + rhs.dims)
    }
}

impl Div for DynDimValue {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self::Output {
        Self::new(self.magnitude / rhs.magnitude, self.dims - rhs.dims)
    }
}

impl Mul<f64> for DynDimValue {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.magnitude * rhs, self.dims)
    }
}

impl Div<f64> for DynDimValue {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.magnitude / rhs, self.dims)
    }
}

impl Mul<DynDimValue> for f64 {
    type Output = DynDimValue;

    #[inline]
    fn mul(self, rhs: DynDimValue) -> Self::Output {
        DynDimValue::new(self * rhs.magnitude, rhs.dims)
    }
}

impl Div<DynDimValue> for f64 {
    type Output = DynDimValue;

    #[inline]
    fn div(self, rhs: DynDimValue) -> Self::Output {
        DynDimValue::new(self / rhs.magnitude, -rhs.dims)
    }
}
