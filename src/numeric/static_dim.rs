// ============================================================================
// Static Dimensioned Value
// Dimension carried in the type, checked entirely at compile time
// ============================================================================

use super::dimension::DimensionVector;
use super::dimensioned::nth_root;
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// A physical dimension known at compile time.
///
/// Implementors are zero-sized markers; the exponents live in the associated
/// constant so that combinators such as [`Product`] can compute them in const
/// context.
pub trait Dimension: 'static {
    /// Exponents of this dimension.
    const EXPONENTS: DimensionVector;
}

// ============================================================================
// Base Dimensions
// ============================================================================

/// Pure number.
#[derive(Debug)]
pub enum Dimensionless {}

#[derive(Debug)]
pub enum Time {}

#[derive(Debug)]
pub enum Length {}

#[derive(Debug)]
pub enum Mass {}

#[derive(Debug)]
pub enum Charge {}

#[derive(Debug)]
pub enum Temperature {}

impl Dimension for Dimensionless {
    const EXPONENTS: DimensionVector = DimensionVector::NONE;
}

impl Dimension for Time {
    const EXPONENTS: DimensionVector = DimensionVector::TIME;
}

impl Dimension for Length {
    const EXPONENTS: DimensionVector = DimensionVector::LENGTH;
}

impl Dimension for Mass {
    const EXPONENTS: DimensionVector = DimensionVector::MASS;
}

impl Dimension for Charge {
    const EXPONENTS: DimensionVector = DimensionVector::CHARGE;
}

impl Dimension for Temperature {
    const EXPONENTS: DimensionVector = DimensionVector::TEMPERATURE;
}

// ============================================================================
// Dimension Combinators
// ============================================================================

/// Dimension of `A × B`.
pub struct Product<A, B>(PhantomData<(A, B)>);

/// Dimension of `A ÷ B`.
pub struct Quotient<A, B>(PhantomData<(A, B)>);

/// Dimension of `D` raised to the integer power `P`.
pub struct Powi<D, const P: i32>(PhantomData<D>);

/// Dimension of the `R`-th root of `D`.
///
/// Evaluating the exponents fails the build unless `R` is positive and
/// divides every exponent of `D`.
pub struct Root<D, const R: i32>(PhantomData<D>);

/// Dimension spelled out exponent by exponent
/// (time, length, mass, charge, temperature).
pub struct Dims<const TI: i32, const L: i32, const M: i32, const C: i32, const TE: i32>;

impl<A: Dimension, B: Dimension> Dimension for Product<A, B> {
    const EXPONENTS: DimensionVector = A::EXPONENTS.plus(B::EXPONENTS);
}

impl<A: Dimension, B: Dimension> Dimension for Quotient<A, B> {
    const EXPONENTS: DimensionVector = A::EXPONENTS.minus(B::EXPONENTS);
}

impl<D: Dimension, const P: i32> Dimension for Powi<D, P> {
    const EXPONENTS: DimensionVector = D::EXPONENTS.times(P);
}

impl<D: Dimension, const R: i32> Dimension for Root<D, R> {
    const EXPONENTS: DimensionVector = match D::EXPONENTS.divided(R) {
        Some(dims) => dims,
        None => panic!("root must be positive and divide every dimension exponent"),
    };
}

impl<const TI: i32, const L: i32, const M: i32, const C: i32, const TE: i32> Dimension
    for Dims<TI, L, M, C, TE>
{
    const EXPONENTS: DimensionVector =
        DimensionVector::new(TI, L, M, C, TE);
}

/// Compile-time proof that two dimensions have the same exponents.
struct SameExponents<A, B>(PhantomData<(A, B)>);

impl<A: Dimension, B: Dimension> SameExponents<A, B> {
    const PROOF: () = assert!(
        A::EXPONENTS.equals(B::EXPONENTS),
        "dimension exponents differ"
    );
}

// ============================================================================
// Derived Dimensions
// ============================================================================

pub type Area = Product<Length, Length>;
pub type Volume = Product<Area, Length>;
pub type Velocity = Quotient<Length, Time>;
pub type Acceleration = Quotient<Velocity, Time>;
pub type Force = Product<Mass, Acceleration>;
pub type Energy = Product<Force, Length>;
pub type Power = Quotient<Energy, Time>;
pub type Current = Quotient<Charge, Time>;
pub type Frequency = Quotient<Dimensionless, Time>;

// ============================================================================
// StaticDimValue
// ============================================================================

/// Scalar whose dimension `D` is part of its type.
///
/// Addition, subtraction and comparison exist only between values of the same
/// dimension type; multiplication and division produce values tagged with the
/// combined dimension. None of this costs anything at runtime.
///
/// # Example
/// ```
/// use dimnum::numeric::{Length, StaticDimValue, Time, Velocity};
///
/// let distance = StaticDimValue::<Length>::new(100.0);
/// let elapsed = StaticDimValue::<Time>::new(9.58);
/// let speed: StaticDimValue<Velocity> = distance / elapsed;
/// assert!(speed > StaticDimValue::new(10.0));
/// ```
///
/// Mixing dimensions in a sum is rejected by the compiler:
/// ```compile_fail
/// use dimnum::numeric::{Length, StaticDimValue, Time};
///
/// let l = StaticDimValue::<Length>::new(1.0);
/// let t = StaticDimValue::<Time>::new(1.0);
/// let _ = l + t;
/// ```
#[repr(transparent)]
pub struct StaticDimValue<D> {
    magnitude: f64,
    _dimension: PhantomData<fn() -> D>,
}

impl<D: Dimension> StaticDimValue<D> {
    /// Exponents of this value's dimension.
    pub const DIMENSION: DimensionVector = D::EXPONENTS;

    /// Zero of this dimension.
    pub const ZERO: Self = Self::new(0.0);

    /// Create from a magnitude in SI base units.
    #[inline]
    pub const fn new(magnitude: f64) -> Self {
        Self {
            magnitude,
            _dimension: PhantomData,
        }
    }

    /// Magnitude in SI base units.
    #[inline]
    pub const fn magnitude(self) -> f64 {
        self.magnitude
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self::new(self.magnitude.abs())
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.magnitude.min(other.magnitude))
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.magnitude.max(other.magnitude))
    }

    // ========================================================================
    // Powers and Roots
    // ========================================================================

    /// Raise to the integer power `P`.
    #[inline]
    pub fn powi<const P: i32>(self) -> StaticDimValue<Powi<D, P>> {
        StaticDimValue::new(self.magnitude.powi(P))
    }

    /// Take the `R`-th root.
    ///
    /// Fails to build when `R` does not divide every exponent of `D`:
    /// ```ignore
    /// let l = StaticDimValue::<Length>::new(4.0);
    /// let _ = l.root::<2>(); // error: root must ... divide every dimension exponent
    /// ```
    #[inline]
    pub fn root<const R: i32>(self) -> StaticDimValue<Root<D, R>> {
        let _exponents: DimensionVector = <Root<D, R> as Dimension>::EXPONENTS;
        StaticDimValue::new(nth_root(self.magnitude, R))
    }

    #[inline]
    pub fn sqrt(self) -> StaticDimValue<Root<D, 2>> {
        self.root::<2>()
    }

    #[inline]
    pub fn cbrt(self) -> StaticDimValue<Root<D, 3>> {
        self.root::<3>()
    }

    // ========================================================================
    // Re-tagging
    // ========================================================================

    /// Re-tag with a dimension type that has the same exponents.
    ///
    /// `Quotient<Area, Length>` and `Length` are different types with equal
    /// exponents; `cast` converts between them and fails the build when the
    /// exponents differ.
    #[inline]
    pub fn cast<D2: Dimension>(self) -> StaticDimValue<D2> {
        let _proof: () = SameExponents::<D, D2>::PROOF;
        StaticDimValue::new(self.magnitude)
    }

    /// Plain number for a value whose exponents are all zero.
    #[inline]
    pub fn into_scalar(self) -> f64 {
        let _proof: () = SameExponents::<D, Dimensionless>::PROOF;
        self.magnitude
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl<D> Clone for StaticDimValue<D> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for StaticDimValue<D> {}

impl<D: Dimension> Default for StaticDimValue<D> {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl<D: Dimension> fmt::Debug for StaticDimValue<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StaticDimValue({}, exps={:?})",
            self.magnitude,
            D::EXPONENTS.exponents()
        )
    }
}

impl<D: Dimension> PartialEq for StaticDimValue<D> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.magnitude == other.magnitude
    }
}

impl<D: Dimension> PartialOrd for StaticDimValue<D> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.magnitude.partial_cmp(&other.magnitude)
    }
}

impl<D: Dimension> Neg for StaticDimValue<D> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self::new(-self.magnitude)
    }
}

impl<D: Dimension> Add for StaticDimValue<D> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.magnitude + rhs.magnitude)
    }
}

impl<D: Dimension> Sub for StaticDimValue<D> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.magnitude - rhs.magnitude)
    }
}

impl<D: Dimension> AddAssign for StaticDimValue<D> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.magnitude += rhs.magnitude;
    }
}

impl<D: Dimension> SubAssign for StaticDimValue<D> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.magnitude -= rhs.magnitude;
    }
}

impl<D: Dimension> Sum for StaticDimValue<D> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, v| acc + v)
    }
}

impl<D1: Dimension, D2: Dimension> Mul<StaticDimValue<D2>> for StaticDimValue<D1> {
    type Output = StaticDimValue<Product<D1, D2>>;

    #[inline]
    fn mul(self, rhs: StaticDimValue<D2>) -> Self::Output {
        StaticDimValue::new(self.magnitude * rhs.magnitude)
    }
}

impl<D1: Dimension, D2: Dimension> Div<StaticDimValue<D2>> for StaticDimValue<D1> {
    type Output = StaticDimValue<Quotient<D1, D2>>;

    #[inline]
    fn div(self, rhs: StaticDimValue<D2>) -> Self::Output {
        StaticDimValue::new(self.magnitude / rhs.magnitude)
    }
}

impl<D: Dimension> Mul<f64> for StaticDimValue<D> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.magnitude * rhs)
    }
}

impl<D: Dimension> Div<f64> for StaticDimValue<D> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.magnitude / rhs)
    }
}

impl<D: Dimension> MulAssign<f64> for StaticDimValue<D> {
    #[inline]
    fn mul_assign(&mut self, rhs: f64) {
        self.magnitude *= rhs;
    }
}

impl<D: Dimension> DivAssign<f64> for StaticDimValue<D> {
    #[inline]
    fn div_assign(&mut self, rhs: f64) {
        self.magnitude /= rhs;
    }
}

impl<D: Dimension> Mul<StaticDimValue<D>> for f64 {
    type Output = StaticDimValue<D>;

    #[inline]
    fn mul(self, rhs: StaticDimValue<D>) -> Self::Output {
        StaticDimValue::new(self * rhs.magnitude)
    }
}

impl<D: Dimension> Div<StaticDimValue<D>> for f64 {
    type Output = StaticDimValue<Quotient<Dimensionless, D>>;

    #[inline]
    fn div(self, rhs: StaticDimValue<D>) -> Self::Output {
        StaticDimValue::new(self / rhs.magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Meters = StaticDimValue<Length>;
    type Seconds = StaticDimValue<Time>;

    #[test]
    fn test_base_exponents() {
        assert_eq!(Meters::DIMENSION, DimensionVector::LENGTH);
        assert_eq!(StaticDimValue::<Mass>::DIMENSION, DimensionVector::MASS);
        assert!(StaticDimValue::<Dimensionless>::DIMENSION.is_dimensionless());
    }

    #[test]
    fn test_derived_exponents() {
        assert_eq!(Area::EXPONENTS.length(), 2);
        assert_eq!(Volume::EXPONENTS.length(), 3);
        assert_eq!(Force::EXPONENTS, DimensionVector::new(-2, 1, 1, 0, 0));
        assert_eq!(Energy::EXPONENTS, DimensionVector::new(-2, 2, 1, 0, 0));
        assert_eq!(Power::EXPONENTS, DimensionVector::new(-3, 2, 1, 0, 0));
        assert_eq!(Current::EXPONENTS, DimensionVector::new(-1, 0, 0, 1, 0));
        assert_eq!(Frequency::EXPONENTS, DimensionVector::new(-1, 0, 0, 0, 0));
        assert_eq!(
            <Dims<1, 2, 3, 4, 5>>::EXPONENTS,
            DimensionVector::new(1, 2, 3, 4, 5)
        );
    }

    #[test]
    fn test_add_sub_same_dimension() {
        let a = Meters::new(3.0);
        let b = Meters::new(4.5);
        assert_eq!((a + b).magnitude(), 7.5);
        assert_eq!((b - a).magnitude(), 1.5);

        let mut c = a;
        c += b;
        c -= Meters::new(0.5);
        assert_eq!(c.magnitude(), 7.0);
        assert_eq!((-c).magnitude(), -7.0);
    }

    #[test]
    fn test_mul_div_combine_exponents() {
        let l = Meters::new(6.0);
        let t = Seconds::new(2.0);
        let v = l / t;
        assert_eq!(v.magnitude(), 3.0);
        assert_eq!(
            StaticDimValue::<Velocity>::DIMENSION,
            DimensionVector::new(-1, 1, 0, 0, 0)
        );

        let a = l * l;
        assert_eq!(a.magnitude(), 36.0);
        let _: StaticDimValue<Area> = a;
    }

    #[test]
    fn test_scalar_factors() {
        let l = Meters::new(2.0);
        assert_eq!((l * 3.0).magnitude(), 6.0);
        assert_eq!((3.0 * l).magnitude(), 6.0);
        assert_eq!((l / 4.0).magnitude(), 0.5);

        let inverse = 1.0 / l;
        assert_eq!(inverse.magnitude(), 0.5);
        assert_eq!(
            StaticDimValue::<Quotient<Dimensionless, Length>>::DIMENSION,
            DimensionVector::new(0, -1, 0, 0, 0)
        );

        let mut m = l;
        m *= 5.0;
        m /= 2.0;
        assert_eq!(m.magnitude(), 5.0);
    }

    #[test]
    fn test_dimensionless_ratio() {
        // len1 / len2 where both are lengths is a pure number
        let len1 = Meters::new(3.0);
        let len2 = 6.0 * Meters::new(1.0);
        assert_eq!((len1 / len2).into_scalar(), 0.5);
    }

    #[test]
    fn test_powers_and_roots() {
        let l = Meters::new(3.0);
        let v = l.powi::<3>();
        assert_eq!(v.magnitude(), 27.0);
        assert_eq!(StaticDimValue::<Powi<Length, 3>>::DIMENSION.length(), 3);

        let side = v.cbrt().cast::<Length>();
        assert!((side.magnitude() - 3.0).abs() < 1e-12);

        let area = l * l;
        let back: Meters = area.sqrt().cast();
        assert_eq!(back.magnitude(), 3.0);

        let inv = l.powi::<-2>();
        assert!((inv.magnitude() - 1.0 / 9.0).abs() < 1e-15);
    }

    #[test]
    fn test_cast_between_equivalent_types() {
        let l = Meters::new(2.0);
        let a = l * l;
        let back = (a / l).cast::<Length>();
        assert_eq!(back, l);

        let explicit = l.cast::<Dims<0, 1, 0, 0, 0>>();
        assert_eq!(explicit.magnitude(), 2.0);
    }

    #[test]
    fn test_comparisons() {
        let a = Seconds::new(1.0);
        let b = Seconds::new(2.0);
        assert!(a < b);
        assert!(b >= a);
        assert!(a <= a);
        assert_ne!(a, b);
        assert_eq!(a.min(b), a);
        assert_eq!(a.max(b), b);
        assert_eq!((-b).abs(), b);
    }

    #[test]
    fn test_sum_and_default() {
        let total: Meters = (1..=4).map(|i| Meters::new(i as f64)).sum();
        assert_eq!(total.magnitude(), 10.0);
        assert_eq!(Meters::default(), Meters::ZERO);
    }
}
