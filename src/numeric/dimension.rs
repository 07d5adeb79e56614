// ============================================================================
// Dimension Vector
// Integer exponents of the five base physical dimensions
// ============================================================================

use super::errors::{QuantityError, QuantityResult};
use std::ops::{Add, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Exponents of time, length, mass, charge and temperature.
///
/// Multiplying two quantities adds their vectors, dividing subtracts them,
/// raising to an integer power scales the vector. The zero vector denotes a
/// dimensionless quantity.
///
/// All algebra is available as `const fn` so that static dimension types can
/// compute their exponents at compile time.
///
/// # Example
/// ```
/// use dimnum::numeric::DimensionVector;
///
/// let velocity = DimensionVector::LENGTH.minus(DimensionVector::TIME);
/// assert_eq!(velocity.length(), 1);
/// assert_eq!(velocity.time(), -1);
/// assert_eq!(velocity + DimensionVector::TIME, DimensionVector::LENGTH);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DimensionVector {
    exps: [i32; 5],
}

// Slot order inside `exps`
const TIME: usize = 0;
const LENGTH: usize = 1;
const MASS: usize = 2;
const CHARGE: usize = 3;
const TEMPERATURE: usize = 4;

impl DimensionVector {
    /// Dimensionless (all exponents zero)
    pub const NONE: Self = Self::new(0, 0, 0, 0, 0);

    pub const TIME: Self = Self::new(1, 0, 0, 0, 0);
    pub const LENGTH: Self = Self::new(0, 1, 0, 0, 0);
    pub const MASS: Self = Self::new(0, 0, 1, 0, 0);
    pub const CHARGE: Self = Self::new(0, 0, 0, 1, 0);
    pub const TEMPERATURE: Self = Self::new(0, 0, 0, 0, 1);

    /// Create from exponents in the order time, length, mass, charge,
    /// temperature.
    #[inline]
    pub const fn new(time: i32, length: i32, mass: i32, charge: i32, temperature: i32) -> Self {
        Self {
            exps: [time, length, mass, charge, temperature],
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub const fn time(self) -> i32 {
        self.exps[TIME]
    }

    #[inline]
    pub const fn length(self) -> i32 {
        self.exps[LENGTH]
    }

    #[inline]
    pub const fn mass(self) -> i32 {
        self.exps[MASS]
    }

    #[inline]
    pub const fn charge(self) -> i32 {
        self.exps[CHARGE]
    }

    #[inline]
    pub const fn temperature(self) -> i32 {
        self.exps[TEMPERATURE]
    }

    /// All five exponents.
    #[inline]
    pub const fn exponents(self) -> [i32; 5] {
        self.exps
    }

    /// True when every exponent is zero.
    #[inline]
    pub const fn is_dimensionless(self) -> bool {
        self.equals(Self::NONE)
    }

    // ========================================================================
    // Const Algebra
    // ========================================================================

    /// Exponent-wise equality usable in const context.
    pub const fn equals(self, other: Self) -> bool {
        let mut i = 0;
        while i < 5 {
            if self.exps[i] != other.exps[i] {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Exponents of a product, or `None` if an exponent overflows.
    pub const fn checked_plus(self, other: Self) -> Option<Self> {
        let mut exps = [0i32; 5];
        let mut i = 0;
        while i < 5 {
            exps[i] = match self.exps[i].checked_add(other.exps[i]) {
                Some(e) => e,
                None => return None,
            };
            i += 1;
        }
        Some(Self { exps })
    }

    /// Exponents of a quotient, or `None` if an exponent overflows.
    pub const fn checked_minus(self, other: Self) -> Option<Self> {
        let mut exps = [0i32; 5];
        let mut i = 0;
        while i < 5 {
            exps[i] = match self.exps[i].checked_sub(other.exps[i]) {
                Some(e) => e,
                None => return None,
            };
            i += 1;
        }
        Some(Self { exps })
    }

    /// Exponents of an integer power, or `None` if an exponent overflows.
    pub const fn checked_times(self, power: i32) -> Option<Self> {
        let mut exps = [0i32; 5];
        let mut i = 0;
        while i < 5 {
            exps[i] = match self.exps[i].checked_mul(power) {
                Some(e) => e,
                None => return None,
            };
            i += 1;
        }
        Some(Self { exps })
    }

    /// Exponents of a product.
    ///
    /// # Panics
    /// Panics if an exponent overflows; in a const context (static
    /// dimension types) this is a build error. Use [`DimensionVector::product`]
    /// for runtime values.
    pub const fn plus(self, other: Self) -> Self {
        match self.checked_plus(other) {
            Some(dims) => dims,
            None => panic!("dimension exponent overflow"),
        }
    }

    /// Exponents of a quotient.
    ///
    /// # Panics
    /// Panics if an exponent overflows, as [`DimensionVector::plus`].
    pub const fn minus(self, other: Self) -> Self {
        match self.checked_minus(other) {
            Some(dims) => dims,
            None => panic!("dimension exponent overflow"),
        }
    }

    /// Exponents of the reciprocal.
    ///
    /// # Panics
    /// Panics if an exponent is `i32::MIN`.
    pub const fn negated(self) -> Self {
        Self::NONE.minus(self)
    }

    /// Exponents of an integer power.
    ///
    /// # Panics
    /// Panics if an exponent overflows, as [`DimensionVector::plus`].
    pub const fn times(self, power: i32) -> Self {
        match self.checked_times(power) {
            Some(dims) => dims,
            None => panic!("dimension exponent overflow"),
        }
    }

    /// Exponents of an integer root, or `None` when `root` is not positive
    /// or does not divide every exponent.
    pub const fn divided(self, root: i32) -> Option<Self> {
        if root <= 0 {
            return None;
        }
        let mut exps = [0i32; 5];
        let mut i = 0;
        while i < 5 {
            let e = self.exps[i];
            if e % root != 0 {
                return None;
            }
            exps[i] = e / root;
            i += 1;
        }
        Some(Self { exps })
    }

    // ========================================================================
    // Checked Runtime Algebra
    // ========================================================================

    /// Exponents of a product.
    ///
    /// # Errors
    /// Returns `ExponentOverflow` if an exponent leaves the `i32` range.
    #[inline]
    pub fn product(self, other: Self) -> QuantityResult<Self> {
        self.checked_plus(other)
            .ok_or(QuantityError::ExponentOverflow { dims: self })
    }

    /// Exponents of a quotient.
    ///
    /// # Errors
    /// Returns `ExponentOverflow` if an exponent leaves the `i32` range.
    #[inline]
    pub fn quotient(self, other: Self) -> QuantityResult<Self> {
        self.checked_minus(other)
            .ok_or(QuantityError::ExponentOverflow { dims: self })
    }

    /// Exponents of an integer power.
    ///
    /// # Errors
    /// Returns `ExponentOverflow` if an exponent leaves the `i32` range.
    #[inline]
    pub fn power(self, power: i32) -> QuantityResult<Self> {
        self.checked_times(power)
            .ok_or(QuantityError::ExponentOverflow { dims: self })
    }

    /// Exponents of an integer root.
    ///
    /// # Errors
    /// - `InvalidRoot` if `root` is zero or negative
    /// - `NonIntegerRootExponent` if any exponent is not divisible by `root`
    pub fn root(self, root: i32) -> QuantityResult<Self> {
        if root <= 0 {
            return Err(QuantityError::InvalidRoot(root));
        }
        self.divided(root)
            .ok_or(QuantityError::NonIntegerRootExponent { dims: self, root })
    }

    /// Fail with `DimensionMismatch` unless both vectors are equal.
    #[inline]
    pub fn ensure_same(self, other: Self) -> QuantityResult<()> {
        if self == other {
            Ok(())
        } else {
            Err(QuantityError::DimensionMismatch {
                left: self,
                right: other,
            })
        }
    }
}

// ============================================================================
// Operator Implementations
// ============================================================================

// Infallible operators for ergonomics (panic on exponent overflow - use
// product/quotient/power where exponents are not known to be small)
impl Add for DimensionVector {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.plus(rhs)
    }
}

impl Sub for DimensionVector {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.minus(rhs)
    }
}

impl Neg for DimensionVector {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Mul<i32> for DimensionVector {
    type Output = Self;

    #[inline]
    fn mul(self, power: i32) -> Self::Output {
        self.times(power)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{quickcheck, Arbitrary, Gen};

    impl Arbitrary for DimensionVector {
        fn arbitrary(g: &mut Gen) -> Self {
            let mut pick = || i32::from(i8::arbitrary(g));
            DimensionVector::new(pick(), pick(), pick(), pick(), pick())
        }
    }

    #[test]
    fn test_constants() {
        assert!(DimensionVector::NONE.is_dimensionless());
        assert_eq!(DimensionVector::TIME.time(), 1);
        assert_eq!(DimensionVector::LENGTH.length(), 1);
        assert_eq!(DimensionVector::MASS.mass(), 1);
        assert_eq!(DimensionVector::CHARGE.charge(), 1);
        assert_eq!(DimensionVector::TEMPERATURE.temperature(), 1);
        assert_eq!(DimensionVector::default(), DimensionVector::NONE);
    }

    #[test]
    fn test_product_and_quotient() {
        let force = DimensionVector::new(-2, 1, 1, 0, 0);
        let energy = force + DimensionVector::LENGTH;
        assert_eq!(energy.exponents(), [-2, 2, 1, 0, 0]);
        assert_eq!(energy - DimensionVector::LENGTH, force);
    }

    #[test]
    fn test_power_and_root() {
        let area = DimensionVector::LENGTH * 2;
        assert_eq!(area.length(), 2);
        assert_eq!(area.root(2).unwrap(), DimensionVector::LENGTH);
        assert_eq!(
            DimensionVector::LENGTH.root(2),
            Err(QuantityError::NonIntegerRootExponent {
                dims: DimensionVector::LENGTH,
                root: 2
            })
        );
        assert_eq!(area.root(0), Err(QuantityError::InvalidRoot(0)));
        assert_eq!(area.root(-2), Err(QuantityError::InvalidRoot(-2)));
    }

    #[test]
    fn test_ensure_same() {
        assert!(DimensionVector::TIME.ensure_same(DimensionVector::TIME).is_ok());
        assert!(matches!(
            DimensionVector::TIME.ensure_same(DimensionVector::MASS),
            Err(QuantityError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_const_evaluation() {
        const ACCELERATION: DimensionVector =
            DimensionVector::LENGTH.minus(DimensionVector::TIME.times(2));
        assert_eq!(ACCELERATION, DimensionVector::new(-2, 1, 0, 0, 0));
        const NOT_A_ROOT: Option<DimensionVector> = ACCELERATION.divided(2);
        assert!(NOT_A_ROOT.is_none());
    }

    #[test]
    fn test_exponent_overflow_is_reported() {
        let huge = DimensionVector::new(0, i32::MAX, 0, 0, 0);
        assert_eq!(
            huge.product(DimensionVector::LENGTH),
            Err(QuantityError::ExponentOverflow { dims: huge })
        );
        assert!(huge.power(2).is_err());
        assert!(DimensionVector::new(i32::MIN, 0, 0, 0, 0)
            .quotient(DimensionVector::TIME)
            .is_err());
        assert_eq!(huge.checked_plus(DimensionVector::LENGTH), None);

        // Exponents outside the 8-bit range stay exact
        let l100 = DimensionVector::LENGTH * 100;
        assert_eq!(l100.power(2).unwrap().length(), 200);
        assert_eq!(l100.product(l100 * 2).unwrap().length(), 300);
        assert_eq!(l100.quotient(l100 * 3).unwrap().length(), -200);
    }

    #[test]
    #[should_panic(expected = "dimension exponent overflow")]
    fn test_operator_overflow_panics_instead_of_wrapping() {
        let _ = DimensionVector::new(0, 0, i32::MAX, 0, 0) * 2;
    }

    quickcheck! {
        fn prop_add_commutes(a: DimensionVector, b: DimensionVector) -> bool {
            a + b == b + a
        }

        fn prop_sub_inverts_add(a: DimensionVector, b: DimensionVector) -> bool {
            (a + b) - b == a
        }

        fn prop_power_then_root(a: DimensionVector, p: u8) -> bool {
            let p = (p % 4) as i32 + 1;
            (a * p).root(p) == Ok(a)
        }

        fn prop_negation_is_reciprocal(a: DimensionVector) -> bool {
            (a + -a).is_dimensionless()
        }
    }
}
