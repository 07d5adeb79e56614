// ============================================================================
// Quantity Errors
// Error types for dimensioned arithmetic, quadrature and table queries
// ============================================================================

use super::dimension::DimensionVector;
use std::fmt;

/// Errors that can occur while computing with dimensioned values.
///
/// Every failure in the crate is surfaced as one of these variants; nothing is
/// silently downgraded to an approximate result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuantityError {
    /// Operands of an operation requiring equal dimensions differ
    DimensionMismatch {
        left: DimensionVector,
        right: DimensionVector,
    },
    /// Root would produce a fractional exponent
    NonIntegerRootExponent { dims: DimensionVector, root: i32 },
    /// Exponent arithmetic left the representable range
    ExponentOverflow { dims: DimensionVector },
    /// Zero or negative root requested
    InvalidRoot(i32),
    /// Iteration ceiling or minimum subinterval width reached before the
    /// tolerance was satisfied
    Convergence { iterations: usize, position: f64 },
    /// Proposed step collapsed to a magnitude indistinguishable from zero
    StepUnderflow { position: f64, step: f64 },
    /// Query outside the domain covered by a table
    OutOfRange { x: f64, min: f64, max: f64 },
    /// Two interpolants share no common domain
    DomainMismatch {
        left: (f64, f64),
        right: (f64, f64),
    },
    /// Abscissas not strictly increasing (or not finite) at `index`
    MalformedPointSequence { index: usize },
    /// Too few points to build a table
    InsufficientPoints { required: usize, found: usize },
    /// Configuration value rejected by validation
    InvalidConfiguration(&'static str),
}

impl fmt::Display for QuantityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantityError::DimensionMismatch { left, right } => {
                write!(f, "dimension mismatch: {:?} vs {:?}", left, right)
            },
            QuantityError::NonIntegerRootExponent { dims, root } => write!(
                f,
                "root {} of {:?} would produce a non-integer exponent",
                root, dims
            ),
            QuantityError::ExponentOverflow { dims } => {
                write!(f, "exponent overflow combining {:?}", dims)
            },
            QuantityError::InvalidRoot(root) => {
                write!(f, "invalid root: {} (must be positive)", root)
            },
            QuantityError::Convergence {
                iterations,
                position,
            } => write!(
                f,
                "failed to converge after {} iterations near x = {}",
                iterations, position
            ),
            QuantityError::StepUnderflow { position, step } => write!(
                f,
                "step size underflow: step {} at x = {} is indistinguishable from zero",
                step, position
            ),
            QuantityError::OutOfRange { x, min, max } => {
                write!(f, "x = {} outside table domain [{}, {}]", x, min, max)
            },
            QuantityError::DomainMismatch { left, right } => write!(
                f,
                "domains [{}, {}] and [{}, {}] do not overlap",
                left.0, left.1, right.0, right.1
            ),
            QuantityError::MalformedPointSequence { index } => write!(
                f,
                "malformed point sequence: abscissa at index {} is not strictly increasing",
                index
            ),
            QuantityError::InsufficientPoints { required, found } => write!(
                f,
                "insufficient points: need at least {}, got {}",
                required, found
            ),
            QuantityError::InvalidConfiguration(reason) => {
                write!(f, "invalid configuration: {}", reason)
            },
        }
    }
}

impl std::error::Error for QuantityError {}

/// Result type alias for quantity operations
pub type QuantityResult<T> = Result<T, QuantityError>;
