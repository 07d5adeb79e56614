// ============================================================================
// Numerical Configuration
// Tolerances, step ceilings and storage flags for quadrature and sampling
// ============================================================================

use crate::numeric::{DynDimValue, QuantityError, QuantityResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest tolerance the Runge–Kutta driver honours, as a multiple of
/// machine epsilon. Requests below it are raised to it.
pub const RK_MIN_TOLERANCE_EPS: f64 = 100.0;

/// Smallest tolerance the trapezoid integrator honours, as a multiple of
/// machine epsilon.
pub const TRAPEZOID_MIN_TOLERANCE_EPS: f64 = 1000.0;

// ============================================================================
// Quadrature Configuration
// ============================================================================

/// Configuration of one adaptive Runge–Kutta integration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuadratureConfig {
    /// Relative error tolerance per step
    pub tolerance: f64,

    /// Number of evenly spaced points the default initial step is derived
    /// from: `h = (x2 - x1) / (initial_divisions - 1)`
    pub initial_divisions: usize,

    /// Ceiling on step attempts (accepted and rejected together)
    pub max_steps: usize,

    /// Optional explicit first step; must carry the dimension of `x`
    pub initial_step: Option<DynDimValue>,

    /// Keep every accepted `(x, f(x))` sample
    pub store_samples: bool,

    /// Keep the running integral at every accepted step
    pub store_integrals: bool,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            tolerance: 1.0e-6,
            initial_divisions: 16,
            max_steps: 10_000,
            initial_step: None,
            store_samples: false,
            store_integrals: false,
        }
    }
}

impl QuadratureConfig {
    /// Create a configuration with the given tolerance and default limits
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    /// Builder method: Set the error tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Builder method: Set the number of divisions for the default first step
    pub fn with_initial_divisions(mut self, divisions: usize) -> Self {
        self.initial_divisions = divisions;
        self
    }

    /// Builder method: Set the step-attempt ceiling
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Builder method: Set an explicit first step
    pub fn with_initial_step(mut self, step: impl Into<DynDimValue>) -> Self {
        self.initial_step = Some(step.into());
        self
    }

    /// Builder method: Keep intermediate samples of the integrand
    pub fn with_samples(mut self, store: bool) -> Self {
        self.store_samples = store;
        self
    }

    /// Builder method: Keep intermediate values of the running integral
    pub fn with_integrals(mut self, store: bool) -> Self {
        self.store_integrals = store;
        self
    }

    /// Tolerance actually used by the driver: never below
    /// `RK_MIN_TOLERANCE_EPS` machine epsilons.
    #[inline]
    pub fn effective_tolerance(&self) -> f64 {
        self.tolerance.max(RK_MIN_TOLERANCE_EPS * f64::EPSILON)
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` naming the first offending field.
    pub fn validate(&self) -> QuantityResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(QuantityError::InvalidConfiguration(
                "tolerance must be positive and finite",
            ));
        }

        if self.initial_divisions < 2 {
            return Err(QuantityError::InvalidConfiguration(
                "initial divisions must be at least 2",
            ));
        }

        if self.max_steps == 0 {
            return Err(QuantityError::InvalidConfiguration(
                "max steps must be positive",
            ));
        }

        if let Some(step) = self.initial_step {
            let h = step.magnitude();
            if !(h.is_finite() && h != 0.0) {
                return Err(QuantityError::InvalidConfiguration(
                    "initial step must be finite and nonzero",
                ));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl QuadratureConfig {
    /// Quick estimate
    /// - Tolerance: 1e-4
    /// - Nothing stored
    pub fn coarse() -> Self {
        Self::new(1.0e-4)
    }

    /// Near the floor of double precision
    /// - Tolerance: 1e-12
    /// - Step ceiling raised to 1,000,000
    pub fn precise() -> Self {
        Self::new(1.0e-12).with_max_steps(1_000_000)
    }

    /// Integration whose samples feed an interpolant
    /// - Tolerance: 1e-6
    /// - Samples and running integrals stored
    pub fn interpolating() -> Self {
        Self::default().with_samples(true).with_integrals(true)
    }
}

// ============================================================================
// Sampling Configuration
// ============================================================================

/// Configuration of adaptive sampling and trapezoid integration on a
/// subinterval stack.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplingConfig {
    /// Relative accuracy demanded of each accepted interval
    pub tolerance: f64,

    /// Evenly spaced points evaluated before any subdivision
    pub initial_points: usize,

    /// Narrowest interval that may still be split, as a fraction of the
    /// whole range
    pub min_width_ratio: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            tolerance: 1.0e-6,
            initial_points: 16,
            min_width_ratio: 1.0e-9,
        }
    }
}

impl SamplingConfig {
    /// Create a configuration with the given tolerance and default limits
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    /// Builder method: Set the relative tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Builder method: Set the number of initial grid points
    pub fn with_initial_points(mut self, points: usize) -> Self {
        self.initial_points = points;
        self
    }

    /// Builder method: Set the minimum splittable width ratio
    pub fn with_min_width_ratio(mut self, ratio: f64) -> Self {
        self.min_width_ratio = ratio;
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` naming the first offending field.
    pub fn validate(&self) -> QuantityResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(QuantityError::InvalidConfiguration(
                "tolerance must be positive and finite",
            ));
        }

        if self.initial_points < 2 {
            return Err(QuantityError::InvalidConfiguration(
                "initial points must be at least 2",
            ));
        }

        if !(self.min_width_ratio > 0.0 && self.min_width_ratio < 1.0) {
            return Err(QuantityError::InvalidConfiguration(
                "minimum width ratio must lie in (0, 1)",
            ));
        }

        Ok(())
    }
}
