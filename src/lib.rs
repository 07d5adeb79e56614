// ============================================================================
// dimnum Library
// Dimensioned quantities, adaptive quadrature and interpolation
// ============================================================================

//! # dimnum
//!
//! Physical quantities tagged with their dimension, and numerical routines
//! that carry those dimensions through integration and interpolation.
//!
//! ## Features
//!
//! - **Static dimensions** checked by the compiler (`StaticDimValue<D>`)
//! - **Dynamic dimensions** checked at runtime (`DynDimValue`)
//! - **Adaptive Runge–Kutta quadrature** with an embedded Cash–Karp pair
//! - **Adaptive sampling** and trapezoid integration on a subinterval stack
//! - **Interpolants** over dense or sparse tables with cached integrals
//!
//! ## Example
//!
//! ```rust
//! use dimnum::prelude::*;
//!
//! type Meters = StaticDimValue<Length>;
//! type Seconds = StaticDimValue<Time>;
//!
//! // Speed of a body accelerating at 2 m/s²
//! let accel = Meters::new(2.0) / (Seconds::new(1.0) * Seconds::new(1.0));
//! let speed = |t: Seconds| accel * t;
//!
//! // Distance covered in the first 3 seconds
//! let integrator = AdaptiveIntegrator::new(QuadratureConfig::interpolating()).unwrap();
//! let result = integrator.integrate(speed, Seconds::ZERO, Seconds::new(3.0)).unwrap();
//! let distance: Meters = result.integral().cast();
//! assert!((distance.magnitude() - 9.0).abs() < 1e-9);
//!
//! // Speed between the integrator's own steps
//! let speed_curve = result.function_interpolant().unwrap();
//! let halfway = speed_curve.evaluate(Seconds::new(1.5)).unwrap();
//! assert!((halfway.magnitude() - 3.0).abs() < 1e-9);
//! ```

pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod numeric;
pub mod utils;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        midpoints, DenseTable, QuadratureConfig, SampledPoint, SamplingConfig, SparseTable,
    };
    pub use crate::engine::{
        adaptive_trapezoid, create_from_config, integrate_trapezoid, sample_adaptively,
        AdaptiveIntegrator, IntegratorBuilder, Interpolant, Quadrature, QuadratureStats,
        SubintervalStack,
    };
    pub use crate::interfaces::{
        LoggingObserver, NoOpObserver, QuadratureEvent, StepObserver, Table,
    };
    pub use crate::numeric::{
        Acceleration, Area, Charge, Dimension, DimensionVector, Dimensioned, Dimensionless,
        DynDimValue, Energy, Force, Length, Mass, QuantityError, QuantityResult, StaticDimValue,
        Temperature, Time, Velocity,
    };
}
