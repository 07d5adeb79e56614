// ============================================================================
// Engine Module
// Adaptive quadrature, adaptive sampling and interpolants
// ============================================================================

mod interpolant;
mod rk_quad;
mod subinterval;

pub mod factory;

pub use factory::{create_from_config, IntegratorBuilder};
pub use interpolant::Interpolant;
pub use rk_quad::{AdaptiveIntegrator, Quadrature, QuadratureStats};
pub use subinterval::{
    adaptive_trapezoid, integrate_trapezoid, sample_adaptively, IntegralStats, Interval,
    Sampling, SamplingStats, SubintervalStack, TrapezoidIntegral,
};
