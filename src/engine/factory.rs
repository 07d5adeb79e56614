// ============================================================================
// Integrator Factory
// Creates adaptive integrators with validated configuration
// ============================================================================

use crate::domain::config::QuadratureConfig;
use crate::engine::AdaptiveIntegrator;
use crate::interfaces::{LoggingObserver, NoOpObserver, StepObserver};
use crate::numeric::{DynDimValue, QuantityResult};
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates an integrator from configuration
///
/// # Errors
/// Returns `InvalidConfiguration` if the configuration fails validation.
///
/// # Example
/// ```
/// use dimnum::prelude::*;
/// use dimnum::engine::factory::create_from_config;
/// use std::sync::Arc;
///
/// let integrator = create_from_config(QuadratureConfig::coarse(), Arc::new(NoOpObserver)).unwrap();
/// assert_eq!(integrator.config().tolerance, 1.0e-4);
/// ```
pub fn create_from_config(
    config: QuadratureConfig,
    observer: Arc<dyn StepObserver>,
) -> QuantityResult<AdaptiveIntegrator> {
    AdaptiveIntegrator::with_observer(config, observer)
}

// ============================================================================
// Builder Pattern
// ============================================================================

/// Fluent builder for [`AdaptiveIntegrator`]
///
/// # Example
/// ```
/// use dimnum::engine::factory::IntegratorBuilder;
///
/// let integrator = IntegratorBuilder::new()
///     .with_tolerance(1.0e-9)
///     .store_samples()
///     .with_logging()
///     .build()
///     .unwrap();
///
/// let result = integrator.integrate(|x: f64| x.cos(), 0.0, std::f64::consts::FRAC_PI_2).unwrap();
/// assert!((result.integral() - 1.0).abs() < 1e-8);
/// ```
pub struct IntegratorBuilder {
    config: QuadratureConfig,
    observer: Arc<dyn StepObserver>,
}

impl Default for IntegratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegratorBuilder {
    /// Start from the default configuration with no observer
    pub fn new() -> Self {
        Self::from_config(QuadratureConfig::default())
    }

    /// Start from an existing configuration
    pub fn from_config(config: QuadratureConfig) -> Self {
        Self {
            config,
            observer: Arc::new(NoOpObserver),
        }
    }

    // ========================================================================
    // Accuracy
    // ========================================================================

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.config.max_steps = max_steps;
        self
    }

    pub fn with_initial_divisions(mut self, divisions: usize) -> Self {
        self.config.initial_divisions = divisions;
        self
    }

    /// Explicit first step; must carry the dimension of the bounds
    pub fn with_initial_step(mut self, step: impl Into<DynDimValue>) -> Self {
        self.config.initial_step = Some(step.into());
        self
    }

    // ========================================================================
    // Stored Output
    // ========================================================================

    /// Keep accepted samples so a function interpolant can be built
    pub fn store_samples(mut self) -> Self {
        self.config.store_samples = true;
        self
    }

    /// Keep running integrals so an integral interpolant can be built
    pub fn store_integrals(mut self) -> Self {
        self.config.store_integrals = true;
        self
    }

    // ========================================================================
    // Observation
    // ========================================================================

    pub fn with_observer(mut self, observer: Arc<dyn StepObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Report steps through `tracing`
    pub fn with_logging(self) -> Self {
        self.with_observer(Arc::new(LoggingObserver))
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the integrator
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` if the configuration fails validation.
    pub fn build(self) -> QuantityResult<AdaptiveIntegrator> {
        create_from_config(self.config, self.observer)
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &QuadratureConfig {
        &self.config
    }
}
