// ============================================================================
// Adaptive Runge–Kutta Quadrature
// Cash–Karp embedded 5(4) pair with quality-controlled step size
// ============================================================================

use crate::domain::{QuadratureConfig, SampledPoint, SparseTable};
use crate::engine::Interpolant;
use crate::interfaces::{NoOpObserver, QuadratureEvent, StepObserver};
use crate::numeric::{DimensionVector, Dimensioned, MagnitudeFn, QuantityError, QuantityResult};
use std::marker::PhantomData;
use std::ops::Mul;
use std::sync::Arc;

// Cash–Karp nodes. The second node is unused: the integrand does not depend
// on the accumulated value.
const A3: f64 = 0.3;
const A4: f64 = 0.6;
const A5: f64 = 1.0;
const A6: f64 = 0.875;

// Fifth-order weights
const C1: f64 = 37.0 / 378.0;
const C3: f64 = 250.0 / 621.0;
const C4: f64 = 125.0 / 594.0;
const C6: f64 = 512.0 / 1771.0;

// Fifth-order minus embedded fourth-order weights
const DC1: f64 = C1 - 2825.0 / 27648.0;
const DC3: f64 = C3 - 18575.0 / 48384.0;
const DC4: f64 = C4 - 13525.0 / 55296.0;
const DC5: f64 = -277.0 / 14336.0;
const DC6: f64 = C6 - 0.25;

const SAFETY: f64 = 0.9;
const PSHRNK: f64 = -0.25;
const PGROW: f64 = -0.2;
const MAX_SHRINK: f64 = 0.1;
const MAX_GROW: f64 = 5.0;
const TINY: f64 = 1.0e-300;

// ============================================================================
// Statistics
// ============================================================================

/// Step counters of one integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuadratureStats {
    /// Steps accepted
    pub accepted: usize,
    /// Trial steps rejected and retried with a smaller step
    pub rejected: usize,
    /// Calls of the integrand
    pub evaluations: usize,
}

impl QuadratureStats {
    /// Trial steps taken, accepted or not.
    #[inline]
    pub fn trials(&self) -> usize {
        self.accepted + self.rejected
    }
}

// ============================================================================
// Result
// ============================================================================

/// Outcome of [`AdaptiveIntegrator::integrate`].
///
/// `I` is the integral type, `<Y as Mul<X>>::Output`. Samples are kept only
/// when the configuration asked for them.
#[derive(Debug, Clone)]
pub struct Quadrature<X, Y, I> {
    integral: I,
    tolerance: f64,
    stats: QuadratureStats,
    x_dims: DimensionVector,
    y_dims: DimensionVector,
    samples: Vec<(f64, f64)>,
    partials: Vec<(f64, f64)>,
    _types: PhantomData<fn(X) -> Y>,
}

impl<X, Y, I> Quadrature<X, Y, I>
where
    X: Dimensioned,
    Y: Dimensioned,
    I: Dimensioned,
{
    /// Definite integral over the requested bounds.
    #[inline]
    pub fn integral(&self) -> I {
        self.integral
    }

    /// Tolerance actually used (after raising tiny requests to the floor).
    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[inline]
    pub fn stats(&self) -> QuadratureStats {
        self.stats
    }

    /// Integrand value at every accepted step boundary, in walk order.
    ///
    /// # Errors
    /// Propagates conversion failures from [`Dimensioned::from_magnitude`].
    pub fn samples(&self) -> QuantityResult<Vec<SampledPoint<X, Y>>> {
        self.samples
            .iter()
            .map(|&(x, y)| {
                Ok(SampledPoint::new(
                    X::from_magnitude(x, self.x_dims)?,
                    Y::from_magnitude(y, self.y_dims)?,
                ))
            })
            .collect()
    }

    /// Running integral from the lower bound at every accepted step
    /// boundary, in walk order.
    ///
    /// # Errors
    /// Propagates conversion failures from [`Dimensioned::from_magnitude`].
    pub fn partial_integrals(&self) -> QuantityResult<Vec<SampledPoint<X, I>>> {
        let i_dims = self.y_dims.product(self.x_dims)?;
        self.partials
            .iter()
            .map(|&(x, p)| {
                Ok(SampledPoint::new(
                    X::from_magnitude(x, self.x_dims)?,
                    I::from_magnitude(p, i_dims)?,
                ))
            })
            .collect()
    }

    /// Interpolant of the integrand through the stored samples.
    ///
    /// With stored running integrals each piece is the quadratic whose
    /// integral over the piece equals the integrator's own increment, so the
    /// interpolant integrates back to [`Quadrature::integral`]. Without them
    /// the pieces are linear.
    ///
    /// # Errors
    /// - `InvalidConfiguration` if samples were not stored
    /// - `InsufficientPoints` if the bounds were equal
    pub fn function_interpolant(&self) -> QuantityResult<Interpolant<X, Y>> {
        if self.samples.is_empty() {
            return Err(QuantityError::InvalidConfiguration(
                "function interpolant requires stored samples",
            ));
        }
        let (xs, ys) = ascending(&self.samples);

        let table = if self.partials.len() == self.samples.len() {
            let (_, running) = ascending(&self.partials);
            let areas: Vec<f64> = running.windows(2).map(|p| p[1] - p[0]).collect();
            SparseTable::curvature_matched(xs, ys, &areas)?
        } else {
            SparseTable::linear(xs, ys)?
        };

        Ok(Interpolant::from_table(
            Box::new(table),
            self.x_dims,
            self.y_dims,
        ))
    }

    /// Piecewise-linear interpolant of the running integral.
    ///
    /// # Errors
    /// - `InvalidConfiguration` if running integrals were not stored
    /// - `InsufficientPoints` if the bounds were equal
    pub fn integral_interpolant(&self) -> QuantityResult<Interpolant<X, I>> {
        if self.partials.is_empty() {
            return Err(QuantityError::InvalidConfiguration(
                "integral interpolant requires stored running integrals",
            ));
        }
        let (xs, ps) = ascending(&self.partials);
        let table = SparseTable::linear(xs, ps)?;
        Ok(Interpolant::from_table(
            Box::new(table),
            self.x_dims,
            self.y_dims.product(self.x_dims)?,
        ))
    }
}

/// Split walk-ordered pairs into ascending abscissas and matching values.
fn ascending(pairs: &[(f64, f64)]) -> (Vec<f64>, Vec<f64>) {
    let mut pairs = pairs.to_vec();
    if pairs.len() > 1 && pairs[pairs.len() - 1].0 < pairs[0].0 {
        pairs.reverse();
    }
    pairs.into_iter().unzip()
}

// ============================================================================
// Integrator
// ============================================================================

/// Walk state local to one `integrate` call.
struct Walk {
    integral: f64,
    stats: QuadratureStats,
    samples: Vec<(f64, f64)>,
    partials: Vec<(f64, f64)>,
}

/// Adaptive-step quadrature driver.
///
/// # Example
/// ```
/// use dimnum::prelude::*;
/// use dimnum::numeric::{Length, StaticDimValue};
///
/// let integrator = AdaptiveIntegrator::new(QuadratureConfig::default()).unwrap();
/// let l = StaticDimValue::<Length>::new(2.0);
/// let result = integrator
///     .integrate(|x: StaticDimValue<Length>| x, StaticDimValue::ZERO, l)
///     .unwrap();
///
/// // Integral of x over [0, L] is L²/2
/// let area = result.integral();
/// assert!((area.magnitude() - 2.0).abs() < 1e-9);
/// ```
pub struct AdaptiveIntegrator {
    config: QuadratureConfig,
    observer: Arc<dyn StepObserver>,
}

impl AdaptiveIntegrator {
    /// Create an integrator that reports to no one.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` if the configuration fails validation.
    pub fn new(config: QuadratureConfig) -> QuantityResult<Self> {
        Self::with_observer(config, Arc::new(NoOpObserver))
    }

    /// Create an integrator that reports every step to `observer`.
    ///
    /// # Errors
    /// Returns `InvalidConfiguration` if the configuration fails validation.
    pub fn with_observer(
        config: QuadratureConfig,
        observer: Arc<dyn StepObserver>,
    ) -> QuantityResult<Self> {
        config.validate()?;
        Ok(Self { config, observer })
    }

    #[inline]
    pub fn config(&self) -> &QuadratureConfig {
        &self.config
    }

    /// Integrate `f` from `x1` to `x2`.
    ///
    /// `x2 < x1` is allowed and gives the negated integral.
    ///
    /// # Errors
    /// - `DimensionMismatch` if the bounds, the initial step, or successive
    ///   results of `f` disagree in dimension
    /// - `InvalidConfiguration` if a bound is not finite
    /// - `Convergence` if `max_steps` trial steps do not reach `x2`
    /// - `StepUnderflow` if the step shrinks to nothing relative to `x`
    pub fn integrate<X, Y, F>(
        &self,
        f: F,
        x1: X,
        x2: X,
    ) -> QuantityResult<Quadrature<X, Y, <Y as Mul<X>>::Output>>
    where
        X: Dimensioned,
        Y: Dimensioned + Mul<X>,
        <Y as Mul<X>>::Output: Dimensioned,
        F: FnMut(X) -> Y,
    {
        let x_dims = x1.dimension();
        x_dims.ensure_same(x2.dimension())?;

        let (a, b) = (x1.magnitude(), x2.magnitude());
        if !(a.is_finite() && b.is_finite()) {
            return Err(QuantityError::InvalidConfiguration(
                "integration bounds must be finite",
            ));
        }

        let h0 = self.initial_step(a, b, x_dims)?;
        let mut g = MagnitudeFn::new(f, x_dims);
        let walk = self.walk(&mut |x: f64| g.call(x), a, b, h0)?;
        let y_dims = g.y_dims();

        tracing::debug!(
            "rk quadrature over [{}, {}]: {} accepted, {} rejected, {} evaluations",
            a,
            b,
            walk.stats.accepted,
            walk.stats.rejected,
            walk.stats.evaluations
        );

        Ok(Quadrature {
            integral: <<Y as Mul<X>>::Output as Dimensioned>::from_magnitude(
                walk.integral,
                y_dims.product(x_dims)?,
            )?,
            tolerance: self.config.effective_tolerance(),
            stats: walk.stats,
            x_dims,
            y_dims,
            samples: walk.samples,
            partials: walk.partials,
            _types: PhantomData,
        })
    }

    /// First trial step, pointing from `a` toward `b`.
    fn initial_step(&self, a: f64, b: f64, x_dims: DimensionVector) -> QuantityResult<f64> {
        let span = b - a;
        let h = match self.config.initial_step {
            Some(step) => {
                x_dims.ensure_same(step.dims())?;
                step.magnitude().abs()
            },
            None => (span / (self.config.initial_divisions - 1) as f64).abs(),
        };
        Ok(if span < 0.0 { -h } else { h })
    }

    /// Quality-controlled walk over magnitudes.
    fn walk<G>(&self, g: &mut G, x1: f64, x2: f64, h0: f64) -> QuantityResult<Walk>
    where
        G: FnMut(f64) -> QuantityResult<f64>,
    {
        let tol = self.config.effective_tolerance();
        let store_samples = self.config.store_samples;
        let store_integrals = self.config.store_integrals;
        let direction = if x2 < x1 { -1.0 } else { 1.0 };

        let mut stats = QuadratureStats::default();
        let mut samples = Vec::new();
        let mut partials = Vec::new();

        let mut x = x1;
        let mut y = 0.0;
        let mut dydx = g(x)?;
        stats.evaluations += 1;
        if store_samples {
            samples.push((x, dydx));
        }
        if store_integrals {
            partials.push((x, y));
        }

        if x1 == x2 {
            return Ok(Walk {
                integral: 0.0,
                stats,
                samples,
                partials,
            });
        }

        self.observer.on_event(QuadratureEvent::Started {
            from: x1,
            to: x2,
            step: h0,
            tolerance: tol,
        });

        let mut h = h0;
        loop {
            let yscal = y.abs() + (dydx * h).abs() + TINY;

            // Never step past the upper bound
            let mut landing = false;
            if (x + h - x2) * direction >= 0.0 {
                h = x2 - x;
                landing = true;
            }

            let (step, err, y_next, dydx_next) = loop {
                if stats.trials() >= self.config.max_steps {
                    return Err(QuantityError::Convergence {
                        iterations: stats.trials(),
                        position: x,
                    });
                }

                let (y_trial, y_err, f_end) = cash_karp(g, x, y, dydx, h)?;
                stats.evaluations += 4;
                let err = (y_err / yscal).abs() / tol;
                if err <= 1.0 {
                    break (h, err, y_trial, f_end);
                }

                stats.rejected += 1;
                let shrunk = shrink(h, err);
                self.observer.on_event(QuadratureEvent::StepRejected {
                    position: x,
                    step: h,
                    error: err,
                    next_step: shrunk,
                });
                if x + shrunk == x {
                    return Err(QuantityError::StepUnderflow {
                        position: x,
                        step: shrunk,
                    });
                }
                h = shrunk;
                landing = false;
            };

            stats.accepted += 1;
            x += step;
            if landing || (x - x2) * direction >= 0.0 {
                x = x2;
                landing = true;
            }
            y = y_next;
            dydx = dydx_next;

            if store_samples {
                samples.push((x, dydx));
            }
            if store_integrals {
                partials.push((x, y));
            }
            self.observer.on_event(QuadratureEvent::StepAccepted {
                position: x,
                step,
                error: err,
                integral: y,
            });

            if landing {
                break;
            }

            let next = grow(step, err);
            if !(next.abs() > 0.0) || x + next == x {
                return Err(QuantityError::StepUnderflow {
                    position: x,
                    step: next,
                });
            }
            h = next;
        }

        self.observer.on_event(QuadratureEvent::Finished {
            integral: y,
            accepted: stats.accepted,
            rejected: stats.rejected,
        });

        Ok(Walk {
            integral: y,
            stats,
            samples,
            partials,
        })
    }
}

/// One Cash–Karp trial step of `dy/dx = g(x)` from `x` with step `h`.
///
/// Returns the fifth-order value at `x + h`, its error estimate, and `g` at
/// `x + h` (the fifth stage, reused as the next step's slope).
fn cash_karp<G>(g: &mut G, x: f64, y: f64, dydx: f64, h: f64) -> QuantityResult<(f64, f64, f64)>
where
    G: FnMut(f64) -> QuantityResult<f64>,
{
    let k3 = g(x + A3 * h)?;
    let k4 = g(x + A4 * h)?;
    let k5 = g(x + A5 * h)?;
    let k6 = g(x + A6 * h)?;

    let y_next = y + h * (C1 * dydx + C3 * k3 + C4 * k4 + C6 * k6);
    let y_err = h * (DC1 * dydx + DC3 * k3 + DC4 * k4 + DC5 * k5 + DC6 * k6);
    Ok((y_next, y_err, k5))
}

/// Smaller step after a rejected trial; never below a tenth of `h`.
#[inline]
fn shrink(h: f64, err: f64) -> f64 {
    h * (SAFETY * err.powf(PSHRNK)).max(MAX_SHRINK)
}

/// Next step after an accepted trial; never more than five times `h`.
#[inline]
fn grow(h: f64, err: f64) -> f64 {
    let errcon = (MAX_GROW / SAFETY).powf(1.0 / PGROW);
    if err > errcon {
        SAFETY * h * err.powf(PGROW)
    } else {
        MAX_GROW * h
    }
}
