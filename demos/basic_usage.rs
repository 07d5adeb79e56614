// ============================================================================
// Basic Usage
// Gaussian probability over a dimensioned abscissa
// ============================================================================

use dimnum::engine::integrate_trapezoid;
use dimnum::prelude::*;
use dimnum::numeric::Quotient;

type Meters = StaticDimValue<Length>;
type PerMeter = StaticDimValue<Quotient<Dimensionless, Length>>;

fn main() -> QuantityResult<()> {
    #[cfg(feature = "logging")]
    dimnum::utils::init_logging();

    let sigma = Meters::new(0.03);
    let norm = 1.0 / (sigma.magnitude() * (2.0 * std::f64::consts::PI).sqrt());
    let density = |x: Meters| {
        let z = (x / sigma).into_scalar();
        PerMeter::new(norm * (-0.5 * z * z).exp())
    };

    // Probability mass within one standard deviation, three ways
    let integrator = IntegratorBuilder::new()
        .with_tolerance(1.0e-9)
        .store_samples()
        .store_integrals()
        .build()?;
    let rk = integrator.integrate(density, -sigma, sigma)?;
    println!(
        "Runge-Kutta:  {:.9} ({} steps, {} rejected)",
        rk.integral().into_scalar(),
        rk.stats().accepted,
        rk.stats().rejected
    );

    let config = SamplingConfig::new(1.0e-8);
    let trapezoid = integrate_trapezoid(density, -sigma, sigma, &config)?;
    println!("Trapezoid:    {:.9}", trapezoid.into_scalar());

    let sampled = Interpolant::sample(density, -sigma, sigma, &config)?;
    println!(
        "Interpolant:  {:.9} ({} points)",
        sampled.total_integral()?.into_scalar(),
        sampled.table().len()
    );

    // Cumulative distribution from the integrator's running integrals
    let cdf = rk.integral_interpolant()?;
    for cm in [-3.0, -1.5, 0.0, 1.5, 3.0] {
        let x = Meters::new(cm / 100.0);
        println!("P(-σ < X < {:>4} cm) = {:.6}", cm, cdf.evaluate(x)?.into_scalar());
    }

    // Dynamic dimensions are checked when the values meet
    let length = DynDimValue::from(sigma);
    let time = DynDimValue::new(1.0, DimensionVector::TIME);
    match length + time {
        Ok(sum) => println!("unexpected sum {:?}", sum),
        Err(e) => println!("rejected: {}", e),
    }

    Ok(())
}
