//! Stochastic actual-duration sampling.
//!
//! Actual processing times are drawn from a log-normal distribution with
//! log-mean `ln(planned)` and shape parameter equal to the coefficient of
//! variation, then rounded to two decimal places. Note the expectation of
//! the draw lies *above* the planned duration.
//!
//! The random source is injectable (`R: Rng`), and the `DurationSampler`
//! trait is the seam the simulation uses, so tests can force determinism
//! or substitute fixed samplers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::error::SimulationError;

/// Draws a log-normal actual duration for a planned duration (minutes).
///
/// `coefficient_of_variation <= 0` degenerates to returning the planned
/// duration unchanged (a zero shape parameter would make the draw
/// deterministic anyway, and this sidesteps the distribution's edge
/// cases). Fails with `InvalidDuration` when `planned <= 0`, since
/// `ln(planned)` is undefined there.
///
/// The result is rounded to two decimal places.
pub fn lognormal_duration<R: Rng + ?Sized>(
    planned: f64,
    coefficient_of_variation: f64,
    rng: &mut R,
) -> Result<f64, SimulationError> {
    if planned <= 0.0 || !planned.is_finite() {
        return Err(SimulationError::InvalidDuration { minutes: planned });
    }
    if coefficient_of_variation <= 0.0 {
        return Ok(round2(planned));
    }

    let mu = planned.ln();
    let z: f64 = rng.sample(StandardNormal);
    Ok(round2((mu + coefficient_of_variation * z).exp()))
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Source of actual durations for the simulation engine.
pub trait DurationSampler {
    /// Samples the actual duration (minutes) for a planned duration.
    fn sample(&mut self, planned_minutes: f64) -> Result<f64, SimulationError>;
}

/// The default sampler: log-normal around the planned duration.
#[derive(Debug, Clone)]
pub struct LogNormalSampler<R = StdRng> {
    coefficient_of_variation: f64,
    rng: R,
}

impl LogNormalSampler<StdRng> {
    /// Creates a sampler seeded from the operating system.
    pub fn new(coefficient_of_variation: f64) -> Self {
        Self {
            coefficient_of_variation,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a deterministically seeded sampler.
    pub fn seeded(coefficient_of_variation: f64, seed: u64) -> Self {
        Self {
            coefficient_of_variation,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> LogNormalSampler<R> {
    /// Creates a sampler over an injected random source.
    pub fn with_rng(coefficient_of_variation: f64, rng: R) -> Self {
        Self {
            coefficient_of_variation,
            rng,
        }
    }
}

impl<R: Rng> DurationSampler for LogNormalSampler<R> {
    fn sample(&mut self, planned_minutes: f64) -> Result<f64, SimulationError> {
        lognormal_duration(planned_minutes, self.coefficient_of_variation, &mut self.rng)
    }
}
