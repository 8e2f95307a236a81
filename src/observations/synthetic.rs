//! # Synthetic episodes
//!
//! Generate sample sequences from a known ballistic model, optionally perturbed by isotropic
//! Gaussian noise. Used to replay throws without a sensor and to exercise the estimator with
//! a known ground truth.
use nalgebra::Vector3;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::constants::Second;
use crate::estimator_errors::EstimatorError;
use crate::impact_estimation::ballistic::BallisticParameters;
use crate::observations::{Sample, SampleSequence};

/// Exact samples of `model` at the given times.
pub fn ballistic_samples(model: &BallisticParameters, times: &[Second]) -> SampleSequence {
    times
        .iter()
        .map(|&t| Sample::new(model.position_at(t), t))
        .collect()
}

/// Samples of `model` with each coordinate perturbed by `N(0, sigma²)`.
///
/// Arguments
/// -----------------
/// * `model`: ground-truth trajectory.
/// * `times`: sampling instants (elapsed episode time).
/// * `sigma`: standard deviation of the position noise; `0.0` yields exact samples.
/// * `rng`: random source.
///
/// Return
/// ----------
/// * The noisy sample sequence, or `EstimatorError::NoiseInjectionError` for an invalid `sigma`.
pub fn noisy_ballistic_samples<R: Rng + ?Sized>(
    model: &BallisticParameters,
    times: &[Second],
    sigma: f64,
    rng: &mut R,
) -> Result<SampleSequence, EstimatorError> {
    let normal = Normal::new(0.0, sigma)?;
    Ok(times
        .iter()
        .map(|&t| {
            let noise = Vector3::new(normal.sample(rng), normal.sample(rng), normal.sample(rng));
            Sample::new(model.position_at(t) + noise, t)
        })
        .collect())
}

/// Evenly spaced sampling instants `0, dt, 2·dt, …` (`count` of them).
pub fn uniform_times(count: usize, dt: Second) -> Vec<Second> {
    (0..count).map(|i| dt * i as f64).collect()
}
