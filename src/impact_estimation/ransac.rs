//! # Robust trajectory fitter (RANSAC)
//!
//! Outlier-resistant cubic fit. Each iteration draws a random minimal subset of four samples,
//! interpolates a cubic through them with [`fit_cubic`], and counts the samples whose residual
//! distance to that cubic (evaluated at their own fit parameter) is within `threshold`. The
//! largest consensus set seen across all iterations is then refitted by ordinary least squares,
//! which gives the returned coefficients.
//!
//! Randomness comes from the caller's [`rand::Rng`], so seeding it (e.g. `StdRng::seed_from_u64`)
//! makes a run reproducible.
use nalgebra::Vector3;
use rand::seq::index;
use rand::Rng;
use tracing::debug;

use crate::constants::RANSAC_MIN_SUBSET;
use crate::estimator_errors::EstimatorError;
use crate::impact_estimation::polynomial_fit::{fit_cubic, CubicFit};

/// Result of a robust fit: the refitted cubic and the consensus set it was fitted on.
#[derive(Debug, Clone, PartialEq)]
pub struct RansacFit {
    pub fit: CubicFit,
    /// Indices of the inlier samples, in ascending order.
    pub inliers: Vec<usize>,
}

impl RansacFit {
    pub fn outlier_count(&self, n_samples: usize) -> usize {
        n_samples - self.inliers.len()
    }
}

fn consensus_set(
    fit: &CubicFit,
    params: &[f64],
    points: &[Vector3<f64>],
    threshold: f64,
) -> Vec<usize> {
    params
        .iter()
        .zip(points.iter())
        .enumerate()
        .filter(|(_, (s, p))| fit.residual(**s, p) <= threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Fit a cubic while rejecting outliers by random consensus sampling.
///
/// Arguments
/// -----------------
/// * `params`: fit parameter of each sample (elapsed time on the general path).
/// * `points`: sample positions, index-aligned with `params`.
/// * `threshold`: maximum residual distance of an inlier (position units).
/// * `max_iterations`: number of minimal subsets drawn.
/// * `rng`: random source used to draw the subsets.
///
/// Return
/// ----------
/// * A [`RansacFit`] refitted on the best consensus set.
/// * `Err(EstimatorError::InsufficientSamples)` for fewer than four samples.
/// * `Err(EstimatorError::ConsensusFailure)` if no drawn subset gathered at least four inliers.
/// * `Err(EstimatorError::SingularSystem)` if the consensus set cannot be refitted.
pub fn fit_cubic_ransac<R: Rng + ?Sized>(
    params: &[f64],
    points: &[Vector3<f64>],
    threshold: f64,
    max_iterations: usize,
    rng: &mut R,
) -> Result<RansacFit, EstimatorError> {
    if params.len() != points.len() {
        return Err(EstimatorError::MismatchedLengths {
            samples: points.len(),
            times: params.len(),
        });
    }
    let n = points.len();
    if n < RANSAC_MIN_SUBSET {
        return Err(EstimatorError::InsufficientSamples {
            required: RANSAC_MIN_SUBSET,
            found: n,
        });
    }

    let mut best_inliers: Vec<usize> = Vec::new();
    let mut subset_params = [0.0; RANSAC_MIN_SUBSET];
    let mut subset_points = [Vector3::zeros(); RANSAC_MIN_SUBSET];

    for iteration in 0..max_iterations {
        let mut subset = index::sample(rng, n, RANSAC_MIN_SUBSET).into_vec();
        subset.sort_unstable();
        for (k, &i) in subset.iter().enumerate() {
            subset_params[k] = params[i];
            subset_points[k] = points[i];
        }

        // degenerate draws (e.g. duplicate times) are skipped
        let Ok(candidate) = fit_cubic(&subset_params, &subset_points) else {
            continue;
        };

        let inliers = consensus_set(&candidate, params, points, threshold);
        if inliers.len() > best_inliers.len() {
            best_inliers = inliers;
            if best_inliers.len() == n {
                debug!(iteration, "RANSAC: every sample is an inlier, stopping early");
                break;
            }
        }
    }

    if best_inliers.len() < RANSAC_MIN_SUBSET {
        return Err(EstimatorError::ConsensusFailure {
            best: best_inliers.len(),
            required: RANSAC_MIN_SUBSET,
        });
    }

    let inlier_params: Vec<f64> = best_inliers.iter().map(|&i| params[i]).collect();
    let inlier_points: Vec<Vector3<f64>> = best_inliers.iter().map(|&i| points[i]).collect();
    let fit = fit_cubic(&inlier_params, &inlier_points)?;

    debug!(
        inliers = best_inliers.len(),
        outliers = n - best_inliers.len(),
        "RANSAC consensus refitted"
    );

    Ok(RansacFit {
        fit,
        inliers: best_inliers,
    })
}
