//! # Trajectory resampler
//!
//! Materializes the estimated ballistic path as an evenly spaced point sequence from the
//! episode start to the impact, for visualization or downstream consumers.
use nalgebra::Vector3;

use crate::constants::Second;
use crate::estimator_errors::EstimatorError;
use crate::impact_estimation::ballistic::BallisticParameters;

/// Sample `ballistic` at `count` evenly spaced times over `[0, impact_time]`, both ends included.
///
/// Return
/// ----------
/// * The sampled positions, in the sensor frame.
/// * `Err(EstimatorError::InvalidImpactTime)` if `impact_time` is negative or not finite.
/// * `Err(EstimatorError::InvalidEstimatorParameter)` if `count < 2`.
pub fn generate_trajectory_points(
    ballistic: &BallisticParameters,
    impact_time: Second,
    count: usize,
) -> Result<Vec<Vector3<f64>>, EstimatorError> {
    if !impact_time.is_finite() || impact_time < 0.0 {
        return Err(EstimatorError::InvalidImpactTime(impact_time));
    }
    if count < 2 {
        return Err(EstimatorError::InvalidEstimatorParameter(
            "trajectory_points must be >= 2".into(),
        ));
    }

    let step = impact_time / (count - 1) as f64;
    Ok((0..count)
        .map(|i| {
            // last point lands exactly on the impact time
            let t = if i + 1 == count { impact_time } else { step * i as f64 };
            ballistic.position_at(t)
        })
        .collect())
}

#[cfg(test)]
mod resample_test {
    use super::*;
    use approx::assert_relative_eq;

    fn model() -> BallisticParameters {
        BallisticParameters::new(Vector3::new(0.0, 0.0, 1.0), Vector3::new(0.5, 0.5, 2.0), 9.8)
    }

    #[test]
    fn test_endpoints_and_spacing() {
        let m = model();
        let path = generate_trajectory_points(&m, 0.6, 7).unwrap();
        assert_eq!(path.len(), 7);
        assert_eq!(path[0], m.position);
        assert_relative_eq!(path[6], m.position_at(0.6), epsilon = 1e-12);
        // horizontal motion is uniform, so consecutive x steps are equal
        for w in path.windows(2) {
            assert_relative_eq!(w[1].x - w[0].x, 0.05, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_impact_time_collapses() {
        let m = model();
        let path = generate_trajectory_points(&m, 0.0, 5).unwrap();
        assert!(path.iter().all(|p| *p == m.position));
    }

    #[test]
    fn test_invalid_inputs() {
        let m = model();
        assert_eq!(
            generate_trajectory_points(&m, -0.1, 10).unwrap_err(),
            EstimatorError::InvalidImpactTime(-0.1)
        );
        assert!(generate_trajectory_points(&m, f64::NAN, 10).is_err());
        assert!(generate_trajectory_points(&m, 1.0, 1).is_err());
    }
}
