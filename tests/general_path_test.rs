mod common;

use approx::assert_relative_eq;
use impact_estimator::impact_estimation::ballistic::fit_ballistic_trajectory;
use impact_estimator::impact_estimation::impact::{calculate_impact_point, time_to_height};
use impact_estimator::impact_estimation::ransac::fit_cubic_ransac;
use impact_estimator::impact_estimation::{EstimatorParams, FrameOffset};
use impact_estimator::observations::synthetic::{
    ballistic_samples, noisy_ballistic_samples, uniform_times,
};
use impact_estimator::{EstimatorError, ImpactEstimator, PredictionKind};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::common::{assert_ballistic_close, expected_impact_time, reference_throw, with_outliers};

#[test]
fn test_reference_scenario() {
    let model = reference_throw();
    let samples = ballistic_samples(&model, &[0.0, 0.1, 0.2, 0.3]);

    let fitted = fit_ballistic_trajectory(samples.points(), samples.times(), 9.8).unwrap();
    assert_ballistic_close(&fitted, &model, 1e-3);

    let impact = calculate_impact_point(&fitted, &FrameOffset::default(), 0.0).unwrap();
    // positive root of 1 + 2t - 4.9t² = 0
    let expected = (2.0 + (4.0f64 + 4.0 * 4.9).sqrt()) / 9.8;
    assert_relative_eq!(impact.time, expected, epsilon = 1e-9);
    assert!(impact.time > 0.0);
}

#[test]
fn test_ransac_rejects_thirty_percent_outliers() {
    let model = reference_throw();
    let times = uniform_times(20, 0.02);
    let clean = ballistic_samples(&model, &times);
    let outliers = [2, 5, 9, 12, 15, 18];
    let corrupted = with_outliers(&clean, &outliers, Vector3::new(0.0, 0.0, 0.5));

    let mut rng = StdRng::seed_from_u64(42);
    let ransac = fit_cubic_ransac(corrupted.times(), corrupted.points(), 0.1, 1000, &mut rng).unwrap();
    let expected_inliers: Vec<usize> = (0..20).filter(|i| !outliers.contains(i)).collect();
    assert_eq!(ransac.inliers, expected_inliers);
    assert_eq!(ransac.outlier_count(20), outliers.len());

    let cleaned = corrupted.select(&ransac.inliers);
    let fitted = fit_ballistic_trajectory(cleaned.points(), cleaned.times(), 9.8).unwrap();
    assert_ballistic_close(&fitted, &model, 1e-6);
}

#[test]
fn test_estimator_on_noisy_throw_with_outliers() {
    let model = reference_throw();
    let times = uniform_times(25, 0.02);
    let mut rng = StdRng::seed_from_u64(7);
    let noisy = noisy_ballistic_samples(&model, &times, 0.005, &mut rng).unwrap();
    let outliers = [3, 8, 13, 18, 23];
    let corrupted = with_outliers(&noisy, &outliers, Vector3::new(0.0, 0.0, 0.5));

    let mut estimator =
        ImpactEstimator::with_rng(EstimatorParams::default(), StdRng::seed_from_u64(42)).unwrap();
    let out = estimator.try_estimate(&corrupted).unwrap();

    assert_eq!(out.kind, PredictionKind::Ballistic);
    assert!(out.inliers.iter().all(|i| !outliers.contains(i)));
    assert_relative_eq!(out.result.vz, 2.0, epsilon = 0.05);
    assert_relative_eq!(out.result.vx, 0.5, epsilon = 0.05);
    assert_relative_eq!(
        out.result.impact_time,
        expected_impact_time(&model, 0.0),
        epsilon = 0.02
    );
}

#[test]
fn test_without_ransac_outliers_bias_the_fit() {
    let model = reference_throw();
    let times = uniform_times(20, 0.02);
    let corrupted = with_outliers(
        &ballistic_samples(&model, &times),
        &[4, 10, 16],
        Vector3::new(0.0, 0.0, 0.5),
    );

    let params = EstimatorParams::builder().use_ransac(false).build().unwrap();
    let mut plain = ImpactEstimator::with_rng(params, StdRng::seed_from_u64(1)).unwrap();
    let biased = plain.try_estimate(&corrupted).unwrap();
    assert_eq!(biased.inliers.len(), 20);

    let mut robust =
        ImpactEstimator::with_rng(EstimatorParams::default(), StdRng::seed_from_u64(1)).unwrap();
    let cleaned = robust.try_estimate(&corrupted).unwrap();

    let truth = expected_impact_time(&model, 0.0);
    assert!((biased.result.impact_time - truth).abs() > 1e-3);
    assert_relative_eq!(cleaned.result.impact_time, truth, epsilon = 1e-6);
}

#[test]
fn test_target_plane_above_sensor_origin() {
    let model = reference_throw();
    let samples = ballistic_samples(&model, &uniform_times(10, 0.03));
    let params = EstimatorParams::builder()
        .lidar_to_target(FrameOffset::new(0.1, 0.2, 0.3))
        .target_height(0.2)
        .build()
        .unwrap();
    let mut estimator = ImpactEstimator::with_rng(params, StdRng::seed_from_u64(3)).unwrap();
    let out = estimator.try_estimate(&samples).unwrap();

    // plane at z = 0.5 in the sensor frame
    let t = expected_impact_time(&model, 0.5);
    assert_relative_eq!(out.result.impact_time, t, epsilon = 1e-9);
    assert_relative_eq!(out.result.x_impact, 0.5 * t - 0.1, epsilon = 1e-9);
    assert_relative_eq!(out.result.y_impact, 0.5 * t - 0.2, epsilon = 1e-9);
    assert_relative_eq!(out.path.last().unwrap().z, 0.5, epsilon = 1e-9);
}

#[test]
fn test_projectile_never_reaching_plane() {
    // plane at 3 m while the apex is about 1.2 m
    let samples = ballistic_samples(&reference_throw(), &uniform_times(8, 0.04));
    let params = EstimatorParams::builder().target_height(3.0).build().unwrap();
    let mut estimator = ImpactEstimator::with_rng(params, StdRng::seed_from_u64(5)).unwrap();

    assert_eq!(
        estimator.try_estimate(&samples).unwrap_err(),
        EstimatorError::NoPhysicalSolution
    );
    let out = estimator.estimate(&samples);
    assert!(!out.result.success);
    assert_eq!(out.result.impact_time, 0.0);
    assert!(out.path.is_empty());
}

#[test]
fn test_quick_estimate_agrees_with_full_fit() {
    let model = reference_throw();
    let times = uniform_times(6, 0.05);
    let samples = ballistic_samples(&model, &times);

    let quick = time_to_height(samples.points(), times[5], 0.0, 9.8).unwrap();
    let mut estimator =
        ImpactEstimator::with_rng(EstimatorParams::default(), StdRng::seed_from_u64(0)).unwrap();
    let full = estimator.try_estimate(&samples).unwrap();
    assert_relative_eq!(quick, full.result.impact_time, epsilon = 1e-9);
}
