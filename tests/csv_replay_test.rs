mod common;

use std::fs::File;

use approx::assert_relative_eq;
use impact_estimator::impact_estimation::EstimatorParams;
use impact_estimator::observations::read_samples_csv;
use impact_estimator::{EstimatorError, ImpactEstimator};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::common::{expected_impact_time, reference_throw};

#[test]
fn test_replay_recorded_throw() {
    let file = File::open("tests/data/throw.csv").unwrap();
    let samples = read_samples_csv(file).unwrap();
    assert_eq!(samples.len(), 8);
    assert_relative_eq!(samples.times()[7], 0.35, epsilon = 1e-12);

    let mut estimator =
        ImpactEstimator::with_rng(EstimatorParams::default(), StdRng::seed_from_u64(42)).unwrap();
    let out = estimator.try_estimate(&samples).unwrap();

    // row 5 was recorded 0.8 m too high
    assert_eq!(out.inliers, vec![0, 1, 2, 3, 4, 6, 7]);
    let model = reference_throw();
    assert_relative_eq!(
        out.result.impact_time,
        expected_impact_time(&model, 0.0),
        epsilon = 1e-6
    );
    assert_relative_eq!(out.result.x_impact, out.result.y_impact, epsilon = 1e-9);
}

#[test]
fn test_malformed_row_is_reported() {
    let data = "t,x,y,z\n0.0,0.0,0.0,1.0\n0.1,oops,0.0,1.1\n";
    let err = read_samples_csv(data.as_bytes()).unwrap_err();
    assert!(matches!(err, EstimatorError::CsvError(_)));
}
