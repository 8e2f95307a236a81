use impact_estimator::impact_estimation::{EstimatorParams, FrameOffset};
use impact_estimator::{EstimatorError, ImpactEstimator};

#[test]
fn test_partial_json_keeps_defaults() {
    let json = r#"{
        "min_samples": 6,
        "ransac_threshold": 0.05,
        "lidar_to_target": { "x": 0.1, "y": 0.0, "z": -0.5 }
    }"#;
    let params: EstimatorParams = serde_json::from_str(json).unwrap();

    assert_eq!(params.min_samples, 6);
    assert_eq!(params.ransac_threshold, 0.05);
    assert_eq!(params.lidar_to_target, FrameOffset::new(0.1, 0.0, -0.5));
    assert_eq!(params.gravity, 9.8);
    assert_eq!(params.ransac_max_iterations, 1000);
    assert_eq!(params.gap_timeout, 0.3);
    assert!(params.use_ransac);
    assert_eq!(params.crossing_height(), -0.5);
}

#[test]
fn test_deserialized_params_are_validated() {
    let params: EstimatorParams = serde_json::from_str(r#"{ "gravity": 0.0 }"#).unwrap();
    let err = ImpactEstimator::new(params).unwrap_err();
    assert!(matches!(err, EstimatorError::InvalidEstimatorParameter(_)));
}

#[test]
fn test_builder_rejects_bad_values() {
    assert!(EstimatorParams::builder().ransac_threshold(0.0).build().is_err());
    assert!(EstimatorParams::builder().min_samples(1).build().is_err());
    assert!(EstimatorParams::builder().trajectory_points(1).build().is_err());
    assert!(EstimatorParams::builder().cooldown(-1.0).build().is_err());
    assert!(EstimatorParams::builder().target_height(f64::NAN).build().is_err());
    assert!(EstimatorParams::builder().build().is_ok());
}

#[test]
fn test_parameter_table() {
    let params = EstimatorParams::builder().min_samples(5).build().unwrap();
    let table = format!("{params:#}");
    assert!(table.starts_with("Impact Estimation Parameters"));
    assert!(table.contains("min_samples"));
    assert!(table.contains("lidar_to_target"));
}
