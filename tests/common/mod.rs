#![allow(dead_code)]

use approx::assert_relative_eq;
use impact_estimator::impact_estimation::ballistic::BallisticParameters;
use impact_estimator::observations::{Sample, SampleSequence};
use nalgebra::Vector3;

/// Reference throw: p0 = (0, 0, 1), v0 = (0.5, 0.5, 2), g = 9.8.
pub fn reference_throw() -> BallisticParameters {
    BallisticParameters::new(
        Vector3::new(0.0, 0.0, 1.0),
        Vector3::new(0.5, 0.5, 2.0),
        9.8,
    )
}

/// Positive root of `z0 + vz·t − ½·g·t² = height`.
pub fn expected_impact_time(model: &BallisticParameters, height: f64) -> f64 {
    let a = 0.5 * model.gravity;
    let b = model.velocity.z;
    let c = model.position.z - height;
    (b + (b * b + 4.0 * a * c).sqrt()) / (2.0 * a)
}

pub fn assert_ballistic_close(
    actual: &BallisticParameters,
    expected: &BallisticParameters,
    epsilon: f64,
) {
    assert_relative_eq!(actual.position, expected.position, epsilon = epsilon);
    assert_relative_eq!(actual.velocity, expected.velocity, epsilon = epsilon);
}

/// Displace the samples at `indices` by `offset`, keeping their timestamps.
pub fn with_outliers(samples: &SampleSequence, indices: &[usize], offset: Vector3<f64>) -> SampleSequence {
    samples
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if indices.contains(&i) {
                Sample::new(s.position + offset, s.time)
            } else {
                s
            }
        })
        .collect()
}
