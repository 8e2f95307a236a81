//! # Impact solver
//!
//! Solves the ballistic height equation for the first future crossing of the target plane,
//!
//! ```text
//! z0 + vz·t − ½·g·t² = h_sensor        with  h_sensor = lidar_to_target.z + target_height
//! ```
//!
//! and projects the horizontal motion to that instant. The impact point is reported in the
//! target frame, i.e. offset by `lidar_to_target` (see
//! [`FrameOffset`](crate::impact_estimation::FrameOffset)).
use nalgebra::Vector3;

use crate::constants::{Meter, Second};
use crate::estimator_errors::EstimatorError;
use crate::impact_estimation::ballistic::BallisticParameters;
use crate::impact_estimation::height_root::quadratic_roots;
use crate::impact_estimation::FrameOffset;

/// First crossing of the target plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactPoint {
    /// Elapsed episode time of the crossing (s).
    pub time: Second,
    /// Horizontal position in the target frame.
    pub x: Meter,
    pub y: Meter,
}

/// Smallest non-negative real root of `½·g·t² − vz·t + (h − z0) = 0`.
fn first_crossing(z0: f64, vz: f64, height: f64, gravity: f64) -> Result<Second, EstimatorError> {
    let (a, b, c) = (0.5 * gravity, -vz, height - z0);
    let scale = a.abs().max(b.abs()).max(c.abs());
    quadratic_roots(a, b, c, scale)
        .into_iter()
        .filter(|t| t.is_finite() && *t >= 0.0)
        .min_by(|l, r| l.total_cmp(r))
        .ok_or(EstimatorError::NoPhysicalSolution)
}

/// Compute the time and target-frame position of the impact.
///
/// Arguments
/// -----------------
/// * `ballistic`: fitted ballistic state (sensor frame, `t = 0` at episode start).
/// * `lidar_to_target`: target-frame origin expressed in the sensor frame.
/// * `target_height`: crossing height in the target frame.
///
/// Return
/// ----------
/// * The [`ImpactPoint`] of the first crossing at or after `t = 0`.
/// * `Err(EstimatorError::NoPhysicalSolution)` if the trajectory never reaches the plane
///   going forward (no non-negative real root).
pub fn calculate_impact_point(
    ballistic: &BallisticParameters,
    lidar_to_target: &FrameOffset,
    target_height: Meter,
) -> Result<ImpactPoint, EstimatorError> {
    let height = lidar_to_target.z + target_height;
    let time = first_crossing(
        ballistic.position.z,
        ballistic.velocity.z,
        height,
        ballistic.gravity,
    )?;

    let at = ballistic.position_at(time) - lidar_to_target.as_vector();
    Ok(ImpactPoint {
        time,
        x: at.x,
        y: at.y,
    })
}

/// Quick vertical-only estimate of the time to reach `target_height`.
///
/// The initial height is taken from the first sample and the initial vertical speed from the
/// first/last pair, `v0 = (z_last − z_first + ½·g·T²) / T`, where `T` is the elapsed time
/// between them. Useful as a sanity check of the full ballistic fit.
///
/// Return
/// ----------
/// * Time of the first crossing, measured from the first sample.
/// * `Err(EstimatorError::InsufficientSamples)` for fewer than two samples.
/// * `Err(EstimatorError::SingularSystem)` for a non-positive elapsed time.
/// * `Err(EstimatorError::NoPhysicalSolution)` if the height is never reached.
pub fn time_to_height(
    points: &[Vector3<f64>],
    elapsed: Second,
    target_height: Meter,
    gravity: f64,
) -> Result<Second, EstimatorError> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Err(EstimatorError::InsufficientSamples {
            required: 2,
            found: 0,
        });
    };
    if points.len() < 2 {
        return Err(EstimatorError::InsufficientSamples {
            required: 2,
            found: points.len(),
        });
    }
    if !(elapsed > 0.0) {
        return Err(EstimatorError::SingularSystem);
    }

    let v0 = (last.z - first.z + 0.5 * gravity * elapsed * elapsed) / elapsed;
    first_crossing(first.z, v0, target_height, gravity)
}
