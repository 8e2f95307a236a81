//! # Ballistic model fitter
//!
//! Closed-form motion model of the projectile, with constant horizontal velocity and constant
//! vertical deceleration `g`:
//!
//! ```text
//! x(t) = x0 + vx·t
//! y(t) = y0 + vy·t
//! z(t) = z0 + vz·t − ½·g·t²
//! ```
//!
//! Fitting reduces to three independent two-parameter linear least-squares problems against
//! the elapsed time: one per horizontal axis, and one for `(z0, vz)` against the transformed
//! regressand `z + ½·g·t²`. Each line is solved on centered times, which is exact least
//! squares and stays well conditioned when all times are far from zero.
use nalgebra::{DVector, Vector3};

use crate::constants::{Second, MIN_TIME_SPREAD};
use crate::estimator_errors::EstimatorError;

/// Position and velocity at `t = 0` under the ballistic model.
///
/// The six state components are always produced together by [`fit_ballistic_trajectory`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallisticParameters {
    /// `(x0, y0, z0)`
    pub position: Vector3<f64>,
    /// `(vx, vy, vz)`
    pub velocity: Vector3<f64>,
    /// Vertical deceleration the parameters were fitted with.
    pub gravity: f64,
}

impl BallisticParameters {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>, gravity: f64) -> Self {
        BallisticParameters {
            position,
            velocity,
            gravity,
        }
    }

    pub fn position_at(&self, t: Second) -> Vector3<f64> {
        let mut p = self.position + self.velocity * t;
        p.z -= 0.5 * self.gravity * t * t;
        p
    }

    pub fn velocity_at(&self, t: Second) -> Vector3<f64> {
        let mut v = self.velocity;
        v.z -= self.gravity * t;
        v
    }
}

/// Least-squares line `y ≈ a + b·t` on pre-centered times; returns `(a, b)`.
fn fit_line(centered: &DVector<f64>, spread: f64, t_mean: f64, y: &DVector<f64>) -> (f64, f64) {
    let y_mean = y.mean();
    let slope = centered.dot(&y.add_scalar(-y_mean)) / spread;
    (y_mean - slope * t_mean, slope)
}

/// Fit the ballistic model to samples and their elapsed times.
///
/// Arguments
/// -----------------
/// * `points`: sensor-frame positions.
/// * `times`: elapsed time of each position (index-aligned; non-monotonic values are
///   tolerated but degrade the fit).
/// * `gravity`: vertical deceleration `g` (m/s²).
///
/// Return
/// ----------
/// * The fitted [`BallisticParameters`].
/// * `Err(EstimatorError::InsufficientSamples)` for fewer than two samples.
/// * `Err(EstimatorError::SingularSystem)` if all times are (numerically) identical.
pub fn fit_ballistic_trajectory(
    points: &[Vector3<f64>],
    times: &[Second],
    gravity: f64,
) -> Result<BallisticParameters, EstimatorError> {
    if points.len() != times.len() {
        return Err(EstimatorError::MismatchedLengths {
            samples: points.len(),
            times: times.len(),
        });
    }
    let n = points.len();
    if n < 2 {
        return Err(EstimatorError::InsufficientSamples {
            required: 2,
            found: n,
        });
    }

    let t = DVector::from_column_slice(times);
    let t_mean = t.mean();
    let centered = t.add_scalar(-t_mean);
    let spread = centered.norm_squared();
    if !spread.is_finite() || spread < MIN_TIME_SPREAD {
        return Err(EstimatorError::SingularSystem);
    }

    let axis = |k: usize| DVector::from_iterator(n, points.iter().map(|p| p[k]));
    let lifted_z = DVector::from_iterator(
        n,
        points
            .iter()
            .zip(times.iter())
            .map(|(p, &ti)| p.z + 0.5 * gravity * ti * ti),
    );

    let (x0, vx) = fit_line(&centered, spread, t_mean, &axis(0));
    let (y0, vy) = fit_line(&centered, spread, t_mean, &axis(1));
    let (z0, vz) = fit_line(&centered, spread, t_mean, &lifted_z);

    Ok(BallisticParameters::new(
        Vector3::new(x0, y0, z0),
        Vector3::new(vx, vy, vz),
        gravity,
    ))
}
