//! # Polynomial trajectory fitter
//!
//! Ordinary least-squares fit of each coordinate of the projectile as a cubic polynomial of
//! a fit parameter `s`:
//!
//! ```text
//! x(s) = cx0 + cx1·s + cx2·s² + cx3·s³      (same for y and z)
//! ```
//!
//! The three axes share one design matrix, which is decomposed once by SVD and solved for the
//! three right-hand sides together. A rank-deficient design matrix (duplicate parameter
//! values, fewer distinct values than coefficients) is reported as
//! [`EstimatorError::SingularSystem`] instead of producing arbitrary coefficients.
//!
//! ## Fit parameter
//!
//! The fitter takes explicit parameter values, index-aligned with the points. Two
//! parametrizations are used by the crate:
//!
//! * [`normalized_index`] – `s_i = i / (n − 1)`, used when no timing is trusted
//!   (see [`fit_cubic_curve`] and the minimal estimation path);
//! * elapsed episode time – used by the robust fitter on the general path.
//!
//! Coefficient vectors are stored in **ascending** order (`[c0, c1, c2, c3]`). Lower-degree
//! fits are padded with zeros so every fit has the same cubic shape.
use nalgebra::{DMatrix, Vector3, Vector4};

use crate::constants::{CUBIC_COEFFS, SVD_EPS};
use crate::estimator_errors::EstimatorError;

/// Coefficients of a fitted cubic, one vector per coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicFit {
    pub coeffs_x: Vector4<f64>,
    pub coeffs_y: Vector4<f64>,
    pub coeffs_z: Vector4<f64>,
}

#[inline]
fn powers(s: f64) -> Vector4<f64> {
    Vector4::new(1.0, s, s * s, s * s * s)
}

impl CubicFit {
    /// Evaluate the fitted curve at parameter `s`.
    pub fn evaluate(&self, s: f64) -> Vector3<f64> {
        let p = powers(s);
        Vector3::new(
            self.coeffs_x.dot(&p),
            self.coeffs_y.dot(&p),
            self.coeffs_z.dot(&p),
        )
    }

    /// Euclidean distance between `point` and the curve evaluated at the same parameter.
    pub fn residual(&self, s: f64, point: &Vector3<f64>) -> f64 {
        (self.evaluate(s) - point).norm()
    }

    /// Sample the curve at `count` evenly spaced parameter values over `[s_start, s_end]`.
    pub fn curve_points(&self, s_start: f64, s_end: f64, count: usize) -> Vec<Vector3<f64>> {
        match count {
            0 => Vec::new(),
            1 => vec![self.evaluate(s_start)],
            _ => {
                let step = (s_end - s_start) / (count - 1) as f64;
                (0..count)
                    .map(|i| self.evaluate(s_start + step * i as f64))
                    .collect()
            }
        }
    }
}

/// Normalized sample index `i / (n − 1)` for `n` samples (`[0.0]` when `n == 1`).
pub fn normalized_index(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..n).map(|i| i as f64 / (n - 1) as f64).collect(),
    }
}

/// Least-squares polynomial fit of degree `degree ≤ 3` on every axis.
///
/// Arguments
/// -----------------
/// * `params`: fit parameter of each point (monotonic in practice, not required).
/// * `points`: positions, index-aligned with `params`.
/// * `degree`: polynomial degree; at least `degree + 1` points are required.
///
/// Return
/// ----------
/// * The fitted coefficients, padded to cubic form.
/// * `Err(EstimatorError::InsufficientSamples)` if there are fewer points than coefficients.
/// * `Err(EstimatorError::SingularSystem)` if the parameter values do not determine the
///   polynomial (e.g. duplicates).
pub fn fit_polynomial(
    params: &[f64],
    points: &[Vector3<f64>],
    degree: usize,
) -> Result<CubicFit, EstimatorError> {
    if degree >= CUBIC_COEFFS {
        return Err(EstimatorError::InvalidEstimatorParameter(format!(
            "polynomial degree must be <= {}, got {degree}",
            CUBIC_COEFFS - 1
        )));
    }
    if params.len() != points.len() {
        return Err(EstimatorError::MismatchedLengths {
            samples: points.len(),
            times: params.len(),
        });
    }
    let n = points.len();
    let n_coeffs = degree + 1;
    if n < n_coeffs {
        return Err(EstimatorError::InsufficientSamples {
            required: n_coeffs,
            found: n,
        });
    }

    let design = DMatrix::from_fn(n, n_coeffs, |i, j| params[i].powi(j as i32));
    let rhs = DMatrix::from_fn(n, 3, |i, j| points[i][j]);

    let svd = design.svd(true, true);
    let max_sv = svd.singular_values.max();
    let cutoff = SVD_EPS * max_sv.max(1.0);
    if !max_sv.is_finite() || svd.rank(cutoff) < n_coeffs {
        return Err(EstimatorError::SingularSystem);
    }
    let solution = svd
        .solve(&rhs, cutoff)
        .map_err(|_| EstimatorError::SingularSystem)?;

    let axis = |col: usize| {
        let mut c = Vector4::zeros();
        for k in 0..n_coeffs {
            c[k] = solution[(k, col)];
        }
        c
    };

    Ok(CubicFit {
        coeffs_x: axis(0),
        coeffs_y: axis(1),
        coeffs_z: axis(2),
    })
}

/// Cubic least-squares fit, see [`fit_polynomial`].
pub fn fit_cubic(params: &[f64], points: &[Vector3<f64>]) -> Result<CubicFit, EstimatorError> {
    fit_polynomial(params, points, CUBIC_COEFFS - 1)
}

/// Fit a cubic against the normalized sample index and materialize the curve.
///
/// The returned curve covers the sampled range `s ∈ [0, 1]` with `curve_points` points.
pub fn fit_cubic_curve(
    points: &[Vector3<f64>],
    curve_points: usize,
) -> Result<(CubicFit, Vec<Vector3<f64>>), EstimatorError> {
    let fit = fit_cubic(&normalized_index(points.len()), points)?;
    Ok((fit, fit.curve_points(0.0, 1.0, curve_points)))
}
