//! # Target-height root finder
//!
//! Solves a fitted cubic for the parameter value at which the height axis reaches a target
//! height, then reads the horizontal position off the x and y cubics at that parameter.
//!
//! The height cubic `z(s) − h = 0` is solved with the Aberth–Ehrlich method; nearly-real complex
//! roots are promoted to real and polished by a few Newton steps. Fits whose cubic term
//! vanishes (e.g. the quadratic fit of the minimal path) are solved in closed form.
//!
//! ## Root selection
//!
//! Only non-negative real roots are admissible. Among them, the root closest to the observed
//! parameter range wins (distance zero inside the range); ties go to the smallest root, i.e.
//! the first crossing.
use aberth::{aberth, StopReason};
use itertools::{Itertools, MinMaxResult};
use nalgebra::Vector4;
use smallvec::SmallVec;

use crate::constants::{Meter, EPS};
use crate::estimator_errors::EstimatorError;
use crate::impact_estimation::polynomial_fit::CubicFit;
use crate::impact_estimation::EstimatorParams;

/// Point where a fitted curve crosses the target height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetCrossing {
    /// Fit parameter of the crossing.
    pub param: f64,
    pub x: Meter,
    pub y: Meter,
}

pub(crate) type RealRoots = SmallVec<[f64; 3]>;

#[inline]
fn eval_poly(c: &Vector4<f64>, s: f64) -> f64 {
    ((c[3] * s + c[2]) * s + c[1]) * s + c[0]
}

#[inline]
fn eval_deriv(c: &Vector4<f64>, s: f64) -> f64 {
    (3.0 * c[3] * s + 2.0 * c[2]) * s + c[1]
}

fn polish(c: &Vector4<f64>, mut s: f64) -> f64 {
    for _ in 0..3 {
        let d = eval_deriv(c, s);
        if d == 0.0 {
            break;
        }
        let step = eval_poly(c, s) / d;
        if !step.is_finite() {
            break;
        }
        s -= step;
    }
    s
}

/// Real roots of `a·s² + b·s + c`, degrading to the linear case when `a` vanishes.
pub(crate) fn quadratic_roots(a: f64, b: f64, c: f64, scale: f64) -> RealRoots {
    let mut roots = RealRoots::new();
    if a.abs() <= EPS * scale {
        if b.abs() > EPS * scale {
            roots.push(-c / b);
        }
        return roots;
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return roots;
    }
    // q-form avoids cancellation between -b and sqrt(disc)
    let q = -0.5 * (b + b.signum() * disc.sqrt());
    if q == 0.0 {
        roots.push(0.0);
        return roots;
    }
    roots.push(q / a);
    roots.push(c / q);
    roots
}

/// Real roots of the cubic with ascending coefficients `c`.
///
/// Return
/// ----------
/// * The real roots, in no particular order.
/// * `Err(EstimatorError::PolynomialRootFindingFailed)` if the Aberth iteration failed.
pub fn real_cubic_roots(
    c: &Vector4<f64>,
    params: &EstimatorParams,
) -> Result<RealRoots, EstimatorError> {
    let scale = c.amax();
    if scale == 0.0 {
        return Ok(RealRoots::new());
    }
    if c[3].abs() <= EPS * scale {
        return Ok(quadratic_roots(c[2], c[1], c[0], scale));
    }

    let poly = [c[0], c[1], c[2], c[3]];
    let roots = aberth(&poly, params.aberth_max_iter, params.aberth_eps);
    match roots.stop_reason {
        StopReason::Converged(_) | StopReason::MaxIteration(_) => {
            let mut real = RealRoots::new();
            for z in roots.iter() {
                if z.im.abs() > params.root_imag_eps || !z.re.is_finite() {
                    continue;
                }
                let s = polish(c, z.re);
                let magnitude = c.iter().zip(0..).map(|(ci, k)| ci.abs() * s.abs().powi(k)).sum::<f64>();
                if eval_poly(c, s).abs() <= 1e-8 * magnitude.max(EPS) {
                    real.push(s);
                }
            }
            Ok(real)
        }
        StopReason::Failed(_) => Err(EstimatorError::PolynomialRootFindingFailed),
    }
}

fn distance_to_range(s: f64, lo: f64, hi: f64) -> f64 {
    if s < lo {
        lo - s
    } else if s > hi {
        s - hi
    } else {
        0.0
    }
}

/// Pick the admissible root: non-negative, nearest to `[lo, hi]`, smallest on ties.
pub(crate) fn select_root(roots: &[f64], lo: f64, hi: f64) -> Option<f64> {
    roots
        .iter()
        .copied()
        .filter(|s| s.is_finite() && *s >= -EPS)
        .map(|s| s.max(0.0))
        .min_by(|a, b| {
            distance_to_range(*a, lo, hi)
                .total_cmp(&distance_to_range(*b, lo, hi))
                .then(a.total_cmp(b))
        })
}

/// Solve a fitted cubic for the target height and evaluate the horizontal position there.
///
/// Arguments
/// -----------------
/// * `fit`: coefficients from the polynomial or robust fitter.
/// * `target_height`: height to cross, in the frame of the fitted points.
/// * `observed`: fit parameters of the samples the curve was fitted on (defines the range).
/// * `params`: root finder controls (`aberth_max_iter`, `aberth_eps`, `root_imag_eps`).
///
/// Return
/// ----------
/// * The [`TargetCrossing`] at the selected root.
/// * `Err(EstimatorError::NoRootInRange)` if the height cubic has no admissible real root.
pub fn find_xy_at_target_height(
    fit: &CubicFit,
    target_height: Meter,
    observed: &[f64],
    params: &EstimatorParams,
) -> Result<TargetCrossing, EstimatorError> {
    let (lo, hi) = match observed.iter().copied().minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => (0.0, 0.0),
        MinMaxResult::OneElement(s) => (s, s),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };

    let mut shifted = fit.coeffs_z;
    shifted[0] -= target_height;

    let roots = real_cubic_roots(&shifted, params)?;
    let param = select_root(&roots, lo, hi).ok_or(EstimatorError::NoRootInRange)?;
    let point = fit.evaluate(param);

    Ok(TargetCrossing {
        param,
        x: point.x,
        y: point.y,
    })
}
