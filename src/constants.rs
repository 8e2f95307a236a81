//! # Constants and type definitions for the impact estimator
//!
//! This module centralizes the **physical constants**, **numerical tolerances** and
//! **default tunables** used throughout the crate, together with a few unit aliases
//! that make signatures self-describing.
//!
//! ## Overview
//!
//! - Gravity used by the ballistic motion model
//! - Tolerances for degenerate least-squares systems and root promotion
//! - Default values consumed by [`EstimatorParams`](crate::impact_estimation::EstimatorParams)
//! - Unit aliases (`Meter`, `Second`)

// -------------------------------------------------------------------------------------------------
// Physical constants
// -------------------------------------------------------------------------------------------------

/// Vertical deceleration of the ballistic model (m/s²).
///
/// The motion model assumes `z(t) = z0 + vz·t − ½·g·t²`; this is the `g` used unless
/// [`EstimatorParams::gravity`](crate::impact_estimation::EstimatorParams::gravity) overrides it.
pub const STANDARD_GRAVITY: f64 = 9.8;

// -------------------------------------------------------------------------------------------------
// Numerical tolerances
// -------------------------------------------------------------------------------------------------

/// Numerical epsilon used for floating-point comparisons
pub const EPS: f64 = 1e-9;

/// Relative singular value cutoff for the polynomial design matrix
pub const SVD_EPS: f64 = 1e-12;

/// Minimum spread (sum of squared deviations, s²) of the time regressor for the ballistic solve
pub const MIN_TIME_SPREAD: f64 = 1e-12;

// -------------------------------------------------------------------------------------------------
// Default tunables
// -------------------------------------------------------------------------------------------------

/// Number of polynomial coefficients of a cubic (degree + 1)
pub const CUBIC_COEFFS: usize = 4;

/// Minimal subset size drawn by the robust fitter (a cubic needs four points)
pub const RANSAC_MIN_SUBSET: usize = CUBIC_COEFFS;

/// Default inlier distance of the robust fitter (position units)
pub const DEFAULT_RANSAC_THRESHOLD: f64 = 0.1;

/// Default number of iterations of the robust fitter
pub const DEFAULT_RANSAC_MAX_ITERATIONS: usize = 1000;

/// Sample count of the minimal (polynomial-only) estimation path
pub const MINIMAL_PATH_SAMPLES: usize = 3;

/// Default number of points materialized along a fitted cubic
pub const DEFAULT_CURVE_POINTS: usize = 100;

/// Default number of points materialized along a ballistic trajectory
pub const DEFAULT_TRAJECTORY_POINTS: usize = 50;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Distance in meters
pub type Meter = f64;
/// Duration in seconds, relative to an episode start
pub type Second = f64;
