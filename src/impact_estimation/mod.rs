//! # Impact estimation parameters
//!
//! This module defines the [`EstimatorParams`] configuration struct and its builder, which
//! control how the estimation engine fits trajectories, rejects outliers and computes the
//! crossing of the target height.
//!
//! ## Pipeline overview
//!
//! 1. **Minimal path** (exactly three samples)
//!    A low-degree polynomial is fitted against the normalized sample index
//!    ([`polynomial_fit`]), and solved for the target height ([`height_root`]).
//!
//! 2. **General path**
//!    Outliers are rejected by a RANSAC cubic fit against elapsed time ([`ransac`], tuned by
//!    `ransac_threshold` / `ransac_max_iterations`), then the closed-form ballistic model is
//!    fitted on the consensus set ([`ballistic`]).
//!
//! 3. **Impact**
//!    The ballistic height equation is solved for the first crossing of the target plane and
//!    the horizontal position is expressed in the target frame ([`impact`]). The path up to
//!    the crossing is resampled for consumers ([`resample`]).
//!
//! ## Frames
//!
//! `lidar_to_target` is the position of the target-frame origin expressed in the sensor frame,
//! so a sensor point `p` maps to `p − lidar_to_target` in the target frame. `target_height`
//! is measured in the target frame.
//!
//! ## Example
//!
//! ```rust
//! use impact_estimator::impact_estimation::{EstimatorParams, FrameOffset};
//!
//! let params = EstimatorParams::builder()
//!     .min_samples(6)
//!     .ransac_threshold(0.05)
//!     .ransac_max_iterations(500)
//!     .lidar_to_target(FrameOffset::new(0.2, 0.0, -0.4))
//!     .build()
//!     .unwrap();
//! assert_eq!(params.min_samples, 6);
//! ```
use std::cmp::Ordering::{Equal, Greater};
use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{
    Meter, Second, DEFAULT_CURVE_POINTS, DEFAULT_RANSAC_MAX_ITERATIONS, DEFAULT_RANSAC_THRESHOLD,
    DEFAULT_TRAJECTORY_POINTS, STANDARD_GRAVITY,
};
use crate::estimator_errors::EstimatorError;

pub mod ballistic;
pub mod height_root;
pub mod impact;
pub mod polynomial_fit;
pub mod prediction_result;
pub mod ransac;
pub mod resample;

/// Translation between the sensor frame and the target frame.
///
/// Holds the target-frame origin expressed in sensor coordinates (meters).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameOffset {
    pub x: Meter,
    pub y: Meter,
    pub z: Meter,
}

impl FrameOffset {
    pub fn new(x: Meter, y: Meter, z: Meter) -> Self {
        FrameOffset { x, y, z }
    }

    pub fn as_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

/// Configuration consumed by the estimation engine.
///
/// Fields
/// -----------------
/// **Triggering / episodes**
/// * `min_samples` – samples required before an episode is estimated; `3` selects the
///   minimal polynomial path.
/// * `gap_timeout` – maximum gap (s) between two samples of the same episode.
/// * `cooldown` – time (s) during which samples are ignored after a prediction cycle.
///
/// **Robust fitting**
/// * `use_ransac` – pre-clean the general path with the robust cubic fitter.
/// * `ransac_threshold` – inlier distance (position units).
/// * `ransac_max_iterations` – number of random minimal subsets drawn.
///
/// **Geometry / physics**
/// * `target_height` – height of the crossing plane in the target frame.
/// * `lidar_to_target` – see [`FrameOffset`].
/// * `gravity` – vertical deceleration of the ballistic model (m/s²).
///
/// **Outputs / numerics**
/// * `curve_points`, `trajectory_points` – size of the materialized paths.
/// * `root_imag_eps`, `aberth_max_iter`, `aberth_eps` – cubic root finder controls.
///
/// Defaults
/// -----------------
/// * `min_samples`: 4, `gap_timeout`: 0.3 s, `cooldown`: 1.0 s
/// * `use_ransac`: true, `ransac_threshold`: 0.1, `ransac_max_iterations`: 1000
/// * `target_height`: 0.0, `lidar_to_target`: (0, 0, 0), `gravity`: 9.8
/// * `curve_points`: 100, `trajectory_points`: 50
/// * `root_imag_eps`: 1e-9, `aberth_max_iter`: 100, `aberth_eps`: 1e-12
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorParams {
    pub min_samples: usize,
    pub gap_timeout: Second,
    pub cooldown: Second,

    pub use_ransac: bool,
    pub ransac_threshold: f64,
    pub ransac_max_iterations: usize,

    pub target_height: Meter,
    pub lidar_to_target: FrameOffset,
    pub gravity: f64,

    pub curve_points: usize,
    pub trajectory_points: usize,
    /// Maximum imaginary part of a cubic root still treated as real.
    pub root_imag_eps: f64,
    pub aberth_max_iter: u32,
    pub aberth_eps: f64,
}

impl EstimatorParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> EstimatorParamsBuilder {
        EstimatorParamsBuilder::new()
    }

    /// Height of the crossing plane expressed in the sensor frame.
    pub fn crossing_height(&self) -> Meter {
        self.lidar_to_target.z + self.target_height
    }
}

impl Default for EstimatorParams {
    fn default() -> Self {
        EstimatorParams {
            min_samples: 4,
            gap_timeout: 0.3,
            cooldown: 1.0,

            use_ransac: true,
            ransac_threshold: DEFAULT_RANSAC_THRESHOLD,
            ransac_max_iterations: DEFAULT_RANSAC_MAX_ITERATIONS,

            target_height: 0.0,
            lidar_to_target: FrameOffset::default(),
            gravity: STANDARD_GRAVITY,

            curve_points: DEFAULT_CURVE_POINTS,
            trajectory_points: DEFAULT_TRAJECTORY_POINTS,
            root_imag_eps: 1e-9,
            aberth_max_iter: 100,
            aberth_eps: 1e-12,
        }
    }
}

/// Builder for [`EstimatorParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct EstimatorParamsBuilder {
    params: EstimatorParams,
}

impl EstimatorParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: EstimatorParams::default(),
        }
    }

    pub fn min_samples(mut self, v: usize) -> Self {
        self.params.min_samples = v;
        self
    }
    pub fn gap_timeout(mut self, v: Second) -> Self {
        self.params.gap_timeout = v;
        self
    }
    pub fn cooldown(mut self, v: Second) -> Self {
        self.params.cooldown = v;
        self
    }

    pub fn use_ransac(mut self, v: bool) -> Self {
        self.params.use_ransac = v;
        self
    }
    pub fn ransac_threshold(mut self, v: f64) -> Self {
        self.params.ransac_threshold = v;
        self
    }
    pub fn ransac_max_iterations(mut self, v: usize) -> Self {
        self.params.ransac_max_iterations = v;
        self
    }

    pub fn target_height(mut self, v: Meter) -> Self {
        self.params.target_height = v;
        self
    }
    pub fn lidar_to_target(mut self, v: FrameOffset) -> Self {
        self.params.lidar_to_target = v;
        self
    }
    pub fn gravity(mut self, v: f64) -> Self {
        self.params.gravity = v;
        self
    }

    pub fn curve_points(mut self, v: usize) -> Self {
        self.params.curve_points = v;
        self
    }
    pub fn trajectory_points(mut self, v: usize) -> Self {
        self.params.trajectory_points = v;
        self
    }
    pub fn root_imag_eps(mut self, v: f64) -> Self {
        self.params.root_imag_eps = v;
        self
    }
    pub fn aberth_max_iter(mut self, v: u32) -> Self {
        self.params.aberth_max_iter = v;
        self
    }
    pub fn aberth_eps(mut self, v: f64) -> Self {
        self.params.aberth_eps = v;
        self
    }

    // ---- Numeric helpers for PartialOrd (handle NaN as invalid) ----

    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    #[inline]
    fn ge0(x: f64) -> bool {
        matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
    }

    pub fn build(self) -> Result<EstimatorParams, EstimatorError> {
        self.params.validate()?;
        Ok(self.params)
    }
}

impl EstimatorParams {
    /// Check every field against its admissible domain.
    ///
    /// Deserialized parameters bypass the builder, so the estimator calls this again
    /// at construction.
    pub fn validate(&self) -> Result<(), EstimatorError> {
        use EstimatorParamsBuilder as B;
        let invalid = |msg: &str| Err(EstimatorError::InvalidEstimatorParameter(msg.into()));

        if self.min_samples < 2 {
            return invalid("min_samples must be >= 2");
        }
        if !B::ge0(self.gap_timeout) || !B::ge0(self.cooldown) {
            return invalid("gap_timeout and cooldown must be non-negative");
        }
        if !B::gt0(self.ransac_threshold) {
            return invalid("ransac_threshold must be > 0");
        }
        if self.ransac_max_iterations == 0 {
            return invalid("ransac_max_iterations must be >= 1");
        }
        if !self.target_height.is_finite() {
            return invalid("target_height must be finite");
        }
        let offset = self.lidar_to_target;
        if !(offset.x.is_finite() && offset.y.is_finite() && offset.z.is_finite()) {
            return invalid("lidar_to_target must be finite");
        }
        if !B::gt0(self.gravity) || !self.gravity.is_finite() {
            return invalid("gravity must be a finite value > 0");
        }
        if self.curve_points < 2 || self.trajectory_points < 2 {
            return invalid("curve_points and trajectory_points must be >= 2");
        }
        if !B::ge0(self.root_imag_eps) {
            return invalid("root_imag_eps must be >= 0");
        }
        if self.aberth_max_iter == 0 {
            return invalid("aberth_max_iter must be >= 1");
        }
        if !B::gt0(self.aberth_eps) {
            return invalid("aberth_eps must be > 0");
        }
        Ok(())
    }
}

impl fmt::Display for EstimatorParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            const PARAM_COL: usize = 44;
            writeln!(f, "Impact Estimation Parameters")?;
            writeln!(f, "----------------------------")?;

            macro_rules! line {
                ($fmt:expr, $val:expr, $comment:expr) => {{
                    let s = format!($fmt, $val);
                    let pad = if s.len() < PARAM_COL {
                        " ".repeat(PARAM_COL - s.len())
                    } else {
                        " ".to_string()
                    };
                    writeln!(f, "  {}{}# {}", s, pad, $comment)
                }};
            }

            writeln!(f, "[Episodes]")?;
            line!("min_samples           = {}", self.min_samples, "Samples before estimating")?;
            line!("gap_timeout           = {:.3} s", self.gap_timeout, "Max gap inside an episode")?;
            line!("cooldown              = {:.3} s", self.cooldown, "Pause after a prediction")?;

            writeln!(f, "\n[Robust fitting]")?;
            line!("use_ransac            = {}", self.use_ransac, "Reject outliers first")?;
            line!("ransac_threshold      = {:.3}", self.ransac_threshold, "Inlier distance")?;
            line!("ransac_max_iterations = {}", self.ransac_max_iterations, "Random subsets drawn")?;

            writeln!(f, "\n[Geometry / physics]")?;
            line!("target_height         = {:.3} m", self.target_height, "Crossing height (target frame)")?;
            line!(
                "lidar_to_target       = {}",
                format!(
                    "({:.3}, {:.3}, {:.3})",
                    self.lidar_to_target.x, self.lidar_to_target.y, self.lidar_to_target.z
                ),
                "Target origin in sensor frame"
            )?;
            line!("gravity               = {:.3} m/s²", self.gravity, "Vertical deceleration")?;

            writeln!(f, "\n[Outputs / numerics]")?;
            line!("curve_points          = {}", self.curve_points, "Points along a fitted cubic")?;
            line!("trajectory_points     = {}", self.trajectory_points, "Points along the ballistic path")?;
            line!("root_imag_eps         = {:.1e}", self.root_imag_eps, "Max imaginary part of a real root")?;
            line!("aberth_max_iter       = {}", self.aberth_max_iter, "Max iterations for Aberth solver")?;
            line!("aberth_eps            = {:.1e}", self.aberth_eps, "Convergence tolerance for Aberth")?;

            Ok(())
        } else {
            write!(
                f,
                "EstimatorParams(min_samples={}, ransac={}[thr={:.3}, it={}], target_height={:.3}m, offset=({:.3},{:.3},{:.3}), g={:.3})",
                self.min_samples,
                self.use_ransac,
                self.ransac_threshold,
                self.ransac_max_iterations,
                self.target_height,
                self.lidar_to_target.x,
                self.lidar_to_target.y,
                self.lidar_to_target.z,
                self.gravity,
            )
        }
    }
}

#[cfg(test)]
mod estimator_params_test {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = EstimatorParams::builder().build().unwrap();
        assert_eq!(params, EstimatorParams::default());
        assert_eq!(params.ransac_threshold, 0.1);
        assert_eq!(params.ransac_max_iterations, 1000);
        assert_eq!(params.gravity, STANDARD_GRAVITY);
    }

    #[test]
    fn test_invalid_threshold() {
        let err = EstimatorParams::builder()
            .ransac_threshold(0.0)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            EstimatorError::InvalidEstimatorParameter("ransac_threshold must be > 0".into())
        );
    }

    #[test]
    fn test_nan_gravity_rejected() {
        let res = EstimatorParams::builder().gravity(f64::NAN).build();
        assert!(res.is_err());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let res = EstimatorParams::builder().ransac_max_iterations(0).build();
        assert!(res.is_err());
    }

    #[test]
    fn test_crossing_height_in_sensor_frame() {
        let params = EstimatorParams::builder()
            .target_height(0.5)
            .lidar_to_target(FrameOffset::new(1.0, 2.0, -0.3))
            .build()
            .unwrap();
        assert!((params.crossing_height() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_display_alternate_lists_sections() {
        let s = format!("{:#}", EstimatorParams::default());
        assert!(s.contains("[Robust fitting]"));
        assert!(s.contains("ransac_max_iterations = 1000"));
        let compact = format!("{}", EstimatorParams::default());
        assert!(compact.starts_with("EstimatorParams("));
    }
}
