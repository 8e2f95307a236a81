//! # Prediction result
//!
//! [`PredictionResult`] is the flat value produced once per estimation cycle: a success flag,
//! the impact time and target-frame position, and the ballistic state it was derived from.
//! When `success` is false every numeric field is zero.
//!
//! [`Estimation`] bundles that value with the path materialized for consumers and the
//! [`PredictionKind`] of the estimation path that produced it.
//!
//! ```rust
//! use impact_estimator::impact_estimation::prediction_result::PredictionResult;
//!
//! let failed = PredictionResult::failed();
//! assert!(!failed.success);
//! assert_eq!(failed.impact_time, 0.0);
//! ```
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::impact_estimation::ballistic::BallisticParameters;
use crate::impact_estimation::height_root::TargetCrossing;
use crate::impact_estimation::impact::ImpactPoint;
use nalgebra::Vector3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub success: bool,
    pub impact_time: f64,
    pub x_impact: f64,
    pub y_impact: f64,
    pub x0: f64,
    pub y0: f64,
    pub z0: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
}

impl PredictionResult {
    pub fn failed() -> Self {
        Self::default()
    }

    /// Successful result of the general (ballistic) path.
    pub fn from_impact(ballistic: &BallisticParameters, impact: &ImpactPoint) -> Self {
        PredictionResult {
            success: true,
            impact_time: impact.time,
            x_impact: impact.x,
            y_impact: impact.y,
            x0: ballistic.position.x,
            y0: ballistic.position.y,
            z0: ballistic.position.z,
            vx: ballistic.velocity.x,
            vy: ballistic.velocity.y,
            vz: ballistic.velocity.z,
        }
    }

    /// Successful result of the minimal path; it carries no impact time nor ballistic state.
    pub fn from_crossing(crossing: &TargetCrossing) -> Self {
        PredictionResult {
            success: true,
            x_impact: crossing.x,
            y_impact: crossing.y,
            ..Self::default()
        }
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.success {
            return write!(f, "Prediction failed");
        }
        writeln!(
            f,
            "Impact: t = {:.3} s at ({:.3}, {:.3})",
            self.impact_time, self.x_impact, self.y_impact
        )?;
        write!(
            f,
            "State at t=0: p = ({:.3}, {:.3}, {:.3}), v = ({:.3}, {:.3}, {:.3})",
            self.x0, self.y0, self.z0, self.vx, self.vy, self.vz
        )
    }
}

/// Which estimation path produced an [`Estimation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionKind {
    /// Three samples: polynomial fit against the sample index, no impact time.
    Minimal,
    /// Ballistic fit against elapsed time, optionally pre-cleaned by RANSAC.
    Ballistic,
}

/// Output of one estimation cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimation {
    pub kind: PredictionKind,
    pub result: PredictionResult,
    /// Resampled ballistic path (general path) or fitted curve (minimal path); empty on failure.
    pub path: Vec<Vector3<f64>>,
    /// Indices of the samples the ballistic model was fitted on (general path only).
    pub inliers: Vec<usize>,
}

impl Estimation {
    pub fn failed(kind: PredictionKind) -> Self {
        Estimation {
            kind,
            result: PredictionResult::failed(),
            path: Vec::new(),
            inliers: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.success
    }
}
