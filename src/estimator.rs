//! # Impact estimator
//!
//! [`ImpactEstimator`] is the entry point of the crate. It owns the configuration, the
//! current tracking [`Episode`] and the random source of the robust fitter, and runs one of
//! two estimation paths:
//!
//! * **minimal path** (exactly three samples) – a quadratic fitted against the normalized
//!   sample index is solved for the crossing height; there is no impact time.
//! * **general path** – RANSAC against elapsed time rejects outliers, the ballistic model is
//!   fitted on the consensus set, the first crossing of the target plane is solved and the
//!   trajectory up to it is resampled.
//!
//! Every call is synchronous and runs to completion before returning. The estimator is not
//! shared between threads; callers serialize sample ingestion and estimation.
//!
//! ## Example
//!
//! ```rust
//! use hifitime::{Duration, Epoch};
//! use nalgebra::Vector3;
//! use rand::{rngs::StdRng, SeedableRng};
//! use impact_estimator::estimator::ImpactEstimator;
//! use impact_estimator::impact_estimation::EstimatorParams;
//!
//! let params = EstimatorParams::builder().min_samples(5).build().unwrap();
//! let mut estimator = ImpactEstimator::with_rng(params, StdRng::seed_from_u64(42)).unwrap();
//!
//! let t0 = Epoch::from_gregorian_utc_hms(2024, 1, 1, 0, 0, 0);
//! let mut last = None;
//! for i in 0..5 {
//!     let t = 0.05 * i as f64;
//!     let p = Vector3::new(2.0 - 3.0 * t, 0.0, 1.0 + 2.0 * t - 4.9 * t * t);
//!     last = estimator.observe(p, t0 + Duration::from_seconds(t));
//! }
//! let estimation = last.expect("fifth sample triggers an estimate");
//! assert!(estimation.result.success);
//! ```
use hifitime::Epoch;
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::constants::{MINIMAL_PATH_SAMPLES, RANSAC_MIN_SUBSET};
use crate::estimator_errors::EstimatorError;
use crate::impact_estimation::ballistic::fit_ballistic_trajectory;
use crate::impact_estimation::height_root::find_xy_at_target_height;
use crate::impact_estimation::impact::calculate_impact_point;
use crate::impact_estimation::polynomial_fit::{fit_polynomial, normalized_index};
use crate::impact_estimation::prediction_result::{Estimation, PredictionKind, PredictionResult};
use crate::impact_estimation::ransac::fit_cubic_ransac;
use crate::impact_estimation::resample::generate_trajectory_points;
use crate::impact_estimation::EstimatorParams;
use crate::observations::episode::{Admission, Episode};
use crate::observations::SampleSequence;

#[derive(Debug, Clone)]
pub struct ImpactEstimator<R: Rng = StdRng> {
    params: EstimatorParams,
    episode: Episode,
    rng: R,
}

impl ImpactEstimator<StdRng> {
    /// Build an estimator whose robust fitter draws from an OS-seeded [`StdRng`].
    pub fn new(params: EstimatorParams) -> Result<Self, EstimatorError> {
        Self::with_rng(params, StdRng::from_os_rng())
    }
}

impl<R: Rng> ImpactEstimator<R> {
    /// Build an estimator with an explicit random source (seed it for reproducible runs).
    ///
    /// Return
    /// ----------
    /// * `Err(EstimatorError::InvalidEstimatorParameter)` if `params` fail validation.
    pub fn with_rng(params: EstimatorParams, rng: R) -> Result<Self, EstimatorError> {
        params.validate()?;
        Ok(ImpactEstimator {
            episode: Episode::new(params.gap_timeout),
            params,
            rng,
        })
    }

    pub fn params(&self) -> &EstimatorParams {
        &self.params
    }

    pub fn episode(&self) -> &Episode {
        &self.episode
    }

    pub fn reset_episode(&mut self) {
        self.episode.reset();
    }

    /// Minimal path: estimate the crossing from exactly three raw samples.
    ///
    /// A cubic is under-determined by three points, so the highest supported degree
    /// (a quadratic, cubic term zero) is fitted against the normalized sample index.
    /// The crossing is expressed in the target frame; the returned path follows the fitted
    /// curve from the first sample to the crossing (or to the last sample if it comes first).
    pub fn process_three_points(
        &self,
        points: &[Vector3<f64>],
    ) -> Result<Estimation, EstimatorError> {
        if points.len() != MINIMAL_PATH_SAMPLES {
            return Err(EstimatorError::InsufficientSamples {
                required: MINIMAL_PATH_SAMPLES,
                found: points.len(),
            });
        }
        let s = normalized_index(points.len());
        let fit = fit_polynomial(&s, points, MINIMAL_PATH_SAMPLES - 1)?;
        let mut crossing =
            find_xy_at_target_height(&fit, self.params.crossing_height(), &s, &self.params)?;

        let path = fit.curve_points(0.0, crossing.param.max(1.0), self.params.curve_points);
        crossing.x -= self.params.lidar_to_target.x;
        crossing.y -= self.params.lidar_to_target.y;

        debug!(param = crossing.param, x = crossing.x, y = crossing.y, "minimal-path crossing");
        Ok(Estimation {
            kind: PredictionKind::Minimal,
            result: PredictionResult::from_crossing(&crossing),
            path,
            inliers: Vec::new(),
        })
    }

    /// General path: robust cleaning, ballistic fit, impact and resampled trajectory.
    pub fn process_points(&mut self, samples: &SampleSequence) -> Result<Estimation, EstimatorError> {
        let n = samples.len();
        let inliers: Vec<usize> = if self.params.use_ransac && n >= RANSAC_MIN_SUBSET {
            fit_cubic_ransac(
                samples.times(),
                samples.points(),
                self.params.ransac_threshold,
                self.params.ransac_max_iterations,
                &mut self.rng,
            )?
            .inliers
        } else {
            (0..n).collect()
        };
        let cleaned = samples.select(&inliers);

        let ballistic =
            fit_ballistic_trajectory(cleaned.points(), cleaned.times(), self.params.gravity)?;
        let impact = calculate_impact_point(
            &ballistic,
            &self.params.lidar_to_target,
            self.params.target_height,
        )?;
        let path =
            generate_trajectory_points(&ballistic, impact.time, self.params.trajectory_points)?;

        info!(
            impact_time = impact.time,
            x = impact.x,
            y = impact.y,
            inliers = inliers.len(),
            samples = n,
            "impact predicted"
        );
        Ok(Estimation {
            kind: PredictionKind::Ballistic,
            result: PredictionResult::from_impact(&ballistic, &impact),
            path,
            inliers,
        })
    }

    /// Run the estimation path matching the number of samples and report typed failures.
    pub fn try_estimate(&mut self, samples: &SampleSequence) -> Result<Estimation, EstimatorError> {
        match samples.len() {
            MINIMAL_PATH_SAMPLES => self.process_three_points(samples.points()),
            n if n < 2 => Err(EstimatorError::InsufficientSamples {
                required: 2,
                found: n,
            }),
            _ => self.process_points(samples),
        }
    }

    /// Run one estimation cycle; failures are folded into `success = false`.
    pub fn estimate(&mut self, samples: &SampleSequence) -> Estimation {
        let kind = if samples.len() == MINIMAL_PATH_SAMPLES {
            PredictionKind::Minimal
        } else {
            PredictionKind::Ballistic
        };
        self.try_estimate(samples).unwrap_or_else(|err| {
            warn!(samples = samples.len(), error = %err, "impact estimation failed");
            Estimation::failed(kind)
        })
    }

    /// Feed one accepted observation arriving at `now`.
    ///
    /// When the episode reaches `min_samples`, an estimation cycle runs, the episode is reset
    /// and the cooldown starts; the cycle output is returned whether it succeeded or not.
    pub fn observe(&mut self, position: Vector3<f64>, now: Epoch) -> Option<Estimation> {
        match self.episode.offer(position, now) {
            Admission::Accepted(len) if len >= self.params.min_samples => {
                let samples = self.episode.samples().clone();
                let estimation = self.estimate(&samples);
                self.episode.reset();
                self.episode.begin_cooldown(now, self.params.cooldown);
                Some(estimation)
            }
            Admission::GapReset => {
                warn!(gap_timeout = self.params.gap_timeout, "sample gap too long, episode reset");
                None
            }
            Admission::Accepted(_) | Admission::CoolingDown => None,
        }
    }
}
