pub mod constants;
pub mod estimator;
pub mod estimator_errors;
pub mod impact_estimation;
pub mod observations;

pub use estimator::ImpactEstimator;
pub use estimator_errors::EstimatorError;
pub use impact_estimation::prediction_result::{Estimation, PredictionKind, PredictionResult};
pub use impact_estimation::{EstimatorParams, FrameOffset};
