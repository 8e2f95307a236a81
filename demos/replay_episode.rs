use std::env;
use std::fs::File;

use hifitime::{Duration, Epoch};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use impact_estimator::impact_estimation::ballistic::BallisticParameters;
use impact_estimator::impact_estimation::{EstimatorParams, FrameOffset};
use impact_estimator::observations::synthetic::{noisy_ballistic_samples, uniform_times};
use impact_estimator::observations::{read_samples_csv, SampleSequence};
use impact_estimator::{EstimatorError, ImpactEstimator};

/// Load the episode to replay: a `t,x,y,z` CSV if a path is given, otherwise a noisy
/// synthetic throw towards the sensor.
fn load_episode(path: Option<String>) -> Result<SampleSequence, EstimatorError> {
    match path {
        Some(path) => read_samples_csv(File::open(path)?),
        None => {
            let throw = BallisticParameters::new(
                Vector3::new(2.5, 0.2, 1.1),
                Vector3::new(-4.0, -0.3, 2.8),
                9.8,
            );
            let mut rng = StdRng::seed_from_u64(2024);
            noisy_ballistic_samples(&throw, &uniform_times(12, 0.02), 0.004, &mut rng)
        }
    }
}

/// Replay one recorded or synthetic episode through [`ImpactEstimator::observe`], as if the
/// samples were arriving live from the tracker.
///
/// Run with `RUST_LOG=debug` to see the per-cycle fit details.
fn main() -> Result<(), EstimatorError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let samples = load_episode(env::args().nth(1))?;

    let params = EstimatorParams::builder()
        .min_samples(samples.len().max(2))
        .lidar_to_target(FrameOffset::new(0.0, 0.0, -0.2))
        .target_height(0.8)
        .build()?;
    println!("{params:#}");

    let mut estimator = ImpactEstimator::with_rng(params, StdRng::seed_from_u64(42))?;
    let t0 = Epoch::from_gregorian_utc_hms(2024, 1, 1, 0, 0, 0);

    for sample in samples.iter() {
        let now = t0 + Duration::from_seconds(sample.time);
        if let Some(estimation) = estimator.observe(sample.position, now) {
            println!("{:?} path, {} inliers", estimation.kind, estimation.inliers.len());
            println!("{}", estimation.result);
            if let Some(last) = estimation.path.last() {
                println!("path ends at ({:.3}, {:.3}, {:.3})", last.x, last.y, last.z);
            }
        }
    }
    Ok(())
}
