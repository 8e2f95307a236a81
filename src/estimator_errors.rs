use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstimatorError {
    #[error("Not enough samples: {required} required, {found} given")]
    InsufficientSamples { required: usize, found: usize },

    #[error("Samples and timestamps are not index-aligned ({samples} samples, {times} times)")]
    MismatchedLengths { samples: usize, times: usize },

    #[error("Least-squares system is singular; parameter or time values do not discriminate samples")]
    SingularSystem,

    #[error("Trajectory never reaches the target height going forward")]
    NoPhysicalSolution,

    #[error("Fitted curve has no admissible real root at the target height")]
    NoRootInRange,

    #[error("Aberth–Ehrlich method failed to find acceptable complex roots")]
    PolynomialRootFindingFailed,

    #[error("No consensus set reached the minimal size ({best} < {required})")]
    ConsensusFailure { best: usize, required: usize },

    #[error("Invalid impact time: {0}")]
    InvalidImpactTime(f64),

    #[error("Invalid estimator parameter: {0}")]
    InvalidEstimatorParameter(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Error while reading a sample CSV file: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Gaussian noise generation failed: {0:?}")]
    NoiseInjectionError(rand_distr::NormalError),
}

impl From<rand_distr::NormalError> for EstimatorError {
    fn from(err: rand_distr::NormalError) -> Self {
        EstimatorError::NoiseInjectionError(err)
    }
}

impl PartialEq for EstimatorError {
    fn eq(&self, other: &Self) -> bool {
        use EstimatorError::*;
        match (self, other) {
            (
                InsufficientSamples {
                    required: a,
                    found: b,
                },
                InsufficientSamples {
                    required: c,
                    found: d,
                },
            ) => a == c && b == d,
            (
                MismatchedLengths {
                    samples: a,
                    times: b,
                },
                MismatchedLengths {
                    samples: c,
                    times: d,
                },
            ) => a == c && b == d,
            (ConsensusFailure { best: a, required: b }, ConsensusFailure { best: c, required: d }) => {
                a == c && b == d
            }
            (InvalidImpactTime(a), InvalidImpactTime(b)) => a.to_bits() == b.to_bits(),
            (InvalidEstimatorParameter(a), InvalidEstimatorParameter(b)) => a == b,
            (NoiseInjectionError(a), NoiseInjectionError(b)) => a == b,

            // foreign errors are not comparable: equal when same variant
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            (SingularSystem, SingularSystem) => true,
            (NoPhysicalSolution, NoPhysicalSolution) => true,
            (NoRootInRange, NoRootInRange) => true,
            (PolynomialRootFindingFailed, PolynomialRootFindingFailed) => true,

            _ => false,
        }
    }
}
