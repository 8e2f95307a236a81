//! # Observations
//!
//! Timestamped 3-D position samples of a single tracked projectile and the containers that
//! hold them while a tracking episode is in progress.
//!
//! ## Contents
//!
//! * [`Sample`] – one position with its time relative to the episode start.
//! * [`SampleSequence`] – the append-only, index-aligned pair of position and time vectors.
//! * [`episode_clock::EpisodeClock`] – the zero-time reference of an episode.
//! * [`episode::Episode`] – a sample sequence and its clock, reset together.
//! * [`read_samples_csv`] – replay a recorded episode (`t,x,y,z` columns).
//! * [`synthetic`] – generate samples from a known ballistic model, optionally noisy.
use std::io::Read;

use nalgebra::Vector3;
use serde::Deserialize;

use crate::constants::Second;
use crate::estimator_errors::EstimatorError;

pub mod episode;
pub mod episode_clock;
pub mod synthetic;

/// One accepted observation: a position in the sensor frame and its elapsed episode time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub position: Vector3<f64>,
    pub time: Second,
}

impl Sample {
    pub fn new(position: Vector3<f64>, time: Second) -> Self {
        Sample { position, time }
    }
}

/// Ordered, append-only positions with their elapsed times.
///
/// The two vectors always have the same length and are index-aligned: `times[i]` is the
/// elapsed time at which `points[i]` was observed. The only mutations are [`SampleSequence::push`]
/// and [`SampleSequence::clear`], both of which keep that invariant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSequence {
    points: Vec<Vector3<f64>>,
    times: Vec<Second>,
}

impl SampleSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sequence from separate position and time vectors.
    ///
    /// Return
    /// ----------
    /// * `Err(EstimatorError::MismatchedLengths)` if the two vectors differ in length.
    pub fn from_parts(points: Vec<Vector3<f64>>, times: Vec<Second>) -> Result<Self, EstimatorError> {
        if points.len() != times.len() {
            return Err(EstimatorError::MismatchedLengths {
                samples: points.len(),
                times: times.len(),
            });
        }
        Ok(SampleSequence { points, times })
    }

    pub fn push(&mut self, sample: Sample) {
        self.points.push(sample.position);
        self.times.push(sample.time);
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.times.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Vector3<f64>] {
        &self.points
    }

    pub fn times(&self) -> &[Second] {
        &self.times
    }

    pub fn get(&self, idx: usize) -> Option<Sample> {
        Some(Sample::new(*self.points.get(idx)?, *self.times.get(idx)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        self.points
            .iter()
            .zip(self.times.iter())
            .map(|(p, t)| Sample::new(*p, *t))
    }

    /// Keep only the samples at the given indices, in the order given.
    pub fn select(&self, indices: &[usize]) -> SampleSequence {
        SampleSequence {
            points: indices.iter().map(|&i| self.points[i]).collect(),
            times: indices.iter().map(|&i| self.times[i]).collect(),
        }
    }
}

impl FromIterator<Sample> for SampleSequence {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        let mut seq = SampleSequence::new();
        for sample in iter {
            seq.push(sample);
        }
        seq
    }
}

#[derive(Debug, Deserialize)]
struct SampleRecord {
    t: f64,
    x: f64,
    y: f64,
    z: f64,
}

/// Read a recorded episode from CSV.
///
/// The input must have a header row with the columns `t,x,y,z` (any order); `t` is the elapsed
/// time in seconds since the first sample, positions are in the sensor frame.
///
/// Arguments
/// -----------------
/// * `reader`: any byte source, e.g. an opened file.
///
/// Return
/// ----------
/// * The samples in file order, or `EstimatorError::CsvError` on malformed rows.
pub fn read_samples_csv<R: Read>(reader: R) -> Result<SampleSequence, EstimatorError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    rdr.deserialize::<SampleRecord>()
        .map(|record| {
            let r = record?;
            Ok(Sample::new(Vector3::new(r.x, r.y, r.z), r.t))
        })
        .collect()
}
