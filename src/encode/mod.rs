//! Gaussian bin encoding of weighted continuous samples.
//!
//! Each sample is smeared over a fixed grid of evaluation points with a
//! smoothing kernel. Histogram-style features use it to turn a variable number
//! of distances, angles or charges into a fixed-width vector, either for the
//! whole molecule ([`GaussianEncoder::encode_values`]) or per atom
//! ([`GaussianEncoder::encode_atom_values`]).

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod kernel;

pub use kernel::{Smoothing, Spacing};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("sample slot {slot} is out of range for {slot_count} slots")]
    SlotOutOfRange { slot: usize, slot_count: usize },

    #[error("sample atom {atom} is out of range for {atom_count} atoms")]
    AtomOutOfRange { atom: usize, atom_count: usize },

    #[error("invalid encoder configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown smoothing function '{0}'")]
    UnknownSmoothing(String),

    #[error("unknown spacing function '{0}'")]
    UnknownSpacing(String),
}

/// Which atoms a sample belongs to when encoding per atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AtomTag {
    /// Molecule-level sample; never attributed to an atom row.
    #[default]
    None,
    /// Atom-centred sample attributed to one row.
    Single(usize),
    /// Bond-like sample shared by both endpoints.
    Pair(usize, usize),
}

/// One weighted continuous value destined for a slot of the encoded vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub atoms: AtomTag,
    pub slot: usize,
    pub value: f64,
    pub weight: f64,
}

impl Sample {
    /// Creates an untagged sample.
    ///
    /// # Arguments
    ///
    /// * `slot` - Index of the sub-vector the sample is added to
    /// * `value` - Continuous value, passed through the spacing function
    /// * `weight` - Scale applied to the smoothed contribution
    pub fn new(slot: usize, value: f64, weight: f64) -> Self {
        Self {
            atoms: AtomTag::None,
            slot,
            value,
            weight,
        }
    }

    /// Tags the sample for per-atom encoding.
    pub fn with_atoms(mut self, atoms: AtomTag) -> Self {
        self.atoms = atoms;
        self
    }
}

/// Smears weighted samples over a fixed grid of evaluation points.
///
/// Every sample contributes `weight × smoothing(slope × (t − spacing(value)))`
/// at each grid point `t`. Missing fields take their defaults when
/// deserialized from JSON or TOML.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaussianEncoder {
    /// Number of grid points per slot.
    pub segments: usize,
    /// Sharpness of the smoothing kernel.
    pub slope: f64,
    pub start: f64,
    pub end: f64,
    pub smoothing: Smoothing,
    pub spacing: Spacing,
}

impl Default for GaussianEncoder {
    fn default() -> Self {
        Self {
            segments: 100,
            slope: 20.0,
            start: 0.2,
            end: 6.0,
            smoothing: Smoothing::Norm,
            spacing: Spacing::Linear,
        }
    }
}

impl GaussianEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_slope(mut self, slope: f64) -> Self {
        self.slope = slope;
        self
    }

    /// Sets the inclusive grid bounds.
    pub fn with_range(mut self, start: f64, end: f64) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    /// Checks the configuration before encoding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when `segments` is zero or any of
    /// `slope`, `start` and `end` is not finite.
    pub fn validate(&self) -> Result<(), Error> {
        if self.segments == 0 {
            return Err(Error::InvalidConfig("segments must be at least 1".into()));
        }
        if !self.slope.is_finite() || !self.start.is_finite() || !self.end.is_finite() {
            return Err(Error::InvalidConfig(
                "slope, start and end must be finite".into(),
            ));
        }
        Ok(())
    }

    /// Evaluation points: `segments` values evenly spaced on `[start, end]`.
    pub fn theta(&self) -> Vec<f64> {
        match self.segments {
            0 => Vec::new(),
            1 => vec![self.start],
            n => {
                let step = (self.end - self.start) / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        if i == n - 1 {
                            self.end
                        } else {
                            self.start + step * i as f64
                        }
                    })
                    .collect()
            }
        }
    }

    /// Sums every sample into the sub-vector of its slot. The result has
    /// length `slot_count × segments`; atom tags are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SlotOutOfRange`] for a sample whose slot is not below
    /// `slot_count`, or the error from [`validate`](Self::validate).
    pub fn encode_values(&self, samples: &[Sample], slot_count: usize) -> Result<Vec<f64>, Error> {
        self.validate()?;
        let theta = self.theta();
        let width = self.segments;
        let mut out = vec![0.0; slot_count * width];

        for sample in samples {
            check_slot(sample.slot, slot_count)?;
            let offset = sample.slot * width;
            self.accumulate(&theta, sample, &mut out[offset..offset + width]);
        }
        Ok(out)
    }

    /// Per-atom variant of [`encode_values`](Self::encode_values): row `i`
    /// collects every sample tagged with atom `i`. Untagged samples are left out.
    ///
    /// # Arguments
    ///
    /// * `samples` - Samples tagged with [`AtomTag::Single`] or [`AtomTag::Pair`]
    /// * `atom_count` - Number of rows in the result
    /// * `slot_count` - Number of sub-vectors per row
    ///
    /// # Errors
    ///
    /// Returns [`Error::AtomOutOfRange`] or [`Error::SlotOutOfRange`] for a
    /// sample outside the requested shape.
    pub fn encode_atom_values(
        &self,
        samples: &[Sample],
        atom_count: usize,
        slot_count: usize,
    ) -> Result<Array2<f64>, Error> {
        self.validate()?;
        let theta = self.theta();
        let width = self.segments;
        let mut out = Array2::zeros((atom_count, slot_count * width));
        let mut scratch = vec![0.0; width];

        for sample in samples {
            check_slot(sample.slot, slot_count)?;
            let (first, second) = match sample.atoms {
                AtomTag::None => continue,
                AtomTag::Single(i) => (i, None),
                AtomTag::Pair(i, j) if i == j => (i, None),
                AtomTag::Pair(i, j) => (i, Some(j)),
            };
            let rows = std::iter::once(first).chain(second);
            for row in rows.clone() {
                if row >= atom_count {
                    return Err(Error::AtomOutOfRange {
                        atom: row,
                        atom_count,
                    });
                }
            }

            scratch.iter_mut().for_each(|v| *v = 0.0);
            self.accumulate(&theta, sample, &mut scratch);

            let offset = sample.slot * width;
            for row in rows {
                for (k, v) in scratch.iter().enumerate() {
                    out[[row, offset + k]] += v;
                }
            }
        }
        Ok(out)
    }

    fn accumulate(&self, theta: &[f64], sample: &Sample, target: &mut [f64]) {
        let x = self.spacing.apply(sample.value);
        for (slot, &t) in target.iter_mut().zip(theta) {
            *slot += sample.weight * self.smoothing.apply(self.slope * (t - x));
        }
    }
}

fn check_slot(slot: usize, slot_count: usize) -> Result<(), Error> {
    if slot >= slot_count {
        return Err(Error::SlotOutOfRange { slot, slot_count });
    }
    Ok(())
}
