//! Grain records and placement bookkeeping.

use std::collections::BTreeMap;

use crate::Error;

// -------------------------------------------------------------------------------------------------

/// Named numeric descriptors of a grain, such as its frequency, energy or spectral measures.
///
/// Features are computed by an external analysis step. Here they are read-only and only serve as
/// sort or selection keys. A missing feature is the equivalent of a `NULL` value.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GrainFeatures(BTreeMap<String, f64>);

impl GrainFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder style setter for a single feature.
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: f64) {
        self.0.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for GrainFeatures {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// -------------------------------------------------------------------------------------------------

/// Absolute placement of a grain in the output timeline, in sample frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrainPlacement {
    pub start_idx: usize,
    pub end_idx: usize,
}

impl GrainPlacement {
    pub fn len(&self) -> usize {
        self.end_idx - self.start_idx
    }

    pub fn is_empty(&self) -> bool {
        self.end_idx == self.start_idx
    }
}

// -------------------------------------------------------------------------------------------------

/// Integer grain fields which can be randomized via
/// [`randomize_param`](crate::sequence::mutate::randomize_param).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, strum::EnumString, strum::Display, strum::VariantNames,
)]
pub enum GrainParameter {
    DistanceBetweenGrains,
    Channel,
}

impl GrainParameter {
    /// Check if the given value is in this parameter's valid range.
    pub fn validate(&self, value: i64) -> Result<(), Error> {
        match self {
            GrainParameter::DistanceBetweenGrains => Ok(()),
            GrainParameter::Channel => {
                if value < 0 {
                    return Err(Error::ParameterError(format!(
                        "Grain channel must be >= 0, but is {value}"
                    )));
                }
                Ok(())
            }
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// A reference to a contiguous span of a source recording plus its placement metadata.
///
/// Grains are created as read-only templates from repository records, then cloned by the
/// assemblers. Each clone owns its own `distance_between_grains`, `channel` and placement, so
/// mutating one occurrence of a grain never affects other occurrences of the same template.
#[derive(Debug, Clone, PartialEq)]
pub struct Grain {
    id: Option<u64>,
    source_ref: String,
    start_frame: usize,
    end_frame: usize,
    features: GrainFeatures,
    placement: Option<GrainPlacement>,
    /// Waveform of the grain's span. `None` until a source accessor loaded it.
    pub samples: Option<Vec<f32>>,
    /// Gap (positive) or overlap (negative) in frames relative to the previous grain in its
    /// sequence. Ignored for the first grain of a sequence.
    pub distance_between_grains: i64,
    /// Destination channel in the rendered output buffer.
    pub channel: usize,
}

impl Grain {
    /// Create a new unplaced grain for the given source span.
    /// `end_frame` must be greater than `start_frame`.
    pub fn new(source_ref: &str, start_frame: usize, end_frame: usize) -> Result<Self, Error> {
        if end_frame <= start_frame {
            return Err(Error::ParameterError(format!(
                "Grain end frame must be > start frame, but is {end_frame} <= {start_frame}"
            )));
        }
        Ok(Self {
            id: None,
            source_ref: source_ref.to_string(),
            start_frame,
            end_frame,
            features: GrainFeatures::default(),
            placement: None,
            samples: None,
            distance_between_grains: 0,
            channel: 0,
        })
    }

    /// Create a new grain with already loaded samples. The source span is `0..samples.len()`.
    pub fn with_samples(source_ref: &str, samples: Vec<f32>) -> Result<Self, Error> {
        let mut grain = Self::new(source_ref, 0, samples.len())?;
        grain.samples = Some(samples);
        Ok(grain)
    }

    /// Builder style setter for the grain's features.
    pub fn with_features(mut self, features: GrainFeatures) -> Self {
        self.features = features;
        self
    }

    /// Builder style setter for the grain's repository id.
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Repository id of the record this grain got created from, if any.
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    /// Identifier of the originating audio file.
    pub fn source_ref(&self) -> &str {
        &self.source_ref
    }

    pub fn start_frame(&self) -> usize {
        self.start_frame
    }

    pub fn end_frame(&self) -> usize {
        self.end_frame
    }

    /// Number of source frames this grain spans.
    pub fn frame_count(&self) -> usize {
        self.end_frame - self.start_frame
    }

    pub fn features(&self) -> &GrainFeatures {
        &self.features
    }

    /// Shortcut for `self.features().get(name)`.
    pub fn feature(&self, name: &str) -> Option<f64> {
        self.features.get(name)
    }

    /// Absolute placement in the output timeline, once positions got calculated.
    pub fn placement(&self) -> Option<GrainPlacement> {
        self.placement
    }

    pub fn start_idx(&self) -> Option<usize> {
        self.placement.map(|p| p.start_idx)
    }

    pub fn end_idx(&self) -> Option<usize> {
        self.placement.map(|p| p.end_idx)
    }

    pub fn is_placed(&self) -> bool {
        self.placement.is_some()
    }

    /// Freeze the grain's placement. Placements can only be set once.
    pub(crate) fn place(&mut self, placement: GrainPlacement) -> Result<(), Error> {
        if self.placement.is_some() {
            return Err(Error::ParameterError(format!(
                "Grain from '{}' already got positioned",
                self.source_ref
            )));
        }
        self.placement = Some(placement);
        Ok(())
    }

    /// Clone of this grain without its placement, as used by the assemblers.
    pub(crate) fn to_unplaced(&self) -> Self {
        Self {
            placement: None,
            ..self.clone()
        }
    }

    /// Read the given integer parameter.
    pub fn param(&self, param: GrainParameter) -> i64 {
        match param {
            GrainParameter::DistanceBetweenGrains => self.distance_between_grains,
            GrainParameter::Channel => self.channel as i64,
        }
    }

    /// Set the given integer parameter, validating its range.
    pub fn set_param(&mut self, param: GrainParameter, value: i64) -> Result<(), Error> {
        param.validate(value)?;
        match param {
            GrainParameter::DistanceBetweenGrains => {
                self.distance_between_grains = value;
            }
            GrainParameter::Channel => {
                self.channel = value as usize;
            }
        }
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------
