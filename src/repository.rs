//! Grain record repository interface and an in-memory implementation.

use std::ops::RangeInclusive;

use crate::{Error, Grain, GrainFeatures};

// -------------------------------------------------------------------------------------------------

/// A grain record as stored in a grain repository.
#[derive(Debug, Clone, PartialEq)]
pub struct GrainRecord {
    pub id: u64,
    /// Path of the source file at analysis time. May not exist on this machine.
    pub source_ref: String,
    pub start_frame: usize,
    pub end_frame: usize,
    pub sample_rate: u32,
    pub features: GrainFeatures,
    pub tags: Vec<String>,
}

impl GrainRecord {
    /// Number of frames the record spans in its source file.
    pub fn length(&self) -> usize {
        self.end_frame.saturating_sub(self.start_frame)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

impl TryFrom<&GrainRecord> for Grain {
    type Error = Error;

    fn try_from(record: &GrainRecord) -> Result<Self, Self::Error> {
        Ok(
            Grain::new(&record.source_ref, record.start_frame, record.end_frame)?
                .with_id(record.id)
                .with_features(record.features.clone()),
        )
    }
}

// -------------------------------------------------------------------------------------------------

/// Feature based predicate for grain repository lookups.
///
/// All conditions must match. An empty query matches all records.
#[derive(Debug, Default, Clone)]
pub struct GrainQuery {
    length: Option<usize>,
    ranges: Vec<(String, RangeInclusive<f64>)>,
    lower_bounds: Vec<(String, f64)>,
    missing: Vec<String>,
    tag: Option<String>,
}

impl GrainQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only match records with exactly the given length in frames.
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Only match records whose feature lies within the given inclusive range.
    pub fn with_range(mut self, feature: &str, range: RangeInclusive<f64>) -> Self {
        self.ranges.push((feature.to_string(), range));
        self
    }

    /// Only match records whose feature is strictly greater than the given value.
    pub fn with_greater_than(mut self, feature: &str, value: f64) -> Self {
        self.lower_bounds.push((feature.to_string(), value));
        self
    }

    /// Only match records which have no value for the given feature.
    pub fn with_missing(mut self, feature: &str) -> Self {
        self.missing.push(feature.to_string());
        self
    }

    /// Only match records carrying the given tag.
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    /// Validate the query's conditions.
    pub fn validate(&self) -> Result<(), Error> {
        for (feature, range) in &self.ranges {
            if feature.is_empty() {
                return Err(Error::MalformedQueryError(
                    "Feature names must not be empty".to_string(),
                ));
            }
            if range.start().is_nan() || range.end().is_nan() || range.start() > range.end() {
                return Err(Error::MalformedQueryError(format!(
                    "Invalid range for feature '{feature}': {:?}",
                    range
                )));
            }
        }
        for (feature, value) in &self.lower_bounds {
            if feature.is_empty() || value.is_nan() {
                return Err(Error::MalformedQueryError(format!(
                    "Invalid lower bound for feature '{feature}': {value}"
                )));
            }
        }
        if self.missing.iter().any(String::is_empty) {
            return Err(Error::MalformedQueryError(
                "Feature names must not be empty".to_string(),
            ));
        }
        if self.tag.as_ref().is_some_and(String::is_empty) {
            return Err(Error::MalformedQueryError(
                "Tags must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Test if the given record matches all conditions of this query.
    pub fn matches(&self, record: &GrainRecord) -> bool {
        if self.length.is_some_and(|length| record.length() != length) {
            return false;
        }
        let in_range = |(feature, range): &(String, RangeInclusive<f64>)| {
            record
                .features
                .get(feature)
                .is_some_and(|value| range.contains(&value))
        };
        let above = |(feature, bound): &(String, f64)| {
            record
                .features
                .get(feature)
                .is_some_and(|value| value > *bound)
        };
        self.ranges.iter().all(in_range)
            && self.lower_bounds.iter().all(above)
            && self.missing.iter().all(|f| !record.features.contains(f))
            && self.tag.as_ref().map_or(true, |tag| record.has_tag(tag))
    }
}

// -------------------------------------------------------------------------------------------------

/// A queryable store of grain records.
///
/// Implementations must be safe for concurrent read-only use, as parallel render workers share
/// a single repository.
pub trait GrainRepository: Send + Sync {
    /// Fetch all records matching the given query, ordered by record id.
    ///
    /// Returns [`Error::EmptySelectionError`] when nothing matches and
    /// [`Error::MalformedQueryError`] when the query can't be evaluated.
    fn fetch(&self, query: &GrainQuery) -> Result<Vec<GrainRecord>, Error>;

    /// Fetch records and convert them into template grains.
    fn fetch_grains(&self, query: &GrainQuery) -> Result<Vec<Grain>, Error> {
        self.fetch(query)?.iter().map(Grain::try_from).collect()
    }
}

// -------------------------------------------------------------------------------------------------

/// A [`GrainRepository`] which keeps all its records in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryGrainRepository {
    records: Vec<GrainRecord>,
}

impl MemoryGrainRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new record. Records with an existing id are replaced.
    pub fn insert(&mut self, record: GrainRecord) {
        match self.records.binary_search_by_key(&record.id, |r| r.id) {
            Ok(index) => self.records[index] = record,
            Err(index) => self.records.insert(index, record),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<GrainRecord> for MemoryGrainRepository {
    fn from_iter<T: IntoIterator<Item = GrainRecord>>(iter: T) -> Self {
        let mut repository = Self::new();
        for record in iter {
            repository.insert(record);
        }
        repository
    }
}

impl GrainRepository for MemoryGrainRepository {
    fn fetch(&self, query: &GrainQuery) -> Result<Vec<GrainRecord>, Error> {
        query.validate()?;
        let records = self
            .records
            .iter()
            .filter(|record| query.matches(record))
            .cloned()
            .collect::<Vec<_>>();
        if records.is_empty() {
            return Err(Error::EmptySelectionError);
        }
        Ok(records)
    }
}

// -------------------------------------------------------------------------------------------------
